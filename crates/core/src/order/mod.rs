//! Order domain types: beverage categories, order items, and the tickets
//! that move through the pipeline.

mod ticket;

pub use ticket::OrderTicket;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing order text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// Category is not one of the beverages we brew.
    #[error("unknown beverage category: {0}")]
    UnknownCategory(String),

    /// Quantity was zero or not a decimal integer.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Item text did not match "<quantity> <category>".
    #[error("malformed item: {0}")]
    MalformedItem(String),
}

/// Beverage category. Closed set; each category has its own brew duration
/// and capacity counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Tea,
    Coffee,
}

impl Category {
    /// All categories, in a stable order.
    pub const ALL: [Category; 2] = [Category::Tea, Category::Coffee];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tea => "tea",
            Category::Coffee => "coffee",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = OrderError;

    /// Case-insensitive; the wire form is normalized to lowercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tea" => Ok(Category::Tea),
            "coffee" => Ok(Category::Coffee),
            other => Err(OrderError::UnknownCategory(other.to_string())),
        }
    }
}

/// One line of a customer's order: a positive quantity of a category.
///
/// Stringified as `"<quantity> <category>"`, which is also the item part of
/// the pipeline's item-instance key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub quantity: u32,
    pub category: Category,
}

impl Item {
    pub fn new(quantity: u32, category: Category) -> Result<Self, OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity("0".to_string()));
        }
        Ok(Self { quantity, category })
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.quantity, self.category)
    }
}

impl FromStr for Item {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(qty), Some(category), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(OrderError::MalformedItem(s.to_string()));
        };
        let quantity: u32 = qty
            .parse()
            .map_err(|_| OrderError::InvalidQuantity(qty.to_string()))?;
        Item::new(quantity, category.parse()?)
    }
}
