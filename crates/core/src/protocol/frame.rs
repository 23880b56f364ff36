use serde::{Deserialize, Serialize};

use crate::order::Item;

/// Prefix marking a server-originated notification on the session channel.
/// Clients display these without consuming a pending response slot.
pub const NOTIFICATION_PREFIX: &str = "SERVER: ";

/// One framed message, either direction.
///
/// Clients send a `Customer` descriptor first, then `Text` request tokens,
/// plus an `Items` payload after `NEW_ORDER`. The server only ever sends
/// `Text` frames: responses, status blobs, and `SERVER: ` notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Frame {
    /// A bare text token or blob.
    Text { body: String },
    /// Customer descriptor, the first message of every session.
    Customer {
        name: String,
        id: u64,
        items: Vec<Item>,
    },
    /// A list of items following a NEW_ORDER token.
    Items { items: Vec<Item> },
}

impl Frame {
    pub fn text(body: impl Into<String>) -> Self {
        Frame::Text { body: body.into() }
    }

    /// A `SERVER: `-prefixed asynchronous notification.
    pub fn notification(text: impl AsRef<str>) -> Self {
        Frame::Text {
            body: format!("{}{}", NOTIFICATION_PREFIX, text.as_ref()),
        }
    }

    /// True for `SERVER: ` side-band messages.
    pub fn is_notification(&self) -> bool {
        matches!(self, Frame::Text { body } if body.starts_with(NOTIFICATION_PREFIX))
    }
}

/// Request tokens a connected customer may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    OrderStatus,
    CollectOrder,
    NewOrder,
    Terminate,
}

impl Request {
    /// Parse a request token, case-insensitively. Unknown tokens yield
    /// `None`; the handler logs and ignores them.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.eq_ignore_ascii_case("ORDER_STATUS") {
            Some(Request::OrderStatus)
        } else if token.eq_ignore_ascii_case("COLLECT_ORDER") {
            Some(Request::CollectOrder)
        } else if token.eq_ignore_ascii_case("NEW_ORDER") {
            Some(Request::NewOrder)
        } else if token.eq_ignore_ascii_case("TERMINATE") {
            Some(Request::Terminate)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::Category;

    #[test]
    fn test_frame_tagging_is_self_describing() {
        let json = serde_json::to_string(&Frame::text("ORDER_STATUS")).unwrap();
        assert!(json.contains("\"kind\":\"text\""));

        let customer = Frame::Customer {
            name: "A".to_string(),
            id: 1,
            items: vec![Item::new(1, Category::Tea).unwrap()],
        };
        let json = serde_json::to_string(&customer).unwrap();
        assert!(json.contains("\"kind\":\"customer\""));

        let parsed: Frame = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, customer);
    }

    #[test]
    fn test_notification_prefix() {
        let frame = Frame::notification("Your 1 tea is ready for pickup!");
        assert!(frame.is_notification());
        assert_eq!(
            frame,
            Frame::text("SERVER: Your 1 tea is ready for pickup!")
        );
        assert!(!Frame::text("CONNECTED").is_notification());
    }

    #[test]
    fn test_request_tokens_case_insensitive() {
        assert_eq!(Request::from_token("order_status"), Some(Request::OrderStatus));
        assert_eq!(Request::from_token("COLLECT_ORDER"), Some(Request::CollectOrder));
        assert_eq!(Request::from_token(" new_order "), Some(Request::NewOrder));
        assert_eq!(Request::from_token("Terminate"), Some(Request::Terminate));
        assert_eq!(Request::from_token("MAKE_IT_SNAPPY"), None);
    }
}
