use crate::error::Error;
use serde_json::Value;

const DEFAULT_PUSH_TITLE: &str = "Push Notification";

#[derive(Debug, Clone, PartialEq)]
pub struct PushRequest {
    pub recipient_id: String,
    pub title: String,
    pub body: String,
}

impl PushRequest {
    ///
    /// Parses raw push message.
    ///
    /// Message must be a JSON object with `recipientId` field.
    /// `title` defaults to "Push Notification" and `body` to the whole raw message.
    ///
    /// ### Errors
    /// - [Error::Validation] when
    ///     - message is not a JSON object
    ///     - `recipientId` is missing or empty
    ///
    pub fn parse(message: &str) -> Result<Self, Error> {
        let value = serde_json::from_str::<Value>(message).map_err(|err| {
            Error::Validation(format!(
                "invalid push message format or missing recipientId: {err}"
            ))
        })?;

        let Value::Object(fields) = value else {
            return Err(Error::Validation(
                "invalid push message format or missing recipientId: not a JSON object".into(),
            ));
        };

        let recipient_id = fields.get("recipientId").map(as_text).unwrap_or_default();
        if recipient_id.is_empty() {
            return Err(Error::Validation(
                "invalid push message format or missing recipientId: push message must contain a 'recipientId' field".into(),
            ));
        }

        let title = fields
            .get("title")
            .map(as_text)
            .unwrap_or_else(|| DEFAULT_PUSH_TITLE.to_string());
        let body = fields
            .get("body")
            .map(as_text)
            .unwrap_or_else(|| message.to_string());

        Ok(Self {
            recipient_id,
            title,
            body,
        })
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(string) => string.clone(),
        other => other.to_string(),
    }
}
