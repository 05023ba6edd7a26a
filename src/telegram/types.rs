use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A single event delivered to the webhook.
///
/// Decoding is tolerant: any missing field falls back to its zero value,
/// so a sparse update still produces a reply attempt.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: i64,
    #[serde(default)]
    pub message: Message,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub message_id: i64,
    #[serde(default)]
    pub from: User,
    #[serde(default)]
    pub chat: Chat,
    #[serde(default)]
    pub date: UnixTime,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[allow(dead_code)]
pub struct User {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub language_code: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[allow(dead_code)]
pub struct Chat {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    /// "private", "group", "supergroup" or "channel"
    #[serde(default, rename = "type")]
    pub kind: String,
}

/// Seconds since the Unix epoch, as sent in `Message.date`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnixTime(pub i64);

impl UnixTime {
    /// Timestamps outside chrono's range collapse to the epoch.
    pub fn to_datetime(self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }
}

impl std::fmt::Display for UnixTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.to_datetime().to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(dead_code)]
pub enum ParseMode {
    Markdown,
    MarkdownV2,
    #[serde(rename = "HTML")]
    Html,
}

/// Body of a `sendMessage` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendMessageRequest {
    pub chat_id: i64,
    pub text: String,
    pub reply_to_message_id: i64,
    pub parse_mode: ParseMode,
}

/// Result of `getMe`.
#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct BotUser {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_update_decodes_with_defaults() {
        let update: Update = serde_json::from_str(
            r#"{"update_id":1,"message":{"message_id":5,"chat":{"id":42},"text":"hi"}}"#,
        )
        .unwrap();
        assert_eq!(update.update_id, 1);
        assert_eq!(update.message.message_id, 5);
        assert_eq!(update.message.chat.id, 42);
        assert_eq!(update.message.text, "hi");
        assert_eq!(update.message.from.id, 0);
        assert_eq!(update.message.date, UnixTime(0));
    }

    #[test]
    fn test_full_update_decodes() {
        let update: Update = serde_json::from_str(
            r#"{
                "update_id": 10000,
                "message": {
                    "message_id": 1365,
                    "date": 1441645532,
                    "from": {
                        "id": 1111111,
                        "is_bot": false,
                        "first_name": "Test",
                        "last_name": "Lastname",
                        "username": "Test",
                        "language_code": "en"
                    },
                    "chat": {
                        "id": -1001111111,
                        "first_name": "Test",
                        "type": "supergroup"
                    },
                    "text": "/start"
                }
            }"#,
        )
        .unwrap();
        let msg = update.message;
        assert_eq!(msg.from.language_code, "en");
        assert!(!msg.from.is_bot);
        assert_eq!(msg.chat.id, -1001111111);
        assert_eq!(msg.chat.kind, "supergroup");
        assert_eq!(msg.date.to_string(), "2015-09-07T17:05:32Z");
    }

    #[test]
    fn test_unix_time_agrees_with_epoch_seconds() {
        for t in [0_i64, 1, 1_441_645_532, 1_700_000_000, 4_102_444_800] {
            let formatted = UnixTime(t).to_string();
            let parsed = DateTime::parse_from_rfc3339(&formatted).unwrap();
            assert_eq!(parsed.timestamp(), t);
            assert_eq!(UnixTime(t).to_datetime().timestamp(), t);
        }
    }

    #[test]
    fn test_send_message_request_wire_shape() {
        let req = SendMessageRequest {
            chat_id: 42,
            text: "*You just said:*hi".to_string(),
            reply_to_message_id: 5,
            parse_mode: ParseMode::Markdown,
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"chat_id":42,"text":"*You just said:*hi","reply_to_message_id":5,"parse_mode":"Markdown"}"#
        );
    }

    #[test]
    fn test_parse_mode_names() {
        assert_eq!(serde_json::to_string(&ParseMode::Html).unwrap(), r#""HTML""#);
        assert_eq!(
            serde_json::to_string(&ParseMode::MarkdownV2).unwrap(),
            r#""MarkdownV2""#
        );
    }
}
