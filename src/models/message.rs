use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::serde_helpers::deserialize_optional_id;

const BOT_ID: &str = "bot";

/// Who wrote a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "messageType", content = "userId", rename_all = "lowercase")]
pub enum Author {
    #[serde(rename = "user")]
    Human(String),
    Bot,
}

impl Author {
    /// Either marker is enough to attribute a message to the bot.
    pub fn resolve(user_id: Option<&str>, message_type: Option<&str>) -> Option<Self> {
        let is_bot = message_type.is_some_and(|t| t.trim().eq_ignore_ascii_case(BOT_ID))
            || user_id.is_some_and(|id| id.eq_ignore_ascii_case(BOT_ID));
        if is_bot {
            return Some(Author::Bot);
        }
        user_id.map(|id| Author::Human(id.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    #[serde(flatten)]
    pub author: Author,
    pub user_name: String,
    pub message_text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub author: Author,
    pub user_name: String,
    pub message_text: String,
    pub created_at: DateTime<Utc>,
}

impl NewMessage {
    pub fn into_message(self, id: String) -> Message {
        Message {
            id,
            author: self.author,
            user_name: self.user_name,
            message_text: self.message_text,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageInput {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub message_text: Option<String>,
    pub message_type: Option<String>,
}
