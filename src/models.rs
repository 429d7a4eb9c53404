// src/models.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// Represents a message in a conversation. Immutable once appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Message {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// A reusable persona template: a system prompt plus a cyclic sequence of
/// suggested assistant prompts. Shared between conversations as immutable
/// data; never mutated once attached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub name: String,
    pub system_message: String,
    #[serde(default)]
    pub assistant_prompts: Vec<String>,
}

/// A titled, ordered, append-only list of messages, optionally bound to a
/// Role. The `id` is stable across renames and list reordering; payloads
/// persisted before ids existed get a fresh one on load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub role: Option<Role>,
}

impl Conversation {
    pub fn new(role: Option<Role>) -> Self {
        let title = match &role {
            Some(role) => format!("New {} Conversation", role.name),
            None => "New Conversation".to_string(),
        };
        Conversation {
            id: Uuid::new_v4(),
            title,
            messages: Vec::new(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }

    #[test]
    fn test_conversation_round_trip() {
        let role = Role {
            name: "Tutor".to_string(),
            system_message: "Be a tutor".to_string(),
            assistant_prompts: vec!["Hi".to_string()],
        };
        let mut conversation = Conversation::new(Some(role));
        conversation.messages.push(Message::user("Hello"));
        conversation.messages.push(Message::assistant("Hi there"));

        let json = serde_json::to_string(&conversation).unwrap();
        let decoded: Conversation = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, conversation);
    }

    #[test]
    fn test_conversation_without_id_gets_one_on_load() {
        // Shape written by builds that predate stable ids.
        let json = r#"{"title":"New Conversation","messages":[]}"#;
        let decoded: Conversation = serde_json::from_str(json).unwrap();
        assert_eq!(decoded.title, "New Conversation");
        assert!(decoded.role.is_none());
    }

    #[test]
    fn test_role_uses_camel_case_keys() {
        let json = r#"{"name":"Tutor","systemMessage":"Be a tutor","assistantPrompts":["Hi"]}"#;
        let role: Role = serde_json::from_str(json).unwrap();
        assert_eq!(role.system_message, "Be a tutor");
        assert_eq!(role.assistant_prompts, vec!["Hi".to_string()]);
    }
}
