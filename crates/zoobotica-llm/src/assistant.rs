//! Conversational design assistant.

use crate::backend::LlmBackend;
use crate::types::{ChatTurn, Role};
use serde::{Deserialize, Serialize};
use tracing::warn;
use zoobotica_core::types::UserPreferences;

/// Greeting that opens every conversation.
pub const WELCOME: &str = "Hi! I'm your Zoobotica assistant. I can help you design your robot by suggesting animal traits and answering questions. What would you like to know?";

/// Shown in place of a reply when the backend fails.
pub const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

/// Presentation hint attached to an assistant message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Suggestion,
    Warning,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MessageKind>,
}

impl ChatMessage {
    fn is_canned(&self) -> bool {
        self.id == "welcome" || self.kind == Some(MessageKind::Warning)
    }
}

/// A running conversation with the design assistant.
///
/// The welcome message is always first. Failed requests append [`APOLOGY`]
/// as a warning instead of surfacing the error.
#[derive(Debug, Clone)]
pub struct ChatAssistant {
    messages: Vec<ChatMessage>,
    preferences: Option<UserPreferences>,
    next_id: u64,
}

impl ChatAssistant {
    pub fn new(preferences: Option<UserPreferences>) -> Self {
        Self {
            messages: vec![ChatMessage {
                id: "welcome".to_string(),
                role: Role::Assistant,
                content: WELCOME.to_string(),
                kind: None,
            }],
            preferences,
            next_id: 1,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn set_preferences(&mut self, preferences: UserPreferences) {
        self.preferences = Some(preferences);
    }

    /// Send `input` and return the message appended in reply.
    ///
    /// Blank input is ignored and returns `None`.
    pub async fn send(&mut self, backend: &dyn LlmBackend, input: &str) -> Option<&ChatMessage> {
        if input.trim().is_empty() {
            return None;
        }

        // Canned messages are not part of what the model has said
        let history: Vec<ChatTurn> = self
            .messages
            .iter()
            .filter(|m| !m.is_canned())
            .map(|m| ChatTurn {
                role: m.role,
                content: m.content.clone(),
            })
            .collect();

        self.push(Role::User, input.to_string(), None);

        let reply = backend
            .chat(input, self.preferences.as_ref(), &history)
            .await;

        match reply {
            Ok(content) => self.push(Role::Assistant, content, None),
            Err(e) => {
                warn!(backend = backend.name(), "chat request failed: {}", e);
                self.push(Role::Assistant, APOLOGY.to_string(), Some(MessageKind::Warning))
            }
        }
        self.messages.last()
    }

    fn push(&mut self, role: Role, content: String, kind: Option<MessageKind>) {
        let id = self.next_id.to_string();
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            role,
            content,
            kind,
        });
    }
}

impl Default for ChatAssistant {
    fn default() -> Self {
        Self::new(None)
    }
}
