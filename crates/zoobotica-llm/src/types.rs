//! Request and response types shared by the backends.

use serde::{Deserialize, Serialize};
use zoobotica_core::types::Trait;

/// Who said a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(alias = "model")]
    Assistant,
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Trait recommendations for a set of user preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    /// Rationale bullet points.
    #[serde(default)]
    pub summary: Vec<String>,
    /// Recommended traits, restricted to the five known types.
    #[serde(default)]
    pub recommendations: Vec<Trait>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_accepts_model_alias() {
        let turn: ChatTurn = serde_json::from_str(r#"{"role":"model","content":"hi"}"#).unwrap();
        assert_eq!(turn.role, Role::Assistant);
        let json = serde_json::to_value(ChatTurn::user("hey")).unwrap();
        assert_eq!(json["role"], "user");
    }
}
