//! Conversation entities sent to a completion endpoint

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Role of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
        }
    }
}

/// A single role/content turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// An ordered, validated sequence of turns (Value Object)
///
/// Always non-empty and always contains at least one user turn.
/// Built fresh for each call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    /// Validate and build a conversation from raw turns
    pub fn new(turns: Vec<ConversationTurn>) -> Result<Self, DomainError> {
        if turns.is_empty() {
            return Err(DomainError::InvalidConversation(
                "conversation has no turns".to_string(),
            ));
        }
        if !turns.iter().any(|t| t.role == Role::User) {
            return Err(DomainError::InvalidConversation(
                "conversation has no user turn".to_string(),
            ));
        }
        Ok(Self { turns })
    }

    /// The common system + user shape used by every stage
    pub fn system_user(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            turns: vec![ConversationTurn::system(system), ConversationTurn::user(user)],
        }
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Total characters across all turns (for log lines)
    pub fn char_len(&self) -> usize {
        self.turns.iter().map(|t| t.content.len()).sum()
    }
}

/// Sampling temperature, validated to lie in [0, 2]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Temperature(f32);

impl Temperature {
    /// Deterministic decoding (code generation)
    pub const PRECISE: Temperature = Temperature(0.0);
    /// Default for analytical stages
    pub const ANALYTICAL: Temperature = Temperature(0.1);
    /// Prose writing
    pub const WRITING: Temperature = Temperature(0.3);
    /// Adversarial review
    pub const ADVERSARIAL: Temperature = Temperature(0.7);

    pub fn new(value: f32) -> Result<Self, DomainError> {
        if (0.0..=2.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidTemperature(value))
        }
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Temperature::ANALYTICAL
    }
}

impl<'de> Deserialize<'de> for Temperature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f32::deserialize(deserializer)?;
        Temperature::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_conversation_rejected() {
        assert!(Conversation::new(vec![]).is_err());
    }

    #[test]
    fn test_system_only_conversation_rejected() {
        let err = Conversation::new(vec![ConversationTurn::system("be helpful")]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidConversation(_)));
    }

    #[test]
    fn test_system_user_shape() {
        let conv = Conversation::system_user("sys", "question");
        assert_eq!(conv.turns().len(), 2);
        assert_eq!(conv.turns()[0].role, Role::System);
        assert_eq!(conv.turns()[1].role, Role::User);
        assert_eq!(conv.char_len(), 11);
    }

    #[test]
    fn test_temperature_bounds() {
        assert!(Temperature::new(0.0).is_ok());
        assert!(Temperature::new(2.0).is_ok());
        assert!(Temperature::new(-0.1).is_err());
        assert!(Temperature::new(2.01).is_err());
        assert!(Temperature::new(f32::NAN).is_err());
    }

    #[test]
    fn test_temperature_deserialize_validates() {
        let ok: Temperature = serde_json::from_str("0.7").unwrap();
        assert_eq!(ok, Temperature::ADVERSARIAL);
        assert!(serde_json::from_str::<Temperature>("3.5").is_err());
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");
        assert_eq!(Role::User.as_str(), "user");
    }
}
