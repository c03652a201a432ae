//! Model registry: the fixed catalogue of callable models and their prices

use crate::core::error::DomainError;
use crate::conversation::TokenUsage;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identity of a model in the registry (Value Object)
///
/// Each key maps to exactly one [`ModelSpec`] in [`MODEL_REGISTRY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelKey {
    DeepSeekV3,
    DeepSeekR1,
    Gemini25Pro,
    O3,
    Opus,
}

impl ModelKey {
    /// All registered keys, in registry order
    pub const ALL: [ModelKey; 5] = [
        ModelKey::DeepSeekV3,
        ModelKey::DeepSeekR1,
        ModelKey::Gemini25Pro,
        ModelKey::O3,
        ModelKey::Opus,
    ];

    /// Get the string key used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKey::DeepSeekV3 => "deepseek_v3",
            ModelKey::DeepSeekR1 => "deepseek_r1",
            ModelKey::Gemini25Pro => "gemini_25",
            ModelKey::O3 => "o3",
            ModelKey::Opus => "opus",
        }
    }

    /// Look up the immutable spec for this key
    pub fn spec(&self) -> &'static ModelSpec {
        match self {
            ModelKey::DeepSeekV3 => &MODEL_REGISTRY[0],
            ModelKey::DeepSeekR1 => &MODEL_REGISTRY[1],
            ModelKey::Gemini25Pro => &MODEL_REGISTRY[2],
            ModelKey::O3 => &MODEL_REGISTRY[3],
            ModelKey::Opus => &MODEL_REGISTRY[4],
        }
    }

    /// Human-readable display name (e.g. "DeepSeek R1")
    pub fn display_name(&self) -> &'static str {
        self.spec().name
    }
}

impl std::fmt::Display for ModelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModelKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| DomainError::UnknownModel(s.to_string()))
    }
}

impl Serialize for ModelKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ModelKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Immutable description of a callable model
///
/// Prices are USD per one million tokens, as published by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSpec {
    pub key: ModelKey,
    /// Endpoint model id sent on the wire
    pub id: &'static str,
    /// Display name used for attribution
    pub name: &'static str,
    pub input_cost_per_million: f64,
    pub output_cost_per_million: f64,
}

impl ModelSpec {
    /// Look up a spec by its configuration key
    pub fn lookup(key: &str) -> Result<&'static ModelSpec, DomainError> {
        key.parse::<ModelKey>().map(|k| k.spec())
    }

    /// Cost of a call in USD, derived only from reported token usage.
    ///
    /// Never negative; zero usage costs exactly zero.
    pub fn cost(&self, usage: &TokenUsage) -> f64 {
        let input = usage.input_tokens as f64 * self.input_cost_per_million / 1_000_000.0;
        let output = usage.output_tokens as f64 * self.output_cost_per_million / 1_000_000.0;
        (input + output).max(0.0)
    }
}

/// The fixed model catalogue
pub static MODEL_REGISTRY: [ModelSpec; 5] = [
    ModelSpec {
        key: ModelKey::DeepSeekV3,
        id: "deepseek/deepseek-chat-v3-0324",
        name: "DeepSeek V3.2",
        input_cost_per_million: 0.25,
        output_cost_per_million: 0.38,
    },
    ModelSpec {
        key: ModelKey::DeepSeekR1,
        id: "deepseek/deepseek-r1",
        name: "DeepSeek R1",
        input_cost_per_million: 0.55,
        output_cost_per_million: 2.19,
    },
    ModelSpec {
        key: ModelKey::Gemini25Pro,
        id: "google/gemini-2.5-pro-preview",
        name: "Gemini 2.5 Pro",
        input_cost_per_million: 2.50,
        output_cost_per_million: 15.00,
    },
    ModelSpec {
        key: ModelKey::O3,
        id: "openai/o3",
        name: "OpenAI o3",
        input_cost_per_million: 2.00,
        output_cost_per_million: 8.00,
    },
    ModelSpec {
        key: ModelKey::Opus,
        id: "anthropic/claude-opus-4-5",
        name: "Claude Opus 4.5",
        input_cost_per_million: 5.00,
        output_cost_per_million: 25.00,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_roundtrip() {
        for key in ModelKey::ALL {
            let parsed: ModelKey = key.as_str().parse().unwrap();
            assert_eq!(parsed, key);
            assert_eq!(key.spec().key, key);
        }
    }

    #[test]
    fn test_unknown_key() {
        let err = "gpt-2".parse::<ModelKey>().unwrap_err();
        assert!(matches!(err, DomainError::UnknownModel(_)));
        assert!(ModelSpec::lookup("nope").is_err());
    }

    #[test]
    fn test_cost_formula() {
        let spec = ModelKey::O3.spec();
        let usage = TokenUsage::new(1_000_000, 500_000);
        let cost = spec.cost(&usage);
        assert!((cost - (2.00 + 4.00)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_usage_costs_zero() {
        for spec in &MODEL_REGISTRY {
            assert_eq!(spec.cost(&TokenUsage::default()), 0.0);
        }
    }

    #[test]
    fn test_cost_never_negative_over_grid() {
        for spec in &MODEL_REGISTRY {
            for input in [0u64, 1, 17, 4096, 250_000] {
                for output in [0u64, 3, 8192] {
                    let cost = spec.cost(&TokenUsage::new(input, output));
                    let expected = input as f64 * spec.input_cost_per_million / 1e6
                        + output as f64 * spec.output_cost_per_million / 1e6;
                    assert!(cost >= 0.0);
                    assert!((cost - expected).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_serde_as_key_string() {
        let json = serde_json::to_string(&ModelKey::Gemini25Pro).unwrap();
        assert_eq!(json, "\"gemini_25\"");
        let back: ModelKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ModelKey::Gemini25Pro);
    }
}
