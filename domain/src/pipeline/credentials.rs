use crate::core::error::DomainError;
use std::fmt;

/// API keys for the external collaborators
///
/// Survives pipeline reset. `Debug` never prints the secrets.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    completion_api_key: Option<String>,
    sandbox_api_key: Option<String>,
}

impl Credentials {
    pub const COMPLETION_ENV: &'static str = "OPENROUTER_API_KEY";
    pub const SANDBOX_ENV: &'static str = "OPENAI_API_KEY";

    pub fn new(completion_api_key: Option<String>, sandbox_api_key: Option<String>) -> Self {
        let clean = |k: Option<String>| k.filter(|s| !s.trim().is_empty());
        Self {
            completion_api_key: clean(completion_api_key),
            sandbox_api_key: clean(sandbox_api_key),
        }
    }

    pub fn completion_api_key(&self) -> Option<&str> {
        self.completion_api_key.as_deref()
    }

    pub fn sandbox_api_key(&self) -> Option<&str> {
        self.sandbox_api_key.as_deref()
    }

    /// The completion key, or an error naming the variable to set
    pub fn require_completion(&self) -> Result<&str, DomainError> {
        self.completion_api_key()
            .ok_or(DomainError::MissingCredential(Self::COMPLETION_ENV))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |k: &Option<String>| if k.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Credentials")
            .field("completion_api_key", &mask(&self.completion_api_key))
            .field("sandbox_api_key", &mask(&self.sandbox_api_key))
            .finish()
    }
}
