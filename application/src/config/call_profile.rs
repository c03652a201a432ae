//! Per-call limits for completion requests.

use std::time::Duration;

/// Token and time limits for one completion call.
///
/// The call is made exactly once; when `timeout` elapses the call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallProfile {
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl CallProfile {
    /// Analytical stages: 4096 tokens, 120 s
    pub const STANDARD: CallProfile = CallProfile {
        max_tokens: 4096,
        timeout: Duration::from_secs(120),
    };

    /// Manuscript writing: 8192 tokens, 180 s
    pub const WRITING: CallProfile = CallProfile {
        max_tokens: 8192,
        timeout: Duration::from_secs(180),
    };

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout = Duration::from_secs(seconds);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

impl Default for CallProfile {
    fn default() -> Self {
        Self::STANDARD
    }
}
