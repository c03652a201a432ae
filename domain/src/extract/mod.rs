//! Heuristic text extractors
//!
//! Pure keyword-driven scanners that turn free-form model output into
//! structured signals. No I/O, no model calls, just text pattern matching.
//!
//! | Function | Input | Signal |
//! |----------|-------|--------|
//! | [`extract_disagreements`] | synthesis text | DISAGREEMENT / CONFLICT section |
//! | [`extract_issues`] | review text | up to 10 issue lines |
//! | [`classify_confidence`] | keyword counts | HIGH / MEDIUM / LOW |
//! | [`extract_code_block`] | generation text | fenced code |
//! | [`verification_flags_problem`] | verification text | ERROR / BUG |

mod code;
mod disagreement;
mod review;

pub use code::{extract_code_block, verification_flags_problem};
pub use disagreement::extract_disagreements;
pub use review::{
    CRITICAL_WORDS, Confidence, WARNING_WORDS, assess_review, classify_confidence,
    count_vocabulary, extract_issues,
};
