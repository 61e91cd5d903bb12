//! Fixed-offset leveling: per-word level transitions and session eligibility.

pub mod leveling;
pub mod selector;

pub use leveling::{apply_answer, apply_ping, LevelChange, Transition};
pub use selector::{parse_levels, select_eligible, SessionContext, StudyMode};
