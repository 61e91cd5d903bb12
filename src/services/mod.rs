//! Application services.
//!
//! Multi-step operations that span several store calls or run outside a
//! request (the daily reset).

pub mod daily_reset;
pub mod import;
pub mod study;
