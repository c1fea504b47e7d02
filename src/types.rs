//! Core request and result types
//!
//! A [`Target`] names what to fetch; a [`FetchOutcome`] is what one fetch
//! produced. Both are per-call values owned by the caller.

pub mod duration;
mod outcome;
mod target;

pub use duration::duration_serde;
pub use outcome::{FetchOutcome, count_lines};
pub use target::{Target, TargetKind};
