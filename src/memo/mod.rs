//! Process-wide memos shared by every fetch
//!
//! - [`PenaltyBox`]: origins currently blocking this client
//! - [`ServerDirectory`]: which server hosts each board
//! - [`BoardNameMemo`]: board titles
//!
//! All three are created once by [`ClientBuilder::start`](crate::ClientBuilder::start) and
//! shared through `Arc`. Their background tasks end when the memo is dropped.

pub mod board_name;
pub mod directory;
pub mod penalty;

pub use board_name::BoardNameMemo;
pub use directory::{DirectorySource, ServerDirectory, Snapshot};
pub use penalty::PenaltyBox;
