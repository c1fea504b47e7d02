//! Fetch targets
//!
//! A target is a `(server, board, thread)` tuple. The board name is the key
//! into the server directory; the server is whatever the directory resolved
//! when the engine was built and may be empty for unknown boards.

use std::fmt;

use crate::cache::CacheKey;
use crate::error::FetchError;

/// What kind of resource a target names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// The board menu (empty board)
    Menu,
    /// A board's thread listing
    Board,
    /// A single thread log
    Thread,
}

impl TargetKind {
    /// Get a short name for logging
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Board => "board",
            Self::Thread => "thread",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable `(server, board, thread)` tuple for one engine
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    server: String,
    board: String,
    thread: Option<String>,
}

impl Target {
    /// Build a target, validating the thread id
    ///
    /// An empty `thread` means a board request; an empty `board` means a menu
    /// request. A non-empty thread id must parse as a positive integer and
    /// requires a board.
    pub fn new(
        server: impl Into<String>,
        board: impl Into<String>,
        thread: &str,
    ) -> Result<Self, FetchError> {
        let board = board.into();
        let thread = match thread.trim() {
            "" => None,
            id => {
                if board.is_empty() {
                    return Err(FetchError::InvalidTarget(format!(
                        "thread {} requested without a board",
                        id
                    )));
                }
                match id.parse::<u64>() {
                    Ok(n) if n > 0 => Some(id.to_string()),
                    _ => {
                        return Err(FetchError::InvalidTarget(format!(
                            "thread id '{}' is not a positive integer",
                            id
                        )));
                    }
                }
            }
        };
        Ok(Self {
            server: server.into(),
            board,
            thread,
        })
    }

    /// The board menu
    #[must_use]
    pub fn menu() -> Self {
        Self {
            server: String::new(),
            board: String::new(),
            thread: None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> TargetKind {
        match (self.board.is_empty(), &self.thread) {
            (true, _) => TargetKind::Menu,
            (false, None) => TargetKind::Board,
            (false, Some(_)) => TargetKind::Thread,
        }
    }

    /// Check if the directory knew which server hosts the board
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !self.server.is_empty()
    }

    #[must_use]
    pub fn server(&self) -> &str {
        &self.server
    }

    #[must_use]
    pub fn board(&self) -> &str {
        &self.board
    }

    /// Thread id, empty for menu and board targets
    #[must_use]
    pub fn thread(&self) -> &str {
        self.thread.as_deref().unwrap_or("")
    }

    /// Cache key of the resource this target names
    #[must_use]
    pub fn cache_key(&self) -> CacheKey {
        match self.kind() {
            TargetKind::Menu => CacheKey::menu(),
            TargetKind::Board => CacheKey::board(&self.server, &self.board),
            TargetKind::Thread => CacheKey::thread(&self.server, &self.board, self.thread()),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            TargetKind::Menu => f.write_str("<menu>"),
            TargetKind::Board => write!(f, "{}/{}", self.server, self.board),
            TargetKind::Thread => write!(f, "{}/{}/{}", self.server, self.board, self.thread()),
        }
    }
}
