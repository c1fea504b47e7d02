//! Constants used throughout the client
//!
//! Protocol paths, wire limits and timing windows live here so the engine,
//! the memos and the configuration defaults agree on the same values.

use std::time::Duration;

/// Upstream hosts and resource names
pub mod upstream {
    /// Host serving the board menu
    pub const MENU_HOST: &str = "menu.2ch.net";

    /// Board menu document on [`MENU_HOST`]
    pub const MENU_FILE: &str = "bbsmenu.html";

    /// Mirror relay used while an origin is blocking this client
    pub const MIRROR_HOST: &str = "bg20.2ch.net";

    /// Board listing resource
    pub const SUBJECT_FILE: &str = "subject.txt";

    /// Board settings resource (title lookup)
    pub const SETTING_FILE: &str = "SETTING.TXT";

    /// Client identifier sent with every request
    pub const USER_AGENT: &str = "Monazilla/1.00 (bbs-fetch)";

    /// Mirror path prefix for thread logs
    pub const MIRROR_THREAD_PATH: &str = "/test/r.so/";

    /// Mirror path prefix for board listings
    pub const MIRROR_BOARD_PATH: &str = "/test/p.so/";

    /// Origins the mirror never serves; requests for them fail fast
    pub const ALWAYS_BLOCKED_SUFFIXES: &[&str] = &[".bbspink.com"];
}

/// Wire-level limits
pub mod wire {
    /// Largest payload accepted for a single resource (600 KiB)
    ///
    /// Cached threads at or above this size are reported as corrupted.
    pub const MAX_PAYLOAD: usize = 614_400;

    /// How many leading bytes of a mirror response are scanned for refusals
    pub const REFUSAL_SCAN_LEN: usize = 1024;

    /// Substring of a redirect target that marks an origin-side block
    pub const BLOCK_REDIRECT_MARKER: &str = "403";

    /// Mirror refusal signature ("短パンマン ☆" in Shift_JIS)
    pub const REFUSAL_TANPAN: &[u8] = &[
        0x92, 0x5A, 0x83, 0x70, 0x83, 0x93, 0x83, 0x7d, 0x83, 0x93, 0x20, 0x81, 0x9a,
    ];

    /// Mirror refusal signature ("名古屋はエ～エ～で" in Shift_JIS)
    pub const REFUSAL_NAGOYA: &[u8] = &[
        0x96, 0xBC, 0x8C, 0xC3, 0x89, 0xAE, 0x82, 0xCD, 0x83, 0x47, 0x81, 0x60, 0x83, 0x47, 0x81,
        0x60, 0x82, 0xC5,
    ];
}

/// Timing constants
pub mod timing {
    use super::Duration;

    /// Connect + overall request timeout
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(12);

    /// How long an origin stays penalized after a block signal
    pub const PENALTY_WINDOW: Duration = Duration::from_secs(60);

    /// Server directory rebuild period
    pub const DIRECTORY_REFRESH: Duration = Duration::from_secs(3600);

    /// Board name memo reset period
    pub const BOARD_NAME_RESET: Duration = Duration::from_secs(24 * 3600);

    /// How long a downloaded settings file is trusted (seconds)
    pub const SETTING_LIFETIME_SECS: i64 = 7 * 24 * 3600;
}

/// Memo channel sizing
pub mod memo {
    /// Pending penalty writes before `penalize` waits
    pub const PENALTY_QUEUE: usize = 16;

    /// Pending expiry deletes; overflow is dropped and retried on the next read
    pub const EXPIRY_QUEUE: usize = 16;

    /// Pending board-name writes before `record` waits
    pub const BOARD_NAME_QUEUE: usize = 4;

    /// Initial capacity of the directory and name maps
    pub const MAP_CAPACITY: usize = 1024;
}
