//! URL construction for origin, mirror and menu resources

use crate::constants::upstream::{
    MIRROR_BOARD_PATH, MIRROR_THREAD_PATH, SETTING_FILE, SUBJECT_FILE,
};

/// Builds request URLs, prefixing every one with the relay when configured
///
/// The relay ("salami" forwarder) is addressed as `http://{host}:{port}/`
/// followed by the real host and path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlBuilder {
    relay: String,
}

impl UrlBuilder {
    /// Direct URLs, no relay
    #[must_use]
    pub fn direct() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_relay(host: &str, port: u16) -> Self {
        Self {
            relay: format!("{}:{}/", host, port),
        }
    }

    /// Relay prefix (`host:port/`, or empty)
    #[must_use]
    pub fn relay(&self) -> &str {
        &self.relay
    }

    fn url(&self, host: &str, path: &str) -> String {
        format!("http://{}{}/{}", self.relay, host, path)
    }

    #[must_use]
    pub fn thread(&self, server: &str, board: &str, thread: &str) -> String {
        self.url(server, &format!("{}/dat/{}.dat", board, thread))
    }

    #[must_use]
    pub fn board(&self, server: &str, board: &str) -> String {
        self.url(server, &format!("{}/{}", board, SUBJECT_FILE))
    }

    #[must_use]
    pub fn setting(&self, server: &str, board: &str) -> String {
        self.url(server, &format!("{}/{}", board, SETTING_FILE))
    }

    #[must_use]
    pub fn menu(&self, host: &str, file: &str) -> String {
        self.url(host, file)
    }

    #[must_use]
    pub fn mirror_thread(&self, mirror: &str, server: &str, board: &str, thread: &str) -> String {
        format!(
            "http://{}{}{}{}/{}/{}/",
            self.relay, mirror, MIRROR_THREAD_PATH, server, board, thread
        )
    }

    #[must_use]
    pub fn mirror_board(&self, mirror: &str, server: &str, board: &str) -> String {
        format!(
            "http://{}{}{}{}/{}/",
            self.relay, mirror, MIRROR_BOARD_PATH, server, board
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_urls() {
        let urls = UrlBuilder::direct();
        assert_eq!(
            urls.thread("hayabusa.2ch.net", "news", "123"),
            "http://hayabusa.2ch.net/news/dat/123.dat"
        );
        assert_eq!(
            urls.board("hayabusa.2ch.net", "news"),
            "http://hayabusa.2ch.net/news/subject.txt"
        );
        assert_eq!(
            urls.setting("hayabusa.2ch.net", "news"),
            "http://hayabusa.2ch.net/news/SETTING.TXT"
        );
        assert_eq!(
            urls.menu("menu.2ch.net", "bbsmenu.html"),
            "http://menu.2ch.net/bbsmenu.html"
        );
    }

    #[test]
    fn test_mirror_urls() {
        let urls = UrlBuilder::direct();
        assert_eq!(
            urls.mirror_thread("bg20.2ch.net", "hayabusa.2ch.net", "news", "123"),
            "http://bg20.2ch.net/test/r.so/hayabusa.2ch.net/news/123/"
        );
        assert_eq!(
            urls.mirror_board("bg20.2ch.net", "hayabusa.2ch.net", "news"),
            "http://bg20.2ch.net/test/p.so/hayabusa.2ch.net/news/"
        );
    }

    #[test]
    fn test_relay_prefix() {
        let urls = UrlBuilder::with_relay("127.0.0.1", 8080);
        assert_eq!(urls.relay(), "127.0.0.1:8080/");
        assert_eq!(
            urls.board("s.2ch.net", "news"),
            "http://127.0.0.1:8080/s.2ch.net/news/subject.txt"
        );
        assert_eq!(
            urls.mirror_board("bg20.2ch.net", "s.2ch.net", "news"),
            "http://127.0.0.1:8080/bg20.2ch.net/test/p.so/s.2ch.net/news/"
        );
    }
}
