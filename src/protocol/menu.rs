//! Board menu normalization and lookups
//!
//! The upstream menu is an HTML page. It is reduced to a line-oriented text
//! form before caching:
//!
//! ```text
//! ニュース
//! hayabusa.2ch.net/news<>ニュース速報
//! ```
//!
//! Category lines carry just the name; board lines are `server/board<>title`.

use std::collections::{BTreeMap, HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::memo::MAP_CAPACITY;

static CATEGORY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<B>([^<]+)</B>").expect("valid category pattern"));

static BOARD_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<A HREF=http://([^/]+)/([^/]+)/>([^<]+)</A>").expect("valid board link pattern")
});

/// Board host markers; links to anything else are not boards
const BOARD_HOST_MARKERS: &[&str] = &[".2ch.net/", ".bbspink.com/"];

const KILLED_CATEGORIES: &[&str] = &[
    "特別企画",
    "チャット",
    "他のサイト",
    "まちＢＢＳ",
    "ツール類",
    "チャット２ｃｈ＠ＩＲＣ",
    "Top10",
    "2chのゴミ箱",
    "BBSPINKのゴミ箱",
];

const KILLED_SERVERS: &[&str] = &[
    "www.2ch.net",
    "info.2ch.net",
    "find.2ch.net",
    "v.isp.2ch.net",
    "m.2ch.net",
    "test.up.bbspink.com",
    "stats.2ch.net",
    "c-au.2ch.net",
    "c-others1.2ch.net",
    "movie.2ch.net",
    "img.2ch.net",
    "ipv6.2ch.net",
    "be.2ch.net",
    "p2.2ch.net",
    "shop.2ch.net",
    "watch.2ch.net",
];

/// A board missing from the public menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenBoard {
    pub server: String,
    pub name: String,
}

/// Default hidden boards
#[must_use]
pub fn default_hidden_boards() -> BTreeMap<String, HiddenBoard> {
    BTreeMap::from([(
        "sakhalin".to_string(),
        HiddenBoard {
            server: "toro.2ch.net".to_string(),
            name: "2ch開発室＠2ch掲示板".to_string(),
        },
    )])
}

/// Categories and servers dropped while normalizing
#[derive(Debug, Clone)]
pub struct MenuFilter {
    categories: HashSet<String>,
    servers: HashSet<String>,
}

impl Default for MenuFilter {
    fn default() -> Self {
        Self {
            categories: KILLED_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            servers: KILLED_SERVERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl MenuFilter {
    /// Reduce the HTML menu to the cached text form
    #[must_use]
    pub fn normalize(&self, html: &str) -> String {
        let mut out = String::with_capacity(html.len() / 2);
        for line in html.lines() {
            if let Some(caps) = CATEGORY.captures(line) {
                let name = &caps[1];
                if !self.categories.contains(name) {
                    out.push_str(name);
                    out.push('\n');
                }
            } else if BOARD_HOST_MARKERS.iter().any(|m| line.contains(m)) {
                if line.contains("TARGET") {
                    continue;
                }
                if let Some(caps) = BOARD_LINK.captures(line) {
                    let (server, board, title) = (&caps[1], &caps[2], &caps[3]);
                    if self.servers.contains(server) {
                        continue;
                    }
                    out.push_str(&format!("{}/{}<>{}\n", server, board, title));
                }
            }
        }
        out
    }
}

/// One `server/board<>title` line of the normalized menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry<'a> {
    pub server: &'a str,
    pub board: &'a str,
    pub title: &'a str,
}

/// Iterate board lines of a normalized menu, skipping category lines
pub fn entries(menu: &str) -> impl Iterator<Item = MenuEntry<'_>> {
    menu.lines().filter_map(|line| {
        let (location, title) = line.split_once("<>")?;
        let title = title.split("<>").next().unwrap_or(title);
        if title.is_empty() {
            return None;
        }
        let (server, board) = location.split_once('/')?;
        let board = board.split('/').next().unwrap_or(board);
        Some(MenuEntry {
            server,
            board,
            title,
        })
    })
}

/// Build the board → server map from a normalized menu
///
/// The first listing of a board wins.
#[must_use]
pub fn build_directory(menu: &str) -> HashMap<String, String> {
    let mut map = HashMap::with_capacity(MAP_CAPACITY);
    for entry in entries(menu) {
        map.entry(entry.board.to_string())
            .or_insert_with(|| entry.server.to_string());
    }
    map
}

/// Add hidden boards the map does not already list
pub fn merge_hidden(map: &mut HashMap<String, String>, hidden: &BTreeMap<String, HiddenBoard>) {
    for (board, info) in hidden {
        map.entry(board.clone())
            .or_insert_with(|| info.server.clone());
    }
}

/// Look up a board title in the menu, then among hidden boards
#[must_use]
pub fn find_title(
    menu: &str,
    board: &str,
    hidden: &BTreeMap<String, HiddenBoard>,
) -> Option<String> {
    entries(menu)
        .find(|entry| entry.board == board)
        .map(|entry| entry.title.to_string())
        .or_else(|| hidden.get(board).map(|info| info.name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = "\
<HTML><BODY>
<BR><BR><B>ニュース</B><BR>
<A HREF=http://hayabusa.2ch.net/news/>ニュース速報</A><br>
<A HREF=http://anago.2ch.net/bizplus/>ビジネスnews+</A><br>
<A HREF=http://www.2ch.net/guide/>ガイド</A><br>
<A HREF=http://pele.bbspink.com/club/ TARGET=_blank>クラブ</A><br>
<BR><BR><B>チャット</B><BR>
<A HREF=http://example.com/other/>外部</A><br>
<B>PINK</B>
<A HREF=http://pele.bbspink.com/eroparo/>エロパロ</A>
</BODY></HTML>
";

    #[test]
    fn test_normalize() {
        let menu = MenuFilter::default().normalize(HTML);
        assert_eq!(
            menu,
            "ニュース\n\
             hayabusa.2ch.net/news<>ニュース速報\n\
             anago.2ch.net/bizplus<>ビジネスnews+\n\
             PINK\n\
             pele.bbspink.com/eroparo<>エロパロ\n"
        );
    }

    #[test]
    fn test_entries_skip_categories() {
        let menu = "ニュース\nhayabusa.2ch.net/news<>ニュース速報\n";
        let entries: Vec<_> = entries(menu).collect();
        assert_eq!(
            entries,
            vec![MenuEntry {
                server: "hayabusa.2ch.net",
                board: "news",
                title: "ニュース速報",
            }]
        );
    }

    #[test]
    fn test_directory_first_wins_and_hidden_merge() {
        let menu = "a.2ch.net/news<>one\nb.2ch.net/news<>two\nc.2ch.net/sakhalin<>listed\n";
        let mut hidden = default_hidden_boards();
        hidden.insert(
            "secret".into(),
            HiddenBoard {
                server: "d.2ch.net".into(),
                name: "秘密".into(),
            },
        );
        let mut map = build_directory(menu);
        assert_eq!(map.get("secret"), None);
        merge_hidden(&mut map, &hidden);
        assert_eq!(map.get("news").map(String::as_str), Some("a.2ch.net"));
        assert_eq!(map.get("sakhalin").map(String::as_str), Some("c.2ch.net"));
        assert_eq!(map.get("secret").map(String::as_str), Some("d.2ch.net"));
    }

    #[test]
    fn test_find_title() {
        let menu = "hayabusa.2ch.net/news<>ニュース速報\n";
        let hidden = default_hidden_boards();
        assert_eq!(
            find_title(menu, "news", &hidden).as_deref(),
            Some("ニュース速報")
        );
        assert_eq!(
            find_title(menu, "sakhalin", &hidden).as_deref(),
            Some("2ch開発室＠2ch掲示板")
        );
        assert_eq!(find_title(menu, "nothing", &hidden), None);
    }
}
