//! Board settings file (`SETTING.TXT`)

const TITLE_KEY: &str = "BBS_TITLE=";

/// Extract the board title from a settings file
///
/// Takes the `BBS_TITLE=` value up to the newline, cuts it at the first
/// full-width `＠` and trims spaces and tabs. An unterminated last line
/// yields nothing. Returns an empty string when no title is present.
#[must_use]
pub fn extract_title(text: &str) -> String {
    let Some(start) = text.find(TITLE_KEY) else {
        return String::new();
    };
    let rest = &text[start + TITLE_KEY.len()..];
    let Some(end) = rest.find('\n') else {
        return String::new();
    };
    let value = &rest[..end];
    let value = value.split('＠').next().unwrap_or(value);
    value.trim_matches([' ', '\t']).to_string()
}
