//! Text encoding seam
//!
//! Boards speak a legacy 8-bit encoding on the wire. Conversion is left to
//! the embedder; the engine only needs to turn synthesized text into wire
//! bytes and wire bytes into text it can scan.

use std::borrow::Cow;
use std::fmt;

/// Converts between wire bytes and UTF-8 text
pub trait TextCodec: Send + Sync + fmt::Debug {
    /// Wire bytes to text (lossy)
    fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str>;

    /// Text to wire bytes
    fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]>;
}

/// Pass-through codec for UTF-8 deployments and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Codec;

impl TextCodec for Utf8Codec {
    fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        String::from_utf8_lossy(bytes)
    }

    fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        Cow::Borrowed(text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_passthrough() {
        let codec = Utf8Codec;
        assert_eq!(codec.decode("板".as_bytes()), "板");
        assert_eq!(codec.encode("板").as_ref(), "板".as_bytes());
    }

    #[test]
    fn test_invalid_bytes_are_replaced() {
        let text = Utf8Codec.decode(&[0x92, 0x5A, b'a']);
        assert!(text.ends_with('a'));
        assert!(text.contains('\u{FFFD}'));
    }
}
