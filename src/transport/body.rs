//! Capped body accumulation with optional gzip decoding

use std::io::{self, Write};

use bytes::Bytes;
use flate2::write::GzDecoder;

/// Compressed bytes handed to the decoder between cap checks
const GZIP_FEED: usize = 512;

enum Sink {
    Plain(Vec<u8>),
    Gzip(GzDecoder<Vec<u8>>),
}

/// Collects response chunks, decoding gzip as they arrive
///
/// The decoded length is capped; anything past the cap is dropped, so a
/// truncated resource looks like a shorter one rather than an error.
pub struct BodyReader {
    sink: Sink,
    cap: usize,
}

impl BodyReader {
    #[must_use]
    pub fn new(gzip: bool, cap: usize) -> Self {
        let sink = if gzip {
            Sink::Gzip(GzDecoder::new(Vec::new()))
        } else {
            Sink::Plain(Vec::new())
        };
        Self { sink, cap }
    }

    fn decoded_len(&self) -> usize {
        match &self.sink {
            Sink::Plain(buf) => buf.len(),
            Sink::Gzip(decoder) => decoder.get_ref().len(),
        }
    }

    /// Check if the cap has been reached
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.decoded_len() >= self.cap
    }

    /// Feed one chunk; returns `true` once the cap is reached
    pub fn push(&mut self, chunk: &[u8]) -> io::Result<bool> {
        if self.is_full() {
            return Ok(true);
        }
        match &mut self.sink {
            Sink::Plain(buf) => {
                let room = self.cap - buf.len();
                buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
            }
            Sink::Gzip(decoder) => {
                // Small slices bound how far one chunk can inflate past the cap
                for slice in chunk.chunks(GZIP_FEED) {
                    decoder.write_all(slice)?;
                    if decoder.get_ref().len() >= self.cap {
                        break;
                    }
                }
            }
        }
        Ok(self.is_full())
    }

    /// Finish decoding and return at most `cap` bytes
    pub fn finish(self) -> io::Result<Bytes> {
        let full = self.is_full();
        let mut data = match self.sink {
            Sink::Plain(buf) => buf,
            // A stream cut at the cap has no trailer; keep what was decoded
            Sink::Gzip(decoder) if full => decoder.get_ref().clone(),
            Sink::Gzip(decoder) => decoder.finish()?,
        };
        data.truncate(self.cap);
        Ok(Bytes::from(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_plain_body() {
        let mut reader = BodyReader::new(false, 100);
        assert!(!reader.push(b"abc").unwrap());
        assert!(!reader.push(b"def").unwrap());
        assert_eq!(&reader.finish().unwrap()[..], b"abcdef");
    }

    #[test]
    fn test_plain_body_is_capped() {
        let mut reader = BodyReader::new(false, 4);
        assert!(reader.push(b"abcdef").unwrap());
        assert!(reader.push(b"more").unwrap());
        assert_eq!(&reader.finish().unwrap()[..], b"abcd");
    }

    #[test]
    fn test_gzip_body_in_chunks() {
        let payload = b"1<>2<>3\n".repeat(50);
        let compressed = gzip(&payload);
        let mut reader = BodyReader::new(true, 10_000);
        for chunk in compressed.chunks(7) {
            reader.push(chunk).unwrap();
        }
        assert_eq!(&reader.finish().unwrap()[..], &payload[..]);
    }

    #[test]
    fn test_gzip_body_is_capped_after_decoding() {
        let payload = vec![b'x'; 5000];
        let compressed = gzip(&payload);
        assert!(compressed.len() < 100);

        let mut reader = BodyReader::new(true, 1000);
        reader.push(&compressed).unwrap();
        let body = reader.finish().unwrap();
        assert_eq!(body.len(), 1000);
    }

    #[test]
    fn test_single_large_gzip_chunk_stops_near_cap() {
        let payload = vec![b'x'; 4 << 20];
        let compressed = gzip(&payload);
        let mut reader = BodyReader::new(true, 1000);
        assert!(reader.push(&compressed).unwrap());
        // One compressed slice inflates to well under a megabyte
        assert!(reader.decoded_len() < 1 << 20);
        assert_eq!(reader.finish().unwrap().len(), 1000);
    }

    #[test]
    fn test_corrupt_gzip() {
        let mut reader = BodyReader::new(true, 1000);
        let result = reader.push(b"definitely not gzip");
        assert!(result.is_err() || reader.finish().is_err());
    }
}
