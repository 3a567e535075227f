use std::io::{self, BufRead};

use crate::decode::Decoding;
use crate::error::OllamaError;

/// Lazily splits a byte stream into lines with trailing `\n` / `\r\n` removed.
/// A final line without a terminator is still yielded. Each `next` blocks until
/// a full line or end of stream is available.
pub struct RawLines<R> {
    reader: R,
}

impl<R: BufRead> RawLines<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Iterator for RawLines<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                strip_terminator(&mut buf);
                Some(Ok(buf))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

fn strip_terminator(buf: &mut Vec<u8>) {
    while matches!(buf.last(), Some(b'\n' | b'\r')) {
        buf.pop();
    }
}

/// `RawLines` decoded to text with the given policy.
pub struct TextLines<R> {
    raw: RawLines<R>,
    decoding: Decoding,
}

impl<R: BufRead> TextLines<R> {
    pub fn new(reader: R, decoding: Decoding) -> Self {
        Self {
            raw: RawLines::new(reader),
            decoding,
        }
    }
}

impl<R: BufRead> Iterator for TextLines<R> {
    type Item = Result<String, OllamaError>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = match self.raw.next()? {
            Ok(bytes) => self.decoding.decode(bytes).map_err(OllamaError::from),
            Err(e) => Err(OllamaError::from(e)),
        };
        Some(line)
    }
}
