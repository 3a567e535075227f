use serde::Deserialize;
use std::string::FromUtf8Error;

/// How bytes from the child's streams become text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decoding {
    /// Malformed sequences are replaced with U+FFFD.
    #[default]
    Lossy,
    /// Malformed sequences are an error.
    Strict,
}

impl Decoding {
    pub fn decode(self, bytes: Vec<u8>) -> Result<String, FromUtf8Error> {
        match self {
            Decoding::Strict => String::from_utf8(bytes),
            Decoding::Lossy => Ok(String::from_utf8(bytes)
                .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())),
        }
    }
}
