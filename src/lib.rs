#![warn(clippy::nursery, clippy::pedantic)]

//! A byte-buffer abstraction that normalizes UTF-8 string ↔ byte conversion
//! and standard Base64 transcoding across hosts that may or may not carry a
//! native codec, plus a URL-safe Base64 layer built on top of it.
//!
//! [`ByteBuffer`] does the codec work; [`base64url`] is string glue over it.
//! With default features the host codecs (`std` and the `base64` crate) are
//! used; building with `--no-default-features` selects a portable
//! bit-manipulation fallback with byte-identical output.

use std::str::FromStr;

use thiserror::Error;

pub use bytes::Bytes;

pub use crate::buffer::ByteBuffer;

pub mod base64url;
mod buffer;
mod codec;
pub mod serde_b64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Unsupported encoding {0}")]
    UnsupportedEncoding(String),
    #[error("Invalid base64 byte {byte:#04x} at offset {offset}")]
    InvalidByte { offset: usize, byte: u8 },
    #[error("Invalid base64 input length {0}")]
    InvalidLength(usize),
}

/// A text encoding a [`ByteBuffer`] can be built from or rendered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Base64,
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "base64" => Ok(Self::Base64),
            other => Err(Error::UnsupportedEncoding(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_parses_all_accepted_names() {
        assert_eq!("utf8".parse(), Ok(Encoding::Utf8));
        assert_eq!("utf-8".parse(), Ok(Encoding::Utf8));
        assert_eq!("base64".parse(), Ok(Encoding::Base64));
        assert_eq!(
            "latin1".parse::<Encoding>(),
            Err(Error::UnsupportedEncoding("latin1".to_owned()))
        );
    }

    #[test]
    fn encoding_names_are_case_sensitive() {
        assert!("UTF8".parse::<Encoding>().is_err());
    }
}
