// Copyright (c) 2021 Edward Shen
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use std::fmt::{self, Debug, Display};

use bytes::Bytes;

use crate::{codec, Encoding, Error};

/// An immutable byte sequence convertible to and from UTF-8 and Base64 text.
///
/// A buffer is constructed once — from text under a named encoding, or from
/// raw bytes stored as-is — and read any number of times. All transcoding is
/// delegated to the active codec strategy.
#[derive(Clone, PartialEq, Eq)]
pub struct ByteBuffer {
    bytes: Bytes,
}

impl ByteBuffer {
    /// Builds a buffer from text under a runtime-named encoding.
    ///
    /// Accepted names are `utf8`, `utf-8`, and `base64`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedEncoding`] for any other encoding name,
    /// and a decode error when `input` is not valid Base64 under the
    /// `base64` encoding.
    pub fn from_encoded(input: &str, encoding: &str) -> Result<Self, Error> {
        match encoding.parse::<Encoding>()? {
            Encoding::Utf8 => Ok(Self::from_utf8(input)),
            Encoding::Base64 => Self::from_base64(input),
        }
    }

    /// Encodes a string to its UTF-8 bytes.
    #[must_use]
    pub fn from_utf8(input: &str) -> Self {
        Self {
            bytes: Bytes::from(codec::utf8_encode(input)),
        }
    }

    /// Decodes standard Base64 text, ignoring ASCII whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if `input` contains a byte outside the Base64
    /// alphabet or has an impossible length.
    pub fn from_base64(input: &str) -> Result<Self, Error> {
        codec::base64_decode(input).map(|decoded| Self {
            bytes: Bytes::from(decoded),
        })
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// The wrapped bytes in the host-native container. Cheap; no copy.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decodes the bytes as UTF-8 text, best-effort for invalid sequences.
    #[must_use]
    pub fn to_utf8(&self) -> String {
        codec::utf8_decode(&self.bytes)
    }

    /// Encodes the bytes as standard, padded Base64 text.
    #[must_use]
    pub fn to_base64(&self) -> String {
        codec::base64_encode(&self.bytes)
    }

    /// Renders the buffer under a runtime-named encoding: UTF-8 names decode
    /// the bytes as text, `base64` Base64-encodes them.
    ///
    /// Any other name falls back to a comma-separated decimal rendering of
    /// the bytes. That fallback is kept for compatibility with callers that
    /// passed arbitrary names to the original interface; it is not a real
    /// encoding.
    #[must_use]
    pub fn to_string_encoded(&self, encoding: &str) -> String {
        match encoding.parse::<Encoding>() {
            Ok(Encoding::Utf8) => self.to_utf8(),
            Ok(Encoding::Base64) => self.to_base64(),
            Err(_) => self
                .bytes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<&str> for ByteBuffer {
    fn from(input: &str) -> Self {
        Self::from_utf8(input)
    }
}

impl From<String> for ByteBuffer {
    fn from(input: String) -> Self {
        Self::from_utf8(&input)
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Bytes::from(bytes),
        }
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(bytes),
        }
    }
}

impl From<Bytes> for ByteBuffer {
    fn from(bytes: Bytes) -> Self {
        Self { bytes }
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl Display for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_utf8())
    }
}

impl Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ByteBuffer").field(&self.bytes).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_encoded_dispatches_on_name() {
        assert_eq!(
            ByteBuffer::from_encoded("hi", "utf8").unwrap().as_slice(),
            b"hi"
        );
        assert_eq!(
            ByteBuffer::from_encoded("hi", "utf-8").unwrap().as_slice(),
            b"hi"
        );
        assert_eq!(
            ByteBuffer::from_encoded("aGk=", "base64")
                .unwrap()
                .as_slice(),
            b"hi"
        );
    }

    #[test]
    fn from_encoded_rejects_unknown_names() {
        assert_eq!(
            ByteBuffer::from_encoded("x", "latin1"),
            Err(Error::UnsupportedEncoding("latin1".to_owned()))
        );
    }

    #[test]
    fn raw_bytes_are_stored_untranscoded() {
        let raw = vec![0xFF, 0x00, 0x80];
        assert_eq!(ByteBuffer::from(raw.clone()).to_vec(), raw);
        assert_eq!(ByteBuffer::from(Bytes::from(raw.clone())).to_vec(), raw);
        assert_eq!(ByteBuffer::from(&raw[..]).to_vec(), raw);
    }

    #[test]
    fn utf8_round_trips_through_buffer() {
        for sample in ["hello world", "", "🎉", "日本語"] {
            assert_eq!(ByteBuffer::from_utf8(sample).to_utf8(), sample);
        }
    }

    #[test]
    fn base64_round_trips_through_buffer() {
        let buffer = ByteBuffer::from(vec![0xDE, 0xAD, 0xBE, 0xEF]);
        let encoded = buffer.to_base64();
        assert_eq!(ByteBuffer::from_base64(&encoded).unwrap(), buffer);
    }

    #[test]
    fn to_string_encoded_falls_back_to_numeric_rendering() {
        let buffer = ByteBuffer::from(vec![104, 105]);
        assert_eq!(buffer.to_string_encoded("utf8"), "hi");
        assert_eq!(buffer.to_string_encoded("base64"), "aGk=");
        assert_eq!(buffer.to_string_encoded("hex"), "104,105");
    }

    #[test]
    fn display_renders_utf8() {
        assert_eq!(ByteBuffer::from("hi").to_string(), "hi");
    }
}
