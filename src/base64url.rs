//! URL-safe Base64 (RFC 4648 §5) transcoding layered on [`ByteBuffer`].
//!
//! The URL-safe form substitutes `+` → `-` and `/` → `_` and drops padding.
//! Everything here is a pure string transform plus a hop through the buffer
//! for the actual codec work.

use crate::{ByteBuffer, Error};

/// Encodes text or bytes as unpadded URL-safe Base64.
///
/// Strings are UTF-8 encoded first; byte-likes are encoded as-is.
pub fn encode(input: impl Into<ByteBuffer>) -> String {
    from_base64(&input.into().to_base64())
}

/// Decodes URL-safe Base64 back into the UTF-8 text it encodes.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64 after padding and
/// alphabet restoration.
pub fn decode(input: &str) -> Result<String, Error> {
    to_buffer(input).map(|buffer| buffer.to_utf8())
}

/// [`decode`], but rendering the decoded bytes under a runtime-named
/// encoding via [`ByteBuffer::to_string_encoded`].
///
/// # Errors
///
/// Returns an error if the input is not valid Base64 after padding and
/// alphabet restoration.
pub fn decode_with(input: &str, encoding: &str) -> Result<String, Error> {
    to_buffer(input).map(|buffer| buffer.to_string_encoded(encoding))
}

/// Rewrites standard Base64 as unpadded URL-safe Base64.
#[must_use]
pub fn from_base64(base64: &str) -> String {
    base64
        .chars()
        .filter(|&c| c != '=')
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c => c,
        })
        .collect()
}

/// Rewrites URL-safe Base64 as standard, padded Base64.
///
/// Byte-like inputs are read as UTF-8 text of the URL-safe form first.
pub fn to_base64(input: impl Into<ByteBuffer>) -> String {
    pad(&input.into().to_utf8())
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect()
}

/// Pads Base64 text with `=` to the next multiple of four characters.
///
/// An already-aligned input gains nothing.
#[must_use]
pub fn pad(input: &str) -> String {
    let remainder = input.len() % 4;
    if remainder == 0 {
        return input.to_owned();
    }

    let mut padded = String::with_capacity(input.len() + 4 - remainder);
    padded.push_str(input);
    for _ in remainder..4 {
        padded.push('=');
    }
    padded
}

/// Decodes URL-safe Base64 into a [`ByteBuffer`].
///
/// # Errors
///
/// Returns an error if the input is not valid Base64 after padding and
/// alphabet restoration.
pub fn to_buffer(input: &str) -> Result<ByteBuffer, Error> {
    ByteBuffer::from_base64(&to_base64(input))
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    #[test]
    fn encode_strips_padding() {
        assert_eq!(encode("hi"), "aGk");
        assert_eq!(encode(""), "");
    }

    #[test]
    fn encode_accepts_byte_likes() {
        assert_eq!(encode(Bytes::from_static(b"hi")), "aGk");
        assert_eq!(encode(vec![0xFB, 0xEF]), encode(&[0xFB, 0xEF][..]));
    }

    #[test]
    fn encode_uses_url_safe_alphabet() {
        // 0xFB 0xEF forces both substituted characters in standard Base64.
        let encoded = encode(vec![0xFB, 0xEF]);
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
        assert!(!encoded.contains('='));
        assert_eq!(to_buffer(&encoded).unwrap().to_vec(), vec![0xFB, 0xEF]);
    }

    #[test]
    fn decode_round_trips_encode() {
        for sample in ["hello world", "", "🎉", "日本語"] {
            assert_eq!(decode(&encode(sample)).unwrap(), sample);
        }
    }

    #[test]
    fn decode_with_reencodes_under_named_encoding() {
        assert_eq!(decode_with("aGk", "base64").unwrap(), "aGk=");
        assert_eq!(decode_with("aGk", "utf8").unwrap(), "hi");
    }

    #[test]
    fn from_base64_rewrites_alphabet_and_padding() {
        assert_eq!(from_base64("a+b/c=="), "a-b_c");
        assert_eq!(from_base64(""), "");
    }

    #[test]
    fn to_base64_restores_standard_form() {
        assert_eq!(to_base64("a-b_c"), "a+b/c===");
        assert_eq!(to_base64("aGk"), "aGk=");
        assert_eq!(to_base64("aGk="), "aGk=");
    }

    #[test]
    fn from_base64_inverts_to_base64_for_url_safe_inputs() {
        for url_safe in ["aGk", "", "aGVsbG8gd29ybGQ", encode(vec![0xFB, 0xEF]).as_str()] {
            assert_eq!(from_base64(&to_base64(url_safe)), url_safe);
        }
    }

    #[test]
    fn pad_aligns_to_four_and_never_overshoots() {
        for input in ["", "a", "ab", "abc", "abcd", "abcde"] {
            assert_eq!(pad(input).len() % 4, 0);
        }
        assert_eq!(pad("abcd"), "abcd");
        assert_eq!(pad("aGk"), "aGk=");
        assert_eq!(pad("YQ"), "YQ==");
    }

    #[test]
    fn to_buffer_decodes_unpadded_input() {
        assert_eq!(to_buffer("aGk").unwrap().to_utf8(), "hi");
    }

    #[test]
    fn decode_rejects_malformed_input() {
        assert!(decode("a!cd").is_err());
    }
}
