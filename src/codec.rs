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

//! UTF-8 and Base64 codecs behind a strategy seam.
//!
//! Two interchangeable implementations exist: [`NativeCodec`] delegates to the
//! host facilities (`std` and the `base64` crate) and is used whenever the
//! `native` feature is compiled in; [`PortableCodec`] is a dependency-free
//! bit-manipulation fallback that produces byte-identical output for all valid
//! inputs. The strategy is probed once and every caller goes through the
//! module-level functions rather than branching per call.

use lazy_static::lazy_static;

use crate::Error;

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Sentinel for bytes outside the Base64 alphabet.
const INVALID: u8 = 0xFF;

/// Alphabet byte → 6-bit value, built at compile time.
const BASE64_VALUES: [u8; 256] = build_value_table();

const fn build_value_table() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < BASE64_ALPHABET.len() {
        table[BASE64_ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

trait CodecStrategy: Sync {
    fn utf8_encode(&self, input: &str) -> Vec<u8>;
    fn utf8_decode(&self, bytes: &[u8]) -> String;
    fn base64_encode(&self, bytes: &[u8]) -> String;
    fn base64_decode(&self, input: &str) -> Result<Vec<u8>, Error>;
}

lazy_static! {
    static ref ACTIVE: &'static dyn CodecStrategy = probe();
}

#[cfg(feature = "native")]
fn probe() -> &'static dyn CodecStrategy {
    &NativeCodec
}

#[cfg(not(feature = "native"))]
fn probe() -> &'static dyn CodecStrategy {
    &PortableCodec
}

pub(crate) fn utf8_encode(input: &str) -> Vec<u8> {
    ACTIVE.utf8_encode(input)
}

pub(crate) fn utf8_decode(bytes: &[u8]) -> String {
    ACTIVE.utf8_decode(bytes)
}

pub(crate) fn base64_encode(bytes: &[u8]) -> String {
    ACTIVE.base64_encode(bytes)
}

/// Decodes standard Base64, ignoring interspersed ASCII whitespace. Error
/// offsets refer to the whitespace-stripped input.
pub(crate) fn base64_decode(input: &str) -> Result<Vec<u8>, Error> {
    if input.bytes().any(is_base64_whitespace) {
        let cleaned: String = input
            .chars()
            .filter(|&c| !(c.is_ascii() && is_base64_whitespace(c as u8)))
            .collect();
        ACTIVE.base64_decode(&cleaned)
    } else {
        ACTIVE.base64_decode(input)
    }
}

const fn is_base64_whitespace(byte: u8) -> bool {
    matches!(byte, b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

#[cfg(feature = "native")]
struct NativeCodec;

#[cfg(feature = "native")]
impl CodecStrategy for NativeCodec {
    fn utf8_encode(&self, input: &str) -> Vec<u8> {
        input.as_bytes().to_vec()
    }

    fn utf8_decode(&self, bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    fn base64_encode(&self, bytes: &[u8]) -> String {
        base64::encode_config(bytes, base64::STANDARD)
    }

    fn base64_decode(&self, input: &str) -> Result<Vec<u8>, Error> {
        base64::decode_config(input, base64::STANDARD).map_err(|err| match err {
            base64::DecodeError::InvalidByte(offset, byte)
            | base64::DecodeError::InvalidLastSymbol(offset, byte) => {
                Error::InvalidByte { offset, byte }
            }
            base64::DecodeError::InvalidLength => Error::InvalidLength(input.len()),
        })
    }
}

// Always compiled so the native/portable equivalence tests can exercise it.
#[cfg_attr(feature = "native", allow(dead_code))]
struct PortableCodec;

impl CodecStrategy for PortableCodec {
    fn utf8_encode(&self, input: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(input.len());

        for c in input.chars() {
            let cp = c as u32;
            if cp < 0x80 {
                out.push(cp as u8);
            } else if cp < 0x800 {
                out.push(0xC0 | (cp >> 6) as u8);
                out.push(0x80 | (cp & 0x3F) as u8);
            } else if cp < 0x1_0000 {
                out.push(0xE0 | (cp >> 12) as u8);
                out.push(0x80 | ((cp >> 6) & 0x3F) as u8);
                out.push(0x80 | (cp & 0x3F) as u8);
            } else {
                out.push(0xF0 | (cp >> 18) as u8);
                out.push(0x80 | ((cp >> 12) & 0x3F) as u8);
                out.push(0x80 | ((cp >> 6) & 0x3F) as u8);
                out.push(0x80 | (cp & 0x3F) as u8);
            }
        }

        out
    }

    fn utf8_decode(&self, bytes: &[u8]) -> String {
        // Decoded into UTF-16 code units first: code points above U+FFFF are
        // re-split into a surrogate pair. Truncated multi-byte sequences read
        // missing continuation bytes as zero, so decoding is total.
        let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
        let mut pos = 0;

        let take = |pos: &mut usize| -> u8 {
            let byte = bytes.get(*pos).copied().unwrap_or(0);
            *pos += 1;
            byte
        };

        while pos < bytes.len() {
            let c1 = take(&mut pos);
            if c1 < 0x80 {
                units.push(u16::from(c1));
            } else if (0xC0..0xE0).contains(&c1) {
                let c2 = take(&mut pos);
                units.push(u16::from(c1 & 0x1F) << 6 | u16::from(c2 & 0x3F));
            } else if c1 >= 0xF0 {
                let c2 = take(&mut pos);
                let c3 = take(&mut pos);
                let c4 = take(&mut pos);
                let cp = u32::from(c1 & 0x07) << 18
                    | u32::from(c2 & 0x3F) << 12
                    | u32::from(c3 & 0x3F) << 6
                    | u32::from(c4 & 0x3F);
                if cp >= 0x1_0000 {
                    let u = cp - 0x1_0000;
                    units.push(0xD800 + (u >> 10) as u16);
                    units.push(0xDC00 + (u & 0x3FF) as u16);
                } else {
                    // Overlong garbage; keep the decode total.
                    units.push(cp as u16);
                }
            } else {
                let c2 = take(&mut pos);
                let c3 = take(&mut pos);
                units.push(
                    u16::from(c1 & 0x0F) << 12 | u16::from(c2 & 0x3F) << 6 | u16::from(c3 & 0x3F),
                );
            }
        }

        String::from_utf16_lossy(&units)
    }

    fn base64_encode(&self, bytes: &[u8]) -> String {
        let mut out = String::with_capacity((bytes.len() + 2) / 3 * 4);
        let mut chunks = bytes.chunks_exact(3);

        for chunk in &mut chunks {
            let group =
                u32::from(chunk[0]) << 16 | u32::from(chunk[1]) << 8 | u32::from(chunk[2]);
            out.push(char::from(BASE64_ALPHABET[(group >> 18) as usize & 0x3F]));
            out.push(char::from(BASE64_ALPHABET[(group >> 12) as usize & 0x3F]));
            out.push(char::from(BASE64_ALPHABET[(group >> 6) as usize & 0x3F]));
            out.push(char::from(BASE64_ALPHABET[group as usize & 0x3F]));
        }

        match *chunks.remainder() {
            [a] => {
                out.push(char::from(BASE64_ALPHABET[(a >> 2) as usize]));
                out.push(char::from(BASE64_ALPHABET[((a & 0x03) << 4) as usize]));
                out.push_str("==");
            }
            [a, b] => {
                out.push(char::from(BASE64_ALPHABET[(a >> 2) as usize]));
                out.push(char::from(
                    BASE64_ALPHABET[((a & 0x03) << 4 | b >> 4) as usize],
                ));
                out.push(char::from(BASE64_ALPHABET[((b & 0x0F) << 2) as usize]));
                out.push('=');
            }
            _ => {}
        }

        out
    }

    fn base64_decode(&self, input: &str) -> Result<Vec<u8>, Error> {
        let bytes = input.as_bytes();

        // Trailing `=` only pads; it never carries bits.
        let mut data_len = bytes.len();
        while data_len > 0 && bytes[data_len - 1] == b'=' {
            data_len -= 1;
        }

        if data_len % 4 == 1 {
            return Err(Error::InvalidLength(input.len()));
        }

        let out_len = data_len / 4 * 3
            + match data_len % 4 {
                2 => 1,
                3 => 2,
                _ => 0,
            };
        let mut out = Vec::with_capacity(out_len);
        let data = &bytes[..data_len];
        let mut pos = 0;

        while pos + 4 <= data_len {
            let v1 = base64_value(data, pos)?;
            let v2 = base64_value(data, pos + 1)?;
            let v3 = base64_value(data, pos + 2)?;
            let v4 = base64_value(data, pos + 3)?;
            out.push(v1 << 2 | v2 >> 4);
            out.push((v2 & 0x0F) << 4 | v3 >> 2);
            out.push((v3 & 0x03) << 6 | v4);
            pos += 4;
        }

        match data_len - pos {
            2 => {
                let v1 = base64_value(data, pos)?;
                let v2 = base64_value(data, pos + 1)?;
                if v2 & 0x0F != 0 {
                    return Err(Error::InvalidByte {
                        offset: pos + 1,
                        byte: data[pos + 1],
                    });
                }
                out.push(v1 << 2 | v2 >> 4);
            }
            3 => {
                let v1 = base64_value(data, pos)?;
                let v2 = base64_value(data, pos + 1)?;
                let v3 = base64_value(data, pos + 2)?;
                if v3 & 0x03 != 0 {
                    return Err(Error::InvalidByte {
                        offset: pos + 2,
                        byte: data[pos + 2],
                    });
                }
                out.push(v1 << 2 | v2 >> 4);
                out.push((v2 & 0x0F) << 4 | v3 >> 2);
            }
            _ => {}
        }

        Ok(out)
    }
}

fn base64_value(data: &[u8], offset: usize) -> Result<u8, Error> {
    let byte = data[offset];
    let value = BASE64_VALUES[usize::from(byte)];
    if value == INVALID {
        return Err(Error::InvalidByte { offset, byte });
    }
    Ok(value)
}
