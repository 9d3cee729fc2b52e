//! Base64 encoding and decoding utilities
//!
//! This module provides a self-contained codec for the standard alphabet
//! (`A-Z`, `a-z`, `0-9`, `+`, `/`) with `=` padding. Decoding is lenient about
//! line breaks and missing padding, strict about everything else.

use crate::error::Error;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const INVALID: u8 = 0xff;

/// Reverse lookup table from ASCII character to 6-bit value
const DECODE_TABLE: [u8; 256] = {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Encode data as base64
///
/// Every 3 input bytes become 4 characters. A trailing group of 1 byte
/// becomes 2 characters plus `==`, a trailing group of 2 bytes becomes
/// 3 characters plus `=`.
pub fn encode_base64(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);
    let mut chunks = data.chunks_exact(3);

    for chunk in &mut chunks {
        let n = (chunk[0] as u32) << 16 | (chunk[1] as u32) << 8 | chunk[2] as u32;
        out.push(sextet(n >> 18));
        out.push(sextet(n >> 12));
        out.push(sextet(n >> 6));
        out.push(sextet(n));
    }

    match *chunks.remainder() {
        [a] => {
            let n = (a as u32) << 16;
            out.push(sextet(n >> 18));
            out.push(sextet(n >> 12));
            out.push_str("==");
        }
        [a, b] => {
            let n = (a as u32) << 16 | (b as u32) << 8;
            out.push(sextet(n >> 18));
            out.push(sextet(n >> 12));
            out.push(sextet(n >> 6));
            out.push('=');
        }
        _ => {}
    }

    out
}

/// Decode base64 data
///
/// Newlines anywhere in the input and `=` padding at the end are ignored.
/// Any other character outside the alphabet yields [`Error::InvalidCharacter`]
/// carrying that character and its character index in the input with line
/// breaks removed.
pub fn decode_base64(data: &str) -> Result<Vec<u8>, Error> {
    let cleaned: Vec<char> = data.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();
    let end = cleaned
        .iter()
        .rposition(|c| *c != '=')
        .map_or(0, |i| i + 1);
    let input = &cleaned[..end];

    let mut out = Vec::with_capacity(input.len() / 4 * 3 + 2);
    let mut chunks = input.chunks_exact(4);
    let mut position = 0;

    for chunk in &mut chunks {
        let n = chunk
            .iter()
            .enumerate()
            .try_fold(0u32, |acc, (i, c)| Ok::<_, Error>(acc << 6 | lookup(*c, position + i)?))?;
        out.push((n >> 16) as u8);
        out.push((n >> 8) as u8);
        out.push(n as u8);
        position += 4;
    }

    let rest = chunks.remainder();
    let mut n = 0u32;
    for (i, c) in rest.iter().enumerate() {
        n = n << 6 | lookup(*c, position + i)?;
    }
    match rest.len() {
        2 => out.push((n >> 4) as u8),
        3 => {
            out.push((n >> 10) as u8);
            out.push((n >> 2) as u8);
        }
        // A lone trailing character carries fewer than 8 bits and is dropped.
        _ => {}
    }

    Ok(out)
}

fn sextet(n: u32) -> char {
    ALPHABET[(n & 0x3f) as usize] as char
}

fn lookup(character: char, position: usize) -> Result<u32, Error> {
    let value = if character.is_ascii() {
        DECODE_TABLE[character as usize]
    } else {
        INVALID
    };
    match value {
        INVALID => Err(Error::InvalidCharacter { character, position }),
        value => Ok(value as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    #[test]
    fn test_encode_decode() {
        let original = b"Hello, World!";
        let encoded = encode_base64(original);
        let decoded = decode_base64(&encoded).unwrap();
        assert_eq!(original, decoded.as_slice());
    }

    #[test]
    fn test_known_vectors() {
        assert_eq!(encode_base64(b""), "");
        assert_eq!(encode_base64(b"f"), "Zg==");
        assert_eq!(encode_base64(b"fo"), "Zm8=");
        assert_eq!(encode_base64(b"foo"), "Zm9v");
        assert_eq!(encode_base64(b"foob"), "Zm9vYg==");
        assert_eq!(encode_base64(b"fooba"), "Zm9vYmE=");
        assert_eq!(encode_base64(b"foobar"), "Zm9vYmFy");
        assert_eq!(decode_base64("QUJD").unwrap(), b"ABC");
        assert_eq!(decode_base64("").unwrap(), b"");
    }

    #[test]
    fn test_matches_reference_engine() {
        for len in [0usize, 1, 2, 3, 4, 5, 57, 100, 255, 1024] {
            let data: Vec<u8> = (0..len).map(|i| (i * 37 + 11) as u8).collect();
            let encoded = encode_base64(&data);
            assert_eq!(encoded, STANDARD.encode(&data), "length {}", len);
            assert_eq!(decode_base64(&encoded).unwrap(), data, "length {}", len);
        }
    }

    #[test]
    fn test_decode_without_padding() {
        assert_eq!(decode_base64("Zg").unwrap(), b"f");
        assert_eq!(decode_base64("Zm8").unwrap(), b"fo");
        assert_eq!(decode_base64("Zm9vYmE").unwrap(), b"fooba");
    }

    #[test]
    fn test_decode_with_newlines() {
        let wrapped = "Zm9v\nYmFy\nYg=\n=";
        assert_eq!(decode_base64(wrapped).unwrap(), b"foobarb");
        assert_eq!(decode_base64("Zm9v\r\nYmFy").unwrap(), b"foobar");
    }

    #[test]
    fn test_decode_invalid_character() {
        let err = decode_base64("Zm9v*mFy").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidCharacter {
                character: '*',
                position: 4
            }
        );
        assert!(matches!(
            decode_base64("Zm=v"),
            Err(Error::InvalidCharacter { character: '=', .. })
        ));
        assert!(matches!(
            decode_base64("Zm9 v"),
            Err(Error::InvalidCharacter { character: ' ', .. })
        ));
    }

    #[test]
    fn test_decode_reports_non_ascii_character() {
        assert_eq!(
            decode_base64("QUJ\u{e9}").unwrap_err(),
            Error::InvalidCharacter {
                character: '\u{e9}',
                position: 3
            }
        );
        // Positions count characters, not UTF-8 bytes, and skip line breaks.
        assert_eq!(
            decode_base64("QUJD\n\u{3066}\u{3059}").unwrap_err(),
            Error::InvalidCharacter {
                character: '\u{3066}',
                position: 4
            }
        );
        let message = decode_base64("Zm9v\u{1f600}").unwrap_err().to_string();
        assert!(message.ends_with("at position 4"), "{}", message);
        assert!(!message.contains(char::REPLACEMENT_CHARACTER), "{}", message);
    }
}
