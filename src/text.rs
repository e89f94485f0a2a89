//! Escaping, unescaping and numeric text conversion.
//!
//! Strings and bytes share one escape table on the wire:
//!
//! | Byte | Written as |
//! |------|------------|
//! | newline, carriage return, tab | `\n`, `\r`, `\t` |
//! | `"`, `'`, `\` | `\"`, `\'`, `\\` |
//! | other control bytes | `\u00XX` |
//! | printable ASCII | verbatim |
//!
//! Bytes at or above `0x80` are written verbatim in `string` fields (they are
//! UTF-8) and as `\u00XX` in `bytes` fields. On the way back, `\u` escapes in
//! `string` fields decode to the full code point (UTF-16 surrogate pairs are
//! combined), while in `bytes` fields each `\uXXXX` becomes the single low
//! byte of the code unit.
//!
//! Floats are written as the shortest text that parses back to the same value,
//! switching to exponent form outside `[1e-7, 1e21)`.

use crate::{Error, Result};

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Appends the escaped form of `s` to `out`.
///
/// # Examples
///
/// ```rust
/// use protojs::text::escape_str;
///
/// let mut out = Vec::new();
/// escape_str(&mut out, "it's\n\"ok\"");
/// assert_eq!(out, br#"it\'s\n\"ok\""#);
/// ```
pub fn escape_str(out: &mut Vec<u8>, s: &str) {
    escape_into(out, s.as_bytes(), true);
}

/// Appends the escaped form of `bytes` to `out`; every non-printable byte becomes `\u00XX`.
pub fn escape_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    escape_into(out, bytes, false);
}

fn escape_into(out: &mut Vec<u8>, bytes: &[u8], utf8: bool) {
    out.reserve(bytes.len());
    for &b in bytes {
        match b {
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            b'"' => out.extend_from_slice(b"\\\""),
            b'\'' => out.extend_from_slice(b"\\'"),
            b'\\' => out.extend_from_slice(b"\\\\"),
            0x20..=0x7e => out.push(b),
            0x80..=0xff if utf8 => out.push(b),
            _ => out.extend_from_slice(&[
                b'\\',
                b'u',
                b'0',
                b'0',
                HEX[usize::from(b >> 4)],
                HEX[usize::from(b & 0x0f)],
            ]),
        }
    }
}

/// Decodes the raw text of a `string` field.
///
/// # Examples
///
/// ```rust
/// use protojs::text::unescape_str;
///
/// assert_eq!(unescape_str(br"tab\there").unwrap(), "tab\there");
/// assert_eq!(unescape_str(br"\ud83d\ude00").unwrap(), "\u{1F600}");
/// assert!(unescape_str(br"\ud83d").is_err());
/// ```
///
/// # Errors
///
/// Fails on an unknown escape, a malformed or unpaired `\u` escape, or
/// content that is not valid UTF-8.
pub fn unescape_str(raw: &[u8]) -> Result<String> {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let b = raw[i];
        if b != b'\\' {
            out.push(b);
            i += 1;
            continue;
        }
        let escape = escape_at(raw, i)?;
        i += 2;
        if escape != b'u' {
            out.push(simple_escape(escape)?);
            continue;
        }
        let unit = hex4(raw, i)?;
        i += 4;
        let code = match unit {
            0xd800..=0xdbff => {
                if raw.get(i) != Some(&b'\\') || raw.get(i + 1) != Some(&b'u') {
                    return Err(Error::invalid_string(format!(
                        "unpaired surrogate \\u{unit:04x}"
                    )));
                }
                let low = hex4(raw, i + 2)?;
                if !(0xdc00..=0xdfff).contains(&low) {
                    return Err(Error::invalid_string(format!(
                        "invalid low surrogate \\u{low:04x}"
                    )));
                }
                i += 6;
                0x10000 + ((unit - 0xd800) << 10) + (low - 0xdc00)
            }
            _ => unit,
        };
        let ch = char::from_u32(code)
            .ok_or_else(|| Error::invalid_string(format!("invalid code point \\u{code:04x}")))?;
        let mut buf = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
    }
    String::from_utf8(out).map_err(|e| Error::invalid_string(e.to_string()))
}

/// Decodes the raw text of a `bytes` field.
///
/// Each `\uXXXX` escape yields one byte, the low byte of the code unit.
///
/// # Examples
///
/// ```rust
/// use protojs::text::unescape_bytes;
///
/// assert_eq!(unescape_bytes(br"\u00ff\u0001").unwrap(), vec![0xff, 0x01]);
/// assert_eq!(unescape_bytes(br"\u2041").unwrap(), vec![0x41]);
/// ```
///
/// # Errors
///
/// Fails on an unknown escape or a malformed `\u` escape.
pub fn unescape_bytes(raw: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let b = raw[i];
        if b != b'\\' {
            out.push(b);
            i += 1;
            continue;
        }
        let escape = escape_at(raw, i)?;
        i += 2;
        if escape == b'u' {
            // Truncation to the low byte is the established behaviour for bytes.
            out.push((hex4(raw, i)? & 0xff) as u8);
            i += 4;
        } else {
            out.push(simple_escape(escape)?);
        }
    }
    Ok(out)
}

fn escape_at(raw: &[u8], backslash: usize) -> Result<u8> {
    raw.get(backslash + 1)
        .copied()
        .ok_or_else(|| Error::invalid_string("dangling backslash"))
}

fn simple_escape(escape: u8) -> Result<u8> {
    match escape {
        b'n' => Ok(b'\n'),
        b'r' => Ok(b'\r'),
        b't' => Ok(b'\t'),
        b'b' => Ok(0x08),
        b'f' => Ok(0x0c),
        b'"' | b'\'' | b'\\' | b'/' => Ok(escape),
        other => Err(Error::invalid_string(format!(
            "unknown escape \\{}",
            char::from(other)
        ))),
    }
}

fn hex4(raw: &[u8], start: usize) -> Result<u32> {
    let digits = raw
        .get(start..start + 4)
        .ok_or_else(|| Error::invalid_string("truncated \\u escape"))?;
    digits.iter().try_fold(0u32, |acc, &d| {
        let nibble = char::from(d)
            .to_digit(16)
            .ok_or_else(|| Error::invalid_string("non-hex digit in \\u escape"))?;
        Ok(acc << 4 | nibble)
    })
}

/// Formats a double as a JSON number.
///
/// # Examples
///
/// ```rust
/// use protojs::text::format_f64;
///
/// assert_eq!(format_f64(1.5).unwrap(), "1.5");
/// assert_eq!(format_f64(1e300).unwrap(), "1e300");
/// assert!(format_f64(f64::NAN).is_err());
/// ```
///
/// # Errors
///
/// NaN and the infinities have no JSON representation.
pub fn format_f64(v: f64) -> Result<String> {
    if !v.is_finite() {
        return Err(Error::NonFiniteNumber(v.to_string()));
    }
    let abs = v.abs();
    if abs == 0.0 || (1e-7..1e21).contains(&abs) {
        Ok(v.to_string())
    } else {
        Ok(format!("{v:e}"))
    }
}

/// Formats a float as a JSON number, shortest text for `f32` precision.
///
/// # Errors
///
/// NaN and the infinities have no JSON representation.
pub fn format_f32(v: f32) -> Result<String> {
    if !v.is_finite() {
        return Err(Error::NonFiniteNumber(v.to_string()));
    }
    let abs = v.abs();
    if abs == 0.0 || (1e-7..1e21).contains(&abs) {
        Ok(v.to_string())
    } else {
        Ok(format!("{v:e}"))
    }
}

/// Reads a boolean transmitted as a number: exactly `1` or `0`.
pub(crate) fn parse_numeric_bool(text: &str) -> Option<bool> {
    match text {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}
