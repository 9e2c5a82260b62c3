//! Numeric-character-reference escaping.
//!
//! Every code point above `0x7E` becomes `&#x` followed by its lowercase hex
//! value (at least four digits) and a newline. There is no trailing `;`.
//! Everything at or below `0x7E` passes through untouched, so markup syntax
//! survives and the output is pure ASCII.

use std::fmt::Write;

use super::MarkupError;

/// Highest code point emitted verbatim.
pub const MAX_VERBATIM: u32 = 0x7E;

const REFERENCE_PREFIX: &str = "&#x";

/// Decode `raw` as UTF-8 and escape it.
///
/// Invalid UTF-8 fails the whole call; no partial output is produced.
pub fn escape(raw: &[u8]) -> Result<String, MarkupError> {
    let text = std::str::from_utf8(raw).map_err(|e| MarkupError::InvalidUtf8 {
        valid_up_to: e.valid_up_to(),
    })?;
    Ok(escape_str(text))
}

/// Escape an already-decoded string.
pub fn escape_str(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    for c in text.chars() {
        if (c as u32) <= MAX_VERBATIM {
            out.push(c);
        } else {
            // Writing to a String cannot fail.
            let _ = writeln!(out, "{REFERENCE_PREFIX}{:04x}", c as u32);
        }
    }
    out
}

/// Turn `&#xHHHH\n` references back into the code points they encode.
///
/// Sequences that don't form a valid reference are copied through as-is.
pub fn decode_references(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut rest = escaped;
    while let Some(pos) = rest.find(REFERENCE_PREFIX) {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + REFERENCE_PREFIX.len()..];
        let digits = after.bytes().take_while(u8::is_ascii_hexdigit).count();
        let decoded = after
            .get(digits..)
            .filter(|tail| digits >= 4 && tail.starts_with('\n'))
            .and_then(|_| u32::from_str_radix(&after[..digits], 16).ok())
            .and_then(char::from_u32);
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &after[digits + 1..];
            }
            None => {
                out.push_str(REFERENCE_PREFIX);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
