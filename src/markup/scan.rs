//! Forward-only scanning helpers shared by the escaper and link rewriter.

use memchr::memmem;

/// Byte offset of the next `needle` at or after `from`.
pub fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let tail = haystack.as_bytes().get(from..)?;
    memmem::find(tail, needle.as_bytes()).map(|pos| from + pos)
}

/// Byte offset of the next anchor-opening marker at or after `from`.
///
/// `<a` only counts when followed by whitespace, `>` or `/`, so `<abbr>` and
/// `<aside>` are skipped.
pub fn find_anchor_open(haystack: &str, from: usize) -> Option<usize> {
    let bytes = haystack.as_bytes();
    let mut cursor = from;
    while let Some(pos) = find_from(haystack, "<a", cursor) {
        match bytes.get(pos + 2) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => return Some(pos),
            _ => cursor = pos + 2,
        }
    }
    None
}

/// Extracts the field following the first `marker` in `tag`.
///
/// A leading `"` is skipped. The field ends at the first byte in
/// `terminators`, at a closing `"` when the value was quoted, or at the end
/// of `tag`. Returns `None` when the marker is absent.
pub fn field_after<'a>(tag: &'a str, marker: &str, terminators: &[u8]) -> Option<&'a str> {
    let start = find_from(tag, marker, 0)? + marker.len();
    let rest = &tag[start..];
    let (rest, quoted) = match rest.strip_prefix('"') {
        Some(inner) => (inner, true),
        None => (rest, false),
    };
    let end = rest
        .bytes()
        .position(|b| terminators.contains(&b) || (quoted && b == b'"'))
        .unwrap_or(rest.len());
    Some(&rest[..end])
}
