//! Demo routes and the shareable search URL.
//!
//! Two routes exist under `/queries/demo`:
//! - `/queries/demo/search/<segment>` where `<segment>` is a URL-escaped JSON
//!   array of partial query descriptors
//! - `/queries/demo/<n>` which opens the `n`-th canned sample search
//!
//! Colors inside the JSON are additionally escaped with the legacy `escape`
//! rules on write and unescaped on read.

use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::models::QueryDescriptor;

/// Prefix shared by every demo route.
pub const DEMO_PREFIX: &str = "/queries/demo/";

/// Prefix of the shareable search route.
pub const DEMO_SEARCH_PREFIX: &str = "/queries/demo/search/";

/// A parsed demo route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoRoute {
    /// Ad-hoc search; `json` is the percent-decoded query array.
    Search { json: String },
    /// Canned sample search at the given catalog position.
    Sample { index: usize },
}

impl DemoRoute {
    /// Whether the queries shown for this route may be edited.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Search { .. })
    }
}

/// Classify a location path. A leading `#` (hash routing) is ignored.
pub fn parse_demo_route(path: &str) -> Result<DemoRoute> {
    let path = path.trim().trim_start_matches('#');

    if let Some(segment) = path.strip_prefix(DEMO_SEARCH_PREFIX) {
        return Ok(DemoRoute::Search {
            json: percent_decode_component(segment),
        });
    }

    let Some(rest) = path.strip_prefix(DEMO_PREFIX) else {
        return Err(Error::InvalidRoute(path.to_string()));
    };
    let raw_index = rest.trim_end_matches('/');
    if raw_index.is_empty() || raw_index.contains('/') {
        return Err(Error::InvalidRoute(path.to_string()));
    }
    raw_index
        .parse::<usize>()
        .map(|index| DemoRoute::Sample { index })
        .map_err(|_| Error::SampleNotFound(raw_index.to_string()))
}

/// Build the shareable search path for a query list.
///
/// Deleted descriptors and descriptors without search text are dropped; the
/// rest are renumbered from zero in list order.
#[must_use]
pub fn encode_search_path<'a, I>(queries: I) -> String
where
    I: IntoIterator<Item = &'a QueryDescriptor>,
{
    let entries: Vec<Value> = queries
        .into_iter()
        .filter(|q| q.is_shareable())
        .enumerate()
        .map(|(idx, q)| {
            json!({
                "index": idx,
                "q": q.q,
                "color": escape_legacy(&q.color),
            })
        })
        .collect();
    let segment = Value::Array(entries).to_string();
    format!("{DEMO_SEARCH_PREFIX}{}", percent_encode_component(&segment))
}

/// Percent-decode a URL path component.
///
/// Unlike query-string decoding, `+` is kept literally. Invalid or truncated
/// `%` escapes are preserved verbatim and the decoded bytes are read as UTF-8
/// (lossy).
#[must_use]
pub fn percent_decode_component(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && let Some(value) = bytes.get(i + 1..i + 3).and_then(decode_hex_pair)
        {
            out.push(value);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Percent-encode a URL component using the `encodeURIComponent` safe set.
#[must_use]
pub fn percent_encode_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric()
            || matches!(
                byte,
                b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')'
            )
        {
            out.push(char::from(byte));
        } else {
            push_hex_escape(&mut out, byte);
        }
    }
    out
}

/// Legacy `escape`: keeps alphanumerics and `@*_+-./`, writes other Latin-1
/// characters as `%XX` and everything else as `%uXXXX` UTF-16 units.
#[must_use]
pub fn escape_legacy(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut units = [0u16; 2];
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '@' | '*' | '_' | '+' | '-' | '.' | '/') {
            out.push(ch);
            continue;
        }
        for unit in ch.encode_utf16(&mut units) {
            if let Ok(byte) = u8::try_from(*unit) {
                push_hex_escape(&mut out, byte);
            } else {
                out.push_str(&format!("%u{unit:04X}"));
            }
        }
    }
    out
}

/// Inverse of [`escape_legacy`]: decodes `%uXXXX` and `%XX` (as Latin-1 code
/// points). Invalid escapes are kept verbatim.
#[must_use]
pub fn unescape_legacy(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if bytes.get(i + 1) == Some(&b'u')
                && let Some(unit) = bytes.get(i + 2..i + 6).and_then(decode_hex_quad)
            {
                units.push(unit);
                i += 6;
                continue;
            }
            if let Some(value) = bytes.get(i + 1..i + 3).and_then(decode_hex_pair) {
                units.push(u16::from(value));
                i += 3;
                continue;
            }
        }
        // Copy one full char so multi-byte input survives untouched.
        let ch = input[i..].chars().next().unwrap_or('\u{FFFD}');
        let mut buf = [0u16; 2];
        units.extend_from_slice(ch.encode_utf16(&mut buf));
        i += ch.len_utf8();
    }
    String::from_utf16_lossy(&units)
}

fn push_hex_escape(out: &mut String, byte: u8) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    out.push('%');
    out.push(char::from(HEX[usize::from(byte >> 4)]));
    out.push(char::from(HEX[usize::from(byte & 0x0F)]));
}

fn decode_hex_pair(pair: &[u8]) -> Option<u8> {
    let text = std::str::from_utf8(pair).ok()?;
    if text.len() != 2 || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(text, 16).ok()
}

fn decode_hex_quad(quad: &[u8]) -> Option<u16> {
    let text = std::str::from_utf8(quad).ok()?;
    if text.len() != 4 || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(text, 16).ok()
}
