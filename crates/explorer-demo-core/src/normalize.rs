//! Query descriptor normalization.
//!
//! Turns the JSON array carried by a shareable URL into fully populated
//! [`QueryDescriptor`]s. Each defaultable field (label, color, index, dates,
//! sources, collections) is defaulted independently, and only when it is
//! absent, `null`, or the literal string `"undefined"` (what a stringified
//! missing value looks like after a URL round trip). The search text and the
//! remaining fields are taken as given.

use std::collections::BTreeSet;

use chrono::{Local, NaiveDate};
use serde_json::{Map, Value};

use crate::config::Config;
use crate::dates::{DateRange, parse_url_date, trailing_window};
use crate::error::{Error, Result};
use crate::models::{Collection, MediaSource, QueryDescriptor, Reference, Referent};
use crate::palette::default_color;
use crate::url::unescape_legacy;

const UNDEFINED_TOKEN: &str = "undefined";

/// Inputs that fill in missing descriptor fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeDefaults {
    /// Anchor day of the trailing date window.
    pub today: NaiveDate,
    /// Collections for descriptors that name none.
    pub collections: Vec<Reference<Collection>>,
}

impl NormalizeDefaults {
    /// Defaults anchored on `today` with the configured collection set.
    #[must_use]
    pub fn at(today: NaiveDate, config: &Config) -> Self {
        Self {
            today,
            collections: config.default_collections(),
        }
    }

    /// Defaults anchored on the current local date.
    #[must_use]
    pub fn now(config: &Config) -> Self {
        Self::at(Local::now().date_naive(), config)
    }
}

/// Parse and normalize the JSON array from a shareable URL.
///
/// Fails on invalid JSON or on any malformed element; nothing partial is
/// returned.
pub fn parse_url_queries(raw: &str, defaults: &NormalizeDefaults) -> Result<Vec<QueryDescriptor>> {
    let value: Value = serde_json::from_str(raw).map_err(Error::InvalidUrlJson)?;
    let Value::Array(items) = value else {
        return Err(Error::MalformedDescriptor {
            position: 0,
            reason: "expected a JSON array of queries".to_string(),
        });
    };
    normalize_queries(&items, defaults)
}

/// Normalize a batch of partial descriptors. Output order and length match
/// the input; all defaulted dates in one batch share a single window.
///
/// Indexes come out unique: an entry whose index was already taken by an
/// earlier one is moved past the largest requested index.
pub fn normalize_queries(
    items: &[Value],
    defaults: &NormalizeDefaults,
) -> Result<Vec<QueryDescriptor>> {
    let window = trailing_window(defaults.today);
    let requested = items
        .iter()
        .enumerate()
        .map(|(position, item)| requested_index(item, position))
        .collect::<Result<Vec<_>>>()?;
    let indexes = assign_unique_indexes(&requested)?;
    let queries = items
        .iter()
        .zip(indexes)
        .enumerate()
        .map(|(position, (item, index))| build_descriptor(item, position, index, &window, defaults))
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!(count = queries.len(), "normalized url queries");
    Ok(queries)
}

/// Normalize one partial descriptor found at `position` in its batch.
pub fn normalize_descriptor(
    item: &Value,
    position: usize,
    window: &DateRange,
    defaults: &NormalizeDefaults,
) -> Result<QueryDescriptor> {
    let index = requested_index(item, position)?;
    build_descriptor(item, position, index, window, defaults)
}

fn build_descriptor(
    item: &Value,
    position: usize,
    index: u32,
    window: &DateRange,
    defaults: &NormalizeDefaults,
) -> Result<QueryDescriptor> {
    let obj = as_object(item, position)?;

    let q = text_value("q", present(obj, "q"), position)?.unwrap_or_default();
    let label = text_value("label", field(obj, "label"), position)?.unwrap_or_else(|| q.clone());

    let color = text_value("color", field(obj, "color"), position)?
        .map(|raw| unescape_legacy(&raw))
        .filter(|color| color != UNDEFINED_TOKEN)
        .unwrap_or_else(|| default_color(usize::try_from(index).unwrap_or(usize::MAX)).to_string());

    let start_date = date_field(obj, "startDate", position)?.unwrap_or(window.start);
    let end_date = date_field(obj, "endDate", position)?.unwrap_or(window.end);

    let sources = reference_list::<MediaSource>(obj, position)?.unwrap_or_default();
    let collections = reference_list::<Collection>(obj, position)?
        .unwrap_or_else(|| defaults.collections.clone());

    Ok(QueryDescriptor {
        index,
        label,
        q,
        color,
        start_date,
        end_date,
        sources,
        collections,
        description: text_value("description", present(obj, "description"), position)?,
        custom: flag_field(obj, "custom"),
        deleted: flag_field(obj, "deleted"),
    })
}

fn as_object(item: &Value, position: usize) -> Result<&Map<String, Value>> {
    match item {
        Value::Object(obj) => Ok(obj),
        other => Err(malformed(position, format!("expected an object, got {other}"))),
    }
}

/// The index an entry asks for: its own `index` field, else its position.
fn requested_index(item: &Value, position: usize) -> Result<u32> {
    let obj = as_object(item, position)?;
    match field(obj, "index") {
        Some(value) => parse_index(value).ok_or_else(|| {
            malformed(position, format!("index must be a non-negative integer, got {value}"))
        }),
        None => u32::try_from(position)
            .map_err(|_| malformed(position, "too many queries".to_string())),
    }
}

fn assign_unique_indexes(requested: &[u32]) -> Result<Vec<u32>> {
    let mut taken = BTreeSet::new();
    let mut spare = requested.iter().max().map_or(0, |max| max.saturating_add(1));
    let mut assigned = Vec::with_capacity(requested.len());
    for (position, &index) in requested.iter().enumerate() {
        if taken.insert(index) {
            assigned.push(index);
            continue;
        }
        spare = next_free_index(&taken, spare)
            .ok_or_else(|| malformed(position, "no free index left".to_string()))?;
        tracing::debug!(position, requested = index, assigned = spare, "moved duplicate query index");
        taken.insert(spare);
        assigned.push(spare);
    }
    Ok(assigned)
}

/// First index at or after `from` not in `taken`, wrapping around to zero.
#[must_use]
pub fn next_free_index(taken: &BTreeSet<u32>, from: u32) -> Option<u32> {
    (from..=u32::MAX)
        .chain(0..from)
        .find(|index| !taken.contains(index))
}

/// A present value: absent and `null` read as missing.
fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|value| !value.is_null())
}

/// A present value of a defaultable field, where `"undefined"` also reads as
/// missing.
fn field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    present(obj, key).filter(|value| value.as_str() != Some(UNDEFINED_TOKEN))
}

fn text_value(key: &str, value: Option<&Value>, position: usize) -> Result<Option<String>> {
    match value {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(value @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(value.to_string())),
        Some(other) => Err(malformed(position, format!("{key} must be text, got {other}"))),
    }
}

fn date_field(obj: &Map<String, Value>, key: &str, position: usize) -> Result<Option<NaiveDate>> {
    match field(obj, key) {
        None => Ok(None),
        Some(Value::String(s)) => parse_url_date(s)
            .map(Some)
            .ok_or_else(|| malformed(position, format!("{key} is not a YYYY-MM-DD date: {s}"))),
        Some(other) => Err(malformed(position, format!("{key} must be a date string, got {other}"))),
    }
}

fn flag_field(obj: &Map<String, Value>, key: &str) -> bool {
    match present(obj, key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn parse_index(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn reference_list<T: Referent>(
    obj: &Map<String, Value>,
    position: usize,
) -> Result<Option<Vec<Reference<T>>>> {
    let key = T::KIND.as_str();
    let Some(value) = field(obj, key) else {
        return Ok(None);
    };
    let Value::Array(entries) = value else {
        return Err(Error::InvalidReference {
            kind: T::KIND,
            position,
            reason: format!("expected an array, got {value}"),
        });
    };
    entries
        .iter()
        .map(|entry| {
            Reference::from_value(entry).map_err(|reason| Error::InvalidReference {
                kind: T::KIND,
                position,
                reason,
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn malformed(position: usize, reason: String) -> Error {
    Error::MalformedDescriptor { position, reason }
}
