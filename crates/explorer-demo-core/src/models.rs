//! Data models for the Explorer demo query state
//!
//! A `QueryDescriptor` is one search clause as it travels through the shareable
//! URL. Its `sources` and `collections` hold either a bare id waiting for a
//! lookup or the fully resolved object, modelled as [`Reference`].

use std::fmt;

use chrono::NaiveDate;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Numeric id of a media source (`media_id`) or collection (`tags_id`).
pub type ReferenceId = i64;

// =============================================================================
// Reference kinds
// =============================================================================

/// Which reference list of a descriptor a lookup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Sources,
    Collections,
}

impl ReferenceKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sources => "sources",
            Self::Collections => "collections",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Lookup objects
// =============================================================================

/// A single media source, as returned by the sources lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSource {
    pub media_id: ReferenceId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A collection of media sources (a tag), as returned by the collections lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub tags_id: ReferenceId,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Objects that a [`Reference`] can resolve to.
pub trait Referent: Sized {
    const KIND: ReferenceKind;
    /// Keys that may carry the id, in priority order.
    const ID_KEYS: &'static [&'static str];
    /// Keys whose presence marks an object as already resolved.
    const NAME_KEYS: &'static [&'static str];

    fn id(&self) -> ReferenceId;

    /// Build the resolved object from an id, a display name, and the raw object.
    fn from_parts(id: ReferenceId, name: String, raw: &Map<String, Value>) -> Self;
}

impl Referent for MediaSource {
    const KIND: ReferenceKind = ReferenceKind::Sources;
    const ID_KEYS: &'static [&'static str] = &["media_id", "id"];
    const NAME_KEYS: &'static [&'static str] = &["name"];

    fn id(&self) -> ReferenceId {
        self.media_id
    }

    fn from_parts(id: ReferenceId, name: String, raw: &Map<String, Value>) -> Self {
        Self {
            media_id: id,
            name,
            url: raw.get("url").and_then(Value::as_str).map(str::to_string),
        }
    }
}

impl Referent for Collection {
    const KIND: ReferenceKind = ReferenceKind::Collections;
    const ID_KEYS: &'static [&'static str] = &["tags_id", "id"];
    const NAME_KEYS: &'static [&'static str] = &["label", "tag"];

    fn id(&self) -> ReferenceId {
        self.tags_id
    }

    fn from_parts(id: ReferenceId, label: String, raw: &Map<String, Value>) -> Self {
        Self {
            tags_id: id,
            label,
            description: raw
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

// =============================================================================
// Reference
// =============================================================================

/// Either a bare id still waiting for its lookup, or the resolved object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference<T> {
    Unresolved(ReferenceId),
    Resolved(T),
}

impl<T: Referent> Reference<T> {
    #[must_use]
    pub fn id(&self) -> ReferenceId {
        match self {
            Self::Unresolved(id) => *id,
            Self::Resolved(obj) => obj.id(),
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    #[must_use]
    pub const fn resolved(&self) -> Option<&T> {
        match self {
            Self::Resolved(obj) => Some(obj),
            Self::Unresolved(_) => None,
        }
    }

    /// Interpret one raw URL/JSON entry.
    ///
    /// Numbers and digit strings are bare ids. Objects with a display name are
    /// resolved; objects with only an id are bare ids.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Number(_) | Value::String(_) => parse_id(value)
                .map(Self::Unresolved)
                .ok_or_else(|| format!("expected a numeric id, got {value}")),
            Value::Object(obj) => {
                let id = T::ID_KEYS
                    .iter()
                    .find_map(|key| obj.get(*key).and_then(parse_id))
                    .ok_or_else(|| {
                        format!("object has no id (expected one of {:?})", T::ID_KEYS)
                    })?;
                let name = T::NAME_KEYS
                    .iter()
                    .find_map(|key| obj.get(*key).and_then(Value::as_str));
                Ok(match name {
                    Some(name) => Self::Resolved(T::from_parts(id, name.to_string(), obj)),
                    None => Self::Unresolved(id),
                })
            }
            other => Err(format!("expected an id or object, got {other}")),
        }
    }
}

fn parse_id(value: &Value) -> Option<ReferenceId> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
                trimmed.parse().ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

impl<T: Serialize> Serialize for Reference<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unresolved(id) => serializer.serialize_i64(*id),
            Self::Resolved(obj) => obj.serialize(serializer),
        }
    }
}

impl<'de, T: Referent> Deserialize<'de> for Reference<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(de::Error::custom)
    }
}

// =============================================================================
// Query descriptor
// =============================================================================

fn is_false(value: &bool) -> bool {
    !*value
}

/// One fully populated search clause.
///
/// # Constraints
/// - `index`: stable correlation key among siblings; never reassigned by merges.
/// - `deleted`: logical removal; the entry stays in the list so in-flight
///   lookups keyed by `index` still find (and skip) it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescriptor {
    pub index: u32,
    pub label: String,
    pub q: String,
    pub color: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub sources: Vec<Reference<MediaSource>>,
    pub collections: Vec<Reference<Collection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub custom: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deleted: bool,
}

impl QueryDescriptor {
    /// Ids of every entry of `kind`, in order.
    #[must_use]
    pub fn reference_ids(&self, kind: ReferenceKind) -> Vec<ReferenceId> {
        match kind {
            ReferenceKind::Sources => self.sources.iter().map(Reference::id).collect(),
            ReferenceKind::Collections => self.collections.iter().map(Reference::id).collect(),
        }
    }

    /// Whether any entry of `kind` still needs a lookup.
    #[must_use]
    pub fn has_unresolved(&self, kind: ReferenceKind) -> bool {
        match kind {
            ReferenceKind::Sources => self.sources.iter().any(|r| !r.is_resolved()),
            ReferenceKind::Collections => self.collections.iter().any(|r| !r.is_resolved()),
        }
    }

    /// Whether the descriptor would be written to a shareable URL.
    #[must_use]
    pub fn is_shareable(&self) -> bool {
        !self.deleted && !self.q.is_empty()
    }
}
