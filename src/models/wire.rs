//! Dynamic-shape helpers for the backend's JSON conventions.
//!
//! The backend is loose about two things: list endpoints answer either with a
//! bare array or with an object wrapping a named array field, and document
//! references come back either as a bare id string or as a populated
//! sub-document. Both shapes are normalized here, once, so gateways and
//! services never touch raw `serde_json::Value`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Documents that carry a wire `_id`.
pub trait HasId {
    fn id(&self) -> &str;
}

// ---------------------------------------------------------------------------
// ListEnvelope
// ---------------------------------------------------------------------------

/// A list response in either of the backend's shapes: `[...]` or
/// `{ "<resource>": [...], ...pagination }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope {
    Bare(Vec<Value>),
    Keyed(Map<String, Value>),
}

impl ListEnvelope {
    /// Unwrap into a typed item list. `field` names the array inside the
    /// keyed shape ("libros", "usuarios", ...). A missing field, a
    /// non-array value, or an entry that does not decode all collapse to
    /// the empty/shorter list instead of an error; list reads never fail on
    /// shape alone.
    pub fn into_items<T: DeserializeOwned>(self, field: &str) -> Vec<T> {
        let raw = match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Keyed(mut map) => match map.remove(field) {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
        };
        raw.into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// DocRef
// ---------------------------------------------------------------------------

/// A reference field on a document: populated sub-document or bare id.
/// Serializes back to exactly what it holds, so an id-only reference written
/// in a create payload goes out as the plain string the backend expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocRef<T> {
    Doc(Box<T>),
    Id(String),
}

impl<T: HasId> DocRef<T> {
    /// The referenced document id, whichever shape is present.
    pub fn id(&self) -> &str {
        match self {
            DocRef::Doc(doc) => doc.id(),
            DocRef::Id(id) => id,
        }
    }
}

impl<T> DocRef<T> {
    /// The populated document, when the backend sent one.
    pub fn as_doc(&self) -> Option<&T> {
        match self {
            DocRef::Doc(doc) => Some(doc),
            DocRef::Id(_) => None,
        }
    }
}

impl<T> From<String> for DocRef<T> {
    fn from(id: String) -> Self {
        DocRef::Id(id)
    }
}

impl<T> From<&str> for DocRef<T> {
    fn from(id: &str) -> Self {
        DocRef::Id(id.to_string())
    }
}
