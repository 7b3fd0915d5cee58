//! Typed literal values stored in the object position.
//!
//! Provides the `Value` sum type and its `ValueType` category tag.
//!
//! # Ordering
//!
//! Values are totally ordered: first by category
//! (`Boolean < Integer < Double < String < AnyUri`), then by the natural
//! order of the payload. Doubles use IEEE 754 total ordering so that `NaN`
//! still has a fixed place in an index.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::Iri;

/// Value category discriminants, declared in index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueType {
    Boolean,
    Integer,
    Double,
    String,
    AnyUri,
}

impl ValueType {
    /// Whether prefix matches over this category's lexical form are
    /// contiguous in value order.
    #[must_use]
    pub const fn is_textual(self) -> bool {
        matches!(self, Self::String | Self::AnyUri)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Boolean => "xsd:boolean",
            Self::Integer => "xsd:integer",
            Self::Double => "xsd:double",
            Self::String => "xsd:string",
            Self::AnyUri => "xsd:anyURI",
        };
        f.write_str(name)
    }
}

/// An object value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(Arc<str>),
    #[serde(rename = "anyuri")]
    AnyUri(Iri),
}

impl Value {
    /// Create a string literal.
    #[must_use]
    pub fn string(s: impl AsRef<str>) -> Self {
        Self::String(Arc::from(s.as_ref()))
    }

    /// Create an IRI reference.
    #[must_use]
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Self::AnyUri(Iri::new(iri))
    }

    /// Get the category tag.
    #[must_use]
    pub const fn category(&self) -> ValueType {
        match self {
            Self::Boolean(_) => ValueType::Boolean,
            Self::Integer(_) => ValueType::Integer,
            Self::Double(_) => ValueType::Double,
            Self::String(_) => ValueType::String,
            Self::AnyUri(_) => ValueType::AnyUri,
        }
    }

    /// Get the IRI if this value is an IRI reference.
    #[must_use]
    pub const fn as_iri(&self) -> Option<&Iri> {
        match self {
            Self::AnyUri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Get the lexical form used for prefix tests.
    #[must_use]
    pub fn lexical(&self) -> Cow<'_, str> {
        match self {
            Self::Boolean(b) => Cow::Owned(b.to_string()),
            Self::Integer(n) => Cow::Owned(n.to_string()),
            Self::Double(n) => Cow::Owned(n.to_string()),
            Self::String(s) => Cow::Borrowed(s),
            Self::AnyUri(iri) => Cow::Borrowed(iri.as_str()),
        }
    }

    /// Check whether this value shares `prefix`'s category and its lexical
    /// form starts with the lexical form of `prefix`.
    #[must_use]
    pub fn has_prefix(&self, prefix: &Self) -> bool {
        self.category() == prefix.category() && self.lexical().starts_with(&*prefix.lexical())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Double(a), Self::Double(b)) => a.total_cmp(b),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (Self::AnyUri(a), Self::AnyUri(b)) => a.cmp(b),
            _ => self.category().cmp(&other.category()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Double(n) => write!(f, "{n:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::AnyUri(iri) => write!(f, "<{iri}>"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Double(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<Iri> for Value {
    fn from(iri: Iri) -> Self {
        Self::AnyUri(iri)
    }
}
