//! IRI identifiers for subjects, predicates and IRI-valued objects.
//!
//! An [`Iri`] is an opaque, lexicographically ordered string. CURIEs such as
//! `u:alice` are stored verbatim; no expansion against a prefix table happens
//! at this layer.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// An Internationalized Resource Identifier.
///
/// Backed by a shared `Arc<str>` so that the six permutation indexes can hold
/// the same identifier without copying its bytes six times.
///
/// # Invariants
///
/// - Ordering is the byte-wise lexicographic order of the underlying string,
///   so every set of IRIs sharing a prefix is contiguous in an ordered map.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(Arc<str>);

impl Iri {
    /// Create an IRI from any string-like value.
    #[must_use]
    pub fn new(iri: impl AsRef<str>) -> Self {
        Self(Arc::from(iri.as_ref()))
    }

    /// Get the IRI as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this IRI starts with the characters of `prefix`.
    #[must_use]
    pub fn has_prefix(&self, prefix: &Self) -> bool {
        self.0.starts_with(prefix.as_str())
    }

    /// Check whether this IRI names a blank node (`_:` scheme).
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.starts_with("_:")
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Iri {
    fn from(iri: &str) -> Self {
        Self::new(iri)
    }
}

impl From<String> for Iri {
    fn from(iri: String) -> Self {
        Self(Arc::from(iri))
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iri_ordering_is_lexicographic() {
        let mut iris = vec![Iri::from("u:B"), Iri::from("s:G"), Iri::from("u:A")];
        iris.sort();
        let rendered: Vec<&str> = iris.iter().map(Iri::as_str).collect();
        assert_eq!(rendered, vec!["s:G", "u:A", "u:B"]);
    }

    #[test]
    fn test_iri_has_prefix() {
        let follows = Iri::from("follows");
        assert!(follows.has_prefix(&Iri::from("f")));
        assert!(follows.has_prefix(&Iri::from("follows")));
        assert!(follows.has_prefix(&Iri::from("")));
        assert!(!follows.has_prefix(&Iri::from("followsx")));
        assert!(!follows.has_prefix(&Iri::from("r")));
    }

    #[test]
    fn test_iri_blank_node() {
        assert!(Iri::from("_:b0").is_blank());
        assert!(!Iri::from("u:A").is_blank());
    }
}
