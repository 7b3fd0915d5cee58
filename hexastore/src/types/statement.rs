//! The statement type: subject, predicate, object, credibility and K-order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Iri, KOrder, Value};

/// The atomic knowledge unit.
///
/// Statements are immutable values; storing one returns the K-order token the
/// store stamped on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// Subject.
    pub s: Iri,
    /// Predicate.
    pub p: Iri,
    /// Object.
    pub o: Value,
    /// Optional credibility score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,
    /// Insertion-order token, [`KOrder::ZERO`] until stored.
    #[serde(default)]
    pub k: KOrder,
}

/// An ordered batch of statements.
pub type Bag = Vec<Statement>;

impl Statement {
    /// Create a statement with a literal or IRI object.
    #[must_use]
    pub fn new(s: impl Into<Iri>, p: impl Into<Iri>, o: impl Into<Value>) -> Self {
        Self {
            s: s.into(),
            p: p.into(),
            o: o.into(),
            c: None,
            k: KOrder::ZERO,
        }
    }

    /// Create a statement whose object is an IRI reference.
    #[must_use]
    pub fn link(s: impl Into<Iri>, p: impl Into<Iri>, o: impl Into<Iri>) -> Self {
        Self::new(s, p, Value::AnyUri(o.into()))
    }

    /// Attach a credibility score.
    #[must_use]
    pub const fn with_credibility(mut self, c: f64) -> Self {
        self.c = Some(c);
        self
    }

    /// Get the `(s, p, o)` triple, ignoring credibility and K-order.
    #[must_use]
    pub const fn triple(&self) -> (&Iri, &Iri, &Value) {
        (&self.s, &self.p, &self.o)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "⟨{} {} {}⟩", self.s, self.p, self.o)?;
        if let Some(c) = self.c {
            write!(f, " c={c}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_builds_iri_object() {
        let st = Statement::link("u:A", "follows", "u:B");
        assert_eq!(st.o, Value::iri("u:B"));
        assert_eq!(st.k, KOrder::ZERO);
        assert_eq!(st.c, None);
    }

    #[test]
    fn test_new_builds_literal_object() {
        let st = Statement::new("u:B", "status", "b");
        assert_eq!(st.o, Value::string("b"));
    }

    #[test]
    fn test_triple_ignores_credibility() {
        let a = Statement::link("u:A", "follows", "u:B").with_credibility(0.5);
        let b = Statement::link("u:A", "follows", "u:B");
        assert_ne!(a, b);
        assert_eq!(a.triple(), b.triple());
    }

    #[test]
    fn test_statement_display() {
        let st = Statement::new("u:B", "status", "b").with_credibility(0.25);
        assert_eq!(st.to_string(), "⟨u:B status \"b\"⟩ c=0.25");
    }
}
