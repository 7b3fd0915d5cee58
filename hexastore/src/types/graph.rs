//! Folding a statement stream into nested maps.
//!
//! # Usage
//!
//! ```
//! use hexastore::query::{Pattern, Predicate, Stream};
//! use hexastore::storage::Store;
//! use hexastore::types::{Graph, Statement};
//!
//! let mut store = Store::new();
//! store.put(Statement::link("u:A", "follows", "u:B")).unwrap();
//!
//! let mut graph = Graph::default();
//! let pattern = Pattern::new(Some(Predicate::eq("u:A")), None, None);
//! store.match_pattern(&pattern).fmap(|st| graph.append(st)).unwrap();
//! assert_eq!(graph.len(), 1);
//! ```

use std::collections::BTreeMap;
use std::convert::Infallible;

use crate::types::{Iri, Statement, Value};

/// The `predicate → objects` view of one subject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entity {
    properties: BTreeMap<Iri, Vec<Value>>,
}

impl Entity {
    /// Record one `(p, o)` pair. Objects for the same predicate keep
    /// arrival order.
    pub fn append(&mut self, p: Iri, o: Value) {
        self.properties.entry(p).or_default().push(o);
    }

    /// Get all objects recorded for `p`.
    #[must_use]
    pub fn get(&self, p: &Iri) -> &[Value] {
        self.properties.get(p).map_or(&[], Vec::as_slice)
    }

    /// Iterate over `(predicate, objects)` in predicate order.
    pub fn iter(&self) -> impl Iterator<Item = (&Iri, &[Value])> {
        self.properties.iter().map(|(p, os)| (p, os.as_slice()))
    }

    /// Number of distinct predicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// The `subject → entity` view of a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    nodes: BTreeMap<Iri, Entity>,
}

impl Graph {
    /// Fold one statement into the graph.
    ///
    /// Never fails; the `Result` lets it be passed straight to
    /// [`Stream::fmap`](crate::query::Stream::fmap).
    pub fn append(&mut self, statement: Statement) -> Result<(), Infallible> {
        let Statement { s, p, o, .. } = statement;
        self.nodes.entry(s).or_default().append(p, o);
        Ok(())
    }

    /// Get the entity for a subject.
    #[must_use]
    pub fn get(&self, s: &Iri) -> Option<&Entity> {
        self.nodes.get(s)
    }

    /// Iterate over `(subject, entity)` in subject order.
    pub fn iter(&self) -> impl Iterator<Item = (&Iri, &Entity)> {
        self.nodes.iter()
    }

    /// Number of distinct subjects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_groups_by_subject_and_predicate() {
        let mut graph = Graph::default();
        for st in [
            Statement::link("s:C", "follows", "u:B"),
            Statement::link("s:C", "follows", "u:E"),
            Statement::link("s:C", "relates", "u:D"),
            Statement::new("u:B", "status", "b"),
        ] {
            graph.append(st).expect("append is infallible");
        }

        assert_eq!(graph.len(), 2);
        let c = graph.get(&Iri::from("s:C")).expect("s:C present");
        assert_eq!(c.len(), 2);
        assert_eq!(
            c.get(&Iri::from("follows")),
            &[Value::iri("u:B"), Value::iri("u:E")]
        );
        assert!(c.get(&Iri::from("status")).is_empty());
    }

    #[test]
    fn test_empty_graph() {
        let graph = Graph::default();
        assert!(graph.is_empty());
        assert!(graph.get(&Iri::from("u:A")).is_none());
    }
}
