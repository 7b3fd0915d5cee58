//! Lazy descent through a permutation index.
//!
//! An [`Iter`] keeps one cursor per nesting level. Each call to `next`
//! advances the innermost live cursor; when it runs dry the iterator
//! backtracks one level, advances there, and narrows the next sub-map with
//! that level's predicate. Nothing is materialized.

use crate::query::Pattern;
use crate::query::seq::Seq;
use crate::storage::index::{Credibility, Index, Inner, Layout, Leaf, Levels, Middle};
use crate::storage::skiplist;
use crate::types::{KOrder, Statement};

/// Forward-only statement iterator over one index.
pub struct Iter<'a, L: Layout> {
    levels: Levels<L::A, L::B, L::C>,
    first: Seq<'a, L::A, Middle<L::B, L::C>>,
    second: Option<(&'a L::A, Seq<'a, L::B, Inner<L::C>>)>,
    third: Option<(&'a L::B, Seq<'a, L::C, Leaf>)>,
    versions: Option<(&'a L::C, skiplist::Iter<'a, KOrder, Credibility>)>,
}

impl<'a, L: Layout> Iter<'a, L> {
    /// Start a traversal of `index` constrained by `pattern`.
    #[must_use]
    pub fn new(index: &'a Index<L>, pattern: &Pattern) -> Self {
        Self::with_levels(index, L::levels(pattern))
    }

    /// Start a traversal with predicates already in the index's field order.
    #[must_use]
    pub fn with_levels(index: &'a Index<L>, levels: Levels<L::A, L::B, L::C>) -> Self {
        let first = Seq::decompose(levels.first.as_ref(), index.root());
        Self {
            levels,
            first,
            second: None,
            third: None,
            versions: None,
        }
    }
}

impl<L: Layout> Iterator for Iter<'_, L> {
    type Item = Statement;

    fn next(&mut self) -> Option<Statement> {
        loop {
            if let Some((c, versions)) = self.versions.as_mut() {
                if let (Some((k, credibility)), Some((a, _)), Some((b, _))) =
                    (versions.next(), self.second.as_ref(), self.third.as_ref())
                {
                    return Some(L::assemble(a, b, c, *k, *credibility));
                }
                self.versions = None;
            }

            if let Some((_, inner)) = self.third.as_mut() {
                if let Some((c, leaf)) = inner.next() {
                    self.versions = Some((c, leaf.values()));
                    continue;
                }
                self.third = None;
            }

            if let Some((_, middle)) = self.second.as_mut() {
                if let Some((b, inner)) = middle.next() {
                    let narrowed = Seq::decompose(self.levels.third.as_ref(), inner);
                    self.third = Some((b, narrowed));
                    continue;
                }
                self.second = None;
            }

            let (a, middle) = self.first.next()?;
            let narrowed = Seq::decompose(self.levels.second.as_ref(), middle);
            self.second = Some((a, narrowed));
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::query::Predicate;
    use crate::storage::index::{Ops, Pso, Spo};
    use crate::types::Value;

    fn index<L: Layout>(statements: &[Statement]) -> Index<L> {
        let mut rng = StdRng::seed_from_u64(5);
        let mut index = Index::new(8);
        for (ms, st) in (1_u64..).zip(statements) {
            let stamped = Statement {
                k: KOrder::new(ms, 0, 0),
                ..st.clone()
            };
            index.insert(&stamped, &mut rng);
        }
        index
    }

    fn dataset() -> Vec<Statement> {
        vec![
            Statement::link("u:A", "follows", "u:B"),
            Statement::link("s:C", "follows", "u:B"),
            Statement::link("s:C", "relates", "u:D"),
            Statement::new("u:B", "status", "b"),
        ]
    }

    fn rendered(iter: impl Iterator<Item = Statement>) -> Vec<String> {
        iter.map(|st| format!("{} {} {}", st.s, st.p, st.o)).collect()
    }

    #[test]
    fn test_full_scan_in_index_order() {
        let index = index::<Spo>(&dataset());
        assert_eq!(
            rendered(Iter::new(&index, &Pattern::all())),
            vec![
                "s:C follows <u:B>",
                "s:C relates <u:D>",
                "u:A follows <u:B>",
                "u:B status \"b\"",
            ]
        );
    }

    #[test]
    fn test_reassembles_from_other_field_orders() {
        let index = index::<Ops>(&dataset());
        let pattern = Pattern::new(None, None, Some(Predicate::eq(Value::iri("u:B"))));
        assert_eq!(
            rendered(Iter::new(&index, &pattern)),
            vec!["s:C follows <u:B>", "u:A follows <u:B>"]
        );
    }

    #[test]
    fn test_second_level_orders_results() {
        let index = index::<Pso>(&dataset());
        let pattern = Pattern::new(None, Some(Predicate::eq("follows")), None);
        let subjects: Vec<String> = Iter::new(&index, &pattern)
            .map(|st| st.s.to_string())
            .collect();
        assert_eq!(subjects, vec!["s:C", "u:A"]);
    }

    #[test]
    fn test_duplicate_triples_yield_each_version() {
        let st = Statement::link("u:A", "follows", "u:B");
        let index = index::<Spo>(&[st.clone(), st.clone().with_credibility(0.9)]);
        let found: Vec<Statement> = Iter::new(&index, &Pattern::all()).collect();
        assert_eq!(found.len(), 2);
        assert!(found[0].k < found[1].k);
        assert_eq!(found[1].c, Some(0.9));
    }

    #[test]
    fn test_missing_structure_yields_nothing() {
        let index = index::<Spo>(&dataset());
        let pattern = Pattern::new(
            Some(Predicate::eq("u:N")),
            Some(Predicate::eq("follows")),
            None,
        );
        assert_eq!(Iter::new(&index, &pattern).count(), 0);

        let empty: Index<Spo> = Index::new(4);
        assert_eq!(Iter::new(&empty, &Pattern::all()).count(), 0);
    }

    #[test]
    fn test_iterator_is_fused_after_exhaustion() {
        let index = index::<Spo>(&dataset());
        let mut iter = Iter::new(&index, &Pattern::all());
        assert_eq!(iter.by_ref().count(), 4);
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }
}
