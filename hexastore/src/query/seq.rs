//! Narrowing one index level with a predicate.
//!
//! | predicate   | traversal                                          |
//! |-------------|----------------------------------------------------|
//! | absent      | every key                                          |
//! | `Eq(v)`     | `slice(v, 1)`                                      |
//! | `Prefix(v)` | seek to `v`, then take while keys start with `v`   |
//! | `Lt(v)`     | before-half of `split(v)`, skipping other domains  |
//! | `Gt(v)`     | after-half of `split(v)`, stopping at a new domain |
//! | `In(a, b)`  | `range(a, b)`                                      |

use crate::query::predicate::Predicate;
use crate::storage::skiplist::{Iter, SkipList};
use crate::types::IndexKey;

/// Extra bound applied on top of a skiplist cursor.
#[derive(Debug, Clone)]
enum Bound<K> {
    Open,
    /// Take while keys start with the prefix.
    Prefix(K),
    /// Take while keys share the pivot's domain.
    TakeDomain(K),
    /// Drop keys until one shares the pivot's domain, then take the rest.
    DropDomain(K),
    Exhausted,
}

/// A lazily narrowed view of one index level.
#[derive(Debug, Clone)]
pub struct Seq<'a, K, V> {
    cursor: Iter<'a, K, V>,
    bound: Bound<K>,
}

impl<'a, K: IndexKey, V> Seq<'a, K, V> {
    /// Narrow `level` by `predicate`.
    #[must_use]
    pub fn decompose(predicate: Option<&Predicate<K>>, level: &'a SkipList<K, V>) -> Self {
        let Some(predicate) = predicate else {
            return Self::open(level.values());
        };

        match predicate {
            Predicate::Eq(v) => Self::open(level.slice(v, 1)),
            Predicate::Prefix(v) if v.prefix_is_ordered() => {
                Self::bounded(level.seek(v), Bound::Prefix(v.clone()))
            }
            // Unordered prefixes are checked by a residual stream filter.
            Predicate::Prefix(_) => Self::open(level.values()),
            Predicate::Lt(v) => {
                let (before, _) = level.split(v);
                Self::bounded(before, Bound::DropDomain(v.clone()))
            }
            Predicate::Gt(v) => {
                let (_, after) = level.split(v);
                Self::bounded(after, Bound::TakeDomain(v.clone()))
            }
            Predicate::In(lo, hi) => Self::open(level.range(lo, hi)),
        }
    }

    const fn open(cursor: Iter<'a, K, V>) -> Self {
        Self::bounded(cursor, Bound::Open)
    }

    const fn bounded(cursor: Iter<'a, K, V>, bound: Bound<K>) -> Self {
        Self { cursor, bound }
    }
}

impl<'a, K: IndexKey, V> Iterator for Seq<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let keep = match &self.bound {
            Bound::Exhausted => return None,
            Bound::Open => return self.cursor.next(),
            Bound::DropDomain(pivot) => {
                let pivot = pivot.clone();
                let found = self.cursor.by_ref().find(|(k, _)| k.same_domain(&pivot));
                if found.is_some() {
                    self.bound = Bound::Open;
                }
                return found;
            }
            Bound::Prefix(_) | Bound::TakeDomain(_) => self.cursor.next(),
        };

        let Some((k, v)) = keep else {
            self.bound = Bound::Exhausted;
            return None;
        };
        let within = match &self.bound {
            Bound::Prefix(prefix) => k.has_prefix(prefix),
            Bound::TakeDomain(pivot) => k.same_domain(pivot),
            _ => true,
        };
        if within {
            Some((k, v))
        } else {
            self.bound = Bound::Exhausted;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::types::{Iri, Value};

    fn level<K: IndexKey>(keys: Vec<K>) -> SkipList<K, ()> {
        let mut rng = StdRng::seed_from_u64(1);
        let mut list = SkipList::new(8);
        for k in keys {
            list.insert(k, (), &mut rng);
        }
        list
    }

    fn run<K: IndexKey>(predicate: Option<Predicate<K>>, list: &SkipList<K, ()>) -> Vec<K> {
        Seq::decompose(predicate.as_ref(), list)
            .map(|(k, ())| k.clone())
            .collect()
    }

    fn iris(names: &[&str]) -> Vec<Iri> {
        names.iter().map(|n| Iri::from(*n)).collect()
    }

    #[test]
    fn test_absent_predicate_visits_everything() {
        let list = level(iris(&["b", "a", "c"]));
        assert_eq!(run(None, &list), iris(&["a", "b", "c"]));
    }

    #[test]
    fn test_eq_is_point_lookup() {
        let list = level(iris(&["a", "b", "c"]));
        assert_eq!(run(Some(Predicate::eq("b")), &list), iris(&["b"]));
        assert!(run(Some(Predicate::eq("bb")), &list).is_empty());
    }

    #[test]
    fn test_prefix_contains_exactly_the_run() {
        let list = level(iris(&["e", "f", "fa", "fol", "follows", "g", "relates"]));
        assert_eq!(
            run(Some(Predicate::prefix("f")), &list),
            iris(&["f", "fa", "fol", "follows"])
        );
        assert_eq!(
            run(Some(Predicate::prefix("fol")), &list),
            iris(&["fol", "follows"])
        );
        assert!(run(Some(Predicate::prefix("x")), &list).is_empty());
    }

    #[test]
    fn test_strict_bounds_exclude_pivot() {
        let list = level(iris(&["a", "b", "c", "d"]));
        assert_eq!(run(Some(Predicate::lt("c")), &list), iris(&["a", "b"]));
        assert_eq!(run(Some(Predicate::gt("b")), &list), iris(&["c", "d"]));
        assert_eq!(
            run(Some(Predicate::in_range("b", "c")), &list),
            iris(&["b", "c"])
        );
    }

    #[test]
    fn test_object_bounds_respect_categories() {
        let list = level(vec![
            Value::Integer(1),
            Value::Integer(9),
            Value::string("a"),
            Value::string("m"),
            Value::string("z"),
            Value::iri("n"),
            Value::iri("u:A"),
        ]);

        assert_eq!(
            run(Some(Predicate::gt("a")), &list),
            vec![Value::string("m"), Value::string("z")]
        );
        assert_eq!(
            run(Some(Predicate::lt("n")), &list),
            vec![Value::string("a"), Value::string("m")]
        );
        assert_eq!(
            run(Some(Predicate::lt(Value::iri("u:A"))), &list),
            vec![Value::iri("n")]
        );
        assert!(run(Some(Predicate::gt(Value::iri("u:A"))), &list).is_empty());
    }

    #[test]
    fn test_bounds_over_empty_domain() {
        let list = level(vec![Value::Integer(1), Value::iri("u:A")]);
        assert!(run(Some(Predicate::lt("m")), &list).is_empty());
        assert!(run(Some(Predicate::gt("m")), &list).is_empty());
    }

    #[test]
    fn test_unordered_prefix_visits_everything() {
        let list = level(vec![Value::Integer(12), Value::Integer(13), Value::Integer(120)]);
        assert_eq!(run(Some(Predicate::prefix(12_i64)), &list).len(), 3);
    }

    #[test]
    fn test_empty_level() {
        let list: SkipList<Iri, ()> = SkipList::new(4);
        assert!(run(Some(Predicate::prefix("a")), &list).is_empty());
        assert!(run(Some(Predicate::lt("a")), &list).is_empty());
        assert!(run(None, &list).is_empty());
    }
}
