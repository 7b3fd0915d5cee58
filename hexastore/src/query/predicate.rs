//! Per-field constraints.
//!
//! A query constrains each of S, P and O with at most one `Predicate`.
//! Absence (`None`) is the `ALL` clause.

use std::fmt;

use crate::types::IndexKey;

/// The kind of constraint, without its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clause {
    /// Unconstrained.
    All,
    Eq,
    Prefix,
    Lt,
    Gt,
    In,
}

impl Clause {
    /// Classify an optional predicate.
    #[must_use]
    pub const fn of<T>(predicate: Option<&Predicate<T>>) -> Self {
        match predicate {
            None => Self::All,
            Some(p) => p.clause(),
        }
    }
}

/// A typed constraint on one field.
///
/// # Invariants
///
/// - `Lt` and `Gt` are strict.
/// - `In(lo, hi)` is closed on both ends.
/// - `Prefix` matches keys whose textual form starts with the operand's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate<T> {
    Eq(T),
    Prefix(T),
    Lt(T),
    Gt(T),
    In(T, T),
}

impl<T> Predicate<T> {
    /// Match the value exactly.
    #[must_use]
    pub fn eq(value: impl Into<T>) -> Self {
        Self::Eq(value.into())
    }

    /// Match values starting with `value`.
    #[must_use]
    pub fn prefix(value: impl Into<T>) -> Self {
        Self::Prefix(value.into())
    }

    /// Alias of [`Predicate::prefix`].
    #[must_use]
    pub fn has_prefix(value: impl Into<T>) -> Self {
        Self::prefix(value)
    }

    /// Match values strictly below `value`.
    #[must_use]
    pub fn lt(value: impl Into<T>) -> Self {
        Self::Lt(value.into())
    }

    /// Match values strictly above `value`.
    #[must_use]
    pub fn gt(value: impl Into<T>) -> Self {
        Self::Gt(value.into())
    }

    /// Match values in the closed range `[lo, hi]`.
    #[must_use]
    pub fn in_range(lo: impl Into<T>, hi: impl Into<T>) -> Self {
        Self::In(lo.into(), hi.into())
    }

    #[must_use]
    pub const fn clause(&self) -> Clause {
        match self {
            Self::Eq(_) => Clause::Eq,
            Self::Prefix(_) => Clause::Prefix,
            Self::Lt(_) => Clause::Lt,
            Self::Gt(_) => Clause::Gt,
            Self::In(_, _) => Clause::In,
        }
    }

    /// The first operand.
    #[must_use]
    pub const fn value(&self) -> &T {
        match self {
            Self::Eq(v) | Self::Prefix(v) | Self::Lt(v) | Self::Gt(v) | Self::In(v, _) => v,
        }
    }

    /// The upper bound of an `In` range.
    #[must_use]
    pub const fn other(&self) -> Option<&T> {
        match self {
            Self::In(_, hi) => Some(hi),
            _ => None,
        }
    }
}

impl<T: IndexKey> Predicate<T> {
    /// Test a single key.
    ///
    /// Agrees exactly with what an index traversal returns for this
    /// predicate: strict bounds do not cross into another value domain.
    #[must_use]
    pub fn matches(&self, key: &T) -> bool {
        match self {
            Self::Eq(v) => key == v,
            Self::Prefix(v) => key.has_prefix(v),
            Self::Lt(v) => key < v && key.same_domain(v),
            Self::Gt(v) => key > v && key.same_domain(v),
            Self::In(lo, hi) => lo <= key && key <= hi,
        }
    }

    /// Whether an ordered index level can evaluate this predicate by
    /// itself. Only prefixes over non-textual values cannot.
    #[must_use]
    pub fn is_index_ordered(&self) -> bool {
        match self {
            Self::Prefix(v) => v.prefix_is_ordered(),
            _ => true,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq(v) => write!(f, "= {v}"),
            Self::Prefix(v) => write!(f, "^= {v}"),
            Self::Lt(v) => write!(f, "< {v}"),
            Self::Gt(v) => write!(f, "> {v}"),
            Self::In(lo, hi) => write!(f, "in [{lo}, {hi}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Iri, Value};

    #[test]
    fn test_constructors_and_clause() {
        let p: Predicate<Iri> = Predicate::eq("follows");
        assert_eq!(p.clause(), Clause::Eq);
        assert_eq!(p.value(), &Iri::from("follows"));
        assert_eq!(p.other(), None);

        let p: Predicate<Value> = Predicate::in_range(1_i64, 5_i64);
        assert_eq!(p.clause(), Clause::In);
        assert_eq!(p.other(), Some(&Value::Integer(5)));

        assert_eq!(Clause::of::<Iri>(None), Clause::All);
        assert_eq!(
            Predicate::<Iri>::has_prefix("f"),
            Predicate::<Iri>::prefix("f")
        );
    }

    #[test]
    fn test_range_closure() {
        let within: Predicate<Value> = Predicate::in_range(2_i64, 4_i64);
        assert!(within.matches(&Value::Integer(2)));
        assert!(within.matches(&Value::Integer(4)));
        assert!(!within.matches(&Value::Integer(5)));

        let below: Predicate<Value> = Predicate::lt(4_i64);
        assert!(below.matches(&Value::Integer(3)));
        assert!(!below.matches(&Value::Integer(4)));

        let above: Predicate<Value> = Predicate::gt(4_i64);
        assert!(above.matches(&Value::Integer(5)));
        assert!(!above.matches(&Value::Integer(4)));
    }

    #[test]
    fn test_strict_bounds_stay_in_domain() {
        let above: Predicate<Value> = Predicate::gt("a");
        assert!(above.matches(&Value::string("b")));
        assert!(!above.matches(&Value::iri("b")));

        let below: Predicate<Value> = Predicate::lt("z");
        assert!(below.matches(&Value::string("y")));
        assert!(!below.matches(&Value::Integer(1)));
    }

    #[test]
    fn test_iri_bounds() {
        let below: Predicate<Iri> = Predicate::lt("u:B");
        assert!(below.matches(&Iri::from("u:A")));
        assert!(below.matches(&Iri::from("s:Z")));
        assert!(!below.matches(&Iri::from("u:B")));
    }

    #[test]
    fn test_index_ordered_prefixes() {
        assert!(Predicate::<Value>::prefix("ab").is_index_ordered());
        assert!(!Predicate::<Value>::prefix(12_i64).is_index_ordered());
        assert!(Predicate::<Iri>::prefix("u:").is_index_ordered());
        assert!(Predicate::<Value>::lt(12_i64).is_index_ordered());
    }

    #[test]
    fn test_predicate_display() {
        assert_eq!(Predicate::<Iri>::eq("u:A").to_string(), "= u:A");
        assert_eq!(
            Predicate::<Value>::in_range(1_i64, 2_i64).to_string(),
            "in [1, 2]"
        );
    }
}
