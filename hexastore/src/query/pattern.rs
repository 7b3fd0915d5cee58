//! Query patterns and the strategy planner.
//!
//! A [`Pattern`] holds up to three predicates, classifies each into a
//! [`Hint`] and derives the [`Strategy`]: the permutation index whose nesting
//! order lets the strongest constraints be resolved at the outermost levels.
//!
//! # Planning rules
//!
//! 1. An exact match on S anchors on S (`SPO` or `SOP`).
//! 2. Otherwise an exact match on P anchors on P (`PSO` or `POS`).
//! 3. Otherwise an exact match on O anchors on O (`OPS` or `OSP`).
//! 4. With no constraint at all the plan is a full scan.
//! 5. Otherwise the first filtered field in S, P, O order anchors.
//!
//! Prefix and range filters are ranked together ([`Tier::Filter`]) when
//! choosing between the two permutations that share an anchor.

use std::fmt;

use crate::query::predicate::{Clause, Predicate};
use crate::types::{Iri, Value};

/// How strongly a predicate constrains its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hint {
    /// No predicate.
    None,
    /// `Lt`, `Gt` or `In`.
    Filter,
    /// `Prefix`.
    FilterPrefix,
    /// `Eq`.
    Match,
}

impl Hint {
    /// Classify an optional predicate.
    #[must_use]
    pub const fn of<T>(predicate: Option<&Predicate<T>>) -> Self {
        match Clause::of(predicate) {
            Clause::All => Self::None,
            Clause::Eq => Self::Match,
            Clause::Prefix => Self::FilterPrefix,
            Clause::Lt | Clause::Gt | Clause::In => Self::Filter,
        }
    }

    const fn tier(self) -> Tier {
        match self {
            Self::None => Tier::Free,
            Self::Filter | Self::FilterPrefix => Tier::Filter,
            Self::Match => Tier::Match,
        }
    }
}

/// Planner ranking of a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Free,
    Filter,
    Match,
}

/// The permutation index a pattern is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Unconstrained scan (evaluated over `SPO`).
    None,
    Spo,
    Sop,
    Pso,
    Pos,
    Ops,
    Osp,
}

impl Strategy {
    /// Field letters in nesting order.
    #[must_use]
    pub const fn fields(self) -> [Field; 3] {
        use Field::{O, P, S};
        match self {
            Self::None | Self::Spo => [S, P, O],
            Self::Sop => [S, O, P],
            Self::Pso => [P, S, O],
            Self::Pos => [P, O, S],
            Self::Ops => [O, P, S],
            Self::Osp => [O, S, P],
        }
    }

    fn select(s: Hint, p: Hint, o: Hint) -> Self {
        use Tier::{Filter as F, Free as N, Match as M};

        match (s.tier(), p.tier(), o.tier()) {
            // anchored on S
            (M, M | N, N) | (M, F, N) | (M, M, M | F) | (M, F, F) => Self::Spo,
            (M, N | F, M) | (M, N, F) => Self::Sop,
            // anchored on P
            (N | F, M, N) | (F, M, M | F) => Self::Pso,
            (N, M, M | F) => Self::Pos,
            // anchored on O
            (N, N | F, M) | (F, F, M) => Self::Ops,
            (F, N, M) => Self::Osp,
            // nothing to anchor on
            (N, N, N) => Self::None,
            // filters only
            (F, N | F, N) | (F, F, F) => Self::Spo,
            (F, N, F) => Self::Sop,
            (N, F, N) => Self::Pso,
            (N, F, F) => Self::Pos,
            (N, N, F) => Self::Ops,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Spo => "spo",
            Self::Sop => "sop",
            Self::Pso => "pso",
            Self::Pos => "pos",
            Self::Ops => "ops",
            Self::Osp => "osp",
        };
        f.write_str(name)
    }
}

/// One of the three statement positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    S,
    P,
    O,
}

impl Field {
    const fn letter(self) -> &'static str {
        match self {
            Self::S => "s",
            Self::P => "p",
            Self::O => "o",
        }
    }

    const fn mark(self) -> &'static str {
        match self {
            Self::S => "ˢ",
            Self::P => "ᴾ",
            Self::O => "º",
        }
    }
}

/// A planned query.
///
/// # Usage
///
/// ```
/// use hexastore::query::{Pattern, Predicate, Strategy};
///
/// let pattern = Pattern::new(
///     Some(Predicate::eq("u:A")),
///     Some(Predicate::prefix("f")),
///     None,
/// );
/// assert_eq!(pattern.strategy(), Strategy::Spo);
/// assert_eq!(pattern.to_string(), "(sᴾ) ⇒ o");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    s: Option<Predicate<Iri>>,
    p: Option<Predicate<Iri>>,
    o: Option<Predicate<Value>>,
    hint_for_s: Hint,
    hint_for_p: Hint,
    hint_for_o: Hint,
    strategy: Strategy,
}

impl Pattern {
    /// Build a pattern and plan it.
    #[must_use]
    pub fn new(
        s: Option<Predicate<Iri>>,
        p: Option<Predicate<Iri>>,
        o: Option<Predicate<Value>>,
    ) -> Self {
        let hint_for_s = Hint::of(s.as_ref());
        let hint_for_p = Hint::of(p.as_ref());
        let hint_for_o = Hint::of(o.as_ref());
        let strategy = Strategy::select(hint_for_s, hint_for_p, hint_for_o);
        Self {
            s,
            p,
            o,
            hint_for_s,
            hint_for_p,
            hint_for_o,
            strategy,
        }
    }

    /// The unconstrained pattern.
    #[must_use]
    pub fn all() -> Self {
        Self::new(None, None, None)
    }

    #[must_use]
    pub const fn s(&self) -> Option<&Predicate<Iri>> {
        self.s.as_ref()
    }

    #[must_use]
    pub const fn p(&self) -> Option<&Predicate<Iri>> {
        self.p.as_ref()
    }

    #[must_use]
    pub const fn o(&self) -> Option<&Predicate<Value>> {
        self.o.as_ref()
    }

    #[must_use]
    pub const fn hint_for_s(&self) -> Hint {
        self.hint_for_s
    }

    #[must_use]
    pub const fn hint_for_p(&self) -> Hint {
        self.hint_for_p
    }

    #[must_use]
    pub const fn hint_for_o(&self) -> Hint {
        self.hint_for_o
    }

    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    const fn hint(&self, field: Field) -> Hint {
        match field {
            Field::S => self.hint_for_s,
            Field::P => self.hint_for_p,
            Field::O => self.hint_for_o,
        }
    }
}

/// Build a pattern from optional S, P and O predicates.
#[must_use]
pub fn query(
    s: Option<Predicate<Iri>>,
    p: Option<Predicate<Iri>>,
    o: Option<Predicate<Value>>,
) -> Pattern {
    Pattern::new(s, p, o)
}

/// Renders the plan: exactly matched and prefix-filtered fields inside the
/// parentheses, range-filtered fields right after them, and free fields
/// after the arrow (`∅` when none are free). Fields appear in the index's
/// nesting order. A full scan renders as `∅ ⇒ spo`.
impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.strategy == Strategy::None {
            return f.write_str("∅ ⇒ spo");
        }

        let mut bound = String::new();
        let mut filtered = String::new();
        let mut free = String::new();

        for field in self.strategy.fields() {
            match self.hint(field) {
                Hint::Match => bound.push_str(field.letter()),
                Hint::FilterPrefix => bound.push_str(field.mark()),
                Hint::Filter => filtered.push_str(field.mark()),
                Hint::None => free.push_str(field.letter()),
            }
        }
        if free.is_empty() {
            free.push('∅');
        }

        write!(f, "({bound}){filtered} ⇒ {free}")
    }
}
