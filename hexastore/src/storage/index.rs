//! Permutation indexes.
//!
//! Each index is a three-level nested ordered map keyed by the
//! permutation's field order, bottoming out in a leaf map from K-order token
//! to credibility:
//!
//! ```text
//! outer[Field1] → middle[Field2] → inner[Field3] → leaf[K] → C
//! ```
//!
//! One generic [`Index`] serves all six permutations; a zero-sized
//! [`Layout`] type per permutation maps statements in and out of its field
//! order.
//!
//! # Invariants
//!
//! - No map at any level is empty: removing the last version of a triple
//!   prunes every map that becomes empty on the way up.

use std::fmt;

use rand::Rng;

use crate::query::Pattern;
use crate::query::Predicate;
use crate::storage::skiplist::SkipList;
use crate::types::{IndexKey, Iri, KOrder, Statement, Value};

/// Optional credibility stored per version.
pub type Credibility = Option<f64>;
/// Versions of one triple, keyed by K-order.
pub type Leaf = SkipList<KOrder, Credibility>;
/// Third level: `Field3 → versions`.
pub type Inner<C> = SkipList<C, Leaf>;
/// Second level: `Field2 → Field3 → versions`.
pub type Middle<B, C> = SkipList<B, Inner<C>>;
/// First level: `Field1 → Field2 → Field3 → versions`.
pub type Outer<A, B, C> = SkipList<A, Middle<B, C>>;

/// The three predicates of a pattern in a permutation's field order.
#[derive(Debug, Clone)]
pub struct Levels<A, B, C> {
    pub first: Option<Predicate<A>>,
    pub second: Option<Predicate<B>>,
    pub third: Option<Predicate<C>>,
}

impl<A, B, C> Default for Levels<A, B, C> {
    fn default() -> Self {
        Self {
            first: None,
            second: None,
            third: None,
        }
    }
}

/// Field order of one permutation index.
pub trait Layout: 'static {
    type A: IndexKey;
    type B: IndexKey;
    type C: IndexKey;

    /// The permutation this layout implements.
    const PERMUTATION: Permutation;

    /// Project a statement onto `(Field1, Field2, Field3)`.
    fn project(statement: &Statement) -> (&Self::A, &Self::B, &Self::C);

    /// Reorder a pattern's predicates into `(Field1, Field2, Field3)`.
    fn levels(pattern: &Pattern) -> Levels<Self::A, Self::B, Self::C>;

    /// Rebuild a statement from `(Field1, Field2, Field3)`.
    fn assemble(a: &Self::A, b: &Self::B, c: &Self::C, k: KOrder, credibility: Credibility)
    -> Statement;
}

/// Names of the six permutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permutation {
    Spo,
    Sop,
    Pso,
    Pos,
    Osp,
    Ops,
}

impl Permutation {
    /// Every permutation, in the order a statement is written.
    pub const WRITE_ORDER: [Self; 6] = [
        Self::Spo,
        Self::Sop,
        Self::Pos,
        Self::Pso,
        Self::Ops,
        Self::Osp,
    ];
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Spo => "spo",
            Self::Sop => "sop",
            Self::Pso => "pso",
            Self::Pos => "pos",
            Self::Osp => "osp",
            Self::Ops => "ops",
        };
        f.write_str(name)
    }
}

macro_rules! layout {
    (
        $(#[$meta:meta])*
        $name:ident, $perm:ident, ($a:ty, $b:ty, $c:ty),
        |$st:ident| ($fa:ident, $fb:ident, $fc:ident),
        |$pt:ident| ($la:ident, $lb:ident, $lc:ident)
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Layout for $name {
            type A = $a;
            type B = $b;
            type C = $c;

            const PERMUTATION: Permutation = Permutation::$perm;

            fn project($st: &Statement) -> (&$a, &$b, &$c) {
                (&$st.$fa, &$st.$fb, &$st.$fc)
            }

            fn levels($pt: &Pattern) -> Levels<$a, $b, $c> {
                Levels {
                    first: $pt.$la().cloned(),
                    second: $pt.$lb().cloned(),
                    third: $pt.$lc().cloned(),
                }
            }

            fn assemble($fa: &$a, $fb: &$b, $fc: &$c, k: KOrder, c: Credibility) -> Statement {
                Statement {
                    $fa: $fa.clone(),
                    $fb: $fb.clone(),
                    $fc: $fc.clone(),
                    c,
                    k,
                }
            }
        }
    };
}

layout!(
    /// `S → P → O`.
    Spo, Spo, (Iri, Iri, Value), |st| (s, p, o), |pattern| (s, p, o)
);
layout!(
    /// `S → O → P`.
    Sop, Sop, (Iri, Value, Iri), |st| (s, o, p), |pattern| (s, o, p)
);
layout!(
    /// `P → S → O`.
    Pso, Pso, (Iri, Iri, Value), |st| (p, s, o), |pattern| (p, s, o)
);
layout!(
    /// `P → O → S`.
    Pos, Pos, (Iri, Value, Iri), |st| (p, o, s), |pattern| (p, o, s)
);
layout!(
    /// `O → S → P`.
    Osp, Osp, (Value, Iri, Iri), |st| (o, s, p), |pattern| (o, s, p)
);
layout!(
    /// `O → P → S`.
    Ops, Ops, (Value, Iri, Iri), |st| (o, p, s), |pattern| (o, p, s)
);

/// One permutation index.
#[derive(Debug, Clone)]
pub struct Index<L: Layout> {
    root: Outer<L::A, L::B, L::C>,
    max_level: usize,
    /// Number of stored versions.
    len: usize,
}

impl<L: Layout> Index<L> {
    /// Create an empty index whose maps use towers of at most `max_level`.
    #[must_use]
    pub fn new(max_level: usize) -> Self {
        Self {
            root: SkipList::new(max_level),
            max_level,
            len: 0,
        }
    }

    /// Number of stored versions.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The outermost map.
    #[must_use]
    pub const fn root(&self) -> &Outer<L::A, L::B, L::C> {
        &self.root
    }

    /// Insert one version, creating the middle and inner maps on the way
    /// down when they are missing.
    pub fn insert<R: Rng + ?Sized>(&mut self, statement: &Statement, rng: &mut R) {
        let (a, b, c) = L::project(statement);
        let max_level = self.max_level;

        let middle = self
            .root
            .get_or_insert_with(a.clone(), || SkipList::new(max_level), rng);
        let inner = middle.get_or_insert_with(b.clone(), || SkipList::new(max_level), rng);
        let leaf = inner.get_or_insert_with(c.clone(), || SkipList::new(max_level), rng);
        if leaf.insert(statement.k, statement.c, rng).is_none() {
            self.len += 1;
        }
    }

    /// Remove one version. Returns whether it was present.
    pub fn remove(&mut self, statement: &Statement) -> bool {
        let (a, b, c) = L::project(statement);

        let Some(middle) = self.root.get_mut(a) else {
            return false;
        };
        let Some(inner) = middle.get_mut(b) else {
            return false;
        };
        let Some(leaf) = inner.get_mut(c) else {
            return false;
        };
        if leaf.remove(&statement.k).is_none() {
            return false;
        }

        if leaf.is_empty() {
            inner.remove(c);
        }
        if inner.is_empty() {
            middle.remove(b);
        }
        if middle.is_empty() {
            self.root.remove(a);
        }
        self.len -= 1;
        true
    }

    /// Check whether this exact version is present.
    #[must_use]
    pub fn contains(&self, statement: &Statement) -> bool {
        let (a, b, c) = L::project(statement);
        self.root
            .get(a)
            .and_then(|middle| middle.get(b))
            .and_then(|inner| inner.get(c))
            .is_some_and(|leaf| leaf.contains_key(&statement.k))
    }
}
