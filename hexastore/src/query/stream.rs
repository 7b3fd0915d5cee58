//! Statement streams and residual filters.
//!
//! A stream is any iterator of [`Statement`]s. The `Head`/`Next` cursor pair
//! of a classic stream interface is `Iterator::next`; [`Stream::fmap`] adds
//! the fold-with-early-exit consumer.

use std::fmt;

use crate::query::pattern::Hint;
use crate::query::predicate::Predicate;
use crate::types::{IndexKey, Iri, Statement, Value};

/// A stream of statements.
pub trait Stream: Iterator<Item = Statement> {
    /// Apply `f` to every remaining statement, stopping at the first error.
    fn fmap<E, F>(&mut self, f: F) -> Result<(), E>
    where
        Self: Sized,
        F: FnMut(Statement) -> Result<(), E>,
    {
        self.try_for_each(f)
    }
}

impl<I: Iterator<Item = Statement>> Stream for I {}

/// A type-erased stream borrowing from a store.
pub type BoxStream<'a> = Box<dyn Stream + 'a>;

/// Skips statements that fail a predicate function.
pub struct Filter<S, F> {
    predicate: F,
    stream: S,
}

impl<S, F> Filter<S, F>
where
    S: Stream,
    F: FnMut(&Statement) -> bool,
{
    #[must_use]
    pub const fn new(predicate: F, stream: S) -> Self {
        Self { predicate, stream }
    }
}

impl<S, F> Iterator for Filter<S, F>
where
    S: Stream,
    F: FnMut(&Statement) -> bool,
{
    type Item = Statement;

    fn next(&mut self) -> Option<Statement> {
        let predicate = &mut self.predicate;
        self.stream.by_ref().find(|st| predicate(st))
    }
}

impl<S, F> fmt::Debug for Filter<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("predicate", &"<fn>")
            .finish_non_exhaustive()
    }
}

/// Narrow `stream` by a subject predicate.
#[must_use]
pub fn filter_by_subject<'a>(
    hint: Hint,
    predicate: Option<Predicate<Iri>>,
    stream: BoxStream<'a>,
) -> BoxStream<'a> {
    filter_by(hint, predicate, |st| &st.s, stream)
}

/// Narrow `stream` by a predicate-field predicate.
#[must_use]
pub fn filter_by_predicate<'a>(
    hint: Hint,
    predicate: Option<Predicate<Iri>>,
    stream: BoxStream<'a>,
) -> BoxStream<'a> {
    filter_by(hint, predicate, |st| &st.p, stream)
}

/// Narrow `stream` by an object predicate.
#[must_use]
pub fn filter_by_object<'a>(
    hint: Hint,
    predicate: Option<Predicate<Value>>,
    stream: BoxStream<'a>,
) -> BoxStream<'a> {
    filter_by(hint, predicate, |st| &st.o, stream)
}

/// Translate a field's hint into a filter. `Hint::None` passes the stream
/// through, `Match` tests equality, `FilterPrefix` tests the prefix and
/// `Filter` applies the range clause.
fn filter_by<'a, T, G>(
    hint: Hint,
    predicate: Option<Predicate<T>>,
    field: G,
    stream: BoxStream<'a>,
) -> BoxStream<'a>
where
    T: IndexKey,
    G: Fn(&Statement) -> &T + 'static,
{
    let Some(predicate) = predicate else {
        return stream;
    };
    match (hint, predicate) {
        (Hint::None, _) => stream,
        (Hint::Match, Predicate::Eq(v)) => {
            Box::new(Filter::new(move |st: &Statement| *field(st) == v, stream))
        }
        (Hint::FilterPrefix, Predicate::Prefix(v)) => Box::new(Filter::new(
            move |st: &Statement| field(st).has_prefix(&v),
            stream,
        )),
        (_, predicate) => Box::new(Filter::new(
            move |st: &Statement| predicate.matches(field(st)),
            stream,
        )),
    }
}
