//! The planner's full decision table and its renderings.
//!
//! Row key: `M` exact match, `F` range filter, `-` no predicate.

use crate::query::{Hint, Pattern, Predicate, Strategy};
use crate::simulation::InvariantChecker;
use crate::testing::{init_tracing, social_graph, store_with};
use crate::types::{Iri, Value};

const TABLE: [(&str, Strategy, &str); 27] = [
    // exact match on S
    ("MM-", Strategy::Spo, "(sp) ⇒ o"),
    ("M--", Strategy::Spo, "(s) ⇒ po"),
    ("MF-", Strategy::Spo, "(s)ᴾ ⇒ o"),
    ("MMM", Strategy::Spo, "(spo) ⇒ ∅"),
    ("MMF", Strategy::Spo, "(sp)º ⇒ ∅"),
    ("MFF", Strategy::Spo, "(s)ᴾº ⇒ ∅"),
    ("M-M", Strategy::Sop, "(so) ⇒ p"),
    ("MFM", Strategy::Sop, "(so)ᴾ ⇒ ∅"),
    ("M-F", Strategy::Sop, "(s)º ⇒ p"),
    // exact match on P
    ("-M-", Strategy::Pso, "(p) ⇒ so"),
    ("FM-", Strategy::Pso, "(p)ˢ ⇒ o"),
    ("FMM", Strategy::Pso, "(po)ˢ ⇒ ∅"),
    ("FMF", Strategy::Pso, "(p)ˢº ⇒ ∅"),
    ("-MM", Strategy::Pos, "(po) ⇒ s"),
    ("-MF", Strategy::Pos, "(p)º ⇒ s"),
    // exact match on O
    ("--M", Strategy::Ops, "(o) ⇒ ps"),
    ("-FM", Strategy::Ops, "(o)ᴾ ⇒ s"),
    ("FFM", Strategy::Ops, "(o)ᴾˢ ⇒ ∅"),
    ("F-M", Strategy::Osp, "(o)ˢ ⇒ p"),
    // no exact match
    ("---", Strategy::None, "∅ ⇒ spo"),
    ("F--", Strategy::Spo, "()ˢ ⇒ po"),
    ("FF-", Strategy::Spo, "()ˢᴾ ⇒ o"),
    ("FFF", Strategy::Spo, "()ˢᴾº ⇒ ∅"),
    ("F-F", Strategy::Sop, "()ˢº ⇒ p"),
    ("-F-", Strategy::Pso, "()ᴾ ⇒ so"),
    ("-FF", Strategy::Pos, "()ᴾº ⇒ s"),
    ("--F", Strategy::Ops, "()º ⇒ ps"),
];

fn predicate<T>(code: u8, eq: T, filter: Predicate<T>) -> Option<Predicate<T>> {
    match code {
        b'M' => Some(Predicate::Eq(eq)),
        b'F' => Some(filter),
        _ => None,
    }
}

/// Build a row's pattern over the social graph vocabulary, using `range`
/// or `prefix` predicates for the `F` positions.
fn pattern(row: &str, prefix: bool) -> Pattern {
    let [s, p, o] = *row.as_bytes() else {
        panic!("row {row} must have three fields");
    };
    let (fs, fp, fo) = if prefix {
        (
            Predicate::prefix("s:"),
            Predicate::prefix("f"),
            Predicate::prefix(Value::iri("u:")),
        )
    } else {
        (
            Predicate::gt("s:"),
            Predicate::lt("g"),
            Predicate::in_range(Value::iri("s:"), Value::iri("u:E")),
        )
    };
    Pattern::new(
        predicate(s, Iri::from("s:C"), fs),
        predicate(p, Iri::from("follows"), fp),
        predicate(o, Value::iri("u:B"), fo),
    )
}

#[test]
fn test_every_row_plans_and_renders() {
    for (row, strategy, rendered) in TABLE {
        let pattern = pattern(row, false);
        assert_eq!(pattern.strategy(), strategy, "row {row}");
        assert_eq!(pattern.to_string(), rendered, "row {row}");
    }
}

#[test]
fn test_prefix_filters_plan_like_ranges() {
    for (row, strategy, _) in TABLE {
        assert_eq!(pattern(row, true).strategy(), strategy, "row {row}");
    }
}

#[test]
fn test_prefix_filters_render_inside_parentheses() {
    let rendered: Vec<String> = ["MF-", "FM-", "FFM", "F-F", "---"]
        .iter()
        .map(|row| pattern(row, true).to_string())
        .collect();
    assert_eq!(
        rendered,
        vec!["(sᴾ) ⇒ o", "(pˢ) ⇒ o", "(oᴾˢ) ⇒ ∅", "(ˢº) ⇒ p", "∅ ⇒ spo"]
    );
}

#[test]
fn test_hints_per_row() {
    for (row, _, _) in TABLE {
        let pattern = pattern(row, false);
        let hints = [pattern.hint_for_s(), pattern.hint_for_p(), pattern.hint_for_o()];
        for (code, hint) in row.bytes().zip(hints) {
            let expected = match code {
                b'M' => Hint::Match,
                b'F' => Hint::Filter,
                _ => Hint::None,
            };
            assert_eq!(hint, expected, "row {row}");
        }
    }
}

#[test]
fn test_every_row_matches_the_oracle() {
    init_tracing();
    let store = store_with(3, social_graph());
    let mut checker = InvariantChecker::new();

    for (row, _, _) in TABLE {
        checker.check_pattern(&store, &pattern(row, false));
        checker.check_pattern(&store, &pattern(row, true));
    }
    assert!(!checker.has_violations(), "{:?}", checker.violations());
}
