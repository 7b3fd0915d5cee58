//! JSON documents to statements.
//!
//! Each JSON object is one entity. A string `"@id"` (or `"id"`) names its
//! subject; objects without one, or with an id that is not a string, get a
//! blank node. Blank node ids come from a process-wide counter, so entities
//! decoded from separate documents never share a subject. Every other
//! property becomes one statement per value:
//!
//! | JSON value        | object of the statement           |
//! |-------------------|-----------------------------------|
//! | `true` / `false`  | `Boolean`                         |
//! | integral number   | `Integer`                         |
//! | other number      | `Double`                          |
//! | string            | `String`                          |
//! | object            | link to the nested entity         |
//! | array             | one statement per element         |
//! | `null`            | nothing                           |
//!
//! # Usage
//!
//! ```
//! use hexastore::codec::decode;
//!
//! let bag = decode(r#"{"@id": "u:A", "follows": {"@id": "u:B", "status": "b"}}"#)?;
//! assert_eq!(bag.len(), 2);
//! # Ok::<(), hexastore::codec::CodecError>(())
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Map, Value as Json};

use crate::types::{Bag, Iri, Statement, Value};

static BLANK_NODE_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_blank_node() -> Iri {
    let n = BLANK_NODE_COUNTER.fetch_add(1, Ordering::Relaxed);
    Iri::from(format!("_:b{n}"))
}

/// Errors from decoding a JSON document.
#[derive(Debug)]
pub enum CodecError {
    /// Well-formed JSON with no statement interpretation.
    Unsupported(String),
    /// Malformed JSON.
    Json(serde_json::Error),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(what) => write!(f, "unsupported document: {what}"),
            Self::Json(err) => write!(f, "invalid json: {err}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unsupported(_) => None,
            Self::Json(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Decode a JSON object, or an array of objects, into statements.
///
/// Statements come out depth first: a nested entity's own statements
/// precede the link that points at it.
///
/// # Errors
///
/// [`CodecError::Json`] for malformed input, [`CodecError::Unsupported`]
/// for a top-level scalar, `null`, or array element that is not an object.
pub fn decode(input: &str) -> Result<Bag, CodecError> {
    let document: Json = serde_json::from_str(input)?;
    let mut decoder = Decoder::default();

    match document {
        Json::Object(object) => {
            decoder.entity(object)?;
        }
        Json::Array(items) => {
            for item in items {
                match item {
                    Json::Object(object) => {
                        decoder.entity(object)?;
                    }
                    other => {
                        return Err(CodecError::Unsupported(format!(
                            "top-level array element of type {}",
                            kind(&other)
                        )));
                    }
                }
            }
        }
        other => {
            return Err(CodecError::Unsupported(format!(
                "top-level {}",
                kind(&other)
            )));
        }
    }

    tracing::debug!(
        statements = decoder.bag.len(),
        blank_nodes = decoder.blank_nodes,
        "decoded json document"
    );
    Ok(decoder.bag)
}

#[derive(Debug, Default)]
struct Decoder {
    bag: Bag,
    blank_nodes: usize,
}

impl Decoder {
    /// Decode one object and return its subject.
    fn entity(&mut self, object: Map<String, Json>) -> Result<Iri, CodecError> {
        let s = self.subject(&object);
        for (key, value) in object {
            if is_id(&key) {
                continue;
            }
            self.property(&s, &Iri::from(key), value)?;
        }
        Ok(s)
    }

    fn subject(&mut self, object: &Map<String, Json>) -> Iri {
        if let Some(Json::String(id)) = object.get("@id").or_else(|| object.get("id")) {
            return Iri::from(id.as_str());
        }
        self.blank_nodes += 1;
        next_blank_node()
    }

    fn property(&mut self, s: &Iri, p: &Iri, value: Json) -> Result<(), CodecError> {
        let o = match value {
            Json::Null => return Ok(()),
            Json::Bool(b) => Value::Boolean(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map(Value::Double).ok_or_else(|| {
                    CodecError::Unsupported(format!("number {n} out of range"))
                })?,
            },
            Json::String(text) => Value::string(text),
            Json::Object(object) => Value::AnyUri(self.entity(object)?),
            Json::Array(items) => {
                for item in items {
                    self.property(s, p, item)?;
                }
                return Ok(());
            }
        };
        self.bag.push(Statement::new(s.clone(), p.clone(), o));
        Ok(())
    }
}

fn is_id(key: &str) -> bool {
    key == "@id" || key == "id"
}

const fn kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    fn rendered(bag: &Bag) -> Vec<String> {
        bag.iter()
            .map(|st| format!("{} {} {}", st.s, st.p, st.o))
            .collect()
    }

    #[test]
    fn test_scalar_properties() {
        let bag = decode(
            r#"{"@id": "u:A", "active": true, "age": 42, "name": "Ann", "score": 0.5}"#,
        )
        .expect("decode");

        assert_eq!(bag[0].o, Value::Boolean(true));
        assert_eq!(bag[1].o, Value::Integer(42));
        assert_eq!(bag[2].o, Value::string("Ann"));
        assert_eq!(bag[3].o, Value::Double(0.5));
        assert!(bag.iter().all(|st| st.s.as_str() == "u:A"));
    }

    #[test]
    fn test_plain_id_key() {
        let bag = decode(r#"{"id": "u:A", "status": "a"}"#).expect("decode");
        assert_eq!(rendered(&bag), vec!["u:A status \"a\""]);
    }

    #[test]
    fn test_nested_objects_become_links() {
        let bag = decode(r#"{"@id": "u:A", "follows": {"@id": "u:B", "status": "b"}}"#)
            .expect("decode");
        assert_eq!(
            rendered(&bag),
            vec!["u:B status \"b\"", "u:A follows <u:B>"]
        );
    }

    #[test]
    fn test_anonymous_objects_get_blank_nodes() {
        let bag = decode(r#"[{"status": "x"}, {"status": "y"}]"#).expect("decode");
        assert!(bag[0].s.is_blank());
        assert!(bag[1].s.is_blank());
        assert_ne!(bag[0].s, bag[1].s);
    }

    #[test]
    fn test_blank_nodes_are_unique_across_documents() {
        let first = decode(r#"{"name": "alice"}"#).expect("decode");
        let second = decode(r#"{"name": "bob"}"#).expect("decode");
        assert_ne!(first[0].s, second[0].s);
    }

    #[test]
    fn test_arrays_fan_out_and_nulls_vanish() {
        let bag = decode(r#"{"@id": "u:A", "tag": ["x", null, ["y"]], "gone": null}"#)
            .expect("decode");
        assert_eq!(
            rendered(&bag),
            vec!["u:A tag \"x\"", "u:A tag \"y\""]
        );
    }

    #[test]
    fn test_top_level_scalar_is_unsupported() {
        for input in ["42", "null", "\"u:A\"", "[1]"] {
            let err = decode(input).expect_err(input);
            assert!(matches!(err, CodecError::Unsupported(_)), "{input}: {err}");
        }
    }

    #[test]
    fn test_non_string_id_gets_blank_node() {
        let bag = decode(r#"{"@id": 7, "status": "x"}"#).expect("decode");
        assert_eq!(bag.len(), 1);
        assert!(bag[0].s.is_blank());
        assert_eq!(bag[0].p.as_str(), "status");
    }

    #[test]
    fn test_malformed_json() {
        let err = decode("{\"@id\": ").expect_err("truncated");
        assert!(matches!(err, CodecError::Json(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_statements_are_unstamped() {
        let bag = decode(r#"{"@id": "u:A", "status": "a"}"#).expect("decode");
        assert!(!bag[0].k.is_assigned());
        assert_eq!(bag[0].c, None);
    }
}
