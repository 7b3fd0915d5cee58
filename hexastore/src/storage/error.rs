//! Store error types.

use std::fmt;

use crate::storage::index::Permutation;
use crate::types::Statement;

/// Errors from writing to or removing from the permutation indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A per-index write failed. Earlier indexes were compensated.
    WriteFailed { permutation: Permutation },
    /// A compensating removal failed.
    CutFailed { permutation: Permutation },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed { permutation } => {
                write!(f, "write to {permutation} index failed")
            }
            Self::CutFailed { permutation } => {
                write!(f, "compensating cut from {permutation} index failed")
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// A batch insert that stopped early.
#[derive(Debug, Clone, PartialEq)]
pub struct AddError {
    /// Statements not stored, starting with the one that failed.
    pub remainder: Vec<Statement>,
    /// Why the first remaining statement failed.
    pub source: StoreError,
}

impl fmt::Display for AddError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "batch stopped with {} statements unprocessed: {}",
            self.remainder.len(),
            self.source
        )
    }
}

impl std::error::Error for AddError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl From<AddError> for StoreError {
    fn from(err: AddError) -> Self {
        err.source
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::WriteFailed {
            permutation: Permutation::Pos,
        };
        assert_eq!(err.to_string(), "write to pos index failed");
    }

    #[test]
    fn test_add_error_exposes_source() {
        let err = AddError {
            remainder: vec![Statement::link("u:A", "follows", "u:B")],
            source: StoreError::WriteFailed {
                permutation: Permutation::Spo,
            },
        };
        assert_eq!(
            err.to_string(),
            "batch stopped with 1 statements unprocessed: write to spo index failed"
        );
        assert!(err.source().is_some());
        assert_eq!(StoreError::from(err), StoreError::WriteFailed {
            permutation: Permutation::Spo,
        });
    }
}
