//! Error types for engine and persistence operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::stats::StatField;

/// A draw was attempted on a shoe with no cards left.
///
/// A fresh shoe holds far more cards than a single round can use, so this
/// signals a logic defect and aborts the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no cards left in the shoe")]
pub struct EmptyShoeError;

/// Errors that can occur while reading or writing the stats record.
#[derive(Debug, Error)]
pub enum StatsError {
    /// A known field carries a value that is not a non-negative integer.
    #[error("line {line}: cannot parse `{value}` as the value of `{field}`")]
    Malformed {
        /// One-based line number in the record.
        line: usize,
        /// The field being parsed.
        field: StatField,
        /// The raw text that failed to parse.
        value: String,
    },
    /// A field is absent from the record.
    #[error("field `{0}` is missing from the stats record")]
    MissingField(StatField),
    /// A field appears more than once.
    #[error("field `{0}` appears more than once in the stats record")]
    DuplicateField(StatField),
    /// The record stayed missing or locked through every retry.
    #[error("stats record {} unavailable after {attempts} attempts", path.display())]
    Unavailable {
        /// Location of the record.
        path: PathBuf,
        /// Number of attempts made.
        attempts: u32,
        /// The last error observed.
        #[source]
        source: io::Error,
    },
    /// Any other I/O failure.
    #[error("stats record {} could not be accessed", path.display())]
    Io {
        /// Location of the record.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

impl StatsError {
    /// Returns whether the error means the record does not exist at all.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Unavailable { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Errors returned by [`Game`](crate::Game) operations.
#[derive(Debug, Error)]
pub enum GameError {
    /// The operation is not allowed in the current game state.
    #[error("invalid game state for this action")]
    InvalidState,
    /// The shoe ran out mid-round.
    #[error(transparent)]
    EmptyShoe(#[from] EmptyShoeError),
    /// The stats record could not be loaded.
    #[error(transparent)]
    Stats(#[from] StatsError),
}
