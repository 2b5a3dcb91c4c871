//! Conversion outcomes.

use std::fmt;

use zarr_store::StoreReport;

/// Result of a source → store conversion.
#[derive(Debug)]
pub enum ConvertOutcome {
    /// The dataset was persisted.
    Stored(StoreReport),
    /// Nothing was persisted; an expected, user-correctable condition.
    Skipped(SkipReason),
}

/// Why a conversion produced no store. These are recoverable states, not
/// failures: the remediation is a corrected re-run.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The source file has variable/dimension name collisions and no
    /// refactor names were supplied.
    UnresolvedCollision { names: Vec<String> },
    /// The key/value filter matched no fields.
    UnderSelected { filter: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnresolvedCollision { names } => write!(
                f,
                "variables sharing a name with one of their dimensions cannot be loaded; \
                 re-run with the refactor flag naming them: -d {}",
                names.join(" ")
            ),
            SkipReason::UnderSelected { filter } => write!(
                f,
                "the key/value filter matched no fields ({}); \
                 re-run with -k/-v pairs that select at least one field",
                filter
            ),
        }
    }
}
