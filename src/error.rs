//! Error types for SB8200 collection
//!
//! This module defines the errors that abort a collection cycle.
//! Short rows, empty cells and a missing startup table are tolerated
//! and never surface here.

use thiserror::Error;

/// Result type alias for collection operations
pub type Result<T> = std::result::Result<T, Sb8200Error>;

/// Main error type for a collection cycle
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Sb8200Error {
    /// The page contains a table the collector does not know how to route.
    /// Usually means the modem firmware changed its status page.
    #[error("Schema error: unrecognized table {title:?}")]
    Schema { title: String },

    /// A cell looked numeric but could not be parsed as a number
    #[error("Classification error: cannot parse {text:?} in column {header:?}")]
    Classification { header: String, text: String },

    /// The same name+labels pair was produced twice in one pass
    #[error("Duplicate observation: {name}")]
    DuplicateObservation { name: String },
}
