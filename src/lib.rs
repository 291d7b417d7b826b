//! # SB8200 - Cable modem status collection
//!
//! Turns the diagnostic status page of an Arris SB8200 cable modem into a
//! typed set of metric observations ready for a Prometheus exporter.
//!
//! ## Key Features
//!
//! - **Table extraction**: Header-keyed rows out of loosely structured HTML tables
//! - **Stable naming**: Column labels normalized to snake_case identifiers
//! - **Explicit classification**: Every cell is either numeric or state text
//! - **State records**: Textual fields exposed as labels on an always-1 gauge
//!
//! ## Quick Start
//!
//! ```rust
//! use sb8200::{Collector, MetricKind};
//!
//! let page = r#"
//! <table>
//!   <tr><th colspan="4">Downstream Bonded Channels</th></tr>
//!   <tr><td>Channel ID</td><td>Frequency</td><td>Corrected</td><td>Uncorrectables</td></tr>
//!   <tr><td>1</td><td>549000000 Hz</td><td>0</td><td>0</td></tr>
//! </table>"#;
//!
//! let observations = Collector::new().collect_page(page).unwrap();
//! assert_eq!(observations.len(), 2);
//! assert!(observations.iter().all(|o| o.kind == MetricKind::Counter));
//! ```
//!
//! ## Modules
//!
//! - [`header`]: Column label normalization
//! - [`table`]: Table extraction into header-keyed rows
//! - [`html`]: HTML page to raw tables
//! - [`classifier`]: Numeric vs. state cell classification
//! - [`builder`]: Row to observation building
//! - [`collector`]: Page-level routing by table title
//! - [`observation`]: Observation, label and metric kind types

// Modules
pub mod builder;
pub mod classifier;
pub mod collector;
pub mod config;
pub mod error;
pub mod header;
pub mod html;
pub mod observation;
pub mod table;

// Re-exports for convenient access
pub use builder::MetricBuilder;
pub use classifier::{parse_cell, CellValue, Classifier};
pub use collector::{
    Collector, TableKind, DOWNSTREAM_CHANNELS, STARTUP_PROCEDURE, UPSTREAM_CHANNELS,
};
pub use config::{CollectorConfig, TableConfig, DEFAULT_PREFIX};
pub use error::{Result, Sb8200Error};
pub use observation::{Labels, MetricKind, Observation};
pub use table::{RawTable, Row, Table, TableSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Path of the status page on the modem
pub const STATUS_PATH: &str = "/cmconnectionstatus.html";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_status_path() {
        assert!(STATUS_PATH.starts_with('/'));
    }
}
