// SB8200 - Cable modem status collection
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Metric building
//!
//! The [`MetricBuilder`] turns the rows of one channel table into
//! [`Observation`]s:
//!
//! - identifier columns become the labels shared by every observation of
//!   the row;
//! - numeric columns become one gauge or counter each, named
//!   `<prefix><header>`;
//! - everything else is gathered into one `<prefix>state` record per row.
//!
//! # Example
//!
//! ```rust
//! use sb8200::{MetricBuilder, MetricKind, Row, TableConfig};
//!
//! let config = TableConfig::downstream();
//! let builder = MetricBuilder::new("sb8200_downstream_", &config);
//!
//! let row: Row = [("channel_id", "1"), ("frequency", "549000000 Hz"), ("corrected", "15")]
//!     .into_iter()
//!     .collect();
//!
//! let observations = builder.build(&[row]).unwrap();
//! assert_eq!(observations.len(), 1);
//! assert_eq!(observations[0].name, "sb8200_downstream_corrected");
//! assert_eq!(observations[0].kind, MetricKind::Counter);
//! assert_eq!(observations[0].value, 15.0);
//! ```

use crate::classifier::{CellValue, Classifier};
use crate::config::TableConfig;
use crate::error::{Result, Sb8200Error};
use crate::observation::{Labels, Observation};
use crate::table::Row;
use std::collections::HashSet;

/// Builds observations for the rows of one table kind
#[derive(Debug, Clone)]
pub struct MetricBuilder<'a> {
    prefix: String,
    config: &'a TableConfig,
}

impl<'a> MetricBuilder<'a> {
    /// Create a builder emitting names under `prefix`
    pub fn new(prefix: impl Into<String>, config: &'a TableConfig) -> Self {
        Self {
            prefix: prefix.into(),
            config,
        }
    }

    /// Name of the per-row state record
    pub fn state_name(&self) -> String {
        format!("{}state", self.prefix)
    }

    /// Build observations for every row.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a non-discrete cell looks numeric but does not parse
    /// - two rows produce the same name and labels
    pub fn build(&self, rows: &[Row]) -> Result<Vec<Observation>> {
        let mut observations = Vec::new();
        let mut seen = HashSet::new();

        for row in rows {
            for observation in self.build_row(row)? {
                if !seen.insert(observation.identity()) {
                    return Err(Sb8200Error::DuplicateObservation {
                        name: observation.name,
                    });
                }
                observations.push(observation);
            }
        }

        Ok(observations)
    }

    /// Build the observations of a single row
    pub fn build_row(&self, row: &Row) -> Result<Vec<Observation>> {
        let classifier = Classifier::new(self.config);
        let labels = self.identifier_labels(row);
        let mut observations = Vec::new();
        let mut state = Labels::new();

        for (header, text) in row.iter() {
            if self.config.is_identifier(header) {
                continue;
            }
            match classifier.classify(header, text)? {
                CellValue::Numeric(value) => {
                    let name = format!("{}{}", self.prefix, header);
                    let observation = if self.config.is_counter(header) {
                        Observation::counter(name, value, labels.clone())
                    } else {
                        Observation::gauge(name, value, labels.clone())
                    };
                    observations.push(observation);
                }
                CellValue::Text(text) => state.insert(header, text),
            }
        }

        if !state.is_empty() {
            let mut state_labels = labels;
            state_labels.extend_from(&state);
            observations.push(Observation::state(self.state_name(), state_labels));
        }

        Ok(observations)
    }

    /// Identifier columns present in the row, in row order
    fn identifier_labels(&self, row: &Row) -> Labels {
        row.iter()
            .filter(|(header, _)| self.config.is_identifier(header))
            .collect()
    }
}
