// SB8200 - Cable modem status collection
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Page collection
//!
//! The [`Collector`] walks every table of the status page and routes it by
//! title:
//!
//! | Title                        | Handling                                  |
//! |------------------------------|-------------------------------------------|
//! | `Startup Procedure`          | flattened into one page-wide state record |
//! | `Downstream Bonded Channels` | per-channel metrics, `downstream_` prefix |
//! | `Upstream Bonded Channels`   | per-channel metrics, `upstream_` prefix   |
//! | anything else                | [`Sb8200Error::Schema`]                   |
//!
//! Tables without a caption are skipped. Each call is a fresh, independent
//! collection cycle; the collector holds nothing but its configuration.
//!
//! # Example
//!
//! ```rust
//! use sb8200::{Collector, RawTable};
//!
//! let startup = RawTable::new(
//!     Some("Startup Procedure"),
//!     vec![
//!         vec!["Procedure", "Status"],
//!         vec!["Acquire Downstream Channel", "Locked"],
//!     ],
//! );
//!
//! let observations = Collector::new().collect_tables(&[startup]).unwrap();
//! assert_eq!(observations.len(), 1);
//! assert_eq!(observations[0].name, "sb8200_state");
//! assert_eq!(
//!     observations[0].labels.get("acquire_downstream_channel_status"),
//!     Some("Locked")
//! );
//! ```

use crate::builder::MetricBuilder;
use crate::config::CollectorConfig;
use crate::error::{Result, Sb8200Error};
use crate::header;
use crate::html;
use crate::observation::{Labels, Observation};
use crate::table::{Row, Table, TableSource};
use std::collections::HashSet;

/// Caption of the startup log table
pub const STARTUP_PROCEDURE: &str = "Startup Procedure";

/// Caption of the downstream channel table
pub const DOWNSTREAM_CHANNELS: &str = "Downstream Bonded Channels";

/// Caption of the upstream channel table
pub const UPSTREAM_CHANNELS: &str = "Upstream Bonded Channels";

/// Column naming each step of the startup log
const PROCEDURE: &str = "procedure";

/// Known table kinds on the status page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// Startup log, merged into the page-wide state
    StartupProcedure,
    /// Downstream bonded channels
    Downstream,
    /// Upstream bonded channels
    Upstream,
}

impl TableKind {
    /// Route a table by its (trimmed) caption
    pub fn from_title(title: &str) -> Option<Self> {
        match title.trim() {
            STARTUP_PROCEDURE => Some(TableKind::StartupProcedure),
            DOWNSTREAM_CHANNELS => Some(TableKind::Downstream),
            UPSTREAM_CHANNELS => Some(TableKind::Upstream),
            _ => None,
        }
    }
}

/// Status page collector
#[derive(Debug, Clone, Default)]
pub struct Collector {
    config: CollectorConfig,
}

impl Collector {
    /// Create a collector with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collector with a custom configuration
    pub fn with_config(config: CollectorConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Parse an HTML status page and collect its observations
    pub fn collect_page(&self, document: &str) -> Result<Vec<Observation>> {
        let tables = html::parse_tables(document);
        self.collect_tables(&tables)
    }

    /// Collect observations from already-parsed tables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a captioned table has an unknown title (unless
    ///   `ignore_unknown_tables` is set)
    /// - a channel cell looks numeric but does not parse
    /// - the page yields the same name and labels twice, within one table
    ///   or across tables
    pub fn collect_tables<S: TableSource>(&self, sources: &[S]) -> Result<Vec<Observation>> {
        let mut observations = Vec::new();
        let mut page_state = Labels::new();

        for source in sources {
            let table = Table::extract(source);
            let Some(title) = table.title() else {
                continue;
            };

            match TableKind::from_title(title) {
                Some(TableKind::StartupProcedure) => {
                    merge_startup(table.rows(), &mut page_state);
                }
                Some(TableKind::Downstream) => {
                    let builder =
                        MetricBuilder::new(self.config.downstream_prefix(), &self.config.downstream);
                    observations.extend(builder.build(table.rows())?);
                }
                Some(TableKind::Upstream) => {
                    let builder =
                        MetricBuilder::new(self.config.upstream_prefix(), &self.config.upstream);
                    observations.extend(builder.build(table.rows())?);
                }
                None if self.config.ignore_unknown_tables => {
                    #[cfg(feature = "logging")]
                    log::warn!("Skipping unrecognized table {:?}", title);
                }
                None => {
                    return Err(Sb8200Error::Schema {
                        title: title.to_string(),
                    });
                }
            }
        }

        if !page_state.is_empty() {
            observations.push(Observation::state(self.config.state_name(), page_state));
        }
        ensure_unique(&observations)?;

        #[cfg(feature = "logging")]
        log::debug!(
            "Collected {} observations from {} tables",
            observations.len(),
            sources.len()
        );

        Ok(observations)
    }
}

/// Reject a collection pass that repeats a name and label set
fn ensure_unique(observations: &[Observation]) -> Result<()> {
    let mut seen = HashSet::with_capacity(observations.len());
    for observation in observations {
        if !seen.insert(observation.identity()) {
            return Err(Sb8200Error::DuplicateObservation {
                name: observation.name.clone(),
            });
        }
    }
    Ok(())
}

/// Flatten startup log rows into `<procedure>_<column>` state labels
fn merge_startup(rows: &[Row], state: &mut Labels) {
    for row in rows {
        let Some(procedure) = row.get(PROCEDURE) else {
            #[cfg(feature = "logging")]
            log::debug!("Startup row without a procedure column, skipping");
            continue;
        };
        let prefix = header::normalize(procedure);
        for (column, value) in row.iter() {
            if column == PROCEDURE {
                continue;
            }
            state.insert(format!("{}_{}", prefix, column), value);
        }
    }
}
