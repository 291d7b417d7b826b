// SB8200 - Cable modem status collection
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Configuration types for SB8200 collection

use std::collections::BTreeSet;

/// Default metric name prefix
pub const DEFAULT_PREFIX: &str = "sb8200_";

/// Per-table-kind column configuration
///
/// Immutable once built; the builder only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableConfig {
    /// Columns that identify the row's entity; they only become labels
    pub identifiers: BTreeSet<String>,

    /// Numeric-looking columns kept as descriptive state
    pub discrete: BTreeSet<String>,

    /// Numeric columns exported as counters instead of gauges
    pub counters: BTreeSet<String>,
}

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl TableConfig {
    /// Create a configuration from plain header lists
    pub fn new(identifiers: &[&str], discrete: &[&str], counters: &[&str]) -> Self {
        Self {
            identifiers: set(identifiers),
            discrete: set(discrete),
            counters: set(counters),
        }
    }

    /// "Downstream Bonded Channels" table
    pub fn downstream() -> Self {
        Self::new(
            &["channel_id", "frequency"],
            &["frequency"],
            &["corrected", "uncorrectables"],
        )
    }

    /// "Upstream Bonded Channels" table
    pub fn upstream() -> Self {
        Self::new(
            &["channel_id", "frequency"],
            &["frequency", "symbol_rate"],
            &[],
        )
    }

    /// Check whether a header identifies the row
    pub fn is_identifier(&self, header: &str) -> bool {
        self.identifiers.contains(header)
    }

    /// Check whether a header is discrete
    pub fn is_discrete(&self, header: &str) -> bool {
        self.discrete.contains(header)
    }

    /// Check whether a header is a counter
    pub fn is_counter(&self, header: &str) -> bool {
        self.counters.contains(header)
    }
}

/// Collector-level configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    /// Prefix of every emitted metric name (default: "sb8200_")
    pub prefix: String,

    /// Skip tables with an unknown title instead of failing the cycle
    pub ignore_unknown_tables: bool,

    /// Columns of the downstream channel table
    pub downstream: TableConfig,

    /// Columns of the upstream channel table
    pub upstream: TableConfig,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            ignore_unknown_tables: false,
            downstream: TableConfig::downstream(),
            upstream: TableConfig::upstream(),
        }
    }
}

impl CollectorConfig {
    /// Create a configuration with a custom metric prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    /// Metric prefix for downstream channel metrics
    pub fn downstream_prefix(&self) -> String {
        format!("{}downstream_", self.prefix)
    }

    /// Metric prefix for upstream channel metrics
    pub fn upstream_prefix(&self) -> String {
        format!("{}upstream_", self.prefix)
    }

    /// Name of the page-wide state record
    pub fn state_name(&self) -> String {
        format!("{}state", self.prefix)
    }
}
