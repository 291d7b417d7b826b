// SB8200 Exporter - Prometheus exporter for SB8200 cable modems
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Exporter configuration
//!
//! Built once from the command line at startup; never re-read per scrape.

use clap::ValueEnum;
use sb8200::{CollectorConfig, DEFAULT_PREFIX, STATUS_PATH};
use std::time::Duration;

/// URL scheme used to reach the modem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Scheme {
    /// Plain HTTP (older firmware)
    #[default]
    Http,
    /// HTTPS with the modem's self-signed certificate
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// Immutable exporter configuration
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    /// Modem host (and optional port)
    pub address: String,
    /// URL scheme
    pub scheme: Scheme,
    /// Username for the credential request
    pub username: String,
    /// Password; no credential is requested when absent
    pub password: Option<String>,
    /// Metric name prefix
    pub prefix: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Skip unknown tables instead of failing the scrape
    pub ignore_unknown_tables: bool,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            address: "192.168.100.1".to_string(),
            scheme: Scheme::Http,
            username: "admin".to_string(),
            password: None,
            prefix: DEFAULT_PREFIX.to_string(),
            timeout: Duration::from_secs(10),
            ignore_unknown_tables: false,
        }
    }
}

impl ExporterConfig {
    /// Create a configuration for a modem address
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    /// Full URL of the status page
    pub fn status_url(&self) -> String {
        format!("{}://{}{}", self.scheme.as_str(), self.address, STATUS_PATH)
    }

    /// Whether a credential has to be requested before each scrape
    pub fn authenticated(&self) -> bool {
        self.password.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Collector configuration derived from this exporter configuration
    pub fn collector_config(&self) -> CollectorConfig {
        CollectorConfig {
            prefix: self.prefix.clone(),
            ignore_unknown_tables: self.ignore_unknown_tables,
            ..Default::default()
        }
    }

    /// Name of the scrape duration self-metric
    pub fn scrape_duration_name(&self) -> String {
        format!("{}exporter_scrape_duration_seconds", self.prefix)
    }
}
