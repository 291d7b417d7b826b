// SB8200 Exporter - Prometheus exporter for SB8200 cable modems
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Error types for the SB8200 exporter

use thiserror::Error;

/// Errors that fail a scrape
#[derive(Error, Debug)]
pub enum ExporterError {
    /// Network or HTTP failure reaching the modem
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Page could not be turned into observations
    #[error("Collection error: {0}")]
    Collect(#[from] sb8200::Sb8200Error),

    /// Prometheus text encoding failed
    #[error("Encoding error: {0}")]
    Encode(#[from] prometheus::Error),

    /// JSON dump of observations failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Same metric name seen as gauge and counter
    #[error("Metric {name} registered as both gauge and counter")]
    KindMismatch { name: String },

    /// Listener or server failure
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Credential fetch failures.
///
/// Never fatal: the scrape goes on without a credential.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Request to the login URL failed
    #[error("Credential request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Login URL answered with a non-200 status
    #[error("Credential request returned {0}")]
    Status(reqwest::StatusCode),

    /// Modem answered with its login page
    #[error("Received login page, check username / password")]
    LoginPage,

    /// Credential cannot be sent as a cookie
    #[error("Credential is not a valid cookie value")]
    InvalidCredential,
}

/// Result type alias for exporter operations
pub type Result<T> = std::result::Result<T, ExporterError>;
