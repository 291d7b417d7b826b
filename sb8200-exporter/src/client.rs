// SB8200 Exporter - Prometheus exporter for SB8200 cable modems
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Modem HTTP transport
//!
//! Fetches the status page, optionally after requesting a session
//! credential. The modem wants the `user:password` pair both as HTTP basic
//! auth and base64-encoded as the query string; it answers with an opaque
//! token that goes back as the `credential` cookie.
//!
//! The credential is short-lived and requested again on every scrape.

use crate::config::ExporterConfig;
use crate::error::{AuthError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

/// Marker text of the modem's login page
const LOGIN_PAGE_MARKER: &str = "Password:";

/// Browser-like headers; the modem's web server is picky about them
const BROWSER_HEADERS: &[(&str, &str)] = &[
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    ),
    ("accept-language", "en-US,en;q=0.5"),
    ("cache-control", "max-age="),
    ("connection", "keep-alive"),
    ("dnt", "1"),
    ("upgrade-insecure-requests", "1"),
    (
        "user-agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:82.0) Gecko/20100101 Firefox/82.0",
    ),
];

/// Check whether a response body is the login page
pub fn is_login_page(body: &str) -> bool {
    body.contains(LOGIN_PAGE_MARKER)
}

/// Base64 of `user:password`, as the modem expects in the query string
pub fn encode_login(username: &str, password: &str) -> String {
    STANDARD.encode(format!("{}:{}", username, password))
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    for &(name, value) in BROWSER_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    headers
}

/// HTTP client for one modem
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: Client,
    config: ExporterConfig,
}

impl DeviceClient {
    /// Create a client.
    ///
    /// Certificate validation is disabled: the modem only ever presents a
    /// self-signed certificate.
    pub fn new(config: ExporterConfig) -> Result<Self> {
        let http = Client::builder()
            .default_headers(browser_headers())
            .danger_accept_invalid_certs(true)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// Get the configuration
    pub fn config(&self) -> &ExporterConfig {
        &self.config
    }

    /// URL of the credential request
    pub fn credential_url(&self, password: &str) -> String {
        format!(
            "{}?{}",
            self.config.status_url(),
            encode_login(&self.config.username, password)
        )
    }

    /// Request a session credential
    pub async fn fetch_credential(&self, password: &str) -> std::result::Result<String, AuthError> {
        let response = self
            .http
            .get(self.credential_url(password))
            .basic_auth(&self.config.username, Some(password))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AuthError::Status(status));
        }

        let credential = response.text().await?;
        if is_login_page(&credential) {
            return Err(AuthError::LoginPage);
        }
        Ok(credential.trim().to_string())
    }

    /// Cookie header for the page request, if a credential can be had.
    ///
    /// Failures are logged and degrade to an unauthenticated request.
    async fn credential_cookie(&self) -> Option<HeaderValue> {
        let password = self.config.password.as_deref().filter(|p| !p.is_empty())?;

        let cookie = match self.fetch_credential(password).await {
            Ok(credential) => HeaderValue::from_str(&format!("credential={}", credential))
                .map_err(|_| AuthError::InvalidCredential),
            Err(e) => Err(e),
        };

        match cookie {
            Ok(value) => {
                debug!("Obtained credential from {}", self.config.address);
                Some(value)
            }
            Err(e) => {
                warn!(
                    "Error authenticating with {}: {}",
                    self.config.status_url(),
                    e
                );
                None
            }
        }
    }

    /// Fetch the raw HTML of the status page
    pub async fn fetch_page(&self) -> Result<String> {
        let mut request = self.http.get(self.config.status_url());
        if let Some(cookie) = self.credential_cookie().await {
            request = request.header(header::COOKIE, cookie);
        }

        let response = request.send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}
