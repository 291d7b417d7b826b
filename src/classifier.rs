// SB8200 - Cable modem status collection
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Cell classification module
//!
//! This module decides, for each non-identifier cell of a channel table,
//! whether its text is a numeric observation or an opaque state value.
//!
//! Classification happens in two explicit steps:
//! 1. The text is matched against the numeric-cell pattern
//!    (`-?[0-9.]+`, optionally followed by a space and a unit).
//! 2. Matching text is parsed as `f64`; the unit suffix is discarded.
//!
//! Columns listed as discrete in the [`TableConfig`] skip both steps and
//! always come out as text.

use crate::config::TableConfig;
use crate::error::{Result, Sb8200Error};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Optional minus, digits and dots, then optionally " <unit>"
    static ref NUMERIC_CELL: Regex = Regex::new(r"(?s)^-?[0-9.]+(?: .*)?$").unwrap();
}

/// Typed value of one cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Numeric time-series value, unit stripped
    Numeric(f64),
    /// Opaque state text, kept verbatim
    Text(String),
}

impl CellValue {
    /// Check if the value is numeric
    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Numeric(_))
    }

    /// Numeric value, if any
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Numeric(v) => Some(*v),
            CellValue::Text(_) => None,
        }
    }
}

/// Check whether text has the shape of a numeric cell
pub fn looks_numeric(text: &str) -> bool {
    NUMERIC_CELL.is_match(text)
}

/// Parse one cell's text without any column context.
///
/// Returns [`CellValue::Text`] for anything that does not look numeric,
/// including the empty string. Text that looks numeric but does not parse
/// (`1.2.3`, `.`) is a [`Sb8200Error::Classification`]. A unit glued to
/// the number (`5.2dBmV`, `3abc`) does not match and stays state text.
pub fn parse_cell(header: &str, text: &str) -> Result<CellValue> {
    if !looks_numeric(text) {
        return Ok(CellValue::Text(text.to_string()));
    }

    let number = text.split(' ').next().unwrap_or(text);
    number
        .parse::<f64>()
        .map(CellValue::Numeric)
        .map_err(|_| Sb8200Error::Classification {
            header: header.to_string(),
            text: text.to_string(),
        })
}

/// Cell classifier bound to one table kind
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    config: &'a TableConfig,
}

impl<'a> Classifier<'a> {
    /// Create a classifier for a table configuration
    pub fn new(config: &'a TableConfig) -> Self {
        Self { config }
    }

    /// Classify a non-identifier cell.
    ///
    /// Discrete columns always yield text, even when every value in them
    /// looks numeric.
    pub fn classify(&self, header: &str, text: &str) -> Result<CellValue> {
        if self.config.is_discrete(header) {
            return Ok(CellValue::Text(text.to_string()));
        }
        parse_cell(header, text)
    }

    /// Get the table configuration
    pub fn config(&self) -> &TableConfig {
        self.config
    }
}
