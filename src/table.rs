// SB8200 - Cable modem status collection
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Table extraction
//!
//! Turns a loosely structured HTML table into an ordered sequence of
//! header-keyed [`Row`]s. The extractor never sees HTML: it consumes
//! anything implementing [`TableSource`], which only has to hand out a
//! title and the text of every cell, row by row.
//!
//! # Example
//!
//! ```rust
//! use sb8200::{RawTable, Table};
//!
//! let raw = RawTable::new(
//!     Some("Downstream Bonded Channels"),
//!     vec![
//!         vec!["Channel ID", "Power"],
//!         vec![],
//!         vec!["1", "5.2 dBmV"],
//!     ],
//! );
//!
//! let table = Table::extract(&raw);
//! assert_eq!(table.headers(), ["channel_id", "power"]);
//! assert_eq!(table.rows().len(), 1);
//! assert_eq!(table.rows()[0].get("power"), Some("5.2 dBmV"));
//! ```

use crate::header;
use serde::Serialize;

/// Capability to enumerate the rows and cells of one table.
///
/// Cell text is expected to be the flattened text content of the cell;
/// the extractor trims it.
pub trait TableSource {
    /// Caption of the table, if it has one
    fn title(&self) -> Option<String>;

    /// Text of every cell, row by row, in document order
    fn rows(&self) -> Vec<Vec<String>>;
}

/// A table already reduced to plain cell text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Caption cell text
    pub title: Option<String>,
    /// Cell texts, row by row
    pub cells: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a raw table from anything string-like
    pub fn new<T, C>(title: Option<T>, cells: Vec<Vec<C>>) -> Self
    where
        T: Into<String>,
        C: Into<String>,
    {
        Self {
            title: title.map(Into::into),
            cells: cells
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }
}

impl TableSource for RawTable {
    fn title(&self) -> Option<String> {
        self.title.clone()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.cells.clone()
    }
}

/// One data row: normalized header name to raw cell text.
///
/// Keeps the order of the table's header row. Keys are unique; inserting an
/// existing key replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any earlier value under the same header
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        let header = header.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(h, _)| *h == header) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((header, value)),
        }
    }

    /// Get the raw text of a field
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    /// Check whether the row has a field
    pub fn contains(&self, header: &str) -> bool {
        self.get(header).is_some()
    }

    /// Iterate over `(header, text)` pairs in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether the row has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<H, V> FromIterator<(H, V)> for Row
where
    H: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (H, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (h, v) in iter {
            row.insert(h, v);
        }
        row
    }
}

/// Rows of one table sharing a single header schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    title: Option<String>,
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Extract a table from any [`TableSource`].
    ///
    /// The first row with at least one cell is the header row. Every later
    /// non-empty row is zipped positionally against it: missing trailing
    /// cells are left out of the row, extra cells are dropped. Rows with no
    /// cells are skipped.
    pub fn extract<S: TableSource + ?Sized>(source: &S) -> Self {
        let title = source.title().map(|t| t.trim().to_string());
        let mut headers: Vec<String> = Vec::new();
        let mut rows = Vec::new();

        for cells in source.rows() {
            if cells.is_empty() {
                continue;
            }
            if headers.is_empty() {
                headers = cells.iter().map(|c| header::normalize(c)).collect();
                continue;
            }
            let row: Row = headers
                .iter()
                .zip(cells.iter())
                .map(|(h, c)| (h.clone(), c.trim().to_string()))
                .collect();
            rows.push(row);
        }

        Self {
            title,
            headers,
            rows,
        }
    }

    /// Trimmed caption of the table
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Normalized header schema
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows in document order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}
