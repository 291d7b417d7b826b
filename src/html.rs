//! HTML page adapter
//!
//! Reduces the modem's status page to [`RawTable`]s using the `scraper`
//! crate. For every `<table>`:
//! - the title is the text of its first `<th>` descendant;
//! - each `<tr>` descendant becomes one row of `<td>` cell texts.
//!
//! Rows holding only `<th>` cells (the caption row) come out empty and are
//! skipped later by the extractor.

use crate::table::RawTable;
use scraper::{ElementRef, Html, Selector};

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Flattened text content of an element
fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Parse an HTML document and return every table in document order
pub fn parse_tables(document: &str) -> Vec<RawTable> {
    let html = Html::parse_document(document);
    let table_sel = selector("table");
    let th_sel = selector("th");
    let tr_sel = selector("tr");
    let td_sel = selector("td");

    html.select(&table_sel)
        .map(|table| {
            let title = table
                .select(&th_sel)
                .next()
                .map(|th| text_of(th).trim().to_string());
            let cells: Vec<Vec<String>> = table
                .select(&tr_sel)
                .map(|tr| tr.select(&td_sel).map(text_of).collect::<Vec<_>>())
                .collect();
            RawTable { title, cells }
        })
        .collect()
}
