//! CSV import
//!
//! Reads RFC 4180 text (quoted fields, doubled quotes, CRLF or LF line ends) into a single
//! table. The first record is the header row; every following record is a body row. Records
//! may differ in length. Each cell's text is lexed into tokens like any other inline text.

use crate::common::dom_to_tree::append_text;
use crate::error::FormatError;
use crate::format::Format;
use lit_core::{Document, NodeId, NodeKind};

/// Parse CSV text into a document holding one table.
pub fn parse(source: &str) -> Result<Document, FormatError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source.as_bytes());

    let mut doc = Document::new();
    let mut rows = reader.records();
    let Some(header) = rows.next() else {
        return Ok(doc);
    };
    let header = header.map_err(csv_error)?;

    let table = doc.create(NodeKind::Table);
    doc.append_child(doc.root(), table)?;
    let head = doc.create(NodeKind::TableHead);
    doc.append_child(table, head)?;
    append_row(&mut doc, head, NodeKind::TableHeaderCell, header.iter())?;

    let body = doc.create(NodeKind::TableBody);
    doc.append_child(table, body)?;
    for record in rows {
        let record = record.map_err(csv_error)?;
        append_row(&mut doc, body, NodeKind::TableCell, record.iter())?;
    }
    Ok(doc)
}

fn csv_error(err: ::csv::Error) -> FormatError {
    FormatError::ParseError(format!("CSV: {err}"))
}

fn append_row<'a>(
    doc: &mut Document,
    parent: NodeId,
    cell_kind: NodeKind,
    cells: impl Iterator<Item = &'a str>,
) -> Result<(), FormatError> {
    let row = doc.create(NodeKind::TableRow);
    doc.append_child(parent, row)?;
    for text in cells {
        let cell = doc.create(cell_kind);
        doc.append_child(row, cell)?;
        append_text(doc, cell, text)?;
    }
    Ok(())
}

/// Format implementation for comma-separated tables (import only)
#[derive(Default)]
pub struct CsvFormat;

impl Format for CsvFormat {
    fn name(&self) -> &str {
        "csv"
    }

    fn description(&self) -> &str {
        "Comma-separated values, read as one table"
    }

    fn file_extensions(&self) -> &[&str] {
        &["csv"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        parse(source)
    }
}
