//! Shared helpers for the format integration tests.

use lit_babel::formats::common::render;
use lit_babel::formats::html;
use lit_babel::formats::lit::serializer::LitWriter;
use lit_babel::formats::tex::serializer::TexWriter;
use lit_core::{Document, WriteOpts};
use std::path::PathBuf;

/// Read a file from `tests/fixtures`.
pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("cannot read fixture {}: {err}", path.display()))
}

pub fn to_lit(doc: &Document) -> String {
    render(&mut LitWriter, doc, doc.root(), &WriteOpts::default())
}

pub fn to_tex(doc: &Document) -> String {
    render(&mut TexWriter, doc, doc.root(), &WriteOpts::default())
}

pub fn to_html(doc: &Document) -> String {
    html::write_body(doc, doc.root(), &WriteOpts::default())
}

/// Kinds, attributes, data and tokens of the whole tree, for structural comparison.
pub fn shape(doc: &Document) -> serde_json::Value {
    doc.to_json(doc.root())
}
