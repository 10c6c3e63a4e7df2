//! Multi-format interoperability for lit documents
//!
//!     This crate turns text into a lit [`Document`] and back. lit-core owns the tree, the
//!     lexer and the line packer; everything that knows about a concrete notation lives here.
//!
//!     TLDR: For format authors:
//!         - Importers build a tree, usually by rewriting their input into native lit and
//!           handing it to the native parser (TeX does this), or by walking a parsed DOM (HTML).
//!         - Emitters implement [`formats::common::TreeWriter`] and let the shared walk do
//!           line wrapping, so every output obeys the same width rules.
//!         - Each format is exposed through the [`Format`] trait and registered in
//!           [`FormatRegistry`].
//!
//! Architecture
//!
//!     .
//!     ├── error.rs                # FormatError
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── common
//!     │   ├── sigils.rs           # native sigils → generic markup, nesting checks
//!     │   └── dom_to_tree.rs      # html5ever DOM → Document
//!     ├── formats
//!     │   ├── common              # TreeWriter and the shared layout walk
//!     │   ├── lit                 # native notation (parse + emit)
//!     │   ├── tex                 # TeX (import rewrites + emit)
//!     │   ├── html                # HTML (parse + emit with deferred footnotes)
//!     │   ├── csv                 # CSV tables (parse only)
//!     │   └── debug               # indented node dump (emit only)
//!     └── lib.rs
//!
//!     This is a pure lib: it powers the lit binary but never prints or reads environment
//!     variables. The only file it opens is a stylesheet named by the HTML `css-path` option.
//!     The write entry points take any [`std::io::Write`].
//!
//! The Native Format
//!
//!     Native lit is just another format. Parsing normalizes the sigils (¶ ‖ † ◇ ⁝ ⁞ ‣ §) into
//!     HTML-like tags, checks that every opener is closed, and then runs the same generic tag
//!     parser the HTML importer uses. Both importers therefore share one element-to-node
//!     mapping.
//!
//! Testing
//!
//!     tests
//!     ├── lib.rs                  # aggregates the per-format modules
//!     ├── <format>/…
//!     └── fixtures/<docname>.<format>
//!
//!     Rust does not discover tests in subdirectories by default, so they are included as
//!     modules from tests/lib.rs.

pub mod common;
pub mod error;
pub mod format;
pub mod formats;
pub mod registry;

pub use error::FormatError;
pub use format::Format;
pub use formats::{CsvFormat, DebugFormat, HtmlFormat, HtmlOptions, LitFormat, TexFormat};
pub use registry::FormatRegistry;

use formats::common::write_to;
use formats::lit::serializer::LitWriter;
use formats::tex::serializer::TexWriter;
use lit_core::{Document, NodeId, WriteOpts};
use std::io;

/// Parse native lit text.
pub fn parse_lit(source: &str) -> Result<Document, FormatError> {
    formats::lit::parse(source)
}

/// Import TeX source.
pub fn parse_tex(source: &str) -> Result<Document, FormatError> {
    formats::tex::parser::parse(source)
}

/// Import an HTML fragment or document.
pub fn parse_html(source: &str) -> Result<Document, FormatError> {
    common::dom_to_tree::parse_markup(source)
}

/// Import a CSV table.
pub fn parse_csv(source: &str) -> Result<Document, FormatError> {
    formats::csv::parse(source)
}

/// Write `node` as native lit.
pub fn write_lit<W: io::Write>(
    sink: &mut W,
    doc: &Document,
    node: NodeId,
    opts: &WriteOpts,
) -> io::Result<()> {
    write_to(&mut LitWriter, sink, doc, node, opts)
}

/// Write `node` as TeX.
pub fn write_tex<W: io::Write>(
    sink: &mut W,
    doc: &Document,
    node: NodeId,
    opts: &WriteOpts,
) -> io::Result<()> {
    write_to(&mut TexWriter, sink, doc, node, opts)
}

/// Write `node` as an HTML body fragment, followed by the list of its footnotes.
pub fn write_html_in_body<W: io::Write>(
    sink: &mut W,
    doc: &Document,
    node: NodeId,
    opts: &WriteOpts,
) -> io::Result<()> {
    let body = formats::html::write_body(doc, node, opts);
    sink.write_all(body.as_bytes())
}

/// Write the whole document as HTML, standalone or body-only per `options`.
pub fn write_html<W: io::Write>(
    sink: &mut W,
    doc: &Document,
    options: &HtmlOptions,
) -> io::Result<()> {
    sink.write_all(formats::html::serialize_with(doc, options).as_bytes())
}

/// Write the node tree below `node` for inspection.
pub fn write_debug<W: io::Write>(
    sink: &mut W,
    doc: &Document,
    node: NodeId,
    opts: &WriteOpts,
) -> io::Result<()> {
    formats::debug::write(sink, doc, node, opts)
}
