//! TeX format implementation
//!
//! Export maps every node kind onto a LaTeX command or environment; see [`serializer`]. Import
//! rewrites a practical subset of LaTeX into native text and parses that; see [`parser`].
//!
//! # Element Mapping
//!
//! | lit               | LaTeX                                              |
//! |-------------------|----------------------------------------------------|
//! | paragraph / run   | blank-line separated block / one line              |
//! | footnote          | `\footnote{…}`                                     |
//! | display math      | `\[ … \]`                                          |
//! | list / item       | `itemize` or `enumerate` / `\item`                 |
//! | section           | `\section`, `\subsection`, `\subsubsection`, `\paragraph`; `*` when unnumbered |
//! | equation          | `equation` with `\label{id}`                       |
//! | statement / proof | environment named by the `type` attribute / `proof` |
//! | center / right    | `center` / `flushright`                            |
//! | quote             | `quote`                                            |
//! | code / link       | `\texttt{…}` / `\href{url}{…}`                     |
//! | image             | `\includegraphics[width=…]{src}`                   |
//! | table             | `tabular`, `\hline` after the head rows            |
//! | pre               | `verbatim`                                         |
//! | comment           | `% …` lines                                        |
//!
//! Structured-data nodes have no TeX form and are left out.

pub mod parser;
pub mod serializer;
pub mod symbols;

use crate::error::FormatError;
use crate::format::Format;
use crate::formats::common::render;
use lit_core::{Document, WriteOpts};

/// Format implementation for LaTeX
#[derive(Default)]
pub struct TexFormat;

impl Format for TexFormat {
    fn name(&self) -> &str {
        "tex"
    }

    fn description(&self) -> &str {
        "LaTeX source"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tex"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        parser::parse(source)
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(render(
            &mut serializer::TexWriter,
            doc,
            doc.root(),
            &WriteOpts::default(),
        ))
    }
}
