//! HTML format implementation
//!
//! This module implements bidirectional conversion between lit and HTML5.
//!
//! # Library Choice
//!
//! Import goes through `html5ever` + `markup5ever_rcdom`, the same generic tag parser the
//! native reader uses after sigil normalization, so HTML and lit share one element-to-node
//! mapping (see [`crate::common::dom_to_tree`]). Export is a text emitter over the shared
//! layout walk, so wrapped lines follow the same width rules as the other writers.
//!
//! # Element Mapping Table
//!
//! | lit            | HTML                                      | Notes                                 |
//! |----------------|-------------------------------------------|---------------------------------------|
//! | paragraph      | `<p>`                                     | runs become lines inside the p        |
//! | section        | `<hN id="First_words">`                   | level capped at 6                     |
//! | list / item    | `<ul>`/`<ol>` / `<li>`                    |                                       |
//! | footnote       | `<sup>` marker + trailing `<ol class="footnotes">` | numbered in document order   |
//! | display math   | `<div class="displaymath">`               |                                       |
//! | equation       | `<div class="equation" id="…">`           |                                       |
//! | statement      | `<div class="statement TYPE">`            |                                       |
//! | style markers  | `<i>`, `<b>`, `<span class="t">`, `<span class="c">` | `᜶` becomes `<br>`        |
//! | link / code    | `<a>` / `<code>`                          | attributes copied                     |
//! | TeX-only       | (omitted)                                 |                                       |
//! | structured data| (omitted)                                 |                                       |
//!
//! # Output Format
//!
//! By default the writer produces the body only. In standalone mode the body is wrapped in a
//! complete HTML5 document with the stylesheet from `css/lit.css` embedded, followed by any
//! custom CSS.

pub mod serializer;

use crate::common::dom_to_tree;
use crate::error::FormatError;
use crate::format::{bool_option, Format};
use crate::formats::common::render;
use lit_core::{Document, NodeId, NodeKind, WriteOpts};
use serializer::HtmlWriter;
use std::collections::HashMap;

pub use serializer::HtmlOptions;

/// Format implementation for HTML
#[derive(Debug, Clone, Default)]
pub struct HtmlFormat {
    options: HtmlOptions,
}

impl HtmlFormat {
    pub fn new(options: HtmlOptions) -> Self {
        Self { options }
    }

    /// HTML format producing complete documents
    pub fn standalone() -> Self {
        Self::new(HtmlOptions {
            standalone: true,
            ..HtmlOptions::default()
        })
    }
}

/// The stylesheet embedded into standalone documents.
pub fn default_css() -> &'static str {
    include_str!("../../../css/lit.css")
}

/// Render `id` as an HTML body fragment, footnotes included.
pub fn write_body(doc: &Document, id: NodeId, opts: &WriteOpts) -> String {
    let mut writer = HtmlWriter::new();
    let mut out = render(&mut writer, doc, id, opts);
    writer.write_footnotes(&mut out, doc, opts);
    out
}

/// Serialize a document with the given options.
pub fn serialize_with(doc: &Document, options: &HtmlOptions) -> String {
    let body = write_body(doc, doc.root(), &WriteOpts::default());
    if !options.standalone {
        return body;
    }
    let title = options
        .title
        .clone()
        .or_else(|| first_heading(doc))
        .unwrap_or_else(|| "lit document".to_string());
    wrap_in_document(&body, &title, options.custom_css.as_deref())
}

fn first_heading(doc: &Document) -> Option<String> {
    doc.descendants(doc.root())
        .into_iter()
        .find(|id| doc.kind(*id) == NodeKind::Section)
        .map(|id| doc.first_token_text(id))
        .filter(|text| !text.is_empty())
}

fn wrap_in_document(body_html: &str, title: &str, custom_css: Option<&str>) -> String {
    let baseline_css = default_css();
    let custom_css = custom_css.unwrap_or("");
    let escaped_title = html_escape::encode_text(title);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <meta name="generator" content="lit-babel">
  <title>{escaped_title}</title>
  <style>
{baseline_css}
{custom_css}
  </style>
</head>
<body>
<div class="lit-document">
{body_html}
</div>
</body>
</html>
"#
    )
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "HTML5 body or standalone document"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        dom_to_tree::parse_markup(source)
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(serialize_with(doc, &self.options))
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let mut html = self.options.clone();
        for key in options.keys() {
            if !matches!(key.as_str(), "standalone" | "title" | "css-path") {
                return Err(FormatError::NotSupported(format!(
                    "Unknown HTML parameter '{key}'"
                )));
            }
        }
        if let Some(standalone) = bool_option(options, "standalone")? {
            html.standalone = standalone;
        }
        if let Some(title) = options.get("title") {
            html.title = Some(title.clone());
        }
        if let Some(path) = options.get("css-path") {
            html.custom_css = Some(std::fs::read_to_string(path)?);
        }
        Ok(serialize_with(doc, &html))
    }
}
