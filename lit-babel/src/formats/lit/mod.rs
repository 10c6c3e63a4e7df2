//! Native lit format implementation
//!
//! This module implements the Format trait for lit itself, treating it as just another format
//! in the system. Parsing goes through sigil normalization and the generic tag parser;
//! serialization is the native emitter in [`serializer`].

use crate::common::{dom_to_tree, sigils};
use crate::error::FormatError;
use crate::format::Format;
use crate::formats::common::render;
use lit_core::Document;

pub mod formatting_rules;
pub mod serializer;

use formatting_rules::FormattingRules;
use serializer::LitWriter;

/// Parse native lit text into a document.
pub fn parse(source: &str) -> Result<Document, FormatError> {
    let markup = sigils::normalize(source)?;
    dom_to_tree::parse_markup(&markup)
}

/// Format implementation for native lit text
#[derive(Default)]
pub struct LitFormat {
    rules: FormattingRules,
}

impl LitFormat {
    pub fn new(rules: FormattingRules) -> Self {
        Self { rules }
    }
}

impl Format for LitFormat {
    fn name(&self) -> &str {
        "lit"
    }

    fn description(&self) -> &str {
        "Native lit markup"
    }

    fn file_extensions(&self) -> &[&str] {
        &["lit"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        parse(source)
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(render(
            &mut LitWriter,
            doc,
            doc.root(),
            &self.rules.write_opts(),
        ))
    }
}
