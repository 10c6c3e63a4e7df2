//! Inspect transforms
//!
//! Each transform parses a source with one of the registered formats and renders a view of the
//! resulting tree:
//!
//! - `tree`:        indented node tree, one line per node (the `debug` format)
//! - `tree-json`:   the whole tree as nested JSON objects
//! - `tokens-json`: every token of the document, in order, as a JSON array
//!
//! Example: `lit inspect notes.lit tree-json`

use lit_babel::formats::debug;
use lit_babel::FormatRegistry;
use lit_core::{Document, WriteOpts};

/// All available inspect transforms
pub const AVAILABLE_TRANSFORMS: &[&str] = &["tree", "tree-json", "tokens-json"];

/// Parse `source` as `format` and render it through the named transform.
///
/// `indent` is the nesting unit of the `tree` view.
pub fn execute_transform(
    source: &str,
    format: &str,
    transform_name: &str,
    indent: &str,
) -> Result<String, String> {
    let registry = FormatRegistry::default();
    let doc = registry
        .parse(source, format)
        .map_err(|e| format!("Parse error: {e}"))?;
    render_transform(&doc, transform_name, indent)
}

fn render_transform(doc: &Document, transform_name: &str, indent: &str) -> Result<String, String> {
    match transform_name {
        "tree" => {
            let opts = WriteOpts {
                indent: indent.to_string(),
                ..WriteOpts::default()
            };
            Ok(debug::render(doc, doc.root(), &opts))
        }
        "tree-json" => serde_json::to_string_pretty(&doc.to_json(doc.root()))
            .map(|json| json + "\n")
            .map_err(|e| format!("JSON serialization failed: {e}")),
        "tokens-json" => serde_json::to_string_pretty(&doc.tokens(doc.root()))
            .map(|json| json + "\n")
            .map_err(|e| format!("JSON serialization failed: {e}")),
        other => Err(format!(
            "Unknown transform '{other}'. Available: {}",
            AVAILABLE_TRANSFORMS.join(", ")
        )),
    }
}
