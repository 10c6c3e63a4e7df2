//! Debug tree output
//!
//! One line per node, nesting shown as indentation:
//!
//! ```text
//! fragment
//!   ¶
//!     ‖
//!       token word("hello")
//!       token punctuation(" ")
//!       token word("world")
//!   § [section-level=2 section-numbered=false]
//!   comment "a note"
//! ```
//!
//! Tokens print kind and value, other nodes their attributes and then their data, if any.

use crate::error::FormatError;
use crate::format::Format;
use lit_core::{Document, NodeId, WriteOpts};
use std::io;

/// Append the line for `id` and, below it, its subtree.
fn write_node(out: &mut String, doc: &Document, id: NodeId, prefix: &str, indent: &str) {
    let node = doc.node(id);
    out.push_str(prefix);
    out.push_str(node.kind.name());
    if let Some(token) = &node.token {
        out.push_str(&format!(" {token}"));
    }
    if !node.attrs.is_empty() {
        let attrs: Vec<String> = node
            .attrs
            .iter()
            .map(|a| format!("{}={}", a.key, a.val))
            .collect();
        out.push_str(&format!(" [{}]", attrs.join(" ")));
    }
    if !node.data.is_empty() {
        out.push_str(&format!(" {:?}", node.data));
    }
    out.push('\n');

    let child_prefix = format!("{prefix}{indent}");
    for child in doc.kids(id) {
        write_node(out, doc, child, &child_prefix, indent);
    }
}

/// Render the subtree at `id`, starting at `opts.prefix` and nesting by `opts.indent`.
pub fn render(doc: &Document, id: NodeId, opts: &WriteOpts) -> String {
    let mut out = String::new();
    write_node(&mut out, doc, id, &opts.prefix, &opts.indent);
    out
}

pub fn write<W: io::Write>(
    sink: &mut W,
    doc: &Document,
    id: NodeId,
    opts: &WriteOpts,
) -> io::Result<()> {
    sink.write_all(render(doc, id, opts).as_bytes())
}

/// Format implementation for the debug tree (output only)
pub struct DebugFormat {
    indent: String,
}

impl Default for DebugFormat {
    fn default() -> Self {
        Self::new("  ")
    }
}

impl DebugFormat {
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
        }
    }
}

impl Format for DebugFormat {
    fn name(&self) -> &str {
        "debug"
    }

    fn description(&self) -> &str {
        "Indented node tree for inspection"
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(render(
            doc,
            doc.root(),
            &WriteOpts::with_indent(self.indent.clone()),
        ))
    }
}
