//! Native lit emission
//!
//! Container blocks open with their sigil and `⦊` on their own line, indent their children one
//! unit and close with `⦉` on a line of its own. Run-like blocks (`‖`, `‣`, `§`) keep their
//! first token block on the marker line and close with ` ⦉` right after inline content.
//! Extension elements are written back as tags with single-quoted attributes.

use crate::common::sigils::{escape, CLOSE_MARKER, OPEN_MARKER};
use crate::formats::common::{after_inline, is_run_like, write_children, Lead, TreeWriter};
use lit_core::{Document, NodeId, NodeKind, Token, TokenKind, WriteOpts, OPAQUE_CLOSE, OPAQUE_OPEN};

pub struct LitWriter;

/// Blocks separated from a block neighbour by a blank line.
fn is_spaced(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Paragraph
            | NodeKind::List
            | NodeKind::DisplayMath
            | NodeKind::Run
            | NodeKind::ListItem
            | NodeKind::Section
            | NodeKind::Equation
            | NodeKind::Subequations
            | NodeKind::Statement
            | NodeKind::Proof
            | NodeKind::CenterAlign
            | NodeKind::RightAlign
            | NodeKind::TexOnly
            | NodeKind::Quote
            | NodeKind::Div
            | NodeKind::Pre
            | NodeKind::Table
            | NodeKind::Footnote
    )
}

/// Elements written in the middle of a line.
fn is_inline_element(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Link | NodeKind::Code | NodeKind::TableHeaderCell | NodeKind::TableCell
    )
}

fn container_sigil(doc: &Document, id: NodeId) -> Option<char> {
    match doc.kind(id) {
        NodeKind::Paragraph => Some('¶'),
        NodeKind::Footnote => Some('†'),
        NodeKind::DisplayMath => Some('◇'),
        NodeKind::List if doc.list_ordered(id) => Some('⁞'),
        NodeKind::List => Some('⁝'),
        _ => None,
    }
}

fn run_marker(doc: &Document, id: NodeId) -> String {
    match doc.kind(id) {
        NodeKind::Section => {
            let mut marker = "§".repeat(doc.section_level(id).max(1));
            if !doc.section_numbered(id) {
                marker.push('*');
            }
            marker
        }
        NodeKind::ListItem => "‣".to_string(),
        _ => "‖".to_string(),
    }
}

fn tag_name(doc: &Document, id: NodeId) -> String {
    let name = match doc.kind(id) {
        NodeKind::Link => "a",
        NodeKind::Image => "img",
        NodeKind::Table => "table",
        NodeKind::TableHead => "thead",
        NodeKind::TableBody => "tbody",
        NodeKind::TableRow => "tr",
        NodeKind::TableHeaderCell => "th",
        NodeKind::TableCell => "td",
        NodeKind::Quote => "blockquote",
        NodeKind::Code => "code",
        NodeKind::Div => "div",
        NodeKind::Equation => "equation",
        NodeKind::Subequations => "subequations",
        NodeKind::Statement => "statement",
        NodeKind::Proof => "proof",
        NodeKind::CenterAlign => "center",
        NodeKind::RightAlign => "right",
        NodeKind::TexOnly => "tex",
        NodeKind::Pre => "pre",
        _ => return doc.node(id).data.clone(),
    };
    name.to_string()
}

fn write_open_tag(out: &mut String, doc: &Document, id: NodeId, void: bool) {
    out.push('<');
    out.push_str(&tag_name(doc, id));
    for attr in &doc.node(id).attrs {
        out.push(' ');
        out.push_str(&attr.key);
        out.push_str("='");
        out.push_str(&html_escape::encode_single_quoted_attribute(&escape(&attr.val)));
        out.push('\'');
    }
    out.push_str(if void { "/>" } else { ">" });
}

/// Whether a run-like node closes on its last content line.
fn closes_inline(doc: &Document, id: NodeId) -> bool {
    match doc.last_child(id) {
        None => true,
        Some(last) => {
            let kind = doc.kind(last);
            kind == NodeKind::Token || is_inline_element(kind)
        }
    }
}

impl LitWriter {
    fn write_container(
        &mut self,
        out: &mut String,
        doc: &Document,
        id: NodeId,
        opts: &WriteOpts,
        sigil: char,
    ) {
        out.push(sigil);
        out.push(' ');
        out.push(OPEN_MARKER);
        write_children(self, out, doc, id, &opts.indented(), 0);
        out.push('\n');
        out.push_str(&opts.prefix);
        out.push(CLOSE_MARKER);
    }

    fn write_run_like(&mut self, out: &mut String, doc: &Document, id: NodeId, opts: &WriteOpts) {
        let marker = run_marker(doc, id);
        out.push_str(&marker);
        let hang = opts.prefix_width() + marker.chars().count() + 1;
        write_children(self, out, doc, id, &opts.indented(), hang);
        if closes_inline(doc, id) {
            out.push(' ');
        } else {
            out.push('\n');
            out.push_str(&opts.prefix);
        }
        out.push(CLOSE_MARKER);
    }

    fn write_element(&mut self, out: &mut String, doc: &Document, id: NodeId, opts: &WriteOpts) {
        let kind = doc.kind(id);
        write_open_tag(out, doc, id, false);
        if is_inline_element(kind) {
            write_children(self, out, doc, id, opts, opts.prefix_width());
            out.push_str("</");
        } else if doc.first_child(id).is_none() {
            out.push_str("</");
        } else {
            write_children(self, out, doc, id, &opts.indented(), 0);
            out.push('\n');
            out.push_str(&opts.prefix);
            out.push_str("</");
        }
        out.push_str(&tag_name(doc, id));
        out.push('>');
    }
}

impl TreeWriter for LitWriter {
    fn token_text(&self, token: &Token, _opts: &WriteOpts) -> String {
        if token.implicit && token.is_space() {
            return " ".to_string();
        }
        let escaped = escape(&token.value)
            .replace('&', "&amp;")
            .replace('<', "&lt;");
        match token.kind {
            TokenKind::Opaque => format!("{OPAQUE_OPEN}{escaped}{OPAQUE_CLOSE}"),
            _ => escaped,
        }
    }

    fn lead(&self, doc: &Document, id: NodeId) -> Lead {
        let kind = doc.kind(id);
        match doc.prev_sibling(id) {
            None => match doc.parent(id).map(|p| doc.kind(p)) {
                None | Some(NodeKind::Fragment) => Lead::Start,
                Some(parent) if is_run_like(parent) => {
                    if kind == NodeKind::Token {
                        Lead::Space
                    } else {
                        Lead::Newline
                    }
                }
                Some(parent) if is_inline_element(parent) => Lead::Inline,
                Some(_) => Lead::Newline,
            },
            Some(prev) => {
                let prev_kind = doc.kind(prev);
                if kind == NodeKind::Token && prev_kind.is_inline() {
                    after_inline(doc, id)
                } else if is_spaced(kind) && is_spaced(prev_kind) {
                    Lead::BlankLine
                } else {
                    Lead::Newline
                }
            }
        }
    }

    fn write_node(&mut self, out: &mut String, doc: &Document, id: NodeId, opts: &WriteOpts) {
        let node = doc.node(id);
        match node.kind {
            NodeKind::Fragment => write_children(self, out, doc, id, opts, opts.prefix_width()),
            NodeKind::Paragraph | NodeKind::Footnote | NodeKind::DisplayMath | NodeKind::List => {
                if let Some(sigil) = container_sigil(doc, id) {
                    self.write_container(out, doc, id, opts, sigil);
                }
            }
            NodeKind::Run | NodeKind::ListItem | NodeKind::Section => {
                self.write_run_like(out, doc, id, opts)
            }
            NodeKind::Token => {
                if let Some(token) = &node.token {
                    out.push_str(&self.token_text(token, opts));
                }
            }
            NodeKind::Text => out.push_str(&html_escape::encode_text(&escape(&node.data))),
            NodeKind::Comment | NodeKind::Json => {
                out.push_str("<!--");
                out.push_str(&escape(&node.data));
                out.push_str("-->");
            }
            NodeKind::Pre => {
                write_open_tag(out, doc, id, false);
                out.push('\n');
                out.push_str(&html_escape::encode_text(&escape(&node.data)));
                out.push_str("</pre>");
            }
            NodeKind::Image => write_open_tag(out, doc, id, true),
            NodeKind::TexOnly
            | NodeKind::CenterAlign
            | NodeKind::RightAlign
            | NodeKind::Equation
            | NodeKind::Subequations
            | NodeKind::Statement
            | NodeKind::Proof
            | NodeKind::Link
            | NodeKind::Table
            | NodeKind::TableHead
            | NodeKind::TableBody
            | NodeKind::TableRow
            | NodeKind::TableHeaderCell
            | NodeKind::TableCell
            | NodeKind::Quote
            | NodeKind::Div
            | NodeKind::Code
            | NodeKind::Opaque => self.write_element(out, doc, id, opts),
        }
    }
}
