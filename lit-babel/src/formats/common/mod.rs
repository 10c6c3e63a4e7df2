//! Common traversal for the text emitters
//!
//! This module provides the walk shared by the native, TeX and HTML writers. A writer decides
//! three things per node: what separates it from its previous sibling ([`Lead`]), how a token
//! is spelled, and how the node's own delimiters look. The walk does the rest: it gathers each
//! run of sibling tokens into one block, wraps it with [`line_blocks`] against [`MAX_WIDTH`]
//! and writes the line prefixes.
//!
//! Node bodies never write their own leading prefix; whoever starts the line does. Closing
//! delimiters on their own line are written as `"\n" + prefix + closer`.

use lit_core::{line_blocks, write_lines, Document, NodeId, NodeKind, Token, WriteOpts, MAX_WIDTH};
use std::io;

/// What goes between a node and whatever was written before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lead {
    /// Nothing; the node starts a fresh line, so it gets the prefix
    Start,
    /// Nothing; the node continues the current line
    Inline,
    /// A single space on the current line
    Space,
    Newline,
    BlankLine,
}

impl Lead {
    pub fn text(self) -> &'static str {
        match self {
            Lead::Start | Lead::Inline => "",
            Lead::Space => " ",
            Lead::Newline => "\n",
            Lead::BlankLine => "\n\n",
        }
    }

    pub fn starts_line(self) -> bool {
        matches!(self, Lead::Start | Lead::Newline | Lead::BlankLine)
    }
}

pub trait TreeWriter {
    /// Spelling of a single token.
    fn token_text(&self, token: &Token, opts: &WriteOpts) -> String;

    /// Separation between `id` and its previous sibling (or its parent's opening).
    fn lead(&self, doc: &Document, id: NodeId) -> Lead;

    /// Write the node, delimiters included, assuming the line prefix is already written.
    fn write_node(&mut self, out: &mut String, doc: &Document, id: NodeId, opts: &WriteOpts);

    /// Nodes this writer leaves out entirely.
    fn renders(&self, _kind: NodeKind) -> bool {
        true
    }
}

/// Write the children of `parent`.
///
/// `hang` is the width already used on the current line when the first child is a token
/// block that continues that line.
pub fn write_children<W: TreeWriter + ?Sized>(
    w: &mut W,
    out: &mut String,
    doc: &Document,
    parent: NodeId,
    opts: &WriteOpts,
    hang: usize,
) {
    let mut cursor = doc.first_child(parent);
    while let Some(id) = cursor {
        if !w.renders(doc.kind(id)) {
            cursor = doc.next_sibling(id);
            continue;
        }

        let lead = w.lead(doc, id);
        out.push_str(lead.text());

        if doc.kind(id) == NodeKind::Token {
            let (block, next) = doc.token_block(id);
            let offset = if !lead.starts_line() && doc.prev_sibling(id).is_none() {
                hang
            } else {
                opts.prefix_width()
            };
            let lines = line_blocks(
                &block,
                |t| w.token_text(t, opts),
                MAX_WIDTH.saturating_sub(offset),
            );
            write_lines(out, &lines, &opts.prefix, lead.starts_line());
            cursor = next;
        } else {
            if lead.starts_line() {
                out.push_str(&opts.prefix);
            }
            w.write_node(out, doc, id, opts);
            cursor = doc.next_sibling(id);
        }
    }
}

/// Render `id` as a string. A Fragment writes its children; any other node is written on a
/// line of its own, starting with `opts.prefix`.
pub fn render<W: TreeWriter + ?Sized>(
    w: &mut W,
    doc: &Document,
    id: NodeId,
    opts: &WriteOpts,
) -> String {
    let mut out = String::new();
    if doc.kind(id) == NodeKind::Fragment {
        write_children(w, &mut out, doc, id, opts, opts.prefix_width());
    } else if w.renders(doc.kind(id)) {
        out.push_str(&opts.prefix);
        w.write_node(&mut out, doc, id, opts);
    }
    out
}

/// Render `id` and write the result to `sink`.
pub fn write_to<W: TreeWriter + ?Sized, S: io::Write>(
    w: &mut W,
    sink: &mut S,
    doc: &Document,
    id: NodeId,
    opts: &WriteOpts,
) -> io::Result<()> {
    let text = render(w, doc, id, opts);
    sink.write_all(text.as_bytes())
}

/// Kinds whose children continue the marker line (`‖ …`, `‣ …`, `§ …`).
pub fn is_run_like(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Run | NodeKind::ListItem | NodeKind::Section
    )
}

/// Lead of a token block that follows an inline element: glued to it, or one space apart.
pub fn after_inline(doc: &Document, id: NodeId) -> Lead {
    if doc.token(id).is_some_and(Token::is_space) {
        Lead::Space
    } else {
        Lead::Inline
    }
}

/// Tokens of the first block under `id` on a single line, through `w`'s spelling.
pub fn inline_text<W: TreeWriter + ?Sized>(
    w: &W,
    doc: &Document,
    id: NodeId,
    opts: &WriteOpts,
) -> String {
    let tokens = doc.tokens(id);
    line_blocks(&tokens, |t| w.token_text(t, opts), usize::MAX).join(" ")
}
