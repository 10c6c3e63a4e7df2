//! TeX emission
//!
//! Paragraphs and runs have no delimiters of their own: runs are consecutive lines and
//! paragraphs are separated by a blank line. Everything else maps onto a LaTeX command or
//! environment. Math constructs switch `in_math` on for their subtree, which changes how
//! words and punctuation are translated (see [`super::symbols`]).

use super::symbols::{math, replace_math, style};
use crate::formats::common::{after_inline, inline_text, write_children, Lead, TreeWriter};
use lit_core::{Document, NodeId, NodeKind, Token, TokenKind, WriteOpts};

pub struct TexWriter;

/// Blocks separated from a block neighbour by a blank line.
fn is_block(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Paragraph
            | NodeKind::List
            | NodeKind::Section
            | NodeKind::Table
            | NodeKind::CenterAlign
            | NodeKind::RightAlign
            | NodeKind::Quote
            | NodeKind::Statement
            | NodeKind::Proof
            | NodeKind::Pre
            | NodeKind::TexOnly
            | NodeKind::Div
            | NodeKind::Equation
            | NodeKind::Subequations
            | NodeKind::DisplayMath
    )
}

fn section_command(doc: &Document, id: NodeId) -> String {
    let name = match doc.section_level(id) {
        0 | 1 => "section",
        2 => "subsection",
        3 => "subsubsection",
        _ => "paragraph",
    };
    let star = if doc.section_numbered(id) { "" } else { "*" };
    format!("\\{name}{star}{{")
}

fn escape_text(text: &str) -> String {
    text.replace('&', "\\&").replace('%', "\\%")
}

impl TexWriter {
    fn write_environment(
        &mut self,
        out: &mut String,
        doc: &Document,
        id: NodeId,
        opts: &WriteOpts,
        env: &str,
    ) {
        out.push_str(&format!("\\begin{{{env}}}"));
        if let Some(label) = doc.attr(id, "id") {
            out.push_str(&format!("\\label{{{label}}}"));
        }
        write_children(self, out, doc, id, opts, opts.prefix_width());
        out.push('\n');
        out.push_str(&opts.prefix);
        out.push_str(&format!("\\end{{{env}}}"));
    }

    fn write_braced(
        &mut self,
        out: &mut String,
        doc: &Document,
        id: NodeId,
        opts: &WriteOpts,
        open: &str,
    ) {
        out.push_str(open);
        let hang = opts.prefix_width() + open.chars().count();
        write_children(self, out, doc, id, opts, hang);
        out.push('}');
    }

    fn row_line(&self, doc: &Document, row: NodeId, opts: &WriteOpts) -> String {
        let cells: Vec<String> = doc
            .kids(row)
            .map(|cell| inline_text(self, doc, cell, opts))
            .collect();
        format!("{} \\\\", cells.join(" & "))
    }

    /// Rows of a table with whether each belongs to the head.
    fn table_rows(doc: &Document, id: NodeId) -> Vec<(NodeId, bool)> {
        let mut rows = Vec::new();
        for child in doc.kids(id) {
            match doc.kind(child) {
                NodeKind::TableHead => rows.extend(doc.kids(child).map(|r| (r, true))),
                NodeKind::TableBody => rows.extend(doc.kids(child).map(|r| (r, false))),
                NodeKind::TableRow => rows.push((child, false)),
                _ => {}
            }
        }
        rows
    }

    fn write_rows(
        &self,
        out: &mut String,
        doc: &Document,
        rows: &[(NodeId, bool)],
        opts: &WriteOpts,
    ) {
        for (i, (row, head)) in rows.iter().enumerate() {
            if i > 0 {
                out.push('\n');
                out.push_str(&opts.prefix);
            }
            out.push_str(&self.row_line(doc, *row, opts));
            let last_head = *head && rows.get(i + 1).map_or(true, |(_, next)| !next);
            if last_head {
                out.push('\n');
                out.push_str(&opts.prefix);
                out.push_str("\\hline");
            }
        }
    }

    fn write_table(&mut self, out: &mut String, doc: &Document, id: NodeId, opts: &WriteOpts) {
        let rows = Self::table_rows(doc, id);
        let columns = rows
            .iter()
            .map(|(row, _)| doc.kids(*row).count())
            .max()
            .unwrap_or(0);
        out.push_str(&format!("\\begin{{tabular}}{{{}}}", "l".repeat(columns)));
        if !rows.is_empty() {
            out.push('\n');
            out.push_str(&opts.prefix);
            self.write_rows(out, doc, &rows, opts);
        }
        out.push('\n');
        out.push_str(&opts.prefix);
        out.push_str("\\end{tabular}");
    }
}

impl TreeWriter for TexWriter {
    fn token_text(&self, token: &Token, opts: &WriteOpts) -> String {
        if token.is_space() {
            return " ".to_string();
        }
        let Some(ch) = token.first_char() else {
            return String::new();
        };
        match token.kind {
            TokenKind::Word if opts.in_math => replace_math(&token.value),
            TokenKind::Word => token.value.clone(),
            TokenKind::Opaque => replace_math(&token.value),
            TokenKind::Punctuation if opts.in_math && (ch == '&' || ch == '%') => {
                token.value.clone()
            }
            TokenKind::Punctuation => style(ch).map_or_else(|| token.value.clone(), str::to_string),
            TokenKind::Symbol if opts.in_math => math(ch)
                .or_else(|| style(ch))
                .map_or_else(|| token.value.clone(), str::to_string),
            TokenKind::Symbol => style(ch)
                .or_else(|| math(ch))
                .map_or_else(|| token.value.clone(), str::to_string),
        }
    }

    fn lead(&self, doc: &Document, id: NodeId) -> Lead {
        let kind = doc.kind(id);
        match doc.prev_sibling(id) {
            None => match doc.parent(id).map(|p| doc.kind(p)) {
                None | Some(NodeKind::Fragment) => Lead::Start,
                Some(
                    NodeKind::Paragraph
                    | NodeKind::TexOnly
                    | NodeKind::Div
                    | NodeKind::Opaque
                    | NodeKind::Run
                    | NodeKind::ListItem
                    | NodeKind::Section
                    | NodeKind::Link
                    | NodeKind::Code
                    | NodeKind::TableCell
                    | NodeKind::TableHeaderCell,
                ) => Lead::Inline,
                Some(_) => Lead::Newline,
            },
            Some(prev) => {
                let prev_kind = doc.kind(prev);
                if kind == NodeKind::Footnote {
                    Lead::Inline
                } else if kind == NodeKind::Token && prev_kind.is_inline() {
                    after_inline(doc, id)
                } else if kind.is_inline() && prev_kind == NodeKind::Token {
                    if doc.token(prev).is_some_and(Token::is_space) {
                        Lead::Space
                    } else {
                        Lead::Inline
                    }
                } else if is_block(kind) && is_block(prev_kind) {
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
            NodeKind::Fragment
            | NodeKind::Paragraph
            | NodeKind::Run
            | NodeKind::TexOnly
            | NodeKind::Div
            | NodeKind::Opaque => write_children(self, out, doc, id, opts, opts.prefix_width()),
            NodeKind::Token => {
                if let Some(token) = &node.token {
                    out.push_str(&self.token_text(token, opts));
                }
            }
            NodeKind::Text => out.push_str(&escape_text(&node.data)),
            NodeKind::Footnote => {
                out.push_str("\\footnote{");
                write_children(self, out, doc, id, &opts.indented(), 0);
                out.push('\n');
                out.push_str(&opts.prefix);
                out.push('}');
            }
            NodeKind::DisplayMath => {
                out.push_str("\\[");
                write_children(self, out, doc, id, &opts.math(), 0);
                out.push('\n');
                out.push_str(&opts.prefix);
                out.push_str("\\]");
            }
            NodeKind::List => {
                let env = if doc.list_ordered(id) {
                    "enumerate"
                } else {
                    "itemize"
                };
                out.push_str(&format!("\\begin{{{env}}}"));
                write_children(self, out, doc, id, &opts.indented(), 0);
                out.push('\n');
                out.push_str(&opts.prefix);
                out.push_str(&format!("\\end{{{env}}}"));
            }
            NodeKind::ListItem => {
                out.push_str("\\item ");
                let hang = opts.prefix_width() + "\\item ".len();
                write_children(self, out, doc, id, &opts.indented(), hang);
            }
            NodeKind::Section => {
                let open = section_command(doc, id);
                self.write_braced(out, doc, id, opts, &open);
            }
            NodeKind::Equation => self.write_environment(out, doc, id, &opts.math(), "equation"),
            NodeKind::Subequations => self.write_environment(out, doc, id, opts, "subequations"),
            NodeKind::Statement => {
                let env = doc.attr(id, "type").unwrap_or("statement").to_string();
                self.write_environment(out, doc, id, opts, &env)
            }
            NodeKind::Proof => self.write_environment(out, doc, id, opts, "proof"),
            NodeKind::CenterAlign => self.write_environment(out, doc, id, opts, "center"),
            NodeKind::RightAlign => self.write_environment(out, doc, id, opts, "flushright"),
            NodeKind::Quote => self.write_environment(out, doc, id, opts, "quote"),
            NodeKind::Code => self.write_braced(out, doc, id, opts, "\\texttt{"),
            NodeKind::Link => {
                let open = format!("\\href{{{}}}{{", doc.attr(id, "href").unwrap_or_default());
                self.write_braced(out, doc, id, opts, &open);
            }
            NodeKind::Image => {
                let src = doc.attr(id, "src").unwrap_or_default();
                match doc.attr(id, "width") {
                    Some(width) => {
                        out.push_str(&format!("\\includegraphics[width={width}]{{{src}}}"))
                    }
                    None => out.push_str(&format!("\\includegraphics{{{src}}}")),
                }
            }
            NodeKind::Table => self.write_table(out, doc, id, opts),
            NodeKind::TableHead | NodeKind::TableBody => {
                let head = node.kind == NodeKind::TableHead;
                let rows: Vec<(NodeId, bool)> = doc.kids(id).map(|r| (r, head)).collect();
                self.write_rows(out, doc, &rows, opts);
            }
            NodeKind::TableRow => out.push_str(&self.row_line(doc, id, opts)),
            NodeKind::TableHeaderCell | NodeKind::TableCell => {
                out.push_str(&inline_text(self, doc, id, opts))
            }
            NodeKind::Pre => {
                out.push_str("\\begin{verbatim}\n");
                out.push_str(&node.data);
                out.push('\n');
                out.push_str(&opts.prefix);
                out.push_str("\\end{verbatim}");
            }
            NodeKind::Comment => {
                let lines: Vec<String> = node
                    .data
                    .trim()
                    .lines()
                    .map(|l| format!("% {}", l.trim()))
                    .collect();
                out.push_str(&lines.join(&format!("\n{}", opts.prefix)));
            }
            // structured data has no TeX rendering; `renders` keeps the walk from reaching it
            NodeKind::Json => {}
        }
    }

    fn renders(&self, kind: NodeKind) -> bool {
        kind != NodeKind::Json
    }
}
