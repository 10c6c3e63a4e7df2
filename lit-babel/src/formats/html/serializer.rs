//! HTML serialization
//!
//! Converts lit documents to HTML5, either as a bare body fragment or as a standalone
//! document with the embedded stylesheet.
//!
//! Footnotes are deferred: the walk leaves a numbered reference marker where each footnote
//! occurs and remembers the node. Once the body is written, the collected footnotes are
//! rendered in order as a trailing `<ol class="footnotes">`. Footnotes nested inside footnote
//! text are appended to the same list while it is being written.

use crate::formats::common::{after_inline, write_children, Lead, TreeWriter};
use lit_core::{Document, NodeId, NodeKind, Token, TokenKind, WriteOpts};

/// Options for HTML serialization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Wrap the body in a complete HTML5 document
    pub standalone: bool,
    /// Document title; defaults to the first section heading
    pub title: Option<String>,
    /// Optional custom CSS appended after the baseline stylesheet
    pub custom_css: Option<String>,
}

#[derive(Debug, Default)]
pub struct HtmlWriter {
    footnotes: Vec<NodeId>,
}

fn marker_markup(ch: char) -> Option<&'static str> {
    Some(match ch {
        '‹' => "<i>",
        '›' => "</i>",
        '«' | '❮' => "<b>",
        '»' | '❯' => "</b>",
        '❬' | '⧼' => "<span class=\"t\">",
        '⁅' => "<span class=\"c\">",
        '❭' | '⧽' | '⁆' => "</span>",
        '᜶' => "<br>",
        '↦' | '↤' => "",
        _ => return None,
    })
}

fn is_block(kind: NodeKind) -> bool {
    !kind.is_inline() && !matches!(kind, NodeKind::Token | NodeKind::Text)
}

/// Parents whose first child continues the opening tag's line.
fn continues_line(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Run
            | NodeKind::ListItem
            | NodeKind::Section
            | NodeKind::Footnote
            | NodeKind::Link
            | NodeKind::Code
            | NodeKind::Opaque
            | NodeKind::TableHeaderCell
            | NodeKind::TableCell
    )
}

/// Heading id: the first line of text with spaces as underscores.
pub fn section_id(doc: &Document, id: NodeId) -> String {
    doc.first_token_text(id).replace(' ', "_")
}

fn open_tag(tag: &str, attrs: &[(&str, String)]) -> String {
    let mut out = format!("<{tag}");
    for (key, val) in attrs {
        out.push_str(&format!(
            " {key}=\"{}\"",
            html_escape::encode_double_quoted_attribute(val)
        ));
    }
    out.push('>');
    out
}

fn copied_attrs(doc: &Document, id: NodeId) -> Vec<(&str, String)> {
    doc.node(id)
        .attrs
        .iter()
        .map(|a| (a.key.as_str(), a.val.clone()))
        .collect()
}

fn with_class(class: &str, doc: &Document, id: NodeId) -> Vec<(&'static str, String)> {
    let mut attrs = vec![("class", class.to_string())];
    if let Some(label) = doc.attr(id, "id") {
        attrs.push(("id", label.to_string()));
    }
    attrs
}

impl HtmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block element: children indented on their own lines, closing tag on its own line.
    fn write_block(
        &mut self,
        out: &mut String,
        doc: &Document,
        id: NodeId,
        opts: &WriteOpts,
        tag: &str,
        attrs: &[(&str, String)],
    ) {
        out.push_str(&open_tag(tag, attrs));
        if doc.first_child(id).is_some() {
            write_children(self, out, doc, id, &opts.indented(), 0);
            out.push('\n');
            out.push_str(&opts.prefix);
        }
        out.push_str(&format!("</{tag}>"));
    }

    /// Line element: content continues after the opening tag; closes right after inline
    /// content, on its own line after a block.
    fn write_line(
        &mut self,
        out: &mut String,
        doc: &Document,
        id: NodeId,
        opts: &WriteOpts,
        tag: &str,
        attrs: &[(&str, String)],
    ) {
        let open = open_tag(tag, attrs);
        let hang = opts.prefix_width() + open.chars().count();
        out.push_str(&open);
        write_children(self, out, doc, id, &opts.indented(), hang);
        let inline_end = doc
            .last_child(id)
            .map_or(true, |last| !is_block(doc.kind(last)));
        if !inline_end {
            out.push('\n');
            out.push_str(&opts.prefix);
        }
        out.push_str(&format!("</{tag}>"));
    }

    /// Inline element: content and closing tag stay in the current line.
    fn write_inline(
        &mut self,
        out: &mut String,
        doc: &Document,
        id: NodeId,
        opts: &WriteOpts,
        tag: &str,
        attrs: &[(&str, String)],
    ) {
        let open = open_tag(tag, attrs);
        let hang = opts.prefix_width() + open.chars().count();
        out.push_str(&open);
        write_children(self, out, doc, id, opts, hang);
        out.push_str(&format!("</{tag}>"));
    }

    /// Render the collected footnotes as a trailing ordered list.
    pub fn write_footnotes(&mut self, out: &mut String, doc: &Document, opts: &WriteOpts) {
        if self.footnotes.is_empty() {
            return;
        }
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str(&opts.prefix);
        out.push_str("<ol class=\"footnotes\">");

        let item_opts = opts.indented();
        let mut index = 0;
        while index < self.footnotes.len() {
            let note = self.footnotes[index];
            let n = index + 1;
            let open = format!("<li id=\"fn:{n}\">");
            out.push('\n');
            out.push_str(&item_opts.prefix);
            out.push_str(&open);
            let hang = item_opts.prefix_width() + open.chars().count();
            write_children(self, out, doc, note, &item_opts.indented(), hang);
            out.push_str(&format!(" <a href=\"#fnref:{n}\">↩</a></li>"));
            index += 1;
        }

        out.push('\n');
        out.push_str(&opts.prefix);
        out.push_str("</ol>");
    }
}

impl TreeWriter for HtmlWriter {
    fn token_text(&self, token: &Token, _opts: &WriteOpts) -> String {
        if token.is_space() {
            return " ".to_string();
        }
        if matches!(token.kind, TokenKind::Punctuation | TokenKind::Symbol) {
            if let Some(markup) = token.first_char().and_then(marker_markup) {
                return markup.to_string();
            }
        }
        html_escape::encode_text(&token.value).into_owned()
    }

    fn lead(&self, doc: &Document, id: NodeId) -> Lead {
        let kind = doc.kind(id);
        if kind == NodeKind::Footnote {
            return Lead::Inline;
        }
        match doc.prev_sibling(id) {
            None => match doc.parent(id).map(|p| doc.kind(p)) {
                None | Some(NodeKind::Fragment) => Lead::Start,
                Some(parent) if continues_line(parent) => Lead::Inline,
                Some(_) => Lead::Newline,
            },
            Some(prev) => {
                let prev_kind = doc.kind(prev);
                if kind == NodeKind::Token && prev_kind.is_inline() {
                    after_inline(doc, id)
                } else if kind.is_inline() && prev_kind == NodeKind::Token {
                    if doc.token(prev).is_some_and(Token::is_space) {
                        Lead::Space
                    } else {
                        Lead::Inline
                    }
                } else if kind.is_inline() && prev_kind.is_inline() {
                    Lead::Inline
                } else if is_block(kind)
                    && is_block(prev_kind)
                    && doc.parent(id) == Some(doc.root())
                {
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
            NodeKind::Fragment | NodeKind::Run => {
                write_children(self, out, doc, id, opts, opts.prefix_width())
            }
            NodeKind::Token => {
                if let Some(token) = &node.token {
                    out.push_str(&self.token_text(token, opts));
                }
            }
            NodeKind::Text => out.push_str(&html_escape::encode_text(&node.data)),
            NodeKind::Paragraph => self.write_block(out, doc, id, opts, "p", &[]),
            NodeKind::Footnote => {
                self.footnotes.push(id);
                let n = self.footnotes.len();
                out.push_str(&format!(
                    "<sup id=\"fnref:{n}\"><a href=\"#fn:{n}\">{n}</a></sup>"
                ));
            }
            NodeKind::DisplayMath => {
                self.write_block(out, doc, id, opts, "div", &[("class", "displaymath".into())])
            }
            NodeKind::List => {
                let tag = if doc.list_ordered(id) { "ol" } else { "ul" };
                self.write_block(out, doc, id, opts, tag, &[]);
            }
            NodeKind::ListItem => self.write_line(out, doc, id, opts, "li", &[]),
            NodeKind::Section => {
                let tag = format!("h{}", doc.section_level(id).clamp(1, 6));
                let attrs = [("id", section_id(doc, id))];
                self.write_line(out, doc, id, opts, &tag, &attrs);
            }
            NodeKind::Comment => {
                out.push_str(&format!("<!--{}-->", node.data.replace("--", "- -")));
            }
            NodeKind::CenterAlign => {
                self.write_block(out, doc, id, opts, "div", &with_class("center", doc, id))
            }
            NodeKind::RightAlign => {
                self.write_block(out, doc, id, opts, "div", &with_class("right", doc, id))
            }
            NodeKind::Equation => {
                self.write_block(out, doc, id, opts, "div", &with_class("equation", doc, id))
            }
            NodeKind::Subequations => self.write_block(
                out,
                doc,
                id,
                opts,
                "div",
                &with_class("subequations", doc, id),
            ),
            NodeKind::Statement => {
                let class = match doc.attr(id, "type") {
                    Some(kind) => format!("statement {kind}"),
                    None => "statement".to_string(),
                };
                self.write_block(out, doc, id, opts, "div", &with_class(&class, doc, id));
            }
            NodeKind::Proof => {
                self.write_block(out, doc, id, opts, "div", &with_class("proof", doc, id))
            }
            NodeKind::Quote => {
                let attrs = copied_attrs(doc, id);
                self.write_block(out, doc, id, opts, "blockquote", &attrs);
            }
            NodeKind::Div => {
                let attrs = copied_attrs(doc, id);
                self.write_block(out, doc, id, opts, "div", &attrs);
            }
            NodeKind::Code => {
                let attrs = copied_attrs(doc, id);
                self.write_inline(out, doc, id, opts, "code", &attrs);
            }
            NodeKind::Link => {
                let attrs = copied_attrs(doc, id);
                self.write_inline(out, doc, id, opts, "a", &attrs);
            }
            NodeKind::Opaque => {
                let attrs = copied_attrs(doc, id);
                self.write_inline(out, doc, id, opts, &node.data, &attrs);
            }
            NodeKind::Image => {
                let attrs = copied_attrs(doc, id);
                out.push_str(&open_tag("img", &attrs));
            }
            NodeKind::Table => self.write_block(out, doc, id, opts, "table", &[]),
            NodeKind::TableHead => self.write_block(out, doc, id, opts, "thead", &[]),
            NodeKind::TableBody => self.write_block(out, doc, id, opts, "tbody", &[]),
            NodeKind::TableRow => self.write_block(out, doc, id, opts, "tr", &[]),
            NodeKind::TableHeaderCell => self.write_line(out, doc, id, opts, "th", &[]),
            NodeKind::TableCell => self.write_line(out, doc, id, opts, "td", &[]),
            NodeKind::Pre => {
                out.push_str("<pre>");
                out.push_str(&html_escape::encode_text(&node.data));
                out.push_str("</pre>");
            }
            // TeX-only and structured-data content has no HTML form; `renders` skips both
            NodeKind::TexOnly | NodeKind::Json => {}
        }
    }

    fn renders(&self, kind: NodeKind) -> bool {
        !matches!(kind, NodeKind::TexOnly | NodeKind::Json)
    }
}
