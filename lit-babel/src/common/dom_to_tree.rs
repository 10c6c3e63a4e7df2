//! Generic element tree → typed lit document
//!
//! # The High-Level Concept
//!
//! html5ever gives us an untyped tree of elements, text and comments. This module walks it
//! once, top-down, and builds the arena [`Document`]:
//!
//! - `div`s carrying `data-littype` (produced by sigil normalization) become the block kind
//!   they name; an unknown type is a fatal error.
//! - Elements with an inherent meaning (`p`, `h1`..`h6`, `ul`, `a`, `img`, `table`,
//!   `equation`, ...) map by tag name, with their attributes copied.
//! - Inline style elements (`i`, `b`, `span.t`, `br`, ...) dissolve into the style marker
//!   tokens the lexer would have produced from native text.
//! - Anything else is kept as an Opaque node that remembers its tag name.
//!
//! Text leaves are lexed into Token nodes. Comments become Comment nodes, or structured-data
//! nodes when they start with a `json:` or `yaml:` marker.

use super::sigils::restore;
use crate::error::FormatError;
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use lit_core::{lex, Document, NodeId, NodeKind, Token};
use log::{debug, warn};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use serde_json::Value;
use std::collections::BTreeMap;

/// Parse `markup` with html5ever and convert its body into a lit document.
pub fn parse_markup(markup: &str) -> Result<Document, FormatError> {
    let dom = parse_dom(markup);
    let mut doc = Document::new();
    let root = doc.root();
    match find_element(&dom.document, "body") {
        Some(body) => convert_children(&mut doc, root, &body)?,
        None => convert_children(&mut doc, root, &dom.document)?,
    }
    Ok(doc)
}

fn parse_dom(markup: &str) -> RcDom {
    let trimmed = markup.trim_start().to_ascii_lowercase();
    let source = if trimmed.starts_with("<!doctype") || trimmed.starts_with("<html") {
        markup.to_string()
    } else {
        format!("<!DOCTYPE html><html><head></head><body>{markup}</body></html>")
    };
    parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .one(source.as_bytes())
}

fn find_element(handle: &Handle, name: &str) -> Option<Handle> {
    if let NodeData::Element { name: ref qname, .. } = handle.data {
        if qname.local.as_ref() == name {
            return Some(handle.clone());
        }
    }
    for child in handle.children.borrow().iter() {
        if let Some(found) = find_element(child, name) {
            return Some(found);
        }
    }
    None
}

fn convert_children(
    doc: &mut Document,
    parent: NodeId,
    handle: &Handle,
) -> Result<(), FormatError> {
    let mut pending_space = false;
    for child in handle.children.borrow().iter() {
        match child.data {
            NodeData::Text { ref contents } => {
                convert(doc, parent, child)?;
                pending_space = contents.borrow().ends_with(char::is_whitespace);
            }
            NodeData::Element { .. } => {
                if pending_space {
                    space_before(doc, parent)?;
                }
                convert(doc, parent, child)?;
                pending_space = false;
            }
            _ => convert(doc, parent, child)?,
        }
    }
    Ok(())
}

/// The lexer drops spaces at the edges of a text leaf; put one back between inline siblings.
fn space_before(doc: &mut Document, parent: NodeId) -> Result<(), FormatError> {
    let needs_space = doc.last_child(parent).is_some_and(|last| match doc.token(last) {
        Some(token) => !token.is_space(),
        None => doc.kind(last).is_inline(),
    });
    if needs_space {
        let node = doc.create_token(Token::implicit_space());
        doc.append_child(parent, node)?;
    }
    Ok(())
}

fn convert(
    doc: &mut Document,
    parent: NodeId,
    handle: &Handle,
) -> Result<(), FormatError> {
    match handle.data {
        NodeData::Text { ref contents } => {
            append_text(doc, parent, &restore(&contents.borrow()))
        }
        NodeData::Comment { ref contents } => {
            let node = comment_node(doc, &restore(contents))?;
            doc.append_child(parent, node)?;
            Ok(())
        }
        NodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            let tag = name.local.as_ref().to_ascii_lowercase();
            let attrs: Vec<(String, String)> = attrs
                .borrow()
                .iter()
                .map(|a| (a.name.local.as_ref().to_string(), restore(&a.value)))
                .collect();
            convert_element(doc, parent, handle, &tag, &attrs)
        }
        NodeData::ProcessingInstruction { ref target, .. } => {
            warn!("ignoring processing instruction '{target}'");
            Ok(())
        }
        NodeData::Document | NodeData::Doctype { .. } => convert_children(doc, parent, handle),
    }
}

/// Lex `text` and append one Token node per token.
pub fn append_text(doc: &mut Document, parent: NodeId, text: &str) -> Result<(), FormatError> {
    let tokens = lex(text)?;
    if text.starts_with(' ') && !tokens.is_empty() {
        space_before(doc, parent)?;
    }
    for token in tokens {
        let node = doc.create_token(token);
        doc.append_child(parent, node)?;
    }
    Ok(())
}

fn append_marker(doc: &mut Document, parent: NodeId, marker: char) -> Result<(), FormatError> {
    let node = doc.create_token(Token::punctuation(marker));
    doc.append_child(parent, node)?;
    Ok(())
}

fn attr<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn lit_kind(littype: &str) -> Result<NodeKind, FormatError> {
    Ok(match littype {
        "paragraph" => NodeKind::Paragraph,
        "footnote" => NodeKind::Footnote,
        "displaymath" => NodeKind::DisplayMath,
        "list" => NodeKind::List,
        "listitem" => NodeKind::ListItem,
        "section" => NodeKind::Section,
        "run" => NodeKind::Run,
        other => return Err(FormatError::UnknownElementType(other.to_string())),
    })
}

fn tag_kind(tag: &str) -> NodeKind {
    match tag {
        "p" => NodeKind::Paragraph,
        "ul" | "ol" => NodeKind::List,
        "li" => NodeKind::ListItem,
        "a" => NodeKind::Link,
        "img" => NodeKind::Image,
        "table" => NodeKind::Table,
        "thead" => NodeKind::TableHead,
        "tbody" => NodeKind::TableBody,
        "tr" => NodeKind::TableRow,
        "th" => NodeKind::TableHeaderCell,
        "td" => NodeKind::TableCell,
        "blockquote" => NodeKind::Quote,
        "code" => NodeKind::Code,
        "pre" => NodeKind::Pre,
        "div" => NodeKind::Div,
        "equation" => NodeKind::Equation,
        "subequations" => NodeKind::Subequations,
        "statement" => NodeKind::Statement,
        "proof" => NodeKind::Proof,
        "center" => NodeKind::CenterAlign,
        "right" => NodeKind::RightAlign,
        "tex" => NodeKind::TexOnly,
        _ => NodeKind::Opaque,
    }
}

fn style_markers(tag: &str, attrs: &[(String, String)]) -> Option<(char, char)> {
    match tag {
        "i" | "em" => Some(('‹', '›')),
        "b" | "strong" => Some(('«', '»')),
        "span" => match attr(attrs, "class") {
            Some("t") => Some(('❬', '❭')),
            Some("c") => Some(('⁅', '⁆')),
            _ => None,
        },
        _ => None,
    }
}

fn convert_element(
    doc: &mut Document,
    parent: NodeId,
    handle: &Handle,
    tag: &str,
    attrs: &[(String, String)],
) -> Result<(), FormatError> {
    if tag == "script" || tag == "style" {
        debug!("dropping <{tag}> element");
        return Ok(());
    }
    if tag == "br" {
        return append_marker(doc, parent, '᜶');
    }
    if let Some((open, close)) = style_markers(tag, attrs) {
        append_marker(doc, parent, open)?;
        convert_children(doc, parent, handle)?;
        return append_marker(doc, parent, close);
    }
    if tag == "span" {
        return convert_children(doc, parent, handle);
    }
    if let Some(level) = heading_level(tag) {
        let node = doc.create(NodeKind::Section);
        doc.set_attr(node, "section-level", level.to_string());
        doc.set_attr(node, "section-numbered", "false");
        doc.append_child(parent, node)?;
        return convert_children(doc, node, handle);
    }

    let node = match (tag, attr(attrs, "data-littype")) {
        ("div", Some(littype)) => lit_node(doc, littype, attrs)?,
        _ => {
            let kind = tag_kind(tag);
            let node = match kind {
                NodeKind::Opaque => doc.create_with_data(kind, tag),
                _ => doc.create(kind),
            };
            for (key, val) in attrs {
                doc.set_attr(node, key, val.clone());
            }
            if tag == "ol" {
                doc.set_attr(node, "list-type", "ordered");
            }
            node
        }
    };
    doc.append_child(parent, node)?;

    match doc.kind(node) {
        NodeKind::Pre => {
            let mut text = String::new();
            collect_text(handle, &mut text);
            doc.node_mut(node).data = restore(&text);
            Ok(())
        }
        NodeKind::Paragraph if tag == "p" => {
            let run = doc.create(NodeKind::Run);
            doc.append_child(node, run)?;
            convert_children(doc, run, handle)
        }
        _ => convert_children(doc, node, handle),
    }
}

fn heading_level(tag: &str) -> Option<usize> {
    let digit = tag.strip_prefix('h')?;
    match digit.parse::<usize>() {
        Ok(level @ 1..=6) => Some(level),
        _ => None,
    }
}

fn lit_node(
    doc: &mut Document,
    littype: &str,
    attrs: &[(String, String)],
) -> Result<NodeId, FormatError> {
    let kind = lit_kind(littype)?;
    let node = doc.create(kind);
    match kind {
        NodeKind::List => {
            let list_type = attr(attrs, "data-litlisttype").unwrap_or("unordered");
            doc.set_attr(node, "list-type", list_type);
        }
        NodeKind::Section => {
            let level = attr(attrs, "data-litsectionlevel").unwrap_or("1");
            let numbered = attr(attrs, "data-litsectionnumbered").unwrap_or("false");
            doc.set_attr(node, "section-level", level);
            doc.set_attr(node, "section-numbered", numbered);
        }
        _ => {}
    }
    Ok(node)
}

fn collect_text(handle: &Handle, out: &mut String) {
    match handle.data {
        NodeData::Text { ref contents } => out.push_str(&contents.borrow()),
        _ => {
            for child in handle.children.borrow().iter() {
                collect_text(child, out);
            }
        }
    }
}

/// Markers that introduce a structured-data comment.
const STRUCTURED_MARKERS: [&str; 2] = ["json:", "yaml:"];

fn comment_node(doc: &mut Document, contents: &str) -> Result<NodeId, FormatError> {
    let trimmed = contents.trim_start();
    for marker in STRUCTURED_MARKERS {
        if let Some(payload) = trimmed.strip_prefix(marker) {
            let structured = decode_structured(marker, payload)?;
            let node = doc.create_with_data(NodeKind::Json, contents);
            doc.node_mut(node).structured = Some(structured);
            return Ok(node);
        }
    }
    Ok(doc.create_with_data(NodeKind::Comment, contents))
}

fn decode_structured(marker: &str, payload: &str) -> Result<BTreeMap<String, Value>, FormatError> {
    let decoded = match marker {
        "json:" => serde_json::from_str(payload).map_err(|e| e.to_string()),
        _ => serde_yaml::from_str(payload).map_err(|e| e.to_string()),
    };
    decoded.map_err(|message| FormatError::StructuredData {
        marker: marker.trim_end_matches(':').to_string(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lit_core::TokenKind;

    fn kinds(doc: &Document, id: NodeId) -> Vec<NodeKind> {
        doc.kids(id).map(|c| doc.kind(c)).collect()
    }

    #[test]
    fn lit_divs_map_to_kinds() {
        let doc = parse_markup(
            "<div data-littype='paragraph'><div data-littype='run'>hello world</div></div>",
        )
        .unwrap();
        let root = doc.root();
        assert_eq!(kinds(&doc, root), vec![NodeKind::Paragraph]);
        let para = doc.first_child(root).unwrap();
        let run = doc.first_child(para).unwrap();
        assert_eq!(doc.kind(run), NodeKind::Run);
        assert_eq!(doc.tokens(run).len(), 3);
    }

    #[test]
    fn unknown_lit_type_is_fatal() {
        let err = parse_markup("<div data-littype='sidebar'>x</div>").unwrap_err();
        assert_eq!(err, FormatError::UnknownElementType("sidebar".to_string()));
    }

    #[test]
    fn inline_styles_become_markers() {
        let doc = parse_markup("<p>an <i>it</i> and <b>bold</b><br></p>").unwrap();
        let run = doc.first_child(doc.first_child(doc.root()).unwrap()).unwrap();
        let values: Vec<String> = doc.tokens(run).iter().map(|t| t.value.clone()).collect();
        assert_eq!(
            values,
            vec!["an", "·", "‹", "it", "›", "·", "and", "·", "«", "bold", "»", "᜶"]
        );
    }

    #[test]
    fn headings_are_unnumbered_sections() {
        let doc = parse_markup("<h3>Results</h3>").unwrap();
        let section = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.kind(section), NodeKind::Section);
        assert_eq!(doc.section_level(section), 3);
        assert!(!doc.section_numbered(section));
    }

    #[test]
    fn unknown_tags_are_opaque() {
        let doc = parse_markup("<aside role='note'>x</aside>").unwrap();
        let node = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.kind(node), NodeKind::Opaque);
        assert_eq!(doc.node(node).data, "aside");
        assert_eq!(doc.attr(node, "role"), Some("note"));
    }

    #[test]
    fn scripts_are_dropped() {
        let doc = parse_markup("<script>var x;</script><p>x</p>").unwrap();
        assert_eq!(kinds(&doc, doc.root()), vec![NodeKind::Paragraph]);
    }

    #[test]
    fn pre_keeps_raw_text() {
        let doc = parse_markup("<pre>\nfn  main()\n  {}</pre>").unwrap();
        let pre = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.kind(pre), NodeKind::Pre);
        assert_eq!(doc.node(pre).data, "fn  main()\n  {}");
    }

    #[test]
    fn comments_and_structured_data() {
        let doc = parse_markup(
            "<!-- plain --><!-- json: {\"title\": \"Notes\"} --><!-- yaml: {draft: true} -->",
        )
        .unwrap();
        let root = doc.root();
        assert_eq!(
            kinds(&doc, root),
            vec![NodeKind::Comment, NodeKind::Json, NodeKind::Json]
        );
        let json = doc.kids(root).nth(1).unwrap();
        let structured = doc.node(json).structured.as_ref().unwrap();
        assert_eq!(structured["title"], Value::String("Notes".to_string()));
        let yaml = doc.kids(root).nth(2).unwrap();
        assert_eq!(
            doc.node(yaml).structured.as_ref().unwrap()["draft"],
            Value::Bool(true)
        );
    }

    #[test]
    fn malformed_structured_data_is_fatal() {
        let err = parse_markup("<!-- json: {oops -->").unwrap_err();
        assert!(matches!(err, FormatError::StructuredData { ref marker, .. } if marker == "json"));
    }

    #[test]
    fn lex_errors_propagate() {
        assert!(matches!(
            parse_markup("<p>bad \u{0301} mark</p>"),
            Err(FormatError::Lex(_))
        ));
    }

    #[test]
    fn link_keeps_href() {
        let doc = parse_markup("<a href='https://example.com'>site</a>").unwrap();
        let link = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.kind(link), NodeKind::Link);
        assert_eq!(doc.attr(link, "href"), Some("https://example.com"));
        assert_eq!(doc.tokens(link)[0].kind, TokenKind::Word);
    }

    #[test]
    fn spaces_around_inline_elements() {
        let doc = parse_markup("<p>see <a href='x'>it</a> now <code>c</code> </p>").unwrap();
        let run = doc.first_child(doc.first_child(doc.root()).unwrap()).unwrap();
        let kids: Vec<String> = doc
            .kids(run)
            .map(|id| match doc.token(id) {
                Some(token) => token.value.clone(),
                None => doc.kind(id).name().to_string(),
            })
            .collect();
        assert_eq!(
            kids,
            vec![
                "see",
                "·",
                NodeKind::Link.name(),
                "·",
                "now",
                "·",
                NodeKind::Code.name()
            ]
        );
    }
}
