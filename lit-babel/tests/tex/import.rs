//! Import tests for TeX format (TeX → lit)

use crate::common::{fixture, to_tex};
use lit_babel::formats::tex::parser::to_native;
use lit_babel::{parse_tex, FormatError};
use lit_core::{Document, NodeId, NodeKind};

fn top_kinds(doc: &Document) -> Vec<NodeKind> {
    doc.kids(doc.root()).map(|id| doc.kind(id)).collect()
}

fn find(doc: &Document, kind: NodeKind) -> NodeId {
    doc.descendants(doc.root())
        .into_iter()
        .find(|id| doc.kind(*id) == kind)
        .unwrap_or_else(|| panic!("no {kind:?} in document"))
}

#[test]
fn test_sample_structure() {
    let doc = parse_tex(&fixture("sample.tex")).unwrap();
    assert_eq!(
        top_kinds(&doc),
        vec![
            NodeKind::Section,
            NodeKind::Paragraph,
            NodeKind::Section,
            NodeKind::List,
            NodeKind::Equation,
            NodeKind::Paragraph,
        ]
    );

    let sections: Vec<NodeId> = doc
        .kids(doc.root())
        .filter(|id| doc.kind(*id) == NodeKind::Section)
        .collect();
    assert_eq!(doc.first_token_text(sections[0]), "Introduction");
    assert!(doc.section_numbered(sections[0]));
    assert_eq!(doc.section_level(sections[1]), 2);
    assert!(!doc.section_numbered(sections[1]));
}

#[test]
fn test_sample_inline_content() {
    let doc = parse_tex(&fixture("sample.tex")).unwrap();

    let paragraph = doc.kids(doc.root()).nth(1).unwrap();
    let runs: Vec<String> = doc
        .kids(paragraph)
        .map(|run| doc.first_token_text(run))
        .collect();
    assert_eq!(
        runs,
        vec!["Let $x ∈ A$ be ‹given›, and", "call it “good” — for now."]
    );

    let equation = find(&doc, NodeKind::Equation);
    assert_eq!(doc.attr(equation, "id"), Some("eq:sum"));

    let footnote = find(&doc, NodeKind::Footnote);
    assert_eq!(
        doc.kind(doc.parent(footnote).unwrap()),
        NodeKind::ListItem
    );

    let link = find(&doc, NodeKind::Link);
    assert_eq!(doc.attr(link, "href"), Some("https://example.com"));
    assert_eq!(doc.first_token_text(find(&doc, NodeKind::Code)), "code");
}

#[test]
fn test_comments_are_dropped() {
    let native = to_native(&fixture("sample.tex")).unwrap();
    assert!(!native.contains("Sample document"));
}

#[test]
fn test_import_then_export() {
    let doc = parse_tex(&fixture("sample.tex")).unwrap();
    let tex = to_tex(&doc);

    assert!(tex.starts_with("\\section{Introduction}\n\nLet $x \\in A$ be \\textit{given}, and"));
    assert!(tex.contains("\\subsection*{Related Work}"));
    assert!(tex.contains("\\begin{itemize}"));
    assert!(tex.contains("\\begin{equation}\\label{eq:sum}\na + b = c\n\\end{equation}"));
    assert!(tex.contains("\\href{https://example.com}{the site}"));
    assert!(tex.contains("\\texttt{code}"));
}

#[test]
fn test_unclosed_environment() {
    let err = parse_tex("\\begin{itemize}\n\\item one\n").unwrap_err();
    assert_eq!(
        err,
        FormatError::ParseError("itemize is never closed".to_string())
    );
}

#[test]
fn test_unclosed_group_reports_line() {
    let err = parse_tex("intro\n\n\\textbf{never closed").unwrap_err();
    assert!(matches!(err, FormatError::Structure { line: 3, .. }));
}
