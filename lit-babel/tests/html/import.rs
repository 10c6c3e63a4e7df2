//! Import tests for HTML format (HTML → lit)

use crate::common::to_lit;
use lit_babel::format::Format;
use lit_babel::{parse_html, FormatRegistry, HtmlFormat};
use lit_core::NodeKind;

#[test]
fn test_full_document_uses_body() {
    let doc = parse_html(
        "<!DOCTYPE html><html><head><title>T</title><style>p {}</style></head>\
         <body><h1>Hello</h1><p>First <em>paragraph</em>.</p></body></html>",
    )
    .unwrap();
    let kinds: Vec<NodeKind> = doc.kids(doc.root()).map(|id| doc.kind(id)).collect();
    assert_eq!(kinds, vec![NodeKind::Section, NodeKind::Paragraph]);
}

#[test]
fn test_html_to_lit() {
    let doc = HtmlFormat::default()
        .parse("<h2>Notes</h2><p>Read <b>this</b>.</p><ol><li>one</li><li>two</li></ol>")
        .unwrap();
    assert_eq!(
        to_lit(&doc),
        "§§* Notes ⦉\n\n¶ ⦊\n  ‖ Read «this». ⦉\n⦉\n\n⁞ ⦊\n  ‣ one ⦉\n\n  ‣ two ⦉\n⦉"
    );
}

#[test]
fn test_table_cells() {
    let doc = parse_html(
        "<table><thead><tr><th>k</th></tr></thead><tbody><tr><td>v</td></tr></tbody></table>",
    )
    .unwrap();
    let table = doc.first_child(doc.root()).unwrap();
    assert_eq!(doc.kind(table), NodeKind::Table);
    let cells: Vec<NodeKind> = doc
        .descendants(table)
        .into_iter()
        .map(|id| doc.kind(id))
        .filter(|kind| matches!(kind, NodeKind::TableHeaderCell | NodeKind::TableCell))
        .collect();
    assert_eq!(cells, vec![NodeKind::TableHeaderCell, NodeKind::TableCell]);
}

#[test]
fn test_registry_converts_html_to_tex() {
    let registry = FormatRegistry::default();
    let doc = registry
        .parse("<h3>Method</h3><p>We use <i>care</i>.</p>", "html")
        .unwrap();
    let tex = registry.serialize(&doc, "tex").unwrap();
    assert_eq!(tex, "\\subsubsection*{Method}\n\nWe use \\textit{care}.");
}
