//! Import tests for CSV tables

use crate::common::{fixture, to_html, to_tex};
use lit_babel::{parse_csv, FormatRegistry};
use lit_core::NodeKind;

#[test]
fn test_people_table() {
    let doc = parse_csv(&fixture("people.csv")).unwrap();
    let table = doc.first_child(doc.root()).unwrap();
    assert_eq!(doc.kind(table), NodeKind::Table);

    let body = doc.last_child(table).unwrap();
    let rows: Vec<Vec<String>> = doc
        .kids(body)
        .map(|row| doc.kids(row).map(|cell| doc.first_token_text(cell)).collect())
        .collect();
    assert_eq!(
        rows,
        vec![
            vec!["Ada", "analyst", "likes \"engines\""],
            vec!["Alan", "logician, cryptographer", ""],
        ]
    );
}

#[test]
fn test_csv_to_html_table() {
    let doc = parse_csv("k,v\na,1\n").unwrap();
    let html = to_html(&doc);
    assert!(html.starts_with("<table>"));
    assert!(html.contains("<th>k</th>"));
    assert!(html.contains("<td>1</td>"));
    assert!(html.ends_with("</table>"));
}

#[test]
fn test_csv_to_tex_tabular() {
    let doc = parse_csv("k,v\na,1\n").unwrap();
    let tex = to_tex(&doc);
    assert!(tex.contains("k & v \\\\"));
    assert!(tex.contains("\\hline"));
    assert!(tex.contains("a & 1 \\\\"));
}

#[test]
fn test_detected_by_extension() {
    let registry = FormatRegistry::default();
    let format = registry.detect_format_from_filename("people.csv").unwrap();
    let doc = registry.parse(&fixture("people.csv"), &format).unwrap();
    assert_eq!(doc.kind(doc.first_child(doc.root()).unwrap()), NodeKind::Table);
}
