//! Native emission against hand-checked output

use crate::common::{fixture, shape, to_lit};
use lit_babel::parse_lit;
use lit_babel::write_lit;
use lit_core::{NodeKind, WriteOpts};

#[test]
fn test_equation_after_run_gets_blank_line() {
    let raw = "
¶ ⦊
  ‖ Given the statuses $x$ and a group $H ⊂ P$, the number of
    tests required to determine the status of every specimen in
    $H$ is ⦉
  <equation id='eq:numtests'>
    ‖ T_H(x) = \\begin{cases} ⦉

    ‖ 1 & \\text{if } \\num{H} = 1 \\\\ ⦉

    ‖ 1 + \\num{H} S_H(x) & \\text{otherwise} ⦉

    ‖ \\end{cases} ⦉
  </equation>
⦉ ";

    let want = "¶ ⦊
  ‖ Given the statuses $x$ and a group $H ⊂ P$, the number of
    tests required to determine the status of every specimen in
    $H$ is ⦉

  <equation id='eq:numtests'>
    ‖ T_H(x) = \\begin{cases} ⦉

    ‖ 1 &amp; \\text{if } \\num{H} = 1 \\\\ ⦉

    ‖ 1 + \\num{H} S_H(x) &amp; \\text{otherwise} ⦉

    ‖ \\end{cases} ⦉
  </equation>
⦉";

    let doc = parse_lit(raw).unwrap();
    assert_eq!(to_lit(&doc), want);
}

#[test]
fn test_output_is_a_fixed_point() {
    let doc = parse_lit(&fixture("sample.lit")).unwrap();
    let once = to_lit(&doc);
    let twice = to_lit(&parse_lit(&once).unwrap());
    assert_eq!(once, twice);
}

#[test]
fn test_sample_structure() {
    let doc = parse_lit(&fixture("sample.lit")).unwrap();
    let kinds: Vec<NodeKind> = doc.kids(doc.root()).map(|id| doc.kind(id)).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Section,
            NodeKind::Paragraph,
            NodeKind::Section,
            NodeKind::List,
            NodeKind::DisplayMath,
            NodeKind::Statement,
            NodeKind::Comment,
        ]
    );

    let background = doc.kids(doc.root()).nth(2).unwrap();
    assert_eq!(doc.section_level(background), 2);
    assert!(!doc.section_numbered(background));

    let list = doc.kids(doc.root()).nth(3).unwrap();
    assert!(doc.list_ordered(list));
    let second = doc.last_child(list).unwrap();
    assert_eq!(doc.kind(doc.last_child(second).unwrap()), NodeKind::Footnote);

    let statement = doc.kids(doc.root()).nth(5).unwrap();
    assert_eq!(doc.attr(statement, "type"), Some("theorem"));
    assert!(doc
        .tokens(statement)
        .iter()
        .any(|token| token.value == "‖"));
}

#[test]
fn test_link_target_survives() {
    let doc = parse_lit(&fixture("sample.lit")).unwrap();
    let link = doc
        .descendants(doc.root())
        .into_iter()
        .find(|id| doc.kind(*id) == NodeKind::Link)
        .unwrap();
    assert_eq!(doc.attr(link, "href"), Some("https://example.com/?a=1&b=2"));
    assert_eq!(doc.first_token_text(link), "the site");

    let out = to_lit(&doc);
    assert!(out.contains("<a href='https://example.com/?a=1&amp;b=2'>the site</a> for more. ⦉"));
}

#[test]
fn test_write_lit_to_stream() {
    let doc = parse_lit("¶ ⦊ ‖ hello world ⦉ ⦉").unwrap();
    let para = doc.first_child(doc.root()).unwrap();

    let mut buf = Vec::new();
    write_lit(&mut buf, &doc, para, &WriteOpts::with_indent("    ")).unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), "¶ ⦊\n    ‖ hello world ⦉\n⦉");
}

#[test]
fn test_reparse_preserves_tree() {
    let doc = parse_lit(&fixture("sample.lit")).unwrap();
    let again = parse_lit(&to_lit(&doc)).unwrap();
    assert_eq!(shape(&doc), shape(&again));
}

#[test]
fn test_literal_entity_text_survives_rewrite() {
    let doc = parse_lit("¶ ⦊ ‖ a &amp;amp; b &lt;c ⦉ ⦉").unwrap();
    let values: Vec<String> = doc
        .tokens(doc.root())
        .iter()
        .map(|token| token.value.clone())
        .collect();
    assert_eq!(values, vec!["a", "·", "&", "amp", ";", "·", "b", "·", "<", "c"]);

    let out = to_lit(&doc);
    assert!(out.contains("‖ a &amp;amp; b &lt;c ⦉"));
    assert_eq!(shape(&doc), shape(&parse_lit(&out).unwrap()));
}

#[test]
fn test_stray_close_after_extension_element_is_dropped() {
    let doc = parse_lit("<equation>\n  ‖ x ⦉\n</equation>⦉\n").unwrap();
    let kinds: Vec<NodeKind> = doc.kids(doc.root()).map(|id| doc.kind(id)).collect();
    assert_eq!(kinds, vec![NodeKind::Equation]);
}

#[test]
fn test_unclosed_block_reports_line() {
    let err = parse_lit("¶ ⦊\n  ‖ open ⦉\n").unwrap_err();
    assert_eq!(
        err,
        lit_babel::FormatError::Structure {
            line: 1,
            message: "block is never closed".to_string()
        }
    );
}

#[test]
fn test_unknown_element_type() {
    let err = parse_lit("<div data-littype='sidebar'>x</div>").unwrap_err();
    assert_eq!(
        err,
        lit_babel::FormatError::UnknownElementType("sidebar".to_string())
    );
}
