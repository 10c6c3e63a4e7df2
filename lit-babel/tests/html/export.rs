//! Export tests for HTML format (lit → HTML)

use crate::common::{fixture, to_html};
use insta::assert_snapshot;
use lit_babel::{
    parse_lit, write_html, write_html_in_body, FormatError, FormatRegistry, HtmlOptions,
};
use lit_core::{Document, NodeKind, WriteOpts};
use std::collections::HashMap;
use std::io::Write;

#[test]
fn test_unnumbered_section_heading_id() {
    let doc = parse_lit("§§* Related Work ⦉").unwrap();
    let section = doc.first_child(doc.root()).unwrap();
    assert_eq!(doc.section_level(section), 2);
    assert!(!doc.section_numbered(section));
    assert_eq!(to_html(&doc), "<h2 id=\"Related_Work\">Related Work</h2>");
}

#[test]
fn test_two_footnotes_in_one_paragraph() {
    let doc = parse_lit("¶ ⦊ ‖ one † ⦊ ‖ first ⦉ ⦉ and two † ⦊ ‖ second ⦉ ⦉ ⦉ ⦉").unwrap();
    let html = to_html(&doc);

    let first = html.find("<sup id=\"fnref:1\"><a href=\"#fn:1\">1</a></sup>").unwrap();
    let second = html.find("<sup id=\"fnref:2\"><a href=\"#fn:2\">2</a></sup>").unwrap();
    assert!(first < second);

    assert!(html.ends_with(
        "<ol class=\"footnotes\">\n  \
         <li id=\"fn:1\">first <a href=\"#fnref:1\">↩</a></li>\n  \
         <li id=\"fn:2\">second <a href=\"#fnref:2\">↩</a></li>\n\
         </ol>"
    ));
}

#[test]
fn test_paragraph_and_list() {
    let doc = parse_lit("¶ ⦊ ‖ Some ‹text› here. ⦉ ⦉ ⁝ ⦊ ‣ a ⦉ ‣ b ⦉ ⦉").unwrap();
    assert_snapshot!(to_html(&doc), @r###"
    <p>
      Some <i>text</i> here.
    </p>

    <ul>
      <li>a</li>
      <li>b</li>
    </ul>
    "###);
}

#[test]
fn test_sample_document() {
    let doc = parse_lit(&fixture("sample.lit")).unwrap();
    let html = to_html(&doc);

    assert!(html.starts_with("<h1 id=\"Introduction\">Introduction</h1>"));
    assert!(html.contains("<h2 id=\"Background\">Background</h2>"));
    assert!(html.contains("<i>this</i>"));
    assert!(html.contains("<b>bold</b>"));
    assert!(html.contains("<a href=\"https://example.com/?a=1&amp;b=2\">the site</a>"));
    assert!(html.contains("<ol>"));
    assert!(html.contains("<div class=\"displaymath\">"));
    assert!(html.contains("<div class=\"statement theorem\">"));
    assert!(html.contains("<!-- a comment -->"));
    assert_eq!(html.matches("<li id=\"fn:").count(), 1);
}

#[test]
fn test_in_body_writes_only_the_subtree() {
    let doc = parse_lit("¶ ⦊ ‖ kept † ⦊ ‖ note ⦉ ⦉ ⦉ ⦉ ¶ ⦊ ‖ skipped ⦉ ⦉").unwrap();
    let first = doc.first_child(doc.root()).unwrap();
    assert_eq!(doc.kind(first), NodeKind::Paragraph);

    let mut buf = Vec::new();
    write_html_in_body(&mut buf, &doc, first, &WriteOpts::default()).unwrap();
    let html = String::from_utf8(buf).unwrap();
    assert!(html.starts_with("<p>"));
    assert!(html.contains("<li id=\"fn:1\">note"));
    assert!(!html.contains("skipped"));
}

#[test]
fn test_standalone_with_custom_css() {
    let doc = parse_lit("§ Title ⦉").unwrap();
    let options = HtmlOptions {
        standalone: true,
        title: None,
        custom_css: Some("h1 { color: red; }".to_string()),
    };
    let mut buf = Vec::new();
    write_html(&mut buf, &doc, &options).unwrap();
    let html = String::from_utf8(buf).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Title</title>"));
    assert!(html.contains("h1 { color: red; }"));
    assert!(html.contains("<div class=\"lit-document\">\n<h1 id=\"Title\">Title</h1>\n</div>"));
}

#[test]
fn test_empty_document() {
    assert_eq!(to_html(&Document::new()), "");
}

#[test]
fn test_css_path_option_through_registry() {
    let mut css = tempfile::NamedTempFile::new().unwrap();
    write!(css, ".lit-document {{ max-width: 40em; }}").unwrap();

    let mut options = HashMap::new();
    options.insert("standalone".to_string(), "true".to_string());
    options.insert(
        "css-path".to_string(),
        css.path().to_string_lossy().into_owned(),
    );

    let doc = parse_lit("¶ ⦊ ‖ hi ⦉ ⦉").unwrap();
    let html = FormatRegistry::default()
        .serialize_with_options(&doc, "html", &options)
        .unwrap();
    assert!(html.contains(".lit-document { max-width: 40em; }"));
    assert!(html.contains("<p>\n  hi\n</p>"));
}

#[test]
fn test_unknown_option_is_rejected() {
    let mut options = HashMap::new();
    options.insert("theme".to_string(), "dark".to_string());

    let doc = parse_lit("¶ ⦊ ‖ hi ⦉ ⦉").unwrap();
    let err = FormatRegistry::default()
        .serialize_with_options(&doc, "html", &options)
        .unwrap_err();
    assert!(matches!(err, FormatError::NotSupported(_)));
}
