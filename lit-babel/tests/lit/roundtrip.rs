//! Property tests: native write then parse gives back the same tree

use crate::common::{shape, to_html, to_lit, to_tex};
use lit_babel::parse_lit;
use lit_core::MAX_WIDTH;
use once_cell::sync::Lazy;
use proptest::prelude::*;
use regex::Regex;

fn word() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z]{1,10}",
        "[a-z]{1,6}[.,;:!?]",
        "[0-9]{1,4}",
        "[α-ω]{1,4}",
        Just("‹it›".to_string()),
        Just("$x$".to_string()),
        Just("&".to_string()),
        Just("&amp;".to_string()),
        Just("&amp;amp;".to_string()),
        Just("&lt;".to_string()),
        Just(">".to_string()),
        Just("\\‖".to_string()),
        Just("\\¶".to_string()),
        Just("\\⦉".to_string()),
        Just("\\§".to_string()),
    ]
}

/// Words plus opaque spans, whose line breaks and spaces are kept verbatim.
fn run_word() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => word(),
        1 => "❲[a-z \n]{0,6}❳",
        1 => r"[a-z]{1,4}❲\\[a-z]{1,3}❳",
    ]
}

fn prose() -> impl Strategy<Value = String> {
    prop::collection::vec(run_word(), 1..60).prop_map(|words| words.join(" "))
}

fn title() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 1..12).prop_map(|words| words.join(" "))
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            prop::collection::vec(prose(), 1..4).prop_map(|runs| {
                let runs: Vec<String> = runs.iter().map(|r| format!("‖ {r} ⦉")).collect();
                format!("¶ ⦊ {} ⦉", runs.join(" "))
            }),
            title().prop_map(|title| format!("§§ {title} ⦉")),
            prop::collection::vec(prose(), 1..4).prop_map(|items| {
                let items: Vec<String> = items.iter().map(|i| format!("‣ {i} ⦉")).collect();
                format!("⁝ ⦊ {} ⦉", items.join(" "))
            }),
        ],
        1..5,
    )
    .prop_map(|blocks| blocks.join("\n\n"))
}

/// Closers written after the last wrapped line: ` ⦉`, `}` and end tags.
static CLOSERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?: ⦉|\}|</[a-z0-9]+>)+$").unwrap());

/// Lines holding wrapped content, closers removed. Heading lines are skipped: a long id
/// makes the opening tag itself wider than the budget.
fn content_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("<h"))
        .map(|line| CLOSERS.replace(line, "").into_owned())
        .collect()
}

proptest! {
    #[test]
    fn native_round_trip(source in document()) {
        let doc = parse_lit(&source).unwrap();
        let written = to_lit(&doc);
        let again = parse_lit(&written).unwrap();
        prop_assert_eq!(shape(&doc), shape(&again));
    }

    #[test]
    fn wrapped_lines_fit_the_width(source in document()) {
        let doc = parse_lit(&source).unwrap();
        for text in [to_lit(&doc), to_tex(&doc), to_html(&doc)] {
            for line in content_lines(&text) {
                prop_assert!(
                    line.chars().count() <= MAX_WIDTH,
                    "line too wide ({}): {:?}",
                    line.chars().count(),
                    line
                );
            }
        }
    }

    #[test]
    fn footnotes_are_balanced(notes in prop::collection::vec("[a-z]{1,8}", 0..6)) {
        let runs: Vec<String> = notes
            .iter()
            .map(|n| format!("‖ see † ⦊ ‖ {n} ⦉ ⦉ ⦉"))
            .collect();
        let source = format!("¶ ⦊ {} ⦉", runs.join(" "));
        let html = to_html(&parse_lit(&source).unwrap());

        prop_assert_eq!(html.matches("<sup id=\"fnref:").count(), notes.len());
        prop_assert_eq!(html.matches("<li id=\"fn:").count(), notes.len());
        for (i, note) in notes.iter().enumerate() {
            let n = i + 1;
            let marker = html.find(&format!("<a href=\"#fn:{n}\">{n}</a>")).unwrap();
            let entry = html.find(&format!("<li id=\"fn:{n}\">{note} <a href=\"#fnref:{n}\">↩</a></li>"));
            prop_assert!(entry.is_some(), "missing entry {}: {}", n, html);
            prop_assert!(marker < entry.unwrap());
        }
    }
}
