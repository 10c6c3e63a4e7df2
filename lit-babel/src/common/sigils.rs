//! Sigil normalization: native lit text → generic tag markup
//!
//! # The High-Level Concept
//!
//! Native lit spells block structure with single-character sigils (`¶ ⦊ … ⦉`, `‖ … ⦉`, `§§ … ⦉`).
//! Rather than writing a second nested parser, we rewrite every sigil into a `div` carrying a
//! `data-littype` attribute and every close marker `⦉` into `</div>`. The result is ordinary
//! nested markup that the generic tag parser (html5ever) handles, together with any extension
//! elements (`<equation>`, `<a href>`, ...) the author wrote directly.
//!
//! # Escapes
//!
//! A backslash before a sigil keeps it literal. Escaped sigils are swapped for private-use
//! placeholders before substitution and swapped back, without the backslash, when the text
//! leaves the generic tree (see [`restore`]).
//!
//! # Nesting Check
//!
//! html5ever never fails: it silently repairs missing close tags. So after substitution the
//! opens and closes are counted line by line, and a block that is never closed is reported
//! with the line it opens on. A close with nothing open is dropped with a warning, the same
//! way the tag parser ignores a stray end tag.

use crate::error::FormatError;
use log::{trace, warn};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Every character with structural meaning in native text, in placeholder order.
pub const SIGILS: [char; 10] = ['¶', '†', '◇', '⁝', '⁞', '§', '‖', '‣', '⦊', '⦉'];

/// Marks the start of the body of a container block.
pub const OPEN_MARKER: char = '⦊';
/// Closes any block.
pub const CLOSE_MARKER: char = '⦉';

const PLACEHOLDER_BASE: u32 = 0xE000;

static ESCAPED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\([¶†◇⁝⁞§‖‣⦊⦉])").unwrap());

static CONTAINER_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"([¶†◇⁝⁞])\s*⦊").unwrap());

static SECTION_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(§+)(\*?)").unwrap());

static DIV_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<div[\s>/]|</div\s*>").unwrap());

pub fn is_sigil(ch: char) -> bool {
    SIGILS.contains(&ch)
}

fn placeholder(sigil: char) -> Option<char> {
    let index = SIGILS.iter().position(|s| *s == sigil)?;
    char::from_u32(PLACEHOLDER_BASE + index as u32)
}

fn sigil_for(ch: char) -> Option<char> {
    let index = (ch as u32).checked_sub(PLACEHOLDER_BASE)? as usize;
    SIGILS.get(index).copied()
}

/// Swap escaped sigils for placeholders.
fn protect(text: &str) -> String {
    ESCAPED
        .replace_all(text, |caps: &Captures| {
            caps[1]
                .chars()
                .next()
                .and_then(placeholder)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Turn placeholders back into literal sigils.
pub fn restore(text: &str) -> String {
    text.chars().map(|c| sigil_for(c).unwrap_or(c)).collect()
}

/// Prefix every sigil in `text` with a backslash so it reads back literally.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if is_sigil(ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn container_tag(sigil: &str) -> &'static str {
    match sigil {
        "¶" => "<div data-littype='paragraph'>",
        "†" => "<div data-littype='footnote'>",
        "◇" => "<div data-littype='displaymath'>",
        "⁞" => "<div data-littype='list' data-litlisttype='ordered'>",
        _ => "<div data-littype='list' data-litlisttype='unordered'>",
    }
}

/// Rewrite native lit text into nested generic markup.
pub fn normalize(text: &str) -> Result<String, FormatError> {
    let protected = protect(text);

    let markup = CONTAINER_OPEN.replace_all(&protected, |caps: &Captures| container_tag(&caps[1]));
    let markup = SECTION_OPEN.replace_all(&markup, |caps: &Captures| {
        format!(
            "<div data-littype='section' data-litsectionlevel='{}' data-litsectionnumbered='{}'>",
            caps[1].chars().count(),
            caps[2].is_empty()
        )
    });
    let markup = markup
        .replace('‖', "<div data-littype='run'>")
        .replace('‣', "<div data-littype='listitem'>")
        .replace(CLOSE_MARKER, "</div>");

    let markup = check_nesting(&markup)?;
    trace!("normalized sigils: {markup}");
    Ok(markup)
}

/// Verify that every `<div>` open has a close and drop closes that match nothing.
///
/// Returns the markup without the unmatched closes; an unclosed block is an error naming the
/// line it opens on.
pub fn check_nesting(markup: &str) -> Result<String, FormatError> {
    let mut out = String::with_capacity(markup.len());
    let mut open_lines: Vec<usize> = Vec::new();
    for (index, line) in markup.split('\n').enumerate() {
        let line_no = index + 1;
        if index > 0 {
            out.push('\n');
        }
        let mut last = 0;
        for tag in DIV_TAG.find_iter(line) {
            if !tag.as_str().starts_with("</") {
                open_lines.push(line_no);
            } else if open_lines.pop().is_none() {
                warn!("line {line_no}: dropping unmatched {CLOSE_MARKER}");
                out.push_str(&line[last..tag.start()]);
                last = tag.end();
            }
        }
        out.push_str(&line[last..]);
    }
    match open_lines.pop() {
        Some(line) => Err(FormatError::Structure {
            line,
            message: "block is never closed".to_string(),
        }),
        None => Ok(out),
    }
}
