//! TeX importer
//!
//! TeX source is rewritten into native lit text, which is then parsed the usual way. The
//! rewrite runs in a fixed order:
//!
//! 1. literal sigils are escaped and markup-significant characters entity-encoded
//! 2. comments are dropped
//! 3. brace groups (`\textit{}`, `\footnote{}`, `\section{}`, `\href{}{}`, ...) become
//!    style markers, footnote blocks, sections and links
//! 4. quotes, dashes, escapes and the reverse symbol table
//! 5. block environments and paragraphs are assembled line by line

use super::symbols::reverse_commands;
use crate::common::sigils;
use crate::error::FormatError;
use crate::formats::lit;
use lit_core::Document;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)(^|[^\\])(%.*)$").unwrap());

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\n\s*").unwrap());

static LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\label\{([^}]*)\}").unwrap());

static BLOCK_COMMAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\\(?:begin|end)\{(?:itemize|enumerate|equation|subequations|center|flushright|quote|quotation|proof)\}|\\item\b|\\\[|\\\]",
    )
    .unwrap()
});

/// Brace-group commands, rewritten in this order, with their replacement delimiters.
const GROUPS: &[(&str, &str, &str)] = &[
    ("textit", "‹", "›"),
    ("emph", "‹", "›"),
    ("textbf", "«", "»"),
    ("t", "❬", "❭"),
    ("c", "⁅", "⁆"),
    ("say", "“", "”"),
    ("texttt", "<code>", "</code>"),
    ("footnote", "† ⦊ ‖ ", " ⦉ ⦉"),
    ("section", "\n\n§ ", " ⦉\n\n"),
    ("section*", "\n\n§* ", " ⦉\n\n"),
    ("subsection", "\n\n§§ ", " ⦉\n\n"),
    ("subsection*", "\n\n§§* ", " ⦉\n\n"),
    ("subsubsection", "\n\n§§§ ", " ⦉\n\n"),
    ("subsubsection*", "\n\n§§§* ", " ⦉\n\n"),
];

/// Plain substitutions applied after the brace groups. Order matters: doubled quotes and
/// dashes before single ones.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("``", "“"),
    ("''", "”"),
    ("`", "‘"),
    ("'", "’"),
    ("---", "—"),
    ("--", "–"),
    ("\\&amp;", "&amp;"),
    ("\\\\", "᜶"),
    ("\\noindent", "↤"),
    ("\\indent", "↦"),
];

/// Link targets are held aside while the text rewrites run over the document.
const TARGET_OPEN: char = '\u{E100}';
const TARGET_CLOSE: char = '\u{E101}';

/// Parse TeX source into a document.
pub fn parse(source: &str) -> Result<Document, FormatError> {
    let native = to_native(source)?;
    lit::parse(&native)
}

/// Rewrite TeX source into native lit text.
pub fn to_native(source: &str) -> Result<String, FormatError> {
    let text = sigils::escape(source)
        .replace('&', "&amp;")
        .replace('<', "&lt;");
    let text = strip_comments(&text);

    let mut targets = Vec::new();
    let mut text = rewrite_links(&text, &mut targets)?;
    for (name, open, close) in GROUPS {
        text = rewrite_group(&text, name, open, close)?;
    }
    for (from, to) in REPLACEMENTS {
        text = text.replace(from, to);
    }
    let text = reverse_symbols(&text).replace("\\%", "%");

    let text = BLOCK_COMMAND.replace_all(&text, "\n$0\n");
    let native = assemble(&text)?;
    Ok(restore_targets(&native, &targets))
}

fn strip_comments(text: &str) -> String {
    for caps in COMMENT.captures_iter(text) {
        debug!("dropping comment: {:?}", &caps[2]);
    }
    COMMENT.replace_all(text, "$1").into_owned()
}

/// Byte index of the `}` closing the group whose `{` is at `open`.
fn matching_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, ch) in text[open..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

fn unclosed(text: &str, at: usize, name: &str) -> FormatError {
    FormatError::Structure {
        line: text[..at].matches('\n').count() + 1,
        message: format!("\\{name} is never closed"),
    }
}

/// Replace every `\name{body}` with `open body close`, the body joined onto one line.
fn rewrite_group(text: &str, name: &str, open: &str, close: &str) -> Result<String, FormatError> {
    let needle = format!("\\{name}{{");
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(&needle) {
        let brace = start + needle.len() - 1;
        let offset = text.len() - rest.len();
        let end = matching_brace(rest, brace).ok_or_else(|| unclosed(text, offset + start, name))?;
        let body = rewrite_group(&rest[brace + 1..end], name, open, close)?;
        out.push_str(&rest[..start]);
        out.push_str(open);
        out.push_str(LINE_BREAKS.replace_all(body.trim(), " ").as_ref());
        out.push_str(close);
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// `\href{target}{text}` becomes a link whose target is parked in `targets`.
fn rewrite_links(text: &str, targets: &mut Vec<String>) -> Result<String, FormatError> {
    const NEEDLE: &str = "\\href{";
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(NEEDLE) {
        let offset = text.len() - rest.len();
        let url_open = start + NEEDLE.len() - 1;
        let url_close =
            matching_brace(rest, url_open).ok_or_else(|| unclosed(text, offset + start, "href"))?;
        let text_open = url_close + 1;
        if !rest[text_open..].starts_with('{') {
            return Err(FormatError::Structure {
                line: text[..offset + start].matches('\n').count() + 1,
                message: "\\href needs a link text".to_string(),
            });
        }
        let text_close =
            matching_brace(rest, text_open).ok_or_else(|| unclosed(text, offset + start, "href"))?;

        targets.push(rest[url_open + 1..url_close].replace('"', "&quot;"));
        out.push_str(&rest[..start]);
        out.push_str(&format!(
            "<a href=\"{TARGET_OPEN}{}{TARGET_CLOSE}\">",
            targets.len() - 1
        ));
        out.push_str(&LINE_BREAKS.replace_all(rest[text_open + 1..text_close].trim(), " "));
        out.push_str("</a>");
        rest = &rest[text_close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn restore_targets(text: &str, targets: &[String]) -> String {
    let mut out = text.to_string();
    for (i, target) in targets.iter().enumerate() {
        out = out.replace(&format!("{TARGET_OPEN}{i}{TARGET_CLOSE}"), target);
    }
    out
}

/// Replace whole math commands (`\in`, but not the start of `\infty`) by their code point.
fn reverse_symbols(text: &str) -> String {
    let mut out = text.to_string();
    for (command, ch) in reverse_commands() {
        if !out.contains(command) {
            continue;
        }
        let mut replaced = String::with_capacity(out.len());
        let mut rest = out.as_str();
        while let Some(start) = rest.find(command) {
            let end = start + command.len();
            let whole = !rest[end..].starts_with(|c: char| c.is_ascii_alphabetic());
            replaced.push_str(&rest[..start]);
            if whole {
                replaced.push(*ch);
            } else {
                replaced.push_str(command);
            }
            rest = &rest[end..];
        }
        replaced.push_str(rest);
        out = replaced;
    }
    out
}

enum Env {
    List { ordered: bool, item_open: bool },
    Math { equation: bool, lines: Vec<String> },
    Element { name: String, tag: &'static str },
}

/// Line-by-line assembly of blocks and paragraphs.
#[derive(Default)]
struct Assembler {
    out: String,
    stack: Vec<Env>,
    paragraph: Vec<String>,
}

fn element_tag(env: &str) -> &'static str {
    match env {
        "center" => "center",
        "flushright" => "right",
        "proof" => "proof",
        "subequations" => "subequations",
        _ => "blockquote",
    }
}

fn environment(line: &str, command: &str) -> Option<String> {
    line.strip_prefix(command)
        .and_then(|rest| rest.strip_prefix('{'))
        .and_then(|rest| rest.strip_suffix('}'))
        .map(str::to_string)
}

impl Assembler {
    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        self.out.push_str("¶ ⦊\n");
        for line in self.paragraph.drain(..) {
            self.out.push_str(&format!("‖ {line} ⦉\n"));
        }
        self.out.push_str("⦉\n");
    }

    fn close_item(&mut self) {
        if let Some(Env::List { item_open, .. }) = self.stack.last_mut() {
            if *item_open {
                *item_open = false;
                self.out.push_str(" ⦉\n");
            }
        }
    }

    fn line(&mut self, line: &str) -> Result<(), FormatError> {
        if let Some(Env::Math { equation, lines }) = self.stack.last_mut() {
            let end = if *equation { "\\end{equation}" } else { "\\]" };
            if line != end {
                if !line.is_empty() {
                    lines.push(line.to_string());
                }
                return Ok(());
            }
        }

        match line {
            "" => self.flush_paragraph(),
            "\\item" => {
                self.close_item();
                match self.stack.last_mut() {
                    Some(Env::List { item_open, .. }) => *item_open = true,
                    _ => return Err(FormatError::ParseError("\\item outside of a list".into())),
                }
                self.out.push_str("‣ ");
            }
            "\\[" => {
                self.flush_paragraph();
                self.stack.push(Env::Math {
                    equation: false,
                    lines: Vec::new(),
                });
            }
            "\\]" | "\\end{equation}" => self.close_math()?,
            _ if line.starts_with('§') => {
                self.flush_paragraph();
                self.out.push_str(line);
                self.out.push('\n');
            }
            _ => {
                if let Some(env) = environment(line, "\\begin") {
                    self.begin(env);
                } else if let Some(env) = environment(line, "\\end") {
                    self.end(&env)?;
                } else {
                    self.text(line);
                }
            }
        }
        Ok(())
    }

    fn text(&mut self, line: &str) {
        match self.stack.last_mut() {
            Some(Env::List { item_open, .. }) => {
                if !*item_open {
                    *item_open = true;
                    self.out.push_str("‣ ");
                }
                if !self.out.ends_with(' ') {
                    self.out.push(' ');
                }
                self.out.push_str(line);
            }
            _ => self.paragraph.push(line.to_string()),
        }
    }

    fn begin(&mut self, env: String) {
        self.flush_paragraph();
        match env.as_str() {
            "itemize" | "enumerate" => {
                let ordered = env == "enumerate";
                self.out.push_str(if ordered { "⁞ ⦊\n" } else { "⁝ ⦊\n" });
                self.stack.push(Env::List {
                    ordered,
                    item_open: false,
                });
            }
            "equation" => self.stack.push(Env::Math {
                equation: true,
                lines: Vec::new(),
            }),
            _ => {
                let tag = element_tag(&env);
                self.out.push_str(&format!("<{tag}>\n"));
                self.stack.push(Env::Element { name: env, tag });
            }
        }
    }

    fn end(&mut self, env: &str) -> Result<(), FormatError> {
        self.flush_paragraph();
        self.close_item();
        match self.stack.pop() {
            Some(Env::List { ordered, .. })
                if env == if ordered { "enumerate" } else { "itemize" } =>
            {
                self.out.push_str("⦉\n");
            }
            Some(Env::Element { name, tag }) if name == env => {
                self.out.push_str(&format!("</{tag}>\n"));
            }
            _ => {
                return Err(FormatError::ParseError(format!(
                    "\\end{{{env}}} does not close the innermost environment"
                )))
            }
        }
        Ok(())
    }

    fn close_math(&mut self) -> Result<(), FormatError> {
        let Some(Env::Math { equation, lines }) = self.stack.pop() else {
            return Err(FormatError::ParseError(
                "math environment closed without being opened".into(),
            ));
        };
        let mut label = None;
        let lines: Vec<String> = lines
            .iter()
            .map(|line| {
                if let Some(caps) = LABEL.captures(line) {
                    label = Some(caps[1].to_string());
                }
                LABEL.replace_all(line, "").trim().to_string()
            })
            .filter(|line| !line.is_empty())
            .collect();

        if equation {
            match label {
                Some(id) => self.out.push_str(&format!("<equation id='{id}'>\n")),
                None => self.out.push_str("<equation>\n"),
            }
        } else {
            self.out.push_str("◇ ⦊\n");
        }
        for line in lines {
            self.out.push_str(&format!("‖ {line} ⦉\n"));
        }
        self.out
            .push_str(if equation { "</equation>\n" } else { "⦉\n" });
        Ok(())
    }

    fn finish(mut self) -> Result<String, FormatError> {
        self.flush_paragraph();
        if let Some(env) = self.stack.last() {
            let name = match env {
                Env::List { ordered: true, .. } => "enumerate".to_string(),
                Env::List { .. } => "itemize".to_string(),
                Env::Math { equation: true, .. } => "equation".to_string(),
                Env::Math { .. } => "\\[".to_string(),
                Env::Element { name, .. } => name.clone(),
            };
            return Err(FormatError::ParseError(format!("{name} is never closed")));
        }
        Ok(self.out)
    }
}

fn assemble(text: &str) -> Result<String, FormatError> {
    let mut assembler = Assembler::default();
    for line in text.lines() {
        assembler.line(line.trim())?;
    }
    assembler.finish()
}
