//! Greedy line packing
//!
//! Every emitter wraps inline content through [`line_blocks`]. The token sequence is split at
//! space sentinels into pieces, and pieces are packed onto lines while their code-point width
//! fits the budget. A piece is never split; one that is wider than the budget on its own gets a
//! line to itself.

use crate::token::Token;

/// Target width, in code points, of every wrapped line.
pub const MAX_WIDTH: usize = 66;

/// Ambient context threaded through the emitters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOpts {
    /// Written at the start of every line the current node owns
    pub prefix: String,
    /// One indentation unit, appended to `prefix` when descending into a container
    pub indent: String,
    /// Set inside display math and equations; changes TeX symbol translation
    pub in_math: bool,
}

impl Default for WriteOpts {
    fn default() -> Self {
        WriteOpts {
            prefix: String::new(),
            indent: "  ".to_string(),
            in_math: false,
        }
    }
}

impl WriteOpts {
    pub fn with_indent(indent: impl Into<String>) -> Self {
        WriteOpts {
            indent: indent.into(),
            ..WriteOpts::default()
        }
    }

    /// Options for the children of a container: one more indentation unit.
    pub fn indented(&self) -> Self {
        WriteOpts {
            prefix: format!("{}{}", self.prefix, self.indent),
            ..self.clone()
        }
    }

    /// Options for the body of a math construct.
    pub fn math(&self) -> Self {
        WriteOpts {
            in_math: true,
            ..self.clone()
        }
    }

    pub fn prefix_width(&self) -> usize {
        self.prefix.chars().count()
    }
}

/// Token text without any format-specific translation.
pub fn plain_text(token: &Token) -> String {
    if token.implicit && token.is_space() {
        " ".to_string()
    } else {
        token.value.clone()
    }
}

struct Piece {
    text: String,
    /// Rendered space that ended this piece; `None` for the last one
    separator: Option<String>,
}

fn pieces<F>(tokens: &[&Token], render: &F) -> Vec<Piece>
where
    F: Fn(&Token) -> String,
{
    let mut out = Vec::new();
    let mut text = String::new();
    for token in tokens {
        if token.is_space() {
            out.push(Piece {
                text: std::mem::take(&mut text),
                separator: Some(render(token)),
            });
        } else {
            text.push_str(&render(token));
        }
    }
    out.push(Piece {
        text,
        separator: None,
    });
    out
}

/// Pack `tokens` into lines no wider than `budget` code points.
///
/// Lines are trimmed and empty lines dropped.
pub fn line_blocks<F>(tokens: &[&Token], render: F, budget: usize) -> Vec<String>
where
    F: Fn(&Token) -> String,
{
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut used = 0usize;

    for piece in pieces(tokens, &render) {
        let width = piece.text.chars().count();
        let cost = if piece.separator.is_some() {
            width + 1
        } else {
            width
        };

        if used + cost > budget {
            lines.push(std::mem::take(&mut line));
            used = 0;
        }
        line.push_str(&piece.text);
        if let Some(separator) = &piece.separator {
            line.push_str(separator);
        }
        used += cost;
    }
    lines.push(line);

    lines
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Write `lines` joined by newlines, prefixing every line except possibly the first.
pub fn write_lines(out: &mut String, lines: &[String], prefix: &str, prefix_first: bool) {
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if i > 0 || prefix_first {
            out.push_str(prefix);
        }
        out.push_str(line);
    }
}
