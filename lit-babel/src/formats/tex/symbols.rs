//! LaTeX translation tables
//!
//! Two fixed tables: inline style and typographic punctuation (valid in prose), and the math
//! symbol table (symbols everywhere, letters only in math mode). The importer reuses both in
//! reverse.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Style markers and typographic punctuation.
const STYLE_TABLE: &[(char, &str)] = &[
    ('&', "\\&"),
    ('%', "\\%"),
    ('‹', "\\textit{"),
    ('›', "}"),
    ('«', "\\textbf{"),
    ('»', "}"),
    ('❬', "\\t{"),
    ('❭', "}"),
    ('⁅', "\\c{"),
    ('⁆', "}"),
    ('❮', "\\textbf{"),
    ('❯', "}"),
    ('⧼', "\\t{"),
    ('⧽', "}"),
    ('“', "\\say{"),
    ('”', "}"),
    ('–', "--"),
    ('—', "---"),
    ('‘', "`"),
    ('’', "'"),
    ('᜶', "\\\\"),
    ('↦', "{\\indent}"),
    ('↤', "{\\noindent}"),
];

const MATH_TABLE: &[(char, &str)] = &[
    ('→', "\\to"),
    ('↦', "\\mapsto"),
    ('≠', "\\neq"),
    ('∈', "\\in"),
    ('∉', "\\not\\in"),
    ('⊃', "\\supset"),
    ('⊇', "\\supseteq"),
    ('⊂', "\\subset"),
    ('⊆', "\\subseteq"),
    ('∅', "\\varnothing"),
    ('∪', "\\cup"),
    ('∩', "\\cap"),
    ('×', "\\times"),
    ('𝒞', "\\mathcal{C}"),
    ('∕', "/"),
    ('∏', "\\prod"),
    ('∑', "\\sum"),
    ('≡', "\\equiv"),
    ('≪', "\\ll"),
    ('≫', "\\gg"),
    ('≦', "\\leqq"),
    ('≺', "\\prec"),
    ('≻', "\\succ"),
    ('≼', "\\preceq"),
    ('≽', "\\succeq"),
    ('∫', "\\int"),
    ('∀', "\\forall"),
    ('∃', "\\exists"),
    ('∄', "\\not\\exists"),
    ('∞', "\\infty"),
    ('∝', "\\propto"),
    ('∘', "\\ocirc"),
    ('⋮', "\\vdots"),
    ('⋯', "\\cdots"),
    ('⋱', "\\ddots"),
    ('∼', "\\sim"),
    ('√', "\\sqrt"),
    ('±', "\\pm"),
    ('𝗥', "\\mathbfsf{R}"),
    ('𝗤', "\\mathbfsf{Q}"),
    ('𝗡', "\\mathbfsf{N}"),
    ('∇', "\\nabla"),
    ('∂', "\\partial"),
    ('α', "\\alpha"),
    ('β', "\\beta"),
    ('ψ', "\\psi"),
    ('δ', "\\delta"),
    ('ε', "\\varepsilon"),
    ('ϵ', "\\epsilon"),
    ('φ', "\\phi"),
    ('γ', "\\gamma"),
    ('η', "\\eta"),
    ('ι', "\\iota"),
    ('ξ', "\\xi"),
    ('κ', "\\kappa"),
    ('λ', "\\lambda"),
    ('μ', "\\mu"),
    ('ν', "\\nu"),
    ('ο', "\\omicron"),
    ('π', "\\pi"),
    ('ρ', "\\rho"),
    ('σ', "\\sigma"),
    ('τ', "\\tau"),
    ('θ', "\\theta"),
    ('ω', "\\omega"),
    ('χ', "\\chi"),
    ('υ', "\\upsilon"),
    ('ζ', "\\zeta"),
];

static STYLE: Lazy<HashMap<char, &'static str>> =
    Lazy::new(|| STYLE_TABLE.iter().copied().collect());

static MATH: Lazy<HashMap<char, &'static str>> =
    Lazy::new(|| MATH_TABLE.iter().copied().collect());

/// Backslash commands that map back to a single code point, longest first.
static REVERSE: Lazy<Vec<(&'static str, char)>> = Lazy::new(|| {
    let mut commands: Vec<(&'static str, char)> = MATH_TABLE
        .iter()
        .filter(|(_, cmd)| is_plain_command(cmd))
        .map(|(ch, cmd)| (*cmd, *ch))
        .collect();
    commands.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));
    commands
});

/// `\name` or `\name\name` with ASCII letters only; these can be matched as whole commands.
fn is_plain_command(cmd: &str) -> bool {
    cmd.starts_with('\\')
        && cmd
            .split('\\')
            .skip(1)
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphabetic()))
}

pub fn style(ch: char) -> Option<&'static str> {
    STYLE.get(&ch).copied()
}

pub fn math(ch: char) -> Option<&'static str> {
    MATH.get(&ch).copied()
}

/// Replace every math-table code point of `text`.
///
/// A command that ends in a letter is separated from a following ASCII letter by a space.
pub fn replace_math(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_letter_command = false;
    for ch in text.chars() {
        if pending_letter_command && ch.is_ascii_alphabetic() {
            out.push(' ');
        }
        match math(ch) {
            Some(cmd) => {
                out.push_str(cmd);
                pending_letter_command = cmd.ends_with(|c: char| c.is_ascii_alphabetic());
            }
            None => {
                out.push(ch);
                pending_letter_command = false;
            }
        }
    }
    out
}

/// Math commands paired with the code point they stand for, longest command first.
pub fn reverse_commands() -> &'static [(&'static str, char)] {
    &REVERSE
}
