//! Export tests for TeX format (lit → TeX)

use crate::common::{fixture, to_tex};
use lit_babel::{parse_lit, write_tex};
use lit_core::WriteOpts;

const NUMTESTS_TEX: &str = "\\begin{equation}\\label{eq:numtests}
T_H(x) = \\begin{cases}
1 & \\text{if } \\num{H} = 1 \\\\
1 + \\num{H} S_H(x) & \\text{otherwise}
\\end{cases}
\\end{equation}";

fn equation_tex(raw: &str) -> String {
    let doc = parse_lit(raw).unwrap();
    let mut out = Vec::new();
    write_tex(&mut out, &doc, doc.root(), &WriteOpts::default()).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_equation_environment() {
    let raw = "
    <equation id='eq:numtests'>
      ‖ T_H(x) = \\begin{cases} ⦉

      ‖ 1 & \\text{if } \\num{H} = 1 \\\\ ⦉

      ‖ 1 + \\num{H} S_H(x) & \\text{otherwise} ⦉

      ‖ \\end{cases} ⦉
    </equation>
	";

    assert_eq!(equation_tex(raw), NUMTESTS_TEX);
}

#[test]
fn test_equation_with_trailing_stray_close() {
    let raw = "
    <equation id='eq:numtests'>
      ‖ T_H(x) = \\begin{cases} ⦉

      ‖ 1 & \\text{if } \\num{H} = 1 \\\\ ⦉

      ‖ 1 + \\num{H} S_H(x) & \\text{otherwise} ⦉

      ‖ \\end{cases} ⦉
    </equation>⦉
	";

    assert_eq!(equation_tex(raw), NUMTESTS_TEX);
}

#[test]
fn test_unnumbered_subsection() {
    let doc = parse_lit("§§* Related Work ⦉").unwrap();
    assert_eq!(to_tex(&doc), "\\subsection*{Related Work}");
}

#[test]
fn test_symbols_in_prose_and_math() {
    let doc = parse_lit("¶ ⦊ ‖ α ∈ A and 50% ⦉ ⦉ ◇ ⦊ ‖ α ∈ A ⦉ ⦉").unwrap();
    assert_eq!(
        to_tex(&doc),
        "α \\in A and 50\\%\n\n\\[\n\\alpha \\in A\n\\]"
    );
}

#[test]
fn test_sample_document() {
    let doc = parse_lit(&fixture("sample.lit")).unwrap();
    let tex = to_tex(&doc);

    assert!(tex.starts_with("\\section{Introduction}\n\n"));
    assert!(tex.contains("\\subsection*{Background}"));
    assert!(tex.contains("\\textit{this}"));
    assert!(tex.contains("\\textbf{bold}"));
    assert!(tex.contains("\\say{quoted}"));
    assert!(tex.contains("\\href{https://example.com/?a=1&b=2}{the site}"));
    assert!(tex.contains("\\begin{enumerate}"));
    assert!(tex.contains("\\footnote{"));
    assert!(tex.contains("\\begin{theorem}"));
    assert!(tex.contains("% a comment"));
}
