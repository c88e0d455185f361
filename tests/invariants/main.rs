//! Property checks over every fixture and several indent widths
//!
//! Run with: cargo test --test invariants

use double_indent::analyze::SyntaxAnalyzer;
use double_indent::locate::locate;
use double_indent::parser::{LineIndex, Token, TokenKind, tokenize};
use double_indent::{FixResult, fix_src};
use libtest_mimic::{Arguments, Failed, Trial};
use std::fs;
use std::path::{Path, PathBuf};

const INDENTS: [usize; 4] = [2, 3, 4, 8];

fn fixtures() -> Vec<PathBuf> {
    let pattern = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/cases/**/*.py");
    let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .expect("valid glob pattern")
        .filter_map(Result::ok)
        .filter(|path| !path.to_string_lossy().ends_with(".expected.py"))
        .collect();
    files.sort();
    files
}

fn fix(source: &str, indent: usize) -> Result<FixResult, Failed> {
    fix_src(source, indent).map_err(|e| Failed::from(format!("indent {}: {}", indent, e)))
}

/// Every token except whitespace, as (kind, text)
fn significant(source: &str) -> Result<Vec<(TokenKind, String)>, Failed> {
    let tokens = tokenize(source).map_err(|e| e.to_string())?;
    Ok(tokens
        .into_iter()
        .filter(|token| token.kind != TokenKind::Whitespace)
        .map(|token| (token.kind, token.text))
        .collect())
}

fn check_idempotent(source: &str) -> Result<(), Failed> {
    for indent in INDENTS {
        let once = fix(source, indent)?;
        let twice = fix(&once.code, indent)?;
        if twice.code != once.code {
            return Err(format!(
                "indent {}: second pass changed the output\n--- once ---\n{}\n--- twice ---\n{}",
                indent, once.code, twice.code
            )
            .into());
        }
    }
    Ok(())
}

fn check_preserved(source: &str) -> Result<(), Failed> {
    let before = significant(source)?;
    for indent in INDENTS {
        let after = significant(&fix(source, indent)?.code)?;
        if after != before {
            return Err(format!("indent {}: a non-whitespace token changed", indent).into());
        }
    }
    Ok(())
}

fn check_widths(source: &str) -> Result<(), Failed> {
    for indent in INDENTS {
        let code = fix(source, indent)?.code;
        let tokens = tokenize(&code).map_err(|e| e.to_string())?;
        let lines = LineIndex::new(&code);
        let index = SyntaxAnalyzer::new()?.analyze(&code, &lines)?;

        for span in locate(&tokens)? {
            let Some(boundaries) = index.get(span.keyword_byte) else {
                return Err(format!("line {}: no boundaries", span.line + 1).into());
            };
            let target = 2 * indent + span.base_offset;

            for i in span.inner().filter(|&i| tokens[i].kind == TokenKind::Nl) {
                let (width, first) = leading(&tokens, i + 1);
                let line = first.line();
                if !starts_line(first)
                    || boundaries.is_packed(line)
                    || boundaries.owner_of(line).is_some()
                {
                    continue;
                }
                if width != target {
                    return Err(format!(
                        "indent {}: line {} has width {}, expected {}",
                        indent,
                        line + 1,
                        width,
                        target
                    )
                    .into());
                }
            }
        }
    }
    Ok(())
}

/// Width of the leading whitespace at `start` and the first token after it
fn leading(tokens: &[Token], start: usize) -> (usize, &Token) {
    if tokens[start].kind == TokenKind::Whitespace {
        (tokens[start].text.chars().count(), &tokens[start + 1])
    } else {
        (0, &tokens[start])
    }
}

fn starts_line(token: &Token) -> bool {
    match token.kind {
        TokenKind::Name | TokenKind::String | TokenKind::Comment => true,
        TokenKind::Op => matches!(token.text.as_str(), "*" | "**" | "/"),
        _ => false,
    }
}

fn main() {
    let args = Arguments::from_args();

    let checks: [(&str, fn(&str) -> Result<(), Failed>); 3] = [
        ("idempotent", check_idempotent),
        ("preserved", check_preserved),
        ("widths", check_widths),
    ];

    let mut trials = Vec::new();
    for path in fixtures() {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("unknown").to_string();
        let source = fs::read_to_string(&path).unwrap_or_default();
        for (name, check) in checks {
            let source = source.clone();
            trials.push(Trial::test(format!("{}::{}", name, stem), move || check(&source)));
        }
    }

    libtest_mimic::run(&args, trials).exit();
}
