//! Signature locator.
//!
//! Finds every function definition whose parameter list spans several lines
//! and reports the token indices of its parentheses.

use crate::error::FixError;
use crate::parser::{Token, TokenKind};

/// One multi-line parameter list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureSpan {
    /// Index of the first keyword token (`async` or `def`)
    pub keyword: usize,
    /// Index of the opening parenthesis
    pub open: usize,
    /// Index of the matching closing parenthesis
    pub close: usize,
    /// Column of the first keyword
    pub base_offset: usize,
    /// Byte offset of the first keyword, the key into the boundary index
    pub keyword_byte: usize,
    /// Line of the first keyword (0-indexed)
    pub line: usize,
}

impl SignatureSpan {
    /// Token indices strictly between the parentheses
    pub fn inner(&self) -> std::ops::Range<usize> {
        self.open + 1..self.close
    }
}

/// Locate multi-line signatures, latest first.
///
/// Returning spans in descending token order lets the caller insert tokens
/// into one span without moving any span still to be processed.
pub fn locate(tokens: &[Token]) -> Result<Vec<SignatureSpan>, FixError> {
    let mut spans = Vec::new();

    for index in (0..tokens.len()).rev() {
        if !tokens[index].is_name("def") {
            continue;
        }

        let keyword = async_keyword(tokens, index).unwrap_or(index);
        let open = find_open_paren(tokens, index)?;
        let close = find_close_paren(tokens, open)?;
        let span = SignatureSpan {
            keyword,
            open,
            close,
            base_offset: tokens[keyword].span.start.col,
            keyword_byte: tokens[keyword].span.start.byte,
            line: tokens[keyword].line(),
        };

        if tokens[open].line() == tokens[close].line() {
            log::trace!("line {}: signature fits on one line", span.line + 1);
            continue;
        }
        if tokens[span.inner()].iter().all(Token::is_trivia) {
            log::trace!("line {}: signature has no parameters", span.line + 1);
            continue;
        }

        spans.push(span);
    }

    Ok(spans)
}

/// `async` directly before `def`, separated only by whitespace
fn async_keyword(tokens: &[Token], def: usize) -> Option<usize> {
    tokens[..def]
        .iter()
        .rposition(|token| token.kind != TokenKind::Whitespace)
        .filter(|&index| tokens[index].is_name("async"))
}

/// First `(` after the definition name that is not inside a type parameter list
fn find_open_paren(tokens: &[Token], def: usize) -> Result<usize, FixError> {
    let mut square = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(def + 1) {
        if token.kind != TokenKind::Op {
            if token.kind == TokenKind::Newline {
                break;
            }
            continue;
        }
        match token.text.as_str() {
            "[" => square += 1,
            "]" => square = square.saturating_sub(1),
            "(" if square == 0 => return Ok(index),
            _ => {}
        }
    }
    Err(FixError::invariant(
        "function definition without a parameter list",
        tokens[def].span.start.byte,
    ))
}

/// Matching `)` for the `(` at `open`, by depth counting
fn find_close_paren(tokens: &[Token], open: usize) -> Result<usize, FixError> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(open) {
        if token.is_op("(") {
            depth += 1;
        } else if token.is_op(")") {
            depth -= 1;
            if depth == 0 {
                return Ok(index);
            }
        }
    }
    Err(FixError::invariant(
        "unmatched parenthesis in function signature",
        tokens[open].span.start.byte,
    ))
}
