//! Indent rewriter.
//!
//! Plans the leading-whitespace changes for one multi-line signature. Lines
//! that start a parameter are set to `2 * indent + base_offset`; lines inside
//! a multi-line default or annotation move by the same amount as the line of
//! the parameter that owns them.

pub mod edit;

pub use edit::{Edit, apply};

use std::collections::HashMap;

use crate::analyze::ArgumentBoundaries;
use crate::locate::SignatureSpan;
use crate::parser::{Token, TokenKind};

/// Rewriter for a single signature
pub struct Rewriter<'a> {
    indent: usize,
    boundaries: &'a ArgumentBoundaries,
}

impl<'a> Rewriter<'a> {
    pub fn new(indent: usize, boundaries: &'a ArgumentBoundaries) -> Self {
        Self { indent, boundaries }
    }

    /// Compute the edits for `span` without touching the tokens
    pub fn plan(&self, tokens: &[Token], span: &SignatureSpan) -> Vec<Edit> {
        let target = 2 * self.indent + span.base_offset;
        // Parameter start line -> width change applied to it
        let mut shifts: HashMap<usize, isize> = HashMap::new();
        let mut edits = Vec::new();

        for index in span.inner() {
            if tokens[index].kind != TokenKind::Nl {
                continue;
            }

            let line_start = index + 1;
            let leading = (tokens[line_start].kind == TokenKind::Whitespace).then_some(line_start);
            let first = leading.map_or(line_start, |ws| ws + 1);
            let token = &tokens[first];

            if first == span.close || token.is_line_end() {
                continue;
            }

            let line = token.line();
            if self.boundaries.is_packed(line) {
                log::trace!("line {}: several parameters, left as is", line + 1);
                continue;
            }

            let owner = self.boundaries.owner_of(line);
            // `,    x=1`: the parameter's indentation is the whitespace after the comma
            let comma_led = owner.is_none() && token.is_op(",") && self.boundaries.starts_param(line);
            let (whitespace, insert_at) = if comma_led {
                let after = first + 1;
                ((tokens[after].kind == TokenKind::Whitespace).then_some(after), after)
            } else {
                (leading, line_start)
            };

            let current = whitespace.map_or(0, |ws| width(&tokens[ws].text));
            let desired = if let Some(owner) = owner {
                match shifts.get(&owner) {
                    Some(&delta) => current.saturating_add_signed(delta),
                    None => continue,
                }
            } else if comma_led || starts_parameter(token) {
                shifts.insert(line, target as isize - current as isize);
                target
            } else {
                continue;
            };

            if desired == current {
                continue;
            }

            let text = " ".repeat(desired);
            log::debug!("line {}: indent {} -> {}", line + 1, current, desired);
            edits.push(match whitespace {
                Some(index) => Edit::Replace { index, text },
                None => Edit::Insert { index: insert_at, text },
            });
        }

        edits
    }
}

/// Tokens that can begin a parameter line
fn starts_parameter(token: &Token) -> bool {
    match token.kind {
        TokenKind::Name | TokenKind::Comment | TokenKind::String => true,
        TokenKind::Op => matches!(token.text.as_str(), "*" | "**" | "/"),
        _ => false,
    }
}

fn width(whitespace: &str) -> usize {
    whitespace.chars().count()
}
