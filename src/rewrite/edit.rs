use crate::error::FixError;
use crate::parser::{Token, TokenKind};

/// A whitespace change planned for one line of a signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Replace the text of the whitespace token at `index`
    Replace { index: usize, text: String },
    /// Insert a whitespace token before `index`
    Insert { index: usize, text: String },
}

impl Edit {
    pub fn index(&self) -> usize {
        match self {
            Edit::Replace { index, .. } | Edit::Insert { index, .. } => *index,
        }
    }
}

/// Apply edits highest index first so pending indices stay valid.
///
/// An edit that points past the tokens, or replaces anything but whitespace,
/// is an internal error and leaves the remaining edits unapplied.
pub fn apply(tokens: &mut Vec<Token>, mut edits: Vec<Edit>) -> Result<(), FixError> {
    edits.sort_by(|a, b| b.index().cmp(&a.index()));
    for edit in edits {
        match edit {
            Edit::Replace { index, text } => {
                let Some(token) = tokens.get_mut(index) else {
                    return Err(out_of_range(tokens, index));
                };
                if token.kind != TokenKind::Whitespace {
                    return Err(FixError::invariant(
                        format!("edit replaces a {:?} token", token.kind),
                        token.span.start.byte,
                    ));
                }
                token.text = text;
            }
            Edit::Insert { index, text } => {
                let Some(at) = tokens.get(index).map(|token| token.span.start) else {
                    return Err(out_of_range(tokens, index));
                };
                tokens.insert(index, Token::whitespace(text, at));
            }
        }
    }
    Ok(())
}

fn out_of_range(tokens: &[Token], index: usize) -> FixError {
    let byte = tokens.last().map_or(0, |token| token.span.end.byte);
    FixError::invariant(format!("edit at token {} is out of range", index), byte)
}
