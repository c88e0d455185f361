pub mod positions;
pub mod tokenizer;

pub use positions::LineIndex;
pub use tokenizer::{Position, Span, Token, TokenKind, Tokenizer, tokenize, untokenize};
