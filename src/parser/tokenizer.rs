use crate::error::{ErrorKind, ParseError};

/// Position in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Byte offset in source
    pub byte: usize,
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed, in characters)
    pub col: usize,
}

impl Position {
    pub fn new() -> Self {
        Self { byte: 0, line: 0, col: 0 }
    }
}

/// Span in source code (a range from start position to end position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn point(position: Position) -> Self {
        Self { start: position, end: position }
    }
}

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword
    Name,
    Number,
    /// String literal including prefix and quotes (f-strings are a single token)
    String,
    /// Operator or bracket
    Op,
    /// Comment including the leading `#`
    Comment,
    /// End of a logical line
    Newline,
    /// Line end that does not end a logical line (blank lines, comment-only lines, inside brackets)
    Nl,
    /// Whitespace that carries no block structure
    Whitespace,
    /// Backslash line continuation
    EscapedNl,
    /// Leading whitespace opening a deeper block
    Indent,
    /// Block close (always empty)
    Dedent,
    /// End of input (always empty)
    EndMarker,
}

/// A token with its exact source text.
///
/// Concatenating the text of every token reproduces the input byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self { kind, text: text.into(), span }
    }

    /// A synthetic whitespace token (used when inserting indentation)
    pub fn whitespace(text: impl Into<String>, at: Position) -> Self {
        Self::new(TokenKind::Whitespace, text, Span::point(at))
    }

    pub fn is_op(&self, op: &str) -> bool {
        self.kind == TokenKind::Op && self.text == op
    }

    pub fn is_name(&self, name: &str) -> bool {
        self.kind == TokenKind::Name && self.text == name
    }

    pub fn is_line_end(&self) -> bool {
        matches!(self.kind, TokenKind::Newline | TokenKind::Nl)
    }

    /// Whitespace, comments and line structure: everything that is not code
    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Whitespace
                | TokenKind::Comment
                | TokenKind::Nl
                | TokenKind::EscapedNl
                | TokenKind::Indent
                | TokenKind::Dedent
        )
    }

    pub fn line(&self) -> usize {
        self.span.start.line
    }
}

/// Operators, longest first so the first prefix match wins
const OPERATORS: &[&str] = &[
    "**=", "//=", ">>=", "<<=", "...",
    "**", "//", ">>", "<<", "<=", ">=", "==", "!=", "->", ":=",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "@=",
    "+", "-", "*", "/", "%", "@", "&", "|", "^", "~", "<", ">",
    "(", ")", "[", "]", "{", "}", ",", ":", ";", ".", "=",
];

/// Tokenizer for Python source text
pub struct Tokenizer<'a> {
    source: &'a str,
    position: Position,
    tokens: Vec<Token>,
    /// Open brackets and where each was opened
    brackets: Vec<(char, Span)>,
    /// Indentation widths of the enclosing blocks
    indents: Vec<usize>,
    /// Nothing but whitespace seen yet on the current logical line
    at_line_start: bool,
    /// Previous physical line ended in a backslash continuation
    continuation: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: Position::new(),
            tokens: Vec::new(),
            brackets: Vec::new(),
            indents: vec![0],
            at_line_start: true,
            continuation: false,
        }
    }

    /// Tokenize the entire source
    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        while !self.at_eof() {
            if self.at_line_start && self.brackets.is_empty() && !self.continuation {
                self.tokenize_indentation()?;
                continue;
            }
            self.tokenize_token()?;
        }

        if let Some((bracket, span)) = self.brackets.last() {
            return Err(ParseError::new(
                ErrorKind::UnclosedBracket,
                format!("'{}' was never closed", bracket),
                Span::point(self.position),
            )
            .with_related(*span)
            .with_related_label("opened here")
            .with_help(format!("Add the matching '{}'", closing_for(*bracket))));
        }

        while self.indents.len() > 1 {
            self.indents.pop();
            self.push(TokenKind::Dedent, String::new(), self.position);
        }
        self.push(TokenKind::EndMarker, String::new(), self.position);
        Ok(self.tokens)
    }

    // === Line structure ===

    /// Handle leading whitespace of a physical line outside brackets
    fn tokenize_indentation(&mut self) -> Result<(), ParseError> {
        let start = self.position;
        let mut width = 0;
        while let Some(c) = self.peek() {
            match c {
                ' ' => width += 1,
                '\t' => width = (width / 8 + 1) * 8,
                '\x0c' => width = 0,
                _ => break,
            }
            self.advance();
        }
        let text = self.slice_from(start);

        match self.peek() {
            // Blank, comment-only and final lines don't take part in indentation
            None | Some('\n') | Some('\r') | Some('#') => {
                if !text.is_empty() {
                    self.push(TokenKind::Whitespace, text, start);
                }
                if self.peek() == Some('#') {
                    self.tokenize_comment();
                }
                if self.at_newline() {
                    self.tokenize_newline(TokenKind::Nl);
                }
                return Ok(());
            }
            _ => {}
        }

        let current = self.indents.last().copied().unwrap_or(0);
        if width > current {
            self.indents.push(width);
            self.push(TokenKind::Indent, text, start);
        } else {
            while self.indents.last().is_some_and(|&level| level > width) {
                self.indents.pop();
                self.push(TokenKind::Dedent, String::new(), start);
            }
            if self.indents.last().copied().unwrap_or(0) != width {
                return Err(ParseError::new(
                    ErrorKind::InconsistentDedent,
                    "Unindent does not match any outer indentation level",
                    Span { start, end: self.position },
                )
                .with_help("Indent this line to the same level as an enclosing block"));
            }
            if !text.is_empty() {
                self.push(TokenKind::Whitespace, text, start);
            }
        }

        self.at_line_start = false;
        Ok(())
    }

    fn tokenize_newline(&mut self, kind: TokenKind) {
        let start = self.position;
        if self.peek() == Some('\r') {
            self.advance();
            if self.peek() == Some('\n') {
                self.advance();
            }
        } else {
            self.advance();
        }
        let text = self.slice_from(start);
        self.push(kind, text, start);
        if self.brackets.is_empty() {
            self.at_line_start = true;
        }
        self.continuation = false;
    }

    fn tokenize_comment(&mut self) {
        let start = self.position;
        while let Some(c) = self.peek() {
            if c == '\n' || c == '\r' {
                break;
            }
            self.advance();
        }
        let text = self.slice_from(start);
        self.push(TokenKind::Comment, text, start);
    }

    // === Tokens ===

    fn tokenize_token(&mut self) -> Result<(), ParseError> {
        let start = self.position;
        let Some(c) = self.peek() else {
            return Ok(());
        };

        match c {
            ' ' | '\t' | '\x0c' => {
                while matches!(self.peek(), Some(' ' | '\t' | '\x0c')) {
                    self.advance();
                }
                let text = self.slice_from(start);
                self.push(TokenKind::Whitespace, text, start);
            }
            '\n' | '\r' => {
                // A line with code outside brackets ends a logical line
                let kind = if self.brackets.is_empty() && !self.at_line_start {
                    TokenKind::Newline
                } else {
                    TokenKind::Nl
                };
                self.tokenize_newline(kind);
            }
            '#' => self.tokenize_comment(),
            '\\' => {
                self.advance();
                if !self.at_newline() {
                    return Err(ParseError::new(
                        ErrorKind::UnexpectedCharacter,
                        "Unexpected character after line continuation",
                        Span { start, end: self.position },
                    ));
                }
                if self.peek() == Some('\r') {
                    self.advance();
                }
                if self.peek() == Some('\n') {
                    self.advance();
                }
                let text = self.slice_from(start);
                self.push(TokenKind::EscapedNl, text, start);
                self.continuation = true;
            }
            '"' | '\'' => self.tokenize_string(start, false)?,
            c if c.is_ascii_digit() => self.tokenize_number(),
            '.' if self.peek_nth(1).is_some_and(|n| n.is_ascii_digit()) => self.tokenize_number(),
            c if is_name_start(c) => {
                while self.peek().is_some_and(is_name_continue) {
                    self.advance();
                }
                let source = self.source;
                let word = &source[start.byte..self.position.byte];
                if matches!(self.peek(), Some('"' | '\'')) && is_string_prefix(word) {
                    let formatted = word.to_ascii_lowercase().contains('f');
                    self.tokenize_string(start, formatted)?;
                } else {
                    let text = word.to_string();
                    self.push(TokenKind::Name, text, start);
                }
            }
            _ => self.tokenize_operator(start)?,
        }

        if !matches!(c, ' ' | '\t' | '\x0c' | '\n' | '\r' | '#' | '\\') {
            self.at_line_start = false;
        }
        Ok(())
    }

    fn tokenize_operator(&mut self, start: Position) -> Result<(), ParseError> {
        let source = self.source;
        let rest = &source[start.byte..];
        let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) else {
            let c = rest.chars().next().unwrap_or_default();
            self.advance();
            return Err(ParseError::new(
                ErrorKind::UnexpectedCharacter,
                format!("Unexpected character '{}'", c),
                Span { start, end: self.position },
            ));
        };

        for _ in op.chars() {
            self.advance();
        }
        let span = Span { start, end: self.position };

        match *op {
            "(" | "[" | "{" => {
                let bracket = op.chars().next().unwrap_or('(');
                self.brackets.push((bracket, span));
            }
            ")" | "]" | "}" => {
                let closing = op.chars().next().unwrap_or(')');
                match self.brackets.pop() {
                    None => {
                        return Err(ParseError::new(
                            ErrorKind::UnmatchedBracket,
                            format!("Unmatched '{}'", closing),
                            span,
                        ));
                    }
                    Some((opening, open_span)) if closing_for(opening) != closing => {
                        return Err(ParseError::new(
                            ErrorKind::MismatchedBracket,
                            format!("Closing '{}' does not match opening '{}'", closing, opening),
                            span,
                        )
                        .with_related(open_span)
                        .with_related_label("opened here"));
                    }
                    Some(_) => {}
                }
            }
            _ => {}
        }

        self.push(TokenKind::Op, op.to_string(), start);
        Ok(())
    }

    fn tokenize_number(&mut self) {
        let start = self.position;
        let radix_prefix = self.peek() == Some('0')
            && matches!(self.peek_nth(1), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B'));

        if radix_prefix {
            self.advance();
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit() || c == '_') {
                self.advance();
            }
        } else {
            self.consume_digits();
            if self.peek() == Some('.') {
                self.advance();
                self.consume_digits();
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                let signed = matches!(self.peek_nth(1), Some('+' | '-'));
                let digit_at = if signed { 2 } else { 1 };
                if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                    for _ in 0..digit_at {
                        self.advance();
                    }
                    self.consume_digits();
                }
            }
            if matches!(self.peek(), Some('j' | 'J')) {
                self.advance();
            }
        }

        let text = self.slice_from(start);
        self.push(TokenKind::Number, text, start);
    }

    fn consume_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
            self.advance();
        }
    }

    /// Tokenize a string literal; `start` is at the prefix (if any), the cursor at the quote
    fn tokenize_string(&mut self, start: Position, formatted: bool) -> Result<(), ParseError> {
        let quote = self.peek().unwrap_or('"');
        let triple = self.peek_nth(1) == Some(quote) && self.peek_nth(2) == Some(quote);
        let open_len = if triple { 3 } else { 1 };
        for _ in 0..open_len {
            self.advance();
        }

        let mut brace_depth = 0usize;
        loop {
            let Some(c) = self.peek() else {
                let (kind, message) = if triple {
                    (ErrorKind::UnterminatedTripleString, "Unterminated triple-quoted string")
                } else {
                    (ErrorKind::UnterminatedString, "Unterminated string literal")
                };
                return Err(ParseError::new(kind, message, Span { start, end: self.position })
                    .with_help(format!("Close the string with {}", quote.to_string().repeat(open_len))));
            };

            match c {
                '\\' => {
                    self.advance();
                    if self.peek() == Some('\r') && self.peek_nth(1) == Some('\n') {
                        self.advance();
                    }
                    if self.peek().is_some() {
                        self.advance();
                    }
                }
                '\n' | '\r' if !triple && brace_depth == 0 => {
                    return Err(ParseError::new(
                        ErrorKind::UnterminatedString,
                        "Unterminated string literal",
                        Span { start, end: self.position },
                    )
                    .with_help(format!("Close the string with {} before the end of the line", quote)));
                }
                '{' if formatted => {
                    self.advance();
                    if brace_depth == 0 && self.peek() == Some('{') {
                        self.advance();
                    } else {
                        brace_depth += 1;
                    }
                }
                '}' if formatted && brace_depth > 0 => {
                    self.advance();
                    brace_depth -= 1;
                }
                '"' | '\'' if formatted && brace_depth > 0 => {
                    // Nested literal inside a replacement field
                    let nested = self.position;
                    self.tokenize_string(nested, false)?;
                    self.tokens.pop();
                }
                c if c == quote => {
                    if !triple {
                        self.advance();
                        break;
                    }
                    if self.peek_nth(1) == Some(quote) && self.peek_nth(2) == Some(quote) {
                        for _ in 0..3 {
                            self.advance();
                        }
                        break;
                    }
                    self.advance();
                }
                _ => self.advance(),
            }
        }

        let text = self.slice_from(start);
        self.push(TokenKind::String, text, start);
        Ok(())
    }

    // === Cursor helpers ===

    fn at_eof(&self) -> bool {
        self.position.byte >= self.source.len()
    }

    fn at_newline(&self) -> bool {
        matches!(self.peek(), Some('\n' | '\r'))
    }

    fn peek(&self) -> Option<char> {
        self.source[self.position.byte..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.source[self.position.byte..].chars().nth(n)
    }

    fn advance(&mut self) {
        let Some(c) = self.peek() else {
            return;
        };
        self.position.byte += c.len_utf8();
        let lone_cr = c == '\r' && self.peek() != Some('\n');
        if c == '\n' || lone_cr {
            self.position.line += 1;
            self.position.col = 0;
        } else {
            self.position.col += 1;
        }
    }

    fn slice_from(&self, start: Position) -> String {
        self.source[start.byte..self.position.byte].to_string()
    }

    fn push(&mut self, kind: TokenKind, text: String, start: Position) {
        self.tokens.push(Token {
            kind,
            text,
            span: Span { start, end: self.position },
        });
    }
}

fn closing_for(opening: char) -> char {
    match opening {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_name_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn is_string_prefix(word: &str) -> bool {
    matches!(
        word.to_ascii_lowercase().as_str(),
        "r" | "u" | "b" | "f" | "br" | "rb" | "fr" | "rf"
    )
}

/// Tokenize Python source into a lossless token sequence
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    Tokenizer::new(source).tokenize()
}

/// Serialize tokens back to source text
pub fn untokenize(tokens: &[Token]) -> String {
    tokens.iter().map(|token| token.text.as_str()).collect()
}
