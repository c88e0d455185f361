use crate::parser::tokenizer::Span;
use std::fmt;
use thiserror::Error;

/// Kind of input-structure error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnterminatedString,
    UnterminatedTripleString,
    UnmatchedBracket,
    MismatchedBracket,
    UnclosedBracket,
    InconsistentDedent,
    UnexpectedCharacter,
    InvalidSyntax,
}

/// Error raised when the input cannot be tokenized or parsed
#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
    pub related_span: Option<Span>,
    pub related_label: Option<String>,
    pub help: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            related_span: None,
            related_label: None,
            help: None,
        }
    }

    /// Add a related span (e.g., where a bracket was opened)
    pub fn with_related(mut self, span: Span) -> Self {
        self.related_span = Some(span);
        self
    }

    /// Set the label for the related span
    pub fn with_related_label(mut self, label: impl Into<String>) -> Self {
        self.related_label = Some(label.into());
        self
    }

    /// Add help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the error with source context
    pub fn render(&self, source: &str, filename: &str) -> String {
        self.render_inner(source, filename, false)
    }

    /// Render the error with ANSI color codes
    pub fn render_color(&self, source: &str, filename: &str) -> String {
        self.render_inner(source, filename, true)
    }

    fn render_inner(&self, source: &str, filename: &str, color: bool) -> String {
        let red = if color { "\x1b[1;31m" } else { "" };
        let dim = if color { "\x1b[2m" } else { "" };
        let cyan = if color { "\x1b[1;38;5;73m" } else { "" };
        let reset = if color { "\x1b[0m" } else { "" };

        let mut output = String::new();
        output.push('\n');

        let line = self.span.start.line + 1;
        let col = self.span.start.col + 1;
        output.push_str(&format!(" {}file:{} {}:{}:{}\n", dim, reset, filename, line, col));
        output.push_str(&format!("{}error:{} {}\n", red, reset, self.message));

        let line_num_width = self.gutter_width();

        // Related span first when it comes earlier in the file (an opening bracket)
        let related_first = self
            .related_span
            .is_some_and(|related| related.start.line < self.span.start.line);
        if related_first {
            output.push_str(&format!("{}{:>width$} |{}\n", dim, "", reset, width = line_num_width));
            self.render_related(&mut output, source, color, line_num_width);
        }

        if let Some(source_line) = source_line(source, self.span.start.line) {
            let highlighted = if color { highlight_syntax(source_line) } else { source_line.to_string() };
            if !related_first {
                output.push_str(&format!("{}{:>width$} |{}\n", dim, "", reset, width = line_num_width));
            }
            output.push_str(&format!(
                "{}{:>width$} |{} {}\n",
                dim, line, reset, highlighted,
                width = line_num_width
            ));

            let (spaces, carets) = underline(&self.span, source_line);
            output.push_str(&format!(
                "{}{:>width$} |{} {}{}{}{}\n",
                dim, "", reset,
                spaces, red, carets, reset,
                width = line_num_width
            ));
        }

        if !related_first {
            self.render_related(&mut output, source, color, line_num_width);
        }

        if let Some(ref help) = self.help {
            output.push('\n');
            for (i, help_line) in help.lines().enumerate() {
                if i == 0 {
                    output.push_str(&format!(" {}help:{} {}\n", cyan, reset, help_line));
                } else {
                    output.push_str(&format!("       {}\n", help_line));
                }
            }
        }

        output.push('\n');
        output
    }

    fn gutter_width(&self) -> usize {
        let last_line = self
            .related_span
            .map_or(self.span.start.line, |related| related.start.line.max(self.span.start.line));
        format!("{}", last_line + 1).len().max(2)
    }

    fn render_related(&self, output: &mut String, source: &str, color: bool, line_num_width: usize) {
        let Some(related) = self.related_span else {
            return;
        };
        let Some(related_source_line) = source_line(source, related.start.line) else {
            return;
        };

        let dim = if color { "\x1b[2m" } else { "" };
        let reset = if color { "\x1b[0m" } else { "" };
        let highlighted = if color {
            highlight_syntax(related_source_line)
        } else {
            related_source_line.to_string()
        };
        output.push_str(&format!(
            "{}{:>width$} |{} {}\n",
            dim, related.start.line + 1, reset, highlighted,
            width = line_num_width
        ));

        let (spaces, carets) = underline(&related, related_source_line);
        let label = self.related_label.as_deref().unwrap_or("opened here");
        output.push_str(&format!(
            "{}{:>width$} |{} {}{}{} {}{}\n",
            dim, "", reset,
            spaces, dim, carets, label, reset,
            width = line_num_width
        ));
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.span.start.line + 1,
            self.span.start.col + 1,
            self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Error returned by the rewrite pipeline
#[derive(Debug, Error)]
pub enum FixError {
    /// The tokenizer rejected the input
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// The syntax tree for the input contains errors
    #[error("{0}")]
    Syntax(ParseError),

    /// A locator or rewriter invariant does not hold; this is a bug, not bad input
    #[error("internal error: {message} (at byte {byte})")]
    Invariant { message: String, byte: usize },

    #[error("indent width must be at least 1, got {0}")]
    InvalidIndent(usize),

    #[error("failed to load the Python grammar: {0}")]
    Grammar(String),
}

impl FixError {
    pub fn invariant(message: impl Into<String>, byte: usize) -> Self {
        FixError::Invariant { message: message.into(), byte }
    }

    /// True for failures that indicate a bug rather than unusable input
    pub fn is_internal(&self) -> bool {
        matches!(self, FixError::Invariant { .. } | FixError::Grammar(_))
    }

    /// Render the error with source context (no color)
    pub fn render(&self, source: &str, filename: &str) -> String {
        match self {
            FixError::Parse(err) | FixError::Syntax(err) => err.render(source, filename),
            other => format!("{}: error: {}\n", filename, other),
        }
    }

    /// Render the error with ANSI color codes
    pub fn render_color(&self, source: &str, filename: &str) -> String {
        match self {
            FixError::Parse(err) | FixError::Syntax(err) => err.render_color(source, filename),
            other => format!("{}: \x1b[1;31merror\x1b[0m: \x1b[1m{}\x1b[0m\n", filename, other),
        }
    }
}

fn source_line(source: &str, line: usize) -> Option<&str> {
    source.lines().nth(line).map(|l| l.trim_end_matches('\r'))
}

/// Leading spaces and carets underlining `span` on its first line
fn underline(span: &Span, source_line: &str) -> (String, String) {
    let start = span.start.col;
    let len = if span.end.line == span.start.line {
        span.end.col.saturating_sub(span.start.col).max(1)
    } else {
        source_line.chars().count().saturating_sub(start).max(1)
    };
    (" ".repeat(start), "^".repeat(len))
}

/// Syntax highlighting for error context lines
fn highlight_syntax(line: &str) -> String {
    const STRING: &str = "\x1b[38;5;72m";
    const KEYWORD: &str = "\x1b[38;5;173m";
    const NUMBER: &str = "\x1b[38;5;73m";
    const COMMENT: &str = "\x1b[38;5;244m";
    const RESET: &str = "\x1b[0m";

    const KEYWORDS: &[&str] = &[
        "if", "elif", "else", "for", "while", "with", "match", "case", "try", "except", "finally",
        "def", "class", "return", "yield", "import", "from", "pass", "break", "continue", "raise",
        "assert", "async", "await", "lambda", "None", "True", "False", "is", "in", "as", "or",
        "and", "not", "global", "nonlocal", "del",
    ];

    let mut result = String::with_capacity(line.len() * 2);
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '#' {
            result.push_str(COMMENT);
            result.extend(&chars[i..]);
            result.push_str(RESET);
            break;
        }

        if chars[i] == '"' || chars[i] == '\'' {
            let quote = chars[i];
            result.push_str(STRING);
            result.push(quote);
            i += 1;
            while i < chars.len() && chars[i] != quote {
                if chars[i] == '\\' && i + 1 < chars.len() {
                    result.push(chars[i]);
                    i += 1;
                }
                result.push(chars[i]);
                i += 1;
            }
            if i < chars.len() {
                result.push(quote);
                i += 1;
            }
            result.push_str(RESET);
            continue;
        }

        if chars[i].is_alphabetic() || chars[i] == '_' {
            let word_start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[word_start..i].iter().collect();
            if KEYWORDS.contains(&word.as_str()) {
                result.push_str(KEYWORD);
                result.push_str(&word);
                result.push_str(RESET);
            } else {
                result.push_str(&word);
            }
            continue;
        }

        if chars[i].is_ascii_digit() {
            result.push_str(NUMBER);
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '.' || chars[i] == '_') {
                result.push(chars[i]);
                i += 1;
            }
            result.push_str(RESET);
            continue;
        }

        result.push(chars[i]);
        i += 1;
    }

    result
}
