pub mod analyze;
pub mod error;
pub mod locate;
pub mod parser;
pub mod rewrite;

use serde::Serialize;

use analyze::{BoundaryIndex, SyntaxAnalyzer};
use parser::LineIndex;
use rewrite::Rewriter;

pub use error::{ErrorKind, FixError, ParseError};

/// Configuration for a rewrite pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Width of one indentation level (default: 4)
    pub indent: usize,
}

impl Options {
    pub fn new(indent: usize) -> Result<Self, FixError> {
        if indent == 0 {
            return Err(FixError::InvalidIndent(indent));
        }
        Ok(Self { indent })
    }
}

impl Default for Options {
    fn default() -> Self {
        Self { indent: 4 }
    }
}

/// What happened to one multi-line signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureReport {
    /// Line of the `def` (or `async`) keyword, 1-indexed
    pub line: usize,
    pub base_offset: usize,
    pub lines_rewritten: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixResult {
    pub code: String,
    pub changed: bool,
    pub signatures: Vec<SignatureReport>,
}

/// Tokenize, locate, rewrite and serialize one source text
pub struct Pipeline {
    options: Options,
}

impl Pipeline {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn run(&self, source: &str) -> Result<FixResult, FixError> {
        let mut tokens = parser::tokenize(source)?;
        let spans = match locate::locate(&tokens) {
            Ok(spans) => spans,
            Err(err) => {
                // Input tree-sitter rejects is a syntax error, not a locator bug
                analyze(source)?;
                return Err(err);
            }
        };

        if spans.is_empty() {
            return Ok(FixResult {
                code: source.to_string(),
                changed: false,
                signatures: Vec::new(),
            });
        }

        let index = analyze(source)?;

        let mut signatures = Vec::with_capacity(spans.len());
        // Spans come latest first, so edits never move a span still pending
        for span in &spans {
            let boundaries = index.get(span.keyword_byte).ok_or_else(|| {
                FixError::invariant("signature has no matching function definition", span.keyword_byte)
            })?;
            let edits = Rewriter::new(self.options.indent, boundaries).plan(&tokens, span);
            log::debug!(
                "line {}: {} lines to rewrite (base offset {})",
                span.line + 1,
                edits.len(),
                span.base_offset
            );
            signatures.push(SignatureReport {
                line: span.line + 1,
                base_offset: span.base_offset,
                lines_rewritten: edits.len(),
            });
            rewrite::apply(&mut tokens, edits)?;
        }
        signatures.reverse();

        let code = parser::untokenize(&tokens);
        let changed = code != source;
        Ok(FixResult { code, changed, signatures })
    }
}

fn analyze(source: &str) -> Result<BoundaryIndex, FixError> {
    SyntaxAnalyzer::new()?.analyze(source, &LineIndex::new(source))
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

/// Rewrite every multi-line signature in `source` to the double-indent style.
pub fn fix_src(source: &str, indent: usize) -> Result<FixResult, FixError> {
    Pipeline::new(Options::new(indent)?).run(source)
}
