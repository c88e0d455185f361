//! Syntax analysis of function signatures.
//!
//! Parses the source with tree-sitter and records, for every function
//! definition, which lines start a parameter and which lines belong to the
//! inside of a multi-line default or annotation.

pub mod boundaries;

pub use boundaries::{ArgumentBoundaries, BoundaryIndex, ParamExtent};

use tree_sitter::{Node, Parser, Tree};

use crate::error::{ErrorKind, FixError, ParseError};
use crate::parser::{LineIndex, Span};

/// Builds a [`BoundaryIndex`] from Python source
pub struct SyntaxAnalyzer {
    parser: Parser,
}

impl SyntaxAnalyzer {
    pub fn new() -> Result<Self, FixError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| FixError::Grammar(format!("{e:?}")))?;
        Ok(Self { parser })
    }

    /// Parse `source` and collect the argument boundaries of every function definition
    pub fn analyze(&mut self, source: &str, lines: &LineIndex) -> Result<BoundaryIndex, FixError> {
        let tree = self.parse(source)?;
        let root = tree.root_node();

        if root.has_error() {
            let byte = first_error(root).map_or(0, |node| node.start_byte());
            let position = lines.position(source, byte);
            let err = ParseError::new(ErrorKind::InvalidSyntax, "invalid syntax", Span::point(position))
                .with_help("the file must parse as Python before signatures can be rewritten");
            return Err(FixError::Syntax(err));
        }

        let mut index = BoundaryIndex::new();
        let mut definitions = 0;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.kind() == "function_definition" {
                if let Some(parameters) = node.child_by_field_name("parameters") {
                    index.insert(node.start_byte(), collect_boundaries(parameters, lines));
                    definitions += 1;
                }
            }
            for i in 0..node.named_child_count() {
                if let Some(child) = node.named_child(i) {
                    stack.push(child);
                }
            }
        }

        log::trace!("found {} function definitions", definitions);
        Ok(index)
    }

    fn parse(&mut self, source: &str) -> Result<Tree, FixError> {
        self.parser
            .parse(source, None)
            .ok_or_else(|| FixError::invariant("tree-sitter returned no tree", 0))
    }
}

fn collect_boundaries(parameters: Node, lines: &LineIndex) -> ArgumentBoundaries {
    let closing_line = lines.line_of(parameters.end_byte().saturating_sub(1));

    let mut params = Vec::new();
    for i in 0..parameters.named_child_count() {
        let Some(child) = parameters.named_child(i) else {
            continue;
        };
        let start_line = lines.line_of(child.start_byte());
        match child.kind() {
            "comment" => {}
            "keyword_separator" | "positional_separator" => {
                params.push(ParamExtent::separator(start_line));
            }
            _ => {
                let end_line = lines.line_of(child.end_byte().saturating_sub(1));
                params.push(ParamExtent::new(start_line, end_line));
            }
        }
    }

    ArgumentBoundaries::from_params(&params, closing_line)
}

/// First ERROR or MISSING node in document order
fn first_error(root: Node) -> Option<Node> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            continue;
        }
        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }
    None
}
