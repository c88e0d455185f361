use std::collections::{BTreeMap, HashMap};

/// Line extent of one parameter (0-indexed, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamExtent {
    pub start_line: usize,
    pub end_line: usize,
    /// Bare `*` or `/` marker; ends a multi-line parameter but is not a parameter itself
    pub separator: bool,
}

impl ParamExtent {
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self { start_line, end_line: end_line.max(start_line), separator: false }
    }

    pub fn separator(line: usize) -> Self {
        Self { start_line: line, end_line: line, separator: true }
    }

    pub fn is_multiline(&self) -> bool {
        self.end_line > self.start_line
    }
}

/// Argument boundary map for one signature.
///
/// Records which physical lines start a parameter and which lines are the
/// interior of a multi-line default value or annotation. Built once before
/// rewriting and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentBoundaries {
    /// Number of parameters starting on each line
    param_lines: BTreeMap<usize, usize>,
    /// Interior line -> start line of the parameter that owns it
    interior: BTreeMap<usize, usize>,
}

impl ArgumentBoundaries {
    /// Build the map from parameter extents and the line of the closing parenthesis.
    ///
    /// A multi-line parameter owns every line after its start line and before the
    /// next line on which another parameter starts; the last one owns lines up to
    /// (not including) the closing line.
    pub fn from_params(params: &[ParamExtent], closing_line: usize) -> Self {
        let mut param_lines = BTreeMap::new();
        for param in params {
            let count = param_lines.entry(param.start_line).or_insert(0);
            if !param.separator {
                *count += 1;
            }
        }

        let mut interior = BTreeMap::new();
        for param in params.iter().filter(|p| p.is_multiline()) {
            let bound = param_lines
                .range(param.start_line + 1..)
                .next()
                .map_or(closing_line, |(&line, _)| line)
                .min(closing_line);
            for line in param.start_line + 1..bound {
                interior.entry(line).or_insert(param.start_line);
            }
        }

        Self { param_lines, interior }
    }

    /// True if a parameter or a bare `*`/`/` marker starts on `line`
    pub fn starts_param(&self, line: usize) -> bool {
        self.param_lines.contains_key(&line)
    }

    /// True if several parameters start on `line` (left as found)
    pub fn is_packed(&self, line: usize) -> bool {
        self.param_lines.get(&line).is_some_and(|&count| count > 1)
    }

    /// Start line of the parameter whose multi-line expression contains `line`
    pub fn owner_of(&self, line: usize) -> Option<usize> {
        self.interior.get(&line).copied()
    }
}

/// Boundary maps for every function definition in a file, keyed by the byte
/// offset of the definition's first keyword (`async` or `def`)
#[derive(Debug, Clone, Default)]
pub struct BoundaryIndex {
    by_definition: HashMap<usize, ArgumentBoundaries>,
}

impl BoundaryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, keyword_byte: usize, boundaries: ArgumentBoundaries) {
        self.by_definition.insert(keyword_byte, boundaries);
    }

    pub fn get(&self, keyword_byte: usize) -> Option<&ArgumentBoundaries> {
        self.by_definition.get(&keyword_byte)
    }
}
