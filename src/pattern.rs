//! Glob pattern sets for selecting files by base name.
//!
//! The same predicate serves both directions of the pipeline: the copier
//! treats a match as "exclude", the substituter treats it as "include".
//! Matching is always against the base file name, never the full path.

use glob::Pattern;

use crate::error::DeployError;

/// An ordered set of glob patterns parsed from a comma-separated string.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Empty set; matches nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a comma-separated pattern string (e.g. `"*.log, *.tmp"`).
    ///
    /// Pieces are trimmed and empty pieces dropped, so `""` and `None`-ish
    /// inputs yield the empty set. An invalid glob is a configuration error
    /// naming the offending option.
    pub fn parse(
        raw: &str,
        section: &'static str,
        option: &'static str,
    ) -> Result<Self, DeployError> {
        let mut patterns = Vec::new();
        for piece in raw.split(',') {
            let piece = piece.trim();
            if piece.is_empty() {
                continue;
            }
            let pattern = Pattern::new(piece).map_err(|_| DeployError::InvalidValue {
                section,
                option,
                value: piece.to_string(),
            })?;
            patterns.push(pattern);
        }
        Ok(Self { patterns })
    }

    /// True if `name` matches ANY pattern in the set.
    #[inline]
    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Number of patterns in the set.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}
