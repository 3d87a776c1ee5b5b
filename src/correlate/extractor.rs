use crate::git::Commit;
use indexmap::IndexSet;
use regex::Regex;

/// Uppercase project prefix, a dash, and an issue number without leading zero.
pub const DEFAULT_KEY_PATTERN: &str = r"\b[A-Z][A-Z0-9]+-[1-9][0-9]*\b";

#[derive(Debug, Clone)]
pub struct IssueKeyExtractor {
    pattern: Regex,
}

impl IssueKeyExtractor {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Distinct issue keys in first-seen order.
    ///
    /// Only the subject is searched and only its first key counts: a subject
    /// naming several issues links to the first one.
    pub fn extract(&self, commits: &[Commit]) -> Vec<String> {
        commits
            .iter()
            .filter_map(|commit| self.pattern.find(&commit.subject))
            .map(|found| found.as_str().to_string())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }
}
