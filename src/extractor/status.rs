use crate::error::{Result, TaskMoverError};
use regex::Regex;

/// Unordered-list bullets that may introduce a task.
pub const BULLET_SYMBOLS: [char; 3] = ['-', '*', '+'];

/// Status fragment selecting tasks that are still open.
pub const DEFAULT_STATUS_PATTERN: &str = "[^xX-]";

/// Compiled task-status rule plus the structural task-line grammar
/// `\s*[-*+] \[<status>\].*`.
#[derive(Debug, Clone)]
pub struct StatusMatcher {
    status: Regex,
}

impl StatusMatcher {
    pub fn new(pattern: &str) -> Result<Self> {
        let status = Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| {
            TaskMoverError::InvalidStatusPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        Ok(Self { status })
    }

    pub fn matches_status(&self, status: &str) -> bool {
        self.status.is_match(status)
    }

    /// Returns true if `line` is a task item whose checkbox content matches
    /// the status rule.
    pub fn is_task(&self, line: &str) -> bool {
        let rest = line.trim_start();

        let mut chars = rest.chars();
        match chars.next() {
            Some(c) if BULLET_SYMBOLS.contains(&c) => {}
            _ => return false,
        }

        let Some(checkbox) = chars.as_str().strip_prefix(" [") else {
            return false;
        };

        // Any `]` may close the checkbox, the rest of the line is free text.
        checkbox
            .match_indices(']')
            .any(|(end, _)| self.matches_status(&checkbox[..end]))
    }
}

/// Number of whitespace characters before the first non-whitespace one.
/// Blank lines have no indentation and rank below every indented line.
pub fn indentation(line: &str) -> Option<usize> {
    line.chars().position(|c| !c.is_whitespace())
}
