use crate::error::Result;
use crate::extractor::status::{indentation, StatusMatcher, DEFAULT_STATUS_PATTERN};
use serde::{Deserialize, Serialize};

/// Parameters for a single extraction call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtractOptions {
    pub include_children: bool,
    pub status_pattern: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            include_children: false,
            status_pattern: DEFAULT_STATUS_PATTERN.to_string(),
        }
    }
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(mut self, include_children: bool) -> Self {
        self.include_children = include_children;
        self
    }

    pub fn with_status_pattern<S: Into<String>>(mut self, pattern: S) -> Self {
        self.status_pattern = pattern.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Task,
    Child,
}

/// A selected line together with its position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtractedLine<'a> {
    pub index: usize,
    pub text: &'a str,
    pub kind: LineKind,
}

/// Finds task items in a sequence of Markdown lines, optionally carrying
/// along the lines nested below each task.
pub struct TaskExtractor<'a, S> {
    lines: &'a [S],
    include_children: bool,
}

impl<'a, S: AsRef<str>> TaskExtractor<'a, S> {
    pub fn new(lines: &'a [S], include_children: bool) -> Self {
        Self {
            lines,
            include_children,
        }
    }

    /// Returns every task matching `status_pattern`, each followed by its
    /// children when enabled, in document order.
    pub fn extract(&self, status_pattern: &str) -> Result<Vec<String>> {
        Ok(self
            .extract_indexed(status_pattern)?
            .into_iter()
            .map(|line| line.text.to_string())
            .collect())
    }

    pub fn extract_indexed(&self, status_pattern: &str) -> Result<Vec<ExtractedLine<'a>>> {
        let matcher = StatusMatcher::new(status_pattern)?;
        Ok(self.extract_with_matcher(&matcher))
    }

    pub fn extract_with_matcher(&self, matcher: &StatusMatcher) -> Vec<ExtractedLine<'a>> {
        let mut extracted = Vec::new();
        let mut linum = 0;

        while linum < self.lines.len() {
            let line = self.line(linum);
            linum += 1;

            if !matcher.is_task(line) {
                continue;
            }

            extracted.push(ExtractedLine {
                index: linum - 1,
                text: line,
                kind: LineKind::Task,
            });

            if !self.include_children {
                continue;
            }

            let parent = linum - 1;
            while self.is_child_of(parent, linum) {
                extracted.push(ExtractedLine {
                    index: linum,
                    text: self.line(linum),
                    kind: LineKind::Child,
                });
                linum += 1;
            }
        }

        extracted
    }

    fn line(&self, linum: usize) -> &'a str {
        self.lines[linum].as_ref()
    }

    // Children are measured against the task line, not the previous child.
    fn is_child_of(&self, parent: usize, linum: usize) -> bool {
        if parent >= self.lines.len() || linum >= self.lines.len() {
            return false;
        }
        indentation(self.line(linum)) > indentation(self.line(parent))
    }
}

/// Convenience wrapper around [`TaskExtractor`].
pub fn extract_tasks<S: AsRef<str>>(
    lines: &[S],
    include_children: bool,
    status_pattern: &str,
) -> Result<Vec<String>> {
    TaskExtractor::new(lines, include_children).extract(status_pattern)
}

pub fn extract_with<S: AsRef<str>>(lines: &[S], options: &ExtractOptions) -> Result<Vec<String>> {
    extract_tasks(lines, options.include_children, &options.status_pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskMoverError;

    const OPEN: &str = DEFAULT_STATUS_PATTERN;

    #[test]
    fn test_completed_tasks_are_skipped() {
        let lines = ["- [ ] buy milk", "- [x] done task", "some text"];
        let tasks = extract_tasks(&lines, false, OPEN).unwrap();
        assert_eq!(tasks, vec!["- [ ] buy milk"]);
    }

    #[test]
    fn test_children_follow_their_task() {
        let lines = ["- [ ] task A", "  - sub item", "- [ ] task B"];

        let with_children = extract_tasks(&lines, true, OPEN).unwrap();
        assert_eq!(with_children, vec!["- [ ] task A", "  - sub item", "- [ ] task B"]);

        let without = extract_tasks(&lines, false, OPEN).unwrap();
        assert_eq!(without, vec!["- [ ] task A", "- [ ] task B"]);
    }

    #[test]
    fn test_sibling_level_line_is_not_a_child() {
        let lines = ["* [ ] task", "not indented more"];
        let tasks = extract_tasks(&lines, true, OPEN).unwrap();
        assert_eq!(tasks, vec!["* [ ] task"]);
    }

    #[test]
    fn test_empty_input() {
        let lines: [&str; 0] = [];
        assert!(extract_tasks(&lines, true, OPEN).unwrap().is_empty());
    }

    #[test]
    fn test_custom_status_pattern() {
        let lines = ["- [!] urgent", "- [ ] normal"];
        let tasks = extract_tasks(&lines, false, "!").unwrap();
        assert_eq!(tasks, vec!["- [!] urgent"]);
    }

    #[test]
    fn test_invalid_pattern_produces_no_output() {
        let lines = ["- [ ] task"];
        let err = extract_tasks(&lines, false, "(").unwrap_err();
        assert!(matches!(err, TaskMoverError::InvalidStatusPattern { .. }));
    }

    #[test]
    fn test_deeper_runs_belong_to_the_task() {
        let lines = [
            "- [ ] parent",
            "    - deep",
            "  - shallower but still deeper than parent",
            "        - deepest",
            "- [ ] next",
        ];
        let tasks = extract_tasks(&lines, true, OPEN).unwrap();
        assert_eq!(tasks, lines.to_vec());
    }

    #[test]
    fn test_contiguity_cutoff() {
        let lines = [
            "  - [ ] indented task",
            "    - child",
            "  plain sibling",
            "      - deep but detached",
        ];
        let tasks = extract_tasks(&lines, true, OPEN).unwrap();
        assert_eq!(tasks, vec!["  - [ ] indented task", "    - child"]);
    }

    #[test]
    fn test_blank_line_ends_children() {
        let lines = ["- [ ] task", "  - child", "", "  - after blank"];
        let tasks = extract_tasks(&lines, true, OPEN).unwrap();
        assert_eq!(tasks, vec!["- [ ] task", "  - child"]);
    }

    #[test]
    fn test_children_at_end_of_input() {
        let lines = ["text", "- [ ] last", "\t- tab child", "  - space child"];
        let tasks = extract_tasks(&lines, true, OPEN).unwrap();
        assert_eq!(tasks, vec!["- [ ] last", "\t- tab child", "  - space child"]);
    }

    #[test]
    fn test_nested_tasks_ride_with_parent() {
        let lines = ["- [ ] parent", "  - [x] done child", "  - [ ] open child"];

        let indexed = TaskExtractor::new(&lines, true).extract_indexed(OPEN).unwrap();
        let kinds: Vec<LineKind> = indexed.iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![LineKind::Task, LineKind::Child, LineKind::Child]);

        // Without children every line is tested on its own.
        let flat = extract_tasks(&lines, false, OPEN).unwrap();
        assert_eq!(flat, vec!["- [ ] parent", "  - [ ] open child"]);
    }

    #[test]
    fn test_children_of_unmatched_task_are_dropped() {
        let lines = ["- [x] done parent", "  - note", "  - [ ] open child"];
        let tasks = extract_tasks(&lines, true, OPEN).unwrap();
        assert_eq!(tasks, vec!["  - [ ] open child"]);
    }

    #[test]
    fn test_indices_and_verbatim_text() {
        let lines = vec![
            "# Today".to_string(),
            "- [ ] keep trailing space ".to_string(),
            "   - child\t".to_string(),
            "- [x] done".to_string(),
        ];
        let indexed = TaskExtractor::new(&lines, true).extract_indexed(OPEN).unwrap();

        assert_eq!(
            indexed,
            vec![
                ExtractedLine { index: 1, text: "- [ ] keep trailing space ", kind: LineKind::Task },
                ExtractedLine { index: 2, text: "   - child\t", kind: LineKind::Child },
            ]
        );
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let lines = ["- [ ] a", "  - b", "- [ ] c", "d"];
        let extractor = TaskExtractor::new(&lines, true);
        assert_eq!(extractor.extract(OPEN).unwrap(), extractor.extract(OPEN).unwrap());
    }

    #[test]
    fn test_options_builder() {
        let options = ExtractOptions::new().with_children(true).with_status_pattern("!");
        let lines = ["- [!] urgent", "  - detail", "- [ ] normal"];
        assert_eq!(extract_with(&lines, &options).unwrap(), vec!["- [!] urgent", "  - detail"]);
        assert_eq!(ExtractOptions::default().status_pattern, "[^xX-]");
    }
}
