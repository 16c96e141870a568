use crate::config::RolloverConfig;
use crate::document::Document;
use crate::error::Result;
use crate::extractor::{ExtractedLine, LineKind, StatusMatcher, TaskExtractor};
use crate::rollover::report::{RolloverReport, SourceSummary};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// A note and its current text.
#[derive(Debug, Clone)]
pub struct NoteContent {
    pub path: PathBuf,
    pub label: String,
    pub content: String,
}

impl NoteContent {
    pub fn new<S: Into<String>>(path: PathBuf, label: S, content: String) -> Self {
        Self {
            path,
            label: label.into(),
            content,
        }
    }

    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

/// New contents for a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEdit {
    pub path: PathBuf,
    pub content: String,
}

impl FileEdit {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Everything a rollover would change, computed without touching disk.
#[derive(Debug, Clone)]
pub struct RolloverPlan {
    pub target: Option<FileEdit>,
    pub sources: Vec<FileEdit>,
    pub report: RolloverReport,
}

impl RolloverPlan {
    pub fn edits(&self) -> impl Iterator<Item = &FileEdit> {
        self.target.iter().chain(self.sources.iter())
    }
}

/// Unchecked checkbox with no text.
pub fn is_empty_task(line: &str) -> bool {
    matches!(line.trim(), "- [ ]" | "- [  ]")
}

/// Builds the rollover of `sources` (in the given order) into `target`.
pub fn plan_rollover(
    sources: &[NoteContent],
    target: &NoteContent,
    config: &RolloverConfig,
) -> Result<RolloverPlan> {
    let matcher = StatusMatcher::new(&config.status_pattern)?;
    let mut report = RolloverReport::new(target.display_path());
    let mut block = Vec::new();
    let mut source_edits = Vec::new();

    for source in sources {
        let mut document = Document::parse(&source.content);
        let extracted =
            TaskExtractor::new(document.lines(), config.include_children).extract_with_matcher(&matcher);

        if extracted.is_empty() {
            report.sources.push(SourceSummary {
                path: source.display_path(),
                tasks_found: 0,
                lines_moved: 0,
                empty_tasks_removed: 0,
                deleted_from_source: false,
            });
            continue;
        }

        let (kept, empty_removed): (Vec<ExtractedLine<'_>>, usize) = if config.remove_empty_tasks {
            let before = extracted.len();
            let kept: Vec<_> = extracted.into_iter().filter(|l| !is_empty_task(l.text)).collect();
            let removed = before - kept.len();
            (kept, removed)
        } else {
            (extracted, 0)
        };

        let tasks_found = kept.iter().filter(|l| l.kind == LineKind::Task).count();
        let lines: Vec<String> = kept.iter().map(|l| l.text.to_string()).collect();
        let indices: BTreeSet<usize> = kept.iter().map(|l| l.index).collect();

        report.empty_tasks_removed += empty_removed;
        let deleted_from_source = config.delete_on_complete && !lines.is_empty();
        report.sources.push(SourceSummary {
            path: source.display_path(),
            tasks_found,
            lines_moved: lines.len(),
            empty_tasks_removed: empty_removed,
            deleted_from_source,
        });

        if lines.is_empty() {
            continue;
        }

        if deleted_from_source {
            document.remove_indices(&indices);
            source_edits.push(FileEdit {
                path: source.path.clone(),
                content: document.render(),
            });
        }

        if config.group_by_source {
            block.push(format!(
                "{} {}",
                "#".repeat(config.group_heading_level as usize),
                source.label
            ));
        }

        report.tasks_added += lines.len();
        block.extend(lines);
    }

    let target_edit = if block.is_empty() {
        None
    } else {
        let (content, warning) = insert_block(&target.content, config.heading(), &block);
        report.heading_warning = warning;
        Some(FileEdit {
            path: target.path.clone(),
            content,
        })
    };

    report.inserted_lines = block;

    Ok(RolloverPlan {
        target: target_edit,
        sources: source_edits,
        report,
    })
}

/// Inserts `block` right after the first line equal to `heading`, or at the
/// end of the note. The second value is a warning when the heading is
/// missing.
pub fn insert_block(content: &str, heading: Option<&str>, block: &[String]) -> (String, Option<String>) {
    let mut document = Document::parse(content);
    let mut warning = None;

    match heading.map(|h| (h, document.find_line(h))) {
        Some((_, Some(linum))) => document.insert_lines(linum + 1, block.iter().cloned()),
        Some((h, None)) => {
            warning = Some(format!(
                "Rollover couldn't find '{}' in today's daily note. Rolling tasks to end of file.",
                h
            ));
            document.append_lines(block.iter().cloned());
        }
        None => document.append_lines(block.iter().cloned()),
    }

    (document.render(), warning)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(name: &str, content: &str) -> NoteContent {
        NoteContent::new(PathBuf::from(format!("{}.md", name)), name, content.to_string())
    }

    const YESTERDAY: &str = "# 2024-03-14\n- [ ] write report\n  - intro\n  - results\n- [x] send mail\n- [ ] \nnotes\n";

    #[test]
    fn test_basic_rollover_appends_tasks() {
        let sources = [note("2024-03-14", YESTERDAY)];
        let target = note("2024-03-15", "# 2024-03-15\n");
        let plan = plan_rollover(&sources, &target, &RolloverConfig::default()).unwrap();

        let edit = plan.target.unwrap();
        assert_eq!(edit.content, "# 2024-03-15\n- [ ] write report\n- [ ] \n");
        assert!(plan.sources.is_empty());
        assert_eq!(plan.report.tasks_added, 2);
        assert_eq!(plan.report.sources[0].tasks_found, 2);
        assert!(plan.report.heading_warning.is_none());
    }

    #[test]
    fn test_children_and_delete_on_complete() {
        let config = RolloverConfig {
            include_children: true,
            delete_on_complete: true,
            ..RolloverConfig::default()
        };
        let sources = [note("2024-03-14", YESTERDAY)];
        let target = note("2024-03-15", "# 2024-03-15\n");
        let plan = plan_rollover(&sources, &target, &config).unwrap();

        assert_eq!(
            plan.target.unwrap().content,
            "# 2024-03-15\n- [ ] write report\n  - intro\n  - results\n- [ ] \n"
        );
        assert_eq!(plan.sources.len(), 1);
        assert_eq!(plan.sources[0].content, "# 2024-03-14\n- [x] send mail\nnotes\n");
        assert_eq!(plan.report.sources_modified(), 1);
        assert_eq!(plan.report.tasks_added, 4);
    }

    #[test]
    fn test_delete_removes_only_extracted_positions() {
        let config = RolloverConfig {
            include_children: true,
            delete_on_complete: true,
            ..RolloverConfig::default()
        };
        let source = note("2024-03-14", "- [ ] task\n  - same\n- [x] done\n  - same\n");
        let plan = plan_rollover(&[source], &note("t", ""), &config).unwrap();
        assert_eq!(plan.sources[0].content, "- [x] done\n  - same\n");
    }

    #[test]
    fn test_remove_empty_tasks() {
        let config = RolloverConfig {
            remove_empty_tasks: true,
            delete_on_complete: true,
            ..RolloverConfig::default()
        };
        let sources = [note("2024-03-14", YESTERDAY)];
        let target = note("2024-03-15", "");
        let plan = plan_rollover(&sources, &target, &config).unwrap();

        assert_eq!(plan.target.unwrap().content, "- [ ] write report\n");
        assert_eq!(plan.report.empty_tasks_removed, 1);
        // Empty tasks stay in the source
        assert!(plan.sources[0].content.contains("- [ ] \n"));
        assert_eq!(
            plan.report.summary_message(),
            "- 1 task rolled over.\n- 1 empty task removed."
        );
    }

    #[test]
    fn test_source_with_only_empty_tasks_is_skipped() {
        let config = RolloverConfig {
            remove_empty_tasks: true,
            delete_on_complete: true,
            group_by_source: true,
            ..RolloverConfig::default()
        };
        let sources = [note("2024-03-14", "- [ ]\n- [ ] \n")];
        let plan = plan_rollover(&sources, &note("t", "x\n"), &config).unwrap();

        assert!(plan.target.is_none());
        assert!(plan.sources.is_empty());
        assert_eq!(plan.report.empty_tasks_removed, 2);
        assert!(!plan.report.has_changes());
    }

    #[test]
    fn test_template_heading_insertion() {
        let config = RolloverConfig {
            template_heading: "## Todo".to_string(),
            ..RolloverConfig::default()
        };
        let target = note("2024-03-15", "# Day\n## Todo\n- [ ] existing\n## Todo\n");
        let plan = plan_rollover(&[note("a", "- [ ] carried\n")], &target, &config).unwrap();

        assert_eq!(
            plan.target.unwrap().content,
            "# Day\n## Todo\n- [ ] carried\n- [ ] existing\n## Todo\n"
        );
        assert!(plan.report.heading_warning.is_none());
    }

    #[test]
    fn test_missing_heading_falls_back_to_end() {
        let config = RolloverConfig {
            template_heading: "## Todo".to_string(),
            ..RolloverConfig::default()
        };
        let target = note("2024-03-15", "# Day\n### Todo list\n");
        let plan = plan_rollover(&[note("a", "- [ ] carried")], &target, &config).unwrap();

        assert_eq!(plan.target.unwrap().content, "# Day\n### Todo list\n- [ ] carried\n");
        let warning = plan.report.heading_warning.unwrap();
        assert!(warning.contains("'## Todo'"));
    }

    #[test]
    fn test_group_by_source_headings() {
        let config = RolloverConfig {
            group_by_source: true,
            group_heading_level: 2,
            ..RolloverConfig::default()
        };
        let sources = [
            note("2024-03-16", "- [ ] sat\n"),
            note("2024-03-12", "nothing open\n"),
            note("2024-03-11", "* [ ] mon\n"),
        ];
        let plan = plan_rollover(&sources, &note("t", ""), &config).unwrap();

        assert_eq!(
            plan.report.inserted_lines,
            vec!["## 2024-03-16", "- [ ] sat", "## 2024-03-11", "* [ ] mon"]
        );
        assert_eq!(plan.report.tasks_added, 2);
        assert_eq!(plan.report.sources.len(), 3);
    }

    #[test]
    fn test_target_line_endings_are_kept() {
        let target = note("t", "# Day\r\n");
        let plan = plan_rollover(&[note("a", "- [ ] a\n")], &target, &RolloverConfig::default()).unwrap();
        assert_eq!(plan.target.unwrap().content, "# Day\r\n- [ ] a\r\n");
    }

    #[test]
    fn test_first_task_after_byte_order_mark_is_moved() {
        let config = RolloverConfig {
            delete_on_complete: true,
            ..RolloverConfig::default()
        };
        let source = note("2024-03-14", "\u{FEFF}- [ ] first task\n- [x] done\n");
        let target = note("2024-03-15", "\u{FEFF}# Day\n");
        let plan = plan_rollover(&[source], &target, &config).unwrap();

        assert_eq!(plan.report.inserted_lines, vec!["- [ ] first task"]);
        assert_eq!(plan.target.unwrap().content, "\u{FEFF}# Day\n- [ ] first task\n");
        assert_eq!(plan.sources[0].content, "\u{FEFF}- [x] done\n");
    }

    #[test]
    fn test_invalid_status_fails_before_planning() {
        let config = RolloverConfig {
            status_pattern: "(".to_string(),
            ..RolloverConfig::default()
        };
        assert!(plan_rollover(&[note("a", "- [ ] a")], &note("t", ""), &config).is_err());
    }

    #[test]
    fn test_is_empty_task() {
        assert!(is_empty_task("- [ ]"));
        assert!(is_empty_task("  - [  ]  "));
        assert!(!is_empty_task("- [ ] text"));
        assert!(!is_empty_task("* [ ]"));
    }
}
