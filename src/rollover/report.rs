use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolloverReport {
    pub target: String,
    pub sources: Vec<SourceSummary>,
    /// Lines inserted into the target, grouping headings included.
    pub inserted_lines: Vec<String>,
    /// Rolled-over lines, grouping headings excluded.
    pub tasks_added: usize,
    pub empty_tasks_removed: usize,
    pub heading_warning: Option<String>,
    pub dry_run: bool,
    pub rollover_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSummary {
    pub path: String,
    pub tasks_found: usize,
    pub lines_moved: usize,
    pub empty_tasks_removed: usize,
    pub deleted_from_source: bool,
}

impl RolloverReport {
    pub fn new<S: Into<String>>(target: S) -> Self {
        Self {
            target: target.into(),
            sources: Vec::new(),
            inserted_lines: Vec::new(),
            tasks_added: 0,
            empty_tasks_removed: 0,
            heading_warning: None,
            dry_run: false,
            rollover_time: Utc::now(),
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.inserted_lines.is_empty()
    }

    pub fn sources_modified(&self) -> usize {
        self.sources.iter().filter(|s| s.deleted_from_source).count()
    }

    /// One line per noteworthy outcome; empty when there is nothing to say.
    pub fn summary_message(&self) -> String {
        let mut parts = Vec::new();

        if let Some(ref warning) = self.heading_warning {
            parts.push(warning.clone());
        }

        if self.tasks_added > 0 {
            parts.push(format!(
                "- {} task{} rolled over.",
                self.tasks_added,
                plural(self.tasks_added)
            ));
        }

        if self.empty_tasks_removed > 0 {
            parts.push(format!(
                "- {} empty task{} removed.",
                self.empty_tasks_removed,
                plural(self.empty_tasks_removed)
            ));
        }

        parts.join("\n")
    }
}

fn plural(count: usize) -> &'static str {
    if count > 1 {
        "s"
    } else {
        ""
    }
}
