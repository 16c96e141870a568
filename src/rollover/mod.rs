pub mod planner;
pub mod report;

pub use planner::{is_empty_task, plan_rollover, FileEdit, NoteContent, RolloverPlan};
pub use report::{RolloverReport, SourceSummary};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which earlier notes feed a rollover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RolloverSource {
    /// The most recent note before the reference date.
    Day,
    /// Every note from the previous Sunday-to-Saturday week.
    Week,
}

impl RolloverSource {
    pub fn describe(&self, reference: NaiveDate) -> String {
        match self {
            RolloverSource::Day => format!("the day before {}", reference),
            RolloverSource::Week => {
                let (sunday, saturday) = crate::scanner::previous_week(reference);
                format!("the week of {} to {}", sunday, saturday)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RolloverRequest {
    pub source: RolloverSource,
    /// Reference date, local today when unset.
    pub date: Option<NaiveDate>,
    /// Note receiving the tasks, the reference date's note when unset.
    pub target: Option<PathBuf>,
    pub dry_run: bool,
}

impl RolloverRequest {
    pub fn new(source: RolloverSource) -> Self {
        Self {
            source,
            date: None,
            target: None,
            dry_run: false,
        }
    }

    pub fn with_date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }

    pub fn with_target(mut self, target: Option<PathBuf>) -> Self {
        self.target = target;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_description() {
        let reference = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        assert_eq!(RolloverSource::Day.describe(reference), "the day before 2024-03-20");
        assert_eq!(
            RolloverSource::Week.describe(reference),
            "the week of 2024-03-10 to 2024-03-16"
        );
    }

    #[test]
    fn test_request_builder() {
        let request = RolloverRequest::new(RolloverSource::Week)
            .with_target(Some(PathBuf::from("today.md")))
            .with_dry_run(true);
        assert_eq!(request.source, RolloverSource::Week);
        assert!(request.date.is_none());
        assert!(request.dry_run);
    }
}
