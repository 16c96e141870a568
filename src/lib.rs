pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod extractor;
pub mod rollover;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, Command, OutputFormat};
pub use config::{CliOverrides, Config, NotesConfig, RolloverConfig};
pub use document::{split_lines, Document, LineEnding};
pub use error::{Result, TaskMoverError, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    extract_tasks, extract_with, ExtractOptions, ExtractedLine, LineKind, StatusMatcher,
    TaskExtractor, DEFAULT_STATUS_PATTERN,
};
pub use rollover::{
    plan_rollover, NoteContent, RolloverPlan, RolloverReport, RolloverRequest, RolloverSource,
};
pub use scanner::{DailyNote, DailyNoteScanner, VaultScan};
pub use ui::{OutputFormatter, OutputMode};

use chrono::Local;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Main library interface for TaskMover functionality
pub struct TaskMover {
    config: Config,
    output_formatter: OutputFormatter,
}

impl TaskMover {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        Self {
            config,
            output_formatter: OutputFormatter::new(output_mode, verbose, quiet),
        }
    }

    /// Create TaskMover instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbosity_level(),
            cli_args.quiet,
        ))
    }

    /// Extract the tasks of a Markdown file, `-` reads standard input.
    pub fn extract_file(&self, path: &Path, options: &ExtractOptions) -> Result<Vec<String>> {
        let content = if path == Path::new("-") {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        } else {
            fs::read_to_string(path)?
        };

        let document = Document::parse(&content);
        let tasks = extract_with(document.lines(), options)?;

        self.output_formatter.debug(&format!(
            "{} line(s) selected from {} ({} lines, status '{}')",
            tasks.len(),
            path.display(),
            document.len(),
            options.status_pattern
        ));

        Ok(tasks)
    }

    /// Move open tasks from earlier daily notes into the target note.
    pub fn rollover(&self, request: &RolloverRequest) -> Result<RolloverReport> {
        let reference = request.date.unwrap_or_else(|| Local::now().date_naive());
        let scanner = DailyNoteScanner::new(&self.config.notes);

        let target_path = match request.target {
            Some(ref path) => path.clone(),
            None => scanner.note_path(reference)?,
        };
        if !target_path.is_file() {
            return Err(TaskMoverError::TargetNotFound {
                path: target_path.display().to_string(),
            });
        }

        self.output_formatter.start_operation(&format!(
            "Collecting notes from {}",
            request.source.describe(reference)
        ));

        let scan = scanner.scan()?;
        for error in &scan.errors {
            self.output_formatter.warning(error);
        }

        let notes: Vec<&DailyNote> = match request.source {
            RolloverSource::Day => scan.previous_note(reference).into_iter().collect(),
            RolloverSource::Week => scan.last_week_notes(reference),
        };
        let notes: Vec<&DailyNote> = notes
            .into_iter()
            .filter(|note| !same_file(&note.path, &target_path))
            .collect();

        if notes.is_empty() {
            return Err(TaskMoverError::NoSourceNotes {
                description: request.source.describe(reference),
            });
        }

        let sources = notes
            .iter()
            .map(|note| -> Result<NoteContent> {
                self.output_formatter
                    .debug(&format!("Reading {}", note.display_path()));
                Ok(NoteContent::new(
                    note.path.clone(),
                    note.label(),
                    fs::read_to_string(&note.path)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        let target_label = target_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        let target = NoteContent::new(
            target_path.clone(),
            target_label,
            fs::read_to_string(&target_path)?,
        );

        let plan = plan_rollover(&sources, &target, &self.config.rollover)?;
        for source in &plan.report.sources {
            self.output_formatter.info(&format!(
                "{} task(s) found in {}",
                source.tasks_found, source.path
            ));
        }

        if request.dry_run {
            self.output_formatter
                .info("Dry run: no files were modified");
        } else {
            self.apply_plan(&plan)?;
        }

        let mut report = plan.report;
        report.dry_run = request.dry_run;
        Ok(report)
    }

    // The target is written before any source is trimmed.
    fn apply_plan(&self, plan: &RolloverPlan) -> Result<()> {
        for edit in plan.edits() {
            fs::write(edit.path(), &edit.content)?;
            self.output_formatter
                .debug(&format!("Wrote {}", edit.path().display()));
        }
        Ok(())
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        Config::default().save_to_file(output_path)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &TaskMoverError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
