use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::extractor::ExtractOptions;
use crate::rollover::{RolloverRequest, RolloverSource};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "taskmover")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract open Markdown tasks and roll them over between daily notes")]
#[command(
    long_about = "TaskMover finds checkbox list items in Markdown notes, optionally with \
                  their indented children, and moves the unfinished ones from earlier daily \
                  notes into today's note."
)]
#[command(after_help = "EXAMPLES:\n  \
    taskmover extract notes/2024-03-14.md --children\n  \
    taskmover --vault ~/notes rollover --heading '## Tasks' --delete-on-complete\n  \
    taskmover --vault ~/notes rollover --source week --group-by-source --dry-run\n  \
    taskmover generate-config taskmover.toml")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file path
    #[arg(short, long, global = true, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Directory holding the daily notes
    #[arg(long, global = true, env = "TASKMOVER_VAULT")]
    pub vault: Option<PathBuf>,

    /// Output format for results
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the task lines of a Markdown file
    Extract(ExtractArgs),
    /// Move open tasks from earlier daily notes into today's note
    Rollover(RolloverArgs),
    /// Write a sample configuration file
    GenerateConfig(GenerateConfigArgs),
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Markdown file to read, `-` for standard input
    pub file: PathBuf,

    /// Also print the indented lines under each task
    #[arg(long, overrides_with = "no_children")]
    pub children: bool,

    /// Print task lines only, even if the config includes children
    #[arg(long, overrides_with = "children")]
    pub no_children: bool,

    /// Regex fragment a checkbox status must match in full
    #[arg(long, value_name = "PATTERN")]
    pub status: Option<String>,
}

#[derive(Args, Debug)]
pub struct RolloverArgs {
    /// Which earlier notes to collect tasks from
    #[arg(long, value_enum, default_value_t = SourceSelection::Day)]
    pub source: SourceSelection,

    /// Reference date (defaults to today)
    #[arg(long, value_parser = parse_date, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// Note receiving the tasks (defaults to the reference date's note)
    #[arg(long, value_name = "FILE")]
    pub target: Option<PathBuf>,

    /// Heading line the tasks are inserted under
    #[arg(long, value_name = "HEADING")]
    pub heading: Option<String>,

    /// Regex fragment a checkbox status must match in full
    #[arg(long, value_name = "PATTERN")]
    pub status: Option<String>,

    /// Carry the indented lines under each task along
    #[arg(long, overrides_with = "no_children")]
    pub children: bool,

    /// Move task lines only
    #[arg(long, overrides_with = "children")]
    pub no_children: bool,

    /// Remove rolled-over lines from the source notes
    #[arg(long, overrides_with = "keep_in_source")]
    pub delete_on_complete: bool,

    /// Leave rolled-over lines in the source notes
    #[arg(long, overrides_with = "delete_on_complete")]
    pub keep_in_source: bool,

    /// Drop checkboxes without text instead of rolling them over
    #[arg(long, overrides_with = "keep_empty")]
    pub remove_empty: bool,

    /// Roll empty checkboxes over like any other task
    #[arg(long, overrides_with = "remove_empty")]
    pub keep_empty: bool,

    /// Put a heading naming the source note above its tasks
    #[arg(long, overrides_with = "no_group_by_source")]
    pub group_by_source: bool,

    /// Insert the tasks without source headings
    #[arg(long, overrides_with = "group_by_source")]
    pub no_group_by_source: bool,

    /// Show what would be moved without writing any file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct GenerateConfigArgs {
    /// Where to write the sample configuration
    #[arg(default_value = "taskmover.toml")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceSelection {
    /// The most recent note before the reference date
    Day,
    /// Every note of the previous Sunday-to-Saturday week
    Week,
}

impl From<SourceSelection> for RolloverSource {
    fn from(selection: SourceSelection) -> Self {
        match selection {
            SourceSelection::Day => RolloverSource::Day,
            SourceSelection::Week => RolloverSource::Week,
        }
    }
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        let overrides = CliOverrides::new().with_vault(self.vault.clone());

        match self.command {
            Command::Extract(ref args) => overrides
                .with_status_pattern(args.status.clone())
                .with_include_children(switch(args.children, args.no_children)),
            Command::Rollover(ref args) => overrides
                .with_template_heading(args.heading.clone())
                .with_status_pattern(args.status.clone())
                .with_include_children(switch(args.children, args.no_children))
                .with_delete_on_complete(switch(args.delete_on_complete, args.keep_in_source))
                .with_remove_empty_tasks(switch(args.remove_empty, args.keep_empty))
                .with_group_by_source(switch(args.group_by_source, args.no_group_by_source)),
            Command::GenerateConfig(_) => overrides,
        }
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

impl ExtractArgs {
    /// Options for this invocation, with config values filling the gaps.
    pub fn extract_options(&self, config: &Config) -> ExtractOptions {
        let mut options = config.rollover.extract_options();
        if let Some(children) = switch(self.children, self.no_children) {
            options = options.with_children(children);
        }
        if let Some(ref status) = self.status {
            options = options.with_status_pattern(status.clone());
        }
        options
    }
}

impl RolloverArgs {
    pub fn request(&self) -> RolloverRequest {
        RolloverRequest::new(self.source.into())
            .with_date(self.date)
            .with_target(self.target.clone())
            .with_dry_run(self.dry_run)
    }
}

/// Resolves a `--flag`/`--no-flag` pair; `None` leaves the config value alone.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

pub fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}'. Expected YYYY-MM-DD.", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extract() {
        let cli = Cli::try_parse_from(["taskmover", "extract", "note.md", "--children"]).unwrap();
        match cli.command {
            Command::Extract(ref args) => {
                assert_eq!(args.file, PathBuf::from("note.md"));
                assert!(args.children);
                assert!(args.status.is_none());
            }
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn test_parse_rollover_flags() {
        let cli = Cli::try_parse_from([
            "taskmover",
            "--vault",
            "notes",
            "rollover",
            "--source",
            "week",
            "--date",
            "2024-03-20",
            "--heading",
            "## Tasks",
            "--delete-on-complete",
            "--dry-run",
        ])
        .unwrap();

        let Command::Rollover(ref args) = cli.command else {
            panic!("expected rollover");
        };
        let request = args.request();
        assert_eq!(request.source, RolloverSource::Week);
        assert_eq!(request.date, NaiveDate::from_ymd_opt(2024, 3, 20));
        assert!(request.dry_run);

        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.vault, Some(PathBuf::from("notes")));
        assert_eq!(overrides.template_heading.as_deref(), Some("## Tasks"));
        assert_eq!(overrides.delete_on_complete, Some(true));
        assert_eq!(overrides.remove_empty_tasks, None);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "taskmover",
            "rollover",
            "--output-format",
            "json",
            "-vv",
        ])
        .unwrap();
        assert!(matches!(cli.output_format, OutputFormat::Json));
        assert_eq!(cli.verbosity_level(), 2);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["taskmover", "-q", "-v", "rollover"]).is_err());
    }

    #[test]
    fn test_invalid_date_rejected() {
        assert!(Cli::try_parse_from(["taskmover", "rollover", "--date", "March 3"]).is_err());
        assert!(parse_date("2024-02-30").is_err());
        assert_eq!(parse_date(" 2024-02-29 "), Ok(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
    }

    #[test]
    fn test_extract_options_override_config() {
        let cli = Cli::try_parse_from(["taskmover", "extract", "-", "--status", "[xX]"]).unwrap();
        let Command::Extract(ref args) = cli.command else {
            panic!("expected extract");
        };

        let mut config = Config::default();
        config.rollover.include_children = true;
        let options = args.extract_options(&config);
        assert!(options.include_children);
        assert_eq!(options.status_pattern, "[xX]");
    }

    #[test]
    fn test_negated_flags_override_config() {
        let cli = Cli::try_parse_from([
            "taskmover",
            "rollover",
            "--no-children",
            "--keep-in-source",
            "--remove-empty",
        ])
        .unwrap();

        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.include_children, Some(false));
        assert_eq!(overrides.delete_on_complete, Some(false));
        assert_eq!(overrides.remove_empty_tasks, Some(true));
        assert_eq!(overrides.group_by_source, None);

        let mut config = Config::default();
        config.rollover.include_children = true;
        config.rollover.delete_on_complete = true;
        config.merge_with_cli_args(&overrides);
        assert!(!config.rollover.include_children);
        assert!(!config.rollover.delete_on_complete);
    }

    #[test]
    fn test_last_of_a_flag_pair_wins() {
        let cli =
            Cli::try_parse_from(["taskmover", "extract", "-", "--children", "--no-children"]).unwrap();
        let Command::Extract(ref args) = cli.command else {
            panic!("expected extract");
        };

        let mut config = Config::default();
        config.rollover.include_children = true;
        assert!(!args.extract_options(&config).include_children);
    }

    #[test]
    fn test_generate_config_default_path() {
        let cli = Cli::try_parse_from(["taskmover", "generate-config"]).unwrap();
        let Command::GenerateConfig(ref args) = cli.command else {
            panic!("expected generate-config");
        };
        assert_eq!(args.path, PathBuf::from("taskmover.toml"));
    }
}
