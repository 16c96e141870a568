use crate::error::{Result, TaskMoverError};
use crate::extractor::{ExtractOptions, StatusMatcher, DEFAULT_STATUS_PATTERN};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub notes: NotesConfig,
    pub rollover: RolloverConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Vault directory holding the daily notes.
    pub directory: PathBuf,
    /// chrono format of a note's path relative to `directory`, without extension.
    pub date_format: String,
    pub extension: String,
    pub max_depth: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RolloverConfig {
    /// Heading line the tasks are inserted under; empty or "none" appends
    /// them to the end of the note.
    pub template_heading: String,
    pub status_pattern: String,
    pub include_children: bool,
    pub group_by_source: bool,
    pub group_heading_level: u8,
    pub delete_on_complete: bool,
    pub remove_empty_tasks: bool,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            date_format: "%Y-%m-%d".to_string(),
            extension: "md".to_string(),
            max_depth: 10,
        }
    }
}

impl Default for RolloverConfig {
    fn default() -> Self {
        Self {
            template_heading: String::new(),
            status_pattern: DEFAULT_STATUS_PATTERN.to_string(),
            include_children: false,
            group_by_source: false,
            group_heading_level: 3,
            delete_on_complete: false,
            remove_empty_tasks: false,
        }
    }
}

impl RolloverConfig {
    pub fn heading(&self) -> Option<&str> {
        match self.template_heading.as_str() {
            "" | "none" => None,
            heading => Some(heading),
        }
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions::new()
            .with_children(self.include_children)
            .with_status_pattern(self.status_pattern.clone())
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TaskMoverError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| TaskMoverError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| TaskMoverError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["taskmover.toml", ".taskmover.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref vault) = cli_args.vault {
            self.notes.directory = vault.clone();
        }

        if let Some(ref heading) = cli_args.template_heading {
            self.rollover.template_heading = heading.clone();
        }

        if let Some(ref pattern) = cli_args.status_pattern {
            self.rollover.status_pattern = pattern.clone();
        }

        if let Some(include_children) = cli_args.include_children {
            self.rollover.include_children = include_children;
        }

        if let Some(group) = cli_args.group_by_source {
            self.rollover.group_by_source = group;
        }

        if let Some(delete) = cli_args.delete_on_complete {
            self.rollover.delete_on_complete = delete;
        }

        if let Some(remove) = cli_args.remove_empty_tasks {
            self.rollover.remove_empty_tasks = remove;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| TaskMoverError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| TaskMoverError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        // Surfaces as InvalidStatusPattern rather than a generic config error
        StatusMatcher::new(&self.rollover.status_pattern)?;

        if !(1..=6).contains(&self.rollover.group_heading_level) {
            return Err(TaskMoverError::Config {
                message: format!(
                    "Group heading level must be between 1 and 6 (got {})",
                    self.rollover.group_heading_level
                ),
            });
        }

        if self.notes.date_format.trim().is_empty() {
            return Err(TaskMoverError::Config {
                message: "Daily note date format must not be empty".to_string(),
            });
        }

        if StrftimeItems::new(&self.notes.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(TaskMoverError::Config {
                message: format!("Invalid date format: {}", self.notes.date_format),
            });
        }

        if self.notes.extension.is_empty() {
            return Err(TaskMoverError::Config {
                message: "Daily note extension must not be empty".to_string(),
            });
        }

        if self.notes.max_depth == 0 {
            return Err(TaskMoverError::Config {
                message: "Maximum directory depth must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub vault: Option<PathBuf>,
    pub template_heading: Option<String>,
    pub status_pattern: Option<String>,
    pub include_children: Option<bool>,
    pub group_by_source: Option<bool>,
    pub delete_on_complete: Option<bool>,
    pub remove_empty_tasks: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vault(mut self, vault: Option<PathBuf>) -> Self {
        self.vault = vault;
        self
    }

    pub fn with_template_heading(mut self, heading: Option<String>) -> Self {
        self.template_heading = heading;
        self
    }

    pub fn with_status_pattern(mut self, pattern: Option<String>) -> Self {
        self.status_pattern = pattern;
        self
    }

    pub fn with_include_children(mut self, include: Option<bool>) -> Self {
        self.include_children = include;
        self
    }

    pub fn with_group_by_source(mut self, group: Option<bool>) -> Self {
        self.group_by_source = group;
        self
    }

    pub fn with_delete_on_complete(mut self, delete: Option<bool>) -> Self {
        self.delete_on_complete = delete;
        self
    }

    pub fn with_remove_empty_tasks(mut self, remove: Option<bool>) -> Self {
        self.remove_empty_tasks = remove;
        self
    }
}
