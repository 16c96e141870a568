use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskMoverError {
    #[error("Invalid task status pattern: {pattern}")]
    InvalidStatusPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Permission denied: {path}")]
    Permission { path: String },

    #[error("Invalid date: {input}")]
    InvalidDate { input: String },

    #[error("No daily notes to roll over from")]
    NoSourceNotes { description: String },

    #[error("Target note not found: {path}")]
    TargetNotFound { path: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for TaskMoverError {
    fn user_message(&self) -> String {
        match self {
            TaskMoverError::InvalidStatusPattern { pattern, source } => {
                format!("Status pattern '{}' is not a valid regular expression: {}", pattern, source)
            }
            TaskMoverError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            TaskMoverError::InvalidPath { path } => {
                format!("Invalid path: {}", path)
            }
            TaskMoverError::Permission { path } => {
                format!("Permission denied accessing: {}", path)
            }
            TaskMoverError::InvalidDate { input } => {
                format!("Could not parse date '{}'", input)
            }
            TaskMoverError::NoSourceNotes { description } => {
                format!("No daily notes found for {}", description)
            }
            TaskMoverError::TargetNotFound { path } => {
                format!("Target note does not exist: {}", path)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            TaskMoverError::InvalidStatusPattern { .. } => Some(
                "The status pattern is inserted between the checkbox brackets, e.g. '[^xX-]' for open tasks or '!' for '- [!]' items.".to_string()
            ),
            TaskMoverError::Config { .. } => Some(
                "Check your configuration file syntax, or run 'taskmover generate-config' for a working sample.".to_string()
            ),
            TaskMoverError::InvalidPath { .. } => Some(
                "Point --vault (or TASKMOVER_VAULT) at the directory that holds your daily notes.".to_string()
            ),
            TaskMoverError::Permission { .. } => Some(
                "Ensure the vault and its subfolders are readable.".to_string()
            ),
            TaskMoverError::InvalidDate { .. } => Some(
                "Dates are given as YYYY-MM-DD, e.g. --date 2024-03-15.".to_string()
            ),
            TaskMoverError::NoSourceNotes { .. } => Some(
                "Make sure [notes].date_format matches the names of your daily notes.".to_string()
            ),
            TaskMoverError::TargetNotFound { .. } => Some(
                "Create today's note first or pass an existing file with --target.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for TaskMoverError {
    fn from(error: toml::de::Error) -> Self {
        TaskMoverError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TaskMoverError>;
