use crate::config::NotesConfig;
use crate::error::{Result, TaskMoverError};
use chrono::{Datelike, Duration, NaiveDate};
use std::fmt::Write as _;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyNote {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub date: NaiveDate,
}

impl DailyNote {
    pub fn new(path: PathBuf, relative_path: PathBuf, date: NaiveDate) -> Self {
        Self {
            path,
            relative_path,
            date,
        }
    }

    /// File name without extension, used for grouping headings.
    pub fn label(&self) -> String {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string()
    }

    pub fn display_path(&self) -> String {
        self.relative_path.display().to_string()
    }
}

pub struct DailyNoteScanner {
    directory: PathBuf,
    date_format: String,
    extension: String,
    max_depth: usize,
}

impl DailyNoteScanner {
    pub fn new(config: &NotesConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            date_format: config.date_format.clone(),
            extension: config.extension.trim_start_matches('.').to_lowercase(),
            max_depth: config.max_depth,
        }
    }

    /// All daily notes in the vault, newest first, plus the entries that
    /// could not be read.
    pub fn scan(&self) -> Result<VaultScan> {
        if !self.directory.is_dir() {
            return Err(TaskMoverError::InvalidPath {
                path: format!("{} is not a directory", self.directory.display()),
            });
        }

        let walker = WalkDir::new(&self.directory)
            .max_depth(self.max_depth)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        let mut notes = Vec::new();
        let mut scan_errors = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    scan_errors.push(describe_walk_error(&err));
                    continue;
                }
            };

            if entry.file_type().is_file() {
                if let Some(note) = self.parse_note(entry.path()) {
                    notes.push(note);
                }
            }
        }

        VaultScan::from_parts(notes, scan_errors)
    }

    /// Parses `path` as a daily note when its vault-relative path without
    /// extension matches the date format exactly.
    pub fn parse_note(&self, path: &Path) -> Option<DailyNote> {
        let extension = path.extension()?.to_str()?;
        if extension.to_lowercase() != self.extension {
            return None;
        }

        let relative = path.strip_prefix(&self.directory).ok()?;
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return None;
        }

        let stem = relative.with_extension("");
        let stem = stem
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?
            .join("/");

        let date = NaiveDate::parse_from_str(&stem, &self.date_format).ok()?;
        Some(DailyNote::new(path.to_path_buf(), relative.to_path_buf(), date))
    }

    /// Location of the note for `date`, whether or not it exists.
    pub fn note_path(&self, date: NaiveDate) -> Result<PathBuf> {
        let mut name = String::new();
        write!(name, "{}", date.format(&self.date_format)).map_err(|_| {
            TaskMoverError::InvalidDate {
                input: format!("{} (format '{}')", date, self.date_format),
            }
        })?;

        Ok(self
            .directory
            .join(format!("{}.{}", name, self.extension)))
    }
}

/// Result of walking a vault.
#[derive(Debug, Clone, Default)]
pub struct VaultScan {
    /// Daily notes, newest first.
    pub notes: Vec<DailyNote>,
    /// Entries that could not be read.
    pub errors: Vec<String>,
}

impl VaultScan {
    /// Fails when nothing but errors was found, so an unreadable vault is
    /// not mistaken for one without notes.
    pub fn from_parts(mut notes: Vec<DailyNote>, errors: Vec<String>) -> Result<Self> {
        if notes.is_empty() && !errors.is_empty() {
            return Err(TaskMoverError::Permission {
                path: format!("Multiple scan errors: {}", errors.join(", ")),
            });
        }

        notes.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.path.cmp(&b.path)));
        Ok(Self { notes, errors })
    }

    /// Newest note dated strictly before `reference`.
    pub fn previous_note(&self, reference: NaiveDate) -> Option<&DailyNote> {
        self.notes.iter().find(|note| note.date < reference)
    }

    /// Notes from the calendar week (Sunday to Saturday) before the one
    /// containing `reference`, newest first.
    pub fn last_week_notes(&self, reference: NaiveDate) -> Vec<&DailyNote> {
        let (sunday, saturday) = previous_week(reference);
        self.notes
            .iter()
            .filter(|note| note.date >= sunday && note.date <= saturday)
            .collect()
    }
}

/// Sunday and Saturday of the week preceding the one containing `reference`.
pub fn previous_week(reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    let days_since_sunday = reference.weekday().num_days_from_sunday() as i64;
    let saturday = reference - Duration::days(days_since_sunday + 1);
    let sunday = saturday - Duration::days(6);
    (sunday, saturday)
}

fn describe_walk_error(err: &walkdir::Error) -> String {
    if err
        .io_error()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied)
    {
        format!("Permission denied: {}", err)
    } else {
        format!("Scan error: {}", err)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
