pub mod daily_notes;

pub use daily_notes::{previous_week, DailyNote, DailyNoteScanner, VaultScan};
