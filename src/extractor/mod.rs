pub mod status;
pub mod task_extractor;

pub use status::{indentation, StatusMatcher, BULLET_SYMBOLS, DEFAULT_STATUS_PATTERN};
pub use task_extractor::{
    extract_tasks, extract_with, ExtractOptions, ExtractedLine, LineKind, TaskExtractor,
};
