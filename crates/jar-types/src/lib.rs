pub mod api;
pub mod export;
pub mod models;
pub mod stats;

pub use export::{ExportFormat, UnsupportedFormat};
pub use models::{MemoryEntry, Mood, TIMESTAMP_FORMAT};
pub use stats::Period;
