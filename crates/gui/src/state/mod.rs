pub mod draft;
pub mod messages;

pub use draft::LoadDraft;
pub use messages::{AppMessage, LogEntry, LogLevel};
