//! Docparse core: pure state holders for the parse and history workflows.
mod history;
mod parse;
mod preview;

pub use history::{HistoryEntry, HistoryState};
pub use parse::{ParsePhase, ParseState, PARSE_FAILED_FALLBACK};
pub use preview::{short_preview, PREVIEW_CHARS};
