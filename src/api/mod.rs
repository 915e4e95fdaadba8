//! Typed client of the notes service (categories and memos).

mod models;
mod notes;

pub use models::{Category, Memo, MemoParams, MemoSummary};
pub use notes::NotesApi;
