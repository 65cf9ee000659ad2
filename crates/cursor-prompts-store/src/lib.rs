//! Storage layer for cursor-prompts.
//!
//! Prompts, the mutation counter and user preferences live in a small
//! key-value store. [`PromptStorage`] and [`Preferences`] are the only
//! types that read or write it; callers never touch the keys directly.
//!
//! ## Key Types
//!
//! - [`KeyValueStore`] - Async key-value seam
//! - [`SqliteStore`] - SQLite backend (default)
//! - [`MemoryStore`] - In-process backend
//! - [`PromptStorage`] - CRUD, search and export/import over prompts
//! - [`Preferences`] - Theme preference

mod error;
mod export;
mod kv;
mod preferences;
mod prompts;
mod sqlite;

pub use error::{Result, StorageError};
pub use export::{export_file_name, ExportEnvelope, ImportError};
pub use kv::{KeyValueStore, MemoryStore};
pub use preferences::{Preferences, Theme, THEME_KEY};
pub use prompts::{Prompt, PromptDraft, PromptStorage, PROMPTS_KEY, VERSION_KEY};
pub use sqlite::SqliteStore;
