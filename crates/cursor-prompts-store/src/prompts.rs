//! Prompt storage over a key-value store.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::export::ExportEnvelope;
use crate::kv::KeyValueStore;

/// Key holding the prompt collection.
pub const PROMPTS_KEY: &str = "cursorPrompts";
/// Key holding the mutation counter.
pub const VERSION_KEY: &str = "promptsVersion";

/// A stored prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Empty means uncategorized.
    #[serde(default)]
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input to [`PromptStorage::save`]. An empty or absent `id` creates a new prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptDraft {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: String,
}

impl PromptDraft {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            category: category.into(),
        }
    }

    /// Target an existing prompt.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(StorageError::InvalidPrompt("title is empty".to_string()));
        }
        if self.content.trim().is_empty() {
            return Err(StorageError::InvalidPrompt("content is empty".to_string()));
        }
        Ok(())
    }
}

impl Prompt {
    /// Case-insensitive substring match on title or content. `needle` must
    /// already be lowercased.
    fn matches_query(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
    }

    fn matches_category(&self, category: &str) -> bool {
        category.is_empty() || self.category == category
    }
}

/// Sole owner of the prompt collection and version counter.
///
/// Every mutation writes the collection and the bumped version in a single
/// `set`, so the two never drift apart. Read-modify-write cycles are
/// serialised through `write_lock`.
pub struct PromptStorage {
    kv: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl PromptStorage {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            write_lock: Mutex::new(()),
        }
    }

    /// The full collection in stored order.
    pub async fn list(&self) -> Result<Vec<Prompt>> {
        match self.kv.get(PROMPTS_KEY).await? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    /// Current value of the mutation counter (0 if never written).
    pub async fn version(&self) -> Result<u64> {
        match self.kv.get(VERSION_KEY).await? {
            None | Some(Value::Null) => Ok(0),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    pub async fn get(&self, id: &str) -> Result<Option<Prompt>> {
        Ok(self.list().await?.into_iter().find(|p| p.id == id))
    }

    /// Create or update a prompt.
    ///
    /// Updating an id that is not in the collection fails with
    /// [`StorageError::PromptNotFound`] and writes nothing.
    pub async fn save(&self, draft: PromptDraft) -> Result<Prompt> {
        draft.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut prompts = self.list().await?;
        let version = next_version(self.version().await?)?;
        let now = Utc::now();

        let PromptDraft {
            id,
            title,
            content,
            category,
        } = draft;

        let saved = match id.filter(|id| !id.is_empty()) {
            None => {
                let prompt = Prompt {
                    id: Uuid::new_v4().to_string(),
                    title,
                    content,
                    category,
                    created_at: now,
                    updated_at: now,
                };
                prompts.push(prompt.clone());
                prompt
            }
            Some(id) => {
                let existing = prompts
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or(StorageError::PromptNotFound(id))?;
                existing.title = title;
                existing.content = content;
                existing.category = category;
                existing.updated_at = advance(existing.updated_at, now);
                existing.clone()
            }
        };

        self.write(&prompts, version).await?;
        info!(id = %saved.id, version, "Saved prompt");
        Ok(saved)
    }

    /// Delete a prompt by id. Returns whether a record was removed.
    ///
    /// The version is bumped even when the id is unknown.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut prompts = self.list().await?;
        let version = next_version(self.version().await?)?;

        let before = prompts.len();
        prompts.retain(|p| p.id != id);
        let removed = prompts.len() != before;

        self.write(&prompts, version).await?;
        info!(id, removed, version, "Deleted prompt");
        Ok(removed)
    }

    /// Distinct non-empty categories in first-seen order.
    pub async fn categories(&self) -> Result<Vec<String>> {
        let prompts = self.list().await?;
        let mut seen = HashSet::new();
        Ok(prompts
            .into_iter()
            .map(|p| p.category)
            .filter(|c| !c.is_empty() && seen.insert(c.clone()))
            .collect())
    }

    /// Prompts whose title or content contains `query` (case-insensitive)
    /// and whose category equals `category`. Empty arguments match all.
    pub async fn search(&self, query: &str, category: &str) -> Result<Vec<Prompt>> {
        let needle = query.to_lowercase();
        let results: Vec<Prompt> = self
            .list()
            .await?
            .into_iter()
            .filter(|p| p.matches_query(&needle) && p.matches_category(category))
            .collect();
        debug!(query, category, matches = results.len(), "Searched prompts");
        Ok(results)
    }

    /// Serialize the collection and version as an export document.
    pub async fn export(&self) -> Result<String> {
        let envelope = self.snapshot().await?;
        Ok(serde_json::to_string_pretty(&envelope)?)
    }

    /// Current state as an export envelope stamped with the current time.
    pub async fn snapshot(&self) -> Result<ExportEnvelope> {
        Ok(ExportEnvelope {
            version: self.version().await?,
            prompts: self.list().await?,
            exported_at: Some(Utc::now()),
        })
    }

    /// Replace the collection and version with an export document.
    ///
    /// Returns `false` and leaves state untouched if the document is
    /// malformed or the write fails.
    pub async fn import(&self, data: &str) -> bool {
        let envelope = match ExportEnvelope::parse(data) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "Import rejected");
                return false;
            }
        };

        let _guard = self.write_lock.lock().await;
        match self.write(&envelope.prompts, envelope.version).await {
            Ok(()) => {
                info!(
                    prompts = envelope.prompts.len(),
                    version = envelope.version,
                    "Imported prompts"
                );
                true
            }
            Err(e) => {
                warn!(error = %e, "Import failed to persist");
                false
            }
        }
    }

    async fn write(&self, prompts: &[Prompt], version: u64) -> Result<()> {
        self.kv
            .set(vec![
                (PROMPTS_KEY.to_string(), serde_json::to_value(prompts)?),
                (VERSION_KEY.to_string(), json!(version)),
            ])
            .await
    }
}

/// The counter after one more mutation. Refuses to wrap.
fn next_version(current: u64) -> Result<u64> {
    current.checked_add(1).ok_or(StorageError::VersionOverflow)
}

/// Next `updatedAt` value, strictly later than `previous`.
fn advance(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}
