//! Export envelope and import validation.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::prompts::Prompt;

/// Snapshot written by export and accepted by import.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub version: u64,
    pub prompts: Vec<Prompt>,
    pub exported_at: Option<DateTime<Utc>>,
}

/// Reasons an import document is refused.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("not a valid export document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("prompt at index {0} has an empty id")]
    EmptyId(usize),

    #[error("duplicate prompt id: {0}")]
    DuplicateId(String),

    #[error("prompt {0} has an empty title or content")]
    EmptyField(String),
}

/// Import-side shape of a prompt.
///
/// Older exports dropped `createdAt` on edited prompts, so it is optional
/// here and backfilled from `updatedAt`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedPrompt {
    id: String,
    title: String,
    content: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedEnvelope {
    version: u64,
    prompts: Vec<ImportedPrompt>,
    #[serde(default)]
    exported_at: Option<DateTime<Utc>>,
}

impl ExportEnvelope {
    /// Parse and validate an import document.
    ///
    /// Either the whole envelope is accepted or an error is returned;
    /// nothing is partially applied.
    pub fn parse(data: &str) -> Result<Self, ImportError> {
        let raw: ImportedEnvelope = serde_json::from_str(data)?;

        let mut seen = HashSet::new();
        let mut prompts = Vec::with_capacity(raw.prompts.len());
        for (index, p) in raw.prompts.into_iter().enumerate() {
            if p.id.is_empty() {
                return Err(ImportError::EmptyId(index));
            }
            if !seen.insert(p.id.clone()) {
                return Err(ImportError::DuplicateId(p.id));
            }
            if p.title.trim().is_empty() || p.content.trim().is_empty() {
                return Err(ImportError::EmptyField(p.id));
            }

            prompts.push(Prompt {
                created_at: p.created_at.unwrap_or(p.updated_at),
                updated_at: p.updated_at,
                id: p.id,
                title: p.title,
                content: p.content,
                category: p.category.unwrap_or_default(),
            });
        }

        Ok(Self {
            version: raw.version,
            prompts,
            exported_at: raw.exported_at,
        })
    }
}

/// File name for an export taken on `date`: `cursor-prompts-YYYY-MM-DD.json`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("cursor-prompts-{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let envelope = ExportEnvelope::parse(r#"{"version": 4, "prompts": []}"#).unwrap();
        assert_eq!(envelope.version, 4);
        assert!(envelope.prompts.is_empty());
        assert!(envelope.exported_at.is_none());
    }

    #[test]
    fn test_parse_backfills_created_at() {
        let data = r#"{
            "version": 2,
            "prompts": [
                {"id": "a", "title": "Greet", "content": "Hello", "category": "chat",
                 "updatedAt": "2025-01-02T03:04:05.000Z"}
            ],
            "exportedAt": "2025-01-03T00:00:00.000Z"
        }"#;

        let envelope = ExportEnvelope::parse(data).unwrap();
        let prompt = &envelope.prompts[0];
        assert_eq!(prompt.created_at, prompt.updated_at);
        assert_eq!(prompt.category, "chat");
        assert!(envelope.exported_at.is_some());
    }

    #[test]
    fn test_parse_missing_category_is_uncategorized() {
        let data = r#"{"version": 1, "prompts": [
            {"id": "a", "title": "T", "content": "C",
             "createdAt": "2025-01-01T00:00:00Z", "updatedAt": "2025-01-01T00:00:00Z"}
        ]}"#;

        let envelope = ExportEnvelope::parse(data).unwrap();
        assert_eq!(envelope.prompts[0].category, "");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            ExportEnvelope::parse("{not valid json"),
            Err(ImportError::Parse(_))
        ));
        // version and prompts are both required
        assert!(ExportEnvelope::parse(r#"{"prompts": []}"#).is_err());
        assert!(ExportEnvelope::parse(r#"{"version": 1}"#).is_err());
        assert!(ExportEnvelope::parse(r#"{"version": -1, "prompts": []}"#).is_err());
        assert!(ExportEnvelope::parse(r#"[1, 2, 3]"#).is_err());
    }

    #[test]
    fn test_parse_rejects_duplicate_ids() {
        let data = r#"{"version": 1, "prompts": [
            {"id": "a", "title": "T", "content": "C", "updatedAt": "2025-01-01T00:00:00Z"},
            {"id": "a", "title": "U", "content": "D", "updatedAt": "2025-01-01T00:00:00Z"}
        ]}"#;

        assert!(matches!(
            ExportEnvelope::parse(data),
            Err(ImportError::DuplicateId(id)) if id == "a"
        ));
    }

    #[test]
    fn test_parse_rejects_empty_fields() {
        let empty_id = r#"{"version": 1, "prompts": [
            {"id": "", "title": "T", "content": "C", "updatedAt": "2025-01-01T00:00:00Z"}
        ]}"#;
        assert!(matches!(
            ExportEnvelope::parse(empty_id),
            Err(ImportError::EmptyId(0))
        ));

        let blank_title = r#"{"version": 1, "prompts": [
            {"id": "a", "title": "  ", "content": "C", "updatedAt": "2025-01-01T00:00:00Z"}
        ]}"#;
        assert!(matches!(
            ExportEnvelope::parse(blank_title),
            Err(ImportError::EmptyField(_))
        ));
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(export_file_name(date), "cursor-prompts-2026-10-16.json");
    }
}
