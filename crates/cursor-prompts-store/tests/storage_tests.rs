use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use cursor_prompts_store::{
    KeyValueStore, MemoryStore, PromptDraft, PromptStorage, SqliteStore, StorageError,
};

/// Backend whose every call fails, standing in for an unavailable store.
struct UnavailableStore;

#[async_trait]
impl KeyValueStore for UnavailableStore {
    async fn get(&self, _key: &str) -> cursor_prompts_store::Result<Option<Value>> {
        Err(StorageError::Io(std::io::Error::other("store unavailable")))
    }

    async fn set(&self, _entries: Vec<(String, Value)>) -> cursor_prompts_store::Result<()> {
        Err(StorageError::Io(std::io::Error::other("store unavailable")))
    }
}

fn memory_storage() -> PromptStorage {
    PromptStorage::new(Arc::new(MemoryStore::new()))
}

async fn seed(storage: &PromptStorage) {
    for (title, content, category) in [
        ("Greet", "Hello {{name}}", "chat"),
        ("Explain", "Explain this code step by step", "code"),
        ("Review", "Review the diff for bugs", "code"),
        ("Haiku", "Write a haiku about {{topic}}", ""),
    ] {
        storage
            .save(PromptDraft::new(title, content, category))
            .await
            .unwrap();
    }
}

// ============================================================
// Scenarios
// ============================================================

#[tokio::test]
async fn test_greet_scenario() {
    let storage = memory_storage();

    let prompt = storage
        .save(PromptDraft::new("Greet", "Hello {{name}}", "chat"))
        .await
        .unwrap();

    assert!(storage.list().await.unwrap().contains(&prompt));
    assert_eq!(storage.search("greet", "").await.unwrap(), vec![prompt.clone()]);
    assert_eq!(storage.categories().await.unwrap(), vec!["chat".to_string()]);

    storage.delete(&prompt.id).await.unwrap();
    assert!(storage.list().await.unwrap().is_empty());
    assert!(storage.categories().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_import_leaves_state_untouched() {
    let storage = memory_storage();
    seed(&storage).await;
    let before = storage.list().await.unwrap();
    let version = storage.version().await.unwrap();

    assert!(!storage.import("{not valid json").await);
    assert!(!storage.import(r#"{"version": 9}"#).await);

    assert_eq!(storage.list().await.unwrap(), before);
    assert_eq!(storage.version().await.unwrap(), version);
}

// ============================================================
// Properties
// ============================================================

#[tokio::test]
async fn test_create_ids_are_unique() {
    let storage = memory_storage();
    seed(&storage).await;

    let ids: HashSet<String> = storage
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids.len(), 4);
    assert!(ids.iter().all(|id| !id.is_empty()));
}

#[tokio::test]
async fn test_update_leaves_others_untouched() {
    let storage = memory_storage();
    seed(&storage).await;
    let before = storage.list().await.unwrap();
    let target = before[1].clone();

    let updated = storage
        .save(PromptDraft::new("Explain v2", "Explain slowly", "code").with_id(&target.id))
        .await
        .unwrap();

    let after = storage.list().await.unwrap();
    assert_eq!(after.len(), before.len());
    for (old, new) in before.iter().zip(after.iter()) {
        if old.id == target.id {
            assert_eq!(new, &updated);
            assert_eq!(new.created_at, old.created_at);
            assert!(new.updated_at > old.updated_at);
        } else {
            assert_eq!(new, old);
        }
    }
}

#[tokio::test]
async fn test_version_increments_by_one_per_mutation() {
    let storage = memory_storage();
    assert_eq!(storage.version().await.unwrap(), 0);

    let prompt = storage.save(PromptDraft::new("A", "a", "")).await.unwrap();
    assert_eq!(storage.version().await.unwrap(), 1);

    // Saving identical content still counts
    storage
        .save(PromptDraft::new("A", "a", "").with_id(&prompt.id))
        .await
        .unwrap();
    assert_eq!(storage.version().await.unwrap(), 2);

    storage.delete(&prompt.id).await.unwrap();
    assert_eq!(storage.version().await.unwrap(), 3);

    storage.delete("never-existed").await.unwrap();
    assert_eq!(storage.version().await.unwrap(), 4);
}

#[tokio::test]
async fn test_delete_unknown_id_leaves_list_unchanged() {
    let storage = memory_storage();
    seed(&storage).await;
    let before = storage.list().await.unwrap();

    assert!(!storage.delete("nope").await.unwrap());
    assert_eq!(storage.list().await.unwrap(), before);
}

#[tokio::test]
async fn test_empty_search_equals_list() {
    let storage = memory_storage();
    seed(&storage).await;

    let listed: HashSet<String> = storage
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    let searched: HashSet<String> = storage
        .search("", "")
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(listed, searched);
}

#[tokio::test]
async fn test_search_filters() {
    let storage = memory_storage();
    seed(&storage).await;

    for (query, category) in [("E", ""), ("code", ""), ("", "code"), ("the", "code"), ("{{", "")] {
        let needle = query.to_lowercase();
        let results = storage.search(query, category).await.unwrap();
        assert!(!results.is_empty(), "no results for {query:?}/{category:?}");
        for p in results {
            assert!(
                p.title.to_lowercase().contains(&needle)
                    || p.content.to_lowercase().contains(&needle)
            );
            if !category.is_empty() {
                assert_eq!(p.category, category);
            }
        }
    }
}

#[tokio::test]
async fn test_export_import_roundtrip_same_store() {
    let storage = memory_storage();
    seed(&storage).await;
    let exported = storage.export().await.unwrap();
    let list = storage.list().await.unwrap();
    let version = storage.version().await.unwrap();

    // Mutate, then restore from the export
    storage.delete(&list[0].id).await.unwrap();
    storage.save(PromptDraft::new("New", "n", "")).await.unwrap();

    assert!(storage.import(&exported).await);
    assert_eq!(storage.list().await.unwrap(), list);
    assert_eq!(storage.version().await.unwrap(), version);
}

#[tokio::test]
async fn test_export_import_roundtrip_fresh_sqlite_store() {
    let source = memory_storage();
    seed(&source).await;
    let exported = source.export().await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let target = PromptStorage::new(Arc::new(
        SqliteStore::open_at(&dir.path().join("prompts.db")).unwrap(),
    ));
    assert!(target.import(&exported).await);

    assert_eq!(target.list().await.unwrap(), source.list().await.unwrap());
    assert_eq!(target.version().await.unwrap(), source.version().await.unwrap());
}

#[tokio::test]
async fn test_export_document_shape() {
    let storage = memory_storage();
    seed(&storage).await;

    let doc: Value = serde_json::from_str(&storage.export().await.unwrap()).unwrap();
    assert_eq!(doc["version"], 4);
    assert_eq!(doc["prompts"].as_array().unwrap().len(), 4);
    assert!(doc["exportedAt"].is_string());
    assert!(doc["prompts"][0]["createdAt"].is_string());
    assert!(doc["prompts"][0]["updatedAt"].is_string());
}

#[tokio::test]
async fn test_import_replaces_rather_than_merges() {
    let storage = memory_storage();
    seed(&storage).await;

    let data = r#"{"version": 42, "prompts": [
        {"id": "x", "title": "Only", "content": "one", "category": "solo",
         "createdAt": "2025-01-01T00:00:00.000Z", "updatedAt": "2025-01-02T00:00:00.000Z"}
    ], "exportedAt": "2025-01-03T00:00:00.000Z"}"#;

    assert!(storage.import(data).await);
    let list = storage.list().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, "x");
    assert_eq!(storage.version().await.unwrap(), 42);
    assert_eq!(storage.categories().await.unwrap(), vec!["solo".to_string()]);
}

// ============================================================
// Failure semantics
// ============================================================

#[tokio::test]
async fn test_backend_errors_propagate() {
    let storage = PromptStorage::new(Arc::new(UnavailableStore));

    assert!(matches!(
        storage.save(PromptDraft::new("A", "a", "")).await,
        Err(StorageError::Io(_))
    ));
    assert!(storage.delete("a").await.is_err());
    assert!(storage.list().await.is_err());
    assert!(storage.export().await.is_err());
}

#[tokio::test]
async fn test_import_reports_backend_failure_as_false() {
    let storage = PromptStorage::new(Arc::new(UnavailableStore));
    assert!(!storage.import(r#"{"version": 1, "prompts": []}"#).await);
}

#[tokio::test]
async fn test_saturated_version_refuses_further_mutations() {
    let storage = memory_storage();
    let imported = format!(
        r#"{{"version": {}, "prompts": [{{"id": "a", "title": "A", "content": "a", "category": "", "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"}}]}}"#,
        u64::MAX
    );
    assert!(storage.import(&imported).await);

    assert!(matches!(
        storage.save(PromptDraft::new("B", "b", "")).await,
        Err(StorageError::VersionOverflow)
    ));
    assert!(matches!(
        storage.delete("a").await,
        Err(StorageError::VersionOverflow)
    ));

    // Nothing was written and the counter did not wrap
    assert_eq!(storage.version().await.unwrap(), u64::MAX);
    assert_eq!(storage.list().await.unwrap().len(), 1);
}
