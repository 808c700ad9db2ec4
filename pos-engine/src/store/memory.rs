//! In-memory document store

use super::{
    Collection, Document, DocumentStore, StoreError, StoreResult, merge_patch, merge_versioned,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

/// Process-local store; documents are cloned in and out
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, BTreeMap<String, Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .get(&collection)
            .map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        Ok(self
            .collections
            .read()
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn set(&self, collection: Collection, id: &str, doc: Document) -> StoreResult<()> {
        self.collections
            .write()
            .entry(collection)
            .or_default()
            .insert(id.to_string(), doc);
        Ok(())
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Document,
    ) -> StoreResult<Document> {
        let mut collections = self.collections.write();
        let doc = collections
            .get_mut(&collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection,
                id: id.to_string(),
            })?;
        merge_patch(doc, patch);
        Ok(doc.clone())
    }

    async fn update_versioned(
        &self,
        collection: Collection,
        id: &str,
        expected_version: u64,
        patch: Document,
    ) -> StoreResult<Document> {
        let mut collections = self.collections.write();
        let doc = collections
            .get_mut(&collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection,
                id: id.to_string(),
            })?;
        merge_versioned(doc, id, expected_version, patch)?;
        Ok(doc.clone())
    }

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<bool> {
        Ok(self
            .collections
            .write()
            .get_mut(&collection)
            .is_some_and(|docs| docs.remove(id).is_some()))
    }

    async fn list(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        Ok(self
            .collections
            .read()
            .get(&collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Query;
    use serde_json::{Value, json};

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_set_get_update_delete() {
        let store = MemoryDocumentStore::new();
        store
            .set(Collection::Orders, "o1", doc(json!({"id": "o1", "discount": 0, "paid": false})))
            .await
            .unwrap();

        let updated = store
            .update(Collection::Orders, "o1", doc(json!({"paid": true})))
            .await
            .unwrap();
        assert_eq!(updated["paid"], true);
        assert_eq!(updated["discount"], 0);

        assert!(store.get(Collection::Products, "o1").await.unwrap().is_none());
        assert!(store.delete(Collection::Orders, "o1").await.unwrap());
        assert!(!store.delete(Collection::Orders, "o1").await.unwrap());
        assert_eq!(store.count(Collection::Orders), 0);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryDocumentStore::new();
        let err = store
            .update(Collection::Orders, "nope", Document::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_add_allocates_id_and_query() {
        let store = MemoryDocumentStore::new();
        let id = store
            .add(Collection::Customers, doc(json!({"name": "Ravi", "score": 2})))
            .await
            .unwrap();
        store
            .add(Collection::Customers, doc(json!({"name": "Meena", "score": 5})))
            .await
            .unwrap();

        let stored = store.get(Collection::Customers, &id).await.unwrap().unwrap();
        assert_eq!(stored["id"], id.as_str());

        let top = store
            .query(Collection::Customers, &Query::new().order_by_desc("score").limit(1))
            .await
            .unwrap();
        assert_eq!(top[0]["name"], "Meena");
    }

    #[tokio::test]
    async fn test_versioned_update_conflict() {
        let store = MemoryDocumentStore::new();
        store
            .set(Collection::Orders, "o1", doc(json!({"id": "o1"})))
            .await
            .unwrap();

        store
            .update_versioned(Collection::Orders, "o1", 0, doc(json!({"discount": 5})))
            .await
            .unwrap();
        let err = store
            .update_versioned(Collection::Orders, "o1", 0, doc(json!({"discount": 7})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { actual: 1, .. }));
    }
}
