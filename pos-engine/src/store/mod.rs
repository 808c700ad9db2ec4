//! Document store collaborator
//!
//! Orders, products, customers and seller profiles are JSON documents keyed
//! by id inside named collections. Two backends:
//!
//! | Backend | Use |
//! |---------|-----|
//! | [`MemoryDocumentStore`] | tests, offline cache |
//! | [`RedbDocumentStore`] | persistent store under `WORK_DIR` |
//!
//! Plain `update` is last-write-wins. `update_versioned` checks and bumps the
//! document's `version` field and fails with [`StoreError::Conflict`] when
//! another writer got there first.

pub mod memory;
pub mod redb_store;

pub use memory::MemoryDocumentStore;
pub use redb_store::RedbDocumentStore;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cmp::Ordering;
use thiserror::Error;

/// A stored document (top-level JSON object)
pub type Document = serde_json::Map<String, Value>;

/// Field holding the write counter used by versioned updates
pub const VERSION_FIELD: &str = "version";

/// Named collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Products,
    Orders,
    Customers,
    Sellers,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Products,
        Collection::Orders,
        Collection::Customers,
        Collection::Sellers,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Products => "Products",
            Collection::Orders => "Orders",
            Collection::Customers => "Customers",
            Collection::Sellers => "Sellers",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] ::redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] ::redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] ::redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] ::redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] ::redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: Collection, id: String },

    #[error("Version conflict on {id}: expected {expected}, found {actual}")]
    Conflict {
        id: String,
        expected: u64,
        actual: u64,
    },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Equality filter, descending sort and limit over one collection
#[derive(Debug, Clone, Default)]
pub struct Query {
    filter: Option<(String, Value)>,
    order_by_desc: Option<String>,
    limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some((field.into(), value.into()));
        self
    }

    pub fn order_by_desc(mut self, field: impl Into<String>) -> Self {
        self.order_by_desc = Some(field.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Run the query over an already loaded collection
    pub fn apply(&self, docs: Vec<Document>) -> Vec<Document> {
        let mut docs: Vec<Document> = match &self.filter {
            Some((field, value)) => docs
                .into_iter()
                .filter(|doc| doc.get(field) == Some(value))
                .collect(),
            None => docs,
        };
        if let Some(field) = &self.order_by_desc {
            docs.sort_by(|a, b| compare_values(b.get(field), a.get(field)));
        }
        if let Some(limit) = self.limit {
            docs.truncate(limit);
        }
        docs
    }
}

/// Ordering for sort keys: missing < numbers < strings, other types equal
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Number(_)), Some(Value::String(_))) => Ordering::Less,
        (Some(Value::String(_)), Some(Value::Number(_))) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Async document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>>;

    /// Create or fully replace a document
    async fn set(&self, collection: Collection, id: &str, doc: Document) -> StoreResult<()>;

    /// Shallow merge of top-level fields; `NotFound` if the document is absent
    async fn update(&self, collection: Collection, id: &str, patch: Document)
    -> StoreResult<Document>;

    /// Like [`DocumentStore::update`], but only when the stored `version`
    /// equals `expected_version`; the stored version is then incremented
    async fn update_versioned(
        &self,
        collection: Collection,
        id: &str,
        expected_version: u64,
        patch: Document,
    ) -> StoreResult<Document>;

    /// Returns whether a document was removed
    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<bool>;

    async fn list(&self, collection: Collection) -> StoreResult<Vec<Document>>;

    /// Store a document under a freshly allocated id
    async fn add(&self, collection: Collection, mut doc: Document) -> StoreResult<String> {
        let id = uuid::Uuid::new_v4().to_string();
        doc.insert("id".to_string(), Value::String(id.clone()));
        self.set(collection, &id, doc).await?;
        Ok(id)
    }

    async fn query(&self, collection: Collection, query: &Query) -> StoreResult<Vec<Document>> {
        let docs = self.list(collection).await?;
        Ok(query.apply(docs))
    }
}

/// Serialize a model into a document
pub fn to_document<T: Serialize>(value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidDocument(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

/// Deserialize a document into a model
pub fn from_document<T: DeserializeOwned>(doc: Document) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

/// Stored write counter, 0 when absent
pub fn document_version(doc: &Document) -> u64 {
    doc.get(VERSION_FIELD).and_then(Value::as_u64).unwrap_or(0)
}

/// Shallow merge used by both backends
pub(crate) fn merge_patch(doc: &mut Document, patch: Document) {
    for (key, value) in patch {
        doc.insert(key, value);
    }
}

/// Version check and bump used by both backends
pub(crate) fn merge_versioned(
    doc: &mut Document,
    id: &str,
    expected_version: u64,
    patch: Document,
) -> StoreResult<()> {
    let actual = document_version(doc);
    if actual != expected_version {
        return Err(StoreError::Conflict {
            id: id.to_string(),
            expected: expected_version,
            actual,
        });
    }
    merge_patch(doc, patch);
    doc.insert(VERSION_FIELD.to_string(), Value::from(actual + 1));
    Ok(())
}
