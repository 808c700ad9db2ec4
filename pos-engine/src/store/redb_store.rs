//! redb-backed document store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `products` | `id` | JSON | `Products` collection |
//! | `orders` | `id` | JSON | `Orders` collection |
//! | `customers` | `id` | JSON | `Customers` collection |
//! | `sellers` | `id` | JSON | `Sellers` collection |
//! | `sequence_counter` | `"bill_no"` | `u64` | Bill number sequence |
//!
//! Every read-modify-write (`update`, `update_versioned`, bill numbers) runs
//! inside a single write transaction, so it is atomic with respect to other
//! writers on the same database.

use super::{
    Collection, Document, DocumentStore, StoreError, StoreResult, merge_patch, merge_versioned,
};
use crate::orders::BillNumberSource;
use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;

const PRODUCTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("products");
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");
const CUSTOMERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("customers");
const SELLERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("sellers");

/// Sequence counters: key = counter name, value = last issued number
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

const BILL_NO_KEY: &str = "bill_no";

fn table_for(collection: Collection) -> TableDefinition<'static, &'static str, &'static [u8]> {
    match collection {
        Collection::Products => PRODUCTS_TABLE,
        Collection::Orders => ORDERS_TABLE,
        Collection::Customers => CUSTOMERS_TABLE,
        Collection::Sellers => SELLERS_TABLE,
    }
}

/// Document store backed by redb
#[derive(Clone)]
pub struct RedbDocumentStore {
    db: Arc<Database>,
}

impl RedbDocumentStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        let write_txn = db.begin_write()?;
        {
            for collection in Collection::ALL {
                let _ = write_txn.open_table(table_for(collection))?;
            }
            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            if seq_table.get(BILL_NO_KEY)?.is_none() {
                seq_table.insert(BILL_NO_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Last issued bill number (read-only)
    pub fn current_bill_no(&self) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SEQUENCE_TABLE)?;
        Ok(table.get(BILL_NO_KEY)?.map(|g| g.value()).unwrap_or(0))
    }

    /// Raise the bill counter to at least `last_bill_no`
    ///
    /// Used when the seller profile carries a higher number than this
    /// database has issued (e.g. after moving to a new device).
    pub fn ensure_bill_floor(&self, last_bill_no: u64) -> StoreResult<u64> {
        let txn = self.db.begin_write()?;
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        let current = table.get(BILL_NO_KEY)?.map(|g| g.value()).unwrap_or(0);
        let floor = current.max(last_bill_no);
        table.insert(BILL_NO_KEY, floor)?;
        drop(table);
        txn.commit()?;
        Ok(floor)
    }

    fn read_doc(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table_for(collection))?;

        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn write_doc(&self, collection: Collection, id: &str, doc: &Document) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(table_for(collection))?;
            let value = serde_json::to_vec(doc)?;
            table.insert(id, value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Read, modify and write back one document in a single transaction
    fn modify_doc<F>(&self, collection: Collection, id: &str, modify: F) -> StoreResult<Document>
    where
        F: FnOnce(&mut Document) -> StoreResult<()>,
    {
        let txn = self.db.begin_write()?;
        let doc = {
            let mut table = txn.open_table(table_for(collection))?;
            let mut doc: Document = match table.get(id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => {
                    return Err(StoreError::NotFound {
                        collection,
                        id: id.to_string(),
                    });
                }
            };
            modify(&mut doc)?;
            let value = serde_json::to_vec(&doc)?;
            table.insert(id, value.as_slice())?;
            doc
        };
        txn.commit()?;
        Ok(doc)
    }

    fn remove_doc(&self, collection: Collection, id: &str) -> StoreResult<bool> {
        let txn = self.db.begin_write()?;
        let removed = {
            let mut table = txn.open_table(table_for(collection))?;
            table.remove(id)?.is_some()
        };
        txn.commit()?;
        Ok(removed)
    }

    fn read_all(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table_for(collection))?;

        let mut docs = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            docs.push(serde_json::from_slice(value.value())?);
        }
        Ok(docs)
    }
}

#[async_trait]
impl DocumentStore for RedbDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        self.read_doc(collection, id)
    }

    async fn set(&self, collection: Collection, id: &str, doc: Document) -> StoreResult<()> {
        self.write_doc(collection, id, &doc)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Document,
    ) -> StoreResult<Document> {
        self.modify_doc(collection, id, |doc| {
            merge_patch(doc, patch);
            Ok(())
        })
    }

    async fn update_versioned(
        &self,
        collection: Collection,
        id: &str,
        expected_version: u64,
        patch: Document,
    ) -> StoreResult<Document> {
        self.modify_doc(collection, id, |doc| {
            merge_versioned(doc, id, expected_version, patch)
        })
    }

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<bool> {
        self.remove_doc(collection, id)
    }

    async fn list(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        self.read_all(collection)
    }
}

impl BillNumberSource for RedbDocumentStore {
    fn next_bill_no(&self) -> StoreResult<u64> {
        let txn = self.db.begin_write()?;
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        let current = table.get(BILL_NO_KEY)?.map(|g| g.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(BILL_NO_KEY, next)?;
        drop(table);
        txn.commit()?;
        Ok(next)
    }
}
