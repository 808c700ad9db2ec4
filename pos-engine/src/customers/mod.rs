//! Customer lookup

pub mod search;

pub use search::{CustomerSearch, SearchResults};

use crate::store::{Collection, DocumentStore, StoreResult, from_document};
use shared::models::Customer;

/// Maximum number of customers returned by a lookup
pub const SEARCH_LIMIT: usize = 20;

/// Customers whose name contains `text` (case-insensitive) or whose phone
/// starts with it, in stored order
pub async fn find(store: &dyn DocumentStore, text: &str) -> StoreResult<Vec<Customer>> {
    let mut found = Vec::new();
    for doc in store.list(Collection::Customers).await? {
        let customer: Customer = match from_document(doc) {
            Ok(customer) => customer,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed customer document");
                continue;
            }
        };
        if customer.matches(text) {
            found.push(customer);
            if found.len() == SEARCH_LIMIT {
                break;
            }
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryDocumentStore, to_document};

    async fn seeded() -> MemoryDocumentStore {
        let store = MemoryDocumentStore::new();
        for (id, name, phone) in [
            ("c1", "Asha Verma", "9876543210"),
            ("c2", "Ravi Kumar", "9123456780"),
            ("c3", "asha k", "8000000000"),
        ] {
            let customer = Customer {
                id: id.into(),
                name: name.into(),
                phone: Some(phone.into()),
                email: None,
            };
            store
                .set(Collection::Customers, id, to_document(&customer).unwrap())
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_find_by_name_and_phone() {
        let store = seeded().await;

        let by_name = find(&store, "ASHA").await.unwrap();
        let ids: Vec<_> = by_name.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c3"]);

        let by_phone = find(&store, "912").await.unwrap();
        assert_eq!(by_phone.len(), 1);
        assert_eq!(by_phone[0].id, "c2");

        assert!(find(&store, "zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_is_limited() {
        let store = MemoryDocumentStore::new();
        for i in 0..30 {
            let id = format!("c{:02}", i);
            let customer = Customer {
                id: id.clone(),
                name: format!("Guest {}", i),
                phone: None,
                email: None,
            };
            store
                .set(Collection::Customers, &id, to_document(&customer).unwrap())
                .await
                .unwrap();
        }
        assert_eq!(find(&store, "guest").await.unwrap().len(), SEARCH_LIMIT);
    }
}
