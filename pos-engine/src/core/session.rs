//! Session context
//!
//! Holds the signed-in seller, their permissions and the display currency.
//! Passed explicitly into checkout and lifecycle operations.

use crate::core::Config;
use crate::currency;
use crate::store::{Collection, DocumentStore, StoreResult, from_document};
use shared::models::SellerProfile;

#[derive(Debug, Clone)]
pub struct SessionContext {
    seller: Option<SellerProfile>,
    currency_code: String,
    country: String,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new("INR", "IN")
    }
}

impl SessionContext {
    pub fn new(currency_code: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            seller: None,
            currency_code: currency_code.into(),
            country: country.into(),
        }
    }

    pub fn with_seller(mut self, seller: SellerProfile) -> Self {
        self.seller = Some(seller);
        self
    }

    /// Build a session from config, loading the seller profile when
    /// `SELLER_ID` is set
    ///
    /// A missing profile document is logged and leaves the session without
    /// a seller; store failures are returned.
    pub async fn init(config: &Config, store: &dyn DocumentStore) -> StoreResult<Self> {
        let mut session = Self::new(config.currency_code.clone(), config.country.clone());

        if let Some(seller_id) = &config.seller_id {
            match store.get(Collection::Sellers, seller_id).await? {
                Some(doc) => {
                    let seller: SellerProfile = from_document(doc)?;
                    tracing::info!(
                        seller_id = %seller.id,
                        permissions = seller.permissions.len(),
                        "Seller session started"
                    );
                    session.seller = Some(seller);
                }
                None => {
                    tracing::warn!(seller_id = %seller_id, "Seller profile not found");
                }
            }
        }

        Ok(session)
    }

    /// Drop the cached seller profile and permissions
    pub fn teardown(&mut self) {
        if let Some(seller) = self.seller.take() {
            tracing::info!(seller_id = %seller.id, "Seller session ended");
        }
    }

    pub fn seller(&self) -> Option<&SellerProfile> {
        self.seller.as_ref()
    }

    pub fn seller_id(&self) -> Option<&str> {
        self.seller.as_ref().map(|s| s.id.as_str())
    }

    /// Accepts either spelling: `("orders", "delete")` or `("Orders", "Delete")`
    pub fn has_permission(&self, module: &str, action: &str) -> bool {
        self.seller
            .as_ref()
            .is_some_and(|seller| seller.has_permission(module, action))
    }

    pub fn bill_enabled(&self) -> bool {
        self.seller.as_ref().is_none_or(|seller| seller.bill_enabled)
    }

    pub fn last_bill_no(&self) -> u64 {
        self.seller.as_ref().map_or(0, |seller| seller.last_bill_no)
    }

    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn currency_symbol(&self) -> &'static str {
        currency::symbol_for(&self.currency_code)
    }

    pub fn format_amount(&self, amount: f64) -> String {
        currency::format_with_symbol(amount, &self.currency_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryDocumentStore, to_document};

    fn seller() -> SellerProfile {
        SellerProfile {
            permissions: vec!["orders_delete".into()],
            last_bill_no: 120,
            ..SellerProfile::new("s1")
        }
    }

    #[test]
    fn test_permissions_without_seller() {
        let session = SessionContext::default();
        assert!(!session.has_permission("Orders", "Delete"));
        assert!(session.bill_enabled());
        assert_eq!(session.currency_symbol(), "₹");
    }

    #[test]
    fn test_permissions_with_seller() {
        let session = SessionContext::new("USD", "US").with_seller(seller());
        assert!(session.has_permission("Orders", "Delete"));
        assert!(session.has_permission("orders", "delete"));
        assert!(!session.has_permission("Orders", "Refund"));
        assert_eq!(session.last_bill_no(), 120);
        assert_eq!(session.currency_symbol(), "$");
    }

    #[tokio::test]
    async fn test_init_loads_seller_and_teardown_clears() {
        let store = MemoryDocumentStore::new();
        store
            .set(Collection::Sellers, "s1", to_document(&seller()).unwrap())
            .await
            .unwrap();

        let config = Config::with_overrides("/tmp/unused", Some("s1".into()));
        let mut session = SessionContext::init(&config, &store).await.unwrap();
        assert_eq!(session.seller_id(), Some("s1"));

        session.teardown();
        assert_eq!(session.seller_id(), None);
        assert!(!session.has_permission("Orders", "Delete"));
    }

    #[tokio::test]
    async fn test_init_missing_seller_is_not_fatal() {
        let store = MemoryDocumentStore::new();
        let config = Config::with_overrides("/tmp/unused", Some("ghost".into()));
        let session = SessionContext::init(&config, &store).await.unwrap();
        assert!(session.seller().is_none());
    }
}
