//! Order lifecycle on a persisted order
//!
//! `PLACED -> KITCHEN -> COMPLETED`. `CANCELLED` exists but is only ever set
//! from outside the engine. The status log is append-only.
//!
//! Item operations re-fetch the order, mutate the items by product id and
//! write the whole array back. With [`WriteMode::LastWriteWins`] (default) a
//! concurrent edit from another device can be silently overwritten;
//! [`WriteMode::Optimistic`] rejects the write with a retryable conflict
//! instead.

use super::assembler::{build_line_items, merge_items_by_product, tax_update_info_for};
use super::error::{OrderError, OrderResult, ValidationError};
use crate::core::SessionContext;
use crate::pricing::consolidate_items;
use crate::store::{Collection, Document, DocumentStore, from_document, to_document};
use crate::utils::validation::require_finite;
use serde_json::Value;
use shared::order::{Cart, LineItem, Order, OrderStatus, StatusEntry, TaxUpdateInfo};
use shared::util::now_millis;
use std::str::FromStr;
use std::sync::Arc;

/// Concurrency policy for read-modify-write updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    LastWriteWins,
    /// Check and bump the order's `version` on every write
    Optimistic,
}

impl FromStr for WriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last_write_wins" | "lww" => Ok(WriteMode::LastWriteWins),
            "optimistic" => Ok(WriteMode::Optimistic),
            other => Err(format!("unknown write mode: {}", other)),
        }
    }
}

/// What `remove_item` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Quantity reduced by one
    Decremented { remaining: u32 },
    /// Line removed, other lines remain
    Removed,
    /// Last unit of the last line; order deleted
    OrderDeleted,
    /// Last unit of the last line, but the caller may not delete orders
    DeleteRefused,
}

/// Build a patch document from `(field, value)` pairs
pub(crate) fn patch<I, K>(fields: I) -> Document
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    fields.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

pub(crate) fn to_value<T: serde::Serialize>(value: &T) -> OrderResult<Value> {
    serde_json::to_value(value).map_err(|e| OrderError::Persistence(e.into()))
}

/// Load an order, `OrderNotFound` if missing
pub(crate) async fn fetch_order(store: &dyn DocumentStore, id: &str) -> OrderResult<Order> {
    match store.get(Collection::Orders, id).await? {
        Some(doc) => Ok(from_document(doc)?),
        None => Err(OrderError::OrderNotFound(id.to_string())),
    }
}

/// Patch for a new item list together with the charge snapshot derived
/// from it, so `Order::total()` stays reproducible from the document
///
/// The previous tax update block is kept while the bulk hashtag is
/// unchanged.
pub(crate) fn items_patch(items: &[LineItem], previous: &Order, now: i64) -> OrderResult<Document> {
    let charges = consolidate_items(items);
    let previous_tag = previous
        .tax_update_info
        .as_ref()
        .and_then(TaxUpdateInfo::bulk_hashtag);
    let tax_update_info = match (charges.first_hashtag(), previous_tag) {
        (Some(tag), Some(old)) if tag == old => previous.tax_update_info.clone(),
        _ => tax_update_info_for(&charges, now),
    };

    Ok(patch([
        ("items", to_value(&items)?),
        ("charges", to_value(&charges.as_slice())?),
        ("taxUpdateInfo", to_value(&tax_update_info)?),
    ]))
}

/// Write a patch with the given concurrency policy
pub(crate) async fn write_patch(
    store: &dyn DocumentStore,
    mode: WriteMode,
    id: &str,
    expected_version: u64,
    patch: Document,
) -> OrderResult<()> {
    match mode {
        WriteMode::LastWriteWins => {
            store.update(Collection::Orders, id, patch).await?;
        }
        WriteMode::Optimistic => {
            store
                .update_versioned(Collection::Orders, id, expected_version, patch)
                .await?;
        }
    }
    Ok(())
}

/// Operations on an already persisted order
///
/// Each method takes the caller's copy of the order and refreshes it from
/// the store after writing.
#[derive(Clone)]
pub struct OrderLifecycle {
    store: Arc<dyn DocumentStore>,
    write_mode: WriteMode,
}

impl OrderLifecycle {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            write_mode: WriteMode::default(),
        }
    }

    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    pub async fn load(&self, order_id: &str) -> OrderResult<Order> {
        fetch_order(self.store.as_ref(), order_id).await
    }

    /// Replace `order` with the stored document
    pub async fn reload(&self, order: &mut Order) -> OrderResult<()> {
        *order = self.load(&order.id).await?;
        Ok(())
    }

    async fn write(&self, order: &Order, patch: Document) -> OrderResult<()> {
        write_patch(
            self.store.as_ref(),
            self.write_mode,
            &order.id,
            order.version,
            patch,
        )
        .await
    }

    async fn write_items(
        &self,
        order: &mut Order,
        stored: &Order,
        items: &[LineItem],
    ) -> OrderResult<()> {
        self.write(order, items_patch(items, stored, now_millis())?)
            .await?;
        self.reload(order).await
    }

    /// Append the labels not yet in the log; the last appended one becomes
    /// the current status. Returns `false` when nothing was appended.
    pub async fn update_status(
        &self,
        order: &mut Order,
        labels: &[OrderStatus],
    ) -> OrderResult<bool> {
        let stored = self.load(&order.id).await?;
        let now = now_millis();

        let mut status = stored.status.clone();
        let mut appended = None;
        for &label in labels {
            if !status.iter().any(|entry| entry.label == label) {
                let entry = StatusEntry::new(label, now);
                status.push(entry.clone());
                appended = Some(entry);
            }
        }

        let Some(current) = appended else {
            return Ok(false);
        };

        tracing::info!(order_id = %order.id, status = %current.label, "Order status updated");
        self.write(
            order,
            patch([
                ("status", to_value(&status)?),
                ("currentStatus", to_value(&current)?),
            ]),
        )
        .await?;
        self.reload(order).await?;
        Ok(true)
    }

    /// Set the served flag of the line with `product_id`
    pub async fn serve_item(
        &self,
        order: &mut Order,
        product_id: &str,
        served: bool,
    ) -> OrderResult<()> {
        let stored = self.load(&order.id).await?;
        let mut items = stored.items.clone();
        let item = items
            .iter_mut()
            .find(|item| item.product_id == product_id)
            .ok_or_else(|| OrderError::ItemNotFound(product_id.to_string()))?;
        item.served = served;

        tracing::debug!(order_id = %order.id, product_id, served, "Item served status set");
        self.write_items(order, &stored, &items).await
    }

    /// One more unit of `item`; a product not yet on the order is appended
    pub async fn add_item(&self, order: &mut Order, item: &LineItem) -> OrderResult<()> {
        let stored = self.load(&order.id).await?;
        let mut items = stored.items.clone();
        match items
            .iter_mut()
            .find(|existing| existing.product_id == item.product_id)
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(1),
            None => items.push(item.clone()),
        }

        tracing::debug!(order_id = %order.id, product_id = %item.product_id, "Item added to order");
        self.write_items(order, &stored, &items).await
    }

    /// Add a cart's lines to an open order, summing quantities of products
    /// already on it and appending the rest
    pub async fn merge_items_into_order(&self, order: &mut Order, cart: &Cart) -> OrderResult<()> {
        if cart.is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }
        let incoming = build_line_items(cart)?;
        let stored = self.load(&order.id).await?;
        let mut items = stored.items.clone();
        merge_items_by_product(&mut items, incoming);

        tracing::info!(order_id = %order.id, lines = items.len(), "Cart merged into order");
        self.write_items(order, &stored, &items).await
    }

    /// One unit less of the line with `product_id`
    ///
    /// When the order holds a single unit in total, the whole order is
    /// deleted instead, but only if the session may delete orders. Without
    /// that permission nothing changes and no error is returned.
    pub async fn remove_item(
        &self,
        order: &mut Order,
        product_id: &str,
        session: &SessionContext,
    ) -> OrderResult<RemoveOutcome> {
        let stored = self.load(&order.id).await?;

        if stored.total_items() > 1 {
            let mut items = stored.items.clone();
            let idx = items
                .iter()
                .position(|item| item.product_id == product_id)
                .ok_or_else(|| OrderError::ItemNotFound(product_id.to_string()))?;

            let outcome = if items[idx].quantity > 1 {
                items[idx].quantity -= 1;
                RemoveOutcome::Decremented {
                    remaining: items[idx].quantity,
                }
            } else {
                items.remove(idx);
                RemoveOutcome::Removed
            };

            tracing::debug!(order_id = %order.id, product_id, ?outcome, "Item removed from order");
            self.write_items(order, &stored, &items).await?;
            return Ok(outcome);
        }

        if session.has_permission("Orders", "Delete") {
            self.store.delete(Collection::Orders, &order.id).await?;
            tracing::info!(order_id = %order.id, "Order deleted with its last item");
            Ok(RemoveOutcome::OrderDeleted)
        } else {
            tracing::warn!(
                order_id = %order.id,
                seller_id = ?session.seller_id(),
                "Refusing to delete order without orders_delete permission"
            );
            Ok(RemoveOutcome::DeleteRefused)
        }
    }

    /// Replace the order discount
    pub async fn set_discount(&self, order: &mut Order, discount: f64) -> OrderResult<()> {
        require_finite(discount, "discount")?;
        if discount < 0.0 {
            return Err(ValidationError::InvalidDiscount(format!(
                "discount must be non-negative, got {}",
                discount
            ))
            .into());
        }

        self.write(order, patch([("discount", Value::from(discount))]))
            .await?;
        tracing::info!(order_id = %order.id, discount, "Discount updated");
        self.reload(order).await
    }

    /// Persist a brand new order document
    pub async fn create(&self, order: &Order) -> OrderResult<()> {
        self.store
            .set(Collection::Orders, &order.id, to_document(order)?)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use shared::models::SellerProfile;
    use shared::order::PaymentMode;

    fn item(pid: &str, qnt: u32) -> LineItem {
        serde_json::from_value(serde_json::json!({
            "pid": pid,
            "title": pid,
            "price": 50.0,
            "qnt": qnt
        }))
        .unwrap()
    }

    fn order(items: Vec<LineItem>) -> Order {
        let kitchen = StatusEntry::new(OrderStatus::Kitchen, 1);
        Order {
            id: "o1".into(),
            bill_no: 1,
            items,
            seller_id: None,
            price_variant: None,
            table_id: None,
            discount: 0.0,
            paid: true,
            pay_mode: PaymentMode::Cash,
            status: vec![StatusEntry::new(OrderStatus::Placed, 1), kitchen.clone()],
            current_status: kitchen,
            charges: vec![],
            cust_id: None,
            cust_name: None,
            cust_phone: None,
            tax_update_info: None,
            instructions: String::new(),
            date: 1,
            version: 0,
        }
    }

    async fn setup(items: Vec<LineItem>) -> (OrderLifecycle, Order, Arc<MemoryDocumentStore>) {
        let store = Arc::new(MemoryDocumentStore::new());
        let lifecycle = OrderLifecycle::new(store.clone());
        let order = order(items);
        lifecycle.create(&order).await.unwrap();
        (lifecycle, order, store)
    }

    fn deleter() -> SessionContext {
        SessionContext::default().with_seller(SellerProfile {
            permissions: vec!["orders_delete".into()],
            ..SellerProfile::new("s1")
        })
    }

    #[tokio::test]
    async fn test_update_status_appends_missing_only() {
        let (lifecycle, mut order, _) = setup(vec![item("tea", 1)]).await;

        let changed = lifecycle
            .update_status(&mut order, &[OrderStatus::Kitchen, OrderStatus::Completed])
            .await
            .unwrap();
        assert!(changed);
        assert_eq!(order.status.len(), 3);
        assert_eq!(order.current_status.label, OrderStatus::Completed);
        assert!(order.has_status(OrderStatus::Placed));

        let changed = lifecycle
            .update_status(&mut order, &[OrderStatus::Completed])
            .await
            .unwrap();
        assert!(!changed);
        assert_eq!(order.status.len(), 3);
    }

    #[tokio::test]
    async fn test_serve_and_add_item() {
        let (lifecycle, mut order, _) = setup(vec![item("tea", 1), item("bun", 2)]).await;

        lifecycle.serve_item(&mut order, "bun", true).await.unwrap();
        assert_eq!(order.served_items(), 2);

        lifecycle.add_item(&mut order, &item("tea", 1)).await.unwrap();
        assert_eq!(order.find_item("tea").unwrap().quantity, 2);

        lifecycle.add_item(&mut order, &item("cake", 1)).await.unwrap();
        assert_eq!(order.items.len(), 3);

        let err = lifecycle.serve_item(&mut order, "ghost", true).await.unwrap_err();
        assert!(matches!(err, OrderError::ItemNotFound(_)));
    }

    #[tokio::test]
    async fn test_add_item_refreshes_charges() {
        let (lifecycle, mut order, store) = setup(vec![item("tea", 1)]).await;
        let mut boxed = item("box", 1);
        boxed.charges = vec![shared::order::ChargeRule::fixed("Packing", 20.0, false)];

        lifecycle.add_item(&mut order, &boxed).await.unwrap();

        let stored: Order =
            from_document(store.get(Collection::Orders, "o1").await.unwrap().unwrap()).unwrap();
        assert_eq!(stored.charges.len(), 1);
        assert_eq!(stored.charges[0].name, "Packing");
        assert!((stored.total() - 120.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_merge_items_into_order_sums_by_product() {
        let (lifecycle, mut order, _) = setup(vec![item("tea", 1), item("bun", 2)]).await;
        let product = |id: &str, charges: Vec<shared::order::ChargeRule>| shared::models::Product {
            charges,
            ..serde_json::from_value::<shared::models::Product>(serde_json::json!({
                "id": id,
                "title": id,
                "price": 50.0
            }))
            .unwrap()
        };
        let mut cart = Cart::new();
        cart.add(product("tea", vec![]), 2, None, vec![]);
        cart.add(
            product("cake", vec![shared::order::ChargeRule::percentage("GST", 5.0, false)]),
            1,
            None,
            vec![],
        );

        lifecycle.merge_items_into_order(&mut order, &cart).await.unwrap();

        let lines: Vec<(&str, u32)> = order
            .items
            .iter()
            .map(|item| (item.product_id.as_str(), item.quantity))
            .collect();
        assert_eq!(lines, vec![("tea", 3), ("bun", 2), ("cake", 1)]);
        assert_eq!(order.charges.len(), 1);
        // 300 subtotal plus 5% GST
        assert!((order.total() - 315.0).abs() < 1e-9);

        let err = lifecycle
            .merge_items_into_order(&mut order, &Cart::new())
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Validation(ValidationError::EmptyCart)));
        assert_eq!(order.total_items(), 6);
    }

    #[tokio::test]
    async fn test_remove_item_decrements_then_removes() {
        let (lifecycle, mut order, _) = setup(vec![item("tea", 2), item("bun", 1)]).await;
        let session = SessionContext::default();

        let outcome = lifecycle.remove_item(&mut order, "tea", &session).await.unwrap();
        assert_eq!(outcome, RemoveOutcome::Decremented { remaining: 1 });

        let outcome = lifecycle.remove_item(&mut order, "tea", &session).await.unwrap();
        assert_eq!(outcome, RemoveOutcome::Removed);
        assert_eq!(order.items.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_last_item_with_permission_deletes_order() {
        let (lifecycle, mut order, store) = setup(vec![item("tea", 1)]).await;

        let outcome = lifecycle
            .remove_item(&mut order, "tea", &deleter())
            .await
            .unwrap();
        assert_eq!(outcome, RemoveOutcome::OrderDeleted);
        assert_eq!(store.count(Collection::Orders), 0);
    }

    #[tokio::test]
    async fn test_remove_last_item_without_permission_is_refused_silently() {
        let (lifecycle, mut order, store) = setup(vec![item("tea", 1)]).await;

        let outcome = lifecycle
            .remove_item(&mut order, "tea", &SessionContext::default())
            .await
            .unwrap();
        assert_eq!(outcome, RemoveOutcome::DeleteRefused);
        assert_eq!(store.count(Collection::Orders), 1);
        let stored = lifecycle.load("o1").await.unwrap();
        assert_eq!(stored.items, order.items);
    }

    #[tokio::test]
    async fn test_set_discount_validates() {
        let (lifecycle, mut order, _) = setup(vec![item("tea", 2)]).await;

        lifecycle.set_discount(&mut order, 15.0).await.unwrap();
        assert_eq!(order.discount, 15.0);

        let err = lifecycle.set_discount(&mut order, -1.0).await.unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
        let err = lifecycle.set_discount(&mut order, f64::NAN).await.unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
        assert_eq!(lifecycle.load("o1").await.unwrap().discount, 15.0);
    }

    #[tokio::test]
    async fn test_last_write_wins_overwrites_stale_copy() {
        let (lifecycle, mut device_a, _) = setup(vec![item("tea", 1)]).await;
        let mut device_b = device_a.clone();

        lifecycle.set_discount(&mut device_a, 5.0).await.unwrap();
        lifecycle.set_discount(&mut device_b, 9.0).await.unwrap();
        assert_eq!(lifecycle.load("o1").await.unwrap().discount, 9.0);
    }

    #[tokio::test]
    async fn test_optimistic_mode_detects_stale_copy() {
        let (lifecycle, mut device_a, _) = setup(vec![item("tea", 1)]).await;
        let lifecycle = lifecycle.with_write_mode(WriteMode::Optimistic);
        let mut device_b = device_a.clone();

        lifecycle.set_discount(&mut device_a, 5.0).await.unwrap();
        assert_eq!(device_a.version, 1);

        let err = lifecycle.set_discount(&mut device_b, 9.0).await.unwrap_err();
        assert!(matches!(
            err,
            OrderError::Conflict {
                expected: 0,
                actual: 1,
                ..
            }
        ));

        lifecycle.reload(&mut device_b).await.unwrap();
        lifecycle.set_discount(&mut device_b, 9.0).await.unwrap();
        assert_eq!(device_b.version, 2);
    }

    #[test]
    fn test_write_mode_parse() {
        assert_eq!("optimistic".parse::<WriteMode>(), Ok(WriteMode::Optimistic));
        assert_eq!(
            "LAST_WRITE_WINS".parse::<WriteMode>(),
            Ok(WriteMode::LastWriteWins)
        );
        assert!("sometimes".parse::<WriteMode>().is_err());
    }
}
