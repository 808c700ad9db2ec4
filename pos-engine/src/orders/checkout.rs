//! Checkout orchestration
//!
//! ```text
//! validate ─► consolidate ─► price ─► assemble ─► persist ─► hooks (best effort)
//! ```
//!
//! A request without `order_id` creates a new order. With `order_id` it
//! updates the stored order: either appending the cart's items (placing
//! more food on an open table) or completing checkout (payment, customer,
//! `COMPLETED` status).

use super::assembler::{OrderDraft, assemble_order, build_line_items, tax_update_info_for, validate_request};
use super::bill_number::BillNumberSource;
use super::error::OrderResult;
use super::hooks::{PostCheckoutHook, run_hooks};
use super::lifecycle::{WriteMode, fetch_order, items_patch, patch, to_value, write_patch};
use crate::core::SessionContext;
use crate::pricing::{calculate_charges, consolidate_cart};
use crate::store::{Collection, Document, DocumentStore, to_document};
use serde_json::Value;
use shared::models::CustomerRef;
use shared::order::{Cart, Order, OrderStatus, PaymentMode, PricingResult, StatusEntry};
use shared::util::now_millis;
use std::sync::Arc;

/// Checkout input collected by the POS screen
#[derive(Debug, Clone, Default)]
pub struct CheckoutRequest {
    pub cart: Cart,
    /// Already validated discount amount
    pub discount: f64,
    pub price_variant: Option<String>,
    pub table_id: Option<String>,
    pub instructions: String,
    pub pay_mode: PaymentMode,
    pub customer: Option<CustomerRef>,
    /// Existing open order to update
    pub order_id: Option<String>,
    /// Complete payment instead of appending items
    pub checkout: bool,
}

/// Result of a successful submit
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    /// Order as stored after the write
    pub order: Order,
    /// Pricing of the submitted cart, as shown at checkout
    pub pricing: PricingResult,
    pub created: bool,
}

pub struct CheckoutService {
    store: Arc<dyn DocumentStore>,
    bills: Arc<dyn BillNumberSource>,
    hooks: Vec<Arc<dyn PostCheckoutHook>>,
    write_mode: WriteMode,
}

impl CheckoutService {
    pub fn new(store: Arc<dyn DocumentStore>, bills: Arc<dyn BillNumberSource>) -> Self {
        Self {
            store,
            bills,
            hooks: Vec::new(),
            write_mode: WriteMode::default(),
        }
    }

    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    pub fn with_hook(mut self, hook: Arc<dyn PostCheckoutHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Place (or add to) an open order
    pub async fn place_order(
        &self,
        mut request: CheckoutRequest,
        session: &SessionContext,
    ) -> OrderResult<CheckoutReceipt> {
        request.checkout = false;
        self.submit(request, session).await
    }

    /// Take payment and complete an order
    pub async fn complete_checkout(
        &self,
        mut request: CheckoutRequest,
        session: &SessionContext,
    ) -> OrderResult<CheckoutReceipt> {
        request.checkout = true;
        self.submit(request, session).await
    }

    pub async fn submit(
        &self,
        request: CheckoutRequest,
        session: &SessionContext,
    ) -> OrderResult<CheckoutReceipt> {
        validate_request(
            &request.cart,
            request.pay_mode,
            request.customer.as_ref(),
            request.discount,
            &request.instructions,
        )?;

        let charges = consolidate_cart(&request.cart);
        let pricing = calculate_charges(
            request.cart.subtotal(),
            charges.as_slice(),
            request.discount,
        );
        let now = now_millis();

        let (order, created) = match &request.order_id {
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                let draft = OrderDraft {
                    id,
                    cart: &request.cart,
                    discount: request.discount,
                    price_variant: request.price_variant.clone(),
                    table_id: request.table_id.clone(),
                    instructions: request.instructions.clone(),
                    charges,
                    pay_mode: request.pay_mode,
                    customer: request.customer.clone(),
                };
                let order = assemble_order(draft, session, self.bills.as_ref(), now)?;
                self.store
                    .set(Collection::Orders, &order.id, to_document(&order)?)
                    .await?;
                (order, true)
            }
            Some(order_id) => {
                let existing = fetch_order(self.store.as_ref(), order_id).await?;
                let update = if request.checkout {
                    let tax_update_info = tax_update_info_for(&charges, now);
                    checkout_patch(&existing, &request, tax_update_info, now)?
                } else {
                    append_patch(&existing, &request, now)?
                };
                write_patch(
                    self.store.as_ref(),
                    self.write_mode,
                    order_id,
                    existing.version,
                    update,
                )
                .await?;
                let order = fetch_order(self.store.as_ref(), order_id).await?;
                (order, false)
            }
        };

        tracing::info!(
            order_id = %order.id,
            bill_no = order.bill_no,
            created,
            checkout = request.checkout,
            final_amount = pricing.final_amount,
            "Order submitted"
        );

        if request.checkout {
            run_hooks(&self.hooks, &order, session).await;
        }

        Ok(CheckoutReceipt {
            order,
            pricing,
            created,
        })
    }
}

fn customer_fields(update: &mut Document, customer: Option<&CustomerRef>) {
    if let Some(customer) = customer {
        update.insert("custId".into(), Value::from(customer.id.clone()));
        update.insert("custName".into(), Value::from(customer.name.clone()));
        update.insert(
            "custPhone".into(),
            customer.phone.clone().map_or(Value::Null, Value::from),
        );
    }
}

fn instructions_field(update: &mut Document, instructions: &str) {
    let trimmed = instructions.trim();
    if !trimmed.is_empty() {
        update.insert("instructions".into(), Value::from(trimmed));
    }
}

/// Payment completion: paid flag, pay mode, customer, tax info, a single
/// `COMPLETED` entry, and any new discount added to the stored one
fn checkout_patch(
    existing: &Order,
    request: &CheckoutRequest,
    tax_update_info: Option<shared::order::TaxUpdateInfo>,
    now: i64,
) -> OrderResult<Document> {
    let mut update = patch([
        ("paid", Value::from(request.pay_mode.settles_immediately())),
        ("payMode", to_value(&request.pay_mode)?),
    ]);
    customer_fields(&mut update, request.customer.as_ref());

    if let Some(info) = tax_update_info {
        update.insert("taxUpdateInfo".into(), to_value(&info)?);
    }

    if !existing.has_status(OrderStatus::Completed) {
        let completed = StatusEntry::new(OrderStatus::Completed, now);
        let mut status = existing.status.clone();
        status.push(completed.clone());
        update.insert("status".into(), to_value(&status)?);
        update.insert("currentStatus".into(), to_value(&completed)?);
    }

    if request.discount > 0.0 {
        update.insert(
            "discount".into(),
            Value::from(existing.discount + request.discount),
        );
    }

    instructions_field(&mut update, &request.instructions);
    Ok(update)
}

/// Item append: new lines go after the stored ones (no merge by product).
/// The charges snapshot and tax info are rebuilt from the combined items.
fn append_patch(existing: &Order, request: &CheckoutRequest, now: i64) -> OrderResult<Document> {
    let mut items = existing.items.clone();
    items.extend(build_line_items(&request.cart)?);

    let mut update = items_patch(&items, existing, now)?;
    update.insert(
        "discount".into(),
        Value::from(existing.discount + request.discount),
    );
    customer_fields(&mut update, request.customer.as_ref());
    instructions_field(&mut update, &request.instructions);
    Ok(update)
}
