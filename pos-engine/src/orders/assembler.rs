//! Order assembly
//!
//! One builder, no fallback path: inputs are validated up front, each line
//! item is built from its product and then overwritten from the cart entry.
//! The cart entry always wins, on every call, because the product's own
//! price knows nothing about the selected variant or add-ons.

use super::bill_number::BillNumberSource;
use super::error::{OrderError, OrderResult, ValidationError};
use crate::core::SessionContext;
use crate::utils::validation::{
    MAX_NOTE_LEN, require_finite, require_max_len, require_price, require_quantity,
};
use shared::models::CustomerRef;
use shared::order::{
    Cart, CartEntry, ConsolidatedCharges, LineItem, Order, OrderStatus, PaymentMode, StatusEntry,
    TaxUpdateInfo,
};

/// Category used when a product has none
pub const DEFAULT_CATEGORY: &str = "Other";

/// Everything needed to turn a cart into an order document
#[derive(Debug, Clone)]
pub struct OrderDraft<'a> {
    pub id: String,
    pub cart: &'a Cart,
    pub discount: f64,
    pub price_variant: Option<String>,
    pub table_id: Option<String>,
    pub instructions: String,
    pub charges: ConsolidatedCharges,
    pub pay_mode: PaymentMode,
    pub customer: Option<CustomerRef>,
}

/// Checks shared by assembly and checkout
pub fn validate_request(
    cart: &Cart,
    pay_mode: PaymentMode,
    customer: Option<&CustomerRef>,
    discount: f64,
    instructions: &str,
) -> Result<(), ValidationError> {
    if cart.is_empty() {
        return Err(ValidationError::EmptyCart);
    }
    if pay_mode == PaymentMode::Credit && customer.is_none() {
        return Err(ValidationError::CreditRequiresCustomer);
    }
    require_finite(discount, "discount")?;
    if discount < 0.0 {
        return Err(ValidationError::InvalidDiscount(format!(
            "discount must be non-negative, got {}",
            discount
        )));
    }
    require_max_len(instructions.trim(), "instructions", MAX_NOTE_LEN)?;
    Ok(())
}

fn validate_entry(entry: &CartEntry) -> Result<(), ValidationError> {
    require_quantity(&entry.product.id, entry.quantity)?;
    require_price(entry.unit_price(), "price")?;
    for addon in &entry.addons {
        require_price(addon.price, "addon price")?;
    }
    Ok(())
}

/// Overwrite every cart-derived field of `item` from `entry`
fn apply_cart_entry(item: &mut LineItem, entry: &CartEntry) {
    let product = &entry.product;
    item.product_id = product.id.clone();
    item.title = product.title.clone();
    item.thumbnail = product.thumbnail().map(str::to_string);
    item.category = product
        .cat
        .as_deref()
        .filter(|cat| !cat.is_empty())
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string();
    item.mrp = product.list_price();
    item.price = entry.unit_price();
    item.veg = product.veg;
    item.served = false;
    item.quantity = entry.quantity;
    item.variant_id = entry.variant.as_ref().map(|v| v.id.clone());
    item.variant_name = entry.variant.as_ref().map(|v| v.name.clone());
    item.addons = entry.addons.clone();
    item.addons_total = entry.addons_total();
    item.tax_update_info = product.tax_update_info.clone();
    item.charges = product.charges.clone();
}

/// Build a line item snapshot from a cart entry
pub fn build_line_item(entry: &CartEntry) -> Result<LineItem, ValidationError> {
    validate_entry(entry)?;
    let mut item = LineItem::from_product(&entry.product, entry.quantity);
    apply_cart_entry(&mut item, entry);
    Ok(item)
}

/// Build line items for the whole cart, in cart order
pub fn build_line_items(cart: &Cart) -> Result<Vec<LineItem>, ValidationError> {
    cart.entries().map(build_line_item).collect()
}

/// Merge `incoming` lines into an order's items by product id
///
/// A product already on the order gets the incoming quantity added to its
/// first line; other lines are appended as they are. Only the lines that
/// were on the order before the merge are matched against.
pub fn merge_items_by_product(items: &mut Vec<LineItem>, incoming: Vec<LineItem>) {
    let existing = items.len();
    for line in incoming {
        match items[..existing]
            .iter_mut()
            .find(|item| item.product_id == line.product_id)
        {
            Some(item) => item.quantity = item.quantity.saturating_add(line.quantity),
            None => items.push(line),
        }
    }
}

/// Tax update block for an order: taken from the first charge carrying a
/// bulk tax hashtag
pub fn tax_update_info_for(charges: &ConsolidatedCharges, now: i64) -> Option<TaxUpdateInfo> {
    charges
        .first_hashtag()
        .map(|hashtag| TaxUpdateInfo::bulk(hashtag, now))
}

/// Assemble a new order document
///
/// Status is seeded `PLACED` then `KITCHEN`; the order is paid unless the
/// payment mode is credit.
pub fn assemble_order(
    draft: OrderDraft<'_>,
    session: &SessionContext,
    bills: &dyn BillNumberSource,
    now: i64,
) -> OrderResult<Order> {
    validate_request(
        draft.cart,
        draft.pay_mode,
        draft.customer.as_ref(),
        draft.discount,
        &draft.instructions,
    )?;
    let items = build_line_items(draft.cart)?;
    let bill_no = bills.next_bill_no().map_err(OrderError::from)?;

    let kitchen = StatusEntry::new(OrderStatus::Kitchen, now);
    let tax_update_info = tax_update_info_for(&draft.charges, now);
    let (cust_id, cust_name, cust_phone) = match draft.customer {
        Some(customer) => (Some(customer.id), Some(customer.name), customer.phone),
        None => (None, None, None),
    };

    let order = Order {
        id: draft.id,
        bill_no,
        items,
        seller_id: session.seller_id().map(str::to_string),
        price_variant: draft.price_variant,
        table_id: draft.table_id,
        discount: draft.discount,
        paid: draft.pay_mode.settles_immediately(),
        pay_mode: draft.pay_mode,
        status: vec![StatusEntry::new(OrderStatus::Placed, now), kitchen.clone()],
        current_status: kitchen,
        charges: draft.charges.into_vec(),
        cust_id,
        cust_name,
        cust_phone,
        tax_update_info,
        instructions: draft.instructions.trim().to_string(),
        date: now,
        version: 0,
    };

    tracing::info!(
        order_id = %order.id,
        bill_no = order.bill_no,
        items = order.items.len(),
        pay_mode = %order.pay_mode,
        "Order assembled"
    );

    Ok(order)
}
