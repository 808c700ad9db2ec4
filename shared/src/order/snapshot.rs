//! Persisted order document and its derived views
//!
//! Totals are never stored. [`Order::total`] recomputes the payable amount
//! from the frozen items, discount and charge snapshot, so a reprint shows
//! the same figure as checkout did.

use super::charge::ChargeRule;
use super::item::{LineItem, TaxUpdateInfo};
use super::pricing::{PricingResult, calculate_charges};
use crate::models::CustomerRef;
use serde::{Deserialize, Deserializer, Serialize};

/// Order status label
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Placed,
    Kitchen,
    Completed,
    /// Set only by external tooling
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "PLACED",
            OrderStatus::Kitchen => "KITCHEN",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the append-only status log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusEntry {
    pub label: OrderStatus,
    /// Unix millis
    pub date: i64,
}

impl StatusEntry {
    pub fn new(label: OrderStatus, date: i64) -> Self {
        Self { label, date }
    }
}

/// Payment mode
///
/// Unknown stored values read back as `Cash`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    #[default]
    Cash,
    Digital,
    Credit,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "CASH",
            PaymentMode::Digital => "DIGITAL",
            PaymentMode::Credit => "CREDIT",
        }
    }

    /// Lenient parse; anything unrecognised is cash
    pub fn parse(value: &str) -> Self {
        match value {
            "DIGITAL" => PaymentMode::Digital,
            "CREDIT" => PaymentMode::Credit,
            _ => PaymentMode::Cash,
        }
    }

    /// Orders paid on credit stay unpaid until settled
    pub fn settles_immediately(&self) -> bool {
        !matches!(self, PaymentMode::Credit)
    }
}

impl<'de> Deserialize<'de> for PaymentMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(PaymentMode::parse).unwrap_or_default())
    }
}

impl std::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order document (collection `Orders`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub bill_no: u64,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub pay_mode: PaymentMode,
    #[serde(default)]
    pub status: Vec<StatusEntry>,
    pub current_status: StatusEntry,
    /// Consolidated charge rules frozen at order time
    #[serde(default)]
    pub charges: Vec<ChargeRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cust_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cust_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cust_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_update_info: Option<TaxUpdateInfo>,
    #[serde(default)]
    pub instructions: String,
    /// Creation time, Unix millis
    pub date: i64,
    /// Write counter for version-checked updates
    #[serde(default)]
    pub version: u64,
}

impl Order {
    /// Σ `(price + addons_total) * qnt`
    pub fn sub_total(&self) -> f64 {
        self.items.iter().map(LineItem::line_subtotal).sum()
    }

    /// Full pricing breakdown from the stored snapshot
    pub fn pricing(&self) -> PricingResult {
        calculate_charges(self.sub_total(), &self.charges, self.discount)
    }

    /// Payable amount
    pub fn total(&self) -> f64 {
        self.pricing().final_amount
    }

    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn served_items(&self) -> u32 {
        self.items
            .iter()
            .filter(|item| item.served)
            .map(|item| item.quantity)
            .sum()
    }

    /// `"Title x 2, Other x 1"`
    pub fn description(&self) -> String {
        self.items
            .iter()
            .map(|item| format!("{} x {}", item.title, item.quantity))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Price variant tag, else table id
    pub fn order_source(&self) -> Option<&str> {
        self.price_variant.as_deref().or(self.table_id.as_deref())
    }

    pub fn is_dine_in(&self) -> bool {
        self.table_id.is_some()
    }

    pub fn is_online_order(&self) -> bool {
        self.price_variant
            .as_deref()
            .is_some_and(|variant| variant.contains("ONLINE"))
    }

    /// Membership in the status log, not just the current status
    pub fn has_status(&self, label: OrderStatus) -> bool {
        self.status.iter().any(|entry| entry.label == label)
    }

    pub fn completed_at(&self) -> Option<i64> {
        self.status
            .iter()
            .find(|entry| entry.label == OrderStatus::Completed)
            .map(|entry| entry.date)
    }

    pub fn customer(&self) -> Option<CustomerRef> {
        let id = self.cust_id.clone()?;
        Some(CustomerRef {
            id,
            name: self.cust_name.clone().unwrap_or_default(),
            phone: self.cust_phone.clone(),
        })
    }

    pub fn find_item(&self, product_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }
}
