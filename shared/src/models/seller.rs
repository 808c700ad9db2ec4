//! Seller profile (`Sellers` collection)

use serde::{Deserialize, Serialize};

/// Seller profile loaded at session start
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Granted permission ids, e.g. `orders_delete`
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Whether bills are printed / offered after checkout
    #[serde(default = "default_bill_enabled")]
    pub bill_enabled: bool,
    /// Last bill number handed out, seeds the in-memory sequence
    #[serde(default)]
    pub last_bill_no: u64,
}

fn default_bill_enabled() -> bool {
    true
}

impl SellerProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            permissions: Vec::new(),
            bill_enabled: true,
            last_bill_no: 0,
        }
    }

    /// Permission id for a module/action pair: `("Orders", "Delete")` -> `orders_delete`
    pub fn permission_id(module: &str, action: &str) -> String {
        format!("{}_{}", module.to_lowercase(), action.to_lowercase())
    }

    pub fn has_permission(&self, module: &str, action: &str) -> bool {
        let wanted = Self::permission_id(module, action);
        self.permissions
            .iter()
            .any(|p| p.eq_ignore_ascii_case(&wanted))
    }
}
