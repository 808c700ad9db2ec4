//! Product Model

use crate::order::{ChargeRule, TaxUpdateInfo};
use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    /// Image URLs, first one is the thumbnail
    #[serde(default)]
    pub imgs: Vec<String>,
    /// Category name
    #[serde(default)]
    pub cat: Option<String>,
    /// List price (MRP)
    #[serde(default)]
    pub mrp: Option<f64>,
    /// Selling price when no variant is chosen
    pub price: f64,
    #[serde(default)]
    pub veg: bool,
    /// Taxes and fees applied to this product
    #[serde(default)]
    pub charges: Vec<ChargeRule>,
    /// Set when the charges came from a bulk tax update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_update_info: Option<TaxUpdateInfo>,
    #[serde(default)]
    pub price_variants: Vec<Variant>,
    #[serde(default)]
    pub addons: Vec<ProductAddon>,
}

impl Product {
    /// First image, if any
    pub fn thumbnail(&self) -> Option<&str> {
        self.imgs.first().map(String::as_str)
    }

    /// List price, falling back to the selling price
    pub fn list_price(&self) -> f64 {
        match self.mrp {
            Some(mrp) if mrp != 0.0 => mrp,
            _ => self.price,
        }
    }

    pub fn variant(&self, variant_id: &str) -> Option<&Variant> {
        self.price_variants.iter().find(|v| v.id == variant_id)
    }
}

/// Price variant (size, portion, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    pub id: String,
    pub name: String,
    pub price: f64,
}

/// Add-on offered by a product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductAddon {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

fn default_in_stock() -> bool {
    true
}
