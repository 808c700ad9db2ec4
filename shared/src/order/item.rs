//! Line item snapshots

use super::charge::{ChargeRule, ChargeSource};
use crate::models::Product;
use serde::{Deserialize, Serialize};

/// Add-on selected for a line item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Addon {
    pub id: String,
    pub name: String,
    pub price: f64,
}

/// Marks charges that came from a bulk tax-rate update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaxUpdateInfo {
    #[serde(default)]
    pub is_from_bulk_update: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl TaxUpdateInfo {
    pub fn bulk(hashtag: impl Into<String>, timestamp: i64) -> Self {
        Self {
            is_from_bulk_update: true,
            hashtag: Some(hashtag.into()),
            timestamp: Some(timestamp),
        }
    }

    /// Hashtag, only when it came from a bulk update and is non-empty
    pub fn bulk_hashtag(&self) -> Option<&str> {
        if !self.is_from_bulk_update {
            return None;
        }
        self.hashtag.as_deref().filter(|tag| !tag.is_empty())
    }
}

fn default_quantity() -> u32 {
    1
}

/// Price-frozen item inside an order
///
/// `price` is the unit price without add-ons; `addons_total` is the per-unit
/// sum of the selected add-ons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(rename = "pid")]
    pub product_id: String,
    pub title: String,
    #[serde(rename = "thumb", default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(rename = "cat", default)]
    pub category: String,
    #[serde(default)]
    pub mrp: f64,
    pub price: f64,
    #[serde(default)]
    pub veg: bool,
    #[serde(default)]
    pub served: bool,
    #[serde(rename = "qnt", default = "default_quantity")]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_name: Option<String>,
    #[serde(default)]
    pub addons: Vec<Addon>,
    #[serde(default)]
    pub addons_total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_update_info: Option<TaxUpdateInfo>,
    /// Product charges at order time
    #[serde(default)]
    pub charges: Vec<ChargeRule>,
}

impl LineItem {
    /// Default construction from a catalog product, no variant or add-ons
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            title: product.title.clone(),
            thumbnail: product.thumbnail().map(str::to_string),
            category: product.cat.clone().unwrap_or_default(),
            mrp: product.list_price(),
            price: product.price,
            veg: product.veg,
            served: false,
            quantity,
            variant_id: None,
            variant_name: None,
            addons: Vec::new(),
            addons_total: 0.0,
            tax_update_info: product.tax_update_info.clone(),
            charges: product.charges.clone(),
        }
    }

    /// `(price + addons_total) * quantity`
    pub fn line_subtotal(&self) -> f64 {
        (self.price + self.addons_total) * self.quantity as f64
    }
}

impl ChargeSource for LineItem {
    fn charges(&self) -> &[ChargeRule] {
        &self.charges
    }

    fn bulk_tax_hashtag(&self) -> Option<&str> {
        self.tax_update_info.as_ref().and_then(TaxUpdateInfo::bulk_hashtag)
    }
}
