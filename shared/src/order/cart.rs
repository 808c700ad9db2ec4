//! In-progress cart

use super::charge::{ChargeRule, ChargeSource};
use super::item::{Addon, TaxUpdateInfo};
use crate::models::{Product, Variant};
use serde::{Deserialize, Serialize};

/// One cart line: a product snapshot plus the buyer's selections
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub product: Product,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
    #[serde(default)]
    pub addons: Vec<Addon>,
}

impl CartEntry {
    /// `variant.price`, else `product.price`
    pub fn unit_price(&self) -> f64 {
        self.variant
            .as_ref()
            .map_or(self.product.price, |variant| variant.price)
    }

    pub fn addons_total(&self) -> f64 {
        self.addons.iter().map(|addon| addon.price).sum()
    }

    pub fn line_subtotal(&self) -> f64 {
        (self.unit_price() + self.addons_total()) * self.quantity as f64
    }
}

impl ChargeSource for CartEntry {
    fn charges(&self) -> &[ChargeRule] {
        &self.product.charges
    }

    fn bulk_tax_hashtag(&self) -> Option<&str> {
        self.product
            .tax_update_info
            .as_ref()
            .and_then(TaxUpdateInfo::bulk_hashtag)
    }
}

/// Cart keyed by product id, or `"{product_id}_{variant_id}"` for variants
///
/// Iteration follows insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    entries: Vec<(String, CartEntry)>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_for(product_id: &str, variant: Option<&Variant>) -> String {
        match variant {
            Some(variant) => format!("{}_{}", product_id, variant.id),
            None => product_id.to_string(),
        }
    }

    /// Add `quantity` units, merging into an existing line with the same key.
    /// Returns the line key.
    pub fn add(
        &mut self,
        product: Product,
        quantity: u32,
        variant: Option<Variant>,
        addons: Vec<Addon>,
    ) -> String {
        let key = Self::key_for(&product.id, variant.as_ref());
        match self.position(&key) {
            Some(idx) => {
                let entry = &mut self.entries[idx].1;
                entry.quantity = entry.quantity.saturating_add(quantity);
            }
            None => self.entries.push((
                key.clone(),
                CartEntry {
                    product,
                    quantity,
                    variant,
                    addons,
                },
            )),
        }
        key
    }

    /// Decrement a line, dropping it once it would reach zero
    pub fn remove_one(&mut self, key: &str) {
        let Some(idx) = self.position(key) else {
            return;
        };
        if self.entries[idx].1.quantity <= 1 {
            self.entries.remove(idx);
        } else {
            self.entries[idx].1.quantity -= 1;
        }
    }

    /// Set a line's quantity; below 1 behaves like [`Cart::remove_one`]
    pub fn update_quantity(&mut self, key: &str, quantity: u32) {
        if quantity < 1 {
            self.remove_one(key);
            return;
        }
        if let Some(idx) = self.position(key) {
            self.entries[idx].1.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, key: &str) -> Option<&CartEntry> {
        self.position(key).map(|idx| &self.entries[idx].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CartEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn entries(&self) -> impl Iterator<Item = &CartEntry> {
        self.entries.iter().map(|(_, entry)| entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total units across all lines
    pub fn total_quantity(&self) -> u32 {
        self.entries().map(|entry| entry.quantity).sum()
    }

    pub fn subtotal(&self) -> f64 {
        self.entries().map(CartEntry::line_subtotal).sum()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}
