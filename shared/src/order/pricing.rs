//! Charge calculation
//!
//! Plain `f64` arithmetic, accumulated in charge order with no intermediate
//! rounding. Rounding happens only when amounts are displayed.

use super::charge::ChargeRule;
use serde::{Deserialize, Serialize};

/// One priced charge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedCharge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Name with a `(N%)` suffix for percentage charges
    pub display_name: String,
    pub calculated_amount: f64,
    pub is_inclusive: bool,
    #[serde(default)]
    pub bulk_tax_hashtag: Option<String>,
}

/// Pricing breakdown for a subtotal, discount and charge list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub subtotal: f64,
    pub discount: f64,
    pub subtotal_after_discount: f64,
    pub calculated_charges: Vec<CalculatedCharge>,
    pub final_amount: f64,
}

impl PricingResult {
    /// Sum of exclusive charge amounts
    pub fn exclusive_total(&self) -> f64 {
        self.calculated_charges
            .iter()
            .filter(|c| !c.is_inclusive)
            .map(|c| c.calculated_amount)
            .sum()
    }

    /// Sum of inclusive (informational) charge amounts
    pub fn inclusive_total(&self) -> f64 {
        self.calculated_charges
            .iter()
            .filter(|c| c.is_inclusive)
            .map(|c| c.calculated_amount)
            .sum()
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Price `charges` against `subtotal - discount`.
///
/// Percentage charges (type `percentage`, or any value containing `%`) are
/// taken from the discounted subtotal: inclusive ones are back-calculated as
/// `s * p / (100 + p)` and never added, exclusive ones are `s * p / 100` and
/// added. Fixed charges are added only when exclusive. Zero amounts are
/// dropped from the breakdown; rules without a name are ignored.
pub fn calculate_charges(subtotal: f64, charges: &[ChargeRule], discount: f64) -> PricingResult {
    let subtotal = finite_or_zero(subtotal);
    let discount = finite_or_zero(discount);
    let subtotal_after_discount = (subtotal - discount).max(0.0);

    let mut calculated_charges = Vec::with_capacity(charges.len());
    let mut final_amount = subtotal_after_discount;

    for charge in charges {
        if charge.name.is_empty() {
            continue;
        }

        let mut display_name = charge.name.clone();
        let amount = if charge.is_percentage() {
            let pct = charge.percent_value();
            let amount = if charge.inclusive {
                (subtotal_after_discount * pct) / (100.0 + pct)
            } else {
                let amount = (subtotal_after_discount * pct) / 100.0;
                final_amount += amount;
                amount
            };
            if !display_name.contains('%') {
                display_name = format!("{} ({}%)", display_name, pct);
            }
            amount
        } else {
            let amount = charge.value.numeric();
            if !charge.inclusive {
                final_amount += amount;
            }
            amount
        };

        tracing::debug!(
            charge = %charge.name,
            inclusive = charge.inclusive,
            amount,
            "Charge calculated"
        );

        if amount != 0.0 {
            calculated_charges.push(CalculatedCharge {
                id: charge.id.clone(),
                name: charge.name.clone(),
                display_name,
                calculated_amount: amount,
                is_inclusive: charge.inclusive,
                bulk_tax_hashtag: charge.bulk_tax_hashtag.clone(),
            });
        }
    }

    tracing::debug!(
        subtotal,
        discount,
        subtotal_after_discount,
        charges = calculated_charges.len(),
        final_amount,
        "Pricing calculated"
    );

    PricingResult {
        subtotal,
        discount,
        subtotal_after_discount,
        calculated_charges,
        final_amount,
    }
}
