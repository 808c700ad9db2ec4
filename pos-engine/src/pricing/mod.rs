//! Pricing engine
//!
//! ```text
//! cart ──► consolidate ──► ConsolidatedCharges ──┐
//!   │                                            ├──► calculate_charges ──► PricingResult
//!   └────► subtotal ──── validated discount ─────┘
//! ```
//!
//! All of this is synchronous and pure; nothing here touches the store.

pub mod consolidator;
pub mod discount;

pub use consolidator::{consolidate_cart, consolidate_charges, consolidate_items, consolidate_rules};
pub use discount::{DiscountMode, DiscountPolicy, validate_discount};
pub use shared::order::{CalculatedCharge, PricingResult, calculate_charges};

use shared::order::{Cart, ConsolidatedCharges};

/// Consolidated charges and pricing for a cart
#[derive(Debug, Clone, PartialEq)]
pub struct CartQuote {
    pub charges: ConsolidatedCharges,
    pub pricing: PricingResult,
}

/// Price a cart with an already validated discount
pub fn quote(cart: &Cart, discount: f64) -> CartQuote {
    let charges = consolidate_cart(cart);
    let pricing = calculate_charges(cart.subtotal(), charges.as_slice(), discount);
    CartQuote { charges, pricing }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Product;
    use shared::order::ChargeRule;

    fn product(id: &str, price: f64, charges: Vec<ChargeRule>) -> Product {
        let mut product: Product = serde_json::from_value(serde_json::json!({
            "id": id,
            "title": id,
            "price": price
        }))
        .unwrap();
        product.charges = charges;
        product
    }

    #[test]
    fn test_two_items_same_gst_charged_once() {
        let gst = ChargeRule::percentage("GST", 5.0, false);
        let mut cart = Cart::new();
        cart.add(product("a", 100.0, vec![gst.clone()]), 1, None, vec![]);
        cart.add(product("b", 100.0, vec![gst]), 1, None, vec![]);

        let quote = quote(&cart, 0.0);
        assert_eq!(quote.pricing.calculated_charges.len(), 1);
        assert!((quote.pricing.calculated_charges[0].calculated_amount - 10.0).abs() < 1e-9);
        assert!((quote.pricing.final_amount - 210.0).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_exclusive_on_hundred() {
        let mut cart = Cart::new();
        cart.add(
            product("a", 100.0, vec![ChargeRule::fixed("Packing", 15.0, false)]),
            1,
            None,
            vec![],
        );
        assert_eq!(quote(&cart, 0.0).pricing.final_amount, 115.0);
    }
}
