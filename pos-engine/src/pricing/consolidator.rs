//! Charge consolidation
//!
//! Merges the charge rules contributed by every cart line into one rule per
//! `(name, type)`:
//!
//! - fixed duplicates are summed (string values coerced, non-numeric as 0)
//! - percentage duplicates keep the first value; 5% twice stays 5%
//!
//! A bulk tax hashtag is attached only when every contributing line carries
//! the same one. A single untagged line (even one without charges) cancels it.

use shared::order::{
    Cart, ChargeRule, ChargeSource, ChargeType, ChargeValue, ConsolidatedCharges, LineItem,
};

/// Merge one rule into an already consolidated list
fn merge_rule(merged: &mut Vec<ChargeRule>, rule: &ChargeRule) {
    match merged.iter_mut().find(|existing| existing.same_charge(rule)) {
        Some(existing) if existing.charge_type == ChargeType::Fixed => {
            let sum = existing.value.numeric() + rule.value.numeric();
            existing.value = ChargeValue::Number(sum);
        }
        Some(_) => {}
        None => merged.push(rule.clone()),
    }
}

/// Consolidate charges across line sources, in iteration order
pub fn consolidate_charges<'a, S>(items: impl IntoIterator<Item = &'a S>) -> ConsolidatedCharges
where
    S: ChargeSource + 'a,
{
    let mut charges: Vec<ChargeRule> = Vec::new();
    let mut common_tag: Option<&str> = None;
    let mut all_share_tag = true;
    let mut seen_any = false;

    for item in items {
        match (item.bulk_tax_hashtag(), common_tag) {
            (None, _) => all_share_tag = false,
            (Some(tag), None) if !seen_any => common_tag = Some(tag),
            (Some(tag), Some(current)) if tag == current => {}
            _ => all_share_tag = false,
        }
        seen_any = true;

        for rule in item.charges() {
            merge_rule(&mut charges, rule);
        }
    }

    let bulk_tax_hashtag = match common_tag {
        Some(tag) if all_share_tag => Some(tag.to_string()),
        _ => None,
    };

    if let Some(tag) = &bulk_tax_hashtag {
        for rule in &mut charges {
            rule.bulk_tax_hashtag = Some(tag.clone());
        }
    }

    tracing::debug!(
        rules = charges.len(),
        hashtag = ?bulk_tax_hashtag,
        "Charges consolidated"
    );

    ConsolidatedCharges {
        charges,
        bulk_tax_hashtag,
    }
}

/// Consolidate a flat rule list (no hashtag detection)
///
/// Applying this to an already consolidated list returns it unchanged.
pub fn consolidate_rules(rules: &[ChargeRule]) -> Vec<ChargeRule> {
    let mut merged = Vec::with_capacity(rules.len());
    for rule in rules {
        merge_rule(&mut merged, rule);
    }
    merged
}

/// Consolidate the charges of every cart line, in insertion order
pub fn consolidate_cart(cart: &Cart) -> ConsolidatedCharges {
    consolidate_charges(cart.entries())
}

/// Consolidate the charge snapshots of order line items
pub fn consolidate_items(items: &[LineItem]) -> ConsolidatedCharges {
    consolidate_charges(items.iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Product;
    use shared::order::TaxUpdateInfo;

    fn product(id: &str, charges: Vec<ChargeRule>, tag: Option<&str>) -> Product {
        let mut product: Product = serde_json::from_value(serde_json::json!({
            "id": id,
            "title": id,
            "price": 100.0
        }))
        .unwrap();
        product.charges = charges;
        product.tax_update_info = tag.map(|t| TaxUpdateInfo::bulk(t, 1_700_000_000_000));
        product
    }

    fn cart(products: Vec<Product>) -> Cart {
        let mut cart = Cart::new();
        for p in products {
            cart.add(p, 1, None, vec![]);
        }
        cart
    }

    #[test]
    fn test_percentage_duplicates_not_summed() {
        let gst = ChargeRule::percentage("GST", 5.0, false);
        let cart = cart(vec![
            product("a", vec![gst.clone()], None),
            product("b", vec![gst], None),
        ]);
        let consolidated = consolidate_cart(&cart);
        assert_eq!(consolidated.len(), 1);
        assert_eq!(consolidated.charges[0].value.numeric(), 5.0);
    }

    #[test]
    fn test_fixed_duplicates_summed() {
        let cart = cart(vec![
            product("a", vec![ChargeRule::fixed("Packing", 10.0, false)], None),
            product(
                "b",
                vec![ChargeRule {
                    value: ChargeValue::from("7.5"),
                    ..ChargeRule::fixed("Packing", 0.0, false)
                }],
                None,
            ),
            product(
                "c",
                vec![ChargeRule {
                    value: ChargeValue::from("free"),
                    ..ChargeRule::fixed("Packing", 0.0, false)
                }],
                None,
            ),
        ]);
        let consolidated = consolidate_cart(&cart);
        assert_eq!(consolidated.len(), 1);
        assert_eq!(consolidated.charges[0].value, ChargeValue::Number(17.5));
    }

    #[test]
    fn test_identity_is_name_and_type() {
        let cart = cart(vec![
            product("a", vec![ChargeRule::percentage("GST", 5.0, false)], None),
            product("b", vec![ChargeRule::fixed("GST", 2.0, false)], None),
            product("c", vec![ChargeRule::percentage("gst", 5.0, false)], None),
        ]);
        let consolidated = consolidate_cart(&cart);
        let names: Vec<(&str, ChargeType)> = consolidated
            .iter()
            .map(|c| (c.name.as_str(), c.charge_type))
            .collect();
        assert_eq!(
            names,
            vec![
                ("GST", ChargeType::Percentage),
                ("GST", ChargeType::Fixed),
                ("gst", ChargeType::Percentage),
            ]
        );
    }

    #[test]
    fn test_shared_hashtag_stamped_on_every_rule() {
        let cart = cart(vec![
            product("a", vec![ChargeRule::percentage("GST", 5.0, false)], Some("#oct")),
            product("b", vec![ChargeRule::fixed("Packing", 5.0, false)], Some("#oct")),
        ]);
        let consolidated = consolidate_cart(&cart);
        assert_eq!(consolidated.bulk_tax_hashtag.as_deref(), Some("#oct"));
        assert!(
            consolidated
                .iter()
                .all(|c| c.bulk_tax_hashtag.as_deref() == Some("#oct"))
        );
    }

    #[test]
    fn test_untagged_item_without_charges_breaks_commonality() {
        let cart = cart(vec![
            product("a", vec![ChargeRule::percentage("GST", 5.0, false)], Some("#oct")),
            product("b", vec![], None),
        ]);
        let consolidated = consolidate_cart(&cart);
        assert_eq!(consolidated.bulk_tax_hashtag, None);
        assert_eq!(consolidated.charges[0].bulk_tax_hashtag, None);
    }

    #[test]
    fn test_different_hashtags_not_attached() {
        let cart = cart(vec![
            product("a", vec![ChargeRule::percentage("GST", 5.0, false)], Some("#oct")),
            product("b", vec![ChargeRule::percentage("GST", 5.0, false)], Some("#nov")),
        ]);
        assert_eq!(consolidate_cart(&cart).bulk_tax_hashtag, None);
    }

    #[test]
    fn test_empty_cart() {
        let consolidated = consolidate_cart(&Cart::new());
        assert!(consolidated.is_empty());
        assert_eq!(consolidated.bulk_tax_hashtag, None);
    }

    #[test]
    fn test_consolidation_is_idempotent() {
        let cart = cart(vec![
            product(
                "a",
                vec![
                    ChargeRule::percentage("GST", 5.0, false),
                    ChargeRule::fixed("Packing", 10.0, false),
                ],
                Some("#oct"),
            ),
            product(
                "b",
                vec![
                    ChargeRule::percentage("GST", 12.0, false),
                    ChargeRule::fixed("Packing", 4.0, false),
                    ChargeRule::percentage("Cess", 1.0, true),
                ],
                Some("#oct"),
            ),
        ]);
        let once = consolidate_cart(&cart).into_vec();
        let twice = consolidate_rules(&once);
        assert_eq!(once, twice);
        assert_eq!(once[1].value, ChargeValue::Number(14.0));
    }

    #[test]
    fn test_order_items_consolidate_like_cart() {
        let tagged = product(
            "a",
            vec![ChargeRule::fixed("Packing", 10.0, false)],
            Some("#oct"),
        );
        let plain = product("b", vec![ChargeRule::fixed("Packing", 5.0, false)], None);

        let items = vec![
            LineItem::from_product(&tagged, 2),
            LineItem::from_product(&plain, 1),
        ];
        let from_items = consolidate_items(&items);
        let from_cart = consolidate_cart(&cart(vec![tagged, plain]));
        assert_eq!(from_items, from_cart);
        assert_eq!(from_items.as_slice()[0].value, ChargeValue::Number(15.0));
        assert_eq!(from_items.bulk_tax_hashtag, None);
    }
}
