//! Discount validation
//!
//! Fixed amounts are clamped to the subtotal; percentages are not, so a
//! percentage above 100 is rejected and the discount resets to zero.

use crate::orders::ValidationError;
use serde::{Deserialize, Serialize};
use shared::util::parse_float;

/// How the raw discount input is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountMode {
    /// Money amount
    #[default]
    Fixed,
    /// Percent of the subtotal
    Percent,
}

/// Turn raw discount input into an amount
///
/// Non-numeric input reads as 0.
pub fn validate_discount(
    input: &str,
    mode: DiscountMode,
    subtotal: f64,
) -> Result<f64, ValidationError> {
    let parsed = parse_float(input).unwrap_or(0.0);
    let amount = match mode {
        DiscountMode::Percent => parsed / 100.0 * subtotal,
        DiscountMode::Fixed => parsed.min(subtotal),
    };

    if amount.is_nan() || amount < 0.0 {
        return Err(ValidationError::InvalidDiscount(format!(
            "'{}' is not a valid discount",
            input
        )));
    }
    if amount > subtotal {
        return Err(ValidationError::DiscountExceedsSubtotal {
            discount: amount,
            subtotal,
        });
    }
    Ok(amount)
}

/// Applies validated discounts to the discount held by a checkout screen
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscountPolicy {
    pub mode: DiscountMode,
}

impl DiscountPolicy {
    pub fn new(mode: DiscountMode) -> Self {
        Self { mode }
    }

    /// Validate `input` and store it in `current`
    ///
    /// A discount above the subtotal resets `current` to 0; an invalid one
    /// leaves it untouched. Both report the rejection.
    pub fn apply(
        &self,
        current: &mut f64,
        input: &str,
        subtotal: f64,
    ) -> Result<f64, ValidationError> {
        match validate_discount(input, self.mode, subtotal) {
            Ok(amount) => {
                *current = amount;
                tracing::debug!(amount, mode = ?self.mode, "Discount applied");
                Ok(amount)
            }
            Err(err @ ValidationError::DiscountExceedsSubtotal { .. }) => {
                *current = 0.0;
                tracing::warn!(error = %err, "Discount rejected, reset to zero");
                Err(err)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Discount rejected");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clamps_silently() {
        assert_eq!(validate_discount("50", DiscountMode::Fixed, 200.0), Ok(50.0));
        assert_eq!(validate_discount("500", DiscountMode::Fixed, 200.0), Ok(200.0));
    }

    #[test]
    fn test_percent_of_subtotal() {
        assert_eq!(validate_discount("10", DiscountMode::Percent, 250.0), Ok(25.0));
        assert_eq!(validate_discount("100", DiscountMode::Percent, 80.0), Ok(80.0));
    }

    #[test]
    fn test_percent_over_hundred_rejected() {
        let err = validate_discount("120", DiscountMode::Percent, 100.0).unwrap_err();
        assert!(matches!(err, ValidationError::DiscountExceedsSubtotal { .. }));
    }

    #[test]
    fn test_negative_rejected_and_garbage_is_zero() {
        let err = validate_discount("-5", DiscountMode::Fixed, 100.0).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDiscount(_)));
        assert_eq!(validate_discount("abc", DiscountMode::Percent, 100.0), Ok(0.0));
        assert_eq!(validate_discount("", DiscountMode::Fixed, 100.0), Ok(0.0));
    }

    #[test]
    fn test_policy_resets_on_exceed_and_keeps_on_invalid() {
        let policy = DiscountPolicy::new(DiscountMode::Percent);
        let mut discount = 0.0;

        assert_eq!(policy.apply(&mut discount, "20", 50.0), Ok(10.0));
        assert_eq!(discount, 10.0);

        assert!(policy.apply(&mut discount, "-1", 50.0).is_err());
        assert_eq!(discount, 10.0);

        assert!(policy.apply(&mut discount, "150", 50.0).is_err());
        assert_eq!(discount, 0.0);
    }

    #[test]
    fn test_discount_within_subtotal_reduces_exactly() {
        for (subtotal, discount) in [(100.0, 0.0), (100.0, 100.0), (37.5, 12.25)] {
            let amount = validate_discount(&discount.to_string(), DiscountMode::Fixed, subtotal)
                .unwrap();
            let result = shared::order::calculate_charges(subtotal, &[], amount);
            assert_eq!(result.subtotal_after_discount, subtotal - discount);
        }
    }
}
