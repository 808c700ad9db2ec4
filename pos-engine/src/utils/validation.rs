//! Input validation helpers
//!
//! Length limits follow receipt layout (80mm printer, 48 chars per line)
//! and reasonable UX limits for free text.

use crate::orders::ValidationError;

// ── Text length limits ──────────────────────────────────────────────

/// Kitchen instructions / order notes
pub const MAX_NOTE_LEN: usize = 500;

/// Product titles, customer names
pub const MAX_NAME_LEN: usize = 200;

/// Maximum allowed unit price
pub const MAX_PRICE: f64 = 1_000_000.0;

/// Maximum quantity per line
pub const MAX_QUANTITY: u32 = 9999;

// ── Numeric helpers ─────────────────────────────────────────────────

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
pub fn require_finite(value: f64, field: &str) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidAmount(format!(
            "{} must be a finite number, got {}",
            field, value
        )));
    }
    Ok(())
}

/// Finite, non-negative and below [`MAX_PRICE`]
pub fn require_price(value: f64, field: &str) -> Result<(), ValidationError> {
    require_finite(value, field)?;
    if value < 0.0 {
        return Err(ValidationError::InvalidAmount(format!(
            "{} must be non-negative, got {}",
            field, value
        )));
    }
    if value > MAX_PRICE {
        return Err(ValidationError::InvalidAmount(format!(
            "{} exceeds maximum allowed ({}), got {}",
            field, MAX_PRICE, value
        )));
    }
    Ok(())
}

pub fn require_quantity(product_id: &str, quantity: u32) -> Result<(), ValidationError> {
    if quantity == 0 || quantity > MAX_QUANTITY {
        return Err(ValidationError::InvalidQuantity {
            product_id: product_id.to_string(),
            quantity,
        });
    }
    Ok(())
}

// ── Text helpers ────────────────────────────────────────────────────

/// Validate that text is within the length limit (in chars)
pub fn require_max_len(
    value: &str,
    field: &'static str,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::TextTooLong { field, len, max });
    }
    Ok(())
}
