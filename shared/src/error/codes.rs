//! Error codes shared by the engine and its front ends
//!
//! Codes are grouped by range:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Pricing errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as `u16` on the wire so that front ends can switch on the
/// numeric value without sharing Rust types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order item not found
    OrderItemNotFound = 4006,
    /// Cart or order has no items
    OrderEmpty = 4007,
    /// Order was modified concurrently
    OrderConflict = 4008,
    /// Item quantity is invalid
    InvalidQuantity = 4009,

    // ==================== 5xxx: Payment ====================
    /// Credit payment requires a selected customer
    CreditRequiresCustomer = 5006,

    // ==================== 6xxx: Pricing ====================
    /// Discount amount is not a valid number
    InvalidDiscount = 6101,
    /// Discount exceeds the subtotal
    DiscountExceedsSubtotal = 6102,
    /// Monetary amount is invalid
    InvalidAmount = 6103,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Database / document store error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether the caller may retry the same operation unchanged
    #[inline]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, ErrorCode::OrderConflict | ErrorCode::DatabaseError)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderItemNotFound => "Order item not found",
            ErrorCode::OrderEmpty => "Your cart is empty",
            ErrorCode::OrderConflict => "Order was changed by another device, reload and retry",
            ErrorCode::InvalidQuantity => "Invalid quantity",

            // Payment
            ErrorCode::CreditRequiresCustomer => "Please select a customer for credit purchase",

            // Pricing
            ErrorCode::InvalidDiscount => "Please enter a valid discount amount",
            ErrorCode::DiscountExceedsSubtotal => "Discount cannot be greater than subtotal",
            ErrorCode::InvalidAmount => "Invalid amount",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::DatabaseError => "Failed to process order",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown `u16` into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4006 => Ok(ErrorCode::OrderItemNotFound),
            4007 => Ok(ErrorCode::OrderEmpty),
            4008 => Ok(ErrorCode::OrderConflict),
            4009 => Ok(ErrorCode::InvalidQuantity),

            // Payment
            5006 => Ok(ErrorCode::CreditRequiresCustomer),

            // Pricing
            6101 => Ok(ErrorCode::InvalidDiscount),
            6102 => Ok(ErrorCode::DiscountExceedsSubtotal),
            6103 => Ok(ErrorCode::InvalidAmount),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}
