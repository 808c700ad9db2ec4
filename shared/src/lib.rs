//! Shared types for the Shopto point-of-sale
//!
//! Data model and error vocabulary used by the pricing/order engine and
//! by any front end that renders carts, orders and receipts. This crate
//! performs no I/O.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use order::{
    Addon, CalculatedCharge, Cart, CartEntry, ChargeRule, ChargeSource, ChargeType, ChargeValue,
    ConsolidatedCharges, LineItem, Order, OrderStatus, PaymentMode, PricingResult, StatusEntry,
    TaxUpdateInfo,
};
