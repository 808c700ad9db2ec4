//! Order model
//!
//! - Charges: tax/fee rules attached to products and frozen onto orders
//! - Cart: in-progress selection keyed by product / variant
//! - Line items and orders: price-frozen snapshots persisted in `Orders`
//! - Pricing output: calculated charges and payable totals

pub mod cart;
pub mod charge;
pub mod item;
pub mod pricing;
pub mod snapshot;

// Re-exports
pub use cart::{Cart, CartEntry};
pub use charge::{ChargeRule, ChargeSource, ChargeType, ChargeValue, ConsolidatedCharges};
pub use item::{Addon, LineItem, TaxUpdateInfo};
pub use pricing::{CalculatedCharge, PricingResult, calculate_charges};
pub use snapshot::{Order, OrderStatus, PaymentMode, StatusEntry};
