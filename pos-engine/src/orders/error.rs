use crate::store::StoreError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Input rejected before any state change
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid discount: {0}")]
    InvalidDiscount(String),

    #[error("Discount {discount} exceeds subtotal {subtotal}")]
    DiscountExceedsSubtotal { discount: f64, subtotal: f64 },

    #[error("Credit payment requires a customer")]
    CreditRequiresCustomer,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid quantity for {product_id}: {quantity}")]
    InvalidQuantity { product_id: String, quantity: u32 },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("{field} is too long ({len} chars, max {max})")]
    TextTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

impl ValidationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::InvalidDiscount(_) => ErrorCode::InvalidDiscount,
            ValidationError::DiscountExceedsSubtotal { .. } => ErrorCode::DiscountExceedsSubtotal,
            ValidationError::CreditRequiresCustomer => ErrorCode::CreditRequiresCustomer,
            ValidationError::EmptyCart => ErrorCode::OrderEmpty,
            ValidationError::InvalidQuantity { .. } => ErrorCode::InvalidQuantity,
            ValidationError::InvalidAmount(_) => ErrorCode::InvalidAmount,
            ValidationError::TextTooLong { .. } => ErrorCode::ValueOutOfRange,
        }
    }
}

/// Order operation errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Persistence error: {0}")]
    Persistence(StoreError),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Order {id} was modified concurrently (expected version {expected}, found {actual})")]
    Conflict {
        id: String,
        expected: u64,
        actual: u64,
    },
}

impl From<StoreError> for OrderError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict {
                id,
                expected,
                actual,
            } => OrderError::Conflict {
                id,
                expected,
                actual,
            },
            other => OrderError::Persistence(other),
        }
    }
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Validation(e) => AppError::with_message(e.code(), e.to_string()),
            OrderError::Persistence(e) => {
                let code = match &e {
                    StoreError::NotFound { .. } => ErrorCode::NotFound,
                    StoreError::Serialization(_) | StoreError::InvalidDocument(_) => {
                        ErrorCode::InternalError
                    }
                    _ => ErrorCode::DatabaseError,
                };
                // store text stays in the log, callers get the code's message
                tracing::error!(error = %e, error_code = ?code, "Store error occurred");
                AppError::new(code)
            }
            OrderError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order not found: {}", id))
                    .with_detail("order_id", id)
            }
            OrderError::ItemNotFound(pid) => AppError::with_message(
                ErrorCode::OrderItemNotFound,
                format!("Item not found: {}", pid),
            )
            .with_detail("product_id", pid),
            OrderError::Conflict {
                id,
                expected,
                actual,
            } => AppError::conflict(format!("Order {} was modified by another device", id))
                .with_detail("expected_version", expected)
                .with_detail("actual_version", actual),
        }
    }
}
