//! Order assembly, checkout and lifecycle

pub mod assembler;
pub mod bill_number;
pub mod checkout;
pub mod error;
pub mod hooks;
pub mod lifecycle;

pub use assembler::{OrderDraft, assemble_order, validate_request};
pub use bill_number::{BillNumberSource, CounterBillNumbers};
pub use checkout::{CheckoutReceipt, CheckoutRequest, CheckoutService};
pub use error::{OrderError, OrderResult, ValidationError};
pub use hooks::{BillSummaryHook, PostCheckoutHook};
pub use lifecycle::{OrderLifecycle, RemoveOutcome, WriteMode};
