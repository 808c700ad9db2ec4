//! Post-checkout side effects (printing, sharing, ...)
//!
//! Hooks run after the order is persisted. A failing hook is logged and
//! never undoes the checkout.

use crate::core::SessionContext;
use async_trait::async_trait;
use shared::order::Order;

#[async_trait]
pub trait PostCheckoutHook: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    async fn after_checkout(&self, order: &Order, session: &SessionContext) -> anyhow::Result<()>;
}

/// Run every hook, logging failures
pub async fn run_hooks(
    hooks: &[std::sync::Arc<dyn PostCheckoutHook>],
    order: &Order,
    session: &SessionContext,
) -> usize {
    let mut failed = 0;
    for hook in hooks {
        if let Err(e) = hook.after_checkout(order, session).await {
            failed += 1;
            tracing::warn!(
                hook = hook.name(),
                order_id = %order.id,
                error = %e,
                "Post-checkout hook failed"
            );
        }
    }
    failed
}

/// Logs a one-line bill summary when billing is enabled for the seller
#[derive(Debug, Default)]
pub struct BillSummaryHook;

#[async_trait]
impl PostCheckoutHook for BillSummaryHook {
    fn name(&self) -> &str {
        "bill_summary"
    }

    async fn after_checkout(&self, order: &Order, session: &SessionContext) -> anyhow::Result<()> {
        if !session.bill_enabled() {
            return Ok(());
        }
        tracing::info!(
            bill_no = order.bill_no,
            total = %session.format_amount(order.total()),
            pay_mode = %order.pay_mode,
            items = %order.description(),
            "Bill ready"
        );
        Ok(())
    }
}
