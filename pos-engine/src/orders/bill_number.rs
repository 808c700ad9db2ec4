//! Human-readable bill number sequence

use crate::store::StoreResult;
use std::sync::atomic::{AtomicU64, Ordering};

/// Issues sequential bill numbers
pub trait BillNumberSource: Send + Sync {
    fn next_bill_no(&self) -> StoreResult<u64>;
}

/// Process-local counter seeded from the seller's last bill number
#[derive(Debug, Default)]
pub struct CounterBillNumbers {
    last: AtomicU64,
}

impl CounterBillNumbers {
    pub fn new(last_bill_no: u64) -> Self {
        Self {
            last: AtomicU64::new(last_bill_no),
        }
    }

    pub fn current(&self) -> u64 {
        self.last.load(Ordering::SeqCst)
    }
}

impl BillNumberSource for CounterBillNumbers {
    fn next_bill_no(&self) -> StoreResult<u64> {
        Ok(self.last.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_counter_continues_from_seed() {
        let bills = CounterBillNumbers::new(41);
        assert_eq!(bills.next_bill_no().unwrap(), 42);
        assert_eq!(bills.next_bill_no().unwrap(), 43);
        assert_eq!(bills.current(), 43);
    }

    #[test]
    fn test_counter_is_unique_across_threads() {
        let bills = Arc::new(CounterBillNumbers::new(0));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let bills = bills.clone();
                std::thread::spawn(move || {
                    (0..100)
                        .map(|_| bills.next_bill_no().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 400);
        assert_eq!(bills.current(), 400);
    }
}
