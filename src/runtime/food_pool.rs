// src/runtime/food_pool.rs
//! Shared food supply
//!
//! The counter lives behind a single mutex and can only be changed through
//! [`FoodPool::try_withdraw`], which checks and subtracts under one lock
//! acquisition. The lock is never held across an await point.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::info;

/// A withdrawal asked for more food than is left
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("wanted {requested} food unit(s) but only {available} left")]
pub struct Insufficient {
    pub requested: u64,
    pub available: u64,
}

/// Food supply shared by every gopher on the farm
#[derive(Debug)]
pub struct FoodPool {
    /// Food at startup
    initial_food: u64,

    /// Food left
    total_food: Mutex<u64>,

    /// Withdrawals that succeeded
    successful: AtomicU64,

    /// Withdrawals refused for lack of food
    failed: AtomicU64,
}

impl FoodPool {
    /// Create a pool holding `total_food` units
    pub fn new(total_food: u64) -> Self {
        Self {
            initial_food: total_food,
            total_food: Mutex::new(total_food),
            successful: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Take `amount` units on behalf of `gopher`
    ///
    /// Returns the food left after the withdrawal. When `amount` exceeds
    /// what is left, nothing is taken and [`Insufficient`] is returned.
    pub fn try_withdraw(&self, gopher: &str, amount: u64) -> Result<u64, Insufficient> {
        let mut total = self.total_food.lock();

        if amount > *total {
            self.failed.fetch_add(1, Ordering::Relaxed);
            info!(
                gopher,
                eat = amount,
                remaining = *total,
                "gopher {} wants to eat {} food unit(s) but there's not enough food!",
                gopher,
                amount
            );
            return Err(Insufficient {
                requested: amount,
                available: *total,
            });
        }

        *total -= amount;
        self.successful.fetch_add(1, Ordering::Relaxed);
        info!(
            gopher,
            eat = amount,
            remaining = *total,
            "gopher {} eats {} food unit(s). {} food unit(s) left.",
            gopher,
            amount,
            *total
        );

        Ok(*total)
    }

    /// Snapshot of the food left
    pub fn remaining(&self) -> u64 {
        *self.total_food.lock()
    }

    /// Food at startup
    pub fn initial(&self) -> u64 {
        self.initial_food
    }

    /// Get pool statistics
    pub fn stats(&self) -> PoolStats {
        let remaining_food = self.remaining();

        PoolStats {
            initial_food: self.initial_food,
            remaining_food,
            consumed: self.initial_food - remaining_food,
            successful_withdrawals: self.successful.load(Ordering::Relaxed),
            failed_withdrawals: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Pool statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub initial_food: u64,
    pub remaining_food: u64,
    pub consumed: u64,
    pub successful_withdrawals: u64,
    pub failed_withdrawals: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_withdraw_exact_amount() {
        let pool = FoodPool::new(5);
        assert_eq!(pool.try_withdraw("A", 5), Ok(0));
        assert_eq!(pool.remaining(), 0);
    }

    #[test]
    fn test_insufficient_leaves_pool_untouched() {
        let pool = FoodPool::new(5);

        let err = pool.try_withdraw("A", 10).unwrap_err();
        assert_eq!(
            err,
            Insufficient {
                requested: 10,
                available: 5
            }
        );
        assert_eq!(pool.remaining(), 5);
    }

    #[test]
    fn test_stats() {
        let pool = FoodPool::new(10);
        pool.try_withdraw("A", 3).unwrap();
        pool.try_withdraw("B", 4).unwrap();
        pool.try_withdraw("C", 4).unwrap_err();

        let stats = pool.stats();
        assert_eq!(stats.initial_food, 10);
        assert_eq!(stats.remaining_food, 3);
        assert_eq!(stats.consumed, 7);
        assert_eq!(stats.successful_withdrawals, 2);
        assert_eq!(stats.failed_withdrawals, 1);
    }

    #[test]
    fn test_empty_pool_refuses_everything() {
        let pool = FoodPool::new(0);
        assert!(pool.try_withdraw("A", 1).is_err());
        assert_eq!(pool.stats().consumed, 0);
    }

    #[test]
    fn test_concurrent_withdrawals() {
        use std::thread;

        let pool = Arc::new(FoodPool::new(1000));
        let mut handles = vec![];

        // 10 threads each trying to take 3 units 50 times
        for i in 0..10 {
            let p = Arc::clone(&pool);
            let handle = thread::spawn(move || {
                let name = format!("gopher-{}", i);
                let mut eaten = 0u64;
                for _ in 0..50 {
                    if p.try_withdraw(&name, 3).is_ok() {
                        eaten += 3;
                    }
                }
                eaten
            });
            handles.push(handle);
        }

        let eaten: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();

        let stats = pool.stats();
        assert_eq!(eaten, stats.consumed);
        assert_eq!(stats.remaining_food, 1000 - eaten);
        assert_eq!(stats.successful_withdrawals * 3, eaten);
        // 333 meals fit, 1 unit is left over
        assert_eq!(stats.remaining_food, 1);
    }

    proptest! {
        #[test]
        fn prop_remaining_matches_successful_withdrawals(
            initial in 0u64..500,
            amounts in proptest::collection::vec(1u64..50, 0..64),
        ) {
            let pool = FoodPool::new(initial);
            let mut taken = 0u64;

            for amount in amounts {
                let before = pool.remaining();
                match pool.try_withdraw("P", amount) {
                    Ok(left) => {
                        prop_assert!(amount <= before);
                        prop_assert_eq!(left, before - amount);
                        taken += amount;
                    }
                    Err(err) => {
                        prop_assert!(amount > before);
                        prop_assert_eq!(err.available, before);
                        prop_assert_eq!(pool.remaining(), before);
                    }
                }
            }

            prop_assert_eq!(pool.remaining(), initial - taken);
            prop_assert_eq!(pool.stats().consumed, taken);
        }
    }
}
