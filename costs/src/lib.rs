#![deny(missing_docs)]
//! Cost accounting for Merkle allowlist operations.
//!
//! Every operation that hashes reports how much hashing it did, so callers
//! can budget tree builds for large allowlists and spot regressions in the
//! number of digests a proof path needs.

mod context;

use std::ops::{Add, AddAssign};

pub use context::{CostContext, CostResult, CostsExt};

/// Hashing work done by one or more operations.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct OperationCost {
    /// Leaf digests computed (`H(0x00 || identity)`).
    pub hash_leaf_calls: u32,
    /// Internal node digests computed (`H(0x01 || min || max)`).
    pub hash_node_calls: u32,
    /// Total bytes fed into leaf digests.
    pub hashed_identity_bytes: u64,
}

impl OperationCost {
    /// Cost of a single leaf digest over `identity_len` bytes.
    pub fn with_leaf_hash(identity_len: usize) -> Self {
        OperationCost {
            hash_leaf_calls: 1,
            hashed_identity_bytes: identity_len as u64,
            ..Default::default()
        }
    }

    /// Cost of `hash_node_calls` internal digests.
    pub fn with_hash_node_calls(hash_node_calls: u32) -> Self {
        OperationCost {
            hash_node_calls,
            ..Default::default()
        }
    }

    /// Total number of digests, leaves and internal nodes together.
    pub fn total_hash_calls(&self) -> u32 {
        self.hash_leaf_calls + self.hash_node_calls
    }

    /// Whether no hashing happened at all.
    pub fn is_zero(&self) -> bool {
        *self == OperationCost::default()
    }
}

impl Add for OperationCost {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        OperationCost {
            hash_leaf_calls: self.hash_leaf_calls + rhs.hash_leaf_calls,
            hash_node_calls: self.hash_node_calls + rhs.hash_node_calls,
            hashed_identity_bytes: self.hashed_identity_bytes + rhs.hashed_identity_bytes,
        }
    }
}

impl AddAssign for OperationCost {
    fn add_assign(&mut self, rhs: Self) {
        self.hash_leaf_calls += rhs.hash_leaf_calls;
        self.hash_node_calls += rhs.hash_node_calls;
        self.hashed_identity_bytes += rhs.hashed_identity_bytes;
    }
}

/// Works like `?` inside a function returning a `CostResult`: an `Err`
/// returns early carrying the cost accumulated in `$cost` so far.
#[macro_export]
macro_rules! cost_return_on_error_no_add {
    ( &$cost:ident, $($body:tt)+ ) => {
        {
            use $crate::CostsExt;
            let result = { $($body)+ };
            match result {
                Ok(x) => x,
                Err(e) => return Err(e).wrap_with_cost($cost),
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn leaves(n: u32) -> OperationCost {
        OperationCost {
            hash_leaf_calls: n,
            hashed_identity_bytes: n as u64 * 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_add_sums_every_field() {
        let total = leaves(3) + OperationCost::with_hash_node_calls(2);
        assert_eq!(total.hash_leaf_calls, 3);
        assert_eq!(total.hash_node_calls, 2);
        assert_eq!(total.hashed_identity_bytes, 12);
        assert_eq!(total.total_hash_calls(), 5);
    }

    fn halve_even(n: u32, cost: OperationCost) -> CostResult<u32, &'static str> {
        let checked = cost_return_on_error_no_add!(
            &cost,
            if n % 2 == 0 { Ok(n) } else { Err("odd") }
        );
        Ok(checked / 2).wrap_with_cost(cost)
    }

    #[test]
    fn test_early_return_keeps_accumulated_cost() {
        let ok = halve_even(8, leaves(2));
        assert_eq!(ok.value, Ok(4));
        assert_eq!(ok.cost, leaves(2));

        let err = halve_even(3, leaves(1));
        assert_matches!(err.value, Err("odd"));
        assert_eq!(err.cost, leaves(1));
    }

    #[test]
    fn test_add_cost_charges_earlier_work() {
        let ctx = Ok::<_, ()>(()).wrap_with_cost(OperationCost::with_hash_node_calls(3));
        let ctx = ctx.add_cost(leaves(2));
        assert_eq!(ctx.cost.total_hash_calls(), 5);
        assert_eq!(ctx.unwrap(), Ok(()));
    }

    #[test]
    fn test_default_is_zero() {
        assert!(OperationCost::default().is_zero());
        assert!(!leaves(1).is_zero());
    }
}
