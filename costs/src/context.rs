use crate::OperationCost;

/// A value paired with the hashing work spent producing it.
#[must_use]
#[derive(Debug, Eq, PartialEq)]
pub struct CostContext<T> {
    /// The produced value.
    pub value: T,
    /// Work spent producing `value`.
    pub cost: OperationCost,
}

impl<T> CostContext<T> {
    /// Drop the cost and keep the value.
    pub fn unwrap(self) -> T {
        self.value
    }

    /// Charge work done before this context was produced.
    pub fn add_cost(mut self, earlier: OperationCost) -> Self {
        self.cost += earlier;
        self
    }
}

/// Fallible costed operation. The cost is reported on failure too.
pub type CostResult<T, E> = CostContext<Result<T, E>>;

/// Attaches a cost to a plain value.
pub trait CostsExt: Sized {
    /// Pair `self` with `cost`.
    fn wrap_with_cost(self, cost: OperationCost) -> CostContext<Self> {
        CostContext { value: self, cost }
    }
}

impl<T> CostsExt for T {}
