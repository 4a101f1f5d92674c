use std::fmt;

use crate::operator::PhysicalOperatorTrait;
use crate::properties::{Distribution, Partitioning, SortOrder};

/// Redistributes its input to realize a target [`Partitioning`] exactly.
///
/// Always a pipeline breaker. Inserted by the enforcement pass, and also the
/// plan-level representation of an explicit user repartition, which is what
/// lets the pass elide a user repartition already realized by an exchange
/// further down.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Exchange {
    partitioning: Partitioning,
}

impl Exchange {
    pub fn new(partitioning: Partitioning) -> Self {
        Self { partitioning }
    }

    pub fn partitioning(&self) -> &Partitioning {
        &self.partitioning
    }
}

impl PhysicalOperatorTrait for Exchange {
    fn required_input_distribution(&self) -> Vec<Distribution> {
        vec![Distribution::Unspecified]
    }

    fn required_input_ordering(&self) -> Vec<Vec<SortOrder>> {
        vec![vec![]]
    }

    fn output_partitioning(&self, _inputs: &[Partitioning]) -> Partitioning {
        self.partitioning.clone()
    }

    fn output_ordering(&self, _inputs: &[Vec<SortOrder>]) -> Vec<SortOrder> {
        // Rows interleave arbitrarily on the receiving side.
        vec![]
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Exchange {{ partitioning: {} }}", self.partitioning)
    }
}
