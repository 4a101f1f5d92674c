use std::fmt;

use itertools::Itertools;

use crate::expr::Expr;
use crate::operator::PhysicalOperatorTrait;
use crate::properties::{Distribution, Partitioning, SortOrder};

/// Windowed aggregation over `partition_keys`.
///
/// Any user-specified ORDER BY inside the window frame is resolved by an
/// upstream rule before this pass runs; only the partition keys reach the
/// enforcer, and the ordering it demands is ascending/nulls-first over
/// exactly those keys.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Window {
    partition_keys: Vec<Expr>,
}

impl Window {
    pub fn new(partition_keys: Vec<Expr>) -> Self {
        Self { partition_keys }
    }

    /// Same window with its key list replaced, used after permutation
    /// alignment onto the child's layout.
    pub fn with_keys(&self, partition_keys: Vec<Expr>) -> Self {
        Self { partition_keys }
    }

    pub fn partition_keys(&self) -> &[Expr] {
        &self.partition_keys
    }
}

impl PhysicalOperatorTrait for Window {
    fn required_input_distribution(&self) -> Vec<Distribution> {
        if self.partition_keys.is_empty() {
            vec![Distribution::AnySingle]
        } else {
            vec![Distribution::ClusteredBy(self.partition_keys.clone())]
        }
    }

    fn required_input_ordering(&self) -> Vec<Vec<SortOrder>> {
        vec![self
            .partition_keys
            .iter()
            .cloned()
            .map(SortOrder::asc_nulls_first)
            .collect()]
    }

    fn output_partitioning(&self, inputs: &[Partitioning]) -> Partitioning {
        inputs[0].clone()
    }

    fn output_ordering(&self, inputs: &[Vec<SortOrder>]) -> Vec<SortOrder> {
        inputs[0].clone()
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Window {{ partition_keys: [{}] }}",
            self.partition_keys.iter().join(", ")
        )
    }
}
