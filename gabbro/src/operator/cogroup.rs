use std::fmt;

use itertools::Itertools;

use crate::expr::Expr;
use crate::operator::PhysicalOperatorTrait;
use crate::properties::{Distribution, Partitioning, SortOrder};

/// Co-group of two inputs by positionally-paired grouping keys.
///
/// Like a merge join, both inputs must be clustered and locally sorted by
/// corresponding keys, and the pairing tolerates any permutation applied to
/// both lists at once.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct CoGroup {
    left_keys: Vec<Expr>,
    right_keys: Vec<Expr>,
}

impl CoGroup {
    pub fn new(left_keys: Vec<Expr>, right_keys: Vec<Expr>) -> Self {
        Self {
            left_keys,
            right_keys,
        }
    }

    pub fn with_keys(&self, left_keys: Vec<Expr>, right_keys: Vec<Expr>) -> Self {
        Self {
            left_keys,
            right_keys,
        }
    }

    pub fn left_keys(&self) -> &[Expr] {
        &self.left_keys
    }

    pub fn right_keys(&self) -> &[Expr] {
        &self.right_keys
    }
}

impl PhysicalOperatorTrait for CoGroup {
    fn required_input_distribution(&self) -> Vec<Distribution> {
        vec![
            Distribution::ClusteredBy(self.left_keys.clone()),
            Distribution::ClusteredBy(self.right_keys.clone()),
        ]
    }

    fn required_input_ordering(&self) -> Vec<Vec<SortOrder>> {
        vec![
            self.left_keys
                .iter()
                .cloned()
                .map(SortOrder::asc_nulls_first)
                .collect(),
            self.right_keys
                .iter()
                .cloned()
                .map(SortOrder::asc_nulls_first)
                .collect(),
        ]
    }

    fn output_partitioning(&self, inputs: &[Partitioning]) -> Partitioning {
        Partitioning::Alternatives(vec![inputs[0].clone(), inputs[1].clone()])
    }

    fn output_ordering(&self, inputs: &[Vec<SortOrder>]) -> Vec<SortOrder> {
        inputs[0].clone()
    }
}

impl fmt::Display for CoGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CoGroup {{ left_keys: [{}], right_keys: [{}] }}",
            self.left_keys.iter().join(", "),
            self.right_keys.iter().join(", ")
        )
    }
}
