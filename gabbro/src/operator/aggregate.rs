use std::fmt;

use itertools::Itertools;

use crate::expr::Expr;
use crate::operator::PhysicalOperatorTrait;
use crate::properties::{Distribution, Partitioning, SortOrder};

/// Hash aggregation over `group_keys`.
///
/// A scalar aggregation (no group keys) must see the whole input in one
/// partition; a keyed aggregation only needs the input clustered by the key
/// set, in any key order.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct HashAggregate {
    group_keys: Vec<Expr>,
    agg_exprs: Vec<Expr>,
}

impl HashAggregate {
    pub fn new(group_keys: Vec<Expr>, agg_exprs: Vec<Expr>) -> Self {
        Self {
            group_keys,
            agg_exprs,
        }
    }

    pub fn group_keys(&self) -> &[Expr] {
        &self.group_keys
    }
}

impl PhysicalOperatorTrait for HashAggregate {
    fn required_input_distribution(&self) -> Vec<Distribution> {
        if self.group_keys.is_empty() {
            vec![Distribution::AnySingle]
        } else {
            vec![Distribution::ClusteredBy(self.group_keys.clone())]
        }
    }

    fn required_input_ordering(&self) -> Vec<Vec<SortOrder>> {
        vec![vec![]]
    }

    fn output_partitioning(&self, inputs: &[Partitioning]) -> Partitioning {
        inputs[0].clone()
    }

    fn output_ordering(&self, _inputs: &[Vec<SortOrder>]) -> Vec<SortOrder> {
        // The hash table destroys input order.
        vec![]
    }
}

impl fmt::Display for HashAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HashAggregate {{ group_keys: [{}], agg_exprs: [{}] }}",
            self.group_keys.iter().join(", "),
            self.agg_exprs.iter().join(", ")
        )
    }
}
