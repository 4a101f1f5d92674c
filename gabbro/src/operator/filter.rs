use std::fmt;

use crate::expr::Expr;
use crate::operator::PhysicalOperatorTrait;
use crate::properties::{Distribution, Partitioning, SortOrder};

/// Filter. Pass-through for both partitioning and ordering.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Filter {
    predicate: Expr,
}

impl Filter {
    pub fn new(predicate: Expr) -> Self {
        Self { predicate }
    }

    pub fn predicate(&self) -> &Expr {
        &self.predicate
    }
}

impl PhysicalOperatorTrait for Filter {
    fn required_input_distribution(&self) -> Vec<Distribution> {
        vec![Distribution::Unspecified]
    }

    fn required_input_ordering(&self) -> Vec<Vec<SortOrder>> {
        vec![vec![]]
    }

    fn output_partitioning(&self, inputs: &[Partitioning]) -> Partitioning {
        inputs[0].clone()
    }

    fn output_ordering(&self, inputs: &[Vec<SortOrder>]) -> Vec<SortOrder> {
        inputs[0].clone()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Filter {{ predicate: {} }}", self.predicate)
    }
}
