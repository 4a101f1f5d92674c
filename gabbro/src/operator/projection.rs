use std::fmt;

use itertools::Itertools;

use crate::expr::Expr;
use crate::operator::PhysicalOperatorTrait;
use crate::properties::{Distribution, Partitioning, SortOrder};

/// Projection. Imposes nothing on its input and passes its layout through,
/// so an exchange inserted anywhere below still counts toward requirements
/// imposed far above.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Projection {
    exprs: Vec<Expr>,
}

impl Projection {
    pub fn new<I: IntoIterator<Item = Expr>>(exprs: I) -> Self {
        Self {
            exprs: exprs.into_iter().collect(),
        }
    }

    pub fn exprs(&self) -> &[Expr] {
        &self.exprs
    }
}

impl PhysicalOperatorTrait for Projection {
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

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Projection {{ exprs: [{}] }}", self.exprs.iter().join(", "))
    }
}
