use std::fmt;

use itertools::Itertools;

use crate::operator::PhysicalOperatorTrait;
use crate::properties::{Distribution, Partitioning, SortOrder};

/// Realizes a target ordering.
///
/// A local sort orders rows within each existing partition and is the variant
/// the enforcement pass inserts, valid whenever clustering is already
/// guaranteed upstream. A global sort additionally demands the input be range
/// partitioned by the same ordering, which the pass enforces with an
/// exchange.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Sort {
    ordering: Vec<SortOrder>,
    global: bool,
}

impl Sort {
    pub fn local(ordering: Vec<SortOrder>) -> Self {
        Self {
            ordering,
            global: false,
        }
    }

    pub fn global(ordering: Vec<SortOrder>) -> Self {
        Self {
            ordering,
            global: true,
        }
    }

    pub fn ordering(&self) -> &[SortOrder] {
        &self.ordering
    }

    pub fn is_global(&self) -> bool {
        self.global
    }
}

impl PhysicalOperatorTrait for Sort {
    fn required_input_distribution(&self) -> Vec<Distribution> {
        if self.global {
            vec![Distribution::OrderedBy(self.ordering.clone())]
        } else {
            vec![Distribution::Unspecified]
        }
    }

    fn required_input_ordering(&self) -> Vec<Vec<SortOrder>> {
        vec![vec![]]
    }

    fn output_partitioning(&self, inputs: &[Partitioning]) -> Partitioning {
        inputs[0].clone()
    }

    fn output_ordering(&self, _inputs: &[Vec<SortOrder>]) -> Vec<SortOrder> {
        self.ordering.clone()
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sort {{ ordering: [{}], global: {} }}",
            self.ordering.iter().join(", "),
            self.global
        )
    }
}
