use std::fmt;

use crate::operator::PhysicalOperatorTrait;
use crate::properties::{Distribution, Partitioning, SortOrder};

/// Global limit: keeps the first `fetch` rows of the whole input, so the
/// input must arrive as a single partition.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct GlobalLimit {
    fetch: usize,
}

impl GlobalLimit {
    pub fn new(fetch: usize) -> Self {
        Self { fetch }
    }

    pub fn fetch(&self) -> usize {
        self.fetch
    }
}

impl PhysicalOperatorTrait for GlobalLimit {
    fn required_input_distribution(&self) -> Vec<Distribution> {
        vec![Distribution::AnySingle]
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

impl fmt::Display for GlobalLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GlobalLimit {{ fetch: {} }}", self.fetch)
    }
}
