use std::fmt;

use itertools::Itertools;

use crate::operator::PhysicalOperatorTrait;
use crate::properties::{Distribution, Partitioning, SortOrder};

/// Leaf scan over a stored table.
///
/// Bucketed and pre-sorted sources declare their physical layout here, which
/// is what lets the enforcement pass skip an exchange on top of them. A plain
/// unbucketed scan reports [`Partitioning::Unknown`].
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct TableScan {
    table_name: String,
    partitioning: Partitioning,
    ordering: Vec<SortOrder>,
}

impl TableScan {
    pub fn new<S: Into<String>>(table_name: S, partitioning: Partitioning) -> Self {
        Self {
            table_name: table_name.into(),
            partitioning,
            ordering: vec![],
        }
    }

    pub fn with_ordering(mut self, ordering: Vec<SortOrder>) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

impl PhysicalOperatorTrait for TableScan {
    fn required_input_distribution(&self) -> Vec<Distribution> {
        vec![]
    }

    fn required_input_ordering(&self) -> Vec<Vec<SortOrder>> {
        vec![]
    }

    fn output_partitioning(&self, _inputs: &[Partitioning]) -> Partitioning {
        self.partitioning.clone()
    }

    fn output_ordering(&self, _inputs: &[Vec<SortOrder>]) -> Vec<SortOrder> {
        self.ordering.clone()
    }
}

impl fmt::Display for TableScan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TableScan {{ table: \"{}\", partitioning: {} }}",
            self.table_name, self.partitioning
        )?;
        if !self.ordering.is_empty() {
            write!(f, " ordered by [{}]", self.ordering.iter().join(", "))?;
        }
        Ok(())
    }
}
