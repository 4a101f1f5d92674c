use crate::expr::Expr;
use crate::properties::{Partitioning, SortOrder};

/// Declarative constraint an operator imposes on one input's partitioning.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum Distribution {
    /// The input must arrive as exactly one partition.
    AnySingle,
    /// No constraint.
    Unspecified,
    /// All rows sharing values of `keys` must land in the same partition.
    /// Key order is irrelevant when matching a layout against this.
    ClusteredBy(Vec<Expr>),
    /// The input must be globally range partitioned by this ordering.
    OrderedBy(Vec<SortOrder>),
    /// Every partition must receive a full copy of the input.
    Broadcast,
}

impl Distribution {
    /// The partitioning an exchange must realize to enforce this requirement
    /// with `count` partitions. `None` for [`Distribution::Unspecified`],
    /// which every layout already satisfies.
    pub(crate) fn enforced_partitioning(&self, count: usize) -> Option<Partitioning> {
        match self {
            Distribution::Unspecified => None,
            Distribution::AnySingle => Some(Partitioning::Single),
            Distribution::ClusteredBy(keys) => Some(Partitioning::Hash(keys.clone(), count)),
            Distribution::OrderedBy(ordering) => Some(Partitioning::Range(ordering.clone(), count)),
            Distribution::Broadcast => Some(Partitioning::Broadcast(count)),
        }
    }
}
