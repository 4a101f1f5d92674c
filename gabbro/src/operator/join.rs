use std::fmt;

use itertools::Itertools;
use strum_macros::Display;

use crate::expr::Expr;
use crate::operator::PhysicalOperatorTrait;
use crate::properties::{Distribution, Partitioning, SortOrder};

/// Join type of a [`SortMergeJoin`].
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Display)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

/// Sort-merge join.
///
/// The key lists are equal length and positionally paired: position `i` of
/// `left_keys` and position `i` of `right_keys` form one join condition.
/// Any permutation applied identically to both lists preserves correctness,
/// which the enforcement pass exploits to reuse existing child layouts.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct SortMergeJoin {
    join_type: JoinType,
    left_keys: Vec<Expr>,
    right_keys: Vec<Expr>,
}

impl SortMergeJoin {
    pub fn new(join_type: JoinType, left_keys: Vec<Expr>, right_keys: Vec<Expr>) -> Self {
        Self {
            join_type,
            left_keys,
            right_keys,
        }
    }

    /// Same join with both key lists replaced, used after permutation
    /// alignment.
    pub fn with_keys(&self, left_keys: Vec<Expr>, right_keys: Vec<Expr>) -> Self {
        Self {
            join_type: self.join_type,
            left_keys,
            right_keys,
        }
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn left_keys(&self) -> &[Expr] {
        &self.left_keys
    }

    pub fn right_keys(&self) -> &[Expr] {
        &self.right_keys
    }
}

impl PhysicalOperatorTrait for SortMergeJoin {
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
        match self.join_type {
            // Rows of an inner join are consistently clustered by either
            // side's keys.
            JoinType::Inner => {
                Partitioning::Alternatives(vec![inputs[0].clone(), inputs[1].clone()])
            }
            JoinType::Left => inputs[0].clone(),
            JoinType::Right => inputs[1].clone(),
            JoinType::Full => Partitioning::Unknown(inputs[0].partition_count()),
        }
    }

    fn output_ordering(&self, inputs: &[Vec<SortOrder>]) -> Vec<SortOrder> {
        match self.join_type {
            JoinType::Inner | JoinType::Left => inputs[0].clone(),
            // Null-extended rows break the streamed side's order.
            JoinType::Right | JoinType::Full => vec![],
        }
    }
}

impl fmt::Display for SortMergeJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SortMergeJoin {{ join_type: {}, left_keys: [{}], right_keys: [{}] }}",
            self.join_type,
            self.left_keys.iter().join(", "),
            self.right_keys.iter().join(", ")
        )
    }
}
