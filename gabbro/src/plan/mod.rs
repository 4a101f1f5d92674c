//! Immutable physical plan trees.
//!
//! A rewrite never mutates a node in place: it allocates new parent nodes
//! referencing either original children or newly wrapped ones, so unchanged
//! subtrees are shared between the input and output of a pass. `PartialEq`
//! on nodes ignores ids, which makes idempotence of a rewrite checkable by
//! structural comparison.

use std::collections::HashSet;
use std::mem::swap;
use std::sync::Arc;

mod builder;
pub use builder::*;
mod explain;
pub use explain::*;

use crate::operator::{PhysicalOperator, PhysicalOperatorTrait};
use crate::properties::{Partitioning, SortOrder};

pub type PlanNodeId = u32;

pub type PlanNodeRef = Arc<PlanNode>;

pub struct PlanNodeIdGen {
    next: PlanNodeId,
}

impl PlanNodeIdGen {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Continue numbering above the ids of an existing plan.
    pub fn starting_at(next: PlanNodeId) -> Self {
        Self { next }
    }

    pub fn next(&mut self) -> PlanNodeId {
        self.next += 1;
        self.next
    }
}

impl Default for PlanNodeIdGen {
    fn default() -> Self {
        Self::new()
    }
}

/// One node in a plan.
#[derive(Debug)]
pub struct PlanNode {
    id: PlanNodeId,
    operator: PhysicalOperator,
    inputs: Vec<PlanNodeRef>,
}

/// The `eq` ignores `id`.
impl PartialEq for PlanNode {
    fn eq(&self, other: &Self) -> bool {
        self.operator == other.operator && self.inputs == other.inputs
    }
}

impl Eq for PlanNode {}

impl PlanNode {
    pub fn new(id: PlanNodeId, operator: PhysicalOperator, inputs: Vec<PlanNodeRef>) -> Self {
        Self {
            id,
            operator,
            inputs,
        }
    }

    pub fn id(&self) -> PlanNodeId {
        self.id
    }

    pub fn operator(&self) -> &PhysicalOperator {
        &self.operator
    }

    pub fn inputs(&self) -> &[PlanNodeRef] {
        &self.inputs
    }

    /// Partitioning this node's output rows are guaranteed to have, derived
    /// bottom-up from the operator contract.
    pub fn output_partitioning(&self) -> Partitioning {
        let inputs: Vec<Partitioning> =
            self.inputs.iter().map(|c| c.output_partitioning()).collect();
        self.operator.output_partitioning(&inputs)
    }

    /// Ordering this node's output rows are guaranteed to have.
    pub fn output_ordering(&self) -> Vec<SortOrder> {
        let inputs: Vec<Vec<SortOrder>> =
            self.inputs.iter().map(|c| c.output_ordering()).collect();
        self.operator.output_ordering(&inputs)
    }
}

/// A query plan: a single-root tree of physical operators, possibly sharing
/// unchanged subtrees with the plan a rewrite produced it from.
#[derive(PartialEq, Eq, Debug)]
pub struct Plan {
    root: PlanNodeRef,
}

impl Plan {
    pub fn new(root: PlanNodeRef) -> Self {
        Self { root }
    }

    pub fn root(&self) -> PlanNodeRef {
        self.root.clone()
    }

    pub fn bfs_iterator(&self) -> impl Iterator<Item = PlanNodeRef> {
        let mut visited = HashSet::new();
        visited.insert(Arc::as_ptr(&self.root) as usize);

        BfsPlanNodeIter {
            cur_level: vec![self.root.clone()],
            next_level: vec![],
            visited,
        }
    }
}

/// Breadth first iterator over the plan. Visits each node once even when a
/// subtree is referenced from more than one parent, so deduplication is by
/// node identity rather than id.
struct BfsPlanNodeIter {
    visited: HashSet<usize>,
    cur_level: Vec<PlanNodeRef>,
    next_level: Vec<PlanNodeRef>,
}

impl Iterator for BfsPlanNodeIter {
    type Item = PlanNodeRef;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cur_level.is_empty() {
            swap(&mut self.cur_level, &mut self.next_level);
        }

        if let Some(node) = self.cur_level.pop() {
            for input in node.inputs() {
                let key = Arc::as_ptr(input) as usize;
                if self.visited.insert(key) {
                    self.next_level.push(input.clone());
                }
            }
            Some(node)
        } else {
            None
        }
    }
}
