//! Physical relational operators.
//!
//! The operator set is a closed enum: the enforcement pass never pattern
//! matches on open-ended operator shapes, it dispatches through
//! [`PhysicalOperatorTrait`]. Adding an operator kind means adding one
//! variant and one trait impl, never touching the rewriter's traversal.

mod table_scan;
pub use table_scan::*;
mod projection;
pub use projection::*;
mod filter;
pub use filter::*;
mod join;
pub use join::*;
mod cogroup;
pub use cogroup::*;
mod aggregate;
pub use aggregate::*;
mod window;
pub use window::*;
mod limit;
pub use limit::*;
mod exchange;
pub use exchange::*;
mod sort;
pub use sort::*;

use std::fmt;

use enum_as_inner::EnumAsInner;
use enum_dispatch::enum_dispatch;

use crate::properties::{Distribution, Partitioning, SortOrder};

/// Physical relational operator.
#[derive(Clone, Debug, Hash, Eq, PartialEq, EnumAsInner)]
#[enum_dispatch]
pub enum PhysicalOperator {
    TableScan(TableScan),
    Projection(Projection),
    Filter(Filter),
    SortMergeJoin(SortMergeJoin),
    CoGroup(CoGroup),
    HashAggregate(HashAggregate),
    Window(Window),
    GlobalLimit(GlobalLimit),
    Exchange(Exchange),
    Sort(Sort),
}

/// Contract each operator exposes to the enforcement pass.
///
/// All four functions are pure. Output properties are derived from the
/// operator and the already-derived properties of its inputs, which the
/// rewriter queries on already-rewritten children.
#[enum_dispatch(PhysicalOperator)]
pub trait PhysicalOperatorTrait {
    /// Required distribution of each input, in child order.
    fn required_input_distribution(&self) -> Vec<Distribution>;

    /// Required ordering of each input, in child order.
    fn required_input_ordering(&self) -> Vec<Vec<SortOrder>>;

    /// Output partitioning, given the inputs' partitionings.
    fn output_partitioning(&self, inputs: &[Partitioning]) -> Partitioning;

    /// Output ordering, given the inputs' orderings.
    fn output_ordering(&self, inputs: &[Vec<SortOrder>]) -> Vec<SortOrder>;
}

impl fmt::Display for PhysicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicalOperator::TableScan(op) => fmt::Display::fmt(op, f),
            PhysicalOperator::Projection(op) => fmt::Display::fmt(op, f),
            PhysicalOperator::Filter(op) => fmt::Display::fmt(op, f),
            PhysicalOperator::SortMergeJoin(op) => fmt::Display::fmt(op, f),
            PhysicalOperator::CoGroup(op) => fmt::Display::fmt(op, f),
            PhysicalOperator::HashAggregate(op) => fmt::Display::fmt(op, f),
            PhysicalOperator::Window(op) => fmt::Display::fmt(op, f),
            PhysicalOperator::GlobalLimit(op) => fmt::Display::fmt(op, f),
            PhysicalOperator::Exchange(op) => fmt::Display::fmt(op, f),
            PhysicalOperator::Sort(op) => fmt::Display::fmt(op, f),
        }
    }
}
