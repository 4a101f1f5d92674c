//! Physical properties of plan nodes.
//!
//! Two families of types live here: descriptions of what a node actually
//! produces ([`Partitioning`], orderings as `Vec<SortOrder>`) and declarative
//! requirements an operator imposes on an input ([`Distribution`], required
//! orderings). The satisfaction checks connecting the two are pure functions
//! with no side effects.

mod distribution;
pub use distribution::*;
mod order;
pub use order::*;
mod partitioning;
pub use partitioning::*;
