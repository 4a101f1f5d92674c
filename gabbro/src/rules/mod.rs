//! Physical rewrite rules.
//!
//! A rule consumes a plan and produces a structurally equivalent plan, which
//! lets later passes treat rule output uniformly with rule input. The only
//! rule implemented here is [`EnsureRequirements`]; the [`reorder`] helpers it
//! relies on are exported separately because the permutation search is useful
//! on its own.
//!
//! [`reorder`]: self::reorder_paired_keys

mod reorder;
pub use reorder::*;
mod enforce;
pub use enforce::*;

use crate::error::OptResult;
use crate::plan::Plan;

/// A plan-to-plan physical rewrite.
pub trait PhysicalRule {
    fn name(&self) -> &str;

    fn rewrite(&self, plan: &Plan) -> OptResult<Plan>;
}
