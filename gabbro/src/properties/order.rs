use std::fmt;

use crate::expr::Expr;

/// Ordering of one sort key.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct SortOrder {
    expr: Expr,
    /// Ascending or descending.
    asc: bool,
    /// Should nulls be treated first.
    nulls_first: bool,
}

impl SortOrder {
    pub fn new(expr: Expr, asc: bool, nulls_first: bool) -> Self {
        Self {
            expr,
            asc,
            nulls_first,
        }
    }

    /// The engine-wide default for clustering-stabilizing sorts.
    pub fn asc_nulls_first(expr: Expr) -> Self {
        Self::new(expr, true, true)
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.expr,
            if self.asc { "ASC" } else { "DESC" },
            if self.nulls_first {
                "NULLS FIRST"
            } else {
                "NULLS LAST"
            }
        )
    }
}

/// Does `actual` guarantee `required`?
///
/// An output ordering satisfies a requirement when the requirement is a
/// per-key-equal prefix of it; rows sorted by `[a, b]` are also sorted by
/// `[a]`. An empty requirement is satisfied by anything.
pub fn ordering_satisfies(actual: &[SortOrder], required: &[SortOrder]) -> bool {
    required.len() <= actual.len() && actual[..required.len()] == *required
}
