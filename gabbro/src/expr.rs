//! Minimal expression model for clustering and sort keys.
//!
//! Key matching throughout the crate is value equality on these types, so
//! `Eq`/`Hash` here define what "the same key" means to the enforcement pass.

use std::fmt;

use derive_more::Display;

/// A possibly qualified column reference.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Column {
    relation: Option<String>,
    name: String,
}

impl Column {
    pub fn new<R: Into<String>, N: Into<String>>(relation: R, name: N) -> Self {
        Self {
            relation: Some(relation.into()),
            name: name.into(),
        }
    }

    pub fn new_unqualified<N: Into<String>>(name: N) -> Self {
        Self {
            relation: None,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.relation {
            Some(relation) => write!(f, "{}.{}", relation, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Scalar expression usable as a clustering or sort key.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Display)]
pub enum Expr {
    #[display(fmt = "{}", _0)]
    Column(Column),
}

/// Create an unqualified column expression.
pub fn col(name: &str) -> Expr {
    Expr::Column(Column::new_unqualified(name))
}
