use std::fmt;

use enum_as_inner::EnumAsInner;
use itertools::Itertools;

use crate::expr::Expr;
use crate::properties::{ordering_satisfies, Distribution, SortOrder};

/// Physical distribution of rows across output partitions at one point in a
/// plan.
#[derive(Clone, Debug, Hash, Eq, PartialEq, EnumAsInner)]
pub enum Partitioning {
    /// Exactly one partition.
    Single,
    /// `n` partitions without a provable clustering key.
    Unknown(usize),
    /// Rows routed by a hash of `keys`, computed in exactly this order. The
    /// same key set in a different order is a distinct layout, though a
    /// set-stated requirement may still accept either.
    Hash(Vec<Expr>, usize),
    /// Rows split into contiguous ranges of the sort key.
    Range(Vec<SortOrder>, usize),
    RoundRobin(usize),
    /// Dedicated broadcast layout. Produced by a collaborator rule, never by
    /// the enforcement pass itself.
    Broadcast(usize),
    /// Rows simultaneously satisfy every member layout, e.g. after an
    /// equi-join on `a = b` rows are consistently clustered by either side's
    /// key. Members share one partition count.
    Alternatives(Vec<Partitioning>),
}

impl Partitioning {
    pub fn partition_count(&self) -> usize {
        match self {
            Partitioning::Single => 1,
            Partitioning::Unknown(n)
            | Partitioning::Hash(_, n)
            | Partitioning::Range(_, n)
            | Partitioning::RoundRobin(n)
            | Partitioning::Broadcast(n) => *n,
            Partitioning::Alternatives(members) => {
                members.first().map_or(1, |p| p.partition_count())
            }
        }
    }

    /// Hash layouts usable by the key-reordering engine: the layout itself
    /// when hash partitioned, every hash member when [`Partitioning::Alternatives`],
    /// nothing otherwise. Discovery order is member order.
    pub fn hash_candidates(&self) -> Vec<&Partitioning> {
        match self {
            Partitioning::Hash(..) => vec![self],
            Partitioning::Alternatives(members) => {
                members.iter().flat_map(|p| p.hash_candidates()).collect()
            }
            _ => vec![],
        }
    }

    /// Pure satisfaction check of a distribution requirement against this
    /// layout.
    pub fn satisfies(&self, required: &Distribution) -> bool {
        match (self, required) {
            (_, Distribution::Unspecified) => true,
            (_, Distribution::AnySingle) => self.partition_count() == 1,
            (Partitioning::Alternatives(members), _) => {
                members.iter().any(|p| p.satisfies(required))
            }
            (Partitioning::Hash(own, _), Distribution::ClusteredBy(keys)) => {
                same_key_set(own, keys)
            }
            (Partitioning::Range(own, _), Distribution::OrderedBy(ordering)) => {
                ordering_satisfies(own, ordering)
            }
            (Partitioning::Broadcast(_), Distribution::Broadcast) => true,
            _ => false,
        }
    }
}

/// Multiset equality over key expressions; clustering does not care about key
/// order.
fn same_key_set(a: &[Expr], b: &[Expr]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut unmatched: Vec<&Expr> = b.iter().collect();
    for key in a {
        match unmatched.iter().position(|u| *u == key) {
            Some(idx) => {
                unmatched.swap_remove(idx);
            }
            None => return false,
        }
    }
    true
}

impl fmt::Display for Partitioning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partitioning::Single => write!(f, "Single"),
            Partitioning::Unknown(n) => write!(f, "Unknown({})", n),
            Partitioning::Hash(keys, n) => {
                write!(f, "Hash([{}], {})", keys.iter().join(", "), n)
            }
            Partitioning::Range(ordering, n) => {
                write!(f, "Range([{}], {})", ordering.iter().join(", "), n)
            }
            Partitioning::RoundRobin(n) => write!(f, "RoundRobin({})", n),
            Partitioning::Broadcast(n) => write!(f, "Broadcast({})", n),
            Partitioning::Alternatives(members) => {
                write!(f, "Alternatives([{}])", members.iter().join(", "))
            }
        }
    }
}
