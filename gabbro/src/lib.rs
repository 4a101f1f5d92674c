//! ## Background
//!
//! Physical operators of a distributed query engine are picky about how their
//! input is laid out: a merge join wants both inputs clustered and locally
//! sorted by the join keys, a windowed aggregation wants its input clustered by
//! the partition keys, a co-group wants both inputs clustered by the grouping
//! keys. Operators declare these demands per input; this crate implements the
//! preparation pass that reconciles the demands against what child operators
//! already produce and inserts exchange and sort operators only where a child's
//! existing layout cannot be made to fit.
//!
//! The expensive mistake this pass exists to avoid is the naive one: enforcing
//! every requirement with a fresh exchange puts a network shuffle under nearly
//! every operator. Most of the machinery here is therefore about recognizing
//! layouts that already fit, including layouts that fit only after permuting
//! the positionally-paired key lists of a binary operator, a reordering that
//! costs nothing and preserves operator semantics.
//!
//! ## Design
//!
//! * [`properties`] Partitioning layouts, distribution requirements, orderings.
//! * [`operator`] The closed physical operator set and its property contract.
//! * [`plan`] Immutable plan trees, plan builder and explain support.
//! * [`rules`] The enforcement rewrite and the key-reordering engine.
//!
//! ## Reference
//!
//! 1. Graefe, G., 1990. Encapsulation of parallelism in the Volcano query
//! processing system. ACM SIGMOD Record, 19(2), pp.102-111.
//! 2. Zhou, J., Larson, P.A. and Chaiken, R., 2010. Incorporating partitioning
//! and parallel plans into the SCOPE optimizer. In 2010 IEEE 26th International
//! Conference on Data Engineering (pp. 1060-1071).

pub mod config;
pub mod error;
pub mod expr;
pub mod operator;
pub mod plan;
pub mod properties;
pub mod rules;
