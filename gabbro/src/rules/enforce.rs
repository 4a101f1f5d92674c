//! The requirement enforcement rule.
//!
//! Runs once per physical plan during query preparation, bottom-up and in a
//! single pass: children are rewritten first, then the current operator's
//! declared input requirements are checked against what the rewritten
//! children actually produce, and an exchange or sort is inserted only where
//! the check genuinely fails. Pass-through operators propagate their child's
//! layout, so an exchange inserted several levels down still satisfies a
//! requirement imposed far above it.

use std::sync::Arc;

use log::{debug, trace};

use crate::config::EnforcerConfig;
use crate::error::{OptError, OptResult};
use crate::expr::Expr;
use crate::operator::{Exchange, PhysicalOperator, PhysicalOperatorTrait, Sort};
use crate::plan::{Plan, PlanNode, PlanNodeIdGen, PlanNodeRef};
use crate::properties::{ordering_satisfies, Distribution, Partitioning, SortOrder};
use crate::rules::{reorder_keys_to_layout, reorder_paired_keys, PhysicalRule};

/// Inserts the minimum exchange and sort operators needed so that after the
/// rewrite, every operator's input satisfies its declared distribution and
/// ordering requirements.
pub struct EnsureRequirements {
    config: EnforcerConfig,
}

impl PhysicalRule for EnsureRequirements {
    fn name(&self) -> &str {
        "EnsureRequirements"
    }

    fn rewrite(&self, plan: &Plan) -> OptResult<Plan> {
        debug!(
            "running {} (default_shuffle_partitions={}, adaptive_execution={})",
            self.name(),
            self.config.default_shuffle_partitions,
            self.config.adaptive_execution
        );
        let max_id = plan.bfs_iterator().map(|node| node.id()).max().unwrap_or(0);
        let mut id_gen = PlanNodeIdGen::starting_at(max_id);
        let root = self.rewrite_node(&plan.root(), &mut id_gen)?;
        Ok(Plan::new(root))
    }
}

impl EnsureRequirements {
    pub fn new(config: EnforcerConfig) -> Self {
        Self { config }
    }

    fn rewrite_node(
        &self,
        node: &PlanNodeRef,
        id_gen: &mut PlanNodeIdGen,
    ) -> OptResult<PlanNodeRef> {
        let children = node
            .inputs()
            .iter()
            .map(|child| self.rewrite_node(child, id_gen))
            .collect::<OptResult<Vec<_>>>()?;

        match node.operator() {
            PhysicalOperator::Exchange(exchange) => {
                self.elide_or_keep_exchange(node, exchange, children, id_gen)
            }
            PhysicalOperator::SortMergeJoin(join) => self.enforce_paired(
                node,
                children,
                id_gen,
                join.left_keys(),
                join.right_keys(),
                &|left, right| join.with_keys(left, right).into(),
            ),
            PhysicalOperator::CoGroup(cogroup) => self.enforce_paired(
                node,
                children,
                id_gen,
                cogroup.left_keys(),
                cogroup.right_keys(),
                &|left, right| cogroup.with_keys(left, right).into(),
            ),
            PhysicalOperator::Window(window) => {
                // Aligning the window's key list with the child's clustering
                // order makes the induced sort the child's natural one; the
                // set-based clustering check is unaffected either way.
                let operator = match reorder_keys_to_layout(
                    window.partition_keys(),
                    &children[0].output_partitioning(),
                ) {
                    Some(keys) if keys.as_slice() != window.partition_keys() => {
                        trace!("aligning window keys with child clustering order");
                        window.with_keys(keys).into()
                    }
                    _ => node.operator().clone(),
                };
                self.enforce_generic(node, operator, children, id_gen)
            }
            _ => self.enforce_generic(node, node.operator().clone(), children, id_gen),
        }
    }

    /// Binary operators with positionally-paired key lists: run the
    /// permutation search, resolve the partition count, then redistribute and
    /// sort each side that still falls short.
    fn enforce_paired(
        &self,
        node: &PlanNodeRef,
        children: Vec<PlanNodeRef>,
        id_gen: &mut PlanNodeIdGen,
        left_keys: &[Expr],
        right_keys: &[Expr],
        rebuild_op: &dyn Fn(Vec<Expr>, Vec<Expr>) -> PhysicalOperator,
    ) -> OptResult<PlanNodeRef> {
        if left_keys.len() != right_keys.len() {
            return Err(OptError::KeyArityMismatch {
                left: left_keys.len(),
                right: right_keys.len(),
            });
        }

        let left_layout = children[0].output_partitioning();
        let right_layout = children[1].output_partitioning();
        let reordered =
            reorder_paired_keys(left_keys, right_keys, &left_layout, &right_layout);

        let left_ok =
            left_layout.satisfies(&Distribution::ClusteredBy(reordered.left_keys.clone()));
        let right_ok =
            right_layout.satisfies(&Distribution::ClusteredBy(reordered.right_keys.clone()));

        // Count resolution: reuse whatever count an already-usable side fixes,
        // left side first; the configured default applies only when both
        // sides must reshuffle anyway.
        let target_count = if let Some((_, count)) = reordered.matched {
            count
        } else if left_ok {
            left_layout.partition_count()
        } else if right_ok {
            right_layout.partition_count()
        } else {
            self.config.default_shuffle_partitions
        };

        let sides = [
            (&children[0], &reordered.left_keys, left_ok, &left_layout),
            (&children[1], &reordered.right_keys, right_ok, &right_layout),
        ];
        let mut new_children = Vec::with_capacity(2);
        for (child, keys, satisfied, layout) in sides {
            // A side is kept only when both the key set and the partition
            // count line up; sibling inputs must co-locate matching keys.
            let clustered = if satisfied && layout.partition_count() == target_count {
                child.clone()
            } else {
                self.wrap_exchange(
                    child.clone(),
                    Partitioning::Hash(keys.clone(), target_count),
                    id_gen,
                )
            };

            // Clustering is in place, so a per-partition sort over exactly
            // this side's final key list is enough.
            let required: Vec<SortOrder> = keys
                .iter()
                .cloned()
                .map(SortOrder::asc_nulls_first)
                .collect();
            let sorted = if ordering_satisfies(&clustered.output_ordering(), &required) {
                clustered
            } else {
                self.wrap_local_sort(clustered, required, id_gen)
            };
            new_children.push(sorted);
        }

        let operator = rebuild_op(reordered.left_keys, reordered.right_keys);
        Ok(self.rebuild(node, operator, new_children, id_gen))
    }

    /// Per-child check of declared distribution and ordering requirements.
    fn enforce_generic(
        &self,
        node: &PlanNodeRef,
        operator: PhysicalOperator,
        children: Vec<PlanNodeRef>,
        id_gen: &mut PlanNodeIdGen,
    ) -> OptResult<PlanNodeRef> {
        let required_dists = operator.required_input_distribution();
        let required_ords = operator.required_input_ordering();
        if required_dists.len() != children.len() || required_ords.len() != children.len() {
            return Err(OptError::Internal(format!(
                "operator {} declares requirements for {} inputs but has {}",
                operator,
                required_dists.len(),
                children.len()
            )));
        }

        let mut new_children = Vec::with_capacity(children.len());
        for (idx, child) in children.into_iter().enumerate() {
            let required_dist = &required_dists[idx];
            let child = if child.output_partitioning().satisfies(required_dist) {
                child
            } else {
                let target = required_dist
                    .enforced_partitioning(self.config.default_shuffle_partitions)
                    .ok_or_else(|| {
                        OptError::Internal(format!(
                            "no partitioning can enforce {:?}",
                            required_dist
                        ))
                    })?;
                self.wrap_exchange(child, target, id_gen)
            };

            let required_ord = &required_ords[idx];
            let child = if ordering_satisfies(&child.output_ordering(), required_ord) {
                child
            } else {
                self.wrap_local_sort(child, required_ord.clone(), id_gen)
            };
            new_children.push(child);
        }

        Ok(self.rebuild(node, operator, new_children, id_gen))
    }

    /// An exchange whose target the rewritten child already realizes moves no
    /// rows and is dropped. This also keeps two exchanges from ever stacking
    /// directly, since an exchange's output realizes any identical target.
    fn elide_or_keep_exchange(
        &self,
        node: &PlanNodeRef,
        exchange: &Exchange,
        children: Vec<PlanNodeRef>,
        id_gen: &mut PlanNodeIdGen,
    ) -> OptResult<PlanNodeRef> {
        let child = &children[0];
        let produced = child.output_partitioning();
        let redundant = match exchange.partitioning() {
            Partitioning::Hash(keys, count) => {
                produced.satisfies(&Distribution::ClusteredBy(keys.clone()))
                    && produced.partition_count() == *count
            }
            Partitioning::Single => produced.partition_count() == 1,
            other => produced == *other,
        };

        if redundant {
            debug!(
                "eliding redundant exchange {} over {}",
                exchange,
                child.operator()
            );
            return Ok(child.clone());
        }
        Ok(self.rebuild(node, node.operator().clone(), children, id_gen))
    }

    /// Reuse the original node when neither the operator nor any child
    /// changed; rerunning the rewrite on an already-satisfying plan then
    /// returns the identical tree.
    fn rebuild(
        &self,
        node: &PlanNodeRef,
        operator: PhysicalOperator,
        children: Vec<PlanNodeRef>,
        id_gen: &mut PlanNodeIdGen,
    ) -> PlanNodeRef {
        let unchanged = operator == *node.operator()
            && children.len() == node.inputs().len()
            && children
                .iter()
                .zip(node.inputs())
                .all(|(new, old)| Arc::ptr_eq(new, old));
        if unchanged {
            node.clone()
        } else {
            Arc::new(PlanNode::new(id_gen.next(), operator, children))
        }
    }

    fn wrap_exchange(
        &self,
        child: PlanNodeRef,
        target: Partitioning,
        id_gen: &mut PlanNodeIdGen,
    ) -> PlanNodeRef {
        debug!("inserting exchange {} over {}", target, child.operator());
        Arc::new(PlanNode::new(
            id_gen.next(),
            Exchange::new(target).into(),
            vec![child],
        ))
    }

    fn wrap_local_sort(
        &self,
        child: PlanNodeRef,
        ordering: Vec<SortOrder>,
        id_gen: &mut PlanNodeIdGen,
    ) -> PlanNodeRef {
        trace!("inserting local sort over {}", child.operator());
        Arc::new(PlanNode::new(
            id_gen.next(),
            Sort::local(ordering).into(),
            vec![child],
        ))
    }
}
