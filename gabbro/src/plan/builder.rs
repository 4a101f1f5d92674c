use std::sync::Arc;

use crate::expr::Expr;
use crate::operator::{
    CoGroup, Exchange, Filter, GlobalLimit, HashAggregate, JoinType, PhysicalOperator,
    Projection, Sort, SortMergeJoin, TableScan, Window,
};
use crate::plan::{Plan, PlanNode, PlanNodeIdGen, PlanNodeRef};
use crate::properties::{Partitioning, SortOrder};

/// Fluent builder for physical plans, mostly useful in tests.
pub struct PhysicalPlanBuilder {
    root: PlanNodeRef,
    id_gen: PlanNodeIdGen,
}

impl PhysicalPlanBuilder {
    pub fn scan<S: Into<String>>(table_name: S, partitioning: Partitioning) -> Self {
        Self::from_operator(TableScan::new(table_name, partitioning).into())
    }

    pub fn sorted_scan<S: Into<String>>(
        table_name: S,
        partitioning: Partitioning,
        ordering: Vec<SortOrder>,
    ) -> Self {
        Self::from_operator(
            TableScan::new(table_name, partitioning)
                .with_ordering(ordering)
                .into(),
        )
    }

    fn from_operator(operator: PhysicalOperator) -> Self {
        let mut id_gen = PlanNodeIdGen::new();
        let root = Arc::new(PlanNode::new(id_gen.next(), operator, vec![]));
        Self { root, id_gen }
    }

    fn wrap_root(mut self, operator: PhysicalOperator, extra_inputs: Vec<PlanNodeRef>) -> Self {
        let mut inputs = vec![self.root.clone()];
        inputs.extend(extra_inputs);
        self.root = Arc::new(PlanNode::new(self.id_gen.next(), operator, inputs));
        self
    }

    pub fn projection<I: IntoIterator<Item = Expr>>(self, exprs: I) -> Self {
        self.wrap_root(Projection::new(exprs).into(), vec![])
    }

    pub fn filter(self, predicate: Expr) -> Self {
        self.wrap_root(Filter::new(predicate).into(), vec![])
    }

    pub fn sort_merge_join(
        self,
        join_type: JoinType,
        left_keys: Vec<Expr>,
        right_keys: Vec<Expr>,
        right: PlanNodeRef,
    ) -> Self {
        self.wrap_root(
            SortMergeJoin::new(join_type, left_keys, right_keys).into(),
            vec![right],
        )
    }

    pub fn co_group(
        self,
        left_keys: Vec<Expr>,
        right_keys: Vec<Expr>,
        right: PlanNodeRef,
    ) -> Self {
        self.wrap_root(CoGroup::new(left_keys, right_keys).into(), vec![right])
    }

    pub fn hash_aggregate(self, group_keys: Vec<Expr>, agg_exprs: Vec<Expr>) -> Self {
        self.wrap_root(HashAggregate::new(group_keys, agg_exprs).into(), vec![])
    }

    pub fn window(self, partition_keys: Vec<Expr>) -> Self {
        self.wrap_root(Window::new(partition_keys).into(), vec![])
    }

    pub fn global_limit(self, fetch: usize) -> Self {
        self.wrap_root(GlobalLimit::new(fetch).into(), vec![])
    }

    /// Explicit repartition requested by the query, e.g. DISTRIBUTE BY.
    pub fn repartition(self, partitioning: Partitioning) -> Self {
        self.wrap_root(Exchange::new(partitioning).into(), vec![])
    }

    pub fn local_sort(self, ordering: Vec<SortOrder>) -> Self {
        self.wrap_root(Sort::local(ordering).into(), vec![])
    }

    pub fn global_sort(self, ordering: Vec<SortOrder>) -> Self {
        self.wrap_root(Sort::global(ordering).into(), vec![])
    }

    pub fn build(self) -> Plan {
        Plan::new(self.root)
    }
}
