//! End-to-end tests of the requirement enforcement rewrite.

use gabbro::config::EnforcerConfig;
use gabbro::expr::{col, Expr};
use gabbro::operator::{JoinType, PhysicalOperatorTrait};
use gabbro::plan::{explain_to_string, PhysicalPlanBuilder, Plan, PlanNodeRef};
use gabbro::properties::{ordering_satisfies, Partitioning, SortOrder};
use gabbro::rules::{EnsureRequirements, PhysicalRule};

fn enforce(plan: &Plan) -> Plan {
    EnsureRequirements::new(EnforcerConfig::with_default_partitions(10))
        .rewrite(plan)
        .unwrap()
}

fn keys(names: &[&str]) -> Vec<Expr> {
    names.iter().map(|name| col(name)).collect()
}

fn hashed(names: &[&str], n: usize) -> Partitioning {
    Partitioning::Hash(keys(names), n)
}

fn asc(names: &[&str]) -> Vec<SortOrder> {
    names
        .iter()
        .map(|name| SortOrder::asc_nulls_first(col(name)))
        .collect()
}

fn exchange_count(plan: &Plan) -> usize {
    plan.bfs_iterator()
        .filter(|node| node.operator().as_exchange().is_some())
        .count()
}

fn sort_count(plan: &Plan) -> usize {
    plan.bfs_iterator()
        .filter(|node| node.operator().as_sort().is_some())
        .count()
}

/// Every operator's input must satisfy its declared requirements after the
/// rewrite.
fn assert_requirements_hold(node: &PlanNodeRef) {
    let required_dists = node.operator().required_input_distribution();
    let required_ords = node.operator().required_input_ordering();
    for (idx, child) in node.inputs().iter().enumerate() {
        assert!(
            child.output_partitioning().satisfies(&required_dists[idx]),
            "child {} of {} does not satisfy {:?}",
            idx,
            node.operator(),
            required_dists[idx]
        );
        assert!(
            ordering_satisfies(&child.output_ordering(), &required_ords[idx]),
            "child {} of {} does not satisfy ordering {:?}",
            idx,
            node.operator(),
            required_ords[idx]
        );
        assert_requirements_hold(child);
    }
}

#[test]
fn test_alternatives_permute_join_keys_and_spare_the_left_side() {
    // Scenario A: the left child offers two simultaneously-valid hash
    // layouts; permuting the paired key lists onto one of them makes the
    // left exchange unnecessary.
    let right = PhysicalPlanBuilder::scan("t2", Partitioning::Unknown(5))
        .build()
        .root();
    let plan = PhysicalPlanBuilder::scan(
        "t1",
        Partitioning::Alternatives(vec![hashed(&["a", "b"], 5), hashed(&["a"], 5)]),
    )
    .sort_merge_join(JoinType::Inner, keys(&["b", "a"]), keys(&["a", "b"]), right)
    .build();

    let rewritten = enforce(&plan);

    let expected = "\
SortMergeJoin { join_type: Inner, left_keys: [a, b], right_keys: [b, a] }
├─ Sort { ordering: [a ASC NULLS FIRST, b ASC NULLS FIRST], global: false }
│  └─ TableScan { table: \"t1\", partitioning: Alternatives([Hash([a, b], 5), Hash([a], 5)]) }
└─ Sort { ordering: [b ASC NULLS FIRST, a ASC NULLS FIRST], global: false }
   └─ Exchange { partitioning: Hash([b, a], 5) }
      └─ TableScan { table: \"t2\", partitioning: Unknown(5) }
";
    assert_eq!(expected, explain_to_string(&rewritten).unwrap());
    assert_eq!(1, exchange_count(&rewritten));
    assert_requirements_hold(&rewritten.root());
}

#[test]
fn test_right_side_drives_permutation_when_left_cannot_align() {
    // Scenario B: no permutation aligns the left keys with the left layout,
    // so the right side's layout drives the permutation, which is applied to
    // both lists; only the left side is redistributed, at the right side's
    // partition count.
    let right = PhysicalPlanBuilder::scan("t2", hashed(&["y", "x"], 8))
        .build()
        .root();
    let plan = PhysicalPlanBuilder::scan("t1", hashed(&["a", "b"], 5))
        .sort_merge_join(JoinType::Inner, keys(&["a", "c"]), keys(&["x", "y"]), right)
        .build();

    let rewritten = enforce(&plan);

    let expected = "\
SortMergeJoin { join_type: Inner, left_keys: [c, a], right_keys: [y, x] }
├─ Sort { ordering: [c ASC NULLS FIRST, a ASC NULLS FIRST], global: false }
│  └─ Exchange { partitioning: Hash([c, a], 8) }
│     └─ TableScan { table: \"t1\", partitioning: Hash([a, b], 5) }
└─ Sort { ordering: [y ASC NULLS FIRST, x ASC NULLS FIRST], global: false }
   └─ TableScan { table: \"t2\", partitioning: Hash([y, x], 8) }
";
    assert_eq!(expected, explain_to_string(&rewritten).unwrap());
    assert_requirements_hold(&rewritten.root());
}

#[test]
fn test_left_match_wins_when_both_sides_could_align() {
    let right = PhysicalPlanBuilder::scan("t2", hashed(&["c", "d"], 5))
        .build()
        .root();
    let plan = PhysicalPlanBuilder::scan("t1", hashed(&["b", "a"], 5))
        .sort_merge_join(JoinType::Inner, keys(&["a", "b"]), keys(&["c", "d"]), right)
        .build();

    let rewritten = enforce(&plan);
    let root = rewritten.root();
    let join = root.operator().as_sort_merge_join().unwrap();

    // The permutation derived from the left layout, not the right identity.
    assert_eq!(join.left_keys(), keys(&["b", "a"]).as_slice());
    assert_eq!(join.right_keys(), keys(&["d", "c"]).as_slice());
    assert_eq!(0, exchange_count(&rewritten));
    assert_requirements_hold(&rewritten.root());
}

#[test]
fn test_rewrite_is_idempotent() {
    let right = PhysicalPlanBuilder::scan("t2", Partitioning::Unknown(5))
        .build()
        .root();
    let plan = PhysicalPlanBuilder::scan(
        "t1",
        Partitioning::Alternatives(vec![hashed(&["a", "b"], 5), hashed(&["a"], 5)]),
    )
    .sort_merge_join(JoinType::Inner, keys(&["b", "a"]), keys(&["a", "b"]), right)
    .build();

    let once = enforce(&plan);
    let twice = enforce(&once);

    assert_eq!(once, twice);
    assert_eq!(exchange_count(&once), exchange_count(&twice));
    assert_eq!(sort_count(&once), sort_count(&twice));
}

#[test]
fn test_already_satisfying_plan_is_returned_unchanged() {
    let right = PhysicalPlanBuilder::sorted_scan("t2", hashed(&["b"], 4), asc(&["b"]))
        .build()
        .root();
    let plan = PhysicalPlanBuilder::sorted_scan("t1", hashed(&["a"], 4), asc(&["a"]))
        .sort_merge_join(JoinType::Inner, keys(&["a"]), keys(&["b"]), right)
        .build();

    let rewritten = enforce(&plan);

    assert_eq!(plan, rewritten);
    assert_eq!(0, exchange_count(&rewritten));
    assert_eq!(0, sort_count(&rewritten));
}

#[test]
fn test_explicit_repartition_after_join_on_same_key_adds_nothing() {
    // Scenario C: the join already exchanges both sides at the target count;
    // a following repartition by the same key reuses the join's exchange.
    let right = PhysicalPlanBuilder::scan("t2", Partitioning::Unknown(3))
        .build()
        .root();
    let plan = PhysicalPlanBuilder::scan("t1", Partitioning::Unknown(7))
        .sort_merge_join(JoinType::Inner, keys(&["c1"]), keys(&["c2"]), right)
        .repartition(hashed(&["c1"], 10))
        .build();

    let rewritten = enforce(&plan);

    assert_eq!(2, exchange_count(&rewritten));
    assert!(rewritten.root().operator().as_sort_merge_join().is_some());
    assert_requirements_hold(&rewritten.root());
}

#[test]
fn test_explicit_repartition_by_unrelated_key_is_kept() {
    let right = PhysicalPlanBuilder::scan("t2", Partitioning::Unknown(3))
        .build()
        .root();
    let plan = PhysicalPlanBuilder::scan("t1", Partitioning::Unknown(7))
        .sort_merge_join(JoinType::Inner, keys(&["c1"]), keys(&["c2"]), right)
        .repartition(hashed(&["c3"], 10))
        .build();

    let rewritten = enforce(&plan);

    assert_eq!(3, exchange_count(&rewritten));
    assert!(rewritten.root().operator().as_exchange().is_some());
    assert_requirements_hold(&rewritten.root());
}

#[test]
fn test_requirement_satisfied_through_pass_through_operators() {
    // An exchange inserted below the join satisfies the aggregate's
    // clustering requirement imposed two pass-through operators above it.
    let right = PhysicalPlanBuilder::scan("t2", Partitioning::Unknown(3))
        .build()
        .root();
    let plan = PhysicalPlanBuilder::scan("t1", Partitioning::Unknown(7))
        .sort_merge_join(JoinType::Inner, keys(&["c1"]), keys(&["c2"]), right)
        .projection(keys(&["c1", "v"]))
        .filter(col("v"))
        .hash_aggregate(keys(&["c1"]), keys(&["v"]))
        .build();

    let rewritten = enforce(&plan);

    assert_eq!(2, exchange_count(&rewritten));
    assert_requirements_hold(&rewritten.root());
}

#[test]
fn test_cogroup_aligns_with_windowed_sibling_and_sorts_by_own_keys() {
    // Scenario D: the windowed side fixes a clustering order; the co-group's
    // paired key lists permute onto it, each side's local sort is ascending
    // over exactly its own final key list, and the pairing is preserved.
    let right = PhysicalPlanBuilder::scan("t2", Partitioning::Unknown(4))
        .build()
        .root();
    let plan = PhysicalPlanBuilder::scan("t1", Partitioning::Unknown(4))
        .window(keys(&["key2", "key"]))
        .co_group(keys(&["key", "key2"]), keys(&["key", "key2"]), right)
        .build();

    let rewritten = enforce(&plan);

    let expected = "\
CoGroup { left_keys: [key2, key], right_keys: [key2, key] }
├─ Window { partition_keys: [key2, key] }
│  └─ Sort { ordering: [key2 ASC NULLS FIRST, key ASC NULLS FIRST], global: false }
│     └─ Exchange { partitioning: Hash([key2, key], 10) }
│        └─ TableScan { table: \"t1\", partitioning: Unknown(4) }
└─ Sort { ordering: [key2 ASC NULLS FIRST, key ASC NULLS FIRST], global: false }
   └─ Exchange { partitioning: Hash([key2, key], 10) }
      └─ TableScan { table: \"t2\", partitioning: Unknown(4) }
";
    assert_eq!(expected, explain_to_string(&rewritten).unwrap());

    // Each side's enforced ordering covers exactly its own final key list.
    let root = rewritten.root();
    let cogroup = root.operator().as_co_group().unwrap();
    assert_eq!(cogroup.left_keys(), cogroup.right_keys());
    for (side, child) in root.inputs().iter().enumerate() {
        let own_keys = if side == 0 {
            cogroup.left_keys()
        } else {
            cogroup.right_keys()
        };
        let expected_ord: Vec<SortOrder> = own_keys
            .iter()
            .cloned()
            .map(SortOrder::asc_nulls_first)
            .collect();
        assert!(ordering_satisfies(&child.output_ordering(), &expected_ord));
    }
    assert_requirements_hold(&rewritten.root());
}

#[test]
fn test_window_keys_align_with_bucketed_child() {
    let plan = PhysicalPlanBuilder::scan("t1", hashed(&["b", "a"], 6))
        .window(keys(&["a", "b"]))
        .build();

    let rewritten = enforce(&plan);

    let expected = "\
Window { partition_keys: [b, a] }
└─ Sort { ordering: [b ASC NULLS FIRST, a ASC NULLS FIRST], global: false }
   └─ TableScan { table: \"t1\", partitioning: Hash([b, a], 6) }
";
    assert_eq!(expected, explain_to_string(&rewritten).unwrap());
    assert_eq!(0, exchange_count(&rewritten));
    assert_requirements_hold(&rewritten.root());
}

#[test]
fn test_unequal_partition_counts_force_one_redistribution() {
    // Key sets line up on both sides but the counts do not; the matched left
    // side keeps its count and the right side is reshuffled to it.
    let right = PhysicalPlanBuilder::scan("t2", hashed(&["b"], 8))
        .build()
        .root();
    let plan = PhysicalPlanBuilder::scan("t1", hashed(&["a"], 5))
        .sort_merge_join(JoinType::Inner, keys(&["a"]), keys(&["b"]), right)
        .build();

    let rewritten = enforce(&plan);

    let exchanges: Vec<PlanNodeRef> = rewritten
        .bfs_iterator()
        .filter(|node| node.operator().as_exchange().is_some())
        .collect();
    assert_eq!(1, exchanges.len());
    assert_eq!(
        exchanges[0].operator().as_exchange().unwrap().partitioning(),
        &hashed(&["b"], 5)
    );
    assert_requirements_hold(&rewritten.root());
}

#[test]
fn test_default_count_applies_when_no_side_offers_one() {
    let right = PhysicalPlanBuilder::scan("t2", Partitioning::Unknown(3))
        .build()
        .root();
    let plan = PhysicalPlanBuilder::scan("t1", Partitioning::RoundRobin(7))
        .sort_merge_join(JoinType::Inner, keys(&["a"]), keys(&["b"]), right)
        .build();

    let rewritten = enforce(&plan);

    for node in rewritten.bfs_iterator() {
        if let Some(exchange) = node.operator().as_exchange() {
            assert_eq!(10, exchange.partitioning().partition_count());
        }
    }
    assert_eq!(2, exchange_count(&rewritten));
    assert_requirements_hold(&rewritten.root());
}

#[test]
fn test_global_limit_gathers_to_single_partition() {
    let plan = PhysicalPlanBuilder::scan("t3", Partitioning::Unknown(5))
        .global_limit(3)
        .build();

    let rewritten = enforce(&plan);

    let expected = "\
GlobalLimit { fetch: 3 }
└─ Exchange { partitioning: Single }
   └─ TableScan { table: \"t3\", partitioning: Unknown(5) }
";
    assert_eq!(expected, explain_to_string(&rewritten).unwrap());
    assert_requirements_hold(&rewritten.root());
}
