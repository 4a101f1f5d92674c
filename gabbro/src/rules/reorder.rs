//! The key-reordering engine.
//!
//! Binary operators with positionally-paired key lists only require that
//! position `i` of the left list and position `i` of the right list name the
//! same join or group condition, so any permutation applied identically to
//! both lists preserves correctness. The search here exploits that freedom:
//! if some permutation of a side's own key list equals the exact key order of
//! a hash layout its child already produces, that side needs no exchange at
//! all.

use crate::expr::Expr;
use crate::properties::Partitioning;

/// Which side's layout drove the accepted permutation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MatchedSide {
    Left,
    Right,
}

/// Outcome of the paired-key reordering search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReorderedKeys {
    pub left_keys: Vec<Expr>,
    pub right_keys: Vec<Expr>,
    /// Side and partition count of the layout the permutation was derived
    /// from, when any.
    pub matched: Option<(MatchedSide, usize)>,
}

/// Permutation `perm` with `keys[perm[i]] == target[i]`, matching by value
/// equality. Duplicate keys are resolved first-unused-first; any valid
/// alignment is as good as another.
pub fn permutation_aligning(keys: &[Expr], target: &[Expr]) -> Option<Vec<usize>> {
    if keys.len() != target.len() {
        return None;
    }
    let mut used = vec![false; keys.len()];
    let mut perm = Vec::with_capacity(keys.len());
    for wanted in target {
        let (idx, _) = keys
            .iter()
            .enumerate()
            .find(|(idx, key)| !used[*idx] && *key == wanted)?;
        used[idx] = true;
        perm.push(idx);
    }
    Some(perm)
}

pub fn apply_permutation<T: Clone>(items: &[T], perm: &[usize]) -> Vec<T> {
    perm.iter().map(|&idx| items[idx].clone()).collect()
}

/// Search both sides' layouts for a hash layout that some permutation of the
/// paired key lists aligns with.
///
/// The left side is scanned before the right, candidates in discovery order;
/// the first hit wins and the search stops. The winning permutation is
/// applied to both lists so they stay positionally paired. No attempt is
/// made to find a permutation simultaneously optimal for both sides. When
/// nothing aligns, the lists are returned untouched, which is the expected
/// fallback leading to an exchange, not an error.
pub fn reorder_paired_keys(
    left_keys: &[Expr],
    right_keys: &[Expr],
    left_layout: &Partitioning,
    right_layout: &Partitioning,
) -> ReorderedKeys {
    let sides = [
        (MatchedSide::Left, left_keys, left_layout),
        (MatchedSide::Right, right_keys, right_layout),
    ];
    for (side, keys, layout) in sides {
        for candidate in layout.hash_candidates() {
            if let Partitioning::Hash(target, count) = candidate {
                if let Some(perm) = permutation_aligning(keys, target) {
                    return ReorderedKeys {
                        left_keys: apply_permutation(left_keys, &perm),
                        right_keys: apply_permutation(right_keys, &perm),
                        matched: Some((side, *count)),
                    };
                }
            }
        }
    }

    ReorderedKeys {
        left_keys: left_keys.to_vec(),
        right_keys: right_keys.to_vec(),
        matched: None,
    }
}

/// Permute a unary operator's own key list onto a hash layout of its child,
/// so that the sort the operator induces follows the child's natural
/// clustering order. `None` when no candidate aligns.
pub fn reorder_keys_to_layout(keys: &[Expr], layout: &Partitioning) -> Option<Vec<Expr>> {
    layout.hash_candidates().into_iter().find_map(|candidate| {
        if let Partitioning::Hash(target, _) = candidate {
            permutation_aligning(keys, target).map(|perm| apply_permutation(keys, &perm))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::col;

    fn keys(names: &[&str]) -> Vec<Expr> {
        names.iter().map(|name| col(name)).collect()
    }

    fn hashed(names: &[&str], n: usize) -> Partitioning {
        Partitioning::Hash(keys(names), n)
    }

    #[test]
    fn test_permutation_aligning() {
        assert_eq!(
            permutation_aligning(&keys(&["b", "a"]), &keys(&["a", "b"])),
            Some(vec![1, 0])
        );
        assert_eq!(
            permutation_aligning(&keys(&["a", "b"]), &keys(&["a", "b"])),
            Some(vec![0, 1])
        );
        assert_eq!(permutation_aligning(&keys(&["a", "c"]), &keys(&["a", "b"])), None);
        assert_eq!(permutation_aligning(&keys(&["a"]), &keys(&["a", "a"])), None);
    }

    #[test]
    fn test_permutation_aligning_duplicates_first_unused_first() {
        assert_eq!(
            permutation_aligning(&keys(&["a", "b", "a"]), &keys(&["a", "a", "b"])),
            Some(vec![0, 2, 1])
        );
    }

    #[test]
    fn test_reorder_applies_permutation_to_both_sides() {
        let result = reorder_paired_keys(
            &keys(&["b", "a"]),
            &keys(&["x", "y"]),
            &hashed(&["a", "b"], 5),
            &Partitioning::Unknown(5),
        );

        assert_eq!(result.left_keys, keys(&["a", "b"]));
        assert_eq!(result.right_keys, keys(&["y", "x"]));
        assert_eq!(result.matched, Some((MatchedSide::Left, 5)));
    }

    #[test]
    fn test_reorder_scans_left_side_first() {
        // Both layouts could drive a permutation; the left one must win.
        let result = reorder_paired_keys(
            &keys(&["a", "b"]),
            &keys(&["c", "d"]),
            &hashed(&["b", "a"], 5),
            &hashed(&["c", "d"], 5),
        );

        assert_eq!(result.left_keys, keys(&["b", "a"]));
        assert_eq!(result.right_keys, keys(&["d", "c"]));
        assert_eq!(result.matched, Some((MatchedSide::Left, 5)));
    }

    #[test]
    fn test_reorder_falls_back_to_right_side() {
        let result = reorder_paired_keys(
            &keys(&["a", "c"]),
            &keys(&["x", "y"]),
            &hashed(&["a", "b"], 5),
            &hashed(&["y", "x"], 8),
        );

        assert_eq!(result.left_keys, keys(&["c", "a"]));
        assert_eq!(result.right_keys, keys(&["y", "x"]));
        assert_eq!(result.matched, Some((MatchedSide::Right, 8)));
    }

    #[test]
    fn test_reorder_searches_alternatives_in_member_order() {
        let left_layout = Partitioning::Alternatives(vec![
            hashed(&["a"], 5),
            hashed(&["a", "b"], 5),
        ]);
        let result = reorder_paired_keys(
            &keys(&["b", "a"]),
            &keys(&["x", "y"]),
            &left_layout,
            &Partitioning::Unknown(5),
        );

        assert_eq!(result.left_keys, keys(&["a", "b"]));
        assert_eq!(result.matched, Some((MatchedSide::Left, 5)));
    }

    #[test]
    fn test_no_match_leaves_keys_untouched() {
        let result = reorder_paired_keys(
            &keys(&["a", "b"]),
            &keys(&["x", "y"]),
            &Partitioning::Unknown(5),
            &Partitioning::RoundRobin(5),
        );

        assert_eq!(result.left_keys, keys(&["a", "b"]));
        assert_eq!(result.right_keys, keys(&["x", "y"]));
        assert_eq!(result.matched, None);
    }

    #[test]
    fn test_reorder_keys_to_layout() {
        assert_eq!(
            reorder_keys_to_layout(&keys(&["a", "b"]), &hashed(&["b", "a"], 4)),
            Some(keys(&["b", "a"]))
        );
        assert_eq!(
            reorder_keys_to_layout(&keys(&["a", "b"]), &Partitioning::Unknown(4)),
            None
        );
    }
}
