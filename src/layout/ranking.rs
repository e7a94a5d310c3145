use std::collections::VecDeque;

use super::ingest::GraphIndex;
use super::types::{NodeIndex, Topology};
use crate::error::DegenerateTopologyWarning;

/// Finds the roots and assigns a breadth-first level to every node.
///
/// All roots start together at level 0. A node keeps the level of the first
/// path that reaches it and is never queued twice, so back-edges cannot make
/// the walk loop. Runs in O(V + E).
pub(crate) fn compute_topology(index: &GraphIndex<'_>) -> Topology {
    let count = index.len();
    let mut warnings = Vec::new();

    let mut roots: Vec<NodeIndex> = (0..count)
        .filter(|&idx| index.incoming[idx].is_empty())
        .collect();
    if roots.is_empty() {
        // Fully cyclic input: fall back to the first node in insertion order.
        roots.push(0);
        warnings.push(DegenerateTopologyWarning::NoRoot {
            fallback: index.node(0).id.clone(),
        });
    }

    let mut levels: Vec<Option<usize>> = vec![None; count];
    let mut parents: Vec<Option<NodeIndex>> = vec![None; count];
    let mut order: Vec<NodeIndex> = Vec::with_capacity(count);
    let mut queue: VecDeque<NodeIndex> = VecDeque::new();

    for &root in &roots {
        levels[root] = Some(0);
        order.push(root);
        queue.push_back(root);
    }
    walk(index, &mut queue, &mut levels, &mut parents, &mut order);

    if order.len() < count {
        // Cycles hanging off no root. Seed each leftover component at level 0
        // from its first node so every node still receives a level.
        let unreachable: Vec<NodeIndex> =
            (0..count).filter(|&idx| levels[idx].is_none()).collect();
        warnings.push(DegenerateTopologyWarning::UnreachableNodes {
            nodes: unreachable
                .iter()
                .map(|&idx| index.node(idx).id.clone())
                .collect(),
        });
        for seed in unreachable {
            if levels[seed].is_some() {
                continue;
            }
            levels[seed] = Some(0);
            order.push(seed);
            queue.push_back(seed);
            walk(index, &mut queue, &mut levels, &mut parents, &mut order);
        }
        // Later seeds restart at level 0; keep `order` sorted by level.
        order.sort_by_key(|&idx| levels[idx].unwrap_or(0));
    }

    Topology {
        roots,
        levels: levels.into_iter().map(|level| level.unwrap_or(0)).collect(),
        parents,
        order,
        warnings,
    }
}

fn walk(
    index: &GraphIndex<'_>,
    queue: &mut VecDeque<NodeIndex>,
    levels: &mut [Option<usize>],
    parents: &mut [Option<NodeIndex>],
    order: &mut Vec<NodeIndex>,
) {
    while let Some(node) = queue.pop_front() {
        let level = levels[node].unwrap_or(0);
        for next in index.successors(node) {
            if levels[next].is_some() {
                continue;
            }
            levels[next] = Some(level + 1);
            parents[next] = Some(node);
            order.push(next);
            queue.push_back(next);
        }
    }
}

/// Median of the given coordinates, or `None` when there are none.
pub(crate) fn median_position(mut values: Vec<f32>) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) * 0.5)
    }
}
