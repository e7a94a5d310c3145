use std::collections::VecDeque;
use std::f32::consts::PI;

use super::ingest::GraphIndex;
use super::types::{NodeIndex, PositionTable, Topology};
use crate::config::MindmapConfig;
use crate::ir::Position;

#[derive(Debug, Clone, Default)]
struct RadialNodeInfo {
    depth: usize,
    children: Vec<NodeIndex>,
}

pub(crate) struct RadialPlacement {
    pub positions: PositionTable,
    pub depths: Vec<usize>,
}

/// Angle of slot `slot` (0-based) out of `count` on the first ring.
///
/// The ring spans the full circle minus a wedge centered straight below the
/// root (screen coordinates, y grows downward). Slots sit strictly inside the
/// arc, so neither arc end is ever used.
fn ring_angle(slot: usize, count: usize, config: &MindmapConfig) -> f32 {
    let excluded = config.top_exclusion_angle;
    let span = 2.0 * PI - excluded;
    let step = span / (count as f32 + 1.0);
    PI / 2.0 + excluded / 2.0 + step * (slot as f32 + 1.0)
}

fn polar(angle: f32, radius: f32) -> Position {
    Position::new(angle.cos() * radius, angle.sin() * radius)
}

/// Places child `slot` of `count` around its parent's angle.
fn child_position(
    parent: Position,
    slot: usize,
    count: usize,
    depth: usize,
    config: &MindmapConfig,
) -> Position {
    let parent_angle = parent.y.atan2(parent.x);
    let radius = depth as f32 * config.ring_radius;
    if count <= 1 {
        return polar(parent_angle, radius);
    }
    let spread = config.spread_angle;
    let denom = (count - 1) as f32;
    let angle = parent_angle - spread / 2.0 + spread * slot as f32 / denom;
    let base = polar(angle, radius);
    let offset = (slot as f32 - denom / 2.0) * config.sibling_spacing;
    Position::new(
        base.x - angle.sin() * offset,
        base.y + angle.cos() * offset,
    )
}

fn build_tree(index: &GraphIndex<'_>, topology: &Topology, center: NodeIndex) -> Vec<RadialNodeInfo> {
    let mut info = vec![RadialNodeInfo::default(); index.len()];
    let mut detached = Vec::new();
    for &node in &topology.order {
        match topology.parents[node] {
            Some(parent) => info[parent].children.push(node),
            None if node != center => detached.push(node),
            None => {}
        }
    }
    // Extra roots and seeded cycles hang off the center as first-ring nodes.
    info[center].children.extend(detached);

    let mut queue = VecDeque::from([center]);
    while let Some(node) = queue.pop_front() {
        let depth = info[node].depth;
        for child in info[node].children.clone() {
            info[child].depth = depth + 1;
            queue.push_back(child);
        }
    }
    info
}

/// Mind-map placement: root at the origin, descendants on concentric rings.
///
/// The first root is the center; any further roots are treated as its
/// children. Each node is positioned relative to the node that first reached
/// it during the level walk. O(V) after the walk.
pub(crate) fn compute_mindmap_layout(
    index: &GraphIndex<'_>,
    topology: &Topology,
    config: &MindmapConfig,
) -> RadialPlacement {
    let mut positions = PositionTable::new(index.len());
    let center = topology.roots.first().copied().unwrap_or(0);
    let info = build_tree(index, topology, center);

    positions.set(center, Position::ORIGIN);
    let ring = &info[center].children;
    let mut queue: VecDeque<NodeIndex> = VecDeque::with_capacity(index.len());
    for (slot, &node) in ring.iter().enumerate() {
        let angle = ring_angle(slot, ring.len(), config);
        positions.set(node, polar(angle, config.ring_radius));
        queue.push_back(node);
    }

    while let Some(node) = queue.pop_front() {
        let Some(parent_pos) = positions.get(node) else {
            continue;
        };
        let children = &info[node].children;
        for (slot, &child) in children.iter().enumerate() {
            let pos = child_position(parent_pos, slot, children.len(), info[child].depth, config);
            positions.set(child, pos);
            queue.push_back(child);
        }
    }

    log::debug!(
        "radial layout: center '{}', {} first-ring nodes",
        index.node(center).id,
        ring.len()
    );

    RadialPlacement {
        positions,
        depths: info.iter().map(|node| node.depth).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    #[test]
    fn ring_slots_avoid_the_bottom_wedge() {
        let config = MindmapConfig::default();
        let bottom = PI / 2.0;
        let half = config.top_exclusion_angle / 2.0;
        for count in 1..12 {
            for slot in 0..count {
                let angle = ring_angle(slot, count, &config);
                let from_bottom = (angle - bottom).rem_euclid(2.0 * PI);
                assert!(
                    from_bottom > half && from_bottom < 2.0 * PI - half,
                    "slot {slot}/{count} at {angle} falls in the excluded wedge"
                );
            }
        }
    }

    #[test]
    fn single_child_follows_parent_angle() {
        let config = MindmapConfig::default();
        let parent = Position::new(0.0, -300.0);
        let child = child_position(parent, 0, 1, 2, &config);
        assert!(child.x.abs() < EPS);
        assert!((child.y + 600.0).abs() < EPS);
    }

    #[test]
    fn siblings_fan_out_around_parent() {
        let config = MindmapConfig::default();
        let parent = Position::new(300.0, 0.0);
        let first = child_position(parent, 0, 3, 2, &config);
        let middle = child_position(parent, 1, 3, 2, &config);
        let last = child_position(parent, 2, 3, 2, &config);
        assert!((middle.x - 600.0).abs() < EPS);
        assert!(middle.y.abs() < EPS);
        assert!(first.y < middle.y && middle.y < last.y);
    }
}
