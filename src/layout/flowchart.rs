use std::collections::HashSet;

use super::ingest::GraphIndex;
use super::ranking::median_position;
use super::types::{NodeIndex, PositionTable, Topology};
use crate::config::FlowchartConfig;
use crate::error::DegenerateTopologyWarning;
use crate::ir::{Position, SourceSide};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Branch {
    Yes,
    No,
}

/// Branch bookkeeping for one decision node, created when the walk first
/// reaches it. `merge` is filled the first time a node downstream of both
/// branches turns up.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DecisionBranchRecord {
    pub decision: NodeIndex,
    pub yes: Option<NodeIndex>,
    pub no: Option<NodeIndex>,
    pub merge: Option<NodeIndex>,
}

impl DecisionBranchRecord {
    fn target(&self, branch: Branch) -> Option<NodeIndex> {
        match branch {
            Branch::Yes => self.yes,
            Branch::No => self.no,
        }
    }
}

/// Why a node's x is tied to a decision instead of its row.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Pin {
    Branch { record: usize, branch: Branch },
    Merge { record: usize },
}

/// Which side of its decision a pinned branch target has to stay on.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Bound {
    Free,
    AtMost(f32),
    AtLeast(f32),
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    node: NodeIndex,
    x: f32,
    rank: usize,
    bound: Bound,
}

/// A derived left/right hint for one edge, produced after placement.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EdgeAnnotation {
    pub source_side: SourceSide,
    /// Filled in only when the edge had no label of its own.
    pub label: Option<String>,
}

pub(crate) struct FlowchartPlacement {
    pub positions: PositionTable,
    pub decisions: Vec<DecisionBranchRecord>,
    pub warnings: Vec<DegenerateTopologyWarning>,
}

fn has_label(label: Option<&str>) -> bool {
    label.is_some_and(|l| !l.trim().is_empty())
}

/// Picks the Yes and No edges leaving a decision.
///
/// Labeled edges win. Missing branches are taken from the unlabeled edges in
/// edge order, so an unlabeled decision uses its first two edges as Yes/No.
fn classify_branches(
    index: &GraphIndex<'_>,
    decision: NodeIndex,
    config: &FlowchartConfig,
    warnings: &mut Vec<DegenerateTopologyWarning>,
) -> DecisionBranchRecord {
    let decision_id = &index.node(decision).id;
    let mut yes_edge = None;
    let mut no_edge = None;
    let mut unlabeled = Vec::new();
    for &edge_idx in &index.outgoing[decision] {
        if index.target(edge_idx) == decision {
            continue;
        }
        let label = index.edges[edge_idx].branch_label.as_deref();
        match label {
            Some(l) if config.is_yes_label(l) => {
                yes_edge.get_or_insert(edge_idx);
            }
            Some(l) if config.is_no_label(l) => {
                no_edge.get_or_insert(edge_idx);
            }
            _ if !has_label(label) => unlabeled.push(edge_idx),
            _ => {}
        }
    }

    let mut fallback = false;
    let mut spare = unlabeled.into_iter();
    match (yes_edge, no_edge) {
        (None, None) if spare.len() >= 2 => {
            yes_edge = spare.next();
            no_edge = spare.next();
            fallback = true;
        }
        (Some(_), None) => {
            no_edge = spare.next();
            fallback = no_edge.is_some();
        }
        (None, Some(_)) => {
            yes_edge = spare.next();
            fallback = yes_edge.is_some();
        }
        _ => {}
    }
    if fallback {
        warnings.push(DegenerateTopologyWarning::AmbiguousDecision {
            decision: decision_id.clone(),
        });
    }

    let yes = yes_edge.map(|edge| index.target(edge));
    let mut no = no_edge.map(|edge| index.target(edge));
    if let (Some(y), Some(n)) = (yes, no)
        && y == n
    {
        warnings.push(DegenerateTopologyWarning::SharedBranchTarget {
            decision: decision_id.clone(),
            target: index.node(y).id.clone(),
        });
        no = None;
    }
    if yes.is_none() || no.is_none() {
        warnings.push(DegenerateTopologyWarning::DecisionMissingBranch {
            decision: decision_id.clone(),
        });
    }

    DecisionBranchRecord {
        decision,
        yes,
        no,
        merge: None,
    }
}

/// Marks merge points: the first node, in walk order, whose forward incoming
/// edges carry both the Yes and the No ancestry of the same decision.
///
/// Ancestry only flows along edges that go down at least one level, so
/// back-edges never feed it. This is a best-effort heuristic: with nested
/// decisions sharing descendants it can pick a node the author would not
/// call the merge.
fn detect_merges(
    index: &GraphIndex<'_>,
    topology: &Topology,
    records: &mut [DecisionBranchRecord],
) {
    let mut lineage: Vec<HashSet<(usize, Branch)>> = vec![HashSet::new(); index.len()];
    // A target shared by two decisions carries the tags of both.
    for (record_idx, record) in records.iter().enumerate() {
        for branch in [Branch::Yes, Branch::No] {
            if let Some(target) = record.target(branch)
                && topology.level(target) > topology.level(record.decision)
            {
                lineage[target].insert((record_idx, branch));
            }
        }
    }

    for &node in &topology.order {
        let level = topology.level(node);
        let mut inherited: HashSet<(usize, Branch)> = HashSet::new();
        for source in index.predecessors(node) {
            if topology.level(source) < level {
                inherited.extend(lineage[source].iter().copied());
            }
        }
        if inherited.is_empty() {
            continue;
        }
        for (record_idx, record) in records.iter_mut().enumerate() {
            if record.merge.is_none()
                && record.decision != node
                && inherited.contains(&(record_idx, Branch::Yes))
                && inherited.contains(&(record_idx, Branch::No))
            {
                record.merge = Some(node);
            }
        }
        lineage[node].extend(inherited);
    }
}

/// Spreads sorted x values so neighbours are at least `gap` apart.
///
/// Averages a left-to-right push with a right-to-left push, which keeps
/// already separated input exactly where it was and treats both sides alike.
fn separate(desired: &[f32], gap: f32) -> Vec<f32> {
    let n = desired.len();
    if n <= 1 {
        return desired.to_vec();
    }
    let mut push_right = desired.to_vec();
    for i in 1..n {
        push_right[i] = push_right[i].max(push_right[i - 1] + gap);
    }
    let mut push_left = desired.to_vec();
    for i in (0..n - 1).rev() {
        push_left[i] = push_left[i].min(push_left[i + 1] - gap);
    }
    push_right
        .iter()
        .zip(&push_left)
        .map(|(r, l)| (r + l) * 0.5)
        .collect()
}

/// Flowchart placement: one horizontal band per level, centered on
/// `center_x`, with decision branches forced left (Yes) and right (No) of
/// their decision and merge points pulled back under it. O(V + E) plus a
/// sort per band.
pub(crate) fn compute_flowchart_layout(
    index: &GraphIndex<'_>,
    topology: &Topology,
    config: &FlowchartConfig,
) -> FlowchartPlacement {
    let mut warnings = Vec::new();
    let mut records: Vec<DecisionBranchRecord> = Vec::new();
    let mut pins: Vec<Option<Pin>> = vec![None; index.len()];

    for &node in &topology.order {
        if !config.is_decision(&index.node(node).kind) {
            continue;
        }
        let record = classify_branches(index, node, config, &mut warnings);
        let record_idx = records.len();
        for branch in [Branch::Yes, Branch::No] {
            let Some(target) = record.target(branch) else {
                continue;
            };
            // Back-edges and same-band targets keep their row position.
            if topology.level(target) <= topology.level(node) || pins[target].is_some() {
                continue;
            }
            pins[target] = Some(Pin::Branch {
                record: record_idx,
                branch,
            });
        }
        records.push(record);
    }

    detect_merges(index, topology, &mut records);
    for (record_idx, record) in records.iter().enumerate() {
        if let Some(merge) = record.merge
            && pins[merge].is_none()
        {
            pins[merge] = Some(Pin::Merge { record: record_idx });
        }
    }

    let mut positions = PositionTable::new(index.len());
    for (level, band) in topology.bands().into_iter().enumerate() {
        let y = level as f32 * config.level_spacing;

        let mut free: Vec<(NodeIndex, f32, usize)> = Vec::new();
        let mut slots: Vec<Slot> = Vec::with_capacity(band.len());
        for (rank, &node) in band.iter().enumerate() {
            match pinned_slot(pins[node], &records, &positions, config) {
                Some((x, bound)) => slots.push(Slot {
                    node,
                    x,
                    rank,
                    bound,
                }),
                None => {
                    let preds: Vec<f32> = index
                        .predecessors(node)
                        .filter_map(|pred| positions.x(pred))
                        .collect();
                    let key = median_position(preds).unwrap_or(config.center_x);
                    free.push((node, key, rank));
                }
            }
        }

        // Row order follows the median x of already placed parents.
        free.sort_by(|a, b| a.1.total_cmp(&b.1));
        let width = (free.len().saturating_sub(1)) as f32 * config.sibling_spacing;
        let start_x = config.center_x - width / 2.0;
        for (i, (node, _, rank)) in free.into_iter().enumerate() {
            slots.push(Slot {
                node,
                x: start_x + i as f32 * config.sibling_spacing,
                rank,
                bound: Bound::Free,
            });
        }

        slots.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.rank.cmp(&b.rank)));
        order_for_bounds(&mut slots, config.sibling_spacing);
        let desired: Vec<f32> = slots.iter().map(|slot| slot.x).collect();
        let spread = separate(&desired, config.sibling_spacing);
        let xs = fit_to_bounds(&slots, &spread, config.sibling_spacing);
        for (slot, x) in slots.iter().zip(xs) {
            positions.set(slot.node, Position::new(x, y));
        }
    }

    log::debug!(
        "hierarchical layout: {} levels, {} decisions, {} merge points",
        topology.max_level() + 1,
        records.len(),
        records.iter().filter(|r| r.merge.is_some()).count()
    );

    FlowchartPlacement {
        positions,
        decisions: records,
        warnings,
    }
}

/// Desired x of a pinned node and the side it must keep.
///
/// Branch targets may drift while their row is spaced out, but never past
/// half the branch offset toward their decision.
fn pinned_slot(
    pin: Option<Pin>,
    records: &[DecisionBranchRecord],
    positions: &PositionTable,
    config: &FlowchartConfig,
) -> Option<(f32, Bound)> {
    match pin? {
        Pin::Branch { record, branch } => {
            let decision_x = positions.x(records[record].decision)?;
            let margin = config.branch_offset * 0.5;
            Some(match branch {
                Branch::Yes => (
                    decision_x - config.branch_offset,
                    Bound::AtMost(decision_x - margin),
                ),
                Branch::No => (
                    decision_x + config.branch_offset,
                    Bound::AtLeast(decision_x + margin),
                ),
            })
        }
        Pin::Merge { record } => positions
            .x(records[record].decision)
            .map(|x| (x, Bound::Free)),
    }
}

/// Leftmost x each slot can take in the current order.
fn lowest_positions(slots: &[Slot], gap: f32) -> Vec<f32> {
    let mut lowest = Vec::with_capacity(slots.len());
    let mut prev = f32::NEG_INFINITY;
    for slot in slots {
        let floor = match slot.bound {
            Bound::AtLeast(min) => min,
            _ => f32::NEG_INFINITY,
        };
        prev = floor.max(prev + gap);
        lowest.push(prev);
    }
    lowest
}

/// Reorders a row until every `AtMost` slot fits left of its limit.
///
/// The nearest slot without an upper limit that sits before a blocked slot is
/// moved to just after it. Each move puts one more such slot behind an
/// upper-limited one, so the loop ends.
fn order_for_bounds(slots: &mut Vec<Slot>, gap: f32) {
    loop {
        let lowest = lowest_positions(slots, gap);
        let blocked = slots
            .iter()
            .zip(&lowest)
            .position(|(slot, &low)| matches!(slot.bound, Bound::AtMost(max) if low > max));
        let Some(blocked) = blocked else {
            return;
        };
        let Some(mover) = slots[..blocked]
            .iter()
            .rposition(|slot| !matches!(slot.bound, Bound::AtMost(_)))
        else {
            return;
        };
        let slot = slots.remove(mover);
        slots.insert(blocked, slot);
    }
}

/// Pulls spaced positions inside their bounds while keeping the gap.
///
/// The forward pass raises `AtLeast` slots and the backward pass lowers
/// `AtMost` slots. Given an order `order_for_bounds` accepted, the result
/// meets every bound and every gap.
fn fit_to_bounds(slots: &[Slot], xs: &[f32], gap: f32) -> Vec<f32> {
    let n = xs.len();
    let mut fitted = xs.to_vec();
    for i in 0..n {
        let mut x = fitted[i];
        if let Bound::AtLeast(min) = slots[i].bound {
            x = x.max(min);
        }
        if i > 0 {
            x = x.max(fitted[i - 1] + gap);
        }
        fitted[i] = x;
    }
    for i in (0..n).rev() {
        let mut x = fitted[i];
        if let Bound::AtMost(max) = slots[i].bound {
            x = x.min(max);
        }
        if i + 1 < n {
            x = x.min(fitted[i + 1] - gap);
        }
        fitted[i] = x;
    }
    fitted
}

/// Edge styling pass: re-derives the connector side of every edge leaving a
/// decision from the final x coordinates. Unlabeled branches pick up the
/// Yes/No label of the side they ended on. Edges whose endpoints share an x
/// keep whatever they had.
pub(crate) fn derive_edge_annotations(
    index: &GraphIndex<'_>,
    positions: &PositionTable,
    config: &FlowchartConfig,
) -> Vec<Option<EdgeAnnotation>> {
    index
        .edges
        .iter()
        .enumerate()
        .map(|(edge_idx, edge)| {
            let source = index.source(edge_idx);
            if !config.is_decision(&index.node(source).kind) {
                return None;
            }
            let source_x = positions.x(source)?;
            let target_x = positions.x(index.target(edge_idx))?;
            let labeled = has_label(edge.branch_label.as_deref());
            if target_x < source_x {
                Some(EdgeAnnotation {
                    source_side: SourceSide::Left,
                    label: (!labeled).then(|| config.yes_display()),
                })
            } else if target_x > source_x {
                Some(EdgeAnnotation {
                    source_side: SourceSide::Right,
                    label: (!labeled).then(|| config.no_display()),
                })
            } else {
                None
            }
        })
        .collect()
}
