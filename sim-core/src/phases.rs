//! The four ordered phases of one growth step.
//!
//! 1. [`influence_phase`] — each alive source pulls on its nearest node in
//!    range, accumulating directions in an [`InfluenceBuffer`].
//! 2. [`growth_phase`] — every influenced node proposes a child one step
//!    towards its sources; the child is kept only where growth is allowed.
//! 3. [`consume_phase`] — sources reached by any node, including the ones
//!    just grown, are removed.
//! 4. [`reset_phase`] — all per-step scratch data is discarded.
//!
//! The order matters: a tip grown in phase 2 may consume a source in
//! phase 3 of the same step.

use crate::{
    attractor::AttractorSet,
    config::Config,
    geometry::{Polygon, is_free},
    influence_buffer::InfluenceBuffer,
    tree::Tree,
    types::NodeId,
};

/// What happened during [`growth_phase`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GrowthOutcome {
    /// Ids of the new nodes, in creation order.
    pub created: Vec<NodeId>,
    /// Candidates rejected by the boundary or an obstacle.
    pub blocked: usize,
    /// Candidates dropped because an identical child already exists.
    pub duplicates: usize,
}

/// Pairs every alive source with its nearest node in range.
///
/// For each alive source the nearest node within the source's influence
/// radius (ties go to the lower id) receives the unit vector pointing from
/// the node to the source, and the node id is recorded in
/// `AttractorSource::influencing`. Sources with no node in range are left
/// dormant.
///
/// The buffer is resized to `tree.len()` and cleared first.
///
/// ### Parameters
/// - `tree` - Current vein forest.
/// - `sources` - Attractor sources; only alive ones take part.
/// - `acc` - Scratch buffer receiving the contributions.
///
/// ### Returns
/// The number of sources that influenced a node.
pub fn influence_phase(tree: &Tree, sources: &mut AttractorSet, acc: &mut InfluenceBuffer) -> usize {
    acc.ensure_len(tree.len());
    let mut influenced = 0;

    for a in sources.points.iter_mut().filter(|a| a.alive) {
        a.influencing.clear();
        if let Some((id, _)) = tree.find_nearest_within(a.pos, a.influence_radius) {
            let dir = (a.pos - tree.nodes[id].pos).normalize_or_zero();
            acc.add(id, dir);
            a.influencing.push(id);
            influenced += 1;
        }
    }
    influenced
}

/// Grows one child for every node with a usable growth direction.
///
/// For each influenced node, in id order:
///
/// 1. Normalize the summed contributions; skip if they cancel out.
/// 2. Propose `pos + dir * cfg.step_len`.
/// 3. Reject the proposal if it is outside `boundary` or inside any of
///    `obstacles`.
/// 4. Skip it if the node already has a child within
///    `cfg.duplicate_tolerance` of it.
///
/// All proposals are computed before any node is added, so nodes created
/// here never influence this step's growth.
///
/// ### Parameters
/// - `tree` - Forest to grow; new nodes are appended.
/// - `acc` - Contributions filled in by [`influence_phase`].
/// - `cfg` - Supplies `step_len` and `duplicate_tolerance`.
/// - `boundary` - Region growth must stay inside.
/// - `obstacles` - Regions growth must stay out of.
///
/// ### Returns
/// A [`GrowthOutcome`] with the new node ids and the rejected candidates.
pub fn growth_phase(
    tree: &mut Tree,
    acc: &InfluenceBuffer,
    cfg: &Config,
    boundary: &Polygon,
    obstacles: &[Polygon],
) -> GrowthOutcome {
    let mut outcome = GrowthOutcome::default();
    let mut to_add = Vec::with_capacity(16);

    for id in acc.influenced_indices() {
        let Some(dir) = acc.growth_dir(id) else {
            continue;
        };

        let new_pos = tree.nodes[id].pos + dir * cfg.step_len;

        if !is_free(boundary, obstacles, new_pos) {
            outcome.blocked += 1;
            continue;
        }
        if tree.has_child_near(id, new_pos, cfg.duplicate_tolerance) {
            outcome.duplicates += 1;
            continue;
        }

        to_add.push((id, new_pos));
    }

    for (parent, pos) in to_add {
        outcome.created.push(tree.add_child(parent, pos));
    }
    outcome
}

/// Removes every alive source that some node has reached.
///
/// ### Parameters
/// - `tree` - Forest after this step's growth.
/// - `sources` - Sources to test; consumed ones are dropped from the set.
///
/// ### Returns
/// The number of sources removed.
pub fn consume_phase(tree: &Tree, sources: &mut AttractorSet) -> usize {
    for a in sources.points.iter_mut().filter(|a| a.alive) {
        if tree.nodes.iter().any(|n| a.is_consumed_by(n.pos)) {
            a.alive = false;
        }
    }
    sources.remove_consumed()
}

/// Clears the influence buffer and every source's influence record.
pub fn reset_phase(sources: &mut AttractorSet, acc: &mut InfluenceBuffer) {
    acc.clear();
    for a in &mut sources.points {
        a.influencing.clear();
    }
}
