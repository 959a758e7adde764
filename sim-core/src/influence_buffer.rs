use crate::types::NodeId;
use glam::Vec2;

/// Per-node scratch space for the pull of attractor sources.
///
/// Index `i` of both arrays belongs to node `i`. The buffer is cleared at
/// the end of every step, so nothing carries over between steps.
#[derive(Debug, Default)]
pub struct InfluenceBuffer {
    /// Sum of unit vectors from each node towards its sources.
    dir: Vec<Vec2>,
    /// Number of contributing sources per node.
    pub count: Vec<u32>,
}

impl InfluenceBuffer {
    /// Creates a buffer with `len` empty entries.
    ///
    /// ### Parameters
    /// - `len` - Number of nodes the buffer holds contributions for.
    ///
    /// ### Returns
    /// A new [`InfluenceBuffer`] with every direction at `Vec2::ZERO` and
    /// every count at `0`.
    pub fn with_len(len: usize) -> Self {
        Self {
            dir: vec![Vec2::ZERO; len],
            count: vec![0; len],
        }
    }

    /// Resizes to `len` entries and clears everything, even when the length
    /// was already right.
    ///
    /// ### Parameters
    /// - `len` - Desired number of entries, normally the node count.
    pub fn ensure_len(&mut self, len: usize) {
        if self.dir.len() != len {
            self.dir.resize(len, Vec2::ZERO);
            self.count.resize(len, 0);
        }
        self.clear();
    }

    /// Resets every direction and count; the length stays the same.
    pub fn clear(&mut self) {
        self.dir.fill(Vec2::ZERO);
        self.count.fill(0);
    }

    pub fn len(&self) -> usize {
        self.dir.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dir.is_empty()
    }

    /// Adds one source's pull on node `id`.
    ///
    /// ### Parameters
    /// - `id` - Node receiving the contribution.
    /// - `dir` - Unit vector from the node towards the source.
    ///
    /// ### Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    pub fn add(&mut self, id: NodeId, dir: Vec2) {
        self.dir[id] += dir;
        self.count[id] += 1;
    }

    #[inline]
    pub fn sum_dir(&self, id: NodeId) -> Vec2 {
        self.dir[id]
    }

    /// Direction node `id` should grow in.
    ///
    /// ### Parameters
    /// - `id` - Node to query.
    ///
    /// ### Returns
    /// - `Some(dir)` - The normalized sum of contributions.
    /// - `None` - If the node received nothing or its contributions cancel
    ///   out.
    #[inline]
    pub fn growth_dir(&self, id: NodeId) -> Option<Vec2> {
        if self.count[id] == 0 {
            return None;
        }
        self.dir[id].try_normalize()
    }

    #[inline]
    pub fn is_influenced(&self, id: NodeId) -> bool {
        self.count[id] > 0
    }

    /// Ids of all nodes with at least one contribution, ascending.
    pub fn influenced_indices<'a>(&'a self) -> impl Iterator<Item = NodeId> + 'a {
        self.count
            .iter()
            .enumerate()
            .filter_map(|(i, &c)| if c > 0 { Some(i) } else { None })
    }
}
