use crate::types::{NodeId, TIE_TOLERANCE};
use glam::Vec2;

/// One node of the vein forest.
///
/// Nodes never change after creation; growth only appends new ones.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VeinNode {
    pub pos: Vec2,
    pub parent: Option<NodeId>,
    pub is_root: bool,
}

/// Append-only arena of vein nodes.
///
/// `parent` links are plain indices into `nodes`, and a child is always
/// pushed after its parent, so every parent id is smaller than its
/// child's id and the forest cannot contain cycles.
#[derive(Clone, Debug, Default)]
pub struct Tree {
    pub nodes: Vec<VeinNode>,
    children: Vec<Vec<NodeId>>,
}

impl VeinNode {
    pub fn new_root(pos: Vec2) -> Self {
        Self {
            pos,
            parent: None,
            is_root: true,
        }
    }

    pub fn new_child(pos: Vec2, parent: NodeId) -> Self {
        Self {
            pos,
            parent: Some(parent),
            is_root: false,
        }
    }
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_root(&mut self, pos: Vec2) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(VeinNode::new_root(pos));
        self.children.push(Vec::new());
        id
    }

    /// Appends a child of `parent` at `pos`.
    ///
    /// ### Parameters
    /// - `parent` - Id of an existing node.
    /// - `pos` - Position of the new node.
    ///
    /// ### Returns
    /// The id of the new node, always `self.len() - 1` afterwards.
    ///
    /// ### Panics
    /// Panics if `parent` is not a node of this tree.
    pub fn add_child(&mut self, parent: NodeId, pos: Vec2) -> NodeId {
        let id: usize = self.nodes.len();
        self.nodes.push(VeinNode::new_child(pos, parent));
        self.children.push(Vec::new());
        self.children[parent].push(id);
        id
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.children[id]
    }

    /// A tip is a node without children.
    pub fn is_tip(&self, id: NodeId) -> bool {
        self.children[id].is_empty()
    }

    pub fn tips(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).filter(|&id| self.is_tip(id))
    }

    /// Returns `true` if `parent` already has a child within `eps` of `pos`.
    pub fn has_child_near(&self, parent: NodeId, pos: Vec2, eps: f32) -> bool {
        self.children[parent]
            .iter()
            .any(|&c| self.nodes[c].pos.distance(pos) <= eps)
    }

    /// Nearest node to `pos` that lies within `radius`.
    ///
    /// Nodes whose distance differs from the current best by at most
    /// [`TIE_TOLERANCE`] do not replace it, so ties go to the node with the
    /// lowest id.
    ///
    /// ### Parameters
    /// - `pos` - Query position, usually a source.
    /// - `radius` - Inclusive search radius.
    ///
    /// ### Returns
    /// - `Some((id, distance))` - The winning node and its distance.
    /// - `None` - If no node lies within `radius`.
    pub fn find_nearest_within(&self, pos: Vec2, radius: f32) -> Option<(NodeId, f32)> {
        let mut best: Option<(NodeId, f32)> = None;
        for (id, n) in self.nodes.iter().enumerate() {
            let d = n.pos.distance(pos);
            if d > radius {
                continue;
            }
            match best {
                Some((_, best_d)) if d >= best_d - TIE_TOLERANCE => {}
                _ => best = Some((id, d)),
            }
        }
        best
    }

    /// Node ids from `id` back to its root, `id` first.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = self.nodes[id].parent;
        while let Some(p) = current {
            path.push(p);
            current = self.nodes[p].parent;
        }
        path
    }
}
