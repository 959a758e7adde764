/// Identifier for a node in a [`crate::tree::Tree`].
///
/// This is an index into `Tree::nodes`, and is only meaningful within
/// the lifetime of a given `Tree` instance.
pub type NodeId = usize;

/// Distance below which two candidate nodes are considered equally near
/// to a source during influence pairing.
pub const TIE_TOLERANCE: f32 = 1e-4;

/// Distance below which a point counts as lying on a polygon edge.
pub const EDGE_TOLERANCE: f32 = 1e-4;
