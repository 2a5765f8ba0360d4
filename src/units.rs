//! Newtypes for grid measurements so widths, heights and counts are not mixed up.

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Ord, PartialOrd)]
pub struct Width(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Ord, PartialOrd)]
pub struct Height(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct NodesCount(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct EdgesCount(pub usize);

impl NodesCount {
    /// Number of edges in any spanning tree over this many nodes.
    #[inline]
    pub fn spanning_tree_edges(self) -> EdgesCount {
        EdgesCount(self.0.saturating_sub(1))
    }
}

/// Count of the internal walls of a `width * height` rectangle, i.e. the candidate edges a
/// generator can carve: `(w - 1) * h` vertical walls plus `w * (h - 1)` horizontal walls.
pub fn internal_walls_count(width: Width, height: Height) -> EdgesCount {
    let (Width(w), Height(h)) = (width, height);
    if w == 0 || h == 0 {
        return EdgesCount(0);
    }
    EdgesCount((w - 1) * h + w * (h - 1))
}
