//! Spatial index of per-op device bounds.
//!
//! During recording, entries accumulate as a flat parallel pair of vectors
//! in op order ([`RTreeData`]). Filtered layers rewrite their slice of
//! entries at restore, once the filter's effect on bounds is known. At
//! build time the flat list is bulk loaded into a static bounding
//! hierarchy ([`RTree`]) that answers rect queries in recording order.

use display_core::Rect;

const FANOUT: usize = 16;

/// Flat (rect, op index) accumulation during recording.
#[derive(Debug, Default)]
pub struct RTreeData {
    rects: Vec<Rect>,
    indices: Vec<usize>,
}

impl RTreeData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rect: Rect, op_index: usize) {
        debug_assert!(self.indices.last().is_none_or(|last| *last < op_index));
        self.rects.push(rect);
        self.indices.push(op_index);
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Replace every rect recorded at or after `start` with the mapped
    /// value. Used when a filtered layer restores and its filter's bounds
    /// expansion becomes known.
    pub fn rewrite_from(&mut self, start: usize, mut map: impl FnMut(Rect) -> Rect) {
        for rect in &mut self.rects[start..] {
            *rect = map(*rect);
        }
    }

    pub fn build(self) -> RTree {
        RTree::bulk_load(self.rects, self.indices)
    }
}

#[derive(Debug)]
enum NodeKind {
    /// Covers `entries[first..first + count]`.
    Leaf { first: usize, count: usize },
    /// Covers `nodes[first..first + count]`.
    Internal { first: usize, count: usize },
}

#[derive(Debug)]
struct Node {
    bounds: Rect,
    kind: NodeKind,
}

/// Immutable bounding hierarchy over the recorded entries.
#[derive(Debug)]
pub struct RTree {
    rects: Vec<Rect>,
    indices: Vec<usize>,
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl RTree {
    /// Entries arrive in recording order; grouping preserves that order so
    /// searches report op indices in recording order too.
    fn bulk_load(rects: Vec<Rect>, indices: Vec<usize>) -> Self {
        let mut nodes = Vec::new();
        if rects.is_empty() {
            return Self { rects, indices, nodes, root: None };
        }

        // Leaf level: one node per chunk of FANOUT entries.
        let mut level_start = 0;
        for (chunk_index, chunk) in rects.chunks(FANOUT).enumerate() {
            let bounds = chunk.iter().fold(Rect::EMPTY, |acc, rect| acc.union(rect));
            nodes.push(Node {
                bounds,
                kind: NodeKind::Leaf { first: chunk_index * FANOUT, count: chunk.len() },
            });
        }

        // Group each level into parents until one node remains.
        while nodes.len() - level_start > 1 {
            let level_end = nodes.len();
            let mut first = level_start;
            while first < level_end {
                let count = FANOUT.min(level_end - first);
                let bounds = nodes[first..first + count]
                    .iter()
                    .map(|node| node.bounds)
                    .fold(Rect::EMPTY, |acc, rect| acc.union(&rect));
                nodes.push(Node { bounds, kind: NodeKind::Internal { first, count } });
                first += count;
            }
            level_start = level_end;
        }

        let root = Some(nodes.len() - 1);
        Self { rects, indices, nodes, root }
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Union of all entry bounds.
    pub fn bounds(&self) -> Rect {
        self.root.map_or(Rect::EMPTY, |root| self.nodes[root].bounds)
    }

    /// Op indices of all entries intersecting `query`, in recording order.
    pub fn search(&self, query: &Rect) -> Vec<usize> {
        let mut results = Vec::new();
        if let Some(root) = self.root {
            self.search_node(root, query, &mut results);
        }
        results
    }

    fn search_node(&self, node: usize, query: &Rect, results: &mut Vec<usize>) {
        let node = &self.nodes[node];
        if !node.bounds.intersects(query) {
            return;
        }
        match node.kind {
            NodeKind::Leaf { first, count } => {
                for entry in first..first + count {
                    if self.rects[entry].intersects(query) {
                        results.push(self.indices[entry]);
                    }
                }
            }
            NodeKind::Internal { first, count } => {
                for child in first..first + count {
                    self.search_node(child, query, results);
                }
            }
        }
    }

    /// Entry view for verification: (device rect, op index) in order.
    pub fn entries(&self) -> impl Iterator<Item = (Rect, usize)> + '_ {
        self.rects.iter().copied().zip(self.indices.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32) -> Rect {
        Rect::from_xywh(x, y, 10.0, 10.0)
    }

    #[test]
    fn empty_tree_searches_nothing() {
        let tree = RTreeData::new().build();
        assert!(tree.is_empty());
        assert!(tree.search(&rect(0.0, 0.0)).is_empty());
        assert_eq!(tree.bounds(), Rect::EMPTY);
    }

    #[test]
    fn search_returns_hits_in_recording_order() {
        let mut data = RTreeData::new();
        for i in 0..40 {
            data.push(rect(i as f32 * 20.0, 0.0), i + 3);
        }
        let tree = data.build();
        assert_eq!(tree.len(), 40);

        let hits = tree.search(&Rect::from_ltrb(0.0, 0.0, 205.0, 10.0));
        assert_eq!(hits, vec![3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13]);

        assert!(tree.search(&Rect::from_ltrb(0.0, 100.0, 800.0, 110.0)).is_empty());
    }

    #[test]
    fn rewrite_updates_only_trailing_entries() {
        let mut data = RTreeData::new();
        data.push(rect(0.0, 0.0), 0);
        data.push(rect(50.0, 0.0), 1);
        data.push(rect(100.0, 0.0), 2);
        data.rewrite_from(1, |r| r.outset(5.0, 5.0));
        let tree = data.build();
        let entries: Vec<_> = tree.entries().collect();
        assert_eq!(entries[0].0, rect(0.0, 0.0));
        assert_eq!(entries[1].0, rect(50.0, 0.0).outset(5.0, 5.0));
        assert_eq!(entries[2].0, rect(100.0, 0.0).outset(5.0, 5.0));
    }
}
