//! Collision oracle
//!
//! Geometric ground truth for candidate placement. The engine treats the
//! oracle as a black box: it asks whether a candidate's bounds overlap
//! anything already committed, and commits each accepted placement before
//! the next query.

use crate::geometry::Rect;

/// Overlap test the placement engine relies on.
///
/// Queries must see exactly the committed state: implementations may not
/// surface a placement to `overlaps` before `commit` is called for it.
pub trait CollisionOracle {
    /// Does `candidate` overlap any committed bounds?
    fn overlaps(&self, candidate: &Rect) -> bool;

    /// Make accepted bounds visible to later queries
    fn commit(&mut self, bounds: Rect);
}

/// In-process spatial index over committed rectangles
#[derive(Debug, Clone, Default)]
pub struct RectIndex {
    committed: Vec<Rect>,
}

impl RectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }
}

impl CollisionOracle for RectIndex {
    fn overlaps(&self, candidate: &Rect) -> bool {
        self.committed.iter().any(|r| r.intersects(candidate))
    }

    fn commit(&mut self, bounds: Rect) {
        self.committed.push(bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_index_never_overlaps() {
        let index = RectIndex::new();
        assert!(!index.overlaps(&Rect::new(0, 0, 10, 10)));
    }

    #[test]
    fn test_query_sees_only_committed_state() {
        let mut index = RectIndex::new();
        let first = Rect::new(0, 0, 10, 10);

        assert!(!index.overlaps(&first));
        index.commit(first);

        assert!(index.overlaps(&Rect::new(5, 5, 15, 15)));
        assert!(!index.overlaps(&Rect::new(20, 20, 30, 30)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_touching_rects_overlap() {
        // Inclusive rects sharing an edge intersect; callers pass interiors
        // when adjacency should be allowed
        let mut index = RectIndex::new();
        index.commit(Rect::new(0, 0, 10, 10));
        assert!(index.overlaps(&Rect::new(10, 0, 20, 10)));
        assert!(!index.overlaps(&Rect::new(11, 0, 20, 10)));
    }
}
