//! Bounding-box accumulation with an explicit unbounded state.

use display_core::Rect;

/// The running accumulation state.
#[derive(Debug, Clone, Copy, PartialEq)]
enum AccumulationState {
    Empty,
    Bounds(Rect),
    Unbounded,
}

/// A mutable bounding-box accumulator.
///
/// Three states: empty, a finite rectangle, or unbounded. Once unbounded it
/// stays unbounded until reset. The accumulator also tracks whether any two
/// accumulated regions overlapped; that flag is one-way and is used to
/// invalidate group-opacity compatibility for a layer.
#[derive(Debug, Clone)]
pub struct AccumulationRect {
    state: AccumulationState,
    overlap_detected: bool,
}

impl Default for AccumulationRect {
    fn default() -> Self {
        Self::new()
    }
}

impl AccumulationRect {
    pub const fn new() -> Self {
        Self {
            state: AccumulationState::Empty,
            overlap_detected: false,
        }
    }

    /// Fold `rect` into the accumulation. Empty rects contribute nothing.
    pub fn accumulate(&mut self, rect: &Rect) {
        if rect.is_empty() {
            return;
        }
        match &self.state {
            AccumulationState::Empty => {
                self.state = AccumulationState::Bounds(*rect);
            }
            AccumulationState::Bounds(current) => {
                if current.intersects(rect) {
                    self.overlap_detected = true;
                }
                self.state = AccumulationState::Bounds(current.union(rect));
            }
            AccumulationState::Unbounded => {
                self.overlap_detected = true;
            }
        }
    }

    /// Degrade to the unbounded state. Any previously accumulated area now
    /// counts as overlapped.
    pub fn set_unbounded(&mut self) {
        if !matches!(self.state, AccumulationState::Empty) {
            self.overlap_detected = true;
        }
        self.state = AccumulationState::Unbounded;
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.state, AccumulationState::Empty)
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self.state, AccumulationState::Unbounded)
    }

    pub fn overlap_detected(&self) -> bool {
        self.overlap_detected
    }

    /// The finite accumulated bounds, if any.
    pub fn bounds(&self) -> Option<Rect> {
        match self.state {
            AccumulationState::Bounds(rect) => Some(rect),
            _ => None,
        }
    }

    /// Resolve to a concrete rect: the accumulated bounds, `fallback` when
    /// unbounded, or `EMPTY` when nothing was accumulated.
    pub fn resolve(&self, fallback: &Rect) -> Rect {
        match self.state {
            AccumulationState::Empty => Rect::EMPTY,
            AccumulationState::Bounds(rect) => rect,
            AccumulationState::Unbounded => *fallback,
        }
    }

    pub fn reset(&mut self) {
        self.state = AccumulationState::Empty;
        self.overlap_detected = false;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "tests fail loudly on a missing value")]

    use super::*;

    #[test]
    fn accumulation_never_shrinks() {
        let mut acc = AccumulationRect::new();
        acc.accumulate(&Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
        let before = acc.bounds().unwrap();
        acc.accumulate(&Rect::from_xywh(2.0, 2.0, 2.0, 2.0));
        let after = acc.bounds().unwrap();
        assert!(after.contains_rect(&before) || after == before);
    }

    #[test]
    fn overlap_is_one_way() {
        let mut acc = AccumulationRect::new();
        acc.accumulate(&Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
        assert!(!acc.overlap_detected());
        acc.accumulate(&Rect::from_xywh(5.0, 5.0, 10.0, 10.0));
        assert!(acc.overlap_detected());
        acc.accumulate(&Rect::from_xywh(100.0, 100.0, 1.0, 1.0));
        assert!(acc.overlap_detected());
    }

    #[test]
    fn disjoint_rects_do_not_overlap() {
        let mut acc = AccumulationRect::new();
        acc.accumulate(&Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
        acc.accumulate(&Rect::from_xywh(20.0, 0.0, 10.0, 10.0));
        assert!(!acc.overlap_detected());
        assert_eq!(acc.bounds(), Some(Rect::from_ltrb(0.0, 0.0, 30.0, 10.0)));
    }

    #[test]
    fn unbounded_is_sticky() {
        let mut acc = AccumulationRect::new();
        acc.set_unbounded();
        acc.accumulate(&Rect::from_xywh(0.0, 0.0, 1.0, 1.0));
        assert!(acc.is_unbounded());
        let fallback = Rect::from_xywh(0.0, 0.0, 100.0, 100.0);
        assert_eq!(acc.resolve(&fallback), fallback);
        acc.reset();
        assert!(acc.is_empty());
        assert!(!acc.overlap_detected());
    }

    #[test]
    fn empty_rects_contribute_nothing() {
        let mut acc = AccumulationRect::new();
        acc.accumulate(&Rect::EMPTY);
        acc.accumulate(&Rect::from_ltrb(5.0, 5.0, 5.0, 10.0));
        assert!(acc.is_empty());
        assert_eq!(acc.resolve(&Rect::from_xywh(0.0, 0.0, 1.0, 1.0)), Rect::EMPTY);
    }
}
