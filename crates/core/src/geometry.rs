//! Geometry value types consumed by the display-list engine.
//!
//! Rectangles are stored as left/top/right/bottom edges in logical pixels.
//! An empty rectangle is any rectangle whose edges are not strictly ordered;
//! empty rectangles contribute nothing to unions and bounds accumulation.

use serde::{Deserialize, Serialize};

/// A 2D point in logical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An axis-aligned rectangle described by its edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// The canonical empty rectangle.
    pub const EMPTY: Self = Self {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    pub const fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        }
    }

    /// The bounding rectangle of two points, in either order.
    pub fn bounding(p0: Point, p1: Point) -> Self {
        Self {
            left: p0.x.min(p1.x),
            top: p0.y.min(p1.y),
            right: p0.x.max(p1.x),
            bottom: p0.y.max(p1.y),
        }
    }

    /// The bounding rectangle of a point list. Empty input yields `EMPTY`.
    pub fn bounding_points(points: &[Point]) -> Self {
        let Some(first) = points.first() else {
            return Self::EMPTY;
        };
        let mut bounds = Self::from_ltrb(first.x, first.y, first.x, first.y);
        for point in &points[1..] {
            bounds.left = bounds.left.min(point.x);
            bounds.top = bounds.top.min(point.y);
            bounds.right = bounds.right.max(point.x);
            bounds.bottom = bounds.bottom.max(point.y);
        }
        bounds
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// True when the rectangle encloses no area. Non-finite rectangles are
    /// treated as empty so that degenerate geometry never grows bounds.
    pub fn is_empty(&self) -> bool {
        !(self.left < self.right && self.top < self.bottom)
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite()
    }

    /// Union of two rectangles, ignoring empty inputs.
    pub fn union(&self, other: &Self) -> Self {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Intersection of two rectangles, or `None` when they do not overlap.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let result = Self {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };
        if result.is_empty() { None } else { Some(result) }
    }

    pub fn intersects(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    pub fn contains_rect(&self, other: &Self) -> bool {
        !other.is_empty()
            && self.left <= other.left
            && self.top <= other.top
            && self.right >= other.right
            && self.bottom >= other.bottom
    }

    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    /// Grow (or shrink, for negative deltas) the rectangle on all sides.
    pub fn outset(&self, dx: f32, dy: f32) -> Self {
        Self {
            left: self.left - dx,
            top: self.top - dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            f32::midpoint(self.left, self.right),
            f32::midpoint(self.top, self.bottom),
        )
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right, self.top),
            Point::new(self.right, self.bottom),
            Point::new(self.left, self.bottom),
        ]
    }
}

/// A rotation-scale-translate transform for atlas sprites: a uniform scale
/// and rotation encoded as `(scale * cos, scale * sin)` plus a translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RSTransform {
    pub scaled_cos: f32,
    pub scaled_sin: f32,
    pub tx: f32,
    pub ty: f32,
}

impl RSTransform {
    pub const fn new(scaled_cos: f32, scaled_sin: f32, tx: f32, ty: f32) -> Self {
        Self { scaled_cos, scaled_sin, tx, ty }
    }

    /// Placement without rotation or scaling.
    pub const fn translation(tx: f32, ty: f32) -> Self {
        Self { scaled_cos: 1.0, scaled_sin: 0.0, tx, ty }
    }

    pub fn map_point(&self, point: Point) -> Point {
        Point::new(
            self.scaled_cos * point.x - self.scaled_sin * point.y + self.tx,
            self.scaled_sin * point.x + self.scaled_cos * point.y + self.ty,
        )
    }

    /// Device bounds of a sprite of the given size placed by this transform.
    pub fn map_sprite_bounds(&self, width: f32, height: f32) -> Rect {
        let corners = [
            self.map_point(Point::new(0.0, 0.0)),
            self.map_point(Point::new(width, 0.0)),
            self.map_point(Point::new(width, height)),
            self.map_point(Point::new(0.0, height)),
        ];
        Rect::bounding_points(&corners)
    }
}

/// A rectangle with circular corner radii, indexed clockwise from top-left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundRect {
    pub rect: Rect,
    pub radii: [f32; 4],
}

impl RoundRect {
    pub const fn new(rect: Rect, radii: [f32; 4]) -> Self {
        Self { rect, radii }
    }

    pub const fn uniform(rect: Rect, radius: f32) -> Self {
        Self {
            rect,
            radii: [radius, radius, radius, radius],
        }
    }

    pub fn bounds(&self) -> Rect {
        self.rect
    }

    pub fn is_rect(&self) -> bool {
        self.radii.iter().all(|radius| *radius <= 0.0)
    }
}

/// The kind of geometry a [`Path`] describes, exposed so consumers can take
/// fast paths for simple shapes without walking path data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Rect,
    Oval,
    RoundRect,
    Arbitrary,
}

/// An opaque path payload. The engine only consumes its bounds, its shape
/// classification, and its convexity; the verb/point data lives with the
/// tessellation backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    bounds: Rect,
    kind: PathKind,
    convex: bool,
}

impl Path {
    pub const fn rect(rect: Rect) -> Self {
        Self {
            bounds: rect,
            kind: PathKind::Rect,
            convex: true,
        }
    }

    pub const fn oval(bounds: Rect) -> Self {
        Self {
            bounds,
            kind: PathKind::Oval,
            convex: true,
        }
    }

    pub fn round_rect(rrect: RoundRect) -> Self {
        Self {
            bounds: rrect.bounds(),
            kind: PathKind::RoundRect,
            convex: true,
        }
    }

    pub const fn arbitrary(bounds: Rect, convex: bool) -> Self {
        Self {
            bounds,
            kind: PathKind::Arbitrary,
            convex,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn kind(&self) -> PathKind {
        self.kind
    }

    pub fn is_rect(&self) -> bool {
        self.kind == PathKind::Rect
    }

    pub fn is_oval(&self) -> bool {
        self.kind == PathKind::Oval
    }

    pub fn is_round_rect(&self) -> bool {
        self.kind == PathKind::RoundRect
    }

    pub fn is_convex(&self) -> bool {
        self.convex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rect_union_is_identity() {
        let rect = Rect::from_xywh(10.0, 10.0, 5.0, 5.0);
        assert_eq!(rect.union(&Rect::EMPTY), rect);
        assert_eq!(Rect::EMPTY.union(&rect), rect);
    }

    #[test]
    fn intersection_of_disjoint_is_none() {
        let left = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let right = Rect::from_xywh(20.0, 0.0, 10.0, 10.0);
        assert!(left.intersection(&right).is_none());
        assert!(!left.intersects(&right));
    }

    #[test]
    fn intersection_of_overlapping() {
        let first = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let second = Rect::from_xywh(5.0, 5.0, 10.0, 10.0);
        let expected = Rect::from_ltrb(5.0, 5.0, 10.0, 10.0);
        assert_eq!(first.intersection(&second), Some(expected));
    }

    #[test]
    fn inverted_rect_is_empty() {
        let rect = Rect::from_ltrb(10.0, 10.0, 0.0, 0.0);
        assert!(rect.is_empty());
    }

    #[test]
    fn nan_rect_is_empty() {
        let rect = Rect::from_ltrb(f32::NAN, 0.0, 10.0, 10.0);
        assert!(rect.is_empty());
    }

    #[test]
    fn bounding_points_orders_edges() {
        let points = [Point::new(5.0, 1.0), Point::new(-2.0, 8.0)];
        let bounds = Rect::bounding_points(&points);
        assert_eq!(bounds, Rect::from_ltrb(-2.0, 1.0, 5.0, 8.0));
    }

    #[test]
    fn round_rect_with_zero_radii_is_rect() {
        let rrect = RoundRect::uniform(Rect::from_xywh(0.0, 0.0, 4.0, 4.0), 0.0);
        assert!(rrect.is_rect());
        assert!(!RoundRect::uniform(rrect.rect, 2.0).is_rect());
    }
}
