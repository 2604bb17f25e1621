//! Shared value types for the display-list engine.
//!
//! This crate provides:
//! - Geometry: points, rectangles, round rects, opaque paths, 4x4 matrices
//! - Color and blend modes
//! - `Paint`: the rendering attribute aggregate
//! - Effects: color sources, color/image/mask filters, path effects
//! - Opaque image, text, and vertex payloads
//!
//! Everything here is plain data with value semantics; the recording and
//! replay machinery lives in the `display_list` crate.

pub mod blend;
pub mod color;
pub mod effects;
pub mod geometry;
pub mod image;
pub mod matrix;
pub mod paint;

pub use blend::BlendMode;
pub use color::Color;
pub use effects::{
    BlurStyle, ColorFilter, ColorSource, GradientStop, ImageFilter, MaskFilter, PathEffect,
};
pub use geometry::{Path, PathKind, Point, RSTransform, Rect, RoundRect};
pub use image::{Image, TextFrame, Vertices};
pub use matrix::Matrix;
pub use paint::{DrawStyle, Paint, StrokeCap, StrokeJoin, same_effect};
