//! Opaque image, text, and vertex payloads.
//!
//! The recording engine never inspects pixel, glyph, or vertex data; it
//! only needs sizes, bounds, and the cross-thread sharing advisory.

use crate::geometry::Rect;

/// A decoded or GPU-resident image, referenced by id.
#[derive(Debug, Clone)]
pub struct Image {
    id: u64,
    width: u32,
    height: u32,
    ui_thread_safe: bool,
}

impl Image {
    /// A CPU-backed image, shareable across threads.
    pub const fn new(id: u64, width: u32, height: u32) -> Self {
        Self {
            id,
            width,
            height,
            ui_thread_safe: true,
        }
    }

    /// An image bound to a rendering context that must stay on its thread.
    pub const fn new_texture_backed(id: u64, width: u32, height: u32) -> Self {
        Self {
            id,
            width,
            height,
            ui_thread_safe: false,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_xywh(0.0, 0.0, self.width as f32, self.height as f32)
    }

    pub fn is_ui_thread_safe(&self) -> bool {
        self.ui_thread_safe
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// A shaped run of glyphs with precomputed ink bounds relative to its
/// drawing origin.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFrame {
    bounds: Rect,
}

impl TextFrame {
    pub const fn new(bounds: Rect) -> Self {
        Self { bounds }
    }

    /// Ink bounds relative to the (x, y) the frame is drawn at.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// A tessellated mesh payload. The engine consumes its precomputed bounds
/// and whether it carries per-vertex colors; positions and indices live
/// with the tessellation backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertices {
    bounds: Rect,
    has_colors: bool,
}

impl Vertices {
    pub const fn new(bounds: Rect, has_colors: bool) -> Self {
        Self { bounds, has_colors }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Per-vertex colors blend with the paint, which defeats distributing
    /// an inherited opacity over the mesh.
    pub fn has_colors(&self) -> bool {
        self.has_colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_equality_is_by_id() {
        let first = Image::new(7, 16, 16);
        let resized = Image::new(7, 32, 32);
        let other = Image::new(8, 16, 16);
        assert_eq!(first, resized);
        assert_ne!(first, other);
    }

    #[test]
    fn texture_backed_images_are_not_ui_safe() {
        assert!(Image::new(1, 4, 4).is_ui_thread_safe());
        assert!(!Image::new_texture_backed(2, 4, 4).is_ui_thread_safe());
    }
}
