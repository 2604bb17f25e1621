//! The paint attribute snapshot value type.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::blend::BlendMode;
use crate::color::Color;
use crate::effects::{ColorFilter, ColorSource, ImageFilter, MaskFilter, PathEffect};

/// Whether geometry is filled, stroked, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawStyle {
    Fill,
    Stroke,
    StrokeAndFill,
}

/// Geometry added at the open ends of stroked lines and curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokeCap {
    Butt,
    Round,
    Square,
}

/// Geometry added where stroked segments meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokeJoin {
    Miter,
    Round,
    Bevel,
}

/// The full set of rendering attributes a draw call can consume.
///
/// Effect slots hold shared handles: the paint does not own the effect
/// exclusively and compares slots by identity first, then by value.
#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub anti_alias: bool,
    pub invert_colors: bool,
    pub color: Color,
    pub blend_mode: BlendMode,
    pub draw_style: DrawStyle,
    pub stroke_width: f32,
    pub stroke_miter: f32,
    pub stroke_cap: StrokeCap,
    pub stroke_join: StrokeJoin,
    pub color_source: Option<Arc<ColorSource>>,
    pub color_filter: Option<Arc<ColorFilter>>,
    pub image_filter: Option<Arc<ImageFilter>>,
    pub mask_filter: Option<Arc<MaskFilter>>,
    pub path_effect: Option<Arc<PathEffect>>,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            anti_alias: false,
            invert_colors: false,
            color: Color::BLACK,
            blend_mode: BlendMode::SrcOver,
            draw_style: DrawStyle::Fill,
            stroke_width: 0.0,
            stroke_miter: 4.0,
            stroke_cap: StrokeCap::Butt,
            stroke_join: StrokeJoin::Miter,
            color_source: None,
            color_filter: None,
            image_filter: None,
            mask_filter: None,
            path_effect: None,
        }
    }
}

impl Paint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    pub fn is_stroked(&self) -> bool {
        self.draw_style != DrawStyle::Fill
    }
}

/// Identity-or-value equality for shared effect slots: pointer identity is
/// the fast path, deep equality the fallback.
pub fn same_effect<T: PartialEq>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(lhs), Some(rhs)) => Arc::ptr_eq(lhs, rhs) || lhs == rhs,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::MaskFilter;

    #[test]
    fn default_paint_is_srcover_fill() {
        let paint = Paint::default();
        assert_eq!(paint.blend_mode, BlendMode::SrcOver);
        assert_eq!(paint.draw_style, DrawStyle::Fill);
        assert!(!paint.is_stroked());
    }

    #[test]
    fn same_effect_uses_identity_then_value() {
        let blur = Arc::new(MaskFilter::blur_normal(2.0));
        let alias = Arc::clone(&blur);
        let equal_value = Arc::new(MaskFilter::blur_normal(2.0));
        let different = Arc::new(MaskFilter::blur_normal(3.0));
        assert!(same_effect(&Some(Arc::clone(&blur)), &Some(alias)));
        assert!(same_effect(&Some(Arc::clone(&blur)), &Some(equal_value)));
        assert!(!same_effect(&Some(blur), &Some(different)));
        assert!(same_effect::<MaskFilter>(&None, &None));
    }
}
