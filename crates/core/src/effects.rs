//! Pluggable paint effects: color sources, color filters, image filters,
//! mask filters, and path effects.
//!
//! These are closed enums rather than trait objects so that recorded ops can
//! compare them by value and the engine can answer bounds queries without
//! dynamic dispatch. Each type exposes exactly the queries the recording
//! engine consumes: bounds adjustment and alpha behavior.

use std::sync::Arc;

use crate::blend::BlendMode;
use crate::color::Color;
use crate::geometry::{Point, Rect};
use crate::image::Image;
use crate::matrix::Matrix;

/// A color stop of a gradient, offset in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

/// Where a draw call's color comes from when it is not a solid color.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSource {
    Solid(Color),
    LinearGradient {
        start: Point,
        end: Point,
        stops: Vec<GradientStop>,
    },
    RadialGradient {
        center: Point,
        radius: f32,
        stops: Vec<GradientStop>,
    },
    Image {
        image: Arc<Image>,
    },
}

impl ColorSource {
    /// True when every pixel the source produces is fully opaque.
    pub fn is_opaque(&self) -> bool {
        match self {
            Self::Solid(color) => color.is_opaque(),
            Self::LinearGradient { stops, .. } | Self::RadialGradient { stops, .. } => {
                stops.iter().all(|stop| stop.color.is_opaque())
            }
            Self::Image { .. } => false,
        }
    }

    /// Advisory: false when the source references a payload that must not be
    /// shared across threads (e.g. an unshareable GPU-backed image).
    pub fn is_ui_thread_safe(&self) -> bool {
        match self {
            Self::Image { image } => image.is_ui_thread_safe(),
            _ => true,
        }
    }
}

/// Per-pixel color transformation applied after rasterization.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorFilter {
    /// Blend a constant color over each source pixel with the given mode.
    Blend { color: Color, mode: BlendMode },
    /// A 4x5 row-major color matrix; the fifth column is a translation.
    Matrix { matrix: [f32; 20] },
}

impl ColorFilter {
    /// True when the filter can turn a fully transparent pixel into a
    /// non-transparent one, which makes an op's effect extend to the whole
    /// clip rather than just its geometry.
    pub fn modifies_transparent_black(&self) -> bool {
        match self {
            Self::Blend { color, mode } => {
                !color.is_transparent()
                    && !mode.preserves_transparency()
                    && *mode != BlendMode::Dst
            }
            // Transparent black input is all zeros, so only the translation
            // column can produce non-zero output.
            Self::Matrix { matrix } => {
                matrix[4] != 0.0 || matrix[9] != 0.0 || matrix[14] != 0.0 || matrix[19] != 0.0
            }
        }
    }

    /// True when applying opacity before or after the filter is equivalent,
    /// letting a layer distribute an inherited opacity through it.
    pub fn can_commute_with_opacity(&self) -> bool {
        match self {
            Self::Blend { mode, .. } => *mode == BlendMode::Dst,
            Self::Matrix { matrix } => {
                // Alpha row must be a pure scale of input alpha.
                matrix[15] == 0.0 && matrix[16] == 0.0 && matrix[17] == 0.0 && matrix[19] == 0.0
            }
        }
    }
}

/// Raster-space filters that consume and produce whole images, possibly
/// growing or moving their bounds.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageFilter {
    /// Gaussian blur with independent horizontal and vertical sigmas.
    Blur { sigma_x: f32, sigma_y: f32 },
    /// Morphological dilate by the given radii.
    Dilate { radius_x: f32, radius_y: f32 },
    /// Morphological erode by the given radii.
    Erode { radius_x: f32, radius_y: f32 },
    /// Resample the input through a transform.
    MatrixTransform { matrix: Matrix },
    /// Apply a color filter as an image filter.
    ColorMap { filter: Arc<ColorFilter> },
    /// `outer(inner(input))`.
    Compose {
        outer: Arc<ImageFilter>,
        inner: Arc<ImageFilter>,
    },
}

/// Blur kernels are treated as having negligible contribution beyond three
/// standard deviations.
const BLUR_SIGMA_OUTSET: f32 = 3.0;

impl ImageFilter {
    /// Map input bounds to output bounds in the filter's own (local) space.
    /// `None` means the result cannot be bounded.
    pub fn map_local_bounds(&self, bounds: &Rect) -> Option<Rect> {
        match self {
            Self::Blur { sigma_x, sigma_y } => Some(bounds.outset(
                sigma_x.abs() * BLUR_SIGMA_OUTSET,
                sigma_y.abs() * BLUR_SIGMA_OUTSET,
            )),
            Self::Dilate { radius_x, radius_y } => {
                Some(bounds.outset(radius_x.abs(), radius_y.abs()))
            }
            // Erosion only shrinks coverage; keeping the input bounds is a
            // safe over-estimate.
            Self::Erode { .. } => Some(*bounds),
            Self::MatrixTransform { matrix } => matrix.map_rect(bounds),
            Self::ColorMap { .. } => Some(*bounds),
            Self::Compose { outer, inner } => {
                outer.map_local_bounds(&inner.map_local_bounds(bounds)?)
            }
        }
    }

    /// Map device-space input bounds to device-space output bounds under the
    /// given device transform.
    pub fn map_device_bounds(&self, bounds: &Rect, ctm: &Matrix) -> Option<Rect> {
        match self {
            Self::Blur { sigma_x, sigma_y } => {
                let (_, max_scale) = ctm.basis_scales();
                if !max_scale.is_finite() {
                    return None;
                }
                Some(bounds.outset(
                    sigma_x.abs() * BLUR_SIGMA_OUTSET * max_scale,
                    sigma_y.abs() * BLUR_SIGMA_OUTSET * max_scale,
                ))
            }
            Self::Dilate { radius_x, radius_y } => {
                let (_, max_scale) = ctm.basis_scales();
                if !max_scale.is_finite() {
                    return None;
                }
                Some(bounds.outset(radius_x.abs() * max_scale, radius_y.abs() * max_scale))
            }
            Self::Erode { .. } | Self::ColorMap { .. } => Some(*bounds),
            // Sandwich the local-space transform between the device
            // transform and its inverse.
            Self::MatrixTransform { matrix } => {
                let inverse = ctm.invert()?;
                let device_matrix = ctm.concat(matrix).concat(&inverse);
                device_matrix.map_rect(bounds)
            }
            Self::Compose { outer, inner } => {
                outer.map_device_bounds(&inner.map_device_bounds(bounds, ctm)?, ctm)
            }
        }
    }

    pub fn modifies_transparent_black(&self) -> bool {
        match self {
            Self::Blur { .. }
            | Self::Dilate { .. }
            | Self::Erode { .. }
            | Self::MatrixTransform { .. } => false,
            Self::ColorMap { filter } => filter.modifies_transparent_black(),
            Self::Compose { outer, inner } => {
                outer.modifies_transparent_black() || inner.modifies_transparent_black()
            }
        }
    }
}

/// How a blur mask filter treats the interior of the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurStyle {
    /// Blur inside and outside the geometry edge.
    Normal,
    /// Solid interior, blurred exterior.
    Solid,
    /// Blurred exterior only.
    Outer,
    /// Blurred interior only.
    Inner,
}

/// A per-draw coverage mask modifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaskFilter {
    Blur { style: BlurStyle, sigma: f32 },
}

impl MaskFilter {
    pub const fn blur(style: BlurStyle, sigma: f32) -> Self {
        Self::Blur { style, sigma }
    }

    pub const fn blur_normal(sigma: f32) -> Self {
        Self::Blur {
            style: BlurStyle::Normal,
            sigma,
        }
    }

    /// Distance the mask can extend past the geometry bounds.
    pub fn bounds_outset(&self) -> f32 {
        match self {
            Self::Blur { style, sigma } => match style {
                BlurStyle::Inner => 0.0,
                _ => sigma.abs() * BLUR_SIGMA_OUTSET,
            },
        }
    }
}

/// Geometry-stage effects applied to a path before stroking or filling.
#[derive(Debug, Clone, PartialEq)]
pub enum PathEffect {
    /// Dash the path with repeating on/off intervals.
    Dash { intervals: Vec<f32>, phase: f32 },
}

impl PathEffect {
    /// Extra distance the effect can push geometry past its bounds, or
    /// `None` when the contribution cannot be bounded.
    pub fn bounds_outset(&self) -> Option<f32> {
        match self {
            // Dashing removes geometry; it never grows bounds.
            Self::Dash { .. } => Some(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "tests fail loudly on a missing value")]

    use super::*;

    #[test]
    fn blur_filter_outsets_by_three_sigma() {
        let blur = ImageFilter::Blur {
            sigma_x: 2.0,
            sigma_y: 1.0,
        };
        let bounds = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let mapped = blur.map_local_bounds(&bounds).unwrap();
        assert_eq!(mapped, Rect::from_ltrb(-6.0, -3.0, 16.0, 13.0));
    }

    #[test]
    fn compose_chains_bounds() {
        let inner = Arc::new(ImageFilter::Dilate {
            radius_x: 1.0,
            radius_y: 1.0,
        });
        let outer = Arc::new(ImageFilter::Blur {
            sigma_x: 1.0,
            sigma_y: 1.0,
        });
        let compose = ImageFilter::Compose { outer, inner };
        let bounds = Rect::from_xywh(0.0, 0.0, 4.0, 4.0);
        let mapped = compose.map_local_bounds(&bounds).unwrap();
        assert_eq!(mapped, Rect::from_ltrb(-4.0, -4.0, 8.0, 8.0));
    }

    #[test]
    fn matrix_transform_with_singular_device_transform_is_unbounded() {
        let filter = ImageFilter::MatrixTransform {
            matrix: Matrix::translation(5.0, 0.0),
        };
        let flat = Matrix::scaling(0.0, 1.0);
        let bounds = Rect::from_xywh(0.0, 0.0, 4.0, 4.0);
        assert!(filter.map_device_bounds(&bounds, &flat).is_none());
        assert!(
            filter
                .map_device_bounds(&bounds, &Matrix::IDENTITY)
                .is_some()
        );
    }

    #[test]
    fn blend_color_filter_transparent_black() {
        let opaque_srcover = ColorFilter::Blend {
            color: Color::WHITE,
            mode: BlendMode::SrcOver,
        };
        assert!(opaque_srcover.modifies_transparent_black());

        let dst_passthrough = ColorFilter::Blend {
            color: Color::WHITE,
            mode: BlendMode::Dst,
        };
        assert!(!dst_passthrough.modifies_transparent_black());

        let transparent = ColorFilter::Blend {
            color: Color::TRANSPARENT,
            mode: BlendMode::SrcOver,
        };
        assert!(!transparent.modifies_transparent_black());
    }

    #[test]
    fn matrix_color_filter_transparent_black() {
        let mut identity = [0.0; 20];
        identity[0] = 1.0;
        identity[6] = 1.0;
        identity[12] = 1.0;
        identity[18] = 1.0;
        assert!(!ColorFilter::Matrix { matrix: identity }.modifies_transparent_black());

        let mut alpha_offset = identity;
        alpha_offset[19] = 0.5;
        assert!(ColorFilter::Matrix { matrix: alpha_offset }.modifies_transparent_black());
    }

    #[test]
    fn inner_blur_mask_has_no_outset() {
        assert_eq!(MaskFilter::blur(BlurStyle::Inner, 4.0).bounds_outset(), 0.0);
        assert_eq!(MaskFilter::blur_normal(4.0).bounds_outset(), 12.0);
    }
}
