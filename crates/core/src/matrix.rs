//! 4x4 transform matrices with a 2D-affine fast path.
//!
//! Matrices are stored row-major. Points are treated as column vectors, so
//! `concat` composes transforms the way a canvas does: the most recently
//! concatenated transform applies to geometry first.

use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A row-major 4x4 transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub m: [f32; 16],
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Self = Self {
        #[rustfmt::skip]
        m: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub const fn translation(tx: f32, ty: f32) -> Self {
        #[rustfmt::skip]
        let m = [
            1.0, 0.0, 0.0, tx,
            0.0, 1.0, 0.0, ty,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        Self { m }
    }

    pub const fn scaling(sx: f32, sy: f32) -> Self {
        #[rustfmt::skip]
        let m = [
            sx,  0.0, 0.0, 0.0,
            0.0, sy,  0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        Self { m }
    }

    /// Rotation about the Z axis, angle in radians.
    pub fn rotation(radians: f32) -> Self {
        let cos = radians.cos();
        let sin = radians.sin();
        #[rustfmt::skip]
        let m = [
            cos, -sin, 0.0, 0.0,
            sin, cos,  0.0, 0.0,
            0.0, 0.0,  1.0, 0.0,
            0.0, 0.0,  0.0, 1.0,
        ];
        Self { m }
    }

    /// Skew by the given x/y shear factors (not angles).
    pub const fn skewing(sx: f32, sy: f32) -> Self {
        #[rustfmt::skip]
        let m = [
            1.0, sx,  0.0, 0.0,
            sy,  1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        Self { m }
    }

    /// A 2x3 row-major affine transform:
    /// `| mxx mxy mxt |`
    /// `| myx myy myt |`
    pub const fn from_affine(mxx: f32, mxy: f32, mxt: f32, myx: f32, myy: f32, myt: f32) -> Self {
        #[rustfmt::skip]
        let m = [
            mxx, mxy, 0.0, mxt,
            myx, myy, 0.0, myt,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        Self { m }
    }

    /// A full row-major 4x4 transform.
    pub const fn from_rows(m: [f32; 16]) -> Self {
        Self { m }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn is_finite(&self) -> bool {
        self.m.iter().all(|value| value.is_finite())
    }

    /// True when the bottom row is `[0, 0, 0, 1]` and no Z terms mix into
    /// X/Y, i.e. the matrix maps the Z=0 plane as a plain 2D affine.
    pub fn is_2d_affine(&self) -> bool {
        let m = &self.m;
        m[2] == 0.0
            && m[6] == 0.0
            && m[8] == 0.0
            && m[9] == 0.0
            && m[10] == 1.0
            && m[11] == 0.0
            && m[12] == 0.0
            && m[13] == 0.0
            && m[14] == 0.0
            && m[15] == 1.0
    }

    pub fn has_perspective(&self) -> bool {
        let m = &self.m;
        m[12] != 0.0 || m[13] != 0.0 || m[14] != 0.0 || m[15] != 1.0
    }

    /// The 2x3 affine coefficients `[mxx, mxy, mxt, myx, myy, myt]`, or
    /// `None` when the matrix is not a plain 2D affine.
    pub fn as_affine_coeffs(&self) -> Option<[f32; 6]> {
        let m = &self.m;
        self.is_2d_affine()
            .then(|| [m[0], m[1], m[3], m[4], m[5], m[7]])
    }

    /// `self * other`: `other` applies to geometry first.
    pub fn concat(&self, other: &Self) -> Self {
        let a = &self.m;
        let b = &other.m;
        let mut m = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += a[row * 4 + k] * b[k * 4 + col];
                }
                m[row * 4 + col] = sum;
            }
        }
        Self { m }
    }

    pub fn map_point(&self, point: Point) -> Point {
        let m = &self.m;
        let x = m[0] * point.x + m[1] * point.y + m[3];
        let y = m[4] * point.x + m[5] * point.y + m[7];
        if self.has_perspective() {
            let w = m[12] * point.x + m[13] * point.y + m[15];
            if w != 0.0 && w.is_finite() {
                return Point::new(x / w, y / w);
            }
            return Point::new(f32::NAN, f32::NAN);
        }
        Point::new(x, y)
    }

    /// Axis-aligned bounds of the mapped corners of `rect`.
    ///
    /// Returns `None` when the mapping cannot be bounded: a non-finite
    /// matrix, or a perspective transform whose W plane crosses the rect
    /// (points mapping to or beyond infinity).
    pub fn map_rect(&self, rect: &Rect) -> Option<Rect> {
        if !self.is_finite() {
            return None;
        }
        if rect.is_empty() {
            return Some(Rect::EMPTY);
        }
        if !self.has_perspective() {
            let m = &self.m;
            // Affine: map two corners and take per-axis extremes.
            let x0 = m[0] * rect.left;
            let x1 = m[0] * rect.right;
            let xy0 = m[1] * rect.top;
            let xy1 = m[1] * rect.bottom;
            let y0 = m[5] * rect.top;
            let y1 = m[5] * rect.bottom;
            let yx0 = m[4] * rect.left;
            let yx1 = m[4] * rect.right;
            let mapped = Rect {
                left: x0.min(x1) + xy0.min(xy1) + m[3],
                top: y0.min(y1) + yx0.min(yx1) + m[7],
                right: x0.max(x1) + xy0.max(xy1) + m[3],
                bottom: y0.max(y1) + yx0.max(yx1) + m[7],
            };
            return mapped.is_finite().then_some(mapped);
        }
        let mut bounds: Option<Rect> = None;
        for corner in rect.corners() {
            let w = self.m[12] * corner.x + self.m[13] * corner.y + self.m[15];
            if !(w > 0.0 && w.is_finite()) {
                return None;
            }
            let mapped = self.map_point(corner);
            if !mapped.is_finite() {
                return None;
            }
            let corner_rect = Rect::bounding(mapped, mapped);
            bounds = Some(match bounds {
                Some(current) => Rect {
                    left: current.left.min(corner_rect.left),
                    top: current.top.min(corner_rect.top),
                    right: current.right.max(corner_rect.right),
                    bottom: current.bottom.max(corner_rect.bottom),
                },
                None => corner_rect,
            });
        }
        bounds
    }

    fn determinant(&self) -> f32 {
        let m = &self.m;
        let s0 = m[0] * m[5] - m[4] * m[1];
        let s1 = m[0] * m[6] - m[4] * m[2];
        let s2 = m[0] * m[7] - m[4] * m[3];
        let s3 = m[1] * m[6] - m[5] * m[2];
        let s4 = m[1] * m[7] - m[5] * m[3];
        let s5 = m[2] * m[7] - m[6] * m[3];

        let c5 = m[10] * m[15] - m[14] * m[11];
        let c4 = m[9] * m[15] - m[13] * m[11];
        let c3 = m[9] * m[14] - m[13] * m[10];
        let c2 = m[8] * m[15] - m[12] * m[11];
        let c1 = m[8] * m[14] - m[12] * m[10];
        let c0 = m[8] * m[13] - m[12] * m[9];

        s0 * c5 - s1 * c4 + s2 * c3 + s3 * c2 - s4 * c1 + s5 * c0
    }

    /// Full 4x4 inverse, or `None` for singular or non-finite matrices.
    pub fn invert(&self) -> Option<Self> {
        if !self.is_finite() {
            return None;
        }
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv_det = 1.0 / det;
        let m = &self.m;

        let s0 = m[0] * m[5] - m[4] * m[1];
        let s1 = m[0] * m[6] - m[4] * m[2];
        let s2 = m[0] * m[7] - m[4] * m[3];
        let s3 = m[1] * m[6] - m[5] * m[2];
        let s4 = m[1] * m[7] - m[5] * m[3];
        let s5 = m[2] * m[7] - m[6] * m[3];

        let c5 = m[10] * m[15] - m[14] * m[11];
        let c4 = m[9] * m[15] - m[13] * m[11];
        let c3 = m[9] * m[14] - m[13] * m[10];
        let c2 = m[8] * m[15] - m[12] * m[11];
        let c1 = m[8] * m[14] - m[12] * m[10];
        let c0 = m[8] * m[13] - m[12] * m[9];

        let inv = [
            (m[5] * c5 - m[6] * c4 + m[7] * c3) * inv_det,
            (-m[1] * c5 + m[2] * c4 - m[3] * c3) * inv_det,
            (m[13] * s5 - m[14] * s4 + m[15] * s3) * inv_det,
            (-m[9] * s5 + m[10] * s4 - m[11] * s3) * inv_det,
            (-m[4] * c5 + m[6] * c2 - m[7] * c1) * inv_det,
            (m[0] * c5 - m[2] * c2 + m[3] * c1) * inv_det,
            (-m[12] * s5 + m[14] * s2 - m[15] * s1) * inv_det,
            (m[8] * s5 - m[10] * s2 + m[11] * s1) * inv_det,
            (m[4] * c4 - m[5] * c2 + m[7] * c0) * inv_det,
            (-m[0] * c4 + m[1] * c2 - m[3] * c0) * inv_det,
            (m[12] * s4 - m[13] * s2 + m[15] * s0) * inv_det,
            (-m[8] * s4 + m[9] * s2 - m[11] * s0) * inv_det,
            (-m[4] * c3 + m[5] * c1 - m[6] * c0) * inv_det,
            (m[0] * c3 - m[1] * c1 + m[2] * c0) * inv_det,
            (-m[12] * s3 + m[13] * s1 - m[14] * s0) * inv_det,
            (m[8] * s3 - m[9] * s1 + m[10] * s0) * inv_det,
        ];
        let result = Self { m: inv };
        result.is_finite().then_some(result)
    }

    /// Minimum and maximum absolute scale factors of the 2D basis vectors,
    /// used to scale filter radii between local and device space.
    pub fn basis_scales(&self) -> (f32, f32) {
        let m = &self.m;
        let x_scale = (m[0] * m[0] + m[4] * m[4]).sqrt();
        let y_scale = (m[1] * m[1] + m[5] * m[5]).sqrt();
        (x_scale.min(y_scale), x_scale.max(y_scale))
    }
}
