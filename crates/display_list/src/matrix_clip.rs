//! Combined transform and clip tracking for one coordinate frame.
//!
//! The tracker is a plain value type: pushing a save scope copies it, which
//! is the entire mechanism by which nested scopes get independent,
//! restorable state.

use display_core::{Matrix, Path, Rect, RoundRect};

/// How a clip shape combines with the existing clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipOp {
    Intersect,
    Difference,
}

/// Anti-aliased clip edges cover up to half a pixel beyond the geometric
/// edge, so conservative clip bounds must grow by that much.
const AA_CLIP_OUTSET: f32 = 0.5;

/// Accumulated transform and device-space clip bounds for one frame.
#[derive(Debug, Clone)]
pub struct MatrixClipState {
    matrix: Matrix,
    cull_rect: Rect,
}

impl MatrixClipState {
    pub fn new(cull_rect: Rect) -> Self {
        Self {
            matrix: Matrix::IDENTITY,
            cull_rect,
        }
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Conservative clip bounds in device space.
    pub fn device_cull_rect(&self) -> Rect {
        self.cull_rect
    }

    /// The device cull rect mapped back to local space, or the device rect
    /// itself when the transform cannot be inverted.
    pub fn local_cull_rect(&self) -> Rect {
        let Some(inverse) = self.matrix.invert() else {
            return self.cull_rect;
        };
        inverse.map_rect(&self.cull_rect).unwrap_or(self.cull_rect)
    }

    pub fn translate(&mut self, tx: f32, ty: f32) {
        self.matrix = self.matrix.concat(&Matrix::translation(tx, ty));
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.matrix = self.matrix.concat(&Matrix::scaling(sx, sy));
    }

    pub fn rotate(&mut self, radians: f32) {
        self.matrix = self.matrix.concat(&Matrix::rotation(radians));
    }

    pub fn skew(&mut self, sx: f32, sy: f32) {
        self.matrix = self.matrix.concat(&Matrix::skewing(sx, sy));
    }

    pub fn transform(&mut self, matrix: &Matrix) {
        self.matrix = self.matrix.concat(matrix);
    }

    /// Reset to the identity transform (not the frame's original transform;
    /// the frame starts at identity by construction).
    pub fn transform_reset(&mut self) {
        self.matrix = Matrix::IDENTITY;
    }

    pub fn set_transform(&mut self, matrix: Matrix) {
        self.matrix = matrix;
    }

    /// Map local bounds to device space. `None` when the mapping cannot be
    /// bounded (degenerate perspective).
    pub fn map_rect(&self, bounds: &Rect) -> Option<Rect> {
        self.matrix.map_rect(bounds)
    }

    pub fn clip_rect(&mut self, rect: &Rect, clip_op: ClipOp, is_aa: bool) {
        match clip_op {
            ClipOp::Intersect => {
                let Some(mut device) = self.matrix.map_rect(rect) else {
                    // Unmappable clip shapes leave the clip unchanged, which
                    // is conservative for intersect.
                    return;
                };
                if is_aa {
                    device = device.outset(AA_CLIP_OUTSET, AA_CLIP_OUTSET);
                }
                self.cull_rect = self
                    .cull_rect
                    .intersection(&device)
                    .unwrap_or(Rect::EMPTY);
            }
            ClipOp::Difference => self.difference_rect(rect, is_aa),
        }
    }

    pub fn clip_round_rect(&mut self, rrect: &RoundRect, clip_op: ClipOp, is_aa: bool) {
        match clip_op {
            // Corner coverage is a subset of the bounds, so bounds-only
            // intersection stays conservative.
            ClipOp::Intersect => self.clip_rect(&rrect.bounds(), ClipOp::Intersect, is_aa),
            ClipOp::Difference => {
                if rrect.is_rect() {
                    self.difference_rect(&rrect.bounds(), is_aa);
                }
                // A non-rectangular difference cannot be represented as a
                // single rect; keep the previous (larger) clip bounds.
            }
        }
    }

    pub fn clip_path(&mut self, path: &Path, clip_op: ClipOp, is_aa: bool) {
        match clip_op {
            ClipOp::Intersect => self.clip_rect(&path.bounds(), ClipOp::Intersect, is_aa),
            ClipOp::Difference => {
                if path.is_rect() {
                    self.difference_rect(&path.bounds(), is_aa);
                }
            }
        }
    }

    /// Difference against an axis-aligned rect. Only exactly representable
    /// reductions are applied; anything else keeps the current bounds.
    fn difference_rect(&mut self, rect: &Rect, is_aa: bool) {
        let Some(mut device) = self.matrix.map_rect(rect) else {
            return;
        };
        // Under rotation or skew the mapped rect's bounds over-cover the
        // removed area, so only axis-aligned transforms may shrink the clip.
        if self.matrix.as_affine_coeffs().is_none_or(|coeffs| coeffs[1] != 0.0 || coeffs[3] != 0.0)
        {
            return;
        }
        if is_aa {
            // AA edges leave partial coverage, so the removable area shrinks.
            device = device.outset(-AA_CLIP_OUTSET, -AA_CLIP_OUTSET);
        }
        let cull = self.cull_rect;
        if device.contains_rect(&cull) {
            self.cull_rect = Rect::EMPTY;
            return;
        }
        // A removal spanning the full height can trim from the left or
        // right; full width can trim top or bottom.
        if device.top <= cull.top && device.bottom >= cull.bottom {
            if device.left <= cull.left && device.right > cull.left {
                self.cull_rect.left = device.right.min(cull.right);
            } else if device.right >= cull.right && device.left < cull.right {
                self.cull_rect.right = device.left.max(cull.left);
            }
        } else if device.left <= cull.left && device.right >= cull.right {
            if device.top <= cull.top && device.bottom > cull.top {
                self.cull_rect.top = device.bottom.min(cull.bottom);
            } else if device.bottom >= cull.bottom && device.top < cull.bottom {
                self.cull_rect.bottom = device.top.max(cull.top);
            }
        }
    }

    /// True only when the transformed bounds provably miss the clip.
    /// False is always a safe answer.
    pub fn quick_reject(&self, bounds: &Rect) -> bool {
        if self.cull_rect.is_empty() {
            return true;
        }
        if bounds.is_empty() {
            return true;
        }
        let Some(device) = self.matrix.map_rect(bounds) else {
            return false;
        };
        !device.intersects(&self.cull_rect)
    }

    /// Map bounds to device space and intersect with the clip.
    /// `Ok(None)` means fully clipped away; `Err(())` means unmappable.
    #[allow(clippy::result_unit_err, reason = "internal tri-state helper")]
    pub fn map_and_clip(&self, bounds: &Rect) -> Result<Option<Rect>, ()> {
        let Some(device) = self.matrix.map_rect(bounds) else {
            return Err(());
        };
        Ok(device.intersection(&self.cull_rect))
    }
}
