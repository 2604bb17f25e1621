//! The stateful recorder.
//!
//! The builder owns the op stream, the save stack, and the live paint
//! attribute snapshot. Every public call either updates the snapshot (with
//! no-op suppression), mutates the top coordinate frames, pushes or pops a
//! save scope, or appends a draw op while folding its bounds into the
//! current accumulators. `build` consumes the builder and produces the
//! immutable [`DisplayList`].

use std::cell::RefCell;
use std::f32::consts::SQRT_2;
use std::rc::Rc;
use std::sync::Arc;

use display_core::effects::{ColorFilter, ColorSource, ImageFilter, MaskFilter, PathEffect};
use display_core::{
    same_effect, BlendMode, Color, DrawStyle, Image, Matrix, Paint, Path, Point, RSTransform, Rect,
    RoundRect, StrokeCap, StrokeJoin, TextFrame, Vertices,
};
use smallvec::SmallVec;

use crate::accumulator::AccumulationRect;
use crate::layer::{LayerInfo, SaveInfo, SaveState, MAX_CULL_RECT};
use crate::list::DisplayList;
use crate::matrix_clip::ClipOp;
use crate::op_flags::OpFlags;
use crate::ops::{DisplayListOp, OpStream, PointMode, SaveLayerOptions};
use crate::rtree::RTreeData;

const LOG_TARGET: &str = "display_list::builder";

/// What a draw op can do to the pixels of its enclosing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PaintResult {
    /// Provably draws nothing; the op is dropped from the stream.
    NoEffect,
    /// Draws, but cannot turn transparent layer pixels opaque.
    PreservesTransparency,
    /// May paint anywhere within its bounds.
    AffectsAll,
}

/// Records drawing operations into an immutable [`DisplayList`].
pub struct DisplayListBuilder {
    stream: OpStream,
    /// The implicit root scope. Held outside `save_stack` so the current
    /// scope always exists without a panicking lookup.
    root_info: SaveInfo,
    /// Explicitly pushed scopes, innermost last.
    save_stack: Vec<SaveInfo>,
    paint: Paint,
    original_cull_rect: Rect,
    depth: u64,
    render_op_count: usize,
    nested_op_count: usize,
    nested_byte_size: usize,
    /// Recomputed after color-filter, invert-colors, and blend-mode
    /// changes; consulted by every snapshot-based draw op.
    current_opacity_compatibility: bool,
    ui_thread_safe: bool,
    rtree_data: Option<RTreeData>,
}

impl DisplayListBuilder {
    /// Start a recording clipped to `cull_rect`. Pass an empty or
    /// non-finite rect to record without a meaningful cull bound.
    pub fn new(cull_rect: &Rect, prepare_rtree: bool) -> Self {
        let cull_rect = if cull_rect.is_empty() || !cull_rect.is_finite() {
            MAX_CULL_RECT
        } else {
            *cull_rect
        };
        Self {
            stream: OpStream::new(),
            root_info: SaveInfo::root(cull_rect),
            save_stack: Vec::new(),
            paint: Paint::default(),
            original_cull_rect: cull_rect,
            depth: 0,
            render_op_count: 0,
            nested_op_count: 0,
            nested_byte_size: 0,
            current_opacity_compatibility: true,
            ui_thread_safe: true,
            rtree_data: prepare_rtree.then(RTreeData::new),
        }
    }

    fn current_info(&self) -> &SaveInfo {
        self.save_stack.last().unwrap_or(&self.root_info)
    }

    fn current_info_mut(&mut self) -> &mut SaveInfo {
        self.save_stack.last_mut().unwrap_or(&mut self.root_info)
    }

    // ---- attribute dispatch -------------------------------------------

    pub fn set_anti_alias(&mut self, value: bool) {
        if self.paint.anti_alias != value {
            self.paint.anti_alias = value;
            self.stream.push(DisplayListOp::SetAntiAlias(value));
        }
    }

    pub fn set_invert_colors(&mut self, value: bool) {
        if self.paint.invert_colors != value {
            self.paint.invert_colors = value;
            self.stream.push(DisplayListOp::SetInvertColors(value));
            self.update_opacity_compatibility();
        }
    }

    pub fn set_stroke_cap(&mut self, cap: StrokeCap) {
        if self.paint.stroke_cap != cap {
            self.paint.stroke_cap = cap;
            self.stream.push(DisplayListOp::SetStrokeCap(cap));
        }
    }

    pub fn set_stroke_join(&mut self, join: StrokeJoin) {
        if self.paint.stroke_join != join {
            self.paint.stroke_join = join;
            self.stream.push(DisplayListOp::SetStrokeJoin(join));
        }
    }

    pub fn set_draw_style(&mut self, style: DrawStyle) {
        if self.paint.draw_style != style {
            self.paint.draw_style = style;
            self.stream.push(DisplayListOp::SetDrawStyle(style));
        }
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        if self.paint.stroke_width != width {
            self.paint.stroke_width = width;
            self.stream.push(DisplayListOp::SetStrokeWidth(width));
        }
    }

    pub fn set_stroke_miter(&mut self, miter: f32) {
        if self.paint.stroke_miter != miter {
            self.paint.stroke_miter = miter;
            self.stream.push(DisplayListOp::SetStrokeMiter(miter));
        }
    }

    pub fn set_color(&mut self, color: Color) {
        if self.paint.color != color {
            self.paint.color = color;
            self.stream.push(DisplayListOp::SetColor(color));
        }
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        if self.paint.blend_mode != mode {
            self.paint.blend_mode = mode;
            self.stream.push(DisplayListOp::SetBlendMode(mode));
            self.update_opacity_compatibility();
        }
    }

    pub fn set_color_source(&mut self, source: Option<Arc<ColorSource>>) {
        if !same_effect(&self.paint.color_source, &source) {
            if source.as_ref().is_some_and(|source| !source.is_ui_thread_safe()) {
                self.ui_thread_safe = false;
            }
            self.paint.color_source = source.clone();
            self.stream.push(DisplayListOp::SetColorSource(source));
        }
    }

    pub fn set_color_filter(&mut self, filter: Option<Arc<ColorFilter>>) {
        if !same_effect(&self.paint.color_filter, &filter) {
            self.paint.color_filter = filter.clone();
            self.stream.push(DisplayListOp::SetColorFilter(filter));
            self.update_opacity_compatibility();
        }
    }

    pub fn set_image_filter(&mut self, filter: Option<Arc<ImageFilter>>) {
        if !same_effect(&self.paint.image_filter, &filter) {
            self.paint.image_filter = filter.clone();
            self.stream.push(DisplayListOp::SetImageFilter(filter));
        }
    }

    pub fn set_mask_filter(&mut self, filter: Option<Arc<MaskFilter>>) {
        if !same_effect(&self.paint.mask_filter, &filter) {
            self.paint.mask_filter = filter.clone();
            self.stream.push(DisplayListOp::SetMaskFilter(filter));
        }
    }

    pub fn set_path_effect(&mut self, effect: Option<Arc<PathEffect>>) {
        if !same_effect(&self.paint.path_effect, &effect) {
            self.paint.path_effect = effect.clone();
            self.stream.push(DisplayListOp::SetPathEffect(effect));
        }
    }

    /// Sync every attribute the op consumes from `paint`, emitting only
    /// the ops whose values actually change.
    pub fn set_attributes_from_paint(&mut self, paint: &Paint, flags: OpFlags) {
        if flags.ignores_paint {
            return;
        }
        self.set_anti_alias(paint.anti_alias);
        if flags.uses_color {
            self.set_color(paint.color);
        }
        if flags.uses_blend {
            self.set_blend_mode(paint.blend_mode);
        }
        if flags.uses_style {
            self.set_draw_style(paint.draw_style);
        }
        if flags.uses_style || flags.always_stroked {
            self.set_stroke_width(paint.stroke_width);
            self.set_stroke_miter(paint.stroke_miter);
            self.set_stroke_cap(paint.stroke_cap);
            self.set_stroke_join(paint.stroke_join);
        }
        if flags.uses_color_source {
            self.set_color_source(paint.color_source.clone());
        }
        if flags.uses_color_filter {
            self.set_color_filter(paint.color_filter.clone());
            self.set_invert_colors(paint.invert_colors);
        }
        if flags.uses_image_filter {
            self.set_image_filter(paint.image_filter.clone());
        }
        if flags.uses_mask_filter {
            self.set_mask_filter(paint.mask_filter.clone());
        }
        if flags.uses_path_effect {
            self.set_path_effect(paint.path_effect.clone());
        }
    }

    fn update_opacity_compatibility(&mut self) {
        self.current_opacity_compatibility = self.paint.color_filter.is_none()
            && !self.paint.invert_colors
            && self.paint.blend_mode == BlendMode::SrcOver;
    }

    // ---- transforms ----------------------------------------------------

    pub fn translate(&mut self, tx: f32, ty: f32) {
        if !(tx.is_finite() && ty.is_finite()) || (tx == 0.0 && ty == 0.0) {
            return;
        }
        self.emit_transform(DisplayListOp::Translate { tx, ty }, &Matrix::translation(tx, ty));
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        if !(sx.is_finite() && sy.is_finite()) || (sx == 1.0 && sy == 1.0) {
            return;
        }
        self.emit_transform(DisplayListOp::Scale { sx, sy }, &Matrix::scaling(sx, sy));
    }

    pub fn rotate(&mut self, radians: f32) {
        if !radians.is_finite() || radians == 0.0 {
            return;
        }
        self.emit_transform(DisplayListOp::Rotate { radians }, &Matrix::rotation(radians));
    }

    pub fn skew(&mut self, sx: f32, sy: f32) {
        if !(sx.is_finite() && sy.is_finite()) || (sx == 0.0 && sy == 0.0) {
            return;
        }
        self.emit_transform(DisplayListOp::Skew { sx, sy }, &Matrix::skewing(sx, sy));
    }

    pub fn transform_2d_affine(&mut self, coeffs: [f32; 6]) {
        if coeffs.iter().any(|value| !value.is_finite()) {
            return;
        }
        let matrix =
            Matrix::from_affine(coeffs[0], coeffs[1], coeffs[2], coeffs[3], coeffs[4], coeffs[5]);
        if matrix.is_identity() {
            return;
        }
        self.emit_transform(DisplayListOp::Transform2dAffine { coeffs }, &matrix);
    }

    pub fn transform_full_perspective(&mut self, matrix: &Matrix) {
        if !matrix.is_finite() || matrix.is_identity() {
            return;
        }
        self.emit_transform(
            DisplayListOp::TransformFullPerspective { matrix: *matrix },
            matrix,
        );
    }

    /// Compose `matrix` onto the current transform, recording the most
    /// compact op that represents it.
    pub fn transform(&mut self, matrix: &Matrix) {
        if let Some(coeffs) = matrix.as_affine_coeffs() {
            self.transform_2d_affine(coeffs);
        } else {
            self.transform_full_perspective(matrix);
        }
    }

    /// Reset to the identity transform, not the transform at recording
    /// start (they coincide for recordings that begin at identity).
    pub fn transform_reset(&mut self) {
        if self.current_info().is_nop {
            let info = self.current_info_mut();
            info.global_state.transform_reset();
            info.layer_state.transform_reset();
            return;
        }
        self.check_for_deferred_save();
        self.stream.push(DisplayListOp::TransformReset);
        let info = self.current_info_mut();
        info.global_state.transform_reset();
        info.layer_state.transform_reset();
    }

    /// Replace the current transform entirely.
    pub fn set_transform(&mut self, matrix: &Matrix) {
        self.transform_reset();
        self.transform(matrix);
    }

    fn emit_transform(&mut self, op: DisplayListOp, matrix: &Matrix) {
        if !self.current_info().is_nop {
            self.check_for_deferred_save();
            self.stream.push(op);
        }
        let info = self.current_info_mut();
        info.global_state.transform(matrix);
        info.layer_state.transform(matrix);
    }

    pub fn current_transform(&self) -> &Matrix {
        self.current_info().global_state.matrix()
    }

    // ---- clips ---------------------------------------------------------

    pub fn clip_rect(&mut self, rect: &Rect, clip_op: ClipOp, is_aa: bool) {
        if !rect.is_finite() {
            return;
        }
        self.emit_clip(DisplayListOp::ClipRect { rect: *rect, clip_op, is_aa });
        let info = self.current_info_mut();
        info.global_state.clip_rect(rect, clip_op, is_aa);
        info.layer_state.clip_rect(rect, clip_op, is_aa);
    }

    pub fn clip_round_rect(&mut self, rrect: &RoundRect, clip_op: ClipOp, is_aa: bool) {
        if !rrect.bounds().is_finite() {
            return;
        }
        if rrect.is_rect() {
            self.clip_rect(&rrect.bounds(), clip_op, is_aa);
            return;
        }
        self.emit_clip(DisplayListOp::ClipRoundRect { rrect: *rrect, clip_op, is_aa });
        let info = self.current_info_mut();
        info.global_state.clip_round_rect(rrect, clip_op, is_aa);
        info.layer_state.clip_round_rect(rrect, clip_op, is_aa);
    }

    pub fn clip_path(&mut self, path: &Path, clip_op: ClipOp, is_aa: bool) {
        if !path.bounds().is_finite() {
            return;
        }
        if path.is_rect() {
            self.clip_rect(&path.bounds(), clip_op, is_aa);
            return;
        }
        self.emit_clip(DisplayListOp::ClipPath { path: path.clone(), clip_op, is_aa });
        let info = self.current_info_mut();
        info.global_state.clip_path(path, clip_op, is_aa);
        info.layer_state.clip_path(path, clip_op, is_aa);
    }

    fn emit_clip(&mut self, op: DisplayListOp) {
        if !self.current_info().is_nop {
            self.check_for_deferred_save();
            self.stream.push(op);
        }
    }

    /// Conservative clipped-out test against the current device clip.
    pub fn quick_reject(&self, bounds: &Rect) -> bool {
        self.current_info().global_state.quick_reject(bounds)
    }

    /// The current clip bounds in device space.
    pub fn destination_clip_bounds(&self) -> Rect {
        self.current_info().global_state.device_cull_rect()
    }

    /// The current clip bounds in local (transformed) space.
    pub fn local_clip_bounds(&self) -> Rect {
        self.current_info().global_state.local_cull_rect()
    }

    // ---- save / restore ------------------------------------------------

    /// The current save stack depth; the implicit root scope counts, so a
    /// fresh builder reports 1.
    pub fn save_count(&self) -> usize {
        self.save_stack.len() + 1
    }

    pub fn save(&mut self) {
        let depth = self.depth;
        let parent = self.current_info();
        let info = SaveInfo::push_save(parent, depth);
        self.save_stack.push(info);
    }

    /// Begin a compositing layer. The layer's content renders into its own
    /// surface which is composited into the parent at restore with
    /// `paint`'s color, blend mode, and filters.
    pub fn save_layer(
        &mut self,
        bounds: Option<&Rect>,
        paint: Option<&Paint>,
        backdrop: Option<Arc<ImageFilter>>,
    ) {
        let with_paint = paint.is_some();
        if let Some(paint) = paint {
            self.set_attributes_from_paint(paint, OpFlags::SAVE_LAYER);
        }
        let layer_paint = paint.cloned().unwrap_or_default();

        let result = Self::classify_paint(&layer_paint, OpFlags::SAVE_LAYER);
        let is_nop = self.current_info().is_nop
            || (result == PaintResult::NoEffect && backdrop.is_none());

        let mut layer_info = LayerInfo::new(
            layer_paint.image_filter.clone(),
            self.rtree_data.as_ref().map_or(0, RTreeData::len),
        );
        layer_info.contains_backdrop_filter = backdrop.is_some();
        layer_info.blend_into_parent =
            if with_paint { layer_paint.blend_mode } else { BlendMode::SrcOver };
        layer_info.opacity_compatible_into_parent = !with_paint
            || (layer_paint.blend_mode == BlendMode::SrcOver
                && !layer_paint.invert_colors
                && layer_paint
                    .color_filter
                    .as_ref()
                    .is_none_or(|filter| filter.can_commute_with_opacity()));

        let options = SaveLayerOptions {
            bounds: bounds.copied(),
            with_paint,
            backdrop: backdrop.clone(),
        };
        let has_backdrop = backdrop.is_some();
        let depth = self.depth;
        let parent = self.current_info();
        let mut info = SaveInfo::push_layer(
            parent,
            Rc::new(RefCell::new(layer_info)),
            options,
            depth,
            is_nop,
        );
        if let Some(bounds) = bounds {
            info.layer_state.clip_rect(bounds, ClipOp::Intersect, false);
        }
        self.save_stack.push(info);

        // A backdrop filter is visible even when the layer records no
        // content: the scope cannot stay deferred, and its output covers
        // the whole clip regardless of what gets recorded inside.
        if has_backdrop && !is_nop {
            self.check_for_deferred_save();
            self.accumulate_unbounded_current();
        }
    }

    /// Write the save op for the top scope if it is still pending. Called
    /// by every op that proves the scope non-empty; outer pending scopes
    /// stay deferred because any state change between their push and this
    /// one would already have committed them.
    fn check_for_deferred_save(&mut self) {
        let info = self.current_info_mut();
        if info.state == SaveState::Pending {
            let op = info
                .layer_options
                .clone()
                .map_or(DisplayListOp::Save, DisplayListOp::SaveLayer);
            let offset = self.stream.push(op);
            self.current_info_mut().state = SaveState::Committed { op_offset: offset };
        }
    }

    /// Pop the top scope. Unbalanced calls are ignored with a warning.
    pub fn restore(&mut self) {
        let Some(info) = self.save_stack.pop() else {
            log::warn!(target: LOG_TARGET, "restore called with no matching save; ignored");
            return;
        };
        if info.is_save_layer {
            self.restore_layer(&info);
        } else if info.is_committed() {
            self.stream.push(DisplayListOp::Restore);
        }
    }

    /// Restore until the save count equals `count`. Idempotent when called
    /// with the current count; counts below 1 restore everything.
    pub fn restore_to_count(&mut self, count: usize) {
        while self.save_count() > count.max(1) {
            self.restore();
        }
    }

    fn restore_layer(&mut self, info: &SaveInfo) {
        // An uncommitted layer (empty or proven invisible) was elided from
        // the stream and contributes nothing to the parent.
        if !info.is_committed() {
            return;
        }
        self.stream.push(DisplayListOp::Restore);
        // Compositing the layer into the parent is one more pass.
        self.depth += 1;

        let child = info.layer_info.borrow();
        let filter = child.filter.clone();

        // Fold the layer's content bounds into the parent's accumulators.
        if child.layer_local_accumulator.is_unbounded() {
            self.accumulate_unbounded_current();
        } else if let Some(content_bounds) = child.layer_local_accumulator.bounds() {
            // Layer-local space is the parent's local space at the save.
            let folded = match &filter {
                Some(filter) => filter.map_local_bounds(&content_bounds),
                None => Some(content_bounds),
            };
            match folded {
                Some(bounds) => self.accumulate_local_bounds(&bounds),
                None => self.accumulate_unbounded_current(),
            }
        }

        // A filtered layer's true device bounds are only known now;
        // rewrite the entries recorded since the layer began.
        if let Some(filter) = &filter {
            let parent = self.current_info();
            let ctm = *parent.global_state.matrix();
            let clip = parent.global_state.device_cull_rect();
            let start = child.rtree_start_index;
            if let Some(rtree) = self.rtree_data.as_mut() {
                rtree.rewrite_from(start, |rect| match filter.map_device_bounds(&rect, &ctm) {
                    Some(mapped) => mapped.intersection(&clip).unwrap_or(Rect::EMPTY),
                    // An unmappable filter covers at most the clip.
                    None => clip,
                });
            }
        }

        self.current_info()
            .layer_info
            .borrow_mut()
            .absorb(&child);
    }

    // ---- draw dispatch -------------------------------------------------

    /// Blend `color` over the whole clip, ignoring the attribute snapshot.
    pub fn draw_color(&mut self, color: Color, mode: BlendMode) {
        let paint = Paint { color, blend_mode: mode, ..Paint::default() };
        self.render_op(
            DisplayListOp::DrawColor { color, mode },
            None,
            OpFlags::DRAW_COLOR,
            &paint,
            mode == BlendMode::SrcOver,
        );
    }

    /// Fill the whole clip with the current attributes.
    pub fn draw_paint(&mut self) {
        let paint = self.paint.clone();
        let compatible = self.current_opacity_compatibility;
        self.render_op(DisplayListOp::DrawPaint, None, OpFlags::DRAW_PAINT, &paint, compatible);
    }

    pub fn draw_line(&mut self, from: Point, to: Point) {
        self.render_with_snapshot(
            DisplayListOp::DrawLine { from, to },
            Rect::bounding(from, to),
            OpFlags::DRAW_LINE,
        );
    }

    pub fn draw_rect(&mut self, rect: &Rect) {
        self.render_with_snapshot(DisplayListOp::DrawRect { rect: *rect }, *rect, OpFlags::DRAW_RECT);
    }

    pub fn draw_oval(&mut self, bounds: &Rect) {
        self.render_with_snapshot(
            DisplayListOp::DrawOval { bounds: *bounds },
            *bounds,
            OpFlags::DRAW_OVAL,
        );
    }

    pub fn draw_circle(&mut self, center: Point, radius: f32) {
        let bounds =
            Rect::from_ltrb(center.x - radius, center.y - radius, center.x + radius, center.y + radius);
        self.render_with_snapshot(
            DisplayListOp::DrawCircle { center, radius },
            bounds,
            OpFlags::DRAW_CIRCLE,
        );
    }

    pub fn draw_round_rect(&mut self, rrect: &RoundRect) {
        self.render_with_snapshot(
            DisplayListOp::DrawRoundRect { rrect: *rrect },
            rrect.bounds(),
            OpFlags::DRAW_ROUND_RECT,
        );
    }

    pub fn draw_double_round_rect(&mut self, outer: &RoundRect, inner: &RoundRect) {
        self.render_with_snapshot(
            DisplayListOp::DrawDoubleRoundRect { outer: *outer, inner: *inner },
            outer.bounds(),
            OpFlags::DRAW_DOUBLE_ROUND_RECT,
        );
    }

    pub fn draw_arc(&mut self, bounds: &Rect, start_degrees: f32, sweep_degrees: f32, use_center: bool) {
        self.render_with_snapshot(
            DisplayListOp::DrawArc { bounds: *bounds, start_degrees, sweep_degrees, use_center },
            *bounds,
            OpFlags::DRAW_ARC,
        );
    }

    pub fn draw_points(&mut self, mode: PointMode, points: &[Point]) {
        if points.is_empty() {
            return;
        }
        let flags = match mode {
            PointMode::Points => OpFlags::DRAW_POINTS,
            PointMode::Lines => OpFlags::DRAW_LINES,
            PointMode::Polygon => OpFlags::DRAW_POLYGON,
        };
        let bounds = Rect::bounding_points(points);
        let points: SmallVec<Point, 8> = SmallVec::from_slice(points);
        self.render_with_snapshot(DisplayListOp::DrawPoints { mode, points }, bounds, flags);
    }

    pub fn draw_path(&mut self, path: &Path) {
        let bounds = path.bounds();
        self.render_with_snapshot(
            DisplayListOp::DrawPath { path: path.clone() },
            bounds,
            OpFlags::DRAW_PATH,
        );
    }

    /// Draw a tessellated mesh whose vertex data blends with the paint's
    /// color source via `mode`. Per-vertex blending cannot distribute an
    /// inherited opacity, so recording one disqualifies group opacity.
    pub fn draw_vertices(&mut self, vertices: &Arc<Vertices>, mode: BlendMode) {
        let bounds = vertices.bounds();
        let op = DisplayListOp::DrawVertices { vertices: Arc::clone(vertices), mode };
        let paint = self.paint.clone();
        self.render_op(op, Some(bounds), OpFlags::DRAW_VERTICES, &paint, false);
    }

    /// Draw an image with its top-left corner at `top_left`. When
    /// `with_paint` is false the current attributes are ignored at render
    /// time and a default paint applies.
    pub fn draw_image(&mut self, image: &Arc<Image>, top_left: Point, with_paint: bool) {
        if !image.is_ui_thread_safe() {
            self.ui_thread_safe = false;
        }
        let bounds = image.bounds().translated(top_left.x, top_left.y);
        let op = DisplayListOp::DrawImage { image: Arc::clone(image), top_left, with_paint };
        if with_paint {
            self.render_with_snapshot(op, bounds, OpFlags::DRAW_IMAGE);
        } else {
            self.render_op(op, Some(bounds), OpFlags::DRAW_IMAGE, &Paint::default(), true);
        }
    }

    /// Draw the `src` portion of an image scaled into `dst`.
    pub fn draw_image_rect(&mut self, image: &Arc<Image>, src: &Rect, dst: &Rect, with_paint: bool) {
        if !image.is_ui_thread_safe() {
            self.ui_thread_safe = false;
        }
        let op = DisplayListOp::DrawImageRect {
            image: Arc::clone(image),
            src: *src,
            dst: *dst,
            with_paint,
        };
        if with_paint {
            self.render_with_snapshot(op, *dst, OpFlags::DRAW_IMAGE_RECT);
        } else {
            self.render_op(op, Some(*dst), OpFlags::DRAW_IMAGE_RECT, &Paint::default(), true);
        }
    }

    /// Draw an image nine-patch style: `center` splits the image into a
    /// 3x3 grid whose corner cells draw unscaled while the edges and
    /// middle stretch to fill `dst`.
    pub fn draw_image_nine(
        &mut self,
        image: &Arc<Image>,
        center: &Rect,
        dst: &Rect,
        with_paint: bool,
    ) {
        if !image.is_ui_thread_safe() {
            self.ui_thread_safe = false;
        }
        let op = DisplayListOp::DrawImageNine {
            image: Arc::clone(image),
            center: *center,
            dst: *dst,
            with_paint,
        };
        if with_paint {
            self.render_with_snapshot(op, *dst, OpFlags::DRAW_IMAGE_NINE);
        } else {
            self.render_op(op, Some(*dst), OpFlags::DRAW_IMAGE_NINE, &Paint::default(), true);
        }
    }

    /// Draw sprites from an atlas image, one placement transform per
    /// texture rect. `colors`, when non-empty, blend with the sampled
    /// texels via `mode` and disqualify group opacity.
    pub fn draw_atlas(
        &mut self,
        atlas: &Arc<Image>,
        transforms: &[RSTransform],
        tex_rects: &[Rect],
        colors: &[Color],
        mode: BlendMode,
        cull_rect: Option<&Rect>,
        with_paint: bool,
    ) {
        if transforms.is_empty() || tex_rects.is_empty() {
            return;
        }
        if !atlas.is_ui_thread_safe() {
            self.ui_thread_safe = false;
        }
        let mut bounds = Rect::EMPTY;
        for (transform, tex_rect) in transforms.iter().zip(tex_rects) {
            bounds =
                bounds.union(&transform.map_sprite_bounds(tex_rect.width(), tex_rect.height()));
        }
        if let Some(cull) = cull_rect {
            bounds = bounds.intersection(cull).unwrap_or(Rect::EMPTY);
        }
        let op = DisplayListOp::DrawAtlas {
            atlas: Arc::clone(atlas),
            transforms: transforms.to_vec(),
            tex_rects: tex_rects.to_vec(),
            colors: colors.to_vec(),
            mode,
            cull_rect: cull_rect.copied(),
            with_paint,
        };
        let opacity_base =
            colors.is_empty() && (!with_paint || self.current_opacity_compatibility);
        let paint = if with_paint { self.paint.clone() } else { Paint::default() };
        self.render_op(op, Some(bounds), OpFlags::DRAW_ATLAS, &paint, opacity_base);
    }

    pub fn draw_text_frame(&mut self, frame: &Arc<TextFrame>, origin: Point) {
        let bounds = frame.bounds().translated(origin.x, origin.y);
        self.render_with_snapshot(
            DisplayListOp::DrawTextFrame { frame: Arc::clone(frame), origin },
            bounds,
            OpFlags::DRAW_TEXT,
        );
    }

    /// Draw a drop shadow for `path` cast by a light `elevation` logical
    /// pixels above it. The current attributes never apply; the shadow
    /// synthesizes its own paint from the arguments.
    pub fn draw_shadow(
        &mut self,
        path: &Path,
        color: Color,
        elevation: f32,
        transparent_occluder: bool,
        device_pixel_ratio: f32,
    ) {
        let bounds = Self::shadow_bounds(&path.bounds(), elevation, device_pixel_ratio);
        let op = DisplayListOp::DrawShadow {
            path: path.clone(),
            color,
            elevation,
            transparent_occluder,
            device_pixel_ratio,
        };
        self.render_op(op, Some(bounds), OpFlags::DRAW_SHADOW, &Paint::default(), true);
    }

    /// The umbra tracks the occluder while the penumbra spreads and
    /// shifts toward the surface with elevation; pad every side and
    /// extend further below.
    fn shadow_bounds(occluder: &Rect, elevation: f32, device_pixel_ratio: f32) -> Rect {
        let spread = elevation.max(0.0) * device_pixel_ratio.max(1.0);
        let padded = occluder.outset(spread, spread);
        padded.union(&padded.translated(0.0, spread * 0.5))
    }

    /// Embed a finished recording, replayed with `opacity` in `[0, 1]`.
    pub fn draw_display_list(&mut self, list: &Arc<DisplayList>, opacity: f32) {
        if list.op_count() == 0 && list.total_op_count() == 0 {
            return;
        }
        if self.current_info().is_nop {
            return;
        }
        if !list.is_ui_thread_safe() {
            self.ui_thread_safe = false;
        }

        self.check_for_deferred_save();
        let bounds = list.bounds();
        let op_index = self
            .stream
            .push(DisplayListOp::DrawDisplayList { list: Arc::clone(list), opacity });
        self.render_op_count += 1;
        // The embedded list carries its own depth plus one pass to
        // composite it here.
        self.depth += list.total_depth() + 1;
        self.nested_op_count += list.total_op_count();
        self.nested_byte_size += list.total_byte_size();

        self.accumulate_draw_bounds(&bounds, op_index);

        let opacity_compatible = list.can_apply_group_opacity() || opacity >= 1.0;
        let mut layer = self.current_info().layer_info.borrow_mut();
        layer.max_blend_mode = layer.max_blend_mode.max(list.max_blend_mode());
        layer.affects_transparent_layer |= list.modifies_transparent_black();
        if !opacity_compatible {
            layer.opacity_incompatible_op_detected = true;
        }
    }

    fn render_with_snapshot(&mut self, op: DisplayListOp, bounds: Rect, flags: OpFlags) {
        let paint = self.paint.clone();
        let compatible = self.current_opacity_compatibility;
        self.render_op(op, Some(bounds), flags, &paint, compatible);
    }

    /// The common draw-op path: classify, commit the deferred save, write
    /// the record, and fold bounds into the accumulators and rtree.
    /// `local_bounds` of `None` floods the surface.
    fn render_op(
        &mut self,
        op: DisplayListOp,
        local_bounds: Option<Rect>,
        flags: OpFlags,
        paint: &Paint,
        opacity_base: bool,
    ) {
        if self.current_info().is_nop {
            return;
        }
        let result = Self::classify_paint(paint, flags);
        if result == PaintResult::NoEffect {
            return;
        }
        let local_bounds = if flags.floods_surface { None } else { local_bounds };

        self.check_for_deferred_save();
        let op_index = self.stream.push(op);
        self.render_op_count += 1;
        self.depth += Self::render_op_depth_cost(paint, flags);

        match local_bounds.and_then(|bounds| Self::adjust_bounds_for_paint(bounds, paint, flags)) {
            Some(adjusted) => self.accumulate_draw_bounds(&adjusted, op_index),
            None => {
                self.accumulate_unbounded_current();
                self.push_flood_rtree_entry(op_index);
            }
        }

        let stroked = flags.is_stroked(paint.draw_style == DrawStyle::Stroke);
        let hairline = stroked && paint.stroke_width <= 0.0;
        let compatible = opacity_base && !hairline;
        let mut layer = self.current_info().layer_info.borrow_mut();
        if flags.uses_blend {
            layer.max_blend_mode = layer.max_blend_mode.max(paint.blend_mode);
        } else {
            layer.max_blend_mode = layer.max_blend_mode.max(BlendMode::SrcOver);
        }
        if result == PaintResult::AffectsAll && Self::filters_modify_transparent_black(paint, flags)
        {
            layer.affects_transparent_layer = true;
        }
        if !compatible {
            layer.opacity_incompatible_op_detected = true;
        }
    }

    fn classify_paint(paint: &Paint, flags: OpFlags) -> PaintResult {
        if flags.ignores_paint {
            return PaintResult::AffectsAll;
        }
        let mode = if flags.uses_blend { paint.blend_mode } else { BlendMode::SrcOver };
        if mode == BlendMode::Dst {
            return PaintResult::NoEffect;
        }
        if flags.uses_color
            && paint.color.is_transparent()
            && mode.transparent_src_is_noop()
            && !Self::filters_modify_transparent_black(paint, flags)
        {
            // A color source's alpha is modulated by the paint alpha, so a
            // fully transparent color draws nothing either way.
            return PaintResult::NoEffect;
        }
        if mode.preserves_transparency() {
            PaintResult::PreservesTransparency
        } else {
            PaintResult::AffectsAll
        }
    }

    fn filters_modify_transparent_black(paint: &Paint, flags: OpFlags) -> bool {
        (flags.uses_color_filter
            && paint
                .color_filter
                .as_ref()
                .is_some_and(|filter| filter.modifies_transparent_black()))
            || (flags.uses_image_filter
                && paint
                    .image_filter
                    .as_ref()
                    .is_some_and(|filter| filter.modifies_transparent_black()))
    }

    /// Ops whose attributes force an implicit intermediate surface cost an
    /// extra compositing pass.
    fn render_op_depth_cost(paint: &Paint, flags: OpFlags) -> u64 {
        if flags.uses_image_filter && paint.image_filter.is_some() {
            2
        } else {
            1
        }
    }

    /// Grow geometry bounds by everything the paint can paint outside
    /// them. `None` means the result cannot be bounded.
    fn adjust_bounds_for_paint(bounds: Rect, paint: &Paint, flags: OpFlags) -> Option<Rect> {
        if flags.ignores_paint {
            return Some(bounds);
        }
        let mut pad = 0.0f32;

        if flags.uses_path_effect && let Some(effect) = &paint.path_effect {
            pad += effect.bounds_outset()?;
        }

        if flags.is_stroked(paint.draw_style == DrawStyle::Stroke) {
            // Hairline strokes still cover about half a pixel either side.
            let mut half_width = (paint.stroke_width * 0.5).max(0.5);
            if flags.may_have_joins && paint.stroke_join == StrokeJoin::Miter {
                half_width *= paint.stroke_miter.max(1.0);
            }
            if flags.may_have_caps && paint.stroke_cap == StrokeCap::Square {
                half_width *= SQRT_2;
            }
            pad += half_width;
        }

        if flags.uses_mask_filter && let Some(filter) = &paint.mask_filter {
            pad += filter.bounds_outset();
        }

        let mut adjusted = if pad > 0.0 { bounds.outset(pad, pad) } else { bounds };
        if !adjusted.is_finite() {
            return None;
        }

        if flags.uses_image_filter && let Some(filter) = &paint.image_filter {
            adjusted = filter.map_local_bounds(&adjusted)?;
        }
        Some(adjusted)
    }

    /// Map adjusted local bounds through both coordinate frames and fold
    /// them into the current accumulators and rtree. Fully clipped bounds
    /// contribute nothing; unmappable transforms degrade to unbounded.
    fn accumulate_draw_bounds(&mut self, bounds: &Rect, op_index: usize) {
        let info = self.current_info();
        match info.global_state.map_and_clip(bounds) {
            Ok(Some(device)) => {
                let layer_mapped = info.layer_state.map_and_clip(bounds);
                let layer_info = Rc::clone(&info.layer_info);
                let mut layer = layer_info.borrow_mut();
                layer.global_space_accumulator.accumulate(&device);
                match layer_mapped {
                    Ok(Some(local)) => layer.layer_local_accumulator.accumulate(&local),
                    Ok(None) => {}
                    Err(()) => layer.layer_local_accumulator.set_unbounded(),
                }
                drop(layer);
                if let Some(rtree) = self.rtree_data.as_mut() {
                    rtree.push(device, op_index);
                }
            }
            // Clipped out entirely: the op stays in the stream but grows
            // nothing.
            Ok(None) => {}
            Err(()) => {
                self.accumulate_unbounded_current();
                self.push_flood_rtree_entry(op_index);
            }
        }
    }

    /// Fold "covers everything visible" into the current scope: the device
    /// cull rect when it is a real bound, the unbounded sentinel when the
    /// recording has no meaningful cull.
    fn accumulate_unbounded_current(&mut self) {
        let info = self.current_info();
        let layer_info = Rc::clone(&info.layer_info);
        let device_cull = info.global_state.device_cull_rect();
        let local_cull = info.layer_state.device_cull_rect();
        let mut layer = layer_info.borrow_mut();
        if device_cull == MAX_CULL_RECT {
            layer.global_space_accumulator.set_unbounded();
        } else {
            layer.global_space_accumulator.accumulate(&device_cull);
        }
        if local_cull == MAX_CULL_RECT {
            layer.layer_local_accumulator.set_unbounded();
        } else {
            layer.layer_local_accumulator.accumulate(&local_cull);
        }
    }

    /// Accumulate bounds expressed in the current local space (used when a
    /// restored layer folds its filtered content into the parent).
    fn accumulate_local_bounds(&mut self, bounds: &Rect) {
        let info = self.current_info();
        let layer_info = Rc::clone(&info.layer_info);
        let global = info.global_state.map_and_clip(bounds);
        let local = info.layer_state.map_and_clip(bounds);
        let mut layer = layer_info.borrow_mut();
        match global {
            Ok(Some(device)) => layer.global_space_accumulator.accumulate(&device),
            Ok(None) => {}
            Err(()) => layer.global_space_accumulator.set_unbounded(),
        }
        match local {
            Ok(Some(mapped)) => layer.layer_local_accumulator.accumulate(&mapped),
            Ok(None) => {}
            Err(()) => layer.layer_local_accumulator.set_unbounded(),
        }
    }

    fn push_flood_rtree_entry(&mut self, op_index: usize) {
        let cull = self.current_info().global_state.device_cull_rect();
        if cull != MAX_CULL_RECT
            && let Some(rtree) = self.rtree_data.as_mut()
        {
            rtree.push(cull, op_index);
        }
    }

    // ---- finish --------------------------------------------------------

    /// Finish recording. Outstanding save scopes are restored first.
    pub fn build(mut self) -> DisplayList {
        if !self.save_stack.is_empty() {
            log::warn!(
                target: LOG_TARGET,
                "build with {} unrestored save scope(s)",
                self.save_stack.len()
            );
            self.restore_to_count(1);
        }

        let (bounds, max_blend_mode, group_opacity, affects_transparent, backdrop) = {
            let layer = self.root_info.layer_info.borrow();
            (
                Self::resolve_bounds(&layer.global_space_accumulator, &self.original_cull_rect),
                layer.max_blend_mode,
                layer.is_group_opacity_compatible(),
                layer.affects_transparent_layer,
                layer.contains_backdrop_filter,
            )
        };

        log::debug!(
            target: LOG_TARGET,
            "built list: {} ops ({} render), {} bytes, depth {}",
            self.stream.len(),
            self.render_op_count,
            self.stream.byte_size(),
            self.depth
        );

        let byte_size = self.stream.byte_size();
        DisplayList::new(
            self.stream.into_ops(),
            byte_size,
            self.nested_op_count,
            self.nested_byte_size,
            bounds,
            self.depth,
            max_blend_mode,
            group_opacity,
            self.ui_thread_safe,
            affects_transparent,
            backdrop,
            self.rtree_data.map(RTreeData::build),
        )
    }

    /// Unbounded accumulation resolves to the cull rect, maximal or not;
    /// content known to cover everything must never report less.
    fn resolve_bounds(accumulator: &AccumulationRect, cull_rect: &Rect) -> Rect {
        if accumulator.is_unbounded() {
            *cull_rect
        } else {
            accumulator.bounds().unwrap_or(Rect::EMPTY)
        }
    }

    // ---- verification hooks --------------------------------------------

    /// The live attribute snapshot (verification only).
    pub fn current_attributes(&self) -> &Paint {
        &self.paint
    }

    /// Index of the most recently written op, if any (verification only).
    pub fn last_op_index(&self) -> Option<usize> {
        self.stream.len().checked_sub(1)
    }

    pub fn op_count(&self) -> usize {
        self.stream.len()
    }

    pub fn byte_size(&self) -> usize {
        self.stream.byte_size()
    }

    pub fn depth(&self) -> u64 {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CULL: Rect = Rect::from_ltrb(0.0, 0.0, 100.0, 100.0);

    fn builder() -> DisplayListBuilder {
        DisplayListBuilder::new(&CULL, false)
    }

    #[test]
    fn attribute_noop_suppression() {
        let mut builder = builder();
        builder.set_anti_alias(true);
        assert_eq!(builder.op_count(), 1);
        builder.set_anti_alias(true);
        assert_eq!(builder.op_count(), 1);
        builder.set_color(Color::BLACK);
        assert_eq!(builder.op_count(), 1);
        builder.set_color(Color::WHITE);
        assert_eq!(builder.op_count(), 2);
    }

    #[test]
    fn empty_save_restore_pair_is_elided() {
        let mut builder = builder();
        builder.save();
        builder.restore();
        assert_eq!(builder.op_count(), 0);
        assert_eq!(builder.save_count(), 1);
    }

    #[test]
    fn committed_save_writes_balanced_ops() {
        let mut builder = builder();
        builder.save();
        builder.draw_rect(&Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
        builder.restore();
        // Save, DrawRect, Restore.
        assert_eq!(builder.op_count(), 3);
    }

    #[test]
    fn only_innermost_pending_save_commits() {
        let mut builder = builder();
        builder.save();
        builder.save();
        builder.draw_rect(&Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
        builder.restore();
        builder.restore();
        // The outer scope saw no state changes and is elided.
        assert_eq!(builder.op_count(), 3);
    }

    #[test]
    fn restore_to_count_is_idempotent_at_current_count() {
        let mut builder = builder();
        builder.save();
        builder.save();
        let count = builder.save_count();
        builder.restore_to_count(count);
        assert_eq!(builder.save_count(), count);
        builder.restore_to_count(1);
        assert_eq!(builder.save_count(), 1);
        builder.restore_to_count(0);
        assert_eq!(builder.save_count(), 1);
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let mut builder = builder();
        builder.restore();
        assert_eq!(builder.save_count(), 1);
        assert_eq!(builder.op_count(), 0);
    }

    #[test]
    fn translate_round_trip_restores_identity() {
        let mut builder = builder();
        builder.translate(10.0, 7.5);
        builder.translate(-10.0, -7.5);
        assert!(builder.current_transform().is_identity());
    }

    #[test]
    fn set_transform_replaces_current() {
        let mut builder = builder();
        builder.translate(3.0, 4.0);
        let target = Matrix::from_affine(2.0, 0.0, 5.0, 0.0, 2.0, 6.0);
        builder.set_transform(&target);
        assert_eq!(*builder.current_transform(), target);
    }

    #[test]
    fn transparent_draw_is_dropped() {
        let mut builder = builder();
        builder.set_color(Color::TRANSPARENT);
        let before = builder.op_count();
        builder.draw_rect(&Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
        assert_eq!(builder.op_count(), before);
        assert_eq!(builder.depth(), 0);
    }

    #[test]
    fn dst_blend_draw_is_dropped() {
        let mut builder = builder();
        builder.set_blend_mode(BlendMode::Dst);
        let before = builder.op_count();
        builder.draw_rect(&Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
        assert_eq!(builder.op_count(), before);
    }

    #[test]
    fn depth_counts_five_plain_rects() {
        let mut builder = builder();
        for i in 0..5 {
            builder.draw_rect(&Rect::from_xywh(i as f32 * 10.0, 0.0, 5.0, 5.0));
        }
        assert_eq!(builder.depth(), 5);
    }

    #[test]
    fn image_filter_doubles_depth_cost() {
        let mut builder = builder();
        builder.set_image_filter(Some(Arc::new(ImageFilter::Blur {
            sigma_x: 1.0,
            sigma_y: 1.0,
        })));
        builder.draw_rect(&Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
        assert_eq!(builder.depth(), 2);
    }

    #[test]
    fn clip_intersect_never_grows() {
        let mut builder = builder();
        builder.clip_rect(&Rect::from_xywh(10.0, 10.0, 20.0, 20.0), ClipOp::Intersect, false);
        assert_eq!(builder.destination_clip_bounds(), Rect::from_ltrb(10.0, 10.0, 30.0, 30.0));
        builder.clip_rect(&Rect::from_xywh(0.0, 0.0, 500.0, 500.0), ClipOp::Intersect, false);
        assert_eq!(builder.destination_clip_bounds(), Rect::from_ltrb(10.0, 10.0, 30.0, 30.0));
    }

    #[test]
    fn difference_clip_never_shrinks_interior() {
        let mut builder = builder();
        let before = builder.destination_clip_bounds();
        builder.clip_rect(&Rect::from_xywh(40.0, 40.0, 10.0, 10.0), ClipOp::Difference, false);
        assert_eq!(builder.destination_clip_bounds(), before);
    }

    #[test]
    fn stroke_width_pads_bounds() {
        let mut builder = builder();
        builder.set_draw_style(DrawStyle::Stroke);
        builder.set_stroke_width(4.0);
        builder.set_stroke_join(StrokeJoin::Bevel);
        builder.draw_rect(&Rect::from_xywh(10.0, 10.0, 20.0, 20.0));
        let list = builder.build();
        assert_eq!(list.bounds(), Rect::from_ltrb(8.0, 8.0, 32.0, 32.0));
    }

    #[test]
    fn snapshot_stays_current_without_emission() {
        let mut builder = builder();
        builder.set_color(Color::WHITE);
        builder.set_color(Color::WHITE);
        assert_eq!(builder.current_attributes().color, Color::WHITE);
        assert_eq!(builder.op_count(), 1);
        assert_eq!(builder.last_op_index(), Some(0));
    }

    #[test]
    fn empty_backdrop_layer_covers_the_clip() {
        let mut builder = builder();
        let blur = Arc::new(ImageFilter::Blur { sigma_x: 2.0, sigma_y: 2.0 });
        builder.save_layer(None, None, Some(blur));
        builder.restore();
        let list = builder.build();
        // The filter reads and rewrites everything under the clip even
        // though the layer recorded no content.
        assert_eq!(list.bounds(), CULL);
        assert!(list.contains_backdrop_filter());
    }

    #[test]
    fn backdrop_layer_bounds_ignore_its_content() {
        let mut builder = builder();
        let blur = Arc::new(ImageFilter::Blur { sigma_x: 2.0, sigma_y: 2.0 });
        builder.save_layer(None, None, Some(blur));
        builder.draw_rect(&Rect::from_xywh(10.0, 10.0, 5.0, 5.0));
        builder.restore();
        let list = builder.build();
        assert_eq!(list.bounds(), CULL);
    }

    #[test]
    fn flood_without_cull_reports_the_maximal_rect() {
        let mut builder = DisplayListBuilder::new(&MAX_CULL_RECT, false);
        builder.draw_paint();
        let list = builder.build();
        assert_eq!(list.bounds(), MAX_CULL_RECT);
    }

    #[test]
    fn image_nine_bounds_are_the_destination() {
        let mut builder = builder();
        let image = Arc::new(Image::new(1, 30, 30));
        builder.draw_image_nine(
            &image,
            &Rect::from_xywh(10.0, 10.0, 10.0, 10.0),
            &Rect::from_xywh(5.0, 5.0, 60.0, 40.0),
            false,
        );
        let list = builder.build();
        assert_eq!(list.bounds(), Rect::from_ltrb(5.0, 5.0, 65.0, 45.0));
    }

    #[test]
    fn shadow_bounds_exceed_the_occluder() {
        let mut builder = builder();
        let path = Path::rect(Rect::from_xywh(20.0, 20.0, 10.0, 10.0));
        builder.draw_shadow(&path, Color::BLACK, 4.0, false, 1.0);
        let list = builder.build();
        let bounds = list.bounds();
        assert!(bounds.left < 20.0);
        assert!(bounds.top < 20.0);
        assert!(bounds.right > 30.0);
        assert!(bounds.bottom > 30.0);
    }

    #[test]
    fn vertices_disqualify_group_opacity() {
        let mut builder = builder();
        let mesh = Arc::new(Vertices::new(Rect::from_xywh(0.0, 0.0, 20.0, 20.0), true));
        builder.draw_vertices(&mesh, BlendMode::SrcOver);
        let list = builder.build();
        assert_eq!(list.bounds(), Rect::from_ltrb(0.0, 0.0, 20.0, 20.0));
        assert!(!list.can_apply_group_opacity());
    }

    #[test]
    fn atlas_bounds_follow_the_sprite_transforms() {
        let mut builder = builder();
        let atlas = Arc::new(Image::new(2, 64, 64));
        let transforms = [RSTransform::translation(10.0, 10.0), RSTransform::translation(40.0, 40.0)];
        let tex_rects = [
            Rect::from_xywh(0.0, 0.0, 16.0, 16.0),
            Rect::from_xywh(16.0, 0.0, 16.0, 16.0),
        ];
        builder.draw_atlas(
            &atlas,
            &transforms,
            &tex_rects,
            &[],
            BlendMode::SrcOver,
            None,
            false,
        );
        let list = builder.build();
        assert_eq!(list.bounds(), Rect::from_ltrb(10.0, 10.0, 56.0, 56.0));
        assert!(list.can_apply_group_opacity());
    }

    #[test]
    fn atlas_colors_disqualify_group_opacity() {
        let mut builder = builder();
        let atlas = Arc::new(Image::new(3, 64, 64));
        builder.draw_atlas(
            &atlas,
            &[RSTransform::translation(0.0, 0.0)],
            &[Rect::from_xywh(0.0, 0.0, 16.0, 16.0)],
            &[Color::from_rgba(1.0, 0.0, 0.0, 1.0)],
            BlendMode::Modulate,
            None,
            false,
        );
        let list = builder.build();
        assert!(!list.can_apply_group_opacity());
    }
}
