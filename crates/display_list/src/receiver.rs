//! The replay visitor.
//!
//! A built list replays by invoking one callback per recorded op, in
//! recording order. Every method has a no-op default so receivers only
//! implement the ops they care about.

use std::sync::Arc;

use display_core::effects::{ColorFilter, ColorSource, ImageFilter, MaskFilter, PathEffect};
use display_core::{
    BlendMode, Color, DrawStyle, Image, Matrix, Path, Point, RSTransform, Rect, RoundRect,
    StrokeCap, StrokeJoin, TextFrame, Vertices,
};

use crate::list::DisplayList;
use crate::matrix_clip::ClipOp;
use crate::ops::{PointMode, SaveLayerOptions};

/// Per-op callbacks invoked during replay.
#[allow(unused_variables, reason = "default bodies ignore their arguments")]
pub trait DisplayListReceiver {
    fn set_anti_alias(&mut self, value: bool) {}
    fn set_invert_colors(&mut self, value: bool) {}
    fn set_stroke_cap(&mut self, cap: StrokeCap) {}
    fn set_stroke_join(&mut self, join: StrokeJoin) {}
    fn set_draw_style(&mut self, style: DrawStyle) {}
    fn set_stroke_width(&mut self, width: f32) {}
    fn set_stroke_miter(&mut self, miter: f32) {}
    fn set_color(&mut self, color: Color) {}
    fn set_blend_mode(&mut self, mode: BlendMode) {}
    fn set_color_source(&mut self, source: Option<&Arc<ColorSource>>) {}
    fn set_color_filter(&mut self, filter: Option<&Arc<ColorFilter>>) {}
    fn set_image_filter(&mut self, filter: Option<&Arc<ImageFilter>>) {}
    fn set_mask_filter(&mut self, filter: Option<&Arc<MaskFilter>>) {}
    fn set_path_effect(&mut self, effect: Option<&Arc<PathEffect>>) {}

    fn save(&mut self) {}
    fn save_layer(&mut self, options: &SaveLayerOptions) {}
    fn restore(&mut self) {}

    fn translate(&mut self, tx: f32, ty: f32) {}
    fn scale(&mut self, sx: f32, sy: f32) {}
    fn rotate(&mut self, radians: f32) {}
    fn skew(&mut self, sx: f32, sy: f32) {}
    fn transform_2d_affine(&mut self, coeffs: [f32; 6]) {}
    fn transform_full_perspective(&mut self, matrix: &Matrix) {}
    fn transform_reset(&mut self) {}

    fn clip_rect(&mut self, rect: &Rect, clip_op: ClipOp, is_aa: bool) {}
    fn clip_round_rect(&mut self, rrect: &RoundRect, clip_op: ClipOp, is_aa: bool) {}
    fn clip_path(&mut self, path: &Path, clip_op: ClipOp, is_aa: bool) {}

    fn draw_color(&mut self, color: Color, mode: BlendMode) {}
    fn draw_paint(&mut self) {}
    fn draw_line(&mut self, from: Point, to: Point) {}
    fn draw_rect(&mut self, rect: &Rect) {}
    fn draw_oval(&mut self, bounds: &Rect) {}
    fn draw_circle(&mut self, center: Point, radius: f32) {}
    fn draw_round_rect(&mut self, rrect: &RoundRect) {}
    fn draw_double_round_rect(&mut self, outer: &RoundRect, inner: &RoundRect) {}
    fn draw_arc(&mut self, bounds: &Rect, start_degrees: f32, sweep_degrees: f32, use_center: bool) {
    }
    fn draw_points(&mut self, mode: PointMode, points: &[Point]) {}
    fn draw_path(&mut self, path: &Path) {}
    fn draw_vertices(&mut self, vertices: &Arc<Vertices>, mode: BlendMode) {}
    fn draw_image(&mut self, image: &Arc<Image>, top_left: Point, with_paint: bool) {}
    fn draw_image_rect(&mut self, image: &Arc<Image>, src: &Rect, dst: &Rect, with_paint: bool) {}
    fn draw_image_nine(&mut self, image: &Arc<Image>, center: &Rect, dst: &Rect, with_paint: bool) {
    }
    fn draw_atlas(
        &mut self,
        atlas: &Arc<Image>,
        transforms: &[RSTransform],
        tex_rects: &[Rect],
        colors: &[Color],
        mode: BlendMode,
        cull_rect: Option<&Rect>,
        with_paint: bool,
    ) {
    }
    fn draw_text_frame(&mut self, frame: &Arc<TextFrame>, origin: Point) {}
    fn draw_shadow(
        &mut self,
        path: &Path,
        color: Color,
        elevation: f32,
        transparent_occluder: bool,
        device_pixel_ratio: f32,
    ) {
    }
    fn draw_display_list(&mut self, list: &Arc<DisplayList>, opacity: f32) {}
}
