//! Operation records and the append-only stream that stores them.
//!
//! Each recorded instruction is one variant of [`DisplayListOp`]: attribute
//! setters, transforms, clips, save/restore markers, and draw calls.
//! Variable-length payloads (point lists) ride inside the variant, and
//! effect handles are shared `Arc`s so a record keeps its payload alive for
//! as long as the owning list exists. Records are written in strict call
//! order and never mutated after being pushed.

use std::mem;
use std::sync::Arc;

use display_core::effects::{ColorFilter, ColorSource, ImageFilter, MaskFilter, PathEffect};
use display_core::{
    BlendMode, Color, DrawStyle, Image, Matrix, Path, Point, RSTransform, Rect, RoundRect,
    StrokeCap, StrokeJoin, TextFrame, Vertices,
};
use smallvec::SmallVec;

use crate::list::DisplayList;
use crate::matrix_clip::ClipOp;
use crate::receiver::DisplayListReceiver;

/// How a point list is interpreted by `draw_points`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointMode {
    /// Each point is rendered separately.
    Points,
    /// Points are paired into independent line segments.
    Lines,
    /// Points form a connected open polyline.
    Polygon,
}

/// Recording-time options stamped onto a committed save-layer op.
#[derive(Debug, Clone)]
pub struct SaveLayerOptions {
    /// Caller-suggested content bounds, in the local space at the save.
    pub bounds: Option<Rect>,
    /// Whether the attribute snapshot at the save applies to the layer.
    pub with_paint: bool,
    /// Filter applied to the backdrop beneath the layer before drawing.
    pub backdrop: Option<Arc<ImageFilter>>,
}

/// One recorded instruction.
#[derive(Debug, Clone)]
pub enum DisplayListOp {
    SetAntiAlias(bool),
    SetInvertColors(bool),
    SetStrokeCap(StrokeCap),
    SetStrokeJoin(StrokeJoin),
    SetDrawStyle(DrawStyle),
    SetStrokeWidth(f32),
    SetStrokeMiter(f32),
    SetColor(Color),
    SetBlendMode(BlendMode),
    SetColorSource(Option<Arc<ColorSource>>),
    SetColorFilter(Option<Arc<ColorFilter>>),
    SetImageFilter(Option<Arc<ImageFilter>>),
    SetMaskFilter(Option<Arc<MaskFilter>>),
    SetPathEffect(Option<Arc<PathEffect>>),

    Save,
    SaveLayer(SaveLayerOptions),
    Restore,

    Translate { tx: f32, ty: f32 },
    Scale { sx: f32, sy: f32 },
    Rotate { radians: f32 },
    Skew { sx: f32, sy: f32 },
    Transform2dAffine { coeffs: [f32; 6] },
    TransformFullPerspective { matrix: Matrix },
    TransformReset,

    ClipRect { rect: Rect, clip_op: ClipOp, is_aa: bool },
    ClipRoundRect { rrect: RoundRect, clip_op: ClipOp, is_aa: bool },
    ClipPath { path: Path, clip_op: ClipOp, is_aa: bool },

    DrawColor { color: Color, mode: BlendMode },
    DrawPaint,
    DrawLine { from: Point, to: Point },
    DrawRect { rect: Rect },
    DrawOval { bounds: Rect },
    DrawCircle { center: Point, radius: f32 },
    DrawRoundRect { rrect: RoundRect },
    DrawDoubleRoundRect { outer: RoundRect, inner: RoundRect },
    DrawArc { bounds: Rect, start_degrees: f32, sweep_degrees: f32, use_center: bool },
    DrawPoints { mode: PointMode, points: SmallVec<Point, 8> },
    DrawPath { path: Path },
    DrawVertices { vertices: Arc<Vertices>, mode: BlendMode },
    DrawImage { image: Arc<Image>, top_left: Point, with_paint: bool },
    DrawImageRect { image: Arc<Image>, src: Rect, dst: Rect, with_paint: bool },
    DrawImageNine { image: Arc<Image>, center: Rect, dst: Rect, with_paint: bool },
    DrawAtlas {
        atlas: Arc<Image>,
        transforms: Vec<RSTransform>,
        tex_rects: Vec<Rect>,
        colors: Vec<Color>,
        mode: BlendMode,
        cull_rect: Option<Rect>,
        with_paint: bool,
    },
    DrawTextFrame { frame: Arc<TextFrame>, origin: Point },
    DrawShadow {
        path: Path,
        color: Color,
        elevation: f32,
        transparent_occluder: bool,
        device_pixel_ratio: f32,
    },
    DrawDisplayList { list: Arc<DisplayList>, opacity: f32 },
}

impl DisplayListOp {
    /// Approximate encoded size: the record itself plus any spilled
    /// trailing array. Used for byte accounting, not allocation.
    pub fn byte_size(&self) -> usize {
        let base = mem::size_of::<Self>();
        match self {
            Self::DrawPoints { points, .. } => base + mem::size_of_val(points.as_slice()),
            Self::DrawAtlas { transforms, tex_rects, colors, .. } => {
                base + mem::size_of_val(transforms.as_slice())
                    + mem::size_of_val(tex_rects.as_slice())
                    + mem::size_of_val(colors.as_slice())
            }
            _ => base,
        }
    }

    /// Invoke the receiver callback matching this record.
    pub fn dispatch(&self, receiver: &mut impl DisplayListReceiver) {
        match self {
            Self::SetAntiAlias(value) => receiver.set_anti_alias(*value),
            Self::SetInvertColors(value) => receiver.set_invert_colors(*value),
            Self::SetStrokeCap(cap) => receiver.set_stroke_cap(*cap),
            Self::SetStrokeJoin(join) => receiver.set_stroke_join(*join),
            Self::SetDrawStyle(style) => receiver.set_draw_style(*style),
            Self::SetStrokeWidth(width) => receiver.set_stroke_width(*width),
            Self::SetStrokeMiter(miter) => receiver.set_stroke_miter(*miter),
            Self::SetColor(color) => receiver.set_color(*color),
            Self::SetBlendMode(mode) => receiver.set_blend_mode(*mode),
            Self::SetColorSource(source) => receiver.set_color_source(source.as_ref()),
            Self::SetColorFilter(filter) => receiver.set_color_filter(filter.as_ref()),
            Self::SetImageFilter(filter) => receiver.set_image_filter(filter.as_ref()),
            Self::SetMaskFilter(filter) => receiver.set_mask_filter(filter.as_ref()),
            Self::SetPathEffect(effect) => receiver.set_path_effect(effect.as_ref()),
            Self::Save => receiver.save(),
            Self::SaveLayer(options) => receiver.save_layer(options),
            Self::Restore => receiver.restore(),
            Self::Translate { tx, ty } => receiver.translate(*tx, *ty),
            Self::Scale { sx, sy } => receiver.scale(*sx, *sy),
            Self::Rotate { radians } => receiver.rotate(*radians),
            Self::Skew { sx, sy } => receiver.skew(*sx, *sy),
            Self::Transform2dAffine { coeffs } => receiver.transform_2d_affine(*coeffs),
            Self::TransformFullPerspective { matrix } => {
                receiver.transform_full_perspective(matrix);
            }
            Self::TransformReset => receiver.transform_reset(),
            Self::ClipRect { rect, clip_op, is_aa } => receiver.clip_rect(rect, *clip_op, *is_aa),
            Self::ClipRoundRect { rrect, clip_op, is_aa } => {
                receiver.clip_round_rect(rrect, *clip_op, *is_aa);
            }
            Self::ClipPath { path, clip_op, is_aa } => receiver.clip_path(path, *clip_op, *is_aa),
            Self::DrawColor { color, mode } => receiver.draw_color(*color, *mode),
            Self::DrawPaint => receiver.draw_paint(),
            Self::DrawLine { from, to } => receiver.draw_line(*from, *to),
            Self::DrawRect { rect } => receiver.draw_rect(rect),
            Self::DrawOval { bounds } => receiver.draw_oval(bounds),
            Self::DrawCircle { center, radius } => receiver.draw_circle(*center, *radius),
            Self::DrawRoundRect { rrect } => receiver.draw_round_rect(rrect),
            Self::DrawDoubleRoundRect { outer, inner } => {
                receiver.draw_double_round_rect(outer, inner);
            }
            Self::DrawArc { bounds, start_degrees, sweep_degrees, use_center } => {
                receiver.draw_arc(bounds, *start_degrees, *sweep_degrees, *use_center);
            }
            Self::DrawPoints { mode, points } => receiver.draw_points(*mode, points),
            Self::DrawPath { path } => receiver.draw_path(path),
            Self::DrawVertices { vertices, mode } => receiver.draw_vertices(vertices, *mode),
            Self::DrawImage { image, top_left, with_paint } => {
                receiver.draw_image(image, *top_left, *with_paint);
            }
            Self::DrawImageRect { image, src, dst, with_paint } => {
                receiver.draw_image_rect(image, src, dst, *with_paint);
            }
            Self::DrawImageNine { image, center, dst, with_paint } => {
                receiver.draw_image_nine(image, center, dst, *with_paint);
            }
            Self::DrawAtlas { atlas, transforms, tex_rects, colors, mode, cull_rect, with_paint } => {
                receiver.draw_atlas(
                    atlas,
                    transforms,
                    tex_rects,
                    colors,
                    *mode,
                    cull_rect.as_ref(),
                    *with_paint,
                );
            }
            Self::DrawTextFrame { frame, origin } => receiver.draw_text_frame(frame, *origin),
            Self::DrawShadow { path, color, elevation, transparent_occluder, device_pixel_ratio } => {
                receiver.draw_shadow(
                    path,
                    *color,
                    *elevation,
                    *transparent_occluder,
                    *device_pixel_ratio,
                );
            }
            Self::DrawDisplayList { list, opacity } => receiver.draw_display_list(list, *opacity),
        }
    }
}

/// Append-only arena of operation records with running byte accounting.
#[derive(Debug, Default)]
pub struct OpStream {
    ops: Vec<DisplayListOp>,
    byte_size: usize,
}

impl OpStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, returning its index in the stream.
    pub fn push(&mut self, op: DisplayListOp) -> usize {
        self.byte_size += op.byte_size();
        self.ops.push(op);
        self.ops.len() - 1
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    pub fn last(&self) -> Option<&DisplayListOp> {
        self.ops.last()
    }

    pub fn into_ops(self) -> Vec<DisplayListOp> {
        self.ops
    }
}
