//! The immutable recording produced by a builder.

use display_core::{BlendMode, Rect};

use crate::ops::DisplayListOp;
use crate::receiver::DisplayListReceiver;
use crate::rtree::RTree;

/// A finished recording: the op stream plus the metadata accumulated while
/// it was recorded. Immutable and shareable; wrap in `Arc` to hand across
/// threads or embed in another recording.
#[derive(Debug)]
#[allow(clippy::struct_excessive_bools, reason = "independent recorded properties")]
pub struct DisplayList {
    ops: Vec<DisplayListOp>,
    byte_size: usize,
    nested_op_count: usize,
    nested_byte_size: usize,
    bounds: Rect,
    total_depth: u64,
    max_blend_mode: BlendMode,
    can_apply_group_opacity: bool,
    ui_thread_safe: bool,
    modifies_transparent_black: bool,
    contains_backdrop_filter: bool,
    rtree: Option<RTree>,
}

impl DisplayList {
    #[allow(
        clippy::too_many_arguments,
        clippy::fn_params_excessive_bools,
        reason = "crate-internal constructor over every recorded property"
    )]
    pub(crate) fn new(
        ops: Vec<DisplayListOp>,
        byte_size: usize,
        nested_op_count: usize,
        nested_byte_size: usize,
        bounds: Rect,
        total_depth: u64,
        max_blend_mode: BlendMode,
        can_apply_group_opacity: bool,
        ui_thread_safe: bool,
        modifies_transparent_black: bool,
        contains_backdrop_filter: bool,
        rtree: Option<RTree>,
    ) -> Self {
        Self {
            ops,
            byte_size,
            nested_op_count,
            nested_byte_size,
            bounds,
            total_depth,
            max_blend_mode,
            can_apply_group_opacity,
            ui_thread_safe,
            modifies_transparent_black,
            contains_backdrop_filter,
            rtree,
        }
    }

    /// Ops recorded directly in this list.
    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// Ops including those of embedded lists.
    pub fn total_op_count(&self) -> usize {
        self.ops.len() + self.nested_op_count
    }

    /// Approximate encoded size of this list's own ops.
    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    /// Approximate encoded size including embedded lists.
    pub fn total_byte_size(&self) -> usize {
        self.byte_size + self.nested_byte_size
    }

    /// Accumulated device-space bounds of everything recorded. Falls back
    /// to the recording's cull rect when accumulation was unbounded.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn total_depth(&self) -> u64 {
        self.total_depth
    }

    /// The highest blend mode any recorded op rendered with.
    pub fn max_blend_mode(&self) -> BlendMode {
        self.max_blend_mode
    }

    /// Whether an inherited opacity can be applied once to the whole list
    /// rather than per op.
    pub fn can_apply_group_opacity(&self) -> bool {
        self.can_apply_group_opacity
    }

    /// Advisory: no recorded payload is unsafe to share off-thread.
    pub fn is_ui_thread_safe(&self) -> bool {
        self.ui_thread_safe
    }

    /// Some recorded op can turn transparent destination pixels opaque.
    pub fn modifies_transparent_black(&self) -> bool {
        self.modifies_transparent_black
    }

    /// A backdrop-filter layer was recorded somewhere in this list.
    pub fn contains_backdrop_filter(&self) -> bool {
        self.contains_backdrop_filter
    }

    pub fn has_rtree(&self) -> bool {
        self.rtree.is_some()
    }

    pub fn rtree(&self) -> Option<&RTree> {
        self.rtree.as_ref()
    }

    /// Replay every recorded op in order. Scopes that were elided at
    /// record time simply do not appear.
    pub fn dispatch(&self, receiver: &mut impl DisplayListReceiver) {
        for op in &self.ops {
            op.dispatch(receiver);
        }
    }
}
