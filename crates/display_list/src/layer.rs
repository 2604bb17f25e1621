//! Per-save-scope records and the layer bookkeeping they share.
//!
//! Every `save`/`save_layer` pushes a [`SaveInfo`]. Plain saves share the
//! enclosing layer's [`LayerInfo`]; layer saves create a fresh one. The
//! shared handle is an `Rc<RefCell<..>>` so the relationship survives stack
//! reallocation without back pointers.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use display_core::effects::ImageFilter;
use display_core::{BlendMode, Rect};

use crate::accumulator::AccumulationRect;
use crate::matrix_clip::MatrixClipState;
use crate::ops::SaveLayerOptions;

/// The widest clip any recording starts with. Layer-local frames reset to
/// this at each layer save.
pub const MAX_CULL_RECT: Rect = Rect::from_ltrb(-1e9, -1e9, 1e9, 1e9);

/// Deferred-emission state for one scope. The terminal "restored" state is
/// the scope being popped off the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    /// Pushed, no child op recorded yet; no save op exists in the stream.
    Pending,
    /// A child op forced the save op to be written at this stream index.
    Committed { op_offset: usize },
}

/// Accumulated analysis for one compositing layer, shared by every plain
/// save scope nested inside it.
#[derive(Debug)]
pub struct LayerInfo {
    /// Content filter from the layer's paint, applied at restore.
    pub filter: Option<Arc<ImageFilter>>,
    /// Length of the rtree entry list when the layer was pushed.
    pub rtree_start_index: usize,
    /// Bounds of recorded content relative to the recording root.
    pub global_space_accumulator: AccumulationRect,
    /// Bounds of recorded content relative to this layer's origin.
    pub layer_local_accumulator: AccumulationRect,
    pub max_blend_mode: BlendMode,
    pub opacity_incompatible_op_detected: bool,
    /// Some recorded op can turn transparent layer pixels opaque even
    /// where it draws nothing (a transparent-black-modifying filter).
    pub affects_transparent_layer: bool,
    pub contains_backdrop_filter: bool,
    /// How this layer composites into its parent when it restores.
    pub blend_into_parent: BlendMode,
    /// Whether the parent may fold an inherited opacity into this layer's
    /// composite (source-over, no non-commuting color filter).
    pub opacity_compatible_into_parent: bool,
}

impl LayerInfo {
    pub fn new(filter: Option<Arc<ImageFilter>>, rtree_start_index: usize) -> Self {
        Self {
            filter,
            rtree_start_index,
            global_space_accumulator: AccumulationRect::new(),
            layer_local_accumulator: AccumulationRect::new(),
            max_blend_mode: BlendMode::Clear,
            opacity_incompatible_op_detected: false,
            affects_transparent_layer: false,
            contains_backdrop_filter: false,
            blend_into_parent: BlendMode::SrcOver,
            opacity_compatible_into_parent: true,
        }
    }

    /// Whether a single inherited opacity may be applied to the whole
    /// layer instead of per op. Overlapping content would double-blend.
    pub fn is_group_opacity_compatible(&self) -> bool {
        !self.opacity_incompatible_op_detected
            && !self.layer_local_accumulator.overlap_detected()
    }

    /// Fold a finished child layer's analysis into this one. Blends inside
    /// the child are isolated by its own compositing step, so only the
    /// child's composite blend reaches the parent.
    pub fn absorb(&mut self, child: &Self) {
        self.max_blend_mode = self.max_blend_mode.max(child.blend_into_parent);
        self.contains_backdrop_filter |= child.contains_backdrop_filter;
        self.affects_transparent_layer |= child.affects_transparent_layer;
        if !child.opacity_compatible_into_parent {
            self.opacity_incompatible_op_detected = true;
        }
    }
}

/// One entry on the save stack.
#[derive(Debug)]
pub struct SaveInfo {
    pub is_save_layer: bool,
    pub state: SaveState,
    /// Proven to draw nothing; its render ops and restore are elided.
    pub is_nop: bool,
    /// Depth counter value when the scope was pushed.
    pub save_depth: u64,
    /// Coordinate frame relative to the recording root.
    pub global_state: MatrixClipState,
    /// Coordinate frame relative to the innermost enclosing layer.
    pub layer_state: MatrixClipState,
    pub layer_info: Rc<RefCell<LayerInfo>>,
    /// `Some` for layer saves; consumed when the save op is committed.
    pub layer_options: Option<SaveLayerOptions>,
}

impl SaveInfo {
    /// The implicit root scope: a committed layer covering the whole
    /// recording. Never popped.
    pub fn root(cull_rect: Rect) -> Self {
        Self {
            is_save_layer: true,
            state: SaveState::Committed { op_offset: 0 },
            is_nop: false,
            save_depth: 0,
            global_state: MatrixClipState::new(cull_rect),
            layer_state: MatrixClipState::new(cull_rect),
            layer_info: Rc::new(RefCell::new(LayerInfo::new(None, 0))),
            layer_options: None,
        }
    }

    /// A plain save: both frames copied from the parent, layer shared.
    pub fn push_save(parent: &Self, save_depth: u64) -> Self {
        Self {
            is_save_layer: false,
            state: SaveState::Pending,
            is_nop: parent.is_nop,
            save_depth,
            global_state: parent.global_state.clone(),
            layer_state: parent.layer_state.clone(),
            layer_info: Rc::clone(&parent.layer_info),
            layer_options: None,
        }
    }

    /// A layer save: the global frame continues from the parent while the
    /// layer-local frame restarts at the layer origin with the maximal
    /// cull rect.
    pub fn push_layer(
        parent: &Self,
        layer_info: Rc<RefCell<LayerInfo>>,
        options: SaveLayerOptions,
        save_depth: u64,
        is_nop: bool,
    ) -> Self {
        Self {
            is_save_layer: true,
            state: SaveState::Pending,
            is_nop,
            save_depth,
            global_state: parent.global_state.clone(),
            layer_state: MatrixClipState::new(MAX_CULL_RECT),
            layer_info,
            layer_options: Some(options),
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self.state, SaveState::Committed { .. })
    }
}
