//! Static attribute-usage descriptions for each draw operation.
//!
//! Bounds padding and opacity analysis both depend on which paint
//! attributes a given operation actually reads. These tables are consulted
//! at record time; nothing here is stored in the op stream.

/// Which paint attributes an operation consumes and how its geometry
/// interacts with stroking.
#[derive(Debug, Clone, Copy)]
pub struct OpFlags {
    pub ignores_paint: bool,
    pub uses_color: bool,
    pub uses_blend: bool,
    pub uses_style: bool,
    pub uses_color_source: bool,
    pub uses_color_filter: bool,
    pub uses_image_filter: bool,
    pub uses_mask_filter: bool,
    pub uses_path_effect: bool,
    /// Geometry with no interior: rendered stroked regardless of style.
    pub always_stroked: bool,
    /// Stroked geometry can produce joins, so the miter limit applies.
    pub may_have_joins: bool,
    /// Stroked geometry has open ends, so square caps extend diagonally.
    pub may_have_caps: bool,
    /// Covers the entire clip rather than a local bounds.
    pub floods_surface: bool,
}

impl OpFlags {
    const NONE: Self = Self {
        ignores_paint: false,
        uses_color: false,
        uses_blend: false,
        uses_style: false,
        uses_color_source: false,
        uses_color_filter: false,
        uses_image_filter: false,
        uses_mask_filter: false,
        uses_path_effect: false,
        always_stroked: false,
        may_have_joins: false,
        may_have_caps: false,
        floods_surface: false,
    };

    /// The common attribute set for shape draws that honor the full paint.
    const SHAPE: Self = Self {
        uses_color: true,
        uses_blend: true,
        uses_style: true,
        uses_color_source: true,
        uses_color_filter: true,
        uses_image_filter: true,
        uses_mask_filter: true,
        uses_path_effect: true,
        ..Self::NONE
    };

    pub const DRAW_COLOR: Self = Self {
        uses_color: true,
        uses_blend: true,
        floods_surface: true,
        ..Self::NONE
    };

    pub const DRAW_PAINT: Self = Self {
        uses_color: true,
        uses_blend: true,
        uses_color_source: true,
        uses_color_filter: true,
        uses_image_filter: true,
        floods_surface: true,
        ..Self::NONE
    };

    pub const DRAW_LINE: Self = Self {
        always_stroked: true,
        may_have_caps: true,
        uses_style: false,
        ..Self::SHAPE
    };

    pub const DRAW_RECT: Self = Self {
        may_have_joins: true,
        ..Self::SHAPE
    };

    pub const DRAW_OVAL: Self = Self::SHAPE;

    pub const DRAW_CIRCLE: Self = Self::SHAPE;

    pub const DRAW_ROUND_RECT: Self = Self::SHAPE;

    pub const DRAW_DOUBLE_ROUND_RECT: Self = Self::SHAPE;

    pub const DRAW_ARC: Self = Self {
        may_have_caps: true,
        may_have_joins: true,
        ..Self::SHAPE
    };

    pub const DRAW_POINTS: Self = Self {
        always_stroked: true,
        may_have_caps: true,
        uses_style: false,
        ..Self::SHAPE
    };

    pub const DRAW_LINES: Self = Self::DRAW_POINTS;

    pub const DRAW_POLYGON: Self = Self {
        may_have_joins: true,
        ..Self::DRAW_POINTS
    };

    pub const DRAW_PATH: Self = Self {
        may_have_joins: true,
        may_have_caps: true,
        ..Self::SHAPE
    };

    pub const DRAW_VERTICES: Self = Self {
        uses_color: true,
        uses_blend: true,
        uses_color_source: true,
        uses_color_filter: true,
        uses_image_filter: true,
        ..Self::NONE
    };

    pub const DRAW_IMAGE: Self = Self {
        uses_color: true,
        uses_blend: true,
        uses_color_filter: true,
        uses_image_filter: true,
        uses_mask_filter: true,
        ..Self::NONE
    };

    pub const DRAW_IMAGE_RECT: Self = Self::DRAW_IMAGE;

    pub const DRAW_IMAGE_NINE: Self = Self {
        uses_mask_filter: false,
        ..Self::DRAW_IMAGE
    };

    pub const DRAW_ATLAS: Self = Self {
        uses_color: true,
        uses_blend: true,
        uses_color_filter: true,
        uses_image_filter: true,
        ..Self::NONE
    };

    /// Shadows synthesize their own paint from the op arguments.
    pub const DRAW_SHADOW: Self = Self {
        ignores_paint: true,
        ..Self::NONE
    };

    pub const DRAW_TEXT: Self = Self {
        uses_style: false,
        uses_path_effect: false,
        ..Self::SHAPE
    };

    pub const DRAW_DISPLAY_LIST: Self = Self {
        ignores_paint: true,
        ..Self::NONE
    };

    pub const SAVE_LAYER: Self = Self {
        uses_color: true,
        uses_blend: true,
        uses_color_filter: true,
        uses_image_filter: true,
        ..Self::NONE
    };

    /// Whether a paint with the given style strokes this geometry.
    pub fn is_stroked(&self, style_is_stroke: bool) -> bool {
        self.always_stroked || (self.uses_style && style_is_stroke)
    }
}
