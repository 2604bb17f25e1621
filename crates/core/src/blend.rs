//! Blend modes.
//!
//! Declaration order follows the conventional Porter-Duff numbering with
//! `Clear` lowest, so the derived `Ord` lets a layer track the maximum mode
//! recorded into it.

use serde::{Deserialize, Serialize};

/// Pixel blend modes, Porter-Duff plus the separable and non-separable
/// advanced modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BlendMode {
    Clear,
    Src,
    Dst,
    SrcOver,
    DstOver,
    SrcIn,
    DstIn,
    SrcOut,
    DstOut,
    SrcATop,
    DstATop,
    Xor,
    Plus,
    Modulate,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Multiply,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    /// True when compositing with a fully transparent source leaves the
    /// destination unchanged, making the operation skippable.
    pub fn transparent_src_is_noop(self) -> bool {
        matches!(
            self,
            Self::SrcOver | Self::DstOver | Self::Xor | Self::Plus | Self::Screen
        )
    }

    /// True when the mode can never raise the alpha of a transparent
    /// destination pixel: output alpha is bounded by destination alpha.
    pub fn preserves_transparency(self) -> bool {
        matches!(
            self,
            Self::Clear | Self::SrcIn | Self::DstIn | Self::DstOut | Self::SrcATop | Self::Modulate
        )
    }
}

impl Default for BlendMode {
    fn default() -> Self {
        Self::SrcOver
    }
}
