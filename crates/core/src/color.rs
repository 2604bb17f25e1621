//! Straight-alpha RGBA color.

use serde::{Deserialize, Serialize};

/// A color with straight (non-premultiplied) alpha, components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Color {
    pub const TRANSPARENT: Self = Self::from_rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::from_rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::from_rgba(1.0, 1.0, 1.0, 1.0);
    pub const MID_GREY: Self = Self::from_rgba(0.5, 0.5, 0.5, 1.0);

    pub const fn from_rgba(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha <= 0.0
    }

    pub fn is_opaque(&self) -> bool {
        self.alpha >= 1.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_predicates() {
        assert!(Color::TRANSPARENT.is_transparent());
        assert!(Color::BLACK.is_opaque());
        let half = Color::WHITE.with_alpha(0.5);
        assert!(!half.is_transparent());
        assert!(!half.is_opaque());
    }
}
