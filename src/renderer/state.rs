use crate::error::ColorParseError;
use crate::math::{hex_to_rgba, Color};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlendMode {
    /// src-alpha, one-minus-src-alpha.
    Alpha,
    /// src-alpha, one.
    Additive,
    Disabled,
}

impl BlendMode {
    /// `"alpha"`, `"add"` and `"additive"` are recognized; anything else,
    /// including no name at all, disables blending.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("alpha") => BlendMode::Alpha,
            Some("add") | Some("additive") => BlendMode::Additive,
            _ => BlendMode::Disabled,
        }
    }
}

/// Anchor used by `rect` and `image` for their `x, y` arguments.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RectMode {
    #[default]
    Corner,
    Center,
}

impl RectMode {
    /// Top-left corner for a shape of size `w x h` anchored at `x, y`.
    pub fn corner(self, x: f32, y: f32, w: f32, h: f32) -> (f32, f32) {
        match self {
            RectMode::Corner => (x, y),
            RectMode::Center => (x - w * 0.5, y - h * 0.5),
        }
    }
}

/// Argument to `background`.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    /// Any string accepted by [`hex_to_rgba`].
    Named(String),
    /// Opaque gray, intensity in `[0, 1]`.
    Gray(f32),
    Rgba(Color),
}

impl Background {
    pub fn resolve(&self) -> Result<Color, ColorParseError> {
        match self {
            Background::Named(s) => hex_to_rgba(s).map(|c| *c),
            Background::Gray(v) => Ok(Color::gray(*v)),
            Background::Rgba(c) => Ok(*c),
        }
    }
}

impl From<&str> for Background {
    fn from(s: &str) -> Self {
        Background::Named(s.to_owned())
    }
}

impl From<f32> for Background {
    fn from(v: f32) -> Self {
        Background::Gray(v)
    }
}

impl From<Color> for Background {
    fn from(c: Color) -> Self {
        Background::Rgba(c)
    }
}

/// Colors and anchors consulted by the primitive calls.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawState {
    pub tint: Color,
    pub fill: Color,
    pub stroke: Color,
    pub rect_mode: RectMode,
    pub image_mode: RectMode,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            tint: Color::WHITE,
            fill: Color::WHITE,
            stroke: Color::BLACK,
            rect_mode: RectMode::Corner,
            image_mode: RectMode::Corner,
        }
    }
}
