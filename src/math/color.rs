use crate::error::ColorParseError;
use bytemuck::{Pod, Zeroable};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

/// Straight-alpha RGBA color with channels normalized to `[0, 1]`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    #[inline]
    pub fn gray(intensity: f32) -> Self {
        let v = intensity.clamp(0.0, 1.0);
        Self::new(v, v, v, 1.0)
    }

    /// Copy of `self` with the alpha channel replaced.
    #[inline]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// A pass drawn with this color is skipped when alpha is exactly zero.
    #[inline]
    pub fn is_visible(self) -> bool {
        self.a != 0.0
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; 4]> for Color {
    fn from(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

fn cache() -> &'static Mutex<HashMap<String, Arc<Color>>> {
    static CACHE: OnceLock<Mutex<HashMap<String, Arc<Color>>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Parses `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(r,g,b)` and
/// `rgba(r,g,b,a)` into a normalized color.
///
/// Results are memoized per input string for the lifetime of the process:
/// asking twice for the same string hands back the same `Arc`.
pub fn hex_to_rgba(input: &str) -> Result<Arc<Color>, ColorParseError> {
    let mut table = cache().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(color) = table.get(input) {
        return Ok(Arc::clone(color));
    }

    let color = Arc::new(parse(input)?);
    table.insert(input.to_owned(), Arc::clone(&color));
    log::trace!("cached color {:?} -> {:?}", input, color);
    Ok(color)
}

fn parse(input: &str) -> Result<Color, ColorParseError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ColorParseError::Empty);
    }

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(input.to_owned()));
    }

    let lower = s.to_ascii_lowercase();
    if let Some(args) = function_args(&lower, "rgba") {
        return parse_components(args, true)
            .ok_or_else(|| ColorParseError::InvalidFunction(input.to_owned()));
    }
    if let Some(args) = function_args(&lower, "rgb") {
        return parse_components(args, false)
            .ok_or_else(|| ColorParseError::InvalidFunction(input.to_owned()));
    }

    Err(ColorParseError::Unrecognized(input.to_owned()))
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Color::from_rgba8(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
        4 => Some(Color::from_rgba8(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, 255)),
        8 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn function_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_components(args: &str, with_alpha: bool) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }

    let number = |p: &str| p.parse::<f32>().ok().filter(|v| v.is_finite());
    let channel = |p: &str| number(p).map(|v| v.clamp(0.0, 255.0) / 255.0);
    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let a = if with_alpha {
        number(parts[3])?.clamp(0.0, 1.0)
    } else {
        1.0
    };
    Some(Color::new(r, g, b, a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_long_and_functional_red_agree() {
        let red = Color::new(1.0, 0.0, 0.0, 1.0);
        assert_eq!(*hex_to_rgba("#f00").unwrap(), red);
        assert_eq!(*hex_to_rgba("#ff0000").unwrap(), red);
        assert_eq!(*hex_to_rgba("rgb(255,0,0)").unwrap(), red);
        assert_eq!(*hex_to_rgba("rgb( 255 , 0 , 0 )").unwrap(), red);
    }

    #[test]
    fn same_string_returns_same_instance() {
        let a = hex_to_rgba("#123456").unwrap();
        let b = hex_to_rgba("#123456").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn rgba_and_alpha_hex_forms() {
        let c = hex_to_rgba("rgba(0, 255, 0, 0.5)").unwrap();
        assert_eq!(*c, Color::new(0.0, 1.0, 0.0, 0.5));

        let c = hex_to_rgba("#00000000").unwrap();
        assert_eq!(*c, Color::TRANSPARENT);

        let c = hex_to_rgba("#fff0").unwrap();
        assert_eq!(*c, Color::new(1.0, 1.0, 1.0, 0.0));
    }

    #[test]
    fn rejects_malformed_strings() {
        assert_eq!(hex_to_rgba(""), Err(ColorParseError::Empty));
        assert!(matches!(hex_to_rgba("#ggg"), Err(ColorParseError::InvalidHex(_))));
        assert!(matches!(hex_to_rgba("#12345"), Err(ColorParseError::InvalidHex(_))));
        assert!(matches!(
            hex_to_rgba("rgb(1,2)"),
            Err(ColorParseError::InvalidFunction(_))
        ));
        assert!(matches!(
            hex_to_rgba("hsl(0,0,0)"),
            Err(ColorParseError::Unrecognized(_))
        ));
    }

    #[test]
    fn non_finite_components_are_rejected() {
        for input in ["rgba(255,255,255,nan)", "rgba(255,255,255,inf)", "rgb(NaN,0,0)", "rgb(0,-inf,0)"] {
            assert!(
                matches!(hex_to_rgba(input), Err(ColorParseError::InvalidFunction(_))),
                "{input} should not parse"
            );
        }
    }

    #[test]
    fn disabled_alpha_is_invisible() {
        assert!(Color::WHITE.is_visible());
        assert!(!Color::WHITE.with_alpha(0.0).is_visible());
    }
}
