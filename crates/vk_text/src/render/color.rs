//! RGBA color payload shared by every glyph of a render call

use std::fmt;
use std::str::FromStr;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Linear RGBA color, laid out exactly as the fragment shader uniform
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    /// Red channel (0.0-1.0)
    pub r: f32,
    /// Green channel (0.0-1.0)
    pub g: f32,
    /// Blue channel (0.0-1.0)
    pub b: f32,
    /// Alpha channel (0.0-1.0)
    pub a: f32,
}

impl Color {
    /// Opaque red
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    /// Opaque green
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);
    /// Opaque blue
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);
    /// Opaque yellow
    pub const YELLOW: Self = Self::new(1.0, 1.0, 0.0, 1.0);
    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Create a color from its four channels
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Channels as an array in RGBA order
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.r, self.g, self.b, self.a)
    }
}

/// Error returned when a color string is not four whitespace separated floats
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid color '{input}': expected \"r g b a\"")]
pub struct ParseColorError {
    input: String,
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseColorError { input: s.to_string() };

        let channels = s
            .split_whitespace()
            .map(str::parse::<f32>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| error())?;

        match channels.as_slice() {
            &[r, g, b, a] => Ok(Self::new(r, g, b, a)),
            _ => Err(error()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_text_form() {
        let color: Color = "0.5 0.25 1 1".parse().unwrap();
        assert_eq!(color, Color::new(0.5, 0.25, 1.0, 1.0));
        assert_eq!(Color::YELLOW.to_string(), "1 1 0 1");
        assert_eq!(Color::YELLOW.to_string().parse::<Color>(), Ok(Color::YELLOW));
    }

    #[test]
    fn test_color_parse_errors() {
        assert!("1 0 0".parse::<Color>().is_err());
        assert!("1 0 0 1 1".parse::<Color>().is_err());
        assert!("red green blue alpha".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_uniform_layout() {
        assert_eq!(std::mem::size_of::<Color>(), 16);
        assert_eq!(bytemuck::bytes_of(&Color::WHITE).len(), 16);
    }
}
