//! # Text Rendering Configuration
//!
//! Configuration structures for font loading, text layout constants and the
//! renderer façade. Everything here is serializable so applications can ship
//! a TOML or RON file next to their fonts.
//!
//! ## Configuration Categories
//!
//! - **Text Config**: Base rasterization height, reference resolution,
//!   character range and descriptor pool sizing
//! - **Font Config**: Named font files to load at startup
//! - **Renderer Config**: Top level bundle including the log level

use serde::{Serialize, Deserialize};

use crate::foundation::math::Extent;

// Re-export the loader trait so callers only need this module
pub use crate::config::{Config, ConfigError};

/// First printable ASCII code point (space)
pub const FIRST_PRINTABLE_ASCII: u32 = 32;

/// Last printable ASCII code point (tilde)
pub const LAST_PRINTABLE_ASCII: u32 = 126;

/// Pixel height glyphs are rasterized at; every font size is a ratio of it
pub const BASE_FONT_HEIGHT: f32 = 64.0;

/// Resolution at which relative text renders at its nominal size
pub const REFERENCE_RESOLUTION: Extent = Extent::new(1920, 1080);

/// Descriptor sets reserved per glyph per frame in flight
pub const DEFAULT_DESCRIPTOR_MULTIPLIER: u32 = 100;

/// # Text Configuration
///
/// Layout and loading constants shared by every font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Pixel height glyph bitmaps are rasterized at
    pub base_font_height: f32,
    /// Surface size at which `render_text_rel` applies no scaling
    pub reference_resolution: Extent,
    /// First code point loaded from each font (inclusive)
    pub first_printable: u32,
    /// Last code point loaded from each font (inclusive)
    pub last_printable: u32,
    /// Descriptor sets reserved per glyph per frame in flight
    pub descriptor_multiplier: u32,
}

impl TextConfig {
    /// Create a text configuration with the stock constants
    pub const fn new() -> Self {
        Self {
            base_font_height: BASE_FONT_HEIGHT,
            reference_resolution: REFERENCE_RESOLUTION,
            first_printable: FIRST_PRINTABLE_ASCII,
            last_printable: LAST_PRINTABLE_ASCII,
            descriptor_multiplier: DEFAULT_DESCRIPTOR_MULTIPLIER,
        }
    }

    /// Set the rasterization height
    pub fn with_base_font_height(mut self, height: f32) -> Self {
        self.base_font_height = height;
        self
    }

    /// Set the reference resolution used for relative text
    pub fn with_reference_resolution(mut self, resolution: Extent) -> Self {
        self.reference_resolution = resolution;
        self
    }

    /// Set the loaded character range
    pub fn with_char_range(mut self, first: u32, last: u32) -> Self {
        self.first_printable = first;
        self.last_printable = last;
        self
    }

    /// Set how many descriptor sets are reserved per glyph per frame
    pub fn with_descriptor_multiplier(mut self, multiplier: u32) -> Self {
        self.descriptor_multiplier = multiplier;
        self
    }

    /// Iterate over the configured character range, skipping invalid scalars
    pub fn char_range(&self) -> impl Iterator<Item = char> {
        (self.first_printable..=self.last_printable).filter_map(char::from_u32)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_font_height.is_finite() && self.base_font_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "base font height must be positive, got {}",
                self.base_font_height
            )));
        }

        if self.reference_resolution.width == 0 || self.reference_resolution.height == 0 {
            return Err(ConfigError::Invalid("reference resolution cannot be zero".to_string()));
        }

        if self.first_printable > self.last_printable {
            return Err(ConfigError::Invalid(format!(
                "empty character range {}..={}",
                self.first_printable, self.last_printable
            )));
        }

        if self.descriptor_multiplier == 0 {
            return Err(ConfigError::Invalid("descriptor multiplier must be at least 1".to_string()));
        }

        Ok(())
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Font Configuration
///
/// A font file the renderer loads at startup. Fonts are addressed by their
/// position in [`TextRendererConfig::fonts`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontConfig {
    /// Human readable name, used in log output
    pub name: String,
    /// Path to a TrueType or OpenType file
    pub path: String,
}

impl FontConfig {
    /// Create a new font entry
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// # Complete Text Renderer Configuration
///
/// Top-level configuration applications load from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextRendererConfig {
    /// Default log filter passed to `foundation::logging::init_with_level`
    pub log_level: String,
    /// Layout constants
    pub text: TextConfig,
    /// Fonts to load, in index order
    pub fonts: Vec<FontConfig>,
}

impl TextRendererConfig {
    /// Create a configuration with no fonts
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            text: TextConfig::default(),
            fonts: Vec::new(),
        }
    }

    /// Append a font
    pub fn with_font(mut self, font: FontConfig) -> Self {
        self.fonts.push(font);
        self
    }

    /// Set the log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.text.validate()?;

        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log_level must not be empty".to_string()));
        }

        if let Some(font) = self.fonts.iter().find(|font| font.path.is_empty()) {
            return Err(ConfigError::Invalid(format!("font '{}' has an empty path", font.name)));
        }

        Ok(())
    }
}

impl Default for TextRendererConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for TextRendererConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TextRendererConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.text.char_range().count(), 95);
        assert_eq!(config.text.char_range().next(), Some(' '));
        assert_eq!(config.text.char_range().last(), Some('~'));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(TextConfig::new().with_base_font_height(0.0).validate().is_err());
        assert!(TextConfig::new().with_char_range(100, 50).validate().is_err());
        assert!(TextConfig::new().with_descriptor_multiplier(0).validate().is_err());
        assert!(TextConfig::new()
            .with_reference_resolution(Extent::new(0, 1080))
            .validate()
            .is_err());

        let config = TextRendererConfig::new().with_font(FontConfig::new("empty", ""));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert!(TextRendererConfig::new().with_log_level(" ").validate().is_err());
    }

    #[test]
    fn test_parse_partial_toml() {
        let source = r#"
            log_level = "debug"

            [text]
            base_font_height = 48.0

            [[fonts]]
            name = "mono"
            path = "resources/fonts/mono.ttf"
        "#;

        let config: TextRendererConfig = toml::from_str(source).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.text.base_font_height, 48.0);
        // Unspecified fields fall back to defaults
        assert_eq!(config.text.reference_resolution, REFERENCE_RESOLUTION);
        assert_eq!(config.fonts, vec![FontConfig::new("mono", "resources/fonts/mono.ttf")]);
    }

    #[test]
    fn test_parse_ron() {
        let source = r#"(
            log_level: "warn",
            text: (descriptor_multiplier: 4),
            fonts: [(name: "ui", path: "ui.ttf")],
        )"#;

        let config: TextRendererConfig = ron::from_str(source).unwrap();
        assert_eq!(config.text.descriptor_multiplier, 4);
        assert_eq!(config.text.first_printable, FIRST_PRINTABLE_ASCII);
        assert_eq!(config.fonts.len(), 1);
    }

    #[test]
    fn test_save_and_load_through_files() {
        let config = TextRendererConfig::new()
            .with_log_level("debug")
            .with_font(FontConfig::new("mono", "fonts/mono.ttf"));

        for extension in ["toml", "ron"] {
            let path = std::env::temp_dir().join(format!("vk_text_config_{}.{}", std::process::id(), extension));
            config.save_to_file(&path).unwrap();
            let loaded = TextRendererConfig::load_from_file(&path).unwrap();
            std::fs::remove_file(&path).unwrap();

            assert_eq!(loaded, config);
        }
    }
}
