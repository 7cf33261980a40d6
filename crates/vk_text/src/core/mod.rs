//! # Core Module
//!
//! Shared configuration types used by the text and rendering layers.
//!
//! ## Organization
//!
//! - **Config**: Text layout constants, font list and logging settings

pub mod config;

// Re-export commonly used config types
pub use config::{
    FontConfig,
    TextConfig,
    TextRendererConfig,
    Config,
    ConfigError,
};
