//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and surface extents
//! - Logging utilities

pub mod math;
pub mod logging;
