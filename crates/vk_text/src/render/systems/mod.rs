//! Active rendering systems
//!
//! Stateful systems built on the backend seams. Currently text rendering.

pub mod text;
