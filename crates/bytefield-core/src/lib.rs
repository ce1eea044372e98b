//! Byte Field Core Types and Definitions
//!
//! This crate provides the foundational types for byte field diagrams:
//!
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Attributes**: Reusable style mappings for boxes ([`attrs`] module)
//! - **Text**: Text fragment model for box captions ([`text`] module)
//! - **Sink**: Emission-ordered SVG element accumulator ([`sink`] module)

pub mod attrs;
pub mod color;
pub mod geometry;
pub mod sink;
pub mod text;
