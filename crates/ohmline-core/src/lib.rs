//! ohmline Core Types and Definitions
//!
//! This crate provides the foundational types shared by the ohmline
//! schematic engine and its command line. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Points, directions and bounds in grid units ([`geometry`] module)
//! - **Style**: Stroke definitions for rendered primitives ([`style`] module)

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod style;
