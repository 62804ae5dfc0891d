//! Core node schema and shared types for the Mural layout engine.
//!
//! This crate provides the foundational types used by the layout crates:
//! - The server-delivered node schema (`Screen`, `Node`, `NodeKind`)
//! - Frame, padding, and alignment value types
//! - Error types

pub mod errors;
pub mod node;
pub mod types;

pub use errors::*;
pub use node::*;
pub use types::*;
