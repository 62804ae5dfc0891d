//! Layout computation for Mural screens.
//!
//! This crate turns a server-delivered screen into a tree with concrete
//! geometry for every node.
//!
//! # Architecture
//!
//! 1. **Tree building**: the flat node list becomes an arena tree
//! 2. **Sizing**: recursive, top-down constraint resolution with one
//!    resolver per node kind; stacks run iterative distribution passes
//!    internally
//! 3. **Positioning**: a single top-down pass assigning absolute
//!    coordinates from alignment and spacing metadata
//!
//! # Example
//!
//! ```ignore
//! use mural_layout::{compute_layout, LayoutOptions};
//!
//! let layout = compute_layout(&screen, &LayoutOptions::default())?;
//! for (id, geometry) in layout.geometries() {
//!     println!("{id}: {geometry:?}");
//! }
//! ```

mod compute;
mod constraint;
mod position;
mod sizing;
mod text;
mod tree;

pub use compute::{compute_layout, Layout, LayoutOptions, LayoutPhase};
pub use constraint::{Dimension, Dimensions};
pub use text::{measure_text, TextMetrics, TextStyle};
pub use tree::{Geometry, LayoutTree, NodeIndex, TreeNode};
