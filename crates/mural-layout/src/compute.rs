//! Layout computation entry point.

use std::collections::HashMap;

use mural_core::{NodeId, Screen, TreeError};
use tracing::debug;

use crate::constraint::Dimensions;
use crate::position;
use crate::sizing::{self, Size};
use crate::tree::{Geometry, LayoutTree, NodeIndex};

/// Options for layout computation.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Width of the root viewport.
    pub viewport_width: f64,
    /// Height of the root viewport.
    pub viewport_height: f64,
    /// Font size for text nodes that do not declare one.
    pub default_font_size: f64,
    /// Line height multiplier for text.
    pub default_line_height: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            viewport_width: 375.0,
            viewport_height: 812.0,
            default_font_size: 16.0,
            default_line_height: 1.2,
        }
    }
}

/// Per-node text measurement facts the distribution and baseline logic
/// read back.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TextInfo {
    /// First-line baseline offset from the top of the node's box.
    pub baseline: f64,
    /// Whether the last measurement dropped or clipped content.
    pub truncated: bool,
}

/// State threaded through one layout pass.
pub(crate) struct LayoutContext<'a> {
    pub options: &'a LayoutOptions,
    /// Externally-owned geometry records, indexed by arena index.
    pub geometry: Vec<Geometry>,
    /// Text measurement facts, indexed by arena index.
    pub text: Vec<Option<TextInfo>>,
    /// Per-pass probe-measurement memo keyed by (index, constraint bits).
    pub memo: HashMap<(usize, u64, u64), Size>,
    /// Root viewport extent, the fallback for fully unbounded
    /// aspect-ratio boxes.
    pub root_size: (f64, f64),
}

impl<'a> LayoutContext<'a> {
    fn new(options: &'a LayoutOptions, nodes: usize) -> Self {
        Self {
            options,
            geometry: vec![Geometry::default(); nodes],
            text: vec![None; nodes],
            memo: HashMap::new(),
            root_size: (options.viewport_width, options.viewport_height),
        }
    }
}

/// Progress of a screen's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutPhase {
    Unsized,
    Sized,
    Positioned,
}

/// A sized and positioned screen: the built tree plus geometry for every
/// node, ready for a render step to translate into platform views.
#[derive(Debug)]
pub struct Layout<'doc> {
    tree: LayoutTree<'doc>,
    geometry: Vec<Geometry>,
    phase: LayoutPhase,
}

impl<'doc> Layout<'doc> {
    /// The underlying tree.
    pub fn tree(&self) -> &LayoutTree<'doc> {
        &self.tree
    }

    /// Current phase of this layout.
    pub fn phase(&self) -> LayoutPhase {
        self.phase
    }

    /// Geometry for a node by ID.
    pub fn geometry(&self, id: NodeId) -> Option<&Geometry> {
        self.tree.index_of(id).map(|index| &self.geometry[index.0])
    }

    /// Geometry for a node by arena index.
    pub fn geometry_at(&self, index: NodeIndex) -> &Geometry {
        &self.geometry[index.0]
    }

    /// Iterate over `(NodeId, &Geometry)` pairs in document order.
    pub fn geometries(&self) -> impl Iterator<Item = (NodeId, &Geometry)> {
        self.tree.ids().map(|(id, index)| (id, &self.geometry[index.0]))
    }

    /// Find the front-most node at a point in absolute coordinates.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<NodeId> {
        self.hit_test_node(self.tree.root(), x, y)
    }

    fn hit_test_node(&self, index: NodeIndex, x: f64, y: f64) -> Option<NodeId> {
        let entry = self.tree.node(index);
        if !self.geometry[index.0].contains(x, y) {
            return None;
        }

        if let Some(overlay) = entry.overlay {
            if let Some(hit) = self.hit_test_node(overlay, x, y) {
                return Some(hit);
            }
        }
        // Later children draw on top.
        for &child in entry.children.iter().rev() {
            if let Some(hit) = self.hit_test_node(child, x, y) {
                return Some(hit);
            }
        }
        if let Some(background) = entry.background {
            if let Some(hit) = self.hit_test_node(background, x, y) {
                return Some(hit);
            }
        }
        Some(entry.node.id)
    }

    /// The bounding box of all positioned nodes, as `(x, y, width, height)`.
    pub fn content_bounds(&self) -> (f64, f64, f64, f64) {
        if self.geometry.is_empty() {
            return (0.0, 0.0, 0.0, 0.0);
        }
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for geometry in &self.geometry {
            min_x = min_x.min(geometry.x);
            min_y = min_y.min(geometry.y);
            max_x = max_x.max(geometry.right());
            max_y = max_y.max(geometry.bottom());
        }
        (min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Clear geometry for a node and its whole subtree, dropping the
    /// layout back to the unsized state. Returns false for unknown IDs.
    ///
    /// There is no partial relayout: after a data update the caller runs
    /// `compute_layout` over the screen again.
    pub fn invalidate(&mut self, id: NodeId) -> bool {
        let Some(index) = self.tree.index_of(id) else {
            return false;
        };
        for node in self.tree.subtree(index) {
            self.geometry[node.0].clear();
        }
        self.phase = LayoutPhase::Unsized;
        true
    }
}

/// Compute layout for a screen.
///
/// Builds the tree, sizes it top-down from the viewport constraints, and
/// assigns absolute positions in a single final pass. Running the same
/// screen through the same options twice yields identical geometry.
pub fn compute_layout<'doc>(
    screen: &'doc Screen,
    options: &LayoutOptions,
) -> Result<Layout<'doc>, TreeError> {
    let tree = LayoutTree::build(screen)?;
    debug!(nodes = tree.len(), "layout pass started");

    let mut ctx = LayoutContext::new(options, tree.len());
    let root_bounds = Dimensions::value(options.viewport_width, options.viewport_height);
    sizing::measure(&tree, &mut ctx, tree.root(), root_bounds);
    position::assign_positions(&tree, &mut ctx);

    debug!("layout pass finished");
    Ok(Layout {
        tree,
        geometry: ctx.geometry,
        phase: LayoutPhase::Positioned,
    })
}
