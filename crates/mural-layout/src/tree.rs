//! Layout tree and geometry storage.
//!
//! The tree is an arena rebuilt from the flat screen node list on every
//! layout trigger. Parent linkage is a plain index, never an owning
//! reference, and computed geometry lives in an externally-owned array
//! parallel to the arena rather than on the schema nodes themselves.

use std::collections::HashMap;

use glam::Vec2;
use indexmap::IndexMap;
use mural_core::{Node, NodeId, Screen, TreeError};

/// Index of a node in the layout arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIndex(pub usize);

/// A node in the arena: the schema node plus tree linkage.
#[derive(Debug)]
pub struct TreeNode<'doc> {
    /// The schema node this entry wraps.
    pub node: &'doc Node,
    /// Parent arena index; `None` for the root.
    pub parent: Option<NodeIndex>,
    /// Content children, in document order.
    pub children: Vec<NodeIndex>,
    /// Background node, sized to this node's box.
    pub background: Option<NodeIndex>,
    /// Overlay node, sized to this node's box.
    pub overlay: Option<NodeIndex>,
    /// Distance from the root.
    pub depth: u32,
}

/// Computed size and position for one node.
///
/// `width`/`height` are the outer box including padding; `content_width`/
/// `content_height` exclude it. `x`/`y` are absolute coordinates assigned
/// by the position pass. All extents are finite and non-negative once a
/// pass completes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Geometry {
    pub width: f64,
    pub height: f64,
    pub content_width: f64,
    pub content_height: f64,
    pub x: f64,
    pub y: f64,
}

impl Geometry {
    /// Reset to the unsized state.
    pub fn clear(&mut self) {
        *self = Geometry::default();
    }

    /// Outer size as a vector.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Position as a vector.
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    /// The right edge (x + width).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// The bottom edge (y + height).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// The center X coordinate.
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// The center Y coordinate.
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Check if a point is inside the outer box.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Intersection of two outer boxes, as `(x, y, width, height)`.
    pub fn intersect(&self, other: &Geometry) -> Option<(f64, f64, f64, f64)> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x1 < x2 && y1 < y2 {
            Some((x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }

    /// Union (bounding box) of two outer boxes, as `(x, y, width, height)`.
    pub fn union(&self, other: &Geometry) -> (f64, f64, f64, f64) {
        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = self.right().max(other.right());
        let y2 = self.bottom().max(other.bottom());
        (x1, y1, x2 - x1, y2 - y1)
    }
}

/// The arena of tree nodes for one screen.
#[derive(Debug)]
pub struct LayoutTree<'doc> {
    nodes: Vec<TreeNode<'doc>>,
    root: NodeIndex,
    index_by_id: IndexMap<NodeId, NodeIndex>,
}

impl<'doc> LayoutTree<'doc> {
    /// Build the arena from a screen's flat node list.
    ///
    /// Fails when the root is missing, an ID is declared twice, a child
    /// reference is unknown, or a node is reachable through more than
    /// one parent (which also covers reference cycles).
    pub fn build(screen: &'doc Screen) -> Result<Self, TreeError> {
        let mut catalog: HashMap<NodeId, &'doc Node> = HashMap::with_capacity(screen.nodes.len());
        for node in &screen.nodes {
            if catalog.insert(node.id, node).is_some() {
                return Err(TreeError::DuplicateNode { id: node.id });
            }
        }
        if !catalog.contains_key(&screen.root) {
            return Err(TreeError::MissingRoot { id: screen.root });
        }

        let mut nodes = Vec::with_capacity(screen.nodes.len());
        let mut index_by_id = IndexMap::with_capacity(screen.nodes.len());
        let root = Self::add(&mut nodes, &mut index_by_id, &catalog, screen.root, None, 0)?;

        Ok(Self {
            nodes,
            root,
            index_by_id,
        })
    }

    fn add(
        nodes: &mut Vec<TreeNode<'doc>>,
        index_by_id: &mut IndexMap<NodeId, NodeIndex>,
        catalog: &HashMap<NodeId, &'doc Node>,
        id: NodeId,
        parent: Option<NodeIndex>,
        depth: u32,
    ) -> Result<NodeIndex, TreeError> {
        let node = *catalog.get(&id).ok_or(TreeError::UnknownNode { id })?;
        if index_by_id.contains_key(&id) {
            return Err(TreeError::SharedChild { id });
        }

        let index = NodeIndex(nodes.len());
        index_by_id.insert(id, index);
        nodes.push(TreeNode {
            node,
            parent,
            children: Vec::with_capacity(node.children.len()),
            background: None,
            overlay: None,
            depth,
        });

        for &child_id in &node.children {
            let child = Self::add(nodes, index_by_id, catalog, child_id, Some(index), depth + 1)?;
            nodes[index.0].children.push(child);
        }
        if let Some(background_id) = node.background {
            let child =
                Self::add(nodes, index_by_id, catalog, background_id, Some(index), depth + 1)?;
            nodes[index.0].background = Some(child);
        }
        if let Some(overlay_id) = node.overlay {
            let child =
                Self::add(nodes, index_by_id, catalog, overlay_id, Some(index), depth + 1)?;
            nodes[index.0].overlay = Some(child);
        }

        Ok(index)
    }

    /// The root index.
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get an arena entry. Indices produced by this tree are always valid.
    pub fn node(&self, index: NodeIndex) -> &TreeNode<'doc> {
        &self.nodes[index.0]
    }

    /// Look up the arena index for a node ID.
    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.index_by_id.get(&id).copied()
    }

    /// Iterate over all arena indices in tree-build (pre-)order.
    pub fn indices(&self) -> impl Iterator<Item = NodeIndex> {
        (0..self.nodes.len()).map(NodeIndex)
    }

    /// Iterate over `(NodeId, NodeIndex)` pairs in document order.
    pub fn ids(&self) -> impl Iterator<Item = (NodeId, NodeIndex)> + '_ {
        self.index_by_id.iter().map(|(&id, &index)| (id, index))
    }

    /// Collect the indices of a subtree, root-first.
    pub fn subtree(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut result = Vec::new();
        self.collect_subtree(index, &mut result);
        result
    }

    fn collect_subtree(&self, index: NodeIndex, out: &mut Vec<NodeIndex>) {
        out.push(index);
        let entry = &self.nodes[index.0];
        for &child in &entry.children {
            self.collect_subtree(child, out);
        }
        if let Some(background) = entry.background {
            self.collect_subtree(background, out);
        }
        if let Some(overlay) = entry.overlay {
            self.collect_subtree(overlay, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mural_core::{Node, NodeKind, RectangleNode, VStackNode};

    fn rectangle(id: u64) -> Node {
        Node::new(NodeId(id), NodeKind::Rectangle(RectangleNode::default()))
    }

    fn stack(id: u64, children: &[u64]) -> Node {
        Node::new(NodeId(id), NodeKind::VStack(VStackNode::default()))
            .with_children(children.iter().map(|&c| NodeId(c)))
    }

    #[test]
    fn test_build_links_parents_and_depth() {
        let screen = Screen::new(
            NodeId(1),
            vec![stack(1, &[2, 3]), rectangle(2), rectangle(3)],
        );
        let tree = LayoutTree::build(&screen).unwrap();

        assert_eq!(tree.len(), 3);
        let root = tree.node(tree.root());
        assert_eq!(root.parent, None);
        assert_eq!(root.depth, 0);
        assert_eq!(root.children.len(), 2);

        for &child in &root.children {
            let entry = tree.node(child);
            assert_eq!(entry.parent, Some(tree.root()));
            assert_eq!(entry.depth, 1);
        }
    }

    #[test]
    fn test_build_decor_links() {
        let screen = Screen::new(
            NodeId(1),
            vec![
                rectangle(1).with_background(NodeId(2)).with_overlay(NodeId(3)),
                rectangle(2),
                rectangle(3),
            ],
        );
        let tree = LayoutTree::build(&screen).unwrap();

        let root = tree.node(tree.root());
        assert!(root.children.is_empty());
        assert!(root.background.is_some());
        assert!(root.overlay.is_some());
    }

    #[test]
    fn test_build_missing_root() {
        let screen = Screen::new(NodeId(9), vec![rectangle(1)]);
        assert_eq!(
            LayoutTree::build(&screen).unwrap_err(),
            TreeError::MissingRoot { id: NodeId(9) }
        );
    }

    #[test]
    fn test_build_unknown_child() {
        let screen = Screen::new(NodeId(1), vec![stack(1, &[2])]);
        assert_eq!(
            LayoutTree::build(&screen).unwrap_err(),
            TreeError::UnknownNode { id: NodeId(2) }
        );
    }

    #[test]
    fn test_build_duplicate_node() {
        let screen = Screen::new(NodeId(1), vec![rectangle(1), rectangle(1)]);
        assert_eq!(
            LayoutTree::build(&screen).unwrap_err(),
            TreeError::DuplicateNode { id: NodeId(1) }
        );
    }

    #[test]
    fn test_build_shared_child() {
        let screen = Screen::new(
            NodeId(1),
            vec![stack(1, &[2, 3]), stack(2, &[4]), stack(3, &[4]), rectangle(4)],
        );
        assert_eq!(
            LayoutTree::build(&screen).unwrap_err(),
            TreeError::SharedChild { id: NodeId(4) }
        );
    }

    #[test]
    fn test_subtree_collection() {
        let screen = Screen::new(
            NodeId(1),
            vec![stack(1, &[2]), stack(2, &[3]), rectangle(3), rectangle(4)]
                .into_iter()
                .map(|n| if n.id == NodeId(2) { n.with_background(NodeId(4)) } else { n })
                .collect(),
        );
        let tree = LayoutTree::build(&screen).unwrap();

        let inner = tree.index_of(NodeId(2)).unwrap();
        let subtree = tree.subtree(inner);
        assert_eq!(subtree.len(), 3); // node 2, child 3, background 4
    }

    #[test]
    fn test_geometry_accessors() {
        let geometry = Geometry {
            width: 100.0,
            height: 50.0,
            content_width: 90.0,
            content_height: 40.0,
            x: 10.0,
            y: 20.0,
        };
        assert!((geometry.right() - 110.0).abs() < 0.001);
        assert!((geometry.bottom() - 70.0).abs() < 0.001);
        assert!((geometry.center_x() - 60.0).abs() < 0.001);
        assert!(geometry.contains(50.0, 40.0));
        assert!(!geometry.contains(5.0, 40.0));

        let mut cleared = geometry;
        cleared.clear();
        assert_eq!(cleared, Geometry::default());
    }

    #[test]
    fn test_geometry_intersect_and_union() {
        let a = Geometry {
            width: 100.0,
            height: 100.0,
            ..Default::default()
        };
        let b = Geometry {
            x: 50.0,
            y: 50.0,
            width: 100.0,
            height: 100.0,
            ..Default::default()
        };

        let (x, y, width, height) = a.intersect(&b).unwrap();
        assert!((x - 50.0).abs() < 0.001);
        assert!((y - 50.0).abs() < 0.001);
        assert!((width - 50.0).abs() < 0.001);
        assert!((height - 50.0).abs() < 0.001);

        let (x, y, width, height) = a.union(&b);
        assert!(x.abs() < 0.001 && y.abs() < 0.001);
        assert!((width - 150.0).abs() < 0.001);
        assert!((height - 150.0).abs() < 0.001);

        let far = Geometry {
            x: 500.0,
            y: 500.0,
            width: 10.0,
            height: 10.0,
            ..Default::default()
        };
        assert!(a.intersect(&far).is_none());
    }
}
