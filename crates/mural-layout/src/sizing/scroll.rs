//! Scroll container and carousel measurement.
//!
//! Content is unconstrained along the scroll axis so it can exceed the
//! viewport; the cross axis stays bounded to the container's own
//! resolved extent.

use mural_core::Axis;

use crate::compute::LayoutContext;
use crate::constraint::{Dimension, Dimensions};
use crate::tree::{LayoutTree, NodeIndex};

use super::{finish_node, inner_constraints, measure, Size};

pub(crate) fn measure_scroll(
    tree: &LayoutTree,
    ctx: &mut LayoutContext,
    index: NodeIndex,
    axis: Axis,
    bounds: Dimensions,
) -> Size {
    let entry = tree.node(index);
    let node = entry.node;
    let inner = inner_constraints(node, bounds);
    let cross_bound = inner.along(axis.cross());

    let mut main_sum = 0.0;
    let mut cross_max = 0.0_f64;
    for &child in &entry.children {
        let size = measure(
            tree,
            ctx,
            child,
            Dimensions::from_axes(axis, Dimension::Unbounded, cross_bound),
        );
        main_sum += size.along(axis);
        cross_max = cross_max.max(size.along(axis.cross()));
    }

    let content = Size::from_axes(axis, main_sum, cross_max);
    finish_node(tree, ctx, index, content.width, content.height, bounds)
}

#[cfg(test)]
mod tests {
    use crate::compute::{compute_layout, LayoutOptions};
    use mural_core::{
        Axis, Frame, Node, NodeId, NodeKind, RectangleNode, Screen, ScrollContainerNode,
    };

    fn rectangle(id: u64, width: f64, height: f64) -> Node {
        Node::new(NodeId(id), NodeKind::Rectangle(RectangleNode::default()))
            .with_frame(Frame::fixed(width, height))
    }

    #[test]
    fn test_vertical_scroll_content_exceeds_viewport() {
        let screen = Screen::new(
            NodeId(1),
            vec![
                Node::new(
                    NodeId(1),
                    NodeKind::ScrollContainer(ScrollContainerNode {
                        axis: Axis::Vertical,
                    }),
                )
                .with_children([NodeId(2), NodeId(3), NodeId(4)]),
                rectangle(2, 100.0, 400.0),
                rectangle(3, 100.0, 400.0),
                rectangle(4, 100.0, 400.0),
            ],
        );
        let layout = compute_layout(&screen, &LayoutOptions::default()).unwrap();

        // The scroll extent follows its content, not the viewport.
        let container = layout.geometry(NodeId(1)).unwrap();
        assert!((container.height - 1200.0).abs() < 0.001);

        // Children stack along the scroll axis.
        assert!((layout.geometry(NodeId(2)).unwrap().y - 0.0).abs() < 0.001);
        assert!((layout.geometry(NodeId(3)).unwrap().y - 400.0).abs() < 0.001);
        assert!((layout.geometry(NodeId(4)).unwrap().y - 800.0).abs() < 0.001);
    }

    #[test]
    fn test_carousel_pages_run_horizontally() {
        let screen = Screen::new(
            NodeId(1),
            vec![
                Node::new(NodeId(1), NodeKind::Carousel)
                    .with_children([NodeId(2), NodeId(3)]),
                rectangle(2, 375.0, 200.0),
                rectangle(3, 375.0, 180.0),
            ],
        );
        let layout = compute_layout(&screen, &LayoutOptions::default()).unwrap();

        let carousel = layout.geometry(NodeId(1)).unwrap();
        assert!((carousel.width - 750.0).abs() < 0.001);
        assert!((carousel.height - 200.0).abs() < 0.001);

        assert!((layout.geometry(NodeId(2)).unwrap().x - 0.0).abs() < 0.001);
        assert!((layout.geometry(NodeId(3)).unwrap().x - 375.0).abs() < 0.001);
    }

    #[test]
    fn test_fixed_frame_overrides_scroll_extent() {
        let screen = Screen::new(
            NodeId(1),
            vec![
                Node::new(
                    NodeId(1),
                    NodeKind::ScrollContainer(ScrollContainerNode {
                        axis: Axis::Vertical,
                    }),
                )
                .with_frame(Frame::fixed_height(500.0))
                .with_children([NodeId(2)]),
                rectangle(2, 100.0, 900.0),
            ],
        );
        let layout = compute_layout(&screen, &LayoutOptions::default()).unwrap();

        assert!((layout.geometry(NodeId(1)).unwrap().height - 500.0).abs() < 0.001);
        assert!((layout.geometry(NodeId(2)).unwrap().height - 900.0).abs() < 0.001);
    }
}
