//! Position and alignment resolution.
//!
//! A single top-down pass over the already-sized tree. Placement is a
//! pure function of recorded geometry plus alignment and spacing
//! metadata; it never re-sizes anything.

use mural_core::{Alignment, Axis, HorizontalAlignment, NodeKind, VerticalAlignment};

use crate::compute::LayoutContext;
use crate::sizing::first_baseline;
use crate::tree::{LayoutTree, NodeIndex, TreeNode};

pub(crate) fn assign_positions(tree: &LayoutTree, ctx: &mut LayoutContext) {
    let root = tree.root();
    ctx.geometry[root.0].x = 0.0;
    ctx.geometry[root.0].y = 0.0;
    place_children(tree, ctx, root);
}

fn place_children(tree: &LayoutTree, ctx: &mut LayoutContext, index: NodeIndex) {
    let entry = tree.node(index);
    let node = entry.node;
    let own = ctx.geometry[index.0];
    let origin_x = own.x + node.padding.leading;
    let origin_y = own.y + node.padding.top;

    match &node.kind {
        NodeKind::VStack(config) => {
            let mut cursor = origin_y;
            for &child in &entry.children {
                let child_geometry = ctx.geometry[child.0];
                let x = origin_x
                    + horizontal_offset(config.alignment, own.content_width, child_geometry.width);
                set_position(ctx, child, x, cursor);
                cursor += child_geometry.height + config.spacing;
            }
        }
        NodeKind::HStack(config) => {
            // Baseline rows anchor on the tallest ascent among the
            // text-bearing children.
            let anchor = if config.alignment == VerticalAlignment::FirstTextBaseline {
                entry
                    .children
                    .iter()
                    .filter_map(|&child| first_baseline(tree, ctx, child))
                    .fold(0.0_f64, f64::max)
            } else {
                0.0
            };

            let mut cursor = origin_x;
            for &child in &entry.children {
                let child_geometry = ctx.geometry[child.0];
                let y = origin_y
                    + match config.alignment {
                        VerticalAlignment::Top => 0.0,
                        VerticalAlignment::Center => {
                            ((own.content_height - child_geometry.height) / 2.0).max(0.0)
                        }
                        VerticalAlignment::Bottom => own.content_height - child_geometry.height,
                        VerticalAlignment::FirstTextBaseline => {
                            match first_baseline(tree, ctx, child) {
                                Some(baseline) => anchor - baseline,
                                None => {
                                    ((own.content_height - child_geometry.height) / 2.0).max(0.0)
                                }
                            }
                        }
                    };
                set_position(ctx, child, cursor, y);
                cursor += child_geometry.width + config.spacing;
            }
        }
        NodeKind::ZStack(config) => {
            for &child in &entry.children {
                let child_geometry = ctx.geometry[child.0];
                let (dx, dy) = align_in_box(
                    config.alignment,
                    own.content_width,
                    own.content_height,
                    child_geometry.width,
                    child_geometry.height,
                );
                set_position(ctx, child, origin_x + dx, origin_y + dy);
            }
        }
        NodeKind::ScrollContainer(config) => {
            place_rail(ctx, entry, config.axis, origin_x, origin_y);
        }
        NodeKind::Carousel => {
            place_rail(ctx, entry, Axis::Horizontal, origin_x, origin_y);
        }
        _ => {
            for &child in &entry.children {
                set_position(ctx, child, origin_x, origin_y);
            }
        }
    }

    // Decor mirrors the owner's outer box exactly.
    if let Some(background) = entry.background {
        set_position(ctx, background, own.x, own.y);
    }
    if let Some(overlay) = entry.overlay {
        set_position(ctx, overlay, own.x, own.y);
    }

    for &child in &entry.children {
        place_children(tree, ctx, child);
    }
    if let Some(background) = entry.background {
        place_children(tree, ctx, background);
    }
    if let Some(overlay) = entry.overlay {
        place_children(tree, ctx, overlay);
    }
}

/// Stack children along the scroll axis, flush to the cross-axis start.
fn place_rail(ctx: &mut LayoutContext, entry: &TreeNode<'_>, axis: Axis, origin_x: f64, origin_y: f64) {
    match axis {
        Axis::Horizontal => {
            let mut cursor = origin_x;
            for &child in &entry.children {
                let width = ctx.geometry[child.0].width;
                set_position(ctx, child, cursor, origin_y);
                cursor += width;
            }
        }
        Axis::Vertical => {
            let mut cursor = origin_y;
            for &child in &entry.children {
                let height = ctx.geometry[child.0].height;
                set_position(ctx, child, origin_x, cursor);
                cursor += height;
            }
        }
    }
}

fn set_position(ctx: &mut LayoutContext, index: NodeIndex, x: f64, y: f64) {
    let geometry = &mut ctx.geometry[index.0];
    geometry.x = x;
    geometry.y = y;
}

fn horizontal_offset(alignment: HorizontalAlignment, container: f64, child: f64) -> f64 {
    match alignment {
        HorizontalAlignment::Leading => 0.0,
        HorizontalAlignment::Center => ((container - child) / 2.0).max(0.0),
        HorizontalAlignment::Trailing => container - child,
    }
}

/// Offset of a child box inside a container box for a nine-point
/// alignment. Centering clamps at zero so an oversized child never gets
/// a negative offset.
pub(crate) fn align_in_box(
    alignment: Alignment,
    container_width: f64,
    container_height: f64,
    width: f64,
    height: f64,
) -> (f64, f64) {
    let x = match alignment.horizontal() {
        HorizontalAlignment::Leading => 0.0,
        HorizontalAlignment::Center => ((container_width - width) / 2.0).max(0.0),
        HorizontalAlignment::Trailing => container_width - width,
    };
    let y = match alignment.vertical() {
        VerticalAlignment::Top => 0.0,
        VerticalAlignment::Center => ((container_height - height) / 2.0).max(0.0),
        VerticalAlignment::Bottom => container_height - height,
        // Nine-point alignments never carry a baseline component.
        VerticalAlignment::FirstTextBaseline => 0.0,
    };
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_in_box_corners() {
        let (x, y) = align_in_box(Alignment::BottomTrailing, 100.0, 100.0, 40.0, 40.0);
        assert!((x - 60.0).abs() < 0.001);
        assert!((y - 60.0).abs() < 0.001);

        let (x, y) = align_in_box(Alignment::TopLeading, 100.0, 100.0, 40.0, 40.0);
        assert!(x.abs() < 0.001);
        assert!(y.abs() < 0.001);
    }

    #[test]
    fn test_align_in_box_center() {
        let (x, y) = align_in_box(Alignment::Center, 100.0, 100.0, 40.0, 40.0);
        assert!((x - 30.0).abs() < 0.001);
        assert!((y - 30.0).abs() < 0.001);
    }

    #[test]
    fn test_align_in_box_center_clamps() {
        // An oversized child never gets a negative centered offset.
        let (x, y) = align_in_box(Alignment::Center, 100.0, 100.0, 140.0, 140.0);
        assert!(x.abs() < 0.001);
        assert!(y.abs() < 0.001);
    }

    #[test]
    fn test_align_in_box_edges() {
        let (x, y) = align_in_box(Alignment::Bottom, 100.0, 80.0, 40.0, 20.0);
        assert!((x - 30.0).abs() < 0.001);
        assert!((y - 60.0).abs() < 0.001);

        let (x, y) = align_in_box(Alignment::Trailing, 100.0, 80.0, 40.0, 20.0);
        assert!((x - 60.0).abs() < 0.001);
        assert!((y - 30.0).abs() < 0.001);
    }
}
