//! Size resolvers.
//!
//! One resolver per node kind, selected by an exhaustive match. Every
//! resolver follows the same shape: derive effective constraints from the
//! parent-supplied pair and the node's frame, compute a content size
//! (recursing into children where the kind has any), combine content with
//! the frame into the outer box, and record geometry. Background and
//! overlay nodes are then sized to exactly fill the finished box.

pub(crate) mod leaf;
pub(crate) mod scroll;
pub(crate) mod stack;

use mural_core::{Axis, Node, NodeKind, ResizingMode, VerticalAlignment};

use crate::compute::LayoutContext;
use crate::constraint::{
    apply_frame_axis, frame_axis, resolve_aspect_ratio, resolve_axis, Dimension, Dimensions,
};
use crate::tree::{LayoutTree, NodeIndex};

pub(crate) const EPSILON: f64 = 1e-6;

/// A measured outer size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub(crate) fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The extent along an axis.
    pub(crate) fn along(self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Build a size from a main-axis and a cross-axis extent.
    pub(crate) fn from_axes(axis: Axis, main: f64, cross: f64) -> Self {
        match axis {
            Axis::Horizontal => Self::new(main, cross),
            Axis::Vertical => Self::new(cross, main),
        }
    }
}

/// How a child behaves when a stack divides main-axis space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SizingBehavior {
    /// Sizes to its own content or declared extent.
    Wrap,
    /// Wants to grow into whatever main-axis space is on offer.
    ExpandFill,
}

/// Effective constraints for a node's content: the parent-supplied pair
/// run through the frame decision table, then narrowed by padding.
pub(crate) fn inner_constraints(node: &Node, bounds: Dimensions) -> Dimensions {
    let width = resolve_axis(bounds.width, frame_axis(node.frame.as_ref(), Axis::Horizontal));
    let height = resolve_axis(bounds.height, frame_axis(node.frame.as_ref(), Axis::Vertical));
    Dimensions::new(
        width.shrink(node.padding.horizontal()),
        height.shrink(node.padding.vertical()),
    )
}

/// Measure a node against the given constraints, committing geometry for
/// it and its whole subtree.
pub(crate) fn measure(
    tree: &LayoutTree,
    ctx: &mut LayoutContext,
    index: NodeIndex,
    bounds: Dimensions,
) -> Size {
    let node = tree.node(index).node;
    let size = if let Some(ratio) = valid_aspect_ratio(node) {
        let (width, height) = resolve_aspect_ratio(bounds, ratio, ctx.root_size);
        let width = apply_frame_axis(
            width,
            frame_axis(node.frame.as_ref(), Axis::Horizontal),
            bounds.width,
        );
        let height = apply_frame_axis(
            height,
            frame_axis(node.frame.as_ref(), Axis::Vertical),
            bounds.height,
        );
        fill_box(tree, ctx, index, width, height)
    } else {
        measure_kind(tree, ctx, index, bounds)
    };
    ctx.memo.insert(memo_key(index, bounds), size);
    size
}

/// Measure through the per-pass memo. Used for the probe measurements of
/// the iterative distribution loops; the settled allocation is always
/// committed through `measure` afterwards.
pub(crate) fn probe(
    tree: &LayoutTree,
    ctx: &mut LayoutContext,
    index: NodeIndex,
    bounds: Dimensions,
) -> Size {
    if let Some(&size) = ctx.memo.get(&memo_key(index, bounds)) {
        return size;
    }
    measure(tree, ctx, index, bounds)
}

fn memo_key(index: NodeIndex, bounds: Dimensions) -> (usize, u64, u64) {
    (
        index.0,
        dimension_bits(bounds.width),
        dimension_bits(bounds.height),
    )
}

fn dimension_bits(dimension: Dimension) -> u64 {
    match dimension {
        Dimension::Value(v) => v.to_bits(),
        Dimension::Unbounded => u64::MAX,
    }
}

fn valid_aspect_ratio(node: &Node) -> Option<f64> {
    node.aspect_ratio.filter(|ratio| ratio.is_finite() && *ratio > 0.0)
}

fn measure_kind(
    tree: &LayoutTree,
    ctx: &mut LayoutContext,
    index: NodeIndex,
    bounds: Dimensions,
) -> Size {
    let node = tree.node(index).node;
    match &node.kind {
        NodeKind::VStack(config) => {
            stack::measure_stack(tree, ctx, index, Axis::Vertical, config.spacing, false, bounds)
        }
        NodeKind::HStack(config) => stack::measure_stack(
            tree,
            ctx,
            index,
            Axis::Horizontal,
            config.spacing,
            config.alignment == VerticalAlignment::FirstTextBaseline,
            bounds,
        ),
        NodeKind::ZStack(_) => stack::measure_zstack(tree, ctx, index, bounds),
        NodeKind::ScrollContainer(config) => {
            scroll::measure_scroll(tree, ctx, index, config.axis, bounds)
        }
        NodeKind::Carousel => scroll::measure_scroll(tree, ctx, index, Axis::Horizontal, bounds),
        NodeKind::Text(config) => leaf::measure_text_node(tree, ctx, index, config, bounds),
        NodeKind::Image(config) => leaf::measure_image(tree, ctx, index, config, bounds),
        NodeKind::Media(config) => leaf::measure_media(tree, ctx, index, config, bounds),
        NodeKind::Rectangle(_) => leaf::measure_rectangle(tree, ctx, index, bounds),
        NodeKind::Spacer => leaf::measure_spacer(tree, ctx, index, bounds),
        NodeKind::Divider => leaf::measure_divider(tree, ctx, index, bounds),
        NodeKind::PageControl(config) => {
            leaf::measure_page_control(tree, ctx, index, config, bounds)
        }
        NodeKind::Icon(config) => leaf::measure_icon(tree, ctx, index, config, bounds),
    }
}

/// Record geometry from a content size: the outer box is content plus
/// padding run through the frame, and the content box is recomputed from
/// the final outer box.
pub(crate) fn finish_node(
    tree: &LayoutTree,
    ctx: &mut LayoutContext,
    index: NodeIndex,
    content_width: f64,
    content_height: f64,
    bounds: Dimensions,
) -> Size {
    let node = tree.node(index).node;
    let outer_width = apply_frame_axis(
        content_width + node.padding.horizontal(),
        frame_axis(node.frame.as_ref(), Axis::Horizontal),
        bounds.width,
    );
    let outer_height = apply_frame_axis(
        content_height + node.padding.vertical(),
        frame_axis(node.frame.as_ref(), Axis::Vertical),
        bounds.height,
    );
    let size = commit(ctx, index, node, outer_width, outer_height);
    size_decor(tree, ctx, index);
    size
}

/// Force a node into an exact box, remeasuring its content inside it.
/// Used for background/overlay fills and aspect-ratio boxes.
pub(crate) fn fill_box(
    tree: &LayoutTree,
    ctx: &mut LayoutContext,
    index: NodeIndex,
    width: f64,
    height: f64,
) -> Size {
    let node = tree.node(index).node;
    measure_kind(tree, ctx, index, Dimensions::value(width, height));
    let size = commit(ctx, index, node, width, height);
    size_decor(tree, ctx, index);
    size
}

fn commit(ctx: &mut LayoutContext, index: NodeIndex, node: &Node, width: f64, height: f64) -> Size {
    let geometry = &mut ctx.geometry[index.0];
    geometry.width = width.max(0.0);
    geometry.height = height.max(0.0);
    geometry.content_width = (geometry.width - node.padding.horizontal()).max(0.0);
    geometry.content_height = (geometry.height - node.padding.vertical()).max(0.0);
    Size::new(geometry.width, geometry.height)
}

fn size_decor(tree: &LayoutTree, ctx: &mut LayoutContext, index: NodeIndex) {
    let entry = tree.node(index);
    let width = ctx.geometry[index.0].width;
    let height = ctx.geometry[index.0].height;
    if let Some(background) = entry.background {
        fill_box(tree, ctx, background, width, height);
    }
    if let Some(overlay) = entry.overlay {
        fill_box(tree, ctx, overlay, width, height);
    }
}

/// Decide how a child behaves when its stack splits main-axis space.
pub(crate) fn behavior(tree: &LayoutTree, index: NodeIndex, axis: Axis) -> SizingBehavior {
    let entry = tree.node(index);
    let node = entry.node;

    if let Some(frame) = &node.frame {
        if frame.is_fixed() {
            if frame_axis(Some(frame), axis).fixed.is_some() {
                return SizingBehavior::Wrap;
            }
        } else if frame_axis(Some(frame), axis).max.is_some() {
            return SizingBehavior::ExpandFill;
        }
    }

    match &node.kind {
        NodeKind::Rectangle(_) | NodeKind::ScrollContainer(_) | NodeKind::Carousel => {
            SizingBehavior::ExpandFill
        }
        NodeKind::Image(config) => resizing_behavior(config.resizing_mode),
        NodeKind::Media(config) => resizing_behavior(config.resizing_mode),
        // Text consumes offered width greedily but wraps vertically.
        NodeKind::Text(_) => match axis {
            Axis::Horizontal => SizingBehavior::ExpandFill,
            Axis::Vertical => SizingBehavior::Wrap,
        },
        NodeKind::Spacer => {
            let parent_axis = entry.parent.and_then(|parent| stack_axis(tree.node(parent).node));
            if parent_axis == Some(axis) {
                SizingBehavior::ExpandFill
            } else {
                SizingBehavior::Wrap
            }
        }
        NodeKind::Divider => {
            let flow = ancestor_stack_axis(tree, index).unwrap_or(Axis::Vertical);
            if flow == axis {
                SizingBehavior::Wrap
            } else {
                SizingBehavior::ExpandFill
            }
        }
        NodeKind::VStack(_) | NodeKind::HStack(_) | NodeKind::ZStack(_) => {
            if entry
                .children
                .iter()
                .any(|&child| behavior(tree, child, axis) == SizingBehavior::ExpandFill)
            {
                SizingBehavior::ExpandFill
            } else {
                SizingBehavior::Wrap
            }
        }
        NodeKind::Icon(_) | NodeKind::PageControl(_) => SizingBehavior::Wrap,
    }
}

fn resizing_behavior(mode: ResizingMode) -> SizingBehavior {
    match mode {
        ResizingMode::Original => SizingBehavior::Wrap,
        _ => SizingBehavior::ExpandFill,
    }
}

/// The main axis of a linear stack node, if it is one.
pub(crate) fn stack_axis(node: &Node) -> Option<Axis> {
    match &node.kind {
        NodeKind::VStack(_) => Some(Axis::Vertical),
        NodeKind::HStack(_) => Some(Axis::Horizontal),
        _ => None,
    }
}

/// The orientation of the nearest ancestor linear stack.
pub(crate) fn ancestor_stack_axis(tree: &LayoutTree, index: NodeIndex) -> Option<Axis> {
    let mut current = tree.node(index).parent;
    while let Some(parent) = current {
        let entry = tree.node(parent);
        if let Some(axis) = stack_axis(entry.node) {
            return Some(axis);
        }
        current = entry.parent;
    }
    None
}

/// Whether the subtree contains truncated text that wants more
/// horizontal room.
pub(crate) fn wants_text_room(tree: &LayoutTree, ctx: &LayoutContext, index: NodeIndex) -> bool {
    if let Some(info) = &ctx.text[index.0] {
        if info.truncated {
            return true;
        }
    }
    tree.node(index)
        .children
        .iter()
        .any(|&child| wants_text_room(tree, ctx, child))
}

/// The first-text-baseline offset of a node, measured from the top of
/// its box. Containers report the first text descendant, treated as if
/// positioned at the content origin.
pub(crate) fn first_baseline(tree: &LayoutTree, ctx: &LayoutContext, index: NodeIndex) -> Option<f64> {
    if let Some(info) = &ctx.text[index.0] {
        return Some(info.baseline);
    }
    let entry = tree.node(index);
    entry
        .children
        .iter()
        .find_map(|&child| first_baseline(tree, ctx, child))
        .map(|baseline| baseline + entry.node.padding.top)
}
