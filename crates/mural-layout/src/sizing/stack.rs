//! Linear and overlay stack measurement.
//!
//! Both linear stacks share one distribution algorithm: per layout
//! priority group, highest first, wrap-behavior children size to content
//! against the remaining budget, then expand-fill children split what is
//! left. The split runs two bounded fixed-point loops: one removing
//! children whose declared extent exceeds the even share, and one
//! reclaiming slack left behind by children that could not use their
//! share.

use std::collections::BTreeMap;

use mural_core::Axis;
use smallvec::SmallVec;
use tracing::trace;

use crate::compute::LayoutContext;
use crate::constraint::{frame_axis, Dimension, Dimensions};
use crate::tree::{LayoutTree, NodeIndex};

use super::{
    behavior, finish_node, first_baseline, inner_constraints, measure, probe, wants_text_room,
    Size, SizingBehavior, EPSILON,
};

pub(crate) fn measure_stack(
    tree: &LayoutTree,
    ctx: &mut LayoutContext,
    index: NodeIndex,
    axis: Axis,
    spacing: f64,
    baseline_aligned: bool,
    bounds: Dimensions,
) -> Size {
    let entry = tree.node(index);
    let node = entry.node;
    let children = &entry.children;

    if children.is_empty() {
        return finish_node(tree, ctx, index, 0.0, 0.0, bounds);
    }

    let inner = inner_constraints(node, bounds);
    let spacing_total = spacing * (children.len() - 1) as f64;
    let main_bound = inner.along(axis);
    let cross_bound = inner.along(axis.cross());

    // Children grouped by layout priority; higher priority claims first.
    let mut groups: BTreeMap<i32, SmallVec<[NodeIndex; 8]>> = BTreeMap::new();
    for &child in children {
        groups
            .entry(tree.node(child).node.layout_priority)
            .or_default()
            .push(child);
    }

    match main_bound {
        Dimension::Unbounded => {
            // No distribution: every child takes its natural extent.
            for &child in children {
                measure(
                    tree,
                    ctx,
                    child,
                    Dimensions::from_axes(axis, Dimension::Unbounded, cross_bound),
                );
            }
        }
        Dimension::Value(total) => {
            let mut remaining = (total - spacing_total).max(0.0);
            for (_, group) in groups.iter().rev() {
                let consumed = distribute_group(tree, ctx, group, axis, cross_bound, remaining);
                remaining = (remaining - consumed).max(0.0);
            }
        }
    }

    let main_sum: f64 = children
        .iter()
        .map(|&child| size_along(ctx, child, axis))
        .sum::<f64>()
        + spacing_total;
    let cross_max = cross_extent(tree, ctx, children, axis, baseline_aligned);
    let content = Size::from_axes(axis, main_sum, cross_max);
    finish_node(tree, ctx, index, content.width, content.height, bounds)
}

/// Distribute `budget` main-axis space across one priority group.
/// Returns the space the group consumed.
fn distribute_group(
    tree: &LayoutTree,
    ctx: &mut LayoutContext,
    group: &[NodeIndex],
    axis: Axis,
    cross: Dimension,
    budget: f64,
) -> f64 {
    let mut wrap: SmallVec<[NodeIndex; 8]> = SmallVec::new();
    let mut fill: SmallVec<[NodeIndex; 8]> = SmallVec::new();
    for &child in group {
        match behavior(tree, child, axis) {
            SizingBehavior::Wrap => wrap.push(child),
            SizingBehavior::ExpandFill => fill.push(child),
        }
    }

    // Wrap-behavior children size to content against what is left.
    let mut consumed_wrap = 0.0;
    for &child in &wrap {
        let offered = (budget - consumed_wrap).max(0.0);
        let size = measure(
            tree,
            ctx,
            child,
            Dimensions::from_axes(axis, Dimension::Value(offered), cross),
        );
        consumed_wrap += size.along(axis);
    }

    if fill.is_empty() {
        return consumed_wrap;
    }

    let fill_budget = (budget - consumed_wrap).max(0.0);

    // Children whose declared fixed/min extent exceeds the even share
    // leave the pool and keep their declared extent; the share is
    // recomputed over the shrinking pool until no child needs removing.
    let mut pool: SmallVec<[NodeIndex; 8]> = fill.clone();
    let mut oversized: SmallVec<[(NodeIndex, f64); 8]> = SmallVec::new();
    let mut available = fill_budget;
    loop {
        if pool.is_empty() {
            break;
        }
        let share = available / pool.len() as f64;
        let mut changed = false;
        pool.retain(|child| {
            let child = *child;
            if let Some(declared) = declared_main_extent(tree, child, axis) {
                if declared > share + EPSILON {
                    oversized.push((child, declared));
                    available = (available - declared).max(0.0);
                    changed = true;
                    return false;
                }
            }
            true
        });
        if !changed {
            break;
        }
    }

    struct FillState {
        index: NodeIndex,
        alloc: f64,
        measured: f64,
    }

    let share = if pool.is_empty() {
        0.0
    } else {
        available / pool.len() as f64
    };
    let mut states: Vec<FillState> = Vec::with_capacity(fill.len());
    for &(child, declared) in &oversized {
        let size = probe(
            tree,
            ctx,
            child,
            Dimensions::from_axes(axis, Dimension::Value(declared), cross),
        );
        states.push(FillState {
            index: child,
            alloc: declared,
            measured: size.along(axis),
        });
    }
    for &child in &pool {
        let size = probe(
            tree,
            ctx,
            child,
            Dimensions::from_axes(axis, Dimension::Value(share), cross),
        );
        states.push(FillState {
            index: child,
            alloc: share,
            measured: size.along(axis),
        });
    }

    // Slack reclaim: space a child left unused goes back to the children
    // that can still use it. Bounded: stops when no slack remains, when
    // the candidate set stops changing, or when the slack itself stops
    // moving.
    let mut prev_candidates: Vec<NodeIndex> = Vec::new();
    let mut prev_slack = f64::INFINITY;
    let mut rounds = 0u32;
    loop {
        let consumed: f64 = states.iter().map(|state| state.measured).sum();
        let slack = fill_budget - consumed;
        if slack <= EPSILON || (prev_slack - slack).abs() <= EPSILON {
            break;
        }

        let candidates: Vec<usize> = if pool.is_empty() {
            // Every fill child exceeded its share; remaining space is
            // offered back to all of them.
            (0..states.len()).collect()
        } else {
            states
                .iter()
                .enumerate()
                .filter(|(_, state)| {
                    pool.contains(&state.index)
                        && (state.measured + EPSILON >= state.alloc
                            || (axis == Axis::Horizontal
                                && wants_text_room(tree, ctx, state.index)))
                })
                .map(|(i, _)| i)
                .collect()
        };
        let names: Vec<NodeIndex> = candidates.iter().map(|&i| states[i].index).collect();
        if candidates.is_empty() || names == prev_candidates {
            break;
        }

        let candidate_consumed: f64 = candidates.iter().map(|&i| states[i].measured).sum();
        let new_share = (candidate_consumed + slack) / candidates.len() as f64;
        for &i in &candidates {
            let child = states[i].index;
            let size = probe(
                tree,
                ctx,
                child,
                Dimensions::from_axes(axis, Dimension::Value(new_share), cross),
            );
            states[i].alloc = new_share;
            states[i].measured = size.along(axis);
        }
        prev_candidates = names;
        prev_slack = slack;
        rounds += 1;
    }
    if rounds > 0 {
        trace!(rounds, "stack slack reclaim settled");
    }

    // Commit every fill child at its settled allocation.
    let mut consumed_fill = 0.0;
    for state in &states {
        let size = measure(
            tree,
            ctx,
            state.index,
            Dimensions::from_axes(axis, Dimension::Value(state.alloc), cross),
        );
        consumed_fill += size.along(axis);
    }

    consumed_wrap + consumed_fill
}

/// The fixed or minimum main-axis extent a child declares through its
/// frame, if any.
fn declared_main_extent(tree: &LayoutTree, index: NodeIndex, axis: Axis) -> Option<f64> {
    let frame = frame_axis(tree.node(index).node.frame.as_ref(), axis);
    frame.fixed.or(frame.min)
}

fn size_along(ctx: &LayoutContext, index: NodeIndex, axis: Axis) -> f64 {
    let geometry = &ctx.geometry[index.0];
    match axis {
        Axis::Horizontal => geometry.width,
        Axis::Vertical => geometry.height,
    }
}

fn cross_extent(
    tree: &LayoutTree,
    ctx: &LayoutContext,
    children: &[NodeIndex],
    axis: Axis,
    baseline_aligned: bool,
) -> f64 {
    if baseline_aligned && axis == Axis::Horizontal {
        if let Some(extent) = baseline_cross_extent(tree, ctx, children) {
            return extent;
        }
    }
    children
        .iter()
        .map(|&child| size_along(ctx, child, axis.cross()))
        .fold(0.0_f64, f64::max)
}

/// Cross extent of a baseline-aligned row.
///
/// The row must fit both the deepest descent and the tallest ascent
/// among its text-bearing children, not just the tallest overall box.
fn baseline_cross_extent(
    tree: &LayoutTree,
    ctx: &LayoutContext,
    children: &[NodeIndex],
) -> Option<f64> {
    let mut rows: SmallVec<[(f64, f64); 8]> = SmallVec::new();
    let mut plain_max = 0.0_f64;
    for &child in children {
        let height = size_along(ctx, child, Axis::Vertical);
        match first_baseline(tree, ctx, child) {
            Some(baseline) => rows.push((height, baseline)),
            None => plain_max = plain_max.max(height),
        }
    }
    if rows.is_empty() {
        return None;
    }

    let anchor = rows
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| (a.0 - a.1).total_cmp(&(b.0 - b.1)))
        .map(|(i, _)| i)?;
    let (anchor_height, anchor_baseline) = rows[anchor];
    let descent = anchor_height - anchor_baseline;
    let max_ascent = rows
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != anchor)
        .map(|(_, &(_, baseline))| baseline)
        .fold(0.0_f64, f64::max);

    Some(anchor_height.max(descent + max_ascent).max(plain_max))
}

pub(crate) fn measure_zstack(
    tree: &LayoutTree,
    ctx: &mut LayoutContext,
    index: NodeIndex,
    bounds: Dimensions,
) -> Size {
    let entry = tree.node(index);
    let node = entry.node;
    let children = &entry.children;

    if children.is_empty() {
        return finish_node(tree, ctx, index, 0.0, 0.0, bounds);
    }

    let inner = inner_constraints(node, bounds);

    let mut groups: BTreeMap<i32, SmallVec<[NodeIndex; 8]>> = BTreeMap::new();
    for &child in children {
        groups
            .entry(tree.node(child).node.layout_priority)
            .or_default()
            .push(child);
    }

    // The highest priority group establishes the box.
    let mut iter = groups.iter().rev();
    let Some((_, top)) = iter.next() else {
        return finish_node(tree, ctx, index, 0.0, 0.0, bounds);
    };
    for &child in top {
        measure(tree, ctx, child, inner);
    }
    let box_width = top
        .iter()
        .map(|&child| ctx.geometry[child.0].width)
        .fold(0.0_f64, f64::max);
    let box_height = top
        .iter()
        .map(|&child| ctx.geometry[child.0].height)
        .fold(0.0_f64, f64::max);

    // Remeasure at the now-fixed box so unconstrained children expand to
    // fill it, then measure the lower groups against it.
    for &child in top {
        measure(tree, ctx, child, Dimensions::value(box_width, box_height));
    }
    for (_, group) in iter {
        for &child in group {
            measure(tree, ctx, child, Dimensions::value(box_width, box_height));
        }
    }

    finish_node(tree, ctx, index, box_width, box_height, bounds)
}

#[cfg(test)]
mod tests {
    use crate::compute::{compute_layout, LayoutOptions};
    use mural_core::{
        Frame, HStackNode, MaxDimension, Node, NodeId, NodeKind, Padding, RectangleNode, Screen,
        ScrollContainerNode, TextNode, VStackNode, VerticalAlignment,
    };

    fn rectangle(id: u64) -> Node {
        Node::new(NodeId(id), NodeKind::Rectangle(RectangleNode::default()))
    }

    fn hstack(id: u64, children: &[u64]) -> Node {
        Node::new(NodeId(id), NodeKind::HStack(HStackNode::default()))
            .with_children(children.iter().map(|&c| NodeId(c)))
    }

    fn vstack(id: u64, children: &[u64]) -> Node {
        Node::new(NodeId(id), NodeKind::VStack(VStackNode::default()))
            .with_children(children.iter().map(|&c| NodeId(c)))
    }

    fn options(width: f64, height: f64) -> LayoutOptions {
        LayoutOptions {
            viewport_width: width,
            viewport_height: height,
            ..Default::default()
        }
    }

    #[test]
    fn test_equal_distribution() {
        let screen = Screen::new(
            NodeId(1),
            vec![hstack(1, &[2, 3, 4]), rectangle(2), rectangle(3), rectangle(4)],
        );
        let layout = compute_layout(&screen, &options(300.0, 100.0)).unwrap();

        for (id, expected_x) in [(2, 0.0), (3, 100.0), (4, 200.0)] {
            let geometry = layout.geometry(NodeId(id)).unwrap();
            assert!(
                (geometry.width - 100.0).abs() < 0.001,
                "child {id} width: {}",
                geometry.width
            );
            assert!(
                (geometry.x - expected_x).abs() < 0.001,
                "child {id} x: {}",
                geometry.x
            );
        }
    }

    #[test]
    fn test_fixed_children_containment() {
        // Stack size is exactly the sum of fixed children plus spacing
        // plus padding.
        let stack = Node::new(
            NodeId(1),
            NodeKind::VStack(VStackNode {
                spacing: 10.0,
                ..Default::default()
            }),
        )
        .with_padding(Padding::uniform(5.0))
        .with_children([NodeId(2), NodeId(3), NodeId(4)]);

        let screen = Screen::new(
            NodeId(1),
            vec![
                stack,
                rectangle(2).with_frame(Frame::fixed(80.0, 30.0)),
                rectangle(3).with_frame(Frame::fixed(80.0, 40.0)),
                rectangle(4).with_frame(Frame::fixed(80.0, 50.0)),
            ],
        );
        let layout = compute_layout(&screen, &options(375.0, 812.0)).unwrap();

        let root = layout.geometry(NodeId(1)).unwrap();
        // 30 + 40 + 50 + 2 * 10 spacing + 10 padding
        assert!((root.height - 150.0).abs() < 0.001, "height: {}", root.height);
        assert!((root.width - 90.0).abs() < 0.001, "width: {}", root.width);
    }

    #[test]
    fn test_oversized_min_leaves_the_pool() {
        // A child whose declared minimum exceeds the even share keeps it,
        // and the others split what is left.
        let wide = rectangle(2).with_frame(Frame::default().with_min_width(200.0));
        let screen = Screen::new(
            NodeId(1),
            vec![hstack(1, &[2, 3, 4]), wide, rectangle(3), rectangle(4)],
        );
        let layout = compute_layout(&screen, &options(300.0, 100.0)).unwrap();

        assert!((layout.geometry(NodeId(2)).unwrap().width - 200.0).abs() < 0.001);
        assert!((layout.geometry(NodeId(3)).unwrap().width - 50.0).abs() < 0.001);
        assert!((layout.geometry(NodeId(4)).unwrap().width - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_slack_reclaim_after_capped_child() {
        // A child capped below its share returns the surplus to its
        // siblings.
        let capped =
            rectangle(2).with_frame(Frame::default().with_max_width(MaxDimension::Finite(40.0)));
        let screen = Screen::new(
            NodeId(1),
            vec![hstack(1, &[2, 3, 4]), capped, rectangle(3), rectangle(4)],
        );
        let layout = compute_layout(&screen, &options(300.0, 100.0)).unwrap();

        assert!((layout.geometry(NodeId(2)).unwrap().width - 40.0).abs() < 0.001);
        assert!((layout.geometry(NodeId(3)).unwrap().width - 130.0).abs() < 0.001);
        assert!((layout.geometry(NodeId(4)).unwrap().width - 130.0).abs() < 0.001);
    }

    #[test]
    fn test_short_text_returns_slack() {
        let screen = Screen::new(
            NodeId(1),
            vec![
                hstack(1, &[2, 3, 4]),
                Node::new(NodeId(2), NodeKind::Text(TextNode::new("Hi"))),
                rectangle(3),
                rectangle(4),
            ],
        );
        let layout = compute_layout(&screen, &options(300.0, 100.0)).unwrap();

        let text = layout.geometry(NodeId(2)).unwrap();
        let a = layout.geometry(NodeId(3)).unwrap();
        let b = layout.geometry(NodeId(4)).unwrap();

        assert!(text.width < 100.0, "short text should undershoot its share");
        assert!((a.width - b.width).abs() < 0.001);
        let total = text.width + a.width + b.width;
        assert!((total - 300.0).abs() < 0.001, "total: {total}");
    }

    #[test]
    fn test_higher_priority_claims_first() {
        let eager = rectangle(2).with_priority(1);
        let screen = Screen::new(NodeId(1), vec![hstack(1, &[2, 3]), eager, rectangle(3)]);
        let layout = compute_layout(&screen, &options(300.0, 100.0)).unwrap();

        assert!((layout.geometry(NodeId(2)).unwrap().width - 300.0).abs() < 0.001);
        assert!(layout.geometry(NodeId(3)).unwrap().width.abs() < 0.001);
    }

    #[test]
    fn test_priority_with_fixed_reservation() {
        // The high-priority fixed child reserves its extent; the rest of
        // the space goes to the lower group.
        let reserved = rectangle(2)
            .with_frame(Frame::fixed_width(120.0))
            .with_priority(1);
        let screen = Screen::new(NodeId(1), vec![hstack(1, &[2, 3]), reserved, rectangle(3)]);
        let layout = compute_layout(&screen, &options(300.0, 100.0)).unwrap();

        assert!((layout.geometry(NodeId(2)).unwrap().width - 120.0).abs() < 0.001);
        assert!((layout.geometry(NodeId(3)).unwrap().width - 180.0).abs() < 0.001);
    }

    #[test]
    fn test_all_children_demand_more_than_share() {
        // Adversarial input for the removal loop: every child declares
        // more than the even share. The loop must settle, and every
        // child keeps its declared extent.
        let screen = Screen::new(
            NodeId(1),
            vec![
                hstack(1, &[2, 3, 4]),
                rectangle(2).with_frame(Frame::default().with_min_width(150.0)),
                rectangle(3).with_frame(Frame::default().with_min_width(140.0)),
                rectangle(4).with_frame(Frame::default().with_min_width(130.0)),
            ],
        );
        let layout = compute_layout(&screen, &options(300.0, 100.0)).unwrap();

        assert!((layout.geometry(NodeId(2)).unwrap().width - 150.0).abs() < 0.001);
        assert!((layout.geometry(NodeId(3)).unwrap().width - 140.0).abs() < 0.001);
        assert!((layout.geometry(NodeId(4)).unwrap().width - 130.0).abs() < 0.001);
    }

    #[test]
    fn test_unbounded_stack_takes_natural_sizes() {
        // Inside a vertical scroll container the stack's height is
        // unbounded, so fixed children keep their natural extents.
        let screen = Screen::new(
            NodeId(1),
            vec![
                Node::new(
                    NodeId(1),
                    NodeKind::ScrollContainer(ScrollContainerNode::default()),
                )
                .with_children([NodeId(2)]),
                vstack(2, &[3, 4]),
                rectangle(3).with_frame(Frame::fixed(50.0, 400.0)),
                rectangle(4).with_frame(Frame::fixed(50.0, 500.0)),
            ],
        );
        let layout = compute_layout(&screen, &options(375.0, 812.0)).unwrap();

        assert!((layout.geometry(NodeId(2)).unwrap().height - 900.0).abs() < 0.001);
        assert!((layout.geometry(NodeId(1)).unwrap().height - 900.0).abs() < 0.001);
    }

    #[test]
    fn test_baseline_row_fits_ascent_and_descent() {
        // Child 2 is a column of two lines (shallow baseline, deep
        // descent); child 5 is a single big line (deep baseline). The
        // row must fit the deepest descent under the tallest ascent.
        let row = Node::new(
            NodeId(1),
            NodeKind::HStack(HStackNode {
                spacing: 0.0,
                alignment: VerticalAlignment::FirstTextBaseline,
            }),
        )
        .with_children([NodeId(2), NodeId(5)]);

        let screen = Screen::new(
            NodeId(1),
            vec![
                row,
                vstack(2, &[3, 4]),
                Node::new(NodeId(3), NodeKind::Text(TextNode::new("first"))),
                Node::new(NodeId(4), NodeKind::Text(TextNode::new("second"))),
                Node::new(
                    NodeId(5),
                    NodeKind::Text(TextNode::new("big").with_font_size(32.0)),
                ),
            ],
        );
        let layout = compute_layout(&screen, &options(600.0, 400.0)).unwrap();

        // Column: height 38.4, baseline 12.8, descent 25.6.
        // Big line: height 38.4, baseline 25.6, ascent 25.6.
        // Row height = descent + tallest other ascent = 51.2.
        let row = layout.geometry(NodeId(1)).unwrap();
        assert!((row.height - 51.2).abs() < 0.01, "row height: {}", row.height);

        // Positioning: baselines line up at the anchor (25.6).
        let column = layout.geometry(NodeId(2)).unwrap();
        let big = layout.geometry(NodeId(5)).unwrap();
        assert!((column.y - 12.8).abs() < 0.01, "column y: {}", column.y);
        assert!(big.y.abs() < 0.01, "big y: {}", big.y);
    }

    #[test]
    fn test_zstack_full_bleed_child_expands_to_siblings() {
        // Under an unbounded height the rectangle first collapses, the
        // fixed sibling establishes the box, and the remeasure pass
        // grows the rectangle to fill it.
        let screen = Screen::new(
            NodeId(1),
            vec![
                Node::new(
                    NodeId(1),
                    NodeKind::ScrollContainer(ScrollContainerNode::default()),
                )
                .with_children([NodeId(2)]),
                Node::new(NodeId(2), NodeKind::ZStack(Default::default()))
                    .with_children([NodeId(3), NodeId(4)]),
                rectangle(3),
                rectangle(4).with_frame(Frame::fixed(100.0, 50.0)),
            ],
        );
        let layout = compute_layout(&screen, &options(375.0, 812.0)).unwrap();

        let zstack = layout.geometry(NodeId(2)).unwrap();
        assert!((zstack.height - 50.0).abs() < 0.001);

        let full_bleed = layout.geometry(NodeId(3)).unwrap();
        assert!((full_bleed.width - 375.0).abs() < 0.001);
        assert!((full_bleed.height - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_spacer_pushes_siblings_apart() {
        let screen = Screen::new(
            NodeId(1),
            vec![
                hstack(1, &[2, 3, 4]),
                rectangle(2).with_frame(Frame::fixed(60.0, 20.0)),
                Node::new(NodeId(3), NodeKind::Spacer),
                rectangle(4).with_frame(Frame::fixed(60.0, 20.0)),
            ],
        );
        let layout = compute_layout(&screen, &options(300.0, 100.0)).unwrap();

        assert!((layout.geometry(NodeId(3)).unwrap().width - 180.0).abs() < 0.001);
        assert!((layout.geometry(NodeId(4)).unwrap().x - 240.0).abs() < 0.001);
    }
}
