//! Leaf node measurement: text, images, shapes, spacers, dividers,
//! page controls, and icons.

use std::borrow::Cow;

use mural_core::{
    Axis, IconNode, ImageNode, MediaNode, PageControlNode, PageControlStyle, ResizingMode,
    TextNode, TextTransform,
};

use crate::compute::{LayoutContext, TextInfo};
use crate::constraint::Dimensions;
use crate::text::{measure_text, TextStyle};
use crate::tree::{LayoutTree, NodeIndex};

use super::{ancestor_stack_axis, finish_node, inner_constraints, stack_axis, Size};

/// Hairline divider thickness.
const DIVIDER_THICKNESS: f64 = 1.0;

/// Diameter of a default page indicator dot.
const PAGE_INDICATOR_DIAMETER: f64 = 7.0;

/// Gap between page indicators.
const PAGE_INDICATOR_SPACING: f64 = 9.0;

pub(crate) fn measure_text_node(
    tree: &LayoutTree,
    ctx: &mut LayoutContext,
    index: NodeIndex,
    text: &TextNode,
    bounds: Dimensions,
) -> Size {
    let node = tree.node(index).node;
    let inner = inner_constraints(node, bounds);

    let font_size = if text.font_size > 0.0 {
        text.font_size
    } else {
        ctx.options.default_font_size
    };
    let style = TextStyle {
        font_size,
        font_weight: text.font_weight,
        line_height: ctx.options.default_line_height,
    };
    let content = transform_text(&text.text, text.transform);
    let metrics = measure_text(&content, &style, inner.width.value(), text.line_limit);

    ctx.text[index.0] = Some(TextInfo {
        baseline: node.padding.top + metrics.baseline,
        truncated: metrics.truncated,
    });

    finish_node(tree, ctx, index, metrics.width, metrics.height, bounds)
}

fn transform_text(text: &str, transform: TextTransform) -> Cow<'_, str> {
    match transform {
        TextTransform::None => Cow::Borrowed(text),
        TextTransform::Uppercase => Cow::Owned(text.to_uppercase()),
        TextTransform::Lowercase => Cow::Owned(text.to_lowercase()),
    }
}

pub(crate) fn measure_image(
    tree: &LayoutTree,
    ctx: &mut LayoutContext,
    index: NodeIndex,
    image: &ImageNode,
    bounds: Dimensions,
) -> Size {
    let node = tree.node(index).node;
    let inner = inner_constraints(node, bounds);

    let scale = if image.resolution > 0.0 {
        image.resolution
    } else {
        1.0
    };
    let (width, height) = scaled_box(
        image.resizing_mode,
        image.source_width / scale,
        image.source_height / scale,
        inner,
    );
    finish_node(tree, ctx, index, width, height, bounds)
}

pub(crate) fn measure_media(
    tree: &LayoutTree,
    ctx: &mut LayoutContext,
    index: NodeIndex,
    media: &MediaNode,
    bounds: Dimensions,
) -> Size {
    let node = tree.node(index).node;
    let inner = inner_constraints(node, bounds);

    let (width, height) = scaled_box(
        media.resizing_mode,
        media.source_width,
        media.source_height,
        inner,
    );
    finish_node(tree, ctx, index, width, height, bounds)
}

/// The content box an image-like source occupies under a resizing mode.
fn scaled_box(
    mode: ResizingMode,
    natural_width: f64,
    natural_height: f64,
    inner: Dimensions,
) -> (f64, f64) {
    let width = inner.width.value();
    let height = inner.height.value();

    if matches!(mode, ResizingMode::ScaleToFit | ResizingMode::ScaleToFill)
        && (natural_width <= 0.0 || natural_height <= 0.0)
    {
        // Degenerate source dimensions: occupy the constraint box.
        return (width.unwrap_or(0.0), height.unwrap_or(0.0));
    }

    match mode {
        ResizingMode::Original => (natural_width.max(0.0), natural_height.max(0.0)),
        ResizingMode::ScaleToFit => match (width, height) {
            (Some(w), Some(h)) => {
                let scale = (w / natural_width).min(h / natural_height);
                (natural_width * scale, natural_height * scale)
            }
            (Some(w), None) => (w, w * natural_height / natural_width),
            (None, Some(h)) => (h * natural_width / natural_height, h),
            (None, None) => (natural_width, natural_height),
        },
        ResizingMode::ScaleToFill => match (width, height) {
            // The source covers the whole box; cropping happens at render.
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w * natural_height / natural_width),
            (None, Some(h)) => (h * natural_width / natural_height, h),
            (None, None) => (natural_width, natural_height),
        },
        ResizingMode::Stretch | ResizingMode::Tile => (
            width.unwrap_or(natural_width.max(0.0)),
            height.unwrap_or(natural_height.max(0.0)),
        ),
    }
}

pub(crate) fn measure_rectangle(
    tree: &LayoutTree,
    ctx: &mut LayoutContext,
    index: NodeIndex,
    bounds: Dimensions,
) -> Size {
    let node = tree.node(index).node;
    let inner = inner_constraints(node, bounds);

    // No intrinsic size: a rectangle occupies whatever the constraint
    // gives and collapses to zero when unbounded.
    let width = inner.width.unwrap_or(0.0);
    let height = inner.height.unwrap_or(0.0);
    finish_node(tree, ctx, index, width, height, bounds)
}

pub(crate) fn measure_spacer(
    tree: &LayoutTree,
    ctx: &mut LayoutContext,
    index: NodeIndex,
    bounds: Dimensions,
) -> Size {
    let entry = tree.node(index);
    let node = entry.node;
    let inner = inner_constraints(node, bounds);

    // A spacer only claims space along the main axis of the stack that
    // directly contains it.
    let parent_axis = entry.parent.and_then(|parent| stack_axis(tree.node(parent).node));
    let (width, height) = match parent_axis {
        Some(Axis::Horizontal) => (inner.width.unwrap_or(0.0), 0.0),
        Some(Axis::Vertical) => (0.0, inner.height.unwrap_or(0.0)),
        None => (0.0, 0.0),
    };
    finish_node(tree, ctx, index, width, height, bounds)
}

pub(crate) fn measure_divider(
    tree: &LayoutTree,
    ctx: &mut LayoutContext,
    index: NodeIndex,
    bounds: Dimensions,
) -> Size {
    let node = tree.node(index).node;
    let inner = inner_constraints(node, bounds);

    // Hairline across the flow of the nearest ancestor stack, full
    // extent along the perpendicular.
    let flow = ancestor_stack_axis(tree, index).unwrap_or(Axis::Vertical);
    let (width, height) = match flow {
        Axis::Vertical => (inner.width.unwrap_or(0.0), DIVIDER_THICKNESS),
        Axis::Horizontal => (DIVIDER_THICKNESS, inner.height.unwrap_or(0.0)),
    };
    finish_node(tree, ctx, index, width, height, bounds)
}

pub(crate) fn measure_page_control(
    tree: &LayoutTree,
    ctx: &mut LayoutContext,
    index: NodeIndex,
    control: &PageControlNode,
    bounds: Dimensions,
) -> Size {
    // A missing or empty carousel falls back to a single indicator.
    let pages = control
        .carousel_id
        .and_then(|id| tree.index_of(id))
        .map(|carousel| tree.node(carousel).children.len())
        .filter(|&count| count > 0)
        .unwrap_or(1);

    let (indicator_width, indicator_height) = match &control.style {
        PageControlStyle::Default => (PAGE_INDICATOR_DIAMETER, PAGE_INDICATOR_DIAMETER),
        PageControlStyle::Image { normal, current } => (
            normal.width.max(current.width),
            normal.height.max(current.height),
        ),
    };

    let width = pages as f64 * indicator_width + (pages - 1) as f64 * PAGE_INDICATOR_SPACING;
    finish_node(tree, ctx, index, width, indicator_height, bounds)
}

pub(crate) fn measure_icon(
    tree: &LayoutTree,
    ctx: &mut LayoutContext,
    index: NodeIndex,
    icon: &IconNode,
    bounds: Dimensions,
) -> Size {
    let size = icon.size.max(0.0);
    finish_node(tree, ctx, index, size, size, bounds)
}
