//! Constraint propagation model.
//!
//! During sizing every node receives a pair of single-axis constraints
//! from its parent. A constraint is either a definite extent or
//! unbounded; unbounded exists only while constraints propagate and is
//! always resolved to a finite value before geometry is recorded.

use mural_core::{Axis, Frame, MaxDimension};

/// Sentinel extent used as the provisional value of an unbounded axis
/// while resolving an aspect-ratio box.
pub(crate) const ASPECT_SENTINEL: f64 = 10_000.0;

/// A single-axis sizing constraint handed down during measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    /// A definite numeric extent.
    Value(f64),
    /// Unlimited extent; the child takes its natural size.
    Unbounded,
}

impl Dimension {
    /// The numeric extent, if definite.
    pub fn value(self) -> Option<f64> {
        match self {
            Dimension::Value(v) => Some(v),
            Dimension::Unbounded => None,
        }
    }

    /// The numeric extent, or `fallback` when unbounded.
    pub fn unwrap_or(self, fallback: f64) -> f64 {
        match self {
            Dimension::Value(v) => v,
            Dimension::Unbounded => fallback,
        }
    }

    /// Whether this constraint is unbounded.
    pub fn is_unbounded(self) -> bool {
        matches!(self, Dimension::Unbounded)
    }

    /// Shrink a definite constraint by `amount`, clamping at zero.
    pub fn shrink(self, amount: f64) -> Dimension {
        match self {
            Dimension::Value(v) => Dimension::Value((v - amount).max(0.0)),
            Dimension::Unbounded => Dimension::Unbounded,
        }
    }
}

/// The width/height constraint pair passed to a child during measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: Dimension,
    pub height: Dimension,
}

impl Dimensions {
    /// Create a constraint pair.
    pub fn new(width: Dimension, height: Dimension) -> Self {
        Self { width, height }
    }

    /// A pair of definite constraints.
    pub fn value(width: f64, height: f64) -> Self {
        Self {
            width: Dimension::Value(width),
            height: Dimension::Value(height),
        }
    }

    /// A pair of unbounded constraints.
    pub fn unbounded() -> Self {
        Self {
            width: Dimension::Unbounded,
            height: Dimension::Unbounded,
        }
    }

    /// The constraint along an axis.
    pub fn along(self, axis: Axis) -> Dimension {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Build a pair from a main-axis and a cross-axis constraint.
    pub fn from_axes(axis: Axis, main: Dimension, cross: Dimension) -> Self {
        match axis {
            Axis::Horizontal => Self::new(main, cross),
            Axis::Vertical => Self::new(cross, main),
        }
    }
}

/// One axis of a node's frame, with fixed-wins precedence applied.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FrameAxis {
    pub fixed: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<MaxDimension>,
}

impl FrameAxis {
    pub(crate) const NONE: FrameAxis = FrameAxis {
        fixed: None,
        min: None,
        max: None,
    };
}

/// Extract one axis of a frame. A fixed frame suppresses the flexible
/// fields entirely.
pub(crate) fn frame_axis(frame: Option<&Frame>, axis: Axis) -> FrameAxis {
    let Some(frame) = frame else {
        return FrameAxis::NONE;
    };
    if frame.is_fixed() {
        let fixed = match axis {
            Axis::Horizontal => frame.width,
            Axis::Vertical => frame.height,
        };
        FrameAxis {
            fixed,
            min: None,
            max: None,
        }
    } else {
        match axis {
            Axis::Horizontal => FrameAxis {
                fixed: None,
                min: frame.min_width,
                max: frame.max_width,
            },
            Axis::Vertical => FrameAxis {
                fixed: None,
                min: frame.min_height,
                max: frame.max_height,
            },
        }
    }
}

/// Derive the effective constraint for one axis from the parent-supplied
/// constraint and the node's frame.
pub(crate) fn resolve_axis(parent: Dimension, frame: FrameAxis) -> Dimension {
    if let Some(fixed) = frame.fixed {
        return Dimension::Value(fixed.max(0.0));
    }
    match parent {
        Dimension::Unbounded => match frame.min {
            Some(min) => Dimension::Value(min.max(0.0)),
            // A finite max shrink-wraps to content and clips afterwards,
            // so the constraint stays open either way.
            None => Dimension::Unbounded,
        },
        Dimension::Value(parent) => match frame.max {
            Some(MaxDimension::Finite(max)) => Dimension::Value(max.min(parent).max(0.0)),
            Some(MaxDimension::Infinite) => Dimension::Value(parent.max(0.0)),
            None => match frame.min {
                Some(min) => Dimension::Value(parent.max(min).max(0.0)),
                None => Dimension::Value(parent.max(0.0)),
            },
        },
    }
}

/// Combine a measured extent with the frame to produce the final outer
/// extent for one axis.
///
/// A fixed frame wins outright. With both bounds present the result is
/// the median of `(min, measured, max)`; a lone bound clamps; an
/// infinite max grows to fill a definite parent constraint.
pub(crate) fn apply_frame_axis(measured: f64, frame: FrameAxis, available: Dimension) -> f64 {
    let size = if let Some(fixed) = frame.fixed {
        fixed
    } else {
        match (frame.min, frame.max) {
            (Some(min), Some(MaxDimension::Finite(max))) => median3(min, measured, max),
            (Some(min), Some(MaxDimension::Infinite)) => available.unwrap_or(measured).max(min),
            (Some(min), None) => measured.max(min),
            (None, Some(MaxDimension::Finite(max))) => measured.min(max),
            (None, Some(MaxDimension::Infinite)) => available.unwrap_or(measured),
            (None, None) => measured,
        }
    };
    size.max(0.0)
}

/// Resolve the box of a node carrying an aspect ratio (`width / height`).
///
/// Unbounded axes take a large provisional value; with both axes
/// unbounded the box fits the root viewport instead, choosing whichever
/// orientation keeps the derived axis inside the other root dimension.
pub(crate) fn resolve_aspect_ratio(bounds: Dimensions, ratio: f64, root: (f64, f64)) -> (f64, f64) {
    if bounds.width.is_unbounded() && bounds.height.is_unbounded() {
        let width_driven_height = root.0 / ratio;
        return if width_driven_height <= root.1 {
            (root.0, width_driven_height)
        } else {
            (root.1 * ratio, root.1)
        };
    }

    let width = bounds.width.unwrap_or(ASPECT_SENTINEL);
    let height = bounds.height.unwrap_or(ASPECT_SENTINEL);
    if width / ratio <= height {
        (width, width / ratio)
    } else {
        (height * ratio, height)
    }
}

/// Median of three values.
fn median3(a: f64, b: f64, c: f64) -> f64 {
    let mut values = [a, b, c];
    values.sort_by(f64::total_cmp);
    values[1]
}
