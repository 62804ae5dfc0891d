//! Shared value types for the Mural node schema.

use std::fmt;

/// Unique identifier for a node within a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    Horizontal,
    #[default]
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    pub fn cross(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Nine-point compass alignment for a child within a container box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    TopLeading,
    Top,
    TopTrailing,
    Leading,
    #[default]
    Center,
    Trailing,
    BottomLeading,
    Bottom,
    BottomTrailing,
}

impl Alignment {
    /// The horizontal component of this alignment.
    pub fn horizontal(self) -> HorizontalAlignment {
        match self {
            Alignment::TopLeading | Alignment::Leading | Alignment::BottomLeading => {
                HorizontalAlignment::Leading
            }
            Alignment::Top | Alignment::Center | Alignment::Bottom => HorizontalAlignment::Center,
            Alignment::TopTrailing | Alignment::Trailing | Alignment::BottomTrailing => {
                HorizontalAlignment::Trailing
            }
        }
    }

    /// The vertical component of this alignment.
    pub fn vertical(self) -> VerticalAlignment {
        match self {
            Alignment::TopLeading | Alignment::Top | Alignment::TopTrailing => {
                VerticalAlignment::Top
            }
            Alignment::Leading | Alignment::Center | Alignment::Trailing => {
                VerticalAlignment::Center
            }
            Alignment::BottomLeading | Alignment::Bottom | Alignment::BottomTrailing => {
                VerticalAlignment::Bottom
            }
        }
    }
}

/// Cross-axis alignment for children of a vertical stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HorizontalAlignment {
    Leading,
    #[default]
    Center,
    Trailing,
}

/// Cross-axis alignment for children of a horizontal stack.
///
/// `FirstTextBaseline` aligns text-bearing children by the baseline of
/// their first line instead of by box edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VerticalAlignment {
    Top,
    #[default]
    Center,
    Bottom,
    FirstTextBaseline,
}

/// Padding around a node's content box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Padding {
    pub top: f64,
    pub bottom: f64,
    pub leading: f64,
    pub trailing: f64,
}

impl Padding {
    /// Create uniform padding.
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            bottom: value,
            leading: value,
            trailing: value,
        }
    }

    /// Create symmetric padding.
    pub fn symmetric(horizontal: f64, vertical: f64) -> Self {
        Self {
            top: vertical,
            bottom: vertical,
            leading: horizontal,
            trailing: horizontal,
        }
    }

    /// Total horizontal padding.
    pub fn horizontal(&self) -> f64 {
        self.leading + self.trailing
    }

    /// Total vertical padding.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    /// Total padding along an axis.
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.horizontal(),
            Axis::Vertical => self.vertical(),
        }
    }
}

/// Upper bound of a flexible frame axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaxDimension {
    /// Bounded by a definite extent.
    Finite(f64),
    /// The node may grow to fill whatever space the parent offers.
    Infinite,
}

/// Sizing frame attached to a node.
///
/// A frame is either fixed (`width`/`height` set) or flexible
/// (`min_*`/`max_*` set). When a malformed document populates both
/// families, the fixed fields win and the flexible fields are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Frame {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub min_width: Option<f64>,
    pub max_width: Option<MaxDimension>,
    pub min_height: Option<f64>,
    pub max_height: Option<MaxDimension>,
    pub alignment: Alignment,
}

impl Frame {
    /// A frame fixing both extents.
    pub fn fixed(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    /// A frame fixing only the width.
    pub fn fixed_width(width: f64) -> Self {
        Self {
            width: Some(width),
            ..Default::default()
        }
    }

    /// A frame fixing only the height.
    pub fn fixed_height(height: f64) -> Self {
        Self {
            height: Some(height),
            ..Default::default()
        }
    }

    /// A flexible frame that fills all offered space on both axes.
    pub fn fill() -> Self {
        Self {
            max_width: Some(MaxDimension::Infinite),
            max_height: Some(MaxDimension::Infinite),
            ..Default::default()
        }
    }

    /// Set the minimum width.
    pub fn with_min_width(mut self, value: f64) -> Self {
        self.min_width = Some(value);
        self
    }

    /// Set the maximum width.
    pub fn with_max_width(mut self, value: MaxDimension) -> Self {
        self.max_width = Some(value);
        self
    }

    /// Set the minimum height.
    pub fn with_min_height(mut self, value: f64) -> Self {
        self.min_height = Some(value);
        self
    }

    /// Set the maximum height.
    pub fn with_max_height(mut self, value: MaxDimension) -> Self {
        self.max_height = Some(value);
        self
    }

    /// Set the content alignment.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Whether this frame fixes at least one extent.
    ///
    /// Fixed frames take precedence: when `is_fixed` is true the
    /// flexible min/max fields are ignored entirely.
    pub fn is_fixed(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_cross() {
        assert_eq!(Axis::Horizontal.cross(), Axis::Vertical);
        assert_eq!(Axis::Vertical.cross(), Axis::Horizontal);
    }

    #[test]
    fn test_alignment_components() {
        assert_eq!(
            Alignment::BottomTrailing.horizontal(),
            HorizontalAlignment::Trailing
        );
        assert_eq!(Alignment::BottomTrailing.vertical(), VerticalAlignment::Bottom);
        assert_eq!(Alignment::Center.horizontal(), HorizontalAlignment::Center);
        assert_eq!(Alignment::Center.vertical(), VerticalAlignment::Center);
        assert_eq!(Alignment::TopLeading.horizontal(), HorizontalAlignment::Leading);
    }

    #[test]
    fn test_padding_totals() {
        let padding = Padding::symmetric(8.0, 4.0);
        assert!((padding.horizontal() - 16.0).abs() < 0.001);
        assert!((padding.vertical() - 8.0).abs() < 0.001);
        assert!((padding.along(Axis::Horizontal) - 16.0).abs() < 0.001);
    }

    #[test]
    fn test_frame_is_fixed() {
        assert!(Frame::fixed(100.0, 50.0).is_fixed());
        assert!(Frame::fixed_width(100.0).is_fixed());
        assert!(!Frame::fill().is_fixed());
        assert!(!Frame::default().with_min_width(10.0).is_fixed());
    }
}
