//! The server-delivered node schema.
//!
//! A screen arrives as a flat list of nodes plus child-ID references;
//! the layout crate turns it into a tree and computes geometry for it.

use smallvec::SmallVec;

use crate::types::{Alignment, Axis, Frame, HorizontalAlignment, NodeId, Padding, VerticalAlignment};

/// A complete screen: a flat node list and the root reference.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Screen {
    /// All nodes of the screen, in document order.
    pub nodes: Vec<Node>,
    /// The node the layout pass starts from.
    pub root: NodeId,
}

impl Screen {
    /// Create a screen from a node list and its root.
    pub fn new(root: NodeId, nodes: Vec<Node>) -> Self {
        Self { nodes, root }
    }
}

/// One element of the screen's node tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Optional sizing frame (fixed or flexible).
    #[cfg_attr(feature = "serde", serde(default))]
    pub frame: Option<Frame>,
    /// Padding between the outer box and the content box.
    #[cfg_attr(feature = "serde", serde(default))]
    pub padding: Padding,
    /// Width-to-height ratio override.
    #[cfg_attr(feature = "serde", serde(default))]
    pub aspect_ratio: Option<f64>,
    /// Space-allocation priority among siblings; higher claims first.
    #[cfg_attr(feature = "serde", serde(default))]
    pub layout_priority: i32,
    /// Child node references, in document order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: SmallVec<[NodeId; 4]>,
    /// Node sized to exactly fill this node's box, drawn behind it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub background: Option<NodeId>,
    /// Node sized to exactly fill this node's box, drawn in front of it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub overlay: Option<NodeId>,
}

impl Node {
    /// Create a node with no frame, padding, or children.
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            frame: None,
            padding: Padding::default(),
            aspect_ratio: None,
            layout_priority: 0,
            children: SmallVec::new(),
            background: None,
            overlay: None,
        }
    }

    /// Set the sizing frame.
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = Some(frame);
        self
    }

    /// Set the padding.
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Set the aspect ratio.
    pub fn with_aspect_ratio(mut self, ratio: f64) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    /// Set the layout priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.layout_priority = priority;
        self
    }

    /// Set the child references.
    pub fn with_children(mut self, children: impl IntoIterator<Item = NodeId>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    /// Set the background reference.
    pub fn with_background(mut self, id: NodeId) -> Self {
        self.background = Some(id);
        self
    }

    /// Set the overlay reference.
    pub fn with_overlay(mut self, id: NodeId) -> Self {
        self.overlay = Some(id);
        self
    }
}

/// Every node kind the renderer understands.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    VStack(VStackNode),
    HStack(HStackNode),
    ZStack(ZStackNode),
    ScrollContainer(ScrollContainerNode),
    Carousel,
    Text(TextNode),
    Image(ImageNode),
    Media(MediaNode),
    Rectangle(RectangleNode),
    Spacer,
    Divider,
    PageControl(PageControlNode),
    Icon(IconNode),
}

impl NodeKind {
    /// Short name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::VStack(_) => "vstack",
            NodeKind::HStack(_) => "hstack",
            NodeKind::ZStack(_) => "zstack",
            NodeKind::ScrollContainer(_) => "scroll",
            NodeKind::Carousel => "carousel",
            NodeKind::Text(_) => "text",
            NodeKind::Image(_) => "image",
            NodeKind::Media(_) => "media",
            NodeKind::Rectangle(_) => "rectangle",
            NodeKind::Spacer => "spacer",
            NodeKind::Divider => "divider",
            NodeKind::PageControl(_) => "page-control",
            NodeKind::Icon(_) => "icon",
        }
    }
}

/// A vertical linear stack.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VStackNode {
    /// Gap between consecutive children.
    pub spacing: f64,
    /// Cross-axis alignment of children.
    pub alignment: HorizontalAlignment,
}

/// A horizontal linear stack.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HStackNode {
    /// Gap between consecutive children.
    pub spacing: f64,
    /// Cross-axis alignment of children, including first-text-baseline.
    pub alignment: VerticalAlignment,
}

/// An overlay stack: children occupy the same box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ZStackNode {
    /// Placement of children within the stack's box.
    pub alignment: Alignment,
}

/// A scrollable viewport over its children.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScrollContainerNode {
    /// The axis content scrolls along.
    pub axis: Axis,
}

/// Case transform applied to text before display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
    Lowercase,
}

/// A text run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextNode {
    pub text: String,
    /// Font size in points.
    #[cfg_attr(feature = "serde", serde(default = "default_font_size"))]
    pub font_size: f64,
    /// Font weight (100-900, normal=400, bold=700).
    #[cfg_attr(feature = "serde", serde(default = "default_font_weight"))]
    pub font_weight: u16,
    /// Typeface name; the platform default when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub typeface: Option<String>,
    /// Maximum number of lines before truncation; unlimited when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub line_limit: Option<u32>,
    /// Case transform applied before measurement and display.
    #[cfg_attr(feature = "serde", serde(default))]
    pub transform: TextTransform,
}

fn default_font_size() -> f64 {
    16.0
}

fn default_font_weight() -> u16 {
    400
}

impl TextNode {
    /// Create a text node with default styling.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: default_font_size(),
            font_weight: default_font_weight(),
            typeface: None,
            line_limit: None,
            transform: TextTransform::None,
        }
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Set the line limit.
    pub fn with_line_limit(mut self, limit: u32) -> Self {
        self.line_limit = Some(limit);
        self
    }

    /// Set the case transform.
    pub fn with_transform(mut self, transform: TextTransform) -> Self {
        self.transform = transform;
        self
    }
}

/// How an image or media box relates to its source dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResizingMode {
    /// Source pixel dimensions divided by the resolution scale.
    #[default]
    Original,
    /// Scale preserving aspect ratio so the whole source fits the box.
    ScaleToFit,
    /// Scale preserving aspect ratio so the source covers the box, cropping.
    ScaleToFill,
    /// Distort the source to the box exactly.
    Stretch,
    /// Repeat the source across the box.
    Tile,
}

/// A raster image with server-declared pixel dimensions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageNode {
    pub url: String,
    /// Source width in pixels, as declared by the server.
    pub source_width: f64,
    /// Source height in pixels, as declared by the server.
    pub source_height: f64,
    /// Density scale factor the source was exported at.
    #[cfg_attr(feature = "serde", serde(default = "default_resolution"))]
    pub resolution: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resizing_mode: ResizingMode,
}

fn default_resolution() -> f64 {
    1.0
}

impl ImageNode {
    /// Create an image node with declared source dimensions.
    pub fn new(url: impl Into<String>, source_width: f64, source_height: f64) -> Self {
        Self {
            url: url.into(),
            source_width,
            source_height,
            resolution: default_resolution(),
            resizing_mode: ResizingMode::Original,
        }
    }

    /// Set the resizing mode.
    pub fn with_resizing_mode(mut self, mode: ResizingMode) -> Self {
        self.resizing_mode = mode;
        self
    }

    /// Set the density scale factor.
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }
}

/// A video or audio poster box; sizes like an image.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaNode {
    pub url: String,
    /// Source width in pixels.
    pub source_width: f64,
    /// Source height in pixels.
    pub source_height: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resizing_mode: ResizingMode,
}

/// A filled rectangle; no intrinsic content size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RectangleNode {
    pub corner_radius: f64,
}

/// Page-indicator style.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageControlStyle {
    /// Round dots at a fixed diameter.
    #[default]
    Default,
    /// Custom indicator images.
    Image {
        normal: IndicatorImage,
        current: IndicatorImage,
    },
}

/// Declared dimensions of a custom page indicator image.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndicatorImage {
    pub width: f64,
    pub height: f64,
}

/// Page indicators for a carousel, looked up by ID.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PageControlNode {
    /// The carousel whose pages this control indicates.
    pub carousel_id: Option<NodeId>,
    pub style: PageControlStyle,
}

/// A square vector icon.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IconNode {
    pub symbol: String,
    /// Point size (width and height are equal).
    #[cfg_attr(feature = "serde", serde(default = "default_icon_size"))]
    pub size: f64,
}

fn default_icon_size() -> f64 {
    24.0
}

impl IconNode {
    /// Create an icon node at the default size.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            size: default_icon_size(),
        }
    }

    /// Set the point size.
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }
}
