//! Core types for spark-aside.
//!
//! Geometry, element roles and style values shared by the host (engine,
//! layout, state) and the components built on top of it.
//!
//! All lengths are `f32` host units. A terminal host uses cells; nothing in
//! the measurement algorithms depends on the unit.

// =============================================================================
// Geometry
// =============================================================================

/// A point in host units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Self = Self { width: 0.0, height: 0.0 };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned box, the host's equivalent of a DOMRect.
///
/// Whether the origin is viewport-relative or document-relative depends on
/// where the rect came from; see [`crate::layout::bounds`] and
/// [`crate::layout::document_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check if a point is inside this rect (right/bottom edges exclusive).
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shift the rect by an offset.
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

// =============================================================================
// Orientation
// =============================================================================

/// Layout axis of a tiling strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Extent of a size along this axis.
    pub fn extent(&self, size: Size) -> f32 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Text direction used for label instances laid out along this axis.
    pub fn writing_mode(&self) -> WritingMode {
        match self {
            Self::Horizontal => WritingMode::Horizontal,
            Self::Vertical => WritingMode::VerticalRl,
        }
    }

    pub fn direction(&self) -> FlexDirection {
        match self {
            Self::Horizontal => FlexDirection::Row,
            Self::Vertical => FlexDirection::Column,
        }
    }
}

// =============================================================================
// Dimension
// =============================================================================

/// A dimension value that can be absolute or a percentage of the parent.
///
/// ```
/// use spark_aside::types::Dimension;
///
/// let width = Dimension::Length(50.0);
/// let height = Dimension::Percent(100.0);
/// assert_ne!(width, height);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    /// Content-determined.
    #[default]
    Auto,
    /// Absolute size in host units.
    Length(f32),
    /// Percentage of parent size (0-100).
    Percent(f32),
}

impl From<f32> for Dimension {
    fn from(value: f32) -> Self {
        Self::Length(value)
    }
}

// =============================================================================
// Element Roles (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Semantic role of an element, the host's stand-in for HTML tag names.
    ///
    /// Roles are flags so ancestor queries can match several at once:
    /// `closest(idx, Role::ARTICLE | Role::MAIN)`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Role: u16 {
        const NONE = 0;
        const ARTICLE = 1 << 0;
        const MAIN = 1 << 1;
        const SECTION = 1 << 2;
        const PARAGRAPH = 1 << 3;
        const BUTTON = 1 << 4;
        const TEXT = 1 << 5;
        const STRIP = 1 << 6;
        const PANEL = 1 << 7;
        const BLOCK = 1 << 8;

        /// Any region a disclosure can float beside.
        const CONTENT_REGION = Self::ARTICLE.bits() | Self::MAIN.bits() | Self::SECTION.bits();
    }
}

bitflags::bitflags! {
    /// Per-element behavior flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ElementFlags: u8 {
        const NONE = 0;
        /// Laid out and measurable, but invisible and never hit by pointer input.
        const HIDDEN = 1 << 0;
    }
}

// =============================================================================
// Text
// =============================================================================

/// Direction text flows in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritingMode {
    #[default]
    Horizontal,
    /// One glyph per row, top to bottom (CSS `vertical-rl`).
    VerticalRl,
}

/// Text wrap mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextWrap {
    NoWrap,
    #[default]
    Wrap,
}

// =============================================================================
// Flex
// =============================================================================

/// Flex direction for container layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexDirection {
    #[default]
    Column,
    Row,
}

impl FlexDirection {
    pub const fn is_row(&self) -> bool {
        matches!(self, Self::Row)
    }
}

/// Layout style of a single element.
///
/// A deliberately small subset of flexbox: what page scaffolding and the two
/// components actually need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    pub width: Dimension,
    pub height: Dimension,
    pub direction: FlexDirection,
    /// Gap between children along the main axis.
    pub gap: f32,
    /// Uniform padding on all four sides.
    pub padding: f32,
    /// Vertical margin above and below (inline disclosure content).
    pub margin_block: f32,
    pub grow: f32,
    pub shrink: f32,
    /// Taken out of flow (absolute positioning at the parent's content origin).
    pub absolute: bool,
    /// Children may overflow without growing this element.
    pub clip: bool,
    /// Center children on both axes.
    pub centered: bool,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            width: Dimension::Auto,
            height: Dimension::Auto,
            direction: FlexDirection::Column,
            gap: 0.0,
            padding: 0.0,
            margin_block: 0.0,
            grow: 0.0,
            shrink: 1.0,
            absolute: false,
            clip: false,
            centered: false,
        }
    }
}

impl ElementStyle {
    /// A row container.
    pub fn row() -> Self {
        Self {
            direction: FlexDirection::Row,
            ..Default::default()
        }
    }

    /// A fixed-size box.
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            width: Dimension::Length(width),
            height: Dimension::Length(height),
            ..Default::default()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
