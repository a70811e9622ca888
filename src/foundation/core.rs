use crate::foundation::error::{GridError, GridResult};

/// Pixel dimensions of an output surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a canvas, rejecting zero-sized dimensions.
    pub fn new(width: u32, height: u32) -> GridResult<Self> {
        if width == 0 || height == 0 {
            return Err(GridError::device(format!(
                "surface dimensions must be non-zero (got {width}x{height})"
            )));
        }
        Ok(Self { width, height })
    }

    /// The rectangle covering the whole canvas.
    pub fn bounds(self) -> PixelRect {
        PixelRect::new(0, 0, self.width, self.height)
    }
}

/// Axis-aligned pixel rectangle in output-surface space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Construct a rectangle from its top-left corner and size.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Return `true` when the rectangle covers no pixels.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intersection of two rectangles; empty (zero-sized) when they do not overlap.
    pub fn intersect(self, other: PixelRect) -> PixelRect {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            return PixelRect::new(x0, y0, 0, 0);
        }
        PixelRect::new(x0, y0, x1 - x0, y1 - y0)
    }
}

/// Straight-alpha RGBA8 color.
pub type Rgba8 = [u8; 4];

/// Background for every cell buffer and for the initial screen clear.
pub const BLACK: Rgba8 = [0, 0, 0, 255];
/// Default text color.
pub const WHITE: Rgba8 = [255, 255, 255, 255];
/// Liveness probe: target reachable.
pub const GREEN: Rgba8 = [0, 160, 0, 255];
/// Liveness probe: target unreachable.
pub const RED: Rgba8 = [200, 0, 0, 255];
