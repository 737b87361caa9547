use std::time::Duration;

pub use kurbo::{Point, Rect, Size, Vec2};

/// Default stroke/fill color for instructions that omit one (neutral gray-900).
pub const DEFAULT_COLOR: &str = "#1f2937";
/// Default font size in pixels for instructions that omit one.
pub const DEFAULT_FONT_SIZE: u32 = 16;
/// Default stroke width in pixels for instructions that omit one.
pub const DEFAULT_STROKE_WIDTH: u32 = 2;
/// Pause between the last group of a step and the first tick of the next step.
pub const STEP_PAUSE: Duration = Duration::from_millis(2000);
/// Minimum wait between two consecutive delay groups of one step.
pub const MIN_GROUP_GAP: Duration = Duration::from_millis(500);

/// Visible drawing region that instruction positions are clamped into.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Inclusive bounds: `x0..=x1` horizontally, `y0..=y1` vertically.
    pub bounds: Rect,
}

impl Viewport {
    /// Build a viewport from inclusive bounds.
    pub fn new(bounds: Rect) -> Self {
        Self { bounds }
    }

    /// Clamp a point into the viewport. Each axis is clamped independently.
    pub fn clamp(self, p: Point) -> Point {
        let b = self.bounds;
        Point::new(p.x.min(b.x1).max(b.x0), p.y.min(b.y1).max(b.y0))
    }

    /// Return `true` when `p` is inside the viewport, boundaries included.
    pub fn contains(self, p: Point) -> bool {
        let b = self.bounds;
        b.x0 <= p.x && p.x <= b.x1 && b.y0 <= p.y && p.y <= b.y1
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Rect::new(100.0, 200.0, 700.0, 500.0))
    }
}

/// Drawing surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}
