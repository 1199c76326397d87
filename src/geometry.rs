//! Small geometry helpers shared by the entity and physics code.

/// Axis-aligned rectangle given by its top-left corner and extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Rectangle of `width × height` centred on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Rect {
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
        }
    }

    /// Square of side `2 * half` centred on `(cx, cy)`.
    pub fn square(cx: f32, cy: f32, half: f32) -> Self {
        Rect {
            x: cx - half,
            y: cy - half,
            width: half * 2.0,
            height: half * 2.0,
        }
    }
}

/// The current playfield: everything lives in `[0, width] × [0, height]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Bounds { width, height }
    }

    /// Strictly inside the open playfield.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x > 0.0 && x < self.width && y > 0.0 && y < self.height
    }
}

/// Euclidean distance between two points.
pub fn distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}

/// Strict overlap test: rectangles that only touch along an edge do not collide.
pub fn check_collision(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

