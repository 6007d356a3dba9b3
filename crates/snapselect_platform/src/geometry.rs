//! Geometry types reported by the host

/// Axis-aligned rectangle in viewport coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Viewport size and document scroll offsets
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Visible width in logical units
    pub width: f32,
    /// Visible height in logical units
    pub height: f32,
    /// Horizontal document scroll offset
    pub scroll_x: f32,
    /// Vertical document scroll offset
    pub scroll_y: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

impl Viewport {
    /// Create a viewport with no scroll offset
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    /// Set the scroll offsets
    pub fn scrolled(mut self, scroll_x: f32, scroll_y: f32) -> Self {
        self.scroll_x = scroll_x;
        self.scroll_y = scroll_y;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 30.0);
        assert_eq!(rect.left(), 10.0);
        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 50.0);
    }

    #[test]
    fn test_viewport_scrolled() {
        let viewport = Viewport::new(800.0, 600.0).scrolled(5.0, 40.0);
        assert_eq!(viewport.width, 800.0);
        assert_eq!(viewport.scroll_x, 5.0);
        assert_eq!(viewport.scroll_y, 40.0);
    }
}
