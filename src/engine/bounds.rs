//! Axis-aligned bounds in world space
//!
//! World coordinates are y-up: `bottom < top`.

/// An axis-aligned box defined by its edges
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

impl Bounds {
    pub const fn new(left: f32, bottom: f32, right: f32, top: f32) -> Self {
        Self { left, bottom, right, top }
    }

    /// Create from a center point and full size
    pub fn from_center(center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        let hw = width * 0.5;
        let hh = height * 0.5;
        Self::new(center_x - hw, center_y - hh, center_x + hw, center_y + hh)
    }

    /// Strict overlap: boxes that only share an edge do not intersect
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.bottom < other.top
            && self.top > other.bottom
    }

    /// Same box moved by an offset
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.left + dx, self.bottom + dy, self.right + dx, self.top + dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_center() {
        let b = Bounds::from_center(128.0, 128.0, 96.0, 128.0);
        assert_eq!(b, Bounds::new(80.0, 64.0, 176.0, 192.0));
        assert_eq!(b.right - b.left, 96.0);
        assert_eq!(b.top - b.bottom, 128.0);
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Bounds::new(0.0, 0.0, 64.0, 64.0);
        let above = Bounds::new(0.0, 64.0, 64.0, 128.0);
        let right = Bounds::new(64.0, 0.0, 128.0, 64.0);
        assert!(!a.intersects(&above));
        assert!(!a.intersects(&right));
        assert!(a.intersects(&above.offset(0.0, -0.5)));
    }
}
