use crate::constants::{FIELD_HEIGHT, FIELD_WIDTH};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub const ZERO: Vector2D = Vector2D { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Vector2D { x, y }
    }

    pub fn scale(&self, scalar: f64) -> Self {
        Vector2D::new(self.x * scalar, self.y * scalar)
    }

    pub fn add(&self, other: Vector2D) -> Self {
        Vector2D::new(self.x + other.x, self.y + other.y)
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector pointing the same way, or `None` for the zero vector.
    pub fn normalized(&self) -> Option<Self> {
        let len = self.length();
        if len == 0.0 {
            None
        } else {
            Some(self.scale(1.0 / len))
        }
    }

    /// Screen-space angle in degrees, counter-clockwise from "right" with y pointing down.
    pub fn screen_angle_deg(&self) -> f64 {
        (-self.y).atan2(self.x).to_degrees()
    }

    /// Unit vector for a screen-space angle in degrees (inverse of `screen_angle_deg`).
    pub fn from_screen_angle_deg(angle: f64) -> Self {
        let rad = angle.to_radians();
        Vector2D::new(rad.cos(), -rad.sin())
    }
}

// --- Axis-aligned rectangle, stored by center ---
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub center: Vector2D,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(center: Vector2D, width: f64, height: f64) -> Self {
        Rect { center, width, height }
    }

    /// Rectangle covering the whole play field.
    pub fn field() -> Self {
        Rect::new(Vector2D::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0), FIELD_WIDTH, FIELD_HEIGHT)
    }

    /// Bounding box of a `width` x `height` box rotated by `angle_deg`.
    pub fn rotated(center: Vector2D, width: f64, height: f64, angle_deg: f64) -> Self {
        let rad = angle_deg.to_radians();
        let (sin, cos) = (rad.sin().abs(), rad.cos().abs());
        Rect::new(center, width * cos + height * sin, width * sin + height * cos)
    }

    pub fn left(&self) -> f64 {
        self.center.x - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.center.x + self.width / 2.0
    }

    pub fn top(&self) -> f64 {
        self.center.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.center.y + self.height / 2.0
    }

    pub fn translate(&mut self, delta: Vector2D) {
        self.center = self.center.add(delta);
    }

    /// Interiors intersect. Rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Reports, per axis, whether `rect` lies fully inside the play field.
pub fn within_bounds(rect: &Rect) -> (bool, bool) {
    let horizontal = !(rect.left() < 0.0 || rect.right() > FIELD_WIDTH);
    let vertical = !(rect.top() < 0.0 || rect.bottom() > FIELD_HEIGHT);
    (horizontal, vertical)
}

pub fn fully_within_bounds(rect: &Rect) -> bool {
    within_bounds(rect) == (true, true)
}

/// Unit vector from the center of `from` toward the center of `to`.
/// Coincident centers yield `None`.
pub fn direction_between(from: &Rect, to: &Rect) -> Option<Vector2D> {
    Vector2D::new(to.center.x - from.center.x, to.center.y - from.center.y).normalized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rect_at(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(Vector2D::new(x, y), w, h)
    }

    #[test]
    fn test_within_bounds_inside() {
        assert_eq!(within_bounds(&rect_at(100.0, 100.0, 20.0, 20.0)), (true, true));
    }

    #[test]
    fn test_within_bounds_reports_each_axis() {
        assert_eq!(within_bounds(&rect_at(5.0, 100.0, 20.0, 20.0)), (false, true));
        assert_eq!(within_bounds(&rect_at(100.0, FIELD_HEIGHT - 5.0, 20.0, 20.0)), (true, false));
        assert_eq!(within_bounds(&rect_at(FIELD_WIDTH, 0.0, 20.0, 20.0)), (false, false));
    }

    #[test]
    fn test_edges_touching_field_are_inside() {
        assert_eq!(within_bounds(&Rect::field()), (true, true));
    }

    #[test]
    fn test_overlap_requires_shared_interior() {
        let a = rect_at(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&rect_at(9.0, 9.0, 10.0, 10.0)));
        assert!(!a.overlaps(&rect_at(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&rect_at(0.0, 30.0, 10.0, 10.0)));
    }

    #[test]
    fn test_direction_between_is_unit() {
        let from = rect_at(0.0, 0.0, 10.0, 10.0);
        let to = rect_at(30.0, 40.0, 10.0, 10.0);
        let dir = direction_between(&from, &to).unwrap();
        assert!((dir.x - 0.6).abs() < 1e-9);
        assert!((dir.y - 0.8).abs() < 1e-9);
        assert!(direction_between(&from, &from).is_none());
    }

    #[test]
    fn test_rotated_bounding_box() {
        let r = Rect::rotated(Vector2D::ZERO, 50.0, 10.0, 90.0);
        assert!((r.width - 10.0).abs() < 1e-9);
        assert!((r.height - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_screen_angle_round_trip_for_up() {
        let up = Vector2D::new(0.0, -1.0);
        assert!((up.screen_angle_deg() - 90.0).abs() < 1e-9);
        let back = Vector2D::from_screen_angle_deg(90.0);
        assert!(back.x.abs() < 1e-9 && (back.y + 1.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_inside_iff_all_edges_inside(
            x in -200.0f64..1300.0,
            y in -200.0f64..900.0,
            w in 1.0f64..200.0,
            h in 1.0f64..200.0,
        ) {
            let r = rect_at(x, y, w, h);
            let inside = r.left() >= 0.0 && r.right() <= FIELD_WIDTH
                && r.top() >= 0.0 && r.bottom() <= FIELD_HEIGHT;
            prop_assert_eq!(fully_within_bounds(&r), inside);
        }
    }
}
