use serde::{Deserialize, Serialize};

use crate::constants::EPS;

/// Point in layout space (y grows downward, origin top-left).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Axis-aligned rectangle stored as origin + size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x
    }
    pub fn min_y(&self) -> f64 {
        self.origin.y
    }
    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }
    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.origin.x + self.size.width / 2.0,
            y: self.origin.y + self.size.height / 2.0,
        }
    }

    /// Finite corners and a strictly positive size.
    pub fn is_drawable(&self) -> bool {
        [self.min_x(), self.min_y(), self.max_x(), self.max_y()]
            .iter()
            .all(|v| v.is_finite())
            && self.size.width > 0.0
            && self.size.height > 0.0
    }

    /// Area shared with `other`. Touching edges contribute nothing.
    pub fn overlap_area(&self, other: &Rect) -> f64 {
        let w = self.max_x().min(other.max_x()) - self.min_x().max(other.min_x());
        let h = self.max_y().min(other.max_y()) - self.min_y().max(other.min_y());
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(
            self.origin.x + dx,
            self.origin.y + dy,
            self.size.width,
            self.size.height,
        )
    }
}

/// Minimal rectangle containing every input rectangle; `None` for no input.
pub fn bounds_of_all<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Option<Rect> {
    let (mut minx, mut miny, mut maxx, mut maxy) = (
        f64::INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NEG_INFINITY,
    );
    let mut any = false;
    for r in rects {
        any = true;
        minx = minx.min(r.min_x());
        miny = miny.min(r.min_y());
        maxx = maxx.max(r.max_x());
        maxy = maxy.max(r.max_y());
    }
    any.then(|| Rect::new(minx, miny, maxx - minx, maxy - miny))
}

/// Float comparison relative to the magnitude of the operands.
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPS * a.abs().max(b.abs()).max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 5.0);
        let b = Rect::new(10.0, 0.0, 3.0, 5.0);
        let c = Rect::new(0.0, 5.0, 10.0, 5.0);
        assert_eq!(a.overlap_area(&b), 0.0);
        assert_eq!(a.overlap_area(&c), 0.0);
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.overlap_area(&b), 25.0);
        assert_eq!(b.overlap_area(&a), 25.0);
    }

    #[test]
    fn drawable_needs_finite_corners_and_area() {
        assert!(Rect::new(0.0, 0.0, 1e-9, 1e-9).is_drawable());
        assert!(!Rect::new(0.0, 0.0, 0.0, 1.0).is_drawable());
        assert!(!Rect::new(f64::MAX, 0.0, f64::MAX, 1.0).is_drawable());
        assert!(!Rect::new(f64::NAN, 0.0, 1.0, 1.0).is_drawable());
    }

    #[test]
    fn bounds_cover_all() {
        let rs = [Rect::new(2.0, 3.0, 1.0, 1.0), Rect::new(-1.0, 0.0, 2.0, 8.0)];
        let b = bounds_of_all(&rs).unwrap();
        assert_eq!(b, Rect::new(-1.0, 0.0, 4.0, 8.0));
        assert!(bounds_of_all(&[]).is_none());
    }

    #[test]
    fn approx_eq_scales_with_magnitude() {
        assert!(approx_eq(0.1 + 0.2, 0.3));
        assert!(approx_eq(1e9 + 1e-3, 1e9));
        assert!(!approx_eq(1.0, 1.001));
    }
}
