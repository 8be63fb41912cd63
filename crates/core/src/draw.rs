//! Drawing primitives on top of [`ImageCanvas`] pixel addressing.
//!
//! All primitives write palette indices; obtain one with
//! [`ImageCanvas::color`] or [`ImageCanvas::create_rgb_color`]. None of them
//! clip against the canvas edges.

use crate::canvas::ImageCanvas;
use crate::error::{CanvasError, Result};

/// An integer pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Two outline points sharing an x coordinate: `[top, bottom]`, where `top`
/// has the larger y.
pub type Span = [Point; 2];

/// Outline of a circle by the midpoint algorithm.
///
/// Each step of the first octant yields four spans, one per mirrored pair of
/// octants, so every span can be filled as a vertical run.
pub fn circle_points(cx: i32, cy: i32, r: i32) -> Vec<Span> {
    let mut x = r;
    let mut y = 0;
    let mut p = 1 - r;
    let mut spans = Vec::new();

    while x >= y {
        spans.push([Point::new(x + cx, y + cy), Point::new(x + cx, -y + cy)]);
        spans.push([Point::new(-x + cx, y + cy), Point::new(-x + cx, -y + cy)]);
        spans.push([Point::new(y + cx, x + cy), Point::new(y + cx, -x + cy)]);
        spans.push([Point::new(-y + cx, x + cy), Point::new(-y + cx, -x + cy)]);

        y += 1;
        if p < 0 {
            p += 2 * y + 1;
        } else {
            x -= 1;
            p += 2 * (y - x + 1);
        }
    }

    spans
}

fn check_geometry(x1: i32, y1: i32, x2: i32, y2: i32) -> Result<()> {
    if x2 < x1 || y2 < y1 {
        return Err(CanvasError::InvalidGeometry { x1, y1, x2, y2 });
    }
    Ok(())
}

impl ImageCanvas {
    /// Fill the `width`×`height` block whose top-left corner is `(x, y)`.
    ///
    /// Despite the name this is a filled rectangle; a one-pixel `width` or
    /// `height` gives the usual horizontal or vertical line.
    pub fn line(&mut self, x: i32, y: i32, width: i32, height: i32, color: u8) {
        for i in 0..width {
            for j in 0..height {
                self.set_pixel(x + i, y + j, color);
            }
        }
    }

    /// Fill the rectangle from `(x1, y1)` spanning `x2 - x1` by `y2 - y1`.
    ///
    /// When exactly one axis has zero extent it is drawn one pixel thick, so
    /// `rect(5, 5, 5, 8, c)` is a 1×3 column. A zero-area rectangle draws
    /// nothing.
    pub fn rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: u8) -> Result<()> {
        check_geometry(x1, y1, x2, y2)?;
        let (mut width, mut height) = (x2 - x1, y2 - y1);
        match (width, height) {
            (0, 0) => {}
            (0, _) => width = 1,
            (_, 0) => height = 1,
            _ => {}
        }
        self.line(x1, y1, width, height, color);
        Ok(())
    }

    /// Rectangle with a `border`-thick frame in `outside` and the remaining
    /// interior in `inside`.
    ///
    /// Fails if the corners are reversed, or if the border is so thick that
    /// the corners of the inset interior would be reversed. An interior with
    /// zero width or height is left to the frame.
    #[allow(clippy::too_many_arguments)]
    pub fn bordered_rect(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        border: i32,
        inside: u8,
        outside: u8,
    ) -> Result<()> {
        check_geometry(x1, y1, x2, y2)?;

        self.line(x1, y1, x2 - x1, border, outside);
        self.line(x1, y2 - border, x2 - x1, border, outside);
        self.line(x1, y1, border, y2 - y1, outside);
        self.line(x2 - border, y1, border, y2 - y1, outside);

        let (ix1, iy1, ix2, iy2) = (x1 + border, y1 + border, x2 - border, y2 - border);
        check_geometry(ix1, iy1, ix2, iy2)?;
        self.line(ix1, iy1, ix2 - ix1, iy2 - iy1, inside);
        Ok(())
    }

    /// Fill one outline span from its bottom point up to its top point.
    fn fill_span(&mut self, span: &Span, color: u8) {
        let [top, bottom] = span;
        for y in bottom.y..=top.y {
            self.set_pixel(bottom.x, y, color);
        }
    }

    /// Solid circle of radius `r` centered on `(cx, cy)`.
    pub fn filled_circle(&mut self, cx: i32, cy: i32, r: i32, color: u8) {
        for span in circle_points(cx, cy, r) {
            self.fill_span(&span, color);
        }
    }

    /// Circle with a `border`-thick ring in `outside` and an interior of
    /// radius `r - border` in `inside`.
    ///
    /// The ring is built from short strips around each outline point and
    /// leaves visible gaps where octants meet.
    // TODO: sweep the ring between the two radii instead of stamping strips,
    // once callers no longer depend on the current pixel output.
    pub fn bordered_circle(
        &mut self,
        cx: i32,
        cy: i32,
        r: i32,
        border: i32,
        inside: u8,
        outside: u8,
    ) {
        let outline = circle_points(cx, cy, r);
        let interior = circle_points(cx, cy, r - border);

        for [top, bottom] in &outline {
            self.line(top.x, top.y - 1, border, 1, outside);
            self.line(top.x - 1, top.y, 1, border, outside);
            self.line(bottom.x, bottom.y, border, 1, outside);
            self.line(bottom.x, bottom.y, 1, border, outside);
        }

        for span in &interior {
            self.fill_span(span, inside);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Rgba;
    use std::collections::HashSet;

    fn canvas(w: u32, h: u32) -> ImageCanvas {
        ImageCanvas::png(w, h, 4, Rgba::opaque(0, 0, 0))
    }

    fn painted(canvas: &ImageCanvas, color: u8) -> HashSet<(i32, i32)> {
        let mut set = HashSet::new();
        for y in 0..canvas.height() as i32 {
            for x in 0..canvas.width() as i32 {
                if canvas.get_pixel(x, y) == color {
                    set.insert((x, y));
                }
            }
        }
        set
    }

    #[test]
    fn test_line_fills_block() {
        let mut c = canvas(10, 10);
        c.line(2, 3, 4, 2, 1);
        let got = painted(&c, 1);
        assert_eq!(got.len(), 8);
        for x in 2..6 {
            assert!(got.contains(&(x, 3)));
            assert!(got.contains(&(x, 4)));
        }
    }

    #[test]
    fn test_line_empty_extent() {
        let mut c = canvas(4, 4);
        c.line(1, 1, 0, 3, 1);
        c.line(1, 1, -2, 3, 1);
        assert!(painted(&c, 1).is_empty());
    }

    #[test]
    fn test_rect_rejects_reversed_corners() {
        let mut c = canvas(10, 10);
        let err = c.rect(5, 5, 2, 2, 1).unwrap_err();
        assert!(matches!(err, CanvasError::InvalidGeometry { x1: 5, y1: 5, x2: 2, y2: 2 }));
        assert!(c.rect(5, 5, 6, 2, 1).is_err());
        assert!(painted(&c, 1).is_empty());
    }

    #[test]
    fn test_rect_zero_width_is_column() {
        let mut c = canvas(10, 10);
        c.rect(5, 5, 5, 8, 1).unwrap();
        let expected: HashSet<_> = [(5, 5), (5, 6), (5, 7)].into_iter().collect();
        assert_eq!(painted(&c, 1), expected);
    }

    #[test]
    fn test_rect_zero_height_is_row() {
        let mut c = canvas(10, 10);
        c.rect(2, 4, 5, 4, 1).unwrap();
        let expected: HashSet<_> = [(2, 4), (3, 4), (4, 4)].into_iter().collect();
        assert_eq!(painted(&c, 1), expected);
    }

    #[test]
    fn test_rect_zero_area_draws_nothing() {
        let mut c = canvas(10, 10);
        c.rect(5, 5, 5, 5, 1).unwrap();
        assert!(painted(&c, 1).is_empty());
    }

    #[test]
    fn test_rect_extent() {
        let mut c = canvas(10, 10);
        c.rect(1, 2, 4, 6, 2).unwrap();
        let got = painted(&c, 2);
        assert_eq!(got.len(), 3 * 4);
        assert!(got.contains(&(1, 2)));
        assert!(got.contains(&(3, 5)));
        assert!(!got.contains(&(4, 6)));
    }

    #[test]
    fn test_bordered_rect() {
        let mut c = canvas(12, 12);
        c.bordered_rect(1, 1, 9, 9, 2, 1, 2).unwrap();

        // Frame
        assert_eq!(c.get_pixel(1, 1), 2);
        assert_eq!(c.get_pixel(2, 2), 2);
        assert_eq!(c.get_pixel(8, 1), 2);
        assert_eq!(c.get_pixel(1, 8), 2);
        assert_eq!(c.get_pixel(7, 7), 2);
        // Interior from (3, 3) spanning 4×4
        assert_eq!(painted(&c, 1).len(), 16);
        assert_eq!(c.get_pixel(3, 3), 1);
        assert_eq!(c.get_pixel(6, 6), 1);
        // Outside the shape
        assert_eq!(c.get_pixel(9, 9), 0);
        assert_eq!(c.get_pixel(0, 0), 0);
    }

    #[test]
    fn test_bordered_rect_flat_interior_keeps_frame() {
        let mut c = canvas(8, 8);
        c.bordered_rect(0, 0, 6, 4, 2, 1, 2).unwrap();
        assert!(painted(&c, 1).is_empty());
        assert_eq!(c.get_pixel(2, 2), 2);
        assert_eq!(c.get_pixel(3, 2), 2);
    }

    #[test]
    fn test_bordered_rect_rejects_reversed_corners() {
        let mut c = canvas(10, 10);
        assert!(c.bordered_rect(8, 1, 2, 5, 1, 1, 2).is_err());
        assert!(painted(&c, 2).is_empty());
    }

    #[test]
    fn test_bordered_rect_border_too_thick() {
        let mut c = canvas(10, 10);
        assert!(matches!(
            c.bordered_rect(0, 0, 4, 4, 3, 1, 2),
            Err(CanvasError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_circle_points_zero_radius() {
        let spans = circle_points(3, 4, 0);
        assert_eq!(spans.len(), 4);
        for [top, bottom] in spans {
            assert_eq!(top, Point::new(3, 4));
            assert_eq!(bottom, Point::new(3, 4));
        }
    }

    #[test]
    fn test_circle_points_negative_radius_is_empty() {
        assert!(circle_points(0, 0, -1).is_empty());
    }

    #[test]
    fn test_circle_points_rotational_symmetry() {
        let points: HashSet<Point> = circle_points(0, 0, 5)
            .into_iter()
            .flat_map(|[a, b]| [a, b])
            .collect();
        let rotated: HashSet<Point> = points.iter().map(|p| Point::new(-p.y, p.x)).collect();
        assert_eq!(points, rotated);
        assert!(points.contains(&Point::new(5, 0)));
        assert!(points.contains(&Point::new(0, -5)));
    }

    #[test]
    fn test_circle_points_top_above_bottom() {
        for [top, bottom] in circle_points(10, 10, 7) {
            assert_eq!(top.x, bottom.x);
            assert!(top.y >= bottom.y);
        }
    }

    #[test]
    fn test_circle_points_stay_near_radius() {
        for [top, bottom] in circle_points(0, 0, 20) {
            for p in [top, bottom] {
                let d2 = p.x * p.x + p.y * p.y;
                assert!((19 * 19..=21 * 21).contains(&d2), "{:?}", p);
            }
        }
    }

    #[test]
    fn test_filled_circle() {
        let mut c = canvas(21, 21);
        c.filled_circle(10, 10, 6, 3);
        let got = painted(&c, 3);
        assert!(got.contains(&(10, 10)));
        assert!(got.contains(&(16, 10)));
        assert!(got.contains(&(10, 4)));
        assert!(!got.contains(&(17, 10)));
        assert!(!got.contains(&(15, 15)));
        for &(x, y) in &got {
            let (dx, dy) = (x - 10, y - 10);
            assert!(dx * dx + dy * dy <= 7 * 7);
        }
        // Every column of the disc is solid between its extremes
        for x in 4..=16 {
            let ys: Vec<i32> = got.iter().filter(|p| p.0 == x).map(|p| p.1).collect();
            let (lo, hi) = (*ys.iter().min().unwrap(), *ys.iter().max().unwrap());
            assert_eq!(ys.len() as i32, hi - lo + 1);
        }
    }

    #[test]
    fn test_bordered_circle() {
        let mut c = canvas(31, 31);
        c.bordered_circle(15, 15, 8, 2, 1, 2);

        // Interior of radius 6
        assert_eq!(c.get_pixel(15, 15), 1);
        assert_eq!(c.get_pixel(21, 15), 1);
        assert_eq!(c.get_pixel(15, 9), 1);
        // Strips stamped at the outline points
        assert_eq!(c.get_pixel(23, 15), 2);
        assert_eq!(c.get_pixel(24, 15), 2);
        assert_eq!(c.get_pixel(15, 7), 2);
        // Nothing beyond the ring on the axes
        assert_eq!(c.get_pixel(26, 15), 0);
        assert!(!painted(&c, 2).is_empty());
    }

    #[test]
    fn test_bordered_circle_matches_strip_construction() {
        let (cx, cy, r, b) = (15, 15, 9, 3);
        let mut c = canvas(40, 40);
        c.bordered_circle(cx, cy, r, b, 1, 2);

        let mut expected = canvas(40, 40);
        for [top, bottom] in circle_points(cx, cy, r) {
            expected.line(top.x, top.y - 1, b, 1, 2);
            expected.line(top.x - 1, top.y, 1, b, 2);
            expected.line(bottom.x, bottom.y, b, 1, 2);
            expected.line(bottom.x, bottom.y, 1, b, 2);
        }
        expected.filled_circle(cx, cy, r - b, 1);

        assert_eq!(c.bytes(), expected.bytes());
    }
}
