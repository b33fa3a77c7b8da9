//! Planar geometry for the partitioner.
//!
//! Cells are convex polygons clipped out of a bounding rectangle one
//! half-plane at a time. Each polygon edge remembers where it came from (the
//! rectangle border or the bisector with a specific site), which is what the
//! partitioner reads adjacency from.

use serde::{Deserialize, Serialize};

/// A 2D point in map units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        self.distance_sq(other).sqrt()
    }

    pub fn distance_sq(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Rectangle anchored at the origin.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Self {
        Self::new(
            self.min_x - margin,
            self.min_y - margin,
            self.max_x + margin,
            self.max_y + margin,
        )
    }

    /// Smallest rectangle containing `self` and `p` padded by `margin`.
    pub fn include(&self, p: Point, margin: f64) -> Self {
        Self::new(
            self.min_x.min(p.x - margin),
            self.min_y.min(p.y - margin),
            self.max_x.max(p.x + margin),
            self.max_y.max(p.y + margin),
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Finite with positive extent on both axes.
    pub fn is_valid(&self) -> bool {
        [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite())
            && self.width() > 0.0
            && self.height() > 0.0
    }
}

/// Where a cell edge came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeSource {
    /// Part of the clip rectangle.
    Border,
    /// Part of the perpendicular bisector with the site at this index.
    Site(usize),
}

/// A polygon vertex plus the provenance of the edge leaving it.
#[derive(Debug, Clone, Copy)]
pub struct CellVertex {
    pub point: Point,
    pub edge: EdgeSource,
}

/// Convex polygon under construction.
#[derive(Debug, Clone)]
pub struct Cell {
    vertices: Vec<CellVertex>,
}

impl Cell {
    /// The whole rectangle, counter-clockwise in a y-up frame.
    pub fn from_rect(rect: Rect) -> Self {
        let corners = [
            Point::new(rect.min_x, rect.min_y),
            Point::new(rect.max_x, rect.min_y),
            Point::new(rect.max_x, rect.max_y),
            Point::new(rect.min_x, rect.max_y),
        ];
        Self {
            vertices: corners
                .iter()
                .map(|&point| CellVertex {
                    point,
                    edge: EdgeSource::Border,
                })
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.len() < 3
    }

    pub fn vertices(&self) -> &[CellVertex] {
        &self.vertices
    }

    /// Keep the part of the cell at least as close to `site` as to `other`.
    ///
    /// Sutherland–Hodgman against the bisector half-plane. The edge that
    /// closes the cut is tagged `EdgeSource::Site(other_index)`.
    pub fn clip(&self, site: Point, other: Point, other_index: usize) -> Cell {
        if self.is_empty() {
            return Cell::empty();
        }
        let nx = other.x - site.x;
        let ny = other.y - site.y;
        let mid = site.midpoint(other);
        let side = |p: Point| (p.x - mid.x) * nx + (p.y - mid.y) * ny;

        let n = self.vertices.len();
        let mut out = Vec::with_capacity(n + 1);
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let da = side(a.point);
            let db = side(b.point);
            let a_in = da <= 0.0;
            let b_in = db <= 0.0;

            match (a_in, b_in) {
                (true, true) => out.push(a),
                (true, false) => {
                    out.push(a);
                    out.push(CellVertex {
                        point: lerp(a.point, b.point, da / (da - db)),
                        edge: EdgeSource::Site(other_index),
                    });
                }
                (false, true) => out.push(CellVertex {
                    point: lerp(a.point, b.point, da / (da - db)),
                    edge: a.edge,
                }),
                (false, false) => {}
            }
        }

        Cell { vertices: out }
    }

    /// Length of each bisector edge, keyed by the site on the other side.
    pub fn shared_edges(&self) -> Vec<(usize, f64)> {
        if self.is_empty() {
            return Vec::new();
        }
        let n = self.vertices.len();
        self.vertices
            .iter()
            .enumerate()
            .filter_map(|(i, v)| match v.edge {
                EdgeSource::Site(j) => {
                    Some((j, v.point.distance(self.vertices[(i + 1) % n].point)))
                }
                EdgeSource::Border => None,
            })
            .collect()
    }

    /// Final polygon with near-duplicate vertices collapsed.
    pub fn boundary(&self, tolerance: f64) -> Boundary {
        if self.is_empty() {
            return Boundary::default();
        }
        let mut points: Vec<Point> = Vec::with_capacity(self.vertices.len());
        for v in &self.vertices {
            if points
                .last()
                .map_or(true, |last| last.distance(v.point) > tolerance)
            {
                points.push(v.point);
            }
        }
        while points.len() > 1 && points[0].distance(points[points.len() - 1]) <= tolerance {
            points.pop();
        }
        if points.len() < 3 {
            return Boundary::default();
        }
        Boundary(points)
    }
}

fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

/// Region outline handed to the renderer. The core never reads it back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Boundary(Vec<Point>);

impl Boundary {
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unsigned shoelace area.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    fn signed_area(&self) -> f64 {
        let n = self.0.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let a = self.0[i];
            let b = self.0[(i + 1) % n];
            sum += a.x * b.y - b.x * a.y;
        }
        sum / 2.0
    }

    /// Area centroid, or `None` for an empty or zero-area outline.
    pub fn centroid(&self) -> Option<Point> {
        let area = self.signed_area();
        if area.abs() < f64::EPSILON {
            return None;
        }
        let n = self.0.len();
        let (mut cx, mut cy) = (0.0, 0.0);
        for i in 0..n {
            let a = self.0[i];
            let b = self.0[(i + 1) % n];
            let cross = a.x * b.y - b.x * a.y;
            cx += (a.x + b.x) * cross;
            cy += (a.y + b.y) * cross;
        }
        Some(Point::new(cx / (6.0 * area), cy / (6.0 * area)))
    }

    /// SVG path data: `M x,yLx,y…Z` with one decimal place.
    pub fn to_svg_path(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let body = self
            .0
            .iter()
            .map(|p| format!("{:.1},{:.1}", p.x, p.y))
            .collect::<Vec<_>>()
            .join("L");
        format!("M{}Z", body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Cell {
        Cell::from_rect(Rect::from_size(10.0, 10.0))
    }

    #[test]
    fn test_clip_halves_square() {
        // Site on the left, other on the right: keep x <= 5.
        let cell = square().clip(Point::new(2.0, 5.0), Point::new(8.0, 5.0), 1);
        let b = cell.boundary(1e-9);
        assert!((b.area() - 50.0).abs() < 1e-9);
        for p in b.points() {
            assert!(p.x <= 5.0 + 1e-9);
        }
    }

    #[test]
    fn test_clip_tags_bisector_edge() {
        let cell = square().clip(Point::new(2.0, 5.0), Point::new(8.0, 5.0), 7);
        let shared = cell.shared_edges();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].0, 7);
        assert!((shared[0].1 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_clip_far_site_is_noop() {
        // Bisector at x = 50, entirely outside the square.
        let cell = square().clip(Point::new(5.0, 5.0), Point::new(95.0, 5.0), 2);
        assert!(cell.shared_edges().is_empty());
        assert!((cell.boundary(1e-9).area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_clip_corner_touch_has_no_length() {
        // Bisector x + y = 20 only touches the corner (10, 10).
        let cell = square().clip(Point::new(5.0, 5.0), Point::new(15.0, 15.0), 3);
        let total: f64 = cell.shared_edges().iter().map(|&(_, len)| len).sum();
        assert!(total < 1e-9);
        assert!((cell.boundary(1e-9).area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_boundary_centroid() {
        let b = square().boundary(1e-9);
        let c = b.centroid().unwrap();
        assert!((c.x - 5.0).abs() < 1e-9);
        assert!((c.y - 5.0).abs() < 1e-9);
        assert!(Boundary::default().centroid().is_none());
    }

    #[test]
    fn test_svg_path_format() {
        let b = square().boundary(1e-9);
        assert_eq!(b.to_svg_path(), "M0.0,0.0L10.0,0.0L10.0,10.0L0.0,10.0Z");
        assert_eq!(Boundary::default().to_svg_path(), "");
    }

    #[test]
    fn test_rect_include_and_valid() {
        let r = Rect::from_size(100.0, 50.0).include(Point::new(120.0, -10.0), 5.0);
        assert_eq!(r.max_x, 125.0);
        assert_eq!(r.min_y, -15.0);
        assert!(r.is_valid());
        assert!(!Rect::from_size(0.0, 10.0).is_valid());
        assert!(!Rect::from_size(f64::NAN, 10.0).is_valid());
    }
}
