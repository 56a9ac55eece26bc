//! Geometry value types shared by the marker engine

use super::error::MarkerError;

/// Point represents a geographic coordinate in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

/// Position in viewport pixels, `y` growing downward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned geographic bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

/// Polygon ring in geographic coordinates
///
/// The ring may be closed (last vertex repeating the first) or open.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon(pub Vec<Point>);

impl Point {
    pub fn new(lat: f64, lng: f64) -> Self {
        Point { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        PixelPoint { x, y }
    }

    /// Euclidean distance in pixels
    pub fn distance(&self, other: &PixelPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl BBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        BBox {
            west,
            south,
            east,
            north,
        }
    }

    /// Smallest box enclosing all `points`
    ///
    /// Fails on an empty slice or on any non-finite coordinate.
    pub fn from_points(points: &[Point]) -> Result<BBox, MarkerError> {
        if points.is_empty() {
            return Err(MarkerError::DegenerateGeometry("empty ring"));
        }

        let mut bbox = BBox::new(180.0, 90.0, -180.0, -90.0);
        for pt in points {
            if !pt.is_finite() {
                return Err(MarkerError::DegenerateGeometry("non-finite vertex"));
            }
            bbox.west = bbox.west.min(pt.lng);
            bbox.south = bbox.south.min(pt.lat);
            bbox.east = bbox.east.max(pt.lng);
            bbox.north = bbox.north.max(pt.lat);
        }

        Ok(bbox)
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    pub fn union(&self, other: &BBox) -> BBox {
        BBox::new(
            self.west.min(other.west),
            self.south.min(other.south),
            self.east.max(other.east),
            self.north.max(other.north),
        )
    }

    /// Closed rectangular ring tracing the box counter-clockwise
    pub fn to_polygon(&self) -> Polygon {
        Polygon(vec![
            Point::new(self.south, self.west),
            Point::new(self.south, self.east),
            Point::new(self.north, self.east),
            Point::new(self.north, self.west),
            Point::new(self.south, self.west),
        ])
    }
}

impl Polygon {
    /// Vertices without the closing repeat of the first one
    fn open_ring(&self) -> &[Point] {
        match self.0.as_slice() {
            [first, .., last] if first == last => &self.0[..self.0.len() - 1],
            ring => ring,
        }
    }

    pub fn bbox(&self) -> Result<BBox, MarkerError> {
        BBox::from_points(&self.0)
    }

    /// Mean of the ring's distinct vertices
    pub fn centroid(&self) -> Result<Point, MarkerError> {
        let ring = self.open_ring();
        if ring.is_empty() {
            return Err(MarkerError::DegenerateGeometry("empty ring"));
        }

        let mut center = Point::new(0.0, 0.0);
        for pt in ring {
            if !pt.is_finite() {
                return Err(MarkerError::DegenerateGeometry("non-finite vertex"));
            }
            center.lat += pt.lat;
            center.lng += pt.lng;
        }
        center.lat /= ring.len() as f64;
        center.lng /= ring.len() as f64;

        Ok(center)
    }
}
