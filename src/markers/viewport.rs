use super::point::{BBox, PixelPoint, Point};

/// Divisor applied to the smaller viewport side to cap a merged cluster's extent
pub const MAX_EXTENT_DIVISOR: f64 = 4.0;

/// Pixel dimensions of the map view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSize {
    pub x: f64,
    pub y: f64,
}

/// Snapshot of the live map view, replaced wholesale on every move/zoom end
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    pub bounds: BBox,
    pub pixel_size: PixelSize,
    pub zoom: f64,
}

/// Degree/pixel scale derived from a viewport and an icon size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportScale {
    pub height_deg: f64,
    pub width_deg: f64,
    pub degrees_per_pixel: f64,
    pub icon_size_deg: f64,
}

impl ViewportMetrics {
    pub fn new(bounds: BBox, pixel_size: PixelSize, zoom: f64) -> Self {
        ViewportMetrics {
            bounds,
            pixel_size,
            zoom,
        }
    }

    /// A viewport with no pixel area cannot be rendered against
    pub fn is_renderable(&self) -> bool {
        self.pixel_size.x > 0.0
            && self.pixel_size.y > 0.0
            && self.bounds.height() > 0.0
            && self.bounds.width() > 0.0
    }

    /// Derives the degree scale for an icon of `icon_size_px` pixels
    ///
    /// Never fails; a zero-height viewport yields non-finite figures. Check
    /// [`ViewportMetrics::is_renderable`] first.
    pub fn scale(&self, icon_size_px: f64) -> ViewportScale {
        let height_deg = self.bounds.height();
        let width_deg = self.bounds.width();
        let degrees_per_pixel = height_deg / self.pixel_size.y;

        ViewportScale {
            height_deg,
            width_deg,
            degrees_per_pixel,
            icon_size_deg: icon_size_px * degrees_per_pixel,
        }
    }
}

impl ViewportScale {
    /// Largest extent, on either axis, a consolidated cluster may cover
    pub fn max_cluster_extent_deg(&self) -> f64 {
        self.height_deg.min(self.width_deg) / MAX_EXTENT_DIVISOR
    }
}

/// Conversion between geographic and viewport pixel coordinates
pub trait Projection {
    fn to_pixel(&self, point: &Point) -> PixelPoint;
    fn to_point(&self, pixel: &PixelPoint) -> Point;
}

/// Equirectangular projection of the viewport bounds onto its pixel area
#[derive(Debug, Clone, Copy)]
pub struct LinearProjection {
    bounds: BBox,
    px_per_deg_x: f64,
    px_per_deg_y: f64,
}

impl LinearProjection {
    pub fn new(metrics: &ViewportMetrics) -> Self {
        LinearProjection {
            bounds: metrics.bounds,
            px_per_deg_x: metrics.pixel_size.x / metrics.bounds.width(),
            px_per_deg_y: metrics.pixel_size.y / metrics.bounds.height(),
        }
    }
}

impl Projection for LinearProjection {
    fn to_pixel(&self, point: &Point) -> PixelPoint {
        PixelPoint::new(
            (point.lng - self.bounds.west) * self.px_per_deg_x,
            (self.bounds.north - point.lat) * self.px_per_deg_y,
        )
    }

    fn to_point(&self, pixel: &PixelPoint) -> Point {
        Point::new(
            self.bounds.north - pixel.y / self.px_per_deg_y,
            self.bounds.west + pixel.x / self.px_per_deg_x,
        )
    }
}
