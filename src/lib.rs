//! Marker consolidation and spiderfy engine for clustered task maps
//!
//! Takes task markers (or pre-aggregated clusters) plus the current viewport and
//! produces a flat list of renderable marker descriptors: overlapping markers can
//! be spread into circle/spiral "spider" layouts, and small adjacent clusters are
//! merged to keep the number of icons on screen bounded.

pub mod markers;

pub use markers::{
    BBox, ClickIntent, Debouncer, GeneratorConfig, IconRef, LeaderLine, LinearProjection,
    MarkerError, MarkerGenerator, MarkerId, MarkerRecord, PixelPoint, PixelSize, Point, Polygon,
    Projection, RenderFrame, RenderableMarker, ViewCommand, ViewportMetrics,
};
