//! Package markers implements overlap detection, spider layouts and cluster
//! consolidation for task map markers
pub mod consolidate;
pub mod debounce;
pub mod distance;
pub mod error;
pub mod generator;
pub mod icon;
pub mod overlap;
pub mod point;
pub mod record;
pub mod spider;
pub mod viewport;

#[cfg(test)]
mod consolidate_test;
#[cfg(test)]
mod debounce_test;
#[cfg(test)]
mod overlap_test;

pub use consolidate::{consolidate, consolidate_if_needed};
pub use debounce::{DEFAULT_QUIESCENCE, Debouncer};
pub use distance::{DEGREE_RAD, distance_degrees};
pub use error::MarkerError;
pub use generator::{
    ClickIntent, GeneratorConfig, GeneratorState, LeaderLine, MarkerGenerator, RenderFrame,
    RenderableMarker, SpiderState, ViewCommand,
};
pub use icon::{ClusterSize, IconKind, IconRef, IconScheme, select_icon};
pub use overlap::find_overlapping;
pub use point::{BBox, PixelPoint, Point, Polygon};
pub use record::{MarkerId, MarkerRecord};
pub use spider::{SPIRAL_THRESHOLD, SpiderLayout, SpideredMarker, spider};
pub use viewport::{LinearProjection, PixelSize, Projection, ViewportMetrics, ViewportScale};
