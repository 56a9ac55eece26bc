use std::fmt;

use super::error::MarkerError;
use super::point::{BBox, Point, Polygon};

/// Stable identity of a task or cluster marker
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(pub String);

impl MarkerId {
    pub fn new(id: impl Into<String>) -> Self {
        MarkerId(id.into())
    }

    /// Synthetic id for a cluster produced by merging `absorbed` clusters into `self`
    pub fn merged(&self, absorbed: usize) -> MarkerId {
        MarkerId(format!("{}~{}", self.0, absorbed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MarkerId {
    fn from(id: &str) -> Self {
        MarkerId::new(id)
    }
}

/// One task, or one pre-aggregated group of tasks, to be placed on the map
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerRecord {
    pub id: MarkerId,
    /// Current render position; differs from the true one while spidered
    pub position: Point,
    /// True position, set only while the marker is spidered
    pub original_position: Option<Point>,
    /// 1 for an individual task, more for an aggregated cluster
    pub number_of_points: usize,
    /// Present exactly when `number_of_points > 1`
    pub bounding_geometry: Option<Polygon>,
    /// Opaque status/priority payload for the rendering layer
    pub status_meta: Option<String>,
}

impl MarkerRecord {
    /// Creates a single-task marker
    pub fn task(id: impl Into<MarkerId>, position: Point) -> Self {
        MarkerRecord {
            id: id.into(),
            position,
            original_position: None,
            number_of_points: 1,
            bounding_geometry: None,
            status_meta: None,
        }
    }

    /// Creates a cluster marker centered on its bounding box
    pub fn cluster(id: impl Into<MarkerId>, number_of_points: usize, bounds: BBox) -> Self {
        MarkerRecord {
            id: id.into(),
            position: bounds.center(),
            original_position: None,
            number_of_points,
            bounding_geometry: Some(bounds.to_polygon()),
            status_meta: None,
        }
    }

    pub fn with_status(mut self, status_meta: impl Into<String>) -> Self {
        self.status_meta = Some(status_meta.into());
        self
    }

    pub fn is_cluster(&self) -> bool {
        self.number_of_points > 1
    }

    /// Position the marker really sits at, ignoring any spider offset
    pub fn true_position(&self) -> Point {
        self.original_position.unwrap_or(self.position)
    }

    /// Checks the record carries everything needed to place it on the map
    pub fn validate(&self) -> Result<(), MarkerError> {
        if !self.position.is_finite() {
            return Err(MarkerError::InvalidPosition(self.id.clone()));
        }
        match (self.number_of_points, &self.bounding_geometry) {
            (0, _) => Err(MarkerError::ZeroPoints(self.id.clone())),
            (1, Some(_)) => Err(MarkerError::UnexpectedBoundingGeometry(self.id.clone())),
            (1, None) => Ok(()),
            (_, None) => Err(MarkerError::MissingBoundingGeometry(self.id.clone())),
            (_, Some(polygon)) => polygon.bbox().map(|_| ()),
        }
    }

    /// Bounding box of a cluster, or the degenerate box around a single task
    pub fn bbox(&self) -> Result<BBox, MarkerError> {
        match &self.bounding_geometry {
            Some(polygon) => polygon.bbox(),
            None => BBox::from_points(&[self.true_position()]),
        }
    }
}
