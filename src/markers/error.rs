use std::fmt;

use super::record::MarkerId;

/// Errors raised while validating marker records or computing their geometry
///
/// None of these are fatal: callers drop the offending record or skip the
/// offending merge and carry on with the rest of the frame.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerError {
    /// Position is missing or not a finite lat/lng pair
    InvalidPosition(MarkerId),
    /// A multi-point cluster without bounding geometry
    MissingBoundingGeometry(MarkerId),
    /// A single task carrying bounding geometry
    UnexpectedBoundingGeometry(MarkerId),
    /// `number_of_points` was zero
    ZeroPoints(MarkerId),
    /// Polygon ring that is empty or holds non-finite coordinates
    DegenerateGeometry(&'static str),
}

impl fmt::Display for MarkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerError::InvalidPosition(id) => write!(f, "marker {id} has no valid position"),
            MarkerError::MissingBoundingGeometry(id) => {
                write!(f, "cluster {id} has no bounding geometry")
            }
            MarkerError::UnexpectedBoundingGeometry(id) => {
                write!(f, "single task {id} carries bounding geometry")
            }
            MarkerError::ZeroPoints(id) => write!(f, "marker {id} has zero points"),
            MarkerError::DegenerateGeometry(reason) => write!(f, "degenerate geometry: {reason}"),
        }
    }
}

impl std::error::Error for MarkerError {}
