use std::collections::BTreeMap;
use std::f64::consts::PI;

use super::point::PixelPoint;
use super::record::{MarkerId, MarkerRecord};

/// Groups larger than this are laid out on a spiral instead of a circle
pub const SPIRAL_THRESHOLD: usize = 8;

const TWO_PI: f64 = 2.0 * PI;
/// Keeps the first circle leg off due north, where the source icon sits
const CIRCLE_START_ANGLE: f64 = TWO_PI / 12.0;
const SPIRAL_LENGTH_START: f64 = 11.0;
const SPIRAL_FOOT_SEPARATION: f64 = 28.0;
const SPIRAL_LENGTH_FACTOR: f64 = 5.0;
/// Per-index angle nudge so no two spiral legs coincide
const SPIRAL_INDEX_NUDGE: f64 = 0.0005;

/// A marker pulled out of an overlapping group
#[derive(Debug, Clone, PartialEq)]
pub struct SpideredMarker {
    /// The marker, with `original_position` recording where it really sits
    pub marker: MarkerRecord,
    /// Exploded position in viewport pixels
    pub position_px: PixelPoint,
}

/// Spidered markers keyed by id
pub type SpiderLayout = BTreeMap<MarkerId, SpideredMarker>;

// Layouts (pixel space, y down):
//
// circle(count)
//    circumference = (iconSize / 2) * (2 + count)
//    leg = circumference / 2PI
//    angle_i = 2PI/12 + i * 2PI/count
//
// spiral(count)
//    leg = 11, angle = 0
//    for i = count down to 0
//       if i < count: place marker i at leg along angle
//       angle += 28 / leg + i * 0.0005
//       leg += 2PI * 5 / angle

/// Spreads `group` around `focal_px` so each member is individually clickable
///
/// Uses a circle for up to [`SPIRAL_THRESHOLD`] markers and a spiral beyond
/// that. Fully deterministic for a given focal point, icon size and group order.
/// Geographic positions are left untouched apart from recording
/// `original_position`; converting `position_px` back to a map position is up
/// to the caller.
pub fn spider(focal_px: PixelPoint, icon_size_px: f64, group: &[MarkerRecord]) -> SpiderLayout {
    if group.is_empty() {
        return SpiderLayout::new();
    }

    let positions = if group.len() > SPIRAL_THRESHOLD {
        spiral_positions(focal_px, group.len())
    } else {
        circle_positions(focal_px, icon_size_px, group.len())
    };

    group
        .iter()
        .zip(positions)
        .map(|(marker, position_px)| {
            let mut marker = marker.clone();
            marker.original_position = Some(marker.true_position());
            (
                marker.id.clone(),
                SpideredMarker {
                    marker,
                    position_px,
                },
            )
        })
        .collect()
}

/// Radius of the circle layout for `count` markers
pub fn circle_leg_length(icon_size_px: f64, count: usize) -> f64 {
    let circumference = (icon_size_px / 2.0) * (2 + count) as f64;
    circumference / TWO_PI
}

fn circle_positions(focal: PixelPoint, icon_size_px: f64, count: usize) -> Vec<PixelPoint> {
    let leg = circle_leg_length(icon_size_px, count);
    let step = TWO_PI / count as f64;

    (0..count)
        .map(|i| {
            let angle = CIRCLE_START_ANGLE + i as f64 * step;
            PixelPoint::new(focal.x + leg * angle.cos(), focal.y + leg * angle.sin())
        })
        .collect()
}

fn spiral_positions(focal: PixelPoint, count: usize) -> Vec<PixelPoint> {
    let mut positions = vec![focal; count];
    let mut leg = SPIRAL_LENGTH_START;
    let mut angle = 0.0_f64;

    for i in (0..=count).rev() {
        if i < count {
            positions[i] =
                PixelPoint::new(focal.x + leg * angle.cos(), focal.y + leg * angle.sin());
        }
        angle += SPIRAL_FOOT_SEPARATION / leg + i as f64 * SPIRAL_INDEX_NUDGE;
        leg += TWO_PI * SPIRAL_LENGTH_FACTOR / angle;
    }

    positions
}
