use bitvec::prelude::*;
use tracing::{debug, trace, warn};

use super::distance::distance_degrees;
use super::error::MarkerError;
use super::record::MarkerRecord;
use super::viewport::ViewportScale;

// Greedy consolidation:
//
// for each cluster C not yet consumed, in input order
//    if C has no bounding geometry, emit it untouched
//    for each later cluster D not yet consumed and with bounding geometry
//       if dist(C, D) <= iconSizeDeg and bbox(C) U bbox(D) fits in maxExtent
//          C = merge(C, D), mark D consumed
//    emit C
//
// Merge decisions depend on input order, so the whole set is recomputed on
// every input change rather than patched.

/// Merges adjacent clusters to bound the number of cluster icons on screen
///
/// Single tasks (no bounding geometry) are never merged. A pair whose geometry
/// cannot be merged is left as two clusters; nothing is ever dropped, so the
/// total `number_of_points` of the output equals that of the input.
pub fn consolidate(
    clusters: &[MarkerRecord],
    scale: &ViewportScale,
    max_extent_deg: f64,
) -> Vec<MarkerRecord> {
    let mut consumed = bitvec![0; clusters.len()];
    let mut result = Vec::with_capacity(clusters.len());

    for i in 0..clusters.len() {
        if consumed[i] {
            continue;
        }
        consumed.set(i, true);

        let mut current = clusters[i].clone();
        if current.bounding_geometry.is_none() {
            result.push(current);
            continue;
        }

        let mut absorbed = 0;
        for j in (i + 1)..clusters.len() {
            let other = &clusters[j];
            if consumed[j] || other.bounding_geometry.is_none() {
                continue;
            }
            if distance_degrees(&current.position, &other.position) > scale.icon_size_deg {
                continue;
            }

            match merge_pair(&current, other, max_extent_deg) {
                Ok(Some(merged)) => {
                    trace!(into = %current.id, absorbed = %other.id, "merged cluster pair");
                    current = merged;
                    consumed.set(j, true);
                    absorbed += 1;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(first = %current.id, second = %other.id, "skipping cluster merge: {e}");
                }
            }
        }

        if absorbed > 0 {
            current.id = current.id.merged(absorbed);
        }
        result.push(current);
    }

    debug!(
        input = clusters.len(),
        output = result.len(),
        "consolidated clusters"
    );
    result
}

/// Runs [`consolidate`] only when the map is in cluster mode
pub fn consolidate_if_needed(
    clusters: &[MarkerRecord],
    scale: &ViewportScale,
    cluster_mode: bool,
) -> Vec<MarkerRecord> {
    if !cluster_mode {
        return clusters.to_vec();
    }
    consolidate(clusters, scale, scale.max_cluster_extent_deg())
}

/// Combines two clusters, or returns `None` when the union would be too large
///
/// The merged cluster keeps `first`'s id and `status_meta`; `second`'s payload is dropped.
fn merge_pair(
    first: &MarkerRecord,
    second: &MarkerRecord,
    max_extent_deg: f64,
) -> Result<Option<MarkerRecord>, MarkerError> {
    let union = first.bbox()?.union(&second.bbox()?);
    if union.width() > max_extent_deg || union.height() > max_extent_deg {
        return Ok(None);
    }

    let polygon = union.to_polygon();
    let position = polygon.centroid()?;

    Ok(Some(MarkerRecord {
        id: first.id.clone(),
        position,
        original_position: None,
        number_of_points: first.number_of_points + second.number_of_points,
        bounding_geometry: Some(polygon),
        status_meta: first.status_meta.clone(),
    }))
}
