use super::distance::distance_degrees;
use super::record::MarkerRecord;

/// Finds the candidates that sit too close to `target` to be told apart
///
/// Two markers overlap when their degree distance is at most half the icon
/// footprint. Distances are taken between true positions, so markers that are
/// currently spidered are compared where they really are. `target` itself
/// (matched by id) is never part of the result.
pub fn find_overlapping<'a>(
    target: &MarkerRecord,
    candidates: &'a [MarkerRecord],
    icon_size_deg: f64,
) -> Vec<&'a MarkerRecord> {
    let threshold = icon_size_deg / 2.0;
    let origin = target.true_position();

    candidates
        .iter()
        .filter(|m| m.id != target.id)
        .filter(|m| distance_degrees(&origin, &m.true_position()) <= threshold)
        .collect()
}
