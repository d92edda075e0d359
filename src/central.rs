//! Choosing the representative girder for 2D output.

use log::info;

use crate::model::GirderId;
use crate::path::Girder;

/// Median of a set of transverse offsets.
///
/// An even count averages the two middle values. Returns `None` when empty.
#[must_use]
pub fn median_offset(offsets: &[f64]) -> Option<f64> {
    if offsets.is_empty() {
        return None;
    }
    let mut sorted = offsets.to_vec();
    sorted.sort_by(f64::total_cmp);
    let middle = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[middle - 1] + sorted[middle]) / 2.0
    } else {
        sorted[middle]
    })
}

/// Girder whose transverse offset is nearest the median of all offsets.
///
/// Girders equally close to the midline resolve to the smallest id, so the
/// choice depends only on the set of girders and not on their order.
///
/// # Examples
/// ```
/// use grillagex::{select_central_girder, Girder, GirderId};
///
/// let girders: Vec<Girder> = [(1, 0.0), (2, 2.5), (3, 5.0)]
///     .into_iter()
///     .map(|(id, offset)| Girder {
///         id: GirderId(id),
///         links: Vec::new(),
///         nodes: Vec::new(),
///         transverse_offset: offset,
///     })
///     .collect();
/// assert_eq!(select_central_girder(&girders), Some(GirderId(2)));
/// ```
#[must_use]
pub fn select_central_girder(girders: &[Girder]) -> Option<GirderId> {
    let offsets: Vec<f64> = girders
        .iter()
        .map(|girder| girder.transverse_offset)
        .collect();
    let median = median_offset(&offsets)?;
    let central = girders
        .iter()
        .min_by(|a, b| {
            let distance_a = (a.transverse_offset - median).abs();
            let distance_b = (b.transverse_offset - median).abs();
            distance_a.total_cmp(&distance_b).then_with(|| a.id.cmp(&b.id))
        })
        .map(|girder| girder.id)?;
    info!(girder = central.0, median = median; "Selected central girder");
    Some(central)
}
