//! Collapse nearly-collinear neighbouring segments into one display
//! segment.
//!
//! Merging is greedy and left to right: each segment is compared with the
//! segment currently being grown, and that segment's bearing is always the
//! bearing of the last piece it absorbed. A different starting vertex can
//! therefore produce a different grouping.

use crate::segment::RawSegment;

/// Map a bearing onto `(0, 180]`, discarding direction.
fn undirected(angle: f64) -> f64 {
    if angle > 0.0 { angle } else { 180.0 - angle.abs() }
}

/// Whether two bearings are within `tolerance` degrees of each other.
///
/// Both bearings are first made undirected. They are then in tolerance if
/// any of these is strictly below `tolerance`:
///
/// - `|a + b|` (both internal angles),
/// - `|a − b|` (one internal, one external),
/// - `|180 − |a − b||` (both external).
///
/// The comparison is strict, so a tolerance of `0` never merges. A missing
/// bearing (zero-length segment) is never in tolerance.
#[must_use]
pub fn in_tolerance(a: Option<f64>, b: Option<f64>, tolerance: f64) -> bool {
    let (Some(a), Some(b)) = (a, b) else {
        return false;
    };
    let a = undirected(a);
    let b = undirected(b);
    (b + a).abs() < tolerance
        || (b - a).abs() < tolerance
        || (180.0 - (b - a).abs()).abs() < tolerance
}

/// Merge consecutive segments whose bearings are within `tolerance`
/// degrees.
///
/// For closed rings the first and last resulting segments are compared as
/// well (see [`fold_seam`]); the flag reports whether they were joined. At
/// least one segment is always kept for non-empty input.
#[must_use]
pub fn merge_segments(
    segments: Vec<RawSegment>,
    tolerance: f64,
    closed: bool,
) -> (Vec<RawSegment>, bool) {
    let mut merged = merge_linear(segments, tolerance);
    let seam_merged = closed && fold_seam(&mut merged, tolerance);
    (merged, seam_merged)
}

/// Left-to-right merge without any wrap-around handling.
#[must_use]
pub fn merge_linear(segments: Vec<RawSegment>, tolerance: f64) -> Vec<RawSegment> {
    let mut iter = segments.into_iter();
    let Some(mut active) = iter.next() else {
        return Vec::new();
    };

    let mut merged = Vec::new();
    for segment in iter {
        if in_tolerance(active.bearing, segment.bearing, tolerance) {
            log::trace!(
                "merging segment ending at ({}, {}) into run of {}",
                segment.end.lat,
                segment.end.lng,
                active.merged,
            );
            active.absorb(segment);
        } else {
            merged.push(std::mem::replace(&mut active, segment));
        }
    }
    merged.push(active);
    merged
}

/// Fold the first segment of a ring into the last one when the two are in
/// tolerance, so no label sits on the seam where the ring happens to
/// start.
///
/// Returns whether a fold happened. A ring that already merged into a
/// single run is left alone.
pub fn fold_seam(merged: &mut Vec<RawSegment>, tolerance: f64) -> bool {
    if merged.len() < 2 {
        return false;
    }
    let last = merged.len() - 1;
    if !in_tolerance(merged[0].bearing, merged[last].bearing, tolerance) {
        return false;
    }
    let first = merged.remove(0);
    log::debug!(
        "folding first segment ({} pieces) across the ring seam",
        first.merged,
    );
    if let Some(tail) = merged.last_mut() {
        tail.absorb(first);
    }
    true
}
