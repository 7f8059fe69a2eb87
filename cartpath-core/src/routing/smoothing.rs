//! Cosmetic smoothing of route polylines for display

use geo::Coord;
use itertools::Itertools;

/// Replaces every interior point by the 1-3-1 weighted average
/// `(prev + 3 * cur + next) / 5` of itself and its neighbors
///
/// Endpoints and length are preserved; polylines shorter than three points
/// are returned unchanged.
pub fn smooth_path(points: &[Coord<f64>]) -> Vec<Coord<f64>> {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut smoothed = Vec::with_capacity(points.len());
    smoothed.push(first);
    smoothed.extend(
        points
            .iter()
            .tuple_windows()
            .map(|(&prev, &cur, &next)| (prev + cur * 3.0 + next) / 5.0),
    );
    smoothed.push(last);
    smoothed
}
