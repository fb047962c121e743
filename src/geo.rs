//! Distance and route-ordering primitives. All distances in this crate are
//! kilometers; the proximity bands in scoring assume the same unit.

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Assumed walking speed for travel-tip estimates.
const WALKING_SPEED_KMH: f64 = 5.0;

/// Fallback location when no stop has coordinates (downtown city center).
pub const DEFAULT_CENTER: (f64, f64) = (47.2529, -122.4443);

/// Great-circle distance in kilometers between two (lat, lng) points.
pub fn distance_km(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lng1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lng2) = (b.0.to_radians(), b.1.to_radians());
    let dlat = lat2 - lat1;
    let dlng = lng2 - lng1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Walking-time estimate in whole minutes.
pub fn estimate_travel_minutes(km: f64) -> u32 {
    (km / WALKING_SPEED_KMH * 60.0).ceil() as u32
}

/// Qualitative transition tip for the gap between two consecutive stops.
pub fn travel_tip(km: f64) -> String {
    if km < 0.1 {
        "Steps away from your last stop".to_string()
    } else if km < 1.5 {
        format!("About a {} minute stroll", estimate_travel_minutes(km))
    } else if km < 3.0 {
        "A short drive or bike ride away".to_string()
    } else {
        format!("{:.1} km away, consider driving", km)
    }
}

/// Greedy nearest-neighbor ordering: the first point stays fixed, then the
/// unplaced point nearest the last-placed one is appended. Not globally
/// optimal, which is fine for the handful of stops a plan holds.
pub fn nearest_neighbor_order(points: &[(f64, f64)]) -> Vec<usize> {
    if points.is_empty() {
        return Vec::new();
    }
    let mut order = Vec::with_capacity(points.len());
    let mut remaining: Vec<usize> = (1..points.len()).collect();
    order.push(0);
    while !remaining.is_empty() {
        let last = points[*order.last().unwrap_or(&0)];
        let (pos, _) = remaining
            .iter()
            .enumerate()
            .map(|(pos, &idx)| (pos, distance_km(last, points[idx])))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap_or((0, 0.0));
        order.push(remaining.remove(pos));
    }
    order
}

/// Arithmetic mean of coordinates; falls back to the downtown center when
/// given no points.
pub fn centroid(points: &[(f64, f64)]) -> (f64, f64) {
    if points.is_empty() {
        return DEFAULT_CENTER;
    }
    let (lat_sum, lng_sum) = points
        .iter()
        .fold((0.0, 0.0), |(la, lo), p| (la + p.0, lo + p.1));
    let n = points.len() as f64;
    (lat_sum / n, lng_sum / n)
}
