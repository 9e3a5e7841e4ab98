//! Geographic coordinate type and bearing math.
//!
//! `GeoPoint` uses `f64` latitude/longitude: playback interpolation divides
//! very small timestamp deltas and the replayed positions are compared
//! bit-for-bit in determinism tests, so single precision is not enough here.

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lng * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    /// Componentwise linear interpolation towards `other`.
    ///
    /// `f` is expected in `[0, 1]`; callers clamp before interpolating.
    /// Adequate for the sample spacing of recorded trips (seconds apart);
    /// great-circle segment interpolation is not warranted at that scale.
    #[inline]
    pub fn lerp(self, other: GeoPoint, f: f64) -> GeoPoint {
        GeoPoint {
            lat: self.lat + (other.lat - self.lat) * f,
            lng: self.lng + (other.lng - self.lng) * f,
        }
    }

    /// Initial great-circle bearing from `self` to `other`, degrees `[0, 360)`.
    pub fn initial_bearing_to(self, other: GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lng = (other.lng - self.lng).to_radians();

        let y = d_lng.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lng.cos();
        normalize_bearing(y.atan2(x).to_degrees())
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

// ── Bearing helpers ───────────────────────────────────────────────────────────

/// Normalize a bearing in degrees into `[0, 360)`.
#[inline]
pub fn normalize_bearing(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// Interpolate between two bearings along the shortest arc.
///
/// `lerp_bearing(350.0, 10.0, 0.5)` is `0.0`, not `180.0`.  Result is
/// normalized into `[0, 360)`.
pub fn lerp_bearing(from: f64, to: f64, f: f64) -> f64 {
    // Signed shortest angular difference in (-180, 180].
    let diff = (to - from).rem_euclid(360.0);
    let diff = if diff > 180.0 { diff - 360.0 } else { diff };
    normalize_bearing(from + diff * f)
}
