//! Spherical geodetic coordinates and their Cartesian counterpart.
//!
//! The planet is a perfect sphere. Axis convention: `+Y` points to the north
//! pole, longitude 0 lies on `+Z`, and longitude +90° lies on `+X`:
//!
//! ```text
//! x = r · cos(lat) · sin(lon)
//! y = r · sin(lat)
//! z = r · cos(lat) · cos(lon)
//! ```

use std::f64::consts::{PI, TAU};
use std::fmt;

use crate::CartesianVector;

/// Radius below which a Cartesian vector is treated as the planet center.
pub const GEODETIC_EPSILON: f64 = 1e-9;

/// A position expressed as latitude, longitude and distance from the center.
///
/// Angles are in radians. Longitude is not canonicalized; use
/// [`normalized_longitude_signed`](Self::normalized_longitude_signed) or
/// [`normalized_longitude_positive`](Self::normalized_longitude_positive)
/// when a fixed range matters.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct GeodeticPoint {
    /// Latitude in radians. Range: \[-π/2, π/2\].
    pub latitude: f64,
    /// Longitude in radians. Any value.
    pub longitude: f64,
    /// Distance from the planet center in meters. Never negative.
    pub radius: f64,
}

impl GeodeticPoint {
    /// The planet center: all components zero.
    pub const ZERO: GeodeticPoint = GeodeticPoint {
        latitude: 0.0,
        longitude: 0.0,
        radius: 0.0,
    };

    /// Create a point from radians and meters.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, radius: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius,
        }
    }

    /// Create a point from degrees and meters.
    #[must_use]
    pub fn from_degrees(latitude_deg: f64, longitude_deg: f64, radius: f64) -> Self {
        Self::new(latitude_deg.to_radians(), longitude_deg.to_radians(), radius)
    }

    /// Same direction, different distance from the center.
    #[must_use]
    pub fn with_radius(self, radius: f64) -> Self {
        Self { radius, ..self }
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn latitude_degrees(&self) -> f64 {
        self.latitude.to_degrees()
    }

    /// Longitude in degrees, not normalized.
    #[must_use]
    pub fn longitude_degrees(&self) -> f64 {
        self.longitude.to_degrees()
    }

    /// Height above a sphere of `planet_radius` meters.
    #[must_use]
    pub fn altitude(&self, planet_radius: f64) -> f64 {
        self.radius - planet_radius
    }

    /// Longitude wrapped into \[-π, π).
    #[must_use]
    pub fn normalized_longitude_signed(&self) -> f64 {
        (self.longitude + PI).rem_euclid(TAU) - PI
    }

    /// Longitude wrapped into \[0, 2π).
    #[must_use]
    pub fn normalized_longitude_positive(&self) -> f64 {
        self.longitude.rem_euclid(TAU)
    }

    /// Great-circle distance to `other` along a sphere of `sphere_radius`
    /// meters (haversine). Radii of the two points are ignored.
    #[must_use]
    pub fn surface_distance_to(&self, other: &GeodeticPoint, sphere_radius: f64) -> f64 {
        let dlat = other.latitude - self.latitude;
        let dlon = other.longitude - self.longitude;
        let a = (dlat / 2.0).sin().powi(2)
            + self.latitude.cos() * other.latitude.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * sphere_radius * a.sqrt().min(1.0).asin()
    }

    /// Earth-centered Cartesian position of this point.
    #[inline]
    #[must_use]
    pub fn to_cartesian(&self) -> CartesianVector {
        to_cartesian(self)
    }

    /// Geodetic form of an earth-centered Cartesian position.
    #[inline]
    #[must_use]
    pub fn from_cartesian(v: CartesianVector) -> Self {
        from_cartesian(v)
    }
}

impl fmt::Display for GeodeticPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat = self.latitude_degrees();
        let lon = self.normalized_longitude_signed().to_degrees();
        let lat_dir = if lat >= 0.0 { "N" } else { "S" };
        let lon_dir = if lon >= 0.0 { "E" } else { "W" };
        write!(
            f,
            "{:.4}\u{00B0}{}, {:.4}\u{00B0}{}, {:.1}m",
            lat.abs(),
            lat_dir,
            lon.abs(),
            lon_dir,
            self.radius,
        )
    }
}

/// Convert a geodetic point to an earth-centered Cartesian vector.
///
/// Total: a zero radius yields the zero vector.
#[inline]
#[must_use]
pub fn to_cartesian(point: &GeodeticPoint) -> CartesianVector {
    let (sin_lat, cos_lat) = point.latitude.sin_cos();
    let (sin_lon, cos_lon) = point.longitude.sin_cos();
    CartesianVector::new(
        point.radius * cos_lat * sin_lon,
        point.radius * sin_lat,
        point.radius * cos_lat * cos_lon,
    )
}

/// Convert an earth-centered Cartesian vector to a geodetic point.
///
/// Vectors shorter than [`GEODETIC_EPSILON`] map to [`GeodeticPoint::ZERO`].
/// The returned longitude is in \[-π, π\] as produced by `atan2`.
#[inline]
#[must_use]
pub fn from_cartesian(v: CartesianVector) -> GeodeticPoint {
    let radius = v.length();
    if radius < GEODETIC_EPSILON {
        return GeodeticPoint::ZERO;
    }
    // Rounding can push |y / r| a hair past 1 at the poles.
    let latitude = (v.y / radius).clamp(-1.0, 1.0).asin();
    let longitude = v.x.atan2(v.z);
    GeodeticPoint::new(latitude, longitude, radius)
}
