//! Geodesi på WGS84-ellipsoiden.
//!
//! Avstand og kurs mellom to punkter bruker Karney-inversen fra `geo::Geodesic`.
//! Projeksjon på en akse (vind/stige) bruker en lokal ekvirektangulær tilnærming,
//! som holder for forskyvninger under ~10 km.

use geo::{Bearing, Destination, Distance, Geodesic, Haversine, Point};
use serde::{Deserialize, Serialize};

use crate::circular::normalize_deg;
use crate::error::{EngineError, Result};

/// Jordradius (m) for den lokale tangentplan-tilnærmingen.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meter per nautisk mil.
pub const METERS_PER_NM: f64 = 1852.0;

/// Validert posisjon i grader. Kan kun lages via [`GeoPos::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPos")]
pub struct GeoPos {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct RawGeoPos {
    #[serde(alias = "Lat", alias = "latitude")]
    lat: f64,
    #[serde(alias = "Lon", alias = "longitude")]
    lon: f64,
}

impl TryFrom<RawGeoPos> for GeoPos {
    type Error = EngineError;

    fn try_from(raw: RawGeoPos) -> Result<Self> {
        GeoPos::new(raw.lat, raw.lon)
    }
}

impl GeoPos {
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        check_coordinate(lat, lon)?;
        Ok(Self { lat, lon })
    }

    /// For verdier som allerede er sjekket (punkter i et track).
    pub(crate) fn from_validated(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// geo bruker (x, y) = (lon, lat)
    #[inline]
    fn point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    fn from_point(p: Point<f64>) -> Self {
        // Direkte-løsningen kan gi lon utenfor ±180 nær datolinjen
        let lon = (p.x() + 180.0).rem_euclid(360.0) - 180.0;
        Self { lat: p.y(), lon }
    }
}

/// lat ∈ [-90, 90], lon ∈ [-180, 180], begge endelige.
pub fn check_coordinate(lat: f64, lon: f64) -> Result<()> {
    let ok = lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon);
    if ok {
        Ok(())
    } else {
        Err(EngineError::InvalidCoordinate { lat, lon })
    }
}

/// WGS84-invers: (avstand m, kurs p1→p2, kurs p2→p1), kurs i [0, 360).
pub fn distance_bearing(p1: GeoPos, p2: GeoPos) -> (f64, f64, f64) {
    let (a, b) = (p1.point(), p2.point());
    let dist = Geodesic.distance(a, b);
    let fwd = normalize_deg(Geodesic.bearing(a, b));
    let back = normalize_deg(Geodesic.bearing(b, a));
    (dist, fwd, back)
}

/// WGS84-direkte: punktet `distance_m` fra `p` i retning `bearing_deg`.
pub fn project(p: GeoPos, bearing_deg: f64, distance_m: f64) -> GeoPos {
    GeoPos::from_point(Geodesic.destination(p.point(), normalize_deg(bearing_deg), distance_m))
}

/// Storsirkelavstand (m). Brukes der en rask avstand holder (avstand mellom merker).
pub fn haversine_distance(p1: GeoPos, p2: GeoPos) -> f64 {
    Haversine.distance(p1.point(), p2.point())
}

/// Forskyvningen p1→p2 projisert på en akse (grader fra nord), i meter.
/// Positiv betyr at p2 ligger foran p1 langs aksen.
pub fn axis_projection(p1: GeoPos, p2: GeoPos, axis_deg: f64) -> f64 {
    let dlat = (p2.lat - p1.lat).to_radians();
    let dlon = (p2.lon - p1.lon).to_radians();
    let lat_mid = ((p1.lat + p2.lat) / 2.0).to_radians();
    let xm = EARTH_RADIUS_M * dlon * lat_mid.cos();
    let ym = EARTH_RADIUS_M * dlat;

    let az = normalize_deg(axis_deg).to_radians();
    xm * az.sin() + ym * az.cos()
}

/// Stigeavstand: projeksjon på aksen vinkelrett på vinden (TWD + 90).
pub fn ladder_separation(p1: GeoPos, p2: GeoPos, twd_deg: f64) -> f64 {
    axis_projection(p1, p2, twd_deg + 90.0)
}

/// To punkter `half_length_m` på hver side av `p`, vinkelrett på vinden.
/// Brukes til å tegne startlinje/referanselinjer.
pub fn perpendicular_segment(p: GeoPos, twd_deg: f64, half_length_m: f64) -> (GeoPos, GeoPos) {
    let left = project(p, twd_deg - 90.0, half_length_m);
    let right = project(p, twd_deg + 90.0, half_length_m);
    (left, right)
}
