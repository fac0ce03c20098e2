//! Point geometries for customer and seller locations.
//!
//! Points are built from the extract's `geolocation_lng` / `geolocation_lat`
//! columns in WGS 84 (EPSG:4326) and can be reprojected to Web Mercator
//! (EPSG:3857) for drawing against a tiled basemap.

use serde::{Deserialize, Serialize};

/// WGS 84 semi-major axis in metres, as used by EPSG:3857.
const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Web Mercator is undefined at the poles; latitudes are clamped to this.
const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Coordinate reference system of a [`GeoPoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crs {
    /// Longitude/latitude in degrees.
    #[serde(rename = "EPSG:4326")]
    Wgs84,
    /// Spherical Mercator metres.
    #[serde(rename = "EPSG:3857")]
    WebMercator,
}

/// A 2-D point. `x` is longitude (or easting), `y` is latitude (or northing).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub x: f64,
    pub y: f64,
    pub crs: Crs,
}

impl GeoPoint {
    /// Build a WGS 84 point from longitude and latitude in degrees.
    pub fn from_lng_lat(lng: f64, lat: f64) -> Self {
        Self {
            x: lng,
            y: lat,
            crs: Crs::Wgs84,
        }
    }

    /// Reproject to EPSG:3857. Points already in Web Mercator are returned
    /// unchanged.
    pub fn to_web_mercator(self) -> Self {
        if self.crs == Crs::WebMercator {
            return self;
        }
        let lat = self.y.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
        let x = EARTH_RADIUS_M * self.x.to_radians();
        let y = EARTH_RADIUS_M * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
        Self {
            x,
            y,
            crs: Crs::WebMercator,
        }
    }
}
