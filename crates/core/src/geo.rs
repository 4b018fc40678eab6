//! Geographic primitives in WGS-84 longitude/latitude.

use serde::{Deserialize, Serialize};

/// A WGS-84 position, longitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// `[lon, lat]`, the coordinate order used by GeoJSON.
    pub fn to_array(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

impl From<LonLat> for geo_types::Coord<f64> {
    fn from(p: LonLat) -> Self {
        geo_types::Coord { x: p.lon, y: p.lat }
    }
}

impl From<(f64, f64)> for LonLat {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}

impl std::str::FromStr for LonLat {
    type Err = String;

    /// Parse `"lon,lat"`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (lon, lat) = s
            .split_once(',')
            .ok_or_else(|| format!("expected 'lon,lat', got: {}", s))?;
        let lon: f64 = lon.trim().parse().map_err(|e| format!("bad longitude: {}", e))?;
        let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude: {}", e))?;
        let p = Self { lon, lat };
        if !p.is_valid() {
            return Err(format!("coordinate out of range: {}", s));
        }
        Ok(p)
    }
}

/// A lon/lat bounding box given by its south-west and north-east corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: LonLat,
    pub north_east: LonLat,
}

impl Bounds {
    pub const fn new(south_west: LonLat, north_east: LonLat) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Corners are ordered and finite.
    pub fn is_valid(&self) -> bool {
        self.south_west.is_valid()
            && self.north_east.is_valid()
            && self.south_west.lon < self.north_east.lon
            && self.south_west.lat < self.north_east.lat
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: LonLat) -> bool {
        p.lon >= self.south_west.lon
            && p.lon <= self.north_east.lon
            && p.lat >= self.south_west.lat
            && p.lat <= self.north_east.lat
    }

    /// Nearest point inside the box.
    pub fn clamp(&self, p: LonLat) -> LonLat {
        LonLat {
            lon: p.lon.clamp(self.south_west.lon, self.north_east.lon),
            lat: p.lat.clamp(self.south_west.lat, self.north_east.lat),
        }
    }

    pub fn center(&self) -> LonLat {
        LonLat {
            lon: (self.south_west.lon + self.north_east.lon) / 2.0,
            lat: (self.south_west.lat + self.north_east.lat) / 2.0,
        }
    }

    /// `[[west, south], [east, north]]`, the form map engines accept.
    pub fn to_array(self) -> [[f64; 2]; 2] {
        [self.south_west.to_array(), self.north_east.to_array()]
    }
}

/// Pannable extent of the continental United States.
pub const CONTINENTAL_US: Bounds = Bounds::new(
    LonLat::new(-125.0, 24.396308),
    LonLat::new(-66.93457, 49.384358),
);

/// Geographic center of the contiguous United States.
pub const US_CENTER: LonLat = LonLat::new(-98.5795, 39.8283);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_us_bounds_contain_center() {
        assert!(CONTINENTAL_US.is_valid());
        assert!(CONTINENTAL_US.contains(US_CENTER));
        assert!(!CONTINENTAL_US.contains(LonLat::new(-150.0, 61.2)));
    }

    #[test]
    fn test_clamp() {
        let p = CONTINENTAL_US.clamp(LonLat::new(-150.0, 10.0));
        assert_relative_eq!(p.lon, -125.0, epsilon = 1e-12);
        assert_relative_eq!(p.lat, 24.396308, epsilon = 1e-12);
        assert!(CONTINENTAL_US.contains(p));
    }

    #[test]
    fn test_parse_lon_lat() {
        let p: LonLat = "-74.006, 40.7128".parse().unwrap();
        assert_relative_eq!(p.lon, -74.006, epsilon = 1e-12);
        assert_relative_eq!(p.lat, 40.7128, epsilon = 1e-12);
        assert!("40.7".parse::<LonLat>().is_err());
        assert!("200,10".parse::<LonLat>().is_err());
    }
}
