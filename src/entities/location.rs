use geo_types::Point;
use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const AVERAGE_SPEED_KMH: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    // pickup locations are free text or a "lat,lon" encoded pair
    pub fn parse(text: &str) -> Option<Self> {
        let (lat, lon) = text.split_once(',')?;

        let latitude: f64 = lat.trim().parse().ok()?;
        let longitude: f64 = lon.trim().parse().ok()?;

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }

        Some(Self {
            latitude,
            longitude,
        })
    }

    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        haversine_km((*self).into(), (*other).into())
    }
}

impl From<Coordinates> for Point<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Point::new(coordinates.longitude, coordinates.latitude)
    }
}

impl From<Point<f64>> for Coordinates {
    fn from(point: Point<f64>) -> Self {
        Self {
            latitude: point.y(),
            longitude: point.x(),
        }
    }
}

pub fn haversine_km(a: Point<f64>, b: Point<f64>) -> f64 {
    let lat_a = a.y().to_radians();
    let lat_b = b.y().to_radians();
    let d_lat = (b.y() - a.y()).to_radians();
    let d_lon = (b.x() - a.x()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

// projected arrival time at an assumed average speed, never less than a
// minute for a driver who has any distance to cover
pub fn eta_minutes(distance_km: f64) -> i64 {
    if distance_km <= 0.0 {
        return 0;
    }

    ((distance_km / AVERAGE_SPEED_KMH * 60.0).round() as i64).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_encoded_pair() {
        let coordinates = Coordinates::parse("6.5244,3.3792").unwrap();

        assert_eq!(coordinates.latitude, 6.5244);
        assert_eq!(coordinates.longitude, 3.3792);

        assert!(Coordinates::parse("Ikeja City Mall").is_none());
        assert!(Coordinates::parse("91.0,10.0").is_none());
        assert!(Coordinates::parse(" 6.5244 , 3.3792 ").is_some());
    }

    #[test]
    fn lagos_pickup_distance_and_eta() {
        let passenger = Coordinates::parse("6.5244,3.3792").unwrap();
        let driver = Coordinates::parse("6.4281,3.4219").unwrap();

        let distance = passenger.distance_km(&driver);

        assert!((distance - 11.70).abs() < 0.05, "got {}", distance);
        assert_eq!(eta_minutes(distance), 23);
    }

    #[test]
    fn eta_floors_at_one_minute() {
        assert_eq!(eta_minutes(0.0), 0);
        assert_eq!(eta_minutes(0.1), 1);
        assert_eq!(eta_minutes(15.0), 30);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinates {
            latitude: 6.5244,
            longitude: 3.3792,
        };
        let b = Coordinates {
            latitude: 6.4281,
            longitude: 3.4219,
        };

        assert_eq!(a.distance_km(&b), b.distance_km(&a));
        assert_eq!(a.distance_km(&a), 0.0);
    }
}
