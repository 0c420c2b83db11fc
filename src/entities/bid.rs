use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::location::{eta_minutes, Coordinates};
use crate::entities::profile::{CarDetails, Profile, RatingAggregate};

// the driver's profile as it stood when the bid was placed, frozen
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DriverSnapshot {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
    pub is_verified: bool,
    pub car_details: Option<CarDetails>,
    pub rating: Option<RatingAggregate>,
}

impl From<&Profile> for DriverSnapshot {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            avatar_url: profile.avatar_url.clone(),
            is_verified: profile.is_verified,
            car_details: profile.car_details.clone(),
            rating: profile.rating,
        }
    }
}

// immutable once created: there is no edit or withdraw operation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bid {
    pub id: Uuid,
    pub request_id: Uuid,
    pub driver: DriverSnapshot,
    pub amount: i64,
    pub driver_location: Option<Coordinates>,
    pub placed_at: DateTime<Utc>,
    pub seq: u64,
}

impl Bid {
    pub fn new(
        request_id: Uuid,
        driver: &Profile,
        amount: i64,
        driver_location: Option<Coordinates>,
        seq: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            request_id,
            driver: driver.into(),
            amount,
            driver_location,
            placed_at: Utc::now(),
            seq,
        }
    }
}

// read-side projection: distance and ETA to the pickup point are derived at
// query time, never stored
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BidView {
    #[serde(flatten)]
    pub bid: Bid,
    pub distance_km: Option<f64>,
    pub eta_minutes: Option<i64>,
}

impl BidView {
    pub fn project(bid: Bid, pickup: Option<Coordinates>) -> Self {
        let distance_km = match (pickup, bid.driver_location) {
            (Some(pickup), Some(driver)) => Some(pickup.distance_km(&driver)),
            _ => None,
        };

        Self {
            distance_km,
            eta_minutes: distance_km.map(eta_minutes),
            bid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::profile::Role;
    use crate::external::identity::Identity;

    fn driver() -> Profile {
        Profile::new(
            Identity {
                external_id: "ext-d".into(),
                display_name: "Femi".into(),
                email: "femi@example.com".into(),
                photo_url: None,
            },
            Role::Driver,
        )
    }

    #[test]
    fn projection_derives_distance_and_eta() {
        let pickup = Coordinates::parse("6.5244,3.3792");
        let bid = Bid::new(
            Uuid::new_v4(),
            &driver(),
            3000,
            Coordinates::parse("6.4281,3.4219"),
            1,
        );

        let view = BidView::project(bid, pickup);

        let distance = view.distance_km.unwrap();
        assert!((distance - 11.70).abs() < 0.05);
        assert_eq!(view.eta_minutes, Some(23));
    }

    #[test]
    fn projection_degrades_without_coordinates() {
        let bid = Bid::new(Uuid::new_v4(), &driver(), 3000, None, 1);

        let view = BidView::project(bid, Coordinates::parse("6.5244,3.3792"));

        assert!(view.distance_km.is_none());
        assert!(view.eta_minutes.is_none());
    }

    #[test]
    fn snapshot_freezes_the_driver_profile() {
        let mut profile = driver();
        profile.is_verified = true;

        let bid = Bid::new(Uuid::new_v4(), &profile, 2500, None, 1);

        profile.name = "Someone Else".into();
        profile.is_verified = false;

        assert_eq!(bid.driver.name, "Femi");
        assert!(bid.driver.is_verified);
    }
}
