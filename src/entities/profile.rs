use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::external::identity::Identity;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Passenger,
    Driver,
    Admin,
}

impl Role {
    pub fn name(&self) -> String {
        match self {
            Self::Passenger => "passenger".into(),
            Self::Driver => "driver".into(),
            Self::Admin => "admin".into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CarDetails {
    pub make: String,
    pub model: String,
    pub color: String,
    pub license_plate: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatingAggregate {
    pub average: f64,
    pub count: i64,
}

// The live, mutable profile record. Frozen copies of it are embedded into
// rides and bids as snapshot types; the two must never be conflated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub external_id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub is_verified: bool,
    pub car_details: Option<CarDetails>,
    pub license_url: Option<String>,
    pub rating: Option<RatingAggregate>,
    pub is_available: Option<bool>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(identity: Identity, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            external_id: identity.external_id,
            name: identity.display_name,
            email: identity.email,
            avatar_url: identity.photo_url,
            role,
            // drivers stay unverified until an admin approves their documents
            is_verified: role != Role::Driver,
            car_details: None,
            license_url: None,
            rating: None,
            is_available: match role {
                Role::Driver => Some(false),
                _ => None,
            },
            created_at: Utc::now(),
        }
    }

    pub fn is_driver(&self) -> bool {
        self.role == Role::Driver
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    // later sign-ins refresh identity fields only, never role or verification
    pub fn refresh_identity(&mut self, identity: Identity) {
        self.name = identity.display_name;
        self.email = identity.email;
        self.avatar_url = identity.photo_url;
    }

    pub fn apply_rating(&mut self, value: u8) {
        let aggregate = self.rating.get_or_insert(RatingAggregate {
            average: 0.0,
            count: 0,
        });

        aggregate.average = (aggregate.average * aggregate.count as f64 + value as f64)
            / (aggregate.count + 1) as f64;
        aggregate.count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            external_id: "ext-1".into(),
            display_name: "Ada".into(),
            email: "ada@example.com".into(),
            photo_url: None,
        }
    }

    #[test]
    fn drivers_start_unverified_and_offline() {
        let driver = Profile::new(identity(), Role::Driver);

        assert!(!driver.is_verified);
        assert_eq!(driver.is_available, Some(false));

        let passenger = Profile::new(identity(), Role::Passenger);

        assert!(passenger.is_verified);
        assert_eq!(passenger.is_available, None);
    }

    #[test]
    fn rating_fold_updates_the_running_average() {
        let mut driver = Profile::new(identity(), Role::Driver);
        driver.rating = Some(RatingAggregate {
            average: 4.0,
            count: 3,
        });

        driver.apply_rating(5);

        let aggregate = driver.rating.unwrap();
        assert_eq!(aggregate.average, 4.25);
        assert_eq!(aggregate.count, 4);
    }

    #[test]
    fn first_rating_seeds_the_aggregate() {
        let mut driver = Profile::new(identity(), Role::Driver);

        driver.apply_rating(4);

        let aggregate = driver.rating.unwrap();
        assert_eq!(aggregate.average, 4.0);
        assert_eq!(aggregate.count, 1);
    }

    #[test]
    fn refresh_keeps_role_and_verification() {
        let mut driver = Profile::new(identity(), Role::Driver);
        driver.is_verified = true;

        driver.refresh_identity(Identity {
            external_id: "ext-1".into(),
            display_name: "Ada L.".into(),
            email: "ada@example.com".into(),
            photo_url: Some("https://cdn.example.com/ada.png".into()),
        });

        assert_eq!(driver.name, "Ada L.");
        assert_eq!(driver.role, Role::Driver);
        assert!(driver.is_verified);
    }
}
