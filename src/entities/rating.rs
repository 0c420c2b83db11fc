use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// one row per completed ride, never mutated or deleted
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Rating {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub request_id: Uuid,
    pub passenger_id: Uuid,
    pub rating: u8,
    pub review: Option<String>,
    pub rated_at: DateTime<Utc>,
}

impl Rating {
    pub fn new(
        driver_id: Uuid,
        request_id: Uuid,
        passenger_id: Uuid,
        rating: u8,
        review: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            driver_id,
            request_id,
            passenger_id,
            rating,
            review,
            rated_at: Utc::now(),
        }
    }
}
