use chrono::{DateTime, Utc};
use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::bid::Bid;
use crate::entities::profile::Profile;
use crate::error::{invalid_state_error, Error};

// the passenger as they stood when the request was created, frozen
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PassengerSnapshot {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub is_verified: bool,
}

impl From<&Profile> for PassengerSnapshot {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            email: profile.email.clone(),
            avatar_url: profile.avatar_url.clone(),
            is_verified: profile.is_verified,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    Accepted,
    Completed,
    Cancelled,
}

impl Status {
    pub fn name(&self) -> String {
        match self {
            Self::Pending => "pending".into(),
            Self::Accepted => "accepted".into(),
            Self::Completed => "completed".into(),
            Self::Cancelled => "cancelled".into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ride {
    pub id: Uuid,
    pub passenger: PassengerSnapshot,
    pub location: String,
    pub destination: String,
    pub status: Status,
    pub requested_at: DateTime<Utc>,
    pub seq: u64,
    pub accepted_bid_id: Option<Uuid>,
    pub accepted_bid: Option<Bid>,
}

impl Ride {
    pub fn new(passenger: &Profile, location: String, destination: String, seq: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            passenger: passenger.into(),
            location,
            destination,
            status: Status::Pending,
            requested_at: Utc::now(),
            seq,
            accepted_bid_id: None,
            accepted_bid: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }

    pub fn accepted_driver_id(&self) -> Option<Uuid> {
        self.accepted_bid.as_ref().map(|bid| bid.driver.id)
    }

    pub fn chat_open(&self) -> bool {
        matches!(self.status, Status::Accepted | Status::Completed)
    }

    // the winning bid is frozen onto the request in the same write that flips
    // the status, so a reader never observes ACCEPTED without the snapshot
    #[tracing::instrument(skip(bid))]
    pub fn accept_bid(&mut self, bid: Bid) -> Result<(), Error> {
        match self.status {
            Status::Pending => {
                self.accepted_bid_id = Some(bid.id);
                self.accepted_bid = Some(bid);
                self.status = Status::Accepted;
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }

    #[tracing::instrument]
    pub fn complete(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Accepted => {
                self.status = Status::Completed;
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }

    #[tracing::instrument]
    pub fn cancel(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Pending => {
                self.status = Status::Cancelled;
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }
}

impl PolarClass for Ride {
    fn get_polar_class_builder() -> oso::ClassBuilder<Ride> {
        oso::Class::builder()
            .name("Ride")
            .add_attribute_getter("passenger_id", |recv: &Ride| recv.passenger.id.clone())
            .add_attribute_getter("accepted_driver_id", |recv: &Ride| {
                recv.accepted_driver_id()
            })
            .add_attribute_getter("status", |recv: &Ride| recv.status.name())
    }

    fn get_polar_class() -> oso::Class {
        let builder = Ride::get_polar_class_builder();
        builder.build()
    }
}
