use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::User;
use crate::entities::{
    Bid, BidView, CarDetails, Coordinates, FareConfig, FareConfigPatch, FareEstimate, Message,
    Profile, Rating, Ride, Role,
};
use crate::error::Error;
use crate::external::identity::Identity;
use crate::store::Subscription;

#[async_trait]
pub trait ProfileAPI {
    async fn provision_profile(&self, identity: Identity, role: Role) -> Result<Profile, Error>;

    async fn find_profile(&self, id: Uuid) -> Result<Profile, Error>;

    async fn update_car_details(&self, user: User, id: Uuid, car: CarDetails)
        -> Result<Profile, Error>;

    async fn attach_license(&self, user: User, id: Uuid, url: String) -> Result<Profile, Error>;

    async fn set_availability(&self, user: User, id: Uuid, available: bool)
        -> Result<Profile, Error>;
}

#[async_trait]
pub trait RideAPI {
    async fn create_ride(
        &self,
        user: User,
        location: String,
        destination: String,
    ) -> Result<Ride, Error>;

    async fn find_ride(&self, user: User, id: Uuid) -> Result<Ride, Error>;

    async fn cancel_ride(&self, user: User, id: Uuid) -> Result<Ride, Error>;

    async fn accept_bid(&self, user: User, id: Uuid, bid_id: Uuid) -> Result<Ride, Error>;

    async fn complete_ride(&self, user: User, id: Uuid) -> Result<Ride, Error>;

    async fn available_rides(&self, user: User) -> Result<Vec<Ride>, Error>;

    async fn active_ride(&self, user: User) -> Result<Option<Ride>, Error>;

    async fn ride_history(&self, user: User) -> Result<Vec<Ride>, Error>;

    async fn watch_ride(&self, user: User, id: Uuid) -> Result<Subscription<Ride>, Error>;
}

#[async_trait]
pub trait BidAPI {
    async fn submit_bid(
        &self,
        user: User,
        request_id: Uuid,
        amount: i64,
        driver_location: Option<Coordinates>,
    ) -> Result<Bid, Error>;

    async fn list_bids(&self, user: User, request_id: Uuid) -> Result<Vec<BidView>, Error>;

    async fn watch_bids(&self, user: User, request_id: Uuid) -> Result<Subscription<Bid>, Error>;
}

#[async_trait]
pub trait RatingAPI {
    async fn submit_rating(
        &self,
        user: User,
        request_id: Uuid,
        rating: u8,
        review: Option<String>,
    ) -> Result<Rating, Error>;

    async fn pending_rating(&self, user: User) -> Result<Option<Ride>, Error>;
}

#[async_trait]
pub trait MessageAPI {
    async fn send_message(&self, user: User, request_id: Uuid, text: String)
        -> Result<Message, Error>;

    async fn list_messages(&self, request_id: Uuid) -> Result<Vec<Message>, Error>;

    async fn watch_messages(&self, request_id: Uuid) -> Result<Subscription<Message>, Error>;
}

#[async_trait]
pub trait FareAPI {
    async fn fare_config(&self) -> Result<FareConfig, Error>;

    async fn estimate_fare(
        &self,
        origin: String,
        destination: String,
    ) -> Result<Option<FareEstimate>, Error>;
}

#[async_trait]
pub trait AdminAPI {
    async fn list_profiles(&self, user: User) -> Result<Vec<Profile>, Error>;

    async fn recent_rides(&self, user: User) -> Result<Vec<Ride>, Error>;

    async fn set_driver_verification(
        &self,
        user: User,
        driver_id: Uuid,
        verified: bool,
    ) -> Result<Profile, Error>;

    async fn update_fare_config(
        &self,
        user: User,
        patch: FareConfigPatch,
    ) -> Result<FareConfig, Error>;
}

pub trait API:
    ProfileAPI + RideAPI + BidAPI + RatingAPI + MessageAPI + FareAPI + AdminAPI
{
}
