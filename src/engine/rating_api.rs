use super::helpers::{fetch_profile_for_update, load_ride, update_profile};
use super::ride_api::scan_rides;
use super::Engine;

use async_trait::async_trait;
use sled::transaction::ConflictableTransactionError;
use sled::Transactional;
use uuid::Uuid;

use crate::{
    api::RatingAPI,
    auth::User,
    entities::{Rating, Ride, Status},
    error::{invalid_state_error, validation_error, Error},
    store::{doc_key, encode},
};

#[async_trait]
impl RatingAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn submit_rating(
        &self,
        user: User,
        request_id: Uuid,
        rating: u8,
        review: Option<String>,
    ) -> Result<Rating, Error> {
        if !(1..=5).contains(&rating) {
            return Err(validation_error());
        }

        let ride = load_ride(&self.store, &request_id)?;

        self.authorize(user.clone(), "rate", ride.clone())?;

        if ride.status != Status::Completed {
            return Err(invalid_state_error());
        }

        let driver_id = ride
            .accepted_driver_id()
            .ok_or_else(invalid_state_error)?;

        let record = Rating::new(driver_id, request_id, user.id, rating, review);
        let record_bytes = encode(&record)?;

        // the rating row and the driver's running average commit together or
        // not at all; a concurrent duplicate aborts on the existence check
        (&self.store.ratings, &self.store.profiles).transaction(|(ratings, profiles)| {
            if ratings.get(doc_key(&request_id))?.is_some() {
                return Err(ConflictableTransactionError::Abort(invalid_state_error()));
            }

            let mut driver = fetch_profile_for_update(profiles, &driver_id)?;

            driver.apply_rating(rating);

            update_profile(profiles, &driver)?;
            ratings.insert(doc_key(&request_id), record_bytes.as_slice())?;

            Ok(())
        })?;

        tracing::info!("rated request {} with {}", &request_id, rating);

        Ok(record)
    }

    // the prompt is offered for the most recently completed, still-unrated
    // ride only; older unrated rides are not hunted for
    #[tracing::instrument(skip(self))]
    async fn pending_rating(&self, user: User) -> Result<Option<Ride>, Error> {
        let mut completed = scan_rides(&self.store.rides, |ride| {
            ride.passenger.id == user.id && ride.status == Status::Completed
        })?;

        completed.sort_by_key(|ride| std::cmp::Reverse(ride.seq));

        let latest = match completed.into_iter().next() {
            Some(ride) => ride,
            None => return Ok(None),
        };

        if self.store.ratings.get(doc_key(&latest.id))?.is_some() {
            return Ok(None);
        }

        Ok(Some(latest))
    }
}
