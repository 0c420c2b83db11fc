use super::helpers::{fetch_ride_for_update, load_profile, load_ride, update_ride};
use super::Engine;

use async_trait::async_trait;
use sled::transaction::ConflictableTransactionError;
use sled::Transactional;
use uuid::Uuid;

use crate::{
    api::RideAPI,
    auth::{Platform, User},
    entities::{Bid, Ride, Status},
    error::{conflict_error, not_found_error, validation_error, Error},
    store::{decode, doc_key, Subscription},
};

#[async_trait]
impl RideAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_ride(
        &self,
        user: User,
        location: String,
        destination: String,
    ) -> Result<Ride, Error> {
        self.authorize(user.clone(), "create_ride", Platform::default())?;

        if location.trim().is_empty() || destination.trim().is_empty() {
            return Err(validation_error());
        }

        let passenger = load_profile(&self.store, &user.id)?;
        let ride = Ride::new(&passenger, location, destination, self.store.next_seq()?);

        // the active-request index is checked and claimed in the same
        // transaction as the insert, so a passenger can never hold two
        // live requests even under concurrent creates
        (&self.store.rides, &self.store.active_rides).transaction(|(rides, active)| {
            if active.get(doc_key(&ride.passenger.id))?.is_some() {
                return Err(ConflictableTransactionError::Abort(conflict_error()));
            }

            active.insert(doc_key(&ride.passenger.id), doc_key(&ride.id))?;
            update_ride(rides, &ride)?;

            Ok(())
        })?;

        tracing::info!("created ride request {}", &ride.id);

        Ok(ride)
    }

    #[tracing::instrument(skip(self))]
    async fn find_ride(&self, user: User, id: Uuid) -> Result<Ride, Error> {
        let ride = load_ride(&self.store, &id)?;

        self.authorize(user, "read", ride.clone())?;

        Ok(ride)
    }

    #[tracing::instrument(skip(self))]
    async fn cancel_ride(&self, user: User, id: Uuid) -> Result<Ride, Error> {
        let ride = load_ride(&self.store, &id)?;

        self.authorize(user, "cancel", ride.clone())?;

        // cancellation removes the record outright; bids under it orphan and
        // disappear with the parent
        let cancelled =
            (&self.store.rides, &self.store.active_rides).transaction(|(rides, active)| {
                let mut ride = fetch_ride_for_update(rides, &id)?;

                ride.cancel().map_err(ConflictableTransactionError::Abort)?;

                rides.remove(doc_key(&id))?;
                active.remove(doc_key(&ride.passenger.id))?;

                Ok(ride)
            })?;

        Ok(cancelled)
    }

    #[tracing::instrument(skip(self))]
    async fn accept_bid(&self, user: User, id: Uuid, bid_id: Uuid) -> Result<Ride, Error> {
        let ride = load_ride(&self.store, &id)?;

        self.authorize(user, "accept_bid", ride.clone())?;

        // bids are immutable once placed, so the winning bid can be resolved
        // before the transaction; a bid belonging to another request is simply
        // not found under this one's keyspace
        let mut winning = None;

        for entry in self.store.bids.scan_prefix(doc_key(&id)) {
            let (_, bytes) = entry?;
            let bid: Bid = decode(&bytes)?;

            if bid.id == bid_id {
                winning = Some(bid);
                break;
            }
        }

        let winning = winning.ok_or_else(not_found_error)?;

        // status flip, accepted_bid_id and the frozen bid snapshot land in a
        // single document write; racing accepts are serialized by the store
        // and the loser aborts on the status check
        let ride = self.store.rides.transaction(|rides| {
            let mut ride = fetch_ride_for_update(rides, &id)?;

            ride.accept_bid(winning.clone())
                .map_err(ConflictableTransactionError::Abort)?;

            update_ride(rides, &ride)?;

            Ok(ride)
        })?;

        tracing::info!("accepted bid {} on ride request {}", &bid_id, &id);

        Ok(ride)
    }

    #[tracing::instrument(skip(self))]
    async fn complete_ride(&self, user: User, id: Uuid) -> Result<Ride, Error> {
        let ride = load_ride(&self.store, &id)?;

        self.authorize(user, "complete", ride.clone())?;

        let ride = (&self.store.rides, &self.store.active_rides).transaction(|(rides, active)| {
            let mut ride = fetch_ride_for_update(rides, &id)?;

            ride.complete()
                .map_err(ConflictableTransactionError::Abort)?;

            update_ride(rides, &ride)?;
            active.remove(doc_key(&ride.passenger.id))?;

            Ok(ride)
        })?;

        Ok(ride)
    }

    // every request still open for bidding, newest first; requests the caller
    // already bid on are not filtered out
    #[tracing::instrument(skip(self))]
    async fn available_rides(&self, user: User) -> Result<Vec<Ride>, Error> {
        self.authorize(user, "list_available", Platform::default())?;

        let mut rides = scan_rides(&self.store.rides, |ride| ride.is_pending())?;

        rides.sort_by_key(|ride| std::cmp::Reverse(ride.seq));

        Ok(rides)
    }

    #[tracing::instrument(skip(self))]
    async fn active_ride(&self, user: User) -> Result<Option<Ride>, Error> {
        let ride_id = match self.store.active_rides.get(doc_key(&user.id))? {
            Some(bytes) => Uuid::from_slice(&bytes).map_err(crate::error::database_error)?,
            None => return Ok(None),
        };

        Ok(Some(load_ride(&self.store, &ride_id)?))
    }

    #[tracing::instrument(skip(self))]
    async fn ride_history(&self, user: User) -> Result<Vec<Ride>, Error> {
        let mut rides = scan_rides(&self.store.rides, |ride| {
            ride.passenger.id == user.id && ride.status == Status::Completed
        })?;

        rides.sort_by_key(|ride| std::cmp::Reverse(ride.seq));

        Ok(rides)
    }

    #[tracing::instrument(skip(self))]
    async fn watch_ride(&self, user: User, id: Uuid) -> Result<Subscription<Ride>, Error> {
        let ride = load_ride(&self.store, &id)?;

        self.authorize(user, "read", ride)?;

        Ok(Subscription::document(&self.store.rides, &doc_key(&id)))
    }
}

pub(super) fn scan_rides<F>(tree: &sled::Tree, keep: F) -> Result<Vec<Ride>, Error>
where
    F: Fn(&Ride) -> bool,
{
    let mut rides = Vec::new();

    for entry in tree.iter() {
        let (_, bytes) = entry?;
        let ride: Ride = decode(&bytes)?;

        if keep(&ride) {
            rides.push(ride);
        }
    }

    Ok(rides)
}
