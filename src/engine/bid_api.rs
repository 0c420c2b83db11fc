use super::helpers::{fetch_ride_for_update, load_profile, load_ride};
use super::Engine;

use async_trait::async_trait;
use sled::transaction::ConflictableTransactionError;
use sled::Transactional;
use uuid::Uuid;

use crate::{
    api::BidAPI,
    auth::User,
    entities::{Bid, BidView, Coordinates},
    error::{invalid_state_error, unverified_driver_error, validation_error, Error},
    store::{child_key, decode, doc_key, encode, Subscription},
};

#[async_trait]
impl BidAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn submit_bid(
        &self,
        user: User,
        request_id: Uuid,
        amount: i64,
        driver_location: Option<Coordinates>,
    ) -> Result<Bid, Error> {
        let ride = load_ride(&self.store, &request_id)?;

        self.authorize(user.clone(), "bid", ride)?;

        let driver = load_profile(&self.store, &user.id)?;

        if !driver.is_verified {
            return Err(unverified_driver_error());
        }

        if amount <= 0 {
            return Err(validation_error());
        }

        // the driver's current profile is frozen into the bid; a driver may
        // place more than one bid on the same request
        let bid = Bid::new(
            request_id,
            &driver,
            amount,
            driver_location,
            self.store.next_seq()?,
        );

        let bid_bytes = encode(&bid)?;

        (&self.store.rides, &self.store.bids).transaction(|(rides, bids)| {
            let ride = fetch_ride_for_update(rides, &request_id)?;

            // the bid set is append-only while, and only while, the request
            // is still pending
            if !ride.is_pending() {
                return Err(ConflictableTransactionError::Abort(invalid_state_error()));
            }

            bids.insert(
                child_key(&bid.request_id, bid.seq).as_slice(),
                bid_bytes.as_slice(),
            )?;

            Ok(())
        })?;

        tracing::info!("driver {} bid {} on request {}", &user.id, amount, &request_id);

        Ok(bid)
    }

    // canonical presentation order: cheapest first, ties by insertion order
    #[tracing::instrument(skip(self))]
    async fn list_bids(&self, user: User, request_id: Uuid) -> Result<Vec<BidView>, Error> {
        let ride = load_ride(&self.store, &request_id)?;

        self.authorize(user, "read", ride.clone())?;

        let pickup = Coordinates::parse(&ride.location);

        let mut bids = Vec::new();

        for entry in self.store.bids.scan_prefix(doc_key(&request_id)) {
            let (_, bytes) = entry?;
            let bid: Bid = decode(&bytes)?;

            bids.push(bid);
        }

        bids.sort_by_key(|bid| (bid.amount, bid.seq));

        Ok(bids
            .into_iter()
            .map(|bid| BidView::project(bid, pickup))
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn watch_bids(&self, user: User, request_id: Uuid) -> Result<Subscription<Bid>, Error> {
        let ride = load_ride(&self.store, &request_id)?;

        self.authorize(user, "read", ride)?;

        Ok(Subscription::children(
            &self.store.bids,
            &doc_key(&request_id),
        ))
    }
}
