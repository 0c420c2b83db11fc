use super::helpers::{fetch_profile_for_update, update_profile};
use super::ride_api::scan_rides;
use super::{Engine, FARE_CONFIG_KEY};

use async_trait::async_trait;
use sled::transaction::ConflictableTransactionError;
use uuid::Uuid;

use crate::{
    api::{AdminAPI, FareAPI},
    auth::{Platform, User},
    entities::{FareConfig, FareConfigPatch, Profile, Ride},
    error::{validation_error, Error},
    store::{decode, encode},
};

pub const RECENT_RIDES_LIMIT: usize = 50;

#[async_trait]
impl AdminAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_profiles(&self, user: User) -> Result<Vec<Profile>, Error> {
        self.authorize(user, "administer", Platform::default())?;

        let mut profiles = Vec::new();

        for entry in self.store.profiles.iter() {
            let (_, bytes) = entry?;
            profiles.push(decode(&bytes)?);
        }

        Ok(profiles)
    }

    #[tracing::instrument(skip(self))]
    async fn recent_rides(&self, user: User) -> Result<Vec<Ride>, Error> {
        self.authorize(user, "administer", Platform::default())?;

        let mut rides = scan_rides(&self.store.rides, |_| true)?;

        rides.sort_by_key(|ride| std::cmp::Reverse(ride.seq));
        rides.truncate(RECENT_RIDES_LIMIT);

        Ok(rides)
    }

    #[tracing::instrument(skip(self))]
    async fn set_driver_verification(
        &self,
        user: User,
        driver_id: Uuid,
        verified: bool,
    ) -> Result<Profile, Error> {
        self.authorize(user, "administer", Platform::default())?;

        let profile = self.store.profiles.transaction(|profiles| {
            let mut profile = fetch_profile_for_update(profiles, &driver_id)?;

            if !profile.is_driver() {
                return Err(ConflictableTransactionError::Abort(validation_error()));
            }

            profile.is_verified = verified;

            update_profile(profiles, &profile)?;

            Ok(profile)
        })?;

        tracing::info!(
            "driver {} verification set to {}",
            &driver_id,
            verified
        );

        Ok(profile)
    }

    // partial merge only; fields absent from the patch keep their value
    #[tracing::instrument(skip(self))]
    async fn update_fare_config(
        &self,
        user: User,
        patch: FareConfigPatch,
    ) -> Result<FareConfig, Error> {
        self.authorize(user, "administer", Platform::default())?;

        let mut config = self.fare_config().await?;
        config.merge(patch);

        self.store
            .config
            .insert(FARE_CONFIG_KEY, encode(&config)?)?;

        Ok(config)
    }
}
