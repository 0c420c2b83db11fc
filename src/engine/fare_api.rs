use super::{Engine, FARE_CONFIG_KEY};

use async_trait::async_trait;

use crate::{
    api::FareAPI,
    entities::{FareConfig, FareEstimate},
    error::{unexpected_error, validation_error, Error},
    external::routes,
    store::decode,
};

#[async_trait]
impl FareAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn fare_config(&self) -> Result<FareConfig, Error> {
        // seeded at engine construction, so absence is a fault
        let bytes = self
            .store
            .config
            .get(FARE_CONFIG_KEY)?
            .ok_or_else(unexpected_error)?;

        decode(&bytes)
    }

    // a silent oracle degrades to no estimate, never to a failure
    #[tracing::instrument(skip(self))]
    async fn estimate_fare(
        &self,
        origin: String,
        destination: String,
    ) -> Result<Option<FareEstimate>, Error> {
        if origin.trim().is_empty() || destination.trim().is_empty() {
            return Err(validation_error());
        }

        let route = match routes::estimate_route(origin, destination).await? {
            Some(route) => route,
            None => return Ok(None),
        };

        let config = self.fare_config().await?;

        Ok(Some(FareEstimate {
            distance_km: route.distance_km,
            duration_minutes: route.duration_minutes,
            amount: config.estimate(route.distance_km, route.duration_minutes),
        }))
    }
}
