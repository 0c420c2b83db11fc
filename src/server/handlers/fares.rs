use axum::extract::{Extension, Json, Query};
use serde::{Deserialize, Serialize};

use crate::api::FareAPI;
use crate::entities::{FareConfig, FareEstimate};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct EstimateParams {
    origin: String,
    destination: String,
}

pub async fn config(Extension(api): Extension<DynAPI>) -> Result<Json<FareConfig>, Error> {
    let config = api.fare_config().await?;

    Ok(config.into())
}

pub async fn estimate(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<EstimateParams>,
) -> Result<Json<Option<FareEstimate>>, Error> {
    let estimate = api.estimate_fare(params.origin, params.destination).await?;

    Ok(estimate.into())
}
