use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::AdminAPI;
use crate::auth::User;
use crate::entities::{FareConfig, FareConfigPatch, Profile, Ride};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct VerificationParams {
    verified: bool,
}

pub async fn list_profiles(
    Extension(api): Extension<DynAPI>,
    user: User,
) -> Result<Json<Vec<Profile>>, Error> {
    let profiles = api.list_profiles(user).await?;

    Ok(profiles.into())
}

pub async fn recent_rides(
    Extension(api): Extension<DynAPI>,
    user: User,
) -> Result<Json<Vec<Ride>>, Error> {
    let rides = api.recent_rides(user).await?;

    Ok(rides.into())
}

pub async fn set_verification(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
    Json(params): Json<VerificationParams>,
) -> Result<Json<Profile>, Error> {
    let profile = api
        .set_driver_verification(user, id, params.verified)
        .await?;

    Ok(profile.into())
}

pub async fn update_fare_config(
    Extension(api): Extension<DynAPI>,
    user: User,
    Json(patch): Json<FareConfigPatch>,
) -> Result<Json<FareConfig>, Error> {
    let config = api.update_fare_config(user, patch).await?;

    Ok(config.into())
}
