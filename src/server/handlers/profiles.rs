use axum::body::Bytes;
use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::ProfileAPI;
use crate::auth::User;
use crate::entities::{CarDetails, Profile, Role};
use crate::error::Error;
use crate::external::identity::Identity;
use crate::external::storage;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct ProvisionParams {
    #[serde(flatten)]
    identity: Identity,
    role: Role,
}

#[derive(Serialize, Deserialize)]
pub struct AvailabilityParams {
    available: bool,
}

pub async fn provision(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<ProvisionParams>,
) -> Result<Json<Profile>, Error> {
    let profile = api.provision_profile(params.identity, params.role).await?;

    Ok(profile.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<Profile>, Error> {
    let profile = api.find_profile(id).await?;

    Ok(profile.into())
}

pub async fn update_car(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
    Json(car): Json<CarDetails>,
) -> Result<Json<Profile>, Error> {
    let profile = api.update_car_details(user, id, car).await?;

    Ok(profile.into())
}

// the document lands in blob storage, only its URL reaches the profile
pub async fn upload_license(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<Profile>, Error> {
    let url = storage::upload(body.to_vec(), format!("licenses/{}", id)).await?;

    let profile = api.attach_license(user, id, url).await?;

    Ok(profile.into())
}

pub async fn set_availability(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
    Json(params): Json<AvailabilityParams>,
) -> Result<Json<Profile>, Error> {
    let profile = api.set_availability(user, id, params.available).await?;

    Ok(profile.into())
}
