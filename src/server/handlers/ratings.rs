use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::RatingAPI;
use crate::auth::User;
use crate::entities::{Rating, Ride};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    request_id: Uuid,
    rating: u8,
    review: Option<String>,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    user: User,
    Json(params): Json<CreateParams>,
) -> Result<Json<Rating>, Error> {
    let rating = api
        .submit_rating(user, params.request_id, params.rating, params.review)
        .await?;

    Ok(rating.into())
}

pub async fn pending(
    Extension(api): Extension<DynAPI>,
    user: User,
) -> Result<Json<Option<Ride>>, Error> {
    let ride = api.pending_rating(user).await?;

    Ok(ride.into())
}
