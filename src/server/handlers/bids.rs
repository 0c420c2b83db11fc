use axum::extract::{Extension, Json, Path};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::BidAPI;
use crate::auth::User;
use crate::entities::{Bid, BidView, Coordinates};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    amount: i64,
    driver_location: Option<Coordinates>,
}

#[axum_macros::debug_handler]
pub async fn create(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
    Json(params): Json<CreateParams>,
) -> Result<Json<Bid>, Error> {
    let bid = api
        .submit_bid(user, id, params.amount, params.driver_location)
        .await?;

    Ok(bid.into())
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<BidView>>, Error> {
    let bids = api.list_bids(user, id).await?;

    Ok(bids.into())
}

// live bid feed, delivered as server-sent events until the client disconnects
pub async fn stream(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Error> {
    let subscription = api.watch_bids(user, id).await?;

    let stream = subscription.map(|bid| Event::default().json_data(&bid));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
