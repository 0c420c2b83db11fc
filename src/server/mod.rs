mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequest, RequestParts},
    routing::{get, patch, post},
    Router,
};
use uuid::Uuid;

use crate::server::handlers::{admin, bids, fares, messages, profiles, ratings, rides};
use crate::{
    api::{ProfileAPI, API},
    auth::User,
    error::{unauthorized_error, unexpected_error, Error},
};

type DynAPI = Arc<dyn API + Send + Sync>;

// the session context is rebuilt per request from the provisioned profile;
// callers identify themselves with the profile id handed out at provisioning
#[async_trait]
impl<B: Send> FromRequest<B> for User {
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let Extension(api): Extension<DynAPI> = Extension::from_request(req)
            .await
            .map_err(|_| unexpected_error())?;

        let id = req
            .headers()
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok())
            .ok_or_else(unauthorized_error)?;

        let profile = api.find_profile(id).await?;

        Ok(User::from(&profile))
    }
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T) {
    let api = Arc::new(api) as DynAPI;

    let app = Router::new()
        .route("/profiles", post(profiles::provision))
        .route("/profiles/:id", get(profiles::find))
        .route("/profiles/:id/car", patch(profiles::update_car))
        .route("/profiles/:id/license", post(profiles::upload_license))
        .route("/profiles/:id/availability", patch(profiles::set_availability))
        .route("/rides", post(rides::create))
        .route("/rides/available", get(rides::available))
        .route("/rides/active", get(rides::active))
        .route("/rides/history", get(rides::history))
        .route("/rides/:id", get(rides::find))
        .route("/rides/:id/cancel", patch(rides::cancel))
        .route("/rides/:id/accept", patch(rides::accept))
        .route("/rides/:id/complete", patch(rides::complete))
        .route("/rides/:id/bids", post(bids::create).get(bids::list))
        .route("/rides/:id/bids/stream", get(bids::stream))
        .route("/rides/:id/messages", post(messages::create).get(messages::list))
        .route("/ratings", post(ratings::create))
        .route("/ratings/pending", get(ratings::pending))
        .route("/fares/config", get(fares::config))
        .route("/fares/estimate", get(fares::estimate))
        .route("/admin/profiles", get(admin::list_profiles))
        .route("/admin/rides", get(admin::recent_rides))
        .route("/admin/drivers/:id/verification", patch(admin::set_verification))
        .route("/admin/fares/config", patch(admin::update_fare_config))
        .layer(Extension(api));

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
