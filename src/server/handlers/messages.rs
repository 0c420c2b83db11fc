use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::MessageAPI;
use crate::auth::User;
use crate::entities::Message;
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    text: String,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
    Json(params): Json<CreateParams>,
) -> Result<Json<Message>, Error> {
    let message = api.send_message(user, id, params.text).await?;

    Ok(message.into())
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Message>>, Error> {
    let messages = api.list_messages(id).await?;

    Ok(messages.into())
}
