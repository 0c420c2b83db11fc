mod admin_api;
mod bid_api;
mod fare_api;
mod helpers;
mod message_api;
mod profile_api;
mod rating_api;
mod ride_api;

use oso::Oso;

use crate::{
    api::API,
    auth::authorizor,
    entities::FareConfig,
    error::{unauthorized_error, Error},
    store::{encode, Store},
};

pub const FARE_CONFIG_KEY: &[u8] = b"fare";

pub struct Engine {
    store: Store,
    authorizor: Oso,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(store: Store) -> Result<Self, Error> {
        // seed the fare policy singleton so estimates work out of the box
        if store.config.get(FARE_CONFIG_KEY)?.is_none() {
            store
                .config
                .insert(FARE_CONFIG_KEY, encode(&FareConfig::default())?)?;
        }

        Ok(Self {
            store,
            authorizor: authorizor::new(),
        })
    }
}

impl Engine {
    pub fn authorize<Actor, Action, Resource>(
        &self,
        actor: Actor,
        action: Action,
        resource: Resource,
    ) -> Result<(), Error>
    where
        Actor: oso::ToPolar,
        Action: oso::ToPolar,
        Resource: oso::ToPolar,
    {
        if self.authorizor.is_allowed(actor, action, resource)? {
            return Ok(());
        }

        Err(unauthorized_error())
    }
}

impl API for Engine {}
