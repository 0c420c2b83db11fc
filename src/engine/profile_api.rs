use super::helpers::{fetch_profile_for_update, load_profile, update_profile};
use super::Engine;

use async_trait::async_trait;
use sled::transaction::ConflictableTransactionError;
use sled::Transactional;
use std::env;
use uuid::Uuid;

use crate::{
    api::ProfileAPI,
    auth::User,
    entities::{CarDetails, Profile, Role},
    error::{database_error, unauthorized_error, validation_error, Error},
    external::identity::Identity,
    store::{doc_key, encode},
};

#[async_trait]
impl ProfileAPI for Engine {
    // upsert keyed by the identity provider's external id; the first sign-in
    // fixes the role, later sign-ins only refresh identity fields
    #[tracing::instrument(skip(self))]
    async fn provision_profile(&self, identity: Identity, role: Role) -> Result<Profile, Error> {
        if identity.external_id.trim().is_empty() || identity.email.trim().is_empty() {
            return Err(validation_error());
        }

        // the admin role is only ever granted to the configured credential
        if role == Role::Admin && !is_admin_credential(&identity.email) {
            return Err(unauthorized_error());
        }

        let identity_key = identity.external_id.as_bytes().to_vec();
        let fresh = Profile::new(identity.clone(), role);
        let fresh_bytes = encode(&fresh)?;

        let profile = (&self.store.identities, &self.store.profiles).transaction(
            |(identities, profiles)| {
                match identities.get(identity_key.as_slice())? {
                    Some(id_bytes) => {
                        let id = Uuid::from_slice(&id_bytes).map_err(|err| {
                            ConflictableTransactionError::Abort(database_error(err))
                        })?;

                        let mut profile = fetch_profile_for_update(profiles, &id)?;
                        profile.refresh_identity(identity.clone());

                        update_profile(profiles, &profile)?;

                        Ok(profile)
                    }
                    None => {
                        identities
                            .insert(identity_key.as_slice(), doc_key(&fresh.id))?;
                        profiles.insert(doc_key(&fresh.id), fresh_bytes.as_slice())?;

                        Ok(fresh.clone())
                    }
                }
            },
        )?;

        tracing::info!("provisioned profile {} as {:?}", &profile.id, &profile.role);

        Ok(profile)
    }

    #[tracing::instrument(skip(self))]
    async fn find_profile(&self, id: Uuid) -> Result<Profile, Error> {
        load_profile(&self.store, &id)
    }

    #[tracing::instrument(skip(self))]
    async fn update_car_details(
        &self,
        user: User,
        id: Uuid,
        car: CarDetails,
    ) -> Result<Profile, Error> {
        self.mutate_own_driver_profile(user, id, |profile| {
            profile.car_details = Some(car.clone());
        })
    }

    #[tracing::instrument(skip(self))]
    async fn attach_license(&self, user: User, id: Uuid, url: String) -> Result<Profile, Error> {
        self.mutate_own_driver_profile(user, id, |profile| {
            profile.license_url = Some(url.clone());
        })
    }

    #[tracing::instrument(skip(self))]
    async fn set_availability(
        &self,
        user: User,
        id: Uuid,
        available: bool,
    ) -> Result<Profile, Error> {
        self.mutate_own_driver_profile(user, id, |profile| {
            profile.is_available = Some(available);
        })
    }
}

impl Engine {
    fn mutate_own_driver_profile<F>(&self, user: User, id: Uuid, apply: F) -> Result<Profile, Error>
    where
        F: Fn(&mut Profile),
    {
        if user.id != id {
            return Err(unauthorized_error());
        }

        let profile = self.store.profiles.transaction(|profiles| {
            let mut profile = fetch_profile_for_update(profiles, &id)?;

            if !profile.is_driver() {
                return Err(ConflictableTransactionError::Abort(validation_error()));
            }

            apply(&mut profile);
            update_profile(profiles, &profile)?;

            Ok(profile)
        })?;

        Ok(profile)
    }
}

fn is_admin_credential(email: &str) -> bool {
    match env::var("ADMIN_EMAIL") {
        Ok(admin_email) => admin_email.eq_ignore_ascii_case(email),
        Err(_) => false,
    }
}
