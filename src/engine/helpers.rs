use sled::transaction::{ConflictableTransactionError, TransactionalTree};
use uuid::Uuid;

use crate::{
    entities::{Profile, Ride},
    error::{not_found_error, Error},
    store::{decode, doc_key, encode, Store},
};

// plain reads outside a transaction

pub fn load_ride(store: &Store, id: &Uuid) -> Result<Ride, Error> {
    let bytes = store.rides.get(doc_key(id))?.ok_or_else(not_found_error)?;

    decode(&bytes)
}

pub fn load_profile(store: &Store, id: &Uuid) -> Result<Profile, Error> {
    let bytes = store
        .profiles
        .get(doc_key(id))?
        .ok_or_else(not_found_error)?;

    decode(&bytes)
}

// transactional reads and writes; every read inside a transaction is a read
// for update, conflicting writers are retried by the store

pub fn fetch_ride_for_update(
    rides: &TransactionalTree,
    id: &Uuid,
) -> Result<Ride, ConflictableTransactionError<Error>> {
    let bytes = rides
        .get(doc_key(id))?
        .ok_or(ConflictableTransactionError::Abort(not_found_error()))?;

    decode(&bytes).map_err(ConflictableTransactionError::Abort)
}

pub fn fetch_profile_for_update(
    profiles: &TransactionalTree,
    id: &Uuid,
) -> Result<Profile, ConflictableTransactionError<Error>> {
    let bytes = profiles
        .get(doc_key(id))?
        .ok_or(ConflictableTransactionError::Abort(not_found_error()))?;

    decode(&bytes).map_err(ConflictableTransactionError::Abort)
}

pub fn update_ride(
    rides: &TransactionalTree,
    ride: &Ride,
) -> Result<(), ConflictableTransactionError<Error>> {
    let bytes = encode(ride).map_err(ConflictableTransactionError::Abort)?;
    rides.insert(doc_key(&ride.id), bytes)?;

    Ok(())
}

pub fn update_profile(
    profiles: &TransactionalTree,
    profile: &Profile,
) -> Result<(), ConflictableTransactionError<Error>> {
    let bytes = encode(profile).map_err(ConflictableTransactionError::Abort)?;
    profiles.insert(doc_key(&profile.id), bytes)?;

    Ok(())
}
