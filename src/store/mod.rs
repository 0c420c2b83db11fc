mod watch;

pub use watch::Subscription;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::{Db, Tree};
use std::path::Path;
use uuid::Uuid;

use crate::error::Error;

// Documents are serde_json-encoded values keyed by uuid bytes; child documents
// (bids, messages) are keyed by parent uuid + big-endian sequence number so
// that a prefix scan yields them in insertion order.
pub struct Store {
    db: Db,
    pub(crate) profiles: Tree,
    pub(crate) identities: Tree,
    pub(crate) rides: Tree,
    pub(crate) active_rides: Tree,
    pub(crate) bids: Tree,
    pub(crate) ratings: Tree,
    pub(crate) messages: Tree,
    pub(crate) config: Tree,
}

impl Store {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::from_db(sled::open(path)?)
    }

    // private in-memory database, used by tests
    pub fn temporary() -> Result<Self, Error> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: Db) -> Result<Self, Error> {
        Ok(Self {
            profiles: db.open_tree("profiles")?,
            identities: db.open_tree("identities")?,
            rides: db.open_tree("rides")?,
            active_rides: db.open_tree("active_rides")?,
            bids: db.open_tree("bids")?,
            ratings: db.open_tree("ratings")?,
            messages: db.open_tree("messages")?,
            config: db.open_tree("config")?,
            db,
        })
    }

    // server-assigned, monotonic across the whole database
    pub fn next_seq(&self) -> Result<u64, Error> {
        Ok(self.db.generate_id()?)
    }
}

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, Error> {
    Ok(serde_json::to_vec(value)?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn doc_key(id: &Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

pub fn child_key(parent: &Uuid, seq: u64) -> Vec<u8> {
    let mut key = parent.as_bytes().to_vec();
    key.extend_from_slice(&seq.to_be_bytes());
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_monotonic() {
        let store = Store::temporary().unwrap();

        let a = store.next_seq().unwrap();
        let b = store.next_seq().unwrap();
        let c = store.next_seq().unwrap();

        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn child_keys_sort_by_seq_under_one_parent() {
        let parent = Uuid::new_v4();

        let first = child_key(&parent, 1);
        let later = child_key(&parent, 256);

        assert!(first < later);
        assert!(first.starts_with(parent.as_bytes()));
    }
}
