use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// append-only chat entry between a matched passenger and driver
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub request_id: Uuid,
    pub sender_id: Uuid,
    pub text: String,
    pub sent_at: DateTime<Utc>,
    pub seq: u64,
}

impl Message {
    pub fn new(request_id: Uuid, sender_id: Uuid, text: String, seq: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            request_id,
            sender_id,
            text,
            sent_at: Utc::now(),
            seq,
        }
    }
}
