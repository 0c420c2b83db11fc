use serde::{Deserialize, Serialize};

// the triple handed over by the identity provider after sign-in; the core
// never authenticates anyone itself
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Identity {
    pub external_id: String,
    pub display_name: String,
    pub email: String,
    pub photo_url: Option<String>,
}
