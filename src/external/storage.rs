use std::env;

use crate::error::{upstream_error, Error};

// blob store for driver documents; the core only ever sees the returned URL
#[tracing::instrument(skip(bytes))]
pub async fn upload(bytes: Vec<u8>, path: String) -> Result<String, Error> {
    let api_base = env::var("BLOB_STORE_API_BASE")?;
    let url = format!("https://{}/{}", api_base, path);

    let res = reqwest::Client::new()
        .put(&url)
        .body(bytes)
        .send()
        .await?;

    if res.status().as_u16() >= 400 {
        return Err(upstream_error());
    }

    Ok(url)
}
