use serde::{Deserialize, Serialize};
use std::env;

use crate::error::Error;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RouteEstimate {
    pub distance_km: f64,
    pub duration_minutes: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response {
    status: String,
    result: Option<RouteEstimate>,
}

// distance/duration oracle; an unreachable or unconfigured oracle degrades to
// no estimate rather than failing the caller
#[tracing::instrument]
pub async fn estimate_route(
    origin: String,
    destination: String,
) -> Result<Option<RouteEstimate>, Error> {
    let api_base = match env::var("ROUTE_ORACLE_API_BASE") {
        Ok(api_base) => api_base,
        Err(_) => {
            tracing::warn!("ROUTE_ORACLE_API_BASE is not set, skipping fare estimate");
            return Ok(None);
        }
    };

    let url = format!("https://{}/v1/routes/estimate", api_base);

    let res = reqwest::Client::new()
        .get(url)
        .query(&[("origin", origin)])
        .query(&[("destination", destination)])
        .send()
        .await;

    let res = match res {
        Ok(res) => res,
        Err(err) => {
            tracing::warn!("route oracle unreachable: {:?}", err);
            return Ok(None);
        }
    };

    if res.status().as_u16() != 200 {
        tracing::warn!("route oracle returned status {}", res.status());
        return Ok(None);
    }

    let data: Response = match res.json().await {
        Ok(data) => data,
        Err(err) => {
            tracing::warn!("route oracle payload undecodable: {:?}", err);
            return Ok(None);
        }
    };

    if data.status != "OK" {
        return Ok(None);
    }

    Ok(data.result)
}
