use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

use crate::config::FdcConfig;
use crate::error::ApiError;
use crate::nutrition::scale;
use crate::nutrition::types::{FoodDetail, FoodRecord, SearchResponse};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Client for the external food-database provider. One instance is shared
/// across requests; reqwest pools connections internally.
pub struct FdcClient {
    http: Client,
    config: FdcConfig,
}

impl FdcClient {
    pub fn new(config: FdcConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { http, config }
    }

    fn api_key(&self) -> Result<&str, ApiError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(ApiError::Configuration("Missing FDC_API_KEY in environment"))
    }

    /// Free-text search restricted to the top-ranked match, then resolved
    /// through the detail endpoint. No disambiguation is offered.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        serving_size: Option<f64>,
        unit: Option<&str>,
    ) -> Result<FoodRecord, ApiError> {
        let api_key = self.api_key()?;
        let url = format!("{}/foods/search", self.config.base_url);
        let res = self
            .http
            .get(&url)
            .query(&[("api_key", api_key), ("query", query), ("pageSize", "1")])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(map_provider_status(status, false));
        }

        let body: SearchResponse = res.json().await?;
        let Some(first) = body.foods.first() else {
            return Err(ApiError::NotFound("No foods found"));
        };
        debug!(fdc_id = first.fdc_id, "search hit");

        self.fetch_by_id(&first.fdc_id.to_string(), serving_size, unit)
            .await
    }

    #[instrument(skip(self))]
    pub async fn fetch_by_id(
        &self,
        fdc_id: &str,
        serving_size: Option<f64>,
        unit: Option<&str>,
    ) -> Result<FoodRecord, ApiError> {
        let api_key = self.api_key()?;
        let url = format!("{}/food/{}", self.config.base_url, fdc_id);
        let res = self
            .http
            .get(&url)
            .query(&[("api_key", api_key)])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(map_provider_status(status, true));
        }

        let detail: FoodDetail = res.json().await?;
        Ok(scale::normalize(&detail, serving_size, unit))
    }
}

fn map_provider_status(status: StatusCode, detail_fetch: bool) -> ApiError {
    match status {
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
            ApiError::UpstreamAuth("Nutrition provider rejected the API key or rate-limited us")
        }
        StatusCode::NOT_FOUND if detail_fetch => ApiError::NotFound("Food not found"),
        _ => ApiError::Upstream(status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        let client = FdcClient::new(FdcConfig {
            api_key: None,
            base_url: "http://localhost:9".into(),
        });
        assert!(matches!(
            client.api_key(),
            Err(ApiError::Configuration(_))
        ));
    }

    #[test]
    fn provider_auth_rejection_maps_to_upstream_auth() {
        assert!(matches!(
            map_provider_status(StatusCode::FORBIDDEN, false),
            ApiError::UpstreamAuth(_)
        ));
        assert!(matches!(
            map_provider_status(StatusCode::TOO_MANY_REQUESTS, true),
            ApiError::UpstreamAuth(_)
        ));
    }

    #[test]
    fn detail_404_is_not_found_but_search_404_is_upstream() {
        assert!(matches!(
            map_provider_status(StatusCode::NOT_FOUND, true),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            map_provider_status(StatusCode::NOT_FOUND, false),
            ApiError::Upstream(404)
        ));
    }

    #[test]
    fn other_failures_carry_the_provider_status() {
        assert!(matches!(
            map_provider_status(StatusCode::INTERNAL_SERVER_ERROR, false),
            ApiError::Upstream(500)
        ));
    }
}
