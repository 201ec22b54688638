use std::time::Duration;

use plant_core::{ApiRequest, Endpoint, Method, PlantKey};
use plant_logging::{plant_debug, plant_warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::map_reqwest_error;
use crate::{
    AnalysisTicket, ClientError, DatabaseData, FailureKind, PlantTimeline, SpeciesPlants,
    TaskStatus, TextureTimeline, VegetationTimeline,
};

/// Connection settings for [`PlantClient`].
///
/// Timeouts are `None` by default, which leaves the transport defaults in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Origin plus API prefix, e.g. `http://localhost:8000/api`.
    pub base_url: String,
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
}

impl ClientSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: None,
            request_timeout: None,
        }
    }
}

/// Stateless client for the plant analysis service.
///
/// Each call issues exactly one request. Nothing is retried or cached, and
/// concurrent calls share nothing but the connection pool.
#[derive(Debug, Clone)]
pub struct PlantClient {
    http: reqwest::Client,
    settings: ClientSettings,
}

impl PlantClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        reqwest::Url::parse(&settings.base_url)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub async fn analyze_plant(
        &self,
        key: &PlantKey,
        date: &str,
    ) -> Result<AnalysisTicket, ClientError> {
        self.fetch_json(Endpoint::AnalyzePlant { key, date }).await
    }

    /// Result payload keys depend on which artifacts the analysis produced.
    pub async fn get_plant_results(&self, key: &PlantKey, date: &str) -> Result<Value, ClientError> {
        self.fetch_json(Endpoint::PlantResults { key, date }).await
    }

    pub async fn get_plant_timeline(&self, key: &PlantKey) -> Result<PlantTimeline, ClientError> {
        self.fetch_json(Endpoint::PlantTimeline { key }).await
    }

    pub async fn get_vegetation_timeline(
        &self,
        key: &PlantKey,
        index_type: &str,
    ) -> Result<VegetationTimeline, ClientError> {
        self.fetch_json(Endpoint::VegetationTimeline { key, index_type })
            .await
    }

    pub async fn get_texture_timeline(
        &self,
        key: &PlantKey,
        band_name: &str,
        texture_type: &str,
    ) -> Result<TextureTimeline, ClientError> {
        self.fetch_json(Endpoint::TextureTimeline {
            key,
            band_name,
            texture_type,
        })
        .await
    }

    pub async fn get_database_data(
        &self,
        key: &PlantKey,
        date: &str,
    ) -> Result<DatabaseData, ClientError> {
        self.fetch_json(Endpoint::DatabaseData { key, date }).await
    }

    pub async fn get_task_status(&self, task_id: &str) -> Result<TaskStatus, ClientError> {
        self.fetch_json(Endpoint::TaskStatus { task_id }).await
    }

    pub async fn get_plants_by_species(&self, species: &str) -> Result<SpeciesPlants, ClientError> {
        self.fetch_json(Endpoint::PlantsBySpecies { species }).await
    }

    pub(crate) fn request_builder(
        &self,
        request: &ApiRequest,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let url = request.url_on(&self.settings.base_url);
        let parsed = reqwest::Url::parse(&url)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;
        plant_debug!("{} {}", request.method, parsed);
        Ok(match request.method {
            Method::Get => self.http.get(parsed),
            Method::Post => self.http.post(parsed),
        })
    }

    async fn fetch_json<T: DeserializeOwned>(&self, endpoint: Endpoint<'_>) -> Result<T, ClientError> {
        let request = endpoint.build()?;
        let result = self.send_for_json(&request).await;
        if let Err(err) = &result {
            plant_warn!(
                "{} {} failed ({}): {}",
                request.method,
                request.path_and_query(),
                err.kind,
                err.message
            );
        }
        result
    }

    async fn send_for_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ClientError> {
        let response = self
            .request_builder(request)?
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("request failed with status {status}"),
            ));
        }

        response.json::<T>().await.map_err(map_reqwest_error)
    }
}
