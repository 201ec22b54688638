//! Typed request builder for the analysis service.
//!
//! Every backend capability is an [`Endpoint`] variant. Building one checks
//! that all required identifiers are present and then interpolates them into
//! the path and query verbatim; no escaping happens here beyond what URL
//! parsing does later.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("missing required argument `{0}`")]
    Missing(&'static str),
    #[error("unknown upload destination `{0}` (expected raw-files or result-files)")]
    UnknownDestination(String),
}

/// Canonical (species, plant id) key used by every plant endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlantKey {
    species: String,
    plant_id: String,
}

impl PlantKey {
    pub fn new(
        species: impl Into<String>,
        plant_id: impl Into<String>,
    ) -> Result<Self, ArgumentError> {
        let species = require("species", species.into())?;
        let plant_id = require("plant_id", plant_id.into())?;
        Ok(Self { species, plant_id })
    }

    pub fn species(&self) -> &str {
        &self.species
    }

    pub fn plant_id(&self) -> &str {
        &self.plant_id
    }
}

impl fmt::Display for PlantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.species, self.plant_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// Server-side bucket an upload batch is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadDestination {
    #[default]
    RawFiles,
    ResultFiles,
}

impl UploadDestination {
    pub fn as_segment(self) -> &'static str {
        match self {
            UploadDestination::RawFiles => "raw-files",
            UploadDestination::ResultFiles => "result-files",
        }
    }
}

impl fmt::Display for UploadDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_segment())
    }
}

impl FromStr for UploadDestination {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw-files" => Ok(UploadDestination::RawFiles),
            "result-files" => Ok(UploadDestination::ResultFiles),
            other => Err(ArgumentError::UnknownDestination(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint<'a> {
    AnalyzePlant {
        key: &'a PlantKey,
        date: &'a str,
    },
    PlantResults {
        key: &'a PlantKey,
        date: &'a str,
    },
    PlantTimeline {
        key: &'a PlantKey,
    },
    VegetationTimeline {
        key: &'a PlantKey,
        index_type: &'a str,
    },
    TextureTimeline {
        key: &'a PlantKey,
        band_name: &'a str,
        texture_type: &'a str,
    },
    DatabaseData {
        key: &'a PlantKey,
        date: &'a str,
    },
    TaskStatus {
        task_id: &'a str,
    },
    PlantsBySpecies {
        species: &'a str,
    },
    Upload {
        destination: UploadDestination,
    },
    UploadStatus,
}

/// A validated request: method plus the path and query relative to the API base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
}

impl ApiRequest {
    fn get(path: String) -> Self {
        Self {
            method: Method::Get,
            path,
            query: Vec::new(),
        }
    }

    fn post(path: String) -> Self {
        Self {
            method: Method::Post,
            ..Self::get(path)
        }
    }

    fn with_date(mut self, date: &str) -> Result<Self, ArgumentError> {
        check("date", date)?;
        self.query.push(("date", date.to_string()));
        Ok(self)
    }

    /// Path followed by `?k=v&...`, with values inserted as given.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }

    /// Joins onto an API base such as `http://host:8000/api`.
    pub fn url_on(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path_and_query())
    }
}

impl Endpoint<'_> {
    pub fn build(&self) -> Result<ApiRequest, ArgumentError> {
        match self {
            Endpoint::AnalyzePlant { key, date } => {
                ApiRequest::post(plant_path("analyze-plant", key)).with_date(date)
            }
            Endpoint::PlantResults { key, date } => {
                ApiRequest::get(plant_path("plant-results", key)).with_date(date)
            }
            Endpoint::PlantTimeline { key } => Ok(ApiRequest::get(plant_path("plant-timeline", key))),
            Endpoint::VegetationTimeline { key, index_type } => {
                check("index_type", index_type)?;
                Ok(ApiRequest::get(format!(
                    "{}/vegetation/{index_type}",
                    plant_path("plant-timeline", key)
                )))
            }
            Endpoint::TextureTimeline {
                key,
                band_name,
                texture_type,
            } => {
                check("band_name", band_name)?;
                check("texture_type", texture_type)?;
                Ok(ApiRequest::get(format!(
                    "{}/texture/{band_name}/{texture_type}",
                    plant_path("plant-timeline", key)
                )))
            }
            Endpoint::DatabaseData { key, date } => {
                ApiRequest::get(plant_path("plant-database-data", key)).with_date(date)
            }
            Endpoint::TaskStatus { task_id } => {
                check("task_id", task_id)?;
                Ok(ApiRequest::get(format!("/task-status/{task_id}")))
            }
            Endpoint::PlantsBySpecies { species } => {
                check("species", species)?;
                Ok(ApiRequest::get(format!("/plants/{species}")))
            }
            Endpoint::Upload { destination } => {
                Ok(ApiRequest::post(format!("/upload/{destination}")))
            }
            Endpoint::UploadStatus => Ok(ApiRequest::get("/upload/status".to_string())),
        }
    }
}

fn plant_path(prefix: &str, key: &PlantKey) -> String {
    format!("/{prefix}/{}/{}", key.species(), key.plant_id())
}

fn check(name: &'static str, value: &str) -> Result<(), ArgumentError> {
    if value.trim().is_empty() {
        Err(ArgumentError::Missing(name))
    } else {
        Ok(())
    }
}

fn require(name: &'static str, value: String) -> Result<String, ArgumentError> {
    check(name, &value)?;
    Ok(value)
}
