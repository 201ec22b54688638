//! Response bodies of the analysis service.
//!
//! Every field defaults when absent so older or partial payloads still decode.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisTicket {
    pub task_id: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskStatus {
    pub task_id: String,
    pub state: String,
    pub result: Option<Value>,
}

/// Distribution summary shared by timeline points and table rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryStats {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub q25: Option<f64>,
    pub q75: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelinePoint {
    pub date: String,
    #[serde(flatten)]
    pub stats: SummaryStats,
    pub image_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetationSample {
    pub date: String,
    pub index_type: String,
    #[serde(flatten)]
    pub stats: SummaryStats,
    pub image_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureSample {
    pub date: String,
    pub band_name: String,
    pub texture_type: String,
    #[serde(flatten)]
    pub stats: SummaryStats,
    pub image_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantTimeline {
    pub plant_id: String,
    pub species: String,
    pub available_dates: Vec<String>,
    pub available_vegetation_indices: Vec<String>,
    pub available_texture_features: Vec<String>,
    pub vegetation_timeline: Vec<VegetationSample>,
    pub texture_timeline: Vec<TextureSample>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetationTimeline {
    pub plant_id: String,
    pub index_type: String,
    pub timeline: Vec<TimelinePoint>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureTimeline {
    pub plant_id: String,
    pub band_name: String,
    pub texture_type: String,
    pub timeline: Vec<TimelinePoint>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexRow {
    pub index: String,
    #[serde(flatten)]
    pub stats: SummaryStats,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureRow {
    pub feature: String,
    pub band: String,
    pub texture_type: String,
    #[serde(flatten)]
    pub stats: SummaryStats,
}

/// Stored record for one plant on one date.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseData {
    pub images: BTreeMap<String, String>,
    pub texture_images: BTreeMap<String, Option<String>>,
    pub vegetation_indices_images: BTreeMap<String, Option<String>>,
    pub vegetation_indices_table: Vec<IndexRow>,
    pub texture_features_table: Vec<TextureRow>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantSummary {
    pub id: String,
    pub name: Option<String>,
    pub dates_captured: Value,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesPlants {
    pub species: String,
    pub plants: Vec<PlantSummary>,
}
