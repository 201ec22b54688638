//! Plant client: HTTP access to the plant analysis service.
mod client;
mod files;
mod models;
mod poller;
mod types;
mod upload;

pub use client::{ClientSettings, PlantClient};
pub use files::{collect_directory, FileEntry};
pub use models::{
    AnalysisTicket, DatabaseData, IndexRow, PlantSummary, PlantTimeline, SpeciesPlants,
    SummaryStats, TaskStatus, TextureRow, TextureSample, TextureTimeline, TimelinePoint,
    VegetationSample, VegetationTimeline,
};
pub use poller::{run_upload_session, PollPolicy, SessionOutcome, UploadService};
pub use types::{ClientError, FailureKind, UPLOAD_FAILED, UPLOAD_STATUS_FAILED};
pub use upload::{build_form, detail_message, FileOutcome, UploadReport, FILES_FIELD};
