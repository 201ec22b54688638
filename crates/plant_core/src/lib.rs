//! Plant core: pure request building, route table, and upload session model.
mod effect;
mod msg;
mod request;
pub mod routes;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use request::{ApiRequest, ArgumentError, Endpoint, Method, PlantKey, UploadDestination};
pub use routes::{resolve, ResolvedRoute, RouteEntry, RouteMatch, View, ViewProps, ROUTES};
pub use state::{SessionState, UploadPhase, DEFAULT_MAX_POLLS};
pub use update::{update, NO_FILES_SELECTED, STATUS_NOT_SETTLED};
pub use view_model::UploadViewModel;
