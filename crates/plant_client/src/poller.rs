use std::collections::VecDeque;
use std::time::Duration;

use plant_core::{
    update, Effect, Msg, SessionState, UploadDestination, UploadPhase, DEFAULT_MAX_POLLS,
};
use plant_logging::{plant_debug, plant_info, plant_warn};
use serde_json::Value;

use crate::{ClientError, FileEntry, PlantClient, UploadReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay before every status read after the first.
    pub interval: Duration,
    pub max_polls: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_polls: DEFAULT_MAX_POLLS,
        }
    }
}

#[async_trait::async_trait]
pub trait UploadService: Send + Sync {
    async fn submit(
        &self,
        files: Vec<FileEntry>,
        destination: UploadDestination,
    ) -> Result<UploadReport, ClientError>;

    async fn status(&self) -> Result<Value, ClientError>;
}

#[async_trait::async_trait]
impl UploadService for PlantClient {
    async fn submit(
        &self,
        files: Vec<FileEntry>,
        destination: UploadDestination,
    ) -> Result<UploadReport, ClientError> {
        self.upload_files(files, destination).await
    }

    async fn status(&self) -> Result<Value, ClientError> {
        self.get_upload_status().await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub state: SessionState,
    pub report: Option<UploadReport>,
}

/// Uploads `files` and polls status until it settles, fails, or polls run out.
///
/// Runs the effects of the pure session model one at a time; nothing is
/// spawned. Dropping the future abandons the session.
pub async fn run_upload_session(
    service: &dyn UploadService,
    files: Vec<FileEntry>,
    destination: UploadDestination,
    policy: &PollPolicy,
) -> SessionOutcome {
    let file_count = files.len();
    let mut pending = Some(files);
    let mut report = None;

    let (mut state, effects) = update(
        SessionState::new(policy.max_polls),
        Msg::UploadRequested { files: file_count },
    );
    let mut queue: VecDeque<Effect> = effects.into();

    while let Some(effect) = queue.pop_front() {
        let msg = match effect {
            Effect::SubmitUpload => {
                let files = pending.take().unwrap_or_default();
                match service.submit(files, destination).await {
                    Ok(accepted) => {
                        let files = accepted.files.len();
                        plant_info!("Upload accepted: {} file(s)", files);
                        report = Some(accepted);
                        Msg::UploadAccepted { files }
                    }
                    Err(err) => Msg::UploadRejected {
                        message: err.message,
                    },
                }
            }
            Effect::PollStatus { attempt } => {
                if attempt > 1 {
                    tokio::time::sleep(policy.interval).await;
                }
                plant_debug!("Polling upload status, attempt {}", attempt);
                match service.status().await {
                    Ok(snapshot) => Msg::StatusReported { snapshot },
                    Err(err) => Msg::StatusFailed {
                        message: err.message,
                    },
                }
            }
        };

        let (next, effects) = update(state, msg);
        state = next;
        queue.extend(effects);
    }

    if let UploadPhase::Failed { message } = state.phase() {
        plant_warn!("Upload session failed: {}", message);
    }
    SessionOutcome { state, report }
}
