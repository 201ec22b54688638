use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use plant_client::{
    run_upload_session, ClientError, ClientSettings, FileEntry, FileOutcome, PlantClient,
    PollPolicy, UploadReport, UploadService,
};
use plant_core::{UploadDestination, UploadPhase, NO_FILES_SELECTED};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct ScriptedService {
    upload: Mutex<Option<Result<UploadReport, ClientError>>>,
    statuses: Mutex<VecDeque<Result<Value, ClientError>>>,
    submitted: Mutex<Vec<(usize, UploadDestination)>>,
}

impl ScriptedService {
    fn new(
        upload: Result<UploadReport, ClientError>,
        statuses: Vec<Result<Value, ClientError>>,
    ) -> Self {
        Self {
            upload: Mutex::new(Some(upload)),
            statuses: Mutex::new(statuses.into()),
            submitted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl UploadService for ScriptedService {
    async fn submit(
        &self,
        files: Vec<FileEntry>,
        destination: UploadDestination,
    ) -> Result<UploadReport, ClientError> {
        self.submitted
            .lock()
            .unwrap()
            .push((files.len(), destination));
        self.upload.lock().unwrap().take().expect("single submit")
    }

    async fn status(&self) -> Result<Value, ClientError> {
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted status")
    }
}

fn fast_policy(max_polls: u32) -> PollPolicy {
    PollPolicy {
        interval: Duration::ZERO,
        max_polls,
    }
}

fn report() -> UploadReport {
    UploadReport {
        response: json!({"total_files": 1}),
        files: vec![FileOutcome {
            name: "a.tif".to_string(),
            bytes: 1,
        }],
    }
}

fn files() -> Vec<FileEntry> {
    vec![FileEntry::from_bytes("a.tif", vec![1])]
}

#[tokio::test]
async fn session_completes_when_status_settles() {
    plant_logging::initialize_for_tests();
    let service = ScriptedService::new(
        Ok(report()),
        vec![Ok(json!({"n": 1})), Ok(json!({"n": 2})), Ok(json!({"n": 2}))],
    );

    let outcome = run_upload_session(
        &service,
        files(),
        UploadDestination::ResultFiles,
        &fast_policy(10),
    )
    .await;

    assert_eq!(*outcome.state.phase(), UploadPhase::Done);
    assert_eq!(outcome.report, Some(report()));
    assert_eq!(outcome.state.last_status(), Some(&json!({"n": 2})));
    assert_eq!(
        *service.submitted.lock().unwrap(),
        vec![(1, UploadDestination::ResultFiles)]
    );
    assert!(service.statuses.lock().unwrap().is_empty());
}

#[tokio::test]
async fn rejected_upload_never_polls() {
    let err = PlantClient::new(ClientSettings::new("http://127.0.0.1:1/api"))
        .unwrap()
        .upload_files(Vec::new(), UploadDestination::RawFiles)
        .await
        .unwrap_err();
    let service = ScriptedService::new(Err(err), Vec::new());

    let outcome = run_upload_session(
        &service,
        files(),
        UploadDestination::RawFiles,
        &fast_policy(10),
    )
    .await;

    assert_eq!(
        *outcome.state.phase(),
        UploadPhase::Failed {
            message: "no files selected for upload".to_string()
        }
    );
    assert_eq!(outcome.report, None);
}

#[tokio::test]
async fn empty_batch_fails_without_contacting_the_server() {
    let service = ScriptedService::new(Ok(report()), Vec::new());

    let outcome = run_upload_session(
        &service,
        Vec::new(),
        UploadDestination::RawFiles,
        &fast_policy(10),
    )
    .await;

    assert_eq!(
        *outcome.state.phase(),
        UploadPhase::Failed {
            message: NO_FILES_SELECTED.to_string()
        }
    );
    assert_eq!(outcome.report, None);
    assert!(service.submitted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn status_error_fails_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload/raw-files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_files": 1})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/upload/status"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let client = PlantClient::new(ClientSettings::new(format!("{}/api", server.uri()))).unwrap();

    let outcome = run_upload_session(
        &client,
        files(),
        UploadDestination::RawFiles,
        &fast_policy(10),
    )
    .await;

    assert_eq!(
        *outcome.state.phase(),
        UploadPhase::Failed {
            message: "Failed to fetch upload status".to_string()
        }
    );
    assert!(outcome.report.is_some());
}

#[tokio::test]
async fn unsettled_status_exhausts_polls() {
    let service = ScriptedService::new(
        Ok(report()),
        vec![Ok(json!(1)), Ok(json!(2)), Ok(json!(3))],
    );

    let outcome = run_upload_session(
        &service,
        files(),
        UploadDestination::RawFiles,
        &fast_policy(3),
    )
    .await;

    assert_eq!(
        *outcome.state.phase(),
        UploadPhase::Failed {
            message: plant_core::STATUS_NOT_SETTLED.to_string()
        }
    );
}
