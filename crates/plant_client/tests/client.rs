use std::time::Duration;

use plant_client::{ClientSettings, FailureKind, PlantClient, TimelinePoint};
use plant_core::PlantKey;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> PlantClient {
    plant_logging::initialize_for_tests();
    PlantClient::new(ClientSettings::new(format!("{}/api", server.uri()))).expect("client")
}

fn key() -> PlantKey {
    PlantKey::new("Sorghum", "P1").unwrap()
}

#[tokio::test]
async fn analyze_plant_posts_once_and_returns_ticket() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze-plant/Sorghum/P1"))
        .and(query_param("date", "2024-05-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "t-1",
            "status": "processing started"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ticket = client_for(&server)
        .analyze_plant(&key(), "2024-05-01")
        .await
        .expect("analyze ok");
    assert_eq!(ticket.task_id, "t-1");
    assert_eq!(ticket.status, "processing started");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/api/analyze-plant/Sorghum/P1");
    assert_eq!(requests[0].url.query(), Some("date=2024-05-01"));
}

#[tokio::test]
async fn plant_results_are_returned_as_is() {
    let server = MockServer::start().await;
    let body = json!({
        "P1_frame8_result": {"vegetation_features": []},
        "original": "https://bucket/original.png"
    });
    Mock::given(method("GET"))
        .and(path("/api/plant-results/Sorghum/P1"))
        .and(query_param("date", "2024-05-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let results = client_for(&server)
        .get_plant_results(&key(), "2024-05-01")
        .await
        .unwrap();
    assert_eq!(results, body);
}

#[tokio::test]
async fn timelines_hit_their_paths_and_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/plant-timeline/Sorghum/P1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "plant_id": "Sorghum_P1",
            "species": "Sorghum",
            "available_dates": ["2024-05-01", "2024-05-08"],
            "available_vegetation_indices": ["NDVI"],
            "available_texture_features": ["nir_lbp"],
            "vegetation_timeline": [
                {"date": "2024-05-01", "index_type": "NDVI", "mean": 0.5, "median": 0.4,
                 "std": 0.1, "q25": 0.3, "q75": 0.6, "min": 0.0, "max": 1, "image_key": null}
            ],
            "texture_timeline": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/plant-timeline/Sorghum/P1/vegetation/NDVI"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "plant_id": "Sorghum_P1",
            "index_type": "NDVI",
            "timeline": [{"date": "2024-05-01", "mean": 0.5, "image_key": "k/ndvi.png"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/plant-timeline/Sorghum/P1/texture/nir/lbp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "plant_id": "Sorghum_P1",
            "band_name": "nir",
            "texture_type": "lbp",
            "timeline": []
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let timeline = client.get_plant_timeline(&key()).await.unwrap();
    assert_eq!(timeline.available_dates, vec!["2024-05-01", "2024-05-08"]);
    assert_eq!(timeline.vegetation_timeline[0].index_type, "NDVI");
    assert_eq!(timeline.vegetation_timeline[0].stats.max, Some(1.0));

    let vegetation = client.get_vegetation_timeline(&key(), "NDVI").await.unwrap();
    assert_eq!(vegetation.index_type, "NDVI");
    assert_eq!(vegetation.timeline[0].date, "2024-05-01");
    assert_eq!(vegetation.timeline[0].stats.mean, Some(0.5));
    assert_eq!(vegetation.timeline[0].image_key.as_deref(), Some("k/ndvi.png"));

    let texture = client.get_texture_timeline(&key(), "nir", "lbp").await.unwrap();
    assert_eq!(texture.band_name, "nir");
    assert_eq!(texture.texture_type, "lbp");
    assert_eq!(texture.timeline, Vec::<TimelinePoint>::new());
}

#[tokio::test]
async fn database_data_task_status_and_species_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/plant-database-data/Sorghum/P1"))
        .and(query_param("date", "2024-05-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "images": {"original": "base/original.png"},
            "texture_images": {"nir_lbp": null},
            "vegetation_indices_images": {"NDVI": "base/ndvi.png"},
            "vegetation_indices_table": [{"index": "NDVI", "mean": 0.42}],
            "texture_features_table": [
                {"feature": "nir_lbp", "band": "nir", "texture_type": "lbp", "mean": 3.0}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/task-status/t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "t-1",
            "state": "SUCCESS",
            "result": {"ok": true}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/plants/Sorghum"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "species": "Sorghum",
            "plants": [{"id": "Sorghum_P1", "name": "P1", "dates_captured": ["2024-05-01"]}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let data = client.get_database_data(&key(), "2024-05-01").await.unwrap();
    assert_eq!(data.images["original"], "base/original.png");
    assert_eq!(data.texture_images["nir_lbp"], None);
    assert_eq!(data.vegetation_indices_table[0].stats.mean, Some(0.42));
    assert_eq!(data.texture_features_table[0].band, "nir");

    let task = client.get_task_status("t-1").await.unwrap();
    assert_eq!(task.state, "SUCCESS");
    assert_eq!(task.result, Some(json!({"ok": true})));

    let plants = client.get_plants_by_species("Sorghum").await.unwrap();
    assert_eq!(plants.plants.len(), 1);
    assert_eq!(plants.plants[0].name.as_deref(), Some("P1"));
}

#[tokio::test]
async fn non_success_status_surfaces_as_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/plant-timeline/Sorghum/P1"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Plant Sorghum_P1 not found"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_plant_timeline(&key())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn undecodable_body_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/task-status/t-9"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_task_status("t-9").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn missing_arguments_never_reach_the_server() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_plant_results(&key(), "").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidArgument { name: "date" });

    let err = client
        .get_texture_timeline(&key(), "", "lbp")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidArgument { name: "band_name" });

    let err = client.get_task_status(" ").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidArgument { name: "task_id" });

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn configured_timeout_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/plant-timeline/Sorghum/P1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({})),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        request_timeout: Some(Duration::from_millis(50)),
        ..ClientSettings::new(format!("{}/api", server.uri()))
    };
    let client = PlantClient::new(settings).unwrap();

    let err = client.get_plant_timeline(&key()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn unreachable_server_is_a_network_failure() {
    let client = PlantClient::new(ClientSettings::new("http://127.0.0.1:1/api")).unwrap();
    let err = client.get_plant_timeline(&key()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = PlantClient::new(ClientSettings::new("not a url")).unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
