//! End-to-end tests: HTTP feed -> controller -> consumer -> formatter

mod common;

use chrono::{DateTime, Local, Utc};
use common::{MIXED_FEED, RecordingConsumer, SINGLE_EVENT_FEED};
use quake_feed::format::{display_fields, magnitude_bucket};
use quake_feed::{
    Config, ConnectivityFlag, FeedConfig, FetchError, LoadController, LoadFailure, LoadState,
    MagnitudeBucket,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn feed_config(url: String) -> FeedConfig {
    FeedConfig {
        url,
        request_timeout: Duration::from_secs(5),
        user_agent: "quake-feed-e2e".to_string(),
    }
}

#[tokio::test]
async fn single_event_feed_formats_for_display() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SINGLE_EVENT_FEED))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = Config {
        feed: feed_config(format!("{}/query", mock_server.uri())),
        ..Default::default()
    };
    let mut controller = LoadController::from_config(
        &config.feed,
        Arc::new(ConnectivityFlag::new(true)),
        RecordingConsumer::default(),
    )
    .unwrap();

    controller.request_load();
    assert!(controller.await_delivery().await);
    assert_eq!(controller.state(), LoadState::Delivered);

    let results = &controller.consumer().results;
    assert_eq!(results.len(), 1);
    let records = results[0].records();
    assert_eq!(records.len(), 1);

    let fields = display_fields(&records[0], &config.display);
    assert_eq!(fields.magnitude, "4.2");
    assert_eq!(fields.bucket, MagnitudeBucket::Four);
    assert_eq!(fields.bucket.level(), 4);
    assert_eq!(fields.location_offset, "10km N of ");
    assert_eq!(fields.primary_location, "Example");

    // Epoch 0 rendered in whatever zone this machine uses
    let local = DateTime::<Utc>::from_timestamp_millis(0)
        .unwrap()
        .with_timezone(&Local);
    assert_eq!(fields.date, local.format("%b %-d, %Y").to_string());
    assert_eq!(fields.time, local.format("%-I:%M %p").to_string());
}

#[tokio::test]
async fn mixed_feed_keeps_well_formed_entries_in_order() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MIXED_FEED))
        .mount(&mock_server)
        .await;

    let mut controller = LoadController::from_config(
        &feed_config(mock_server.uri()),
        Arc::new(|| true),
        RecordingConsumer::default(),
    )
    .unwrap();

    controller.request_load();
    controller.await_delivery().await;

    let records = controller.consumer().results[0].records().to_vec();
    let places: Vec<_> = records.iter().map(|r| r.location.as_str()).collect();
    assert_eq!(
        places,
        vec![
            "88 km S of Sand Point, Alaska",
            "South Sandwich Islands region",
            "1km E of Gulf of Nowhere",
        ]
    );
    assert_eq!(magnitude_bucket(records[2].magnitude), MagnitudeBucket::TenPlus);
    assert!(records[0].detail_uri().is_some());
}

#[tokio::test]
async fn server_error_is_delivered_as_failure_and_recoverable() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SINGLE_EVENT_FEED))
        .mount(&mock_server)
        .await;

    let mut controller = LoadController::from_config(
        &feed_config(mock_server.uri()),
        Arc::new(|| true),
        RecordingConsumer::default(),
    )
    .unwrap();

    controller.request_load();
    controller.await_delivery().await;
    assert_eq!(
        controller.consumer().results[0].failure(),
        Some(&LoadFailure::Fetch(FetchError::NonSuccessStatus(503)))
    );
    assert_eq!(
        controller.consumer().results[0].failure().map(LoadFailure::code),
        Some("http_status")
    );

    // A failed load leaves the controller ready for another request
    assert_eq!(controller.request_load(), LoadState::Loading);
    controller.await_delivery().await;
    assert!(controller.consumer().results[1].is_success());
}

#[tokio::test]
async fn no_connectivity_makes_no_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SINGLE_EVENT_FEED))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut controller = LoadController::from_config(
        &feed_config(mock_server.uri()),
        Arc::new(ConnectivityFlag::new(false)),
        RecordingConsumer::default(),
    )
    .unwrap();

    assert_eq!(controller.request_load(), LoadState::NoConnectivity);
    assert_eq!(
        controller.consumer().results[0].failure().map(LoadFailure::code),
        Some("disconnected")
    );
}

#[tokio::test]
async fn reset_during_slow_response_never_delivers() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(SINGLE_EVENT_FEED)
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;

    let mut controller = LoadController::from_config(
        &feed_config(mock_server.uri()),
        Arc::new(|| true),
        RecordingConsumer::default(),
    )
    .unwrap();

    controller.request_load();
    tokio::time::sleep(Duration::from_millis(50)).await;
    controller.reset();

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(!controller.try_deliver());
    assert!(controller.consumer().results.is_empty());
    assert_eq!(controller.consumer().cleared, 1);
    assert_eq!(controller.state(), LoadState::Idle);
}
