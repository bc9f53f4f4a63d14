//! End-to-end runs of each command against mock services and a temporary
//! mailbox directory.

use std::path::Path;

use aqimail::{
    cli::command::{
        self,
        historic::{NOT_FOUND, NOT_RECOGNIZED},
        HistoricOutcome, PostOffice,
    },
    config::Config,
    mailbox::{CURRENT_AQI, HISTORIC_AQI, PM25_AVG, RESPONSE},
};
use serde_json::json;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn office(dir: &Path, server: Option<&MockServer>) -> PostOffice {
    let mut config = Config::default();
    config.mailbox.dir = dir.to_path_buf();
    config.mailbox.poll_interval_secs = 0.01;
    config.mailbox.max_wait_secs = Some(2.0);

    if let Some(server) = server {
        config.geocoding.url = format!("{}/search", server.uri());
        config.air_quality.url = format!("{}/data/2.5/air_pollution", server.uri());
        config.air_quality.api_key = "test-key".to_string();
        config.history.url = format!("{}/v22/series", server.uri());
    }

    PostOffice::new(config, CancellationToken::new())
}

fn corvallis() -> serde_json::Value {
    json!([{
        "lat": "44.5645659",
        "lon": "-123.2620435",
        "display_name": "Corvallis, Benton County, Oregon, United States"
    }])
}

fn read(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name)).unwrap()
}

#[tokio::test]
async fn summary_classifies_pm25_average() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(PM25_AVG), "40.0").unwrap();

    command::summary(&office(dir.path(), None)).await.unwrap();

    assert_eq!(read(dir.path(), RESPONSE), "Unhealthy for Sensitive Groups\n");
}

#[tokio::test]
async fn summary_waits_for_late_request() {
    let dir = TempDir::new().unwrap();
    let request = dir.path().join(PM25_AVG);

    let writer = tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        tokio::fs::write(request, "5").await.unwrap();
    });

    command::summary(&office(dir.path(), None)).await.unwrap();
    writer.await.unwrap();

    assert_eq!(read(dir.path(), RESPONSE), "Good\n");
}

#[tokio::test]
async fn historic_saves_series_for_known_city() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    std::fs::write(dir.path().join(HISTORIC_AQI), "Corvallis\n").unwrap();
    std::fs::write(
        dir.path().join("cities.json"),
        r#"{"Corvallis": "corvallis", "Portland": "portland"}"#,
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Corvallis"))
        .and(query_param("countrycodes", "us"))
        .respond_with(ResponseTemplate::new(200).set_body_json(corvallis()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v22/series/AQICN/AQI/US.corvallis.pm25.median"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "series": { "docs": [{
                "period": ["2021-06-01", "2021-06-02", "2021-06-03"],
                "value": [18.0, 22.5, "NA"]
            }]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = command::historic(&office(dir.path(), Some(&server)))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        HistoricOutcome::Saved {
            city: "Corvallis".to_string(),
            series: "US.corvallis.pm25.median".to_string(),
            path: dir.path().join("pm25py.csv"),
            observations: 3,
        }
    );
    assert_eq!(
        read(dir.path(), "pm25py.csv"),
        "original_period,original_value\r2021-06-01,18.0\r2021-06-02,22.5\r2021-06-03,NA\r"
    );
    assert_eq!(read(dir.path(), HISTORIC_AQI), "Corvallis\n");
}

#[tokio::test]
async fn historic_reports_unrecognized_entry() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    std::fs::write(dir.path().join(HISTORIC_AQI), "Nowhereville12345").unwrap();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let outcome = command::historic(&office(dir.path(), Some(&server)))
        .await
        .unwrap();

    assert_eq!(outcome, HistoricOutcome::NotRecognized);
    assert_eq!(
        read(dir.path(), HISTORIC_AQI),
        "Entry not recognized. Please check for typos."
    );
    assert_eq!(read(dir.path(), HISTORIC_AQI), NOT_RECOGNIZED);
    assert!(!dir.path().join("pm25py.csv").exists());
}

#[tokio::test]
async fn historic_keeps_waiting_while_request_is_empty() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    std::fs::write(dir.path().join(HISTORIC_AQI), "").unwrap();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut office = office(dir.path(), Some(&server));
    office.config.mailbox.max_wait_secs = Some(0.1);
    let err = command::historic(&office).await.unwrap_err();

    assert!(err.to_string().contains("gave up waiting"));
    assert_eq!(read(dir.path(), HISTORIC_AQI), "");
}

#[tokio::test]
async fn historic_reports_city_without_data() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    std::fs::write(dir.path().join(HISTORIC_AQI), "Corvallis").unwrap();
    std::fs::write(dir.path().join("cities.json"), r#"{"Portland": "portland"}"#).unwrap();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(corvallis()))
        .mount(&server)
        .await;

    let outcome = command::historic(&office(dir.path(), Some(&server)))
        .await
        .unwrap();

    assert_eq!(outcome, HistoricOutcome::NotFound);
    assert_eq!(read(dir.path(), HISTORIC_AQI), NOT_FOUND);
}

#[tokio::test]
async fn current_replaces_request_with_report() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    std::fs::write(dir.path().join(CURRENT_AQI), "Corvallis, OR\n").unwrap();
    let report = json!({
        "coord": { "lon": -123.2620435, "lat": 44.5645659 },
        "list": [{ "main": { "aqi": 2 }, "components": { "pm2_5": 14.2 }, "dt": 1645660800 }]
    });

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Corvallis, OR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(corvallis()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/air_pollution"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(report.clone()))
        .expect(1)
        .mount(&server)
        .await;

    command::current(&office(dir.path(), Some(&server)))
        .await
        .unwrap();

    let written: serde_json::Value = serde_json::from_str(&read(dir.path(), CURRENT_AQI)).unwrap();
    assert_eq!(written, report);
}

#[tokio::test]
async fn current_fails_for_unresolvable_location() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    std::fs::write(dir.path().join(CURRENT_AQI), "Nowhereville12345").unwrap();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = command::current(&office(dir.path(), Some(&server))).await;

    assert!(result.is_err());
    assert_eq!(read(dir.path(), CURRENT_AQI), "Nowhereville12345");
}

#[tokio::test]
async fn current_fails_on_provider_outage() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    std::fs::write(dir.path().join(CURRENT_AQI), "Corvallis").unwrap();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(corvallis()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/air_pollution"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(command::current(&office(dir.path(), Some(&server))).await.is_err());
    assert_eq!(read(dir.path(), CURRENT_AQI), "Corvallis");
}
