use httpmock::prelude::*;
use quake_map::core::Pipeline;
use quake_map::domain::model::OutputFormat;
use quake_map::{CliConfig, EtlEngine, LocalStorage, QuakeError, QuakePipeline, TomlConfig};
use tempfile::TempDir;

fn cli_config(feed_url: String, output_path: String, formats: Vec<OutputFormat>) -> CliConfig {
    CliConfig {
        feed_url,
        output_path,
        formats,
        basename: "earthquakes".to_string(),
        archive: false,
        center_lat: 20.0,
        center_lng: 0.0,
        zoom: 2,
        tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
        attribution: "OpenStreetMap contributors".to_string(),
        timeout_seconds: None,
        config: None,
        verbose: false,
        monitor: false,
        log_json: false,
    }
}

/// One valid quake, one without magnitude, one with an unusable latitude.
fn three_feature_feed() -> serde_json::Value {
    serde_json::json!({
        "type": "FeatureCollection",
        "metadata": {
            "generated": 1700000000000_i64,
            "title": "USGS All Earthquakes, Past Month",
            "count": 3
        },
        "features": [
            {
                "type": "Feature",
                "id": "valid",
                "properties": {"mag": 5.2, "place": "Valid quake"},
                "geometry": {"type": "Point", "coordinates": [10, 20, 15]}
            },
            {
                "type": "Feature",
                "id": "nomag",
                "properties": {"place": "No magnitude"},
                "geometry": {"type": "Point", "coordinates": [11, 21, 5]}
            },
            {
                "type": "Feature",
                "id": "nanlat",
                "properties": {"mag": 3.3, "place": "NaN latitude"},
                "geometry": {"type": "Point", "coordinates": [12, "NaN", 5]}
            }
        ]
    })
}

#[tokio::test]
async fn test_end_to_end_draws_single_valid_marker() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/summary/all_month.geojson");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(three_feature_feed());
        })
        .await;

    let config = cli_config(
        server.url("/summary/all_month.geojson"),
        output_path.clone(),
        vec![OutputFormat::Html, OutputFormat::Geojson, OutputFormat::Csv, OutputFormat::Svg],
    );
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = QuakePipeline::new(storage, config).unwrap();

    let collection = pipeline.extract().await.unwrap();
    api_mock.assert_async().await;
    let rendered = pipeline.transform(collection).await.unwrap();

    assert_eq!(rendered.scene.markers.len(), 1);
    let marker = &rendered.scene.markers[0].marker;
    assert_eq!(marker.visual.radius, 20.8);
    assert_eq!(marker.visual.fill_color.as_str(), "#40FF00");
    assert_eq!(rendered.scene.legends.len(), 1);

    let report = pipeline.load(rendered).await.unwrap();
    assert_eq!(report.summary.drawn, 1);
    assert_eq!(report.written.len(), 4);

    for ext in ["html", "geojson", "csv", "svg"] {
        let path = temp_dir.path().join(format!("earthquakes.{}", ext));
        assert!(path.exists(), "missing {}", path.display());
    }

    let csv = std::fs::read_to_string(temp_dir.path().join("earthquakes.csv")).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.contains("Valid quake,5.2,20,10,15,20.8,#40FF00"));

    let html = std::fs::read_to_string(temp_dir.path().join("earthquakes.html")).unwrap();
    assert!(html.contains("<title>USGS All Earthquakes, Past Month</title>"));
    assert!(!html.contains("No magnitude"));
}

#[tokio::test]
async fn test_engine_run_with_archive() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/feed");
            then.status(200).json_body(three_feature_feed());
        })
        .await;

    let mut config = cli_config(
        server.url("/feed"),
        output_path.clone(),
        vec![OutputFormat::Html, OutputFormat::Csv],
    );
    config.archive = true;

    let pipeline = QuakePipeline::new(LocalStorage::new(output_path.clone()), config).unwrap();
    let engine = EtlEngine::new_with_monitoring(pipeline, false);
    let report = engine.run().await.unwrap();

    api_mock.assert_async().await;
    assert_eq!(report.written.len(), 1);
    assert!(report.written[0].ends_with("earthquakes.zip"));

    let zip_data = std::fs::read(temp_dir.path().join("earthquakes.zip")).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(names, vec!["earthquakes.html", "earthquakes.csv"]);
    assert!(!temp_dir.path().join("earthquakes.html").exists());
}

#[tokio::test]
async fn test_feed_failure_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/feed");
            then.status(502);
        })
        .await;

    let config = cli_config(server.url("/feed"), output_path.clone(), vec![OutputFormat::Html]);
    let pipeline = QuakePipeline::new(LocalStorage::new(output_path.clone()), config).unwrap();
    let result = EtlEngine::new(pipeline).run().await;

    api_mock.assert_async().await;
    assert!(matches!(
        result,
        Err(QuakeError::FeedUnavailableError { status: 502, .. })
    ));
    assert!(!std::path::Path::new(&output_path).exists());
}

#[tokio::test]
async fn test_non_json_feed_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/feed");
            then.status(200).body("Service Unavailable");
        })
        .await;

    let config = cli_config(server.url("/feed"), output_path.clone(), vec![OutputFormat::Html]);
    let pipeline = QuakePipeline::new(LocalStorage::new(output_path), config).unwrap();
    let result = EtlEngine::new(pipeline).run().await;

    assert!(matches!(result, Err(QuakeError::FeedFormatError(_))));
    assert!(!temp_dir.path().join("earthquakes.html").exists());
}

#[tokio::test]
async fn test_toml_config_drives_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().replace('\\', "/");

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/week.geojson");
            then.status(200).json_body(three_feature_feed());
        })
        .await;

    let toml_content = format!(
        r#"
[source]
endpoint = "{}"

[map]
center = [35.0, 139.0]
zoom = 4

[load]
output_path = "{}"
output_formats = ["svg"]
basename = "week"
"#,
        server.url("/week.geojson"),
        output_path
    );
    let config = TomlConfig::from_toml_str(&toml_content).unwrap();

    let pipeline = QuakePipeline::new(LocalStorage::new(output_path.clone()), config).unwrap();
    let report = EtlEngine::new(pipeline).run().await.unwrap();

    assert_eq!(report.summary.drawn, 1);
    assert_eq!(report.summary.magnitude_undefined, 1);
    assert_eq!(report.summary.invalid_coordinates, 1);
    let svg = std::fs::read_to_string(temp_dir.path().join("week.svg")).unwrap();
    assert_eq!(svg.matches("<circle").count(), 1);
}
