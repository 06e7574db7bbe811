//! Integration tests for FeatureClient
//!
//! Builds the NYC taxi feature set both in code and from YAML, writes the
//! config and prepares submissions.

use featureforge_sdk::{
    ClientConfig, DerivedFeature, Feature, FeatureAnchor, FeatureClient, FeatureType, HdfsSource,
    JdbcSource, Preprocessing, SdkError, Source, TypedKey, ValueType, WindowAggTransformation,
};
use std::collections::HashMap;

// ============================================================================
// Helper Functions
// ============================================================================

fn batch_source() -> HdfsSource {
    HdfsSource::new(
        "nycTaxiBatchSource",
        "abfss://container@account.dfs.core.windows.net/green_tripdata_2020-04.csv",
    )
    .unwrap()
    .with_event_timestamp_column("lpep_dropoff_datetime")
    .with_timestamp_format("yyyy-MM-dd HH:mm:ss")
}

fn taxi_graph() -> (Vec<FeatureAnchor>, Vec<DerivedFeature>) {
    let request = FeatureAnchor::new(
        "request_features",
        Source::InputContext,
        vec![Feature::new("f_trip_distance", FeatureType::Float, "trip_distance").unwrap()],
    )
    .unwrap();

    let duration = Feature::new(
        "f_trip_time_duration",
        FeatureType::Int32,
        "time_duration(lpep_pickup_datetime, lpep_dropoff_datetime, 'minutes')",
    )
    .unwrap();
    let non_agg = FeatureAnchor::new("nonAggFeatures", batch_source(), vec![duration.clone()]).unwrap();

    let location = TypedKey::new("DOLocationID", ValueType::Int32)
        .with_full_name("nyc_taxi.location_id")
        .with_description("location id in NYC");
    let avg_fare = Feature::new(
        "f_location_avg_fare",
        FeatureType::Float,
        WindowAggTransformation::new("cast_float(fare_amount)", "AVG", "90d").unwrap(),
    )
    .unwrap()
    .keyed_by(location);
    let agg = FeatureAnchor::new("aggregationFeatures", batch_source(), vec![avg_fare]).unwrap();

    let rounded = DerivedFeature::new(
        "f_trip_time_rounded",
        FeatureType::Int32,
        duration,
        "f_trip_time_duration % 10",
    )
    .unwrap();

    (vec![request, non_agg, agg], vec![rounded])
}

const TAXI_YAML: &str = r#"
sources:
  - name: nycTaxiBatchSource
    type: hdfs
    path: abfss://container@account.dfs.core.windows.net/green_tripdata_2020-04.csv
    event_timestamp_column: lpep_dropoff_datetime
    timestamp_format: yyyy-MM-dd HH:mm:ss

anchors:
  - name: request_features
    source: PASSTHROUGH
    features:
      - name: f_trip_distance
        type: FLOAT
        transform: trip_distance

  - name: nonAggFeatures
    source: nycTaxiBatchSource
    features:
      - name: f_trip_time_duration
        type: INT32
        transform: time_duration(lpep_pickup_datetime, lpep_dropoff_datetime, 'minutes')

  - name: aggregationFeatures
    source: nycTaxiBatchSource
    features:
      - name: f_location_avg_fare
        type: FLOAT
        key:
          - column: DOLocationID
            type: INT32
            description: location id in NYC
            full_name: nyc_taxi.location_id
        window_agg:
          expr: cast_float(fare_amount)
          func: AVG
          window: 90d

derived_features:
  - name: f_trip_time_rounded
    type: INT32
    inputs: [f_trip_time_duration]
    transform: f_trip_time_duration % 10
"#;

// ============================================================================
// Building
// ============================================================================

#[test]
fn test_end_to_end_taxi_document() {
    let (anchors, derived) = taxi_graph();
    let mut client = FeatureClient::new();
    client.build_features(anchors, derived).unwrap();

    let document = client.features_config().unwrap();

    // One source block even though two anchors use it
    assert_eq!(document.matches("    nycTaxiBatchSource: {\n").count(), 1);
    assert!(document.contains("            f_trip_distance: {\n"));
    assert!(document.contains("        source: PASSTHROUGH\n"));

    let derivations = &document[document.find("derivations: {").unwrap()..];
    assert!(derivations.contains("            f_trip_time_duration: {\n"));
    assert!(derivations.contains("                feature: f_trip_time_duration\n"));

    assert!(document.contains("                window: 90d\n"));
    assert!(document.contains("                aggregation: AVG\n"));
}

#[test]
fn test_yaml_and_code_produce_same_document() {
    let (anchors, derived) = taxi_graph();
    let mut from_code = FeatureClient::new();
    from_code.build_features(anchors, derived).unwrap();

    let mut from_yaml = FeatureClient::new();
    from_yaml.build_features_from_yaml(TAXI_YAML).unwrap();

    assert_eq!(
        from_code.features_config().unwrap(),
        from_yaml.features_config().unwrap()
    );
}

#[test]
fn test_build_from_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("features.yaml");
    std::fs::write(&path, TAXI_YAML)?;

    let mut client = FeatureClient::new();
    let compiled = client.build_features_from_file(&path)?;
    assert_eq!(compiled.source_names, vec!["nycTaxiBatchSource"]);
    assert_eq!(client.anchors().len(), 3);
    assert_eq!(client.derived_features().len(), 1);
    Ok(())
}

#[test]
fn test_build_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut client = FeatureClient::new();
    let err = client
        .build_features_from_file(&dir.path().join("absent.yaml"))
        .unwrap_err();
    assert!(matches!(err, SdkError::IoError(_)));
}

#[test]
fn test_yaml_errors_surface_as_parse_errors() {
    let mut client = FeatureClient::new();
    let err = client.build_features_from_yaml("anchors: 3").unwrap_err();
    assert!(matches!(err, SdkError::ParseError(_)));
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_write_config_creates_directories() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("feature_conf").join("auto_generated.conf");

    let (anchors, derived) = taxi_graph();
    let mut client = FeatureClient::with_config(ClientConfig::default().with_output_path(&output));
    client.build_features(anchors, derived)?;

    let written = client.write_config(None)?;
    assert_eq!(written, output);
    assert_eq!(std::fs::read_to_string(&output)?, client.features_config()?);

    let explicit = dir.path().join("explicit.conf");
    assert_eq!(client.write_config(Some(&explicit))?, explicit);
    assert!(explicit.exists());
    Ok(())
}

#[test]
fn test_write_config_before_build() {
    let client = FeatureClient::new();
    assert!(matches!(client.write_config(None), Err(SdkError::NotBuilt)));
}

// ============================================================================
// Submission
// ============================================================================

#[test]
fn test_submission_carries_preprocessing_and_secrets() {
    let source = JdbcSource::builder("nycTaxiSql", "jdbc:sqlserver://host:1433;database=taxi")
        .dbtable("green_tripdata")
        .auth("USERPASS")
        .preprocessing(Preprocessing::new("udfs.add_new_fare_amount"))
        .build()
        .unwrap();
    let anchor = FeatureAnchor::new(
        "sqlFeatures",
        source,
        vec![
            Feature::new("f_fare_amount_new", FeatureType::Float, "fare_amount_new").unwrap(),
            Feature::new("f_tip_amount", FeatureType::Float, "tip_amount").unwrap(),
        ],
    )
    .unwrap();

    let mut client = FeatureClient::new();
    client.build_features(vec![anchor], vec![]).unwrap();
    assert_eq!(
        client.required_properties().unwrap(),
        ["nycTaxiSql_USER", "nycTaxiSql_PASSWORD"]
    );

    let secrets: HashMap<&str, &str> = [
        ("nycTaxiSql_USER", "svc_features"),
        ("nycTaxiSql_PASSWORD", "hunter2"),
    ]
    .into_iter()
    .collect();

    let payload = client
        .prepare_submission(|name| secrets.get(name).map(|v| v.to_string()))
        .unwrap();
    assert_eq!(payload.properties.len(), 2);
    assert_eq!(
        payload.preprocessing.get("f_fare_amount_new,f_tip_amount"),
        Some(&Preprocessing::new("udfs.add_new_fare_amount"))
    );

    // Secrets stay out of the serialized payload
    let json = serde_json::to_string(&payload).unwrap();
    assert!(!json.contains("hunter2"));

    let err = client
        .prepare_submission(|name| (name == "nycTaxiSql_USER").then(|| "svc_features".to_string()))
        .unwrap_err();
    assert!(matches!(err, SdkError::MissingSecrets(ref names) if names == &["nycTaxiSql_PASSWORD"]));
}

#[test]
fn test_submission_without_credentials() {
    let (anchors, derived) = taxi_graph();
    let mut client = FeatureClient::new();
    client.build_features(anchors, derived).unwrap();

    let payload = client.prepare_submission_from_env().unwrap();
    assert!(payload.properties.is_empty());
    assert!(payload.preprocessing.is_empty());
}

#[test]
fn test_lenient_client_keeps_first_source() {
    let first = FeatureAnchor::new(
        "a1",
        HdfsSource::new("trips", "/data/2020").unwrap(),
        vec![Feature::new("f1", FeatureType::Float, "x").unwrap()],
    )
    .unwrap();
    let second = FeatureAnchor::new(
        "a2",
        HdfsSource::new("trips", "/data/2021").unwrap(),
        vec![Feature::new("f2", FeatureType::Float, "y").unwrap()],
    )
    .unwrap();

    let mut strict = FeatureClient::new();
    assert!(matches!(
        strict.build_features(vec![first.clone(), second.clone()], vec![]),
        Err(SdkError::CompileError(_))
    ));

    let mut lenient = FeatureClient::with_config(ClientConfig::default().with_strict_sources(false));
    lenient.build_features(vec![first, second], vec![]).unwrap();
    assert!(lenient.features_config().unwrap().contains("/data/2020"));
}
