//! Feed ingestion and per-feature validation.
//!
//! Ingestion turns the loosely typed geoJSON body into [`Feature`]s without
//! judging them; validation then decides which features can be drawn.

use crate::domain::model::{
    Coordinates, FeatureCollection, Feature, FeedMetadata, Position, Reading, Rejection,
};
use crate::utils::error::{QuakeError, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Parse a feed body into a [`FeatureCollection`].
///
/// A body that is not JSON, or has no `features` array, fails the whole
/// run. Individual records that are not objects are logged and counted as
/// malformed.
pub fn ingest_feed(body: &str) -> Result<FeatureCollection> {
    let root: Value = serde_json::from_str(body)?;
    let Some(records) = root.get("features").and_then(Value::as_array) else {
        return Err(QuakeError::FeedShapeError {
            message: "missing 'features' array".to_string(),
        });
    };

    let mut collection = FeatureCollection {
        metadata: ingest_metadata(root.get("metadata")),
        features: Vec::with_capacity(records.len()),
        malformed: 0,
    };

    for (index, record) in records.iter().enumerate() {
        match ingest_feature(index, record) {
            Ok(feature) => collection.features.push(feature),
            Err(e) => {
                tracing::warn!(record = %record, "⚠️ {}", e);
                collection.malformed += 1;
            }
        }
    }

    tracing::debug!(
        "Ingested {} features ({} malformed)",
        collection.features.len(),
        collection.malformed
    );
    Ok(collection)
}

fn ingest_metadata(metadata: Option<&Value>) -> FeedMetadata {
    let Some(metadata) = metadata else {
        return FeedMetadata::default();
    };

    FeedMetadata {
        title: metadata
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_string),
        // USGS publishes generation time as epoch milliseconds
        generated: metadata
            .get("generated")
            .and_then(Value::as_i64)
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        count: metadata.get("count").and_then(Value::as_u64),
    }
}

/// Ingest one feed record.
///
/// Missing `properties`, `mag` or coordinate entries are not errors here;
/// they are carried as absent/invalid readings for the validator to judge.
pub fn ingest_feature(index: usize, record: &Value) -> Result<Feature> {
    let Some(object) = record.as_object() else {
        return Err(QuakeError::MalformedFeatureError {
            index,
            reason: "record is not a JSON object".to_string(),
        });
    };

    let properties = object.get("properties").cloned().unwrap_or(Value::Null);
    let magnitude = properties.get("mag").map(Reading::from_json);
    let place = properties
        .get("place")
        .map(|place| match place {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_default();

    let coordinates = object
        .get("geometry")
        .and_then(|geometry| geometry.get("coordinates"));
    let component = |i: usize| {
        coordinates
            .and_then(|c| c.get(i))
            .map(Reading::from_json)
            .unwrap_or(Reading::Other(Value::Null))
    };

    let id = object.get("id").and_then(|id| match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    Ok(Feature {
        id,
        magnitude,
        place,
        coordinates: Coordinates {
            longitude: component(0),
            latitude: component(1),
            depth: component(2),
        },
        properties,
    })
}

/// A feature that passed validation, with its position known to be finite.
#[derive(Debug, Clone, PartialEq)]
pub struct Renderable<'a> {
    pub feature: &'a Feature,
    pub magnitude: &'a Reading,
    pub position: Position,
}

/// Check a feature for drawing. Magnitude presence is checked before coordinates.
pub fn validate(feature: &Feature) -> std::result::Result<Renderable<'_>, Rejection> {
    let Some(magnitude) = feature.magnitude.as_ref() else {
        return Err(Rejection::MagnitudeUndefined);
    };

    let coords = &feature.coordinates;
    match (
        coords.longitude.finite(),
        coords.latitude.finite(),
        coords.depth.finite(),
    ) {
        (Some(longitude), Some(latitude), Some(depth_km)) => Ok(Renderable {
            feature,
            magnitude,
            position: Position {
                longitude,
                latitude,
                depth_km,
            },
        }),
        _ => Err(Rejection::InvalidCoordinates),
    }
}

/// Log why a feature was rejected.
pub fn report_rejection(index: usize, feature: &Feature, rejection: Rejection) {
    match rejection {
        Rejection::MagnitudeUndefined => {
            tracing::warn!(
                index,
                id = feature.id.as_deref().unwrap_or("-"),
                place = %feature.place,
                "Skipping feature: {}",
                rejection
            );
        }
        Rejection::InvalidCoordinates => {
            tracing::warn!(
                index,
                id = feature.id.as_deref().unwrap_or("-"),
                longitude = %feature.coordinates.longitude,
                latitude = %feature.coordinates.latitude,
                depth = %feature.coordinates.depth,
                properties = %feature.properties,
                "Skipping feature: {}",
                rejection
            );
        }
    }
}

/// `true` when the feature can be drawn; logs the reason otherwise.
pub fn is_renderable(index: usize, feature: &Feature) -> bool {
    match validate(feature) {
        Ok(_) => true,
        Err(rejection) => {
            report_rejection(index, feature, rejection);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quake(mag: Value, coordinates: Value) -> Value {
        json!({
            "type": "Feature",
            "id": "us7000abcd",
            "properties": {"mag": mag, "place": "10 km N of Somewhere"},
            "geometry": {"type": "Point", "coordinates": coordinates}
        })
    }

    #[test]
    fn test_ingest_feature_reads_fields() {
        let feature = ingest_feature(0, &quake(json!(5.2), json!([10.0, 20.0, 15.0]))).unwrap();

        assert_eq!(feature.id.as_deref(), Some("us7000abcd"));
        assert_eq!(feature.magnitude, Some(Reading::Number(5.2)));
        assert_eq!(feature.place, "10 km N of Somewhere");
        assert_eq!(feature.coordinates.longitude, Reading::Number(10.0));
        assert_eq!(feature.coordinates.latitude, Reading::Number(20.0));
        assert_eq!(feature.coordinates.depth, Reading::Number(15.0));
    }

    #[test]
    fn test_ingest_distinguishes_absent_and_null_magnitude() {
        let absent = ingest_feature(
            0,
            &json!({"properties": {"place": "x"}, "geometry": {"coordinates": [1, 2, 3]}}),
        )
        .unwrap();
        let null = ingest_feature(1, &quake(json!(null), json!([1, 2, 3]))).unwrap();

        assert_eq!(absent.magnitude, None);
        assert_eq!(null.magnitude, Some(Reading::Other(json!(null))));
    }

    #[test]
    fn test_ingest_rejects_non_object_record() {
        let err = ingest_feature(4, &json!([1, 2, 3])).unwrap_err();
        assert!(matches!(
            err,
            QuakeError::MalformedFeatureError { index: 4, .. }
        ));
    }

    #[test]
    fn test_ingest_feed_counts_malformed_records() {
        let body = json!({
            "type": "FeatureCollection",
            "metadata": {"title": "USGS All Earthquakes, Past Month", "generated": 1700000000000_i64, "count": 3},
            "features": [
                quake(json!(1.5), json!([-120.0, 35.0, 5.0])),
                "not a feature",
                quake(json!(2.0), json!([-121.0, 36.0, 7.5]))
            ]
        })
        .to_string();

        let collection = ingest_feed(&body).unwrap();

        assert_eq!(collection.features.len(), 2);
        assert_eq!(collection.malformed, 1);
        assert_eq!(
            collection.metadata.title.as_deref(),
            Some("USGS All Earthquakes, Past Month")
        );
        assert_eq!(collection.metadata.count, Some(3));
        assert_eq!(
            collection.metadata.generated.map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
    }

    #[test]
    fn test_ingest_feed_requires_features_array() {
        assert!(matches!(
            ingest_feed(r#"{"type": "FeatureCollection"}"#),
            Err(QuakeError::FeedShapeError { .. })
        ));
        assert!(matches!(
            ingest_feed("<html>503</html>"),
            Err(QuakeError::FeedFormatError(_))
        ));
    }

    #[test]
    fn test_validate_accepts_well_formed_feature() {
        let feature = ingest_feature(0, &quake(json!(5.2), json!([10, 20, 15]))).unwrap();
        let renderable = validate(&feature).unwrap();

        assert_eq!(renderable.magnitude, &Reading::Number(5.2));
        assert_eq!(renderable.position.longitude, 10.0);
        assert_eq!(renderable.position.latitude, 20.0);
        assert_eq!(renderable.position.depth_km, 15.0);
    }

    #[test]
    fn test_validate_rejects_missing_magnitude_first() {
        let feature = ingest_feature(
            0,
            &json!({"properties": {"place": "x"}, "geometry": {"coordinates": [null, 2, 3]}}),
        )
        .unwrap();

        assert_eq!(validate(&feature), Err(Rejection::MagnitudeUndefined));
        assert!(!is_renderable(0, &feature));
    }

    #[test]
    fn test_validate_rejects_non_finite_coordinates() {
        let mut feature = ingest_feature(0, &quake(json!(3.0), json!([10, 20, 15]))).unwrap();
        feature.coordinates.latitude = Reading::Number(f64::NAN);
        assert_eq!(validate(&feature), Err(Rejection::InvalidCoordinates));

        let short = ingest_feature(1, &quake(json!(3.0), json!([10, 20]))).unwrap();
        assert_eq!(validate(&short), Err(Rejection::InvalidCoordinates));

        let text = ingest_feature(2, &quake(json!(3.0), json!(["10", 20, 15]))).unwrap();
        assert_eq!(validate(&text), Err(Rejection::InvalidCoordinates));

        let no_geometry =
            ingest_feature(3, &json!({"properties": {"mag": 3.0, "place": "x"}})).unwrap();
        assert!(!is_renderable(3, &no_geometry));
    }

    #[test]
    fn test_validate_keeps_present_but_null_magnitude() {
        let feature = ingest_feature(0, &quake(json!(null), json!([10, 20, 15]))).unwrap();
        assert!(validate(&feature).is_ok());
    }
}
