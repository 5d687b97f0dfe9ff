//! GeoJSON feed fixtures

/// Single well-formed entry at epoch 0
pub const SINGLE_EVENT_FEED: &str = r#"{
  "type": "FeatureCollection",
  "metadata": { "generated": 0, "title": "Test feed", "count": 1 },
  "features": [
    {
      "type": "Feature",
      "properties": {
        "mag": 4.2,
        "place": "10km N of Example",
        "time": 0,
        "url": "https://earthquake.usgs.gov/earthquakes/eventpage/test0001"
      },
      "geometry": { "type": "Point", "coordinates": [140.1, 35.6, 10.0] },
      "id": "test0001"
    }
  ]
}"#;

/// Realistic feed with two malformed entries mixed in
pub const MIXED_FEED: &str = r#"{
  "type": "FeatureCollection",
  "metadata": { "generated": 1700000000000, "title": "USGS Magnitude 5+ Earthquakes", "count": 5 },
  "features": [
    {
      "type": "Feature",
      "properties": {
        "mag": 7.2,
        "place": "88 km S of Sand Point, Alaska",
        "time": 1699990000000,
        "url": "https://earthquake.usgs.gov/earthquakes/eventpage/us7000a"
      }
    },
    {
      "type": "Feature",
      "properties": { "mag": null, "place": "Unknown", "time": 1699980000000 }
    },
    {
      "type": "Feature",
      "properties": {
        "mag": 5.4,
        "place": "South Sandwich Islands region",
        "time": 1699970000000,
        "url": "https://earthquake.usgs.gov/earthquakes/eventpage/us7000b"
      }
    },
    {
      "type": "Feature",
      "properties": { "mag": 5.9, "place": "No time", "url": "" }
    },
    {
      "type": "Feature",
      "properties": {
        "mag": 10.1,
        "place": "1km E of Gulf of Nowhere",
        "time": 1699960000000,
        "url": "https://earthquake.usgs.gov/earthquakes/eventpage/us7000c"
      }
    }
  ]
}"#;
