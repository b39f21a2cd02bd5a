use serde_json::{json, Value};
use sailgraph_core::json_api::{analyze_session_json, enrich_json};

const T0: f64 = 1_714_564_800.0; // 2024-05-01T12:00:00Z

/// Punkter nordover, 0.00002° per sekund (~2.2 m/s).
fn positions(n: usize, lon: f64) -> Vec<Value> {
    (0..n)
        .map(|i| json!({"lat": 42.24 + i as f64 * 2e-5, "lon": lon, "time": T0 + i as f64}))
        .collect()
}

#[test]
fn session_with_raw_positions() {
    let payload = json!({
        "tracks": [
            {"id": "a", "points": positions(40, -8.78)},
            {"name": "b", "points": positions(40, -8.779), "TWD": 180.0}
        ],
        "meta": {"TWD": 0.0, "BALIZAS": [{"lat": 42.25, "lon": -8.78, "nombre": "Lo"}]},
        "cfg": {"maneuvers": {"window": 5}}
    });
    let out: Value = serde_json::from_str(&analyze_session_json(&payload.to_string()).unwrap()).unwrap();

    let tracks = out["tracks"].as_array().unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0]["status"], "analyzed");
    assert_eq!(tracks[0]["track"], "a");
    assert_eq!(tracks[0]["twd"], 0.0);
    assert_eq!(tracks[1]["twd"], 180.0);
    assert_eq!(out["comparisons"].as_array().unwrap().len(), 1);
    assert_eq!(out["marks"][0]["name"], "Lo");
}

#[test]
fn pass_through_points_with_rfc3339() {
    let payload = json!({
        "tracks": [{"id": "csv", "points": [
            {"Lat": 42.24, "Lon": -8.78, "UTC": "2024-05-01T12:00:00Z", "COG": 10.0, "SOG": 5.0, "Dist": 2.5},
            {"Lat": 42.2401, "Lon": -8.78, "UTC": "2024-05-01 12:00:01", "COG": 12.0, "SOG": 5.1, "Dist": 2.6}
        ]}]
    });
    let out: Value = serde_json::from_str(&analyze_session_json(&payload.to_string()).unwrap()).unwrap();
    assert_eq!(out["tracks"][0]["status"], "analyzed");
    assert_eq!(out["tracks"][0]["summary"]["points"], 2);
}

#[test]
fn mixed_derived_fields_reject_only_that_track() {
    let payload = json!({
        "tracks": [
            {"id": "mix", "points": [
                {"lat": 42.24, "lon": -8.78, "time": T0, "cog": 10.0, "sog": 5.0, "dist": 2.5},
                {"lat": 42.2401, "lon": -8.78, "time": T0 + 1.0}
            ]},
            {"id": "bad_time", "points": [{"lat": 42.24, "lon": -8.78, "time": "i går"}]},
            {"id": "ok", "points": positions(10, -8.78)}
        ],
        "meta": {"TWD": 0.0}
    });
    let out: Value = serde_json::from_str(&analyze_session_json(&payload.to_string()).unwrap()).unwrap();
    let tracks = out["tracks"].as_array().unwrap();
    assert_eq!(tracks[0]["status"], "rejected");
    assert_eq!(tracks[0]["kind"], "missing_columns");
    assert_eq!(tracks[1]["kind"], "unparsable_timestamp");
    assert_eq!(tracks[2]["status"], "analyzed");
}

#[test]
fn malformed_document_reports_path() {
    let err = analyze_session_json(r#"{"tracks": [{"id": "a", "points": [{"lat": "x", "lon": 1, "time": 0}]}]}"#)
        .unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("tracks[0].points[0].lat"), "msg={msg}");

    assert!(analyze_session_json(r#"{"tracks": [], "meta": {"BALIZAS": [{"lat": 100, "lon": 0}]}}"#).is_err());
}

#[test]
fn enrich_json_adds_wind_fields() {
    let payload = json!({"points": positions(6, -8.78), "twd": 90.0, "smoothing_window": 3});
    let out: Value = serde_json::from_str(&enrich_json(&payload.to_string()).unwrap()).unwrap();
    let pts = out["points"].as_array().unwrap();
    assert_eq!(pts.len(), 5);
    for p in pts {
        let twa = p["twa"].as_f64().unwrap();
        // nordover med vind fra øst
        assert!((twa + 90.0).abs() < 0.1, "twa={twa}");
        assert!(p["vmg"].as_f64().unwrap().abs() < 0.01);
    }
    assert!(enrich_json(r#"{"points": []}"#).is_err());
}

#[test]
fn start_minute_out_of_range_keeps_session_alive() {
    let payload = json!({
        "tracks": [{"id": "a", "points": positions(30, -8.78)}],
        "meta": {"TWD": 0.0, "MINUTO_SALIDA": 1e15}
    });
    let out: Value = serde_json::from_str(&analyze_session_json(&payload.to_string()).unwrap()).unwrap();
    assert_eq!(out["tracks"][0]["status"], "analyzed");
    // startminuttet ignoreres, hele tracket analyseres
    assert_eq!(out["tracks"][0]["summary"]["points"], 29);
}
