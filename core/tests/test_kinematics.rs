mod common;

use chrono::Duration;
use sailgraph_core::circular::circular_diff;
use sailgraph_core::error::EngineError;
use sailgraph_core::geodesy::project;
use sailgraph_core::kinematics::{derive_track, validate_derived};
use sailgraph_core::models::RawPoint;

use common::{origin, points_from_cogs, raw_from_headings, t0};

#[test]
fn derives_cog_sog_and_dist() {
    // 100 m nordover hvert 10. sekund
    let p0 = origin();
    let p1 = project(p0, 0.0, 100.0);
    let p2 = project(p1, 0.0, 100.0);
    let raw = vec![
        RawPoint::new(t0(), p0),
        RawPoint::new(t0() + Duration::seconds(10), p1),
        RawPoint::new(t0() + Duration::seconds(20), p2),
    ];

    let out = derive_track(&raw, "a").unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].timestamp, raw[1].timestamp);
    for p in &out {
        assert!((p.dist - 100.0).abs() < 1e-6, "dist={}", p.dist);
        assert!(circular_diff(p.cog, 0.0).abs() < 1e-6, "cog={}", p.cog);
        // 100 m / 10 s = 19.438 kn
        assert!((p.sog - 19.438_444_924).abs() < 1e-6, "sog={}", p.sog);
        assert_eq!(p.source, "a");
    }
}

#[test]
fn first_sample_is_not_emitted() {
    let raw = raw_from_headings(origin(), t0(), &[90.0; 9], 6.0);
    let out = derive_track(&raw, "a").unwrap();
    assert_eq!(out.len(), raw.len() - 1);
}

#[test]
fn duplicate_position_is_skipped_without_moving_reference() {
    let p0 = origin();
    let p1 = project(p0, 90.0, 50.0);
    let raw = vec![
        RawPoint::new(t0(), p0),
        RawPoint::new(t0() + Duration::seconds(5), p0),
        RawPoint::new(t0() + Duration::seconds(10), p1),
    ];
    let out = derive_track(&raw, "a").unwrap();
    assert_eq!(out.len(), 1);
    // tiden regnes fra første punkt (10 s), ikke fra duplikatet
    let expected = (50.0 / 1852.0) / (10.0 / 3600.0);
    assert!((out[0].sog - expected).abs() < 1e-6);
}

#[test]
fn equal_timestamps_give_zero_speed() {
    let p0 = origin();
    let p1 = project(p0, 0.0, 20.0);
    let raw = vec![RawPoint::new(t0(), p0), RawPoint::new(t0(), p1)];
    let out = derive_track(&raw, "a").unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].sog, 0.0);
    assert!(out[0].dist > 0.0);
}

#[test]
fn decreasing_timestamps_are_rejected() {
    let p0 = origin();
    let p1 = project(p0, 0.0, 20.0);
    let raw = vec![
        RawPoint::new(t0() + Duration::seconds(5), p0),
        RawPoint::new(t0(), p1),
    ];
    let err = derive_track(&raw, "a").unwrap_err();
    assert!(matches!(err, EngineError::NonMonotonicTimestamp { index: 1 }));
}

#[test]
fn fewer_than_two_samples_give_empty_track() {
    assert!(derive_track(&[], "a").unwrap().is_empty());
    assert!(derive_track(&[RawPoint::new(t0(), origin())], "a").unwrap().is_empty());
}

#[test]
fn validate_derived_normalizes_cog_and_checks_coordinates() {
    let pts = points_from_cogs(&[-10.0, 370.0], 5.0);
    let out = validate_derived(pts).unwrap();
    assert!((out[0].cog - 350.0).abs() < 1e-9);
    assert!((out[1].cog - 10.0).abs() < 1e-9);

    let mut bad = points_from_cogs(&[10.0], 5.0);
    bad[0].lat = 95.0;
    assert!(matches!(validate_derived(bad), Err(EngineError::InvalidCoordinate { .. })));

    let mut nan = points_from_cogs(&[10.0], 5.0);
    nan[0].sog = f64::NAN;
    assert!(matches!(validate_derived(nan), Err(EngineError::InvalidValue { .. })));
}
