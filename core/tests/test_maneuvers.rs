mod common;

use chrono::Duration;
use sailgraph_core::maneuvers::{debounce, detect_maneuvers, find_candidates, speed_profile};
use sailgraph_core::models::Maneuver;
use sailgraph_core::types::{DebouncePolicy, ManeuverParams};

use common::{enriched_from_cogs, origin, raw_from_headings, t0, tack_headings, track_from_raw};

fn params(window: usize) -> ManeuverParams {
    ManeuverParams { window, ..ManeuverParams::default() }
}

#[test]
fn straight_course_has_no_maneuvers() {
    let pts = enriched_from_cogs(&[45.0; 60], 5.0, 0.0);
    assert!(detect_maneuvers(&pts, "a", &ManeuverParams::default()).is_empty());
}

#[test]
fn single_spike_gives_one_maneuver() {
    let mut cogs = vec![45.0; 21];
    cogs[10] = 135.0;
    let pts = enriched_from_cogs(&cogs, 5.0, 0.0);

    let found = detect_maneuvers(&pts, "a", &params(5));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].index, 10);
    assert_eq!(found[0].timestamp, t0() + Duration::seconds(10));
    assert!((found[0].intensity - 90.0).abs() < 1e-9);
}

#[test]
fn track_shorter_than_two_windows_is_empty() {
    let pts = enriched_from_cogs(&[0.0, 90.0, 180.0, 270.0, 0.0, 90.0, 180.0, 270.0, 0.0, 90.0], 5.0, 0.0);
    assert!(find_candidates(&pts, "a", 5, 30.0).is_empty());
}

#[test]
fn oscillation_across_north_is_not_a_maneuver() {
    let cogs: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 350.0 } else { 10.0 }).collect();
    let pts = enriched_from_cogs(&cogs, 5.0, 0.0);
    assert!(detect_maneuvers(&pts, "a", &params(5)).is_empty());
}

#[test]
fn tack_collapses_to_one_maneuver() {
    let raw = raw_from_headings(origin(), t0(), &tack_headings(30), 5.0);
    let track = track_from_raw("a", &raw, 0.0);

    let candidates = find_candidates(&track.points, "a", 10, 30.0);
    assert!(candidates.len() > 1);

    let found = detect_maneuvers(&track.points, "a", &ManeuverParams::default());
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].index, candidates[0].index);
    // fra styrbord til babord halse
    assert!(found[0].delta_cog < 0.0);
}

fn candidate(secs: i64, index: usize, intensity: f64) -> Maneuver {
    Maneuver {
        track: "a".into(),
        timestamp: t0() + Duration::seconds(secs),
        index,
        cog: 0.0,
        cog_before: 0.0,
        cog_after: 0.0,
        delta_cog: 0.0,
        intensity,
    }
}

#[test]
fn debounce_first_wins() {
    let c = vec![candidate(5, 5, 40.0), candidate(0, 0, 35.0), candidate(30, 30, 50.0)];
    let kept = debounce(c, 15.0, DebouncePolicy::FirstWins);
    assert_eq!(kept.iter().map(|m| m.index).collect::<Vec<_>>(), vec![0, 30]);
}

#[test]
fn debounce_best_of_cluster() {
    let c = vec![candidate(0, 0, 35.0), candidate(5, 5, 40.0), candidate(30, 30, 50.0)];
    let kept = debounce(c, 15.0, DebouncePolicy::BestOfCluster);
    assert_eq!(kept.iter().map(|m| m.index).collect::<Vec<_>>(), vec![5, 30]);
}

#[test]
fn speed_profile_windows_and_missing_data() {
    let mut cogs = vec![45.0; 21];
    cogs[10] = 135.0;
    let pts = enriched_from_cogs(&cogs, 5.0, 0.0);
    let found = detect_maneuvers(&pts, "a", &params(5));

    let prof = speed_profile(&pts, &found, &[20, -3, 0, -3]);
    assert_eq!(prof.len(), 1);
    let labels: Vec<&str> = prof[0].samples.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["-3s", "0s", "+20s"]);
    for s in &prof[0].samples {
        assert!((s.sog_mean.unwrap() - 5.0).abs() < 1e-9);
    }

    // en manøver utenfor punktene gir ingen data
    let mut late = found[0].clone();
    late.timestamp = t0() + Duration::seconds(600);
    let prof = speed_profile(&pts, &[late], &[-3, 0, 3]);
    assert!(prof[0].samples.iter().all(|s| s.sog_mean.is_none()));
}

#[test]
fn debounce_and_profile_survive_extreme_values() {
    let c = vec![candidate(0, 0, 35.0), candidate(5, 5, 40.0), candidate(30, 30, 50.0)];
    assert_eq!(debounce(c.clone(), -1e300, DebouncePolicy::FirstWins).len(), 3);
    assert_eq!(debounce(c, 1e300, DebouncePolicy::BestOfCluster).len(), 1);

    let pts = enriched_from_cogs(&[45.0; 5], 5.0, 0.0);
    let prof = speed_profile(&pts, &[candidate(2, 2, 40.0)], &[i64::MIN, i64::MAX]);
    assert!(prof[0].samples.iter().all(|s| (s.sog_mean.unwrap() - 5.0).abs() < 1e-9));
}
