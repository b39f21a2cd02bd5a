mod common;

use sailgraph_core::circular::circular_mean_signed;
use sailgraph_core::legs::{classify, leg_boundaries, segment_legs};
use sailgraph_core::maneuvers::detect_maneuvers;
use sailgraph_core::marks::{regime_marks, turn_marks};
use sailgraph_core::models::LegKind;
use sailgraph_core::types::{LegScheme, LegThresholds, ManeuverParams, MarkParams};

use common::{enriched_from_cogs, origin, raw_from_headings, t0, tack_headings, track_from_raw};

#[test]
fn close_hauled_angles_classify_as_upwind() {
    let th = LegThresholds::default();
    let m = circular_mean_signed(&[50.0, 55.0, 60.0, 65.0]).unwrap();
    assert_eq!(classify(m, &th), LegKind::Upwind);
    let m = circular_mean_signed(&[-50.0, -55.0, -60.0, -65.0]).unwrap();
    assert_eq!(classify(m, &th), LegKind::Upwind);
}

#[test]
fn running_angles_classify_as_downwind() {
    let th = LegThresholds::default();
    let m = circular_mean_signed(&[160.0, 170.0, 175.0]).unwrap();
    assert_eq!(classify(m, &th), LegKind::Downwind);
    // på tvers av 180°
    let m = circular_mean_signed(&[170.0, -170.0, 175.0]).unwrap();
    assert_eq!(classify(m, &th), LegKind::Downwind);
}

#[test]
fn beam_reach_depends_on_scheme() {
    let three = LegThresholds::default();
    let binary = LegThresholds { scheme: LegScheme::Binary, ..LegThresholds::default() };
    assert_eq!(classify(100.0, &three), LegKind::Reach);
    assert_eq!(classify(100.0, &binary), LegKind::Offwind);
    assert_eq!(classify(170.0, &binary), LegKind::Offwind);
    assert_eq!(classify(45.0, &binary), LegKind::Upwind);
}

#[test]
fn boundaries_are_sorted_and_unique() {
    let raw = raw_from_headings(origin(), t0(), &tack_headings(30), 5.0);
    let track = track_from_raw("a", &raw, 0.0);
    let mut found = detect_maneuvers(&track.points, "a", &ManeuverParams::default());
    // samme indeks to ganger og en på kanten
    found.push(found[0].clone());
    let mut edge = found[0].clone();
    edge.index = 0;
    found.push(edge);

    let b = leg_boundaries(track.len(), &found);
    assert_eq!(b, vec![0, found[0].index, track.len() - 1]);
    assert!(leg_boundaries(0, &found).is_empty());
}

#[test]
fn tack_splits_into_two_upwind_legs() {
    let raw = raw_from_headings(origin(), t0(), &tack_headings(30), 5.0);
    let track = track_from_raw("a", &raw, 0.0);
    let found = detect_maneuvers(&track.points, "a", &ManeuverParams::default());
    let legs = segment_legs(&track.points, &found, "a", &LegThresholds::default());

    assert_eq!(legs.len(), 2);
    assert_eq!(legs[0].start_index, 0);
    assert_eq!(legs[0].end_index, legs[1].start_index);
    assert_eq!(legs[1].end_index, track.len() - 1);
    assert!(legs.iter().all(|l| l.kind == LegKind::Upwind));
    assert!(legs[0].twa_mean > 0.0 && legs[1].twa_mean < 0.0);

    let l = &legs[0];
    assert_eq!(l.points, l.end_index - l.start_index + 1);
    assert!((l.sog_mean - 5.0).abs() < 1e-6);
    assert!(l.vmg_mean > 0.0);
    assert!(l.cog_std < 1e-3);
    assert!((l.duration_s - (l.end_index - l.start_index) as f64).abs() < 1e-9);
}

#[test]
fn single_point_track_has_no_legs() {
    let pts = enriched_from_cogs(&[10.0], 5.0, 0.0);
    assert!(segment_legs(&pts, &[], "a", &LegThresholds::default()).is_empty());
}

#[test]
fn marks_from_sharp_turns_and_regime_changes() {
    // kryss, så lens
    let mut headings = vec![45.0; 30];
    headings.extend(std::iter::repeat(180.0).take(30));
    let raw = raw_from_headings(origin(), t0(), &headings, 6.0);
    let track = track_from_raw("a", &raw, 0.0);

    let marks = turn_marks(&track.points, &MarkParams::default());
    assert_eq!(marks.len(), 1);
    assert_eq!(marks[0].timestamp, Some(track.points[30].timestamp));

    let found = detect_maneuvers(&track.points, "a", &ManeuverParams::default());
    let legs = segment_legs(&track.points, &found, "a", &LegThresholds::default());
    let kinds: Vec<LegKind> = legs.iter().map(|l| l.kind).collect();
    assert_eq!(kinds, vec![LegKind::Upwind, LegKind::Downwind]);

    let regime = regime_marks(&track.points, &legs);
    assert_eq!(regime.len(), 1);
    assert_eq!(regime[0].timestamp, Some(legs[1].start));
}
