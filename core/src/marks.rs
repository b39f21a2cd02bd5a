//! Merker funnet fra tracket: skarpe kursendringer og overganger mellom kryss og
//! andre strekk. Brukes som forslag til bøyeposisjoner.

use crate::circular::circular_diff;
use crate::geodesy::haversine_distance;
use crate::models::{EnrichedPoint, Leg, LegKind, Mark};
use crate::types::MarkParams;

/// Merke der COG endres mer enn terskelen mellom to påfølgende punkter.
/// Nye merker nærmere enn `min_spacing_m` til forrige merke hoppes over.
pub fn turn_marks(points: &[EnrichedPoint], params: &MarkParams) -> Vec<Mark> {
    let mut marks: Vec<Mark> = Vec::new();
    for w in points.windows(2) {
        let delta = circular_diff(w[1].cog, w[0].cog).abs();
        if delta <= params.turn_threshold_deg {
            continue;
        }
        let pos = w[1].pos();
        let far_enough = marks
            .last()
            .map_or(true, |last| haversine_distance(pos, last.pos) > params.min_spacing_m);
        if far_enough {
            marks.push(Mark {
                name: format!("Merke {}", marks.len() + 1),
                pos,
                timestamp: Some(w[1].timestamp),
                label: Some(format!("Δcog {delta:.0}°")),
            });
        }
    }
    marks
}

fn is_upwind(kind: LegKind) -> bool {
    kind == LegKind::Upwind
}

/// Merke ved starten av hvert strekk der regimet skifter mellom kryss og ikke-kryss.
pub fn regime_marks(points: &[EnrichedPoint], legs: &[Leg]) -> Vec<Mark> {
    let mut marks = Vec::new();
    for w in legs.windows(2) {
        let (a, b) = (&w[0], &w[1]);
        if is_upwind(a.kind) == is_upwind(b.kind) {
            continue;
        }
        let Some(p) = points.get(b.start_index) else {
            continue;
        };
        marks.push(Mark {
            name: format!("Merke {}", marks.len() + 1),
            pos: p.pos(),
            timestamp: Some(b.start),
            label: Some(format!("{} → {}", a.kind, b.kind)),
        });
    }
    marks
}
