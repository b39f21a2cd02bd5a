use std::fmt::Write;

use crate::pipeline::{Comparison, SessionReport, TrackOutcome, TrackReport};

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(x) => format!("{x:.decimals$}"),
        None => "-".to_string(),
    }
}

/// Tekstrapport for ett track.
pub fn render_track(r: &TrackReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- Track {} (TWD {:.0}°) ---", r.track, r.twd);

    if let Some(s) = &r.summary {
        let _ = writeln!(out, "Punkter: {}  Varighet: {:.1} min  Distanse: {:.2} nm", s.points, s.duration_min, s.distance_nm);
        let _ = writeln!(
            out,
            "SOG snitt {:.2} kn  maks {:.2} kn (TWA {:.0}°)  min {:.2} kn",
            s.sog_mean, s.sog_max.value, s.sog_max.twa, s.sog_min.value
        );
        let _ = writeln!(
            out,
            "VMG snitt {:.2} kn  maks {:.2} kn  min {:.2} kn",
            s.vmg_mean, s.vmg_max.value, s.vmg_min.value
        );
        let _ = writeln!(
            out,
            "COG snitt {:.0}° ± {:.1}°  spenn {:.0}° ({:.0}°–{:.0}°)  TWA snitt {:.0}°",
            s.cog_mean, s.cog_std, s.cog_span, s.cog_min, s.cog_max, s.twa_mean
        );
    }

    let _ = writeln!(out, "Manøvrer: {}", r.maneuvers.len());
    for m in &r.maneuvers {
        let _ = writeln!(
            out,
            "  {}  {:.0}° → {:.0}° (Δ {:+.0}°, intensitet {:.0}°)",
            m.timestamp.format("%H:%M:%S"),
            m.cog_before,
            m.cog_after,
            m.delta_cog,
            m.intensity
        );
    }

    let _ = writeln!(out, "Strekk: {}", r.legs.len());
    for l in &r.legs {
        let _ = writeln!(
            out,
            "  {:<8} {:>6.0}s  SOG {:.2}  VMG {:+.2}  TWA {:+.0}°  {:.0} m",
            l.kind.as_str(),
            l.duration_s,
            l.sog_mean,
            l.vmg_mean,
            l.twa_mean,
            l.distance_m
        );
    }

    for (name, w) in [("Kryss", &r.upwind), ("Lens", &r.downwind)] {
        if let Some(w) = w {
            let _ = writeln!(
                out,
                "{name}: beste VMG {:+.2} kn ({}), dårligste {:+.2} kn ({})",
                w.best.vmg_mean,
                w.best.start.format("%H:%M:%S"),
                w.worst.vmg_mean,
                w.worst.start.format("%H:%M:%S")
            );
        }
    }

    let _ = writeln!(out, "COG-spredning: {}°", fmt_opt(r.cog_dispersion, 1));
    let modes: Vec<String> = r
        .cog_modes
        .iter()
        .map(|m| format!("{:.0}° ({:.0}%)", m.sector, m.pct))
        .collect();
    if !modes.is_empty() {
        let _ = writeln!(out, "Dominerende kurs: {}", modes.join(", "));
    }
    out
}

fn render_comparison(out: &mut String, c: &Comparison) {
    if !c.aligned {
        let _ = writeln!(out, "{} / {}: ingen felles tid", c.a, c.b);
        return;
    }
    match &c.separation {
        Some(s) => {
            let _ = writeln!(
                out,
                "{} / {} ({}): {:+.0} m → {:+.0} m ({:+.0} m)",
                c.a,
                c.b,
                s.kind,
                s.at_start,
                s.at_end,
                s.gain()
            );
        }
        None => {
            let _ = writeln!(out, "{} / {}: ingen avstand beregnet", c.a, c.b);
        }
    }
}

/// Tekstrapport for en hel økt.
pub fn render_session(r: &SessionReport) -> String {
    let mut out = String::new();
    for t in &r.tracks {
        match t {
            TrackOutcome::Analyzed(tr) => out.push_str(&render_track(tr)),
            TrackOutcome::Rejected { id, reason, .. } => {
                let _ = writeln!(out, "--- Track {id}: avvist ({reason}) ---");
            }
        }
    }
    if !r.comparisons.is_empty() {
        let _ = writeln!(out, "--- Sammenligning ---");
        for c in &r.comparisons {
            render_comparison(&mut out, c);
        }
    }
    if !r.deficits.is_empty() {
        let _ = writeln!(out, "--- Distanse ---");
        for d in &r.deficits {
            let _ = writeln!(out, "{}: {:.0} m (+{:.0} m)", d.track, d.distance_m, d.deficit_m);
        }
    }
    out
}
