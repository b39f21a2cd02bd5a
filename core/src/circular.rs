//! Sirkulær statistikk for vinkler i grader.
//!
//! Kurs (COG) og vindvinkel (TWA) går rundt ved 0/360, så gjennomsnitt og spredning
//! må regnes på enhetsvektorer. Et aritmetisk snitt av 350° og 10° gir 180°, ikke 0°.

use ordered_float::OrderedFloat;

/// Normaliser vinkel til [0, 360)
#[inline]
pub fn normalize_deg(d: f64) -> f64 {
    let x = d.rem_euclid(360.0);
    // rem_euclid kan returnere 360.0 for svært små negative verdier
    if x >= 360.0 {
        0.0
    } else {
        x
    }
}

/// Vinkel foldet til [-180, 180)
#[inline]
pub fn to_signed_deg(d: f64) -> f64 {
    normalize_deg(d + 180.0) - 180.0
}

/// Minste signerte vinkelforskjell a − b, i [-180, 180).
#[inline]
pub fn circular_diff(a: f64, b: f64) -> f64 {
    to_signed_deg(a - b)
}

/// Summen av enhetsvektorer (sin, cos) for vinklene.
fn resultant<I: IntoIterator<Item = f64>>(angles: I) -> (f64, f64, usize) {
    let mut s = 0.0;
    let mut c = 0.0;
    let mut n = 0usize;
    for a in angles {
        let r = a.to_radians();
        s += r.sin();
        c += r.cos();
        n += 1;
    }
    (s, c, n)
}

/// Sirkulært gjennomsnitt i [0, 360). `None` for tom input.
pub fn circular_mean(angles: &[f64]) -> Option<f64> {
    circular_mean_iter(angles.iter().copied())
}

pub fn circular_mean_iter<I: IntoIterator<Item = f64>>(angles: I) -> Option<f64> {
    let (s, c, n) = resultant(angles);
    if n == 0 {
        return None;
    }
    Some(normalize_deg(s.atan2(c).to_degrees()))
}

/// Signert sirkulært gjennomsnitt i [-180, 180) (brukes for TWA).
pub fn circular_mean_signed(angles: &[f64]) -> Option<f64> {
    circular_mean(angles).map(to_signed_deg)
}

/// Lengden av middelresultanten R ∈ [0, 1].
pub fn mean_resultant_length(angles: &[f64]) -> Option<f64> {
    let (s, c, n) = resultant(angles.iter().copied());
    if n == 0 {
        return None;
    }
    Some(((s * s + c * c).sqrt() / n as f64).min(1.0))
}

/// Sirkulært standardavvik i grader: sqrt(-2 ln R).
pub fn circular_std(angles: &[f64]) -> Option<f64> {
    let r = mean_resultant_length(angles)?;
    // R = 0 (helt uniform fordeling) gir uendelig std; klem for å holde tallet endelig
    let r = r.clamp(1e-12, 1.0);
    Some((-2.0 * r.ln()).sqrt().to_degrees())
}

/// Sirkulær median: vinkelen blant prøvene med minst sum av absolutte buer til de andre.
/// Ved likhet vinner den første.
pub fn circular_median(angles: &[f64]) -> Option<f64> {
    let vals: Vec<f64> = angles.iter().copied().map(normalize_deg).collect();
    let mut best: Option<(f64, f64)> = None;
    for &cand in &vals {
        let cost: f64 = vals.iter().map(|&v| circular_diff(v, cand).abs()).sum();
        match best {
            Some((_, c)) if cost >= c => {}
            _ => best = Some((cand, cost)),
        }
    }
    best.map(|(a, _)| a)
}

/// Korteste bue som dekker alle vinklene: (min, max, span) i grader.
/// Bruddet legges der gapet mellom nabovinkler er størst.
pub fn circular_min_max(angles: &[f64]) -> Option<(f64, f64, f64)> {
    let mut vals: Vec<f64> = angles
        .iter()
        .copied()
        .filter(|a| a.is_finite())
        .map(normalize_deg)
        .collect();
    if vals.is_empty() {
        return None;
    }
    vals.sort_by_key(|v| OrderedFloat(*v));

    let n = vals.len();
    let mut cut = 0usize;
    let mut widest = f64::NEG_INFINITY;
    for i in 0..n {
        let next = if i + 1 < n { vals[i + 1] } else { vals[0] + 360.0 };
        let gap = next - vals[i];
        if gap > widest {
            widest = gap;
            cut = i;
        }
    }
    let min = vals[(cut + 1) % n];
    let max = vals[cut];
    let span = normalize_deg(max - min);
    Some((min, max, span))
}
