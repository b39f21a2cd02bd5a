//! Tellere for motorens aktivitet. Påvirker aldri resultatene.

use log::warn;
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

const PREFIX: &str = "sailgraph";

pub struct EngineMetrics {
    registry: Registry,
    pub tracks_built: IntCounter,
    pub tracks_rejected: IntCounterVec,
    pub maneuvers_detected: IntCounter,
    pub legs_built: IntCounter,
}

impl EngineMetrics {
    fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        let tracks_built = IntCounter::new(format!("{PREFIX}_tracks_built_total"), "Track ferdig analysert")?;
        let tracks_rejected = IntCounterVec::new(
            Opts::new(format!("{PREFIX}_tracks_rejected_total"), "Track avvist ved validering"),
            &["reason"],
        )?;
        let maneuvers_detected = IntCounter::new(format!("{PREFIX}_maneuvers_detected_total"), "Manøvrer funnet")?;
        let legs_built = IntCounter::new(format!("{PREFIX}_legs_built_total"), "Strekk bygget")?;

        registry.register(Box::new(tracks_built.clone()))?;
        registry.register(Box::new(tracks_rejected.clone()))?;
        registry.register(Box::new(maneuvers_detected.clone()))?;
        registry.register(Box::new(legs_built.clone()))?;

        Ok(Self {
            registry,
            tracks_built,
            tracks_rejected,
            maneuvers_detected,
            legs_built,
        })
    }
}

static METRICS: Lazy<Option<EngineMetrics>> = Lazy::new(|| match EngineMetrics::new() {
    Ok(m) => Some(m),
    Err(e) => {
        warn!("[telemetry] kunne ikke opprette tellere: {e}");
        None
    }
});

pub fn metrics() -> Option<&'static EngineMetrics> {
    METRICS.as_ref()
}

pub fn track_built() {
    if let Some(m) = metrics() {
        m.tracks_built.inc();
    }
}

pub fn track_rejected(reason: &str) {
    if let Some(m) = metrics() {
        m.tracks_rejected.with_label_values(&[reason]).inc();
    }
}

pub fn maneuvers_detected(n: usize) {
    if let Some(m) = metrics() {
        m.maneuvers_detected.inc_by(n as u64);
    }
}

pub fn legs_built(n: usize) {
    if let Some(m) = metrics() {
        m.legs_built.inc_by(n as u64);
    }
}

/// Tellerne i Prometheus tekstformat.
pub fn gather_text() -> String {
    let Some(m) = metrics() else {
        return String::new();
    };
    let mut buf = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&m.registry.gather(), &mut buf) {
        warn!("[telemetry] koding feilet: {e}");
        return String::new();
    }
    String::from_utf8_lossy(&buf).into_owned()
}
