use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::json_api;

// ──────────────────────────────────────────────────────────────────────────────
// PyO3-MODUL
// ──────────────────────────────────────────────────────────────────────────────

/// Hel økt: JSON inn, rapport som JSON ut.
#[pyfunction]
fn analyze_session_json(json_in: &str) -> PyResult<String> {
    json_api::analyze_session_json(json_in).map_err(|e| PyValueError::new_err(format!("{e:#}")))
}

/// Berik punkter med TWA/VMG for en gitt TWD.
#[pyfunction]
fn enrich_json(json_in: &str) -> PyResult<String> {
    json_api::enrich_json(json_in).map_err(|e| PyValueError::new_err(format!("{e:#}")))
}

#[pyfunction]
fn metrics_text() -> String {
    crate::telemetry::gather_text()
}

#[pymodule]
fn sailgraph_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(analyze_session_json, m)?)?;
    m.add_function(wrap_pyfunction!(enrich_json, m)?)?;
    m.add_function(wrap_pyfunction!(metrics_text, m)?)?;
    Ok(())
}
