//! CSV ingest for batch uploads.
//!
//! Turns a heterogeneous candidate-list CSV into per-row observations ready
//! for the batch orchestrator.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors up front)
//! - **Row-level tolerance**: a malformed cell fails only its own row; the
//!   failure is carried as a parse-error row so the batch report still
//!   covers every input line in order
//! - **Deterministic behavior** (no hidden coercions beyond trimming)

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::batch::BatchRow;
use crate::domain::{PlanetParams, RawObservation, StarParams, TransitParams, VettingFlags};
use crate::error::PipelineError;

/// Columns every upload must carry.
const REQUIRED_COLUMNS: [&str; 3] = ["koi_period", "koi_depth", "koi_duration"];

/// Load a candidate CSV into batch rows.
///
/// Fails outright only on file-level problems (unreadable file, missing
/// required columns); cell-level problems become per-row parse errors.
pub fn load_batch_rows(path: &Path) -> Result<Vec<BatchRow>, PipelineError> {
    let file = File::open(path).map_err(|e| {
        PipelineError::Io(format!("failed to open CSV '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| PipelineError::Io(format!("failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    for col in REQUIRED_COLUMNS {
        if !header_map.contains_key(col) {
            return Err(PipelineError::Io(format!(
                "CSV is missing required column '{col}'"
            )));
        }
    }

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let row = match record {
            Ok(record) => match parse_row(&record, &header_map) {
                Ok(obs) => BatchRow::new(i, obs),
                Err(message) => BatchRow::parse_error(i, message),
            },
            Err(e) => BatchRow::parse_error(i, format!("unreadable CSV record: {e}")),
        };
        rows.push(row);
    }
    Ok(rows)
}

/// Map lowercase header name -> column position.
fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_ascii_lowercase(), i))
        .collect()
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<RawObservation, String> {
    let field = |name: &str| -> Result<Option<f64>, String> {
        let Some(&col) = header_map.get(name) else {
            return Ok(None);
        };
        let Some(raw) = record.get(col) else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse::<f64>()
            .map(Some)
            .map_err(|_| format!("column '{name}': '{raw}' is not a number"))
    };

    let transit = TransitParams {
        period: field("koi_period")?,
        depth: field("koi_depth")?,
        duration: field("koi_duration")?,
        impact: field("koi_impact")?,
        model_snr: field("koi_model_snr")?,
    };

    let planet = PlanetParams {
        radius: field("koi_prad")?,
        equilibrium_temp: field("koi_teq")?,
        insolation: field("koi_insol")?,
    };

    let star = StarParams {
        effective_temp: field("koi_steff")?,
        surface_gravity: field("koi_slogg")?,
        radius: field("koi_srad")?,
    };

    let flags = VettingFlags {
        not_transit_like: field("koi_fpflag_nt")?,
        stellar_eclipse: field("koi_fpflag_ss")?,
        centroid_offset: field("koi_fpflag_co")?,
        ephemeris_match: field("koi_fpflag_ec")?,
        disposition_score: field("koi_score")?,
    };

    Ok(RawObservation {
        transit,
        planet: Some(planet),
        star: Some(star),
        flags: Some(flags),
    })
}
