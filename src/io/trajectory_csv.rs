//! Trajectory CSV reader (§4.8/§6): `longitude;latitude;timestamp`,
//! `;`-delimited, timestamp in ISO-8601 UTC `yyyy-MM-ddTHH:mm:ssZ`.
//! Malformed rows are rejected; blank lines are skipped.

use std::path::Path;

use chrono::{DateTime, Utc};
use csv::ReaderBuilder;

use crate::geometry::GeometryFactory;
use crate::observation::Observation;

use super::error::IoError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

fn parse_row(line: usize, record: &csv::StringRecord, factory: GeometryFactory) -> Result<Observation, IoError> {
    if record.len() != 3 {
        return Err(IoError::MalformedRow {
            line,
            reason: format!("expected 3 fields, got {}", record.len()),
        });
    }
    let longitude: f64 = record[0]
        .parse()
        .map_err(|_| IoError::MalformedRow { line, reason: format!("invalid longitude: {}", &record[0]) })?;
    let latitude: f64 = record[1]
        .parse()
        .map_err(|_| IoError::MalformedRow { line, reason: format!("invalid latitude: {}", &record[1]) })?;
    let at = DateTime::parse_from_str(&record[2], TIMESTAMP_FORMAT)
        .map_err(|e| IoError::MalformedRow { line, reason: format!("invalid timestamp: {e}") })?
        .with_timezone(&Utc);

    let point = factory.create_point(longitude, latitude)?;
    Ok(Observation::new(point, at))
}

/// Reads an ordered trajectory from `path`. Rows are assumed to already be
/// in timestamp order (§3); this reader does not sort them.
pub fn read_trajectory(path: &Path, factory: GeometryFactory) -> Result<Vec<Observation>, IoError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut observations = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        observations.push(parse_row(line, &record, factory)?);
    }
    Ok(observations)
}
