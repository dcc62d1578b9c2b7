use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{CrimeDataset, CrimeRecord};
use super::normalize::canonical_state;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV is missing required column '{0}'")]
    MissingColumn(String),
    #[error("rows {first} and {second} both name the state '{canonical}'")]
    DuplicateState {
        canonical: String,
        first: usize,
        second: usize,
    },
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Header names of the dataset columns.
///
/// Resolved once per load; the record type never sees a header string.
/// `urbanization_rate` and `kidnap_recovery_pct` are optional: when the
/// header is absent the field is `None` on every row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub state: String,
    pub ipc_crime_rate: String,
    pub murder_rate: String,
    pub chargesheeting_rate: String,
    pub urbanization_rate: String,
    pub kidnap_recovery_pct: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            state: "state_ut".into(),
            ipc_crime_rate: "Rate of Cognizable Crimes (IPC) (2022)".into(),
            murder_rate: "murder_rate_2022".into(),
            chargesheeting_rate: "Chargesheeting Rate (2022)".into(),
            urbanization_rate: "urbanization_rate_2011".into(),
            kidnap_recovery_pct: "kidnap_recovery_percent_2022".into(),
        }
    }
}

/// Column positions after matching a header row against a [`ColumnMapping`].
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    state: usize,
    ipc_crime_rate: usize,
    murder_rate: usize,
    chargesheeting_rate: usize,
    urbanization_rate: Option<usize>,
    kidnap_recovery_pct: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord, mapping: &ColumnMapping) -> Result<Self, LoadError> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);
        let required = |name: &str| {
            position(name).ok_or_else(|| LoadError::MissingColumn(name.to_string()))
        };

        let index = ColumnIndex {
            state: required(&mapping.state)?,
            ipc_crime_rate: required(&mapping.ipc_crime_rate)?,
            murder_rate: required(&mapping.murder_rate)?,
            chargesheeting_rate: required(&mapping.chargesheeting_rate)?,
            urbanization_rate: position(&mapping.urbanization_rate),
            kidnap_recovery_pct: position(&mapping.kidnap_recovery_pct),
        };
        if index.urbanization_rate.is_none() {
            log::warn!(
                "column '{}' not found, clusters use crime and murder rates only",
                mapping.urbanization_rate
            );
        }
        if index.kidnap_recovery_pct.is_none() {
            log::warn!(
                "column '{}' not found, kidnap recovery shown as not available",
                mapping.kidnap_recovery_pct
            );
        }
        Ok(index)
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the dataset from a CSV file.
pub fn load_file(path: &Path, mapping: &ColumnMapping) -> Result<CrimeDataset, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_dataset(file, mapping)
}

/// Parse a dataset from any CSV source.
///
/// Rows with an empty name are skipped. Numeric cells that are empty or do
/// not parse become `None`.
pub fn read_dataset<R: Read>(
    source: R,
    mapping: &ColumnMapping,
) -> Result<CrimeDataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::resolve(&headers, mapping)?;

    let mut records = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result?;
        let name = row.get(columns.state).unwrap_or("").trim();
        if name.is_empty() {
            log::debug!("skipping row {row_no}: empty state name");
            continue;
        }

        let canonical = canonical_state(name);
        if let Some(&first) = seen.get(&canonical) {
            return Err(LoadError::DuplicateState {
                canonical,
                first,
                second: row_no,
            });
        }
        seen.insert(canonical, row_no);

        let number = |idx: Option<usize>| idx.and_then(|i| row.get(i)).and_then(parse_number);

        records.push(CrimeRecord {
            state_ut: name.to_string(),
            ipc_crime_rate: number(Some(columns.ipc_crime_rate)),
            murder_rate: number(Some(columns.murder_rate)),
            chargesheeting_rate: number(Some(columns.chargesheeting_rate)),
            urbanization_rate: number(columns.urbanization_rate),
            kidnap_recovery_pct: number(columns.kidnap_recovery_pct),
        });
    }

    Ok(CrimeDataset::from_records(records))
}

/// Parse a numeric cell. Thousands separators and a trailing `%` are
/// tolerated; anything else non-numeric is a gap.
fn parse_number(cell: &str) -> Option<f64> {
    let cleaned: String = cell
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "state_ut,Rate of Cognizable Crimes (IPC) (2022),murder_rate_2022,Chargesheeting Rate (2022),urbanization_rate_2011,kidnap_recovery_percent_2022";

    fn parse(body: &str) -> Result<CrimeDataset, LoadError> {
        let text = format!("{HEADER}\n{body}");
        read_dataset(text.as_bytes(), &ColumnMapping::default())
    }

    #[test]
    fn test_parse_rows() {
        let ds = parse("Delhi,1518.2,2.4,30.1,97.5,71.3\nKerala,660.8,0.9,95.4,47.7,\n").unwrap();
        assert_eq!(ds.len(), 2);
        let delhi = ds.find("NCT of Delhi").unwrap();
        assert_eq!(delhi.ipc_crime_rate, Some(1518.2));
        assert_eq!(delhi.kidnap_recovery_pct, Some(71.3));
        let kerala = ds.find("kerala").unwrap();
        assert_eq!(kerala.kidnap_recovery_pct, None);
        assert_eq!(kerala.urbanization_rate, Some(47.7));
    }

    #[test]
    fn test_non_numeric_cells_become_gaps() {
        let ds = parse("Goa,n/a,\"1,234.5\",85%,,\n").unwrap();
        let goa = ds.find("Goa").unwrap();
        assert_eq!(goa.ipc_crime_rate, None);
        assert_eq!(goa.murder_rate, Some(1234.5));
        assert_eq!(goa.chargesheeting_rate, Some(85.0));
        assert_eq!(goa.urbanization_rate, None);
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let text = "state_ut,Rate of Cognizable Crimes (IPC) (2022),murder_rate_2022,Chargesheeting Rate (2022)\nGoa,1,2,3\n";
        let ds = read_dataset(text.as_bytes(), &ColumnMapping::default()).unwrap();
        let goa = ds.find("Goa").unwrap();
        assert_eq!(goa.urbanization_rate, None);
        assert_eq!(goa.kidnap_recovery_pct, None);
    }

    #[test]
    fn test_missing_required_column() {
        let text = "state_ut,murder_rate_2022\nGoa,1\n";
        let err = read_dataset(text.as_bytes(), &ColumnMapping::default()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(c) if c.contains("IPC")));
    }

    #[test]
    fn test_duplicate_canonical_names_rejected() {
        let err = parse("Odisha,1,1,1,1,1\nOrissa,2,2,2,2,2\n").unwrap_err();
        assert!(matches!(err, LoadError::DuplicateState { first: 0, second: 1, .. }));
    }

    #[test]
    fn test_blank_names_skipped_and_order_kept() {
        let ds = parse("Goa,1,1,1,1,1\n,2,2,2,2,2\nTotal (All India),3,3,3,3,3\n").unwrap();
        let names: Vec<_> = ds.records().iter().map(|r| r.state_ut.as_str()).collect();
        assert_eq!(names, vec!["Goa", "Total (All India)"]);
    }

    #[test]
    fn test_custom_mapping() {
        let mapping = ColumnMapping {
            state: "State".into(),
            ipc_crime_rate: "ipc".into(),
            murder_rate: "murder".into(),
            chargesheeting_rate: "charge".into(),
            ..ColumnMapping::default()
        };
        let ds = read_dataset("State,ipc,murder,charge\nGoa,1,2,3\n".as_bytes(), &mapping).unwrap();
        assert_eq!(ds.find("goa").and_then(|r| r.chargesheeting_rate), Some(3.0));
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("crime-atlas-does-not-exist.csv");
        let err = load_file(&path, &ColumnMapping::default()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
