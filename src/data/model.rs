use std::fmt;

use super::normalize::canonical_state;

// ---------------------------------------------------------------------------
// Indicator – the three headline columns used by every comparison
// ---------------------------------------------------------------------------

/// The indicators that feed benchmarks, deltas and the composite index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Indicator {
    CrimeRate,
    MurderRate,
    Chargesheeting,
}

impl Indicator {
    pub const ALL: [Indicator; 3] = [
        Indicator::CrimeRate,
        Indicator::MurderRate,
        Indicator::Chargesheeting,
    ];

    /// Short label used on chart axes and legends.
    pub fn label(self) -> &'static str {
        match self {
            Indicator::CrimeRate => "IPC Crime Rate",
            Indicator::MurderRate => "Murder Rate",
            Indicator::Chargesheeting => "Chargesheeting %",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Indicators – one optional value per headline indicator
// ---------------------------------------------------------------------------

/// A value per [`Indicator`]; `None` means "not available".
///
/// Used both for a row's own values and for a benchmark's means.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Indicators {
    pub crime_rate: Option<f64>,
    pub murder_rate: Option<f64>,
    pub chargesheeting: Option<f64>,
}

impl Indicators {
    pub fn get(&self, indicator: Indicator) -> Option<f64> {
        match indicator {
            Indicator::CrimeRate => self.crime_rate,
            Indicator::MurderRate => self.murder_rate,
            Indicator::Chargesheeting => self.chargesheeting,
        }
    }
}

// ---------------------------------------------------------------------------
// CrimeRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// One state / union territory.
#[derive(Debug, Clone, PartialEq)]
pub struct CrimeRecord {
    /// Name as spelled in the source file.
    pub state_ut: String,
    /// Rate of cognizable IPC crimes per lakh population.
    pub ipc_crime_rate: Option<f64>,
    /// Murders per lakh population.
    pub murder_rate: Option<f64>,
    /// Percentage of investigated cases that were chargesheeted.
    pub chargesheeting_rate: Option<f64>,
    /// Share of urban population (census).
    pub urbanization_rate: Option<f64>,
    /// Percentage of kidnapped persons recovered. Optional column.
    pub kidnap_recovery_pct: Option<f64>,
}

impl CrimeRecord {
    /// A record with only a name; all indicators missing.
    pub fn named(state_ut: impl Into<String>) -> Self {
        Self {
            state_ut: state_ut.into(),
            ipc_crime_rate: None,
            murder_rate: None,
            chargesheeting_rate: None,
            urbanization_rate: None,
            kidnap_recovery_pct: None,
        }
    }

    pub fn canonical_name(&self) -> String {
        canonical_state(&self.state_ut)
    }

    /// Totals rows ("Total (States)", "Total (All India)", ...).
    pub fn is_aggregate(&self) -> bool {
        let name = self.state_ut.to_lowercase();
        name.contains("total") || name.contains("all india")
    }

    /// The aggregate row carrying national figures.
    pub fn is_national_aggregate(&self) -> bool {
        self.is_aggregate() && self.state_ut.to_lowercase().contains("india")
    }

    pub fn indicators(&self) -> Indicators {
        Indicators {
            crime_rate: self.ipc_crime_rate,
            murder_rate: self.murder_rate,
            chargesheeting: self.chargesheeting_rate,
        }
    }

    pub fn value(&self, indicator: Indicator) -> Option<f64> {
        self.indicators().get(indicator)
    }
}

// ---------------------------------------------------------------------------
// CrimeDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// All rows in file order. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct CrimeDataset {
    records: Vec<CrimeRecord>,
}

impl CrimeDataset {
    /// Wrap already-validated records. The loader checks name uniqueness.
    pub fn from_records(records: Vec<CrimeRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CrimeRecord] {
        &self.records
    }

    /// Rows that describe a single state or UT.
    pub fn states(&self) -> impl Iterator<Item = &CrimeRecord> {
        self.records.iter().filter(|r| !r.is_aggregate())
    }

    /// Display names for state pickers, in file order.
    pub fn state_names(&self) -> Vec<String> {
        self.states().map(|r| r.state_ut.clone()).collect()
    }

    /// Find a row by any spelling of its name.
    pub fn find(&self, name: &str) -> Option<&CrimeRecord> {
        let wanted = canonical_state(name);
        self.records.iter().find(|r| r.canonical_name() == wanted)
    }

    pub fn national_aggregate(&self) -> Option<&CrimeRecord> {
        self.records.iter().find(|r| r.is_national_aggregate())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, ipc: f64) -> CrimeRecord {
        CrimeRecord {
            ipc_crime_rate: Some(ipc),
            ..CrimeRecord::named(name)
        }
    }

    #[test]
    fn test_aggregate_detection() {
        assert!(CrimeRecord::named("Total (States)").is_aggregate());
        assert!(CrimeRecord::named("TOTAL (ALL INDIA)").is_national_aggregate());
        assert!(!CrimeRecord::named("Total (UTs)").is_national_aggregate());
        assert!(!CrimeRecord::named("Kerala").is_aggregate());
    }

    #[test]
    fn test_find_by_any_spelling() {
        let ds = CrimeDataset::from_records(vec![record("Kerala", 1.0), record("Odisha", 2.0)]);
        let a = ds.find("Odisha").map(|r| r.ipc_crime_rate);
        let b = ds.find("  ORISSA ").map(|r| r.ipc_crime_rate);
        assert_eq!(a, Some(Some(2.0)));
        assert_eq!(a, b);
        assert!(ds.find("Goa").is_none());
    }

    #[test]
    fn test_state_names_skip_aggregates() {
        let ds = CrimeDataset::from_records(vec![
            record("Kerala", 1.0),
            record("Total (All India)", 2.0),
            record("Goa", 3.0),
        ]);
        assert_eq!(ds.state_names(), vec!["Kerala".to_string(), "Goa".to_string()]);
        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.national_aggregate().map(|r| r.state_ut.as_str()),
            Some("Total (All India)")
        );
    }
}
