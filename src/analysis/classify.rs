use std::fmt;

use crate::data::model::CrimeRecord;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

const VERY_HIGH_CRIME: f64 = 700.0;
const VERY_HIGH_URBAN: f64 = 40.0;
const VERY_HIGH_MURDER: f64 = 3.0;
const HIGH_CRIME: f64 = 500.0;
const HIGH_URBAN: f64 = 30.0;
const HIGH_MURDER: f64 = 2.0;
const MODERATE_CRIME: f64 = 300.0;

const CRITICAL_CRIME: f64 = 600.0;
const CRITICAL_CHARGE: f64 = 60.0;
const CRITICAL_MURDER: f64 = 3.0;
const HIGH_PRIORITY_CRIME: f64 = 400.0;
const HIGH_PRIORITY_CHARGE: f64 = 70.0;
const MODERATE_PRIORITY_CRIME: f64 = 250.0;

/// `value > threshold`; a missing value never passes.
fn above(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v > threshold)
}

/// `value < threshold`; a missing value never passes.
fn below(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v < threshold)
}

// ---------------------------------------------------------------------------
// Crime cluster
// ---------------------------------------------------------------------------

/// Coarse crime-severity category, declared most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CrimeCluster {
    VeryHigh,
    High,
    Moderate,
    Low,
}

impl CrimeCluster {
    pub const ALL: [CrimeCluster; 4] = [
        CrimeCluster::VeryHigh,
        CrimeCluster::High,
        CrimeCluster::Moderate,
        CrimeCluster::Low,
    ];

    /// First matching rule wins.
    pub fn classify(record: &CrimeRecord) -> Self {
        let ipc = record.ipc_crime_rate;
        let urban = record.urbanization_rate;
        let murder = record.murder_rate;

        if above(ipc, VERY_HIGH_CRIME)
            && above(urban, VERY_HIGH_URBAN)
            && above(murder, VERY_HIGH_MURDER)
        {
            CrimeCluster::VeryHigh
        } else if above(ipc, HIGH_CRIME)
            && (above(urban, HIGH_URBAN) || above(murder, HIGH_MURDER))
        {
            CrimeCluster::High
        } else if above(ipc, MODERATE_CRIME) {
            CrimeCluster::Moderate
        } else {
            CrimeCluster::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CrimeCluster::VeryHigh => "Very High Crime & Urban Stress",
            CrimeCluster::High => "High Crime Pressure",
            CrimeCluster::Moderate => "Moderate Crime Risk",
            CrimeCluster::Low => "Low Crime Stable",
        }
    }
}

impl fmt::Display for CrimeCluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Policy priority
// ---------------------------------------------------------------------------

/// Intervention urgency, declared most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PolicyPriority {
    Critical,
    High,
    Moderate,
    Low,
}

impl PolicyPriority {
    pub const ALL: [PolicyPriority; 4] = [
        PolicyPriority::Critical,
        PolicyPriority::High,
        PolicyPriority::Moderate,
        PolicyPriority::Low,
    ];

    /// First matching rule wins.
    pub fn classify(record: &CrimeRecord) -> Self {
        let ipc = record.ipc_crime_rate;
        let charge = record.chargesheeting_rate;
        let murder = record.murder_rate;

        if above(ipc, CRITICAL_CRIME)
            && below(charge, CRITICAL_CHARGE)
            && above(murder, CRITICAL_MURDER)
        {
            PolicyPriority::Critical
        } else if above(ipc, HIGH_PRIORITY_CRIME) && below(charge, HIGH_PRIORITY_CHARGE) {
            PolicyPriority::High
        } else if above(ipc, MODERATE_PRIORITY_CRIME) {
            PolicyPriority::Moderate
        } else {
            PolicyPriority::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PolicyPriority::Critical => "Critical Priority",
            PolicyPriority::High => "High Priority",
            PolicyPriority::Moderate => "Moderate Priority",
            PolicyPriority::Low => "Low Priority",
        }
    }
}

impl fmt::Display for PolicyPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
