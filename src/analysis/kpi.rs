use crate::data::model::CrimeRecord;

use super::classify::{CrimeCluster, PolicyPriority};
use super::compare::MISSING;

/// Text of the KPI cards for one state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiCards {
    pub state: String,
    pub crime_rate: String,
    pub murder_rate: String,
    pub chargesheeting: String,
    pub kidnap_recovery: String,
    pub cluster: String,
    pub priority: String,
}

impl KpiCards {
    pub fn for_record(record: &CrimeRecord) -> Self {
        Self {
            state: record.state_ut.clone(),
            crime_rate: record
                .ipc_crime_rate
                .map(|v| v.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            murder_rate: record
                .murder_rate
                .map(|v| format!("{v:.2} / lakh"))
                .unwrap_or_else(|| MISSING.to_string()),
            chargesheeting: record
                .chargesheeting_rate
                .map(|v| format!("{v:.1} %"))
                .unwrap_or_else(|| MISSING.to_string()),
            kidnap_recovery: record
                .kidnap_recovery_pct
                .map(|v| format!("{v:.1} %"))
                .unwrap_or_else(|| "Not Available".to_string()),
            cluster: CrimeCluster::classify(record).label().to_string(),
            priority: PolicyPriority::classify(record).label().to_string(),
        }
    }
}

/// One-line map tooltip values; `NA` for gaps.
pub fn tooltip_lines(name: &str, record: Option<&CrimeRecord>) -> Vec<String> {
    let show = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_else(|| "NA".to_string());
    vec![
        name.to_string(),
        format!("IPC: {}", show(record.and_then(|r| r.ipc_crime_rate))),
        format!("Murder: {}", show(record.and_then(|r| r.murder_rate))),
        format!("Chargesheeting: {}%", show(record.and_then(|r| r.chargesheeting_rate))),
    ]
}
