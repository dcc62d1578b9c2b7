use crate::data::model::{CrimeDataset, CrimeRecord, Indicator, Indicators};
use crate::data::normalize::same_state;

use super::benchmark::{benchmark, Benchmark, BenchmarkMode};
use super::composite::{composite_index, CompositeIndex};

/// Year the headline indicators refer to.
pub const DATA_YEAR: u16 = 2022;

/// Placeholder for a value that cannot be shown.
pub const MISSING: &str = "—";

// ---------------------------------------------------------------------------
// Deltas
// ---------------------------------------------------------------------------

/// Relative difference of `value` from `bench`, in percent.
pub fn percent_delta(value: Option<f64>, bench: Option<f64>) -> Option<f64> {
    let (value, bench) = (value?, bench?);
    if bench == 0.0 || !bench.is_finite() || !value.is_finite() {
        return None;
    }
    Some((value - bench) / bench * 100.0)
}

pub fn format_delta(delta: Option<f64>) -> String {
    delta
        .map(|d| format!("{d:.1}%"))
        .unwrap_or_else(|| MISSING.to_string())
}

// ---------------------------------------------------------------------------
// Insight text
// ---------------------------------------------------------------------------

/// Templated policy reading of a state against its benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct Insight {
    pub title: String,
    pub sentences: Vec<String>,
    pub composite_line: String,
}

impl Insight {
    pub fn build(
        state: &str,
        values: &Indicators,
        bench: Option<&Benchmark>,
        composite: Option<&CompositeIndex>,
    ) -> Self {
        let title = format!("{state} - Policy Interpretation ({DATA_YEAR})");

        let sentences = match bench {
            None => vec![format!("No benchmark is available for {state} in this mode.")],
            Some(bench) => Indicator::ALL
                .iter()
                .map(|&ind| sentence(ind, values.get(ind), bench.get(ind)))
                .collect(),
        };

        let composite_line = match composite {
            Some(c) => format!("Composite Crime Index: {} / 100", c.value),
            None => "Composite Crime Index: Not Available".to_string(),
        };

        Self {
            title,
            sentences,
            composite_line,
        }
    }

    /// Plain-text rendering, one paragraph per line.
    pub fn to_text(&self) -> String {
        let mut out = self.title.clone();
        out.push_str("\n\n");
        out.push_str(&self.sentences.join(" "));
        out.push_str("\n\n");
        out.push_str(&self.composite_line);
        out
    }
}

fn sentence(indicator: Indicator, value: Option<f64>, bench: Option<f64>) -> String {
    let (Some(value), Some(bench)) = (value, bench) else {
        return format!("{} cannot be assessed (data not available).", indicator.label());
    };
    match indicator {
        Indicator::CrimeRate => format!(
            "IPC crime pressure is {} benchmark.",
            if value > bench { "above" } else { "below" }
        ),
        Indicator::MurderRate => format!(
            "Murder trends are {}.",
            if value > bench { "concerning" } else { "relatively controlled" }
        ),
        Indicator::Chargesheeting => format!(
            "Chargesheeting performance is {}.",
            if value < bench { "weaker" } else { "stronger" }
        ),
    }
}

// ---------------------------------------------------------------------------
// State vs benchmark
// ---------------------------------------------------------------------------

/// Everything the comparison tab shows for the primary state.
#[derive(Debug, Clone, PartialEq)]
pub struct StateComparison {
    pub state: String,
    pub mode: BenchmarkMode,
    pub values: Indicators,
    pub benchmark: Option<Benchmark>,
    pub composite: Option<CompositeIndex>,
    pub insight: Insight,
}

impl StateComparison {
    /// `None` when `state` is not in the dataset.
    pub fn build(dataset: &CrimeDataset, state: &str, mode: BenchmarkMode) -> Option<Self> {
        let record = dataset.find(state)?;
        let values = record.indicators();
        let bench = benchmark(dataset, state, mode);
        let composite = composite_index(dataset, state);
        let insight = Insight::build(&record.state_ut, &values, bench.as_ref(), composite.as_ref());

        Some(Self {
            state: record.state_ut.clone(),
            mode,
            values,
            benchmark: bench,
            composite,
            insight,
        })
    }

    pub fn delta(&self, indicator: Indicator) -> Option<f64> {
        percent_delta(
            self.values.get(indicator),
            self.benchmark.as_ref().and_then(|b| b.get(indicator)),
        )
    }
}

/// Header line above the benchmark chart.
pub fn subtitle(state: &str, mode: BenchmarkMode) -> String {
    format!("Comparing {state} with {} ({DATA_YEAR})", mode.label())
}

// ---------------------------------------------------------------------------
// Multi-state comparison
// ---------------------------------------------------------------------------

/// Rows for the multi-state chart.
///
/// The primary state and unknown names are dropped; fewer than two remaining
/// rows means there is nothing to compare.
pub fn multi_state_rows<'a, S: AsRef<str>>(
    dataset: &'a CrimeDataset,
    primary: Option<&str>,
    selected: &[S],
) -> Option<Vec<&'a CrimeRecord>> {
    let mut rows: Vec<&CrimeRecord> = Vec::new();
    for name in selected {
        let name = name.as_ref();
        if primary.is_some_and(|p| same_state(p, name)) {
            continue;
        }
        if let Some(row) = dataset.find(name).filter(|r| !r.is_aggregate()) {
            if !rows.iter().any(|r| std::ptr::eq(*r, row)) {
                rows.push(row);
            }
        }
    }
    (rows.len() >= 2).then_some(rows)
}
