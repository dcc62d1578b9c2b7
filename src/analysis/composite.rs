use crate::data::model::{CrimeDataset, Indicator};

use super::filter::{filtered_rows, RowFilter};

const CRIME_WEIGHT: f64 = 0.4;
const MURDER_WEIGHT: f64 = 0.3;
const CHARGE_WEIGHT: f64 = 0.3;

/// Composite crime index of one state, with its scaled components.
///
/// Every score is on a 0–100 scale where higher is better.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeIndex {
    pub crime_score: f64,
    pub murder_score: f64,
    pub charge_score: f64,
    /// Weighted blend of the three scores, rounded.
    pub value: u8,
}

/// Observed `(min, max)` of an indicator over state rows, ignoring gaps.
pub fn range_of(dataset: &CrimeDataset, indicator: Indicator) -> Option<(f64, f64)> {
    filtered_rows(dataset, &RowFilter::all_states())
        .into_iter()
        .filter_map(|r| r.value(indicator))
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })
}

/// Min-max scale `value` into 0–100. `None` for a zero-width range.
fn scale(value: f64, (min, max): (f64, f64), higher_is_better: bool) -> Option<f64> {
    let span = max - min;
    if span <= 0.0 || !span.is_finite() {
        return None;
    }
    let score = if higher_is_better {
        (value - min) / span
    } else {
        (max - value) / span
    };
    Some(100.0 * score)
}

/// Composite index of `state` relative to every other state.
///
/// `None` if the state is unknown or an aggregate row, if it lacks any of
/// the three indicators, or if an indicator is constant across states.
pub fn composite_index(dataset: &CrimeDataset, state: &str) -> Option<CompositeIndex> {
    let record = dataset.find(state).filter(|r| !r.is_aggregate())?;

    let score = |indicator: Indicator, higher_is_better: bool| {
        let value = record.value(indicator).filter(|v| v.is_finite())?;
        scale(value, range_of(dataset, indicator)?, higher_is_better)
    };

    let crime_score = score(Indicator::CrimeRate, false)?;
    let murder_score = score(Indicator::MurderRate, false)?;
    let charge_score = score(Indicator::Chargesheeting, true)?;

    let blended =
        CRIME_WEIGHT * crime_score + MURDER_WEIGHT * murder_score + CHARGE_WEIGHT * charge_score;

    Some(CompositeIndex {
        crime_score,
        murder_score,
        charge_score,
        value: blended.round().clamp(0.0, 100.0) as u8,
    })
}
