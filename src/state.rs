use std::collections::BTreeSet;

use eframe::egui::Color32;

use crate::analysis::benchmark::BenchmarkMode;
use crate::analysis::compare::{self, StateComparison};
use crate::analysis::kpi::KpiCards;
use crate::color::MapMode;
use crate::data::boundaries::StateBoundaries;
use crate::data::gallery::Gallery;
use crate::data::model::{CrimeDataset, CrimeRecord};
use crate::data::normalize::same_state;

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    PolicyMaps,
    PolicyCharts,
    Comparison,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::PolicyMaps, Tab::PolicyCharts, Tab::Comparison];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::PolicyMaps => "Policy Maps",
            Tab::PolicyCharts => "Policy Charts",
            Tab::Comparison => "State Comparison",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
///
/// Every UI event is one of the handler methods below; views read the
/// derived accessors, which recompute from the dataset on each call.
pub struct DashboardState {
    /// Loaded dataset (None until the startup load finishes).
    pub dataset: Option<CrimeDataset>,

    /// State polygons for the choropleth.
    pub boundaries: Option<StateBoundaries>,

    /// Static policy map / chart images.
    pub gallery: Gallery,

    pub active_tab: Tab,

    /// Primary state, as spelled in the dataset.
    pub selected_state: Option<String>,

    pub map_mode: MapMode,

    pub benchmark_mode: BenchmarkMode,

    /// States picked for the multi-state chart; never holds the primary state.
    pub compared_states: BTreeSet<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a load is in progress.
    pub loading: bool,

    /// State to select when a dataset arrives.
    pub default_state: String,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            dataset: None,
            boundaries: None,
            gallery: Gallery::default(),
            active_tab: Tab::default(),
            selected_state: None,
            map_mode: MapMode::default(),
            benchmark_mode: BenchmarkMode::default(),
            compared_states: BTreeSet::new(),
            status_message: None,
            loading: false,
            default_state: "Delhi".to_string(),
        }
    }
}

impl DashboardState {
    pub fn new(default_state: impl Into<String>) -> Self {
        Self {
            default_state: default_state.into(),
            ..Self::default()
        }
    }

    /// Ingest a newly loaded dataset and pick the initial state.
    pub fn set_dataset(&mut self, dataset: CrimeDataset) {
        let initial = dataset
            .find(&self.default_state)
            .filter(|r| !r.is_aggregate())
            .or_else(|| dataset.states().next())
            .map(|r| r.state_ut.clone());

        self.status_message = dataset
            .is_empty()
            .then(|| "Dataset contains no rows".to_string());
        self.selected_state = initial;
        self.compared_states.clear();
        self.dataset = Some(dataset);
        self.loading = false;
    }

    pub fn set_boundaries(&mut self, boundaries: StateBoundaries) {
        self.boundaries = Some(boundaries);
    }

    pub fn set_error(&mut self, message: String) {
        self.status_message = Some(message);
        self.loading = false;
    }

    // -- handlers --

    /// Select the primary state by any spelling. Unknown names are ignored.
    pub fn select_state(&mut self, name: &str) {
        let Some(record) = self.dataset.as_ref().and_then(|d| d.find(name)) else {
            log::debug!("ignoring selection of unknown state '{name}'");
            return;
        };
        if record.is_aggregate() {
            return;
        }
        let display = record.state_ut.clone();
        self.compared_states.retain(|s| !same_state(s, &display));
        self.selected_state = Some(display);
    }

    pub fn set_benchmark_mode(&mut self, mode: BenchmarkMode) {
        self.benchmark_mode = mode;
    }

    pub fn set_map_mode(&mut self, mode: MapMode) {
        self.map_mode = mode;
    }

    pub fn open_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// Add or remove a state from the multi-state chart.
    pub fn toggle_compared_state(&mut self, name: &str) {
        if self.selected_state.as_deref().is_some_and(|p| same_state(p, name)) {
            return;
        }
        if let Some(existing) = self.compared_states.iter().find(|s| same_state(s, name)).cloned() {
            self.compared_states.remove(&existing);
        } else {
            self.compared_states.insert(name.to_string());
        }
    }

    // -- derived views --

    pub fn selected_record(&self) -> Option<&CrimeRecord> {
        let name = self.selected_state.as_deref()?;
        self.dataset.as_ref()?.find(name)
    }

    /// Names for the primary picker.
    pub fn state_options(&self) -> Vec<String> {
        self.dataset
            .as_ref()
            .map(|d| d.state_names())
            .unwrap_or_default()
    }

    /// Names for the multi-state picker: every state but the primary.
    pub fn compare_options(&self) -> Vec<String> {
        let primary = self.selected_state.as_deref();
        self.state_options()
            .into_iter()
            .filter(|s| !primary.is_some_and(|p| same_state(p, s)))
            .collect()
    }

    pub fn kpis(&self) -> Option<KpiCards> {
        self.selected_record().map(KpiCards::for_record)
    }

    pub fn subtitle(&self) -> String {
        let state = self.selected_state.as_deref().unwrap_or("Selected State");
        compare::subtitle(state, self.benchmark_mode)
    }

    pub fn comparison(&self) -> Option<StateComparison> {
        let dataset = self.dataset.as_ref()?;
        let state = self.selected_state.as_deref()?;
        StateComparison::build(dataset, state, self.benchmark_mode)
    }

    pub fn multi_state_rows(&self) -> Option<Vec<&CrimeRecord>> {
        let dataset = self.dataset.as_ref()?;
        let selected: Vec<&str> = self.compared_states.iter().map(String::as_str).collect();
        compare::multi_state_rows(dataset, self.selected_state.as_deref(), &selected)
    }

    /// Choropleth fill for a boundary feature name.
    pub fn fill_for(&self, feature_name: &str) -> Color32 {
        let record = self.dataset.as_ref().and_then(|d| d.find(feature_name));
        self.map_mode.fill(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{hex, NO_DATA};

    fn row(name: &str, ipc: f64) -> CrimeRecord {
        CrimeRecord {
            ipc_crime_rate: Some(ipc),
            murder_rate: Some(2.0),
            chargesheeting_rate: Some(70.0),
            ..CrimeRecord::named(name)
        }
    }

    fn loaded() -> DashboardState {
        let mut state = DashboardState::new("NCT of Delhi");
        state.set_dataset(CrimeDataset::from_records(vec![
            row("Kerala", 650.0),
            row("Delhi", 1500.0),
            row("Odisha", 300.0),
            row("Goa", 600.0),
            row("Total (All India)", 420.0),
        ]));
        state
    }

    #[test]
    fn test_default_state_selected_on_load() {
        let state = loaded();
        assert_eq!(state.selected_state.as_deref(), Some("Delhi"));
        assert!(!state.loading);
    }

    #[test]
    fn test_falls_back_to_first_state() {
        let mut state = DashboardState::new("Atlantis");
        state.set_dataset(CrimeDataset::from_records(vec![
            row("Total (States)", 1.0),
            row("Goa", 2.0),
        ]));
        assert_eq!(state.selected_state.as_deref(), Some("Goa"));
    }

    #[test]
    fn test_empty_dataset_reports_status() {
        let mut state = DashboardState::default();
        state.set_dataset(CrimeDataset::from_records(Vec::new()));
        assert!(state.selected_state.is_none());
        assert_eq!(state.status_message.as_deref(), Some("Dataset contains no rows"));

        state.set_dataset(CrimeDataset::from_records(vec![row("Goa", 2.0)]));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_select_state_by_alias() {
        let mut state = loaded();
        state.select_state("orissa");
        assert_eq!(state.selected_state.as_deref(), Some("Odisha"));
        state.select_state("Atlantis");
        assert_eq!(state.selected_state.as_deref(), Some("Odisha"));
        state.select_state("Total (All India)");
        assert_eq!(state.selected_state.as_deref(), Some("Odisha"));
    }

    #[test]
    fn test_primary_never_in_compared_states() {
        let mut state = loaded();
        state.toggle_compared_state("Kerala");
        state.toggle_compared_state("Goa");
        state.toggle_compared_state("Delhi");
        assert_eq!(state.compared_states.len(), 2);

        state.select_state("Kerala");
        assert!(!state.compared_states.contains("Kerala"));
        assert!(!state.compare_options().contains(&"Kerala".to_string()));
        assert!(state.multi_state_rows().is_none());

        state.toggle_compared_state("Delhi");
        let rows = state.multi_state_rows().unwrap();
        assert_eq!(rows.len(), 2);

        state.toggle_compared_state("delhi");
        assert_eq!(state.compared_states.len(), 1);
    }

    #[test]
    fn test_options_exclude_aggregates() {
        let state = loaded();
        assert_eq!(state.state_options().len(), 4);
        assert_eq!(state.compare_options().len(), 3);
    }

    #[test]
    fn test_derived_views_follow_selection() {
        let mut state = loaded();
        assert_eq!(state.kpis().unwrap().state, "Delhi");
        state.set_benchmark_mode(BenchmarkMode::Cluster);
        assert_eq!(state.subtitle(), "Comparing Delhi with Cluster Average (2022)");

        state.set_benchmark_mode(BenchmarkMode::National);
        let cmp = state.comparison().unwrap();
        assert_eq!(cmp.benchmark.unwrap().crime_rate, Some(420.0));
    }

    #[test]
    fn test_fill_for_unknown_feature() {
        let mut state = loaded();
        state.set_map_mode(MapMode::CrimeRate);
        assert_eq!(state.fill_for("Atlantis"), hex(NO_DATA));
        assert_eq!(state.fill_for("NCT of Delhi"), hex("#800026"));
    }

    #[test]
    fn test_empty_state_is_quiet() {
        let state = DashboardState::default();
        assert!(state.kpis().is_none());
        assert!(state.comparison().is_none());
        assert!(state.state_options().is_empty());
        assert_eq!(state.subtitle(), "Comparing Selected State with National Average (2022)");
    }
}
