use std::sync::mpsc::{channel, Receiver};
use std::thread;

use anyhow::Context as _;
use eframe::egui;

use crate::config::DashboardConfig;
use crate::data::boundaries::{self, StateBoundaries};
use crate::data::gallery::Gallery;
use crate::data::loader;
use crate::data::model::CrimeDataset;
use crate::state::{DashboardState, Tab};
use crate::ui::{gallery, map, panels};

/// Messages from the startup load thread.
enum LoadResult {
    Dataset(CrimeDataset),
    Boundaries(StateBoundaries),
    Gallery(Gallery),
    Error(String),
    Done,
}

/// Load every startup asset, reporting each as it arrives.
///
/// A failed asset is reported and the rest still load.
fn load_assets(config: &DashboardConfig, send: impl Fn(LoadResult)) {
    match loader::load_file(&config.data_path, &config.columns) {
        Ok(dataset) => {
            log::info!("Loaded {} rows from {}", dataset.len(), config.data_path.display());
            send(LoadResult::Dataset(dataset));
        }
        Err(e) => {
            log::error!("CSV load error: {e}");
            send(LoadResult::Error(format!("Dataset: {e}")));
        }
    }

    match boundaries::load_file(&config.boundaries_path, &config.boundary_name_key) {
        Ok(b) => {
            log::info!("Loaded {} state boundaries", b.len());
            send(LoadResult::Boundaries(b));
        }
        Err(e) => {
            log::error!("Boundary load error: {e:#}");
            send(LoadResult::Error(format!("Boundaries: {e:#}")));
        }
    }

    match Gallery::load(&config.gallery_manifest).context("loading gallery") {
        Ok(g) => {
            if g.is_empty() {
                log::info!("No gallery images configured");
            }
            send(LoadResult::Gallery(g));
        }
        Err(e) => {
            log::warn!("{e:#}");
            send(LoadResult::Error(format!("Gallery: {e:#}")));
        }
    }

    send(LoadResult::Done);
}

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CrimeAtlasApp {
    pub state: DashboardState,
    config: DashboardConfig,
    load_rx: Option<Receiver<LoadResult>>,
    errors: Vec<String>,
}

impl CrimeAtlasApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            state: DashboardState::new(config.default_state.clone()),
            config,
            load_rx: None,
            errors: Vec::new(),
        };
        app.start_loading(cc.egui_ctx.clone());
        app
    }

    /// Spawn the one-time asset load.
    fn start_loading(&mut self, ctx: egui::Context) {
        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.state.loading = true;

        let config = self.config.clone();
        thread::spawn(move || {
            load_assets(&config, |msg| {
                let _ = tx.send(msg);
                ctx.request_repaint();
            });
        });
    }

    /// Drain startup load messages.
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };
        let mut finished = false;

        while let Ok(result) = rx.try_recv() {
            match result {
                LoadResult::Dataset(dataset) => self.state.set_dataset(dataset),
                LoadResult::Boundaries(b) => self.state.set_boundaries(b),
                LoadResult::Gallery(g) => self.state.gallery = g,
                LoadResult::Error(e) => self.errors.push(e),
                LoadResult::Done => finished = true,
            }
        }

        if finished {
            self.state.loading = false;
            if !self.errors.is_empty() {
                self.state.set_error(self.errors.join("; "));
            }
        } else {
            self.load_rx = Some(rx);
        }
    }
}

impl eframe::App for CrimeAtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        // ---- Top panel: menu bar and tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, &self.config);
        });

        // ---- Left side panel: selection and KPIs ----
        egui::SidePanel::left("kpi_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.active_tab {
            Tab::Overview => map::choropleth(ui, &mut self.state),
            Tab::PolicyMaps => gallery::gallery(ui, &self.state.gallery.policy_maps),
            Tab::PolicyCharts => gallery::gallery(ui, &self.state.gallery.policy_charts),
            Tab::Comparison => panels::comparison_panel(ui, &mut self.state),
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn test_load_assets_reports_each_part() {
        let dir = std::env::temp_dir().join("crime-atlas-load-assets");
        std::fs::create_dir_all(&dir).unwrap();
        let csv_path = dir.join("master.csv");
        std::fs::write(
            &csv_path,
            "state_ut,Rate of Cognizable Crimes (IPC) (2022),murder_rate_2022,Chargesheeting Rate (2022)\nGoa,300,1.5,80\n",
        )
        .unwrap();

        let config = DashboardConfig {
            data_path: csv_path,
            boundaries_path: dir.join("missing.geojson"),
            gallery_manifest: dir.join("missing-gallery.json"),
            ..DashboardConfig::default()
        };

        let seen = RefCell::new(Vec::new());
        load_assets(&config, |msg| {
            let tag = match msg {
                LoadResult::Dataset(d) => format!("dataset:{}", d.len()),
                LoadResult::Boundaries(_) => "boundaries".to_string(),
                LoadResult::Gallery(g) => format!("gallery:{}", g.is_empty()),
                LoadResult::Error(e) => format!("error:{}", e.split(':').next().unwrap_or("")),
                LoadResult::Done => "done".to_string(),
            };
            seen.borrow_mut().push(tag);
        });

        assert_eq!(
            seen.into_inner(),
            vec!["dataset:1", "error:Boundaries", "gallery:true", "done"]
        );
    }
}
