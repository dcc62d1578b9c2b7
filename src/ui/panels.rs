use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::analysis::benchmark::BenchmarkMode;
use crate::analysis::compare::format_delta;
use crate::analysis::kpi::KpiCards;
use crate::color::MapMode;
use crate::config::DashboardConfig;
use crate::data::model::Indicator;
use crate::state::{DashboardState, Tab};

use super::plot;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu, tab strip and status line.
pub fn top_bar(ui: &mut Ui, state: &mut DashboardState, config: &DashboardConfig) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open dataset…").clicked() {
                open_file_dialog(state, config);
                ui.close_menu();
            }
        });

        ui.separator();

        for tab in Tab::ALL {
            if ui
                .selectable_label(state.active_tab == tab, tab.label())
                .clicked()
            {
                state.open_tab(tab);
            }
        }

        ui.separator();

        if state.loading {
            ui.spinner();
            ui.label("Loading…");
        } else if let Some(ds) = &state.dataset {
            ui.label(format!("{} states / UTs loaded", ds.states().count()));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel: selection and KPI cards
// ---------------------------------------------------------------------------

/// Render the left panel: state picker, map mode and KPI cards.
pub fn side_panel(ui: &mut Ui, state: &mut DashboardState) {
    ui.heading("India Crime Atlas");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("State / UT");
            state_picker(ui, state);
            ui.add_space(6.0);

            ui.strong("Map layer");
            let current = state.map_mode;
            egui::ComboBox::from_id_salt("map_mode")
                .selected_text(current.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for mode in MapMode::ALL {
                        if ui.selectable_label(current == mode, mode.label()).clicked() {
                            state.set_map_mode(mode);
                        }
                    }
                });
            ui.separator();

            match state.kpis() {
                Some(kpis) => kpi_cards(ui, &kpis),
                None => {
                    ui.label("Select a state to see its indicators.");
                }
            }
        });
}

fn state_picker(ui: &mut Ui, state: &mut DashboardState) {
    let current = state.selected_state.clone().unwrap_or_default();
    let options = state.state_options();
    egui::ComboBox::from_id_salt("state_select")
        .selected_text(&current)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for name in &options {
                if ui.selectable_label(current == *name, name).clicked() {
                    state.select_state(name);
                }
            }
        });
}

fn kpi_card(ui: &mut Ui, title: &str, value: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new(title).small());
        ui.label(RichText::new(value).strong().size(18.0));
    });
}

fn kpi_cards(ui: &mut Ui, kpis: &KpiCards) {
    ui.heading(&kpis.state);
    kpi_card(ui, "IPC Crime Rate (2022)", &kpis.crime_rate);
    kpi_card(ui, "Murder Rate", &kpis.murder_rate);
    kpi_card(ui, "Chargesheeting Rate", &kpis.chargesheeting);
    kpi_card(ui, "Kidnapping Recovery", &kpis.kidnap_recovery);
    kpi_card(ui, "Crime Cluster", &kpis.cluster);
    kpi_card(ui, "Policy Priority", &kpis.priority);
}

// ---------------------------------------------------------------------------
// Comparison tab
// ---------------------------------------------------------------------------

/// Render the state comparison tab.
pub fn comparison_panel(ui: &mut Ui, state: &mut DashboardState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Waiting for data…");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Benchmark:");
                for mode in BenchmarkMode::ALL {
                    if ui
                        .selectable_label(state.benchmark_mode == mode, mode.label())
                        .clicked()
                    {
                        state.set_benchmark_mode(mode);
                    }
                }
            });
            ui.label(RichText::new(state.subtitle()).italics());
            ui.separator();

            benchmark_section(ui, state);
            ui.separator();
            multi_state_section(ui, state);
        });
}

fn benchmark_section(ui: &mut Ui, state: &DashboardState) {
    let Some(cmp) = state.comparison() else {
        ui.label("Select a state to compare.");
        return;
    };

    ui.heading("State vs Benchmark");
    plot::benchmark_chart(ui, &cmp);

    ui.horizontal(|ui: &mut Ui| {
        for ind in Indicator::ALL {
            kpi_card(ui, &format!("Δ {}", ind.label()), &format_delta(cmp.delta(ind)));
        }
    });

    ui.add_space(8.0);
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.strong(&cmp.insight.title);
        ui.add_space(4.0);
        ui.label(cmp.insight.sentences.join(" "));
        ui.add_space(4.0);
        ui.strong(&cmp.insight.composite_line);
        if ui.small_button("Copy insight").clicked() {
            ui.ctx().copy_text(cmp.insight.to_text());
        }
    });
}

fn multi_state_section(ui: &mut Ui, state: &mut DashboardState) {
    ui.heading("Multi-State Comparison");
    ui.label("Pick at least two states.");

    let options = state.compare_options();
    egui::CollapsingHeader::new(format!("States ({} selected)", state.compared_states.len()))
        .id_salt("multi_state_select")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for name in &options {
                    let mut checked = state.compared_states.contains(name);
                    if ui.checkbox(&mut checked, name).changed() {
                        state.toggle_compared_state(name);
                    }
                }
            });
        });

    if let Some(rows) = state.multi_state_rows() {
        plot::multi_state_chart(ui, &rows);
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut DashboardState, config: &DashboardConfig) {
    let file = rfd::FileDialog::new()
        .set_title("Open crime dataset")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path, &config.columns) {
            Ok(dataset) => {
                log::info!("Loaded {} rows from {}", dataset.len(), path.display());
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load dataset: {e:#}");
                state.set_error(format!("Error: {e}"));
            }
        }
    }
}
