use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot};

use crate::analysis::compare::StateComparison;
use crate::color::{hex, indicator_color, BENCHMARK_BAR, STATE_BAR};
use crate::data::model::{CrimeRecord, Indicator};

const CHART_HEIGHT: f32 = 280.0;

/// Label for integer x positions, blank between them.
fn category_label(labels: &[String], mark: GridMark) -> String {
    let idx = mark.value.round();
    if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

fn bar_plot(id: &str, labels: Vec<String>) -> Plot<'static> {
    Plot::new(id.to_string())
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .include_y(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark))
}

// ---------------------------------------------------------------------------
// State vs benchmark (grouped bars per indicator)
// ---------------------------------------------------------------------------

/// Two bars per indicator: the state and its benchmark. Gaps are left empty.
pub fn benchmark_chart(ui: &mut Ui, cmp: &StateComparison) {
    let labels = Indicator::ALL.iter().map(|i| i.label().to_string()).collect();

    let state_bars: Vec<Bar> = Indicator::ALL
        .iter()
        .enumerate()
        .filter_map(|(i, &ind)| {
            let v = cmp.values.get(ind)?;
            Some(Bar::new(i as f64 - 0.18, v).width(0.35).name(ind.label()))
        })
        .collect();

    let bench_bars: Vec<Bar> = Indicator::ALL
        .iter()
        .enumerate()
        .filter_map(|(i, &ind)| {
            let v = cmp.benchmark.as_ref()?.get(ind)?;
            Some(Bar::new(i as f64 + 0.18, v).width(0.35).name(ind.label()))
        })
        .collect();

    bar_plot("benchmark_bar_chart", labels).show(ui, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(state_bars).name(&cmp.state).color(hex(STATE_BAR)));
        plot_ui.bar_chart(BarChart::new(bench_bars).name("Benchmark").color(hex(BENCHMARK_BAR)));
    });
}

// ---------------------------------------------------------------------------
// Multi-state comparison (one group per state)
// ---------------------------------------------------------------------------

/// One group per state, one bar per indicator.
pub fn multi_state_chart(ui: &mut Ui, rows: &[&CrimeRecord]) {
    let labels = rows.iter().map(|r| r.state_ut.clone()).collect();
    let width = 0.8 / Indicator::ALL.len() as f64;

    let charts: Vec<BarChart> = Indicator::ALL
        .iter()
        .enumerate()
        .map(|(k, &ind)| {
            let offset = (k as f64 - 1.0) * width;
            let bars = rows
                .iter()
                .enumerate()
                .filter_map(|(i, r)| {
                    let v = r.value(ind)?;
                    Some(Bar::new(i as f64 + offset, v).width(width * 0.9).name(&r.state_ut))
                })
                .collect();
            BarChart::new(bars).name(ind.label()).color(indicator_color(ind))
        })
        .collect();

    bar_plot("multi_state_bar_chart", labels).show(ui, |plot_ui| {
        for chart in charts {
            plot_ui.bar_chart(chart);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(value: f64) -> GridMark {
        GridMark { value, step_size: 1.0 }
    }

    #[test]
    fn test_category_labels() {
        let labels = vec!["Goa".to_string(), "Kerala".to_string()];
        assert_eq!(category_label(&labels, mark(0.0)), "Goa");
        assert_eq!(category_label(&labels, mark(1.0)), "Kerala");
        assert_eq!(category_label(&labels, mark(0.5)), "");
        assert_eq!(category_label(&labels, mark(2.0)), "");
        assert_eq!(category_label(&labels, mark(-1.0)), "");
    }
}
