use std::str::FromStr;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Lighten, Srgb};

use crate::analysis::classify::{CrimeCluster, PolicyPriority};
use crate::data::model::CrimeRecord;

/// Fill for states without data.
pub const NO_DATA: &str = "#cccccc";

/// Parse a `#rrggbb` code; malformed codes render grey.
pub fn hex(code: &str) -> Color32 {
    Srgb::<u8>::from_str(code)
        .map(|c| Color32::from_rgb(c.red, c.green, c.blue))
        .unwrap_or(Color32::GRAY)
}

/// Lighter variant of `color` for hover highlighting.
pub fn highlight(color: Color32) -> Color32 {
    let rgb = Srgb::new(color.r(), color.g(), color.b()).into_format::<f32>();
    let hsl: Hsl = rgb.into_color();
    let lighter: Srgb = hsl.lighten(0.25).into_color();
    let lighter = lighter.into_format::<u8>();
    Color32::from_rgb(lighter.red, lighter.green, lighter.blue)
}

// ---------------------------------------------------------------------------
// Step scales
// ---------------------------------------------------------------------------

/// Threshold colour scale: the first bin whose threshold the value strictly
/// exceeds wins, otherwise `floor`.
#[derive(Debug, Clone, Copy)]
pub struct StepScale {
    /// `(threshold, colour)`, highest threshold first.
    pub bins: &'static [(f64, &'static str)],
    pub floor: &'static str,
}

impl StepScale {
    pub fn color(&self, value: Option<f64>) -> Color32 {
        let Some(v) = value.filter(|v| v.is_finite()) else {
            return hex(NO_DATA);
        };
        let code = self
            .bins
            .iter()
            .find(|(threshold, _)| v > *threshold)
            .map(|(_, code)| *code)
            .unwrap_or(self.floor);
        hex(code)
    }

    /// Legend entries, lowest bin first: `("≤ 150", c)`, `("150 – 300", c)`, ...
    pub fn legend(&self) -> Vec<(String, Color32)> {
        let mut ascending: Vec<(f64, &str)> = self.bins.iter().rev().copied().collect();
        let mut entries = Vec::with_capacity(ascending.len() + 1);

        if let Some(&(lowest, _)) = ascending.first() {
            entries.push((format!("≤ {lowest}"), hex(self.floor)));
        }
        let uppers: Vec<Option<f64>> = ascending
            .iter()
            .skip(1)
            .map(|(t, _)| Some(*t))
            .chain(std::iter::once(None))
            .collect();
        for ((lower, code), upper) in ascending.drain(..).zip(uppers) {
            let label = match upper {
                Some(upper) => format!("{lower} – {upper}"),
                None => format!("> {lower}"),
            };
            entries.push((label, hex(code)));
        }
        entries
    }
}

pub const IPC_SCALE: StepScale = StepScale {
    bins: &[
        (700.0, "#800026"),
        (500.0, "#BD0026"),
        (300.0, "#E31A1C"),
        (150.0, "#FD8D3C"),
    ],
    floor: "#FED976",
};

pub const MURDER_SCALE: StepScale = StepScale {
    bins: &[
        (6.0, "#67000d"),
        (4.0, "#a50f15"),
        (2.0, "#cb181d"),
        (1.0, "#fb6a4a"),
    ],
    floor: "#fee5d9",
};

pub const CHARGE_SCALE: StepScale = StepScale {
    bins: &[
        (90.0, "#08306b"),
        (80.0, "#2171b5"),
        (70.0, "#6baed6"),
        (60.0, "#c6dbef"),
    ],
    floor: "#f7fbff",
};

pub const KIDNAP_SCALE: StepScale = StepScale {
    bins: &[
        (90.0, "#00441b"),
        (75.0, "#238b45"),
        (60.0, "#66c2a4"),
        (40.0, "#ccece6"),
    ],
    floor: "#f7fcfd",
};

// ---------------------------------------------------------------------------
// Categorical colours
// ---------------------------------------------------------------------------

pub fn cluster_color(cluster: CrimeCluster) -> Color32 {
    hex(match cluster {
        CrimeCluster::VeryHigh => "#67000d",
        CrimeCluster::High => "#cb181d",
        CrimeCluster::Moderate => "#fdae61",
        CrimeCluster::Low => "#1a9850",
    })
}

pub fn priority_color(priority: PolicyPriority) -> Color32 {
    hex(match priority {
        PolicyPriority::Critical => "#7f0000",
        PolicyPriority::High => "#d7301f",
        PolicyPriority::Moderate => "#fc8d59",
        PolicyPriority::Low => "#1a9850",
    })
}

/// Bar colour of each indicator in the comparison charts.
pub fn indicator_color(indicator: crate::data::model::Indicator) -> Color32 {
    use crate::data::model::Indicator;
    hex(match indicator {
        Indicator::CrimeRate => "#d73027",
        Indicator::MurderRate => "#fc8d59",
        Indicator::Chargesheeting => "#91cf60",
    })
}

pub const STATE_BAR: &str = "#0b3c5d";
pub const BENCHMARK_BAR: &str = "#b0c4d8";

// ---------------------------------------------------------------------------
// Map mode
// ---------------------------------------------------------------------------

/// Which variable the choropleth shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapMode {
    #[default]
    CrimeRate,
    MurderRate,
    Chargesheeting,
    KidnapRecovery,
    Cluster,
    Priority,
}

impl MapMode {
    pub const ALL: [MapMode; 6] = [
        MapMode::CrimeRate,
        MapMode::MurderRate,
        MapMode::Chargesheeting,
        MapMode::KidnapRecovery,
        MapMode::Cluster,
        MapMode::Priority,
    ];

    /// Legend title and picker label.
    pub fn label(self) -> &'static str {
        match self {
            MapMode::CrimeRate => "IPC Crime Rate",
            MapMode::MurderRate => "Murder Rate",
            MapMode::Chargesheeting => "Chargesheeting %",
            MapMode::KidnapRecovery => "Kidnapping Recovery %",
            MapMode::Cluster => "Crime Cluster",
            MapMode::Priority => "Policy Priority",
        }
    }

    /// Fill of a state; `None` record means the boundary has no data row.
    pub fn fill(self, record: Option<&CrimeRecord>) -> Color32 {
        let Some(r) = record else {
            return hex(NO_DATA);
        };
        match self {
            MapMode::CrimeRate => IPC_SCALE.color(r.ipc_crime_rate),
            MapMode::MurderRate => MURDER_SCALE.color(r.murder_rate),
            MapMode::Chargesheeting => CHARGE_SCALE.color(r.chargesheeting_rate),
            MapMode::KidnapRecovery => KIDNAP_SCALE.color(r.kidnap_recovery_pct),
            MapMode::Cluster => cluster_color(CrimeCluster::classify(r)),
            MapMode::Priority => priority_color(PolicyPriority::classify(r)),
        }
    }

    /// Legend entries drawn from the same tables as [`MapMode::fill`].
    pub fn legend(self) -> Vec<(String, Color32)> {
        match self {
            MapMode::CrimeRate => IPC_SCALE.legend(),
            MapMode::MurderRate => MURDER_SCALE.legend(),
            MapMode::Chargesheeting => CHARGE_SCALE.legend(),
            MapMode::KidnapRecovery => KIDNAP_SCALE.legend(),
            MapMode::Cluster => CrimeCluster::ALL
                .iter()
                .map(|&c| (c.label().to_string(), cluster_color(c)))
                .collect(),
            MapMode::Priority => PolicyPriority::ALL
                .iter()
                .map(|&p| (p.label().to_string(), priority_color(p)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(hex("#800026"), Color32::from_rgb(0x80, 0x00, 0x26));
        assert_eq!(hex("#FED976"), Color32::from_rgb(0xfe, 0xd9, 0x76));
        assert_eq!(hex("nope"), Color32::GRAY);
    }

    #[test]
    fn test_step_scale_thresholds_are_strict() {
        assert_eq!(IPC_SCALE.color(Some(701.0)), hex("#800026"));
        assert_eq!(IPC_SCALE.color(Some(700.0)), hex("#BD0026"));
        assert_eq!(IPC_SCALE.color(Some(0.0)), hex("#FED976"));
        assert_eq!(IPC_SCALE.color(None), hex(NO_DATA));
        assert_eq!(CHARGE_SCALE.color(Some(f64::NAN)), hex(NO_DATA));
    }

    #[test]
    fn test_legend_matches_fill() {
        for scale in [IPC_SCALE, MURDER_SCALE, CHARGE_SCALE, KIDNAP_SCALE] {
            let legend = scale.legend();
            assert_eq!(legend.len(), scale.bins.len() + 1);

            // Probe a value inside each bin, lowest first.
            let mut thresholds: Vec<f64> = scale.bins.iter().map(|(t, _)| *t).collect();
            thresholds.reverse();
            let mut probes = vec![thresholds[0] - 0.5];
            probes.extend(thresholds.iter().map(|t| t + 0.5));
            for ((_, color), probe) in legend.iter().zip(probes) {
                assert_eq!(*color, scale.color(Some(probe)), "probe {probe}");
            }
        }
    }

    #[test]
    fn test_legend_labels() {
        let labels: Vec<String> = IPC_SCALE.legend().into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["≤ 150", "150 – 300", "300 – 500", "500 – 700", "> 700"]);
    }

    #[test]
    fn test_categorical_modes() {
        let severe = CrimeRecord {
            ipc_crime_rate: Some(750.0),
            urbanization_rate: Some(45.0),
            murder_rate: Some(4.0),
            ..CrimeRecord::named("X")
        };
        assert_eq!(MapMode::Cluster.fill(Some(&severe)), hex("#67000d"));
        assert_eq!(MapMode::Cluster.legend().len(), 4);
        assert_eq!(MapMode::Priority.legend()[0].0, "Critical Priority");
        assert_eq!(MapMode::KidnapRecovery.fill(Some(&severe)), hex(NO_DATA));
        assert_eq!(MapMode::CrimeRate.fill(None), hex(NO_DATA));
    }

    #[test]
    fn test_highlight_is_lighter() {
        let base = hex("#800026");
        let light = highlight(base);
        let sum = |c: Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
        assert!(sum(light) > sum(base));
    }
}
