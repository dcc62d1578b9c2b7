//! Writes a synthetic dataset in the dashboard's default column layout.
//!
//! Values are random draws around plausible magnitudes and are not real
//! statistics. Usage: `generate_sample [output.csv]` (default `data/master.csv`).

use std::path::PathBuf;

use anyhow::{Context, Result};

const STATES: &[&str] = &[
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Andaman & Nicobar Islands",
    "Chandigarh",
    "Dadra & Nagar Haveli and Daman & Diu",
    "Delhi",
    "Jammu & Kashmir",
    "Ladakh",
    "Lakshadweep",
    "Puducherry",
];

const HEADER: [&str; 6] = [
    "state_ut",
    "Rate of Cognizable Crimes (IPC) (2022)",
    "murder_rate_2022",
    "Chargesheeting Rate (2022)",
    "urbanization_rate_2011",
    "kidnap_recovery_percent_2022",
];

/// Seeded splitmix64 stream; the same seed always yields the same file.
struct SampleRng(u64);

impl SampleRng {
    fn unit(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        ((z ^ (z >> 31)) >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Normal draw (Box-Muller), clamped to `[lo, hi]` and rounded to `decimals`.
    fn draw(&mut self, mean: f64, std_dev: f64, lo: f64, hi: f64, decimals: i32) -> f64 {
        let u1 = self.unit().max(1e-15);
        let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * self.unit()).cos();
        let factor = 10f64.powi(decimals);
        ((mean + std_dev * z).clamp(lo, hi) * factor).round() / factor
    }
}

struct Row {
    name: String,
    ipc: f64,
    murder: f64,
    charge: f64,
    urban: f64,
    /// Some states have no recovery figure.
    recovery: Option<f64>,
}

fn main() -> Result<()> {
    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/master.csv"));

    let mut rng = SampleRng(42);
    let rows: Vec<Row> = STATES
        .iter()
        .map(|&name| Row {
            name: name.to_string(),
            ipc: rng.draw(420.0, 220.0, 60.0, 1600.0, 1),
            murder: rng.draw(2.2, 1.1, 0.2, 7.5, 2),
            charge: rng.draw(72.0, 14.0, 25.0, 98.0, 1),
            urban: rng.draw(33.0, 18.0, 10.0, 98.0, 1),
            recovery: (rng.unit() > 0.15).then(|| rng.draw(70.0, 15.0, 20.0, 100.0, 1)),
        })
        .collect();

    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let mut writer = csv::Writer::from_path(&output)
        .with_context(|| format!("creating {}", output.display()))?;
    writer.write_record(HEADER)?;

    let fmt = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
    for row in &rows {
        writer.write_record([
            row.name.clone(),
            fmt(Some(row.ipc)),
            fmt(Some(row.murder)),
            fmt(Some(row.charge)),
            fmt(Some(row.urban)),
            fmt(row.recovery),
        ])?;
    }

    // National row: plain means, so every benchmark mode has something to show.
    let n = rows.len() as f64;
    let avg = |f: fn(&Row) -> f64| {
        let mean = rows.iter().map(f).sum::<f64>() / n;
        (mean * 100.0).round() / 100.0
    };
    writer.write_record([
        "Total (All India)".to_string(),
        fmt(Some(avg(|r| r.ipc))),
        fmt(Some(avg(|r| r.murder))),
        fmt(Some(avg(|r| r.charge))),
        fmt(Some(avg(|r| r.urban))),
        String::new(),
    ])?;
    writer.flush()?;

    println!("Wrote {} synthetic state rows to {}", rows.len(), output.display());
    Ok(())
}
