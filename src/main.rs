mod analysis;
mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::CrimeAtlasApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::resolve(std::env::args().skip(1))?;
    log::info!(
        "dataset {}, boundaries {}, gallery {}",
        config.data_path.display(),
        config.boundaries_path.display(),
        config.gallery_manifest.display()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "India Crime Atlas",
        options,
        Box::new(|cc| {
            // Install image loaders so the galleries can show png/jpg files.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(CrimeAtlasApp::new(cc, config)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard: {e}"))
}
