mod app;
mod ui;

use eframe::egui;
use skarpe_mobler::config::SiteConfig;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let config = SiteConfig::from_env();
    log::info!("Starting {} (assets: {:?})", config.title, config.asset_root);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };

    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(app::SiteApp::new(cc, config)))),
    )
}
