mod app;
mod logging;
mod model;
mod scene;

fn main() -> anyhow::Result<()> {
    logging::init_logging()?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting circle canvas");

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Circle Canvas",
        native_options,
        Box::new(|cc| Ok(Box::new(app::CanvasApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
