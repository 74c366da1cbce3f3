// Entry point kept minimal: window configuration and app startup.
// All logic lives in the app module (src/app.rs).

use eframe::{egui, egui_wgpu::WgpuConfiguration, wgpu::PresentMode};

mod app;
mod feed;
mod logger;
mod types;
mod ui_constants;
mod views;

fn main() -> eframe::Result<()> {
    // Initialize in-app GUI logger (also mirrors to stderr when enabled)
    logger::init();
    app::settings::load_settings_from_disk();

    // Wgpu renderer without vsync for minimal input latency.
    let wgpu_options = WgpuConfiguration {
        present_mode: PresentMode::AutoNoVsync,
        ..Default::default()
    };
    let native_options = eframe::NativeOptions {
        renderer: eframe::Renderer::Wgpu,
        vsync: false,
        hardware_acceleration: eframe::HardwareAcceleration::Preferred,
        wgpu_options,
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_resizable(true),
        ..Default::default()
    };

    let res = eframe::run_native(
        "Puppygram",
        native_options,
        Box::new(|_cc| Box::new(app::PuppygramApp::default())),
    );
    if let Err(ref e) = res {
        log::error!("eframe::run_native failed: {e}");
    }
    res
}
