use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

mod controller;
mod file_bridge;
mod ui;

use controller::events::UiEvent;
use file_bridge::commands::FileCommand;
use ui::app::{JourneyBoardApp, PersistedSettings, SETTINGS_STORAGE_KEY};

#[derive(Parser, Debug)]
#[command(about = "Journey Board desktop client")]
struct Cli {
    /// Map document to open at startup.
    #[arg(long)]
    file: Option<std::path::PathBuf>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    let (cmd_tx, cmd_rx) = bounded::<FileCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    file_bridge::runtime::spawn_file_worker(cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Journey Board")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([980.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Journey Board",
        options,
        Box::new(move |cc| {
            let persisted_settings = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedSettings>(&text).ok())
            });
            Ok(Box::new(JourneyBoardApp::new(
                cmd_tx,
                ui_rx,
                persisted_settings,
                cli.file,
            )))
        }),
    )
}
