//! Worker thread owning all document I/O, kept off the UI thread.

use std::{fs, path::Path, thread};

use anyhow::{Context, Result};
use chrono::Utc;
use crossbeam_channel::{Receiver, Sender};
use shared::persist::{self, MapDocument};
use tracing::{error, info};

use crate::{
    controller::events::{UiError, UiErrorContext, UiEvent},
    file_bridge::commands::FileCommand,
};

pub fn spawn_file_worker(cmd_rx: Receiver<FileCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            handle_command(cmd, &ui_tx);
        }
    });
}

fn handle_command(cmd: FileCommand, ui_tx: &Sender<UiEvent>) {
    match cmd {
        FileCommand::LoadDocument { path } => match load_document(&path) {
            Ok(document) => {
                info!(path = %path.display(), stages = document.stages.len(), "loaded document");
                let _ = ui_tx.try_send(UiEvent::DocumentLoaded { path, document });
            }
            Err(err) => {
                error!(path = %path.display(), error = %format!("{err:#}"), "load failed");
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::LoadDocument,
                    format!("{err:#}"),
                )));
            }
        },
        FileCommand::SaveDocument { path, mut document } => {
            let saved_at = Utc::now();
            document.saved_at = Some(saved_at);
            match save_document(&path, &document) {
                Ok(()) => {
                    info!(path = %path.display(), "saved document");
                    let _ = ui_tx.try_send(UiEvent::DocumentSaved { path, saved_at });
                }
                Err(err) => {
                    error!(path = %path.display(), error = %format!("{err:#}"), "save failed");
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::SaveDocument,
                        format!("{err:#}"),
                    )));
                }
            }
        }
    }
}

fn load_document(path: &Path) -> Result<MapDocument> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    persist::parse_document(&raw)
        .with_context(|| format!("failed to parse '{}'", path.display()))
}

fn save_document(path: &Path, document: &MapDocument) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create parent directory for '{}'", path.display())
            })?;
        }
    }
    let rendered =
        persist::render_document(document).context("failed to serialize document")?;
    fs::write(path, rendered)
        .with_context(|| format!("failed to write '{}'", path.display()))?;
    Ok(())
}
