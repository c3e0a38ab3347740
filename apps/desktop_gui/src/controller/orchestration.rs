//! Command orchestration helpers from UI actions to the file worker queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::file_bridge::commands::FileCommand;

pub fn dispatch_file_command(cmd_tx: &Sender<FileCommand>, cmd: FileCommand, status: &mut String) {
    let cmd_name = match &cmd {
        FileCommand::LoadDocument { .. } => "load_document",
        FileCommand::SaveDocument { .. } => "save_document",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->file command"),
        Err(TrySendError::Full(_)) => {
            *status = "File operation queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "File worker disconnected; restart the application".to_string();
        }
    }
}
