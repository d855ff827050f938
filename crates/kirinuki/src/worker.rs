//! Persistence thread.
//!
//! Saves are the one asynchronous hand-off in the editor: the UI thread
//! sends accepted crops over a channel and keeps painting; the worker
//! writes them out and reports each attempt back for
//! [`kirinuki_app::CropSession::resolve_save`]. Completions wake the
//! event loop with a repaint request so a save resolves without waiting
//! for the next input event.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use anyhow::Context as _;
use tracing::error;

/// A crop accepted by the user, bound for disk.
pub struct SaveCommand {
    pub path: PathBuf,
    pub png: Vec<u8>,
}

/// Completion report for one save attempt.
pub struct SaveOutcome {
    pub path: PathBuf,
    pub result: Result<(), String>,
}

/// Spawn the save worker. Returns the command sender.
pub fn spawn(result_tx: mpsc::Sender<SaveOutcome>, ctx: egui::Context) -> mpsc::Sender<SaveCommand> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<SaveCommand>();

    let spawned = std::thread::Builder::new()
        .name("kirinuki-save".into())
        .spawn(move || save_loop(&cmd_rx, &result_tx, &ctx));
    if let Err(source) = spawned {
        error!(%source, "Could not start the save worker");
    }

    cmd_tx
}

fn save_loop(
    cmd_rx: &mpsc::Receiver<SaveCommand>,
    tx: &mpsc::Sender<SaveOutcome>,
    ctx: &egui::Context,
) {
    while let Ok(command) = cmd_rx.recv() {
        let result = write_png(&command.path, &command.png).map_err(|source| format!("{source:#}"));
        let _ = tx.send(SaveOutcome {
            path: command.path,
            result,
        });
        ctx.request_repaint();
    }
}

fn write_png(path: &Path, png: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, png).with_context(|| format!("writing {}", path.display()))
}
