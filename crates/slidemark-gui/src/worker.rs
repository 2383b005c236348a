use std::path::{Path, PathBuf};
use std::sync::mpsc;

use slidemark_core::editor::persist_export;
use slidemark_core::io::{load_annotations, load_raster};
use tracing::debug;

use crate::messages::{WorkerCommand, WorkerResult};

/// Spawn the I/O thread. It only decodes and reads; the session itself is
/// owned and mutated by the UI thread.
pub fn spawn_worker(
    result_tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) -> mpsc::Sender<WorkerCommand> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();

    std::thread::Builder::new()
        .name("slidemark-worker".into())
        .spawn(move || {
            worker_loop(cmd_rx, result_tx, ctx);
        })
        .expect("Failed to spawn worker thread");

    cmd_tx
}

fn send(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, result: WorkerResult) {
    let _ = tx.send(result);
    ctx.request_repaint();
}

fn send_log(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, msg: impl Into<String>) {
    send(tx, ctx, WorkerResult::Log { message: msg.into() });
}

fn send_started(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, label: impl Into<String>) {
    send(tx, ctx, WorkerResult::Started { label: label.into() });
}

fn worker_loop(
    cmd_rx: mpsc::Receiver<WorkerCommand>,
    tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            WorkerCommand::LoadRaster { path } => {
                send_started(&tx, &ctx, format!("Loading {}", path.display()));
                handle_load_raster(&path, &tx, &ctx);
            }
            WorkerCommand::LoadAnnotations { location, extent } => {
                send_started(&tx, &ctx, format!("Fetching {location}"));
                let result = load_annotations(&location);
                send(&tx, &ctx, WorkerResult::AnnotationsLoaded { location, result, extent });
            }
            WorkerCommand::LoadSample { entry } => {
                send_log(&tx, &ctx, format!("Loading sample '{}'", entry.title));
                send_started(&tx, &ctx, format!("Loading {}", entry.image));
                handle_load_raster(Path::new(&entry.image), &tx, &ctx);
                send_started(&tx, &ctx, format!("Fetching {}", entry.annotations));
                let result = load_annotations(&entry.annotations);
                send(
                    &tx,
                    &ctx,
                    WorkerResult::AnnotationsLoaded {
                        location: entry.annotations.clone(),
                        result,
                        extent: entry.source_extent(),
                    },
                );
            }
            WorkerCommand::PersistExport { granted, file_name, bytes } => {
                send_started(&tx, &ctx, format!("Saving {file_name}"));
                let fallback = fallback_dir();
                debug!(fallback = %fallback.display(), "Persisting export");
                let result = persist_export(granted.as_deref(), &fallback, &file_name, &bytes);
                send(&tx, &ctx, WorkerResult::ExportPersisted { result });
            }
        }
    }
}

fn handle_load_raster(path: &Path, tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context) {
    let result = load_raster(path);
    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    send(tx, ctx, WorkerResult::RasterLoaded { label, result });
}

/// Download folder, or the working directory when the platform has none.
fn fallback_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("."))
}
