//! Map display that writes each overlay to disk.
//!
//! The controller calls the display while holding its state lock, so
//! [`FileDisplay`] only queues layers. A writer task drains the queue and
//! does the file I/O on the blocking pool.

use std::path::{Path, PathBuf};

use overlay::{MapDisplay, OverlayLayer};
use serde_json::json;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

enum SinkOp {
    Replace(OverlayLayer),
    Clear,
    Finish,
}

/// What the writer task did before it finished.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SinkReport {
    pub written: usize,
    /// PNG path of the overlay on screen when the writer stopped.
    pub active: Option<PathBuf>,
    /// PNG path of the most recent overlay, cleared or not.
    pub last: Option<PathBuf>,
}

/// Writes every displayed overlay as `overlay-NNN.png` plus a JSON sidecar
/// with its bounds and opacity.
pub struct FileDisplay {
    ops: mpsc::UnboundedSender<SinkOp>,
}

impl FileDisplay {
    /// Create the display and its writer task. The task ends after
    /// [`finish`](FileDisplay::finish) or once every display handle is dropped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(out_dir: impl Into<PathBuf>) -> (Self, JoinHandle<SinkReport>) {
        let (ops, rx) = mpsc::unbounded_channel();
        let writer = tokio::spawn(run_writer(out_dir.into(), rx));
        (Self { ops }, writer)
    }

    /// Ask the writer to stop after the layers already queued.
    pub fn finish(&self) {
        self.send(SinkOp::Finish);
    }

    fn send(&self, op: SinkOp) {
        if self.ops.send(op).is_err() {
            warn!("Overlay writer already stopped");
        }
    }
}

impl MapDisplay for FileDisplay {
    fn replace_overlay(&self, layer: OverlayLayer) {
        self.send(SinkOp::Replace(layer));
    }

    fn clear_overlay(&self) {
        self.send(SinkOp::Clear);
    }
}

async fn run_writer(out_dir: PathBuf, mut ops: mpsc::UnboundedReceiver<SinkOp>) -> SinkReport {
    let mut report = SinkReport::default();

    while let Some(op) = ops.recv().await {
        match op {
            SinkOp::Replace(layer) => {
                let index = report.written + 1;
                let png_path = out_dir.join(format!("overlay-{:03}.png", index));

                let path = png_path.clone();
                let result = tokio::task::spawn_blocking(move || write_layer(&path, &layer)).await;
                match result {
                    Ok(Ok(())) => {
                        info!(path = %png_path.display(), "Wrote overlay");
                        report.written = index;
                        report.active = Some(png_path.clone());
                        report.last = Some(png_path);
                    }
                    Ok(Err(e)) => {
                        warn!(path = %png_path.display(), error = %e, "Failed to write overlay")
                    }
                    Err(e) => warn!(error = %e, "Overlay write task failed"),
                }
            }
            SinkOp::Clear => {
                if let Some(path) = report.active.take() {
                    info!(path = %path.display(), "Overlay cleared");
                }
            }
            SinkOp::Finish => break,
        }
    }

    report
}

/// Write the PNG and its sidecar next to each other.
pub fn write_layer(png_path: &Path, layer: &OverlayLayer) -> anyhow::Result<()> {
    let png = layer.image.to_png()?;
    std::fs::write(png_path, png)?;

    let sidecar = json!({
        "bounds": layer.bounds.to_bounds_array(),
        "opacity": layer.opacity,
        "width": layer.image.width(),
        "height": layer.image.height(),
    });
    std::fs::write(png_path.with_extension("json"), serde_json::to_vec_pretty(&sidecar)?)?;
    Ok(())
}
