//! Subcommand implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use aq_common::{anchor_for, LatLon, Pollutant, ViewportRect};
use chart::{build_frame, outlook, ChartFrame, ChartOutcome};
use overlay::{
    GridRequest, GridSource, HttpDataService, OverlayLayer, OverlayState, SeriesSource,
    ViewportEvent, ViewportOverlayController,
};
use renderer::{rasterize_with, ColorMapper};
use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::ViewerConfig;
use crate::sink::{write_layer, FileDisplay};

/// Fetch one heatmap, write it as PNG and print its placement.
pub async fn heatmap(config: &ViewerConfig, bbox: &str, out: &Path) -> Result<()> {
    let viewport = ViewportRect::parse(bbox).context("Invalid --bbox")?;
    let service = HttpDataService::new(&config.overlay)?;

    let request = GridRequest::new(viewport, &config.overlay);
    let response = service.fetch_grid(&request).await?;

    if let Some(note) = &response.note {
        info!(note = %note, "Data service note");
    }
    if let Some(error) = &response.error {
        bail!("Data service error: {}", error);
    }

    let grid = response.grid()?;
    let layer = OverlayLayer {
        image: rasterize_with(&grid, &ColorMapper::overlay()),
        bounds: anchor_for(&viewport),
        opacity: config.overlay.opacity,
    };
    write_layer(out, &layer).with_context(|| format!("Failed to write {}", out.display()))?;

    let summary = json!({
        "png": out.display().to_string(),
        "bounds": layer.bounds.to_bounds_array(),
        "opacity": layer.opacity,
        "width": layer.image.width(),
        "height": layer.image.height(),
        "note": response.note,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// One line of replay input: an optional `@<ms>` pause, then a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayStep {
    pub pause: Duration,
    pub viewport: ViewportRect,
}

pub fn parse_replay_line(line: &str) -> Result<Option<ReplayStep>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (pause, rest) = match line.strip_prefix('@') {
        Some(rest) => {
            let (ms, rest) = rest
                .split_once(char::is_whitespace)
                .with_context(|| format!("Expected viewport after pause: {}", line))?;
            let ms: u64 = ms.parse().with_context(|| format!("Invalid pause: {}", ms))?;
            (Duration::from_millis(ms), rest)
        }
        None => (Duration::ZERO, line),
    };

    let viewport = ViewportRect::parse(rest)
        .with_context(|| format!("Invalid viewport line: {}", line))?;
    Ok(Some(ReplayStep { pause, viewport }))
}

/// Feed viewport lines to a live controller as settle events and write
/// each displayed overlay into `out_dir`.
pub async fn replay<R>(config: &ViewerConfig, input: R, out_dir: &Path) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let service = Arc::new(HttpDataService::new(&config.overlay)?);
    let (display, writer) = FileDisplay::spawn(out_dir);
    let display = Arc::new(display);
    let controller =
        ViewportOverlayController::new(service, display.clone(), config.overlay.clone());

    let (events, _) = broadcast::channel(64);
    controller.start(events.subscribe());
    controller.enable(None);

    let mut lines = input.lines();
    let mut count = 0usize;
    while let Some(line) = lines.next_line().await? {
        let Some(step) = parse_replay_line(&line)? else { continue };
        if !step.pause.is_zero() {
            tokio::time::sleep(step.pause).await;
        }
        debug!(viewport = ?step.viewport, "Replaying viewport");
        events
            .send(ViewportEvent::MoveEnd(step.viewport))
            .context("Viewport subscription closed")?;
        count += 1;
    }

    // Let the trailing event clear the debounce window, then wait out the
    // fetch it issued
    tokio::time::sleep(config.overlay.debounce() + Duration::from_millis(50)).await;
    let deadline = tokio::time::Instant::now() + config.overlay.request_timeout();
    while matches!(controller.state(), OverlayState::Pending(_)) {
        if tokio::time::Instant::now() >= deadline {
            warn!("Gave up waiting for the last fetch");
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    let advisory = controller.advisory();
    let metrics = controller.metrics();
    controller.stop();
    display.finish();
    let report = writer.await.context("Overlay writer failed")?;

    info!(events = count, written = report.written, "Replay finished");
    let summary = json!({
        "events": count,
        "overlays_written": report.written,
        "last_overlay": report.last.map(|p| p.display().to_string()),
        "advisory": advisory,
        "metrics": metrics,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Fetch history for a location and print the chart frame and outlook.
pub async fn chart(
    config: &ViewerConfig,
    lat: f64,
    lon: f64,
    pollutant: Pollutant,
    svg: Option<PathBuf>,
) -> Result<()> {
    let location = LatLon::new(lat, lon)?;
    let service = HttpDataService::new(&config.overlay)?;
    let bundle = service.fetch_history(location, &config.history).await?;

    let series = bundle.time_series(pollutant);
    let outcome = build_frame(&series, pollutant, &config.chart);
    let trend = outlook(&bundle.time_series(Pollutant::Aqi));

    if let (Some(path), ChartOutcome::Chart(frame)) = (&svg, &outcome) {
        std::fs::write(path, render_svg(frame, config))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Wrote chart SVG");
    }

    let summary = json!({
        "source": bundle.source(),
        "chart": outcome,
        "outlook": trend,
        "daily": bundle.daily.daily,
        "summary": bundle.summary.summary,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Minimal SVG rendering of a chart frame.
pub fn render_svg(frame: &ChartFrame, config: &ViewerConfig) -> String {
    let canvas = config.chart.canvas;
    let area = frame.area;
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" font-size="10">"#,
        canvas.width, canvas.height
    );

    for tick in &frame.ticks {
        svg.push_str(&format!(
            r##"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="#ddd"/><text x="{:.2}" y="{:.2}" text-anchor="end">{:.0}</text>"##,
            area.left,
            tick.position,
            area.right(),
            tick.position,
            area.left - 6.0,
            tick.position + 3.0,
            tick.value
        ));
    }

    svg.push_str(&format!(
        r##"<path d="{}" fill="#4a90d9" fill-opacity="0.15"/><path d="{}" fill="none" stroke="#4a90d9" stroke-width="2"/>"##,
        frame.path.area_path_data(),
        frame.path.line_path_data()
    ));

    for marker in &frame.path.markers {
        svg.push_str(&format!(
            r##"<circle cx="{:.2}" cy="{:.2}" r="3" fill="#4a90d9"/>"##,
            marker.point.x, marker.point.y
        ));
    }
    for label in &frame.path.labels {
        svg.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
            label.x,
            area.bottom() + 16.0,
            label.text
        ));
    }

    svg.push_str("</svg>");
    svg
}
