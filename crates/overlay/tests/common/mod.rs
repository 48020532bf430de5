//! Test doubles for the grid source and map display.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use aq_common::{AqError, GridResponse, ViewportRect};
use overlay::{
    GridRequest, GridSource, MapDisplay, OverlayConfig, OverlayLayer, ViewportOverlayController,
};

/// One scripted reply: latency, then result.
pub struct Reply {
    pub delay: Duration,
    pub result: Result<GridResponse, AqError>,
}

impl Reply {
    pub fn ok(json: &str, delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            result: Ok(serde_json::from_str(json).expect("fixture json")),
        }
    }

    pub fn grid(rows: Vec<Vec<Option<f64>>>, delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            result: Ok(GridResponse {
                grid_aqi: Some(rows),
                ..GridResponse::default()
            }),
        }
    }

    pub fn err(error: AqError, delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            result: Err(error),
        }
    }
}

/// Grid source answering from a script, in call order. Calls past the end
/// of the script get a 1x1 grid immediately.
#[derive(Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<GridRequest>>,
}

impl ScriptedSource {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<GridRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn viewports(&self) -> Vec<ViewportRect> {
        self.requests().iter().map(|r| r.viewport).collect()
    }
}

#[async_trait]
impl GridSource for ScriptedSource {
    async fn fetch_grid(&self, request: &GridRequest) -> Result<GridResponse, AqError> {
        self.requests.lock().unwrap().push(*request);
        let reply = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Reply::grid(vec![vec![Some(1.0)]], 0));
        tokio::time::sleep(reply.delay).await;
        reply.result
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayOp {
    Replace(OverlayLayer),
    Clear,
}

/// Map display that records every call and keeps the active layer.
#[derive(Default)]
pub struct RecordingDisplay {
    ops: Mutex<Vec<DisplayOp>>,
    active: Mutex<Option<OverlayLayer>>,
}

impl RecordingDisplay {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn ops(&self) -> Vec<DisplayOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn active(&self) -> Option<OverlayLayer> {
        self.active.lock().unwrap().clone()
    }

    pub fn replace_count(&self) -> usize {
        self.ops()
            .iter()
            .filter(|op| matches!(op, DisplayOp::Replace(_)))
            .count()
    }
}

impl MapDisplay for RecordingDisplay {
    fn replace_overlay(&self, layer: OverlayLayer) {
        *self.active.lock().unwrap() = Some(layer.clone());
        self.ops.lock().unwrap().push(DisplayOp::Replace(layer));
    }

    fn clear_overlay(&self) {
        *self.active.lock().unwrap() = None;
        self.ops.lock().unwrap().push(DisplayOp::Clear);
    }
}

pub fn viewport(corners: (f64, f64, f64, f64)) -> ViewportRect {
    ViewportRect::from_corners(corners.0, corners.1, corners.2, corners.3).expect("valid corners")
}

/// Controller over the given doubles with the default 650 ms window.
pub fn controller(
    source: &Arc<ScriptedSource>,
    display: &Arc<RecordingDisplay>,
) -> ViewportOverlayController {
    ViewportOverlayController::new(source.clone(), display.clone(), OverlayConfig::default())
}

pub async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
