//! Viewport-driven heatmap overlay.
//!
//! The controller turns viewport-settled events into heatmap fetches and
//! hands rendered rasters to a [`MapDisplay`]:
//!
//! ```text
//! Disabled ──enable──▶ Idle ──fetch──▶ Pending(t) ──ok──▶ Rendered
//!                                        │   ▲  └──err──▶ Error
//!                                        └───┘ superseded by Pending(t')
//! ```
//!
//! Bursts of events are debounced; only the trailing event fetches. Every
//! fetch gets a fresh [`FetchToken`], and a result is applied only when its
//! token is still current. Superseded requests keep running but their
//! results are dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use aq_common::error::ErrorClass;
use aq_common::{anchor_for, AqError, GridResponse, ViewportRect};
use renderer::{rasterize_with, ColorMapper};
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::{GridRequest, GridSource};
use crate::config::OverlayConfig;
use crate::debounce::Debouncer;
use crate::display::{MapDisplay, OverlayLayer};
use crate::metrics::{MetricsSnapshot, OverlayMetrics};
use crate::token::{FetchToken, TokenSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Disabled,
    Idle,
    Pending(FetchToken),
    Rendered,
    Error,
}

/// User-visible messages from the last applied result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub note: Option<String>,
    pub error: Option<String>,
}

impl Advisory {
    pub fn is_empty(&self) -> bool {
        self.note.is_none() && self.error.is_none()
    }
}

/// Viewport events emitted by the map component once a gesture ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportEvent {
    MoveEnd(ViewportRect),
    ZoomEnd(ViewportRect),
}

impl ViewportEvent {
    pub fn viewport(&self) -> ViewportRect {
        match self {
            ViewportEvent::MoveEnd(rect) | ViewportEvent::ZoomEnd(rect) => *rect,
        }
    }
}

struct Inner {
    state: OverlayState,
    tokens: TokenSource,
    debouncer: Debouncer,
    /// Bumped on every settle event and every direct fetch. A debounced
    /// action only fetches while its generation is still the latest.
    settle_generation: u64,
    last_viewport: Option<ViewportRect>,
    /// Whether the display currently holds a raster from this controller.
    has_raster: bool,
    subscription: Option<JoinHandle<()>>,
}

struct Shared {
    source: Arc<dyn GridSource>,
    display: Arc<dyn MapDisplay>,
    config: OverlayConfig,
    mapper: ColorMapper,
    metrics: OverlayMetrics,
    advisories: watch::Sender<Advisory>,
    inner: Mutex<Inner>,
}

/// Heatmap overlay bound to one map display.
///
/// Cloning yields another handle to the same controller. Methods that
/// schedule work spawn tokio tasks and must run inside a runtime.
#[derive(Clone)]
pub struct ViewportOverlayController {
    shared: Arc<Shared>,
}

impl ViewportOverlayController {
    /// Create a disabled controller.
    pub fn new(
        source: Arc<dyn GridSource>,
        display: Arc<dyn MapDisplay>,
        config: OverlayConfig,
    ) -> Self {
        let (advisories, _) = watch::channel(Advisory::default());
        let mapper = ColorMapper::overlay();
        let debouncer = Debouncer::new(config.debounce());

        Self {
            shared: Arc::new(Shared {
                source,
                display,
                config,
                mapper,
                metrics: OverlayMetrics::new(),
                advisories,
                inner: Mutex::new(Inner {
                    state: OverlayState::Disabled,
                    tokens: TokenSource::new(),
                    debouncer,
                    settle_generation: 0,
                    last_viewport: None,
                    has_raster: false,
                    subscription: None,
                }),
            }),
        }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.shared.config
    }

    pub fn state(&self) -> OverlayState {
        self.shared.lock().state
    }

    pub fn is_enabled(&self) -> bool {
        self.state() != OverlayState::Disabled
    }

    pub fn advisory(&self) -> Advisory {
        self.shared.advisories.borrow().clone()
    }

    pub fn subscribe_advisories(&self) -> watch::Receiver<Advisory> {
        self.shared.advisories.subscribe()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.shared.metrics.snapshot()
    }

    /// Viewport of the most recent settled event.
    pub fn last_viewport(&self) -> Option<ViewportRect> {
        self.shared.lock().last_viewport
    }

    /// Turn the overlay on. With a viewport, fetch for it immediately.
    pub fn enable(&self, viewport: Option<ViewportRect>) {
        {
            let mut inner = self.shared.lock();
            if inner.state == OverlayState::Disabled {
                inner.state = OverlayState::Idle;
                debug!("Overlay enabled");
            }
        }
        if let Some(viewport) = viewport {
            Shared::issue_fetch(&self.shared, viewport, None);
        }
    }

    /// Turn the overlay off: cancel the pending fetch and any scheduled
    /// one, and remove the raster from the map.
    pub fn disable(&self) {
        self.shared.disable();
    }

    /// Handle a settled viewport. Fetches after the debounce window unless
    /// another event arrives first.
    pub fn viewport_settled(&self, viewport: ViewportRect) {
        Shared::viewport_settled(&self.shared, viewport);
    }

    /// Subscribe to map viewport events.
    ///
    /// Returns `false` without subscribing when a subscription is already
    /// running, so repeated calls never double-fire fetches.
    pub fn start(&self, mut events: broadcast::Receiver<ViewportEvent>) -> bool {
        let mut inner = self.shared.lock();
        if inner.subscription.as_ref().is_some_and(|h| !h.is_finished()) {
            debug!("Viewport subscription already running");
            return false;
        }

        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        inner.subscription = Some(tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        let Some(shared) = weak.upgrade() else { break };
                        Shared::viewport_settled(&shared, event.viewport());
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "Viewport subscription lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            debug!("Viewport subscription ended");
        }));
        true
    }

    /// Drop the viewport subscription and disable the overlay.
    pub fn stop(&self) {
        if let Some(handle) = self.shared.lock().subscription.take() {
            handle.abort();
        }
        self.shared.disable();
    }

    pub fn is_subscribed(&self) -> bool {
        self.shared
            .lock()
            .subscription
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, advisory: Advisory) {
        self.advisories.send_if_modified(|current| {
            if *current == advisory {
                false
            } else {
                *current = advisory;
                true
            }
        });
    }

    fn disable(&self) {
        let mut inner = self.lock();
        inner.debouncer.cancel();
        inner.settle_generation += 1;
        inner.tokens.invalidate();
        if inner.state != OverlayState::Disabled {
            debug!("Overlay disabled");
        }
        inner.state = OverlayState::Disabled;
        inner.has_raster = false;
        self.display.clear_overlay();
        drop(inner);
        self.publish(Advisory::default());
    }

    fn viewport_settled(shared: &Arc<Shared>, viewport: ViewportRect) {
        let mut inner = shared.lock();
        if inner.state == OverlayState::Disabled {
            debug!("Viewport event ignored while disabled");
            return;
        }
        inner.last_viewport = Some(viewport);
        inner.settle_generation += 1;
        let generation = inner.settle_generation;

        let shared = Arc::clone(shared);
        inner.debouncer.trigger(async move {
            Shared::issue_fetch(&shared, viewport, Some(generation));
        });
    }

    /// Supersede any current fetch and start a new one.
    ///
    /// `generation` is set when the call comes from the debouncer; the fetch
    /// is skipped if a later event or direct fetch has happened since. A
    /// direct fetch drops any scheduled debounced one.
    fn issue_fetch(shared: &Arc<Shared>, viewport: ViewportRect, generation: Option<u64>) {
        let request = GridRequest::new(viewport, &shared.config);
        let token = {
            let mut inner = shared.lock();
            if inner.state == OverlayState::Disabled {
                return;
            }
            match generation {
                Some(generation) if generation != inner.settle_generation => {
                    debug!(generation, "Debounced viewport superseded");
                    return;
                }
                Some(_) => {}
                None => {
                    inner.debouncer.cancel();
                    inner.settle_generation += 1;
                }
            }
            if let Some(previous) = inner.tokens.current() {
                debug!(token = %previous, "Superseding in-flight fetch");
            }
            let token = inner.tokens.issue();
            inner.state = OverlayState::Pending(token);
            inner.last_viewport = Some(viewport);
            token
        };
        shared.metrics.record_fetch_issued();
        debug!(token = %token, "Fetching heatmap");

        let shared = Arc::clone(shared);
        tokio::spawn(async move {
            let result = shared.source.fetch_grid(&request).await;
            shared.apply(token, viewport, result);
        });
    }

    /// Apply a fetch result if its token is still current.
    fn apply(
        &self,
        token: FetchToken,
        viewport: ViewportRect,
        result: Result<GridResponse, AqError>,
    ) {
        let mut inner = self.lock();
        if inner.state == OverlayState::Disabled || !inner.tokens.is_current(token) {
            self.metrics.record_stale();
            debug!(token = %token, "Discarding stale heatmap result");
            return;
        }
        inner.tokens.complete(token);

        let response = match result {
            Ok(response) => response,
            Err(err) if err.is_silent() => {
                debug!(token = %token, "Heatmap fetch cancelled");
                inner.state = if inner.has_raster {
                    OverlayState::Rendered
                } else {
                    OverlayState::Idle
                };
                return;
            }
            Err(err) => {
                warn!(token = %token, error = %err, "Heatmap fetch failed");
                self.metrics.record_failure(err.class());
                inner.state = OverlayState::Error;
                drop(inner);
                self.publish(Advisory {
                    note: None,
                    error: Some(err.advisory_message()),
                });
                return;
            }
        };

        let note = response.note.clone();
        if let Some(message) = response.error {
            warn!(token = %token, error = %message, "Data service reported an error");
            self.metrics.record_failure(ErrorClass::Service);
            inner.state = OverlayState::Error;
            drop(inner);
            self.publish(Advisory {
                note,
                error: Some(message),
            });
            return;
        }

        let grid = match response.grid() {
            Ok(grid) => grid,
            Err(err) => {
                warn!(token = %token, error = %err, "Rejected malformed heatmap");
                self.metrics.record_failure(err.class());
                inner.state = OverlayState::Error;
                drop(inner);
                self.publish(Advisory {
                    note,
                    error: Some(err.advisory_message()),
                });
                return;
            }
        };

        let image = rasterize_with(&grid, &self.mapper);
        let bounds = anchor_for(&viewport);
        info!(
            token = %token,
            rows = grid.rows(),
            cols = grid.cols(),
            south = bounds.south_west.lat,
            west = bounds.south_west.lon,
            north = bounds.north_east.lat,
            east = bounds.north_east.lon,
            "Rendered heatmap overlay"
        );

        // Swap under the lock so a concurrent disable cannot interleave
        self.display.replace_overlay(OverlayLayer {
            image,
            bounds,
            opacity: self.config.opacity,
        });
        self.metrics.record_render();
        inner.has_raster = true;
        inner.state = OverlayState::Rendered;
        drop(inner);
        self.publish(Advisory { note, error: None });
    }
}
