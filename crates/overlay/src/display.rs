//! Seam to the map component that composites the overlay.

use aq_common::GeoRect;
use renderer::RasterImage;

/// One raster anchored to the map.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayer {
    pub image: RasterImage,
    pub bounds: GeoRect,
    pub opacity: f64,
}

/// Map component accepting image overlays.
///
/// Implementations hold at most one overlay: [`replace_overlay`] swaps it
/// in a single step, so no frame shows the map without an overlay between
/// the old raster and the new one.
///
/// Both methods are called while the controller holds its state lock and
/// must return quickly. Displays that do I/O should queue the work.
///
/// [`replace_overlay`]: MapDisplay::replace_overlay
pub trait MapDisplay: Send + Sync {
    fn replace_overlay(&self, layer: OverlayLayer);

    fn clear_overlay(&self);
}
