//! Tests for PNG encoding of overlay rasters.

use std::io::Read;

use aq_common::Grid;
use renderer::png::{create_png, create_png_auto, PngError};
use renderer::raster::rasterize;
use test_utils::create_aqi_gradient_grid;

// ============================================================================
// Helper functions
// ============================================================================

/// Walk the chunk list of a PNG, returning (type, data) pairs.
fn chunks(png: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut out = Vec::new();
    let mut pos = 8;
    while pos + 8 <= png.len() {
        let len = u32::from_be_bytes([png[pos], png[pos + 1], png[pos + 2], png[pos + 3]]) as usize;
        let kind = String::from_utf8_lossy(&png[pos + 4..pos + 8]).to_string();
        let data = png[pos + 8..pos + 8 + len].to_vec();
        out.push((kind, data));
        pos += 12 + len;
    }
    out
}

fn ihdr_of(png: &[u8]) -> (u32, u32, u8) {
    let (_, data) = chunks(png).into_iter().find(|(k, _)| k == "IHDR").unwrap();
    let w = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    let h = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
    (w, h, data[9])
}

fn inflate_idat(png: &[u8]) -> Vec<u8> {
    let idat: Vec<u8> = chunks(png)
        .into_iter()
        .filter(|(k, _)| k == "IDAT")
        .flat_map(|(_, d)| d)
        .collect();
    let mut out = Vec::new();
    flate2::read::ZlibDecoder::new(&idat[..])
        .read_to_end(&mut out)
        .unwrap();
    out
}

// ============================================================================
// Encoding tests
// ============================================================================

#[test]
fn test_overlay_raster_encodes_indexed() {
    let grid = Grid::from_rows(&create_aqi_gradient_grid(12, 5)).unwrap();
    let png = rasterize(&grid).to_png().unwrap();

    assert_eq!(&png[..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    assert_eq!(ihdr_of(&png), (5, 12, 3));

    let kinds: Vec<String> = chunks(&png).into_iter().map(|(k, _)| k).collect();
    assert_eq!(kinds.first().map(String::as_str), Some("IHDR"));
    assert_eq!(kinds.last().map(String::as_str), Some("IEND"));
    assert!(kinds.iter().any(|k| k == "PLTE"));
}

#[test]
fn test_transparent_cells_emit_trns() {
    let grid = Grid::from_rows(&[vec![None, Some(30.0)]]).unwrap();
    let png = rasterize(&grid).to_png().unwrap();
    let (_, trns) = chunks(&png).into_iter().find(|(k, _)| k == "tRNS").unwrap();
    assert!(trns.contains(&0));
    assert!(trns.contains(&255));
}

#[test]
fn test_opaque_raster_has_no_trns() {
    let grid = Grid::from_rows(&[vec![Some(10.0), Some(30.0)]]).unwrap();
    let png = rasterize(&grid).to_png().unwrap();
    assert!(chunks(&png).iter().all(|(k, _)| k != "tRNS"));
}

#[test]
fn test_indexed_scanlines() {
    // 2x2, two colors
    let pixels = [
        255, 0, 0, 255, 0, 255, 0, 255, //
        0, 255, 0, 255, 255, 0, 0, 255,
    ];
    let png = create_png_auto(&pixels, 2, 2).unwrap();
    let raw = inflate_idat(&png);
    // filter byte + 2 indices per row
    assert_eq!(raw, vec![0, 0, 1, 0, 1, 0]);
}

#[test]
fn test_rgba_fallback_for_many_colors() {
    let width = 20;
    let height = 20;
    let pixels: Vec<u8> = (0..width * height)
        .flat_map(|i| [(i % 256) as u8, (i / 256) as u8, 7, 255])
        .collect();
    let png = create_png_auto(&pixels, width, height).unwrap();
    assert_eq!(ihdr_of(&png), (20, 20, 6));
    assert_eq!(inflate_idat(&png).len(), height * (1 + width * 4));
}

#[test]
fn test_crc_matches() {
    let png = create_png(&[1, 2, 3, 4], 1, 1).unwrap();
    let mut pos = 8;
    while pos < png.len() {
        let len = u32::from_be_bytes([png[pos], png[pos + 1], png[pos + 2], png[pos + 3]]) as usize;
        let body = &png[pos + 4..pos + 8 + len];
        let crc = u32::from_be_bytes([
            png[pos + 8 + len],
            png[pos + 9 + len],
            png[pos + 10 + len],
            png[pos + 11 + len],
        ]);
        assert_eq!(crc32fast::hash(body), crc);
        pos += 12 + len;
    }
}

// ============================================================================
// Error tests
// ============================================================================

#[test]
fn test_buffer_size_mismatch() {
    let err = create_png(&[0, 0, 0], 1, 1).unwrap_err();
    assert!(matches!(err, PngError::BufferSize { expected: 4, found: 3, .. }));
}

#[test]
fn test_zero_dimensions() {
    let err = create_png_auto(&[], 0, 0).unwrap_err();
    assert!(matches!(err, PngError::Dimensions { .. }));
}
