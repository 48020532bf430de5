//! PNG encoding for overlay rasters.
//!
//! Overlay rasters use at most eight colors (six bands, transparent and
//! no-data), so they normally go out as indexed PNG (color type 3) with a
//! tRNS chunk for the transparent entry. Buffers with more than 256 colors
//! fall back to RGBA (color type 6).

use std::collections::HashMap;
use std::io::Write;

use thiserror::Error;

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

#[derive(Debug, Error)]
pub enum PngError {
    #[error("Pixel buffer has {found} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: usize,
        height: usize,
        expected: usize,
        found: usize,
    },

    #[error("Image dimensions must be non-zero and fit in u32: {width}x{height}")]
    Dimensions { width: usize, height: usize },

    #[error("IDAT compression failed: {0}")]
    Compression(#[from] std::io::Error),
}

/// Create a PNG, choosing indexed encoding whenever the palette fits.
pub fn create_png_auto(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, PngError> {
    check_buffer(pixels, width, height)?;

    match extract_palette(pixels) {
        Some((palette, indices)) => create_png_indexed(width, height, &palette, &indices),
        None => create_png(pixels, width, height),
    }
}

/// Pack RGBA bytes into a u32 for hashing.
#[inline(always)]
fn pack_color(px: &[u8]) -> u32 {
    u32::from_le_bytes([px[0], px[1], px[2], px[3]])
}

/// Build a palette and per-pixel indices; `None` when over 256 colors.
fn extract_palette(pixels: &[u8]) -> Option<(Vec<[u8; 4]>, Vec<u8>)> {
    let mut color_to_index: HashMap<u32, u8> = HashMap::new();
    let mut palette: Vec<[u8; 4]> = Vec::new();
    let mut indices: Vec<u8> = Vec::with_capacity(pixels.len() / 4);

    for px in pixels.chunks_exact(4) {
        let packed = pack_color(px);
        let index = match color_to_index.get(&packed) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push([px[0], px[1], px[2], px[3]]);
                color_to_index.insert(packed, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Create an indexed PNG (color type 3) from a palette and indices.
pub fn create_png_indexed(
    width: usize,
    height: usize,
    palette: &[[u8; 4]],
    indices: &[u8],
) -> Result<Vec<u8>, PngError> {
    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 3)?);

    let plte: Vec<u8> = palette.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    // tRNS only when some entry is not fully opaque
    if palette.iter().any(|c| c[3] < 255) {
        let trns: Vec<u8> = palette.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    let idat = deflate_scanlines(indices, width, height)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Create an RGBA PNG (color type 6).
pub fn create_png(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, PngError> {
    check_buffer(pixels, width, height)?;

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 6)?);
    let idat = deflate_scanlines(pixels, width * 4, height)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

fn check_buffer(pixels: &[u8], width: usize, height: usize) -> Result<(), PngError> {
    let expected = width * height * 4;
    if pixels.len() != expected {
        return Err(PngError::BufferSize {
            width,
            height,
            expected,
            found: pixels.len(),
        });
    }
    Ok(())
}

fn ihdr(width: usize, height: usize, color_type: u8) -> Result<Vec<u8>, PngError> {
    let (w, h) = match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(PngError::Dimensions { width, height }),
    };

    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&w.to_be_bytes());
    data.extend_from_slice(&h.to_be_bytes());
    data.push(8); // bit depth
    data.push(color_type);
    data.push(0); // compression method
    data.push(0); // filter method
    data.push(0); // interlace method
    Ok(data)
}

/// Prefix each scanline with filter byte 0 and zlib-compress.
fn deflate_scanlines(data: &[u8], row_bytes: usize, height: usize) -> Result<Vec<u8>, PngError> {
    let mut raw = Vec::with_capacity(height * (1 + row_bytes));
    for row in data.chunks_exact(row_bytes).take(height) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&raw)?;
    Ok(encoder.finish()?)
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_palette_simple() {
        let pixels = [
            255, 0, 0, 255, // red
            0, 255, 0, 255, // green
            0, 0, 0, 0, // transparent
            255, 0, 0, 255, // red again
        ];

        let (palette, indices) = extract_palette(&pixels).unwrap();
        assert_eq!(palette.len(), 3);
        assert_eq!(indices, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_extract_palette_overflow() {
        let pixels: Vec<u8> = (0..300u32).flat_map(|i| [i as u8, (i >> 8) as u8, 0, 255]).collect();
        assert!(extract_palette(&pixels).is_none());
    }
}
