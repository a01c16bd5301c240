//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
use log::*;

use crate::GlyphOutline;

/// Sub-pixel grid used when callers do not ask for a specific one.
pub const DEFAULT_SUPERSAMPLE: u32 = 4;
/// Largest accepted supersampling factor.
pub const MAX_SUPERSAMPLE: u32 = 8;

#[derive(Clone, Debug, Default)]
/// Single-channel coverage bitmap of one glyph.
pub struct GlyphBitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Offset from the pen position to the left edge of the bitmap.
    pub left: i32,
    /// Distance from the baseline up to the top row of the bitmap.
    pub top: i32,
    /// Row-major coverage, 0 = empty, 255 = fully covered.
    pub coverage: Vec<u8>,
}

impl GlyphBitmap {
    /// Returns `true` when there is nothing to draw.
    pub fn is_empty(&self) -> bool { self.width == 0 || self.height == 0 }

    /// Coverage at a pixel, 0 outside the bitmap.
    pub fn at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.coverage[(y * self.width + x) as usize]
    }
}

#[derive(Copy, Clone, Debug)]
struct Edge {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    winding: i32,
}

fn build_edges(outline: &GlyphOutline, scale: f32, left: f32, top: f32) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(outline.points.len());
    for contour in outline.contours() {
        let n = contour.len();
        if n < 2 {
            continue;
        }
        for i in 0..n {
            let p = contour[i];
            let q = contour[(i + 1) % n];
            let (px, py) = (p.x as f32 * scale - left, top - p.y as f32 * scale);
            let (qx, qy) = (q.x as f32 * scale - left, top - q.y as f32 * scale);
            if py == qy {
                continue;
            }
            edges.push(if py < qy {
                Edge { x0: px, y0: py, x1: qx, y1: qy, winding: 1 }
            } else {
                Edge { x0: qx, y0: qy, x1: px, y1: py, winding: -1 }
            });
        }
    }
    edges
}

#[derive(Copy, Clone)]
struct Bounds {
    left: f32,
    top: f32,
    width: u32,
    height: u32,
}

fn pixel_bounds(outline: &GlyphOutline, scale: f32) -> Bounds {
    let min_x = outline.points.iter().map(|p| p.x).min().unwrap_or(0) as f32 * scale;
    let max_x = outline.points.iter().map(|p| p.x).max().unwrap_or(0) as f32 * scale;
    let min_y = outline.points.iter().map(|p| p.y).min().unwrap_or(0) as f32 * scale;
    let max_y = outline.points.iter().map(|p| p.y).max().unwrap_or(0) as f32 * scale;
    let left = min_x.floor();
    let top = max_y.ceil();
    // float to int casts saturate, so absurd scales clamp to u32::MAX
    Bounds {
        left,
        top,
        width: (max_x.ceil() - left).max(0.0) as u32,
        height: (top - min_y.floor()).max(0.0) as u32,
    }
}

fn valid_scale(outline: &GlyphOutline, units_per_em: u16, pixel_height: f32) -> Option<f32> {
    if outline.is_empty() || units_per_em == 0 || !pixel_height.is_finite() || pixel_height <= 0.0 {
        return None;
    }
    Some(pixel_height / units_per_em as f32)
}

/// Width and height in pixels of the bitmap [`rasterize`] would produce, without rasterizing.
pub fn bitmap_size(outline: &GlyphOutline, units_per_em: u16, pixel_height: f32) -> (u32, u32) {
    match valid_scale(outline, units_per_em, pixel_height) {
        Some(scale) => {
            let b = pixel_bounds(outline, scale);
            (b.width, b.height)
        }
        None => (0, 0),
    }
}

fn sample_cells(width: u32, height: u32, n: u32) -> Option<usize> {
    width.checked_mul(n)?;
    height.checked_mul(n)?;
    usize::try_from(width.checked_mul(height)?).ok()
}

/// Rasterizes an outline into a coverage bitmap using an N×N sub-pixel grid and the non-zero winding rule.
///
/// Contours are treated as closed polylines through their on- and off-curve points. `supersample` is clamped
/// to `1..=MAX_SUPERSAMPLE`. A bitmap too large to address or allocate comes back empty.
pub fn rasterize(outline: &GlyphOutline, units_per_em: u16, pixel_height: f32, supersample: u32) -> GlyphBitmap {
    let Some(scale) = valid_scale(outline, units_per_em, pixel_height) else {
        return GlyphBitmap::default();
    };
    let n = supersample.clamp(1, MAX_SUPERSAMPLE);

    let Bounds { left, top, width, height } = pixel_bounds(outline, scale);
    let empty = GlyphBitmap {
        left: left as i32,
        top: top as i32,
        ..Default::default()
    };
    if width == 0 || height == 0 {
        return empty;
    }
    let Some(cells) = sample_cells(width, height, n) else {
        warn!("glyph bitmap {}x{} at {}x supersampling overflows, skipped", width, height, n);
        return empty;
    };
    let mut counts: Vec<u32> = Vec::new();
    if counts.try_reserve_exact(cells).is_err() {
        warn!("cannot allocate a {}x{} glyph bitmap, skipped", width, height);
        return empty;
    }
    counts.resize(cells, 0);

    let edges = build_edges(outline, scale, left, top);
    let mut crossings: Vec<(f32, i32)> = Vec::with_capacity(edges.len());
    let inv_n = 1.0 / n as f32;

    for sample_row in 0..height * n {
        let sy = (sample_row as f32 + 0.5) * inv_n;
        crossings.clear();
        for e in &edges {
            if sy >= e.y0 && sy < e.y1 {
                let t = (sy - e.y0) / (e.y1 - e.y0);
                crossings.push((e.x0 + t * (e.x1 - e.x0), e.winding));
            }
        }
        if crossings.is_empty() {
            continue;
        }
        crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

        let row = (sample_row / n * width) as usize;
        let mut winding = 0;
        let mut next = 0;
        for sample_col in 0..width * n {
            let sx = (sample_col as f32 + 0.5) * inv_n;
            while next < crossings.len() && crossings[next].0 <= sx {
                winding += crossings[next].1;
                next += 1;
            }
            if winding != 0 {
                counts[row + (sample_col / n) as usize] += 1;
            }
        }
    }

    let total = n * n;
    GlyphBitmap {
        width,
        height,
        left: left as i32,
        top: top as i32,
        coverage: counts.iter().map(|&c| ((c * 255 + total / 2) / total) as u8).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutlinePoint;
    use crate::test_support::*;

    fn outline(contours: &[&[(i32, i32)]]) -> GlyphOutline {
        let mut out = GlyphOutline::default();
        for c in contours {
            for &(x, y) in c.iter() {
                out.points.push(OutlinePoint { x, y, on_curve: true });
            }
            out.contour_ends.push(out.points.len());
        }
        out
    }

    #[test]
    fn full_square_is_opaque() {
        let square = outline(&[&[(0, 0), (1000, 0), (1000, 1000), (0, 1000)]]);
        let bmp = rasterize(&square, 1000, 8.0, DEFAULT_SUPERSAMPLE);
        assert_eq!((bmp.width, bmp.height, bmp.left, bmp.top), (8, 8, 0, 8));
        assert!(bmp.coverage.iter().all(|&c| c == 255));
    }

    #[test]
    fn winding_direction_does_not_matter() {
        let ccw = outline(&[&[(0, 0), (1000, 0), (500, 1000)]]);
        let cw = outline(&[&[(500, 1000), (1000, 0), (0, 0)]]);
        let a = rasterize(&ccw, 1000, 12.0, 4);
        let b = rasterize(&cw, 1000, 12.0, 4);
        assert_eq!(a.coverage, b.coverage);
    }

    #[test]
    fn hole_is_left_empty() {
        let font = test_font();
        let b = font.load_glyph(GLYPH_B).unwrap();
        let bmp = rasterize(&b, font.units_per_em(), 10.0, 4);
        assert_eq!((bmp.width, bmp.height), (5, 7));
        assert_eq!(bmp.at(0, 0), 255);
        assert_eq!(bmp.at(4, 6), 255);
        assert_eq!(bmp.at(2, 3), 0);
    }

    #[test]
    fn bearings_follow_outline_bounds() {
        let offset = outline(&[&[(200, 100), (600, 100), (600, 500), (200, 500)]]);
        let bmp = rasterize(&offset, 1000, 10.0, 2);
        assert_eq!((bmp.left, bmp.top, bmp.width, bmp.height), (2, 5, 4, 4));
        assert!(bmp.coverage.iter().all(|&c| c == 255));
    }

    #[test]
    fn antialiased_edges_are_partial() {
        let font = test_font();
        let a = font.load_glyph(GLYPH_A).unwrap();
        let bmp = rasterize(&a, font.units_per_em(), 16.0, 4);
        assert_eq!((bmp.width, bmp.height), (10, 12));
        assert_eq!(bmp.at(0, 0), 0);
        assert_eq!(bmp.at(5, 10), 255);
        assert!(bmp.coverage.iter().any(|&c| c > 0 && c < 255));
    }

    #[test]
    fn single_sample_is_binary() {
        let tri = outline(&[&[(0, 0), (1000, 0), (500, 1000)]]);
        let bmp = rasterize(&tri, 1000, 16.0, 0);
        assert!(bmp.coverage.iter().all(|&c| c == 0 || c == 255));
    }

    #[test]
    fn bitmap_size_matches_rasterized_bitmap() {
        let font = test_font();
        let a = font.load_glyph(GLYPH_A).unwrap();
        let bmp = rasterize(&a, font.units_per_em(), 16.0, 4);
        assert_eq!(bitmap_size(&a, font.units_per_em(), 16.0), (bmp.width, bmp.height));
        assert_eq!(bitmap_size(&a, font.units_per_em(), f32::INFINITY), (0, 0));
    }

    #[test_log::test]
    fn unaddressable_bitmap_comes_back_empty() {
        let square = outline(&[&[(0, 0), (1000, 0), (1000, 1000), (0, 1000)]]);
        assert_eq!(bitmap_size(&square, 1000, 1.0e6), (1_000_000, 1_000_000));
        let bmp = rasterize(&square, 1000, 1.0e6, 4);
        assert!(bmp.is_empty());
        assert!(bmp.coverage.is_empty());
    }

    #[test]
    fn empty_and_invalid_inputs_give_empty_bitmaps() {
        let empty = GlyphOutline::default();
        assert!(rasterize(&empty, 1000, 16.0, 4).is_empty());
        let square = outline(&[&[(0, 0), (1000, 0), (1000, 1000), (0, 1000)]]);
        assert!(rasterize(&square, 0, 16.0, 4).is_empty());
        assert!(rasterize(&square, 1000, f32::NAN, 4).is_empty());
        assert!(rasterize(&square, 1000, -3.0, 4).is_empty());
    }
}
