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
use std::collections::{HashMap, HashSet};
#[cfg(feature = "png_export")]
use std::fs::File;
#[cfg(feature = "png_export")]
use std::io::{BufWriter, Write};
use std::path::Path;

use log::*;

use crate::raster::{DEFAULT_SUPERSAMPLE, bitmap_size, rasterize};
use crate::shelf_packer::{Config, ShelfPacker};
use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
/// Normalized texture rectangle.
pub struct UvRect {
    /// Left edge.
    pub u0: f32,
    /// Top edge.
    pub v0: f32,
    /// Right edge.
    pub u1: f32,
    /// Bottom edge.
    pub v1: f32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
/// Placement and metrics of one glyph inside a [`FontAtlas`].
pub struct PackedGlyph {
    /// Left texel of the bitmap in the atlas.
    pub x: u32,
    /// Top texel of the bitmap in the atlas.
    pub y: u32,
    /// Bitmap width, 0 for blank glyphs.
    pub width: u32,
    /// Bitmap height, 0 for blank glyphs.
    pub height: u32,
    /// Texture coordinates of the bitmap.
    pub uv: UvRect,
    /// Pixels from the pen position to the bitmap's left edge.
    pub bearing_x: f32,
    /// Pixels from the baseline up to the bitmap's top edge.
    pub bearing_y: f32,
    /// Pen advance in pixels.
    pub advance: f32,
}

impl PackedGlyph {
    /// Returns `true` for glyphs without pixels (e.g. space).
    pub fn is_empty(&self) -> bool { self.width == 0 || self.height == 0 }
}

#[derive(Copy, Clone, Debug)]
/// Parameters of [`FontAtlas::build_with`].
pub struct AtlasConfig {
    /// Target pixel height of one em.
    pub pixel_height: f32,
    /// Empty texels around every packed bitmap.
    pub padding: u32,
    /// Sub-pixel grid size, clamped to `1..=MAX_SUPERSAMPLE`.
    pub supersample: u32,
    /// Largest atlas width or height.
    pub max_size: u32,
    /// Side of the opaque block backing solid-color quads.
    pub white_size: u32,
}

impl AtlasConfig {
    /// Default settings for a pixel height.
    pub fn new(pixel_height: f32) -> Self {
        Self {
            pixel_height,
            padding: 1,
            supersample: DEFAULT_SUPERSAMPLE,
            max_size: 4096,
            white_size: 3,
        }
    }
}

/// One single-channel texture holding every requested glyph plus an opaque white block.
///
/// Built once and immutable afterwards.
pub struct FontAtlas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    glyphs: HashMap<char, PackedGlyph>,
    white: UvRect,
    units_per_em: u16,
    pixel_height: f32,
    ascender: f32,
    descender: f32,
    line_gap: f32,
}

struct Tile {
    codepoint: char,
    bitmap: GlyphBitmap,
    advance: f32,
}

fn load_outline(font: &ParsedFont, codepoint: char, glyph: u16) -> Result<GlyphOutline, AtlasError> {
    match font.load_glyph(glyph) {
        Ok(outline) => Ok(outline),
        Err(err) if err.is_recoverable() => {
            debug!("{:?}: {}, substituting .notdef", codepoint, err);
            match font.load_glyph(0) {
                Ok(outline) => Ok(outline),
                Err(err) => {
                    warn!(".notdef unusable ({}), {:?} stays blank", err, codepoint);
                    Ok(GlyphOutline::default())
                }
            }
        }
        Err(err) => Err(err.into()),
    }
}

fn uv_rect(x: u32, y: u32, w: u32, h: u32, atlas_w: u32, atlas_h: u32) -> UvRect {
    UvRect {
        u0: x as f32 / atlas_w as f32,
        v0: y as f32 / atlas_h as f32,
        u1: (x + w) as f32 / atlas_w as f32,
        v1: (y + h) as f32 / atlas_h as f32,
    }
}

/// Packs `sizes` (white block first) and returns the atlas dimensions plus the placements.
fn pack_tiles(sizes: &[(u32, u32)], padding: u32, max_size: u32) -> Option<(u32, u32, Vec<Recti>)> {
    let pad = padding as u64;
    let area: u64 = sizes.iter().map(|&(w, h)| (w as u64 + pad) * (h as u64 + pad)).sum();
    let widest = sizes.iter().map(|&(w, _)| w as u64).max().unwrap_or(1) + 2 * pad;
    let mut width = ((area as f64).sqrt().ceil() as u64).max(widest).max(1).next_power_of_two();

    while width <= max_size as u64 {
        let mut packer = ShelfPacker::new(Config {
            width: width as i32,
            height: i32::MAX,
            border_padding: padding as i32,
            rectangle_padding: padding as i32,
        });
        let placed: Option<Vec<Recti>> = sizes.iter().map(|&(w, h)| packer.pack(w as i32, h as i32)).collect();
        if let Some(placed) = placed {
            let height = (packer.used_height().max(1) as u64).next_power_of_two();
            if height <= max_size as u64 {
                return Some((width as u32, height as u32, placed));
            }
        }
        width *= 2;
    }
    None
}

impl FontAtlas {
    /// Rasterizes `codepoints` at `pixel_height` and packs them with `padding` texels between bitmaps.
    pub fn build(font: &ParsedFont, pixel_height: f32, codepoints: &[char], padding: u32) -> Result<Self, AtlasError> {
        let config = AtlasConfig {
            padding,
            ..AtlasConfig::new(pixel_height)
        };
        Self::build_with(font, codepoints, &config)
    }

    /// Builds an atlas with explicit settings.
    pub fn build_with(font: &ParsedFont, codepoints: &[char], config: &AtlasConfig) -> Result<Self, AtlasError> {
        let scale = font.scale_for_pixel_height(config.pixel_height);
        let pad2 = 2 * config.padding as u64;
        let fits = |side: u32| side as u64 + pad2 <= config.max_size as u64;

        let mut seen = HashSet::new();
        let mut tiles = Vec::with_capacity(codepoints.len());
        for &codepoint in codepoints {
            if !seen.insert(codepoint) {
                continue;
            }
            let glyph = font.glyph_index(codepoint as u32);
            if glyph == 0 {
                debug!("{:?} is not mapped by the font", codepoint);
            }
            let outline = load_outline(font, codepoint, glyph)?;
            let (width, height) = bitmap_size(&outline, font.units_per_em(), config.pixel_height);
            if width > 0 && height > 0 && !(fits(width) && fits(height)) {
                let pad = 2u32.saturating_mul(config.padding);
                return Err(AtlasError::GlyphTooLarge {
                    codepoint,
                    width: width.saturating_add(pad),
                    height: height.saturating_add(pad),
                    max_size: config.max_size,
                });
            }
            tiles.push(Tile {
                codepoint,
                bitmap: rasterize(&outline, font.units_per_em(), config.pixel_height, config.supersample),
                advance: font.h_metrics(glyph).advance_width as f32 * scale,
            });
        }

        // tallest first, ties keep request order
        let mut order: Vec<usize> = (0..tiles.len()).filter(|&i| !tiles[i].bitmap.is_empty()).collect();
        order.sort_by(|&a, &b| tiles[b].bitmap.height.cmp(&tiles[a].bitmap.height));

        let white_size = config.white_size.max(1);
        let mut sizes = Vec::with_capacity(order.len() + 1);
        sizes.push((white_size, white_size));
        sizes.extend(order.iter().map(|&i| (tiles[i].bitmap.width, tiles[i].bitmap.height)));

        let (width, height, placed) = pack_tiles(&sizes, config.padding, config.max_size).ok_or(AtlasError::AtlasFull(config.max_size))?;

        let len = width as usize * height as usize;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| AtlasError::OutOfMemory(width, height))?;
        pixels.resize(len, 0u8);

        let white_rect = placed[0];
        for y in 0..white_size {
            let row = (white_rect.y as u32 + y) as usize * width as usize + white_rect.x as usize;
            pixels[row..row + white_size as usize].fill(255);
        }
        let center = white_size / 2;
        let white = uv_rect(white_rect.x as u32 + center, white_rect.y as u32 + center, 1, 1, width, height);

        let mut glyphs = HashMap::with_capacity(tiles.len());
        for t in &tiles {
            glyphs.insert(
                t.codepoint,
                PackedGlyph {
                    x: 0,
                    y: 0,
                    width: 0,
                    height: 0,
                    uv: UvRect::default(),
                    bearing_x: t.bitmap.left as f32,
                    bearing_y: t.bitmap.top as f32,
                    advance: t.advance,
                },
            );
        }
        for (slot, &i) in order.iter().enumerate() {
            let t = &tiles[i];
            let r = placed[slot + 1];
            let (x, y, w, h) = (r.x as u32, r.y as u32, t.bitmap.width, t.bitmap.height);
            for row in 0..h {
                let dst = (y + row) as usize * width as usize + x as usize;
                let src = (row * w) as usize;
                pixels[dst..dst + w as usize].copy_from_slice(&t.bitmap.coverage[src..src + w as usize]);
            }
            if let Some(entry) = glyphs.get_mut(&t.codepoint) {
                entry.x = x;
                entry.y = y;
                entry.width = w;
                entry.height = h;
                entry.uv = uv_rect(x, y, w, h, width, height);
            }
        }

        info!("packed {} glyphs at {}px into a {}x{} atlas", glyphs.len(), config.pixel_height, width, height);
        Ok(Self {
            width,
            height,
            pixels,
            glyphs,
            white,
            units_per_em: font.units_per_em(),
            pixel_height: config.pixel_height,
            ascender: font.ascender() as f32 * scale,
            descender: font.descender() as f32 * scale,
            line_gap: font.line_gap() as f32 * scale,
        })
    }

    /// Returns the packed glyph for a codepoint that was part of the build set.
    pub fn lookup(&self, codepoint: char) -> Option<PackedGlyph> { self.glyphs.get(&codepoint).copied() }

    /// Texel rectangle of the opaque white block.
    pub fn white_uv(&self) -> UvRect { self.white }

    /// Center of the opaque white texel, used for every vertex of a solid quad.
    pub fn white_texel(&self) -> Vec2f {
        Vec2f {
            x: (self.white.u0 + self.white.u1) * 0.5,
            y: (self.white.v0 + self.white.v1) * 0.5,
        }
    }

    /// Texture width (power of two).
    pub fn width(&self) -> u32 { self.width }

    /// Texture height (power of two).
    pub fn height(&self) -> u32 { self.height }

    /// Row-major coverage texels.
    pub fn pixels(&self) -> &[u8] { &self.pixels }

    /// Number of packed codepoints.
    pub fn glyph_count(&self) -> usize { self.glyphs.len() }

    /// Design units per em of the source font.
    pub fn units_per_em(&self) -> u16 { self.units_per_em }

    /// Pixel height the glyphs were rasterized at.
    pub fn pixel_height(&self) -> f32 { self.pixel_height }

    /// Ascender in pixels.
    pub fn ascender(&self) -> f32 { self.ascender }

    /// Descender in pixels (negative below the baseline).
    pub fn descender(&self) -> f32 { self.descender }

    /// Line gap in pixels.
    pub fn line_gap(&self) -> f32 { self.line_gap }

    /// Baseline-to-baseline distance in pixels.
    pub fn line_height(&self) -> f32 { self.ascender - self.descender + self.line_gap }

    /// Opaque gray RGBA view of the coverage, suitable for image export.
    pub fn to_rgba(&self) -> Vec<Color4b> { self.pixels.iter().map(|&c| color4b(c, c, c, 0xFF)).collect() }

    /// Encodes the atlas as a BMP.
    pub fn bmp_bytes(&self) -> Result<Vec<u8>, AtlasError> { Ok(encode_bmp(self.width, self.height, &self.to_rgba())?) }

    /// Writes the atlas to a BMP file.
    pub fn save_bmp<P: AsRef<Path>>(&self, path: P) -> Result<(), AtlasError> {
        Ok(crate::bmp::save_bmp(path, self.width, self.height, &self.to_rgba())?)
    }

    /// Encodes the atlas as an RGBA PNG with the coverage in the alpha channel.
    #[cfg(feature = "png_export")]
    pub fn png_bytes(&self) -> Result<Vec<u8>, AtlasError> {
        let mut bytes = Vec::new();
        let pixels = self.pixels.iter().flat_map(|&c| [0xFF, 0xFF, 0xFF, c]).collect::<Vec<u8>>();
        {
            let mut encoder = png::Encoder::new(&mut bytes, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(pixels.as_slice())?;
        }
        Ok(bytes)
    }

    /// Writes the atlas to a PNG file.
    #[cfg(feature = "png_export")]
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), AtlasError> {
        let bytes = self.png_bytes()?;
        let mut w = BufWriter::new(File::create(path)?);
        w.write_all(bytes.as_slice())?;
        w.flush()?;
        Ok(())
    }
}
