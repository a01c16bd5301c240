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
use std::path::Path;

use log::*;

use crate::*;

/// Triangles whose doubled area is below this are treated as degenerate.
const MIN_AREA: f32 = 1e-6;

#[derive(Copy, Clone)]
/// Texture sampled by [`triangle`] with nearest filtering.
pub enum TextureRef<'a> {
    /// One coverage byte per texel, sampled as white with that alpha.
    Alpha {
        /// Width in texels.
        width: u32,
        /// Height in texels.
        height: u32,
        /// Row-major coverage.
        data: &'a [u8],
    },
    /// Full color texels.
    Rgba {
        /// Width in texels.
        width: u32,
        /// Height in texels.
        height: u32,
        /// Row-major texels.
        data: &'a [Color4b],
    },
}

impl<'a> TextureRef<'a> {
    /// Borrows a font atlas as an alpha texture.
    pub fn from_atlas(atlas: &'a FontAtlas) -> Self {
        Self::Alpha {
            width: atlas.width(),
            height: atlas.height(),
            data: atlas.pixels(),
        }
    }

    fn size(&self) -> (u32, u32) {
        match *self {
            Self::Alpha { width, height, .. } | Self::Rgba { width, height, .. } => (width, height),
        }
    }

    /// Nearest-neighbour lookup; coordinates outside `0..1` clamp to the edge texels.
    pub fn sample(&self, u: f32, v: f32) -> [f32; 4] {
        let (w, h) = self.size();
        if w == 0 || h == 0 {
            return [1.0; 4];
        }
        let tx = ((u * w as f32).floor().max(0.0) as u32).min(w - 1) as usize;
        let ty = ((v * h as f32).floor().max(0.0) as u32).min(h - 1) as usize;
        let idx = ty * w as usize + tx;
        match *self {
            Self::Alpha { data, .. } => [1.0, 1.0, 1.0, data.get(idx).map_or(1.0, |&a| a as f32 / 255.0)],
            Self::Rgba { data, .. } => match data.get(idx) {
                Some(c) => [c.x as f32 / 255.0, c.y as f32 / 255.0, c.z as f32 / 255.0, c.w as f32 / 255.0],
                None => [1.0; 4],
            },
        }
    }
}

/// CPU render target: row-major, top-down RGBA pixels.
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color4b>,
}

impl Framebuffer {
    /// Creates a transparent black framebuffer.
    ///
    /// Dimensions that cannot be allocated give a 0x0 framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = Vec::new();
        let reserved = (width as usize)
            .checked_mul(height as usize)
            .filter(|&len| pixels.try_reserve_exact(len).is_ok());
        match reserved {
            Some(len) => {
                pixels.resize(len, Color4b::default());
                Self { width, height, pixels }
            }
            None => {
                warn!("cannot allocate a {}x{} framebuffer", width, height);
                Self { width: 0, height: 0, pixels }
            }
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 { self.width }

    /// Height in pixels.
    pub fn height(&self) -> u32 { self.height }

    /// Row-major pixels, top row first.
    pub fn pixels(&self) -> &[Color4b] { &self.pixels }

    /// Fills every pixel with `c`.
    pub fn clear(&mut self, c: Color) { self.pixels.fill(color4b(c.r, c.g, c.b, c.a)); }

    /// Reads one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color4b> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Encodes the framebuffer as a 32-bit BMP file.
    pub fn bmp_bytes(&self) -> Result<Vec<u8>, BmpError> { encode_bmp(self.width, self.height, &self.pixels) }

    /// Writes the framebuffer to a BMP file.
    pub fn save_bmp<P: AsRef<Path>>(&self, path: P) -> Result<(), BmpError> { save_bmp(path, self.width, self.height, &self.pixels) }

    /// Renders every triangle of `list`, sampling `texture` when given.
    pub fn draw_list(&mut self, list: &DrawList, texture: Option<&TextureRef>) -> usize {
        triangles_indexed(self, list.vertices(), list.indices(), texture)
    }

    fn blend(&mut self, x: u32, y: u32, src: [f32; 4]) {
        let idx = y as usize * self.width as usize + x as usize;
        let Some(dst) = self.pixels.get_mut(idx) else {
            return;
        };
        let a = src[3].clamp(0.0, 1.0);
        let inv = 1.0 - a;
        let mix = |s: f32, d: u8| ((s.clamp(0.0, 1.0) * a + d as f32 / 255.0 * inv) * 255.0 + 0.5) as u8;
        *dst = color4b(
            mix(src[0], dst.x),
            mix(src[1], dst.y),
            mix(src[2], dst.z),
            ((a + dst.w as f32 / 255.0 * inv) * 255.0 + 0.5) as u8,
        );
    }
}

fn orient(a: Vec2f, b: Vec2f, c: Vec2f) -> f32 { (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x) }

fn lerp3(w: [f32; 3], a: [f32; 4], b: [f32; 4], c: [f32; 4]) -> [f32; 4] {
    let mut out = [0.0; 4];
    for i in 0..4 {
        out[i] = w[0] * a[i] + w[1] * b[i] + w[2] * c[i];
    }
    out
}

/// Rasterizes one triangle with either winding, blending source-over.
/// Returns `false` when the triangle was degenerate and skipped.
pub fn triangle(fb: &mut Framebuffer, v0: &Vertex, v1: &Vertex, v2: &Vertex, texture: Option<&TextureRef>) -> bool {
    let (p0, p1, p2) = (v0.pos, v1.pos, v2.pos);
    let area = orient(p0, p1, p2);
    if !area.is_finite() || area.abs() < MIN_AREA {
        debug!("skipping degenerate triangle (area {})", area);
        return false;
    }

    let min_x = p0.x.min(p1.x).min(p2.x).floor().max(0.0);
    let min_y = p0.y.min(p1.y).min(p2.y).floor().max(0.0);
    let max_x = p0.x.max(p1.x).max(p2.x).ceil().min(fb.width as f32);
    let max_y = p0.y.max(p1.y).max(p2.y).ceil().min(fb.height as f32);
    if max_x <= min_x || max_y <= min_y {
        return true;
    }

    for y in min_y as u32..max_y as u32 {
        for x in min_x as u32..max_x as u32 {
            let p = Vec2f { x: x as f32 + 0.5, y: y as f32 + 0.5 };
            let w0 = orient(p1, p2, p);
            let w1 = orient(p2, p0, p);
            let w2 = orient(p0, p1, p);
            let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0) || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
            if !inside {
                continue;
            }
            let w = [w0 / area, w1 / area, w2 / area];
            let mut src = lerp3(w, v0.color, v1.color, v2.color);
            if let Some(tex) = texture {
                let u = w[0] * v0.uv.x + w[1] * v1.uv.x + w[2] * v2.uv.x;
                let v = w[0] * v0.uv.y + w[1] * v1.uv.y + w[2] * v2.uv.y;
                let t = tex.sample(u, v);
                for i in 0..4 {
                    src[i] *= t[i];
                }
            }
            fb.blend(x, y, src);
        }
    }
    true
}

/// Draws `indices` as a triangle list. Triangles referencing vertices out of range are logged and skipped.
/// Returns the number of triangles drawn.
pub fn triangles_indexed(fb: &mut Framebuffer, vertices: &[Vertex], indices: &[u32], texture: Option<&TextureRef>) -> usize {
    if indices.len() % 3 != 0 {
        warn!("index count {} is not a multiple of 3, ignoring the tail", indices.len());
    }
    let mut drawn = 0;
    for (n, tri) in indices.chunks_exact(3).enumerate() {
        let fetch = |i: u32| vertices.get(i as usize);
        match (fetch(tri[0]), fetch(tri[1]), fetch(tri[2])) {
            (Some(a), Some(b), Some(c)) => {
                if triangle(fb, a, b, c, texture) {
                    drawn += 1;
                }
            }
            _ => warn!("triangle {} indexes past {} vertices: {:?}", n, vertices.len(), tri),
        }
    }
    drawn
}
