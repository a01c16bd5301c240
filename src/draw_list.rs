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

use crate::*;

#[derive(Default, Copy, Clone)]
#[repr(C)]
/// Vertex emitted for every UI and text quad: position, texture coordinate and normalized RGBA.
pub struct Vertex {
    /// Screen-space position.
    pub pos: Vec2f,
    /// Atlas texture coordinate.
    pub uv: Vec2f,
    /// RGBA in `0.0..=1.0`.
    pub color: [f32; 4],
}

impl Vertex {
    /// Creates a vertex with the provided position, texture coordinate, and color.
    pub fn new(pos: Vec2f, uv: Vec2f, color: [f32; 4]) -> Self { Self { pos, uv, color } }
}

#[derive(Copy, Clone, Debug, PartialEq)]
/// Axis-aligned screen rectangle in floating point, given by its corners.
pub struct QuadRect {
    /// Left edge.
    pub x0: f32,
    /// Top edge.
    pub y0: f32,
    /// Right edge.
    pub x1: f32,
    /// Bottom edge.
    pub y1: f32,
}

impl QuadRect {
    /// Converts an integer rectangle.
    pub fn from_rect(r: Recti) -> Self {
        Self {
            x0: r.x as f32,
            y0: r.y as f32,
            x1: r.x as f32 + r.width as f32,
            y1: r.y as f32 + r.height as f32,
        }
    }
}

/// Clips `dst` against `clip`, remapping `uv` so the visible part samples the same texels.
/// Returns `None` when nothing remains.
pub fn clip_quad(dst: QuadRect, uv: UvRect, clip: Recti) -> Option<(QuadRect, UvRect)> {
    let c = QuadRect::from_rect(clip);
    let x0 = dst.x0.max(c.x0);
    let y0 = dst.y0.max(c.y0);
    let x1 = dst.x1.min(c.x1);
    let y1 = dst.y1.min(c.y1);
    if !(x1 > x0 && y1 > y0) {
        return None;
    }
    if x0 == dst.x0 && y0 == dst.y0 && x1 == dst.x1 && y1 == dst.y1 {
        return Some((dst, uv));
    }
    let w = dst.x1 - dst.x0;
    let h = dst.y1 - dst.y0;
    let u = |x: f32| uv.u0 + (x - dst.x0) / w * (uv.u1 - uv.u0);
    let v = |y: f32| uv.v0 + (y - dst.y0) / h * (uv.v1 - uv.v0);
    Some((QuadRect { x0, y0, x1, y1 }, UvRect { u0: u(x0), v0: v(y0), u1: u(x1), v1: v(y1) }))
}

const MIN_CAPACITY: usize = 64;

/// Grows `v` so `extra` more items fit, doubling the capacity. `false` when the allocation fails.
fn reserve_doubling<T>(v: &mut Vec<T>, extra: usize) -> bool {
    let Some(needed) = v.len().checked_add(extra) else {
        return false;
    };
    if needed <= v.capacity() {
        return true;
    }
    let target = needed.max(v.capacity().saturating_mul(2)).max(MIN_CAPACITY);
    v.try_reserve_exact(target - v.len()).is_ok()
}

#[derive(Default, Clone)]
/// Growable vertex/index accumulation buffer. Every three indices form one triangle.
pub struct DrawList {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl DrawList {
    /// Creates an empty list.
    pub fn new() -> Self { Self::default() }

    /// Drops the contents but keeps the allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Accumulated vertices.
    pub fn vertices(&self) -> &[Vertex] { &self.vertices }

    /// Accumulated indices.
    pub fn indices(&self) -> &[u32] { &self.indices }

    /// Returns `true` when nothing was emitted.
    pub fn is_empty(&self) -> bool { self.indices.is_empty() }

    /// Number of complete triangles.
    pub fn triangle_count(&self) -> usize { self.indices.len() / 3 }

    /// Vertex buffer capacity, exposed for growth diagnostics.
    pub fn vertex_capacity(&self) -> usize { self.vertices.capacity() }

    fn reserve(&mut self, vertices: usize, indices: usize) -> bool {
        if self.vertices.len() + vertices > u32::MAX as usize {
            warn!("draw list exceeds 32-bit indices, dropping geometry");
            return false;
        }
        if !reserve_doubling(&mut self.vertices, vertices) || !reserve_doubling(&mut self.indices, indices) {
            warn!("draw list allocation failed, dropping geometry");
            return false;
        }
        true
    }

    /// Appends an indexed batch; indices are relative to `vertices`.
    pub fn push_triangles(&mut self, vertices: &[Vertex], indices: &[u32]) -> bool {
        if !self.reserve(vertices.len(), indices.len()) {
            return false;
        }
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        self.indices.extend(indices.iter().map(|i| base + i));
        true
    }

    /// Appends a textured quad as two triangles, counter-clockwise on screen (y down).
    pub fn push_quad(&mut self, dst: QuadRect, uv: UvRect, color: [f32; 4]) -> bool {
        let vertices = [
            Vertex::new(Vec2f { x: dst.x0, y: dst.y0 }, Vec2f { x: uv.u0, y: uv.v0 }, color),
            Vertex::new(Vec2f { x: dst.x0, y: dst.y1 }, Vec2f { x: uv.u0, y: uv.v1 }, color),
            Vertex::new(Vec2f { x: dst.x1, y: dst.y1 }, Vec2f { x: uv.u1, y: uv.v1 }, color),
            Vertex::new(Vec2f { x: dst.x1, y: dst.y0 }, Vec2f { x: uv.u1, y: uv.v0 }, color),
        ];
        self.push_triangles(&vertices, &[0, 1, 2, 0, 2, 3])
    }

    /// Appends a quad clipped against `clip`. Returns `false` if nothing was emitted.
    pub fn push_quad_clipped(&mut self, dst: QuadRect, uv: UvRect, color: [f32; 4], clip: Recti) -> bool {
        match clip_quad(dst, uv, clip) {
            Some((dst, uv)) => self.push_quad(dst, uv, color),
            None => false,
        }
    }

    /// Appends a solid rectangle sampling the atlas' white texel.
    pub fn push_solid_rect(&mut self, r: Recti, white: Vec2f, color: Color, clip: Recti) -> bool {
        let uv = UvRect {
            u0: white.x,
            v0: white.y,
            u1: white.x,
            v1: white.y,
        };
        self.push_quad_clipped(QuadRect::from_rect(r), uv, color.to_rgba_f32(), clip)
    }

    /// Consumes the list, handing out its buffers.
    pub fn into_parts(self) -> (Vec<Vertex>, Vec<u32>) { (self.vertices, self.indices) }

    /// Appends another list, rebasing its indices.
    pub fn append(&mut self, other: &DrawList) -> bool { self.push_triangles(&other.vertices, &other.indices) }
}
