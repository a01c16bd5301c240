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
//! Shelf (row) packing of rectangles into a fixed-width strip.
//!
//! Rectangles are placed left to right on the current shelf; when one does not fit in the remaining width a new
//! shelf starts below the tallest rectangle of the current one.

use crate::*;

/// Describes size and padding requirements of shelf packing.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct Config {
    /// Width of the encompassing rectangle.
    pub width: i32,
    /// Height of the encompassing rectangle.
    pub height: i32,
    /// Minimum spacing between border and rectangles.
    pub border_padding: i32,
    /// Minimum spacing between rectangles.
    pub rectangle_padding: i32,
}

pub(crate) struct ShelfPacker {
    config: Config,
    cursor_x: i32,
    shelf_y: i32,
    shelf_height: i32,
}

impl ShelfPacker {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cursor_x: config.border_padding,
            shelf_y: config.border_padding,
            shelf_height: 0,
        }
    }

    /// Places a `width`×`height` rectangle, or returns `None` when it cannot fit.
    pub fn pack(&mut self, width: i32, height: i32) -> Option<Recti> {
        if width <= 0 || height <= 0 {
            return None;
        }
        let right_limit = self.config.width - self.config.border_padding;
        let bottom_limit = self.config.height - self.config.border_padding;
        if self.config.border_padding + width > right_limit {
            return None;
        }

        if self.cursor_x + width > right_limit {
            self.shelf_y += self.shelf_height + self.config.rectangle_padding;
            self.cursor_x = self.config.border_padding;
            self.shelf_height = 0;
        }
        if self.shelf_y as i64 + height as i64 > bottom_limit as i64 {
            return None;
        }

        let placed = rect(self.cursor_x, self.shelf_y, width, height);
        self.cursor_x += width + self.config.rectangle_padding;
        self.shelf_height = self.shelf_height.max(height);
        Some(placed)
    }

    /// Height consumed so far, including the bottom border.
    pub fn used_height(&self) -> i32 { self.shelf_y + self.shelf_height + self.config.border_padding }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: i32, height: i32, padding: i32) -> Config {
        Config {
            width,
            height,
            border_padding: padding,
            rectangle_padding: padding,
        }
    }

    fn overlaps(a: &Recti, b: &Recti) -> bool {
        a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
    }

    #[test]
    fn fills_shelf_then_wraps() {
        let mut p = ShelfPacker::new(config(20, 100, 0));
        let a = p.pack(8, 5).unwrap();
        let b = p.pack(8, 7).unwrap();
        let c = p.pack(8, 3).unwrap();
        assert_eq!((a.x, a.y), (0, 0));
        assert_eq!((b.x, b.y), (8, 0));
        // new shelf below the tallest of the first one
        assert_eq!((c.x, c.y), (0, 7));
        assert_eq!(p.used_height(), 10);
    }

    #[test]
    fn respects_padding_and_never_overlaps() {
        let mut p = ShelfPacker::new(config(64, 64, 1));
        let mut placed = Vec::new();
        for i in 0..30 {
            if let Some(r) = p.pack(3 + i % 5, 2 + i % 7) {
                assert!(r.x >= 1 && r.y >= 1 && r.x + r.width <= 63 && r.y + r.height <= 63);
                placed.push(r);
            }
        }
        assert!(placed.len() > 20);
        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                assert!(!overlaps(a, b));
            }
        }
    }

    #[test]
    fn rejects_what_cannot_fit() {
        let mut p = ShelfPacker::new(config(16, 16, 1));
        assert!(p.pack(15, 2).is_none());
        assert!(p.pack(0, 2).is_none());
        assert!(p.pack(14, 14).is_some());
        assert!(p.pack(4, 4).is_none());
    }
}
