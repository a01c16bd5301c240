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
// -----------------------------------------------------------------------------
// Ported to rust from https://github.com/rxi/microui/ and the original license
//
// Copyright (c) 2020 rxi
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.
//
use log::*;

use crate::*;

/// Deepest allowed nesting of layout regions, the root region included.
pub const MAX_LAYOUT_DEPTH: usize = 16;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Primary axis of a layout region.
pub enum Axis {
    /// Items stack downwards and span the full width.
    Vertical,
    /// Items stack rightwards and span the full height.
    Horizontal,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Region {
    pub body: Recti,
    pub axis: Axis,
    /// Distance advanced along the axis from the body origin.
    pub cursor: i32,
    items: usize,
}

impl Region {
    fn new(body: Recti, axis: Axis) -> Self { Self { body, axis, cursor: 0, items: 0 } }

    fn length(&self) -> i32 {
        match self.axis {
            Axis::Vertical => self.body.height,
            Axis::Horizontal => self.body.width,
        }
    }

    pub fn remaining(&self) -> i32 { (self.length() - self.cursor).max(0) }
}

pub(crate) struct LayoutStack {
    spacing: i32,
    regions: Vec<Region>,
}

impl LayoutStack {
    pub fn new(spacing: i32) -> Self {
        Self {
            spacing,
            regions: Vec::with_capacity(MAX_LAYOUT_DEPTH),
        }
    }

    pub fn reset(&mut self, root: Recti) {
        self.regions.clear();
        self.regions.push(Region::new(root, Axis::Vertical));
    }

    pub fn depth(&self) -> usize { self.regions.len() }

    pub fn top(&self) -> Option<&Region> { self.regions.last() }

    /// Refuses (and logs) pushes past [`MAX_LAYOUT_DEPTH`].
    pub fn push(&mut self, body: Recti, axis: Axis) -> bool {
        if self.regions.len() >= MAX_LAYOUT_DEPTH {
            warn!("layout stack overflow: depth {} reached, region ignored", MAX_LAYOUT_DEPTH);
            return false;
        }
        self.regions.push(Region::new(body, axis));
        true
    }

    pub fn pop(&mut self) -> Option<Region> {
        let popped = self.regions.pop();
        if popped.is_none() {
            warn!("layout stack underflow: pop without a matching push");
        }
        popped
    }

    /// Drops every region above `depth`, returning how many were dropped.
    pub fn truncate(&mut self, depth: usize) -> usize {
        let stray = self.regions.len().saturating_sub(depth);
        self.regions.truncate(depth);
        stray
    }

    /// Places the next item of `size` pixels along the top region's axis.
    pub fn next(&mut self, size: i32) -> Recti {
        let spacing = self.spacing;
        let Some(region) = self.regions.last_mut() else {
            warn!("layout requested with an empty layout stack");
            return rect(0, 0, 0, 0);
        };
        let size = size.max(0);
        let start = if region.items > 0 { region.cursor.saturating_add(spacing) } else { region.cursor };
        region.cursor = start.saturating_add(size);
        region.items += 1;
        let b = region.body;
        match region.axis {
            Axis::Vertical => rect(b.x, b.y + start, b.width, size),
            Axis::Horizontal => rect(b.x + start, b.y, size, b.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(r: Recti) -> (i32, i32, i32, i32) { (r.x, r.y, r.width, r.height) }

    #[test]
    fn vertical_items_get_full_width() {
        let mut stack = LayoutStack::new(4);
        stack.reset(rect(10, 20, 100, 200));
        assert_eq!(parts(stack.next(30)), (10, 20, 100, 30));
        assert_eq!(parts(stack.next(10)), (10, 54, 100, 10));
        assert_eq!(stack.top().unwrap().cursor, 44);
        assert_eq!(stack.top().unwrap().remaining(), 156);
    }

    #[test]
    fn horizontal_items_get_full_height() {
        let mut stack = LayoutStack::new(2);
        stack.reset(rect(0, 0, 100, 100));
        assert!(stack.push(rect(0, 0, 50, 16), Axis::Horizontal));
        assert_eq!(parts(stack.next(20)), (0, 0, 20, 16));
        assert_eq!(parts(stack.next(20)), (22, 0, 20, 16));
        assert_eq!(stack.top().unwrap().remaining(), 8);
        let popped = stack.pop().unwrap();
        assert_eq!(popped.axis, Axis::Horizontal);
        assert_eq!(stack.depth(), 1);
    }

    #[test_log::test]
    fn push_past_max_depth_is_refused() {
        let mut stack = LayoutStack::new(0);
        stack.reset(rect(0, 0, 10, 10));
        for _ in 1..MAX_LAYOUT_DEPTH {
            assert!(stack.push(rect(0, 0, 10, 10), Axis::Vertical));
        }
        assert!(!stack.push(rect(0, 0, 10, 10), Axis::Vertical));
        assert_eq!(stack.depth(), MAX_LAYOUT_DEPTH);
        assert_eq!(stack.truncate(1), MAX_LAYOUT_DEPTH - 1);
    }

    #[test_log::test]
    fn pop_and_next_on_empty_stack_recover() {
        let mut stack = LayoutStack::new(0);
        assert!(stack.pop().is_none());
        assert_eq!(parts(stack.next(10)), (0, 0, 0, 0));
    }
}
