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
use std::mem;

use log::*;

use crate::context::DrawTarget;
use crate::panel::ScrollFrame;
use crate::*;

#[derive(Copy, Clone, Default)]
/// Caller-owned state of a window, carried across frames.
pub struct WindowState {
    /// Outer rectangle, title bar included.
    pub rect: Recti,
    /// Body scroll position.
    pub scroll: ScrollState,
    /// Only the title bar is shown.
    pub collapsed: bool,
    /// Stacking order; `0` means not yet assigned, higher draws on top.
    pub z_order: i32,
}

impl WindowState {
    /// A window at `rect`, placed above existing windows on first use.
    pub fn new(rect: Recti) -> Self {
        Self {
            rect,
            ..Default::default()
        }
    }
}

/// Geometry a window produced during the last frame.
pub struct WindowEntry {
    /// Window id.
    pub id: WidgetId,
    /// Stacking order at the end of the frame.
    pub z_order: i32,
    /// Hit-test rectangle used for input routing on the next frame.
    pub rect: Recti,
    pub(crate) list: DrawList,
}

impl WindowEntry {
    /// Everything the window drew.
    pub fn draw_list(&self) -> &DrawList { &self.list }
}

struct OpenWindow {
    id: WidgetId,
    z_order: i32,
    hit_rect: Recti,
    clip_depth: usize,
    saved_clip_floor: usize,
    body: Option<ScrollFrame>,
}

#[derive(Default)]
pub(crate) struct WindowContext {
    /// `(id, rect, z)` of every window declared last frame.
    previous: Vec<(WidgetId, Recti, i32)>,
    hover: Option<WidgetId>,
    max_z: i32,
    entries: Vec<WindowEntry>,
    open: Option<OpenWindow>,
}

impl WindowContext {
    /// Routes input to the topmost window under `mouse` as of last frame.
    pub fn begin_frame(&mut self, mouse: Vec2i) {
        self.previous.clear();
        self.previous.extend(self.entries.drain(..).map(|e| (e.id, e.rect, e.z_order)));
        self.hover = self
            .previous
            .iter()
            .filter(|(_, r, _)| rect_contains(*r, mouse))
            .max_by_key(|(_, _, z)| *z)
            .map(|(id, _, _)| *id);
        self.open = None;
    }

    pub fn hover(&self) -> Option<WidgetId> { self.hover }

    pub fn open_id(&self) -> Option<WidgetId> { self.open.as_ref().map(|w| w.id) }

    pub fn is_open(&self) -> bool { self.open.is_some() }

    pub fn entries(&self) -> &[WindowEntry] { &self.entries }

    /// Stable, so windows sharing a z-order keep declaration order.
    pub fn sort_entries(&mut self) { self.entries.sort_by_key(|e| e.z_order); }

    fn raise(&mut self) -> i32 {
        self.max_z = self.max_z.saturating_add(1);
        self.max_z
    }
}

impl UiContext {
    /// Opens a window. Returns `false` when the body is not shown (collapsed, or rejected because a
    /// window or panel is already open); only a `true` result must be matched by [`UiContext::end_window`].
    pub fn begin_window(&mut self, id: WidgetId, state: &mut WindowState, title: &str) -> bool {
        if self.windows.is_open() || self.panel.is_some() {
            warn!("window {:?} opened inside another window or panel, ignoring it", id);
            return false;
        }
        if id.is_none() {
            warn!("window declared with the reserved id 0, ignoring it");
            return false;
        }
        if state.z_order <= 0 {
            state.z_order = self.windows.raise();
        }
        self.windows.max_z = self.windows.max_z.max(state.z_order);

        self.target = DrawTarget::Deferred(DrawList::new());
        let clip_depth = self.clip_depth();
        self.push_clip(state.rect);
        self.windows.open = Some(OpenWindow {
            id,
            z_order: state.z_order,
            hit_rect: state.rect,
            clip_depth,
            saved_clip_floor: self.clip_floor,
            body: None,
        });
        self.clip_floor = clip_depth + 1;

        let mouse = self.input.mouse_pos;
        if self.mouse_pressed() && self.accepts_input() && rect_contains(state.rect, mouse) {
            state.z_order = self.windows.raise();
        }

        let th = self.style().title_height;
        let r = state.rect;
        let bar = self.update_control(id.derive(1), rect(r.x, r.y, r.width - th, th), false);
        if bar.pressed {
            self.drag_anchor = vec2(mouse.x - r.x, mouse.y - r.y);
        }
        if bar.active {
            state.rect.x = mouse.x - self.drag_anchor.x;
            state.rect.y = mouse.y - self.drag_anchor.y;
        }
        let toggle = self.update_control(id.derive(2), rect(r.x + r.width - th, r.y, th, th), false);
        if toggle.clicked {
            state.collapsed = !state.collapsed;
        }

        // the window may have moved: clip and draw at its new place
        let r = state.rect;
        self.truncate_clips(clip_depth);
        self.push_clip(r);
        let title_bar = rect(r.x, r.y, r.width, th);
        let hit_rect = if state.collapsed { title_bar } else { r };
        if let Some(open) = self.windows.open.as_mut() {
            open.z_order = state.z_order;
            open.hit_rect = hit_rect;
        }

        if !state.collapsed {
            let bg = self.style().color(ControlColor::WindowBG);
            self.draw_rect(r, bg);
        }
        let title_bg = self.style().color(ControlColor::TitleBG);
        self.draw_rect(title_bar, title_bg);
        self.draw_control_text(title, rect(r.x, r.y, r.width - th, th), ControlColor::TitleText, TextAlign::Left);
        let mark = self.style().color(ControlColor::TitleText);
        let third = th / 3;
        let glyph = if state.collapsed {
            rect(r.x + r.width - th + third, r.y + third, th - third * 2, th - third * 2)
        } else {
            rect(r.x + r.width - th + third, r.y + th / 2 - 1, th - third * 2, 2)
        };
        self.draw_rect(glyph, mark);

        if state.collapsed {
            self.finish_window();
            return false;
        }
        let border = self.style().color(ControlColor::Border);
        if border.a > 0 {
            self.draw_box(r, border);
        }

        let body = rect(r.x, r.y + th, r.width, (r.height - th).max(0));
        let frame = self.begin_scroll_region(id.derive(3), body, &state.scroll);
        state.scroll.offset = frame.offset();
        if let Some(open) = self.windows.open.as_mut() {
            open.body = Some(frame);
        }
        true
    }

    /// Closes the window opened by [`UiContext::begin_window`], updating its scroll state.
    pub fn end_window(&mut self, state: &mut WindowState) {
        if !self.windows.is_open() {
            warn!("end_window() without begin_window()");
            return;
        }
        if self.panel.is_some() {
            warn!("panel left open inside a window, closing it");
            let mut orphan = ScrollState::default();
            self.end_panel(&mut orphan);
        }
        let body = self.windows.open.as_mut().and_then(|w| w.body.take());
        if let Some(frame) = body {
            self.end_scroll_region(frame, &mut state.scroll);
        }
        self.finish_window();
    }

    /// Runs `f` inside a window when its body is shown.
    pub fn window<F: FnOnce(&mut Self)>(&mut self, id: WidgetId, state: &mut WindowState, title: &str, f: F) {
        if self.begin_window(id, state, title) {
            f(self);
            self.end_window(state);
        }
    }

    fn finish_window(&mut self) {
        let Some(open) = self.windows.open.take() else {
            return;
        };
        let stray = self.truncate_clips(open.clip_depth + 1);
        if stray > 1 {
            warn!("{} clip rect(s) left pushed in window {:?}", stray - 1, open.id);
        }
        self.truncate_clips(open.clip_depth);
        self.clip_floor = open.saved_clip_floor;
        let list = match mem::replace(&mut self.target, DrawTarget::Main) {
            DrawTarget::Deferred(list) => list,
            DrawTarget::Main => DrawList::new(),
        };
        self.windows.entries.push(WindowEntry {
            id: open.id,
            z_order: open.z_order,
            rect: open.hit_rect,
            list,
        });
    }
}
