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
use std::rc::Rc;

use log::*;

use crate::layout::LayoutStack;
use crate::panel::ScrollFrame;
use crate::window::WindowContext;
use crate::*;

/// Buffer the current widget emits into.
pub(crate) enum DrawTarget {
    Main,
    /// Collected for the open window and merged in z-order at frame end.
    Deferred(DrawList),
}

#[derive(Copy, Clone, Default, Debug)]
pub(crate) struct ControlState {
    /// Cursor inside the widget, its clip and an input-accepting window.
    pub over: bool,
    /// Became active on this frame's press edge.
    pub pressed: bool,
    /// Holds the press after this call.
    pub active: bool,
    /// Released over the widget this frame.
    pub clicked: bool,
    pub focused: bool,
}

/// Immediate-mode UI state machine. Drive it with [`UiContext::begin`]/[`UiContext::end`] (or
/// [`UiContext::frame`]) once per frame and declare widgets in between, in draw order.
pub struct UiContext {
    atlas: Rc<FontAtlas>,
    style: Style,

    pub(crate) input: InputState,
    prev_mouse_down: bool,
    screen: Recti,
    frame: u64,
    in_frame: bool,

    hot: WidgetId,
    next_hot: WidgetId,
    active: WidgetId,
    focused: WidgetId,
    /// Widget that took this frame's press edge and whether it can hold focus.
    press_claim: Option<(WidgetId, bool)>,
    /// Grab offset captured on press by dragged widgets.
    pub(crate) drag_anchor: Vec2i,
    pub(crate) wheel_consumed: bool,

    main: DrawList,
    pub(crate) target: DrawTarget,
    clip_stack: Vec<Recti>,
    pub(crate) clip_floor: usize,
    pub(crate) layout: LayoutStack,
    pub(crate) layout_floor: usize,

    pub(crate) panel: Option<ScrollFrame>,
    pub(crate) windows: WindowContext,
}

impl UiContext {
    /// Creates a context drawing with `atlas` and themed by `style`.
    pub fn new(atlas: Rc<FontAtlas>, style: Style) -> Self {
        let spacing = style.spacing;
        Self {
            atlas,
            style,
            input: InputState::default(),
            prev_mouse_down: false,
            screen: rect(0, 0, 0, 0),
            frame: 0,
            in_frame: false,
            hot: WidgetId::NONE,
            next_hot: WidgetId::NONE,
            active: WidgetId::NONE,
            focused: WidgetId::NONE,
            press_claim: None,
            drag_anchor: Vec2i::default(),
            wheel_consumed: false,
            main: DrawList::new(),
            target: DrawTarget::Main,
            clip_stack: Vec::new(),
            clip_floor: 1,
            layout: LayoutStack::new(spacing),
            layout_floor: 1,
            panel: None,
            windows: WindowContext::default(),
        }
    }

    /// Starts a frame over a `width` x `height` screen. A frame left open by a missing
    /// [`UiContext::end`] is closed first.
    pub fn begin(&mut self, input: &InputState, width: i32, height: i32) {
        if self.in_frame {
            warn!("begin() called while frame {} is still open, ending it", self.frame);
            self.end();
        }
        self.input = input.clone();
        self.screen = rect(0, 0, width.max(0), height.max(0));
        self.main.clear();
        self.target = DrawTarget::Main;
        self.clip_stack.clear();
        self.clip_stack.push(self.screen);
        self.clip_floor = 1;
        self.layout.reset(self.screen);
        self.layout_floor = 1;
        self.next_hot = WidgetId::NONE;
        self.press_claim = None;
        self.wheel_consumed = false;
        self.windows.begin_frame(self.input.mouse_pos);
        self.frame += 1;
        self.in_frame = true;
    }

    /// Finishes the frame: closes anything left open, merges window draw lists in z-order and
    /// settles hot/active/focus for the next frame.
    pub fn end(&mut self) {
        if !self.in_frame {
            warn!("end() called without begin()");
            return;
        }
        if self.panel.is_some() {
            warn!("panel left open at frame end, closing it");
            let mut orphan = ScrollState::default();
            self.end_panel(&mut orphan);
        }
        if self.windows.is_open() {
            warn!("window left open at frame end, closing it");
            let mut orphan = WindowState::default();
            self.end_window(&mut orphan);
        }
        let stray = self.layout.truncate(1);
        if stray > 0 {
            warn!("{} layout region(s) left pushed at frame end", stray);
        }
        if self.clip_stack.len() > 1 {
            warn!("{} clip rect(s) left pushed at frame end", self.clip_stack.len() - 1);
            self.clip_stack.truncate(1);
        }
        self.layout_floor = 1;
        self.clip_floor = 1;

        self.windows.sort_entries();
        for entry in self.windows.entries() {
            if !self.main.append(&entry.list) {
                warn!("dropping draw list of window {:?}", entry.id);
            }
        }

        if self.active.is_none() {
            self.hot = self.next_hot;
        }
        if !self.active.is_none() && !self.input.mouse_down {
            debug!("releasing active widget {:?} that missed its release", self.active);
            self.active = WidgetId::NONE;
        }
        if self.mouse_pressed() && !matches!(self.press_claim, Some((_, true))) {
            self.focused = WidgetId::NONE;
        }
        if self.input.keys.is_escape() {
            self.focused = WidgetId::NONE;
        }

        self.prev_mouse_down = self.input.mouse_down;
        self.in_frame = false;
    }

    /// Runs one frame: [`UiContext::begin`], `f`, [`UiContext::end`].
    pub fn frame<F: FnOnce(&mut Self)>(&mut self, input: &InputState, width: i32, height: i32, f: F) {
        self.begin(input, width, height);
        f(self);
        self.end();
    }

    /// Geometry of the last finished frame (or of the main level so far while a frame is open).
    pub fn draw_list(&self) -> &DrawList { &self.main }

    /// Per-window draw lists of the last frame, ascending by z-order.
    pub fn window_entries(&self) -> &[WindowEntry] { self.windows.entries() }

    /// Atlas used for text and solid fills.
    pub fn atlas(&self) -> &FontAtlas { &self.atlas }

    /// Theme the context was built with.
    pub fn style(&self) -> &Style { &self.style }

    /// Input of the current frame.
    pub fn input(&self) -> &InputState { &self.input }

    /// Widget under the cursor as of the last frame end.
    pub fn hot(&self) -> WidgetId { self.hot }

    /// Widget holding the mouse press.
    pub fn active(&self) -> WidgetId { self.active }

    /// Widget receiving keyboard input.
    pub fn focused(&self) -> WidgetId { self.focused }

    /// Moves keyboard focus explicitly.
    pub fn set_focus(&mut self, id: WidgetId) { self.focused = id; }

    /// Number of frames begun so far.
    pub fn frame_count(&self) -> u64 { self.frame }

    pub(crate) fn mouse_pressed(&self) -> bool { self.input.mouse_down && !self.prev_mouse_down }

    pub(crate) fn accepts_input(&self) -> bool {
        match self.windows.open_id() {
            Some(id) => self.windows.hover() == Some(id),
            None => self.windows.hover().is_none(),
        }
    }

    /// Hit-tests `r` and advances the hot/active/focus state machine for `id`.
    pub(crate) fn update_control(&mut self, id: WidgetId, r: Recti, focusable: bool) -> ControlState {
        if id.is_none() {
            warn!("widget declared with the reserved id 0, ignoring its input");
            return ControlState::default();
        }
        let mouse = self.input.mouse_pos;
        let over = rect_contains(r, mouse) && rect_contains(self.clip_rect(), mouse) && self.accepts_input();
        let mut state = ControlState { over, ..Default::default() };
        if over {
            self.next_hot = id;
            if self.mouse_pressed() {
                self.active = id;
                self.press_claim = Some((id, focusable));
                state.pressed = true;
            }
        }
        if self.active == id && !self.input.mouse_down {
            self.active = WidgetId::NONE;
            if over {
                state.clicked = true;
                if focusable {
                    self.focused = id;
                }
            }
        }
        state.active = self.active == id;
        state.focused = self.focused == id;
        state
    }

    /// Palette entry for a widget in its current interaction state.
    pub(crate) fn control_color(&self, id: WidgetId, mut c: ControlColor) -> ControlColor {
        if self.focused == id || self.active == id {
            c.focus();
        } else if self.hot == id {
            c.hover();
        }
        c
    }

    pub(crate) fn draw_list_mut(&mut self) -> &mut DrawList {
        match &mut self.target {
            DrawTarget::Main => &mut self.main,
            DrawTarget::Deferred(list) => list,
        }
    }

    /// Current clip rectangle.
    pub fn clip_rect(&self) -> Recti { self.clip_stack.last().copied().unwrap_or(self.screen) }

    /// Narrows the clip rectangle to its intersection with `r`.
    pub fn push_clip(&mut self, r: Recti) {
        let clipped = intersect_rects(self.clip_rect(), r);
        self.clip_stack.push(clipped);
    }

    /// Restores the previous clip rectangle. Pops past the enclosing panel or window are refused.
    pub fn pop_clip(&mut self) {
        if self.clip_stack.len() <= self.clip_floor {
            warn!("pop_clip() without a matching push_clip()");
            return;
        }
        self.clip_stack.pop();
    }

    pub(crate) fn clip_depth(&self) -> usize { self.clip_stack.len() }

    pub(crate) fn truncate_clips(&mut self, depth: usize) -> usize {
        let stray = self.clip_stack.len().saturating_sub(depth);
        self.clip_stack.truncate(depth.max(1));
        stray
    }

    /// Pushes an explicit layout region. Returns `false` when the stack is full.
    pub fn push_layout(&mut self, body: Recti, axis: Axis) -> bool { self.layout.push(body, axis) }

    /// Pops a region pushed with [`UiContext::push_layout`]. Regions owned by an open panel or window cannot be popped.
    pub fn pop_layout(&mut self) {
        if self.layout.depth() <= self.layout_floor {
            warn!("pop_layout() without a matching push_layout()");
            return;
        }
        self.layout.pop();
    }

    /// Carves the next `size` pixels out of the current region.
    pub fn layout_next(&mut self, size: i32) -> Recti { self.layout.next(size) }

    /// Space left along the current region's axis.
    pub fn layout_remaining(&self) -> i32 { self.layout.top().map_or(0, |r| r.remaining()) }

    /// Depth of the layout stack, the root region included.
    pub fn layout_depth(&self) -> usize { self.layout.depth() }

    /// Lays `f` out in a horizontal row `height` pixels tall.
    pub fn row<F: FnOnce(&mut Self)>(&mut self, height: i32, f: F) { self.nested_region(height, Axis::Horizontal, f) }

    /// Lays `f` out in a vertical column `width` pixels wide.
    pub fn column<F: FnOnce(&mut Self)>(&mut self, width: i32, f: F) { self.nested_region(width, Axis::Vertical, f) }

    fn nested_region<F: FnOnce(&mut Self)>(&mut self, size: i32, axis: Axis, f: F) {
        let body = self.layout.next(size);
        if !self.layout.push(body, axis) {
            return;
        }
        let depth = self.layout.depth();
        f(self);
        let stray = self.layout.truncate(depth);
        if stray > 0 {
            warn!("{} layout region(s) left pushed inside a row/column", stray);
        }
        self.layout.pop();
    }

    /// Height of a single-line widget.
    pub fn item_height(&self) -> i32 { self.atlas.line_height().ceil() as i32 + self.style.padding * 2 }

    /// Rect for the next widget: full width in vertical regions, `width` wide in horizontal ones.
    pub(crate) fn next_widget_rect(&mut self, width: i32) -> Recti {
        let size = match self.layout.top().map(|r| r.axis) {
            Some(Axis::Horizontal) => width,
            _ => self.item_height(),
        };
        self.layout.next(size)
    }

    /// Fills `r` with a solid color.
    pub fn draw_rect(&mut self, r: Recti, c: Color) -> bool {
        let white = self.atlas.white_texel();
        let clip = self.clip_rect();
        self.draw_list_mut().push_solid_rect(r, white, c, clip)
    }

    /// Draws a one pixel outline just inside `r`.
    pub fn draw_box(&mut self, r: Recti, c: Color) {
        self.draw_rect(rect(r.x, r.y, r.width, 1), c);
        self.draw_rect(rect(r.x, r.y + r.height - 1, r.width, 1), c);
        self.draw_rect(rect(r.x, r.y + 1, 1, r.height - 2), c);
        self.draw_rect(rect(r.x + r.width - 1, r.y + 1, 1, r.height - 2), c);
    }

    /// Fills `r` with a palette color and outlines it with the border color.
    pub fn draw_frame(&mut self, r: Recti, c: ControlColor) {
        let fill = self.style.color(c);
        self.draw_rect(r, fill);
        let border = self.style.color(ControlColor::Border);
        if border.a > 0 {
            self.draw_box(r, border);
        }
    }

    /// Draws text with its top-left corner at `pos`.
    pub fn draw_text(&mut self, text: &str, pos: Vec2i, c: Color) -> TextBounds {
        let options = TextOptions { color: c, ..Default::default() };
        self.draw_text_with(text, pos.x as f32, pos.y as f32, &options)
    }

    /// Draws laid out text clipped to the current clip rectangle.
    pub fn draw_text_with(&mut self, text: &str, x: f32, y: f32, options: &TextOptions) -> TextBounds {
        let atlas = self.atlas.clone();
        let clip = self.clip_rect();
        let color = options.color.to_rgba_f32();
        let list = self.draw_list_mut();
        let (bounds, _) = for_each_quad(&atlas, text, x, y, options, |q| {
            list.push_quad_clipped(q.rect, q.uv, color, clip);
        });
        bounds
    }

    /// Single-line text vertically centred in `r`, aligned within its padded width.
    pub(crate) fn draw_control_text(&mut self, text: &str, r: Recti, c: ControlColor, align: TextAlign) {
        let padding = self.style.padding;
        let inner = rect(r.x + padding, r.y, (r.width - padding * 2).max(0), r.height);
        let options = TextOptions {
            max_width: Some(inner.width as f32),
            align,
            color: self.style.color(c),
            ..Default::default()
        };
        let y = r.y as f32 + (r.height as f32 - self.atlas.line_height()) * 0.5;
        self.push_clip(inner);
        self.draw_text_with(text, inner.x as f32, y.floor(), &options);
        self.pop_clip();
    }
}
