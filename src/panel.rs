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

use crate::scrollbar::*;
use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// Caller-owned scroll position of a panel or window body.
pub struct ScrollState {
    /// Pixels the content is scrolled up by.
    pub offset: i32,
    /// Content height measured at the end of the last frame.
    pub content_height: i32,
}

/// Bookkeeping for an open scrollable region.
pub(crate) struct ScrollFrame {
    id: WidgetId,
    outer: Recti,
    view: Recti,
    track: Option<Recti>,
    offset: i32,
    clip_depth: usize,
    layout_depth: usize,
    pushed: bool,
    saved_clip_floor: usize,
    saved_layout_floor: usize,
}

impl ScrollFrame {
    pub fn offset(&self) -> i32 { self.offset }
}

impl UiContext {
    /// Clips to the padded body of `outer` and opens a vertical layout region shifted by the scroll offset.
    /// The scrollbar gutter is reserved when the content overflowed last frame.
    pub(crate) fn begin_scroll_region(&mut self, id: WidgetId, outer: Recti, state: &ScrollState) -> ScrollFrame {
        let padding = self.style().padding;
        let bar = self.style().scrollbar_size;
        let mut view = expand_rect(outer, -padding);
        let track = if state.content_height > view.height {
            view.width -= bar;
            Some(track_rect(outer, bar))
        } else {
            None
        };
        view.width = view.width.max(0);
        view.height = view.height.max(0);
        let offset = state.offset.clamp(0, max_scroll(state.content_height, view.height));

        let clip_depth = self.clip_depth();
        self.push_clip(view);
        let layout_depth = self.layout.depth();
        let pushed = self.layout.push(rect(view.x, view.y - offset, view.width, view.height), Axis::Vertical);

        let frame = ScrollFrame {
            id,
            outer,
            view,
            track,
            offset,
            clip_depth,
            layout_depth,
            pushed,
            saved_clip_floor: self.clip_floor,
            saved_layout_floor: self.layout_floor,
        };
        self.clip_floor = clip_depth + 1;
        self.layout_floor = self.layout.depth();
        frame
    }

    /// Measures the content, applies wheel and thumb scrolling, clamps and writes back `state`.
    pub(crate) fn end_scroll_region(&mut self, frame: ScrollFrame, state: &mut ScrollState) {
        let content_height = if frame.pushed {
            let stray = self.layout.truncate(frame.layout_depth + 1);
            if stray > 0 {
                warn!("{} layout region(s) left pushed in scroll region {:?}", stray, frame.id);
            }
            self.layout.pop().map_or(0, |region| region.cursor)
        } else {
            0
        };
        let stray = self.truncate_clips(frame.clip_depth + 1);
        if stray > 1 {
            warn!("{} clip rect(s) left pushed in scroll region {:?}", stray - 1, frame.id);
        }
        self.truncate_clips(frame.clip_depth);
        self.clip_floor = frame.saved_clip_floor;
        self.layout_floor = frame.saved_layout_floor;

        let view_height = frame.view.height;
        let max = max_scroll(content_height, view_height);
        let mut offset = frame.offset;
        let mouse = self.input.mouse_pos;
        if !self.wheel_consumed
            && self.input.wheel != 0
            && rect_contains(frame.outer, mouse)
            && rect_contains(self.clip_rect(), mouse)
            && self.accepts_input()
        {
            offset = offset.saturating_add(self.input.wheel);
            self.wheel_consumed = true;
        }
        offset = offset.clamp(0, max);

        if let Some(track) = frame.track {
            if max > 0 {
                let thumb_size = self.style().thumb_size;
                let mut thumb = thumb_rect(track, view_height, content_height, offset, thumb_size);
                let thumb_id = frame.id.derive(1);
                let control = self.update_control(thumb_id, thumb, false);
                if control.pressed {
                    self.drag_anchor = vec2(mouse.x - thumb.x, mouse.y - thumb.y);
                }
                if control.active {
                    offset = scroll_for_thumb(track, thumb.height, view_height, content_height, mouse.y - self.drag_anchor.y);
                    thumb = thumb_rect(track, view_height, content_height, offset, thumb_size);
                }
                let base = self.style().color(ControlColor::ScrollBase);
                let fill = self.style().color(ControlColor::ScrollThumb);
                self.draw_rect(track, base);
                self.draw_rect(thumb, fill);
            }
        }

        state.offset = offset;
        state.content_height = content_height;
    }

    /// Opens a scrollable panel over `r`. Panels do not nest; a rejected panel returns `false`
    /// and must not be ended.
    pub fn begin_panel(&mut self, id: WidgetId, r: Recti, state: &mut ScrollState) -> bool {
        if self.panel.is_some() {
            warn!("panel {:?} opened inside another panel, ignoring it", id);
            return false;
        }
        let bg = self.style().color(ControlColor::PanelBG);
        if bg.a > 0 {
            self.draw_rect(r, bg);
        }
        let frame = self.begin_scroll_region(id, r, state);
        state.offset = frame.offset;
        self.panel = Some(frame);
        true
    }

    /// Closes the panel opened by [`UiContext::begin_panel`], updating its scroll state.
    pub fn end_panel(&mut self, state: &mut ScrollState) {
        match self.panel.take() {
            Some(frame) => self.end_scroll_region(frame, state),
            None => warn!("end_panel() without begin_panel()"),
        }
    }

    /// Runs `f` inside a scrollable panel over `r`.
    pub fn panel<F: FnOnce(&mut Self)>(&mut self, id: WidgetId, r: Recti, state: &mut ScrollState, f: F) {
        if self.begin_panel(id, r, state) {
            f(self);
            self.end_panel(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    const PANEL: WidgetId = WidgetId::new(40);

    /// Five 20px items in a 100x60 panel: 116px of content in a 50px view.
    fn run(ui: &mut UiContext, input: &InputState, state: &mut ScrollState) -> Vec<Recti> {
        let mut items = Vec::new();
        ui.frame(input, 200, 200, |ui| {
            ui.panel(PANEL, rect(0, 0, 100, 60), state, |ui| {
                for _ in 0..5 {
                    items.push(ui.layout_next(20));
                }
            });
        });
        items
    }

    #[test]
    fn measures_content_and_reserves_the_gutter() {
        let mut ui = test_ui();
        let mut state = ScrollState::default();
        let items = run(&mut ui, &at(150, 150, false), &mut state);
        assert_eq!(state.content_height, 116);
        assert_eq!((items[0].x, items[0].y, items[0].width), (5, 5, 90));

        let items = run(&mut ui, &at(150, 150, false), &mut state);
        assert_eq!(items[0].width, 78);
    }

    #[test]
    fn offset_is_clamped_and_shifts_content() {
        let mut ui = test_ui();
        let mut state = ScrollState { offset: 1000, content_height: 116 };
        let items = run(&mut ui, &at(150, 150, false), &mut state);
        assert_eq!(state.offset, 66);
        assert_eq!(items[0].y, 5 - 66);

        let mut state = ScrollState { offset: -5, content_height: 116 };
        run(&mut ui, &at(150, 150, false), &mut state);
        assert_eq!(state.offset, 0);
    }

    #[test]
    fn wheel_scrolls_the_hovered_panel() {
        let mut ui = test_ui();
        let mut state = ScrollState::default();
        run(&mut ui, &at(20, 20, false), &mut state);
        let mut input = at(20, 20, false);
        input.scroll(10);
        run(&mut ui, &input, &mut state);
        assert_eq!(state.offset, 10);

        let mut away = at(150, 150, false);
        away.scroll(10);
        run(&mut ui, &away, &mut state);
        assert_eq!(state.offset, 10);
    }

    #[test]
    fn thumb_drags_continuously() {
        let mut ui = test_ui();
        let mut state = ScrollState::default();
        run(&mut ui, &at(150, 150, false), &mut state);
        run(&mut ui, &at(94, 5, false), &mut state);
        run(&mut ui, &at(94, 5, true), &mut state);
        assert_eq!(ui.active(), PANEL.derive(1));
        assert_eq!(state.offset, 0);
        // far below the track still maps to the end
        run(&mut ui, &at(150, 190, true), &mut state);
        assert_eq!(state.offset, 66);
        run(&mut ui, &at(150, 22, true), &mut state);
        assert_eq!(state.offset, 32);
        run(&mut ui, &at(150, 22, false), &mut state);
        assert!(ui.active().is_none());
    }

    #[test_log::test]
    fn nested_panels_are_rejected() {
        let mut ui = test_ui();
        let mut outer = ScrollState::default();
        let mut inner = ScrollState::default();
        let mut ran = false;
        ui.frame(&at(0, 0, false), 200, 200, |ui| {
            ui.panel(PANEL, rect(0, 0, 100, 100), &mut outer, |ui| {
                ui.panel(WidgetId::new(41), rect(0, 0, 50, 50), &mut inner, |_| ran = true);
                assert_eq!(ui.layout_depth(), 2);
            });
            assert_eq!(ui.layout_depth(), 1);
        });
        assert!(!ran);
    }

    #[test_log::test]
    fn unclosed_panel_is_closed_at_frame_end() {
        let mut ui = test_ui();
        let mut state = ScrollState::default();
        ui.begin(&at(0, 0, false), 200, 200);
        assert!(ui.begin_panel(PANEL, rect(0, 0, 100, 100), &mut state));
        ui.push_layout(rect(0, 0, 10, 10), Axis::Horizontal);
        ui.end();
        assert!(ui.panel.is_none());
        assert_eq!(ui.layout_depth(), 1);
        ui.frame(&at(0, 0, false), 200, 200, |ui| {
            ui.end_panel(&mut state);
        });
    }
}
