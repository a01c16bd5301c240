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
use crate::*;

impl UiContext {
    fn label_width(&self, text: &str) -> i32 { line_width(self.atlas(), text).ceil() as i32 + self.style().padding * 2 }

    /// Single line of text in the next layout slot.
    pub fn label(&mut self, text: &str) {
        let width = self.label_width(text);
        let r = self.next_widget_rect(width);
        self.draw_control_text(text, r, ControlColor::Text, TextAlign::Left);
    }

    /// Text wrapped to the width of the current region, taking as many lines as it needs.
    pub fn text(&mut self, text: &str) {
        let padding = self.style().padding;
        let width = self.layout.top().map_or(0, |r| r.body.width) - padding * 2;
        let options = TextOptions {
            max_width: Some(width.max(1) as f32),
            color: self.style().color(ControlColor::Text),
            ..Default::default()
        };
        let metrics = measure_text(self.atlas(), text, &options);
        let r = self.layout_next(metrics.height.ceil() as i32);
        self.draw_text_with(text, (r.x + padding) as f32, r.y as f32, &options);
    }

    /// Push button. Returns [`ResourceState::SUBMIT`] on the frame it is clicked.
    pub fn button(&mut self, id: WidgetId, label: &str) -> ResourceState {
        let width = self.label_width(label);
        let r = self.next_widget_rect(width);
        self.button_raw(id, label, r)
    }

    /// [`UiContext::button`] at an explicit rectangle.
    pub fn button_raw(&mut self, id: WidgetId, label: &str, r: Recti) -> ResourceState {
        let control = self.update_control(id, r, false);
        let mut res = ResourceState::NONE;
        if control.clicked {
            res |= ResourceState::SUBMIT;
        }
        if control.active {
            res |= ResourceState::ACTIVE;
        }
        let c = self.control_color(id, ControlColor::Button);
        self.draw_frame(r, c);
        self.draw_control_text(label, r, ControlColor::Text, TextAlign::Center);
        res
    }

    /// Check box toggling `value` on click. Returns [`ResourceState::CHANGE`] when it flips.
    pub fn checkbox(&mut self, id: WidgetId, label: &str, value: &mut bool) -> ResourceState {
        let side = self.item_height();
        let width = side + self.label_width(label);
        let r = self.next_widget_rect(width);
        let control = self.update_control(id, r, false);
        let mut res = ResourceState::NONE;
        if control.clicked {
            *value = !*value;
            res |= ResourceState::CHANGE;
        }
        if control.active {
            res |= ResourceState::ACTIVE;
        }
        let check = rect(r.x, r.y, r.height, r.height);
        let c = self.control_color(id, ControlColor::Base);
        self.draw_frame(check, c);
        if *value {
            let mark = self.style().color(ControlColor::Text);
            self.draw_rect(expand_rect(check, -self.style().padding), mark);
        }
        let text = rect(r.x + check.width, r.y, (r.width - check.width).max(0), r.height);
        self.draw_control_text(label, text, ControlColor::Text, TextAlign::Left);
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    const OK: WidgetId = WidgetId::new(11);

    #[test]
    fn button_submits_on_release() {
        let mut ui = test_ui();
        let mut results = Vec::new();
        for input in [at(50, 10, false), at(50, 10, true), at(50, 10, false)] {
            ui.frame(&input, 200, 200, |ui| results.push(ui.button(OK, "AB")));
        }
        assert_eq!(results, vec![ResourceState::NONE, ResourceState::ACTIVE, ResourceState::SUBMIT]);
    }

    #[test]
    fn button_ignores_release_elsewhere() {
        let mut ui = test_ui();
        let mut results = Vec::new();
        for input in [at(50, 10, true), at(50, 150, true), at(50, 150, false)] {
            ui.frame(&input, 200, 200, |ui| results.push(ui.button(OK, "AB")));
        }
        assert!(results.iter().all(|r| !r.is_submitted()));
    }

    #[test]
    fn checkbox_flips_value() {
        let mut ui = test_ui();
        let mut value = false;
        let mut changed = Vec::new();
        for input in [at(5, 5, true), at(5, 5, false), at(5, 5, true), at(5, 5, false)] {
            ui.frame(&input, 200, 200, |ui| changed.push(ui.checkbox(OK, "C", &mut value).is_changed()));
        }
        assert_eq!(changed, vec![false, true, false, true]);
        assert!(!value);
    }

    #[test]
    fn widgets_stack_vertically() {
        let mut ui = test_ui();
        ui.frame(&at(0, 0, false), 200, 200, |ui| {
            ui.label("A");
            ui.button(OK, "B");
            ui.text("AB AB AB AB AB AB AB AB AB AB AB AB AB AB AB");
            // 26px per single-line item, 4px spacing
            assert_eq!(ui.layout_remaining(), 200 - 26 - 4 - 26 - 4 - 32);
        });
        assert!(ui.draw_list().triangle_count() > 0);
    }

    #[test]
    fn row_sizes_by_label() {
        let mut ui = test_ui();
        let mut clicked = false;
        let mut frame = |ui: &mut UiContext, input: &InputState| {
            ui.frame(input, 200, 200, |ui| {
                ui.row(30, |ui| {
                    ui.label("A");
                    clicked |= ui.button(OK, "B").is_submitted();
                });
            })
        };
        // label "A" is 9.6 + 10 wide, so the button starts at 24
        frame(&mut ui, &at(26, 10, true));
        frame(&mut ui, &at(26, 10, false));
        assert!(clicked);
    }
}
