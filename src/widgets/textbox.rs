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

/// Default text box width inside horizontal regions.
const TEXTBOX_WIDTH: i32 = 160;

impl UiContext {
    /// Single-line text input editing `buf` while focused. Return submits and releases focus,
    /// escape releases focus.
    pub fn textbox(&mut self, id: WidgetId, buf: &mut TextBuffer) -> ResourceState {
        let r = self.next_widget_rect(TEXTBOX_WIDTH);
        self.textbox_raw(id, buf, r)
    }

    /// [`UiContext::textbox`] at an explicit rectangle.
    pub fn textbox_raw(&mut self, id: WidgetId, buf: &mut TextBuffer, r: Recti) -> ResourceState {
        let had_focus = self.focused() == id;
        let control = self.update_control(id, r, true);
        let mut res = ResourceState::NONE;
        let padding = self.style().padding;

        if control.clicked {
            let x = (self.input.mouse_pos.x - r.x - padding) as f32;
            let cursor = buf.cursor_from_x(self.atlas(), x);
            buf.set_cursor(cursor);
        }

        let mut focused = control.focused;
        // input arriving with the focusing click is not ours yet
        if focused && had_focus {
            let outcome = buf.apply_input(&self.input);
            if outcome.changed {
                res |= ResourceState::CHANGE;
            }
            if outcome.submit {
                res |= ResourceState::SUBMIT;
            }
            if outcome.submit || outcome.cancel {
                self.set_focus(WidgetId::NONE);
                focused = false;
            }
        }
        if focused {
            res |= ResourceState::ACTIVE;
        }

        let c = self.control_color(id, ControlColor::Base);
        self.draw_frame(r, c);

        let inner = expand_rect(r, -padding);
        let cursor_x = line_width(self.atlas(), &buf.as_str()[..buf.cursor()]);
        // keep the cursor inside the box when the text overflows
        let shift = if focused { (cursor_x - inner.width as f32 + 1.0).max(0.0) } else { 0.0 };
        let y = r.y as f32 + (r.height as f32 - self.atlas().line_height()) * 0.5;
        let options = TextOptions {
            color: self.style().color(ControlColor::Text),
            ..Default::default()
        };
        self.push_clip(inner);
        self.draw_text_with(buf.as_str(), inner.x as f32 - shift, y.floor(), &options);
        if focused {
            let x = inner.x + (cursor_x - shift) as i32;
            let h = self.atlas().line_height().ceil() as i32;
            let caret = self.style().color(ControlColor::Text);
            self.draw_rect(rect(x, y.floor() as i32, 1, h), caret);
        }
        self.pop_clip();
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    const T: WidgetId = WidgetId::new(31);

    fn drive(ui: &mut UiContext, buf: &mut TextBuffer, input: &InputState) -> ResourceState {
        let mut res = ResourceState::NONE;
        ui.frame(input, 200, 200, |ui| res = ui.textbox(T, buf));
        res
    }

    fn focus(ui: &mut UiContext, buf: &mut TextBuffer) {
        drive(ui, buf, &at(150, 10, true));
        drive(ui, buf, &at(150, 10, false));
        assert_eq!(ui.focused(), T);
    }

    fn typed(text: &str, keys: Key) -> InputState {
        let mut input = at(150, 10, false);
        input.text(text);
        input.keydown(keys);
        input
    }

    #[test]
    fn typing_needs_focus() {
        let mut ui = test_ui();
        let mut buf = TextBuffer::with_capacity(8);
        assert!(drive(&mut ui, &mut buf, &typed("A", Key::NONE)).is_none());
        assert!(buf.is_empty());

        focus(&mut ui, &mut buf);
        let res = drive(&mut ui, &mut buf, &typed("AB", Key::NONE));
        assert!(res.is_changed() && res.is_active());
        assert_eq!(buf.as_str(), "AB");
    }

    #[test]
    fn keys_sent_with_the_focusing_click_are_ignored() {
        let mut ui = test_ui();
        let mut buf = TextBuffer::new("A", 8);
        drive(&mut ui, &mut buf, &at(150, 10, true));
        let res = drive(&mut ui, &mut buf, &typed("B", Key::BACKSPACE));
        assert_eq!(ui.focused(), T);
        assert!(res.is_active() && !res.is_changed());
        assert_eq!(buf.as_str(), "A");

        drive(&mut ui, &mut buf, &typed("B", Key::NONE));
        assert_eq!(buf.as_str(), "AB");
    }

    #[test]
    fn capacity_is_never_exceeded() {
        let mut ui = test_ui();
        let mut buf = TextBuffer::with_capacity(3);
        focus(&mut ui, &mut buf);
        drive(&mut ui, &mut buf, &typed("ABCABC", Key::NONE));
        assert_eq!(buf.as_str(), "ABC");
        assert_eq!(buf.capacity(), 3);
    }

    #[test]
    fn editing_keys_apply() {
        let mut ui = test_ui();
        let mut buf = TextBuffer::new("ABC", 8);
        focus(&mut ui, &mut buf);
        drive(&mut ui, &mut buf, &typed("", Key::END));
        drive(&mut ui, &mut buf, &typed("", Key::BACKSPACE));
        assert_eq!(buf.as_str(), "AB");
        drive(&mut ui, &mut buf, &typed("", Key::HOME));
        drive(&mut ui, &mut buf, &typed("", Key::DELETE));
        assert_eq!(buf.as_str(), "B");
        drive(&mut ui, &mut buf, &typed("C", Key::NONE));
        assert_eq!(buf.as_str(), "CB");
    }

    #[test]
    fn return_submits_and_unfocuses() {
        let mut ui = test_ui();
        let mut buf = TextBuffer::new("A", 8);
        focus(&mut ui, &mut buf);
        let res = drive(&mut ui, &mut buf, &typed("", Key::RETURN));
        assert!(res.is_submitted() && !res.is_active());
        assert!(ui.focused().is_none());
    }

    #[test]
    fn escape_and_outside_press_unfocus() {
        let mut ui = test_ui();
        let mut buf = TextBuffer::new("A", 8);
        focus(&mut ui, &mut buf);
        drive(&mut ui, &mut buf, &typed("", Key::ESCAPE));
        assert!(ui.focused().is_none());

        focus(&mut ui, &mut buf);
        drive(&mut ui, &mut buf, &at(150, 150, true));
        assert!(ui.focused().is_none());
        assert!(drive(&mut ui, &mut buf, &typed("B", Key::NONE)).is_none());
        assert_eq!(buf.as_str(), "A");
    }

    #[test]
    fn click_places_the_cursor() {
        let mut ui = test_ui();
        let mut buf = TextBuffer::new("AB", 8);
        // padding 5, 'A' is 9.6 wide: x = 12 lands in the second half of 'A'
        drive(&mut ui, &mut buf, &at(12, 10, true));
        drive(&mut ui, &mut buf, &at(12, 10, false));
        assert_eq!(buf.cursor(), 1);
    }
}
