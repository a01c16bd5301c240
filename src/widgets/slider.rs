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
use std::fmt::Write;

use crate::*;

/// Default slider width inside horizontal regions.
const SLIDER_WIDTH: i32 = 120;

#[derive(Clone, Debug)]
/// Caller-owned slider value and range.
pub struct Slider {
    /// Current value, kept within `low..=high`.
    pub value: f32,
    /// Lower bound.
    pub low: f32,
    /// Upper bound.
    pub high: f32,
    /// Snapping step, `0` for continuous.
    pub step: f32,
    /// Digits shown after the decimal point.
    pub precision: usize,
    label: String,
}

impl Slider {
    /// Continuous slider over `low..=high`.
    pub fn new(value: f32, low: f32, high: f32) -> Self {
        Self {
            value,
            low,
            high,
            step: 0.0,
            precision: 0,
            label: String::new(),
        }
    }

    /// Slider snapping to multiples of `step`, shown with `precision` decimals.
    pub fn with_step(value: f32, low: f32, high: f32, step: f32, precision: usize) -> Self {
        Self {
            step,
            precision,
            ..Self::new(value, low, high)
        }
    }

    fn snap(&self, v: f32) -> f32 {
        if self.step > 0.0 {
            self.low + ((v - self.low) / self.step).round() * self.step
        } else {
            v
        }
    }

    fn clamp(&self, v: f32) -> f32 {
        let (lo, hi) = if self.low <= self.high { (self.low, self.high) } else { (self.high, self.low) };
        if v.is_nan() { lo } else { v.clamp(lo, hi) }
    }
}

impl UiContext {
    /// Horizontal slider. While held the value follows the cursor, even outside the widget.
    pub fn slider(&mut self, id: WidgetId, slider: &mut Slider) -> ResourceState {
        let r = self.next_widget_rect(SLIDER_WIDTH);
        self.slider_raw(id, slider, r)
    }

    /// [`UiContext::slider`] at an explicit rectangle.
    pub fn slider_raw(&mut self, id: WidgetId, slider: &mut Slider, r: Recti) -> ResourceState {
        let control = self.update_control(id, r, false);
        let mut res = ResourceState::NONE;
        let last = slider.value;
        let range = slider.high - slider.low;
        let mut v = last;
        if control.active && r.width > 0 && range != 0.0 {
            let mouse_x = self.input.mouse_pos.x;
            v = slider.snap(slider.low + (mouse_x - r.x) as f32 * range / r.width as f32);
        }
        v = slider.clamp(v);
        slider.value = v;
        if last != v {
            res |= ResourceState::CHANGE;
        }
        if control.active {
            res |= ResourceState::ACTIVE;
        }

        let base = self.control_color(id, ControlColor::Base);
        self.draw_frame(r, base);
        let w = self.style().thumb_size;
        let travel = (r.width - w).max(0);
        let x = if range != 0.0 { ((v - slider.low) / range * travel as f32) as i32 } else { 0 };
        let thumb = self.control_color(id, ControlColor::Button);
        self.draw_frame(rect(r.x + x, r.y, w, r.height), thumb);

        let mut label = std::mem::take(&mut slider.label);
        label.clear();
        let _ = write!(label, "{:.*}", slider.precision, v);
        self.draw_control_text(&label, r, ControlColor::Text, TextAlign::Center);
        slider.label = label;
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    const S: WidgetId = WidgetId::new(21);

    fn drive(ui: &mut UiContext, slider: &mut Slider, input: &InputState) -> ResourceState {
        let mut res = ResourceState::NONE;
        ui.frame(input, 200, 200, |ui| res = ui.slider_raw(S, slider, rect(0, 0, 100, 20)));
        res
    }

    #[test]
    fn value_follows_the_cursor_while_held() {
        let mut ui = test_ui();
        let mut s = Slider::new(0.0, 0.0, 10.0);
        let res = drive(&mut ui, &mut s, &at(50, 10, true));
        assert!(res.is_changed() && res.is_active());
        assert_eq!(s.value, 5.0);

        // leaving the rectangle keeps dragging and clamps
        drive(&mut ui, &mut s, &at(180, 150, true));
        assert_eq!(s.value, 10.0);
        drive(&mut ui, &mut s, &at(-40, 150, true));
        assert_eq!(s.value, 0.0);

        let res = drive(&mut ui, &mut s, &at(70, 10, false));
        assert!(!res.is_changed());
        assert_eq!(s.value, 0.0);
    }

    #[test]
    fn hover_alone_does_not_change() {
        let mut ui = test_ui();
        let mut s = Slider::new(3.0, 0.0, 10.0);
        assert!(drive(&mut ui, &mut s, &at(90, 10, false)).is_none());
        assert_eq!(s.value, 3.0);
    }

    #[test]
    fn steps_snap_and_out_of_range_values_clamp() {
        let mut ui = test_ui();
        let mut s = Slider::with_step(0.0, 0.0, 10.0, 2.0, 1);
        drive(&mut ui, &mut s, &at(33, 10, true));
        assert_eq!(s.value, 4.0);

        let mut s = Slider::new(42.0, 0.0, 10.0);
        assert!(drive(&mut ui, &mut s, &at(150, 150, false)).is_changed());
        assert_eq!(s.value, 10.0);
    }
}
