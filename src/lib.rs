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
#![deny(missing_docs)]
//! `glyphkit` is a self-contained text and immediate-mode UI core: a TrueType parser, a supersampling glyph
//! rasterizer with shelf-packed atlases, a text layout engine, and a frame-based UI state machine with layout,
//! scrollable panels and z-ordered windows. Everything it draws ends up as [`Vertex`]/index buffers which an
//! external renderer uploads, or which the bundled software [`Framebuffer`] rasterizes for headless checks.

mod atlas;
mod bmp;
mod context;
mod draw_list;
mod error;
mod font;
mod glyph;
mod layout;
mod panel;
mod raster;
mod reader;
mod scrollbar;
mod shelf_packer;
mod soft_raster;
mod text_layout;
mod widgets;
mod window;

#[cfg(test)]
mod test_support;

pub use atlas::*;
pub use bmp::*;
pub use context::UiContext;
pub use draw_list::*;
pub use error::*;
pub use font::*;
pub use glyph::*;
pub use layout::{Axis, MAX_LAYOUT_DEPTH};
pub use panel::ScrollState;
pub use raster::*;
pub use rs_math3d::*;
pub use soft_raster::*;
pub use text_layout::*;
pub use widgets::*;
pub use window::*;

use bitflags::*;

#[derive(Default, Copy, Clone, Eq, PartialEq, Hash, Debug)]
/// Caller-chosen widget identifier. The raw value `0` is reserved and means "no widget".
pub struct WidgetId(u32);

const FNV_OFFSET_BASIS: u32 = 0x811c9dc5;
const FNV_PRIME: u32 = 0x01000193;

fn fnv1a(mut hash: u32, bytes: &[u8]) -> u32 {
    for byte in bytes {
        hash ^= *byte as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

impl WidgetId {
    /// The "no widget" identifier.
    pub const NONE: Self = Self(0);

    /// Wraps a caller-supplied numeric value. Passing `0` yields [`WidgetId::NONE`].
    pub const fn new(value: u32) -> Self { Self(value) }

    /// Creates a stable ID from a string label using FNV-1a hashing. Never returns [`WidgetId::NONE`].
    pub fn from_label(label: &str) -> Self { Self::non_zero(fnv1a(FNV_OFFSET_BASIS, label.as_bytes())) }

    /// Derives a stable child ID, used for the parts of compound widgets (title bars, scroll thumbs).
    pub fn derive(self, salt: u32) -> Self {
        let hash = fnv1a(FNV_OFFSET_BASIS, &self.0.to_le_bytes());
        Self::non_zero(fnv1a(hash, &salt.to_le_bytes()))
    }

    /// Returns the raw numeric value wrapped by this ID.
    pub fn raw(self) -> u32 { self.0 }

    /// Returns `true` for the reserved "no widget" identifier.
    pub fn is_none(self) -> bool { self.0 == 0 }

    fn non_zero(hash: u32) -> Self { Self(if hash == 0 { 1 } else { hash }) }
}

#[derive(PartialEq, Copy, Clone, Debug)]
#[repr(u32)]
/// Identifiers for each of the built-in style colors.
pub enum ControlColor {
    /// Number of color entries in [`Style::colors`].
    Max = 14,
    /// Thumb of scrollbars.
    ScrollThumb = 13,
    /// Base frame of scrollbars.
    ScrollBase = 12,
    /// Base color for focused widgets.
    BaseFocus = 11,
    /// Base color while the pointer hovers the widget.
    BaseHover = 10,
    /// Default base color.
    Base = 9,
    /// Button color while the widget is held.
    ButtonFocus = 8,
    /// Button color while the pointer hovers the widget.
    ButtonHover = 7,
    /// Default button color.
    Button = 6,
    /// Panel background color.
    PanelBG = 5,
    /// Window title text color.
    TitleText = 4,
    /// Window title background color.
    TitleBG = 3,
    /// Window background color.
    WindowBG = 2,
    /// Outline/border color.
    Border = 1,
    /// Default text color.
    Text = 0,
}

impl ControlColor {
    /// Promotes the enum to the hover variant when relevant.
    pub fn hover(&mut self) {
        *self = match self {
            Self::Base => Self::BaseHover,
            Self::Button => Self::ButtonHover,
            _ => *self,
        }
    }

    /// Promotes the enum to the focused variant when relevant.
    pub fn focus(&mut self) {
        *self = match self {
            Self::Base => Self::BaseFocus,
            Self::Button => Self::ButtonFocus,
            Self::BaseHover => Self::BaseFocus,
            Self::ButtonHover => Self::ButtonFocus,
            _ => *self,
        }
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// State bits returned by widgets to describe their interaction outcome.
    pub struct ResourceState : u32 {
        /// Indicates that the widget's data changed.
        const CHANGE = 4;
        /// Indicates that the widget was submitted (e.g. button clicked).
        const SUBMIT = 2;
        /// Indicates that the widget is currently active.
        const ACTIVE = 1;
        /// Indicates no interaction.
        const NONE = 0;
    }
}

impl ResourceState {
    /// Returns `true` if the widget changed its bound value.
    pub fn is_changed(&self) -> bool { self.intersects(Self::CHANGE) }
    /// Returns `true` if the widget signaled submission.
    pub fn is_submitted(&self) -> bool { self.intersects(Self::SUBMIT) }
    /// Returns `true` if the widget is active.
    pub fn is_active(&self) -> bool { self.intersects(Self::ACTIVE) }
    /// Returns `true` if the state contains no flags.
    pub fn is_none(&self) -> bool { self.bits() == 0 }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Discrete keys pressed this frame. Repeat and modifiers are the caller's business.
    pub struct Key : u32 {
        /// Return/Enter key.
        const RETURN = 128;
        /// Escape key, always cancels keyboard focus.
        const ESCAPE = 64;
        /// End key.
        const END = 32;
        /// Home key.
        const HOME = 16;
        /// Right arrow key.
        const RIGHT = 8;
        /// Left arrow key.
        const LEFT = 4;
        /// Delete key.
        const DELETE = 2;
        /// Backspace key.
        const BACKSPACE = 1;
        /// No keys pressed.
        const NONE = 0;
    }
}

impl Key {
    /// Returns `true` if no key is pressed.
    pub fn is_none(&self) -> bool { self.bits() == 0 }
    /// Returns `true` if Return is pressed.
    pub fn is_return(&self) -> bool { self.intersects(Self::RETURN) }
    /// Returns `true` if Escape is pressed.
    pub fn is_escape(&self) -> bool { self.intersects(Self::ESCAPE) }
    /// Returns `true` if End is pressed.
    pub fn is_end(&self) -> bool { self.intersects(Self::END) }
    /// Returns `true` if Home is pressed.
    pub fn is_home(&self) -> bool { self.intersects(Self::HOME) }
    /// Returns `true` if right is pressed.
    pub fn is_right(&self) -> bool { self.intersects(Self::RIGHT) }
    /// Returns `true` if left is pressed.
    pub fn is_left(&self) -> bool { self.intersects(Self::LEFT) }
    /// Returns `true` if Delete is pressed.
    pub fn is_delete(&self) -> bool { self.intersects(Self::DELETE) }
    /// Returns `true` if Backspace is pressed.
    pub fn is_backspace(&self) -> bool { self.intersects(Self::BACKSPACE) }
}

#[derive(Clone, Debug)]
/// Input snapshot handed to [`UiContext::begin`] once per frame.
///
/// Mouse coordinates live in the same space as widget rectangles. Key presses and typed text are
/// events for this frame only; call [`InputState::clear_events`] after the frame consumed them.
pub struct InputState {
    /// Cursor position.
    pub mouse_pos: Vec2i,
    /// Primary button held.
    pub mouse_down: bool,
    /// Vertical wheel movement in pixels, positive scrolls content up.
    pub wheel: i32,
    /// Keys pressed this frame.
    pub keys: Key,
    /// UTF-8 text typed this frame.
    pub text: String,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            mouse_pos: Vec2i::default(),
            mouse_down: false,
            wheel: 0,
            keys: Key::NONE,
            text: String::new(),
        }
    }
}

impl InputState {
    /// Updates the current mouse pointer position.
    pub fn mousemove(&mut self, x: i32, y: i32) { self.mouse_pos = vec2(x, y); }

    /// Records that the primary button went down at the given position.
    pub fn mousedown(&mut self, x: i32, y: i32) {
        self.mousemove(x, y);
        self.mouse_down = true;
    }

    /// Records that the primary button went up at the given position.
    pub fn mouseup(&mut self, x: i32, y: i32) {
        self.mousemove(x, y);
        self.mouse_down = false;
    }

    /// Accumulates wheel movement.
    pub fn scroll(&mut self, dy: i32) { self.wheel += dy; }

    /// Records a key press.
    pub fn keydown(&mut self, key: Key) { self.keys |= key; }

    /// Appends UTF-8 text to the typed-text buffer.
    pub fn text(&mut self, text: &str) { self.text.push_str(text); }

    /// Drops the per-frame events (keys, text, wheel) while keeping mouse position and button state.
    pub fn clear_events(&mut self) {
        self.keys = Key::NONE;
        self.text.clear();
        self.wheel = 0;
    }
}

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C)]
/// Simple RGBA color stored with 8-bit components.
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255, a: 255 };

    /// Converts to the normalized float representation stored in [`Vertex::color`].
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [self.r as f32 / 255.0, self.g as f32 / 255.0, self.b as f32 / 255.0, self.a as f32 / 255.0]
    }
}

#[derive(Copy, Clone, Debug)]
/// Collection of visual constants that drive widget appearance. Held immutably by [`UiContext`].
pub struct Style {
    /// Inner padding applied to most widgets.
    pub padding: i32,
    /// Spacing between cells in a layout.
    pub spacing: i32,
    /// Height of window title bars.
    pub title_height: i32,
    /// Width of scrollbars.
    pub scrollbar_size: i32,
    /// Minimum length of scrollbar thumbs and width of slider thumbs.
    pub thumb_size: i32,
    /// Palette of [`ControlColor`] entries.
    pub colors: [Color; 14],
}

impl Style {
    /// Looks up a palette entry.
    pub fn color(&self, c: ControlColor) -> Color { self.colors[c as usize] }
}

/// Clip rectangle that lets everything through.
pub(crate) static UNCLIPPED_RECT: Recti = Recti {
    x: 0,
    y: 0,
    width: i32::MAX,
    height: i32::MAX,
};

impl Default for Style {
    fn default() -> Self {
        Self {
            padding: 5,
            spacing: 4,
            title_height: 24,
            scrollbar_size: 12,
            thumb_size: 8,
            colors: [
                Color { r: 230, g: 230, b: 230, a: 255 },
                Color { r: 25, g: 25, b: 25, a: 255 },
                Color { r: 50, g: 50, b: 50, a: 255 },
                Color { r: 25, g: 25, b: 25, a: 255 },
                Color { r: 240, g: 240, b: 240, a: 255 },
                Color { r: 0, g: 0, b: 0, a: 0 },
                Color { r: 75, g: 75, b: 75, a: 255 },
                Color { r: 95, g: 95, b: 95, a: 255 },
                Color { r: 115, g: 115, b: 115, a: 255 },
                Color { r: 30, g: 30, b: 30, a: 255 },
                Color { r: 35, g: 35, b: 35, a: 255 },
                Color { r: 40, g: 40, b: 40, a: 255 },
                Color { r: 43, g: 43, b: 43, a: 255 },
                Color { r: 30, g: 30, b: 30, a: 255 },
            ],
        }
    }
}

/// Convenience constructor for [`Vec2i`].
pub fn vec2(x: i32, y: i32) -> Vec2i { Vec2i { x, y } }

/// Convenience constructor for [`Recti`].
pub fn rect(x: i32, y: i32, w: i32, h: i32) -> Recti { Recti { x, y, width: w, height: h } }

/// Convenience constructor for [`Color`].
pub fn color(r: u8, g: u8, b: u8, a: u8) -> Color { Color { r, g, b, a } }

/// Expands (or shrinks) a rectangle uniformly on all sides.
pub fn expand_rect(r: Recti, n: i32) -> Recti { rect(r.x - n, r.y - n, r.width + n * 2, r.height + n * 2) }

/// Half-open hit test: the left/top edges are inside, the right/bottom edges are not.
pub fn rect_contains(r: Recti, p: Vec2i) -> bool {
    p.x >= r.x && p.y >= r.y && (p.x as i64) < r.x as i64 + r.width as i64 && (p.y as i64) < r.y as i64 + r.height as i64
}

/// Intersection of two rectangles; disjoint inputs produce a zero-sized rectangle.
pub fn intersect_rects(a: Recti, b: Recti) -> Recti {
    let x0 = a.x.max(b.x);
    let y0 = a.y.max(b.y);
    let x1 = (a.x as i64 + a.width as i64).min(b.x as i64 + b.width as i64);
    let y1 = (a.y as i64 + a.height as i64).min(b.y as i64 + b.height as i64);
    let w = (x1 - x0 as i64).max(0).min(i32::MAX as i64) as i32;
    let h = (y1 - y0 as i64).max(0).min(i32::MAX as i64) as i32;
    rect(x0, y0, w, h)
}
