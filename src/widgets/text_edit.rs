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

/// What one frame of keyboard input did to a [`TextBuffer`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextEditOutcome {
    pub changed: bool,
    pub moved: bool,
    pub submit: bool,
    pub cancel: bool,
}

/// Caller-owned, fixed-capacity text for [`UiContext::textbox`]. Edits that would exceed the capacity
/// are truncated at a character boundary; the storage never grows.
#[derive(Clone, Debug)]
pub struct TextBuffer {
    text: String,
    capacity: usize,
    cursor: usize,
}

impl TextBuffer {
    /// Empty buffer holding at most `capacity` bytes of UTF-8.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    /// Buffer pre-filled with as much of `initial` as fits, cursor at the end.
    pub fn new(initial: &str, capacity: usize) -> Self {
        let mut buf = Self::with_capacity(capacity);
        buf.insert_str(initial);
        buf
    }

    /// Current contents.
    pub fn as_str(&self) -> &str { &self.text }

    /// Length in bytes.
    pub fn len(&self) -> usize { self.text.len() }

    /// `true` when the buffer holds no text.
    pub fn is_empty(&self) -> bool { self.text.is_empty() }

    /// Maximum length in bytes.
    pub fn capacity(&self) -> usize { self.capacity }

    /// Cursor as a byte offset on a character boundary.
    pub fn cursor(&self) -> usize { self.cursor }

    /// Moves the cursor, snapping back to the previous character boundary.
    pub fn set_cursor(&mut self, cursor: usize) {
        let mut c = cursor.min(self.text.len());
        while c > 0 && !self.text.is_char_boundary(c) {
            c -= 1;
        }
        self.cursor = c;
    }

    /// Removes all text.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Inserts printable characters at the cursor until the capacity is reached.
    pub fn insert_str(&mut self, text: &str) -> bool {
        let mut inserted = false;
        for ch in text.chars().filter(|c| !c.is_control()) {
            if self.text.len() + ch.len_utf8() > self.capacity {
                break;
            }
            self.text.insert(self.cursor, ch);
            self.cursor += ch.len_utf8();
            inserted = true;
        }
        inserted
    }

    /// Backspace.
    pub fn delete_prev(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = self.prev_boundary(self.cursor);
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
        true
    }

    /// Delete.
    pub fn delete_next(&mut self) -> bool {
        if self.cursor >= self.text.len() {
            return false;
        }
        let end = self.next_boundary(self.cursor);
        self.text.replace_range(self.cursor..end, "");
        true
    }

    /// Moves the cursor one character left.
    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor = self.prev_boundary(self.cursor);
        true
    }

    /// Moves the cursor one character right.
    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.text.len() {
            return false;
        }
        self.cursor = self.next_boundary(self.cursor);
        true
    }

    fn prev_boundary(&self, from: usize) -> usize {
        let mut c = from.saturating_sub(1);
        while c > 0 && !self.text.is_char_boundary(c) {
            c -= 1;
        }
        c
    }

    fn next_boundary(&self, from: usize) -> usize {
        let mut c = from + 1;
        while c < self.text.len() && !self.text.is_char_boundary(c) {
            c += 1;
        }
        c.min(self.text.len())
    }

    /// Applies typed text first, then the edit and navigation keys.
    pub(crate) fn apply_input(&mut self, input: &InputState) -> TextEditOutcome {
        let mut out = TextEditOutcome::default();
        let keys = input.keys;
        out.changed |= self.insert_str(&input.text);
        if keys.is_backspace() {
            out.changed |= self.delete_prev();
        }
        if keys.is_delete() {
            out.changed |= self.delete_next();
        }
        if keys.is_left() {
            out.moved |= self.move_left();
        }
        if keys.is_right() {
            out.moved |= self.move_right();
        }
        if keys.is_home() && self.cursor != 0 {
            self.cursor = 0;
            out.moved = true;
        }
        if keys.is_end() && self.cursor != self.text.len() {
            self.cursor = self.text.len();
            out.moved = true;
        }
        out.submit = keys.is_return();
        out.cancel = keys.is_escape();
        out
    }

    /// Byte offset of the character boundary closest to `x` pixels from the start of the text.
    pub(crate) fn cursor_from_x(&self, atlas: &FontAtlas, x: f32) -> usize {
        if x <= 0.0 {
            return 0;
        }
        let mut pen = 0.0;
        for (idx, ch) in self.text.char_indices() {
            let advance = char_advance(atlas, ch);
            if x < pen + advance {
                return if x < pen + advance * 0.5 { idx } else { idx + ch.len_utf8() };
            }
            pen += advance;
        }
        self.text.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn insertion_stops_at_capacity() {
        let mut buf = TextBuffer::with_capacity(4);
        assert!(buf.insert_str("hello"));
        assert_eq!(buf.as_str(), "hell");
        assert!(!buf.insert_str("!"));
        assert_eq!(buf.cursor(), 4);

        // a multibyte char that does not fit whole is dropped
        let mut buf = TextBuffer::new("abc", 4);
        assert!(!buf.insert_str("é"));
        assert_eq!(buf.as_str(), "abc");
    }

    #[test]
    fn control_characters_are_not_inserted() {
        let mut buf = TextBuffer::with_capacity(16);
        buf.insert_str("a\nb\u{8}\tc");
        assert_eq!(buf.as_str(), "abc");
    }

    #[test]
    fn left_moves_over_multibyte() {
        let mut buf = TextBuffer::new("aé", 8);
        assert_eq!(buf.cursor(), 3);
        assert!(buf.move_left());
        assert_eq!(buf.cursor(), 1);
        assert!(buf.move_right());
        assert_eq!(buf.cursor(), 3);
        assert!(!buf.move_right());
    }

    #[test]
    fn backspace_and_delete_remove_whole_chars() {
        let mut buf = TextBuffer::new("aéb", 8);
        buf.set_cursor(3);
        assert!(buf.delete_prev());
        assert_eq!((buf.as_str(), buf.cursor()), ("ab", 1));
        assert!(buf.delete_next());
        assert_eq!(buf.as_str(), "a");
        assert!(!buf.delete_next());
        buf.set_cursor(0);
        assert!(!buf.delete_prev());
    }

    #[test]
    fn set_cursor_snaps_to_char_boundary() {
        let mut buf = TextBuffer::new("é", 8);
        buf.set_cursor(1);
        assert_eq!(buf.cursor(), 0);
        buf.set_cursor(99);
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn apply_input_handles_keys() {
        let mut buf = TextBuffer::new("ab", 8);
        let mut input = InputState::default();
        input.text("c");
        input.keydown(Key::HOME);
        let out = buf.apply_input(&input);
        assert!(out.changed && out.moved && !out.submit);
        assert_eq!((buf.as_str(), buf.cursor()), ("abc", 0));

        let mut input = InputState::default();
        input.keydown(Key::END | Key::RETURN);
        let out = buf.apply_input(&input);
        assert!(out.submit && !out.changed);
        assert_eq!(buf.cursor(), 3);
    }

    #[test]
    fn cursor_from_x_picks_nearest_boundary() {
        let atlas = test_atlas(16.0);
        let buf = TextBuffer::new("AB", 8);
        assert_eq!(buf.cursor_from_x(&atlas, -3.0), 0);
        assert_eq!(buf.cursor_from_x(&atlas, 3.0), 0);
        assert_eq!(buf.cursor_from_x(&atlas, 6.0), 1);
        assert_eq!(buf.cursor_from_x(&atlas, 100.0), 2);
    }
}
