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

/// Vertical scrollbar track docked to the right edge of `body`.
pub(crate) fn track_rect(body: Recti, scrollbar_size: i32) -> Recti {
    rect(body.x + body.width - scrollbar_size, body.y, scrollbar_size, body.height)
}

pub(crate) fn max_scroll(content_len: i32, view_len: i32) -> i32 { (content_len - view_len).max(0) }

/// Thumb length proportional to the visible share of the content, never shorter than `min_thumb`.
pub(crate) fn thumb_len(track_len: i32, view_len: i32, content_len: i32, min_thumb: i32) -> i32 {
    if track_len <= 0 || content_len <= 0 || view_len <= 0 {
        return track_len.max(0);
    }
    let len = (track_len as i64 * view_len as i64 / content_len as i64) as i32;
    len.max(min_thumb).min(track_len)
}

pub(crate) fn thumb_rect(track: Recti, view_len: i32, content_len: i32, scroll: i32, min_thumb: i32) -> Recti {
    let len = thumb_len(track.height, view_len, content_len, min_thumb);
    let mut thumb = track;
    thumb.height = len;
    let max = max_scroll(content_len, view_len);
    let travel = track.height - len;
    if max > 0 && travel > 0 {
        thumb.y += (scroll.clamp(0, max) as i64 * travel as i64 / max as i64) as i32;
    }
    thumb
}

/// Inverse of [`thumb_rect`]: the scroll offset that puts the thumb's top edge at `thumb_y`.
pub(crate) fn scroll_for_thumb(track: Recti, thumb_height: i32, view_len: i32, content_len: i32, thumb_y: i32) -> i32 {
    let max = max_scroll(content_len, view_len);
    let travel = track.height - thumb_height;
    if max == 0 || travel <= 0 {
        return 0;
    }
    let offset = (thumb_y - track.y).clamp(0, travel);
    (offset as i64 * max as i64 / travel as i64) as i32
}
