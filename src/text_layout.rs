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
use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// Horizontal alignment of each line.
pub enum TextAlign {
    /// Lines start at the origin.
    #[default]
    Left,
    /// Lines are centered in the reference width.
    Center,
    /// Lines end at the reference width.
    Right,
}

#[derive(Copy, Clone, Debug)]
/// Options shared by [`layout_text`] and [`measure_text`].
pub struct TextOptions {
    /// Wrap width in pixels; `None` disables wrapping.
    pub max_width: Option<f32>,
    /// Line alignment within `max_width` (or within the widest line when unset).
    pub align: TextAlign,
    /// Vertex color.
    pub color: Color,
    /// Multiplier applied to the atlas line height.
    pub line_spacing: f32,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            max_width: None,
            align: TextAlign::Left,
            color: Color::WHITE,
            line_spacing: 1.0,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
/// Bounding box of laid out text.
pub struct TextBounds {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width of the widest line.
    pub width: f32,
    /// `line_count` line heights.
    pub height: f32,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
/// Result of [`measure_text`].
pub struct TextMetrics {
    /// Width of the widest line.
    pub width: f32,
    /// Total height of all lines.
    pub height: f32,
    /// Number of lines after wrapping.
    pub line_count: usize,
}

/// Result of [`layout_text`]: one quad per visible glyph.
pub struct TextLayout {
    /// Four vertices per glyph.
    pub vertices: Vec<Vertex>,
    /// Six indices per glyph.
    pub indices: Vec<u32>,
    /// Bounds of all lines.
    pub bbox: TextBounds,
    /// Number of lines after wrapping.
    pub line_count: usize,
}

#[derive(Copy, Clone, Debug, PartialEq)]
/// A wrapped line as a byte range of the source text.
pub struct TextLine {
    /// First byte.
    pub start: usize,
    /// One past the last byte.
    pub end: usize,
    /// Sum of advances, trailing spaces at a wrap point excluded.
    pub width: f32,
}

#[derive(Copy, Clone, Debug)]
/// A positioned glyph produced by [`for_each_quad`].
pub struct GlyphQuad {
    /// Source character.
    pub codepoint: char,
    /// Screen rectangle.
    pub rect: QuadRect,
    /// Atlas rectangle.
    pub uv: UvRect,
}

/// Pen advance of one character; codepoints missing from the atlas advance like a space.
pub fn char_advance(atlas: &FontAtlas, ch: char) -> f32 {
    match ch {
        '\r' | '\n' => 0.0,
        '\t' => 4.0 * char_advance(atlas, ' '),
        _ => match atlas.lookup(ch) {
            Some(g) => g.advance,
            None => match atlas.lookup(' ') {
                Some(space) => space.advance,
                None => atlas.pixel_height() * 0.5,
            },
        },
    }
}

/// Width of a single unwrapped run of text.
pub fn line_width(atlas: &FontAtlas, text: &str) -> f32 { text.chars().map(|c| char_advance(atlas, c)).sum() }

fn wrap_paragraph(atlas: &FontAtlas, text: &str, start: usize, end: usize, max_width: Option<f32>, lines: &mut Vec<TextLine>) {
    let mut line_start = start;
    let mut pen = 0.0f32;
    // end byte and width of the line if it were broken after the last word
    let mut word_end = (start, 0.0f32);
    // (line end, line width, next line start, pen at next line start)
    let mut candidate: Option<(usize, f32, usize, f32)> = None;

    for (i, ch) in text[start..end].char_indices() {
        let idx = start + i;
        let adv = char_advance(atlas, ch);
        if let Some(max_width) = max_width {
            if ch != ' ' && idx > line_start && pen + adv > max_width {
                match candidate.filter(|c| c.0 > line_start) {
                    Some((line_end, width, next, pen_at_next)) => {
                        lines.push(TextLine { start: line_start, end: line_end, width });
                        line_start = next;
                        pen -= pen_at_next;
                    }
                    None => {
                        lines.push(TextLine { start: line_start, end: idx, width: pen });
                        line_start = idx;
                        pen = 0.0;
                    }
                }
                candidate = None;
                word_end = (idx, pen);
            }
        }
        pen += adv;
        if ch == ' ' {
            candidate = Some((word_end.0, word_end.1, idx + 1, pen));
        } else {
            word_end = (idx + ch.len_utf8(), pen);
        }
    }
    lines.push(TextLine {
        start: line_start,
        end,
        width: pen,
    });
}

/// Splits text into lines on `'\n'` and, when `max_width` is set, at word boundaries.
/// A word wider than `max_width` is broken between characters; every line holds at least one character.
pub fn break_lines(atlas: &FontAtlas, text: &str, max_width: Option<f32>) -> Vec<TextLine> {
    let mut lines = Vec::new();
    let mut paragraph_start = 0;
    for (idx, ch) in text.char_indices() {
        if ch == '\n' {
            wrap_paragraph(atlas, text, paragraph_start, idx, max_width, &mut lines);
            paragraph_start = idx + 1;
        }
    }
    wrap_paragraph(atlas, text, paragraph_start, text.len(), max_width, &mut lines);
    lines
}

fn align_offset(align: TextAlign, reference: f32, width: f32) -> f32 {
    match align {
        TextAlign::Left => 0.0,
        TextAlign::Center => (reference - width) * 0.5,
        TextAlign::Right => reference - width,
    }
}

/// Measures text with the same line breaking as [`layout_text`], without producing geometry.
pub fn measure_text(atlas: &FontAtlas, text: &str, options: &TextOptions) -> TextMetrics {
    let lines = break_lines(atlas, text, options.max_width);
    TextMetrics {
        width: lines.iter().map(|l| l.width).fold(0.0, f32::max),
        height: lines.len() as f32 * atlas.line_height() * options.line_spacing,
        line_count: lines.len(),
    }
}

/// Walks every visible glyph of `text` laid out with its top-left corner at `(x, y)`.
pub fn for_each_quad<F: FnMut(GlyphQuad)>(atlas: &FontAtlas, text: &str, x: f32, y: f32, options: &TextOptions, mut f: F) -> (TextBounds, usize) {
    let lines = break_lines(atlas, text, options.max_width);
    let widest = lines.iter().map(|l| l.width).fold(0.0, f32::max);
    let reference = options.max_width.unwrap_or(widest);
    let line_height = atlas.line_height() * options.line_spacing;

    let mut min_dx = f32::MAX;
    for (n, line) in lines.iter().enumerate() {
        let dx = align_offset(options.align, reference, line.width);
        min_dx = min_dx.min(dx);
        let baseline = y + atlas.ascender() + n as f32 * line_height;
        let mut pen = x + dx;
        for ch in text[line.start..line.end].chars() {
            if let Some(g) = atlas.lookup(ch).filter(|g| !g.is_empty()) {
                let x0 = pen + g.bearing_x;
                let y0 = baseline - g.bearing_y;
                f(GlyphQuad {
                    codepoint: ch,
                    rect: QuadRect {
                        x0,
                        y0,
                        x1: x0 + g.width as f32,
                        y1: y0 + g.height as f32,
                    },
                    uv: g.uv,
                });
            }
            pen += char_advance(atlas, ch);
        }
    }

    let bbox = TextBounds {
        x: x + if lines.is_empty() { 0.0 } else { min_dx },
        y,
        width: widest,
        height: lines.len() as f32 * line_height,
    };
    (bbox, lines.len())
}

/// Lays text out as textured quads with its top-left corner at `(x, y)`.
pub fn layout_text(atlas: &FontAtlas, text: &str, x: f32, y: f32, options: &TextOptions) -> TextLayout {
    let color = options.color.to_rgba_f32();
    let mut list = DrawList::new();
    let (bbox, line_count) = for_each_quad(atlas, text, x, y, options, |q| {
        list.push_quad(q.rect, q.uv, color);
    });
    let (vertices, indices) = list.into_parts();
    TextLayout {
        vertices,
        indices,
        bbox,
        line_count,
    }
}
