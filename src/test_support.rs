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
//! In-memory TrueType fixtures shared by the unit tests.

use std::rc::Rc;

use crate::{FontAtlas, InputState, ParsedFont, Style, UiContext};

pub const GLYPH_NOTDEF: u16 = 0;
pub const GLYPH_SPACE: u16 = 1;
pub const GLYPH_A: u16 = 2;
pub const GLYPH_B: u16 = 3;
pub const GLYPH_C: u16 = 4;
pub const GLYPH_COMPOUND: u16 = 5;
pub const TEST_GLYPH_COUNT: u16 = 6;

pub const TEST_ADVANCES: [u16; 6] = [500, 250, 600, 550, 450, 500];

pub type Point = (i16, i16, bool);

pub struct Segment {
    start: u16,
    end: u16,
    delta: i16,
    glyphs: Option<Vec<u16>>,
}

pub fn delta_segment(start: u16, end: u16, first_glyph: u16) -> Segment {
    Segment {
        start,
        end,
        delta: first_glyph.wrapping_sub(start) as i16,
        glyphs: None,
    }
}

pub fn range_segment(start: u16, glyphs: Vec<u16>) -> Segment {
    Segment {
        start,
        end: start + glyphs.len() as u16 - 1,
        delta: 0,
        glyphs: Some(glyphs),
    }
}

pub fn terminator_segment() -> Segment {
    Segment {
        start: 0xFFFF,
        end: 0xFFFF,
        delta: 1,
        glyphs: None,
    }
}

fn push_u16(out: &mut Vec<u8>, v: u16) { out.extend_from_slice(&v.to_be_bytes()); }
fn push_i16(out: &mut Vec<u8>, v: i16) { out.extend_from_slice(&v.to_be_bytes()); }
fn push_u32(out: &mut Vec<u8>, v: u32) { out.extend_from_slice(&v.to_be_bytes()); }

pub fn cmap_format4(segments: &[Segment]) -> Vec<u8> {
    let n = segments.len();
    let mut entry_selector = 0u16;
    while (2usize << entry_selector) <= n {
        entry_selector += 1;
    }
    let search_range = 2 * (1u16 << entry_selector);
    let mut body = Vec::new();
    push_u16(&mut body, (2 * n) as u16);
    push_u16(&mut body, search_range);
    push_u16(&mut body, entry_selector);
    push_u16(&mut body, (2 * n as u16).wrapping_sub(search_range));
    for s in segments {
        push_u16(&mut body, s.end);
    }
    push_u16(&mut body, 0);
    for s in segments {
        push_u16(&mut body, s.start);
    }
    for s in segments {
        push_i16(&mut body, s.delta);
    }
    let mut glyph_array = Vec::new();
    for (i, s) in segments.iter().enumerate() {
        match &s.glyphs {
            Some(glyphs) => {
                push_u16(&mut body, (2 * (n - i) + 2 * glyph_array.len()) as u16);
                glyph_array.extend_from_slice(glyphs);
            }
            None => push_u16(&mut body, 0),
        }
    }
    for g in glyph_array {
        push_u16(&mut body, g);
    }

    let mut out = Vec::new();
    push_u16(&mut out, 4);
    push_u16(&mut out, (body.len() + 6) as u16);
    push_u16(&mut out, 0);
    out.extend(body);
    out
}

/// `(platform, encoding, subtable bytes)` records.
pub fn cmap_table(subtables: &[(u16, u16, Vec<u8>)]) -> Vec<u8> {
    let mut out = Vec::new();
    push_u16(&mut out, 0);
    push_u16(&mut out, subtables.len() as u16);
    let mut offset = 4 + 8 * subtables.len();
    for (platform, encoding, bytes) in subtables {
        push_u16(&mut out, *platform);
        push_u16(&mut out, *encoding);
        push_u32(&mut out, offset as u32);
        offset += bytes.len();
    }
    for (_, _, bytes) in subtables {
        out.extend_from_slice(bytes);
    }
    out
}

pub fn simple_glyph(contours: &[&[Point]], instructions: &[u8]) -> Vec<u8> {
    let points: Vec<Point> = contours.iter().flat_map(|c| c.iter().copied()).collect();
    let x_min = points.iter().map(|p| p.0).min().unwrap_or(0);
    let y_min = points.iter().map(|p| p.1).min().unwrap_or(0);
    let x_max = points.iter().map(|p| p.0).max().unwrap_or(0);
    let y_max = points.iter().map(|p| p.1).max().unwrap_or(0);

    let mut out = Vec::new();
    push_i16(&mut out, contours.len() as i16);
    push_i16(&mut out, x_min);
    push_i16(&mut out, y_min);
    push_i16(&mut out, x_max);
    push_i16(&mut out, y_max);
    let mut end = 0u16;
    for c in contours {
        end += c.len() as u16;
        push_u16(&mut out, end - 1);
    }
    push_u16(&mut out, instructions.len() as u16);
    out.extend_from_slice(instructions);
    for p in &points {
        out.push(if p.2 { 0x01 } else { 0x00 });
    }
    let mut prev = 0i16;
    for p in &points {
        push_i16(&mut out, p.0 - prev);
        prev = p.0;
    }
    let mut prev = 0i16;
    for p in &points {
        push_i16(&mut out, p.1 - prev);
        prev = p.1;
    }
    out
}

pub fn compound_glyph() -> Vec<u8> {
    let mut out = Vec::new();
    push_i16(&mut out, -1);
    for v in [0i16, 0, 600, 700] {
        push_i16(&mut out, v);
    }
    push_u16(&mut out, 0x0001); // ARG_1_AND_2_ARE_WORDS
    push_u16(&mut out, GLYPH_A);
    push_i16(&mut out, 10);
    push_i16(&mut out, 0);
    out
}

fn test_glyphs() -> Vec<Vec<u8>> {
    vec![
        simple_glyph(&[&[(50, 0, true), (450, 0, true), (450, 700, true), (50, 700, true)]], &[]),
        Vec::new(),
        simple_glyph(&[&[(0, 0, true), (600, 0, true), (300, 700, true)]], &[0xB0, 0x01]),
        simple_glyph(
            &[
                &[(0, 0, true), (500, 0, true), (500, 700, true), (0, 700, true)],
                &[(100, 100, true), (100, 600, true), (400, 600, true), (400, 100, true)],
            ],
            &[],
        ),
        simple_glyph(&[&[(0, 0, true), (200, -40, false), (400, 0, true), (400, 500, true), (0, 500, true)]], &[]),
        compound_glyph(),
    ]
}

pub fn test_font_tables(long_loca: bool) -> Vec<([u8; 4], Vec<u8>)> {
    let glyphs = test_glyphs();
    let mut glyf = Vec::new();
    let mut offsets = vec![0u32];
    for g in &glyphs {
        glyf.extend_from_slice(g);
        while glyf.len() % 4 != 0 {
            glyf.push(0);
        }
        offsets.push(glyf.len() as u32);
    }
    let mut loca = Vec::new();
    for off in &offsets {
        if long_loca {
            push_u32(&mut loca, *off);
        } else {
            push_u16(&mut loca, (*off / 2) as u16);
        }
    }

    let mut head = Vec::new();
    push_u32(&mut head, 0x0001_0000);
    push_u32(&mut head, 0x0001_0000);
    push_u32(&mut head, 0);
    push_u32(&mut head, 0x5F0F_3CF5);
    push_u16(&mut head, 0);
    push_u16(&mut head, 1000);
    head.extend_from_slice(&[0; 16]);
    for v in [0i16, -40, 600, 700] {
        push_i16(&mut head, v);
    }
    push_u16(&mut head, 0);
    push_u16(&mut head, 8);
    push_i16(&mut head, 2);
    push_i16(&mut head, if long_loca { 1 } else { 0 });
    push_i16(&mut head, 0);

    let mut hhea = Vec::new();
    push_u32(&mut hhea, 0x0001_0000);
    push_i16(&mut hhea, 800);
    push_i16(&mut hhea, -200);
    push_i16(&mut hhea, 0);
    push_u16(&mut hhea, 600);
    hhea.extend_from_slice(&[0; 22]);
    push_u16(&mut hhea, TEST_GLYPH_COUNT);

    let lsb = [50i16, 0, 0, 0, 0, 0];
    let mut hmtx = Vec::new();
    for (adv, lsb) in TEST_ADVANCES.iter().zip(lsb) {
        push_u16(&mut hmtx, *adv);
        push_i16(&mut hmtx, lsb);
    }

    let mut maxp = Vec::new();
    push_u32(&mut maxp, 0x0000_5000);
    push_u16(&mut maxp, TEST_GLYPH_COUNT);

    let cmap = cmap_table(&[(
        3,
        1,
        cmap_format4(&[
            delta_segment(' ' as u16, ' ' as u16, GLYPH_SPACE),
            range_segment('A' as u16, vec![GLYPH_A, GLYPH_B, GLYPH_C]),
            delta_segment('D' as u16, 'D' as u16, GLYPH_COMPOUND),
            terminator_segment(),
        ]),
    )]);

    vec![
        (*b"cmap", cmap),
        (*b"glyf", glyf),
        (*b"head", head),
        (*b"hhea", hhea),
        (*b"hmtx", hmtx),
        (*b"loca", loca),
        (*b"maxp", maxp),
    ]
}

pub fn assemble(tables: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
    let mut out = Vec::new();
    push_u32(&mut out, 0x0001_0000);
    push_u16(&mut out, tables.len() as u16);
    out.extend_from_slice(&[0; 6]);
    let mut body = Vec::new();
    let base = 12 + 16 * tables.len();
    for (tag, bytes) in tables {
        out.extend_from_slice(tag);
        push_u32(&mut out, 0);
        push_u32(&mut out, (base + body.len()) as u32);
        push_u32(&mut out, bytes.len() as u32);
        body.extend_from_slice(bytes);
        while body.len() % 4 != 0 {
            body.push(0);
        }
    }
    out.extend(body);
    out
}

pub fn with_table(mut tables: Vec<([u8; 4], Vec<u8>)>, tag: [u8; 4], bytes: Vec<u8>) -> Vec<([u8; 4], Vec<u8>)> {
    match tables.iter_mut().find(|t| t.0 == tag) {
        Some(entry) => entry.1 = bytes,
        None => tables.push((tag, bytes)),
    }
    tables
}

pub fn without_table(tables: Vec<([u8; 4], Vec<u8>)>, tag: [u8; 4]) -> Vec<([u8; 4], Vec<u8>)> {
    tables.into_iter().filter(|t| t.0 != tag).collect()
}

pub fn patch_u16(tables: &mut [([u8; 4], Vec<u8>)], tag: [u8; 4], offset: usize, value: u16) {
    let entry = tables.iter_mut().find(|t| t.0 == tag).expect("table present");
    entry.1[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

pub fn build_test_font() -> Vec<u8> { assemble(&test_font_tables(false)) }

pub fn test_font() -> ParsedFont { ParsedFont::from_bytes(build_test_font()).expect("fixture font parses") }

/// Atlas for " ABC" at the given pixel height with 1px padding.
pub fn test_atlas(pixel_height: f32) -> FontAtlas {
    FontAtlas::build(&test_font(), pixel_height, &[' ', 'A', 'B', 'C'], 1).expect("fixture atlas builds")
}

/// UI context over the 16px fixture atlas with the default style.
pub fn test_ui() -> UiContext { UiContext::new(Rc::new(test_atlas(16.0)), Style::default()) }

/// Input with the cursor at `(x, y)` and the button in the given state.
pub fn at(x: i32, y: i32, down: bool) -> InputState {
    let mut input = InputState::default();
    input.mousemove(x, y);
    input.mouse_down = down;
    input
}
