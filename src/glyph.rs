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
use crate::reader::Reader;
use crate::{FontError, ParsedFont};

const ON_CURVE: u8 = 0x01;
const X_SHORT: u8 = 0x02;
const Y_SHORT: u8 = 0x04;
const REPEAT: u8 = 0x08;
const X_SAME_OR_POS: u8 = 0x10;
const Y_SAME_OR_POS: u8 = 0x20;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// A point of a glyph outline in font design units.
pub struct OutlinePoint {
    /// Horizontal position.
    pub x: i32,
    /// Vertical position, y up.
    pub y: i32,
    /// `false` for quadratic control points.
    pub on_curve: bool,
}

#[derive(Clone, Debug, Default)]
/// Decoded outline of a simple glyph. Zero-contour glyphs (space) have no points.
pub struct GlyphOutline {
    /// Bounding box from the glyph header.
    pub x_min: i16,
    /// Bounding box from the glyph header.
    pub y_min: i16,
    /// Bounding box from the glyph header.
    pub x_max: i16,
    /// Bounding box from the glyph header.
    pub y_max: i16,
    /// Exclusive end index into `points` for each contour.
    pub contour_ends: Vec<usize>,
    /// All points of all contours.
    pub points: Vec<OutlinePoint>,
}

impl GlyphOutline {
    /// Returns `true` when the outline has no points.
    pub fn is_empty(&self) -> bool { self.points.is_empty() }

    /// Number of contours.
    pub fn num_contours(&self) -> usize { self.contour_ends.len() }

    /// Iterates the contours as point slices.
    pub fn contours(&self) -> impl Iterator<Item = &[OutlinePoint]> + '_ {
        let mut start = 0;
        self.contour_ends.iter().map(move |&end| {
            let contour = &self.points[start..end];
            start = end;
            contour
        })
    }
}

fn parse_simple_glyph(glyph: u16, bytes: &[u8]) -> Result<GlyphOutline, FontError> {
    let truncated = |_| FontError::MalformedGlyph { glyph, reason: "truncated glyph data" };
    let mut r = Reader::new(bytes);
    let num_contours = r.i16().map_err(truncated)?;
    if num_contours < 0 {
        return Err(FontError::CompoundGlyph(glyph));
    }
    let mut outline = GlyphOutline {
        x_min: r.i16().map_err(truncated)?,
        y_min: r.i16().map_err(truncated)?,
        x_max: r.i16().map_err(truncated)?,
        y_max: r.i16().map_err(truncated)?,
        ..Default::default()
    };
    if num_contours == 0 {
        return Ok(outline);
    }

    let mut prev_end = 0;
    for _ in 0..num_contours {
        let end = r.u16().map_err(truncated)? as usize + 1;
        if end <= prev_end {
            return Err(FontError::MalformedGlyph {
                glyph,
                reason: "contour end points are not increasing",
            });
        }
        outline.contour_ends.push(end);
        prev_end = end;
    }
    let num_points = prev_end;

    let instruction_len = r.u16().map_err(truncated)? as usize;
    r.skip(instruction_len).map_err(truncated)?;

    let mut flags = Vec::with_capacity(num_points);
    while flags.len() < num_points {
        let flag = r.u8().map_err(truncated)?;
        flags.push(flag);
        if flag & REPEAT != 0 {
            let count = r.u8().map_err(truncated)?;
            for _ in 0..count {
                flags.push(flag);
            }
        }
    }
    flags.truncate(num_points);

    let mut xs = Vec::with_capacity(num_points);
    let mut x = 0i32;
    for &flag in &flags {
        x += if flag & X_SHORT != 0 {
            let d = r.u8().map_err(truncated)? as i32;
            if flag & X_SAME_OR_POS != 0 { d } else { -d }
        } else if flag & X_SAME_OR_POS != 0 {
            0
        } else {
            r.i16().map_err(truncated)? as i32
        };
        xs.push(x);
    }

    let mut y = 0i32;
    for (i, &flag) in flags.iter().enumerate() {
        y += if flag & Y_SHORT != 0 {
            let d = r.u8().map_err(truncated)? as i32;
            if flag & Y_SAME_OR_POS != 0 { d } else { -d }
        } else if flag & Y_SAME_OR_POS != 0 {
            0
        } else {
            r.i16().map_err(truncated)? as i32
        };
        outline.points.push(OutlinePoint {
            x: xs[i],
            y,
            on_curve: flag & ON_CURVE != 0,
        });
    }
    Ok(outline)
}

impl ParsedFont {
    /// Decodes a glyph outline.
    ///
    /// A zero-length `loca` range yields an empty outline. Compound glyphs yield
    /// [`FontError::CompoundGlyph`], which [`FontError::is_recoverable`] reports as a skip.
    pub fn load_glyph(&self, glyph: u16) -> Result<GlyphOutline, FontError> {
        let bytes = self.glyph_data(glyph)?;
        if bytes.is_empty() {
            return Ok(GlyphOutline::default());
        }
        parse_simple_glyph(glyph, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn xy(outline: &GlyphOutline) -> Vec<(i32, i32)> { outline.points.iter().map(|p| (p.x, p.y)).collect() }

    #[test]
    fn zero_length_glyph_is_empty_outline() {
        for long_loca in [false, true] {
            let font = ParsedFont::from_bytes(assemble(&test_font_tables(long_loca))).unwrap();
            let space = font.load_glyph(GLYPH_SPACE).unwrap();
            assert!(space.is_empty());
            assert_eq!(space.num_contours(), 0);
        }
    }

    #[test]
    fn decodes_simple_glyphs() {
        let font = test_font();
        let a = font.load_glyph(GLYPH_A).unwrap();
        assert_eq!(xy(&a), vec![(0, 0), (600, 0), (300, 700)]);
        assert_eq!(a.contour_ends, vec![3]);
        assert_eq!((a.x_min, a.y_min, a.x_max, a.y_max), (0, 0, 600, 700));

        let b = font.load_glyph(GLYPH_B).unwrap();
        assert_eq!(b.contour_ends, vec![4, 8]);
        let contours: Vec<_> = b.contours().collect();
        assert_eq!(contours.len(), 2);
        assert_eq!((contours[1][0].x, contours[1][0].y), (100, 100));

        let c = font.load_glyph(GLYPH_C).unwrap();
        let on: Vec<bool> = c.points.iter().map(|p| p.on_curve).collect();
        assert_eq!(on, vec![true, false, true, true, true]);
        assert_eq!((c.points[1].x, c.points[1].y), (200, -40));
    }

    #[test]
    fn compound_glyph_is_recoverable_skip() {
        let font = test_font();
        let err = font.load_glyph(GLYPH_COMPOUND).unwrap_err();
        assert!(matches!(err, FontError::CompoundGlyph(GLYPH_COMPOUND)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn out_of_range_glyph_is_rejected() {
        let font = test_font();
        assert!(matches!(font.load_glyph(TEST_GLYPH_COUNT), Err(FontError::GlyphOutOfRange(_))));
    }

    #[test]
    fn short_vectors_and_same_flags() {
        #[rustfmt::skip]
        let bytes = [
            0, 1, 0, 0, 0, 0, 0, 10, 0, 10, // header
            0, 3,                            // end point
            0, 1, 0xAA,                      // instructions
            0x31, 0x33, 0x35, 0x23,          // flags
            10, 10,                          // x: +10, -10
            10,                              // y: +10
        ];
        let outline = parse_simple_glyph(9, &bytes).unwrap();
        assert_eq!(xy(&outline), vec![(0, 0), (10, 0), (10, 10), (0, 10)]);
        assert!(outline.points.iter().all(|p| p.on_curve));
    }

    #[test]
    fn repeat_flags_expand() {
        #[rustfmt::skip]
        let bytes = [
            0, 1, 0, 0, 0, 0, 0, 100, 0, 80,
            0, 2,
            0, 0,
            0x09, 0x02,
            0x00, 0x00, 0x00, 0x64, 0xFF, 0xCE,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x50,
        ];
        let outline = parse_simple_glyph(1, &bytes).unwrap();
        assert_eq!(xy(&outline), vec![(0, 0), (100, 0), (50, 80)]);
    }

    #[test]
    fn truncated_glyph_is_malformed() {
        let bytes = [0, 1, 0, 0, 0, 0, 0, 100, 0, 80, 0, 2, 0, 0, 0x09, 0x02, 0x00];
        assert!(matches!(parse_simple_glyph(1, &bytes), Err(FontError::MalformedGlyph { glyph: 1, .. })));
        let bytes = [0, 2, 0, 0, 0, 0, 0, 1, 0, 1, 0, 3, 0, 2];
        assert!(matches!(parse_simple_glyph(1, &bytes), Err(FontError::MalformedGlyph { .. })));
    }

    #[test]
    fn mutated_fonts_never_panic() {
        let pristine = build_test_font();
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..500 {
            let mut bytes = pristine.clone();
            for _ in 0..rng.random_range(1..8) {
                let at = rng.random_range(0..bytes.len());
                bytes[at] = rng.random();
            }
            if rng.random_range(0..4) == 0 {
                let keep = rng.random_range(0..bytes.len());
                bytes.truncate(keep);
            }
            if let Ok(font) = ParsedFont::from_bytes(bytes) {
                for cp in 0..0x80u32 {
                    let _ = font.glyph_index(cp);
                }
                for g in 0..font.num_glyphs() {
                    let _ = font.load_glyph(g);
                    let _ = font.h_metrics(g);
                }
            }
        }
    }
}
