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
use std::path::Path;

use log::*;

use crate::reader::{Reader, read_u16_at};
use crate::{FontError, Tag};

const SFNT_VERSION: u32 = 0x0001_0000;

const TAG_HEAD: Tag = Tag(*b"head");
const TAG_MAXP: Tag = Tag(*b"maxp");
const TAG_HHEA: Tag = Tag(*b"hhea");
const TAG_CMAP: Tag = Tag(*b"cmap");
const TAG_LOCA: Tag = Tag(*b"loca");
const TAG_GLYF: Tag = Tag(*b"glyf");
const TAG_HMTX: Tag = Tag(*b"hmtx");

#[derive(Copy, Clone, Debug)]
/// One entry of the sfnt table directory.
pub struct TableRecord {
    /// Table tag.
    pub tag: Tag,
    /// Byte offset from the start of the file.
    pub offset: u32,
    /// Table length in bytes.
    pub length: u32,
}

impl TableRecord {
    fn range(&self) -> std::ops::Range<usize> { self.offset as usize..self.offset as usize + self.length as usize }
}

#[derive(Copy, Clone, Debug)]
/// Decoded `head` fields.
pub struct HeadTable {
    /// Design units per em, never zero.
    pub units_per_em: u16,
    /// Font-wide bounding box.
    pub x_min: i16,
    /// Font-wide bounding box.
    pub y_min: i16,
    /// Font-wide bounding box.
    pub x_max: i16,
    /// Font-wide bounding box.
    pub y_max: i16,
    /// 0 for 16-bit `loca` offsets, 1 for 32-bit.
    pub index_to_loc_format: i16,
}

#[derive(Copy, Clone, Debug)]
/// Decoded `hhea` fields.
pub struct HheaTable {
    /// Distance from baseline to the top of the em box, in font units.
    pub ascender: i16,
    /// Distance from baseline to the bottom of the em box (negative), in font units.
    pub descender: i16,
    /// Extra gap between lines, in font units.
    pub line_gap: i16,
    /// Number of full (advance, bearing) pairs in `hmtx`.
    pub num_h_metrics: u16,
}

#[derive(Copy, Clone, Debug)]
/// Decoded `maxp` fields.
pub struct MaxpTable {
    /// Number of glyphs in the font.
    pub num_glyphs: u16,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// Horizontal metrics of one glyph in font units.
pub struct HMetric {
    /// Pen advance.
    pub advance_width: u16,
    /// Left side bearing.
    pub left_side_bearing: i16,
}

#[derive(Clone, Debug)]
/// Segment arrays of a format 4 `cmap` subtable.
pub struct CmapFormat4 {
    end_codes: Vec<u16>,
    start_codes: Vec<u16>,
    id_deltas: Vec<i16>,
    id_range_offsets: Vec<u16>,
    // byte position of idRangeOffset[0] inside the cmap table
    range_offset_pos: usize,
}

impl CmapFormat4 {
    /// Number of segments, including the terminating `0xFFFF` one.
    pub fn segment_count(&self) -> usize { self.end_codes.len() }

    fn lookup(&self, c: u16, cmap: &[u8]) -> u16 {
        let Some(seg) = self.end_codes.iter().position(|&end| end >= c) else {
            return 0;
        };
        let start = self.start_codes[seg];
        if c < start {
            return 0;
        }
        let delta = self.id_deltas[seg] as u16;
        let range_offset = self.id_range_offsets[seg];
        if range_offset == 0 {
            return c.wrapping_add(delta);
        }
        let addr = self.range_offset_pos + 2 * seg + range_offset as usize + 2 * (c - start) as usize;
        match read_u16_at(cmap, addr) {
            Some(0) => 0,
            Some(glyph) => glyph.wrapping_add(delta),
            None => {
                debug!("cmap range offset for U+{:04X} points outside the table", c);
                0
            }
        }
    }
}

/// A TrueType font held in memory with its fixed tables decoded.
///
/// Glyph outlines are decoded on demand by [`ParsedFont::load_glyph`] and never cached here.
pub struct ParsedFont {
    data: Vec<u8>,
    tables: Vec<TableRecord>,
    head: HeadTable,
    hhea: HheaTable,
    maxp: MaxpTable,
    cmap: CmapFormat4,
    cmap_record: TableRecord,
    loca: Vec<u32>,
    glyf: TableRecord,
    hmtx: Option<TableRecord>,
}

fn find_table(tables: &[TableRecord], tag: Tag) -> Option<TableRecord> { tables.iter().copied().find(|t| t.tag == tag) }

fn required<'a>(data: &'a [u8], tables: &[TableRecord], tag: Tag, need: usize) -> Result<(TableRecord, &'a [u8]), FontError> {
    let record = find_table(tables, tag).ok_or(FontError::MissingTable(tag))?;
    if (record.length as usize) < need {
        return Err(FontError::TableTooSmall {
            tag,
            len: record.length as usize,
            need,
        });
    }
    Ok((record, &data[record.range()]))
}

fn parse_directory(data: &[u8]) -> Result<Vec<TableRecord>, FontError> {
    let mut r = Reader::new(data);
    let version = r.u32().map_err(|_| FontError::BadMagic(0))?;
    if version != SFNT_VERSION {
        return Err(FontError::BadMagic(version));
    }
    let num_tables = r.u16().map_err(|_| FontError::TruncatedDirectory(0))?;
    if data.len() < 12 + 16 * num_tables as usize {
        return Err(FontError::TruncatedDirectory(num_tables));
    }
    r.skip(6)?;

    let mut tables = Vec::with_capacity(num_tables as usize);
    for _ in 0..num_tables {
        let tag = Tag(r.tag()?);
        let _checksum = r.u32()?;
        let offset = r.u32()?;
        let length = r.u32()?;
        let end = offset as u64 + length as u64;
        if end > data.len() as u64 {
            return Err(FontError::TableOutOfBounds(tag));
        }
        tables.push(TableRecord { tag, offset, length });
    }
    Ok(tables)
}

fn parse_head(bytes: &[u8]) -> Result<HeadTable, FontError> {
    let mut r = Reader::at(bytes, 18)?;
    let units_per_em = r.u16()?;
    if units_per_em == 0 {
        return Err(FontError::ZeroUnitsPerEm);
    }
    r.skip(16)?; // created, modified
    let x_min = r.i16()?;
    let y_min = r.i16()?;
    let x_max = r.i16()?;
    let y_max = r.i16()?;
    let mut r = Reader::at(bytes, 50)?;
    let index_to_loc_format = r.i16()?;
    Ok(HeadTable {
        units_per_em,
        x_min,
        y_min,
        x_max,
        y_max,
        index_to_loc_format,
    })
}

fn parse_maxp(bytes: &[u8]) -> Result<MaxpTable, FontError> {
    let mut r = Reader::at(bytes, 4)?;
    Ok(MaxpTable { num_glyphs: r.u16()? })
}

fn parse_hhea(bytes: &[u8]) -> Result<HheaTable, FontError> {
    let mut r = Reader::at(bytes, 4)?;
    let ascender = r.i16()?;
    let descender = r.i16()?;
    let line_gap = r.i16()?;
    let mut r = Reader::at(bytes, 34)?;
    let num_h_metrics = r.u16()?;
    Ok(HheaTable {
        ascender,
        descender,
        line_gap,
        num_h_metrics,
    })
}

fn parse_cmap(bytes: &[u8]) -> Result<CmapFormat4, FontError> {
    let mut r = Reader::new(bytes);
    let _version = r.u16()?;
    let num_subtables = r.u16()?;

    let mut preferred = None;
    let mut fallback = None;
    for _ in 0..num_subtables {
        let platform = r.u16()?;
        let encoding = r.u16()?;
        let offset = r.u32()?;
        if platform == 3 && encoding == 1 {
            preferred = Some(offset);
            break;
        }
        if platform == 0 && fallback.is_none() {
            fallback = Some(offset);
        }
    }
    let offset = preferred.or(fallback).ok_or(FontError::NoUnicodeCmap)?;

    let mut r = Reader::at(bytes, offset as usize)?;
    let format = r.u16()?;
    if format != 4 {
        return Err(FontError::UnsupportedCmapFormat(format));
    }
    r.skip(4)?; // length, language
    let seg_count = (r.u16()? / 2) as usize;
    r.skip(6)?; // searchRange, entrySelector, rangeShift
    let end_codes = r.u16_array(seg_count)?;
    r.skip(2)?; // reservedPad
    let start_codes = r.u16_array(seg_count)?;
    let id_deltas = r.u16_array(seg_count)?.into_iter().map(|d| d as i16).collect();
    let range_offset_pos = r.position();
    let id_range_offsets = r.u16_array(seg_count)?;

    Ok(CmapFormat4 {
        end_codes,
        start_codes,
        id_deltas,
        id_range_offsets,
        range_offset_pos,
    })
}

fn parse_loca(bytes: &[u8], format: i16, num_glyphs: u16) -> Result<Vec<u32>, FontError> {
    let count = num_glyphs as usize + 1;
    let mut r = Reader::new(bytes);
    match format {
        0 => (0..count).map(|_| r.u16().map(|v| v as u32 * 2)).collect(),
        1 => (0..count).map(|_| r.u32()).collect(),
        other => Err(FontError::BadLocaFormat(other)),
    }
}

impl ParsedFont {
    /// Reads and parses a font file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FontError> {
        let data = std::fs::read(path.as_ref())?;
        let font = Self::from_bytes(data)?;
        info!("loaded {} ({} glyphs)", path.as_ref().display(), font.num_glyphs());
        Ok(font)
    }

    /// Parses a font held in memory, taking ownership of the bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, FontError> {
        let tables = parse_directory(&data)?;

        let (_, head_bytes) = required(&data, &tables, TAG_HEAD, 54)?;
        let head = parse_head(head_bytes)?;
        let (_, maxp_bytes) = required(&data, &tables, TAG_MAXP, 6)?;
        let maxp = parse_maxp(maxp_bytes)?;
        let (_, hhea_bytes) = required(&data, &tables, TAG_HHEA, 36)?;
        let hhea = parse_hhea(hhea_bytes)?;
        let (cmap_record, cmap_bytes) = required(&data, &tables, TAG_CMAP, 4)?;
        let cmap = parse_cmap(cmap_bytes)?;

        let entry_size = match head.index_to_loc_format {
            0 => 2,
            1 => 4,
            other => return Err(FontError::BadLocaFormat(other)),
        };
        let (_, loca_bytes) = required(&data, &tables, TAG_LOCA, (maxp.num_glyphs as usize + 1) * entry_size)?;
        let loca = parse_loca(loca_bytes, head.index_to_loc_format, maxp.num_glyphs)?;
        let (glyf, _) = required(&data, &tables, TAG_GLYF, 0)?;

        let hmtx = match find_table(&tables, TAG_HMTX) {
            Some(record) => {
                let need = hhea.num_h_metrics as usize * 4;
                if (record.length as usize) < need {
                    return Err(FontError::TableTooSmall {
                        tag: TAG_HMTX,
                        len: record.length as usize,
                        need,
                    });
                }
                Some(record)
            }
            None => None,
        };

        Ok(Self {
            data,
            tables,
            head,
            hhea,
            maxp,
            cmap,
            cmap_record,
            loca,
            glyf,
            hmtx,
        })
    }

    /// Maps a Unicode codepoint to a glyph index; unmapped codepoints and anything above the BMP map to 0.
    pub fn glyph_index(&self, codepoint: u32) -> u16 {
        if codepoint > 0xFFFF {
            return 0;
        }
        self.cmap.lookup(codepoint as u16, &self.data[self.cmap_record.range()])
    }

    /// Horizontal metrics for a glyph. Without `hmtx` the advance is half an em.
    pub fn h_metrics(&self, glyph: u16) -> HMetric {
        let fallback = HMetric {
            advance_width: self.head.units_per_em / 2,
            left_side_bearing: 0,
        };
        let (Some(record), n) = (self.hmtx, self.hhea.num_h_metrics as usize) else {
            return fallback;
        };
        if n == 0 {
            return fallback;
        }
        let bytes = &self.data[record.range()];
        let g = glyph as usize;
        if g < n {
            HMetric {
                advance_width: read_u16_at(bytes, 4 * g).unwrap_or(fallback.advance_width),
                left_side_bearing: read_u16_at(bytes, 4 * g + 2).unwrap_or(0) as i16,
            }
        } else {
            HMetric {
                advance_width: read_u16_at(bytes, 4 * (n - 1)).unwrap_or(fallback.advance_width),
                left_side_bearing: read_u16_at(bytes, 4 * n + 2 * (g - n)).unwrap_or(0) as i16,
            }
        }
    }

    /// Raw bytes of a glyph's `glyf` record; empty for zero-contour glyphs.
    pub(crate) fn glyph_data(&self, glyph: u16) -> Result<&[u8], FontError> {
        if glyph >= self.maxp.num_glyphs {
            return Err(FontError::GlyphOutOfRange(glyph));
        }
        let start = self.loca[glyph as usize] as usize;
        let end = self.loca[glyph as usize + 1] as usize;
        if end < start {
            return Err(FontError::MalformedGlyph {
                glyph,
                reason: "loca offsets decrease",
            });
        }
        if end > self.glyf.length as usize {
            return Err(FontError::MalformedGlyph {
                glyph,
                reason: "loca points past the glyf table",
            });
        }
        let base = self.glyf.offset as usize;
        Ok(&self.data[base + start..base + end])
    }

    /// Pixels per font unit for a given pixel height.
    pub fn scale_for_pixel_height(&self, pixel_height: f32) -> f32 { pixel_height / self.head.units_per_em as f32 }

    /// Design units per em.
    pub fn units_per_em(&self) -> u16 { self.head.units_per_em }

    /// Number of glyphs declared by `maxp`.
    pub fn num_glyphs(&self) -> u16 { self.maxp.num_glyphs }

    /// Typographic ascender in font units.
    pub fn ascender(&self) -> i16 { self.hhea.ascender }

    /// Typographic descender in font units, usually negative.
    pub fn descender(&self) -> i16 { self.hhea.descender }

    /// Line gap in font units.
    pub fn line_gap(&self) -> i16 { self.hhea.line_gap }

    /// Decoded `head` table.
    pub fn head(&self) -> &HeadTable { &self.head }

    /// Decoded `hhea` table.
    pub fn hhea(&self) -> &HheaTable { &self.hhea }

    /// Selected `cmap` subtable.
    pub fn cmap(&self) -> &CmapFormat4 { &self.cmap }

    /// The table directory.
    pub fn tables(&self) -> &[TableRecord] { &self.tables }

    /// Looks up a table record by tag.
    pub fn table(&self, tag: Tag) -> Option<TableRecord> { find_table(&self.tables, tag) }

    /// Normalized `loca` offsets, `num_glyphs + 1` entries.
    pub fn loca(&self) -> &[u32] { &self.loca }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn parses_fixed_tables() {
        for long_loca in [false, true] {
            let font = ParsedFont::from_bytes(assemble(&test_font_tables(long_loca))).unwrap();
            assert_eq!(font.units_per_em(), 1000);
            assert_eq!(font.num_glyphs(), TEST_GLYPH_COUNT);
            assert_eq!(font.loca().len(), TEST_GLYPH_COUNT as usize + 1);
            assert_eq!(font.ascender(), 800);
            assert_eq!(font.descender(), -200);
            assert_eq!(font.head().index_to_loc_format, if long_loca { 1 } else { 0 });
            assert_eq!(font.cmap().segment_count(), 4);
            assert!(font.table(Tag(*b"glyf")).is_some());
        }
    }

    #[test]
    fn glyph_index_follows_delta_and_range_offset_segments() {
        let font = test_font();
        assert_eq!(font.glyph_index(' ' as u32), GLYPH_SPACE);
        assert_eq!(font.glyph_index('A' as u32), GLYPH_A);
        assert_eq!(font.glyph_index('B' as u32), GLYPH_B);
        assert_eq!(font.glyph_index('C' as u32), GLYPH_C);
        assert_eq!(font.glyph_index('D' as u32), GLYPH_COMPOUND);
    }

    #[test]
    fn codepoints_outside_segments_map_to_zero() {
        let font = test_font();
        for cp in [0u32, 31, 33, 64, 69, 0x7F, 0xFFFE, 0xFFFF, 0x1_0000, 0x1F600] {
            assert_eq!(font.glyph_index(cp), 0, "U+{:04X}", cp);
        }
    }

    #[test]
    fn prefers_windows_unicode_subtable() {
        // the platform 0 subtable maps 'A' to glyph 3, the 3/1 one to glyph 2
        let unicode = cmap_format4(&[delta_segment('A' as u16, 'A' as u16, 3), terminator_segment()]);
        let windows = cmap_format4(&[delta_segment('A' as u16, 'A' as u16, 2), terminator_segment()]);
        let tables = with_table(test_font_tables(false), *b"cmap", cmap_table(&[(0, 3, unicode), (3, 1, windows)]));
        let font = ParsedFont::from_bytes(assemble(&tables)).unwrap();
        assert_eq!(font.glyph_index('A' as u32), 2);
    }

    #[test]
    fn falls_back_to_unicode_platform() {
        let unicode = cmap_format4(&[delta_segment('A' as u16, 'A' as u16, 4), terminator_segment()]);
        let tables = with_table(test_font_tables(false), *b"cmap", cmap_table(&[(1, 0, vec![0, 0]), (0, 4, unicode)]));
        let font = ParsedFont::from_bytes(assemble(&tables)).unwrap();
        assert_eq!(font.glyph_index('A' as u32), 4);
    }

    #[test]
    fn rejects_bad_inputs() {
        let mut bytes = build_test_font();
        bytes[0] = 0x4F; // 'OTTO'-like magic
        assert!(matches!(ParsedFont::from_bytes(bytes), Err(FontError::BadMagic(_))));

        let bytes = build_test_font();
        assert!(matches!(ParsedFont::from_bytes(bytes[..40].to_vec()), Err(FontError::TruncatedDirectory(_))));
        assert!(matches!(ParsedFont::from_bytes(vec![0, 1]), Err(FontError::BadMagic(_))));

        let tables = without_table(test_font_tables(false), *b"maxp");
        assert!(matches!(ParsedFont::from_bytes(assemble(&tables)), Err(FontError::MissingTable(Tag(t))) if &t == b"maxp"));

        let tables = with_table(test_font_tables(false), *b"hhea", vec![0; 20]);
        assert!(matches!(ParsedFont::from_bytes(assemble(&tables)), Err(FontError::TableTooSmall { need: 36, .. })));

        let mut tables = test_font_tables(false);
        patch_u16(&mut tables, *b"head", 18, 0);
        assert!(matches!(ParsedFont::from_bytes(assemble(&tables)), Err(FontError::ZeroUnitsPerEm)));

        let mut tables = test_font_tables(false);
        patch_u16(&mut tables, *b"head", 50, 7);
        assert!(matches!(ParsedFont::from_bytes(assemble(&tables)), Err(FontError::BadLocaFormat(7))));

        let tables = with_table(test_font_tables(false), *b"cmap", cmap_table(&[(3, 1, vec![0, 6, 0, 0])]));
        assert!(matches!(ParsedFont::from_bytes(assemble(&tables)), Err(FontError::UnsupportedCmapFormat(6))));

        let tables = with_table(test_font_tables(false), *b"cmap", cmap_table(&[(1, 0, vec![0, 4])]));
        assert!(matches!(ParsedFont::from_bytes(assemble(&tables)), Err(FontError::NoUnicodeCmap)));
    }

    #[test]
    fn table_past_end_of_file_is_rejected() {
        let mut bytes = build_test_font();
        // first record's length field
        bytes[12 + 12..12 + 16].copy_from_slice(&u32::MAX.to_be_bytes());
        assert!(matches!(ParsedFont::from_bytes(bytes), Err(FontError::TableOutOfBounds(_))));
    }

    #[test]
    fn h_metrics_reuse_last_advance() {
        let font = test_font();
        assert_eq!(font.h_metrics(GLYPH_A).advance_width, 600);
        assert_eq!(font.h_metrics(GLYPH_SPACE).advance_width, 250);

        let mut tables = test_font_tables(false);
        patch_u16(&mut tables, *b"hhea", 34, 2);
        let font = ParsedFont::from_bytes(assemble(&tables)).unwrap();
        // entries past numberOfHMetrics keep the last full advance
        assert_eq!(font.h_metrics(GLYPH_C).advance_width, font.h_metrics(GLYPH_SPACE).advance_width);

        let font = ParsedFont::from_bytes(assemble(&without_table(test_font_tables(false), *b"hmtx"))).unwrap();
        assert_eq!(font.h_metrics(GLYPH_A).advance_width, 500);
    }

    #[test]
    fn load_reports_missing_file() {
        assert!(matches!(ParsedFont::load("/nonexistent/font.ttf"), Err(FontError::Io(_))));
    }

    #[test]
    fn load_reads_from_disk() {
        let path = std::env::temp_dir().join(format!("glyphkit-font-{}.ttf", std::process::id()));
        std::fs::write(&path, build_test_font()).unwrap();
        let font = ParsedFont::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(font.glyph_index('B' as u32), GLYPH_B);
    }
}
