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
use std::fmt;

use thiserror::Error;

/// Four-byte TrueType table tag, e.g. `b"glyf"`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Tag(pub [u8; 4]);

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            let c = if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// Failures raised while loading a font or decoding one of its glyphs.
#[derive(Debug, Error)]
pub enum FontError {
    /// Reading the font file failed.
    #[error("failed to read font: {0}")]
    Io(#[from] std::io::Error),
    /// The sfnt version is not `0x00010000`.
    #[error("bad sfnt magic 0x{0:08x}")]
    BadMagic(u32),
    /// The file is too small for its own table directory.
    #[error("file too small for {0} table records")]
    TruncatedDirectory(u16),
    /// A required table is absent.
    #[error("missing required table '{0}'")]
    MissingTable(Tag),
    /// A table record points outside the file.
    #[error("table '{0}' lies outside the file")]
    TableOutOfBounds(Tag),
    /// A table is smaller than its fixed layout requires.
    #[error("table '{tag}' is {len} bytes, need at least {need}")]
    TableTooSmall {
        /// Offending table.
        tag: Tag,
        /// Declared length.
        len: usize,
        /// Required length.
        need: usize,
    },
    /// `head.unitsPerEm` is zero.
    #[error("units_per_em is zero")]
    ZeroUnitsPerEm,
    /// `head.indexToLocFormat` is neither 0 nor 1.
    #[error("invalid index_to_loc_format {0}")]
    BadLocaFormat(i16),
    /// Neither a platform 3/1 nor a platform 0 cmap subtable exists.
    #[error("no unicode cmap subtable")]
    NoUnicodeCmap,
    /// The selected cmap subtable is not format 4.
    #[error("unsupported cmap format {0}")]
    UnsupportedCmapFormat(u16),
    /// A read ran past the end of the data.
    #[error("unexpected end of data at offset {0}")]
    UnexpectedEof(usize),
    /// The glyph index is not below `maxp.numGlyphs`.
    #[error("glyph index {0} out of range")]
    GlyphOutOfRange(u16),
    /// The glyph is a compound glyph, which is not decoded.
    #[error("glyph {0} is a compound glyph")]
    CompoundGlyph(u16),
    /// The glyph's data is inconsistent.
    #[error("malformed glyph {glyph}: {reason}")]
    MalformedGlyph {
        /// Glyph index.
        glyph: u16,
        /// What was wrong.
        reason: &'static str,
    },
}

impl FontError {
    /// Returns `true` for glyph-level failures a caller can route around by substituting another glyph.
    pub fn is_recoverable(&self) -> bool { matches!(self, Self::CompoundGlyph(_)) }
}

/// Failures raised while building or exporting a [`crate::FontAtlas`].
#[derive(Debug, Error)]
pub enum AtlasError {
    /// The font could not provide a glyph.
    #[error(transparent)]
    Font(#[from] FontError),
    /// A glyph bitmap does not fit inside the largest allowed atlas.
    #[error("glyph for {codepoint:?} ({width}x{height}) does not fit in a {max_size}x{max_size} atlas")]
    GlyphTooLarge {
        /// Codepoint whose bitmap failed to fit.
        codepoint: char,
        /// Bitmap width including padding.
        width: u32,
        /// Bitmap height including padding.
        height: u32,
        /// Largest allowed atlas dimension.
        max_size: u32,
    },
    /// The packed glyph set does not fit inside the largest allowed atlas.
    #[error("glyph set needs more than a {0}x{0} atlas")]
    AtlasFull(u32),
    /// The texture allocation failed.
    #[error("could not allocate a {0}x{1} atlas texture")]
    OutOfMemory(u32, u32),
    /// Writing the atlas image failed.
    #[error(transparent)]
    Bmp(#[from] BmpError),
    /// Writing the atlas image failed.
    #[error("failed to write atlas: {0}")]
    Io(#[from] std::io::Error),
    /// PNG encoding failed.
    #[cfg(feature = "png_export")]
    #[error("png encoding failed: {0}")]
    Png(#[from] png::EncodingError),
}

/// Failures raised while encoding or parsing BMP images.
#[derive(Debug, Error)]
pub enum BmpError {
    /// Width or height is zero or does not fit the signed 32-bit header fields.
    #[error("invalid bitmap dimensions {0}x{1}")]
    InvalidDimensions(u32, u32),
    /// The pixel slice length does not match the dimensions.
    #[error("expected {expected} pixels, got {actual}")]
    PixelCountMismatch {
        /// `width * height`.
        expected: usize,
        /// Provided slice length.
        actual: usize,
    },
    /// The encoded file would overflow the 32-bit file size field.
    #[error("bitmap of {0}x{1} pixels exceeds the 32-bit file size limit")]
    TooLarge(u32, u32),
    /// The bytes are not a BMP this crate understands.
    #[error("invalid bmp header: {0}")]
    InvalidHeader(&'static str),
    /// Writing the file failed.
    #[error("failed to write bmp: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_display_escapes_binary() {
        assert_eq!(Tag(*b"glyf").to_string(), "glyf");
        assert_eq!(Tag([b'O', b'S', b'/', 0]).to_string(), "OS/?");
    }

    #[test]
    fn only_compound_glyphs_are_recoverable() {
        assert!(FontError::CompoundGlyph(3).is_recoverable());
        assert!(!FontError::GlyphOutOfRange(3).is_recoverable());
        assert!(!FontError::ZeroUnitsPerEm.is_recoverable());
    }
}
