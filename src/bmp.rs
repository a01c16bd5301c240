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
//! Uncompressed 32-bit BMP output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::*;

/// Size of the `BITMAPFILEHEADER`.
pub const BMP_FILE_HEADER_SIZE: u32 = 14;
/// Size of the `BITMAPINFOHEADER`.
pub const BMP_INFO_HEADER_SIZE: u32 = 40;

const PIXELS_PER_METER: i32 = 2835; // 72 dpi

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Fields read back from a BMP header.
pub struct BmpHeader {
    /// Total file size recorded in the file header.
    pub file_size: u32,
    /// Offset of the pixel array.
    pub data_offset: u32,
    /// Image width.
    pub width: i32,
    /// Image height; positive means bottom-up rows.
    pub height: i32,
    /// Bits per pixel.
    pub bits_per_pixel: u16,
    /// Compression method, 0 for uncompressed.
    pub compression: u32,
}

fn le_u16(b: &[u8], at: usize) -> u16 { u16::from_le_bytes([b[at], b[at + 1]]) }
fn le_u32(b: &[u8], at: usize) -> u32 { u32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]]) }

impl BmpHeader {
    /// Parses the file and info headers.
    pub fn parse(bytes: &[u8]) -> Result<Self, BmpError> {
        if bytes.len() < (BMP_FILE_HEADER_SIZE + BMP_INFO_HEADER_SIZE) as usize {
            return Err(BmpError::InvalidHeader("shorter than the fixed headers"));
        }
        if &bytes[0..2] != b"BM" {
            return Err(BmpError::InvalidHeader("missing 'BM' signature"));
        }
        if le_u32(bytes, 14) < BMP_INFO_HEADER_SIZE {
            return Err(BmpError::InvalidHeader("unsupported info header"));
        }
        Ok(Self {
            file_size: le_u32(bytes, 2),
            data_offset: le_u32(bytes, 10),
            width: le_u32(bytes, 18) as i32,
            height: le_u32(bytes, 22) as i32,
            bits_per_pixel: le_u16(bytes, 28),
            compression: le_u32(bytes, 30),
        })
    }
}

fn validate(width: u32, height: u32, pixels: &[Color4b]) -> Result<u32, BmpError> {
    if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
        return Err(BmpError::InvalidDimensions(width, height));
    }
    let file_size = (BMP_FILE_HEADER_SIZE + BMP_INFO_HEADER_SIZE) as u64 + width as u64 * height as u64 * 4;
    let file_size = u32::try_from(file_size).map_err(|_| BmpError::TooLarge(width, height))?;
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(BmpError::PixelCountMismatch {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(file_size)
}

/// Writes top-down RGBA pixels as a bottom-up BGRA BMP.
pub fn write_bmp<W: Write>(mut w: W, width: u32, height: u32, pixels: &[Color4b]) -> Result<(), BmpError> {
    let file_size = validate(width, height, pixels)?;
    let data_offset = BMP_FILE_HEADER_SIZE + BMP_INFO_HEADER_SIZE;

    let mut header = Vec::with_capacity(data_offset as usize);
    header.extend_from_slice(b"BM");
    header.extend_from_slice(&file_size.to_le_bytes());
    header.extend_from_slice(&[0; 4]);
    header.extend_from_slice(&data_offset.to_le_bytes());

    header.extend_from_slice(&BMP_INFO_HEADER_SIZE.to_le_bytes());
    header.extend_from_slice(&(width as i32).to_le_bytes());
    header.extend_from_slice(&(height as i32).to_le_bytes());
    header.extend_from_slice(&1u16.to_le_bytes());
    header.extend_from_slice(&32u16.to_le_bytes());
    header.extend_from_slice(&0u32.to_le_bytes());
    header.extend_from_slice(&(file_size - data_offset).to_le_bytes());
    header.extend_from_slice(&PIXELS_PER_METER.to_le_bytes());
    header.extend_from_slice(&PIXELS_PER_METER.to_le_bytes());
    header.extend_from_slice(&[0; 8]);
    w.write_all(&header)?;

    let mut row = Vec::with_capacity(width as usize * 4);
    for y in (0..height as usize).rev() {
        row.clear();
        for p in &pixels[y * width as usize..(y + 1) * width as usize] {
            row.extend_from_slice(&[p.z, p.y, p.x, p.w]);
        }
        w.write_all(&row)?;
    }
    w.flush()?;
    Ok(())
}

/// Encodes top-down RGBA pixels into BMP bytes.
pub fn encode_bmp(width: u32, height: u32, pixels: &[Color4b]) -> Result<Vec<u8>, BmpError> {
    let mut bytes = Vec::new();
    write_bmp(&mut bytes, width, height, pixels)?;
    Ok(bytes)
}

/// Writes top-down RGBA pixels to a BMP file.
pub fn save_bmp<P: AsRef<Path>>(path: P, width: u32, height: u32, pixels: &[Color4b]) -> Result<(), BmpError> {
    validate(width, height, pixels)?;
    let file = File::create(path)?;
    write_bmp(BufWriter::new(file), width, height, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Vec<Color4b> {
        vec![
            color4b(255, 0, 0, 255),
            color4b(0, 255, 0, 255),
            color4b(0, 0, 255, 255),
            color4b(255, 255, 255, 255),
        ]
    }

    #[test]
    fn header_round_trip() {
        let bytes = encode_bmp(2, 2, &quad()).unwrap();
        let header = BmpHeader::parse(&bytes).unwrap();
        assert_eq!(header.width, 2);
        assert_eq!(header.height, 2);
        assert_eq!(header.bits_per_pixel, 32);
        assert_eq!(header.compression, 0);
        assert_eq!(header.file_size, 14 + 40 + 2 * 2 * 4);
        assert_eq!(header.data_offset, 54);
        assert_eq!(bytes.len() as u32, header.file_size);
    }

    #[test]
    fn rows_are_bottom_up_bgra() {
        let bytes = encode_bmp(2, 2, &quad()).unwrap();
        // bottom row first: blue then white
        assert_eq!(&bytes[54..58], &[255, 0, 0, 255]);
        assert_eq!(&bytes[58..62], &[255, 255, 255, 255]);
        // then the top row: red, green
        assert_eq!(&bytes[62..66], &[0, 0, 255, 255]);
        assert_eq!(&bytes[66..70], &[0, 255, 0, 255]);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(encode_bmp(0, 2, &[]), Err(BmpError::InvalidDimensions(0, 2))));
        assert!(matches!(encode_bmp(2, 2, &quad()[..3]), Err(BmpError::PixelCountMismatch { expected: 4, actual: 3 })));
        assert!(matches!(validate(65536, 65536, &[]), Err(BmpError::TooLarge(65536, 65536))));
        assert!(BmpHeader::parse(b"BM").is_err());
        let mut bytes = encode_bmp(2, 2, &quad()).unwrap();
        bytes[0] = b'X';
        assert!(matches!(BmpHeader::parse(&bytes), Err(BmpError::InvalidHeader(_))));
    }

    #[test]
    fn saves_to_disk() {
        let path = std::env::temp_dir().join(format!("glyphkit-bmp-{}.bmp", std::process::id()));
        save_bmp(&path, 2, 2, &quad()).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(BmpHeader::parse(&bytes).unwrap().file_size, 70);
    }
}
