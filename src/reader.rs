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
//! Bounds-checked big-endian cursor over font bytes.

use crate::FontError;

#[derive(Clone)]
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self { Self { data, pos: 0 } }

    /// Reader positioned at `offset`; fails if the offset is past the end.
    pub fn at(data: &'a [u8], offset: usize) -> Result<Self, FontError> {
        if offset > data.len() {
            return Err(FontError::UnexpectedEof(offset));
        }
        Ok(Self { data, pos: offset })
    }

    pub fn position(&self) -> usize { self.pos }

    pub fn remaining(&self) -> usize { self.data.len() - self.pos }

    fn take(&mut self, n: usize) -> Result<&'a [u8], FontError> {
        let end = self.pos.checked_add(n).ok_or(FontError::UnexpectedEof(self.pos))?;
        let bytes = self.data.get(self.pos..end).ok_or(FontError::UnexpectedEof(self.pos))?;
        self.pos = end;
        Ok(bytes)
    }

    pub fn skip(&mut self, n: usize) -> Result<(), FontError> {
        self.take(n)?;
        Ok(())
    }

    pub fn u8(&mut self) -> Result<u8, FontError> { Ok(self.take(1)?[0]) }

    pub fn i8(&mut self) -> Result<i8, FontError> { Ok(self.u8()? as i8) }

    pub fn u16(&mut self) -> Result<u16, FontError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn i16(&mut self) -> Result<i16, FontError> { Ok(self.u16()? as i16) }

    pub fn u32(&mut self) -> Result<u32, FontError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn tag(&mut self) -> Result<[u8; 4], FontError> {
        let b = self.take(4)?;
        Ok([b[0], b[1], b[2], b[3]])
    }

    /// Reads `count` consecutive u16 values.
    pub fn u16_array(&mut self, count: usize) -> Result<Vec<u16>, FontError> {
        let bytes = self.take(count.checked_mul(2).ok_or(FontError::UnexpectedEof(self.pos))?)?;
        Ok(bytes.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]])).collect())
    }
}

/// Random-access u16 read, `None` when out of range.
pub(crate) fn read_u16_at(data: &[u8], offset: usize) -> Option<u16> {
    let end = offset.checked_add(2)?;
    data.get(offset..end).map(|b| u16::from_be_bytes([b[0], b[1]]))
}
