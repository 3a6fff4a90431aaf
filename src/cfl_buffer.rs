/*
 * Copyright (c) Radzivon Bartoshyk, 10/2026. All rights reserved.
 *
 * Redistribution and use in source and binary forms, with or without modification,
 * are permitted provided that the following conditions are met:
 *
 * 1.  Redistributions of source code must retain the above copyright notice, this
 * list of conditions and the following disclaimer.
 *
 * 2.  Redistributions in binary form must reproduce the above copyright notice,
 * this list of conditions and the following disclaimer in the documentation
 * and/or other materials provided with the distribution.
 *
 * 3.  Neither the name of the copyright holder nor the names of its
 * contributors may be used to endorse or promote products derived from
 * this software without specific prior written permission.
 *
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
use crate::cfl_error::{check_cfl_geometry, MismatchedSize};
use crate::cfl_support::{CFL_BUF_LINE, CFL_BUF_SQUARE};
use crate::CflError;
use std::fmt::Debug;

#[derive(Debug)]
/// Shared storage for buffer
pub enum BufferStoreMut<'a, T: Copy + Debug> {
    Borrowed(&'a mut [T]),
    Owned(Vec<T>),
}

impl<T: Copy + Debug> BufferStoreMut<'_, T> {
    pub fn borrow(&self) -> &[T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }

    pub fn as_mut(&mut self) -> &mut [T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }
}

#[derive(Debug)]
/// Full size CfL prediction buffer, rows are always [CFL_BUF_LINE] samples apart.
///
/// Blocks occupy the top left corner of the buffer.
pub struct CflPredictionBuffer<'a> {
    pub data: BufferStoreMut<'a, i16>,
}

impl<'a> CflPredictionBuffer<'a> {
    /// Allocates a zeroed buffer of [CFL_BUF_SQUARE] samples.
    pub fn alloc() -> CflPredictionBuffer<'static> {
        CflPredictionBuffer {
            data: BufferStoreMut::Owned(vec![0i16; CFL_BUF_SQUARE]),
        }
    }

    /// Wraps caller owned memory, which must hold at least [CFL_BUF_SQUARE] samples.
    pub fn borrowed(data: &'a mut [i16]) -> Result<CflPredictionBuffer<'a>, CflError> {
        if data.len() < CFL_BUF_SQUARE {
            return Err(CflError::BufferSizeMismatch(MismatchedSize {
                expected: CFL_BUF_SQUARE,
                received: data.len(),
            }));
        }
        Ok(CflPredictionBuffer {
            data: BufferStoreMut::Borrowed(data),
        })
    }

    /// Copies a full buffer of exactly [CFL_BUF_SQUARE] samples.
    pub fn from_slice(samples: &[i16]) -> Result<CflPredictionBuffer<'static>, CflError> {
        if samples.len() != CFL_BUF_SQUARE {
            return Err(CflError::BufferSizeMismatch(MismatchedSize {
                expected: CFL_BUF_SQUARE,
                received: samples.len(),
            }));
        }
        Ok(CflPredictionBuffer {
            data: BufferStoreMut::Owned(samples.to_vec()),
        })
    }

    /// Places a tightly packed `width`x`height` block into a new zeroed buffer.
    pub fn from_block(
        width: usize,
        height: usize,
        samples: &[i16],
    ) -> Result<CflPredictionBuffer<'static>, CflError> {
        check_cfl_geometry(width, height)?;
        if samples.len() != width * height {
            return Err(CflError::BufferSizeMismatch(MismatchedSize {
                expected: width * height,
                received: samples.len(),
            }));
        }
        let mut buffer = CflPredictionBuffer::alloc();
        for (dst, src) in buffer
            .as_mut_slice()
            .chunks_exact_mut(CFL_BUF_LINE)
            .zip(samples.chunks_exact(width))
        {
            dst[..width].copy_from_slice(src);
        }
        Ok(buffer)
    }

    #[inline]
    pub fn as_slice(&self) -> &[i16] {
        self.data.borrow()
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [i16] {
        self.data.as_mut()
    }

    /// Copies the `width`x`height` block out, tightly packed.
    pub fn block(&self, width: usize, height: usize) -> Result<Vec<i16>, CflError> {
        check_cfl_geometry(width, height)?;
        Ok(self
            .as_slice()
            .chunks_exact(CFL_BUF_LINE)
            .take(height)
            .flat_map(|row| row[..width].iter().copied())
            .collect())
    }

    /// Sum of the `width`x`height` block.
    pub fn block_sum(&self, width: usize, height: usize) -> Result<i64, CflError> {
        check_cfl_geometry(width, height)?;
        Ok(self
            .as_slice()
            .chunks_exact(CFL_BUF_LINE)
            .take(height)
            .flat_map(|row| row[..width].iter())
            .map(|&v| v as i64)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_block_layout() {
        let samples: Vec<i16> = (1..=16).collect();
        let buffer = CflPredictionBuffer::from_block(4, 4, &samples).unwrap();
        assert_eq!(buffer.as_slice().len(), CFL_BUF_SQUARE);
        assert_eq!(&buffer.as_slice()[..4], &[1, 2, 3, 4]);
        assert_eq!(&buffer.as_slice()[CFL_BUF_LINE..CFL_BUF_LINE + 4], &[5, 6, 7, 8]);
        assert_eq!(buffer.as_slice()[4], 0);
        assert_eq!(buffer.block(4, 4), Ok(samples));
        assert_eq!(buffer.block_sum(4, 4), Ok(136));
    }

    #[test]
    fn test_from_block_rejects_mismatch() {
        assert!(matches!(
            CflPredictionBuffer::from_block(8, 8, &[0i16; 60]),
            Err(CflError::BufferSizeMismatch(_))
        ));
        assert!(matches!(
            CflPredictionBuffer::from_block(64, 4, &[0i16; 256]),
            Err(CflError::UnsupportedGeometry { .. })
        ));
    }

    #[test]
    fn test_borrowed_writes_through() {
        let mut storage = vec![3i16; CFL_BUF_SQUARE];
        {
            let mut buffer = CflPredictionBuffer::borrowed(&mut storage).unwrap();
            buffer.as_mut_slice()[0] = -1;
        }
        assert_eq!(storage[0], -1);
        assert!(CflPredictionBuffer::borrowed(&mut storage[..100]).is_err());
        assert!(CflPredictionBuffer::from_slice(&storage[..100]).is_err());
    }

    #[test]
    fn test_block_rejects_unsupported_geometry() {
        let buffer = CflPredictionBuffer::alloc();
        assert_eq!(
            buffer.block(64, 4),
            Err(CflError::UnsupportedGeometry {
                width: 64,
                height: 4
            })
        );
        assert_eq!(
            buffer.block_sum(33, 8),
            Err(CflError::UnsupportedGeometry {
                width: 33,
                height: 8
            })
        );
        assert_eq!(buffer.block_sum(32, 32), Ok(0));
        assert_eq!(buffer.block(8, 4).map(|b| b.len()), Ok(32));
    }
}
