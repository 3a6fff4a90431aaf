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
use crate::cfl_buffer::CflPredictionBuffer;
use crate::cfl_error::check_cfl_buffer;
use crate::cfl_support::{CflGeometry, TxSize, TX_SIZES_ALL};
use crate::subtract_average::{
    make_vector_handler, subtract_average_scalar_wxh, SubtractAverageHandler,
};
use crate::CflError;
#[cfg(feature = "rayon")]
use rayon::iter::{IntoParallelRefMutIterator, ParallelIterator};
use std::fmt::{Debug, Formatter};
use std::sync::OnceLock;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
/// Which kind of routine a dispatch table entry runs.
pub enum SubtractAverageRoute {
    /// Vector kernel specialized for the block size
    Vector,
    /// Scalar routine, used for blocks 4 samples wide and when no vector unit is available
    Scalar,
    /// Transform size CfL never uses
    Invalid,
}

#[derive(Copy, Clone)]
enum SubtractAverageKernel {
    Vector(SubtractAverageHandler),
    Scalar(SubtractAverageHandler),
    Invalid,
}

#[derive(Copy, Clone)]
/// Subtract average routine for one transform size, as returned by [get_subtract_average_fn].
pub struct SubtractAverageFn {
    tx_size: TxSize,
    kernel: SubtractAverageKernel,
}

impl SubtractAverageFn {
    #[inline]
    pub fn tx_size(&self) -> TxSize {
        self.tx_size
    }

    #[inline]
    pub fn route(&self) -> SubtractAverageRoute {
        match self.kernel {
            SubtractAverageKernel::Vector(_) => SubtractAverageRoute::Vector,
            SubtractAverageKernel::Scalar(_) => SubtractAverageRoute::Scalar,
            SubtractAverageKernel::Invalid => SubtractAverageRoute::Invalid,
        }
    }

    #[inline]
    pub fn geometry(&self) -> Option<CflGeometry> {
        self.tx_size.cfl_geometry()
    }

    /// Subtracts the block average in place.
    ///
    /// # Errors
    ///
    /// [CflError::InvalidTransformSize] for entries of sizes CfL never uses, this signals a
    /// logic error in the caller and the buffer is left untouched.
    /// [CflError::BufferSizeMismatch] if `pred_buf` does not cover the block.
    pub fn execute(&self, pred_buf: &mut [i16]) -> Result<(), CflError> {
        match self.kernel {
            SubtractAverageKernel::Vector(handler) | SubtractAverageKernel::Scalar(handler) => {
                check_cfl_buffer(pred_buf, self.tx_size.width(), self.tx_size.height())?;
                unsafe {
                    handler(pred_buf);
                }
                Ok(())
            }
            SubtractAverageKernel::Invalid => subtract_average_null(self.tx_size),
        }
    }
}

impl Debug for SubtractAverageFn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubtractAverageFn")
            .field("tx_size", &self.tx_size)
            .field("route", &self.route())
            .finish()
    }
}

#[cold]
fn subtract_average_null(tx_size: TxSize) -> Result<(), CflError> {
    Err(CflError::InvalidTransformSize(tx_size))
}

fn make_vector_kernel<const W: usize, const H: usize>() -> SubtractAverageKernel {
    match make_vector_handler::<W, H>() {
        Some(handler) => SubtractAverageKernel::Vector(handler),
        None => SubtractAverageKernel::Scalar(subtract_average_scalar_wxh::<W, H>),
    }
}

fn make_subtract_average_fn(tx_size: TxSize) -> SubtractAverageFn {
    // For 4 wide blocks the vector setup costs more than it saves.
    let kernel = match tx_size {
        TxSize::Tx4x4 => SubtractAverageKernel::Scalar(subtract_average_scalar_wxh::<4, 4>),
        TxSize::Tx4x8 => SubtractAverageKernel::Scalar(subtract_average_scalar_wxh::<4, 8>),
        TxSize::Tx4x16 => SubtractAverageKernel::Scalar(subtract_average_scalar_wxh::<4, 16>),
        TxSize::Tx8x4 => make_vector_kernel::<8, 4>(),
        TxSize::Tx8x8 => make_vector_kernel::<8, 8>(),
        TxSize::Tx8x16 => make_vector_kernel::<8, 16>(),
        TxSize::Tx8x32 => make_vector_kernel::<8, 32>(),
        TxSize::Tx16x4 => make_vector_kernel::<16, 4>(),
        TxSize::Tx16x8 => make_vector_kernel::<16, 8>(),
        TxSize::Tx16x16 => make_vector_kernel::<16, 16>(),
        TxSize::Tx16x32 => make_vector_kernel::<16, 32>(),
        TxSize::Tx32x8 => make_vector_kernel::<32, 8>(),
        TxSize::Tx32x16 => make_vector_kernel::<32, 16>(),
        TxSize::Tx32x32 => make_vector_kernel::<32, 32>(),
        TxSize::Tx64x64
        | TxSize::Tx32x64
        | TxSize::Tx64x32
        | TxSize::Tx16x64
        | TxSize::Tx64x16 => SubtractAverageKernel::Invalid,
    };
    SubtractAverageFn { tx_size, kernel }
}

static SUBTRACT_AVERAGE_TABLE: OnceLock<[SubtractAverageFn; TX_SIZES_ALL]> = OnceLock::new();

fn subtract_average_table() -> &'static [SubtractAverageFn; TX_SIZES_ALL] {
    SUBTRACT_AVERAGE_TABLE.get_or_init(|| TxSize::ALL.map(make_subtract_average_fn))
}

/// Returns the subtract average routine for a transform size identifier.
///
/// Any identifier is accepted: it is reduced modulo [TX_SIZES_ALL] before indexing, so a
/// corrupted or negative value selects some table entry instead of reading out of bounds.
pub fn get_subtract_average_fn(tx_size: i32) -> SubtractAverageFn {
    let table = subtract_average_table();
    table[tx_size.rem_euclid(table.len() as i32) as usize]
}

impl TxSize {
    /// Shorthand for [get_subtract_average_fn] with this size.
    #[inline]
    pub fn subtract_average_fn(self) -> SubtractAverageFn {
        get_subtract_average_fn(self.into())
    }
}

/// Subtracts the block average from each of `buffers`, all holding `tx_size` blocks.
///
/// Blocks are independent, with the `rayon` feature they are processed in parallel.
///
/// # Errors
///
/// Fails on the first block that fails, see [SubtractAverageFn::execute].
pub fn subtract_average_blocks(
    buffers: &mut [CflPredictionBuffer<'_>],
    tx_size: TxSize,
) -> Result<(), CflError> {
    let executor = tx_size.subtract_average_fn();
    if executor.route() == SubtractAverageRoute::Invalid {
        return subtract_average_null(tx_size);
    }

    #[cfg(feature = "rayon")]
    {
        buffers
            .par_iter_mut()
            .try_for_each(|buffer| executor.execute(buffer.as_mut_slice()))
    }
    #[cfg(not(feature = "rayon"))]
    {
        buffers
            .iter_mut()
            .try_for_each(|buffer| executor.execute(buffer.as_mut_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{active_backend, subtract_average_scalar, CflBackend, CFL_BUF_LINE, CFL_BUF_SQUARE};
    use rand::Rng;

    fn random_buffer() -> Vec<i16> {
        let mut rng = rand::rng();
        (0..CFL_BUF_SQUARE)
            .map(|_| rng.random_range(0..=(255 << 3)))
            .collect()
    }

    #[test]
    fn test_every_identifier_has_an_entry() {
        let ids = (-64..64)
            .chain([i32::MIN, i32::MIN + 1, i32::MAX, i32::MAX - 1, 19, 38, 1000]);
        for id in ids {
            let entry = get_subtract_average_fn(id);
            assert_eq!(entry.tx_size(), TxSize::from_id_wrapping(id));
        }
    }

    #[test]
    fn test_routes() {
        for tx_size in TxSize::ALL {
            let entry = tx_size.subtract_average_fn();
            assert_eq!(entry.tx_size(), tx_size);
            let expected = if !tx_size.is_cfl_allowed() {
                SubtractAverageRoute::Invalid
            } else if tx_size.width() == 4 || active_backend() == CflBackend::Scalar {
                SubtractAverageRoute::Scalar
            } else {
                SubtractAverageRoute::Vector
            };
            assert_eq!(entry.route(), expected, "{}", tx_size);
            assert_eq!(entry.geometry().is_some(), tx_size.is_cfl_allowed());
        }
    }

    #[test]
    fn test_invalid_sizes_leave_buffer_untouched() {
        for tx_size in [
            TxSize::Tx64x64,
            TxSize::Tx32x64,
            TxSize::Tx64x32,
            TxSize::Tx16x64,
            TxSize::Tx64x16,
        ] {
            let src = random_buffer();
            let mut buf = src.clone();
            assert_eq!(
                tx_size.subtract_average_fn().execute(&mut buf),
                Err(CflError::InvalidTransformSize(tx_size))
            );
            assert_eq!(buf, src);
        }
    }

    #[test]
    fn test_dispatch_matches_scalar() {
        for tx_size in TxSize::ALL.into_iter().filter(|t| t.is_cfl_allowed()) {
            let geometry = tx_size.cfl_geometry().unwrap();
            let src = random_buffer();
            let mut dispatched = src.clone();
            let mut scalar = src;
            tx_size.subtract_average_fn().execute(&mut dispatched).unwrap();
            subtract_average_scalar(
                &mut scalar,
                geometry.width,
                geometry.height,
                geometry.round_offset,
                geometry.num_pel_log2,
            )
            .unwrap();
            assert_eq!(dispatched, scalar, "{}", tx_size);
        }
    }

    #[test]
    fn test_constant_8x8_through_table() {
        let mut buf = vec![0i16; CFL_BUF_SQUARE];
        for row in buf.chunks_mut(CFL_BUF_LINE).take(8) {
            row[..8].fill(100);
        }
        get_subtract_average_fn(TxSize::Tx8x8 as i32)
            .execute(&mut buf)
            .unwrap();
        assert!(buf.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_short_buffer_rejected() {
        let mut buf = vec![0i16; 40];
        assert!(matches!(
            TxSize::Tx8x8.subtract_average_fn().execute(&mut buf),
            Err(CflError::BufferSizeMismatch(_))
        ));
    }

    #[test]
    fn test_blocks_batch() {
        let mut blocks: Vec<CflPredictionBuffer> = (0..16)
            .map(|_| CflPredictionBuffer::from_slice(&random_buffer()).unwrap())
            .collect();
        let expected: Vec<Vec<i16>> = blocks
            .iter()
            .map(|b| {
                let mut data = b.as_slice().to_vec();
                subtract_average_scalar(&mut data, 16, 8, 64, 7).unwrap();
                data
            })
            .collect();
        subtract_average_blocks(&mut blocks, TxSize::Tx16x8).unwrap();
        for (block, expected) in blocks.iter().zip(expected.iter()) {
            assert_eq!(block.as_slice(), expected.as_slice());
        }
        assert_eq!(
            subtract_average_blocks(&mut blocks, TxSize::Tx64x64),
            Err(CflError::InvalidTransformSize(TxSize::Tx64x64))
        );
    }

    #[test]
    fn test_blocks_batch_narrow_and_empty() {
        let samples: Vec<i16> = (0..64).map(|v| v * 3).collect();
        let mut blocks = vec![
            CflPredictionBuffer::from_block(4, 16, &samples).unwrap(),
            CflPredictionBuffer::from_block(4, 16, &samples).unwrap(),
        ];
        subtract_average_blocks(&mut blocks, TxSize::Tx4x16).unwrap();
        for block in blocks.iter() {
            assert_eq!(block.block_sum(4, 16), Ok(-32));
        }
        let mut empty: Vec<CflPredictionBuffer> = Vec::new();
        assert!(subtract_average_blocks(&mut empty, TxSize::Tx32x32).is_ok());
    }

    #[test]
    fn test_vector_route_requires_vector_unit() {
        for tx_size in TxSize::ALL.into_iter().filter(|t| t.width() >= 8) {
            let route = tx_size.subtract_average_fn().route();
            if active_backend() == CflBackend::Scalar {
                assert_ne!(route, SubtractAverageRoute::Vector, "{}", tx_size);
            } else if tx_size.is_cfl_allowed() {
                assert_eq!(route, SubtractAverageRoute::Vector, "{}", tx_size);
            }
        }
    }
}
