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
use std::fmt::{Display, Formatter};

/// Row stride of every CfL prediction buffer, equal to the widest supported block.
pub const CFL_BUF_LINE: usize = 32;
/// Total number of samples in a full CfL prediction buffer.
pub const CFL_BUF_SQUARE: usize = CFL_BUF_LINE * CFL_BUF_LINE;

/// Number of transform size identifiers, valid for CfL or not.
pub const TX_SIZES_ALL: usize = 19;

#[repr(u8)]
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
/// Transform block size, in the order the AV1 bitstream enumerates them.
pub enum TxSize {
    Tx4x4 = 0,
    Tx8x8 = 1,
    Tx16x16 = 2,
    Tx32x32 = 3,
    /// Not valid for CfL
    Tx64x64 = 4,
    Tx4x8 = 5,
    Tx8x4 = 6,
    Tx8x16 = 7,
    Tx16x8 = 8,
    Tx16x32 = 9,
    Tx32x16 = 10,
    /// Not valid for CfL
    Tx32x64 = 11,
    /// Not valid for CfL
    Tx64x32 = 12,
    Tx4x16 = 13,
    Tx16x4 = 14,
    Tx8x32 = 15,
    Tx32x8 = 16,
    /// Not valid for CfL
    Tx16x64 = 17,
    /// Not valid for CfL
    Tx64x16 = 18,
}

impl TxSize {
    /// Every transform size, indexed by its identifier.
    pub const ALL: [TxSize; TX_SIZES_ALL] = [
        TxSize::Tx4x4,
        TxSize::Tx8x8,
        TxSize::Tx16x16,
        TxSize::Tx32x32,
        TxSize::Tx64x64,
        TxSize::Tx4x8,
        TxSize::Tx8x4,
        TxSize::Tx8x16,
        TxSize::Tx16x8,
        TxSize::Tx16x32,
        TxSize::Tx32x16,
        TxSize::Tx32x64,
        TxSize::Tx64x32,
        TxSize::Tx4x16,
        TxSize::Tx16x4,
        TxSize::Tx8x32,
        TxSize::Tx32x8,
        TxSize::Tx16x64,
        TxSize::Tx64x16,
    ];

    /// Maps any identifier onto a transform size.
    ///
    /// The identifier is reduced modulo [TX_SIZES_ALL] first, so negative or
    /// out of range values still land on a table entry.
    #[inline]
    pub const fn from_id_wrapping(id: i32) -> TxSize {
        let index = id.rem_euclid(TX_SIZES_ALL as i32) as usize;
        TxSize::ALL[index]
    }

    #[inline]
    pub const fn width(self) -> usize {
        match self {
            TxSize::Tx4x4 | TxSize::Tx4x8 | TxSize::Tx4x16 => 4,
            TxSize::Tx8x8 | TxSize::Tx8x4 | TxSize::Tx8x16 | TxSize::Tx8x32 => 8,
            TxSize::Tx16x16
            | TxSize::Tx16x8
            | TxSize::Tx16x32
            | TxSize::Tx16x4
            | TxSize::Tx16x64 => 16,
            TxSize::Tx32x32
            | TxSize::Tx32x16
            | TxSize::Tx32x64
            | TxSize::Tx32x8 => 32,
            TxSize::Tx64x64 | TxSize::Tx64x32 | TxSize::Tx64x16 => 64,
        }
    }

    #[inline]
    pub const fn height(self) -> usize {
        match self {
            TxSize::Tx4x4 | TxSize::Tx8x4 | TxSize::Tx16x4 => 4,
            TxSize::Tx8x8 | TxSize::Tx4x8 | TxSize::Tx16x8 | TxSize::Tx32x8 => 8,
            TxSize::Tx16x16
            | TxSize::Tx8x16
            | TxSize::Tx32x16
            | TxSize::Tx4x16
            | TxSize::Tx64x16 => 16,
            TxSize::Tx32x32
            | TxSize::Tx16x32
            | TxSize::Tx64x32
            | TxSize::Tx8x32 => 32,
            TxSize::Tx64x64 | TxSize::Tx32x64 | TxSize::Tx16x64 => 64,
        }
    }

    /// Returns `true` when chroma-from-luma may be used with this transform size.
    #[inline]
    pub const fn is_cfl_allowed(self) -> bool {
        self.width() <= CFL_BUF_LINE && self.height() <= CFL_BUF_LINE
    }

    /// Rounding parameters of this size, `None` for sizes CfL never uses.
    #[inline]
    pub const fn cfl_geometry(self) -> Option<CflGeometry> {
        if self.is_cfl_allowed() {
            Some(CflGeometry::new(self.width(), self.height()))
        } else {
            None
        }
    }
}

impl From<TxSize> for i32 {
    #[inline]
    fn from(value: TxSize) -> Self {
        value as i32
    }
}

impl Display for TxSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}x{}", self.width(), self.height()))
    }
}

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
/// Block geometry together with the constants needed to average it.
///
/// `round_offset` is half the pixel count, so `(sum + round_offset) >> num_pel_log2`
/// rounds the mean half up.
pub struct CflGeometry {
    pub width: usize,
    pub height: usize,
    pub num_pel_log2: u32,
    pub round_offset: i32,
}

impl CflGeometry {
    /// `width` and `height` must be powers of two, use [TxSize::cfl_geometry] for sizes
    /// coming from a bitstream.
    #[inline]
    pub const fn new(width: usize, height: usize) -> CflGeometry {
        let num_pel = width * height;
        debug_assert!(num_pel.is_power_of_two());
        CflGeometry {
            width,
            height,
            num_pel_log2: num_pel.trailing_zeros(),
            round_offset: (num_pel / 2) as i32,
        }
    }

    #[inline]
    pub const fn num_pel(&self) -> usize {
        self.width * self.height
    }

    /// Smallest slice that covers the block at [CFL_BUF_LINE] stride.
    #[inline]
    pub const fn min_buffer_len(&self) -> usize {
        min_buffer_len(self.width, self.height)
    }
}

#[inline]
pub(crate) const fn min_buffer_len(width: usize, height: usize) -> usize {
    if width == 0 || height == 0 {
        return 0;
    }
    (height - 1) * CFL_BUF_LINE + width
}

/// Compile time rounding parameters of a `W`x`H` block.
pub(crate) struct CflBlock<const W: usize, const H: usize>;

impl<const W: usize, const H: usize> CflBlock<W, H> {
    pub(crate) const GEOMETRY: CflGeometry = CflGeometry::new(W, H);
    pub(crate) const NUM_PEL_LOG2: u32 = Self::GEOMETRY.num_pel_log2;
    pub(crate) const ROUND_OFFSET: i32 = Self::GEOMETRY.round_offset;
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
/// Instruction set the vector kernels run on.
pub enum CflBackend {
    Avx2,
    Sse41,
    Neon,
    Wasm32,
    /// No vector unit available, every block goes through the scalar routine
    Scalar,
}

impl Display for CflBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CflBackend::Avx2 => f.write_str("AVX2"),
            CflBackend::Sse41 => f.write_str("SSE4.1"),
            CflBackend::Neon => f.write_str("NEON"),
            CflBackend::Wasm32 => f.write_str("WASM SIMD128"),
            CflBackend::Scalar => f.write_str("Scalar"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_size_ids_match_table_order() {
        for (index, tx_size) in TxSize::ALL.iter().enumerate() {
            assert_eq!(*tx_size as usize, index);
            assert_eq!(TxSize::from_id_wrapping(index as i32), *tx_size);
        }
    }

    #[test]
    fn test_wrapping_ids_stay_in_table() {
        assert_eq!(TxSize::from_id_wrapping(19), TxSize::Tx4x4);
        assert_eq!(TxSize::from_id_wrapping(20), TxSize::Tx8x8);
        assert_eq!(TxSize::from_id_wrapping(-1), TxSize::Tx64x16);
        assert_eq!(
            TxSize::from_id_wrapping(i32::MIN),
            TxSize::ALL[i32::MIN.rem_euclid(19) as usize]
        );
        assert_eq!(
            TxSize::from_id_wrapping(i32::MAX),
            TxSize::ALL[(i32::MAX % 19) as usize]
        );
    }

    #[test]
    fn test_invalid_cfl_sizes() {
        let invalid = [
            TxSize::Tx64x64,
            TxSize::Tx32x64,
            TxSize::Tx64x32,
            TxSize::Tx16x64,
            TxSize::Tx64x16,
        ];
        for tx_size in TxSize::ALL {
            assert_eq!(tx_size.is_cfl_allowed(), !invalid.contains(&tx_size));
            assert_eq!(tx_size.cfl_geometry().is_some(), tx_size.is_cfl_allowed());
        }
    }

    #[test]
    fn test_geometry_constants() {
        let g = CflGeometry::new(8, 4);
        assert_eq!(g.num_pel(), 32);
        assert_eq!(g.num_pel_log2, 5);
        assert_eq!(g.round_offset, 16);

        let g = CflGeometry::new(32, 32);
        assert_eq!(g.num_pel_log2, 10);
        assert_eq!(g.round_offset, 512);
        assert_eq!(g.min_buffer_len(), CFL_BUF_SQUARE);

        assert_eq!(CflBlock::<16, 8>::NUM_PEL_LOG2, 7);
        assert_eq!(CflBlock::<16, 8>::ROUND_OFFSET, 64);
        assert_eq!(CflGeometry::new(4, 16).min_buffer_len(), 15 * 32 + 4);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_geometry_rejects_non_power_of_two() {
        let width = std::hint::black_box(12);
        let _ = CflGeometry::new(width, 8);
    }
}
