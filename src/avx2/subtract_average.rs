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
use crate::avx2::avx2_utils::{
    _mm256_average_epi16, _mm256_hsum_bcast_epi32, _mm256_load2_epi16, _mm256_sum8s_epi16,
};
use crate::cfl_support::{CflBlock, CFL_BUF_LINE};
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Subtracts the rounded block average from a `width`x`height` block stored at
/// [CFL_BUF_LINE] stride.
///
/// # Safety
///
/// CPU must support AVX2. `width` must be 8, 16 or 32, `height` a multiple of 4.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn avx2_subtract_average(
    pred_buf: &mut [i16],
    width: usize,
    height: usize,
    round_offset: i32,
    num_pel_log2: u32,
) {
    avx2_subtract_average_impl(pred_buf, width, height, round_offset, num_pel_log2);
}

/// Same as [avx2_subtract_average] with block size and rounding fixed at compile time.
///
/// # Safety
///
/// CPU must support AVX2.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn avx2_subtract_average_wxh<const W: usize, const H: usize>(
    pred_buf: &mut [i16],
) {
    avx2_subtract_average_impl(
        pred_buf,
        W,
        H,
        CflBlock::<W, H>::ROUND_OFFSET,
        CflBlock::<W, H>::NUM_PEL_LOG2,
    );
}

#[inline(always)]
unsafe fn avx2_subtract_average_impl(
    pred_buf: &mut [i16],
    width: usize,
    height: usize,
    round_offset: i32,
    num_pel_log2: u32,
) {
    let mut sum0 = _mm256_setr_epi32(0, 0, 0, round_offset, 0, 0, 0, 0);
    let mut sum1 = _mm256_setzero_si256();

    if width == 8 {
        // Two rows share one register, four rows per step.
        for rows in pred_buf.chunks(CFL_BUF_LINE * 4).take(height / 4) {
            let v0 = _mm256_load2_epi16(&rows[..], &rows[CFL_BUF_LINE..]);
            let v1 = _mm256_load2_epi16(&rows[CFL_BUF_LINE * 2..], &rows[CFL_BUF_LINE * 3..]);
            sum0 = _mm256_sum8s_epi16(sum0, v0);
            sum1 = _mm256_sum8s_epi16(sum1, v1);
        }
    } else {
        for rows in pred_buf.chunks(CFL_BUF_LINE * 2).take(height / 2) {
            let row0 = &rows[..width];
            let row1 = &rows[CFL_BUF_LINE..CFL_BUF_LINE + width];
            for (src0, src1) in row0.chunks_exact(16).zip(row1.chunks_exact(16)) {
                let v0 = _mm256_loadu_si256(src0.as_ptr() as *const __m256i);
                let v1 = _mm256_loadu_si256(src1.as_ptr() as *const __m256i);
                sum0 = _mm256_sum8s_epi16(sum0, v0);
                sum1 = _mm256_sum8s_epi16(sum1, v1);
            }
        }
    }

    let sum = _mm256_hsum_bcast_epi32(_mm256_add_epi32(sum0, sum1));
    let v_avg = _mm256_average_epi16(sum, num_pel_log2);

    if width == 8 {
        let v_avg = _mm256_castsi256_si128(v_avg);
        for row in pred_buf.chunks_mut(CFL_BUF_LINE).take(height) {
            let dst = &mut row[..8];
            let v = _mm_loadu_si128(dst.as_ptr() as *const __m128i);
            _mm_storeu_si128(dst.as_mut_ptr() as *mut __m128i, _mm_sub_epi16(v, v_avg));
        }
    } else {
        for rows in pred_buf.chunks_mut(CFL_BUF_LINE * 2).take(height / 2) {
            let (row0, row1) = rows.split_at_mut(CFL_BUF_LINE);
            for dst in row0[..width]
                .chunks_exact_mut(16)
                .chain(row1[..width].chunks_exact_mut(16))
            {
                let v = _mm256_loadu_si256(dst.as_ptr() as *const __m256i);
                _mm256_storeu_si256(
                    dst.as_mut_ptr() as *mut __m256i,
                    _mm256_sub_epi16(v, v_avg),
                );
            }
        }
    }
}
