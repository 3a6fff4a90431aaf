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
use crate::cfl_support::{CflBlock, CFL_BUF_LINE};
use crate::sse::{_mm_average_epi16, _mm_hsum_bcast_epi32, _mm_sum4s_epi16};
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Subtracts the rounded block average from a `width`x`height` block stored at
/// [CFL_BUF_LINE] stride.
///
/// # Safety
///
/// CPU must support SSE4.1. `width` must be a multiple of 8 and `height` even.
#[target_feature(enable = "sse4.1")]
pub(crate) unsafe fn sse_subtract_average(
    pred_buf: &mut [i16],
    width: usize,
    height: usize,
    round_offset: i32,
    num_pel_log2: u32,
) {
    sse_subtract_average_impl(pred_buf, width, height, round_offset, num_pel_log2);
}

/// Same as [sse_subtract_average] with block size and rounding fixed at compile time.
///
/// # Safety
///
/// CPU must support SSE4.1.
#[target_feature(enable = "sse4.1")]
pub(crate) unsafe fn sse_subtract_average_wxh<const W: usize, const H: usize>(
    pred_buf: &mut [i16],
) {
    sse_subtract_average_impl(
        pred_buf,
        W,
        H,
        CflBlock::<W, H>::ROUND_OFFSET,
        CflBlock::<W, H>::NUM_PEL_LOG2,
    );
}

#[inline(always)]
unsafe fn sse_subtract_average_impl(
    pred_buf: &mut [i16],
    width: usize,
    height: usize,
    round_offset: i32,
    num_pel_log2: u32,
) {
    let mut sum0 = _mm_setr_epi32(0, 0, 0, round_offset);
    let mut sum1 = _mm_setzero_si128();

    for rows in pred_buf.chunks(CFL_BUF_LINE * 2).take(height / 2) {
        let row0 = &rows[..width];
        let row1 = &rows[CFL_BUF_LINE..CFL_BUF_LINE + width];
        for (src0, src1) in row0.chunks_exact(8).zip(row1.chunks_exact(8)) {
            let v0 = _mm_loadu_si128(src0.as_ptr() as *const __m128i);
            let v1 = _mm_loadu_si128(src1.as_ptr() as *const __m128i);
            sum0 = _mm_sum4s_epi16(sum0, v0);
            sum1 = _mm_sum4s_epi16(sum1, v1);
        }
    }

    let sum = _mm_hsum_bcast_epi32(_mm_add_epi32(sum0, sum1));
    let v_avg = _mm_average_epi16(sum, num_pel_log2);

    for rows in pred_buf.chunks_mut(CFL_BUF_LINE * 2).take(height / 2) {
        let (row0, row1) = rows.split_at_mut(CFL_BUF_LINE);
        for dst in row0[..width]
            .chunks_exact_mut(8)
            .chain(row1[..width].chunks_exact_mut(8))
        {
            let v = _mm_loadu_si128(dst.as_ptr() as *const __m128i);
            _mm_storeu_si128(dst.as_mut_ptr() as *mut __m128i, _mm_sub_epi16(v, v_avg));
        }
    }
}
