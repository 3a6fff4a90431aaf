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
use crate::neon::utils::{vaverageq_s16, vhsumq_bcast_s32};
use std::arch::aarch64::*;

/// Subtracts the rounded block average from a `width`x`height` block stored at
/// [CFL_BUF_LINE] stride.
///
/// # Safety
///
/// `width` must be a multiple of 8 and `height` even.
pub(crate) unsafe fn neon_subtract_average(
    pred_buf: &mut [i16],
    width: usize,
    height: usize,
    round_offset: i32,
    num_pel_log2: u32,
) {
    neon_subtract_average_impl(pred_buf, width, height, round_offset, num_pel_log2);
}

pub(crate) unsafe fn neon_subtract_average_wxh<const W: usize, const H: usize>(
    pred_buf: &mut [i16],
) {
    neon_subtract_average_impl(
        pred_buf,
        W,
        H,
        CflBlock::<W, H>::ROUND_OFFSET,
        CflBlock::<W, H>::NUM_PEL_LOG2,
    );
}

#[inline(always)]
unsafe fn neon_subtract_average_impl(
    pred_buf: &mut [i16],
    width: usize,
    height: usize,
    round_offset: i32,
    num_pel_log2: u32,
) {
    let mut sum0 = vsetq_lane_s32::<3>(round_offset, vdupq_n_s32(0));
    let mut sum1 = vdupq_n_s32(0);

    for rows in pred_buf.chunks(CFL_BUF_LINE * 2).take(height / 2) {
        let row0 = &rows[..width];
        let row1 = &rows[CFL_BUF_LINE..CFL_BUF_LINE + width];
        for (src0, src1) in row0.chunks_exact(8).zip(row1.chunks_exact(8)) {
            sum0 = vpadalq_s16(sum0, vld1q_s16(src0.as_ptr()));
            sum1 = vpadalq_s16(sum1, vld1q_s16(src1.as_ptr()));
        }
    }

    let sum = vhsumq_bcast_s32(vaddq_s32(sum0, sum1));
    let v_avg = vaverageq_s16(sum, num_pel_log2);

    for rows in pred_buf.chunks_mut(CFL_BUF_LINE * 2).take(height / 2) {
        let (row0, row1) = rows.split_at_mut(CFL_BUF_LINE);
        for dst in row0[..width]
            .chunks_exact_mut(8)
            .chain(row1[..width].chunks_exact_mut(8))
        {
            let v = vld1q_s16(dst.as_ptr());
            vst1q_s16(dst.as_mut_ptr(), vsubq_s16(v, v_avg));
        }
    }
}
