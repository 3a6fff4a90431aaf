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
use std::arch::wasm32::*;

#[inline(always)]
unsafe fn wasm_hsum_bcast_i32x4(v: v128) -> v128 {
    // swap halves
    let perm_64 = i32x4_shuffle::<2, 3, 0, 1>(v, v);
    let v = i32x4_add(v, perm_64);
    // swap quarters
    let perm_32 = i32x4_shuffle::<1, 0, 3, 2>(v, v);
    i32x4_add(v, perm_32)
}

#[inline(always)]
unsafe fn wasm_average_i16x8(sum: v128, num_pel_log2: u32) -> v128 {
    let avg = i32x4_shr(sum, num_pel_log2);
    // low halves of each 32 bit lane, truncating narrow
    i16x8_shuffle::<0, 2, 4, 6, 0, 2, 4, 6>(avg, avg)
}

/// Subtracts the rounded block average from a `width`x`height` block stored at
/// [CFL_BUF_LINE] stride.
///
/// # Safety
///
/// `width` must be a multiple of 8 and `height` even.
pub(crate) unsafe fn wasm_subtract_average(
    pred_buf: &mut [i16],
    width: usize,
    height: usize,
    round_offset: i32,
    num_pel_log2: u32,
) {
    wasm_subtract_average_impl(pred_buf, width, height, round_offset, num_pel_log2);
}

pub(crate) unsafe fn wasm_subtract_average_wxh<const W: usize, const H: usize>(
    pred_buf: &mut [i16],
) {
    wasm_subtract_average_impl(
        pred_buf,
        W,
        H,
        CflBlock::<W, H>::ROUND_OFFSET,
        CflBlock::<W, H>::NUM_PEL_LOG2,
    );
}

#[inline(always)]
unsafe fn wasm_subtract_average_impl(
    pred_buf: &mut [i16],
    width: usize,
    height: usize,
    round_offset: i32,
    num_pel_log2: u32,
) {
    let mut sum0 = i32x4(0, 0, 0, round_offset);
    let mut sum1 = i32x4_splat(0);

    for rows in pred_buf.chunks(CFL_BUF_LINE * 2).take(height / 2) {
        let row0 = &rows[..width];
        let row1 = &rows[CFL_BUF_LINE..CFL_BUF_LINE + width];
        for (src0, src1) in row0.chunks_exact(8).zip(row1.chunks_exact(8)) {
            let v0 = v128_load(src0.as_ptr() as *const v128);
            let v1 = v128_load(src1.as_ptr() as *const v128);
            sum0 = i32x4_add(sum0, i32x4_extadd_pairwise_i16x8(v0));
            sum1 = i32x4_add(sum1, i32x4_extadd_pairwise_i16x8(v1));
        }
    }

    let sum = wasm_hsum_bcast_i32x4(i32x4_add(sum0, sum1));
    let v_avg = wasm_average_i16x8(sum, num_pel_log2);

    for rows in pred_buf.chunks_mut(CFL_BUF_LINE * 2).take(height / 2) {
        let (row0, row1) = rows.split_at_mut(CFL_BUF_LINE);
        for dst in row0[..width]
            .chunks_exact_mut(8)
            .chain(row1[..width].chunks_exact_mut(8))
        {
            let v = v128_load(dst.as_ptr() as *const v128);
            v128_store(dst.as_mut_ptr() as *mut v128, i16x8_sub(v, v_avg));
        }
    }
}
