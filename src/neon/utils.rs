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
use std::arch::aarch64::*;

/// Horizontal sum of 4 lanes of 32 bit, the total ends up in every lane.
#[inline(always)]
pub(crate) unsafe fn vhsumq_bcast_s32(v: int32x4_t) -> int32x4_t {
    // swap halves
    let perm_64 = vextq_s32::<2>(v, v);
    let v = vaddq_s32(v, perm_64);
    // swap quarters
    let perm_32 = vrev64q_s32(v);
    vaddq_s32(v, perm_32)
}

/// Arithmetic shift of the broadcast sum, narrowed with truncation to 8 lanes of 16 bit.
#[inline(always)]
pub(crate) unsafe fn vaverageq_s16(sum: int32x4_t, num_pel_log2: u32) -> int16x8_t {
    let avg = vshlq_s32(sum, vdupq_n_s32(-(num_pel_log2 as i32)));
    let avg = vmovn_s32(avg);
    vcombine_s16(avg, avg)
}
