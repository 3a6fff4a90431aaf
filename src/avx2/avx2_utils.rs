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
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Widens 16 signed 16 bit lanes pairwise into 8 lanes of 32 bit and adds them to `acc`.
#[inline(always)]
pub(crate) unsafe fn _mm256_sum8s_epi16(acc: __m256i, v: __m256i) -> __m256i {
    _mm256_add_epi32(acc, _mm256_madd_epi16(v, _mm256_set1_epi16(1)))
}

/// Loads 8 samples from `lo` into the low half and 8 from `hi` into the high half.
#[inline(always)]
pub(crate) unsafe fn _mm256_load2_epi16(lo: &[i16], hi: &[i16]) -> __m256i {
    let lo = _mm_loadu_si128(lo[..8].as_ptr() as *const __m128i);
    let hi = _mm_loadu_si128(hi[..8].as_ptr() as *const __m128i);
    _mm256_inserti128_si256::<1>(_mm256_castsi128_si256(lo), hi)
}

/// Horizontal sum of 8 lanes of 32 bit, the total ends up in every lane of the result.
#[inline(always)]
pub(crate) unsafe fn _mm256_hsum_bcast_epi32(v: __m256i) -> __m128i {
    let lo = _mm256_castsi256_si128(v);
    let hi = _mm256_extracti128_si256::<1>(v);
    let v = _mm_add_epi32(lo, hi);
    // swap halves
    let perm_64 = _mm_shuffle_epi32::<0b0100_1110>(v);
    let v = _mm_add_epi32(v, perm_64);
    // swap quarters
    let perm_32 = _mm_shuffle_epi32::<0b1011_0001>(v);
    _mm_add_epi32(v, perm_32)
}

/// Shifts a broadcast 32 bit sum into the average, narrowed with truncation into
/// every 16 bit lane.
#[inline(always)]
pub(crate) unsafe fn _mm256_average_epi16(sum: __m128i, num_pel_log2: u32) -> __m256i {
    let avg = _mm_sra_epi32(sum, _mm_cvtsi32_si128(num_pel_log2 as i32));
    let avg = _mm_blend_epi16::<0b1010_1010>(avg, _mm_slli_epi32::<16>(avg));
    _mm256_broadcastsi128_si256(avg)
}
