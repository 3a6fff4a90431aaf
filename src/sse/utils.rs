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

/// Widens 8 signed 16 bit lanes pairwise into 4 lanes of 32 bit and adds them to `acc`.
#[inline(always)]
pub(crate) unsafe fn _mm_sum4s_epi16(acc: __m128i, v: __m128i) -> __m128i {
    _mm_add_epi32(acc, _mm_madd_epi16(v, _mm_set1_epi16(1)))
}

/// Horizontal sum of 4 lanes of 32 bit, the total ends up in every lane.
#[inline(always)]
pub(crate) unsafe fn _mm_hsum_bcast_epi32(v: __m128i) -> __m128i {
    // swap halves
    let perm_64 = _mm_shuffle_epi32::<0b0100_1110>(v);
    let v = _mm_add_epi32(v, perm_64);
    // swap quarters
    let perm_32 = _mm_shuffle_epi32::<0b1011_0001>(v);
    _mm_add_epi32(v, perm_32)
}

/// Shifts a broadcast 32 bit sum into the average and narrows it to every 16 bit lane.
///
/// Narrowing truncates, matching a plain `as i16` cast of the scalar average.
#[inline(always)]
pub(crate) unsafe fn _mm_average_epi16(sum: __m128i, num_pel_log2: u32) -> __m128i {
    let avg = _mm_sra_epi32(sum, _mm_cvtsi32_si128(num_pel_log2 as i32));
    _mm_blend_epi16::<0b1010_1010>(avg, _mm_slli_epi32::<16>(avg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsum_broadcasts_total() {
        if !std::arch::is_x86_feature_detected!("sse4.1") {
            return;
        }
        unsafe {
            let v = _mm_setr_epi32(1, 20, 300, 4000);
            let mut rs: [i32; 4] = [0; 4];
            _mm_storeu_si128(rs.as_mut_ptr() as *mut __m128i, _mm_hsum_bcast_epi32(v));
            assert_eq!(rs, [4321; 4]);
        }
    }

    #[test]
    fn test_sum4s_widens_without_saturation() {
        if !std::arch::is_x86_feature_detected!("sse4.1") {
            return;
        }
        unsafe {
            let v = _mm_set1_epi16(i16::MAX);
            let acc = _mm_sum4s_epi16(_mm_setzero_si128(), v);
            let mut rs: [i32; 4] = [0; 4];
            _mm_storeu_si128(rs.as_mut_ptr() as *mut __m128i, acc);
            assert_eq!(rs, [2 * i16::MAX as i32; 4]);
        }
    }

    #[test]
    fn test_average_narrows_to_all_lanes() {
        if !std::arch::is_x86_feature_detected!("sse4.1") {
            return;
        }
        unsafe {
            let sum = _mm_set1_epi32(64 * -37 + 32);
            let avg = _mm_average_epi16(sum, 6);
            let mut rs: [i16; 8] = [0; 8];
            _mm_storeu_si128(rs.as_mut_ptr() as *mut __m128i, avg);
            assert_eq!(rs, [-37; 8]);
        }
    }
}
