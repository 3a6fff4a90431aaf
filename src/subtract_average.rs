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
use crate::cfl_error::{check_average_shift, check_cfl_buffer, check_cfl_geometry};
use crate::cfl_support::{CflBackend, CflBlock, CFL_BUF_LINE};
use crate::CflError;
use std::sync::OnceLock;

/// Subtract average routine with block size fixed at compile time.
pub(crate) type SubtractAverageHandler = unsafe fn(pred_buf: &mut [i16]);

type GenericSubtractAverageHandler = unsafe fn(
    pred_buf: &mut [i16],
    width: usize,
    height: usize,
    round_offset: i32,
    num_pel_log2: u32,
);

#[inline(always)]
fn subtract_average_impl(
    pred_buf: &mut [i16],
    width: usize,
    height: usize,
    round_offset: i32,
    num_pel_log2: u32,
) {
    let mut sum = round_offset;
    for row in pred_buf.chunks(CFL_BUF_LINE).take(height) {
        for &v in row[..width].iter() {
            sum = sum.wrapping_add(v as i32);
        }
    }

    let avg = sum >> num_pel_log2;

    for row in pred_buf.chunks_mut(CFL_BUF_LINE).take(height) {
        for v in row[..width].iter_mut() {
            *v = (*v as i32).wrapping_sub(avg) as i16;
        }
    }
}

unsafe fn subtract_average_generic_scalar(
    pred_buf: &mut [i16],
    width: usize,
    height: usize,
    round_offset: i32,
    num_pel_log2: u32,
) {
    subtract_average_impl(pred_buf, width, height, round_offset, num_pel_log2);
}

pub(crate) fn subtract_average_scalar_wxh<const W: usize, const H: usize>(pred_buf: &mut [i16]) {
    subtract_average_impl(
        pred_buf,
        W,
        H,
        CflBlock::<W, H>::ROUND_OFFSET,
        CflBlock::<W, H>::NUM_PEL_LOG2,
    );
}

static BACKEND: OnceLock<CflBackend> = OnceLock::new();

fn detect_backend() -> CflBackend {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        #[cfg(feature = "avx")]
        {
            if std::arch::is_x86_feature_detected!("avx2") {
                return CflBackend::Avx2;
            }
        }
        #[cfg(feature = "sse")]
        {
            if std::arch::is_x86_feature_detected!("sse4.1") {
                return CflBackend::Sse41;
            }
        }
    }
    #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
    {
        return CflBackend::Neon;
    }
    #[cfg(all(target_arch = "wasm32", target_feature = "simd128"))]
    {
        return CflBackend::Wasm32;
    }
    #[cfg(not(any(
        all(target_arch = "aarch64", target_feature = "neon"),
        all(target_arch = "wasm32", target_feature = "simd128")
    )))]
    CflBackend::Scalar
}

/// Instruction set used by the vector subtract average kernels on this machine.
///
/// Detected once, on first use.
pub fn active_backend() -> CflBackend {
    *BACKEND.get_or_init(|| {
        let backend = detect_backend();
        log::debug!("CfL subtract average backend: {}", backend);
        backend
    })
}

fn make_generic_handler() -> GenericSubtractAverageHandler {
    match active_backend() {
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "avx"))]
        CflBackend::Avx2 => {
            use crate::avx2::avx2_subtract_average;
            avx2_subtract_average
        }
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        CflBackend::Sse41 => {
            use crate::sse::sse_subtract_average;
            sse_subtract_average
        }
        #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
        CflBackend::Neon => {
            use crate::neon::neon_subtract_average;
            neon_subtract_average
        }
        #[cfg(all(target_arch = "wasm32", target_feature = "simd128"))]
        CflBackend::Wasm32 => {
            use crate::wasm32::wasm_subtract_average;
            wasm_subtract_average
        }
        _ => subtract_average_generic_scalar,
    }
}

/// Picks the vector kernel specialized for a `W`x`H` block, `None` when no vector unit is
/// available. `W` must be at least 8.
pub(crate) fn make_vector_handler<const W: usize, const H: usize>(
) -> Option<SubtractAverageHandler> {
    match active_backend() {
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "avx"))]
        CflBackend::Avx2 => {
            use crate::avx2::avx2_subtract_average_wxh;
            let handler: SubtractAverageHandler = avx2_subtract_average_wxh::<W, H>;
            Some(handler)
        }
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        CflBackend::Sse41 => {
            use crate::sse::sse_subtract_average_wxh;
            let handler: SubtractAverageHandler = sse_subtract_average_wxh::<W, H>;
            Some(handler)
        }
        #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
        CflBackend::Neon => {
            use crate::neon::neon_subtract_average_wxh;
            let handler: SubtractAverageHandler = neon_subtract_average_wxh::<W, H>;
            Some(handler)
        }
        #[cfg(all(target_arch = "wasm32", target_feature = "simd128"))]
        CflBackend::Wasm32 => {
            use crate::wasm32::wasm_subtract_average_wxh;
            let handler: SubtractAverageHandler = wasm_subtract_average_wxh::<W, H>;
            Some(handler)
        }
        _ => None,
    }
}

/// Subtracts the rounded average from every sample of a prediction block, in place.
///
/// The block is `width`x`height` samples stored at [CFL_BUF_LINE] stride. The average is
/// `(sum + round_offset) >> num_pel_log2`; with `round_offset` equal to half the pixel
/// count this rounds half up. Widths of 8 and more run on the detected vector backend,
/// width 4 always uses the scalar routine. Results are bit identical to
/// [subtract_average_scalar].
///
/// # Arguments
///
/// * `pred_buf` - Prediction buffer, at least `(height - 1) * CFL_BUF_LINE + width` samples.
/// * `width` - Block width, one of 4, 8, 16, 32.
/// * `height` - Block height, one of 4, 8, 16, 32.
/// * `round_offset` - Added to the sum before shifting.
/// * `num_pel_log2` - Base 2 logarithm of the pixel count.
///
/// # Errors
///
/// Returns an error if geometry is not supported, the buffer is too small, or the shift
/// does not fit 32 bits. The buffer is untouched in that case.
pub fn subtract_average(
    pred_buf: &mut [i16],
    width: usize,
    height: usize,
    round_offset: i32,
    num_pel_log2: u32,
) -> Result<(), CflError> {
    check_cfl_geometry(width, height)?;
    check_cfl_buffer(pred_buf, width, height)?;
    check_average_shift(num_pel_log2)?;

    if width < 8 {
        subtract_average_impl(pred_buf, width, height, round_offset, num_pel_log2);
        return Ok(());
    }

    let executor = make_generic_handler();
    unsafe {
        executor(pred_buf, width, height, round_offset, num_pel_log2);
    }
    Ok(())
}

/// Portable scalar reference of [subtract_average].
///
/// Accepts and rejects exactly the same inputs.
pub fn subtract_average_scalar(
    pred_buf: &mut [i16],
    width: usize,
    height: usize,
    round_offset: i32,
    num_pel_log2: u32,
) -> Result<(), CflError> {
    check_cfl_geometry(width, height)?;
    check_cfl_buffer(pred_buf, width, height)?;
    check_average_shift(num_pel_log2)?;
    subtract_average_impl(pred_buf, width, height, round_offset, num_pel_log2);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CflGeometry, CFL_BUF_SQUARE};
    use rand::Rng;

    const SIZES: [usize; 4] = [4, 8, 16, 32];
    const MAX_SAMPLE: i16 = 4095 << 3;

    fn random_buffer() -> Vec<i16> {
        let mut rng = rand::rng();
        (0..CFL_BUF_SQUARE)
            .map(|_| rng.random_range(0..=MAX_SAMPLE))
            .collect()
    }

    fn block_sum(buf: &[i16], width: usize, height: usize) -> i64 {
        buf.chunks(CFL_BUF_LINE)
            .take(height)
            .flat_map(|row| row[..width].iter())
            .map(|&v| v as i64)
            .sum()
    }

    #[test]
    fn test_constant_8x8_becomes_zero() {
        let mut buf = vec![0i16; CFL_BUF_SQUARE];
        for row in buf.chunks_mut(CFL_BUF_LINE).take(8) {
            row[..8].fill(100);
        }
        subtract_average(&mut buf, 8, 8, 32, 6).unwrap();
        assert!(buf.iter().all(|&v| v == 0));
    }

    fn sequence_4x4() -> Vec<i16> {
        let mut buf = vec![0i16; CFL_BUF_SQUARE];
        for (y, row) in buf.chunks_mut(CFL_BUF_LINE).take(4).enumerate() {
            for (x, v) in row[..4].iter_mut().enumerate() {
                *v = (y * 4 + x + 1) as i16;
            }
        }
        buf
    }

    fn assert_4x4_sequence_minus(buf: &[i16], avg: i16) {
        for (y, row) in buf.chunks(CFL_BUF_LINE).take(4).enumerate() {
            for (x, &v) in row[..4].iter().enumerate() {
                assert_eq!(v, (y * 4 + x + 1) as i16 - avg);
            }
        }
    }

    #[test]
    fn test_4x4_sequence_truncated_average() {
        let mut buf = sequence_4x4();
        subtract_average(&mut buf, 4, 4, 0, 4).unwrap();
        assert_4x4_sequence_minus(&buf, 8);
    }

    #[test]
    fn test_4x4_sequence_rounds_half_up() {
        // 136 / 16 = 8.5
        let mut buf = sequence_4x4();
        let geometry = CflGeometry::new(4, 4);
        subtract_average(&mut buf, 4, 4, geometry.round_offset, geometry.num_pel_log2).unwrap();
        assert_4x4_sequence_minus(&buf, 9);
    }

    #[test]
    fn test_samples_outside_block_untouched() {
        let mut buf = vec![7i16; CFL_BUF_SQUARE];
        subtract_average(&mut buf, 16, 8, 64, 7).unwrap();
        for (y, row) in buf.chunks(CFL_BUF_LINE).enumerate() {
            for (x, &v) in row.iter().enumerate() {
                if y < 8 && x < 16 {
                    assert_eq!(v, 0);
                } else {
                    assert_eq!(v, 7);
                }
            }
        }
    }

    #[test]
    fn test_matches_scalar_all_geometries() {
        for &width in SIZES.iter() {
            for &height in SIZES.iter() {
                let geometry = CflGeometry::new(width, height);
                for _ in 0..8 {
                    let src = random_buffer();
                    let mut vector = src.clone();
                    let mut scalar = src.clone();
                    subtract_average(
                        &mut vector,
                        width,
                        height,
                        geometry.round_offset,
                        geometry.num_pel_log2,
                    )
                    .unwrap();
                    subtract_average_scalar(
                        &mut scalar,
                        width,
                        height,
                        geometry.round_offset,
                        geometry.num_pel_log2,
                    )
                    .unwrap();
                    assert_eq!(vector, scalar, "mismatch on {}x{}", width, height);

                    let original = block_sum(&src, width, height);
                    let avg = (original + geometry.round_offset as i64)
                        >> geometry.num_pel_log2;
                    assert_eq!(
                        block_sum(&vector, width, height),
                        original - avg * geometry.num_pel() as i64
                    );
                }
            }
        }
    }

    #[test]
    fn test_random_16x16_bit_exact() {
        let geometry = CflGeometry::new(16, 16);
        for _ in 0..50 {
            let src = random_buffer();
            let mut vector = src.clone();
            let mut scalar = src;
            let (round_offset, num_pel_log2) = (geometry.round_offset, geometry.num_pel_log2);
            subtract_average(&mut vector, 16, 16, round_offset, num_pel_log2).unwrap();
            subtract_average_scalar(&mut scalar, 16, 16, round_offset, num_pel_log2).unwrap();
            assert_eq!(vector, scalar);
        }
    }

    #[test]
    fn test_reapply_is_stable() {
        for &width in SIZES.iter() {
            for &height in SIZES.iter() {
                let geometry = CflGeometry::new(width, height);
                let (round_offset, num_pel_log2) = (geometry.round_offset, geometry.num_pel_log2);
                let mut buf = random_buffer();
                subtract_average(&mut buf, width, height, round_offset, num_pel_log2).unwrap();
                let first = buf.clone();
                subtract_average(&mut buf, width, height, round_offset, num_pel_log2).unwrap();
                for (a, b) in first.iter().zip(buf.iter()) {
                    assert!((*a as i32 - *b as i32).abs() <= 1);
                }
            }
        }
    }

    #[test]
    fn test_minimal_buffer_accepted() {
        let geometry = CflGeometry::new(32, 8);
        let mut src = random_buffer();
        src.truncate(geometry.min_buffer_len());
        let mut vector = src.clone();
        let mut scalar = src;
        subtract_average(&mut vector, 32, 8, geometry.round_offset, geometry.num_pel_log2).unwrap();
        subtract_average_scalar(&mut scalar, 32, 8, geometry.round_offset, geometry.num_pel_log2)
            .unwrap();
        assert_eq!(vector, scalar);
    }

    #[test]
    fn test_wrapping_matches_scalar_on_extreme_samples() {
        let mut rng = rand::rng();
        let src: Vec<i16> = (0..CFL_BUF_SQUARE).map(|_| rng.random()).collect();
        let mut vector = src.clone();
        let mut scalar = src;
        subtract_average(&mut vector, 32, 32, i32::MAX - 7, 3).unwrap();
        subtract_average_scalar(&mut scalar, 32, 32, i32::MAX - 7, 3).unwrap();
        assert_eq!(vector, scalar);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let mut buf = vec![0i16; CFL_BUF_SQUARE];
        assert_eq!(
            subtract_average(&mut buf, 64, 16, 512, 10),
            Err(CflError::UnsupportedGeometry {
                width: 64,
                height: 16
            })
        );
        assert!(matches!(
            subtract_average(&mut buf[..100], 8, 8, 32, 6),
            Err(CflError::BufferSizeMismatch(_))
        ));
        assert_eq!(
            subtract_average(&mut buf, 8, 8, 32, 40),
            Err(CflError::ShiftOutOfRange(40))
        );
    }

    #[test]
    fn test_backend_is_stable() {
        assert_eq!(active_backend(), active_backend());
    }
}
