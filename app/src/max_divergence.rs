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
use cfl::{CflPredictionBuffer, TxSize, CFL_BUF_SQUARE};
use rand::Rng;

/// Largest per sample difference between the dispatched routine and the scalar reference
/// for one random block.
fn divergence(tx_size: TxSize, max_sample: i16) -> Result<u32, cfl::CflError> {
    let geometry = match tx_size.cfl_geometry() {
        Some(geometry) => geometry,
        None => return Ok(0),
    };

    let mut rng = rand::rng();
    let source: Vec<i16> = (0..CFL_BUF_SQUARE)
        .map(|_| rng.random_range(0..=max_sample))
        .collect();

    let mut dispatched = CflPredictionBuffer::from_slice(&source)?;
    tx_size.subtract_average_fn().execute(dispatched.as_mut_slice())?;

    let mut reference = source;
    cfl::subtract_average_scalar(
        &mut reference,
        geometry.width,
        geometry.height,
        geometry.round_offset,
        geometry.num_pel_log2,
    )?;

    Ok(dispatched
        .as_slice()
        .iter()
        .zip(reference.iter())
        .map(|(&a, &b)| (a as i32 - b as i32).unsigned_abs())
        .max()
        .unwrap_or(0))
}

pub(crate) fn report_max_divergence(iterations: usize) -> Result<(), cfl::CflError> {
    for bit_depth in [8u32, 10, 12] {
        let max_sample = (((1i32 << bit_depth) - 1) << 3) as i16;
        for tx_size in TxSize::ALL.into_iter().filter(|t| t.is_cfl_allowed()) {
            let mut max_diff = 0u32;
            for _ in 0..iterations {
                max_diff = max_diff.max(divergence(tx_size, max_sample)?);
            }
            log::info!(
                "{}-bit {:>5} route {:?}: max divergence {}",
                bit_depth,
                tx_size.to_string(),
                tx_size.subtract_average_fn().route(),
                max_diff
            );
        }
    }
    Ok(())
}
