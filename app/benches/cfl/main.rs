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
use cfl::{get_subtract_average_fn, subtract_average_scalar, TxSize, CFL_BUF_SQUARE};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::Rng;
use std::hint::black_box;

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = rand::rng();
    let source: Vec<i16> = (0..CFL_BUF_SQUARE)
        .map(|_| rng.random_range(0..=(1023 << 3)))
        .collect();

    for tx_size in [
        TxSize::Tx4x4,
        TxSize::Tx8x8,
        TxSize::Tx16x8,
        TxSize::Tx16x16,
        TxSize::Tx32x32,
    ] {
        let geometry = tx_size.cfl_geometry().unwrap();

        c.bench_function(&format!("cfl: Subtract average {}", tx_size), |b| {
            let executor = get_subtract_average_fn(tx_size as i32);
            let mut pred_buf = source.clone();
            b.iter(|| {
                pred_buf.copy_from_slice(&source);
                executor.execute(black_box(&mut pred_buf)).unwrap();
            })
        });

        c.bench_function(&format!("scalar: Subtract average {}", tx_size), |b| {
            let mut pred_buf = source.clone();
            b.iter(|| {
                pred_buf.copy_from_slice(&source);
                subtract_average_scalar(
                    black_box(&mut pred_buf),
                    geometry.width,
                    geometry.height,
                    geometry.round_offset,
                    geometry.num_pel_log2,
                )
                .unwrap();
            })
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
