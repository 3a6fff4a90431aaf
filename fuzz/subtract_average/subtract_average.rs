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

#![no_main]

use cfl::{get_subtract_average_fn, subtract_average, subtract_average_scalar, CFL_BUF_SQUARE};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (i32, i32, u8, Vec<i16>)| {
    let (tx_id, round_offset, shift, samples) = data;
    if samples.is_empty() {
        return;
    }
    let source: Vec<i16> = samples.iter().copied().cycle().take(CFL_BUF_SQUARE).collect();

    fuzz_dispatch(tx_id, &source);
    fuzz_generic(tx_id, round_offset, shift as u32, &source);
});

fn fuzz_dispatch(tx_id: i32, source: &[i16]) {
    let executor = get_subtract_average_fn(tx_id);
    let mut dispatched = source.to_vec();
    match executor.geometry() {
        Some(geometry) => {
            executor.execute(&mut dispatched).unwrap();
            let mut reference = source.to_vec();
            subtract_average_scalar(
                &mut reference,
                geometry.width,
                geometry.height,
                geometry.round_offset,
                geometry.num_pel_log2,
            )
            .unwrap();
            assert_eq!(dispatched, reference);
        }
        None => {
            assert!(executor.execute(&mut dispatched).is_err());
            assert_eq!(dispatched, source);
        }
    }
}

fn fuzz_generic(tx_id: i32, round_offset: i32, shift: u32, source: &[i16]) {
    let tx_size = get_subtract_average_fn(tx_id).tx_size();
    let (width, height) = (tx_size.width(), tx_size.height());

    let mut vector = source.to_vec();
    let mut reference = source.to_vec();
    let vector_result = subtract_average(&mut vector, width, height, round_offset, shift);
    let reference_result =
        subtract_average_scalar(&mut reference, width, height, round_offset, shift);
    assert_eq!(vector_result, reference_result);
    assert_eq!(vector, reference);
}
