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
//! Zero-mean stage of chroma-from-luma (CfL) intra prediction.
//!
//! CfL predicts chroma as a linear function of the reconstructed luma. Before the model is
//! fitted the subsampled luma block has its rounded average subtracted, so that only the
//! AC part remains. This crate performs that step for every transform size CfL allows,
//! on AVX2, SSE4.1, NEON or WASM SIMD128 when available, and bit exactly with the scalar
//! reference everywhere.
//!
//! Blocks live in a prediction buffer with a fixed stride of [CFL_BUF_LINE] samples.
//!
//! ```
//! use cfl::{get_subtract_average_fn, TxSize, CFL_BUF_LINE, CFL_BUF_SQUARE};
//!
//! let mut pred_buf = vec![0i16; CFL_BUF_SQUARE];
//! for row in pred_buf.chunks_mut(CFL_BUF_LINE).take(8) {
//!     row[..8].fill(100);
//! }
//! get_subtract_average_fn(TxSize::Tx8x8 as i32)
//!     .execute(&mut pred_buf)
//!     .unwrap();
//! assert!(pred_buf.iter().all(|&v| v == 0));
//! ```
#![deny(unreachable_pub)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "avx"))]
mod avx2;
mod cfl_buffer;
mod cfl_dispatch;
mod cfl_error;
mod cfl_support;
#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
mod neon;
#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
mod sse;
mod subtract_average;
#[cfg(all(target_arch = "wasm32", target_feature = "simd128"))]
mod wasm32;

pub use cfl_buffer::{BufferStoreMut, CflPredictionBuffer};
pub use cfl_dispatch::{
    get_subtract_average_fn, subtract_average_blocks, SubtractAverageFn, SubtractAverageRoute,
};
pub use cfl_error::{CflError, MismatchedSize};
pub use cfl_support::{
    CflBackend, CflGeometry, TxSize, CFL_BUF_LINE, CFL_BUF_SQUARE, TX_SIZES_ALL,
};
pub use subtract_average::{active_backend, subtract_average, subtract_average_scalar};
