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
use crate::cfl_support::{min_buffer_len, TxSize, CFL_BUF_LINE};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct MismatchedSize {
    pub expected: usize,
    pub received: usize,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CflError {
    BufferSizeMismatch(MismatchedSize),
    UnsupportedGeometry { width: usize, height: usize },
    ShiftOutOfRange(u32),
    InvalidTransformSize(TxSize),
}

impl Display for CflError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CflError::BufferSizeMismatch(size) => f.write_fmt(format_args!(
                "Prediction buffer must have size at least {} but it is {}",
                size.expected, size.received
            )),
            CflError::UnsupportedGeometry { width, height } => f.write_fmt(format_args!(
                "Block {}x{} is not supported, width and height must be one of 4, 8, 16, 32",
                width, height
            )),
            CflError::ShiftOutOfRange(shift) => f.write_fmt(format_args!(
                "Average shift {} exceeds accumulator width",
                shift
            )),
            CflError::InvalidTransformSize(tx_size) => f.write_fmt(format_args!(
                "Transform size {} is not valid for chroma from luma",
                tx_size
            )),
        }
    }
}

impl Error for CflError {}

#[inline]
pub(crate) fn check_cfl_geometry(width: usize, height: usize) -> Result<(), CflError> {
    let is_supported = |v: usize| v.is_power_of_two() && (4..=CFL_BUF_LINE).contains(&v);
    if !is_supported(width) || !is_supported(height) {
        return Err(CflError::UnsupportedGeometry { width, height });
    }
    Ok(())
}

#[inline]
pub(crate) fn check_cfl_buffer<V>(data: &[V], width: usize, height: usize) -> Result<(), CflError> {
    let expected = min_buffer_len(width, height);
    if data.len() < expected {
        return Err(CflError::BufferSizeMismatch(MismatchedSize {
            expected,
            received: data.len(),
        }));
    }
    Ok(())
}

#[inline]
pub(crate) fn check_average_shift(num_pel_log2: u32) -> Result<(), CflError> {
    if num_pel_log2 >= i32::BITS {
        return Err(CflError::ShiftOutOfRange(num_pel_log2));
    }
    Ok(())
}
