// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Buffer size estimation for planned transforms.
//!
//! Callers own buffer allocation. These helpers tell them how many elements
//! and bytes the input and output buffers of a plan must span, including
//! padding introduced by embeddings and strides, before they allocate.

use crate::error::{FftError, Result};
use crate::kind::TransformType;
use crate::shape::PlanShape;
use crate::status::FftStatus;

/// Minimum buffer extents for one plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanFootprint {
    /// Input buffer length in elements.
    pub input_elements: usize,
    /// Output buffer length in elements.
    pub output_elements: usize,
    /// Input buffer size in bytes.
    pub input_bytes: usize,
    /// Output buffer size in bytes.
    pub output_bytes: usize,
}

impl PlanFootprint {
    /// Combined size of both buffers.
    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.input_bytes + self.output_bytes
    }
}

/// Estimate the buffers a transform of `shape` and `ty` reads and writes.
///
/// ## Example
///
/// ```rust
/// use cufft_plan::{estimate_plan_buffers, PlanShape, TransformType};
///
/// // 1-D real-to-complex of length 8: 8 reals in, 5 complex bins out
/// let fp = estimate_plan_buffers(&PlanShape::OneD { nx: 8, batch: 1 }, TransformType::R2C)?;
/// assert_eq!((fp.input_elements, fp.output_elements), (8, 5));
/// assert_eq!((fp.input_bytes, fp.output_bytes), (32, 40));
/// # Ok::<(), cufft_plan::FftError>(())
/// ```
///
/// # Errors
///
/// Returns `InvalidArgument` when the shape cannot be resolved or a buffer
/// would exceed `isize::MAX` bytes.
pub fn estimate_plan_buffers(shape: &PlanShape, ty: TransformType) -> Result<PlanFootprint> {
    let (input, output) = shape.resolve(ty)?;
    let input_elements = input.required_len();
    let output_elements = output.required_len();
    Ok(PlanFootprint {
        input_elements,
        output_elements,
        input_bytes: buffer_bytes(input_elements, ty.input_element_bytes())?,
        output_bytes: buffer_bytes(output_elements, ty.output_element_bytes())?,
    })
}

// no allocation may exceed isize::MAX bytes, which also keeps `total_bytes` in range
fn buffer_bytes(elements: usize, element_bytes: usize) -> Result<usize> {
    elements
        .checked_mul(element_bytes)
        .filter(|bytes| isize::try_from(*bytes).is_ok())
        .ok_or_else(|| {
            FftError::invalid_argument(
                FftStatus::InvalidSize,
                format!("{elements} elements of {element_bytes} bytes exceed the allocation limit"),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ManyLayout;

    #[test]
    fn test_c2r_3d_footprint() {
        let fp = estimate_plan_buffers(&PlanShape::ThreeD { nx: 2, ny: 4, nz: 8 }, TransformType::Z2D)
            .unwrap();
        assert_eq!(fp.input_elements, 2 * 4 * 5);
        assert_eq!(fp.output_elements, 64);
        assert_eq!(fp.input_bytes, 40 * 16);
        assert_eq!(fp.output_bytes, 64 * 8);
        assert_eq!(fp.total_bytes(), 40 * 16 + 64 * 8);
    }

    #[test]
    fn test_batched_footprint() {
        let fp = estimate_plan_buffers(&PlanShape::OneD { nx: 16, batch: 4 }, TransformType::C2C).unwrap();
        assert_eq!(fp.input_elements, 64);
        assert_eq!(fp.output_bytes, 64 * 8);
    }

    #[test]
    fn test_strided_footprint() {
        let layout = ManyLayout::new(vec![4])
            .with_input(vec![4], 3, 1)
            .with_batch(3);
        let fp = estimate_plan_buffers(&PlanShape::Many(layout), TransformType::C2C).unwrap();
        // last element: batch 2 at offset 2 + 3 * 3
        assert_eq!(fp.input_elements, 12);
        assert_eq!(fp.output_elements, 12);
    }

    #[test]
    fn test_invalid_shape() {
        assert!(estimate_plan_buffers(&PlanShape::TwoD { nx: -1, ny: 4 }, TransformType::R2C).is_err());
    }

    #[test]
    fn test_unallocatable_footprint() {
        // addressable in elements, too large in bytes
        let layout = ManyLayout::new(vec![1])
            .with_input(vec![1], 1, i32::MAX)
            .with_batch(i32::MAX);
        let err = estimate_plan_buffers(&PlanShape::Many(layout), TransformType::Z2Z).unwrap_err();
        assert_eq!(err.status(), Some(FftStatus::InvalidSize));

        assert_eq!(buffer_bytes(4, 16).unwrap(), 64);
        assert!(buffer_bytes(usize::MAX / 2, 8).is_err());
    }
}
