// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Problem shapes handed to the native planner.
//!
//! [`PlanShape`] covers the four planning entry points: 1-D (optionally
//! batched), 2-D, 3-D and the general "many" form described by
//! [`ManyLayout`].
//!
//! ## Advanced layout
//!
//! In the general form each side (input, output) of the transform is
//! described by an optional embedding, a stride and a distance. Element
//! `idx` of batch `b` lives at
//!
//! ```text
//! b * dist + stride * (idx[rank-1] + embed[rank-1] * (idx[rank-2] + embed[rank-2] * ...))
//! ```
//!
//! `embed[0]` is never read. Without an embedding the side is tightly
//! packed and its stride and distance are ignored, as the native planner
//! does when it receives null embedding pointers.
//!
//! A side whose last element offset does not fit in `usize` is rejected
//! with `InvalidSize` when it is resolved, so offsets of a resolved
//! [`SideLayout`] never overflow.

use crate::error::{FftError, Result};
use crate::kind::TransformType;
use crate::status::FftStatus;
use crate::traits::ValidatableConfig;

/// Largest rank the native planner accepts.
pub const MAX_RANK: usize = 3;

/// Strided, padded and batched layout for [`PlanShape::Many`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManyLayout {
    /// Logical size of each dimension, slowest-varying first.
    pub dims: Vec<i32>,
    /// Storage dimensions of the input, `None` for packed input.
    pub inembed: Option<Vec<i32>>,
    /// Stride between consecutive input elements of the innermost dimension.
    pub istride: i32,
    /// Distance between the first input elements of consecutive batches.
    pub idist: i32,
    /// Storage dimensions of the output, `None` for packed output.
    pub onembed: Option<Vec<i32>>,
    /// Stride between consecutive output elements of the innermost dimension.
    pub ostride: i32,
    /// Distance between the first output elements of consecutive batches.
    pub odist: i32,
    /// Number of transforms.
    pub batch: i32,
}

impl ManyLayout {
    /// Packed layout of the given dimensions, batch count 1.
    #[must_use]
    pub fn new(dims: impl Into<Vec<i32>>) -> Self {
        Self {
            dims: dims.into(),
            inembed: None,
            istride: 1,
            idist: 0,
            onembed: None,
            ostride: 1,
            odist: 0,
            batch: 1,
        }
    }

    /// Describe the input side.
    #[must_use]
    pub fn with_input(mut self, inembed: impl Into<Vec<i32>>, istride: i32, idist: i32) -> Self {
        self.inembed = Some(inembed.into());
        self.istride = istride;
        self.idist = idist;
        self
    }

    /// Describe the output side.
    #[must_use]
    pub fn with_output(mut self, onembed: impl Into<Vec<i32>>, ostride: i32, odist: i32) -> Self {
        self.onembed = Some(onembed.into());
        self.ostride = ostride;
        self.odist = odist;
        self
    }

    /// Set the batch count.
    #[must_use]
    pub fn with_batch(mut self, batch: i32) -> Self {
        self.batch = batch;
        self
    }

    /// Number of transform dimensions.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }
}

impl ValidatableConfig for ManyLayout {
    /// Structural checks the native call relies on for memory safety.
    ///
    /// Value ranges (positive sizes, strides) are left to the planner.
    fn validate(&self) -> Result<()> {
        let rank = self.rank();
        if rank == 0 || rank > MAX_RANK {
            return Err(FftError::invalid_argument(
                FftStatus::InvalidValue,
                format!("rank must be between 1 and {MAX_RANK}, got {rank}"),
            ));
        }
        for (side, embed) in [("inembed", &self.inembed), ("onembed", &self.onembed)] {
            if let Some(embed) = embed {
                if embed.len() != rank {
                    return Err(FftError::invalid_argument(
                        FftStatus::InvalidValue,
                        format!("{side} has {} entries, rank is {rank}", embed.len()),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Shape of a planned transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanShape {
    /// One dimension of length `nx`, `batch` transforms.
    OneD {
        /// Transform length.
        nx: i32,
        /// Number of transforms.
        batch: i32,
    },
    /// Two dimensions, `nx` slowest.
    TwoD {
        /// Slow dimension.
        nx: i32,
        /// Fast dimension.
        ny: i32,
    },
    /// Three dimensions, `nx` slowest.
    ThreeD {
        /// Slowest dimension.
        nx: i32,
        /// Middle dimension.
        ny: i32,
        /// Fastest dimension.
        nz: i32,
    },
    /// General strided/batched form.
    Many(ManyLayout),
}

impl PlanShape {
    /// Number of transform dimensions.
    #[must_use]
    pub fn rank(&self) -> usize {
        match self {
            Self::OneD { .. } => 1,
            Self::TwoD { .. } => 2,
            Self::ThreeD { .. } => 3,
            Self::Many(layout) => layout.rank(),
        }
    }

    /// Logical dimensions, slowest first.
    #[must_use]
    pub fn dims(&self) -> Vec<i32> {
        match self {
            Self::OneD { nx, .. } => vec![*nx],
            Self::TwoD { nx, ny } => vec![*nx, *ny],
            Self::ThreeD { nx, ny, nz } => vec![*nx, *ny, *nz],
            Self::Many(layout) => layout.dims.clone(),
        }
    }

    /// Number of transforms executed per call.
    #[must_use]
    pub fn batch(&self) -> i32 {
        match self {
            Self::OneD { batch, .. } => *batch,
            Self::TwoD { .. } | Self::ThreeD { .. } => 1,
            Self::Many(layout) => layout.batch,
        }
    }

    /// Resolve the concrete input and output layouts for a transform type.
    ///
    /// # Errors
    ///
    /// `InvalidSize` for non-positive dimensions or batch counts and for
    /// layouts whose extent overflows `usize`, `InvalidValue` for
    /// non-positive strides/distances or embeddings smaller than the data
    /// they hold.
    pub fn resolve(&self, ty: TransformType) -> Result<(SideLayout, SideLayout)> {
        self.validate()?;
        let dims = to_sizes(&self.dims(), "dimension")?;
        let batch = to_size(self.batch(), "batch")?;

        let mut input_dims = dims.clone();
        let mut output_dims = dims;
        if ty.is_forward_real() {
            halve_last(&mut output_dims);
        } else if ty.is_inverse_real() {
            halve_last(&mut input_dims);
        }

        match self {
            Self::Many(layout) => Ok((
                SideLayout::strided(input_dims, layout.inembed.as_deref(), layout.istride, layout.idist, batch)?,
                SideLayout::strided(output_dims, layout.onembed.as_deref(), layout.ostride, layout.odist, batch)?,
            )),
            _ => Ok((
                SideLayout::packed(input_dims, batch)?,
                SideLayout::packed(output_dims, batch)?,
            )),
        }
    }
}

impl ValidatableConfig for PlanShape {
    fn validate(&self) -> Result<()> {
        match self {
            Self::Many(layout) => layout.validate(),
            _ => Ok(()),
        }
    }
}

/// Concrete memory layout of one side of a transform.
///
/// Built by [`PlanShape::resolve`], which guarantees every offset inside
/// the layout fits in `usize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideLayout {
    dims: Vec<usize>,
    embed: Vec<usize>,
    stride: usize,
    dist: usize,
    batch: usize,
    len: usize,
}

impl SideLayout {
    fn packed(dims: Vec<usize>, batch: usize) -> Result<Self> {
        let dist = checked_product(&dims).ok_or_else(|| too_large(&dims, batch))?;
        Self {
            embed: dims.clone(),
            dims,
            stride: 1,
            dist,
            batch,
            len: 0,
        }
        .measured()
    }

    fn strided(
        dims: Vec<usize>,
        embed: Option<&[i32]>,
        stride: i32,
        dist: i32,
        batch: usize,
    ) -> Result<Self> {
        let Some(embed) = embed else {
            return Self::packed(dims, batch);
        };
        let embed = to_sizes(embed, "embedding")?;
        if embed.iter().zip(&dims).skip(1).any(|(e, d)| e < d) {
            return Err(FftError::invalid_argument(
                FftStatus::InvalidValue,
                format!("embedding {embed:?} cannot hold dimensions {dims:?}"),
            ));
        }
        let stride = to_stride(stride, "stride")?;
        let dist = to_stride(dist, "distance")?;
        Self {
            dims,
            embed,
            stride,
            dist,
            batch,
            len: 0,
        }
        .measured()
    }

    /// Compute the buffer extent, rejecting layouts it does not fit.
    fn measured(mut self) -> Result<Self> {
        self.len = self
            .extent()
            .ok_or_else(|| too_large(&self.dims, self.batch))?;
        Ok(self)
    }

    fn extent(&self) -> Option<usize> {
        checked_product(&self.dims)?;
        let linear = self
            .dims
            .iter()
            .zip(&self.embed)
            .try_fold(0usize, |acc, (d, e)| acc.checked_mul(*e)?.checked_add(d - 1))?;
        (self.batch - 1)
            .checked_mul(self.dist)?
            .checked_add(self.stride.checked_mul(linear)?)?
            .checked_add(1)
    }

    /// Logical element counts per dimension.
    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Storage dimensions.
    #[must_use]
    pub fn embed(&self) -> &[usize] {
        &self.embed
    }

    /// Innermost element stride.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Distance between batches.
    #[must_use]
    pub fn dist(&self) -> usize {
        self.dist
    }

    /// Number of batches.
    #[must_use]
    pub fn batch(&self) -> usize {
        self.batch
    }

    /// Number of logical elements in one batch.
    #[must_use]
    pub fn elements(&self) -> usize {
        self.dims.iter().product()
    }

    /// Buffer offset of logical index `idx` in batch `b`.
    ///
    /// `b` and `idx` must lie inside the layout.
    #[must_use]
    pub fn offset(&self, b: usize, idx: &[usize]) -> usize {
        let linear = idx
            .iter()
            .zip(&self.embed)
            .fold(0, |acc, (i, e)| acc * e + i);
        b * self.dist + self.stride * linear
    }

    /// Minimum buffer length, in elements, holding every batch.
    #[must_use]
    pub fn required_len(&self) -> usize {
        self.len
    }
}

fn checked_product(dims: &[usize]) -> Option<usize> {
    dims.iter().try_fold(1usize, |acc, d| acc.checked_mul(*d))
}

fn too_large(dims: &[usize], batch: usize) -> FftError {
    FftError::invalid_argument(
        FftStatus::InvalidSize,
        format!("layout of {batch} x {dims:?} exceeds the addressable range"),
    )
}

fn halve_last(dims: &mut [usize]) {
    if let Some(last) = dims.last_mut() {
        *last = *last / 2 + 1;
    }
}

fn to_size(value: i32, what: &str) -> Result<usize> {
    usize::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| {
            FftError::invalid_argument(
                FftStatus::InvalidSize,
                format!("{what} must be positive, got {value}"),
            )
        })
}

fn to_sizes(values: &[i32], what: &str) -> Result<Vec<usize>> {
    values.iter().map(|v| to_size(*v, what)).collect()
}

fn to_stride(value: i32, what: &str) -> Result<usize> {
    usize::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| {
            FftError::invalid_argument(
                FftStatus::InvalidValue,
                format!("{what} must be positive, got {value}"),
            )
        })
}
