// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Native FFT runtime seam.
//!
//! [`FftBackend`] is the set of native calls a [`crate::Plan`] is built on:
//! planning, destruction, stream binding and the six execution entry points.
//! Every method reports a raw [`FftStatus`]; translating it into an error is
//! the plan's job.
//!
//! Execution entry points receive the stream the plan was last bound to, or
//! `None` if it never was. Backends order their buffer accesses on that
//! stream.
//!
//! Two backends exist:
//!
//! - [`HostBackend`] - host-memory reference runtime with call accounting
//! - `CudaBackend` - cuFFT through `cudarc` (feature `cuda`)

use crate::element::{Complex32, Complex64, Element};
use crate::kind::{Direction, TransformType};
use crate::shape::PlanShape;
use crate::status::FftStatus;

pub mod host;

#[cfg(feature = "cuda")]
pub mod cuda;

pub use host::{HostBackend, HostStats, HostStream, NativeCall};

#[cfg(feature = "cuda")]
pub use cuda::CudaBackend;

/// Native plan handle (`cufftHandle`).
pub type RawPlan = i32;

/// The value meaning "no handle".
pub const NULL_PLAN: RawPlan = 0;

/// Native calls a plan relies on.
///
/// Implementations never receive a handle the plan does not own: a plan
/// without a live handle short-circuits before reaching the backend.
pub trait FftBackend: Clone {
    /// Execution stream type accepted by [`FftBackend::set_stream`].
    type Stream: Clone;

    /// Buffer type holding elements of type `T`.
    type Memory<T: Element>: ?Sized;

    /// Human-readable backend name for logs.
    fn name(&self) -> &'static str;

    /// Create a plan for `shape`, writing the new handle to `handle`.
    ///
    /// `shape` has passed structural validation; value ranges are the
    /// backend's to check.
    fn create(&self, shape: &PlanShape, ty: TransformType, handle: &mut RawPlan) -> FftStatus;

    /// Release a plan.
    fn destroy(&self, handle: RawPlan) -> FftStatus;

    /// Order subsequent executions of `handle` on `stream`.
    fn set_stream(&self, handle: RawPlan, stream: &Self::Stream) -> FftStatus;

    /// Single-precision real to complex.
    fn exec_r2c(
        &self,
        handle: RawPlan,
        input: &mut Self::Memory<f32>,
        output: &mut Self::Memory<Complex32>,
        stream: Option<&Self::Stream>,
    ) -> FftStatus;

    /// Single-precision complex to real. The input may be overwritten.
    fn exec_c2r(
        &self,
        handle: RawPlan,
        input: &mut Self::Memory<Complex32>,
        output: &mut Self::Memory<f32>,
        stream: Option<&Self::Stream>,
    ) -> FftStatus;

    /// Single-precision complex to complex.
    fn exec_c2c(
        &self,
        handle: RawPlan,
        input: &mut Self::Memory<Complex32>,
        output: &mut Self::Memory<Complex32>,
        direction: Direction,
        stream: Option<&Self::Stream>,
    ) -> FftStatus;

    /// Double-precision real to complex.
    fn exec_d2z(
        &self,
        handle: RawPlan,
        input: &mut Self::Memory<f64>,
        output: &mut Self::Memory<Complex64>,
        stream: Option<&Self::Stream>,
    ) -> FftStatus;

    /// Double-precision complex to real. The input may be overwritten.
    fn exec_z2d(
        &self,
        handle: RawPlan,
        input: &mut Self::Memory<Complex64>,
        output: &mut Self::Memory<f64>,
        stream: Option<&Self::Stream>,
    ) -> FftStatus;

    /// Double-precision complex to complex.
    fn exec_z2z(
        &self,
        handle: RawPlan,
        input: &mut Self::Memory<Complex64>,
        output: &mut Self::Memory<Complex64>,
        direction: Direction,
        stream: Option<&Self::Stream>,
    ) -> FftStatus;
}
