// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! # cufft-plan
//!
//! Type-checked, RAII-managed cuFFT plan handles.
//!
//! A [`Plan`] owns one native plan handle. Its transform kind is a type
//! parameter, so execution only compiles with the element types the kind
//! expects, and the handle is destroyed exactly once, when the plan is
//! dropped. Native status codes are translated into [`FftError`] in one
//! place ([`status::check`]).
//!
//! ## Design Philosophy
//!
//! **CUDA-first**: the `cuda` feature plans and executes through cuFFT. The
//! [`HostBackend`] is a reference implementation of the same contract that
//! runs on the CPU; it warns once when used, and it records every native
//! call, which makes plan lifecycles testable without a GPU.
//!
//! ## Modules
//!
//! - [`plan`] - the plan handle, its ownership rules and execution
//! - [`kind`] - the six transform kinds and their element types
//! - [`element`] - real and complex element types
//! - [`shape`] - 1-D/2-D/3-D and advanced (strided, batched) layouts
//! - [`backend`] - the native runtime seam, host and CUDA implementations
//! - [`status`] - native status codes and their translation
//! - [`error`] - error types
//! - [`coords`] - global thread coordinates for kernels over FFT data
//! - [`device`] - device selection with environment overrides
//! - [`memory`] - buffer size estimation
//! - [`logging`] - `tracing` subscriber setup
//!
//! ## Quick Start
//!
//! ```rust
//! use cufft_plan::{Complex32, Direction, HostBackend, Plan, C2C, R2C};
//!
//! fn main() -> cufft_plan::Result<()> {
//!     let backend = HostBackend::new();
//!
//!     // 8 reals in, 5 complex bins out
//!     let mut r2c = Plan::<R2C, _>::new_1d(backend.clone(), 8)?;
//!     let mut signal = [0.5f32; 8];
//!     let mut spectrum = [Complex32::ZERO; 5];
//!     r2c.execute(&mut signal[..], &mut spectrum[..])?;
//!
//!     // complex-to-complex needs a direction
//!     let mut c2c = Plan::<C2C, _>::new_2d(backend, 4, 4)?;
//!     let mut a = [Complex32::new(1.0, 0.0); 16];
//!     let mut b = [Complex32::ZERO; 16];
//!     c2c.execute_with_direction(&mut a[..], &mut b[..], Direction::Forward)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `cuda` - Enable the cuFFT backend via `cudarc`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod coords;
pub mod device;
pub mod element;
pub mod error;
pub mod kind;
pub mod logging;
pub mod memory;
pub mod plan;
pub mod shape;
pub mod status;
pub mod traits;

// Re-exports for convenience
pub use backend::{FftBackend, HostBackend, HostStats, HostStream, NativeCall, RawPlan, NULL_PLAN};
pub use coords::{coord_x, coord_y, coord_z, Dim3, LaunchGrid, ThreadCoords};
pub use device::{cuda_available, warn_if_host, DeviceConfig};
pub use element::{Complex32, Complex64, Element};
pub use error::{ErrorKind, FftError, Result};
pub use kind::{Directed, Direction, Directionless, TransformKind, TransformType, C2C, C2R, D2Z, R2C, Z2D, Z2Z};
pub use logging::{init_logging, LogConfig, LogLevel};
pub use memory::{estimate_plan_buffers, PlanFootprint};
pub use plan::{HostPlan, Plan, SharedPlan};
pub use shape::{ManyLayout, PlanShape, SideLayout};
pub use status::FftStatus;
pub use traits::ValidatableConfig;

#[cfg(feature = "cuda")]
pub use backend::CudaBackend;

#[cfg(feature = "cuda")]
pub use plan::CudaPlan;
