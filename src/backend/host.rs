// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Host-memory reference backend.
//!
//! [`HostBackend`] implements the native planning and execution contract on
//! the CPU:
//!
//! - transforms are unnormalized, forward uses `exp(-2πi·jk/n)`;
//! - real-to-complex output keeps the `n/2 + 1` non-redundant bins of the
//!   last dimension, complex-to-real input is read the same way;
//! - advanced layouts (embedding, stride, distance, batch) are honoured;
//! - buffers shorter than the planned layout are rejected with
//!   `InvalidValue` instead of being read out of bounds.
//!
//! Each transform pass runs as an emulated grid launch in which every
//! thread locates its output bin with [`coord_x`]/[`coord_y`].
//!
//! The backend counts successful native calls ([`HostBackend::stats`]) and
//! can be told to fail the next call with a given status
//! ([`HostBackend::fail_next`]). A backend built with
//! [`HostBackend::recording`] also keeps the full call sequence
//! ([`HostBackend::calls`]); the log grows with every call, so it is meant
//! for tests and short diagnostics. Clones share the same state.

use super::{FftBackend, RawPlan, NULL_PLAN};
use crate::coords::{coord_x, coord_y, Dim3, LaunchGrid};
use crate::device::{warn_if_host, DeviceConfig};
use crate::element::{Complex32, Complex64, Element};
use crate::error::Result;
use crate::kind::{Direction, TransformType};
use crate::logging::HOST_TARGET;
use crate::shape::{PlanShape, SideLayout};
use crate::status::FftStatus;
use crate::traits::ValidatableConfig;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Default threads per emulated block.
pub const DEFAULT_BLOCK_SIZE: u32 = 256;

/// Stream identifier for the host backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostStream(pub u64);

/// One recorded native call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeCall {
    /// A plan was created.
    Create {
        /// New handle.
        handle: RawPlan,
        /// Planned transform type.
        ty: TransformType,
    },
    /// A plan was destroyed.
    Destroy {
        /// Released handle.
        handle: RawPlan,
    },
    /// A stream was bound.
    SetStream {
        /// Target plan.
        handle: RawPlan,
        /// Bound stream.
        stream: HostStream,
    },
    /// A transform was executed.
    Exec {
        /// Executed plan.
        handle: RawPlan,
        /// Entry point that was called.
        ty: TransformType,
        /// Direction for complex-to-complex entry points.
        direction: Option<Direction>,
        /// Stream the plan was bound to, if any.
        stream: Option<HostStream>,
    },
}

/// Counters of successful native calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostStats {
    /// Plans created.
    pub created: usize,
    /// Plans destroyed.
    pub destroyed: usize,
    /// Transforms executed.
    pub executions: usize,
    /// Stream bindings.
    pub stream_bindings: usize,
    /// Plans currently alive.
    pub live: usize,
}

#[derive(Debug)]
struct HostPlan {
    ty: TransformType,
    input: SideLayout,
    output: SideLayout,
    stream: Option<HostStream>,
}

#[derive(Debug)]
struct HostState {
    next_handle: RawPlan,
    plans: HashMap<RawPlan, HostPlan>,
    calls: Option<Vec<NativeCall>>,
    stats: HostStats,
    injected: Option<FftStatus>,
}

impl HostState {
    fn new(record: bool) -> Self {
        Self {
            next_handle: NULL_PLAN + 1,
            plans: HashMap::new(),
            calls: record.then(Vec::new),
            stats: HostStats::default(),
            injected: None,
        }
    }

    fn record(&mut self, call: NativeCall) {
        if let Some(calls) = &mut self.calls {
            calls.push(call);
        }
    }
}

/// CPU implementation of the native FFT runtime.
#[derive(Debug, Clone)]
pub struct HostBackend {
    state: Arc<Mutex<HostState>>,
    block_size: u32,
}

impl Default for HostBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HostBackend {
    /// Create a backend with its own plan table and no call log.
    #[must_use]
    pub fn new() -> Self {
        Self::build(DeviceConfig::default().crate_name(), false)
    }

    /// Create a backend that also logs every successful native call.
    #[must_use]
    pub fn recording() -> Self {
        Self::build(DeviceConfig::default().crate_name(), true)
    }

    /// Create a backend for `config`; its crate name appears in the
    /// host-fallback warning.
    ///
    /// # Errors
    ///
    /// Returns the configuration's validation error.
    pub fn from_config(config: &DeviceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config.crate_name(), false))
    }

    fn build(crate_name: &str, record: bool) -> Self {
        warn_if_host(crate_name);
        Self {
            state: Arc::new(Mutex::new(HostState::new(record))),
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }

    /// Threads per emulated block used by transform passes.
    #[must_use]
    pub fn with_block_size(mut self, threads: u32) -> Self {
        self.block_size = threads.max(1);
        self
    }

    /// Make the next native call fail with `status` without side effects.
    pub fn fail_next(&self, status: FftStatus) {
        self.state().injected = Some(status);
    }

    /// Counters of successful native calls.
    #[must_use]
    pub fn stats(&self) -> HostStats {
        let state = self.state();
        HostStats {
            live: state.plans.len(),
            ..state.stats
        }
    }

    /// Every successful native call, in order. Empty unless the backend
    /// was built with [`HostBackend::recording`].
    #[must_use]
    pub fn calls(&self) -> Vec<NativeCall> {
        self.state().calls.clone().unwrap_or_default()
    }

    /// `true` if native calls are logged.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.state().calls.is_some()
    }

    /// Drop the logged calls. Counters are kept.
    pub fn clear_calls(&self) {
        if let Some(calls) = &mut self.state().calls {
            calls.clear();
        }
    }

    /// `true` if `handle` names a plan that has not been destroyed.
    #[must_use]
    pub fn is_live(&self, handle: RawPlan) -> bool {
        self.state().plans.contains_key(&handle)
    }

    /// Stream currently bound to `handle`.
    #[must_use]
    pub fn stream_of(&self, handle: RawPlan) -> Option<HostStream> {
        self.state().plans.get(&handle).and_then(|p| p.stream)
    }

    fn state(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn execute<I: Element, O: Element>(
        &self,
        handle: RawPlan,
        ty: TransformType,
        input: &[I],
        output: &mut [O],
        direction: Option<Direction>,
        stream: Option<HostStream>,
    ) -> FftStatus {
        let (inl, outl) = {
            let mut state = self.state();
            if let Some(status) = state.injected.take() {
                return status;
            }
            let Some(plan) = state.plans.get(&handle) else {
                return FftStatus::InvalidPlan;
            };
            if plan.ty != ty {
                return FftStatus::InvalidPlan;
            }
            let (need_in, need_out) = (plan.input.required_len(), plan.output.required_len());
            if input.len() < need_in || output.len() < need_out {
                tracing::debug!(
                    target: HOST_TARGET,
                    handle,
                    need_in,
                    have_in = input.len(),
                    need_out,
                    have_out = output.len(),
                    "buffer shorter than planned layout"
                );
                return FftStatus::InvalidValue;
            }
            let layouts = (plan.input.clone(), plan.output.clone());
            state.record(NativeCall::Exec {
                handle,
                ty,
                direction,
                stream,
            });
            state.stats.executions += 1;
            layouts
        };

        let sign = match (ty, direction) {
            (_, Some(direction)) => f64::from(direction.sign()),
            (TransformType::C2R | TransformType::Z2D, None) => 1.0,
            _ => -1.0,
        };
        transform(ty, &inl, &outl, input, output, sign, self.block_size);
        FftStatus::Success
    }
}

impl FftBackend for HostBackend {
    type Stream = HostStream;
    type Memory<T: Element> = [T];

    fn name(&self) -> &'static str {
        "host"
    }

    fn create(&self, shape: &PlanShape, ty: TransformType, handle: &mut RawPlan) -> FftStatus {
        let mut state = self.state();
        if let Some(status) = state.injected.take() {
            return status;
        }
        let (input, output) = match shape.resolve(ty) {
            Ok(layouts) => layouts,
            Err(err) => return err.status().unwrap_or(FftStatus::InvalidValue),
        };
        // emulated launches index with u32 coordinates
        let full = input.elements().max(output.elements());
        if u32::try_from(full).is_err() {
            return FftStatus::InvalidSize;
        }

        let id = state.next_handle;
        state.next_handle += 1;
        state.plans.insert(
            id,
            HostPlan {
                ty,
                input,
                output,
                stream: None,
            },
        );
        state.record(NativeCall::Create { handle: id, ty });
        state.stats.created += 1;
        *handle = id;
        FftStatus::Success
    }

    fn destroy(&self, handle: RawPlan) -> FftStatus {
        let mut state = self.state();
        if let Some(status) = state.injected.take() {
            return status;
        }
        if state.plans.remove(&handle).is_none() {
            return FftStatus::InvalidPlan;
        }
        state.record(NativeCall::Destroy { handle });
        state.stats.destroyed += 1;
        FftStatus::Success
    }

    fn set_stream(&self, handle: RawPlan, stream: &HostStream) -> FftStatus {
        let mut state = self.state();
        if let Some(status) = state.injected.take() {
            return status;
        }
        let Some(plan) = state.plans.get_mut(&handle) else {
            return FftStatus::InvalidPlan;
        };
        plan.stream = Some(*stream);
        state.record(NativeCall::SetStream {
            handle,
            stream: *stream,
        });
        state.stats.stream_bindings += 1;
        FftStatus::Success
    }

    fn exec_r2c(
        &self,
        handle: RawPlan,
        input: &mut [f32],
        output: &mut [Complex32],
        stream: Option<&HostStream>,
    ) -> FftStatus {
        self.execute(handle, TransformType::R2C, input, output, None, stream.copied())
    }

    fn exec_c2r(
        &self,
        handle: RawPlan,
        input: &mut [Complex32],
        output: &mut [f32],
        stream: Option<&HostStream>,
    ) -> FftStatus {
        self.execute(handle, TransformType::C2R, input, output, None, stream.copied())
    }

    fn exec_c2c(
        &self,
        handle: RawPlan,
        input: &mut [Complex32],
        output: &mut [Complex32],
        direction: Direction,
        stream: Option<&HostStream>,
    ) -> FftStatus {
        self.execute(handle, TransformType::C2C, input, output, Some(direction), stream.copied())
    }

    fn exec_d2z(
        &self,
        handle: RawPlan,
        input: &mut [f64],
        output: &mut [Complex64],
        stream: Option<&HostStream>,
    ) -> FftStatus {
        self.execute(handle, TransformType::D2Z, input, output, None, stream.copied())
    }

    fn exec_z2d(
        &self,
        handle: RawPlan,
        input: &mut [Complex64],
        output: &mut [f64],
        stream: Option<&HostStream>,
    ) -> FftStatus {
        self.execute(handle, TransformType::Z2D, input, output, None, stream.copied())
    }

    fn exec_z2z(
        &self,
        handle: RawPlan,
        input: &mut [Complex64],
        output: &mut [Complex64],
        direction: Direction,
        stream: Option<&HostStream>,
    ) -> FftStatus {
        self.execute(handle, TransformType::Z2Z, input, output, Some(direction), stream.copied())
    }
}

type Cplx = (f64, f64);

fn transform<I: Element, O: Element>(
    ty: TransformType,
    inl: &SideLayout,
    outl: &SideLayout,
    input: &[I],
    output: &mut [O],
    sign: f64,
    block_size: u32,
) {
    // the full logical shape is the larger of the two sides
    let dims = if ty.is_inverse_real() {
        outl.dims().to_vec()
    } else {
        inl.dims().to_vec()
    };
    let total: usize = dims.iter().product();
    let mut idx = vec![0; dims.len()];
    let mut mirror = vec![0; dims.len()];

    for b in 0..inl.batch() {
        let mut data: Vec<Cplx> = Vec::with_capacity(total);
        for lin in 0..total {
            unravel(lin, &dims, &mut idx);
            let value = if ty.is_inverse_real() && !within(&idx, inl.dims()) {
                // Hermitian symmetry: X[k] = conj(X[-k mod n])
                for ((m, i), n) in mirror.iter_mut().zip(&idx).zip(&dims) {
                    *m = (n - i) % n;
                }
                let (re, im) = input[inl.offset(b, &mirror)].to_parts();
                (re, -im)
            } else {
                input[inl.offset(b, &idx)].to_parts()
            };
            data.push(value);
        }

        for axis in 0..dims.len() {
            data = dft_axis(&data, &dims, axis, sign, block_size);
        }

        for lin in 0..total {
            unravel(lin, &dims, &mut idx);
            if within(&idx, outl.dims()) {
                let (re, im) = data[lin];
                output[outl.offset(b, &idx)] = O::from_parts(re, im);
            }
        }
    }
}

/// One-dimensional DFT along `axis`, one emulated thread per output bin.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn dft_axis(data: &[Cplx], dims: &[usize], axis: usize, sign: f64, block_size: u32) -> Vec<Cplx> {
    let n = dims[axis];
    let inner: usize = dims[axis + 1..].iter().product();
    let lines = data.len() / n;
    let mut out = vec![(0.0, 0.0); data.len()];

    // sizes were bounded to u32 when the plan was created
    let grid = LaunchGrid::cover(Dim3::xy(n as u32, lines as u32), Dim3::x(block_size));
    grid.launch(|t| {
        let k = coord_x(&t) as usize;
        let line = coord_y(&t) as usize;
        if k >= n || line >= lines {
            return;
        }
        let base = (line / inner) * n * inner + line % inner;
        let mut acc = (0.0, 0.0);
        for j in 0..n {
            let angle = sign * 2.0 * PI * ((j * k) % n) as f64 / n as f64;
            let (s, c) = angle.sin_cos();
            let (re, im) = data[base + j * inner];
            acc.0 += re * c - im * s;
            acc.1 += re * s + im * c;
        }
        out[base + k * inner] = acc;
    });
    out
}

fn unravel(mut lin: usize, dims: &[usize], idx: &mut [usize]) {
    for (i, d) in idx.iter_mut().zip(dims).rev() {
        *i = lin % d;
        lin /= d;
    }
}

fn within(idx: &[usize], dims: &[usize]) -> bool {
    idx.iter().zip(dims).all(|(i, d)| i < d)
}
