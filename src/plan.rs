// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! RAII handle around a native FFT plan.
//!
//! A [`Plan`] owns at most one native plan handle. The transform kind `K` is
//! part of the type, so the element types of every execution are checked at
//! compile time, and the handle is released exactly once, when the owning
//! value is dropped.
//!
//! ## Ownership
//!
//! Plans are move-only. There is no `Clone`: two values claiming the same
//! native handle would both try to destroy it. Instead:
//!
//! - [`Plan::take`] moves the handle out and leaves an empty plan behind,
//!   so `*b = a.take()` is move-assignment (b's old handle is destroyed);
//! - [`SharedPlan`] shares one handle between owners and destroys it when
//!   the last owner goes away;
//! - [`Plan::duplicate`] re-plans the same shape into a new, independent
//!   handle.
//!
//! ## Execution
//!
//! Kinds whose input and output types differ ([`R2C`](crate::R2C),
//! [`C2R`](crate::C2R), [`D2Z`](crate::D2Z), [`Z2D`](crate::Z2D)) expose
//! [`Plan::execute`]; complex-to-complex kinds ([`C2C`](crate::C2C),
//! [`Z2Z`](crate::Z2Z)) expose [`Plan::execute_with_direction`]. Any other
//! combination does not compile.

use crate::backend::{FftBackend, HostBackend, RawPlan, NULL_PLAN};
use crate::element::Element;
use crate::error::{FftError, Result};
use crate::kind::{Directed, Direction, Directionless, TransformKind, TransformType};
use crate::logging::PLAN_TARGET;
use crate::memory::{estimate_plan_buffers, PlanFootprint};
use crate::shape::{ManyLayout, PlanShape};
use crate::status::{check, FftStatus};
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Plan executed by the host reference backend.
pub type HostPlan<K> = Plan<K, HostBackend>;

/// Plan executed by cuFFT.
#[cfg(feature = "cuda")]
pub type CudaPlan<K> = Plan<K, crate::backend::CudaBackend>;

/// Owned native FFT plan of kind `K` on backend `B`.
///
/// # Example
///
/// ```rust
/// use cufft_plan::{Complex32, HostBackend, Plan, R2C};
///
/// let backend = HostBackend::new();
/// let mut plan = Plan::<R2C, _>::new_1d(backend, 8)?;
///
/// let mut signal = [1.0f32; 8];
/// let mut spectrum = [Complex32::ZERO; 5];
/// plan.execute(&mut signal[..], &mut spectrum[..])?;
/// assert_eq!(spectrum[0], Complex32::new(8.0, 0.0));
/// # Ok::<(), cufft_plan::FftError>(())
/// ```
///
/// Complex-to-complex plans have no directionless entry point:
///
/// ```compile_fail
/// use cufft_plan::{Complex32, HostBackend, Plan, C2C};
///
/// let mut plan = Plan::<C2C, _>::new_1d(HostBackend::new(), 4).unwrap();
/// let mut a = [Complex32::ZERO; 4];
/// let mut b = [Complex32::ZERO; 4];
/// plan.execute(&mut a[..], &mut b[..]).unwrap();
/// ```
///
/// Real/complex plans take no direction:
///
/// ```compile_fail
/// use cufft_plan::{Complex32, Direction, HostBackend, Plan, R2C};
///
/// let mut plan = Plan::<R2C, _>::new_1d(HostBackend::new(), 8).unwrap();
/// let mut a = [0.0f32; 8];
/// let mut b = [Complex32::ZERO; 5];
/// plan.execute_with_direction(&mut a[..], &mut b[..], Direction::Forward).unwrap();
/// ```
///
/// Element types must match the plan's kind:
///
/// ```compile_fail
/// use cufft_plan::{Complex64, HostBackend, Plan, R2C};
///
/// let mut plan = Plan::<R2C, _>::new_1d(HostBackend::new(), 8).unwrap();
/// let mut a = [0.0f64; 8];
/// let mut b = [Complex64::ZERO; 5];
/// plan.execute(&mut a[..], &mut b[..]).unwrap();
/// ```
///
/// and single-precision real input never pairs with double-precision output:
///
/// ```compile_fail
/// use cufft_plan::{Complex64, HostBackend, Plan, R2C};
///
/// let mut plan = Plan::<R2C, _>::new_1d(HostBackend::new(), 8).unwrap();
/// let mut a = [0.0f32; 8];
/// let mut b = [Complex64::ZERO; 5];
/// plan.execute(&mut a[..], &mut b[..]).unwrap();
/// ```
pub struct Plan<K: TransformKind, B: FftBackend> {
    handle: RawPlan,
    valid: bool,
    shape: Option<PlanShape>,
    stream: Option<B::Stream>,
    backend: B,
    _kind: PhantomData<K>,
}

impl<K: TransformKind, B: FftBackend> Plan<K, B> {
    /// Native transform type of this plan.
    pub const TRANSFORM_TYPE: TransformType = K::TYPE;

    /// A plan without a native handle. Nothing is allocated or released.
    #[must_use]
    pub fn empty(backend: B) -> Self {
        Self {
            handle: NULL_PLAN,
            valid: false,
            shape: None,
            stream: None,
            backend,
            _kind: PhantomData,
        }
    }

    /// 1-D plan of length `nx`, batch count 1.
    ///
    /// # Errors
    ///
    /// Returns the translated native status if planning fails.
    pub fn new_1d(backend: B, nx: i32) -> Result<Self> {
        Self::with_shape(backend, PlanShape::OneD { nx, batch: 1 })
    }

    /// 1-D plan of length `nx` executing `batch` transforms per call.
    ///
    /// # Errors
    ///
    /// Returns the translated native status if planning fails.
    pub fn new_1d_batched(backend: B, nx: i32, batch: i32) -> Result<Self> {
        Self::with_shape(backend, PlanShape::OneD { nx, batch })
    }

    /// 2-D plan, `nx` slowest.
    ///
    /// # Errors
    ///
    /// Returns the translated native status if planning fails.
    pub fn new_2d(backend: B, nx: i32, ny: i32) -> Result<Self> {
        Self::with_shape(backend, PlanShape::TwoD { nx, ny })
    }

    /// 3-D plan, `nx` slowest.
    ///
    /// # Errors
    ///
    /// Returns the translated native status if planning fails.
    pub fn new_3d(backend: B, nx: i32, ny: i32, nz: i32) -> Result<Self> {
        Self::with_shape(backend, PlanShape::ThreeD { nx, ny, nz })
    }

    /// Strided, padded and batched plan.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the layout's rank or embeddings are malformed,
    /// its sizes are not positive, or its buffer extent overflows `usize`;
    /// otherwise the translated native status if planning fails.
    pub fn new_many(backend: B, layout: ManyLayout) -> Result<Self> {
        Self::with_shape(backend, PlanShape::Many(layout))
    }

    /// Plan any [`PlanShape`].
    ///
    /// On failure no plan exists, so nothing is ever executed on or
    /// released for the failed handle.
    ///
    /// # Errors
    ///
    /// See [`Plan::new_many`].
    pub fn with_shape(backend: B, shape: PlanShape) -> Result<Self> {
        // buffer extents must be addressable before the native planner sees the layout
        shape.resolve(K::TYPE)?;
        let mut handle = NULL_PLAN;
        check(backend.create(&shape, K::TYPE, &mut handle))?;
        tracing::debug!(
            target: PLAN_TARGET,
            handle,
            kind = %K::TYPE,
            backend = backend.name(),
            dims = ?shape.dims(),
            batch = shape.batch(),
            "plan created"
        );
        Ok(Self {
            handle,
            valid: true,
            shape: Some(shape),
            stream: None,
            backend,
            _kind: PhantomData,
        })
    }

    /// Adopt a native handle.
    ///
    /// # Safety
    ///
    /// `handle` must be a live plan of transform type `K::TYPE` created on
    /// `backend`, and no other owner may destroy it.
    pub unsafe fn from_raw(backend: B, handle: RawPlan, shape: Option<PlanShape>) -> Self {
        Self {
            handle,
            valid: true,
            shape,
            stream: None,
            backend,
            _kind: PhantomData,
        }
    }

    /// `true` while the plan owns a native handle.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The native handle, `0` for an empty plan.
    #[must_use]
    pub fn raw_handle(&self) -> RawPlan {
        if self.valid {
            self.handle
        } else {
            NULL_PLAN
        }
    }

    /// Native transform type of this plan.
    #[must_use]
    pub fn transform_type(&self) -> TransformType {
        K::TYPE
    }

    /// Shape the plan was created with.
    #[must_use]
    pub fn shape(&self) -> Option<&PlanShape> {
        self.shape.as_ref()
    }

    /// Stream bound by the last successful [`Plan::set_stream`].
    #[must_use]
    pub fn stream(&self) -> Option<&B::Stream> {
        self.stream.as_ref()
    }

    /// Backend the plan was created on.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Buffer extents an execution of this plan reads and writes.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty plan or a plan adopted without a shape.
    pub fn footprint(&self) -> Result<PlanFootprint> {
        let shape = self.shape.as_ref().ok_or_else(|| {
            FftError::invalid_argument(FftStatus::InvalidPlan, "plan has no recorded shape")
        })?;
        estimate_plan_buffers(shape, K::TYPE)
    }

    /// Order subsequent executions on `stream`. The last call wins.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty plan, otherwise the translated native
    /// status.
    pub fn set_stream(&mut self, stream: B::Stream) -> Result<()> {
        let handle = self.live_handle()?;
        check(self.backend.set_stream(handle, &stream))?;
        tracing::debug!(target: PLAN_TARGET, handle, "stream bound");
        self.stream = Some(stream);
        Ok(())
    }

    /// Move the handle out, leaving `self` empty.
    #[must_use]
    pub fn take(&mut self) -> Self {
        let empty = Self::empty(self.backend.clone());
        std::mem::replace(self, empty)
    }

    /// Give up ownership of the handle without destroying it.
    ///
    /// Returns `None` for an empty plan.
    #[must_use]
    pub fn into_raw(mut self) -> Option<RawPlan> {
        if !self.valid {
            return None;
        }
        self.valid = false;
        Some(self.handle)
    }

    /// Plan the same shape again into an independent handle, bound to the
    /// same stream.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty or shapeless plan, otherwise the
    /// translated native status.
    pub fn duplicate(&self) -> Result<Self> {
        self.live_handle()?;
        let shape = self.shape.clone().ok_or_else(|| {
            FftError::invalid_argument(FftStatus::InvalidPlan, "plan has no recorded shape")
        })?;
        let mut copy = Self::with_shape(self.backend.clone(), shape)?;
        if let Some(stream) = &self.stream {
            copy.set_stream(stream.clone())?;
        }
        Ok(copy)
    }

    /// Share this plan between several owners.
    #[must_use]
    pub fn into_shared(self) -> SharedPlan<K, B> {
        SharedPlan::new(self)
    }

    fn live_handle(&self) -> Result<RawPlan> {
        if self.valid {
            Ok(self.handle)
        } else {
            Err(FftError::invalid_argument(
                FftStatus::InvalidPlan,
                "the plan holds no native handle",
            ))
        }
    }
}

impl<K: Directionless, B: FftBackend> Plan<K, B> {
    /// Execute a transform between different element types.
    ///
    /// The direction is implied: real-to-complex is forward, complex-to-real
    /// is inverse. The input of a complex-to-real transform may be
    /// overwritten by the native library.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty plan, otherwise the translated native
    /// status.
    pub fn execute(
        &mut self,
        input: &mut B::Memory<K::Input>,
        output: &mut B::Memory<K::Output>,
    ) -> Result<()>
    where
        K::Input: Element<Paired = K::Output>,
    {
        let handle = self.live_handle()?;
        tracing::trace!(
            target: PLAN_TARGET,
            handle,
            kind = %K::TYPE,
            input = <K::Input as Element>::NAME,
            output = <K::Output as Element>::NAME,
            "execute"
        );
        check(K::dispatch(&self.backend, handle, input, output, self.stream.as_ref()))
    }
}

impl<K: Directed, B: FftBackend> Plan<K, B> {
    /// Execute a complex-to-complex transform in `direction`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty plan, otherwise the translated native
    /// status.
    pub fn execute_with_direction(
        &mut self,
        input: &mut B::Memory<K::Input>,
        output: &mut B::Memory<K::Output>,
        direction: Direction,
    ) -> Result<()> {
        let handle = self.live_handle()?;
        tracing::trace!(
            target: PLAN_TARGET,
            handle,
            kind = %K::TYPE,
            ?direction,
            "execute"
        );
        check(K::dispatch(
            &self.backend,
            handle,
            input,
            output,
            direction,
            self.stream.as_ref(),
        ))
    }
}

impl<K: TransformKind, B: FftBackend> Drop for Plan<K, B> {
    fn drop(&mut self) {
        if !self.valid {
            return;
        }
        self.valid = false;
        match check(self.backend.destroy(self.handle)) {
            Ok(()) => tracing::debug!(target: PLAN_TARGET, handle = self.handle, "plan destroyed"),
            Err(err) => tracing::warn!(
                target: PLAN_TARGET,
                handle = self.handle,
                error = %err,
                "failed to destroy plan"
            ),
        }
    }
}

impl<K: TransformKind, B: FftBackend + Default> Default for Plan<K, B> {
    fn default() -> Self {
        Self::empty(B::default())
    }
}

impl<K: TransformKind, B: FftBackend> fmt::Debug for Plan<K, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan")
            .field("handle", &self.raw_handle())
            .field("valid", &self.valid)
            .field("kind", &K::TYPE)
            .field("shape", &self.shape)
            .field("backend", &self.backend.name())
            .finish_non_exhaustive()
    }
}

/// A plan shared between owners; the handle is destroyed once, with the
/// last owner.
///
/// Access is serialized through a mutex.
///
/// ```rust
/// use cufft_plan::{Complex64, Direction, HostBackend, Plan, Z2Z};
///
/// let shared = Plan::<Z2Z, _>::new_1d(HostBackend::new(), 4)?.into_shared();
/// let other = shared.clone();
///
/// let mut x = [Complex64::new(1.0, 0.0); 4];
/// let mut y = [Complex64::ZERO; 4];
/// other.lock().execute_with_direction(&mut x[..], &mut y[..], Direction::Forward)?;
/// assert_eq!(shared.owners(), 2);
/// # Ok::<(), cufft_plan::FftError>(())
/// ```
pub struct SharedPlan<K: TransformKind, B: FftBackend> {
    inner: Arc<Mutex<Plan<K, B>>>,
}

impl<K: TransformKind, B: FftBackend> SharedPlan<K, B> {
    /// Wrap an owned plan.
    #[must_use]
    pub fn new(plan: Plan<K, B>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(plan)),
        }
    }

    /// Exclusive access to the plan.
    pub fn lock(&self) -> MutexGuard<'_, Plan<K, B>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of owners.
    #[must_use]
    pub fn owners(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Recover the plan if this is the only owner.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged while other owners exist.
    pub fn try_unwrap(self) -> std::result::Result<Plan<K, B>, Self> {
        Arc::try_unwrap(self.inner)
            .map(|m| m.into_inner().unwrap_or_else(PoisonError::into_inner))
            .map_err(|inner| Self { inner })
    }
}

impl<K: TransformKind, B: FftBackend> Clone for SharedPlan<K, B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: TransformKind, B: FftBackend> fmt::Debug for SharedPlan<K, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedPlan")
            .field("owners", &self.owners())
            .finish_non_exhaustive()
    }
}

impl<K: TransformKind, B: FftBackend> From<Plan<K, B>> for SharedPlan<K, B> {
    fn from(plan: Plan<K, B>) -> Self {
        Self::new(plan)
    }
}
