// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! cuFFT backend.
//!
//! Plans live in the CUDA context the backend was opened on and start out
//! bound to the backend's stream. Buffers are `cudarc` device slices;
//! pointers are taken on the stream the plan executes on so `cudarc`
//! records the accesses against it.

use super::{FftBackend, RawPlan, NULL_PLAN};
use crate::device::DeviceConfig;
use crate::element::{Complex32, Complex64, Element};
use crate::error::{FftError, Result};
use crate::kind::{Direction, TransformType};
use crate::logging::CUDA_TARGET;
use crate::shape::PlanShape;
use crate::status::FftStatus;
use crate::traits::ValidatableConfig;
use cudarc::cufft::sys;
use cudarc::driver::{CudaContext, CudaSlice, CudaStream, DevicePtr, DevicePtrMut};
use std::ffi::c_int;
use std::sync::Arc;

/// cuFFT runtime bound to one CUDA context.
#[derive(Debug, Clone)]
pub struct CudaBackend {
    ctx: Arc<CudaContext>,
    stream: Arc<CudaStream>,
}

impl CudaBackend {
    /// Open device `ordinal` and use its default stream.
    ///
    /// # Errors
    ///
    /// `DeviceNotAvailable` if the device cannot be opened.
    pub fn new(ordinal: usize) -> Result<Self> {
        let ctx = CudaContext::new(ordinal)?;
        let stream = ctx.default_stream();
        tracing::debug!(target: CUDA_TARGET, ordinal, "CUDA context opened");
        Ok(Self { ctx, stream })
    }

    /// Open the device selected by `config`.
    ///
    /// # Errors
    ///
    /// `DeviceNotAvailable` if the configuration forces the host backend or
    /// names a device that cannot be opened.
    pub fn from_config(config: &DeviceConfig) -> Result<Self> {
        config.validate()?;
        if config.force_host {
            return Err(FftError::device_not_available(format!(
                "CUDA:{} ({} forced to host)",
                config.cuda_device,
                config.crate_name()
            )));
        }
        Self::new(config.cuda_device)
    }

    /// Use an existing stream and its context.
    #[must_use]
    pub fn from_stream(stream: Arc<CudaStream>) -> Self {
        Self {
            ctx: stream.context().clone(),
            stream,
        }
    }

    /// The CUDA context plans are created in.
    #[must_use]
    pub fn context(&self) -> &Arc<CudaContext> {
        &self.ctx
    }

    /// Stream used to order buffer accesses.
    #[must_use]
    pub fn stream(&self) -> &Arc<CudaStream> {
        &self.stream
    }

    fn bind(&self) -> FftStatus {
        match self.ctx.bind_to_thread() {
            Ok(()) => FftStatus::Success,
            Err(err) => {
                tracing::debug!(target: CUDA_TARGET, error = %err, "bind_to_thread failed");
                FftStatus::SetupFailed
            }
        }
    }
}

fn native_type(ty: TransformType) -> sys::cufftType {
    match ty {
        TransformType::R2C => sys::cufftType::CUFFT_R2C,
        TransformType::C2R => sys::cufftType::CUFFT_C2R,
        TransformType::C2C => sys::cufftType::CUFFT_C2C,
        TransformType::D2Z => sys::cufftType::CUFFT_D2Z,
        TransformType::Z2D => sys::cufftType::CUFFT_Z2D,
        TransformType::Z2Z => sys::cufftType::CUFFT_Z2Z,
    }
}

fn status(res: sys::cufftResult) -> FftStatus {
    FftStatus::from_raw(res as i32)
}

impl FftBackend for CudaBackend {
    type Stream = Arc<CudaStream>;
    type Memory<T: Element> = CudaSlice<T>;

    fn name(&self) -> &'static str {
        "cuda"
    }

    fn create(&self, shape: &PlanShape, ty: TransformType, handle: &mut RawPlan) -> FftStatus {
        let bound = self.bind();
        if !bound.is_success() {
            return bound;
        }
        let native = native_type(ty);
        let res = match shape {
            // SAFETY: `handle` is a valid out-pointer for the duration of the call.
            PlanShape::OneD { nx, batch } => unsafe { sys::cufftPlan1d(handle, *nx, native, *batch) },
            // SAFETY: as above.
            PlanShape::TwoD { nx, ny } => unsafe { sys::cufftPlan2d(handle, *nx, *ny, native) },
            // SAFETY: as above.
            PlanShape::ThreeD { nx, ny, nz } => unsafe {
                sys::cufftPlan3d(handle, *nx, *ny, *nz, native)
            },
            PlanShape::Many(layout) => {
                let mut n: Vec<c_int> = layout.dims.clone();
                let mut inembed = layout.inembed.clone();
                let mut onembed = layout.onembed.clone();
                let inembed_ptr = inembed
                    .as_mut()
                    .map_or(std::ptr::null_mut(), |v| v.as_mut_ptr());
                let onembed_ptr = onembed
                    .as_mut()
                    .map_or(std::ptr::null_mut(), |v| v.as_mut_ptr());
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let rank = n.len() as c_int;
                // SAFETY: `n` has `rank` entries and the embeddings were
                // validated to the same length; all vectors outlive the call.
                unsafe {
                    sys::cufftPlanMany(
                        handle,
                        rank,
                        n.as_mut_ptr(),
                        inembed_ptr,
                        layout.istride,
                        layout.idist,
                        onembed_ptr,
                        layout.ostride,
                        layout.odist,
                        native,
                        layout.batch,
                    )
                }
            }
        };
        let created = status(res);
        if !created.is_success() {
            return created;
        }
        // SAFETY: `handle` was just created; the backend keeps its stream alive.
        let bound = status(unsafe { sys::cufftSetStream(*handle, self.stream.cu_stream() as _) });
        if !bound.is_success() {
            // SAFETY: the handle never reaches a `Plan`, so this is its only destroy.
            let _ = unsafe { sys::cufftDestroy(*handle) };
            *handle = NULL_PLAN;
        }
        bound
    }

    fn destroy(&self, handle: RawPlan) -> FftStatus {
        let bound = self.bind();
        if !bound.is_success() {
            return bound;
        }
        // SAFETY: the owning plan destroys each handle at most once.
        status(unsafe { sys::cufftDestroy(handle) })
    }

    fn set_stream(&self, handle: RawPlan, stream: &Arc<CudaStream>) -> FftStatus {
        let bound = self.bind();
        if !bound.is_success() {
            return bound;
        }
        // SAFETY: the stream is kept alive by the plan that binds it.
        status(unsafe { sys::cufftSetStream(handle, stream.cu_stream() as _) })
    }

    fn exec_r2c(
        &self,
        handle: RawPlan,
        input: &mut CudaSlice<f32>,
        output: &mut CudaSlice<Complex32>,
        stream: Option<&Arc<CudaStream>>,
    ) -> FftStatus {
        let stream = stream.unwrap_or(&self.stream);
        let (idata, _ri) = input.device_ptr(stream);
        let (odata, _ro) = output.device_ptr_mut(stream);
        // SAFETY: both pointers address live device allocations of the
        // planned element types.
        status(unsafe {
            sys::cufftExecR2C(handle, idata as *mut sys::cufftReal, odata as *mut sys::cufftComplex)
        })
    }

    fn exec_c2r(
        &self,
        handle: RawPlan,
        input: &mut CudaSlice<Complex32>,
        output: &mut CudaSlice<f32>,
        stream: Option<&Arc<CudaStream>>,
    ) -> FftStatus {
        let stream = stream.unwrap_or(&self.stream);
        let (idata, _ri) = input.device_ptr_mut(stream);
        let (odata, _ro) = output.device_ptr_mut(stream);
        // SAFETY: see `exec_r2c`.
        status(unsafe {
            sys::cufftExecC2R(handle, idata as *mut sys::cufftComplex, odata as *mut sys::cufftReal)
        })
    }

    fn exec_c2c(
        &self,
        handle: RawPlan,
        input: &mut CudaSlice<Complex32>,
        output: &mut CudaSlice<Complex32>,
        direction: Direction,
        stream: Option<&Arc<CudaStream>>,
    ) -> FftStatus {
        let stream = stream.unwrap_or(&self.stream);
        let (idata, _ri) = input.device_ptr_mut(stream);
        let (odata, _ro) = output.device_ptr_mut(stream);
        // SAFETY: see `exec_r2c`.
        status(unsafe {
            sys::cufftExecC2C(
                handle,
                idata as *mut sys::cufftComplex,
                odata as *mut sys::cufftComplex,
                direction.sign(),
            )
        })
    }

    fn exec_d2z(
        &self,
        handle: RawPlan,
        input: &mut CudaSlice<f64>,
        output: &mut CudaSlice<Complex64>,
        stream: Option<&Arc<CudaStream>>,
    ) -> FftStatus {
        let stream = stream.unwrap_or(&self.stream);
        let (idata, _ri) = input.device_ptr(stream);
        let (odata, _ro) = output.device_ptr_mut(stream);
        // SAFETY: see `exec_r2c`.
        status(unsafe {
            sys::cufftExecD2Z(
                handle,
                idata as *mut sys::cufftDoubleReal,
                odata as *mut sys::cufftDoubleComplex,
            )
        })
    }

    fn exec_z2d(
        &self,
        handle: RawPlan,
        input: &mut CudaSlice<Complex64>,
        output: &mut CudaSlice<f64>,
        stream: Option<&Arc<CudaStream>>,
    ) -> FftStatus {
        let stream = stream.unwrap_or(&self.stream);
        let (idata, _ri) = input.device_ptr_mut(stream);
        let (odata, _ro) = output.device_ptr_mut(stream);
        // SAFETY: see `exec_r2c`.
        status(unsafe {
            sys::cufftExecZ2D(
                handle,
                idata as *mut sys::cufftDoubleComplex,
                odata as *mut sys::cufftDoubleReal,
            )
        })
    }

    fn exec_z2z(
        &self,
        handle: RawPlan,
        input: &mut CudaSlice<Complex64>,
        output: &mut CudaSlice<Complex64>,
        direction: Direction,
        stream: Option<&Arc<CudaStream>>,
    ) -> FftStatus {
        let stream = stream.unwrap_or(&self.stream);
        let (idata, _ri) = input.device_ptr_mut(stream);
        let (odata, _ro) = output.device_ptr_mut(stream);
        // SAFETY: see `exec_r2c`.
        status(unsafe {
            sys::cufftExecZ2Z(
                handle,
                idata as *mut sys::cufftDoubleComplex,
                odata as *mut sys::cufftDoubleComplex,
                direction.sign(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::{C2C, R2C};
    use crate::plan::Plan;

    #[test]
    fn test_native_type_mapping() {
        assert_eq!(native_type(TransformType::Z2D) as i32, TransformType::Z2D.code());
        assert_eq!(native_type(TransformType::R2C) as i32, TransformType::R2C.code());
    }

    #[test]
    fn test_forced_host_refuses_device() {
        let config = DeviceConfig::new().with_force_host(true);
        let err = CudaBackend::from_config(&config).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::DeviceNotAvailable);
    }

    #[test]
    #[ignore = "requires a CUDA device"]
    fn test_r2c_on_device() {
        let backend = CudaBackend::new(0).unwrap();
        let stream = backend.stream().clone();
        let mut plan = Plan::<R2C, _>::new_1d(backend, 8).unwrap();

        let mut input = stream.memcpy_stod(&[1.0f32; 8]).unwrap();
        let mut output = stream.alloc_zeros::<Complex32>(5).unwrap();
        plan.execute(&mut input, &mut output).unwrap();

        let host = stream.memcpy_dtov(&output).unwrap();
        assert!((host[0].re - 8.0).abs() < 1e-4);
        assert!(host[1..].iter().all(|c| c.norm() < 1e-4));
    }

    #[test]
    #[ignore = "requires a CUDA device"]
    fn test_execute_on_bound_stream() {
        let backend = CudaBackend::new(0).unwrap();
        let other = backend.context().new_stream().unwrap();
        let mut plan = Plan::<C2C, _>::new_2d(backend, 16, 16).unwrap();
        plan.set_stream(other.clone()).unwrap();
        assert!(plan.stream().is_some_and(|s| Arc::ptr_eq(s, &other)));

        let mut impulse = vec![Complex32::ZERO; 256];
        impulse[0] = Complex32::new(1.0, 0.0);
        let mut input = other.memcpy_stod(&impulse).unwrap();
        let mut output = other.alloc_zeros::<Complex32>(256).unwrap();
        plan.execute_with_direction(&mut input, &mut output, Direction::Forward)
            .unwrap();

        let host = other.memcpy_dtov(&output).unwrap();
        assert!(host
            .iter()
            .all(|c| (c.re - 1.0).abs() < 1e-5 && c.im.abs() < 1e-5));
    }
}
