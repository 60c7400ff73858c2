// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! CUDA-first device configuration with environment variable overrides.
//!
//! GPU execution through cuFFT is the intended path. The host backend exists
//! for tests, benchmarks and machines without CUDA; using it emits a one-time
//! warning.
//!
//! ## Environment Variables
//!
//! - `CUFFT_PLAN_FORCE_HOST` - Set to `1` or `true` to refuse CUDA devices
//! - `CUFFT_PLAN_CUDA_DEVICE` - Set to device ordinal (e.g., `0`, `1`)
//!
//! ## Example
//!
//! ```rust
//! use cufft_plan::DeviceConfig;
//!
//! let config = DeviceConfig::new().with_cuda_device(1);
//! assert_eq!(config.cuda_device, 1);
//!
//! let config = DeviceConfig::from_env();
//! # let _ = config;
//! ```

use crate::error::{FftError, Result};
use crate::traits::ValidatableConfig;
use std::sync::Once;

/// Variable forcing the host backend.
pub const FORCE_HOST_VAR: &str = "CUFFT_PLAN_FORCE_HOST";

/// Variable selecting the CUDA device ordinal.
pub const CUDA_DEVICE_VAR: &str = "CUFFT_PLAN_CUDA_DEVICE";

/// Configuration for device selection.
#[derive(Debug, Clone, Default)]
pub struct DeviceConfig {
    /// Preferred CUDA device ordinal.
    pub cuda_device: usize,
    /// Refuse CUDA devices.
    pub force_host: bool,
    /// Crate name for logging (appears in warnings).
    pub crate_name: Option<String>,
}

impl DeviceConfig {
    /// Create a new device configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the preferred CUDA device ordinal.
    #[must_use]
    pub fn with_cuda_device(mut self, ordinal: usize) -> Self {
        self.cuda_device = ordinal;
        self
    }

    /// Refuse CUDA devices.
    #[must_use]
    pub fn with_force_host(mut self, force: bool) -> Self {
        self.force_host = force;
        self
    }

    /// Set crate name for logging.
    #[must_use]
    pub fn with_crate_name(mut self, name: impl Into<String>) -> Self {
        self.crate_name = Some(name.into());
        self
    }

    /// Build configuration from [`FORCE_HOST_VAR`] and [`CUDA_DEVICE_VAR`].
    ///
    /// Unparseable values are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(val) = std::env::var(FORCE_HOST_VAR) {
            config.force_host = val == "1" || val.eq_ignore_ascii_case("true");
        }
        if let Some(ordinal) = std::env::var(CUDA_DEVICE_VAR)
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            config.cuda_device = ordinal;
        }
        config
    }

    /// Crate name used in log messages.
    #[must_use]
    pub fn crate_name(&self) -> &str {
        self.crate_name.as_deref().unwrap_or("cufft-plan")
    }
}

impl ValidatableConfig for DeviceConfig {
    fn validate(&self) -> Result<()> {
        if i32::try_from(self.cuda_device).is_err() {
            return Err(FftError::device_not_available(format!(
                "CUDA:{} (ordinal out of range)",
                self.cuda_device
            )));
        }
        Ok(())
    }
}

/// `true` if a CUDA device can be opened at `ordinal`.
#[must_use]
pub fn cuda_available(ordinal: usize) -> bool {
    #[cfg(feature = "cuda")]
    {
        cudarc::driver::CudaContext::new(ordinal).is_ok()
    }
    #[cfg(not(feature = "cuda"))]
    {
        let _ = ordinal;
        false
    }
}

/// Emit a one-time warning that transforms run on the host.
pub fn warn_if_host(crate_name: &str) {
    static WARN_ONCE: Once = Once::new();

    WARN_ONCE.call_once(|| {
        tracing::warn!(
            "{crate_name}: host FFT backend in use. cuFFT is the intended runtime; \
             the host backend is a reference implementation for tests and fallback."
        );
    });
}
