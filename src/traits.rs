// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Common traits.
//!
//! - [`ValidatableConfig`] - configuration validation interface, implemented
//!   by plan shapes and device configuration.
//!
//! The native backend seam lives in [`crate::backend::FftBackend`].

use crate::error::Result;

/// Configuration validation trait.
///
/// Implementors check the parameters they carry before anything is handed
/// to the native layer.
///
/// # Example
///
/// ```rust
/// use cufft_plan::{ManyLayout, ValidatableConfig};
///
/// let layout = ManyLayout::new(vec![64, 64]).with_batch(8);
/// assert!(layout.validate().is_ok());
///
/// let layout = ManyLayout::new(vec![64, 64]).with_input(vec![64], 1, 4096);
/// assert!(layout.validate().is_err());
/// ```
pub trait ValidatableConfig: Clone + Send + Sync {
    /// Validate the configuration parameters.
    ///
    /// # Errors
    ///
    /// `FftError::InvalidArgument` for malformed layouts,
    /// `FftError::DeviceNotAvailable` for unusable device settings.
    fn validate(&self) -> Result<()>;
}
