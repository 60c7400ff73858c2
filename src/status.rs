// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Native cuFFT status codes and their translation into [`FftError`].
//!
//! Every call into the native layer yields an [`FftStatus`]. [`check`] is the
//! single place where a status becomes either `Ok(())` or a structured error;
//! no raw numeric code ever reaches a caller.

use crate::error::{FftError, Result};

/// Status reported by a native FFT call.
///
/// The numeric values follow `cufftResult`. Codes this crate does not model
/// individually are kept verbatim in [`FftStatus::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FftStatus {
    /// The call completed.
    Success,
    /// The plan argument is not a live plan handle.
    InvalidPlan,
    /// Device memory allocation failed.
    AllocFailed,
    /// One or more parameters were rejected.
    InvalidValue,
    /// Driver-level fault.
    InternalError,
    /// The transform failed on the device.
    ExecFailed,
    /// The library failed to initialize.
    SetupFailed,
    /// A size parameter is not supported.
    InvalidSize,
    /// Any other native code.
    Other(i32),
}

impl FftStatus {
    /// Decode a raw `cufftResult` value.
    #[must_use]
    pub const fn from_raw(code: i32) -> Self {
        match code {
            0 => Self::Success,
            1 => Self::InvalidPlan,
            2 => Self::AllocFailed,
            4 => Self::InvalidValue,
            5 => Self::InternalError,
            6 => Self::ExecFailed,
            7 => Self::SetupFailed,
            8 => Self::InvalidSize,
            other => Self::Other(other),
        }
    }

    /// The raw `cufftResult` value.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::InvalidPlan => 1,
            Self::AllocFailed => 2,
            Self::InvalidValue => 4,
            Self::InternalError => 5,
            Self::ExecFailed => 6,
            Self::SetupFailed => 7,
            Self::InvalidSize => 8,
            Self::Other(code) => code,
        }
    }

    /// `true` for [`FftStatus::Success`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl std::fmt::Display for FftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Success => "CUFFT_SUCCESS",
            Self::InvalidPlan => "CUFFT_INVALID_PLAN",
            Self::AllocFailed => "CUFFT_ALLOC_FAILED",
            Self::InvalidValue => "CUFFT_INVALID_VALUE",
            Self::InternalError => "CUFFT_INTERNAL_ERROR",
            Self::ExecFailed => "CUFFT_EXEC_FAILED",
            Self::SetupFailed => "CUFFT_SETUP_FAILED",
            Self::InvalidSize => "CUFFT_INVALID_SIZE",
            Self::Other(code) => return write!(f, "cufftResult({code})"),
        };
        f.write_str(name)
    }
}

/// Translate a native status into `Ok(())` or the matching [`FftError`].
///
/// # Errors
///
/// Returns an error for every status other than [`FftStatus::Success`].
pub fn check(status: FftStatus) -> Result<()> {
    let err = match status {
        FftStatus::Success => return Ok(()),
        FftStatus::InvalidPlan => {
            FftError::invalid_argument(status, "the plan parameter is not a valid handle")
        }
        FftStatus::AllocFailed => {
            FftError::out_of_memory(status, "cuFFT failed to allocate GPU or CPU memory")
        }
        FftStatus::InvalidValue => FftError::invalid_argument(
            status,
            "one or more invalid parameters were passed to the API",
        ),
        FftStatus::InternalError => {
            FftError::runtime(status, "an internal driver error was detected")
        }
        FftStatus::ExecFailed => {
            FftError::runtime(status, "cuFFT failed to execute the transform on the GPU")
        }
        FftStatus::SetupFailed => {
            FftError::runtime(status, "the cuFFT library failed to initialize")
        }
        FftStatus::InvalidSize => FftError::invalid_argument(
            status,
            "one or more of the parameters is not a supported size",
        ),
        FftStatus::Other(code) => FftError::runtime(status, format!("unknown error (code {code})")),
    };
    Err(err)
}
