// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Error types for plan construction, execution and stream binding.
//!
//! ## Error Hierarchy
//!
//! ```text
//! FftError
//! ├── InvalidArgument     - bad plan handle, bad parameters, unsupported size
//! ├── OutOfMemory         - native allocation failure
//! ├── Runtime             - internal, setup and execution faults, unknown codes
//! └── DeviceNotAvailable  - requested CUDA device could not be opened
//! ```
//!
//! The first three variants carry the [`FftStatus`] they were translated from
//! (see [`crate::status::check`]), so callers can distinguish the four
//! runtime-mapped codes even though they share a kind.

use crate::status::FftStatus;
use thiserror::Error;

/// Result type alias for plan operations.
pub type Result<T> = std::result::Result<T, FftError>;

/// Coarse classification of an [`FftError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad handle, bad parameters or unsupported size.
    InvalidArgument,
    /// Allocation failure.
    OutOfMemory,
    /// Driver, setup or execution fault.
    Runtime,
    /// Device selection failed.
    DeviceNotAvailable,
}

/// Failures reported by plans and backends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FftError {
    /// The native layer rejected an argument, or a plan was unusable.
    #[error("invalid argument ({status}): {message}")]
    InvalidArgument {
        /// Originating native status.
        status: FftStatus,
        /// Descriptive message.
        message: String,
    },

    /// The native layer could not allocate memory.
    #[error("out of memory ({status}): {message}")]
    OutOfMemory {
        /// Originating native status.
        status: FftStatus,
        /// Descriptive message.
        message: String,
    },

    /// Internal, setup or execution fault.
    #[error("runtime error ({status}): {message}")]
    Runtime {
        /// Originating native status.
        status: FftStatus,
        /// Descriptive message.
        message: String,
    },

    /// Requested device is not available.
    #[error("device not available: {device}")]
    DeviceNotAvailable {
        /// Description of the device.
        device: String,
    },
}

impl FftError {
    /// Create an invalid argument error.
    pub fn invalid_argument(status: FftStatus, msg: impl Into<String>) -> Self {
        Self::InvalidArgument {
            status,
            message: msg.into(),
        }
    }

    /// Create an out of memory error.
    pub fn out_of_memory(status: FftStatus, msg: impl Into<String>) -> Self {
        Self::OutOfMemory {
            status,
            message: msg.into(),
        }
    }

    /// Create a runtime error.
    pub fn runtime(status: FftStatus, msg: impl Into<String>) -> Self {
        Self::Runtime {
            status,
            message: msg.into(),
        }
    }

    /// Create a device not available error.
    pub fn device_not_available(device: impl Into<String>) -> Self {
        Self::DeviceNotAvailable {
            device: device.into(),
        }
    }

    /// The failure kind.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::OutOfMemory { .. } => ErrorKind::OutOfMemory,
            Self::Runtime { .. } => ErrorKind::Runtime,
            Self::DeviceNotAvailable { .. } => ErrorKind::DeviceNotAvailable,
        }
    }

    /// The native status this error was translated from, if any.
    #[must_use]
    pub fn status(&self) -> Option<FftStatus> {
        match self {
            Self::InvalidArgument { status, .. }
            | Self::OutOfMemory { status, .. }
            | Self::Runtime { status, .. } => Some(*status),
            Self::DeviceNotAvailable { .. } => None,
        }
    }

    /// The descriptive message without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArgument { message, .. }
            | Self::OutOfMemory { message, .. }
            | Self::Runtime { message, .. } => message,
            Self::DeviceNotAvailable { device } => device,
        }
    }
}

#[cfg(feature = "cuda")]
impl From<cudarc::driver::DriverError> for FftError {
    fn from(err: cudarc::driver::DriverError) -> Self {
        Self::DeviceNotAvailable {
            device: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FftError::invalid_argument(FftStatus::InvalidSize, "nx must be positive");
        assert_eq!(
            err.to_string(),
            "invalid argument (CUFFT_INVALID_SIZE): nx must be positive"
        );

        let err = FftError::device_not_available("CUDA:5");
        assert!(err.to_string().contains("CUDA:5"));
    }

    #[test]
    fn test_kind_and_status() {
        let err = FftError::out_of_memory(FftStatus::AllocFailed, "no memory");
        assert_eq!(err.kind(), ErrorKind::OutOfMemory);
        assert_eq!(err.status(), Some(FftStatus::AllocFailed));
        assert_eq!(err.message(), "no memory");

        let err = FftError::device_not_available("CUDA:1");
        assert_eq!(err.kind(), ErrorKind::DeviceNotAvailable);
        assert_eq!(err.status(), None);
    }
}
