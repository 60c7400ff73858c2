// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Transform kinds, bound to a plan at the type level.
//!
//! Each of the six cuFFT transform types has a zero-sized marker type
//! implementing [`TransformKind`]. The marker fixes the input and output
//! element types, and one of two dispatch traits decides which execution
//! entry point exists on the plan:
//!
//! | Marker | Input | Output | Entry point |
//! |--------|-------|--------|-------------|
//! | [`R2C`] | `f32` | [`Complex32`] | [`Directionless`] |
//! | [`C2R`] | [`Complex32`] | `f32` | [`Directionless`] |
//! | [`C2C`] | [`Complex32`] | [`Complex32`] | [`Directed`] |
//! | [`D2Z`] | `f64` | [`Complex64`] | [`Directionless`] |
//! | [`Z2D`] | [`Complex64`] | `f64` | [`Directionless`] |
//! | [`Z2Z`] | [`Complex64`] | [`Complex64`] | [`Directed`] |

use crate::backend::{FftBackend, RawPlan};
use crate::element::{Complex32, Complex64, Element};
use crate::status::FftStatus;
use std::fmt;

mod private {
    pub trait Sealed {}
}

/// Runtime mirror of the six native transform types.
///
/// Discriminants are the `cufftType` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum TransformType {
    /// Single-precision real to complex.
    R2C = 0x2a,
    /// Single-precision complex to real.
    C2R = 0x2c,
    /// Single-precision complex to complex.
    C2C = 0x29,
    /// Double-precision real to complex.
    D2Z = 0x6a,
    /// Double-precision complex to real.
    Z2D = 0x6c,
    /// Double-precision complex to complex.
    Z2Z = 0x69,
}

impl TransformType {
    /// The raw `cufftType` value.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// `true` when the input is real.
    #[must_use]
    pub const fn is_forward_real(self) -> bool {
        matches!(self, Self::R2C | Self::D2Z)
    }

    /// `true` when the output is real.
    #[must_use]
    pub const fn is_inverse_real(self) -> bool {
        matches!(self, Self::C2R | Self::Z2D)
    }

    /// `true` for double-precision transforms.
    #[must_use]
    pub const fn is_double(self) -> bool {
        matches!(self, Self::D2Z | Self::Z2D | Self::Z2Z)
    }

    /// Element size in bytes of the input buffer.
    #[must_use]
    pub const fn input_element_bytes(self) -> usize {
        match self {
            Self::R2C => 4,
            Self::C2R | Self::C2C | Self::D2Z => 8,
            Self::Z2D | Self::Z2Z => 16,
        }
    }

    /// Element size in bytes of the output buffer.
    #[must_use]
    pub const fn output_element_bytes(self) -> usize {
        match self {
            Self::C2R => 4,
            Self::R2C | Self::C2C | Self::Z2D => 8,
            Self::D2Z | Self::Z2Z => 16,
        }
    }
}

impl fmt::Display for TransformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::R2C => "R2C",
            Self::C2R => "C2R",
            Self::C2C => "C2C",
            Self::D2Z => "D2Z",
            Self::Z2D => "Z2D",
            Self::Z2Z => "Z2Z",
        };
        f.write_str(name)
    }
}

/// Direction of a complex-to-complex transform.
///
/// Discriminants follow the native sign convention of the exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Direction {
    /// Forward transform, `exp(-2πi·jk/n)`.
    Forward = -1,
    /// Inverse transform, `exp(+2πi·jk/n)`, unnormalized.
    Inverse = 1,
}

impl Direction {
    /// Sign of the exponent.
    #[must_use]
    pub const fn sign(self) -> i32 {
        self as i32
    }
}

/// A transform kind fixed at plan creation.
///
/// Sealed: the six markers in this module are the only implementors.
pub trait TransformKind: private::Sealed + Send + Sync + 'static {
    /// Element type of the input buffer.
    type Input: Element;
    /// Element type of the output buffer.
    type Output: Element;
    /// Native transform type requested from the planner.
    const TYPE: TransformType;
}

/// Kinds whose input and output element types differ.
///
/// The direction is implied by the types, so execution takes none.
pub trait Directionless: TransformKind {
    #[doc(hidden)]
    fn dispatch<B: FftBackend>(
        backend: &B,
        handle: RawPlan,
        input: &mut B::Memory<Self::Input>,
        output: &mut B::Memory<Self::Output>,
        stream: Option<&B::Stream>,
    ) -> FftStatus;
}

/// Kinds transforming a complex type into itself.
///
/// Execution requires an explicit [`Direction`].
pub trait Directed: TransformKind {
    #[doc(hidden)]
    fn dispatch<B: FftBackend>(
        backend: &B,
        handle: RawPlan,
        input: &mut B::Memory<Self::Input>,
        output: &mut B::Memory<Self::Output>,
        direction: Direction,
        stream: Option<&B::Stream>,
    ) -> FftStatus;
}

macro_rules! transform_kind {
    ($name:ident, $input:ty, $output:ty, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl private::Sealed for $name {}

        impl TransformKind for $name {
            type Input = $input;
            type Output = $output;
            const TYPE: TransformType = TransformType::$name;
        }
    };
}

transform_kind!(R2C, f32, Complex32, "Single-precision real-to-complex kind.");
transform_kind!(C2R, Complex32, f32, "Single-precision complex-to-real kind.");
transform_kind!(C2C, Complex32, Complex32, "Single-precision complex-to-complex kind.");
transform_kind!(D2Z, f64, Complex64, "Double-precision real-to-complex kind.");
transform_kind!(Z2D, Complex64, f64, "Double-precision complex-to-real kind.");
transform_kind!(Z2Z, Complex64, Complex64, "Double-precision complex-to-complex kind.");

impl Directionless for R2C {
    fn dispatch<B: FftBackend>(
        backend: &B,
        handle: RawPlan,
        input: &mut B::Memory<f32>,
        output: &mut B::Memory<Complex32>,
        stream: Option<&B::Stream>,
    ) -> FftStatus {
        backend.exec_r2c(handle, input, output, stream)
    }
}

impl Directionless for C2R {
    fn dispatch<B: FftBackend>(
        backend: &B,
        handle: RawPlan,
        input: &mut B::Memory<Complex32>,
        output: &mut B::Memory<f32>,
        stream: Option<&B::Stream>,
    ) -> FftStatus {
        backend.exec_c2r(handle, input, output, stream)
    }
}

impl Directionless for D2Z {
    fn dispatch<B: FftBackend>(
        backend: &B,
        handle: RawPlan,
        input: &mut B::Memory<f64>,
        output: &mut B::Memory<Complex64>,
        stream: Option<&B::Stream>,
    ) -> FftStatus {
        backend.exec_d2z(handle, input, output, stream)
    }
}

impl Directionless for Z2D {
    fn dispatch<B: FftBackend>(
        backend: &B,
        handle: RawPlan,
        input: &mut B::Memory<Complex64>,
        output: &mut B::Memory<f64>,
        stream: Option<&B::Stream>,
    ) -> FftStatus {
        backend.exec_z2d(handle, input, output, stream)
    }
}

impl Directed for C2C {
    fn dispatch<B: FftBackend>(
        backend: &B,
        handle: RawPlan,
        input: &mut B::Memory<Complex32>,
        output: &mut B::Memory<Complex32>,
        direction: Direction,
        stream: Option<&B::Stream>,
    ) -> FftStatus {
        backend.exec_c2c(handle, input, output, direction, stream)
    }
}

impl Directed for Z2Z {
    fn dispatch<B: FftBackend>(
        backend: &B,
        handle: RawPlan,
        input: &mut B::Memory<Complex64>,
        output: &mut B::Memory<Complex64>,
        direction: Direction,
        stream: Option<&B::Stream>,
    ) -> FftStatus {
        backend.exec_z2z(handle, input, output, direction, stream)
    }
}
