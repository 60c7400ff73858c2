// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Element types accepted by FFT plans.
//!
//! Four element types exist: `f32`, `f64`, [`Complex32`] and [`Complex64`].
//! The complex types are `#[repr(C)]` pairs of interleaved real/imaginary
//! parts, matching `cufftComplex` and `cufftDoubleComplex` bit for bit.
//!
//! [`Element::Paired`] fixes the canonical partner of each type for transforms
//! between different element types: single-precision real pairs only with
//! single-precision complex, double with double. There is no way to pair
//! `f32` with `Complex64`.

use bytemuck::{Pod, Zeroable};

mod private {
    pub trait Sealed {}
}

/// A scalar that can be fed to or produced by a plan.
///
/// This trait is sealed; the set of element types is closed.
pub trait Element: private::Sealed + Copy + Default + PartialEq + Send + Sync + 'static {
    /// The element type on the other side of a real/complex transform.
    type Paired: Element;

    /// `true` for the complex types.
    const IS_COMPLEX: bool;

    /// Short type name used in logs.
    const NAME: &'static str;

    #[doc(hidden)]
    fn to_parts(self) -> (f64, f64);

    #[doc(hidden)]
    fn from_parts(re: f64, im: f64) -> Self;
}

macro_rules! impl_complex {
    ($name:ident, $float:ty, $native:literal) => {
        #[doc = concat!("Complex number with `", stringify!($float), "` parts, layout-compatible with `", $native, "`.")]
        #[repr(C)]
        #[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
        pub struct $name {
            /// Real part.
            pub re: $float,
            /// Imaginary part.
            pub im: $float,
        }

        impl $name {
            /// Zero.
            pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

            /// Create a complex number.
            #[must_use]
            pub const fn new(re: $float, im: $float) -> Self {
                Self { re, im }
            }

            /// Complex conjugate.
            #[must_use]
            pub fn conj(self) -> Self {
                Self {
                    re: self.re,
                    im: -self.im,
                }
            }

            /// Magnitude `|z|`.
            #[must_use]
            pub fn norm(self) -> $float {
                self.re.hypot(self.im)
            }

            /// View an interleaved `[re, im, re, im, ...]` slice as complex values.
            ///
            /// # Panics
            ///
            /// Panics if `values` has odd length.
            #[must_use]
            pub fn from_interleaved(values: &[$float]) -> &[Self] {
                bytemuck::cast_slice(values)
            }

            /// View complex values as an interleaved `[re, im, ...]` slice.
            #[must_use]
            pub fn as_interleaved(values: &[Self]) -> &[$float] {
                bytemuck::cast_slice(values)
            }
        }

        impl From<($float, $float)> for $name {
            fn from((re, im): ($float, $float)) -> Self {
                Self { re, im }
            }
        }

        impl private::Sealed for $name {}
    };
}

impl_complex!(Complex32, f32, "cufftComplex");
impl_complex!(Complex64, f64, "cufftDoubleComplex");

impl private::Sealed for f32 {}
impl private::Sealed for f64 {}

impl Element for f32 {
    type Paired = Complex32;
    const IS_COMPLEX: bool = false;
    const NAME: &'static str = "f32";

    fn to_parts(self) -> (f64, f64) {
        (f64::from(self), 0.0)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_parts(re: f64, _im: f64) -> Self {
        re as f32
    }
}

impl Element for f64 {
    type Paired = Complex64;
    const IS_COMPLEX: bool = false;
    const NAME: &'static str = "f64";

    fn to_parts(self) -> (f64, f64) {
        (self, 0.0)
    }

    fn from_parts(re: f64, _im: f64) -> Self {
        re
    }
}

impl Element for Complex32 {
    type Paired = f32;
    const IS_COMPLEX: bool = true;
    const NAME: &'static str = "Complex32";

    fn to_parts(self) -> (f64, f64) {
        (f64::from(self.re), f64::from(self.im))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_parts(re: f64, im: f64) -> Self {
        Self::new(re as f32, im as f32)
    }
}

impl Element for Complex64 {
    type Paired = f64;
    const IS_COMPLEX: bool = true;
    const NAME: &'static str = "Complex64";

    fn to_parts(self) -> (f64, f64) {
        (self.re, self.im)
    }

    fn from_parts(re: f64, im: f64) -> Self {
        Self::new(re, im)
    }
}

#[cfg(feature = "cuda")]
mod cuda_repr {
    use super::{Complex32, Complex64};
    use cudarc::driver::{DeviceRepr, ValidAsZeroBits};

    // SAFETY: both types are `#[repr(C)]` pairs of floats with no padding.
    unsafe impl DeviceRepr for Complex32 {}
    unsafe impl ValidAsZeroBits for Complex32 {}
    unsafe impl DeviceRepr for Complex64 {}
    unsafe impl ValidAsZeroBits for Complex64 {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, size_of};

    fn paired_name<T: Element>() -> &'static str {
        <T::Paired as Element>::NAME
    }

    #[test]
    fn test_layout_matches_native() {
        assert_eq!(size_of::<Complex32>(), 8);
        assert_eq!(align_of::<Complex32>(), 4);
        assert_eq!(size_of::<Complex64>(), 16);
        assert_eq!(align_of::<Complex64>(), 8);
    }

    #[test]
    fn test_canonical_pairing() {
        assert_eq!(paired_name::<f32>(), "Complex32");
        assert_eq!(paired_name::<Complex32>(), "f32");
        assert_eq!(paired_name::<f64>(), "Complex64");
        assert_eq!(paired_name::<Complex64>(), "f64");
    }

    #[test]
    fn test_interleaved_views() {
        let raw = [1.0f32, 2.0, 3.0, -4.0];
        let values = Complex32::from_interleaved(&raw);
        assert_eq!(values, &[Complex32::new(1.0, 2.0), Complex32::new(3.0, -4.0)]);
        assert_eq!(Complex32::as_interleaved(values), &raw);
    }

    #[test]
    fn test_parts_conversion() {
        assert_eq!(Complex64::new(3.0, 4.0).norm(), 5.0);
        assert_eq!(Complex64::new(1.0, 2.0).conj(), Complex64::new(1.0, -2.0));
        assert_eq!(<f32 as Element>::from_parts(2.5, 9.0), 2.5);
        assert_eq!(Complex32::from_parts(1.0, -1.0), Complex32::new(1.0, -1.0));
        assert_eq!(2.0f64.to_parts(), (2.0, 0.0));
    }
}
