//! Unit newtypes for the electrical quantities carried by a network model.
//!
//! Boundary merging copies impedances and admittances between entities and
//! compares nominal voltages across fragments, so the values travel as
//! typed wrappers instead of bare `f64`s:
//! - Nominal voltage in kilovolts
//! - Series impedance (R, X) in ohms
//! - Shunt admittance (G, B) in siemens
//! - Active / reactive injections in MW / Mvar
//!
//! # Usage
//!
//! ```
//! use cgm_core::units::{Kilovolts, Ohms, Siemens};
//!
//! let r = Ohms(1.0) + Ohms(1.5);
//! assert_eq!(r.value(), 2.5);
//!
//! // Does NOT compile - different units
//! // let wrong = Ohms(1.0) + Siemens(0.01);
//!
//! assert!(Kilovolts(380.0).approx_eq(Kilovolts(380.0 + 1e-9)));
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Add;

/// Absolute tolerance used when comparing unit values for equality.
pub const UNIT_TOLERANCE: f64 = 1e-6;

macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.4} {}", self.0, $unit_name)
            }
        }

        impl $type {
            /// Zero value
            pub const ZERO: Self = Self(0.0);

            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// Equality within [`UNIT_TOLERANCE`]
            #[inline]
            pub fn approx_eq(self, other: Self) -> bool {
                (self.0 - other.0).abs() <= UNIT_TOLERANCE
            }
        }
    };
}

/// Voltage in kilovolts (kV), used for voltage level nominal voltages.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilovolts(pub f64);

impl_unit_ops!(Kilovolts, "kV");

/// Series resistance or reactance in ohms.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Ohms(pub f64);

impl_unit_ops!(Ohms, "Ω");

/// Shunt conductance or susceptance in siemens.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Siemens(pub f64);

impl_unit_ops!(Siemens, "S");

/// Active power in megawatts (MW)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Megawatts(pub f64);

impl_unit_ops!(Megawatts, "MW");

/// Reactive power in megavolt-amperes reactive (Mvar)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Megavars(pub f64);

impl_unit_ops!(Megavars, "Mvar");

impl Ohms {
    /// Magnitude of the series impedance `|R + jX|`.
    #[inline]
    pub fn magnitude(r: Ohms, x: Ohms) -> Ohms {
        Ohms((r.0.powi(2) + x.0.powi(2)).sqrt())
    }
}
