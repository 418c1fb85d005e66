// Our Real scalar type. Geometry is accumulated through long chains of
// composed transforms, so only double precision is offered.
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Lazily-initialized tolerance used across the crate.
/// Defaults to `1e-6`, but can be overridden:
///  1) **Build-time**: set env var `CAGEGEN_TOLERANCE` (e.g. `CAGEGEN_TOLERANCE=1e-8 cargo build`)
///  2) **Runtime**: call [`set_tolerance`] once before using the library
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

#[inline]
const fn default_tolerance() -> Real {
    1e-6
}

/// Returns the current tolerance.
/// If not set yet, it tries `CAGEGEN_TOLERANCE` and falls back to the default.
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        if let Some(environment_variable) = option_env!("CAGEGEN_TOLERANCE") {
            if let Ok(value) = Real::from_str(environment_variable) {
                return value.max(Real::EPSILON);
            }
        }
        default_tolerance()
    })
}

/// Set the tolerance programmatically once (subsequent calls are ignored).
/// Call near program start: `cagegen::float_types::set_tolerance(1e-8);`
pub fn set_tolerance(value: Real) {
    let _ = TOLERANCE_CELL.set(value.max(Real::EPSILON));
}

/// Archimedes' constant (π)
pub const PI: Real = core::f64::consts::PI;

/// π/2
pub const FRAC_PI_2: Real = core::f64::consts::FRAC_PI_2;

/// π/6
pub const FRAC_PI_6: Real = core::f64::consts::FRAC_PI_6;

/// The full circle constant (τ)
pub const TAU: Real = core::f64::consts::TAU;
