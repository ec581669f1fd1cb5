//! Common small functions used throughout the crate
//!
//! These are left public for the convenience of the user. For example
//! converting temperatures or using prettier formatting for scientific numbers.

use std::fmt::LowerExp;

// Alias for the format! macro out of laziness
pub use std::format as f;

/// Boltzmann constant in MeV/K, as used to convert xsdir temperatures
pub const BOLTZMANN_MEV: f64 = 8.6173E-11;

/// Extends primitives with more specific formatting options
pub trait NumberFmt {
    /// Better scientific number formatting
    ///
    /// The default is not very consistent for scientific in particular, so this
    /// allows easy definition.
    ///
    /// ```rust
    /// # use xslist::utils::NumberFmt;
    /// assert_eq!((2.5301e-8).sci(4, 2), "2.5301e-08".to_string());
    /// assert_eq!((1.0).sci(5, 2), "1.00000e+00".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;
}

impl<T: LowerExp> NumberFmt for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let num = f!("{:.precision$e}", &self, precision = precision);
        let Some(split) = num.find('e') else {
            return num;
        };
        let (mantissa, exp) = num.split_at(split);
        // Make sure the exponent is signed
        let (sign, exp) = match exp.strip_prefix("e-") {
            Some(exp) => ('-', exp),
            None => ('+', &exp[1..]),
        };
        f!("{mantissa}e{sign}{exp:0>exp_pad$}")
    }
}

/// Convert a temperature in MeV to Kelvin, rounded to 0.1 K
///
/// ```rust
/// # use xslist::utils::mev_to_kelvin;
/// assert_eq!(mev_to_kelvin(2.5301e-08), 293.6);
/// assert_eq!(mev_to_kelvin(0.0), 0.0);
/// ```
pub fn mev_to_kelvin(temperature: f64) -> f64 {
    (temperature / BOLTZMANN_MEV * 10.0).round() / 10.0
}
