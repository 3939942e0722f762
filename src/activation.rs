//! Activation functions.
//!
//! A unit computes a weighted sum `s = w · x` over its input and then applies an
//! activation function to produce its output: `y = activation(s)`.
//!
//! Unlike a batched engine, a unit here keeps its weighted sum around between
//! `evaluate` and `train`, so derivatives are expressed in terms of `s` rather
//! than the cached output.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Activation kind shared by every unit of a network.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activation {
    /// `tanh(s / 2)`, range (-1, 1) centered at 0.
    #[default]
    Tanh,
    /// `1 / (1 + e^-s)`, range (0, 1).
    Sigmoid,
    /// Passes the weighted sum through unchanged. Its derivative is taken as
    /// `s` itself, so training steps scale with the weighted sum.
    Identity,
}

impl Activation {
    #[inline]
    pub fn forward(self, s: f64) -> f64 {
        match self {
            Activation::Tanh => (s / 2.0).tanh(),
            Activation::Sigmoid => 1.0 / (1.0 + (-s).exp()),
            Activation::Identity => s,
        }
    }

    /// Derivative used by the delta rule, evaluated at the weighted sum `s`.
    ///
    /// - tanh: `(2 cosh(s) / (cosh(2s) + 1))^2`, which reduces to `sech^2(s)`
    /// - sigmoid: `e^s / (e^s + 1)^2`
    /// - identity: `s`
    ///
    /// Both curved forms are even in `s` and are computed on `|s|` so they decay
    /// to zero instead of overflowing to NaN.
    #[inline]
    pub fn derivative(self, s: f64) -> f64 {
        match self {
            Activation::Tanh => {
                let sech = 1.0 / s.abs().cosh();
                sech * sech
            }
            Activation::Sigmoid => {
                let e = (-s.abs()).exp();
                e / (e + 1.0).powi(2)
            }
            Activation::Identity => s,
        }
    }
}
