//! A single perceptron.
//!
//! A `Unit` owns its weights and the scalars produced by its last pass. It never
//! owns its input: the layer records the input *shape* via [`Unit::bind_input`]
//! and lends the actual buffer for the duration of each `evaluate`/`train` call.

use std::ops::{Index, IndexMut};

use rand::Rng;
use rand::distributions::{Distribution, Uniform};

use crate::{Activation, Error, Result};

/// Where a unit's error comes from during training.
///
/// The two cases are mutually exclusive: binding one replaces the other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorSignal {
    /// Desired output. Used by units of the terminal layer.
    Target(f64),
    /// Backpropagated error sum from the layer ahead. Used by hidden units.
    Upstream(f64),
}

#[derive(Debug, Clone)]
pub struct Unit {
    weights: Vec<f64>,
    weighted_contributions: Vec<f64>,
    input_len: Option<usize>,
    error: Option<ErrorSignal>,
    weighted_sum: f64,
    output: f64,
    delta: f64,
    train_rate: f64,
    activation: Activation,
}

impl Default for Unit {
    fn default() -> Self {
        Self::new()
    }
}

impl Unit {
    /// Creates an unbound unit with no weights.
    pub fn new() -> Self {
        Self {
            weights: Vec::new(),
            weighted_contributions: Vec::new(),
            input_len: None,
            error: None,
            weighted_sum: 0.0,
            output: 0.0,
            delta: 0.0,
            train_rate: 0.0,
            activation: Activation::Tanh,
        }
    }

    /// Binds the unit to an input of `len` features.
    ///
    /// If `len` differs from the current weight count, the weights are resized
    /// (new slots are zero until seeded) and the contribution buffer follows.
    pub fn bind_input(&mut self, len: usize) {
        self.input_len = Some(len);
        if self.weights.len() != len {
            self.weights.resize(len, 0.0);
            self.weighted_contributions.resize(len, 0.0);
        }
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.input_len.is_some()
    }

    /// Fills every weight with a uniform random value in `[0, 1)`.
    ///
    /// Does nothing while the weight vector is empty (no input bound yet).
    pub fn seed_weights(&mut self) {
        self.seed_weights_with_rng(&mut rand::thread_rng());
    }

    pub fn seed_weights_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let dist = Uniform::new(0.0_f64, 1.0_f64);
        for w in &mut self.weights {
            *w = dist.sample(rng);
        }
    }

    /// Assigns explicit weights.
    ///
    /// When the unit is bound and `values.len()` differs from the input length, only
    /// the first `min(values.len(), len)` weights are overwritten and the rest are
    /// left as they are. Otherwise the weights are replaced wholesale.
    pub fn seed_weights_from(&mut self, values: &[f64]) {
        match self.input_len {
            Some(len) if values.len() != len => {
                let n = values.len().min(self.weights.len());
                self.weights[..n].copy_from_slice(&values[..n]);
            }
            _ => {
                self.weights.clear();
                self.weights.extend_from_slice(values);
                self.weighted_contributions.resize(values.len(), 0.0);
            }
        }
    }

    /// Like [`Unit::seed_weights_from`], but rejects a length mismatch with the
    /// bound input instead of copying a prefix.
    pub fn try_seed_weights(&mut self, values: &[f64]) -> Result<()> {
        if let Some(len) = self.input_len
            && values.len() != len
        {
            return Err(Error::InvalidShape(format!(
                "{} weights given for a unit with {len} inputs",
                values.len()
            )));
        }
        self.seed_weights_from(values);
        Ok(())
    }

    /// Binds a target value, replacing any upstream error binding.
    #[inline]
    pub fn set_target(&mut self, target: f64) {
        self.error = Some(ErrorSignal::Target(target));
    }

    /// Binds a backpropagated error sum, replacing any target binding.
    #[inline]
    pub fn set_upstream_error(&mut self, error: f64) {
        self.error = Some(ErrorSignal::Upstream(error));
    }

    #[inline]
    pub fn set_train_rate(&mut self, train_rate: f64) {
        self.train_rate = train_rate;
    }

    #[inline]
    pub fn set_activation(&mut self, activation: Activation) {
        self.activation = activation;
    }

    /// Computes `output = activation(w · input)`.
    ///
    /// Returns `false` and leaves `output` untouched when no input is bound.
    pub fn evaluate(&mut self, input: &[f64]) -> bool {
        if self.input_len.is_none() {
            return false;
        }
        debug_assert_eq!(input.len(), self.weights.len());

        let mut sum = 0.0;
        for (&w, &x) in self.weights.iter().zip(input) {
            sum += w * x;
        }
        self.weighted_sum = sum;
        self.output = self.activation.forward(sum);
        true
    }

    /// Applies one delta-rule step.
    ///
    /// `delta = f'(s) * error`, where the error is `target - output` or the bound
    /// upstream error; a unit with no error signal gets `delta = 0`. The
    /// weighted contributions `delta * w` are taken from the pre-update weights,
    /// then `w += rate * delta * input`. Without a bound input the weight update is
    /// skipped, but the step still reports success.
    pub fn train(&mut self, input: &[f64]) -> bool {
        self.delta = match self.error {
            Some(ErrorSignal::Target(target)) => {
                self.activation.derivative(self.weighted_sum) * (target - self.output)
            }
            Some(ErrorSignal::Upstream(error)) => {
                self.activation.derivative(self.weighted_sum) * error
            }
            None => 0.0,
        };

        if self.input_len.is_some() {
            debug_assert_eq!(input.len(), self.weights.len());
            let (delta, rate) = (self.delta, self.train_rate);
            for ((c, w), &x) in self
                .weighted_contributions
                .iter_mut()
                .zip(self.weights.iter_mut())
                .zip(input)
            {
                *c = delta * *w;
                *w += rate * delta * x;
            }
        }
        true
    }

    /// Number of weights (equals the bound input length).
    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[inline]
    pub fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.weights
    }

    /// `delta * w` per weight, from the most recent `train`.
    #[inline]
    pub fn weighted_contributions(&self) -> &[f64] {
        &self.weighted_contributions
    }

    #[inline]
    pub fn weighted_sum(&self) -> f64 {
        self.weighted_sum
    }

    #[inline]
    pub fn output(&self) -> f64 {
        self.output
    }

    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    #[inline]
    pub fn error_signal(&self) -> Option<ErrorSignal> {
        self.error
    }

    #[inline]
    pub fn train_rate(&self) -> f64 {
        self.train_rate
    }

    #[inline]
    pub fn activation(&self) -> Activation {
        self.activation
    }
}

impl Index<usize> for Unit {
    type Output = f64;

    fn index(&self, idx: usize) -> &f64 {
        &self.weights[idx]
    }
}

impl IndexMut<usize> for Unit {
    fn index_mut(&mut self, idx: usize) -> &mut f64 {
        &mut self.weights[idx]
    }
}

/// Float equality within machine epsilon.
#[inline]
pub fn nearly_equal(lhs: f64, rhs: f64) -> bool {
    (lhs - rhs).abs() < f64::EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bound_unit(weights: &[f64], activation: Activation, rate: f64) -> Unit {
        let mut unit = Unit::new();
        unit.bind_input(weights.len());
        unit.seed_weights_from(weights);
        unit.set_activation(activation);
        unit.set_train_rate(rate);
        unit
    }

    #[test]
    fn binding_resizes_weights_with_zeros() {
        let mut unit = Unit::new();
        assert!(!unit.is_bound());
        assert!(unit.is_empty());

        unit.bind_input(3);
        assert_eq!(unit.weights(), &[0.0, 0.0, 0.0]);
        assert_eq!(unit.weighted_contributions().len(), 3);

        unit[1] = 2.5;
        unit.bind_input(4);
        assert_eq!(unit.weights(), &[0.0, 2.5, 0.0, 0.0]);
        assert_eq!(unit.weighted_contributions().len(), 4);
    }

    #[test]
    fn random_seeding_stays_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut unit = Unit::new();

        unit.seed_weights_with_rng(&mut rng);
        assert!(unit.is_empty());

        unit.bind_input(16);
        unit.seed_weights_with_rng(&mut rng);
        assert!(unit.weights().iter().all(|w| (0.0..1.0).contains(w)));
        assert!(unit.weights().iter().any(|&w| w != 0.0));
    }

    #[test]
    fn mismatched_seed_copies_prefix_only() {
        let mut unit = Unit::new();
        unit.bind_input(3);
        unit.seed_weights_from(&[1.0, 1.0, 1.0]);

        unit.seed_weights_from(&[5.0]);
        assert_eq!(unit.weights(), &[5.0, 1.0, 1.0]);

        unit.seed_weights_from(&[7.0, 8.0, 9.0, 10.0]);
        assert_eq!(unit.weights(), &[7.0, 8.0, 9.0]);

        assert!(unit.try_seed_weights(&[1.0, 2.0]).is_err());
        assert_eq!(unit.weights(), &[7.0, 8.0, 9.0]);
        assert!(unit.try_seed_weights(&[1.0, 2.0, 3.0]).is_ok());
        assert_eq!(unit.weights(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn evaluate_requires_bound_input() {
        let mut unit = Unit::new();
        assert!(!unit.evaluate(&[]));
        assert_eq!(unit.output(), 0.0);
    }

    #[test]
    fn identity_evaluate_is_the_weighted_sum() {
        let mut unit = bound_unit(&[1.0, 1.0], Activation::Identity, 0.0);
        assert!(unit.evaluate(&[2.0, 3.0]));
        assert_eq!(unit.weighted_sum(), 5.0);
        assert_eq!(unit.output(), 5.0);
    }

    #[test]
    fn identity_step_scales_by_the_weighted_sum() {
        let input = [2.0, 3.0];
        let mut unit = bound_unit(&[1.0, 1.0], Activation::Identity, 0.01);
        unit.set_target(10.0);

        unit.evaluate(&input);
        unit.train(&input);

        // f'(s) = s for identity: delta = 5 * (10 - 5).
        assert_eq!(unit.delta(), 25.0);
        assert_abs_diff_eq!(unit.weights()[0], 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(unit.weights()[1], 1.75, epsilon = 1e-12);
    }

    #[test]
    fn error_signals_are_exclusive() {
        let mut unit = Unit::new();
        assert_eq!(unit.error_signal(), None);

        unit.set_target(1.0);
        assert_eq!(unit.error_signal(), Some(ErrorSignal::Target(1.0)));

        unit.set_upstream_error(-0.25);
        assert_eq!(unit.error_signal(), Some(ErrorSignal::Upstream(-0.25)));

        unit.set_target(0.5);
        assert_eq!(unit.error_signal(), Some(ErrorSignal::Target(0.5)));
    }

    #[test]
    fn target_step_follows_delta_rule() {
        let input = [0.5, -1.0, 1.0];
        let before = [0.2, 0.4, -0.1];
        let rate = 0.3;
        let mut unit = bound_unit(&before, Activation::Sigmoid, rate);
        unit.set_target(1.0);

        assert!(unit.evaluate(&input));
        let s = unit.weighted_sum();
        let o = unit.output();
        assert!(unit.train(&input));

        let delta = Activation::Sigmoid.derivative(s) * (1.0 - o);
        assert_eq!(unit.delta(), delta);
        for i in 0..input.len() {
            assert_eq!(unit.weighted_contributions()[i], delta * before[i]);
            assert_eq!(unit.weights()[i], before[i] + rate * delta * input[i]);
        }
    }

    #[test]
    fn upstream_step_scales_by_error_sum() {
        let input = [1.0, 2.0];
        let mut unit = bound_unit(&[0.1, 0.2], Activation::Tanh, 0.5);
        unit.set_upstream_error(0.75);

        unit.evaluate(&input);
        let s = unit.weighted_sum();
        unit.train(&input);

        assert_eq!(unit.delta(), Activation::Tanh.derivative(s) * 0.75);
    }

    #[test]
    fn untrainable_unit_has_zero_delta_and_keeps_weights() {
        let input = [1.0, 1.0];
        let mut unit = bound_unit(&[0.3, 0.6], Activation::Tanh, 1.0);
        unit.evaluate(&input);

        assert!(unit.train(&input));
        assert_eq!(unit.delta(), 0.0);
        assert_eq!(unit.weights(), &[0.3, 0.6]);
        assert_eq!(unit.weighted_contributions(), &[0.0, 0.0]);
    }

    #[test]
    fn unbound_train_reports_success_without_updating() {
        let mut unit = Unit::new();
        unit.set_target(1.0);
        assert!(unit.train(&[]));
        assert!(unit.is_empty());
    }

    #[test]
    fn nearly_equal_uses_machine_epsilon() {
        assert!(nearly_equal(0.1 + 0.2, 0.3));
        assert!(!nearly_equal(1.0, 1.0 + 1e-12));
    }
}
