use std::ops::{Index, IndexMut};

use rand::Rng;

use crate::{Activation, Error, Result, Unit};

/// Which kind of error feeds a layer's units during training.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerErrorSource {
    /// Caller-supplied targets, one per unit. Only the terminal layer uses these.
    Targets,
    /// The upstream error buffer of the next layer in the chain.
    Upstream,
}

/// An ordered, fixed-size collection of units sharing one input.
///
/// Buffers owned here:
/// - `outputs`: one slot per unit, plus a constant `1.0` slot when bias is on.
///   The next layer reads this as its input.
/// - `upstream_error_out`: one slot per unit of the *previous* layer, filled by
///   `train`. The previous layer reads this as its upstream error.
///
/// Neighbors are recorded as positions in the owning network, never as
/// references.
#[derive(Debug, Clone)]
pub struct Layer {
    position: usize,
    units: Vec<Unit>,
    outputs: Vec<f64>,
    upstream_error_out: Vec<f64>,
    input_len: Option<usize>,
    error_source: Option<LayerErrorSource>,
    prev: Option<usize>,
    next: Option<usize>,
    bias: bool,
    train_rate: f64,
    activation: Activation,
}

impl Layer {
    /// Creates a standalone layer of `units` units with bias enabled.
    pub fn new(units: usize) -> Self {
        Self::at(0, units)
    }

    /// Creates a standalone layer with the bias slot on or off.
    pub fn with_bias(units: usize, bias: bool) -> Self {
        let mut layer = Self::new(units);
        layer.set_bias(bias);
        layer
    }

    /// Creates a layer that sits at `position` in a chain.
    pub(crate) fn at(position: usize, units: usize) -> Self {
        let mut layer = Self {
            position,
            units: vec![Unit::new(); units],
            outputs: Vec::with_capacity(units + 1),
            upstream_error_out: Vec::new(),
            input_len: None,
            error_source: None,
            prev: None,
            next: None,
            bias: true,
            train_rate: 0.0,
            activation: Activation::Tanh,
        };
        layer.rebuild_outputs();
        layer
    }

    /// Links `prev` as this layer's input.
    ///
    /// Takes the position right after `prev`, so standalone layers linked by hand
    /// report consistent `prev`/`next` positions.
    ///
    /// Adopts `prev`'s outputs as the effective input, sizes `upstream_error_out`
    /// to `prev`'s unit count and binds that buffer as `prev`'s error source,
    /// which replaces any targets `prev` had.
    pub fn link_input(&mut self, prev: &mut Layer) {
        self.position = prev.position + 1;
        self.prev = Some(prev.position);
        prev.next = Some(self.position);

        self.bind_inputs(prev.outputs.len());

        self.upstream_error_out.clear();
        self.upstream_error_out.resize(prev.len(), 0.0);
        prev.bind_upstream_error(&self.upstream_error_out);

        log::trace!(
            "linked layer {} ({} inputs) to layer {}",
            self.position,
            prev.outputs.len(),
            prev.position
        );
    }

    /// Binds every unit to an input of `len` features.
    pub fn bind_inputs(&mut self, len: usize) {
        self.input_len = Some(len);
        for unit in &mut self.units {
            unit.bind_input(len);
        }
    }

    /// Binds per-unit targets.
    ///
    /// Ignored when `targets.len()` does not equal the unit count.
    pub fn set_targets(&mut self, targets: &[f64]) {
        if targets.len() != self.units.len() {
            log::debug!(
                "layer {}: ignoring {} targets for {} units",
                self.position,
                targets.len(),
                self.units.len()
            );
            return;
        }
        self.error_source = Some(LayerErrorSource::Targets);
        for (unit, &t) in self.units.iter_mut().zip(targets) {
            unit.set_target(t);
        }
    }

    /// Like [`Layer::set_targets`], but reports a length mismatch.
    pub fn try_set_targets(&mut self, targets: &[f64]) -> Result<()> {
        if targets.len() != self.units.len() {
            return Err(Error::InvalidShape(format!(
                "targets length {} does not match {} units",
                targets.len(),
                self.units.len()
            )));
        }
        self.set_targets(targets);
        Ok(())
    }

    fn bind_upstream_error(&mut self, errors: &[f64]) {
        self.error_source = Some(LayerErrorSource::Upstream);
        if errors.len() == self.units.len() {
            for (unit, &e) in self.units.iter_mut().zip(errors) {
                unit.set_upstream_error(e);
            }
        }
    }

    /// Pushes the current error values into the units, if the shape matches.
    fn refresh_error_signals(&mut self, error_in: &[f64]) {
        if error_in.len() != self.units.len() {
            return;
        }
        match self.error_source {
            Some(LayerErrorSource::Targets) => {
                for (unit, &t) in self.units.iter_mut().zip(error_in) {
                    unit.set_target(t);
                }
            }
            Some(LayerErrorSource::Upstream) => {
                for (unit, &e) in self.units.iter_mut().zip(error_in) {
                    unit.set_upstream_error(e);
                }
            }
            None => {}
        }
    }

    pub fn set_train_rate(&mut self, train_rate: f64) {
        self.train_rate = train_rate;
        for unit in &mut self.units {
            unit.set_train_rate(train_rate);
        }
    }

    pub fn set_activation(&mut self, activation: Activation) {
        self.activation = activation;
        for unit in &mut self.units {
            unit.set_activation(activation);
        }
    }

    /// Toggles the constant bias slot at the end of `outputs`.
    ///
    /// Only this layer's buffers change; the caller relinks the layer that reads
    /// them. Public callers go through [`crate::Network::set_bias`] or
    /// [`crate::Network::set_layer_bias`].
    pub(crate) fn set_bias(&mut self, bias: bool) {
        self.bias = bias;
        self.rebuild_outputs();
    }

    fn rebuild_outputs(&mut self) {
        let len = self.units.len() + usize::from(self.bias);
        self.outputs.resize(len, 0.0);
        if self.bias
            && let Some(slot) = self.outputs.last_mut()
        {
            *slot = 1.0;
        }
    }

    pub fn seed_weights_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for unit in &mut self.units {
            unit.seed_weights_with_rng(rng);
        }
    }

    /// Evaluates every unit in order, copying successful outputs into `outputs`.
    ///
    /// The bias slot is never written here.
    pub fn evaluate(&mut self, input: &[f64]) {
        for (unit, out) in self.units.iter_mut().zip(self.outputs.iter_mut()) {
            if unit.evaluate(input) {
                *out = unit.output();
            }
        }
    }

    /// Trains every unit in order and accumulates their weighted contributions
    /// into `upstream_error_out`.
    ///
    /// `error_in` holds the values for this layer's error source: the targets for
    /// a terminal layer, the next layer's `upstream_error_out` otherwise.
    ///
    /// Contributions are as long as this layer's input, which may include a bias
    /// slot; only the first `upstream_error_out.len()` entries are summed.
    pub fn train(&mut self, input: &[f64], error_in: &[f64]) {
        self.refresh_error_signals(error_in);

        self.upstream_error_out.fill(0.0);
        for unit in &mut self.units {
            if unit.train(input) {
                for (acc, &c) in self
                    .upstream_error_out
                    .iter_mut()
                    .zip(unit.weighted_contributions())
                {
                    *acc += c;
                }
            }
        }
    }

    /// Number of units.
    #[inline]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[inline]
    pub fn unit(&self, idx: usize) -> Option<&Unit> {
        self.units.get(idx)
    }

    #[inline]
    pub fn unit_mut(&mut self, idx: usize) -> Option<&mut Unit> {
        self.units.get_mut(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Unit> {
        self.units.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Unit> {
        self.units.iter_mut()
    }

    #[inline]
    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    #[inline]
    pub fn upstream_error_out(&self) -> &[f64] {
        &self.upstream_error_out
    }

    #[inline]
    pub fn input_len(&self) -> Option<usize> {
        self.input_len
    }

    #[inline]
    pub fn error_source(&self) -> Option<LayerErrorSource> {
        self.error_source
    }

    #[inline]
    pub fn bias(&self) -> bool {
        self.bias
    }

    #[inline]
    pub fn train_rate(&self) -> f64 {
        self.train_rate
    }

    #[inline]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Index in the chain. A standalone layer sits at 0 until it is linked
    /// behind another layer.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Position of the layer feeding this one, if linked.
    #[inline]
    pub fn prev(&self) -> Option<usize> {
        self.prev
    }

    /// Position of the layer this one feeds, if linked.
    #[inline]
    pub fn next(&self) -> Option<usize> {
        self.next
    }
}

impl Index<usize> for Layer {
    type Output = Unit;

    fn index(&self, idx: usize) -> &Unit {
        &self.units[idx]
    }
}

impl IndexMut<usize> for Layer {
    fn index_mut(&mut self, idx: usize) -> &mut Unit {
        &mut self.units[idx]
    }
}
