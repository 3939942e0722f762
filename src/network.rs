use std::ops::{Index, IndexMut};

use rand::Rng;

use crate::{Activation, Error, Layer, LayerErrorSource, NetworkConfig, Result};

/// A chain of layers driven one sample at a time.
///
/// The network borrows the caller's input and target vectors (`'a`) and reads
/// them on every pass; it never copies them beyond its local input buffer,
/// which holds the inputs plus the bias feature when enabled.
///
/// Every entry point fails closed: a pass with unbound views, or on an empty
/// chain, does nothing.
#[derive(Debug, Clone)]
pub struct Network<'a> {
    inputs: Option<&'a [f64]>,
    targets: Option<&'a [f64]>,
    input_len: usize,
    local_inputs: Vec<f64>,
    layers: Vec<Layer>,
    bias: bool,
    train_rate: f64,
    activation: Activation,
}

impl<'a> Network<'a> {
    /// Builds and wires a network bound to `inputs` and `targets`.
    ///
    /// `layers` lists unit counts input side first. Weights start at zero; seed
    /// them with [`Network::seed_weights`] or per unit.
    pub fn new(
        inputs: &'a [f64],
        targets: &'a [f64],
        layers: &[usize],
        activation: Activation,
        train_rate: f64,
        bias: bool,
    ) -> Self {
        let mut network = Self::unbound(inputs.len(), layers, activation, train_rate, bias);
        network.inputs = Some(inputs);
        network.targets = Some(targets);
        network.rebuild();
        network
    }

    /// Like [`Network::new`], but validates the shape first.
    pub fn try_new(
        inputs: &'a [f64],
        targets: &'a [f64],
        layers: &[usize],
        activation: Activation,
        train_rate: f64,
        bias: bool,
    ) -> Result<Self> {
        let config = NetworkConfig {
            inputs: inputs.len(),
            layers: layers.to_vec(),
            activation,
            train_rate,
            bias,
        };
        config.validate()?;
        if targets.len() != config.outputs() {
            return Err(Error::InvalidShape(format!(
                "targets length {} does not match output width {}",
                targets.len(),
                config.outputs()
            )));
        }
        Ok(Self::new(inputs, targets, layers, activation, train_rate, bias))
    }

    /// Builds a network with no external views bound.
    ///
    /// The first layer is sized for `config.inputs` features, so weights can be
    /// seeded before any data is attached.
    pub fn from_config(config: &NetworkConfig) -> Self {
        let mut network = Self::unbound(
            config.inputs,
            &config.layers,
            config.activation,
            config.train_rate,
            config.bias,
        );
        network.rebuild();
        network
    }

    fn unbound(
        input_len: usize,
        sizes: &[usize],
        activation: Activation,
        train_rate: f64,
        bias: bool,
    ) -> Self {
        let layers = sizes
            .iter()
            .enumerate()
            .map(|(position, &units)| Layer::at(position, units))
            .collect();
        let mut network = Self {
            inputs: None,
            targets: None,
            input_len,
            local_inputs: Vec::new(),
            layers,
            bias,
            train_rate,
            activation,
        };
        network.set_train_rate(train_rate);
        network.set_activation(activation);
        network
    }

    /// Recomputes every buffer shape and cross-layer binding from the current
    /// chain-wide settings.
    fn rebuild(&mut self) {
        let count = self.layers.len();
        for (i, layer) in self.layers.iter_mut().enumerate() {
            layer.set_bias(self.bias && i + 1 < count);
        }

        self.resize_local_inputs();
        self.connect_inputs();
        self.connect_layers();
        self.connect_targets();

        log::debug!(
            "rebuilt network: {} inputs, {} layers, bias {}",
            self.input_len,
            count,
            self.bias
        );
    }

    /// True once the input width is known, from a bound view or from a config.
    fn has_input_shape(&self) -> bool {
        self.inputs.is_some() || self.input_len > 0
    }

    fn resize_local_inputs(&mut self) {
        let len = if self.has_input_shape() {
            self.input_len + usize::from(self.bias)
        } else {
            0
        };
        self.local_inputs.resize(len, 0.0);
        self.refresh_local_inputs();
    }

    fn refresh_local_inputs(&mut self) {
        if let Some(inputs) = self.inputs {
            for (dst, &x) in self.local_inputs.iter_mut().zip(inputs) {
                *dst = x;
            }
        }
        if self.bias
            && let Some(slot) = self.local_inputs.last_mut()
        {
            *slot = 1.0;
        }
    }

    fn connect_inputs(&mut self) {
        if !self.has_input_shape() {
            return;
        }
        let len = self.local_inputs.len();
        if let Some(first) = self.layers.first_mut() {
            first.bind_inputs(len);
        }
    }

    fn connect_layers(&mut self) {
        for i in 1..self.layers.len() {
            let (left, right) = self.layers.split_at_mut(i);
            right[0].link_input(&mut left[i - 1]);
        }
    }

    fn connect_targets(&mut self) {
        if let (Some(targets), Some(last)) = (self.targets, self.layers.last_mut()) {
            last.set_targets(targets);
        }
    }

    /// Rebinds the external input view and resizes the local input buffer to
    /// match.
    pub fn set_inputs(&mut self, inputs: &'a [f64]) {
        self.inputs = Some(inputs);
        self.input_len = inputs.len();
        self.resize_local_inputs();
        self.connect_inputs();
    }

    /// Rebinds the external target view.
    ///
    /// A view whose length differs from the output width is not bound to the
    /// terminal layer, which keeps its previous targets.
    pub fn set_targets(&mut self, targets: &'a [f64]) {
        self.targets = Some(targets);
        self.connect_targets();
    }

    /// Like [`Network::set_targets`], but rejects a length mismatch and leaves the
    /// current binding untouched.
    pub fn try_set_targets(&mut self, targets: &'a [f64]) -> Result<()> {
        let width = self.layers.last().map_or(0, Layer::len);
        if targets.len() != width {
            return Err(Error::InvalidShape(format!(
                "targets length {} does not match output width {width}",
                targets.len()
            )));
        }
        self.set_targets(targets);
        Ok(())
    }

    pub fn set_train_rate(&mut self, train_rate: f64) {
        self.train_rate = train_rate;
        for layer in &mut self.layers {
            layer.set_train_rate(train_rate);
        }
    }

    pub fn set_activation(&mut self, activation: Activation) {
        self.activation = activation;
        for layer in &mut self.layers {
            layer.set_activation(activation);
        }
    }

    /// Enables or disables the bias feature on the input and on every layer but
    /// the last, then rewires the whole chain.
    pub fn set_bias(&mut self, bias: bool) {
        self.bias = bias;
        self.rebuild();
    }

    /// Toggles the bias slot of the layer at `idx` only, then relinks the chain
    /// so the next layer's units match the new output width.
    ///
    /// The terminal layer never carries a bias slot. An out-of-range `idx` is
    /// ignored. A later [`Network::set_bias`] overrides every per-layer choice.
    pub fn set_layer_bias(&mut self, idx: usize, bias: bool) {
        let count = self.layers.len();
        let Some(layer) = self.layers.get_mut(idx) else {
            log::debug!("ignoring bias change for layer {idx} of {count}");
            return;
        };
        layer.set_bias(bias && idx + 1 < count);
        self.connect_layers();
    }

    /// Seeds every weight in the chain with a uniform value in `[0, 1)`.
    pub fn seed_weights(&mut self) {
        self.seed_weights_with_rng(&mut rand::thread_rng());
    }

    pub fn seed_weights_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for layer in &mut self.layers {
            layer.seed_weights_with_rng(rng);
        }
    }

    /// Forward pass, first layer to last.
    ///
    /// Does nothing unless both the input and target views are bound.
    pub fn evaluate(&mut self) {
        if self.inputs.is_none() || self.targets.is_none() {
            log::trace!("evaluate skipped: external views not bound");
            return;
        }
        self.refresh_local_inputs();

        let Self {
            layers,
            local_inputs,
            ..
        } = self;
        for i in 0..layers.len() {
            let (before, rest) = layers.split_at_mut(i);
            let input = before.last().map_or(local_inputs.as_slice(), Layer::outputs);
            rest[0].evaluate(input);
        }
    }

    /// Backward pass, last layer to first.
    ///
    /// Each layer's `upstream_error_out` is complete before the layer behind it
    /// trains and reads it. Does nothing unless both external views are bound.
    pub fn train(&mut self) {
        let Some(targets) = self.targets else {
            log::trace!("train skipped: targets not bound");
            return;
        };
        if self.inputs.is_none() {
            log::trace!("train skipped: inputs not bound");
            return;
        }
        self.refresh_local_inputs();

        let Self {
            layers,
            local_inputs,
            ..
        } = self;
        for i in (0..layers.len()).rev() {
            let (before, rest) = layers.split_at_mut(i);
            let Some((layer, after)) = rest.split_first_mut() else {
                continue;
            };
            let input = before.last().map_or(local_inputs.as_slice(), Layer::outputs);
            let error_in: &[f64] = match layer.error_source() {
                Some(LayerErrorSource::Targets) => targets,
                Some(LayerErrorSource::Upstream) => {
                    after.first().map_or(&[][..], Layer::upstream_error_out)
                }
                None => &[],
            };
            layer.train(input, error_in);
        }
    }

    /// The terminal layer's outputs, or an empty slice for an empty chain.
    #[inline]
    pub fn outputs(&self) -> &[f64] {
        self.layers.last().map_or(&[][..], Layer::outputs)
    }

    /// The inputs as the first layer sees them, bias feature included.
    #[inline]
    pub fn local_inputs(&self) -> &[f64] {
        &self.local_inputs
    }

    /// Chain length.
    #[inline]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Alias for [`Network::len`].
    #[inline]
    pub fn size(&self) -> usize {
        self.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    #[inline]
    pub fn layer(&self, idx: usize) -> Option<&Layer> {
        self.layers.get(idx)
    }

    #[inline]
    pub fn layer_mut(&mut self, idx: usize) -> Option<&mut Layer> {
        self.layers.get_mut(idx)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
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

    /// Current settings as a config.
    pub fn config(&self) -> NetworkConfig {
        NetworkConfig {
            inputs: self.input_len,
            layers: self.layers.iter().map(Layer::len).collect(),
            activation: self.activation,
            train_rate: self.train_rate,
            bias: self.bias,
        }
    }
}

impl Index<usize> for Network<'_> {
    type Output = Layer;

    fn index(&self, idx: usize) -> &Layer {
        &self.layers[idx]
    }
}

impl IndexMut<usize> for Network<'_> {
    fn index_mut(&mut self, idx: usize) -> &mut Layer {
        &mut self.layers[idx]
    }
}
