//! Network builder.
//!
//! `NetworkBuilder` is the validated way to define a network. It collects a
//! [`NetworkConfig`], checks it, and produces a [`Network`] with no external
//! views bound yet, optionally with seeded weights:
//!
//! - `build`: all weights zero
//! - `build_with_seed` / `build_with_rng`: weights uniform in `[0, 1)`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Activation, Error, Network, NetworkConfig, Result};

#[derive(Debug, Clone)]
/// Builder for a `Network`.
///
/// Example:
///
/// ```rust
/// use online_mlp::{Activation, NetworkBuilder};
///
/// # fn main() -> online_mlp::Result<()> {
/// let x = [0.0, 1.0];
/// let t = [1.0];
/// let mut net = NetworkBuilder::new(2)?
///     .layer(3)?
///     .layer(1)?
///     .activation(Activation::Sigmoid)
///     .train_rate(0.5)
///     .build_with_seed(0)?;
/// net.set_inputs(&x);
/// net.set_targets(&t);
/// net.evaluate();
/// assert!(net.outputs()[0] > 0.0 && net.outputs()[0] < 1.0);
/// # Ok(())
/// # }
/// ```
pub struct NetworkBuilder {
    config: NetworkConfig,
}

impl NetworkBuilder {
    /// Start building a network that accepts inputs of length `inputs`.
    pub fn new(inputs: usize) -> Result<Self> {
        if inputs == 0 {
            return Err(Error::InvalidConfig("inputs must be > 0".to_owned()));
        }
        Ok(Self {
            config: NetworkConfig {
                inputs,
                layers: Vec::new(),
                ..NetworkConfig::default()
            },
        })
    }

    /// Start from an existing config. Validation happens at build time.
    pub fn from_config(config: NetworkConfig) -> Self {
        Self { config }
    }

    /// Append a layer of `units` units.
    pub fn layer(mut self, units: usize) -> Result<Self> {
        if units == 0 {
            return Err(Error::InvalidConfig(
                "layer must have at least one unit".to_owned(),
            ));
        }
        self.config.layers.push(units);
        Ok(self)
    }

    /// Append several layers, input side first.
    pub fn layers(mut self, sizes: &[usize]) -> Result<Self> {
        for &units in sizes {
            self = self.layer(units)?;
        }
        Ok(self)
    }

    pub fn activation(mut self, activation: Activation) -> Self {
        self.config.activation = activation;
        self
    }

    pub fn train_rate(mut self, train_rate: f64) -> Self {
        self.config.train_rate = train_rate;
        self
    }

    pub fn bias(mut self, bias: bool) -> Self {
        self.config.bias = bias;
        self
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Build with every weight at zero.
    pub fn build<'a>(self) -> Result<Network<'a>> {
        self.config.validate()?;
        Ok(Network::from_config(&self.config))
    }

    /// Build using a deterministic seed.
    pub fn build_with_seed<'a>(self, seed: u64) -> Result<Network<'a>> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.build_with_rng(&mut rng)
    }

    /// Build using the provided RNG.
    pub fn build_with_rng<'a, R: Rng + ?Sized>(self, rng: &mut R) -> Result<Network<'a>> {
        let mut network = self.build()?;
        network.seed_weights_with_rng(rng);
        Ok(network)
    }
}
