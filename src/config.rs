//! Network configuration.
//!
//! `NetworkConfig` captures everything needed to build a network except the
//! weights and the caller's input/target views. With the `serde` feature it can
//! be loaded from any serde format; trained weights are never part of it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Activation, Error, Result};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkConfig {
    /// Width of the external input vector (without the bias feature).
    pub inputs: usize,
    /// Unit count per layer, input side first. The last entry is the output width.
    pub layers: Vec<usize>,
    pub activation: Activation,
    pub train_rate: f64,
    /// Appends a constant `1.0` feature to the input and to every non-terminal
    /// layer's outputs.
    pub bias: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            inputs: 1,
            layers: vec![1],
            activation: Activation::Tanh,
            train_rate: 0.1,
            bias: true,
        }
    }
}

impl NetworkConfig {
    /// Strict validation for callers that want errors instead of a degenerate
    /// network.
    pub fn validate(&self) -> Result<()> {
        if self.inputs == 0 {
            return Err(Error::InvalidConfig("inputs must be > 0".to_owned()));
        }
        if self.layers.is_empty() {
            return Err(Error::InvalidConfig(
                "network must have at least one layer".to_owned(),
            ));
        }
        if let Some(idx) = self.layers.iter().position(|&n| n == 0) {
            return Err(Error::InvalidConfig(format!(
                "layer {idx} must have at least one unit"
            )));
        }
        if !self.train_rate.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "train_rate must be finite, got {}",
                self.train_rate
            )));
        }
        Ok(())
    }

    /// Unit count of the terminal layer, or 0 for an empty chain.
    #[inline]
    pub fn outputs(&self) -> usize {
        self.layers.last().copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = NetworkConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.outputs(), 1);
    }

    #[test]
    fn rejects_degenerate_shapes() {
        let empty = NetworkConfig {
            layers: vec![],
            ..NetworkConfig::default()
        };
        assert!(matches!(empty.validate(), Err(Error::InvalidConfig(_))));
        assert_eq!(empty.outputs(), 0);

        let zero_units = NetworkConfig {
            layers: vec![3, 0, 1],
            ..NetworkConfig::default()
        };
        let err = zero_units.validate().unwrap_err();
        assert!(err.to_string().contains("layer 1"));

        let no_inputs = NetworkConfig {
            inputs: 0,
            ..NetworkConfig::default()
        };
        assert!(no_inputs.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_rate() {
        let cfg = NetworkConfig {
            train_rate: f64::NAN,
            ..NetworkConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn parses_from_json_with_defaults() {
        let cfg: NetworkConfig =
            serde_json::from_str(r#"{"inputs":2,"layers":[4,1],"activation":"sigmoid"}"#)
                .unwrap();
        assert_eq!(cfg.inputs, 2);
        assert_eq!(cfg.layers, vec![4, 1]);
        assert_eq!(cfg.activation, Activation::Sigmoid);
        assert_eq!(cfg.train_rate, 0.1);
        assert!(cfg.bias);
    }
}
