//! A minimal feed-forward perceptron network.
//!
//! `online-mlp` evaluates and trains a chain of fully connected layers one sample
//! at a time, with plain gradient steps on a single sample. It is meant to be
//! embedded as a small numeric building block.
//!
//! # Structure
//!
//! - [`Unit`]: one perceptron. Weighted sum, activation, delta, weight update.
//! - [`Layer`]: an ordered set of units sharing one input. Owns its output
//!   buffer (with an optional constant bias slot) and the error buffer it hands
//!   back to the previous layer.
//! - [`Network`]: an ordered chain of layers. Borrows the caller's input and
//!   target vectors and drives the forward (`evaluate`) and backward (`train`)
//!   passes.
//!
//! # Failure model
//!
//! The passes and setters never panic on unmet preconditions and never return
//! errors: an unbound input, a mismatched target vector or an empty chain makes
//! the call a no-op. Callers who prefer errors use the validating entry points
//! ([`NetworkConfig::validate`], [`Network::try_new`], [`NetworkBuilder`],
//! [`Network::try_set_targets`], [`Unit::try_seed_weights`]).
//!
//! # Logging
//!
//! Structural events (rebuilds, links, rejected bindings, skipped passes) go
//! through the [`log`] facade at `debug`/`trace` level. No logger is installed
//! by this crate.
//!
//! # Quick start
//!
//! ```rust
//! use online_mlp::{Activation, Network};
//!
//! let x = [2.0, 3.0];
//! let t = [5.0];
//! let mut net = Network::new(&x, &t, &[1], Activation::Identity, 0.01, false);
//! net[0][0].seed_weights_from(&[1.0, 1.0]);
//!
//! net.evaluate();
//! assert_eq!(net.outputs(), &[5.0]);
//!
//! net.train();
//! net.evaluate();
//! assert_eq!(net.outputs(), &[5.0]);
//! ```

pub mod activation;
pub mod builder;
pub mod config;
pub mod error;
pub mod layer;
pub mod network;
pub mod unit;

pub use activation::Activation;
pub use builder::NetworkBuilder;
pub use config::NetworkConfig;
pub use error::{Error, Result};
pub use layer::{Layer, LayerErrorSource};
pub use network::Network;
pub use unit::{ErrorSignal, Unit, nearly_equal};
