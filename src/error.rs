//! Errors for the strict entry points.
//!
//! The passes and plain setters fail closed and never produce these. Only the
//! validating calls do: [`crate::NetworkConfig::validate`],
//! [`crate::NetworkBuilder`], [`crate::Network::try_new`] and the `try_*`
//! setters.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A network definition that cannot be built: no inputs, no layers, an
    /// empty layer or a non-finite training rate.
    InvalidConfig(String),
    /// A target or weight vector whose length does not fit the bound shape.
    InvalidShape(String),
}

/// Result of a validating call.
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Error::InvalidShape(msg) => write!(f, "invalid shape: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_the_error_kind() {
        let err = Error::InvalidShape("targets length 3 does not match 2 units".to_owned());
        assert_eq!(
            err.to_string(),
            "invalid shape: targets length 3 does not match 2 units"
        );
    }

    #[test]
    fn strict_calls_report_their_kind() {
        let cfg = crate::NetworkConfig {
            layers: vec![],
            ..crate::NetworkConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));

        let mut unit = crate::Unit::new();
        unit.bind_input(2);
        assert!(matches!(
            unit.try_seed_weights(&[1.0]),
            Err(Error::InvalidShape(_))
        ));
    }
}
