//! Threshold parameters for key setup.

use ark_serialize::*;

use crate::error::TtbeError;

/// Number of decryption authorities `n` and decryption threshold `t`.
///
/// Any `t` of the `n` authorities can jointly recover a message; `t - 1` learn
/// nothing about it.
#[derive(CanonicalSerialize, CanonicalDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThresholdConfig {
    n: usize,
    t: usize,
}

impl ThresholdConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    /// Returns `InvalidParameter` unless `n >= 1` and `1 <= t <= n`.
    pub fn new(n: usize, t: usize) -> Result<Self, TtbeError> {
        if n == 0 {
            return Err(TtbeError::InvalidParameter(
                "number of authorities must be at least 1".to_string(),
            ));
        }
        if t == 0 {
            return Err(TtbeError::InvalidParameter(
                "threshold must be at least 1".to_string(),
            ));
        }
        if t > n {
            return Err(TtbeError::InvalidParameter(format!(
                "threshold ({}) must be <= number of authorities ({})",
                t, n
            )));
        }

        Ok(ThresholdConfig { n, t })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn t(&self) -> usize {
        self.t
    }

    /// Whether `index` names one of the configured authorities (1-indexed).
    pub fn contains_index(&self, index: u64) -> bool {
        index >= 1 && index <= self.n as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = ThresholdConfig::new(5, 3).unwrap();
        assert_eq!(config.n(), 5);
        assert_eq!(config.t(), 3);
        assert!(ThresholdConfig::new(1, 1).is_ok());
        assert!(ThresholdConfig::new(4, 4).is_ok());
    }

    #[test]
    fn test_invalid_config() {
        assert!(ThresholdConfig::new(0, 0).is_err());
        assert!(ThresholdConfig::new(5, 0).is_err());
        assert!(ThresholdConfig::new(3, 4).is_err());
    }

    #[test]
    fn test_contains_index() {
        let config = ThresholdConfig::new(5, 3).unwrap();
        assert!(!config.contains_index(0));
        assert!(config.contains_index(1));
        assert!(config.contains_index(5));
        assert!(!config.contains_index(6));
    }
}
