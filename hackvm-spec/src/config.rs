//! # Step-Budget Configuration
//!
//! Step budgets stand in for a halting check: each validation phase may
//! execute at most a fixed number of steps. Budgets are counted in
//! instructions, never wall-clock time, so verdicts are reproducible.

use std::fmt;

/// Step budgets for one validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VmConfig {
    /// Steps the locking program may take alone before input is loaded
    pub max_init_ticks: u32,
    /// Lockstep rounds allowed once both programs run
    pub max_ticks: u32,
}

impl VmConfig {
    /// Default budgets: 16K solo steps, 32K concurrent rounds
    pub const DEFAULT: Self = Self {
        max_init_ticks: 16 * 1024,
        max_ticks: 32 * 1024,
    };

    /// Create a new configuration with validation
    pub const fn new(max_init_ticks: u32, max_ticks: u32) -> Result<Self, ConfigError> {
        if max_init_ticks == 0 || max_ticks == 0 {
            return Err(ConfigError::ZeroBudget);
        }
        if max_init_ticks >= max_ticks {
            return Err(ConfigError::SoloBudgetTooLarge);
        }

        Ok(Self {
            max_init_ticks,
            max_ticks,
        })
    }

    /// Upper bound on instructions a single run can execute across both
    /// machines
    #[inline]
    pub const fn max_total_steps(&self) -> u64 {
        self.max_init_ticks as u64 + 2 * self.max_ticks as u64
    }
}

impl Default for VmConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for VmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "solo budget {} steps, concurrent budget {} rounds",
            self.max_init_ticks, self.max_ticks
        )
    }
}

/// Configuration error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Both budgets must be at least one step
    ZeroBudget,
    /// The solo phase must be strictly shorter than the concurrent phase
    SoloBudgetTooLarge,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroBudget => write!(f, "Step budgets must be non-zero"),
            ConfigError::SoloBudgetTooLarge => {
                write!(f, "Solo budget must be smaller than the concurrent budget")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VmConfig::default();
        assert_eq!(config.max_init_ticks, 16384);
        assert_eq!(config.max_ticks, 32768);
        assert_eq!(config, VmConfig::DEFAULT);
    }

    #[test]
    fn test_valid_config() {
        let config = VmConfig::new(10, 20).unwrap();
        assert_eq!(config.max_init_ticks, 10);
        assert_eq!(config.max_ticks, 20);
        assert_eq!(config.max_total_steps(), 50);
    }

    #[test]
    fn test_invalid_configs() {
        assert_eq!(VmConfig::new(0, 20), Err(ConfigError::ZeroBudget));
        assert_eq!(VmConfig::new(10, 0), Err(ConfigError::ZeroBudget));
        assert_eq!(VmConfig::new(20, 20), Err(ConfigError::SoloBudgetTooLarge));
        assert_eq!(VmConfig::new(30, 20), Err(ConfigError::SoloBudgetTooLarge));
    }

    #[test]
    fn test_display() {
        let text = VmConfig::DEFAULT.to_string();
        assert!(text.contains("16384"));
        assert!(text.contains("32768"));
    }
}
