//! Match configuration, loadable from TOML.
//!
//! ```toml
//! default_promotion = "knight"
//! filter_self_check = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::types::PieceKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Piece a pawn becomes on reaching the last rank, until the host
    /// replaces it.
    pub default_promotion: PieceKind,
    /// Drop moves that would expose the mover's king from `possible_moves`.
    pub filter_self_check: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            default_promotion: PieceKind::Queen,
            filter_self_check: false,
        }
    }
}

impl MatchConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.default_promotion.is_promotion_target() {
            return Err(ConfigError::InvalidPromotion(self.default_promotion));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
