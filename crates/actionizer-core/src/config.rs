//! Validation configuration.

use serde::{Deserialize, Serialize};

/// Environment variable read by [`ValidationConfig::from_env`].
pub const CHECK_ORDER_ENV: &str = "ACTIONIZER_CHECK_ORDER";

/// Which check reports first when a non-nullable, typed parameter receives
/// an explicit `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckOrder {
    /// Report `must descend from <type>`.
    #[default]
    TypeFirst,
    /// Report `can't be null`.
    NullFirst,
}

impl CheckOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "type_first" => Some(CheckOrder::TypeFirst),
            "null_first" => Some(CheckOrder::NullFirst),
            _ => None,
        }
    }
}

/// Configuration for input validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ValidationConfig {
    /// Precedence between the null check and the type check.
    #[serde(default)]
    pub check_order: CheckOrder,
}

impl ValidationConfig {
    /// Build from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_setting(std::env::var(CHECK_ORDER_ENV).ok().as_deref())
    }

    fn from_setting(raw: Option<&str>) -> Self {
        let check_order = match raw {
            Some(raw) => CheckOrder::parse(raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "ignoring unrecognized {}", CHECK_ORDER_ENV);
                CheckOrder::default()
            }),
            None => CheckOrder::default(),
        };
        Self { check_order }
    }

    /// Set the check order.
    pub fn with_check_order(mut self, check_order: CheckOrder) -> Self {
        self.check_order = check_order;
        self
    }
}
