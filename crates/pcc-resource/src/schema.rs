use pcc_policy::Effect;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ResourceError, Result};

/// A rule carries at most one `conditions` block.
pub const MAX_CONDITIONS_BLOCKS: usize = 1;

/// Declarative configuration of the policy: an ordered list of rule blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    pub rule: Vec<RuleBlock>,
}

/// One `rule` block. Every attribute is optional and falls back to its zero
/// value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleBlock {
    /// Message to display for blocked requests
    pub block_message: String,

    /// Names of the collections used to scope the rule
    pub collections: Vec<String>,

    pub conditions: Vec<ConditionsBlock>,

    pub disabled: bool,

    /// An empty string reads as unset, as on the wire.
    #[serde(deserialize_with = "pcc_policy::deserialize_optional_effect")]
    pub effect: Option<Effect>,

    /// Unique name of the rule
    pub name: String,

    pub notes: String,

    /// Report passed checks as well as failed ones
    pub show_passed_checks: bool,

    /// Verbose output for blocked requests
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConditionsBlock {
    /// Omitted compliance checks are ignored by the console.
    pub compliance_check: Vec<ComplianceCheckBlock>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComplianceCheckBlock {
    /// `false` only alerts on failure.
    pub block: bool,

    pub id: i64,
}

/// Host-owned data for one resource instance: configuration going in,
/// refreshed state coming out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub rule: Vec<RuleBlock>,
}

impl PolicyConfig {
    /// Load config from file
    pub fn from_file(path: &str) -> Result<Self> {
        let path = Path::new(path);
        if !path.exists() {
            return Err(ResourceError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ResourceError::ConfigError(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document means "no rules", not a parse failure.
        if content.trim().is_empty() {
            return Ok(PolicyConfig::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| ResourceError::ConfigError(format!("Invalid YAML: {}", e)))
    }
}

impl ResourceData {
    /// Fresh data for a resource that has not been created yet.
    pub fn from_config(config: PolicyConfig) -> Self {
        ResourceData {
            id: None,
            rule: config.rule,
        }
    }

    /// Replace the configured rules, keeping the identifier.
    pub fn set_config(&mut self, config: PolicyConfig) {
        self.rule = config.rule;
    }

    pub fn is_created(&self) -> bool {
        self.id.is_some()
    }
}
