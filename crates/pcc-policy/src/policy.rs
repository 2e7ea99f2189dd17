use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::effect::{self, Effect};
use crate::error::PolicyError;

/// Policy type of the account-wide container compliance policy.
///
/// There is exactly one policy of this type per console, so the string
/// doubles as the identifier of the managed resource.
pub const POLICY_TYPE_COMPLIANCE_CONTAINER: &str = "containerCompliance";

/// A whole compliance policy as exchanged with the console.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompliancePolicy {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(rename = "policyType", default, skip_serializing_if = "String::is_empty")]
    pub policy_type: String,

    /// Evaluated in order; the first matching rule wins on the console side.
    #[serde(default)]
    pub rules: Vec<ComplianceRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRule {
    #[serde(rename = "blockMsg", default, skip_serializing_if = "String::is_empty")]
    pub block_message: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<Collection>,

    #[serde(rename = "condition", default, skip_serializing_if = "ComplianceConditions::is_empty")]
    pub conditions: ComplianceConditions,

    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "effect::deserialize_optional"
    )]
    pub effect: Option<Effect>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    #[serde(rename = "allCompliance", default, skip_serializing_if = "is_false")]
    pub show_passed_checks: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceConditions {
    #[serde(rename = "vulnerabilities", default, skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<ComplianceCheck>,
}

/// One compliance check referenced by id.
///
/// `block == false` only alerts when the check fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceCheck {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: i64,

    #[serde(default, skip_serializing_if = "is_false")]
    pub block: bool,
}

impl CompliancePolicy {
    /// Empty container compliance policy, ready to receive rules.
    pub fn compliance_container() -> Self {
        CompliancePolicy {
            id: String::new(),
            policy_type: POLICY_TYPE_COMPLIANCE_CONTAINER.to_string(),
            rules: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, PolicyError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, PolicyError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl ComplianceConditions {
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}
