use pcc_client::ClientError;
use pcc_policy::POLICY_TYPE_COMPLIANCE_CONTAINER;
use std::fmt;
use thiserror::Error;

/// Lifecycle step named in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    Update,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Create => "creating",
            Action::Read => "reading",
            Action::Update => "updating",
        })
    }
}

/// Declarative input that the schema does not allow.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("rule {index} ({name:?}): at most {max} conditions block allowed, got {count}")]
    TooManyConditions {
        index: usize,
        name: String,
        max: usize,
        count: usize,
    },
}

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("error {action} {} policy: {source}", POLICY_TYPE_COMPLIANCE_CONTAINER)]
    Remote {
        action: Action,
        #[source]
        source: ClientError,
    },

    #[error("error {action} {} policy: {source}", POLICY_TYPE_COMPLIANCE_CONTAINER)]
    Schema {
        action: Action,
        #[source]
        source: SchemaError,
    },

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl ResourceError {
    pub fn action(&self) -> Option<Action> {
        match self {
            ResourceError::Remote { action, .. } | ResourceError::Schema { action, .. } => {
                Some(*action)
            }
            ResourceError::ConfigError(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ResourceError>;
