//! Declarative resource for the container compliance policy.
//!
//! The resource maps an ordered list of rule blocks onto the console's
//! whole-policy API. Create and update both replace the full rule set, read
//! overwrites local state with what the console holds, and delete leaves the
//! console untouched.

pub mod error;
pub mod mapping;
pub mod resource;
pub mod schema;

pub use error::{Action, ResourceError, Result, SchemaError};
pub use mapping::{flatten, parse};
pub use resource::{import, ComplianceContainerPolicy, ResourceTimeouts, DEFAULT_TIMEOUT, RESOURCE_ID};
pub use schema::{
    ComplianceCheckBlock, ConditionsBlock, PolicyConfig, ResourceData, RuleBlock,
    MAX_CONDITIONS_BLOCKS,
};
