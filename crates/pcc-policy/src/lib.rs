pub mod collection;
pub mod effect;
pub mod error;
pub mod policy;

pub use collection::Collection;
pub use effect::{deserialize_optional as deserialize_optional_effect, Effect};
pub use error::PolicyError;
pub use policy::{
    ComplianceCheck, ComplianceConditions, CompliancePolicy, ComplianceRule,
    POLICY_TYPE_COMPLIANCE_CONTAINER,
};
