use serde::{Deserialize, Serialize};

/// Named scope of resources a rule applies to.
///
/// Collections are owned by the console; rules only refer to them by name.
/// Any other fields the console returns alongside the name are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(default)]
    pub name: String,
}

impl Collection {
    pub fn named(name: impl Into<String>) -> Self {
        Collection { name: name.into() }
    }
}
