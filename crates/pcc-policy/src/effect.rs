use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PolicyError;

/// Outcome applied when a rule matches a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Effect {
    Ignore,
    Alert,
    Block,
    AlertBlock,
}

impl Effect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Ignore => "ignore",
            Effect::Alert => "alert",
            Effect::Block => "block",
            Effect::AlertBlock => "alert, block",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Effect {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The console writes the combined effect as "alert, block"; accept
        // any spacing around the comma.
        let normalized: Vec<&str> = s.split(',').map(str::trim).collect();
        match normalized.as_slice() {
            ["ignore"] => Ok(Effect::Ignore),
            ["alert"] => Ok(Effect::Alert),
            ["block"] => Ok(Effect::Block),
            ["alert", "block"] => Ok(Effect::AlertBlock),
            _ => Err(PolicyError::InvalidEffect(s.to_string())),
        }
    }
}

impl TryFrom<String> for Effect {
    type Error = PolicyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Effect> for String {
    fn from(effect: Effect) -> Self {
        effect.as_str().to_string()
    }
}

/// Deserialize an optional effect, reading an empty string as unset.
///
/// Older consoles send `"effect": ""` for rules that were never given one.
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<Effect>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_effects() {
        assert_eq!("ignore".parse::<Effect>().unwrap(), Effect::Ignore);
        assert_eq!("alert".parse::<Effect>().unwrap(), Effect::Alert);
        assert_eq!("block".parse::<Effect>().unwrap(), Effect::Block);
        assert_eq!("alert, block".parse::<Effect>().unwrap(), Effect::AlertBlock);
    }

    #[test]
    fn test_parse_combined_effect_spacing() {
        assert_eq!("alert,block".parse::<Effect>().unwrap(), Effect::AlertBlock);
        assert_eq!(" alert ,  block ".parse::<Effect>().unwrap(), Effect::AlertBlock);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("deny".parse::<Effect>().is_err());
        assert!("".parse::<Effect>().is_err());
        assert!("block, alert".parse::<Effect>().is_err());
    }

    #[test]
    fn test_display_matches_wire_form() {
        for effect in [Effect::Ignore, Effect::Alert, Effect::Block, Effect::AlertBlock] {
            assert_eq!(effect.to_string().parse::<Effect>().unwrap(), effect);
        }
        assert_eq!(Effect::AlertBlock.to_string(), "alert, block");
    }

    #[test]
    fn test_serde_json_string_form() {
        let json = serde_json::to_string(&Effect::AlertBlock).unwrap();
        assert_eq!(json, r#""alert, block""#);

        let effect: Effect = serde_json::from_str(r#""block""#).unwrap();
        assert_eq!(effect, Effect::Block);

        let bad: Result<Effect, _> = serde_json::from_str(r#""prevent""#);
        assert!(bad.is_err());
    }
}
