use anyhow::{Context, Result};
use pcc_resource::ResourceData;
use std::fs;
use std::path::PathBuf;

/// JSON file holding the resource data between invocations.
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StateFile { path: path.into() }
    }

    /// `None` when nothing has been created or imported yet.
    pub fn load(&self) -> Result<Option<ResourceData>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file {}", self.path.display()))?;
        let data: ResourceData = serde_json::from_str(&content)
            .with_context(|| format!("Invalid state file {}", self.path.display()))?;
        Ok(Some(data))
    }

    /// Written to a sibling temp file, then renamed into place.
    pub fn save(&self, data: &ResourceData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        let tmp = self.path.with_extension("json.tmp");

        fs::write(&tmp, json)
            .with_context(|| format!("Failed to write state file {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace state file {}", self.path.display()))?;

        tracing::debug!("Saved state to {}", self.path.display());
        Ok(())
    }

    pub fn remove(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).with_context(|| {
                format!("Failed to remove state file {}", self.path.display())
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcc_resource::{RuleBlock, RESOURCE_ID};

    fn data() -> ResourceData {
        ResourceData {
            id: Some(RESOURCE_ID.to_string()),
            rule: vec![RuleBlock {
                name: "r1".to_string(),
                collections: vec!["prod".to_string()],
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_missing_state_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateFile::new(dir.path().join("state.json"));
        assert!(state.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateFile::new(dir.path().join("state.json"));

        state.save(&data()).unwrap();
        assert_eq!(state.load().unwrap(), Some(data()));
        assert!(!dir.path().join("state.json.tmp").exists());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateFile::new(dir.path().join("state.json"));

        state.save(&data()).unwrap();
        let mut changed = data();
        changed.rule.clear();
        state.save(&changed).unwrap();

        assert!(state.load().unwrap().unwrap().rule.is_empty());
    }

    #[test]
    fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateFile::new(dir.path().join("state.json"));

        state.save(&data()).unwrap();
        state.remove().unwrap();
        assert!(!dir.path().join("state.json").exists());
        // Removing twice is fine
        state.remove().unwrap();
    }

    #[test]
    fn test_corrupt_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();

        let err = StateFile::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Invalid state file"));
    }
}
