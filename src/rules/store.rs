use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use tracing::debug;

use super::{defaults, RuleSet};

/// File name acting as the fixed logical key within the store directory.
const RULES_FILE: &str = "replace_rules.json";

/// File-backed persistence for the substitution rules, stored as one flat
/// string-to-string JSON object. `load` hands out an owned snapshot, so an
/// in-flight processing call never observes a concurrent `save`.
pub struct RuleStore {
    dir: PathBuf,
}

impl RuleStore {
    /// Open a store at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating rule store directory {:?}", dir))?;
        Ok(Self { dir })
    }

    fn rules_path(&self) -> PathBuf {
        self.dir.join(RULES_FILE)
    }

    /// Load the persisted rule set, or `None` if nothing has been saved yet.
    pub fn load(&self) -> Result<Option<RuleSet>> {
        let path = self.rules_path();
        if !path.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let rules: RuleSet = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        debug!(rules = rules.len(), path = %path.display(), "loaded rule set");
        Ok(Some(rules))
    }

    /// Load the persisted rules, falling back to the built-in table.
    pub fn load_or_default(&self) -> Result<RuleSet> {
        Ok(self.load()?.unwrap_or_else(defaults::default_rules))
    }

    /// Persist `rules`, replacing any previous snapshot. Writes go through a
    /// `.tmp` file renamed into place so readers never see a partial file.
    pub fn save(&self, rules: &RuleSet) -> Result<()> {
        let path = self.rules_path();
        let tmp = self.dir.join(format!("{}.tmp", RULES_FILE));
        let text = serde_json::to_string_pretty(rules).context("serializing rule set")?;
        fs::write(&tmp, text).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("renaming {} to {}", tmp.display(), path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_on_empty_store_is_none() -> Result<()> {
        let dir = tempdir()?;
        let store = RuleStore::new(dir.path())?;
        assert!(store.load()?.is_none());
        Ok(())
    }

    #[test]
    fn save_then_load_round_trips() -> Result<()> {
        let dir = tempdir()?;
        let store = RuleStore::new(dir.path())?;

        let mut rules = RuleSet::new();
        rules.insert("早", "早 7.30~15.00");
        rules.insert("休", "休息");
        store.save(&rules)?;

        assert_eq!(store.load()?, Some(rules));
        Ok(())
    }

    #[test]
    fn load_or_default_falls_back_to_the_builtin_table() -> Result<()> {
        let dir = tempdir()?;
        let store = RuleStore::new(dir.path())?;
        assert_eq!(store.load_or_default()?, defaults::default_rules());

        let rules: RuleSet = [("X", "Y")].into_iter().collect();
        store.save(&rules)?;
        assert_eq!(store.load_or_default()?, rules);
        Ok(())
    }

    #[test]
    fn corrupt_store_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let store = RuleStore::new(dir.path())?;
        fs::write(dir.path().join(RULES_FILE), "not json")?;
        assert!(store.load().is_err());
        Ok(())
    }
}
