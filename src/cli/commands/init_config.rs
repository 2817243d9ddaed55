use anyhow::{bail, Result};
use std::path::PathBuf;
use crate::config::TerraPriceConfig;

/// Write a configuration template. Existing files are kept unless `force` is set.
pub struct InitConfigCommand {
    pub path: PathBuf,
    pub force: bool,
}

impl InitConfigCommand {
    pub fn new(path: PathBuf, force: bool) -> Self {
        Self { path, force }
    }

    pub fn execute(&self) -> Result<()> {
        if self.path.exists() && !self.force {
            bail!(
                "{} already exists; use --force to overwrite it",
                self.path.display()
            );
        }

        TerraPriceConfig::default().save_to_file(&self.path)?;
        println!("✅ Wrote {}", self.path.display());
        println!("   💡 Fill in backend.url and backend.api_key, or export SUPABASE_URL / SUPABASE_ANON_KEY");
        Ok(())
    }
}
