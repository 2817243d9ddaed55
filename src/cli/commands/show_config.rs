use anyhow::Result;
use crate::config::TerraPriceConfig;

/// Print the configuration after file, environment and fallback layering
pub struct ShowConfigCommand;

impl ShowConfigCommand {
    pub fn execute(&self, config: &TerraPriceConfig) -> Result<()> {
        let mut shown = config.clone();
        if shown.backend.api_key.is_some() {
            shown.backend.api_key = Some("********".to_string());
        }

        println!("⚙️  Effective configuration");
        println!();
        print!("{}", toml::to_string_pretty(&shown)?);
        Ok(())
    }
}
