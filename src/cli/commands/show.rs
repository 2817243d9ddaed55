use anyhow::{anyhow, Result};
use crate::cli::commands::{print_submission_detail, with_review_store};
use crate::config::TerraPriceConfig;

pub struct ShowCommand {
    pub id: String,
}

impl ShowCommand {
    pub fn new(id: String) -> Self {
        Self { id }
    }

    pub async fn execute(&self, config: &TerraPriceConfig) -> Result<()> {
        let id = self.id.clone();
        with_review_store(config, |store| async move {
            let submission = store
                .select(&id)
                .await
                .ok_or_else(|| anyhow!("submission {id} not found"))?;
            println!();
            print_submission_detail(&submission);
            Ok(())
        })
        .await
    }
}
