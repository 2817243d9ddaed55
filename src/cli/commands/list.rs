use anyhow::Result;
use crate::cli::commands::{print_submission_row, with_review_store};
use crate::config::TerraPriceConfig;
use crate::review::SubmissionStatus;

pub struct ListCommand {
    pub status: Option<SubmissionStatus>,
}

impl ListCommand {
    pub fn new(status: Option<SubmissionStatus>) -> Self {
        Self { status }
    }

    pub async fn execute(&self, config: &TerraPriceConfig) -> Result<()> {
        let status = self.status;
        with_review_store(config, |store| async move {
            let submissions = match status {
                Some(status) => store.with_status(status).await,
                None => store.submissions().await,
            };

            println!();
            if submissions.is_empty() {
                println!("📋 No submissions found");
                return Ok(());
            }
            for submission in &submissions {
                print_submission_row(submission);
            }
            println!();
            println!("📈 {} submission(s) listed", submissions.len());
            Ok(())
        })
        .await
    }
}
