use anyhow::Result;
use crate::cli::commands::{print_submission_detail, with_review_store};
use crate::config::TerraPriceConfig;
use crate::review::ReviewCommand;

/// Approve, deny or undo a single submission
pub struct ReviewSubmissionCommand {
    pub id: String,
    pub command: ReviewCommand,
}

impl ReviewSubmissionCommand {
    pub fn new(id: String, command: ReviewCommand) -> Self {
        Self { id, command }
    }

    pub async fn execute(&self, config: &TerraPriceConfig) -> Result<()> {
        let id = self.id.clone();
        let command = self.command.clone();
        with_review_store(config, |store| async move {
            let result = match command {
                ReviewCommand::Approve => store.approve(&id).await,
                ReviewCommand::Deny(reason) => store.deny(&id, reason).await,
                ReviewCommand::Undo => store.undo(&id).await,
            };

            match result {
                Ok(action) => {
                    println!();
                    println!(
                        "✅ Submission {} moved from {} to {}",
                        action.submission_id, action.previous_status, action.new_status
                    );
                    if let Some(submission) = store.get(&id).await {
                        print_submission_detail(&submission);
                    }
                    if action.can_undo {
                        println!();
                        println!("💡 Changed your mind? Run 'terraprice undo {id}'");
                    }
                    Ok(())
                }
                Err(e) => {
                    println!();
                    if e.is_local() {
                        println!("⚠️  Rejected: {e}");
                    } else {
                        println!("❌ Backend update failed, nothing was changed: {e}");
                    }
                    Err(e.into())
                }
            }
        })
        .await
    }
}
