use anyhow::Result;
use crate::cli::commands::with_review_store;
use crate::config::TerraPriceConfig;
use crate::observability::gateway_metrics;
use crate::review::SubmissionStatus;

pub struct SummaryCommand;

impl SummaryCommand {
    pub async fn execute(&self, config: &TerraPriceConfig) -> Result<()> {
        with_review_store(config, |store| async move {
            let summary = store.summary().await;

            println!();
            println!("📊 REVIEW QUEUE");
            println!("──────────────");
            println!("   📋 Total: {}", summary.total);
            println!("   🟡 Pending: {}", summary.pending);
            println!("   🟢 Approved: {}", summary.approved);
            println!("   🔴 Denied: {}", summary.denied);

            let pending = store.with_status(SubmissionStatus::Pending).await;
            if let Some(oldest) = pending.last() {
                println!();
                println!(
                    "⏳ Oldest pending: {} ({}, uploaded {})",
                    oldest.id,
                    oldest.file_name,
                    oldest.created_at.format("%Y-%m-%d")
                );
            }

            gateway_metrics().log_stats();
            Ok(())
        })
        .await
    }
}
