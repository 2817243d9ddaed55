use crate::config::TerraPriceConfig;
use crate::gateway::RestUploadGateway;
use crate::review::{Submission, SubmissionStore};
use anyhow::Result;
use std::io::Write;

pub mod init_config;
pub mod list;
pub mod review;
pub mod show;
pub mod show_config;
pub mod summary;

/// Connect to the backend, fill the store's cache and hand it to `f`
pub async fn with_review_store<F, Fut, R>(config: &TerraPriceConfig, f: F) -> Result<R>
where
    F: FnOnce(SubmissionStore<RestUploadGateway>) -> Fut,
    Fut: std::future::Future<Output = Result<R>>,
{
    print!("🔄 Connecting to backend... ");
    std::io::stdout().flush()?;

    let gateway = match RestUploadGateway::from_config(&config.backend) {
        Ok(gateway) => gateway,
        Err(e) => {
            println!("❌");
            return Err(e.into());
        }
    };
    let store = SubmissionStore::with_policy(gateway, config.review.policy());

    match store.fetch_all().await {
        Ok(submissions) => {
            println!("✅ ({} submissions)", submissions.len());
            f(store).await
        }
        Err(e) => {
            println!("❌ {e}");
            Err(e.into())
        }
    }
}

pub fn show_how_to_review() -> Result<()> {
    println!("🏗️  TerraPrice - Floorplan Submission Review");
    println!();
    println!("To get started:");
    println!("  📋 terraprice list --status pending   # Submissions waiting for review");
    println!("  🔎 terraprice show <id>               # Inspect one submission");
    println!("  ✅ terraprice approve <id>            # Accept a floorplan");
    println!("  ⛔ terraprice deny <id> --preset poor-image-quality");
    println!("  ↩️  terraprice undo <id>               # Send a decision back to pending");
    println!("  📊 terraprice summary                 # Review queue overview");
    println!();
    println!("Setup:");
    println!("  ⚙️  terraprice init-config             # Write a terraprice.toml template");
    println!("  🔧 terraprice config                  # Show the settings in effect");
    println!();
    println!("💡 Set SUPABASE_URL and SUPABASE_ANON_KEY (or terraprice.toml) before connecting.");
    Ok(())
}

fn status_icon(submission: &Submission) -> &'static str {
    use crate::review::SubmissionStatus::*;
    match submission.status {
        Pending => "🟡",
        Approved => "🟢",
        Denied => "🔴",
    }
}

pub(crate) fn print_submission_row(submission: &Submission) {
    println!(
        "{} {:<36}  {:<8}  {:<28}  {}",
        status_icon(submission),
        submission.id,
        submission.status,
        submission.file_name,
        submission.created_at.format("%Y-%m-%d %H:%M")
    );
}

pub(crate) fn print_submission_detail(submission: &Submission) {
    println!("{} Submission {}", status_icon(submission), submission.id);
    println!("   📄 File: {} ({} bytes)", submission.file_name, submission.file_size);
    println!("   📁 Path: {}", submission.file_path);
    println!("   👤 Owner: {}", submission.owner_user_id);
    println!("   🏷️  Status: {}", submission.status);
    if let Some(comment) = &submission.review_comment {
        println!("   💬 Review comment: {comment}");
    }
    println!(
        "   🕒 Created: {}  Updated: {}",
        submission.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        submission.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
}
