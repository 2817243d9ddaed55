use anyhow::Result;
use clap::Parser;

use terraprice_review::cli::commands::{
    init_config::InitConfigCommand, list::ListCommand, review::ReviewSubmissionCommand,
    show::ShowCommand, show_config::ShowConfigCommand, show_how_to_review, summary::SummaryCommand,
};
use terraprice_review::cli::{Cli, Commands};
use terraprice_review::review::{DenialReason, ReviewCommand};
use terraprice_review::{init_telemetry, TerraPriceConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Neither needs a loadable configuration
    match &cli.command {
        None => return show_how_to_review(),
        Some(Commands::InitConfig { path, force }) => {
            return InitConfigCommand::new(path.clone(), *force).execute();
        }
        Some(_) => {}
    }

    TerraPriceConfig::load_env_file()?;
    let config = match &cli.config {
        Some(path) => TerraPriceConfig::load_from(path)?,
        None => TerraPriceConfig::load()?,
    };
    init_telemetry(&config.observability)?;

    match cli.command {
        None | Some(Commands::InitConfig { .. }) => Ok(()),
        Some(Commands::List { status }) => tokio::runtime::Runtime::new()?
            .block_on(async { ListCommand::new(status).execute(&config).await }),
        Some(Commands::Show { id }) => tokio::runtime::Runtime::new()?
            .block_on(async { ShowCommand::new(id).execute(&config).await }),
        Some(Commands::Approve { id }) => tokio::runtime::Runtime::new()?.block_on(async {
            ReviewSubmissionCommand::new(id, ReviewCommand::Approve)
                .execute(&config)
                .await
        }),
        Some(Commands::Deny { id, reason, preset }) => {
            let reason = match (preset, reason) {
                (Some(preset), _) => DenialReason::from(preset),
                (None, Some(text)) => DenialReason::from(text),
                (None, None) => anyhow::bail!("a denial needs --reason or --preset"),
            };
            tokio::runtime::Runtime::new()?.block_on(async {
                ReviewSubmissionCommand::new(id, ReviewCommand::Deny(reason))
                    .execute(&config)
                    .await
            })
        }
        Some(Commands::Undo { id }) => tokio::runtime::Runtime::new()?.block_on(async {
            ReviewSubmissionCommand::new(id, ReviewCommand::Undo)
                .execute(&config)
                .await
        }),
        Some(Commands::Config) => ShowConfigCommand.execute(&config),
        Some(Commands::Summary) => tokio::runtime::Runtime::new()?
            .block_on(async { SummaryCommand.execute(&config).await }),
    }
}
