use anyhow::Context;
use tcm_config::TcmConfig;
use tcm_server::open_service;

use crate::cli::SeedArgs;

/// Handle `tcm seed-tags`.
pub async fn handle(args: &SeedArgs, config: &TcmConfig) -> anyhow::Result<()> {
    let service = open_service(&config.database.target())
        .await
        .context("failed to open database")?;
    let report = service
        .seed_predefined_tags(args.clear)
        .await
        .context("failed to seed predefined tags")?;

    if report.skipped {
        println!("Tags already exist; nothing seeded. Use --clear to replace them.");
    } else {
        if args.clear {
            println!("Cleared {} existing tag(s).", report.cleared);
        }
        println!("Seeded {} predefined tag(s).", report.created);
    }
    Ok(())
}
