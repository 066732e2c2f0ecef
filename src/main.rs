use clap::Parser;
use portfolio_api::config::Command;
use portfolio_api::core::admin::SeedOutcome;
use portfolio_api::utils::{logger, validation::Validate};
use portfolio_api::{server, ServerCli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = ServerCli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    logger::init_logger(
        config.logging.format,
        cli.verbose,
        config.logging.level.as_deref(),
    );

    tracing::info!("Starting portfolio-api");
    if cli.verbose {
        tracing::debug!("Command: {:?}", cli.command());
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    match cli.command() {
        Command::Serve => server::run(config).await?,
        Command::SeedAdmin => match server::seed_admin_command(&config).await? {
            SeedOutcome::Created => println!("✅ Admin user created"),
            SeedOutcome::Rehashed => println!("✅ Admin password hash replaced"),
            SeedOutcome::Unchanged => println!("Admin user already exists"),
        },
    }

    Ok(())
}
