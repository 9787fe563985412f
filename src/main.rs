use backline::cli::{Cli, Commands};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backline=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { path, name }) => {
            backline::cli::init::run(path, name).await?;
        }
        Some(Commands::Serve { host, port }) => {
            backline::cli::serve::run(&cli.config, &host, port).await?;
        }
        Some(Commands::Migrate) => {
            backline::cli::migrate::run(&cli.config).await?;
        }
        Some(Commands::User { command }) => {
            backline::cli::user::run(&cli.config, command).await?;
        }
        Some(Commands::Submit { event_id, files }) => {
            backline::cli::submit::run(&cli.config, event_id, files).await?;
        }
        None => {
            // No subcommand provided, print help
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
