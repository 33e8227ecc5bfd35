use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chatpress::app::AppContext;
use chatpress::cli::{commands, Cli, Commands};
use chatpress::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing, defaulting to info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();

    if let Commands::Validate { url } = &cli.command {
        commands::validate(url)?;
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let ctx = AppContext::new(config);

    match cli.command {
        Commands::Serve { bind, open } => {
            let bind = bind.unwrap_or_else(|| ctx.config.server.bind.clone());
            chatpress::server::serve(ctx, &bind, open).await?;
        }
        Commands::Validate { .. } => {}
        Commands::Extract { url, output } => {
            commands::extract(&ctx, &url, output.as_deref()).await?;
        }
        Commands::Render(args) => {
            commands::render(&ctx, &args).await?;
        }
    }

    Ok(())
}
