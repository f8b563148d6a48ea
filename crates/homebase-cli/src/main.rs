use anyhow::Result;
use clap::Parser;
use homebase_cli::config::Cli;
use homebase_cli::run::run;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let out = run(cli).await?;
    print!("{out}");
    Ok(())
}
