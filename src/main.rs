use anyhow::Context as _;
use clap::{CommandFactory, Parser};
use clap::error::ErrorKind;
use tracing_subscriber::EnvFilter;

use og_renderer::OgError;
use og_renderer::cli::{self, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let mode = match cli.mode() {
        Ok(mode) => mode,
        Err(OgError::Usage(msg)) => Cli::command().error(ErrorKind::MissingRequiredArgument, msg).exit(),
        Err(err) => return Err(err.into()),
    };

    let (config, items) = cli::plan(mode).context("resolve configuration")?;
    let mut stdout = std::io::stdout().lock();
    cli::generate_all(config, &items, &cli.output_dir, &mut stdout)
        .with_context(|| format!("generate images into '{}'", cli.output_dir.display()))?;
    Ok(())
}

/// `-v` wins over `RUST_LOG`; without either only warnings are shown.
fn init_tracing(cli: &Cli) {
    let filter = if cli.verbose > 0 {
        EnvFilter::new(cli.log_level())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
