mod cli;
mod commands;
mod error;
mod output;

use std::time::Duration;

use clap::{CommandFactory, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use bitforge_core::Provider;

use crate::cli::{Cli, Command, GlobalOpts, OutputFormat};
use crate::commands::{Session, config_cmd, resource};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let global = cli.global;
    match cli.command {
        // Offline commands
        Command::Config(args) => config_cmd::handle(args, &global),
        Command::Completions(args) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "bitforge", &mut std::io::stdout());
            Ok(())
        }
        Command::Resources => resource::list_kinds(session(&global, None)?),

        // Everything else talks to Bitbucket
        Command::Create(args) => {
            let (provider, session) = connect(&global).await?;
            resource::create(&provider, &args, session).await
        }
        Command::Read(args) => {
            let (provider, session) = connect(&global).await?;
            resource::read(&provider, &args, session).await
        }
        Command::Update(args) => {
            let (provider, session) = connect(&global).await?;
            resource::update(&provider, &args, session).await
        }
        Command::Delete(args) => {
            let (provider, session) = connect(&global).await?;
            resource::delete(&provider, &args, session).await
        }
        Command::Import(args) => {
            let (provider, session) = connect(&global).await?;
            resource::import(&provider, &args, session).await
        }
    }
}

/// Output settings: `--output` wins over the config file default.
fn session(global: &GlobalOpts, configured: Option<&str>) -> Result<Session, CliError> {
    let format = match (global.output, configured) {
        (Some(format), _) => format,
        (None, Some(name)) => {
            OutputFormat::from_str(name, true).map_err(|reason| CliError::Validation {
                field: "defaults.output".into(),
                reason,
            })?
        }
        (None, None) => OutputFormat::Json,
    };
    Ok(Session {
        format,
        quiet: global.quiet,
    })
}

/// Load configuration, resolve credentials and build the provider.
async fn connect(global: &GlobalOpts) -> Result<(Provider, Session), CliError> {
    let cfg = config_cmd::load(global)?;
    let session = session(global, Some(&cfg.defaults.output))?;

    let mut provider_config = cfg.provider_config(global.profile.as_deref())?;
    if let Some(secs) = global.timeout {
        provider_config.timeout = Duration::from_secs(secs);
    }

    tracing::debug!(api = %provider_config.api_url, "connecting");
    let provider = Provider::connect(provider_config).await?;
    Ok((provider, session))
}
