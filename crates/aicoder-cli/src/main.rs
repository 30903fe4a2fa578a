//! `aicoder` command line: generate implementations for marked Python functions

use aicoder_core::{AiCoder, CoderConfig};
use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn cli() -> Command {
    Command::new("aicoder")
        .version(env!("CARGO_PKG_VERSION"))
        .about("AI Coder: fill @ai_code Python functions with generated implementations")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Config file (default: $AICODER_CONFIG, then ./aicoder.toml)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log prompts and model replies"),
        )
        .subcommand(
            Command::new("gen")
                .about("Generate code from a file")
                .arg(
                    Arg::new("filepath")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("The file to generate code from"),
                )
                .arg(
                    Arg::new("project-root")
                        .long("project-root")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory outputs are written under (default: config, then .)"),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<CoderConfig> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => CoderConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CoderConfig::load().context("loading config")?,
    };
    Ok(config)
}

async fn run_gen(args: &ArgMatches) -> anyhow::Result<()> {
    let mut config = load_config(args)?;
    if let Some(root) = args.get_one::<PathBuf>("project-root") {
        config = config.with_project_root(root.clone());
    }
    let filepath = args
        .get_one::<PathBuf>("filepath")
        .context("missing filepath")?;

    let coder = AiCoder::from_config(config)?;
    let report = coder.gen_code(filepath).await?;

    for function in &report.functions {
        tracing::info!("{}: {}", function.name, function.decision);
    }
    tracing::info!(
        "Wrote {} ({} generated, {} reused)",
        report.output_path.display(),
        report.generated(),
        report.reused()
    );
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    let verbose = matches.get_flag("verbose")
        || matches
            .subcommand()
            .is_some_and(|(_, args)| args.get_flag("verbose"));
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
    tracing::debug!("args: {:?}", matches);

    let result = match matches.subcommand() {
        Some(("gen", args)) => run_gen(args).await,
        _ => {
            cli().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    result
}
