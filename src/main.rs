use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use go_test_locator::cli;
use go_test_locator::config::ResolverConfig;
use go_test_locator::env::ProcessEnv;
use go_test_locator::logging::{self, Verbosity};

fn main() -> Result<()> {
    let args = cli::Args::parse();
    logging::init(Verbosity::from_flags(args.verbose, args.quiet), &ProcessEnv);
    args.validate().context("Invalid arguments")?;

    let config = ResolverConfig::load(args.config.as_deref(), &ProcessEnv)
        .context("Failed to load configuration")?;
    let config = args.apply_overrides(config);

    let output = cli::run(&args, config)?;
    println!("{output}");

    Ok(())
}
