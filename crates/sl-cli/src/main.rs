//! Sluice CLI - directive-driven database migrations and seeds

use clap::Parser;
use sl_db::DefaultConnector;

mod cli;
mod commands;
mod completion;
mod context;
mod dispatcher;
mod guard;
#[cfg(test)]
mod test_support;

use cli::Cli;

/// Initialise logging once: `info` by default, `debug` with `--verbose`,
/// `RUST_LOG` overrides both.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let connector = DefaultConnector;
    let code = guard::run(dispatcher::dispatch(&cli, &connector)).await;
    if code != 0 {
        std::process::exit(code);
    }
    if cli.global.force_exit {
        log::debug!("--force-exit given, exiting immediately");
        std::process::exit(0);
    }
}
