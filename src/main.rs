use std::process::ExitCode;
use clap::Parser as ClapParser;
use tracing::{error, Level};
use krypton::Config;

fn main() -> ExitCode {
    let config: Config = Config::parse();

    tracing_subscriber::fmt()
        .with_max_level(if config.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match krypton::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        },
    }
}
