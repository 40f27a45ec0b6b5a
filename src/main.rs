mod addrs;
mod body;
mod config;
mod err;
mod http;
mod lifecycle;
mod opt;
mod routes;
mod signal;
mod tcp;

use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), err::DisplayError> {
    let opt::Options {
        verbose,
        port,
        shutdown_timeout,
        target,
    } = clap::Parser::parse();

    env_logger::Builder::new()
        .filter_level(match verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();

    let config = config::ServeConfig::resolve(port, target.as_deref())?;
    lifecycle::run(config, shutdown_timeout.map(Duration::from_secs)).await?;

    Ok(())
}
