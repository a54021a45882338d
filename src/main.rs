//! Records the top of book of a Binance depth stream into MotherDuck.
//!
//! Each depth update becomes one row of `htf.depth_updates`. The table is
//! wiped when the process is stopped with SIGINT or SIGTERM.

use config::Config;
use connection::BinanceFeed;
use error::Error;
use lifecycle::ShutdownSignal;
use store::{MotherDuckStore, SharedStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod connection;
mod error;
mod handler;
mod lifecycle;
mod store;
#[cfg(test)]
mod test_utils;
mod writer;

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = Config::from_env()?;
    info!(symbol = %config.symbol, "Starting depth recorder");

    let store = SharedStore::new(MotherDuckStore::connect(&config.database_url())?);
    info!("Connected to MotherDuck");

    if config.clear_on_start {
        let rows = store.delete_all()?;
        info!(rows, "Cleared depth rows left by a previous run");
    }

    let shutdown = ShutdownSignal::install()?;
    let feed = BinanceFeed::new(&config.stream_url, config.credentials.clone());

    lifecycle::run(&feed, &config.symbol, store, shutdown.recv()).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
