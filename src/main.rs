use std::sync::Arc;

use clap::Parser;
use tracing::info;

use postboard::{Config, Error, PostStore, Server, app, telemetry};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::parse();
    telemetry::init(&config.log)?;

    let store = if config.empty { PostStore::new() } else { PostStore::seeded() };
    info!(posts = store.len(), "post store ready");

    Server::bind(config.addr()).serve(app(Arc::new(store))).await
}
