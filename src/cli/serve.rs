use anyhow::Result;

use crate::api;
use crate::core::{AppConfig, logging};

pub async fn run(host: String, port: String) -> Result<()> {
    logging::init(&logging::server_directives());
    let config = AppConfig::default();
    api::serve(host, port, config).await
}
