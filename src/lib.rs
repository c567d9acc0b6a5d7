pub mod cache;
pub mod config;
pub mod error;
pub mod handler;
pub mod log;
pub mod message;
pub mod providers;
pub mod rate_provider;
pub mod server;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::cache::RateCache;
use crate::handler::ConversionHandler;
use crate::providers::frankfurter::FrankfurterProvider;
use crate::server::Server;

fn load_config(config_path: Option<&str>) -> Result<config::AppConfig> {
    match config_path {
        Some(path) => config::AppConfig::load_from_path(path),
        None => config::AppConfig::load(),
    }
}

pub async fn run_serve(config_path: Option<&str>, bind_override: Option<&str>) -> Result<()> {
    info!("Currency converter service starting...");

    let config = load_config(config_path)?;
    debug!("Loaded config: {config:#?}");

    let cache = RateCache::new(config.cache.duration(), config.cache.max_entries);
    let provider = FrankfurterProvider::new(&config.provider.base_url, config.provider.timeout())?;
    let handler = ConversionHandler::new(Arc::new(provider), cache);

    let bind = bind_override.unwrap_or(&config.server.bind);
    let server = Server::bind(bind).await?;
    info!("Listening on {}", server.local_addr()?);

    server.run(handler).await
}

pub async fn run_request(
    addr: &str,
    to_currency: &str,
    amount: f64,
    date: Option<&str>,
) -> Result<()> {
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    let request = message::ConversionRequest {
        to_currency: Some(to_currency.to_string()),
        amount: Some(amount),
        date: date.map(str::to_string),
    };

    let stream = tokio::net::TcpStream::connect(addr)
        .await
        .with_context(|| format!("Failed to connect to service at {addr}"))?;
    let (reader, mut writer) = stream.into_split();

    let mut line = serde_json::to_string(&request)?;
    debug!("Sending request: {line}");
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;

    let mut reply = String::new();
    BufReader::new(reader)
        .read_line(&mut reply)
        .await
        .context("Failed to read response from service")?;
    debug!("Received response: {}", reply.trim_end());

    match serde_json::from_str::<message::ConversionResponse>(reply.trim_end())
        .context("Failed to parse response from service")?
    {
        message::ConversionResponse::Success {
            converted_amount,
            rate,
            date,
        } => {
            println!("On {date}, {amount} USD = {converted_amount:.2} {to_currency}");
            println!("Exchange rate: 1 USD = {rate:.4} {to_currency}");
            Ok(())
        }
        message::ConversionResponse::Error { error } => anyhow::bail!(error),
    }
}
