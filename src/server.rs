use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, warn};

use crate::handler::ConversionHandler;
use crate::message::{ConversionRequest, ConversionResponse};

/// Newline-delimited JSON request/reply server.
///
/// Connections are accepted and served one at a time on a single task, and
/// each request line is answered with exactly one response line before the
/// next is read. At most one request, and thus at most one upstream fetch, is
/// ever in flight.
pub struct Server {
    listener: TcpListener,
}

impl Server {
    pub async fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        Ok(Server { listener })
    }

    pub fn local_addr(&self) -> Result<std::net::SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn run(self, handler: ConversionHandler) -> Result<()> {
        loop {
            let (stream, peer) = self
                .listener
                .accept()
                .await
                .context("Failed to accept connection")?;
            debug!(%peer, "Client connected");

            // A dropped connection ends that exchange only.
            if let Err(e) = serve_connection(stream, &handler).await {
                warn!(%peer, "Connection error: {e}");
            }
        }
    }
}

async fn serve_connection(stream: TcpStream, handler: &ConversionHandler) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        debug!("Received request: {line}");

        let response = match serde_json::from_str::<ConversionRequest>(&line) {
            Ok(request) => handler.handle(request).await,
            Err(e) => {
                warn!("Malformed request: {e}");
                ConversionResponse::Error {
                    error: format!("Malformed request: {e}"),
                }
            }
        };

        let mut reply = serde_json::to_string(&response)?;
        debug!("Sending response: {reply}");
        reply.push('\n');
        writer.write_all(reply.as_bytes()).await?;
    }

    Ok(())
}
