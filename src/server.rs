//! TCP/TLS server for handling search queries.
//!
//! Accepts connections, optionally wraps them in TLS, and runs one handler
//! task per connection. A connection carries exactly one query/response
//! exchange: read one frame, validate, look the query up in the dataset,
//! write one response line, close.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_rustls::TlsAcceptor;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::dataset::{CachePolicy, Dataset};
use crate::matcher::Algorithm;
use crate::protocol::{validate_query, Response, MAX_QUERY_BYTES};
use crate::tls;

/// How long a connected client may sit silent before the handler gives up
const READ_DEADLINE: Duration = Duration::from_secs(30);

/// Server instance
pub struct Server {
    config: Config,
    dataset: Arc<Dataset>,
    tls_acceptor: Option<TlsAcceptor>,
}

impl Server {
    /// Create a new server instance. Builds the TLS acceptor up front when
    /// TLS is enabled; a bad certificate or key aborts startup here rather
    /// than on the first connection.
    pub fn new(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let dataset = Arc::new(Dataset::new(
            &config.dataset_path,
            CachePolicy::from_reread_flag(config.reread_on_query),
        ));

        let tls_acceptor = match (config.tls_enabled, &config.cert_path, &config.key_path) {
            (false, _, _) => None,
            (true, Some(cert), Some(key)) => Some(tls::build_acceptor(cert, key)?),
            (true, _, _) => {
                return Err(crate::config::ConfigError::MissingTlsCredentials.into());
            }
        };

        Ok(Server {
            config,
            dataset,
            tls_acceptor,
        })
    }

    /// Bind the configured address and serve until the process exits.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        info!(
            address = %listener.local_addr()?,
            tls = self.tls_acceptor.is_some(),
            "Server listening"
        );
        self.serve(listener).await
    }

    /// Accept loop over an already-bound listener.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), Box<dyn std::error::Error>> {
        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    debug!(peer = %addr, "New connection");

                    let dataset = Arc::clone(&self.dataset);
                    let algorithm = self.config.algorithm;
                    let acceptor = self.tls_acceptor.clone();

                    tokio::spawn(async move {
                        let result = match acceptor {
                            Some(acceptor) => match acceptor.accept(stream).await {
                                Ok(stream) => {
                                    handle_connection(stream, addr, &dataset, algorithm).await
                                }
                                Err(e) => {
                                    debug!(peer = %addr, error = %e, "TLS handshake failed");
                                    return;
                                }
                            },
                            None => handle_connection(stream, addr, &dataset, algorithm).await,
                        };

                        if let Err(e) = result {
                            debug!(peer = %addr, error = %e, "Connection error");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    #[cfg(test)]
    fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }
}

/// Handle a single client connection: one query, one response line, close.
///
/// Generic over the stream so raw TCP and TLS sessions share one code
/// path, and so the accept loop's dispatch primitive can change without
/// touching any of this. The stream is owned here and dropped on every
/// return path.
async fn handle_connection<S>(
    mut stream: S,
    peer: SocketAddr,
    dataset: &Dataset,
    algorithm: Algorithm,
) -> std::io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    // One receive is one complete query. The buffer holds one byte more
    // than the protocol maximum so an oversized frame is observable.
    let mut buffer = BytesMut::with_capacity(MAX_QUERY_BYTES + 1);

    match timeout(READ_DEADLINE, stream.read_buf(&mut buffer)).await {
        Ok(read) => {
            read?;
        }
        Err(_) => {
            debug!(peer = %peer, "Client sent nothing before the read deadline");
            return Ok(());
        }
    }

    let started = Instant::now();

    let response = match validate_query(&buffer) {
        Ok(query) => lookup(dataset, algorithm, query).await,
        Err(e) => Response::from(&e),
    };

    info!(
        peer = %peer,
        query = %String::from_utf8_lossy(&buffer).trim_matches(|c: char| c == '\0' || c.is_whitespace()),
        outcome = response.as_line(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "Query served"
    );

    stream.write_all(response.as_line().as_bytes()).await?;
    stream.write_all(b"\n").await?;
    stream.shutdown().await?;

    Ok(())
}

/// Fetch a dataset snapshot and run the configured strategy over it.
async fn lookup(dataset: &Dataset, algorithm: Algorithm, query: &str) -> Response {
    match dataset.snapshot().await {
        Ok(lines) => Response::from_outcome(algorithm.exists(&lines, query)),
        Err(e) => {
            warn!(
                path = %dataset.path().display(),
                error = %e,
                "Dataset lookup failed"
            );
            Response::from(&e)
        }
    }
}
