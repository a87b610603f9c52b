//! Query client for the haystackd server.
//!
//! Three modes: one-shot (`--query`), interactive prompt (default), and a
//! concurrent load driver (`--query ... --clients N`). Reads the same TOML
//! configuration file as the server for host, port, and TLS settings; any
//! transport failure is reported as the local `ERROR: Communication failed`
//! rather than a crash.

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::TlsConnector;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use haystackd::config::{load_toml, TomlConfig};
use haystackd::tls;

/// Produced locally when no response is obtained at all
const COMMUNICATION_FAILED: &str = "ERROR: Communication failed";

#[derive(Parser, Debug)]
#[command(name = "haystack-client")]
#[command(about = "Query a haystackd server", long_about = None)]
struct ClientArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server host
    #[arg(long)]
    host: Option<String>,

    /// Server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Use TLS
    #[arg(long)]
    tls: Option<bool>,

    /// Skip server certificate verification
    #[arg(long)]
    no_verify: bool,

    /// CA bundle for certificate verification
    #[arg(long)]
    ca_path: Option<PathBuf>,

    /// One-shot query; without it the client prompts interactively
    #[arg(short, long)]
    query: Option<String>,

    /// Fire this many concurrent copies of the query
    #[arg(long)]
    clients: Option<usize>,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

struct ClientSession {
    host: String,
    port: u16,
    connector: Option<TlsConnector>,
}

impl ClientSession {
    /// Send one query and return the server's response line, or the local
    /// communication-failure line if anything goes wrong on the way.
    async fn send_query(&self, query: &str) -> String {
        match self.try_send(query).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Error communicating with server");
                COMMUNICATION_FAILED.to_string()
            }
        }
    }

    async fn try_send(
        &self,
        query: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let stream = TcpStream::connect((self.host.as_str(), self.port)).await?;

        match &self.connector {
            Some(connector) => {
                let name = ServerName::try_from(self.host.clone())?;
                let mut stream = connector.connect(name, stream).await?;
                exchange(&mut stream, query).await
            }
            None => {
                let mut stream = stream;
                exchange(&mut stream, query).await
            }
        }
    }
}

/// One write, one response line; the server closes the connection after
/// responding, so reading to EOF collects exactly one line.
async fn exchange<S>(
    stream: &mut S,
    query: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.write_all(query.as_bytes()).await?;

    let mut response = String::new();
    stream.read_to_string(&mut response).await?;
    Ok(response.trim_end().to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = ClientArgs::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let toml_config = match args.config {
        Some(ref path) => load_toml(path)?,
        None => TomlConfig::default(),
    };

    let host = args.host.unwrap_or(toml_config.server.host);
    let port = args.port.unwrap_or(toml_config.server.port);
    let use_tls = args.tls.unwrap_or(toml_config.server.tls_enabled);
    let verify = !args.no_verify && toml_config.tls.verify;
    let ca_path = args.ca_path.or(toml_config.tls.ca_path);

    let connector = if use_tls {
        Some(tls::build_connector(verify, ca_path.as_deref())?)
    } else {
        None
    };

    let session = Arc::new(ClientSession {
        host,
        port,
        connector,
    });

    match (args.query, args.clients) {
        (Some(query), Some(clients)) => run_load(session, query, clients).await,
        (Some(query), None) => {
            println!("Server response: {}", session.send_query(&query).await);
        }
        (None, _) => run_interactive(session).await?,
    }

    Ok(())
}

/// Fire `clients` concurrent copies of the same query and report the
/// wall-clock total.
async fn run_load(session: Arc<ClientSession>, query: String, clients: usize) {
    let started = Instant::now();

    let mut handles = Vec::with_capacity(clients);
    for _ in 0..clients {
        let session = Arc::clone(&session);
        let query = query.clone();
        handles.push(tokio::spawn(
            async move { session.send_query(&query).await },
        ));
    }

    for handle in handles {
        match handle.await {
            Ok(response) => println!("Server response: {response}"),
            Err(e) => warn!(error = %e, "Client task failed"),
        }
    }

    println!(
        "Total execution time for {clients} clients: {:.4} seconds",
        started.elapsed().as_secs_f64()
    );
}

async fn run_interactive(session: Arc<ClientSession>) -> std::io::Result<()> {
    let stdin = std::io::stdin();

    loop {
        print!("Enter the string to search for: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }

        let query = line.trim();
        if query.eq_ignore_ascii_case("exit") {
            break;
        }
        if query.is_empty() {
            continue;
        }

        println!("Server response: {}", session.send_query(query).await);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_to_interactive() {
        let args = ClientArgs::try_parse_from(["haystack-client"]).unwrap();
        assert!(args.query.is_none());
        assert!(args.clients.is_none());
        assert!(!args.no_verify);
    }

    #[test]
    fn test_load_mode_args() {
        let args = ClientArgs::try_parse_from([
            "haystack-client",
            "--query",
            "11;0;23;11;0;20;5;0;",
            "--clients",
            "50",
            "--tls",
            "true",
            "--no-verify",
        ])
        .unwrap();
        assert_eq!(args.clients, Some(50));
        assert_eq!(args.tls, Some(true));
        assert!(args.no_verify);
    }
}
