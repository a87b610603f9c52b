//! TLS context construction for the server and the query client.
//!
//! The server side loads a PEM certificate chain and private key once at
//! startup and wraps every accepted connection in the resulting acceptor.
//! The client side supports two modes selected by configuration: verify the
//! server against a CA bundle (for self-signed deployments, the server
//! certificate itself), or skip verification entirely.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio_rustls::rustls::client::danger::{
    HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier,
};
use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer, ServerName, UnixTime};
use tokio_rustls::rustls::{self, DigitallySignedStruct, SignatureScheme};
use tokio_rustls::{TlsAcceptor, TlsConnector};

/// TLS setup errors; all of them are fatal at startup
#[derive(Error, Debug)]
pub enum TlsError {
    #[error("failed to read '{}': {}", .0.display(), .1)]
    FileRead(PathBuf, #[source] std::io::Error),

    #[error("no certificates found in '{}'", .0.display())]
    NoCertificates(PathBuf),

    #[error("no private key found in '{}'", .0.display())]
    NoPrivateKey(PathBuf),

    #[error("certificate verification enabled but no CA bundle configured")]
    MissingCaBundle,

    #[error("TLS configuration rejected: {0}")]
    Config(#[from] rustls::Error),
}

/// Load a PEM certificate chain.
pub fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, TlsError> {
    let file = File::open(path).map_err(|e| TlsError::FileRead(path.to_path_buf(), e))?;
    let mut reader = BufReader::new(file);

    let certs: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut reader)
        .collect::<Result<_, _>>()
        .map_err(|e| TlsError::FileRead(path.to_path_buf(), e))?;

    if certs.is_empty() {
        return Err(TlsError::NoCertificates(path.to_path_buf()));
    }
    Ok(certs)
}

/// Load the first PEM private key (PKCS#8, PKCS#1, or SEC1).
pub fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>, TlsError> {
    let file = File::open(path).map_err(|e| TlsError::FileRead(path.to_path_buf(), e))?;
    let mut reader = BufReader::new(file);

    rustls_pemfile::private_key(&mut reader)
        .map_err(|e| TlsError::FileRead(path.to_path_buf(), e))?
        .ok_or_else(|| TlsError::NoPrivateKey(path.to_path_buf()))
}

/// Build the server-side acceptor once at startup.
pub fn build_acceptor(cert_path: &Path, key_path: &Path) -> Result<TlsAcceptor, TlsError> {
    let certs = load_certs(cert_path)?;
    let key = load_private_key(key_path)?;

    let config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)?;

    Ok(TlsAcceptor::from(Arc::new(config)))
}

/// Build a client-side connector.
///
/// `verify` selects between CA verification and the permissive verifier;
/// both are configuration, not hardcoded policy.
pub fn build_connector(verify: bool, ca_path: Option<&Path>) -> Result<TlsConnector, TlsError> {
    let config = if verify {
        let path = ca_path.ok_or(TlsError::MissingCaBundle)?;
        let mut roots = rustls::RootCertStore::empty();
        for cert in load_certs(path)? {
            roots.add(cert)?;
        }
        rustls::ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth()
    } else {
        rustls::ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(NoVerification))
            .with_no_client_auth()
    };

    Ok(TlsConnector::from(Arc::new(config)))
}

/// Accepts any server certificate. Only reachable when the configuration
/// explicitly disables verification.
#[derive(Debug)]
struct NoVerification;

impl ServerCertVerifier for NoVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::ECDSA_NISTP521_SHA512,
            SignatureScheme::ED25519,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
        ]
    }
}
