//! TLS configuration and certificate loading.

use std::path::{Path, PathBuf};

use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;

/// Errors loading listener TLS material.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("listener.mode is \"tls\" but [listener.tls] is missing")]
    MissingConfig,
    #[error("certificate file not found: {0:?}")]
    CertificateNotFound(PathBuf),
    #[error("private key file not found: {0:?}")]
    KeyNotFound(PathBuf),
    #[error("failed to load TLS material: {0}")]
    Load(#[from] std::io::Error),
}

/// Load TLS configuration from certificate and key files.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, TlsError> {
    if !cert_path.exists() {
        return Err(TlsError::CertificateNotFound(cert_path.to_path_buf()));
    }
    if !key_path.exists() {
        return Err(TlsError::KeyNotFound(key_path.to_path_buf()));
    }

    let config = RustlsConfig::from_pem_file(cert_path, key_path).await?;
    tracing::info!(cert = ?cert_path, "TLS certificate loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_certificate() {
        let err = load_tls_config(Path::new("/nonexistent/cert.pem"), Path::new("/nonexistent/key.pem"))
            .await
            .unwrap_err();
        assert!(matches!(err, TlsError::CertificateNotFound(_)));
    }
}
