//! OpenDAL Operator factory for letter storage backends

use billet_core::config::{StorageBackend, StorageConfig};
use billet_core::{BilletError, BilletResult};
use opendal::Operator;

/// S3 credentials, read from the environment only.
#[derive(Debug, Clone)]
pub struct S3Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl S3Credentials {
    /// Reads AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY, falling back to the
    /// BILLET_-prefixed names.
    pub fn from_env() -> BilletResult<Self> {
        let access_key_id = std::env::var("AWS_ACCESS_KEY_ID")
            .or_else(|_| std::env::var("BILLET_ACCESS_KEY_ID"))
            .map_err(|_| {
                BilletError::Config(
                    "S3 credentials not set: export AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY"
                        .into(),
                )
            })?;
        let secret_access_key = std::env::var("AWS_SECRET_ACCESS_KEY")
            .or_else(|_| std::env::var("BILLET_SECRET_ACCESS_KEY"))
            .map_err(|_| {
                BilletError::Config("AWS_SECRET_ACCESS_KEY environment variable not set".into())
            })?;
        Ok(Self {
            access_key_id,
            secret_access_key,
        })
    }
}

/// Build the operator described by `cfg`.
///
/// The s3 backend pulls credentials from the environment; see
/// [`build_s3_operator`] to supply them directly.
pub fn build_operator(cfg: &StorageConfig) -> BilletResult<Operator> {
    match cfg.backend {
        StorageBackend::Fs => build_fs_operator(cfg),
        StorageBackend::Memory => memory_operator(),
        StorageBackend::S3 => build_s3_operator(cfg, &S3Credentials::from_env()?),
    }
}

fn build_fs_operator(cfg: &StorageConfig) -> BilletResult<Operator> {
    let root = cfg.root.to_string_lossy();
    let builder = opendal::services::Fs::default().root(&root);
    let op = Operator::new(builder)
        .map_err(|e| BilletError::Storage(format!("creating fs operator at {root}: {e}")))?
        .layer(opendal::layers::LoggingLayer::default())
        .finish();
    Ok(op)
}

pub fn memory_operator() -> BilletResult<Operator> {
    let op = Operator::new(opendal::services::Memory::default())
        .map_err(|e| BilletError::Storage(format!("creating memory operator: {e}")))?
        .finish();
    Ok(op)
}

/// Build an S3 operator (path-style addressing, as SeaweedFS and MinIO need).
///
/// If `enforce_tls` is set and the endpoint is plain HTTP this fails;
/// otherwise a plain-HTTP endpoint only logs a warning.
pub fn build_s3_operator(cfg: &StorageConfig, creds: &S3Credentials) -> BilletResult<Operator> {
    if cfg.endpoint.starts_with("http://") {
        if cfg.enforce_tls {
            return Err(BilletError::Config(format!(
                "S3 endpoint uses plaintext HTTP ({}), but enforce_tls is enabled",
                cfg.endpoint
            )));
        }
        tracing::warn!(
            endpoint = %cfg.endpoint,
            "S3 endpoint uses plaintext HTTP; set storage.enforce_tls = true and use HTTPS in production"
        );
    }

    let builder = opendal::services::S3::default()
        .endpoint(&cfg.endpoint)
        .region(&cfg.region)
        .bucket(&cfg.bucket)
        .access_key_id(&creds.access_key_id)
        .secret_access_key(&creds.secret_access_key);

    let op = Operator::new(builder)
        .map_err(|e| BilletError::Storage(format!("creating S3 operator: {e}")))?
        .layer(opendal::layers::LoggingLayer::default())
        .layer(
            opendal::layers::RetryLayer::new()
                .with_max_times(3)
                .with_jitter(),
        )
        .finish();

    Ok(op)
}
