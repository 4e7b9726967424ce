//! Payload slots: one `{prefix}/{id}.txt` object per letter

use billet_core::config::StorageConfig;
use billet_core::{BilletError, BilletResult, LetterId};
use billet_crypto::StoredPayload;
use opendal::{ErrorKind, Operator};

use crate::operator::build_operator;

const PAYLOAD_EXT: &str = ".txt";

#[derive(Debug, Clone)]
pub struct LetterStore {
    op: Operator,
    prefix: String,
}

impl LetterStore {
    pub fn new(op: Operator, prefix: &str) -> Self {
        Self {
            op,
            prefix: prefix.trim_matches('/').to_string(),
        }
    }

    pub fn from_config(cfg: &StorageConfig) -> BilletResult<Self> {
        Ok(Self::new(build_operator(cfg)?, &cfg.prefix))
    }

    /// Object path for a letter's payload.
    pub fn payload_path(&self, letter: &LetterId) -> String {
        if self.prefix.is_empty() {
            format!("{letter}{PAYLOAD_EXT}")
        } else {
            format!("{}/{letter}{PAYLOAD_EXT}", self.prefix)
        }
    }

    /// Directory holding every payload, as an OpenDAL path.
    pub fn payload_dir(&self) -> String {
        if self.prefix.is_empty() {
            "/".to_string()
        } else {
            format!("{}/", self.prefix)
        }
    }

    /// Write (or overwrite) a letter's payload.
    pub async fn put(&self, letter: &LetterId, payload: StoredPayload) -> BilletResult<()> {
        let path = self.payload_path(letter);
        self.op
            .write(&path, Vec::<u8>::from(payload))
            .await
            .map_err(|e| BilletError::Storage(format!("writing {path}: {e}")))?;
        tracing::info!(letter = %letter, path = %path, "stored letter payload");
        Ok(())
    }

    /// Fetch a letter's payload text.
    ///
    /// A missing object, a transport failure, or a blank payload all map to
    /// `NotFound`; the detail of a transport failure only goes to the log.
    pub async fn fetch(&self, letter: &LetterId) -> BilletResult<String> {
        let path = self.payload_path(letter);
        let data = match self.op.read(&path).await {
            Ok(data) => data.to_vec(),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BilletError::NotFound(letter.to_string()));
            }
            Err(e) => {
                tracing::warn!(letter = %letter, error = %e, "payload fetch failed");
                return Err(BilletError::NotFound(letter.to_string()));
            }
        };

        let text = String::from_utf8(data).map_err(|_| {
            BilletError::MalformedEnvelope(format!("payload for {letter} is not text"))
        })?;
        if text.trim().is_empty() {
            return Err(BilletError::NotFound(letter.to_string()));
        }
        Ok(text)
    }

    pub async fn exists(&self, letter: &LetterId) -> BilletResult<bool> {
        let path = self.payload_path(letter);
        self.op
            .exists(&path)
            .await
            .map_err(|e| BilletError::Storage(format!("checking {path}: {e}")))
    }

    /// Identifiers of every stored letter, sorted. Objects whose names are not
    /// valid identifiers are ignored.
    pub async fn list(&self) -> BilletResult<Vec<LetterId>> {
        let dir = self.payload_dir();
        let entries = match self.op.list(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(BilletError::Storage(format!("listing {dir}: {e}"))),
        };

        let mut ids: Vec<LetterId> = entries
            .iter()
            .filter(|entry| entry.metadata().mode().is_file())
            .filter_map(|entry| entry.name().strip_suffix(PAYLOAD_EXT))
            .filter_map(|stem| LetterId::new(stem).ok())
            .collect();
        ids.sort();
        Ok(ids)
    }
}
