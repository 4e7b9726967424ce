//! Batch authoring: seal `*.txt` drafts from a directory into the store
//!
//! Each draft is judged on its own. A rejected draft is reported and skipped;
//! only storage or directory failures abort the batch.

use std::path::{Path, PathBuf};

use billet_core::{BilletError, BilletResult, Draft, DraftRejection, LetterId, ShareLink};
use billet_crypto::StoredPayload;
use rayon::prelude::*;

use crate::store::LetterStore;

/// Outcome for one draft file.
#[derive(Debug)]
pub enum SealStatus {
    Sealed { link: ShareLink, bytes: usize },
    Skipped(DraftRejection),
}

#[derive(Debug)]
pub struct SealReport {
    pub file: PathBuf,
    pub status: SealStatus,
}

impl SealReport {
    pub fn is_sealed(&self) -> bool {
        matches!(self.status, SealStatus::Sealed { .. })
    }
}

/// A draft that passed validation and is waiting for encryption.
struct Pending {
    file: PathBuf,
    letter: LetterId,
    draft: Draft,
}

/// Seal the given draft files, reporting them in file-name order.
///
/// `files` normally comes from [`draft_files`]; the caller keeps the list so
/// progress totals match what is sealed. `on_progress` is called once per
/// draft after its outcome is known.
pub async fn seal_drafts<F>(
    store: &LetterStore,
    files: &[PathBuf],
    mut on_progress: F,
) -> BilletResult<Vec<SealReport>>
where
    F: FnMut(&SealReport),
{
    tracing::info!(drafts = files.len(), "sealing drafts");

    let mut reports = Vec::with_capacity(files.len());
    let mut pending = Vec::new();
    for file in files.iter().cloned() {
        match load_draft(&file).await {
            Ok((letter, draft)) => pending.push(Pending { file, letter, draft }),
            Err(reason) => {
                tracing::warn!(file = %file.display(), reason = %reason, "skipping draft");
                let report = SealReport {
                    file,
                    status: SealStatus::Skipped(reason),
                };
                on_progress(&report);
                reports.push(report);
            }
        }
    }

    // PBKDF2 dominates; fan it out over the rayon pool off the async runtime.
    let sealed = tokio::task::spawn_blocking(move || {
        pending
            .into_par_iter()
            .map(|p| {
                let payload = billet_crypto::seal(&p.draft.body, &p.draft.password)?;
                Ok((p, payload))
            })
            .collect::<BilletResult<Vec<(Pending, StoredPayload)>>>()
    })
    .await
    .map_err(|e| BilletError::Other(anyhow::anyhow!("seal task failed: {e}")))??;

    for (p, payload) in sealed {
        let bytes = payload.as_str().len();
        store.put(&p.letter, payload).await?;
        tracing::info!(letter = %p.letter, bytes, "letter sealed");

        let report = SealReport {
            file: p.file,
            status: SealStatus::Sealed {
                link: ShareLink::new(p.letter, p.draft.password),
                bytes,
            },
        };
        on_progress(&report);
        reports.push(report);
    }

    reports.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(reports)
}

/// The `*.txt` files directly under `dir`, sorted by name.
pub async fn draft_files(dir: &Path) -> BilletResult<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
        BilletError::Io(std::io::Error::new(
            e.kind(),
            format!("reading draft directory {}: {e}", dir.display()),
        ))
    })?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_txt = path.extension().is_some_and(|ext| ext == "txt");
        if is_txt && entry.file_type().await?.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

async fn load_draft(file: &Path) -> Result<(LetterId, Draft), DraftRejection> {
    let stem = file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    let letter = LetterId::new(&stem).map_err(|_| DraftRejection::InvalidIdentifier(stem))?;

    let bytes = tokio::fs::read(file)
        .await
        .map_err(|e| DraftRejection::Unreadable(e.to_string()))?;
    let content =
        String::from_utf8(bytes).map_err(|_| DraftRejection::Unreadable("not UTF-8".into()))?;

    Ok((letter, Draft::parse(&content)?))
}
