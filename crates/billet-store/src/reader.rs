//! The reading flow: identifier + password → parsed letter
//!
//! Validation happens before any storage or crypto work. Key derivation runs
//! on tokio's blocking pool so the runtime stays responsive.

use billet_core::{BilletError, BilletResult, LetterId, Passphrase};
use billet_letter::ParsedLetter;

use crate::store::LetterStore;

/// Validate raw reader input, then open the letter.
pub async fn read_letter(
    store: &LetterStore,
    letter: &str,
    password: &str,
) -> BilletResult<ParsedLetter> {
    let letter = LetterId::new(letter)?;
    let passphrase = Passphrase::new(password)?;
    open_letter(store, &letter, &passphrase).await
}

/// Fetch, decrypt, and parse one letter.
pub async fn open_letter(
    store: &LetterStore,
    letter: &LetterId,
    passphrase: &Passphrase,
) -> BilletResult<ParsedLetter> {
    let payload = store.fetch(letter).await?;

    let passphrase = passphrase.clone();
    let parsed = tokio::task::spawn_blocking(move || {
        billet_crypto::unseal(&payload, &passphrase).map(|plaintext| billet_letter::parse(&plaintext))
    })
    .await
    .map_err(|e| BilletError::Other(anyhow::anyhow!("decrypt task failed: {e}")))?;

    match &parsed {
        Ok(_) => tracing::info!(letter = %letter, "letter opened"),
        Err(e) => tracing::info!(letter = %letter, error = %e, "letter could not be opened"),
    }
    parsed
}
