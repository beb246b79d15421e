//! On-disk farm state: the ledger tables plus the token ledger, as one JSON
//! document.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use instafarm::{AccountId, MemoryStore, MemoryToken, DEFAULT_CUSTODY};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FarmState {
    pub ledger: MemoryStore,
    pub token: MemoryToken,
}

impl Default for FarmState {
    fn default() -> Self {
        Self {
            ledger: MemoryStore::new(),
            token: MemoryToken::new(AccountId::from(DEFAULT_CUSTODY)),
        }
    }
}

/// Expand `~/` to `$HOME/` in state paths.
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => PathBuf::from(std::env::var("HOME").unwrap_or_default()).join(rest),
        None => PathBuf::from(path),
    }
}

/// Read the state file, or start from an empty farm if it does not exist yet.
pub async fn load(path: &Path) -> Result<FarmState> {
    let exists = tokio::fs::try_exists(path)
        .await
        .with_context(|| format!("Cannot check state file '{}'", path.display()))?;
    if !exists {
        debug!(path = %path.display(), "no state file, starting empty");
        return Ok(FarmState::default());
    }
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Cannot read state file '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("State file '{}' is not a valid InstaFarm state", path.display()))
}

/// Write through a sibling temp file so a crash never leaves half a ledger.
pub async fn save(path: &Path, state: &FarmState) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(state)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &bytes)
        .await
        .with_context(|| format!("Cannot write '{}'", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("Cannot replace state file '{}'", path.display()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "state saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use instafarm::{AssetId, LedgerStore, Pool, PoolKind, TokenInterface};
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_is_an_empty_farm() {
        let dir = TempDir::new().unwrap();
        let state = load(&dir.path().join("absent.json")).await.unwrap();
        assert_eq!(state, FarmState::default());
        assert!(state.ledger.schedule().is_none());
    }

    #[tokio::test]
    async fn saved_state_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("farm.json");

        let mut state = FarmState::default();
        state
            .ledger
            .put_pool(Pool::new(1, AssetId::from("LP"), 10, PoolKind::Liquidity, 3));
        state
            .token
            .mint(&AssetId::from("LP"), &AccountId::from("alice"), 99)
            .unwrap();
        save(&path, &state).await.unwrap();

        let restored = load(&path).await.unwrap();
        assert_eq!(restored, state);
        assert_eq!(
            restored.token.balance_of(&AssetId::from("LP"), &AccountId::from("alice")),
            99
        );
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn garbage_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("farm.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();
        assert!(load(&path).await.is_err());
    }

    #[tokio::test]
    async fn unreadable_location_is_not_an_empty_farm() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("farm.json");
        tokio::fs::write(&file, b"{}").await.unwrap();
        // A path under a regular file cannot be probed at all.
        assert!(load(&file.join("state.json")).await.is_err());
    }

    #[test]
    fn home_is_expanded() {
        std::env::set_var("HOME", "/home/farmer");
        assert_eq!(expand_home("~/farm.json"), PathBuf::from("/home/farmer/farm.json"));
        assert_eq!(expand_home("/tmp/farm.json"), PathBuf::from("/tmp/farm.json"));
    }
}
