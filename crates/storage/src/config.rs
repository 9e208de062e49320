//! Config file helpers.

use std::path::Path;
use contentgate_core::GateConfig;
use tokio::fs;

use crate::json_storage::read_json;
use crate::Result;

/// Default store directory, relative to the working directory.
pub const DEFAULT_STORE_DIR: &str = ".contentgate";

/// Config file name inside the store directory.
pub const CONFIG_FILE: &str = "config.json";

/// Load `config.json` from the store directory, or defaults when absent.
pub async fn load_config(root: impl AsRef<Path>) -> Result<GateConfig> {
    let config = read_json(&root.as_ref().join(CONFIG_FILE)).await?;
    Ok(config.unwrap_or_default())
}

/// Write `config.json` into the store directory.
pub async fn save_config(root: impl AsRef<Path>, config: &GateConfig) -> Result<()> {
    let root = root.as_ref();
    fs::create_dir_all(root).await?;
    let json = serde_json::to_string_pretty(config)?;
    fs::write(root.join(CONFIG_FILE), json.as_bytes()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_config_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await.unwrap();
        assert_eq!(config, GateConfig::default());
    }

    #[tokio::test]
    async fn test_config_round_trip() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested");

        let mut config = GateConfig::default();
        config.improve.max_iterations = 5;
        config.guardian.blocked_terms = vec!["synergy".to_string()];
        save_config(&dir, &config).await.unwrap();

        assert_eq!(load_config(&dir).await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_malformed_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), b"{ not json").await.unwrap();
        assert!(load_config(tmp.path()).await.is_err());
    }
}
