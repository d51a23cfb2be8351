//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::{info, warn};

/// Ensure the upload root exists and is a directory, creating it when missing.
pub async fn ensure_env(upload_dir: &str) -> anyhow::Result<()> {
    match tokio::fs::metadata(upload_dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(anyhow::anyhow!("{upload_dir} exists but is not a directory")),
        Err(_) => {
            warn!(%upload_dir, "upload directory not found; creating it");
            tokio::fs::create_dir_all(upload_dir)
                .await
                .map_err(|e| anyhow::anyhow!("cannot create {upload_dir}: {e}"))?;
            info!(%upload_dir, "upload directory created");
            Ok(())
        }
    }
}
