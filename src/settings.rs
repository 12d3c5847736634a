//! Persisted dashboard settings (`dashboard.json` in the data dir).
//!
//! Only the saved layout order lives here for now. Until the user saves a
//! layout the configured `dash_order` is used.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::layout::DashOrder;

/// Distinguishes temp files of overlapping saves.
static SAVE_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashSettings {
    /// Serialized layout, `None` until saved from the dashboard
    #[serde(default)]
    pub dash_order: Option<String>,
}

#[derive(Clone)]
pub struct DashSettingsStore {
    settings: Arc<RwLock<DashSettings>>,
    data_dir: PathBuf,
    fallback_order: String,
}

impl DashSettingsStore {
    /// Load settings from `data_dir`, using `fallback_order` while no layout
    /// has been saved.
    pub fn new(data_dir: PathBuf, fallback_order: impl Into<String>) -> Self {
        let settings = Self::load_from_disk(&data_dir);
        Self {
            settings: Arc::new(RwLock::new(settings)),
            data_dir,
            fallback_order: fallback_order.into(),
        }
    }

    fn settings_file(data_dir: &Path) -> PathBuf {
        data_dir.join("dashboard.json")
    }

    fn load_from_disk(data_dir: &Path) -> DashSettings {
        let path = Self::settings_file(data_dir);
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable {}: {}", path.display(), e);
                DashSettings::default()
            }),
            Err(_) => DashSettings::default(),
        }
    }

    async fn save_to_disk(&self) -> Result<()> {
        let json = {
            let settings = self.settings.read().await;
            serde_json::to_string_pretty(&*settings)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?
        };

        let path = Self::settings_file(&self.data_dir);
        tokio::fs::create_dir_all(&self.data_dir).await?;
        // Write then rename so a reader never sees a partial file
        let seq = SAVE_SEQ.fetch_add(1, Ordering::Relaxed);
        let tmp = path.with_extension(format!("json.{seq}.tmp"));
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Current layout order: the saved one, else the configured default.
    pub async fn dash_order(&self) -> DashOrder {
        let settings = self.settings.read().await;
        DashOrder::parse(
            settings
                .dash_order
                .as_deref()
                .unwrap_or(&self.fallback_order),
        )
    }

    pub async fn set_dash_order(&self, order: &DashOrder) -> Result<()> {
        {
            let mut settings = self.settings.write().await;
            settings.dash_order = Some(order.to_string());
        }
        self.save_to_disk().await?;
        tracing::info!("Saved dashboard layout: {}", order);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_falls_back_to_configured_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = DashSettingsStore::new(dir.path().to_path_buf(), "dash_sysinfo;dash_disks");
        assert_eq!(store.dash_order().await.to_string(), "dash_sysinfo;dash_disks");
    }

    #[tokio::test]
    async fn test_saved_order_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = DashSettingsStore::new(dir.path().to_path_buf(), "0");
        assert!(store.dash_order().await.is_unset());

        store
            .set_dash_order(&DashOrder::parse("dash_qbit,dash_smart;dash_sysinfo"))
            .await
            .unwrap();

        let reloaded = DashSettingsStore::new(dir.path().to_path_buf(), "0");
        assert_eq!(
            reloaded.dash_order().await.to_string(),
            "dash_qbit,dash_smart;dash_sysinfo"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_saves_leave_a_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data");
        let store = DashSettingsStore::new(nested.clone(), "0");

        let first = DashOrder::parse("dash_qbit;dash_smart");
        let second = DashOrder::parse("dash_sysinfo,dash_disks");
        let (a, b) = tokio::join!(store.set_dash_order(&first), store.set_dash_order(&second));
        a.unwrap();
        b.unwrap();

        let saved = DashSettingsStore::new(nested.clone(), "0").dash_order().await.to_string();
        assert!(saved == first.to_string() || saved == second.to_string(), "{saved}");
        let leftovers = std::fs::read_dir(&nested)
            .unwrap()
            .filter(|e| e.as_ref().unwrap().file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("dashboard.json"), "{not json").unwrap();
        let store = DashSettingsStore::new(dir.path().to_path_buf(), "dash_qbit");
        assert_eq!(store.dash_order().await.to_string(), "dash_qbit");
    }
}
