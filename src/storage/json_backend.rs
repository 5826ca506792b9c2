use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{
    core::errors::{FlowError, Result},
    ledger::{LedgerSnapshot, CURRENT_SCHEMA_VERSION},
};

use super::StorageBackend;

const DATA_FILE: &str = "cashflow_data.json";
const TMP_SUFFIX: &str = "tmp";

/// Flat-file JSON persistence for the ledger snapshot.
#[derive(Clone)]
pub struct JsonStorage {
    data_file: PathBuf,
}

impl JsonStorage {
    /// Stores the ledger under `root`, or the platform data directory when
    /// `root` is `None`.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = match root {
            Some(path) => path,
            None => dirs::data_dir()
                .ok_or_else(|| FlowError::Storage("no platform data directory".into()))?
                .join("flowstate"),
        };
        ensure_dir(&base)?;
        Ok(Self {
            data_file: base.join(DATA_FILE),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, snapshot: &LedgerSnapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = tmp_path(&self.data_file);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.data_file)?;
        info!("saved ledger snapshot to {}", self.data_file.display());
        Ok(())
    }

    fn load(&self) -> Result<LedgerSnapshot> {
        if !self.data_file.exists() {
            return Err(FlowError::Storage(format!(
                "ledger file `{}` not found",
                self.data_file.display()
            )));
        }
        let data = fs::read_to_string(&self.data_file)?;
        let snapshot: LedgerSnapshot = serde_json::from_str(&data)?;
        if snapshot.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(FlowError::Storage(format!(
                "ledger schema v{} is newer than supported v{}",
                snapshot.schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
        Ok(snapshot)
    }

    fn exists(&self) -> bool {
        self.data_file.exists()
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(Some(temp.path().to_path_buf())).expect("json storage");
        (storage, temp)
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        let snapshot = LedgerSnapshot::new(2_500.0);
        storage.save(&snapshot).expect("save snapshot");
        assert!(storage.exists());
        let loaded = storage.load().expect("load snapshot");
        assert_eq!(loaded.current_balance, 2_500.0);
    }

    #[test]
    fn load_without_file_fails() {
        let (storage, _guard) = storage_with_temp_dir();
        assert!(!storage.exists());
        let err = storage.load().expect_err("missing file must fail");
        assert!(matches!(err, FlowError::Storage(_)));
    }

    #[test]
    fn rejects_future_schema_versions() {
        let (storage, _guard) = storage_with_temp_dir();
        let mut snapshot = LedgerSnapshot::new(0.0);
        snapshot.schema_version = CURRENT_SCHEMA_VERSION + 5;
        fs::write(
            storage.data_file(),
            serde_json::to_string(&snapshot).unwrap(),
        )
        .unwrap();

        let err = storage.load().expect_err("future schema must fail");
        match err {
            FlowError::Storage(message) => {
                assert!(message.contains("newer"), "unexpected error: {message}");
            }
            other => panic!("expected storage error, got {other:?}"),
        }
    }
}
