use super::error::CatalogResult;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

pub const DATA_DIR: &str = "data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFile {
    Store,
    Products,
    Toppings,
}

impl CatalogFile {
    pub fn filename(self) -> &'static str {
        match self {
            CatalogFile::Store => "store.json",
            CatalogFile::Products => "products.json",
            CatalogFile::Toppings => "toppings.json",
        }
    }
}

/// JSON files under `<root>/data`.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    data_dir: PathBuf,
}

impl CatalogStore {
    pub fn new(root: &Path) -> Self {
        Self {
            data_dir: root.join(DATA_DIR),
        }
    }

    pub fn path(&self, file: CatalogFile) -> PathBuf {
        self.data_dir.join(file.filename())
    }

    /// Reads a backing file, falling back to `T::default()` when it is
    /// missing, empty, unreadable or not valid JSON for `T`. A file that
    /// fails to parse is copied aside first, see [`Self::corrupt_path`].
    pub fn load<T>(&self, file: CatalogFile) -> T
    where
        T: DeserializeOwned + Default,
    {
        let Some(contents) = self.read(file) else {
            return T::default();
        };

        match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(path = %self.path(file).display(), error = %err, "malformed catalog file, using default");
                self.keep_aside(file);
                T::default()
            }
        }
    }

    /// Reads a JSON array one record at a time. Records that do not fit `T`
    /// are skipped with a warning, the rest are kept. Whenever anything is
    /// dropped the file is copied aside before the next save can replace it.
    pub fn load_records<T>(&self, file: CatalogFile) -> Vec<T>
    where
        T: DeserializeOwned,
    {
        let Some(contents) = self.read(file) else {
            return Vec::new();
        };
        let path = self.path(file);

        let raw: Vec<Value> = match serde_json::from_str(&contents) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "malformed catalog file, using default");
                self.keep_aside(file);
                return Vec::new();
            }
        };

        let total = raw.len();
        let records: Vec<T> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::warn!(path = %path.display(), index, error = %err, "skipping invalid record");
                    None
                }
            })
            .collect();

        if records.len() != total {
            self.keep_aside(file);
        }
        records
    }

    /// Where an unparsable file is copied before it can be overwritten.
    pub fn corrupt_path(&self, file: CatalogFile) -> PathBuf {
        self.data_dir.join(format!("{}.corrupt", file.filename()))
    }

    fn read(&self, file: CatalogFile) -> Option<String> {
        let path = self.path(file);

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "catalog file missing, using default");
                return None;
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to read catalog file, using default");
                return None;
            }
        };

        if contents.trim().is_empty() {
            return None;
        }
        Some(contents)
    }

    fn keep_aside(&self, file: CatalogFile) {
        let backup = self.corrupt_path(file);
        match fs::copy(self.path(file), &backup) {
            Ok(_) => tracing::warn!(backup = %backup.display(), "original contents kept"),
            Err(err) => {
                tracing::warn!(backup = %backup.display(), error = %err, "failed to keep original contents")
            }
        }
    }

    /// Writes the whole value to a sibling temp file and renames it over the target.
    pub fn save<T>(&self, file: CatalogFile, value: &T) -> CatalogResult<()>
    where
        T: Serialize + ?Sized,
    {
        fs::create_dir_all(&self.data_dir)?;

        let path = self.path(file);
        let tmp = self.data_dir.join(format!(".{}.tmp", file.filename()));

        let mut payload = serde_json::to_string_pretty(value)?;
        payload.push('\n');

        fs::write(&tmp, payload)?;
        if let Err(err) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }

        tracing::debug!(path = %path.display(), "catalog file saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{StoreConfig, Topping};
    use tempfile::TempDir;

    fn test_store() -> (CatalogStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = CatalogStore::new(temp_dir.path());
        (store, temp_dir)
    }

    #[test]
    fn test_paths_live_under_data_dir() {
        let (store, temp) = test_store();
        assert_eq!(
            store.path(CatalogFile::Products),
            temp.path().join("data").join("products.json")
        );
        assert!(store.path(CatalogFile::Store).ends_with("store.json"));
        assert!(store.path(CatalogFile::Toppings).ends_with("toppings.json"));
    }

    #[test]
    fn test_missing_files_load_defaults() {
        let (store, _temp) = test_store();

        let toppings: Vec<Topping> = store.load(CatalogFile::Toppings);
        let config: StoreConfig = store.load(CatalogFile::Store);

        assert!(toppings.is_empty());
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_corrupt_file_loads_default() {
        let (store, _temp) = test_store();
        fs::create_dir_all(store.path(CatalogFile::Toppings).parent().unwrap()).unwrap();
        fs::write(store.path(CatalogFile::Toppings), r#"[{"id": "a", "name": "Chee"#).unwrap();

        let toppings: Vec<Topping> = store.load(CatalogFile::Toppings);
        assert!(toppings.is_empty());
        assert_eq!(
            fs::read_to_string(store.corrupt_path(CatalogFile::Toppings)).unwrap(),
            r#"[{"id": "a", "name": "Chee"#
        );
    }

    #[test]
    fn test_load_records_skips_only_invalid_entries() {
        let (store, _temp) = test_store();
        let path = store.path(CatalogFile::Toppings);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let contents = r#"[
  {"id": "t1", "name": "Cheese", "price": 1000},
  {"id": "t2", "name": "Oreo", "price": "cheap"},
  {"id": "t3", "name": "Milo", "price": 2000}
]"#;
        fs::write(&path, contents).unwrap();

        let toppings: Vec<Topping> = store.load_records(CatalogFile::Toppings);

        let ids: Vec<&str> = toppings.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t3"]);
        assert_eq!(
            fs::read_to_string(store.corrupt_path(CatalogFile::Toppings)).unwrap(),
            contents
        );
    }

    #[test]
    fn test_load_records_clean_file_is_not_copied() {
        let (store, _temp) = test_store();
        let toppings = vec![Topping {
            id: "t1".into(),
            name: "Cheese".into(),
            price: 1000.0,
        }];
        store.save(CatalogFile::Toppings, &toppings).unwrap();

        let loaded: Vec<Topping> = store.load_records(CatalogFile::Toppings);

        assert_eq!(loaded, toppings);
        assert!(!store.corrupt_path(CatalogFile::Toppings).exists());
    }

    #[test]
    fn test_wrong_shape_loads_default() {
        let (store, _temp) = test_store();
        fs::create_dir_all(store.path(CatalogFile::Store).parent().unwrap()).unwrap();
        fs::write(store.path(CatalogFile::Store), "[1, 2, 3]").unwrap();

        let config: StoreConfig = store.load(CatalogFile::Store);
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_save_creates_data_dir_and_leaves_no_temp_file() {
        let (store, temp) = test_store();
        let toppings = vec![Topping {
            id: "t1".into(),
            name: "Cheese".into(),
            price: 1000.0,
        }];

        store.save(CatalogFile::Toppings, &toppings).unwrap();

        let entries: Vec<_> = fs::read_dir(temp.path().join("data"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec!["toppings.json"]);

        let loaded: Vec<Topping> = store.load(CatalogFile::Toppings);
        assert_eq!(loaded, toppings);
    }

    #[test]
    fn test_save_overwrites_previous_contents() {
        let (store, _temp) = test_store();

        let mut config = StoreConfig {
            name: Some("First".into()),
            ..Default::default()
        };
        store.save(CatalogFile::Store, &config).unwrap();

        config.name = Some("Second".into());
        store.save(CatalogFile::Store, &config).unwrap();

        let loaded: StoreConfig = store.load(CatalogFile::Store);
        assert_eq!(loaded.name.as_deref(), Some("Second"));
    }
}
