use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::{
    attendance::AttendanceRecord, menu_item::MenuItem, receipt::Receipt, table::Table,
    user::UserAccount,
};

pub const DEFAULT_TABLE_COUNT: u32 = 15;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("store lock poisoned")]
    Poisoned,
}

/// A flat JSON list kept in one file under the data directory.
pub trait Collection: Serialize + DeserializeOwned {
    const FILE: &'static str;

    /// Content used (and written out) when the file does not exist yet.
    fn defaults() -> Vec<Self> {
        Vec::new()
    }
}

impl Collection for UserAccount {
    const FILE: &'static str = "users.json";
}

impl Collection for MenuItem {
    const FILE: &'static str = "menu.json";
}

impl Collection for Table {
    const FILE: &'static str = "tables.json";

    fn defaults() -> Vec<Self> {
        (1..=DEFAULT_TABLE_COUNT).map(Table::dine_in).collect()
    }
}

impl Collection for Receipt {
    const FILE: &'static str = "receipts.json";
}

impl Collection for AttendanceRecord {
    const FILE: &'static str = "attendance.json";
}

/// JSON-file backed storage. Every collection is rewritten wholesale on save.
///
/// Writers inside this process are serialized by `lock`, and each save goes
/// through a temp file + rename so readers never see a half-written file.
pub struct DataStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl DataStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        info!(dir = %dir.display(), "Data store opened");
        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    fn path_of<T: Collection>(&self) -> PathBuf {
        self.dir.join(T::FILE)
    }

    /// Loads a whole collection.
    pub fn load<T: Collection>(&self) -> Result<Vec<T>, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        self.load_unlocked()
    }

    /// Replaces a whole collection.
    pub fn save<T: Collection>(&self, items: &[T]) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        self.save_unlocked(items)
    }

    /// Read-modify-write under the store lock. Nothing is written when `f` fails.
    pub fn update<T, R, E, F>(&self, f: F) -> Result<R, E>
    where
        T: Collection,
        E: From<StoreError>,
        F: FnOnce(&mut Vec<T>) -> Result<R, E>,
    {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut items = self.load_unlocked::<T>()?;
        let out = f(&mut items)?;
        self.save_unlocked(&items)?;
        Ok(out)
    }

    /// Read-modify-write of two collections under one lock.
    ///
    /// Both are loaded before `f` runs and saved in argument order, so `A` is
    /// on disk before `B` is touched. Nothing is written when loading or `f` fails.
    pub fn update_pair<A, B, R, E, F>(&self, f: F) -> Result<R, E>
    where
        A: Collection,
        B: Collection,
        E: From<StoreError>,
        F: FnOnce(&mut Vec<A>, &mut Vec<B>) -> Result<R, E>,
    {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut first = self.load_unlocked::<A>()?;
        let mut second = self.load_unlocked::<B>()?;
        let out = f(&mut first, &mut second)?;
        self.save_unlocked(&first)?;
        self.save_unlocked(&second)?;
        Ok(out)
    }

    fn load_unlocked<T: Collection>(&self) -> Result<Vec<T>, StoreError> {
        let path = self.path_of::<T>();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let defaults = T::defaults();
                if !defaults.is_empty() {
                    debug!(file = T::FILE, count = defaults.len(), "Writing default collection");
                    self.save_unlocked(&defaults)?;
                }
                return Ok(defaults);
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw).map_err(|source| StoreError::Json { path, source })
    }

    fn save_unlocked<T: Collection>(&self, items: &[T]) -> Result<(), StoreError> {
        let path = self.path_of::<T>();
        let tmp = path.with_extension("json.tmp");

        let body = serde_json::to_vec_pretty(items).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;

        let io_err = |source| StoreError::Io {
            path: tmp.clone(),
            source,
        };
        let mut file = fs::File::create(&tmp).map_err(io_err)?;
        file.write_all(&body).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        drop(file);

        fs::rename(&tmp, &path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(file = T::FILE, count = items.len(), "Collection saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;
    use crate::model::table::TableStatus;
    use rust_decimal::Decimal;

    fn user(name: &str) -> UserAccount {
        UserAccount {
            username: name.to_string(),
            password: "hash".to_string(),
            role: Role::Staff,
            hourly_rate: Decimal::from(30_000),
        }
    }

    #[test]
    fn missing_tables_file_yields_default_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::open(dir.path()).unwrap();

        let tables: Vec<Table> = store.load().unwrap();
        assert_eq!(tables.len(), DEFAULT_TABLE_COUNT as usize);
        assert!(tables.iter().all(|t| t.status == TableStatus::Empty));
        assert!(dir.path().join("tables.json").exists());
    }

    #[test]
    fn missing_collection_without_defaults_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::open(dir.path()).unwrap();

        let users: Vec<UserAccount> = store.load().unwrap();
        assert!(users.is_empty());
        assert!(!dir.path().join("users.json").exists());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::open(dir.path()).unwrap();

        store.save(&[user("a"), user("b")]).unwrap();
        let users: Vec<UserAccount> = store.load().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].username, "b");
        assert!(!dir.path().join("users.json.tmp").exists());
    }

    #[test]
    fn failed_update_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::open(dir.path()).unwrap();
        store.save(&[user("a")]).unwrap();

        let result: Result<(), crate::error::AppError> = store.update(|users: &mut Vec<UserAccount>| {
            users.clear();
            Err(crate::error::AppError::validation("nope"))
        });
        assert!(result.is_err());

        let users: Vec<UserAccount> = store.load().unwrap();
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn pair_update_writes_nothing_when_second_load_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::open(dir.path()).unwrap();
        store.save(&[user("a")]).unwrap();
        fs::write(dir.path().join("menu.json"), "{ not json").unwrap();

        let result: Result<(), StoreError> =
            store.update_pair(|users: &mut Vec<UserAccount>, _menu: &mut Vec<MenuItem>| {
                users.clear();
                Ok(())
            });
        assert!(matches!(result, Err(StoreError::Json { .. })));

        let users: Vec<UserAccount> = store.load().unwrap();
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn pair_update_saves_both() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::open(dir.path()).unwrap();

        store
            .update_pair(|users: &mut Vec<UserAccount>, tables: &mut Vec<Table>| {
                users.push(user("a"));
                tables.truncate(1);
                Ok::<_, StoreError>(())
            })
            .unwrap();

        assert_eq!(store.load::<UserAccount>().unwrap().len(), 1);
        assert_eq!(store.load::<Table>().unwrap().len(), 1);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("menu.json"), "{ not json").unwrap();
        let store = DataStore::open(dir.path()).unwrap();

        let err = store.load::<MenuItem>().unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }));
    }

    #[test]
    fn reads_legacy_user_without_rate() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("users.json"),
            r#"[{"username": "admin", "password": "x", "role": "admin"}]"#,
        )
        .unwrap();
        let store = DataStore::open(dir.path()).unwrap();

        let users: Vec<UserAccount> = store.load().unwrap();
        assert_eq!(users[0].hourly_rate, Decimal::ZERO);
    }
}
