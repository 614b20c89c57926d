//! Session storage
//!
//! A [`SessionStorage`] medium holds string scalars under fixed keys.
//! [`SessionStore`] wraps a medium with typed accessors; a failing medium
//! is logged and treated as empty, it never aborts the caller.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use thiserror::Error;

/// Storage keys
pub mod keys {
    pub const ACCESS_TOKEN: &str = "accessToken";
    pub const CURRENT_SCHOOL_ID: &str = "currentSchoolId";
    pub const USER_EMAIL: &str = "userEmail";
    pub const PENDING_MOBILE_NO: &str = "pendingMobileNo";
    pub const PENDING_COUNTRY_CODE: &str = "pendingCountryCode";
    pub const REMEMBER_DEVICE: &str = "rememberDevice";
    pub const DEVICE_TOKEN: &str = "deviceToken";
}

/// Storage medium error
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt session file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Key/value medium backing the session
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.write().remove(key);
        Ok(())
    }
}

/// Pretty-printed JSON map on disk
///
/// Every write rewrites the whole file; the parent directory is created on
/// first write.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = fs::read_to_string(&self.path)?;
        if json.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&json)?)
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut values = self.load()?;
        if values.remove(key).is_some() {
            self.save(&values)?;
        }
        Ok(())
    }
}

/// Mobile number awaiting OTP verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMobile {
    pub country_code: String,
    pub mobile_no: String,
}

/// Typed access to the persisted session scalars
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("has_token", &self.token().is_some())
            .finish()
    }
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileStorage::new(path)))
    }

    pub(crate) fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(key, error = %e, "Session storage read failed");
                None
            }
        }
    }

    pub(crate) fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            tracing::error!(key, error = %e, "Session storage write failed");
        }
    }

    pub(crate) fn delete(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            tracing::error!(key, error = %e, "Session storage delete failed");
        }
    }

    // ========== Token ==========

    pub fn set_token(&self, token: &str) {
        self.write(keys::ACCESS_TOKEN, token);
    }

    pub fn token(&self) -> Option<String> {
        self.read(keys::ACCESS_TOKEN).filter(|t| !t.is_empty())
    }

    pub fn remove_token(&self) {
        self.delete(keys::ACCESS_TOKEN);
    }

    // ========== OTP flow ==========

    pub fn set_user_email(&self, email: &str) {
        self.write(keys::USER_EMAIL, email);
    }

    pub fn user_email(&self) -> Option<String> {
        self.read(keys::USER_EMAIL)
    }

    pub fn remove_user_email(&self) {
        self.delete(keys::USER_EMAIL);
    }

    pub fn set_pending_mobile(&self, country_code: &str, mobile_no: &str) {
        self.write(keys::PENDING_COUNTRY_CODE, country_code);
        self.write(keys::PENDING_MOBILE_NO, mobile_no);
    }

    /// Both halves must be present
    pub fn pending_mobile(&self) -> Option<PendingMobile> {
        let country_code = self.read(keys::PENDING_COUNTRY_CODE)?;
        let mobile_no = self.read(keys::PENDING_MOBILE_NO)?;
        Some(PendingMobile {
            country_code,
            mobile_no,
        })
    }

    pub fn clear_pending_mobile(&self) {
        self.delete(keys::PENDING_COUNTRY_CODE);
        self.delete(keys::PENDING_MOBILE_NO);
    }

    // ========== Remembered device ==========

    pub fn set_remember_device(&self, remember: bool) {
        self.write(keys::REMEMBER_DEVICE, if remember { "true" } else { "false" });
    }

    pub fn remember_device(&self) -> bool {
        self.read(keys::REMEMBER_DEVICE).as_deref() == Some("true")
    }

    pub fn set_device_token(&self, token: &str) {
        self.write(keys::DEVICE_TOKEN, token);
    }

    pub fn device_token(&self) -> Option<String> {
        self.read(keys::DEVICE_TOKEN)
    }

    pub fn remove_device_token(&self) {
        self.delete(keys::DEVICE_TOKEN);
    }

    /// Drop the token and OTP-flow scalars (device preferences survive)
    pub fn clear_all(&self) {
        self.remove_token();
        self.remove_user_email();
        self.clear_pending_mobile();
    }
}
