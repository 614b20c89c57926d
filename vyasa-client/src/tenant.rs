//! Active school (tenant) register

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::storage::{SessionStore, keys};

/// Opaque school identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchoolId(String);

impl SchoolId {
    /// `None` for blank ids
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SchoolId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Holds the active school id
///
/// Cached in memory and mirrored to the session storage under
/// `currentSchoolId`, so a fresh process picks it up again.
#[derive(Debug, Clone)]
pub struct TenantContext {
    current: Arc<RwLock<Option<SchoolId>>>,
    store: SessionStore,
}

impl TenantContext {
    /// Load the persisted tenant, if any
    pub fn new(store: SessionStore) -> Self {
        let current = store.read(keys::CURRENT_SCHOOL_ID).and_then(SchoolId::new);
        Self {
            current: Arc::new(RwLock::new(current)),
            store,
        }
    }

    pub fn set(&self, school_id: SchoolId) {
        self.store.write(keys::CURRENT_SCHOOL_ID, school_id.as_str());
        *self.current.write() = Some(school_id);
    }

    pub fn get(&self) -> Option<SchoolId> {
        self.current.read().clone()
    }

    pub fn is_set(&self) -> bool {
        self.current.read().is_some()
    }

    pub fn clear(&self) {
        self.store.delete(keys::CURRENT_SCHOOL_ID);
        *self.current.write() = None;
    }
}
