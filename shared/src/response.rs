//! API response envelopes
//!
//! The backend answers most mutations with the affected entity; the few
//! exceptions (deletes, activation toggles, bulk uploads) are modelled here.

use serde::{Deserialize, Serialize};

/// Per-row failure reported by a bulk upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// 1-based data row (0 = the file as a whole)
    pub row: u32,
    pub error: String,
}

/// Outcome of a bulk upload
///
/// `success` only counts rows that created a new record; rows the server
/// rejected (duplicates, bad dates, unknown class...) are counted in
/// `failed` and listed in `errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkUploadResult {
    #[serde(default)]
    pub success: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub errors: Vec<RowError>,
}

impl BulkUploadResult {
    /// True when every row was accepted
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.errors.is_empty()
    }

    /// Total rows the server looked at
    pub fn total(&self) -> u32 {
        self.success + self.failed
    }
}

/// Bulk upload responses come either wrapped as
/// `{ "message": ..., "results": {...} }` or as the bare result.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BulkUploadEnvelope {
    Wrapped {
        #[serde(default)]
        message: Option<String>,
        results: BulkUploadResult,
    },
    Plain(BulkUploadResult),
}

impl BulkUploadEnvelope {
    pub fn into_result(self) -> BulkUploadResult {
        match self {
            Self::Wrapped { results, .. } => results,
            Self::Plain(result) => result,
        }
    }
}
