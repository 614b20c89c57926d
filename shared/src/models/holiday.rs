//! Holiday Model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Holiday entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holiday {
    pub id: String,
    pub name: String,
    /// ISO date as returned by the backend
    pub date: String,
    pub school_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Holiday {
    pub fn day(&self) -> Option<NaiveDate> {
        super::parse_day(&self.date)
    }
}

/// Create holiday payload (`date` goes out as `YYYY-MM-DD`)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HolidayCreate {
    #[validate(length(min = 1, message = "holiday name is required"))]
    pub name: String,
    pub date: NaiveDate,
}

/// Update holiday payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct HolidayUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "holiday name must not be empty"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}
