//! Data models
//!
//! Mirrors of the backend records and their create/update payloads.
//! Field names are camelCase on the wire. Every tenant-owned record carries
//! `school_id`; the backend enforces isolation, the client only checks it.
//! IDs are opaque strings.

pub mod announcement;
pub mod attendance;
pub mod class;
pub mod holiday;
pub mod school;
pub mod student;
pub mod teacher;

pub(crate) mod validate;

// Re-exports
pub use announcement::*;
pub use attendance::*;
pub use class::*;
pub use holiday::*;
pub use school::*;
pub use student::*;
pub use teacher::*;

/// Leading `YYYY-MM-DD` of a backend date (`2025-01-26` or `2025-01-26T00:00:00.000Z`)
pub(crate) fn parse_day(raw: &str) -> Option<chrono::NaiveDate> {
    let day = raw.get(..10)?;
    chrono::NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
