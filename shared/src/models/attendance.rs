//! Attendance Model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Daily status (only present/absent are tracked)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// One student's status inside a mark request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAttendance {
    pub student_id: String,
    pub status: AttendanceStatus,
}

/// `POST /attendance/mark` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceRequest {
    pub class_name: String,
    pub section: String,
    pub date: NaiveDate,
    pub attendances: Vec<StudentAttendance>,
}

/// `POST /attendance/mark` response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceResponse {
    #[serde(default)]
    pub message: String,
    pub date: String,
    pub class_name: String,
    pub section: String,
    pub count: u32,
}

/// Student summary embedded in attendance records
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStudent {
    pub id: String,
    pub name: String,
    pub roll_no: u32,
    pub class_name: String,
    pub section: String,
}

/// Attendance record entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub student_id: String,
    pub date: String,
    pub status: AttendanceStatus,
    pub school_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub student: AttendanceStudent,
}

impl AttendanceRecord {
    pub fn day(&self) -> Option<NaiveDate> {
        super::parse_day(&self.date)
    }
}

/// `GET /attendance/student/{id}` response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAttendanceResponse {
    pub student: AttendanceStudent,
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
}

impl StudentAttendanceResponse {
    /// Present days over recorded days, `None` when nothing is recorded
    pub fn presence_ratio(&self) -> Option<f64> {
        if self.attendance.is_empty() {
            return None;
        }
        let present = self
            .attendance
            .iter()
            .filter(|r| r.status == AttendanceStatus::Present)
            .count();
        Some(present as f64 / self.attendance.len() as f64)
    }
}
