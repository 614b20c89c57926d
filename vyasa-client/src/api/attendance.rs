//! Attendance API and the marking sheet

use std::collections::HashMap;

use chrono::NaiveDate;
use shared::models::{
    AttendanceRecord, AttendanceStatus, MarkAttendanceRequest, MarkAttendanceResponse, Student,
    StudentAttendance, StudentAttendanceResponse,
};

use super::Endpoint;
use crate::dispatch::{ApiRequest, Dispatcher};
use crate::error::{ClientError, ClientResult};

/// Shown when a sheet is submitted with unmarked students
pub const INCOMPLETE_SHEET_MESSAGE: &str = "Please mark attendance for all students";

/// Shown when a sheet has no students at all
pub const EMPTY_ROSTER_MESSAGE: &str = "No students found in this class";

/// Inclusive `startDate`/`endDate` filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn day(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    fn apply(&self, request: ApiRequest) -> ApiRequest {
        request
            .query_opt("startDate", self.start.map(|d| d.format("%Y-%m-%d")))
            .query_opt("endDate", self.end.map(|d| d.format("%Y-%m-%d")))
    }
}

/// Counts shown above a sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceStats {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub unmarked: usize,
}

/// One day's attendance for one section
///
/// Built from the section roster; it only turns into a request once every
/// student on the roster has a status.
#[derive(Debug, Clone)]
pub struct AttendanceSheet {
    class_name: String,
    section: String,
    date: NaiveDate,
    roster: Vec<String>,
    marks: HashMap<String, AttendanceStatus>,
}

impl AttendanceSheet {
    pub fn new<I, S>(
        class_name: impl Into<String>,
        section: impl Into<String>,
        date: NaiveDate,
        roster: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<String> = Vec::new();
        for id in roster {
            let id = id.into();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self {
            class_name: class_name.into(),
            section: section.into(),
            date,
            roster: ids,
            marks: HashMap::new(),
        }
    }

    /// Sheet for the students of one section, named as the backend expects
    pub fn for_students(
        class_name: impl Into<String>,
        section: impl Into<String>,
        date: NaiveDate,
        students: &[Student],
    ) -> Self {
        Self::new(class_name, section, date, students.iter().map(|s| s.id.clone()))
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    pub fn status(&self, student_id: &str) -> Option<AttendanceStatus> {
        self.marks.get(student_id).copied()
    }

    /// Record one student's status
    pub fn set(&mut self, student_id: &str, status: AttendanceStatus) -> ClientResult<()> {
        if !self.roster.iter().any(|id| id == student_id) {
            return Err(ClientError::Validation(format!(
                "Student {student_id} is not in {}-{}",
                self.class_name, self.section
            )));
        }
        self.marks.insert(student_id.to_string(), status);
        Ok(())
    }

    /// Give every student on the roster the same status
    pub fn mark_all(&mut self, status: AttendanceStatus) {
        for id in &self.roster {
            self.marks.insert(id.clone(), status);
        }
    }

    pub fn stats(&self) -> AttendanceStats {
        let count = |wanted: AttendanceStatus| self.marks.values().filter(|s| **s == wanted).count();
        let present = count(AttendanceStatus::Present);
        let absent = count(AttendanceStatus::Absent);
        AttendanceStats {
            total: self.roster.len(),
            present,
            absent,
            unmarked: self.roster.len() - self.marks.len(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.roster.is_empty() && self.marks.len() == self.roster.len()
    }

    /// Mark request in roster order
    pub fn to_request(&self) -> ClientResult<MarkAttendanceRequest> {
        if self.roster.is_empty() {
            return Err(ClientError::Validation(EMPTY_ROSTER_MESSAGE.into()));
        }
        let attendances = self
            .roster
            .iter()
            .map(|id| {
                self.marks.get(id).map(|status| StudentAttendance {
                    student_id: id.clone(),
                    status: *status,
                })
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ClientError::Validation(INCOMPLETE_SHEET_MESSAGE.into()))?;
        Ok(MarkAttendanceRequest {
            class_name: self.class_name.clone(),
            section: self.section.clone(),
            date: self.date,
            attendances,
        })
    }

    pub fn into_request(self) -> ClientResult<MarkAttendanceRequest> {
        self.to_request()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AttendanceApi<'a> {
    endpoint: Endpoint<'a>,
}

impl<'a> AttendanceApi<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self {
            endpoint: Endpoint::new(dispatcher, "attendance"),
        }
    }

    /// Submit a complete sheet
    ///
    /// An incomplete sheet is rejected before any request is made.
    pub async fn mark(&self, sheet: &AttendanceSheet) -> ClientResult<MarkAttendanceResponse> {
        let request = sheet.to_request()?;
        let response: MarkAttendanceResponse = self
            .endpoint
            .mutate(ApiRequest::post("/attendance/mark").json(&request))
            .await?;
        tracing::info!(
            class = %request.class_name,
            section = %request.section,
            date = %request.date,
            count = response.count,
            "Attendance marked"
        );
        Ok(response)
    }

    /// Records of one class/section
    pub async fn by_class(
        &self,
        class_name: &str,
        section: &str,
        range: DateRange,
    ) -> ClientResult<Vec<AttendanceRecord>> {
        let path = format!(
            "/attendance/class/{}/section/{}",
            urlencoding::encode(class_name),
            urlencoding::encode(section)
        );
        self.endpoint.read(range.apply(ApiRequest::get(path))).await
    }

    /// One student's records
    pub async fn by_student(
        &self,
        student_id: &str,
        range: DateRange,
    ) -> ClientResult<StudentAttendanceResponse> {
        let path = format!("/attendance/student/{}", urlencoding::encode(student_id));
        self.endpoint.read(range.apply(ApiRequest::get(path))).await
    }

    /// Records of the logged-in parent's children
    pub async fn my_children(&self, range: DateRange) -> ClientResult<Vec<AttendanceRecord>> {
        self.endpoint
            .read(range.apply(ApiRequest::get("/attendance/my-children")))
            .await
    }
}
