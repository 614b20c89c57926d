//! Teacher Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::class::ClassRef;

/// User account behind a teacher
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherUser {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone_e164: String,
    pub phone_code: String,
    pub phone_number: String,
}

/// Section a teacher is assigned to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedSection {
    pub id: String,
    pub name: String,
    pub class_id: String,
    pub class: ClassRef,
}

/// Teacher ↔ section assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherAssignment {
    pub id: String,
    pub teacher_id: String,
    pub section_id: String,
    pub created_at: DateTime<Utc>,
    pub section: AssignedSection,
}

/// Teacher entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub user_id: String,
    pub school_id: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: TeacherUser,
    #[serde(default)]
    pub assignments: Vec<TeacherAssignment>,
}

impl Teacher {
    /// `"5-A"` style labels of the assigned sections
    pub fn section_labels(&self) -> Vec<String> {
        self.assignments
            .iter()
            .map(|a| format!("{}-{}", a.section.class.name, a.section.name))
            .collect()
    }
}

/// Create teacher payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TeacherCreate {
    #[validate(length(min = 1, message = "teacher name is required"))]
    pub name: String,
    #[validate(custom(function = "super::validate::country_code"))]
    pub country_code: String,
    #[validate(custom(function = "super::validate::mobile_number"))]
    pub mobile_no: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "email is invalid"))]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_ids: Option<Vec<String>>,
}

/// Update teacher payload (section assignment)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TeacherUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_ids: Option<Vec<String>>,
}
