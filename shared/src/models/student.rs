//! Student Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Class summary embedded in a student record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentClass {
    pub id: String,
    pub name: String,
    pub school_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Section summary embedded in a student record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSection {
    pub id: String,
    pub name: String,
    pub class_id: String,
    pub school_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parent user linked to a student
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parent {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone_e164: String,
    pub phone_code: String,
    pub phone_number: String,
}

/// Student ↔ parent link
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentLink {
    pub id: String,
    pub parent_id: String,
    pub student_id: String,
    pub parent: Parent,
}

/// Student entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub class_id: String,
    pub section_id: String,
    pub roll_no: u32,
    pub school_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub class: StudentClass,
    pub section: StudentSection,
    #[serde(default)]
    pub parents: Vec<ParentLink>,
}

/// Create student payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentCreate {
    #[validate(length(min = 1, message = "student name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "class is required"))]
    pub class_id: String,
    #[validate(length(min = 1, message = "section is required"))]
    pub section_id: String,
    #[validate(range(min = 1, message = "roll number must be at least 1"))]
    pub roll_no: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "super::validate::country_code"))]
    pub parent_country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "super::validate::mobile_number"))]
    pub parent_mobile_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "parent email is invalid"))]
    pub parent_email: Option<String>,
}

/// Parent entry in a student update (replaces the linked parents)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ParentInput {
    /// Existing parent to keep; new parent when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[validate(length(min = 1, message = "parent name is required"))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "parent email is invalid"))]
    pub email: Option<String>,
    #[validate(custom(function = "super::validate::country_code"))]
    pub country_code: String,
    #[validate(custom(function = "super::validate::mobile_number"))]
    pub mobile_no: String,
}

/// Update student payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "student name must not be empty"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "roll number must be at least 1"))]
    pub roll_no: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub parents: Option<Vec<ParentInput>>,
}
