//! Class and Section Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Class entity (grade), with its sections
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: String,
    pub name: String,
    pub school_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// Minimal class reference embedded in other records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRef {
    pub id: String,
    pub name: String,
}

/// Section entity (division of a class)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    pub class_id: String,
    pub school_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub class: Option<ClassRef>,
}

/// Create class payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClassCreate {
    #[validate(length(min = 1, message = "class name is required"))]
    pub name: String,
}

/// Update class payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClassUpdate {
    #[validate(length(min = 1, message = "class name is required"))]
    pub name: String,
}

/// Create section payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SectionCreate {
    #[validate(length(min = 1, message = "section name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "class is required"))]
    pub class_id: String,
}

/// Update section payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SectionUpdate {
    #[validate(length(min = 1, message = "section name is required"))]
    pub name: String,
}
