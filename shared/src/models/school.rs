//! School Model (platform-level, managed by super admins)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Record counts attached to a school listing
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SchoolCounts {
    #[serde(default)]
    pub teachers: u32,
    #[serde(default)]
    pub students: u32,
    #[serde(default)]
    pub classes: u32,
}

/// School entity (a tenant)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: String,
    pub name: String,
    pub school_code: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_country_code: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "_count", default)]
    pub counts: Option<SchoolCounts>,
}

/// Create school payload (also provisions the school admin)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SchoolCreate {
    #[validate(length(min = 1, message = "school name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "school code is required"))]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "contact email is invalid"))]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_country_code: Option<String>,
    #[validate(length(min = 1, message = "admin name is required"))]
    pub admin_name: String,
    #[validate(email(message = "admin email is invalid"))]
    pub admin_email: String,
    #[validate(custom(function = "super::validate::country_code"))]
    pub admin_phone_code: String,
    #[validate(custom(function = "super::validate::mobile_number"))]
    pub admin_phone_number: String,
}

/// Update school payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SchoolUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "school name must not be empty"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "contact email is invalid"))]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_school_counts_field() {
        let school: School = serde_json::from_value(json!({
            "id": "s1", "name": "Green Valley", "schoolCode": "GV01",
            "isActive": true,
            "createdAt": "2025-01-01T00:00:00Z", "updatedAt": "2025-01-01T00:00:00Z",
            "_count": {"teachers": 12, "students": 340, "classes": 10}
        }))
        .unwrap();
        assert_eq!(school.counts.unwrap().students, 340);
        assert!(school.address.is_none());
    }

    #[test]
    fn test_create_validation() {
        let mut payload = SchoolCreate {
            name: "Green Valley".into(),
            code: "GV01".into(),
            address: None,
            city: Some("Pune".into()),
            state: None,
            country: None,
            pincode: None,
            contact_email: None,
            contact_phone: None,
            contact_country_code: None,
            admin_name: "R. Iyer".into(),
            admin_email: "admin@gv.edu".into(),
            admin_phone_code: "+91".into(),
            admin_phone_number: "9876543210".into(),
        };
        assert!(payload.validate().is_ok());

        payload.admin_email = "not-an-email".into();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("admin_email"));
    }
}
