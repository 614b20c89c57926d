//! Announcement Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Announcement entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub content: String,
    pub target_all: bool,
    pub target_class: Option<String>,
    pub target_section: Option<String>,
    pub school_id: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Announcement {
    /// Audience as stored by the backend
    pub fn audience(&self) -> Audience {
        match (self.target_all, &self.target_class, &self.target_section) {
            (false, Some(class_name), Some(section)) => Audience::Section {
                class_name: class_name.clone(),
                section: section.clone(),
            },
            _ => Audience::All,
        }
    }
}

/// Who an announcement is addressed to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Audience {
    /// Whole school
    #[default]
    All,
    /// One class/section pair
    Section { class_name: String, section: String },
}

impl Audience {
    pub fn section(class_name: impl Into<String>, section: impl Into<String>) -> Self {
        Self::Section {
            class_name: class_name.into(),
            section: section.into(),
        }
    }

    /// `(targetAll, targetClass, targetSection)` as sent on the wire
    fn into_targets(self) -> (bool, Option<String>, Option<String>) {
        match self {
            Self::All => (true, None, None),
            Self::Section { class_name, section } => (false, Some(class_name), Some(section)),
        }
    }
}

/// Create announcement payload
///
/// Built from an [`Audience`], so `targetClass`/`targetSection` are only
/// serialized when `targetAll` is false, and then always both.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_targets"))]
pub struct AnnouncementCreate {
    #[validate(length(min = 1, message = "title is required"))]
    title: String,
    #[validate(length(min = 1, message = "content is required"))]
    content: String,
    target_all: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_section: Option<String>,
}

impl AnnouncementCreate {
    pub fn new(title: impl Into<String>, content: impl Into<String>, audience: Audience) -> Self {
        let (target_all, target_class, target_section) = audience.into_targets();
        Self {
            title: title.into(),
            content: content.into(),
            target_all,
            target_class,
            target_section,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn target_all(&self) -> bool {
        self.target_all
    }
}

/// Update announcement payload
///
/// Unset fields are omitted. Setting an audience always rewrites all three
/// target fields together.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_targets"))]
pub struct AnnouncementUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "title must not be empty"))]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "content must not be empty"))]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_all: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_section: Option<String>,
}

impl AnnouncementUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn audience(mut self, audience: Audience) -> Self {
        let (target_all, target_class, target_section) = audience.into_targets();
        self.target_all = Some(target_all);
        self.target_class = target_class;
        self.target_section = target_section;
        self
    }
}

fn section_targets_present(
    target_all: bool,
    target_class: Option<&str>,
    target_section: Option<&str>,
) -> Result<(), ValidationError> {
    if target_all {
        return Ok(());
    }
    let filled = |v: Option<&str>| v.is_some_and(|s| !s.trim().is_empty());
    if filled(target_class) && filled(target_section) {
        Ok(())
    } else {
        Err(ValidationError::new("audience")
            .with_message("class and section are required unless targeting all".into()))
    }
}

fn validate_create_targets(value: &AnnouncementCreate) -> Result<(), ValidationError> {
    section_targets_present(
        value.target_all,
        value.target_class.as_deref(),
        value.target_section.as_deref(),
    )
}

fn validate_update_targets(value: &AnnouncementUpdate) -> Result<(), ValidationError> {
    match value.target_all {
        Some(target_all) => section_targets_present(
            target_all,
            value.target_class.as_deref(),
            value.target_section.as_deref(),
        ),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_audience_omits_targets() {
        let payload = AnnouncementCreate::new("Sports day", "Friday", Audience::All);
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({"title": "Sports day", "content": "Friday", "targetAll": true})
        );
    }

    #[test]
    fn test_section_audience_sends_both_targets() {
        let payload =
            AnnouncementCreate::new("PTM", "Saturday 10am", Audience::section("5", "B"));
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["targetAll"], json!(false));
        assert_eq!(value["targetClass"], json!("5"));
        assert_eq!(value["targetSection"], json!("B"));
    }

    #[test]
    fn test_blank_section_audience_is_invalid() {
        let payload = AnnouncementCreate::new("PTM", "Saturday", Audience::section("5", " "));
        assert!(payload.validate().is_err());
        let payload = AnnouncementCreate::new("", "Saturday", Audience::All);
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_update_switching_to_all_clears_targets() {
        let update = AnnouncementUpdate::new()
            .audience(Audience::section("6", "A"))
            .audience(Audience::All);
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value, json!({"targetAll": true}));
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_entity_audience() {
        let json = json!({
            "id": "a1", "title": "t", "content": "c",
            "targetAll": false, "targetClass": "7", "targetSection": "C",
            "schoolId": "s1", "createdBy": "u1",
            "createdAt": "2025-01-01T00:00:00.000Z", "updatedAt": "2025-01-01T00:00:00.000Z"
        });
        let announcement: Announcement = serde_json::from_value(json).unwrap();
        assert_eq!(announcement.audience(), Audience::section("7", "C"));
    }
}
