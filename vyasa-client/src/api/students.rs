//! Students API

use shared::models::{Student, StudentCreate, StudentUpdate};
use shared::response::BulkUploadResult;
use shared::templates::CsvTemplate;
use validator::Validate;

use super::Endpoint;
use crate::dispatch::{ApiRequest, Dispatcher};
use crate::error::ClientResult;
use crate::upload::UploadFile;

/// Optional list filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    pub class_id: Option<String>,
    pub section_id: Option<String>,
}

impl StudentFilter {
    pub fn class(class_id: impl Into<String>) -> Self {
        Self {
            class_id: Some(class_id.into()),
            section_id: None,
        }
    }

    pub fn section(mut self, section_id: impl Into<String>) -> Self {
        self.section_id = Some(section_id.into());
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StudentsApi<'a> {
    endpoint: Endpoint<'a>,
}

impl<'a> StudentsApi<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self {
            endpoint: Endpoint::new(dispatcher, "students"),
        }
    }

    /// Students of the active school, optionally one class/section (cached)
    pub async fn list(&self, filter: &StudentFilter) -> ClientResult<Vec<Student>> {
        let key = self.endpoint.tenant_key(&[
            filter.class_id.as_deref(),
            filter.section_id.as_deref(),
        ])?;
        let request = ApiRequest::get(self.endpoint.collection_path())
            .query_opt("classId", filter.class_id.as_deref())
            .query_opt("sectionId", filter.section_id.as_deref());
        self.endpoint.cached(key, request).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Student> {
        self.endpoint
            .read(ApiRequest::get(self.endpoint.item_path(id)))
            .await
    }

    pub async fn create(&self, payload: &StudentCreate) -> ClientResult<Student> {
        payload.validate()?;
        self.endpoint
            .mutate(ApiRequest::post(self.endpoint.collection_path()).json(payload))
            .await
    }

    /// Update a student; `parents`, when set, replaces the linked parents
    pub async fn update(&self, id: &str, payload: &StudentUpdate) -> ClientResult<Student> {
        payload.validate()?;
        self.endpoint
            .mutate(ApiRequest::patch(self.endpoint.item_path(id)).json(payload))
            .await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.endpoint.remove(id).await
    }

    pub async fn bulk_upload(&self, file: UploadFile) -> ClientResult<BulkUploadResult> {
        self.endpoint.bulk_upload(file, &CsvTemplate::STUDENTS).await
    }
}
