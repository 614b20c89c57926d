//! Teachers API

use serde::de::IgnoredAny;
use shared::models::{Teacher, TeacherCreate, TeacherUpdate};
use shared::response::BulkUploadResult;
use shared::templates::CsvTemplate;
use validator::Validate;

use super::Endpoint;
use crate::dispatch::{ApiRequest, Dispatcher};
use crate::error::ClientResult;
use crate::upload::UploadFile;

#[derive(Debug, Clone, Copy)]
pub struct TeachersApi<'a> {
    endpoint: Endpoint<'a>,
}

impl<'a> TeachersApi<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self {
            endpoint: Endpoint::new(dispatcher, "teachers"),
        }
    }

    /// Teachers of the active school (cached)
    pub async fn list(&self, include_inactive: bool) -> ClientResult<Vec<Teacher>> {
        let flag = if include_inactive { "all" } else { "active" };
        let key = self.endpoint.tenant_key(&[Some(flag)])?;
        let request = ApiRequest::get(self.endpoint.collection_path())
            .query("includeInactive", include_inactive);
        self.endpoint.cached(key, request).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Teacher> {
        self.endpoint
            .read(ApiRequest::get(self.endpoint.item_path(id)))
            .await
    }

    pub async fn create(&self, payload: &TeacherCreate) -> ClientResult<Teacher> {
        payload.validate()?;
        self.endpoint
            .mutate(ApiRequest::post(self.endpoint.collection_path()).json(payload))
            .await
    }

    /// Replace the teacher's section assignments
    pub async fn update(&self, id: &str, payload: &TeacherUpdate) -> ClientResult<Teacher> {
        self.endpoint
            .mutate(ApiRequest::patch(self.endpoint.item_path(id)).json(payload))
            .await
    }

    pub async fn activate(&self, id: &str) -> ClientResult<()> {
        self.toggle(id, "activate").await
    }

    pub async fn deactivate(&self, id: &str) -> ClientResult<()> {
        self.toggle(id, "deactivate").await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.endpoint.remove(id).await
    }

    pub async fn bulk_upload(&self, file: UploadFile) -> ClientResult<BulkUploadResult> {
        self.endpoint.bulk_upload(file, &CsvTemplate::TEACHERS).await
    }

    async fn toggle(&self, id: &str, action: &str) -> ClientResult<()> {
        let path = format!("{}/{action}", self.endpoint.item_path(id));
        let _: IgnoredAny = self.endpoint.mutate(ApiRequest::put(path)).await?;
        tracing::info!(teacher = id, action, "Teacher status changed");
        Ok(())
    }
}
