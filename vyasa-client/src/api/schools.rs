//! Schools API (platform scope)
//!
//! Super-admin routes. They carry no `X-School-Id` and work without an
//! active school.

use serde::de::IgnoredAny;
use shared::models::{School, SchoolCreate, SchoolUpdate};
use validator::Validate;

use super::Endpoint;
use crate::cache::QueryKey;
use crate::dispatch::{ApiRequest, Dispatcher};
use crate::error::ClientResult;

#[derive(Debug, Clone, Copy)]
pub struct SchoolsApi<'a> {
    endpoint: Endpoint<'a>,
}

impl<'a> SchoolsApi<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self {
            endpoint: Endpoint::new(dispatcher, "schools"),
        }
    }

    /// All schools (cached)
    pub async fn list(&self) -> ClientResult<Vec<School>> {
        self.endpoint
            .cached(
                QueryKey::new("schools"),
                ApiRequest::get(self.endpoint.collection_path()).platform(),
            )
            .await
    }

    pub async fn get(&self, id: &str) -> ClientResult<School> {
        self.endpoint
            .read(ApiRequest::get(self.endpoint.item_path(id)).platform())
            .await
    }

    /// Create a school and its admin account
    pub async fn create(&self, payload: &SchoolCreate) -> ClientResult<School> {
        payload.validate()?;
        let school: School = self
            .endpoint
            .mutate(
                ApiRequest::post(self.endpoint.collection_path())
                    .json(payload)
                    .platform(),
            )
            .await?;
        tracing::info!(id = %school.id, code = %school.school_code, "School created");
        Ok(school)
    }

    pub async fn update(&self, id: &str, payload: &SchoolUpdate) -> ClientResult<School> {
        payload.validate()?;
        self.endpoint
            .mutate(
                ApiRequest::patch(self.endpoint.item_path(id))
                    .json(payload)
                    .platform(),
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        let _: IgnoredAny = self
            .endpoint
            .mutate(ApiRequest::delete(self.endpoint.item_path(id)).platform())
            .await?;
        Ok(())
    }

    pub async fn activate(&self, id: &str) -> ClientResult<School> {
        self.toggle(id, "activate").await
    }

    pub async fn deactivate(&self, id: &str) -> ClientResult<School> {
        self.toggle(id, "deactivate").await
    }

    async fn toggle(&self, id: &str, action: &str) -> ClientResult<School> {
        let path = format!("{}/{action}", self.endpoint.item_path(id));
        let school: School = self
            .endpoint
            .mutate(ApiRequest::patch(path).platform())
            .await?;
        tracing::info!(school = id, action, is_active = school.is_active, "School status changed");
        Ok(school)
    }
}
