//! Announcements API

use shared::models::{Announcement, AnnouncementCreate, AnnouncementUpdate};
use validator::Validate;

use super::Endpoint;
use crate::dispatch::{ApiRequest, Dispatcher};
use crate::error::ClientResult;

#[derive(Debug, Clone, Copy)]
pub struct AnnouncementsApi<'a> {
    endpoint: Endpoint<'a>,
}

impl<'a> AnnouncementsApi<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self {
            endpoint: Endpoint::new(dispatcher, "announcements"),
        }
    }

    /// Announcements of the active school (cached)
    pub async fn list(&self) -> ClientResult<Vec<Announcement>> {
        let key = self.endpoint.tenant_key(&[])?;
        self.endpoint
            .cached(key, ApiRequest::get(self.endpoint.collection_path()))
            .await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Announcement> {
        self.endpoint
            .read(ApiRequest::get(self.endpoint.item_path(id)))
            .await
    }

    pub async fn create(&self, payload: &AnnouncementCreate) -> ClientResult<Announcement> {
        payload.validate()?;
        let created: Announcement = self
            .endpoint
            .mutate(ApiRequest::post(self.endpoint.collection_path()).json(payload))
            .await?;
        tracing::info!(id = %created.id, target_all = created.target_all, "Announcement created");
        Ok(created)
    }

    pub async fn update(&self, id: &str, payload: &AnnouncementUpdate) -> ClientResult<Announcement> {
        payload.validate()?;
        self.endpoint
            .mutate(ApiRequest::patch(self.endpoint.item_path(id)).json(payload))
            .await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.endpoint.remove(id).await
    }
}
