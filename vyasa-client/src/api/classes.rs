//! Classes and sections API

use shared::models::{Class, ClassCreate, ClassUpdate, Section, SectionCreate, SectionUpdate};
use validator::Validate;

use super::Endpoint;
use crate::dispatch::{ApiRequest, Dispatcher};
use crate::error::ClientResult;

#[derive(Debug, Clone, Copy)]
pub struct ClassesApi<'a> {
    classes: Endpoint<'a>,
    sections: Endpoint<'a>,
}

impl<'a> ClassesApi<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self {
            classes: Endpoint::new(dispatcher, "classes"),
            sections: Endpoint::new(dispatcher, "sections"),
        }
    }

    /// Classes of the active school with their sections (cached)
    pub async fn list(&self) -> ClientResult<Vec<Class>> {
        let key = self.classes.tenant_key(&[])?;
        self.classes
            .cached(key, ApiRequest::get(self.classes.collection_path()))
            .await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Class> {
        self.classes
            .read(ApiRequest::get(self.classes.item_path(id)))
            .await
    }

    pub async fn create(&self, payload: &ClassCreate) -> ClientResult<Class> {
        payload.validate()?;
        let class = self
            .classes
            .mutate(ApiRequest::post(self.classes.collection_path()).json(payload))
            .await?;
        self.sections.invalidate();
        Ok(class)
    }

    pub async fn update(&self, id: &str, payload: &ClassUpdate) -> ClientResult<Class> {
        payload.validate()?;
        let class = self
            .classes
            .mutate(ApiRequest::patch(self.classes.item_path(id)).json(payload))
            .await?;
        self.sections.invalidate();
        Ok(class)
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.classes.remove(id).await?;
        self.sections.invalidate();
        Ok(())
    }

    // ========== Sections ==========

    /// Sections of the active school, optionally of one class (cached)
    pub async fn sections(&self, class_id: Option<&str>) -> ClientResult<Vec<Section>> {
        let key = self.sections.tenant_key(&[class_id])?;
        let request =
            ApiRequest::get(self.sections.collection_path()).query_opt("classId", class_id);
        self.sections.cached(key, request).await
    }

    pub async fn section(&self, id: &str) -> ClientResult<Section> {
        self.sections
            .read(ApiRequest::get(self.sections.item_path(id)))
            .await
    }

    pub async fn create_section(&self, payload: &SectionCreate) -> ClientResult<Section> {
        payload.validate()?;
        let section = self
            .sections
            .mutate(ApiRequest::post(self.sections.collection_path()).json(payload))
            .await?;
        // Class listings embed their sections
        self.classes.invalidate();
        Ok(section)
    }

    pub async fn update_section(&self, id: &str, payload: &SectionUpdate) -> ClientResult<Section> {
        payload.validate()?;
        let section = self
            .sections
            .mutate(ApiRequest::patch(self.sections.item_path(id)).json(payload))
            .await?;
        self.classes.invalidate();
        Ok(section)
    }

    pub async fn delete_section(&self, id: &str) -> ClientResult<()> {
        self.sections.remove(id).await?;
        self.classes.invalidate();
        Ok(())
    }
}
