//! Holidays API

use shared::models::{Holiday, HolidayCreate, HolidayUpdate};
use shared::response::BulkUploadResult;
use shared::templates::CsvTemplate;
use validator::Validate;

use super::Endpoint;
use crate::dispatch::{ApiRequest, Dispatcher};
use crate::error::ClientResult;
use crate::upload::UploadFile;

#[derive(Debug, Clone, Copy)]
pub struct HolidaysApi<'a> {
    endpoint: Endpoint<'a>,
}

impl<'a> HolidaysApi<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self {
            endpoint: Endpoint::new(dispatcher, "holidays"),
        }
    }

    /// Holidays of the active school (cached)
    pub async fn list(&self) -> ClientResult<Vec<Holiday>> {
        let key = self.endpoint.tenant_key(&[])?;
        self.endpoint
            .cached(key, ApiRequest::get(self.endpoint.collection_path()))
            .await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Holiday> {
        self.endpoint
            .read(ApiRequest::get(self.endpoint.item_path(id)))
            .await
    }

    pub async fn create(&self, payload: &HolidayCreate) -> ClientResult<Holiday> {
        payload.validate()?;
        self.endpoint
            .mutate(ApiRequest::post(self.endpoint.collection_path()).json(payload))
            .await
    }

    pub async fn update(&self, id: &str, payload: &HolidayUpdate) -> ClientResult<Holiday> {
        payload.validate()?;
        self.endpoint
            .mutate(ApiRequest::patch(self.endpoint.item_path(id)).json(payload))
            .await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.endpoint.remove(id).await
    }

    /// Upload a `name,date` sheet
    ///
    /// Rows whose `(name, date)` already exist come back as row errors; the
    /// backend owns that decision.
    pub async fn bulk_upload(&self, file: UploadFile) -> ClientResult<BulkUploadResult> {
        self.endpoint.bulk_upload(file, &CsvTemplate::HOLIDAYS).await
    }
}
