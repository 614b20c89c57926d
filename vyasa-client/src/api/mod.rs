//! Feature APIs
//!
//! Thin typed wrappers over the [`Dispatcher`]. Lists are cached per school;
//! every successful mutation invalidates the resource's cache keys.

mod announcements;
mod attendance;
mod classes;
mod holidays;
mod schools;
mod students;
mod teachers;

pub use announcements::AnnouncementsApi;
pub use attendance::{AttendanceApi, AttendanceSheet, AttendanceStats, DateRange};
pub use classes::ClassesApi;
pub use holidays::HolidaysApi;
pub use schools::SchoolsApi;
pub use students::{StudentFilter, StudentsApi};
pub use teachers::TeachersApi;

use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use shared::response::{BulkUploadEnvelope, BulkUploadResult};
use shared::templates::CsvTemplate;

use crate::cache::QueryKey;
use crate::dispatch::{ApiRequest, Dispatcher};
use crate::error::ClientResult;
use crate::upload::UploadFile;

/// Borrowed dispatcher plus the calling patterns shared by the feature APIs
#[derive(Debug, Clone, Copy)]
pub(crate) struct Endpoint<'a> {
    dispatcher: &'a Dispatcher,
    resource: &'static str,
}

impl<'a> Endpoint<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher, resource: &'static str) -> Self {
        Self {
            dispatcher,
            resource,
        }
    }

    pub(crate) fn dispatcher(&self) -> &'a Dispatcher {
        self.dispatcher
    }

    /// `/<resource>/<id>`
    pub(crate) fn item_path(&self, id: &str) -> String {
        format!("/{}/{}", self.resource, urlencoding::encode(id))
    }

    pub(crate) fn collection_path(&self) -> String {
        format!("/{}", self.resource)
    }

    /// Tenant-scoped list key: `[<resource>, <schoolId>, ..extra]`
    ///
    /// Fails with the re-login error when no school is active, before the
    /// cache is consulted.
    pub(crate) fn tenant_key(&self, extra: &[Option<&str>]) -> ClientResult<QueryKey> {
        let school = self.dispatcher.require_tenant()?;
        let key = QueryKey::new(self.resource).push(school.as_str());
        Ok(extra.iter().fold(key, |key, segment| {
            key.push(segment.unwrap_or("*"))
        }))
    }

    /// Cached read
    pub(crate) async fn cached<T>(&self, key: QueryKey, request: ApiRequest) -> ClientResult<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let dispatcher = self.dispatcher;
        dispatcher
            .cache()
            .fetch(key, move || dispatcher.send(request.clone()))
            .await
    }

    /// Uncached read with retries
    pub(crate) async fn read<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        let dispatcher = self.dispatcher;
        dispatcher
            .cache()
            .retry(self.resource, move || dispatcher.send(request.clone()))
            .await
    }

    /// Mutation; invalidates the resource on success, never retried
    pub(crate) async fn mutate<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        let out = self.dispatcher.send(request).await?;
        self.invalidate();
        Ok(out)
    }

    /// Delete; the response body is ignored
    pub(crate) async fn remove(&self, id: &str) -> ClientResult<()> {
        let _: IgnoredAny = self.mutate(ApiRequest::delete(self.item_path(id))).await?;
        Ok(())
    }

    /// Multipart upload to `/<resource>/bulk-upload`
    pub(crate) async fn bulk_upload(
        &self,
        file: UploadFile,
        template: &CsvTemplate,
    ) -> ClientResult<BulkUploadResult> {
        file.check_columns(template)?;
        tracing::info!(
            resource = self.resource,
            file = file.file_name(),
            bytes = file.len(),
            "Uploading bulk file"
        );
        let envelope: BulkUploadEnvelope = self
            .mutate(ApiRequest::post(format!("/{}/bulk-upload", self.resource)).multipart(file))
            .await?;
        let result = envelope.into_result();
        if !result.is_clean() {
            tracing::warn!(
                resource = self.resource,
                success = result.success,
                failed = result.failed,
                "Bulk upload finished with row errors"
            );
        }
        Ok(result)
    }

    pub(crate) fn invalidate(&self) {
        self.dispatcher.cache().invalidate(&QueryKey::new(self.resource));
    }
}
