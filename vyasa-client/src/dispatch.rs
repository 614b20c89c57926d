//! School-scoped request dispatch
//!
//! Every API call goes through [`Dispatcher::send`]. For school-scoped
//! calls it refuses to run without an active school, attaches the bearer
//! token and `X-School-Id`, and warns when a response claims a different
//! school. A 401 on an authenticated call ends the session.

use std::fmt;
use std::sync::Arc;

use http::header::{ACCEPT, AUTHORIZATION, HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use reqwest::Url;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::error::BackendError;

use crate::cache::QueryCache;
use crate::error::{ClientError, ClientResult};
use crate::storage::SessionStore;
use crate::tenant::{SchoolId, TenantContext};
use crate::transport::{HttpRequest, RequestBody, Transport};
use crate::upload::UploadFile;

/// Header carrying the active school
pub const SCHOOL_ID_HEADER: &str = "x-school-id";

/// Where the user is sent after the session ends
pub const LOGIN_PATH: &str = "/auth/login";

/// Who a request is made on behalf of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// School data; requires an active school
    #[default]
    Tenant,
    /// Platform routes (super admin), no school attached
    Platform,
    /// Pre-login routes
    Anonymous,
}

impl Scope {
    fn is_authenticated(&self) -> bool {
        !matches!(self, Self::Anonymous)
    }
}

/// Called once the backend rejects the session
pub trait SessionExpiryHandler: Send + Sync {
    fn on_session_expired(&self, redirect_to: &str);
}

impl<F> SessionExpiryHandler for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_session_expired(&self, redirect_to: &str) {
        self(redirect_to)
    }
}

/// One API call
///
/// ```
/// use vyasa_client::dispatch::ApiRequest;
///
/// let request = ApiRequest::get("/students")
///     .query("classId", "c5")
///     .query_opt("sectionId", None::<&str>);
/// assert_eq!(request.path(), "/students");
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: RequestBody,
    headers: HeaderMap,
    scope: Scope,
    invalid: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            headers: HeaderMap::new(),
            scope: Scope::Tenant,
            invalid: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a query parameter only when present
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => self.body = RequestBody::Json(value),
            Err(e) => self.invalid = Some(format!("request body: {e}")),
        }
        self
    }

    pub fn multipart(mut self, file: UploadFile) -> Self {
        self.body = RequestBody::Multipart(file);
        self
    }

    /// Extra header; replaces any default of the same name
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => self.invalid = Some(format!("header {name}")),
        }
        self
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn platform(self) -> Self {
        self.scope(Scope::Platform)
    }

    pub fn anonymous(self) -> Self {
        self.scope(Scope::Anonymous)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn get_scope(&self) -> Scope {
        self.scope
    }
}

/// The single chokepoint for API calls
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    base_url: String,
    session: SessionStore,
    tenant: TenantContext,
    cache: QueryCache,
    expiry: Option<Arc<dyn SessionExpiryHandler>>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.base_url)
            .field("tenant", &self.tenant.get())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        session: SessionStore,
        tenant: TenantContext,
        cache: QueryCache,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            tenant,
            cache,
            expiry: None,
        }
    }

    pub fn with_expiry_handler(mut self, handler: Arc<dyn SessionExpiryHandler>) -> Self {
        self.expiry = Some(handler);
        self
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn tenant(&self) -> &TenantContext {
        &self.tenant
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// The active school, or the re-login error
    pub fn require_tenant(&self) -> ClientResult<SchoolId> {
        self.tenant.get().ok_or(ClientError::MissingTenantContext)
    }

    /// Perform `request` and deserialize the body into `T`
    ///
    /// An empty body reads as JSON `null`, so `T = ()` fits bodiless
    /// responses.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        if let Some(reason) = request.invalid {
            return Err(ClientError::Validation(format!("Invalid request: {reason}")));
        }

        let tenant = match request.scope {
            Scope::Tenant => Some(self.require_tenant()?),
            Scope::Platform | Scope::Anonymous => None,
        };

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = self.session.token() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ClientError::Token("Invalid token format".into()))?;
            headers.insert(AUTHORIZATION, value);
        }
        if let Some(school_id) = &tenant {
            let value = HeaderValue::from_str(school_id.as_str())
                .map_err(|_| ClientError::MissingTenantContext)?;
            headers.insert(HeaderName::from_static(SCHOOL_ID_HEADER), value);
        }
        for (name, value) in request.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        let url = self.url(&request.path, &request.query)?;
        let method = request.method;
        tracing::debug!(%method, url = %url, scope = ?request.scope, "API request");

        let response = self
            .transport
            .send(HttpRequest {
                method: method.clone(),
                url: url.to_string(),
                headers,
                body: request.body,
            })
            .await
            .map_err(|e| {
                tracing::warn!(%method, path = %request.path, error = %e, "Request did not complete");
                ClientError::from(e)
            })?;

        let status = response.status;
        tracing::debug!(%method, path = %request.path, status = status.as_u16(), "API response");

        if !status.is_success() {
            let message = BackendError::message_from_body(status, &response.body);
            if status == http::StatusCode::UNAUTHORIZED && request.scope.is_authenticated() {
                self.expire_session();
                return Err(ClientError::Unauthorized(message));
            }
            return Err(ClientError::Api { status, message });
        }

        let value: Value = if response.body.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&response.body).map_err(|e| {
                ClientError::InvalidResponse(format!("Invalid response from server: {e}"))
            })?
        };

        if let Some(expected) = &tenant {
            check_school_scope(&value, expected, &request.path);
        }

        serde_json::from_value(value).map_err(|e| {
            tracing::error!(path = %request.path, error = %e, "Unexpected response shape");
            ClientError::InvalidResponse(format!("Invalid response from server: {e}"))
        })
    }

    /// Clear the session after the backend rejected it
    pub fn expire_session(&self) {
        tracing::warn!("Session expired, clearing credentials");
        self.session.remove_token();
        self.tenant.clear();
        self.cache.clear();
        if let Some(handler) = &self.expiry {
            handler.on_session_expired(LOGIN_PATH);
        }
    }

    fn url(&self, path: &str, query: &[(String, String)]) -> ClientResult<Url> {
        let path = path.trim_start_matches('/');
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))
            .map_err(|e| ClientError::Config(format!("Invalid URL for {path}: {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

/// Warn about records that claim another school, returning their `schoolId`s
///
/// Looks at `schoolId` on a top-level object or on each element of a
/// top-level array. Never fails the call.
fn check_school_scope(value: &Value, expected: &SchoolId, path: &str) -> Vec<String> {
    let declared = |item: &Value| {
        item.get("schoolId")
            .and_then(Value::as_str)
            .map(str::to_owned)
    };
    let mismatched: Vec<String> = match value {
        Value::Array(items) => items.iter().filter_map(declared).collect(),
        Value::Object(_) => declared(value).into_iter().collect(),
        _ => Vec::new(),
    }
    .into_iter()
    .filter(|actual| actual != expected.as_str())
    .collect();

    for actual in &mismatched {
        tracing::warn!(
            path,
            expected = %expected,
            actual = %actual,
            "Response schoolId does not match the active school"
        );
    }
    mismatched
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_collects_parts() {
        let request = ApiRequest::get("/teachers")
            .query("includeInactive", true)
            .header("X-School-Id", "override")
            .platform();
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.query, vec![("includeInactive".into(), "true".into())]);
        assert_eq!(request.headers[SCHOOL_ID_HEADER], "override");
        assert_eq!(request.get_scope(), Scope::Platform);
    }

    #[test]
    fn test_bad_header_marks_request_invalid() {
        let request = ApiRequest::get("/x").header("bad header", "v");
        assert!(request.invalid.is_some());
    }

    #[test]
    fn test_school_scope_check_shapes() {
        let school = SchoolId::new("s1").unwrap();
        assert!(check_school_scope(&json!(null), &school, "/x").is_empty());
        assert!(check_school_scope(&json!({"schoolId": "s1"}), &school, "/x").is_empty());
        assert_eq!(
            check_school_scope(&json!({"schoolId": "s2", "name": "Holi"}), &school, "/x"),
            vec!["s2".to_string()]
        );
        assert_eq!(
            check_school_scope(
                &json!([{"schoolId": "s1"}, {"id": 1}, {"schoolId": "s3"}]),
                &school,
                "/x"
            ),
            vec!["s3".to_string()]
        );
        // Nested records are not inspected
        assert!(check_school_scope(&json!({"data": {"schoolId": "s2"}}), &school, "/x").is_empty());
    }
}
