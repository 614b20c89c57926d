// vyasa-client/tests/dispatch_integration.rs
// School scoping, headers, session expiry and error mapping through a recording transport

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{MockTransport, Reply, header, logged_in, record, token_for};
use http::{Method, StatusCode};
use parking_lot::Mutex;
use serde_json::{Value, json};
use vyasa_client::dispatch::{ApiRequest, SCHOOL_ID_HEADER};
use vyasa_client::error::MISSING_TENANT_MESSAGE;
use vyasa_client::{ClientError, QueryKey, VyasaClient};

fn holiday(id: &str, school_id: &str) -> Value {
    record(
        id,
        school_id,
        json!({"name": "Diwali", "date": "2025-10-20T00:00:00.000Z"}),
    )
}

#[tokio::test]
async fn test_school_call_without_school_makes_no_request() {
    let mock = MockTransport::new();
    let client = logged_in(mock.clone(), "SUPER_ADMIN", "platform");
    assert!(client.school_id().is_none());

    let err = client.holidays().list().await.unwrap_err();
    assert!(matches!(err, ClientError::MissingTenantContext));
    assert_eq!(err.to_string(), MISSING_TENANT_MESSAGE);

    let err = client.students().get("st1").await.unwrap_err();
    assert!(matches!(err, ClientError::MissingTenantContext));

    assert_eq!(mock.count(), 0);
}

#[tokio::test]
async fn test_school_call_carries_token_and_school() {
    let mock = MockTransport::new();
    mock.on(Method::GET, "/holidays", 200, json!([holiday("h1", "s1")]));
    let client = logged_in(mock.clone(), "SCHOOL_ADMIN", "s1");

    let holidays = client.holidays().list().await.unwrap();
    assert_eq!(holidays.len(), 1);
    assert_eq!(holidays[0].name, "Diwali");

    let request = mock.last();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.url, format!("{}/holidays", common::BASE_URL));
    assert_eq!(
        header(&request, "authorization"),
        Some(format!("Bearer {}", token_for("SCHOOL_ADMIN", "s1")))
    );
    assert_eq!(header(&request, SCHOOL_ID_HEADER), Some("s1".to_string()));
}

#[tokio::test]
async fn test_explicit_school_header_wins() {
    let mock = MockTransport::new();
    mock.on(Method::GET, "/classes", 200, json!([]));
    let client = logged_in(mock.clone(), "SCHOOL_ADMIN", "s1");

    let _: Value = client
        .dispatcher()
        .send(ApiRequest::get("/classes").header("X-School-Id", "s2"))
        .await
        .unwrap();

    assert_eq!(header(&mock.last(), SCHOOL_ID_HEADER), Some("s2".to_string()));
}

#[tokio::test]
async fn test_platform_call_has_no_school_header() {
    let mock = MockTransport::new();
    mock.on(Method::GET, "/schools", 200, json!([]));
    let client = logged_in(mock.clone(), "SUPER_ADMIN", "platform");

    let schools = client.schools().list().await.unwrap();
    assert!(schools.is_empty());

    let request = mock.last();
    assert!(header(&request, "authorization").is_some());
    assert_eq!(header(&request, SCHOOL_ID_HEADER), None);
}

#[tokio::test]
async fn test_foreign_school_records_are_returned_with_a_warning() {
    let (logs, _guard) = common::capture_warnings();
    let mock = MockTransport::new();
    mock.on(
        Method::GET,
        "/holidays",
        200,
        json!([holiday("h1", "s1"), holiday("h2", "s2")]),
    );
    let client = logged_in(mock.clone(), "SCHOOL_ADMIN", "s1");

    let holidays = client.holidays().list().await.unwrap();
    assert_eq!(holidays.len(), 2);

    let output = logs.contents();
    assert!(output.contains("Response schoolId does not match the active school"));
    assert!(output.contains("s2"));
}

#[tokio::test]
async fn test_foreign_school_record_is_returned_with_a_warning() {
    let (logs, _guard) = common::capture_warnings();
    let mock = MockTransport::new();
    mock.on(Method::GET, "/holidays/h1", 200, holiday("h1", "s2"));
    let client = logged_in(mock.clone(), "SCHOOL_ADMIN", "s1");

    let holiday = client.holidays().get("h1").await.unwrap();
    assert_eq!(holiday.id, "h1");
    assert_eq!(holiday.school_id, "s2");

    let output = logs.contents();
    assert!(output.contains("Response schoolId does not match the active school"));
    assert!(output.contains("/holidays/h1"));
    assert!(output.contains("s2"));
}

#[tokio::test]
async fn test_unauthorized_ends_the_session() {
    let mock = MockTransport::new();
    mock.on(Method::GET, "/holidays", 200, json!([]));
    mock.on(
        Method::GET,
        "/students",
        401,
        json!({"message": "Unauthorized", "statusCode": 401}),
    );

    let redirects = Arc::new(Mutex::new(Vec::<String>::new()));
    let seen = Arc::clone(&redirects);
    let client = VyasaClient::builder()
        .config(common::config())
        .transport(mock.clone())
        .on_session_expired(move |to: &str| seen.lock().push(to.to_string()))
        .build()
        .unwrap()
        .login_with_token(&token_for("TEACHER", "s1"))
        .unwrap();

    client.holidays().list().await.unwrap();
    assert!(client.cache().contains(&QueryKey::new("holidays").push("s1")));

    let err = client
        .students()
        .list(&Default::default())
        .await
        .unwrap_err();
    assert!(err.is_auth_error());
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(err.to_string(), "Unauthorized");

    assert!(client.is_expired());
    assert!(client.session().token().is_none());
    assert!(client.school_id().is_none());
    assert!(client.cache().is_empty());
    assert_eq!(*redirects.lock(), vec!["/auth/login".to_string()]);

    // Later school calls fail locally
    let before = mock.count();
    let err = client.holidays().list().await.unwrap_err();
    assert!(matches!(err, ClientError::MissingTenantContext));
    assert_eq!(mock.count(), before);
}

#[tokio::test]
async fn test_unauthorized_before_login_keeps_state() {
    let mock = MockTransport::new();
    mock.on(
        Method::POST,
        "/auth/login",
        401,
        json!({"message": "Invalid OTP", "statusCode": 401}),
    );
    mock.on(
        Method::POST,
        "/auth/send-otp",
        201,
        json!({"message": "OTP sent"}),
    );
    let client = common::client(mock.clone());

    let pending = client.request_otp("+91", "9876543210").await.unwrap();
    let err = pending.verify_otp("123456").await.unwrap_err();

    assert!(matches!(err, ClientError::Api { .. }));
    assert_eq!(err.to_string(), "Invalid OTP");
    assert!(pending.session().pending_mobile().is_some());
}

#[tokio::test]
async fn test_error_envelopes_map_to_copy() {
    let mock = MockTransport::new();
    mock.on(
        Method::POST,
        "/holidays",
        400,
        json!({
            "message": ["name should not be empty", "date must be a valid ISO 8601 date string"],
            "error": "Bad Request",
            "statusCode": 400
        }),
    );
    mock.on(
        Method::POST,
        "/classes",
        409,
        json!({"message": "Class already exists", "statusCode": 409}),
    );
    mock.on_raw(Method::POST, "/sections", 502, "<html>Bad Gateway</html>");
    mock.on(Method::DELETE, "/students/st9", 403, json!({}));
    let client = logged_in(mock.clone(), "SCHOOL_ADMIN", "s1");

    let payload = shared::models::HolidayCreate {
        name: "Diwali".into(),
        date: chrono::NaiveDate::from_ymd_opt(2025, 10, 20).unwrap(),
    };
    let err = client.holidays().create(&payload).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "name should not be empty, date must be a valid ISO 8601 date string"
    );
    assert!(err.is_validation_error());

    let err = client
        .classes()
        .create(&shared::models::ClassCreate { name: "5".into() })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Class already exists");
    assert_eq!(err.status(), Some(StatusCode::CONFLICT));

    let err = client
        .classes()
        .create_section(&shared::models::SectionCreate {
            name: "A".into(),
            class_id: "c5".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Bad gateway. The server is temporarily unavailable."
    );

    let err = client.students().delete("st9").await.unwrap_err();
    assert!(err.is_permission_error());
    assert_eq!(
        err.to_string(),
        "You do not have permission to perform this action."
    );
}

#[tokio::test(start_paused = true)]
async fn test_reads_retry_network_failures() {
    let mock = MockTransport::new();
    mock.on_reply(Method::GET, "/classes", Reply::Refused);
    mock.on_reply(Method::GET, "/classes", Reply::Timeout);
    mock.on(Method::GET, "/classes", 200, json!([]));
    let client = logged_in(mock.clone(), "SCHOOL_ADMIN", "s1");

    let classes = client.classes().list().await.unwrap();
    assert!(classes.is_empty());
    assert_eq!(mock.count_path("/classes"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_network_failure_copy_after_retries() {
    let mock = MockTransport::new();
    mock.on_reply(Method::GET, "/teachers", Reply::Refused);
    let client = logged_in(mock.clone(), "SCHOOL_ADMIN", "s1");

    let err = client.teachers().list(false).await.unwrap_err();
    assert!(err.is_network_error());
    assert_eq!(
        err.to_string(),
        "Unable to connect to the server. Please check your internet connection."
    );
    // First attempt plus three retries
    assert_eq!(mock.count_path("/teachers"), 4);
}

#[tokio::test]
async fn test_mutations_are_not_retried() {
    let mock = MockTransport::new();
    mock.on_reply(Method::POST, "/classes", Reply::Timeout);
    let client = logged_in(mock.clone(), "SCHOOL_ADMIN", "s1");

    let err = client
        .classes()
        .create(&shared::models::ClassCreate { name: "5".into() })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Timeout));
    assert_eq!(err.to_string(), "Request timeout. Please try again.");
    assert_eq!(mock.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_backend_still_answers() {
    let mock = MockTransport::new();
    mock.with_delay(Duration::from_secs(5));
    mock.on(Method::GET, "/announcements", 200, json!([]));
    let client = logged_in(mock.clone(), "PARENT", "s1");

    assert!(client.announcements().list().await.unwrap().is_empty());
}
