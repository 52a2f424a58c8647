use std::sync::Arc;

use chrono::NaiveDate;
use hr_console::client::models::LeaveType;
use hr_console::client::session::MemorySessionStore;
use hr_console::client::HrClient;
use hr_console::config::BackendConfig;
use hr_console::pages::dashboard::employee_dashboard;
use hr_console::pages::leaves::{apply_leave, my_leaves, LeaveForm};
use hr_console::pages::profile::view_profile;
use hr_console::pages::salaries::my_salaries;
use hr_console::pages::settings::{
    change_password, settings_profile, update_address, update_phone, AddressParts,
};
use hr_console::view::field_value;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HrClient {
    let base_url = BackendConfig::parse_base_url(&server.uri()).expect("mock server url");
    let session = Arc::new(MemorySessionStore::with_token("employee-token"));
    HrClient::new(&BackendConfig::new(base_url), session).expect("client builds")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn leave_form(start: NaiveDate, end: NaiveDate) -> LeaveForm {
    LeaveForm {
        leave_type: LeaveType::Annual,
        start_date: start,
        end_date: end,
        reason: Some("  Family visit ".to_string()),
    }
}

#[tokio::test]
async fn invalid_leave_dates_never_reach_the_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/employee/apply-leave"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let client = client_for(&server);
    let today = date(2024, 3, 10);

    let past = apply_leave(&client, &leave_form(date(2024, 3, 9), date(2024, 3, 12)), today).await;
    assert_eq!(past.failure(), Some("Start date cannot be in the past."));

    let reversed =
        apply_leave(&client, &leave_form(date(2024, 3, 14), date(2024, 3, 12)), today).await;
    assert_eq!(reversed.failure(), Some("End date cannot be before start date."));
}

#[tokio::test]
async fn submitted_leave_shows_receipt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/employee/apply-leave"))
        .and(body_string_contains("leave_type=annual"))
        .and(body_string_contains("start_date=2024-03-12"))
        .and(body_string_contains("reason=Family+visit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Leave application submitted",
            "leave_id": 41,
            "status": "pending",
            "leave_type": "annual",
            "start_date": "2024-03-12",
            "end_date": "2024-03-14",
            "number_of_days": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = apply_leave(
        &client_for(&server),
        &leave_form(date(2024, 3, 12), date(2024, 3, 14)),
        date(2024, 3, 10),
    )
    .await;
    let receipt = outcome.rendered().expect("receipt");
    assert_eq!(field_value(receipt, "Leave ID"), Some("41"));
    assert_eq!(field_value(receipt, "Type"), Some("Annual"));
    assert_eq!(field_value(receipt, "Status"), Some("Pending"));
}

#[tokio::test]
async fn leave_rejection_detail_is_shown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/employee/apply-leave"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "detail": "Overlapping leave application exists" })),
        )
        .mount(&server)
        .await;

    let outcome = apply_leave(
        &client_for(&server),
        &leave_form(date(2024, 3, 12), date(2024, 3, 14)),
        date(2024, 3, 10),
    )
    .await;
    assert_eq!(outcome.failure(), Some("Overlapping leave application exists"));
}

#[tokio::test]
async fn expired_session_sends_employee_pages_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Invalid token" })),
        )
        .mount(&server)
        .await;
    let client = client_for(&server);

    assert!(employee_dashboard(&client).await.is_login_redirect());
    assert!(my_leaves(&client).await.is_login_redirect());
    assert!(my_salaries(&client).await.is_login_redirect());
    assert!(view_profile(&client).await.is_login_redirect());
    assert!(settings_profile(&client).await.is_login_redirect());
}

#[tokio::test]
async fn expired_session_on_submit_sends_forms_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let leave = apply_leave(
        &client,
        &leave_form(date(2024, 3, 12), date(2024, 3, 14)),
        date(2024, 3, 10),
    )
    .await;
    assert!(leave.is_login_redirect());
    assert!(update_phone(&client, "555-0100").await.is_login_redirect());
}

#[tokio::test]
async fn dashboard_degrades_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/employee/dashboard-stats"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let outcome = employee_dashboard(&client_for(&server)).await;
    let dashboard = outcome.rendered().expect("fallback dashboard");
    assert!(dashboard.degraded);
    assert_eq!(field_value(&dashboard.cards, "Status"), Some("Unknown"));
}

#[tokio::test]
async fn own_records_load_behind_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/employee/my-leaves"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "employee_id": "EMP001",
            "total_applications": 0,
            "leaves": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/employee/my-salaries"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/employee/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "employee_id": "EMP001",
            "first_name": "Ana",
            "last_name": "Lima",
            "role": "employee",
            "is_active": true
        })))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let leaves = my_leaves(&client).await;
    let leaves = leaves.rendered().expect("leave history");
    assert_eq!(leaves.total_applications, 0);
    assert!(leaves.table.placeholder().is_some());

    assert!(my_salaries(&client).await.is_login_redirect());

    let profile = view_profile(&client).await;
    let profile = profile.rendered().expect("profile");
    assert_eq!(profile.name, "Ana Lima");
    assert_eq!(profile.initials, "AL");
}

#[tokio::test]
async fn mismatched_passwords_are_caught_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/settings/change-password"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = change_password(&client_for(&server), "old", "new-one", "new-two").await;
    assert_eq!(outcome.failure(), Some("New passwords do not match"));
}

#[tokio::test]
async fn settings_updates_send_json_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/settings/update-phone"))
        .and(body_json(json!({ "phone": "555-0199" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/settings/update-address"))
        .and(body_json(json!({ "address": "12 Main St, Springfield, IL 62701" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/settings/change-password"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "Incorrect old password" })),
        )
        .mount(&server)
        .await;
    let client = client_for(&server);

    let phone = update_phone(&client, " 555-0199 ").await;
    assert_eq!(
        phone.rendered().map(|notice| notice.message.as_str()),
        Some("Phone number updated successfully!")
    );

    let address = AddressParts {
        street: "12 Main St".into(),
        city: "Springfield".into(),
        state: "IL".into(),
        zip: "62701".into(),
        country: String::new(),
    };
    assert!(update_address(&client, &address).await.rendered().is_some());

    let password = change_password(&client, "wrong", "next", "next").await;
    assert_eq!(password.failure(), Some("Incorrect old password"));
}
