//! HTTP surface tests over the in-memory application state.
//!
//! Each test drives the real Actix routes with the reference adapters and
//! the fixture gateway, asserting wire shapes, status codes, and the error
//! envelope.

use std::sync::Arc;

use actix_web::{test, web, App};
use serde_json::{json, Value};
use uuid::Uuid;

use backend::api::health::{live, ready, HealthState};
use backend::api::{self, AppState};
use backend::domain::ports::{FixtureGeolocationProvider, FixturePaymentGateway};
use backend::domain::CurrencyCode;
use backend::Trace;

fn state() -> AppState {
    AppState::with_in_memory_stores(
        Arc::new(FixturePaymentGateway),
        Arc::new(FixtureGeolocationProvider),
        CurrencyCode::new("INR").expect("valid code"),
    )
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(HealthState::new()))
                .app_data(web::Data::new($state))
                .wrap(Trace)
                .service(web::scope("/api/v1").configure(api::routes))
                .service(ready)
                .service(live),
        )
        .await
    };
}

macro_rules! post_json {
    ($app:expr, $path:expr, $body:expr $(,)?) => {{
        let req = test::TestRequest::post()
            .uri(&$path)
            .set_json($body)
            .to_request();
        let res = test::call_service($app, req).await;
        let status = res.status().as_u16();
        let payload: Value = test::read_body_json(res).await;
        (status, payload)
    }};
}

macro_rules! get_json {
    ($app:expr, $path:expr $(,)?) => {{
        let req = test::TestRequest::get().uri(&$path).to_request();
        let res = test::call_service($app, req).await;
        let status = res.status().as_u16();
        let payload: Value = test::read_body_json(res).await;
        (status, payload)
    }};
}

macro_rules! register {
    ($app:expr, $name:expr, $role:expr $(,)?) => {{
        let (status, body) = post_json!(
            $app,
            "/api/v1/users",
            json!({ "displayName": $name, "role": $role })
        );
        assert_eq!(status, 201, "registration failed: {body}");
        body["id"].as_str().expect("account id").to_owned()
    }};
}

#[actix_web::test]
async fn registration_answers_created_with_the_account() {
    let app = init_app!(state());

    let (status, body) = post_json!(
        &app,
        "/api/v1/users",
        json!({ "displayName": "Avery Client", "role": "client" }),
    );

    assert_eq!(status, 201);
    assert_eq!(body["displayName"], "Avery Client");
    assert_eq!(body["role"], "client");
    // Fixture geolocation fails, so the display currency falls back to USD.
    assert_eq!(body["currency"], "USD");
}

#[actix_web::test]
async fn undersized_display_names_are_rejected() {
    let app = init_app!(state());

    let (status, body) = post_json!(
        &app,
        "/api/v1/users",
        json!({ "displayName": "ab", "role": "client" }),
    );

    assert_eq!(status, 400);
    assert_eq!(body["code"], "invalid_request");
}

#[actix_web::test]
async fn deposit_settlement_moves_the_wallet_and_commission() {
    let app = init_app!(state());
    let client = register!(&app, "Avery Client", "client");

    let (status, intent) = post_json!(
        &app,
        &format!("/api/v1/users/{client}/deposits"),
        json!({ "amountMinor": 10_000, "paymentMethod": "card" }),
    );
    assert_eq!(status, 202);
    let transaction_id = intent["transaction"]["id"].as_str().expect("entry id");
    assert_eq!(intent["transaction"]["status"], "pending");

    let (status, settled) = post_json!(
        &app,
        &format!("/api/v1/users/{client}/deposits/{transaction_id}/settlement"),
        json!({ "paymentRef": "pay_1", "signature": "sig_1" }),
    );
    assert_eq!(status, 200);
    assert_eq!(settled["status"], "completed");

    let (status, wallet) = get_json!(&app, &format!("/api/v1/users/{client}/wallet"));
    assert_eq!(status, 200);
    assert_eq!(wallet["balanceMinor"], 10_000);

    let (status, commission) = get_json!(&app, "/api/v1/platform/commission-balance");
    assert_eq!(status, 200);
    assert_eq!(commission["balanceMinor"], 500);
}

#[actix_web::test]
async fn overdrawn_withdrawals_answer_payment_required() {
    let app = init_app!(state());
    let translator = register!(&app, "Noor Translator", "translator");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/users/{translator}/withdrawals"))
        .set_json(json!({ "amountMinor": 100_000, "paymentMethod": "bank_transfer" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status().as_u16(), 402);
    assert!(res.headers().contains_key("x-trace-id"));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "insufficient_balance");
    assert!(body["traceId"].is_string());
}

#[actix_web::test]
async fn project_creation_assigns_and_exposes_the_feeds() {
    let app = init_app!(state());
    let client = register!(&app, "Avery Client", "client");
    let translator = register!(&app, "Noor Translator", "translator");

    let (status, project) = post_json!(
        &app,
        "/api/v1/projects",
        json!({
            "title": "Product brochure",
            "sourceLanguage": "English",
            "targetLanguage": "Spanish",
            "wordCount": 500,
            "deadline": "2026-09-01T12:00:00Z",
            "priceMinor": 6_000,
            "clientId": client,
        }),
    );
    assert_eq!(status, 201);
    assert_eq!(project["status"], "assigned");
    assert_eq!(project["assignment"]["translatorId"], translator.as_str());
    let project_id = project["id"].as_str().expect("project id");

    let (status, messages) =
        get_json!(&app, &format!("/api/v1/projects/{project_id}/messages"));
    assert_eq!(status, 200);
    assert_eq!(messages.as_array().map(Vec::len), Some(1));

    let (status, counts) =
        get_json!(&app, &format!("/api/v1/users/{translator}/unread-counts"));
    assert_eq!(status, 200);
    assert!(counts["notifications"].as_u64().unwrap_or(0) >= 1);

    let (status, notifications) = get_json!(
        &app,
        &format!("/api/v1/users/{client}/notifications?limit=1")
    );
    assert_eq!(status, 200);
    assert_eq!(notifications["items"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn status_updates_enforce_the_state_machine() {
    let app = init_app!(state());
    let client = register!(&app, "Avery Client", "client");
    register!(&app, "Noor Translator", "translator");

    let (_, project) = post_json!(
        &app,
        "/api/v1/projects",
        json!({
            "title": "Contract",
            "sourceLanguage": "English",
            "targetLanguage": "Spanish",
            "wordCount": 300,
            "deadline": "2026-09-01T12:00:00Z",
            "priceMinor": 4_000,
            "clientId": client,
        }),
    );
    let project_id = project["id"].as_str().expect("project id").to_owned();

    let (status, completed) = post_json!(
        &app,
        &format!("/api/v1/projects/{project_id}/status"),
        json!({ "status": "completed" }),
    );
    assert_eq!(status, 200);
    assert_eq!(completed["status"], "completed");

    let (status, conflict) = post_json!(
        &app,
        &format!("/api/v1/projects/{project_id}/status"),
        json!({ "status": "completed" }),
    );
    assert_eq!(status, 409);
    assert_eq!(conflict["code"], "conflict");
}

#[actix_web::test]
async fn transaction_history_pages_walk_without_duplicates() {
    let app = init_app!(state());
    let client = register!(&app, "Avery Client", "client");

    for index in 0..3 {
        let (_, intent) = post_json!(
            &app,
            &format!("/api/v1/users/{client}/deposits"),
            json!({ "amountMinor": 1_000 + index, "paymentMethod": "card" }),
        );
        let transaction_id = intent["transaction"]["id"].as_str().expect("entry id");
        post_json!(
            &app,
            &format!("/api/v1/users/{client}/deposits/{transaction_id}/settlement"),
            json!({ "paymentRef": format!("pay_{index}"), "signature": "sig" }),
        );
    }

    let mut seen: Vec<String> = Vec::new();
    let mut next = Some(format!("/api/v1/users/{client}/transactions?limit=2"));
    while let Some(path) = next {
        let (status, page) = get_json!(&app, &path);
        assert_eq!(status, 200);
        for item in page["items"].as_array().expect("items array") {
            seen.push(item["id"].as_str().expect("entry id").to_owned());
        }
        next = page["nextCursor"].as_str().map(|cursor| {
            format!("/api/v1/users/{client}/transactions?limit=2&cursor={cursor}")
        });
    }

    assert_eq!(seen.len(), 3);
    let mut deduped = seen.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), 3);
}

#[actix_web::test]
async fn currencies_listing_carries_the_reference_table() {
    let app = init_app!(state());

    let (status, currencies) = get_json!(&app, "/api/v1/currencies");
    assert_eq!(status, 200);
    let entries = currencies.as_array().expect("currency array");
    assert_eq!(entries.len(), 20);
    assert!(
        entries
            .iter()
            .any(|entry| entry["code"] == "JPY" && entry["zeroDecimal"] == true)
    );
}

#[actix_web::test]
async fn unknown_users_answer_not_found() {
    let app = init_app!(state());
    let missing = Uuid::new_v4();

    let (status, body) = get_json!(&app, &format!("/api/v1/users/{missing}"));
    assert_eq!(status, 404);
    assert_eq!(body["code"], "not_found");
}

#[actix_web::test]
async fn liveness_probe_answers_ok() {
    let app = init_app!(state());

    let req = test::TestRequest::get().uri("/health/live").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status().as_u16(), 200);
}
