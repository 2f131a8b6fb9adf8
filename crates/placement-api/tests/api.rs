use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use placement_api::{AppState, AppStateInner, router, seed};
use placement_db::Database;
use placement_db::models::{NewCompany, NewExperience, NewPremiumOpportunity};

fn app() -> (Router, AppState) {
    let state: AppState = Arc::new(AppStateInner {
        db: Database::open_in_memory().unwrap(),
    });
    (router(state.clone()), state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Token {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(app: &Router, username: &str, year: Value) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/register/",
        None,
        Some(json!({
            "username": username,
            "password": "secret",
            "first_name": "Test",
            "last_name": "Student",
            "email": format!("{}@example.com", username),
            "roll_number": "R1",
            "year": year,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn index_lists_endpoints() {
    let (app, _) = app();
    let (status, body) = send(&app, "GET", "/api/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available_endpoints"]["statistics"], "/api/statistics/");
}

#[tokio::test]
async fn register_derives_role_and_returns_token() {
    let (app, _) = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/register/",
        None,
        Some(json!({"username": "alice", "password": "pw", "year": "2"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["token"].as_str().unwrap().len(), 40);
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["student"]["year"], 2);
    assert_eq!(body["student"]["role"], "Senior");
}

#[tokio::test]
async fn register_accepts_whole_float_year() {
    let (app, _) = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/register/",
        None,
        Some(json!({"username": "f", "password": "p", "year": 2.0})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["student"]["year"], 2);
    assert_eq!(body["student"]["role"], "Senior");

    let (status, _) = send(
        &app,
        "POST",
        "/api/register/",
        None,
        Some(json!({"username": "g", "password": "p", "year": 2.5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_keyword_overrides_year() {
    let (app, _) = app();
    let (_, body) = send(
        &app,
        "POST",
        "/api/register/",
        None,
        Some(json!({"username": "hr", "password": "pw", "year": 1, "role_keyword": " hr "})),
    )
    .await;
    assert_eq!(body["student"]["role"], "HR");
}

#[tokio::test]
async fn register_rejects_duplicates_and_missing_fields() {
    let (app, _) = app();
    register(&app, "alice", json!(1)).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/register/",
        None,
        Some(json!({"username": "alice", "password": "other"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "username exists");

    let (status, _) = send(
        &app,
        "POST",
        "/api/register/",
        None,
        Some(json!({"username": "bob"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/register/",
        None,
        Some(json!({"username": "bob", "password": "pw", "year": "second"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_returns_the_registration_token() {
    let (app, _) = app();
    let token = register(&app, "alice", json!(1)).await;

    let credentials = json!({"username": "alice", "password": "secret"});
    let (status, body) = send(&app, "POST", "/api/login/", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], token.as_str());
    assert_eq!(body["student"]["role"], "Junior");

    let (_, again) = send(&app, "POST", "/api/login/", None, Some(credentials)).await;
    assert_eq!(again["token"], token.as_str());
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let (app, _) = app();
    register(&app, "alice", json!(1)).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/login/",
        None,
        Some(json!({"username": "alice", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/login/",
        None,
        Some(json!({"username": "nobody", "password": "secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "POST", "/api/login/", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn protected_routes_require_a_known_token() {
    let (app, _) = app();
    for uri in [
        "/api/dashboard/",
        "/api/messages/",
        "/api/placements/",
        "/api/experiences/",
        "/api/statistics/",
    ] {
        let (status, body) = send(&app, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert!(body["detail"].is_string());

        let (status, _) = send(&app, "GET", uri, Some("deadbeef"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
    }
}

#[tokio::test]
async fn bearer_scheme_is_accepted() {
    let (app, _) = app();
    let token = register(&app, "alice", json!(1)).await;
    let request = Request::builder()
        .uri("/api/messages/")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn messages_reach_the_recipient_inbox() {
    let (app, _) = app();
    let alice = register(&app, "alice", json!(1)).await;
    let bob = register(&app, "bob", json!(2)).await;

    let (status, sent) = send(
        &app,
        "POST",
        "/api/messages/",
        Some(&alice),
        Some(json!({"recipient": "bob", "subject": "Hi", "body": "Drive on Friday"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sent["sender"]["username"], "alice");
    assert_eq!(sent["recipient"]["username"], "bob");

    let (_, inbox) = send(&app, "GET", "/api/messages/", Some(&bob), None).await;
    let inbox = inbox.as_array().unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0]["subject"], "Hi");
    assert_eq!(inbox[0]["body"], "Drive on Friday");

    let (_, own) = send(&app, "GET", "/api/messages/", Some(&alice), None).await;
    assert_eq!(own.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn message_to_unknown_recipient_is_not_stored() {
    let (app, state) = app();
    let alice = register(&app, "alice", json!(1)).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/messages/",
        Some(&alice),
        Some(json!({"recipient": "ghost", "subject": "?", "body": "?"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "recipient not found");

    let (status, _) = send(
        &app,
        "POST",
        "/api/messages/",
        Some(&alice),
        Some(json!({"subject": "no one"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(state.db.count_messages().unwrap(), 0);
}

#[tokio::test]
async fn dashboard_on_empty_store() {
    let (app, _) = app();
    let token = register(&app, "alice", json!(1)).await;
    let (status, body) = send(&app, "GET", "/api/dashboard/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["placement_rate_percent"], 0.0);
    assert_eq!(body["total_students_count"], 1);
    assert_eq!(body["still_looking"], 1);
    assert_eq!(body["avg_package_lpa"], 0.0);
    assert_eq!(body["live_updates"]["placements"], json!([]));
}

#[tokio::test]
async fn dashboard_over_seeded_fixtures() {
    let (app, state) = app();
    seed::load(&state.db).unwrap();

    let (_, login) = send(
        &app,
        "POST",
        "/api/login/",
        None,
        Some(json!({"username": "rahulc.mca25", "password": seed::FIXTURE_PASSWORD})),
    )
    .await;
    let token = login["token"].as_str().unwrap();

    let (status, body) = send(&app, "GET", "/api/dashboard/", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["placement_rate_percent"], 75.0);
    assert_eq!(body["placed_students_count"], 3);
    assert_eq!(body["total_students_count"], 4);
    assert_eq!(body["still_looking"], 1);
    assert_eq!(body["avg_package_lpa"], 9.07);
    assert_eq!(body["highest_package_lpa"], 15.5);
    assert_eq!(body["companies_count"], 9);
    assert_eq!(body["live_updates"]["messages"].as_array().unwrap().len(), 3);
    assert_eq!(body["live_updates"]["experiences"].as_array().unwrap().len(), 3);

    let premium = body["premium_upcoming"].as_array().unwrap();
    assert_eq!(premium.len(), 3);
    assert_eq!(premium[0]["company"]["name"], "Microsoft");
    assert_eq!(premium[0]["required_skills"], json!(["DSA", "System Design", "Azure"]));

    let (_, inbox) = send(&app, "GET", "/api/messages/", Some(token), None).await;
    assert_eq!(inbox.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn statistics_over_seeded_fixtures() {
    let (app, state) = app();
    seed::load(&state.db).unwrap();
    let token = register(&app, "viewer", json!(1)).await;

    let (status, body) = send(&app, "GET", "/api/statistics/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["package_distribution"],
        json!({"0-3": 0, "3-6": 1, "6-9": 1, "9-12": 0, "12+": 1})
    );

    let top = body["top_companies"].as_array().unwrap();
    assert_eq!(top.len(), 9);
    assert_eq!(top[0]["name"], "Amazon");
    assert_eq!(top[0]["hired"], 1);
    assert_eq!(top[1]["name"], "Microsoft");
    assert_eq!(top[1]["hired"], 0);

    let (_, placements) = send(&app, "GET", "/api/placements/", Some(&token), None).await;
    assert_eq!(placements.as_array().unwrap().len(), 3);

    let (_, experiences) = send(&app, "GET", "/api/experiences/", Some(&token), None).await;
    let experiences = experiences.as_array().unwrap();
    assert_eq!(experiences.len(), 3);
    assert!(experiences[0]["company"]["name"].is_string());
    assert!(experiences[0]["student"]["user"]["username"].is_string());
}

#[tokio::test]
async fn listings_and_dashboard_feeds_are_capped() {
    let (app, state) = app();
    seed::load(&state.db).unwrap();
    let token = register(&app, "viewer", json!(2)).await;

    let account = state.db.get_account_by_username("vikash").unwrap().unwrap();
    let student = state.db.get_student_by_account(&account.id).unwrap().unwrap();
    let company_id = state
        .db
        .insert_company(&NewCompany {
            name: "Flipkart",
            difficulty: "Medium",
            avg_package: 10.0,
        })
        .unwrap()
        .id;

    for i in 0..60 {
        let role = format!("p{}", i);
        state
            .db
            .insert_placement(&student.id, &company_id, &role, 10.0)
            .unwrap();
        let title = format!("e{}", i);
        state
            .db
            .insert_experience(&NewExperience {
                student_id: Some(&student.id),
                company_id: Some(&company_id),
                title: &title,
                difficulty: "Medium",
                package_lpa: 10.0,
                rating: 4.0,
                content: "",
            })
            .unwrap();
    }
    for _ in 0..4 {
        state
            .db
            .insert_premium_opportunity(&NewPremiumOpportunity {
                company_id: &company_id,
                title: "Premium",
                package_lpa: 30.0,
                date: "2999-12-31",
                difficulty: "Hard",
                required_skills: &["Rust"],
            })
            .unwrap();
    }

    let (_, placements) = send(&app, "GET", "/api/placements/", Some(&token), None).await;
    let placements = placements.as_array().unwrap();
    assert_eq!(placements.len(), 50);
    assert_eq!(placements[0]["role"], "p59");

    let (_, experiences) = send(&app, "GET", "/api/experiences/", Some(&token), None).await;
    let experiences = experiences.as_array().unwrap();
    assert_eq!(experiences.len(), 50);
    assert_eq!(experiences[0]["title"], "e59");

    let (_, dashboard) = send(&app, "GET", "/api/dashboard/", Some(&token), None).await;
    let feeds = &dashboard["live_updates"];
    assert_eq!(feeds["placements"].as_array().unwrap().len(), 5);
    assert_eq!(feeds["placements"][0]["role"], "p59");
    assert_eq!(feeds["experiences"].as_array().unwrap().len(), 5);
    assert_eq!(feeds["experiences"][0]["title"], "e59");

    let premium = dashboard["premium_upcoming"].as_array().unwrap();
    assert_eq!(premium.len(), 5);
    assert_eq!(premium[0]["company"]["name"], "Microsoft");
    assert_eq!(premium[4]["date"], "2999-12-31");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (app, _) = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/login/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
