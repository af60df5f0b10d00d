use crate::helpers::{spawn_app, spawn_app_with_mail};
use chrono::Utc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn valid_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Jo",
        "email": "jo@x.com",
        "message": "Hello there!"
    })
}

#[tokio::test]
async fn a_valid_submission_without_mail_lands_in_the_local_log() {
    let app = spawn_app().await;
    let started_at = Utc::now();

    let response = app.post_contact(&valid_body()).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "ok": true }));

    let messages = app.stored_messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].name, "Jo");
    assert_eq!(messages[0].email, "jo@x.com");
    assert_eq!(messages[0].message, "Hello there!");
    assert!(messages[0].at >= started_at);
    assert!(messages[0].at <= Utc::now());
}

#[tokio::test]
async fn an_invalid_submission_is_rejected_with_one_error_per_field() {
    let app = spawn_app().await;

    let response = app
        .post_contact(&serde_json::json!({
            "name": "J",
            "email": "bad",
            "message": "short"
        }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Datos inválidos");
    let details = body["details"].as_array().unwrap();
    let fields: Vec<_> = details.iter().map(|d| d["field"].as_str().unwrap()).collect();
    assert_eq!(fields, vec!["name", "email", "message"]);

    assert!(app.stored_messages().is_empty());
}

#[tokio::test]
async fn missing_fields_are_reported_like_invalid_ones() {
    let app = spawn_app().await;

    let response = app.post_contact(&serde_json::json!({})).await;

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["details"].as_array().unwrap().len(), 3);
    assert!(app.stored_messages().is_empty());
}

#[tokio::test]
async fn a_rejected_submission_is_not_dispatched_either() {
    let app = spawn_app_with_mail().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app
        .post_contact(&serde_json::json!({
            "name": "J",
            "email": "bad",
            "message": "short"
        }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert!(app.stored_messages().is_empty());
}

#[tokio::test]
async fn successive_submissions_append_in_order() {
    let app = spawn_app().await;

    app.post_contact(&valid_body()).await;
    let after_first = app.stored_messages();
    assert_eq!(after_first.len(), 1);

    let second = serde_json::json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "message": "A second, longer message."
    });
    let response = app.post_contact(&second).await;
    assert_eq!(response.status().as_u16(), 200);

    let messages = app.stored_messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], after_first[0]);
    assert_eq!(messages[1].name, "Ada Lovelace");
}

#[tokio::test]
async fn a_dispatched_submission_is_not_logged() {
    let app = spawn_app_with_mail().await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_contact(&valid_body()).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "ok": true }));
    assert!(app.stored_messages().is_empty());
}

#[tokio::test]
async fn the_contact_mail_carries_the_submission() {
    let app = spawn_app_with_mail().await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    app.post_contact(&valid_body()).await;

    let request = &app.email_server.received_requests().await.unwrap()[0];
    let mail: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(mail["Subject"], "Nuevo contacto: Jo <jo@x.com>");
    assert!(mail["TextBody"].as_str().unwrap().contains("Hello there!"));
    assert_eq!(mail["To"], "contacto@example.com");
}

#[tokio::test]
async fn a_failed_dispatch_falls_back_to_the_local_log() {
    let app = spawn_app_with_mail().await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_contact(&valid_body()).await;

    // Same acknowledgement as the delivered case.
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "ok": true }));

    let messages = app.stored_messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].email, "jo@x.com");
}
