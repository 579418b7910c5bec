use wiremock::matchers::{any, body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{TestApp, MESSAGES_PATH, VALID_CSV};

#[tokio::test]
async fn requesting_a_send_with_no_data_is_blocked() {
    let app = TestApp::spawn().await;

    let response = app.post_send_request().await;

    assert_eq!(response.status(), 409);
    let body = response.text().await.unwrap();
    assert!(body.contains("No data uploaded"), "body was: {body}");
}

#[tokio::test]
async fn the_confirmation_prompt_reports_the_row_count() {
    let app = TestApp::spawn().await;
    app.post_upload("contacts.csv", VALID_CSV).await;

    let response = app.post_send_request().await;

    assert!(response.status().is_success());
    let prompt: serde_json::Value = response.json().await.unwrap();
    assert_eq!(prompt["message"], "2 messages will be sent");
}

#[tokio::test]
async fn confirming_without_a_pending_request_is_rejected() {
    let app = TestApp::spawn().await;
    app.post_upload("contacts.csv", VALID_CSV).await;

    let response = app.post_send_confirm().await;

    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn a_cancelled_send_dispatches_nothing() {
    let app = TestApp::spawn().await;
    app.post_upload("contacts.csv", VALID_CSV).await;
    app.post_template(&[("message", "Hello")]).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.sms_server)
        .await;

    app.post_send_request().await;
    app.post_send_cancel().await;
    let response = app.post_send_confirm().await;

    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn a_confirmed_batch_sends_one_message_per_recipient() {
    let app = TestApp::spawn().await;
    app.post_upload("contacts.csv", VALID_CSV).await;
    app.post_template(&[("message", "Hi {{first_name}}")]).await;

    Mock::given(method("POST"))
        .and(path(MESSAGES_PATH))
        .and(body_string_contains("To=%2B12125550142"))
        .and(body_string_contains("Body=Hi+Ann"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.sms_server)
        .await;
    Mock::given(method("POST"))
        .and(path(MESSAGES_PATH))
        .and(body_string_contains("To=%2B12125550143"))
        .and(body_string_contains("Body=Hi+Bo"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.sms_server)
        .await;

    app.post_send_request().await;
    let response = app.post_send_confirm().await;

    assert!(response.status().is_success());
    let outcome: serde_json::Value = response.json().await.unwrap();
    assert_eq!(outcome["attempted"], 2);
    assert_eq!(outcome["sent"], 2);
    assert_eq!(outcome["skipped"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn a_fully_successful_batch_clears_the_table() {
    let app = TestApp::spawn().await;
    app.post_upload("contacts.csv", VALID_CSV).await;
    app.post_template(&[("message", "Hello")]).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&app.sms_server)
        .await;

    app.post_send_request().await;
    app.post_send_confirm().await;

    let table: serde_json::Value = app.get_recipients().await.json().await.unwrap();
    assert_eq!(table["rows"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn the_image_url_is_forwarded_with_every_message() {
    let app = TestApp::spawn().await;
    app.post_upload("contacts.csv", VALID_CSV).await;
    app.post_template(&[
        ("message", "Hello"),
        ("image_url", "https://example.com/cat.png"),
    ])
    .await;

    Mock::given(method("POST"))
        .and(path(MESSAGES_PATH))
        .and(body_string_contains("MediaUrl=https%3A%2F%2Fexample.com"))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&app.sms_server)
        .await;

    app.post_send_request().await;
    let response = app.post_send_confirm().await;

    assert!(response.status().is_success());
}

#[tokio::test]
async fn an_invalid_phone_number_is_skipped_and_reported() {
    let app = TestApp::spawn().await;
    let csv = "first_name,last_name,phone_number\n\
               Ann,Lee,123\n\
               Bo,Kim,2125550143\n";
    app.post_upload("contacts.csv", csv).await;
    app.post_template(&[("message", "Hello")]).await;

    Mock::given(method("POST"))
        .and(path(MESSAGES_PATH))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.sms_server)
        .await;

    app.post_send_request().await;
    let response = app.post_send_confirm().await;

    assert!(response.status().is_success());
    let outcome: serde_json::Value = response.json().await.unwrap();
    assert_eq!(outcome["attempted"], 2);
    assert_eq!(outcome["sent"], 1);
    let skipped = outcome["skipped"].as_array().unwrap();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0]["phone_number"], "123");
}

#[tokio::test]
async fn a_provider_failure_stops_the_batch_and_keeps_the_table() {
    let app = TestApp::spawn().await;
    let csv = "first_name,last_name,phone_number\n\
               Ann,Lee,2125550142\n\
               Bo,Kim,2125550143\n\
               Cy,Ng,2125550144\n";
    app.post_upload("contacts.csv", csv).await;
    app.post_template(&[("message", "Hello")]).await;

    // First provider call succeeds, the second fails; the third row must
    // never reach the provider
    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .up_to_n_times(1)
        .expect(1)
        .mount(&app.sms_server)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.sms_server)
        .await;

    app.post_send_request().await;
    let response = app.post_send_confirm().await;

    assert_eq!(response.status(), 502);
    let body = response.text().await.unwrap();
    assert!(body.contains("+12125550143"), "body was: {body}");

    let table: serde_json::Value = app.get_recipients().await.json().await.unwrap();
    assert_eq!(table["rows"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn after_a_failed_batch_the_send_can_be_requested_again() {
    let app = TestApp::spawn().await;
    app.post_upload("contacts.csv", VALID_CSV).await;
    app.post_template(&[("message", "Hello")]).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.sms_server)
        .await;

    app.post_send_request().await;
    assert_eq!(app.post_send_confirm().await.status(), 502);

    let response = app.post_send_request().await;
    assert!(response.status().is_success());
    let prompt: serde_json::Value = response.json().await.unwrap();
    assert_eq!(prompt["message"], "2 messages will be sent");
}
