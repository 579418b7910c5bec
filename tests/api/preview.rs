use crate::helpers::{TestApp, VALID_CSV};

#[tokio::test]
async fn the_preview_renders_against_the_first_table_row() {
    let app = TestApp::spawn().await;
    app.post_upload("contacts.csv", VALID_CSV).await;

    let response = app
        .post_template(&[("message", "Hi {{first_name}} {{last_name}}!")])
        .await;
    assert!(response.status().is_success());

    let preview: serde_json::Value = response.json().await.unwrap();
    assert_eq!(preview["first_name"], "Ann");
    assert_eq!(preview["last_name"], "Lee");
    assert_eq!(preview["phone_number"], "2125550142");
    assert_eq!(preview["body"], "Hi Ann Lee!");
}

#[tokio::test]
async fn without_recipients_the_preview_shows_the_raw_template() {
    let app = TestApp::spawn().await;

    let response = app.post_template(&[("message", "Hi {{first_name}}")]).await;

    let preview: serde_json::Value = response.json().await.unwrap();
    assert_eq!(preview["body"], "Hi {{first_name}}");
    assert_eq!(preview["first_name"], serde_json::Value::Null);
}

#[tokio::test]
async fn an_unknown_placeholder_falls_back_to_the_raw_template() {
    let app = TestApp::spawn().await;
    app.post_upload("contacts.csv", VALID_CSV).await;

    let response = app.post_template(&[("message", "Hi {{nickname}}")]).await;

    let preview: serde_json::Value = response.json().await.unwrap();
    assert_eq!(preview["body"], "Hi {{nickname}}");
}

#[tokio::test]
async fn an_image_url_alone_previews_an_empty_body() {
    let app = TestApp::spawn().await;
    app.post_upload("contacts.csv", VALID_CSV).await;

    let response = app
        .post_template(&[
            ("message", ""),
            ("image_url", "https://example.com/cat.png"),
        ])
        .await;

    let preview: serde_json::Value = response.json().await.unwrap();
    assert_eq!(preview["body"], "");
    assert_eq!(preview["image_url"], "https://example.com/cat.png");
}

#[tokio::test]
async fn an_invalid_image_url_is_a_400() {
    let app = TestApp::spawn().await;

    let response = app
        .post_template(&[("message", "hi"), ("image_url", "not a url")])
        .await;

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn the_preview_endpoint_does_not_mutate_the_session() {
    let app = TestApp::spawn().await;
    app.post_upload("contacts.csv", VALID_CSV).await;
    app.post_template(&[("message", "Hi {{first_name}}")]).await;

    let first: serde_json::Value = app.get_preview().await.json().await.unwrap();
    let second: serde_json::Value = app.get_preview().await.json().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first["body"], "Hi Ann");
}
