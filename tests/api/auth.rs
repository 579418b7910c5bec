use crate::helpers::{TestApp, VALID_CSV};

#[tokio::test]
async fn requests_without_credentials_are_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .api_client
        .post(format!("{}/recipients?filename=contacts.csv", &app.address))
        .body(VALID_CSV)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
    assert_eq!(
        response.headers()["WWW-Authenticate"],
        r#"Basic realm="send""#
    );
}

#[tokio::test]
async fn requests_with_a_wrong_password_are_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .api_client
        .get(format!("{}/recipients", &app.address))
        .basic_auth(&app.username, Some("definitely-not-it"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn requests_with_an_unknown_username_are_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .api_client
        .post(format!("{}/send/request", &app.address))
        .basic_auth("intruder", Some(&app.password))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}
