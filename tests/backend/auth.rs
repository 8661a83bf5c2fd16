use httputil::{configuration::Config, users::WhoAmI, utils::random_string, xsrf::XsrfGuard};
use reqwest::StatusCode;

use crate::helpers::{TestApp, set_cookies};

#[tokio::test]
async fn echo_for_unlogged_user_test() {
    // Arrange
    let app = TestApp::spawn(None).await;
    // Do not log

    // Act and Assert : post to a protected route (must fail)
    let response = app
        .client
        .post(app.url("/api/echo"))
        .body("hello")
        .send()
        .await
        .expect("failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.text().await.unwrap(), "no user found");
}

#[tokio::test]
async fn login_sets_cookies_test() {
    let app = TestApp::spawn(None).await;

    let response = app
        .client
        .post(app.url("/auth/login"))
        .body(r#"{"login":"  admin "}"#)
        .header("Content-Type", "application/json")
        .send()
        .await
        .expect("failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    let login_cookie = cookies
        .iter()
        .find(|c| c.starts_with("HTTPUTIL_LOGIN="))
        .expect("login cookie not set");
    // The login is encrypted
    assert!(!login_cookie.starts_with("HTTPUTIL_LOGIN=admin"));
    assert!(login_cookie.contains("HttpOnly"));
    assert!(login_cookie.contains("Path=/"));
    assert!(!login_cookie.contains("Secure"));
    let xsrf_cookie = cookies
        .iter()
        .find(|c| c.starts_with("XSRF-TOKEN="))
        .expect("xsrf cookie not set");
    assert!(!xsrf_cookie.contains("HttpOnly"));

    let body = response
        .json::<httputil::users::LoginResponse>()
        .await
        .unwrap();
    assert_eq!(body.login, "admin");
    assert!(xsrf_cookie.starts_with(&format!("XSRF-TOKEN={}", body.xsrf_token)));
}

#[tokio::test]
async fn login_behind_tls_proxy_test() {
    let app = TestApp::spawn(None).await;

    let response = app
        .client
        .post(app.url("/auth/login"))
        .body(r#"{"login":"admin"}"#)
        .header("Content-Type", "application/json")
        .header("X-Forwarded-Proto", "https")
        .send()
        .await
        .expect("failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    for cookie in set_cookies(&response) {
        assert!(cookie.contains("Secure"), "{cookie}");
    }
}

#[tokio::test]
async fn forged_login_cookie_test() {
    // Arrange
    let xsrf_key = random_string(64);
    let config = Config {
        xsrf_key: Some(xsrf_key.clone()),
        ..Default::default()
    };
    let app = TestApp::spawn(Some(config)).await;
    // A token that would be valid for admin
    let xsrf_token = XsrfGuard::new().generate(&xsrf_key, "admin");

    // Act and Assert : a login cookie not issued by the server is not trusted
    let response = app
        .client
        .post(app.url("/api/echo"))
        .header("Cookie", "HTTPUTIL_LOGIN=admin")
        .header("X-XSRF-TOKEN", &xsrf_token)
        .body("hello")
        .send()
        .await
        .expect("failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let whoami = app
        .client
        .get(app.url("/api/whoami"))
        .header("Cookie", "HTTPUTIL_LOGIN=admin")
        .send()
        .await
        .expect("failed to execute request")
        .json::<WhoAmI>()
        .await
        .unwrap();
    assert_eq!(whoami.login, "");
}

#[tokio::test]
async fn empty_login_test() {
    let app = TestApp::spawn(None).await;

    let response = app
        .client
        .post(app.url("/auth/login"))
        .body(r#"{"login":"   "}"#)
        .header("Content-Type", "application/json")
        .send()
        .await
        .expect("failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.unwrap(), "login is required");
}

#[tokio::test]
async fn echo_with_xsrf_token_test() {
    // Arrange
    let app = TestApp::spawn(None).await;
    let xsrf_token = app.login("user").await;

    // Post without XSRF token
    let response = app
        .client
        .post(app.url("/api/echo"))
        .body("hello")
        .send()
        .await
        .expect("failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(response.text().await.unwrap(), "xsrf token doesn't match");

    // Post with a wrong XSRF token
    let response = app
        .client
        .post(app.url("/api/echo"))
        .header("X-XSRF-TOKEN", "randomtoken")
        .body("hello")
        .send()
        .await
        .expect("failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Post with the right XSRF token
    let response = app
        .client
        .post(app.url("/api/echo"))
        .header("X-XSRF-TOKEN", &xsrf_token)
        .body("hello")
        .send()
        .await
        .expect("failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "hello");
}

#[tokio::test]
async fn token_of_another_user_test() {
    let app = TestApp::spawn(None).await;
    let admin_token = app.login("admin").await;
    // The login cookie is replaced, the token is not
    app.login("user").await;

    let response = app
        .client
        .post(app.url("/api/echo"))
        .header("X-XSRF-TOKEN", &admin_token)
        .body("hello")
        .send()
        .await
        .expect("failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn token_from_another_server_test() {
    let app = TestApp::spawn(None).await;
    let other_app = TestApp::spawn(None).await;
    let foreign_token = other_app.login("admin").await;
    app.login("admin").await;

    let response = app
        .client
        .post(app.url("/api/echo"))
        .header("X-XSRF-TOKEN", &foreign_token)
        .body("hello")
        .send()
        .await
        .expect("failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn logout_test() {
    let app = TestApp::spawn(None).await;
    let xsrf_token = app.login("admin").await;

    let response = app
        .client
        .get(app.url("/auth/logout"))
        .send()
        .await
        .expect("failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 2);
    for cookie in &cookies {
        assert!(cookie.contains("=deleted"), "{cookie}");
        assert!(cookie.contains("Max-Age=-1"), "{cookie}");
    }

    // The user is forgotten
    let whoami = app
        .client
        .get(app.url("/api/whoami"))
        .send()
        .await
        .expect("failed to execute request")
        .json::<WhoAmI>()
        .await
        .unwrap();
    assert_eq!(whoami.login, "");

    // The token alone is not enough
    let response = app
        .client
        .post(app.url("/api/echo"))
        .header("X-XSRF-TOKEN", &xsrf_token)
        .body("hello")
        .send()
        .await
        .expect("failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn no_safe_methods_test() {
    let config = Config {
        safe_methods: Vec::new(),
        ..Default::default()
    };
    let app = TestApp::spawn(Some(config)).await;

    // Even GET requests need a token
    let response = app
        .client
        .get(app.url("/api/whoami"))
        .send()
        .await
        .expect("failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let xsrf_token = app.login("admin").await;
    let response = app
        .client
        .get(app.url("/api/whoami"))
        .send()
        .await
        .expect("failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .client
        .get(app.url("/api/whoami"))
        .header("X-XSRF-TOKEN", &xsrf_token)
        .send()
        .await
        .expect("failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
}
