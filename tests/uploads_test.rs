mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::TestApp;

const BOUNDARY: &str = "----cms-test-boundary";

fn multipart_request(field: &str, filename: &str, contents: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/uploads")
        .header(header::HOST, "cms.test:3000")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_upload_stores_file_and_returns_url() {
    let app = TestApp::new();

    let (status, body) = app
        .send(multipart_request("file", "Cover.PNG", b"fake image bytes"))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("http://cms.test:3000/uploads/"), "{}", url);
    assert!(url.ends_with(".png"));

    let name = url.rsplit('/').next().unwrap();
    let stored = std::fs::read(app.upload_dir.path().join(name)).unwrap();
    assert_eq!(stored, b"fake image bytes");
}

#[tokio::test]
async fn test_uploaded_file_is_served() {
    let app = TestApp::new();
    let (_, body) = app
        .send(multipart_request("file", "note.txt", b"hello"))
        .await;
    let url = body["url"].as_str().unwrap();
    let path = url.trim_start_matches("http://cms.test:3000");

    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"hello");
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let app = TestApp::new();

    let (status, body) = app
        .send(multipart_request("attachment", "cover.png", b"bytes"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("No file received"));
}

#[tokio::test]
async fn test_upload_requires_multipart_body() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/uploads")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}
