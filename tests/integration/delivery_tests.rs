//! Raw and attachment delivery tests.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use super::test_utils::{api_path, body_bytes, body_json, get, uri_with, TestTree};

#[tokio::test]
async fn test_download_pdf_as_attachment() {
    let tree = TestTree::new();
    let data = b"%PDF-1.4 fake report";
    let path = tree.write("a/report.pdf", data);

    let response = get(tree.router(), &uri_with("/api/download", "path", &path)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=report.pdf"
    );
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_LENGTH],
        data.len().to_string().as_str()
    );
    assert_eq!(&body_bytes(response).await[..], data);
}

#[tokio::test]
async fn test_download_unknown_extension_is_octet_stream() {
    let tree = TestTree::new();
    let path = tree.write("a/blob.qqq", b"\x00\x01");

    let response = get(tree.router(), &uri_with("/api/download", "path", &path)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/octet-stream"
    );
}

#[tokio::test]
async fn test_download_non_token_name_uses_extended_parameter() {
    let tree = TestTree::new();
    let path = tree.write("a/my report.txt", b"x");

    let response = get(tree.router(), &uri_with("/api/download", "path", &path)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"my report.txt\"; filename*=UTF-8''my%20report.txt"
    );
}

#[tokio::test]
async fn test_raw_returns_bytes_inline() {
    let tree = TestTree::new();
    let path = tree.write("b/page.html", b"<p>hi</p>");

    let response = get(tree.router(), &uri_with("/api/raw", "path", &path)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::CONTENT_DISPOSITION).is_none());
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert_eq!(&body_bytes(response).await[..], b"<p>hi</p>");
}

#[tokio::test]
async fn test_raw_honors_range() {
    let tree = TestTree::new();
    let path = tree.write("a/digits.txt", b"0123456789");

    let request = Request::builder()
        .uri(uri_with("/api/raw", "path", &path))
        .header(header::RANGE, "bytes=2-5")
        .body(Body::empty())
        .unwrap();
    let response = tree.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(&body_bytes(response).await[..], b"2345");
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let tree = TestTree::new();
    let missing = format!("{}/gone.txt", api_path(&tree.folder_a()));

    for endpoint in ["/api/raw", "/api/download"] {
        let response = get(tree.router(), &uri_with(endpoint, "path", &missing)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", endpoint);
        let json = body_json(response).await;
        assert_eq!(json["error"], "not_found");
    }
}

#[tokio::test]
async fn test_file_used_as_directory_prefix_is_not_found() {
    let tree = TestTree::new();
    let file = tree.write("a/x.txt", b"x");
    let below_file = format!("{}/sub", file);

    for endpoint in ["/api/raw", "/api/download"] {
        let response = get(tree.router(), &uri_with(endpoint, "path", &below_file)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", endpoint);
        let json = body_json(response).await;
        assert_eq!(json["error"], "not_found");
    }
}

#[tokio::test]
async fn test_directory_is_not_found() {
    let tree = TestTree::new();
    let folder = api_path(&tree.folder_a());

    let response = get(tree.router(), &uri_with("/api/download", "path", &folder)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "not_a_file");
}

#[tokio::test]
async fn test_missing_path_parameter_is_bad_request() {
    let tree = TestTree::new();

    for uri in ["/api/raw", "/api/download?path="] {
        let response = get(tree.router(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let json = body_json(response).await;
        assert_eq!(json["error"], "invalid_input");
    }
}

#[tokio::test]
async fn test_delivery_outside_roots_is_forbidden() {
    let tree = TestTree::new();
    let secret = tree.write("outside/secret.txt", b"secret");
    let traversal = format!("{}/../outside/secret.txt", api_path(&tree.folder_a()));

    for path in [secret, traversal] {
        let response = get(tree.router(), &uri_with("/api/download", "path", &path)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn test_health() {
    let tree = TestTree::new();

    let response = get(tree.router(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
}
