//! File view tests.

use axum::http::StatusCode;

use treeserve::view::{MAX_TEXT_READ, MAX_VIEW_SIZE, OVERSIZE_MESSAGE, TRUNCATION_NOTICE};

use super::test_utils::{api_path, get_json, uri_with, TestTree};

#[tokio::test]
async fn test_markdown_view() {
    let tree = TestTree::new();
    let content = "x".repeat(199) + "\n";
    let path = tree.write("a/readme.md", content.as_bytes());

    let (status, json) = get_json(tree.router(), &uri_with("/api/file", "path", &path)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["type"], "markdown");
    assert_eq!(json["content"], content);
}

#[tokio::test]
async fn test_text_view_with_language() {
    let tree = TestTree::new();
    let path = tree.write("a/main.go", b"package main\n");

    let (status, json) = get_json(tree.router(), &uri_with("/api/file", "path", &path)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["type"], "text");
    assert_eq!(json["language"], "go");
    assert_eq!(json["content"], "package main\n");
}

#[tokio::test]
async fn test_text_truncation_boundary() {
    let tree = TestTree::new();
    let exact = tree.write("a/exact.log", &vec![b'a'; MAX_TEXT_READ as usize]);
    let over = tree.write("a/over.log", &vec![b'a'; MAX_TEXT_READ as usize + 1]);

    let (_, json) = get_json(tree.router(), &uri_with("/api/file", "path", &exact)).await;
    let content = json["content"].as_str().unwrap();
    assert_eq!(content.len(), MAX_TEXT_READ as usize);
    assert!(!content.contains("truncated"));

    let (_, json) = get_json(tree.router(), &uri_with("/api/file", "path", &over)).await;
    let content = json["content"].as_str().unwrap();
    assert!(content.ends_with(TRUNCATION_NOTICE));
    assert_eq!(content.len() - TRUNCATION_NOTICE.len(), MAX_TEXT_READ as usize);
}

#[tokio::test]
async fn test_oversize_is_ok_with_error_payload() {
    let tree = TestTree::new();
    let path = tree.folder_a().join("huge.txt");
    std::fs::File::create(&path)
        .unwrap()
        .set_len(MAX_VIEW_SIZE + 1)
        .unwrap();

    let (status, json) =
        get_json(tree.router(), &uri_with("/api/file", "path", &api_path(&path))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["type"], "error");
    assert_eq!(json["content"], OVERSIZE_MESSAGE);
}

#[tokio::test]
async fn test_leading_nul_is_binary_regardless_of_extension() {
    let tree = TestTree::new();
    let path = tree.write("a/looks_like.txt", b"\x00hello");

    let (_, json) = get_json(tree.router(), &uri_with("/api/file", "path", &path)).await;
    assert_eq!(json["type"], "binary");
    assert_eq!(json["content"], "[Binary file will not be displayed]");
}

#[tokio::test]
async fn test_printable_unknown_extension_is_text() {
    let tree = TestTree::new();
    let path = tree.write("a/data.qqq", b"plain words\twith tab\r\n");

    let (_, json) = get_json(tree.router(), &uri_with("/api/file", "path", &path)).await;
    assert_eq!(json["type"], "text");
    assert_eq!(json["language"], "");
}

#[tokio::test]
async fn test_image_view_is_data_uri() {
    let tree = TestTree::new();
    let path = tree.write("a/pic.gif", b"GIF89a\x01\x00\x01\x00\x00\x00\x00");

    let (_, json) = get_json(tree.router(), &uri_with("/api/file", "path", &path)).await;
    assert_eq!(json["type"], "image");
    assert_eq!(json["mime"], "image/gif");
    assert!(json["content"]
        .as_str()
        .unwrap()
        .starts_with("data:image/gif;base64,R0lGODlh"));
}

#[tokio::test]
async fn test_pdf_view_links_raw_endpoint() {
    let tree = TestTree::new();
    let path = tree.write("a/report.pdf", b"%PDF-1.7\n\x00\x01");

    let (_, json) = get_json(tree.router(), &uri_with("/api/file", "path", &path)).await;
    assert_eq!(json["type"], "pdf");

    // The link must itself be fetchable
    let link = json["content"].as_str().unwrap().to_string();
    assert!(link.starts_with("/api/raw?path="));
    let response = super::test_utils::get(tree.router(), &link).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_path_parameter() {
    let tree = TestTree::new();

    let (status, json) = get_json(tree.router(), "/api/file").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_input");
    assert!(json["message"].as_str().unwrap().contains("path"));
}

#[tokio::test]
async fn test_missing_file_is_bad_request() {
    let tree = TestTree::new();
    let missing = format!("{}/nope.txt", api_path(&tree.folder_a()));

    let (status, json) = get_json(tree.router(), &uri_with("/api/file", "path", &missing)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn test_view_outside_roots_is_forbidden() {
    let tree = TestTree::new();
    let secret = tree.write("outside/secret.txt", b"secret");

    let (status, json) = get_json(tree.router(), &uri_with("/api/file", "path", &secret)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "forbidden");
}
