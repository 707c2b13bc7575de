//! Tree listing tests.

use std::collections::HashSet;

use axum::http::StatusCode;

use super::test_utils::{api_path, get_json, uri_with, TestTree};

#[tokio::test]
async fn test_root_listing_returns_configured_folders() {
    let tree = TestTree::new();

    for uri in ["/api/tree", "/api/tree?path=", "/api/tree?path=.", "/api/tree?path=%2F"] {
        let (status, json) = get_json(tree.router(), uri).await;
        assert_eq!(status, StatusCode::OK, "uri: {}", uri);

        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["name"], "a");
        assert_eq!(entries[0]["type"], "folder");
        assert_eq!(entries[0]["path"], api_path(&tree.folder_a()));
        assert_eq!(entries[1]["name"], "b");
        assert_eq!(entries[1]["path"], api_path(&tree.folder_b()));
    }
}

#[tokio::test]
async fn test_directory_listing_entries() {
    let tree = TestTree::new();
    tree.write("a/readme.md", b"# hi");
    tree.write("a/docs/guide.txt", b"guide");

    let folder = api_path(&tree.folder_a());
    let (status, json) = get_json(tree.router(), &uri_with("/api/tree", "path", &folder)).await;
    assert_eq!(status, StatusCode::OK);

    let entries: HashSet<(String, String, String)> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["name"].as_str().unwrap().to_string(),
                e["type"].as_str().unwrap().to_string(),
                e["path"].as_str().unwrap().to_string(),
            )
        })
        .collect();

    let expected: HashSet<_> = [
        ("readme.md", "file"),
        ("docs", "folder"),
    ]
    .into_iter()
    .map(|(name, kind)| (name.to_string(), kind.to_string(), format!("{}/{}", folder, name)))
    .collect();
    assert_eq!(entries, expected);
}

#[tokio::test]
async fn test_listing_paths_can_be_followed() {
    let tree = TestTree::new();
    tree.write("a/docs/inner/deep.txt", b"deep");

    let (_, roots) = get_json(tree.router(), "/api/tree").await;
    let mut path = roots[0]["path"].as_str().unwrap().to_string();

    for expected in ["docs", "inner", "deep.txt"] {
        let (status, json) = get_json(tree.router(), &uri_with("/api/tree", "path", &path)).await;
        assert_eq!(status, StatusCode::OK);
        let entry = &json[0];
        assert_eq!(entry["name"], expected);
        path = entry["path"].as_str().unwrap().to_string();
    }
}

#[tokio::test]
async fn test_nonexistent_directory_is_bad_request() {
    let tree = TestTree::new();
    let missing = format!("{}/nonexistent", api_path(&tree.folder_a()));

    let (status, json) = get_json(tree.router(), &uri_with("/api/tree", "path", &missing)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "not_found");
    assert!(json["message"].as_str().unwrap().contains("nonexistent"));
}

#[tokio::test]
async fn test_listing_outside_roots_is_forbidden() {
    let tree = TestTree::new();
    tree.write("outside/secret.txt", b"secret");

    let (status, json) = get_json(
        tree.router(),
        &uri_with("/api/tree", "path", &api_path(&tree.outside())),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "forbidden");
}

#[tokio::test]
async fn test_listing_traversal_is_forbidden() {
    let tree = TestTree::new();
    let traversal = format!("{}/../outside", api_path(&tree.folder_a()));

    let (status, json) = get_json(tree.router(), &uri_with("/api/tree", "path", &traversal)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "forbidden");
}

#[tokio::test]
async fn test_listing_a_file_is_bad_request() {
    let tree = TestTree::new();
    let file = tree.write("a/x.txt", b"x");

    let (status, json) = get_json(tree.router(), &uri_with("/api/tree", "path", &file)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "not_a_directory");
}

#[tokio::test]
async fn test_unknown_absolute_path_is_bad_request() {
    let tree = TestTree::new();

    let (status, json) = get_json(tree.router(), "/api/tree?path=%2Fnonexistent").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn test_relisting_is_stable() {
    let tree = TestTree::new();
    for name in ["one.txt", "two.txt", "three.txt"] {
        tree.write(&format!("b/{}", name), name.as_bytes());
    }
    let uri = uri_with("/api/tree", "path", &api_path(&tree.folder_b()));

    let entry_set = |json: serde_json::Value| -> HashSet<String> {
        json.as_array()
            .unwrap()
            .iter()
            .map(|e| e.to_string())
            .collect()
    };
    let (_, first) = get_json(tree.router(), &uri).await;
    let (_, second) = get_json(tree.router(), &uri).await;

    let first = entry_set(first);
    assert_eq!(first.len(), 3);
    assert_eq!(first, entry_set(second));
}

#[tokio::test]
async fn test_file_used_as_directory_prefix_is_not_found() {
    let tree = TestTree::new();
    let file = tree.write("a/x.txt", b"x");

    let (status, json) = get_json(
        tree.router(),
        &uri_with("/api/tree", "path", &format!("{}/sub", file)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "not_found");
}
