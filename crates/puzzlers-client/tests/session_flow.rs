#![allow(unused_crate_dependencies)]
#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::expect_used, reason = "integration test — panics are the assertion mechanism")]

use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use puzzlers_client::{
    ClientConfig, ClientError, FileTokenStore, NoopNavigator, PuzzlersClient, SessionManager,
    TokenStore,
};
use puzzlers_types::{Difficulty, NewPuzzle, PuzzleImage, RegisterRequest, UserRole};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn creator_token() -> String {
    let claims = json!({
        "nameid": "c-17",
        "unique_name": "riddler",
        "email": "riddler@ieee.org",
        "role": "PUZZLE_CREATOR"
    });
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).expect("claims encode"));
    format!("eyJhbGciOiJIUzI1NiJ9.{payload}.c2ln")
}

fn client_for(server: &MockServer) -> Arc<PuzzlersClient> {
    Arc::new(PuzzlersClient::new(ClientConfig::new(server.uri())).expect("client builds"))
}

#[tokio::test]
async fn test_login_persists_token_across_managers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Account/Login"))
        .and(body_json(json!({"Name": "riddler", "Password": "s3cret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": creator_token(),
            "expiration": "2030-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(FileTokenStore::in_dir(dir.path()));
    let client = client_for(&server);

    let session = SessionManager::new(client.clone(), Some(store.clone()), Arc::new(NoopNavigator));
    session.login("riddler", "s3cret").await.expect("login succeeds");
    assert!(session.can_create_puzzles());
    assert!(!session.is_admin());

    // A fresh manager restores the session from disk with no further login call.
    let restored = SessionManager::new(client, Some(store.clone()), Arc::new(NoopNavigator));
    assert!(restored.is_authenticated());
    assert_eq!(restored.user().expect("user").id, "c-17");
    assert_eq!(restored.roles(), vec![UserRole::PuzzleCreator]);

    restored.logout();
    assert_eq!(store.load().expect("store readable"), None);
}

#[tokio::test]
async fn test_login_rejection_text_becomes_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Account/Login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid username or password"))
        .mount(&server)
        .await;

    let session = SessionManager::new(client_for(&server), None, Arc::new(NoopNavigator));
    assert!(session.login("riddler", "nope").await.is_err());
    assert_eq!(session.error().as_deref(), Some("Invalid username or password"));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_puzzle_list_normalises_both_casings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Puzzels/GetAllPuzzles"))
        .and(header("authorization", "Bearer t0k"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Id": 1, "Name": "Sphinx", "Solution": "man", "DifficultyLevel": "Hard",
             "CreatorId": "c-17", "UserName": "riddler", "Image": "iVBORw0KGgo="},
            {"id": "2", "name": "Echo", "solution": "echo", "difficultyLevel": "legendary",
             "image": "data:image/jpeg;base64,/9j/"}
        ])))
        .mount(&server)
        .await;

    let puzzles = client_for(&server).get_all_puzzles(Some("t0k")).await.expect("list");
    assert_eq!(puzzles.len(), 2);
    assert_eq!(puzzles[0].id, "1");
    assert_eq!(puzzles[0].difficulty_level, Difficulty::Hard);
    assert_eq!(puzzles[0].creator_name.as_deref(), Some("riddler"));
    assert_eq!(puzzles[0].image.as_deref(), Some("data:image/png;base64,iVBORw0KGgo="));
    assert_eq!(puzzles[1].difficulty_level, Difficulty::Easy);
    assert_eq!(puzzles[1].image.as_deref(), Some("data:image/jpeg;base64,/9j/"));
}

#[tokio::test]
async fn test_string_list_body_is_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Puzzels/GetPuzzelsByCreatorId/c%2017"))
        .respond_with(ResponseTemplate::new(200).set_body_string("No puzzles found"))
        .expect(1)
        .mount(&server)
        .await;

    let puzzles =
        client_for(&server).get_puzzles_by_creator("c 17", None).await.expect("lenient list");
    assert!(puzzles.is_empty());
}

#[tokio::test]
async fn test_users_accept_pascal_case_roles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Account/GetAllUsers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "1", "userName": "admin", "Roles": ["Admin"]},
            {"id": "2", "userName": "riddler", "roles": ["PUZZLE_CREATOR", ""]}
        ])))
        .mount(&server)
        .await;

    let users = client_for(&server).get_all_users(Some("t")).await.expect("users");
    assert_eq!(users[0].roles, vec!["Admin".to_string()]);
    assert_eq!(users[1].roles, vec!["PUZZLE_CREATOR".to_string()]);
}

#[tokio::test]
async fn test_register_and_delete_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Account/Register"))
        .and(body_json(json!({"Name": "newbie", "Password": "pw", "Role": "PUZZLE_CREATOR"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("User created"))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/Account/DeleteUser/u%2F9"))
        .respond_with(ResponseTemplate::new(404).set_body_string("User not found"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = RegisterRequest {
        name: "newbie".into(),
        password: "pw".into(),
        role: UserRole::PuzzleCreator,
    };
    assert_eq!(client.register(&request, Some("t")).await.expect("register"), "User created");

    match client.delete_user("u/9", Some("t")).await {
        Err(ClientError::Rejected { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "User not found");
        },
        other => panic!("expected rejection, got {other:?}"),
    }
}

fn sphinx() -> NewPuzzle {
    NewPuzzle {
        name: " Sphinx ".into(),
        solution: "man".into(),
        difficulty: Difficulty::Medium,
        creator_id: "c-17".into(),
        image: Some(PuzzleImage {
            file_name: "sphinx.png".into(),
            mime_type: "image/png".into(),
            bytes: vec![0x89, b'P', b'N', b'G', 0, 1, 2, 3],
        }),
    }
}

#[tokio::test]
async fn test_create_puzzle_sends_multipart_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Puzzels/CreatePuzzle"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Puzzle created"))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server).create_puzzle(&sphinx(), Some("t")).await.expect("created");
    assert_eq!(reply, "Puzzle created");

    let received = server.received_requests().await.expect("recording enabled");
    let content_type = received[0].headers.get("content-type").expect("content-type");
    assert!(content_type.to_str().expect("ascii").starts_with("multipart/form-data; boundary="));
    let body = String::from_utf8_lossy(&received[0].body);
    for field in ["\"Name\"", "\"Solution\"", "\"DifficultyLevel\"", "\"CreatorId\"", "\"Image\""] {
        assert!(body.contains(field), "missing {field}");
    }
    assert!(body.contains("\r\n\r\nSphinx\r\n"), "name is trimmed");
    assert!(body.contains("\r\n\r\nmedium\r\n"));
    assert!(body.contains("filename=\"sphinx.png\""));
}

#[tokio::test]
async fn test_duplicate_create_is_rejected_while_in_flight() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Puzzels/CreatePuzzle"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("Puzzle created")
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first_puzzle = sphinx();
    let (first, second) = tokio::join!(client.create_puzzle(&first_puzzle, Some("t")), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        client.create_puzzle(&sphinx(), Some("t")).await
    });

    assert!(first.is_ok());
    assert!(matches!(second, Err(ClientError::InFlight(_))));
}

#[tokio::test]
async fn test_blank_puzzle_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let blank = NewPuzzle { solution: "   ".into(), ..sphinx() };
    assert!(matches!(
        client_for(&server).create_puzzle(&blank, Some("t")).await,
        Err(ClientError::Validation(_))
    ));
}
