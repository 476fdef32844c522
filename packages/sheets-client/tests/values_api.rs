//! End-to-end tests of auth + values calls against a local mock server.

use sheets_client::{ServiceAccountKey, SheetsClient, SheetsError, ValueInputOption};
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIXTURE: &str = include_str!("fixtures/service_account.json");

async fn client_for(server: &MockServer) -> SheetsClient {
    let mut key = ServiceAccountKey::from_json(FIXTURE).unwrap();
    key.token_uri = format!("{}/token", server.uri());
    SheetsClient::new(key).with_base_url(server.uri())
}

async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "ya29.test-token",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_get_values_reads_rows() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/spreadsheets/sheet-123/values/Sheet1"))
        .and(header("authorization", "Bearer ya29.test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "range": "Sheet1!A1:B3",
            "majorDimension": "ROWS",
            "values": [["Name", "City"], ["Alice", "Paris"], ["Bob"]]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let range = client.get_values("sheet-123", "Sheet1").await.unwrap();

    assert_eq!(range.values.len(), 3);
    assert_eq!(range.values[0], vec!["Name", "City"]);
    assert_eq!(range.values[2], vec!["Bob"]);
}

#[tokio::test]
async fn test_token_is_cached_between_calls() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/spreadsheets/sheet-123/values/Sheet1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "range": "Sheet1!A1:Z1000"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.authenticate().await.unwrap();
    let first = client.get_values("sheet-123", "Sheet1").await.unwrap();
    let second = client.get_values("sheet-123", "Sheet1").await.unwrap();

    assert!(first.values.is_empty());
    assert!(second.values.is_empty());
}

#[tokio::test]
async fn test_update_values_overwrites_with_raw_rows() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("PUT"))
        .and(path("/spreadsheets/sheet-123/values/Sheet1"))
        .and(query_param("valueInputOption", "RAW"))
        .and(body_json(serde_json::json!({
            "majorDimension": "ROWS",
            "values": [["entity", "extracted_info"], ["Alice", "alice@example.com"]]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "spreadsheetId": "sheet-123",
            "updatedRange": "Sheet1!A1:B2",
            "updatedRows": 2,
            "updatedColumns": 2,
            "updatedCells": 4
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let updated = client
        .update_values(
            "sheet-123",
            "Sheet1",
            vec![
                vec!["entity".into(), "extracted_info".into()],
                vec!["Alice".into(), "alice@example.com".into()],
            ],
            ValueInputOption::Raw,
        )
        .await
        .unwrap();

    assert_eq!(updated.updated_cells, Some(4));
}

#[tokio::test]
async fn test_rejected_assertion_is_token_exchange_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Invalid JWT Signature."
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.authenticate().await.unwrap_err();

    assert!(matches!(err, SheetsError::TokenExchange { status: 400, .. }));
}

#[tokio::test]
async fn test_permission_denied_is_api_error() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/spreadsheets/sheet-123/values/Sheet1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {"code": 403, "message": "The caller does not have permission", "status": "PERMISSION_DENIED"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.get_values("sheet-123", "Sheet1").await.unwrap_err();

    match err {
        SheetsError::Api { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "The caller does not have permission");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
