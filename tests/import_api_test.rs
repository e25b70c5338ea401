// ==========================================
// ImportApi 集成测试
// ==========================================
// 测试目标: 上传 → 报告 / HTTP 状态映射 / 按配置装配存储
// ==========================================

mod test_helpers;

use crm_import::config::{config_keys, ConfigManager};
use crm_import::{EntityKind, ImportApi, ImportSettings, SqliteEntityStore, UploadedFile};
use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;
use test_helpers::{create_test_db, insert_test_config, write_temp_file, ScriptedStore, StoreOutcome};

fn api_with(store: Arc<ScriptedStore>) -> ImportApi {
    ImportApi::new(store, ImportSettings::default())
}

#[tokio::test]
async fn test_contacts_upload_returns_report() {
    let store = Arc::new(ScriptedStore::new(vec![
        StoreOutcome::Created,
        StoreOutcome::Fail("Duplicate email".to_string()),
    ]));
    let api = api_with(store.clone());
    let upload = UploadedFile::new(
        "contacts.csv",
        "First Name,Last Name,E-mail\nAda,Lovelace,ADA@example.com\nAda,King,ada@example.com\n,,\n",
    );

    let response = api.import_contacts(Some(upload)).await.unwrap();

    assert_eq!(response.total, 2);
    assert_eq!(response.successful, 1);
    assert_eq!(response.failed, 1);
    assert_eq!(response.errors, vec!["Row 3: Duplicate email".to_string()]);
    assert_eq!(store.received().len(), 2);
}

#[tokio::test]
async fn test_report_json_shape() {
    let api = api_with(Arc::new(ScriptedStore::default()));
    let upload = UploadedFile::new("leads.csv", "Company Name\nInitech\n");

    let response = api.handle_upload(EntityKind::LeadCompany, Some(upload)).await;

    assert_eq!(response.status, 200);
    assert_eq!(
        response.body,
        json!({ "total": 1, "successful": 1, "failed": 0, "errors": [] })
    );
}

#[tokio::test]
async fn test_every_row_failing_still_returns_200() {
    let store = Arc::new(ScriptedStore::new(vec![
        StoreOutcome::NoIdentifier,
        StoreOutcome::NoIdentifier,
    ]));
    let api = api_with(store);
    let upload = UploadedFile::new("leads.csv", "Email\na@x.com\nb@y.com\n");

    let response = api.handle_upload(EntityKind::LeadCompany, Some(upload)).await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body["successful"], 0);
    assert_eq!(response.body["failed"], 2);
    assert_eq!(response.body["errors"][0], "Row 2: Failed to create lead company");
}

#[tokio::test]
async fn test_unsupported_and_corrupt_files_are_400() {
    let api = api_with(Arc::new(ScriptedStore::default()));

    let response = api
        .handle_upload(EntityKind::Contact, Some(UploadedFile::new("contacts.pdf", "%PDF")))
        .await;
    assert_eq!(response.status, 400);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("Unsupported file format: .pdf"));

    let response = api
        .handle_upload(EntityKind::Contact, Some(UploadedFile::new("contacts.xlsx", "garbage")))
        .await;
    assert_eq!(response.status, 400);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to decode workbook"));
}

#[tokio::test]
async fn test_from_config_uses_sqlite_store_by_default() {
    let (_db_file, db_path) = create_test_db().expect("Failed to create test db");
    let config = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    let store = Arc::new(SqliteEntityStore::new(&db_path).expect("Failed to open store"));

    let api = ImportApi::from_config(&config, store.clone()).await.unwrap();
    let upload_file = write_temp_file(".csv", "name,email\nAda Lovelace,ada@example.com\n")
        .expect("Failed to write upload");
    let upload = UploadedFile::from_path(upload_file.path()).unwrap();

    let response = api.import(EntityKind::Contact, Some(upload)).await.unwrap();

    assert_eq!(response.successful, 1);
    let stored = store.list_payloads(EntityKind::Contact).unwrap();
    assert_eq!(stored[0]["firstName"], "Ada");
    assert_eq!(stored[0]["lastName"], "Lovelace");
}

#[tokio::test]
async fn test_from_config_routes_to_content_api() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/lead-companies")
                .header("authorization", "Bearer token-123");
            then.status(200).json_body(json!({ "data": { "id": 99 } }));
        })
        .await;

    let (_db_file, db_path) = create_test_db().expect("Failed to create test db");
    insert_test_config(&db_path, config_keys::CONTENT_API_BASE_URL, &server.base_url()).unwrap();
    insert_test_config(&db_path, config_keys::CONTENT_API_TOKEN, "token-123").unwrap();

    let config = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    let local_store = Arc::new(SqliteEntityStore::new(&db_path).expect("Failed to open store"));
    let api = ImportApi::from_config(&config, local_store.clone()).await.unwrap();

    let upload = UploadedFile::new("leads.csv", "Company Name,Website\nAcme,acme.io\nGlobex,globex.com\n");
    let response = api.import_leads(Some(upload)).await.unwrap();

    api_mock.assert_hits_async(2).await;
    assert_eq!(response.successful, 2);
    assert_eq!(local_store.count(EntityKind::LeadCompany).unwrap(), 0);
}

#[tokio::test]
async fn test_configured_size_limit_applies() {
    let (_db_file, db_path) = create_test_db().expect("Failed to create test db");
    insert_test_config(&db_path, config_keys::MAX_FILE_BYTES, "16").unwrap();

    let config = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    let api = ImportApi::from_config(&config, Arc::new(ScriptedStore::default()))
        .await
        .unwrap();

    let upload = UploadedFile::new("contacts.csv", "email\nsomeone@example.com\n");
    let err = api.import_contacts(Some(upload)).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert!(err.to_string().contains("16 bytes"));
}
