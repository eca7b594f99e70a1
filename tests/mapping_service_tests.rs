//! Mapping lifecycle tests
//!
//! Create / update / delete / list through MappingService on temporary SQLite databases.

use std::sync::Arc;

use chrono::NaiveDate;
use livelink::config::DatabaseConfig;
use livelink::errors::LivelinkError;
use livelink::services::{
    CreateMappingRequest, MappingService, RESERVED_PATHS, UpdateMappingRequest,
};
use livelink::storage::backend::SeaOrmStorage;
use tempfile::TempDir;

const QR: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

async fn create_service() -> (MappingService, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("service.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, &DatabaseConfig::default())
        .await
        .expect("Failed to create storage");

    (MappingService::new(Arc::new(storage)), temp_dir)
}

fn create_req(path: &str, target: &str) -> CreateMappingRequest {
    CreateMappingRequest {
        path: Some(path.to_string()),
        target: Some(target.to_string()),
        ..Default::default()
    }
}

fn wechat_req(path: &str) -> CreateMappingRequest {
    CreateMappingRequest {
        name: Some("Group".to_string()),
        is_wechat: Some(true),
        qr_code_data: Some(QR.to_string()),
        ..create_req(path, "https://example.com/group")
    }
}

// =============================================================================
// create
// =============================================================================

#[tokio::test]
async fn test_create_applies_defaults() {
    let (service, _dir) = create_service().await;

    let created = service
        .create(create_req("promo", "https://example.com/sale"))
        .await
        .unwrap();
    assert!(created.enabled);
    assert!(!created.is_wechat);
    assert!(created.expiry.is_none());

    let loaded = service.get("promo").await.unwrap().unwrap();
    assert_eq!(loaded.target, "https://example.com/sale");
}

#[tokio::test]
async fn test_create_reserved_paths_rejected() {
    let (service, _dir) = create_service().await;

    for reserved in RESERVED_PATHS {
        let err = service
            .create(create_req(reserved, "https://example.com"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, LivelinkError::ReservedPath(_)),
            "{} -> {:?}",
            reserved,
            err
        );
    }
}

#[tokio::test]
async fn test_create_duplicate_path() {
    let (service, _dir) = create_service().await;

    service
        .create(create_req("promo", "https://a.example.com"))
        .await
        .unwrap();
    let err = service
        .create(create_req("promo", "https://b.example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, LivelinkError::DuplicateKey(_)));

    let loaded = service.get("promo").await.unwrap().unwrap();
    assert_eq!(loaded.target, "https://a.example.com");
}

#[tokio::test]
async fn test_create_wechat_requires_qr_data() {
    let (service, _dir) = create_service().await;

    let req = CreateMappingRequest {
        is_wechat: Some(true),
        qr_code_data: Some(String::new()),
        ..create_req("grp", "https://example.com")
    };
    let err = service.create(req).await.unwrap_err();
    assert!(matches!(err, LivelinkError::MissingQrData(_)));
    assert!(service.get("grp").await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_invalid_expiry() {
    let (service, _dir) = create_service().await;

    let req = CreateMappingRequest {
        expiry: Some("next tuesday".to_string()),
        ..create_req("promo", "https://example.com")
    };
    assert!(matches!(
        service.create(req).await.unwrap_err(),
        LivelinkError::InvalidExpiry(_)
    ));

    let req = CreateMappingRequest {
        expiry: Some("2024-01-01".to_string()),
        ..create_req("promo", "https://example.com")
    };
    let created = service.create(req).await.unwrap();
    assert_eq!(created.expiry, NaiveDate::from_ymd_opt(2024, 1, 1));
}

// =============================================================================
// update
// =============================================================================

#[tokio::test]
async fn test_update_preserves_qr_data_when_omitted() {
    let (service, _dir) = create_service().await;
    service.create(wechat_req("grp")).await.unwrap();

    let updated = service
        .update(UpdateMappingRequest {
            original_path: Some("grp".to_string()),
            path: Some("grp".to_string()),
            target: Some("https://example.com/group".to_string()),
            name: Some("Group 2".to_string()),
            is_wechat: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(updated.name.as_deref(), Some("Group 2"));
    assert_eq!(updated.qr_code_data.as_deref(), Some(QR));
}

#[tokio::test]
async fn test_update_rename_keeps_qr_data() {
    let (service, _dir) = create_service().await;
    service.create(wechat_req("grp")).await.unwrap();

    let updated = service
        .update(UpdateMappingRequest {
            original_path: Some("grp".to_string()),
            path: Some("group".to_string()),
            target: Some("https://example.com/group".to_string()),
            is_wechat: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(updated.path, "group");
    assert_eq!(updated.qr_code_data.as_deref(), Some(QR));
    assert!(service.get("grp").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_wechat_without_any_qr_fails() {
    let (service, _dir) = create_service().await;
    service
        .create(create_req("plain", "https://example.com"))
        .await
        .unwrap();

    let err = service
        .update(UpdateMappingRequest {
            original_path: Some("plain".to_string()),
            path: Some("plain".to_string()),
            target: Some("https://example.com".to_string()),
            is_wechat: Some(true),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LivelinkError::MissingQrData(_)));

    let unchanged = service.get("plain").await.unwrap().unwrap();
    assert!(!unchanged.is_wechat);
}

#[tokio::test]
async fn test_update_missing_original_path() {
    let (service, _dir) = create_service().await;

    let err = service
        .update(UpdateMappingRequest {
            path: Some("x".to_string()),
            target: Some("https://example.com".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LivelinkError::InvalidInput(_)));

    let err = service
        .update(UpdateMappingRequest {
            original_path: Some("ghost".to_string()),
            path: Some("ghost".to_string()),
            target: Some("https://example.com".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LivelinkError::NotFound(_)));
}

#[tokio::test]
async fn test_update_to_reserved_path_rejected() {
    let (service, _dir) = create_service().await;
    service
        .create(create_req("promo", "https://example.com"))
        .await
        .unwrap();

    let err = service
        .update(UpdateMappingRequest {
            original_path: Some("promo".to_string()),
            path: Some("admin".to_string()),
            target: Some("https://example.com".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LivelinkError::ReservedPath(_)));
    assert!(service.get("promo").await.unwrap().is_some());
}

// =============================================================================
// delete / list
// =============================================================================

#[tokio::test]
async fn test_delete_is_idempotent() {
    let (service, _dir) = create_service().await;
    service
        .create(create_req("promo", "https://example.com"))
        .await
        .unwrap();

    service.delete("promo").await.unwrap();
    service.delete("promo").await.unwrap();
    assert!(service.get("promo").await.unwrap().is_none());

    assert!(matches!(
        service.delete("login").await.unwrap_err(),
        LivelinkError::ReservedPath(_)
    ));
    assert!(matches!(
        service.delete("").await.unwrap_err(),
        LivelinkError::InvalidInput(_)
    ));
}

#[tokio::test]
async fn test_list_pagination_totals() {
    let (service, _dir) = create_service().await;

    for i in 0..25 {
        service
            .create(create_req(&format!("p{:02}", i), "https://example.com"))
            .await
            .unwrap();
    }

    let page = service.list(1, 10).await.unwrap();
    assert_eq!(page.mappings.len(), 10);
    assert_eq!(page.total, 25);
    assert_eq!(page.total_pages, 3);

    let page = service.list(3, 10).await.unwrap();
    assert_eq!(page.mappings.len(), 5);
    assert_eq!(page.page, 3);

    let page = service.list(9, 10).await.unwrap();
    assert!(page.mappings.is_empty());
    assert_eq!(page.total, 25);
}

#[tokio::test]
async fn test_list_serializes_camel_case() {
    let (service, _dir) = create_service().await;
    service.create(wechat_req("grp")).await.unwrap();

    let page = service.list(1, 10).await.unwrap();
    let json = serde_json::to_value(&page).unwrap();
    assert_eq!(json["total"], 1);
    assert_eq!(json["pageSize"], 10);
    assert_eq!(json["totalPages"], 1);
    assert_eq!(json["mappings"][0]["isWechat"], true);
    assert_eq!(json["mappings"][0]["qrCodeData"], QR);
}
