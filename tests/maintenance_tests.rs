//! Resolution and expiry maintenance tests

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use livelink::config::{DatabaseConfig, MaintenanceConfig};
use livelink::errors::LivelinkError;
use livelink::services::{
    CreateMappingRequest, ExpiryClassifier, ExpiryClock, ExpirySweeper, MaintenanceTask,
    MappingService, Resolution, Resolver, UpdateMappingRequest,
};
use livelink::storage::backend::SeaOrmStorage;
use sea_orm::ConnectionTrait;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

async fn create_temp_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("maintenance.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, &DatabaseConfig::default())
        .await
        .expect("Failed to create storage");
    (Arc::new(storage), temp_dir)
}

async fn seed(service: &MappingService, path: &str, expiry: Option<&str>) {
    service
        .create(CreateMappingRequest {
            path: Some(path.to_string()),
            target: Some(format!("https://example.com/{}", path)),
            expiry: expiry.map(str::to_string),
            ..Default::default()
        })
        .await
        .unwrap();
}

// =============================================================================
// Resolution
// =============================================================================

#[tokio::test]
async fn test_expired_promo_resolves_to_expired() {
    let (storage, _dir) = create_temp_storage().await;
    let service = MappingService::new(storage.clone());
    let resolver = Resolver::new(storage, ExpiryClock::utc());

    service
        .create(CreateMappingRequest {
            path: Some("promo".to_string()),
            target: Some("https://example.com/sale".to_string()),
            name: Some("Sale".to_string()),
            expiry: Some("2024-01-01".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let resolution = resolver.resolve_path_on("promo", date(2024, 1, 5)).await.unwrap();
    assert_eq!(
        resolution,
        Resolution::Expired {
            name: Some("Sale".to_string()),
            expiry: date(2024, 1, 1),
        }
    );
}

#[tokio::test]
async fn test_slash_dated_row_resolves_to_expired() {
    let (storage, _dir) = create_temp_storage().await;
    storage
        .get_db()
        .execute_unprepared(
            "INSERT INTO mappings (path, target, name, expiry, enabled) \
             VALUES ('old', 'https://example.com/old', 'Old', '2024/01/01', 1)",
        )
        .await
        .unwrap();

    let resolver = Resolver::new(storage, ExpiryClock::utc());
    assert_eq!(
        resolver.resolve_path_on("old", date(2024, 1, 5)).await.unwrap(),
        Resolution::Expired {
            name: Some("Old".to_string()),
            expiry: date(2024, 1, 1),
        }
    );
}

#[tokio::test]
async fn test_expiry_day_boundaries() {
    let (storage, _dir) = create_temp_storage().await;
    let service = MappingService::new(storage.clone());
    let resolver = Resolver::new(storage, ExpiryClock::utc());

    seed(&service, "today", Some("2024-03-10")).await;
    seed(&service, "yesterday", Some("2024-03-09")).await;

    let today = date(2024, 3, 10);
    assert_eq!(
        resolver.resolve_path_on("today", today).await.unwrap(),
        Resolution::Redirect {
            target: "https://example.com/today".to_string()
        }
    );
    assert!(matches!(
        resolver.resolve_path_on("yesterday", today).await.unwrap(),
        Resolution::Expired { .. }
    ));
}

#[tokio::test]
async fn test_disabled_and_absent_resolve_identically() {
    let (storage, _dir) = create_temp_storage().await;
    let service = MappingService::new(storage.clone());
    let resolver = Resolver::new(storage, ExpiryClock::utc());

    service
        .create(CreateMappingRequest {
            path: Some("off".to_string()),
            target: Some("https://example.com".to_string()),
            enabled: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();

    let today = date(2024, 1, 1);
    let disabled = resolver.resolve_path_on("off", today).await.unwrap();
    let absent = resolver.resolve_path_on("nothing", today).await.unwrap();
    assert_eq!(disabled, Resolution::NotFound);
    assert_eq!(disabled, absent);

    assert_eq!(
        resolver.resolve_path_on("admin.html", today).await.unwrap(),
        Resolution::NotFound
    );
}

#[tokio::test]
async fn test_wechat_group_shows_qr_after_name_update() {
    let (storage, _dir) = create_temp_storage().await;
    let service = MappingService::new(storage.clone());
    let resolver = Resolver::new(storage, ExpiryClock::utc());

    let qr = "data:image/png;base64,R0lGODlhAQABAAAAACw=";
    service
        .create(CreateMappingRequest {
            path: Some("grp".to_string()),
            target: Some("https://example.com/group".to_string()),
            is_wechat: Some(true),
            qr_code_data: Some(qr.to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    service
        .update(UpdateMappingRequest {
            original_path: Some("grp".to_string()),
            path: Some("grp".to_string()),
            target: Some("https://example.com/group".to_string()),
            name: Some("Weekly".to_string()),
            is_wechat: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(
        resolver.resolve_path_on("grp", date(2024, 1, 1)).await.unwrap(),
        Resolution::ShowEmbeddedContent {
            qr_code_data: qr.to_string(),
            name: Some("Weekly".to_string()),
        }
    );
}

// =============================================================================
// Classifier
// =============================================================================

#[tokio::test]
async fn test_classifier_splits_expired_and_expiring() {
    let (storage, _dir) = create_temp_storage().await;
    let service = MappingService::new(storage.clone());

    seed(&service, "gone", Some("2024-03-08")).await;
    seed(&service, "today", Some("2024-03-10")).await;
    seed(&service, "edge", Some("2024-03-13")).await;
    seed(&service, "later", Some("2024-03-14")).await;
    seed(&service, "forever", None).await;

    let classifier = ExpiryClassifier::new(storage, ExpiryClock::utc());
    let report = classifier.classify_at(at(2024, 3, 10, 12)).await.unwrap();

    let expired: Vec<_> = report.expired.iter().map(|m| m.path.as_str()).collect();
    let expiring: Vec<_> = report.expiring.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(expired, vec!["gone"]);
    assert_eq!(expiring, vec!["today", "edge"]);
}

#[tokio::test]
async fn test_classifier_uses_service_time_zone() {
    let (storage, _dir) = create_temp_storage().await;
    let service = MappingService::new(storage.clone());

    seed(&service, "promo", Some("2024-03-10")).await;

    // UTC 3 月 10 日 20:00 在 UTC+8 已是 3 月 11 日
    let classifier = ExpiryClassifier::new(storage, ExpiryClock::from_offset_minutes(8 * 60));
    let report = classifier.classify_at(at(2024, 3, 10, 20)).await.unwrap();
    assert_eq!(report.expired.len(), 1);
    assert!(report.expiring.is_empty());
}

// =============================================================================
// Sweeper
// =============================================================================

#[tokio::test]
async fn test_sweeper_deletes_in_batches() {
    let (storage, _dir) = create_temp_storage().await;
    let service = MappingService::new(storage.clone());

    for day in 1..=5 {
        seed(&service, &format!("old{}", day), Some(&format!("2024-01-0{}", day))).await;
    }
    seed(&service, "future", Some("2030-01-01")).await;
    seed(&service, "forever", None).await;

    let sweeper = ExpirySweeper::new(storage.clone(), ExpiryClock::utc());
    let report = sweeper.purge_expired_at(at(2024, 2, 1, 0), 2).await.unwrap();
    assert_eq!(report.deleted, 5);
    assert_eq!(report.batches, 3);

    assert!(storage.exists("future").await.unwrap());
    assert!(storage.exists("forever").await.unwrap());
    assert!(!storage.exists("old3").await.unwrap());
}

#[tokio::test]
async fn test_sweeper_threshold_is_instant_based() {
    let (storage, _dir) = create_temp_storage().await;
    let service = MappingService::new(storage.clone());
    seed(&service, "promo", Some("2024-03-10")).await;

    let sweeper = ExpirySweeper::new(storage.clone(), ExpiryClock::utc());

    // 过期日零点尚未早于 now
    let report = sweeper.purge_expired_at(at(2024, 3, 10, 0), 10).await.unwrap();
    assert_eq!(report.deleted, 0);
    assert_eq!(report.batches, 0);

    let report = sweeper.purge_expired_at(at(2024, 3, 10, 1), 10).await.unwrap();
    assert_eq!(report.deleted, 1);
}

#[tokio::test]
async fn test_sweeper_rejects_zero_batch() {
    let (storage, _dir) = create_temp_storage().await;
    let sweeper = ExpirySweeper::new(storage, ExpiryClock::utc());

    assert!(matches!(
        sweeper.purge_expired(0).await.unwrap_err(),
        LivelinkError::InvalidInput(_)
    ));
}

#[tokio::test]
async fn test_maintenance_task_runs_once() {
    let (storage, _dir) = create_temp_storage().await;
    let service = MappingService::new(storage.clone());
    seed(&service, "ancient", Some("2001-01-01")).await;

    let task = MaintenanceTask::new(
        storage.clone(),
        MaintenanceConfig {
            purge_enabled: true,
            purge_batch_size: 10,
            ..Default::default()
        },
    );

    let report = task.run_report().await.unwrap();
    assert_eq!(report.expired.len(), 1);

    let purged = task.run_purge().await.unwrap();
    assert_eq!(purged.deleted, 1);
    assert!(!storage.exists("ancient").await.unwrap());
}
