//! Analytics integration tests
//!
//! View recording, daily aggregation and the analytics query service
//! against a temporary SQLite database.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use futures_util::future::join_all;
use properview::analytics::{Aggregator, EventRecorder, ViewMetadata, day_window};
use properview::config::{AnalyticsConfig, DatabaseConfig};
use properview::errors::ProperviewError;
use properview::services::AnalyticsService;
use properview::storage::{
    DailyCounts, Inquiry, NewViewEvent, Property, PropertyStatus, SeaOrmStorage,
};
use tempfile::TempDir;

// =============================================================================
// Test Setup
// =============================================================================

async fn create_storage() -> (TempDir, Arc<SeaOrmStorage>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("analytics_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, "sqlite", &DatabaseConfig::default())
        .await
        .expect("Failed to create storage");
    (temp_dir, Arc::new(storage))
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn property(id: &str, price: i64) -> Property {
    let created = at(2024, 1, 1, 9, 0, 0);
    Property {
        id: id.to_string(),
        agent_id: "agent123".to_string(),
        title: format!("Listing {}", id),
        price,
        address: format!("{} Main St", id),
        bedrooms: 3,
        bathrooms: 2.0,
        description: "Bright family home".to_string(),
        status: PropertyStatus::Active,
        image_url: None,
        date_listed: created.date_naive(),
        sqft: Some(1800),
        property_type: Some("house".to_string()),
        created_at: created,
        updated_at: created,
    }
}

fn view(property_id: &str, session_id: &str, viewed_at: DateTime<Utc>) -> NewViewEvent {
    NewViewEvent {
        property_id: property_id.to_string(),
        session_id: session_id.to_string(),
        user_agent: "test-agent".to_string(),
        ip_address: "127.0.0.1".to_string(),
        referrer: String::new(),
        viewed_at,
    }
}

fn inquiry(id: &str, property_id: &str, submitted: DateTime<Utc>) -> Inquiry {
    Inquiry {
        id: id.to_string(),
        property_id: property_id.to_string(),
        name: "Jane Buyer".to_string(),
        email: "jane@example.com".to_string(),
        phone: None,
        message: "Is it still available?".to_string(),
        is_read: false,
        date_submitted: submitted,
    }
}

// =============================================================================
// EventRecorder
// =============================================================================

#[tokio::test]
async fn test_same_session_same_day_is_recorded_once() {
    let (_dir, storage) = create_storage().await;
    storage.insert_property(&property("p1", 500_000)).await.unwrap();
    let recorder = EventRecorder::new(storage.clone());

    let first = recorder
        .record_view_at("p1", "s1", ViewMetadata::default(), at(2024, 1, 15, 8, 0, 0))
        .await
        .unwrap();
    let second = recorder
        .record_view_at("p1", "s1", ViewMetadata::default(), at(2024, 1, 15, 20, 30, 0))
        .await
        .unwrap();

    assert!(first.recorded);
    assert!(!second.recorded);

    let (start, end) = day_window(day(2024, 1, 15));
    let (views, unique) = storage
        .view_counts_between(Some("p1"), start, end)
        .await
        .unwrap();
    assert_eq!((views, unique), (1, 1));
}

#[tokio::test]
async fn test_same_session_next_day_is_recorded_again() {
    let (_dir, storage) = create_storage().await;
    let recorder = EventRecorder::new(storage.clone());

    assert!(
        recorder
            .record_view_at("p1", "s1", ViewMetadata::default(), at(2024, 1, 15, 23, 59, 0))
            .await
            .unwrap()
            .recorded
    );
    assert!(
        recorder
            .record_view_at("p1", "s1", ViewMetadata::default(), at(2024, 1, 16, 0, 1, 0))
            .await
            .unwrap()
            .recorded
    );

    assert_eq!(storage.property_view_totals("p1").await.unwrap(), (2, 1));
}

#[tokio::test]
async fn test_record_view_rejects_missing_ids() {
    let (_dir, storage) = create_storage().await;
    let recorder = EventRecorder::new(storage);

    let err = recorder
        .record_view_at("", "s1", ViewMetadata::default(), Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, ProperviewError::Validation(_)));
    assert_eq!(err.message(), "Missing propertyId or sessionId");

    let err = recorder
        .record_view_at("p1", "   ", ViewMetadata::default(), Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, ProperviewError::Validation(_)));
}

#[tokio::test]
async fn test_record_view_rejects_over_length_ids() {
    let (_dir, storage) = create_storage().await;
    let recorder = EventRecorder::new(storage.clone());
    let ts = at(2024, 1, 15, 8, 0, 0);

    let long_session = "s".repeat(200);
    let err = recorder
        .record_view_at("p1", &long_session, ViewMetadata::default(), ts)
        .await
        .unwrap_err();
    assert!(matches!(err, ProperviewError::Validation(_)));
    assert_eq!(err.message(), "sessionId must be at most 128 characters");

    let long_property = "p".repeat(37);
    let err = recorder
        .record_view_at(&long_property, "s1", ViewMetadata::default(), ts)
        .await
        .unwrap_err();
    assert!(matches!(err, ProperviewError::Validation(_)));

    let (start, end) = day_window(ts.date_naive());
    assert_eq!(storage.view_counts_between(None, start, end).await.unwrap(), (0, 0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_views_store_one_event() {
    let (_dir, storage) = create_storage().await;
    storage.insert_property(&property("p1", 400_000)).await.unwrap();
    let recorder = EventRecorder::new(storage.clone());
    let ts = at(2024, 1, 15, 9, 0, 0);

    let handles = (0..8).map(|_| {
        let recorder = recorder.clone();
        tokio::spawn(async move {
            recorder
                .record_view_at("p1", "s1", ViewMetadata::default(), ts)
                .await
        })
    });
    let outcomes: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert_eq!(outcomes.iter().filter(|o| o.recorded).count(), 1);
    assert_eq!(storage.property_view_totals("p1").await.unwrap(), (1, 1));
    let daily = storage
        .property_daily("p1", ts.date_naive())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(daily.views, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sessions_settle_on_full_count() {
    let (_dir, storage) = create_storage().await;
    storage.insert_property(&property("p1", 400_000)).await.unwrap();
    let recorder = EventRecorder::new(storage.clone());
    let ts = at(2024, 1, 15, 9, 0, 0);
    const SESSIONS: i64 = 12;

    let handles = (0..SESSIONS).map(|i| {
        let recorder = recorder.clone();
        tokio::spawn(async move {
            recorder
                .record_view_at("p1", &format!("s{}", i), ViewMetadata::default(), ts)
                .await
        })
    });
    for joined in join_all(handles).await {
        assert!(joined.unwrap().unwrap().recorded);
    }

    let expected = DailyCounts {
        views: SESSIONS,
        unique_visitors: SESSIONS,
        inquiries: 0,
    };
    assert_eq!(
        storage.property_daily("p1", ts.date_naive()).await.unwrap(),
        Some(expected)
    );
    assert_eq!(
        storage.global_daily(ts.date_naive()).await.unwrap(),
        Some(expected)
    );
}

#[tokio::test]
async fn test_record_view_updates_daily_rows() {
    let (_dir, storage) = create_storage().await;
    let recorder = EventRecorder::new(storage.clone());
    let ts = at(2024, 1, 15, 10, 0, 0);

    for session in ["s1", "s2", "s3"] {
        recorder
            .record_view_at("p1", session, ViewMetadata::default(), ts)
            .await
            .unwrap();
    }
    recorder
        .record_view_at("p2", "s1", ViewMetadata::default(), ts)
        .await
        .unwrap();

    let p1 = storage.property_daily("p1", day(2024, 1, 15)).await.unwrap();
    assert_eq!(
        p1,
        Some(DailyCounts {
            views: 3,
            unique_visitors: 3,
            inquiries: 0
        })
    );

    // 全局独立访客按会话去重
    let global = storage.global_daily(day(2024, 1, 15)).await.unwrap().unwrap();
    assert_eq!(global.views, 4);
    assert_eq!(global.unique_visitors, 3);
}

// =============================================================================
// Aggregator
// =============================================================================

#[tokio::test]
async fn test_recompute_day_is_idempotent() {
    let (_dir, storage) = create_storage().await;
    let aggregator = Aggregator::new(storage.clone());
    let date = day(2024, 1, 15);

    storage.insert_view_dedup(&view("p1", "s1", at(2024, 1, 15, 9, 0, 0))).await.unwrap();
    storage.insert_view_dedup(&view("p1", "s2", at(2024, 1, 15, 11, 0, 0))).await.unwrap();
    storage.insert_inquiry(&inquiry("i1", "p1", at(2024, 1, 15, 12, 0, 0))).await.unwrap();

    let first = aggregator.recompute_day(date, &["p1".to_string()]).await.unwrap();
    let row_after_first = storage.property_daily("p1", date).await.unwrap();
    let global_after_first = storage.global_daily(date).await.unwrap();

    let second = aggregator.recompute_day(date, &["p1".to_string()]).await.unwrap();
    let row_after_second = storage.property_daily("p1", date).await.unwrap();
    let global_after_second = storage.global_daily(date).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(row_after_first, row_after_second);
    assert_eq!(global_after_first, global_after_second);
    assert_eq!(
        row_after_second,
        Some(DailyCounts {
            views: 2,
            unique_visitors: 2,
            inquiries: 1
        })
    );
}

#[tokio::test]
async fn test_recompute_counts_half_open_day_window() {
    let (_dir, storage) = create_storage().await;
    let aggregator = Aggregator::new(storage.clone());

    // 窗口内两条，窗口外两条
    storage.insert_view_dedup(&view("p1", "a", at(2024, 1, 15, 0, 0, 0))).await.unwrap();
    storage
        .insert_view_dedup(&view(
            "p1",
            "b",
            at(2024, 1, 15, 23, 59, 59) + Duration::milliseconds(999),
        ))
        .await
        .unwrap();
    storage.insert_view_dedup(&view("p1", "c", at(2024, 1, 16, 0, 0, 0))).await.unwrap();
    storage.insert_view_dedup(&view("p1", "d", at(2024, 1, 14, 23, 59, 59))).await.unwrap();

    aggregator
        .recompute_day(day(2024, 1, 15), &["p1".to_string()])
        .await
        .unwrap();

    let row = storage.property_daily("p1", day(2024, 1, 15)).await.unwrap().unwrap();
    let (start, end) = day_window(day(2024, 1, 15));
    let (raw_views, _) = storage.view_counts_between(Some("p1"), start, end).await.unwrap();
    assert_eq!(row.views, 2);
    assert_eq!(row.views, raw_views);
}

#[tokio::test]
async fn test_new_inquiry_increments_daily_inquiries_by_one() {
    let (_dir, storage) = create_storage().await;
    let aggregator = Aggregator::new(storage.clone());
    let date = day(2024, 1, 15);
    let ids = ["p1".to_string()];

    storage.insert_inquiry(&inquiry("i1", "p1", at(2024, 1, 15, 8, 0, 0))).await.unwrap();
    aggregator.recompute_day(date, &ids).await.unwrap();
    let before = storage.property_daily("p1", date).await.unwrap().unwrap().inquiries;

    storage.insert_inquiry(&inquiry("i2", "p1", at(2024, 1, 15, 16, 0, 0))).await.unwrap();
    aggregator.recompute_day(date, &ids).await.unwrap();
    let after = storage.property_daily("p1", date).await.unwrap().unwrap().inquiries;

    assert_eq!(after, before + 1);
}

#[tokio::test]
async fn test_recompute_day_without_properties_writes_global_row() {
    let (_dir, storage) = create_storage().await;
    let aggregator = Aggregator::new(storage.clone());

    let summary = aggregator.recompute_day(day(2024, 2, 1), &[]).await.unwrap();
    assert_eq!(summary.properties_updated, 0);
    assert_eq!(summary.global, DailyCounts::default());
    assert_eq!(
        storage.global_daily(day(2024, 2, 1)).await.unwrap(),
        Some(DailyCounts::default())
    );
}

#[tokio::test]
async fn test_recompute_range_backfills_every_day() {
    let (_dir, storage) = create_storage().await;
    let aggregator = Aggregator::new(storage.clone());

    storage.insert_view_dedup(&view("p1", "s1", at(2024, 1, 10, 9, 0, 0))).await.unwrap();
    storage.insert_view_dedup(&view("p2", "s1", at(2024, 1, 12, 9, 0, 0))).await.unwrap();
    storage.insert_inquiry(&inquiry("i1", "p3", at(2024, 1, 12, 10, 0, 0))).await.unwrap();

    let report = aggregator
        .recompute_range(day(2024, 1, 10), day(2024, 1, 12))
        .await
        .unwrap();
    assert_eq!(report.days, 3);
    assert_eq!(report.property_rows, 3);
    assert_eq!(report.total_views, 2);

    assert_eq!(storage.property_daily("p1", day(2024, 1, 10)).await.unwrap().unwrap().views, 1);
    assert_eq!(
        storage.property_daily("p3", day(2024, 1, 12)).await.unwrap().unwrap().inquiries,
        1
    );
    assert_eq!(
        storage.global_daily(day(2024, 1, 11)).await.unwrap(),
        Some(DailyCounts::default())
    );
}

#[tokio::test]
async fn test_recompute_range_rejects_inverted_range() {
    let (_dir, storage) = create_storage().await;
    let aggregator = Aggregator::new(storage);

    let err = aggregator
        .recompute_range(day(2024, 1, 12), day(2024, 1, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, ProperviewError::Validation(_)));
}

// =============================================================================
// AnalyticsService
// =============================================================================

async fn seed_views(storage: &SeaOrmStorage, property_id: &str, count: usize) {
    let ts = at(2024, 1, 15, 12, 0, 0);
    for i in 0..count {
        storage
            .insert_view_dedup(&view(property_id, &format!("{}-s{}", property_id, i), ts))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_top_properties_orders_by_views() {
    let (_dir, storage) = create_storage().await;
    let service = AnalyticsService::new(storage.clone(), AnalyticsConfig::default());

    for (id, views) in [("p1", 30), ("p2", 10), ("p3", 50), ("p4", 20), ("p5", 40), ("p6", 5)] {
        storage.insert_property(&property(id, 100_000)).await.unwrap();
        seed_views(&storage, id, views).await;
    }
    storage.insert_inquiry(&inquiry("i1", "p3", at(2024, 1, 15, 13, 0, 0))).await.unwrap();

    let top = service.top_properties(5).await.unwrap();
    let views: Vec<i64> = top.iter().map(|t| t.views).collect();
    assert_eq!(views, vec![50, 40, 30, 20, 10]);
    assert_eq!(top[0].id, "p3");
    assert_eq!(top[0].inquiries, 1);
    assert_eq!(top[0].unique_visitors, 50);
    assert_eq!(top[0].title, "Listing p3");
}

#[tokio::test]
async fn test_top_properties_skips_deleted_listings() {
    let (_dir, storage) = create_storage().await;
    let service = AnalyticsService::new(storage.clone(), AnalyticsConfig::default());

    storage.insert_property(&property("p1", 100_000)).await.unwrap();
    seed_views(&storage, "p1", 2).await;
    // ghost 没有房源记录
    seed_views(&storage, "ghost", 9).await;

    let top = service.top_properties(5).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].id, "p1");
}

#[tokio::test]
async fn test_top_properties_among_includes_unviewed() {
    let (_dir, storage) = create_storage().await;
    let service = AnalyticsService::new(storage.clone(), AnalyticsConfig::default());

    for id in ["p1", "p2", "p3"] {
        storage.insert_property(&property(id, 100_000)).await.unwrap();
    }
    seed_views(&storage, "p2", 4).await;
    seed_views(&storage, "p3", 7).await;

    let ids = vec!["p1".to_string(), "p2".to_string()];
    let top = service.top_properties_among(&ids, 5).await.unwrap();
    let pairs: Vec<(&str, i64)> = top.iter().map(|t| (t.id.as_str(), t.views)).collect();
    assert_eq!(pairs, vec![("p2", 4), ("p1", 0)]);
}

#[tokio::test]
async fn test_property_analytics_counts_raw_logs() {
    let (_dir, storage) = create_storage().await;
    let service = AnalyticsService::new(storage.clone(), AnalyticsConfig::default());

    storage.insert_property(&property("p1", 100_000)).await.unwrap();
    storage.insert_view_dedup(&view("p1", "s1", at(2024, 1, 14, 9, 0, 0))).await.unwrap();
    storage.insert_view_dedup(&view("p1", "s1", at(2024, 1, 15, 9, 0, 0))).await.unwrap();
    storage.insert_view_dedup(&view("p1", "s2", at(2024, 1, 15, 9, 0, 0))).await.unwrap();
    storage.insert_inquiry(&inquiry("i1", "p1", at(2024, 1, 15, 10, 0, 0))).await.unwrap();

    let stats = service.property_analytics("p1").await.unwrap();
    assert_eq!(stats.views, 3);
    assert_eq!(stats.unique_visitors, 2);
    assert_eq!(stats.inquiries, 1);

    let err = service.property_analytics("missing").await.unwrap_err();
    assert!(matches!(err, ProperviewError::NotFound(_)));
}

#[tokio::test]
async fn test_summary_totals_trend_and_chart() {
    let (_dir, storage) = create_storage().await;
    let service = AnalyticsService::new(storage.clone(), AnalyticsConfig::default());
    let now = at(2024, 1, 15, 12, 0, 0);

    // 01-02..01-08 每天 10 次浏览，01-09..01-15 每天 20 次
    for offset in 0..14 {
        let date = day(2024, 1, 2) + Duration::days(offset);
        let views = if offset < 7 { 10 } else { 20 };
        storage
            .upsert_global_daily(
                date,
                DailyCounts {
                    views,
                    unique_visitors: views / 2,
                    inquiries: 1,
                },
            )
            .await
            .unwrap();
    }
    // 窗口之外的旧数据不计入
    storage
        .upsert_global_daily(
            day(2023, 11, 1),
            DailyCounts {
                views: 999,
                unique_visitors: 1,
                inquiries: 9,
            },
        )
        .await
        .unwrap();

    let mut sold = property("p1", 400_000);
    sold.status = PropertyStatus::Sold;
    sold.updated_at = at(2024, 1, 10, 9, 0, 0);
    storage.insert_property(&sold).await.unwrap();
    storage.insert_view_dedup(&view("p1", "s1", at(2024, 1, 15, 8, 0, 0))).await.unwrap();

    let summary = service.summary(now).await.unwrap();

    assert_eq!(summary.summary.total_views, 7 * 10 + 7 * 20);
    assert_eq!(summary.summary.total_inquiries, 14);
    assert_eq!(summary.summary.views_trend, 100.0);
    assert_eq!(summary.summary.inquiries_trend, 0.0);
    assert_eq!(summary.summary.total_sales_value, 400_000);

    assert_eq!(summary.chart_data.len(), 14);
    assert_eq!(summary.chart_data[0].date, day(2024, 1, 2));
    assert_eq!(summary.chart_data[13].date, day(2024, 1, 15));

    assert_eq!(summary.today.views, 1);
    assert_eq!(summary.today.unique_visitors, 1);
    assert_eq!(summary.top_properties.len(), 1);
}
