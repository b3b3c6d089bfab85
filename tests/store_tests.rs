mod common;

use chrono::{Duration, Utc};
use common::setup_db;
use portfolio_tracker::analysis::{analyze, CANNED_ANALYSIS};
use portfolio_tracker::error::StoreError;
use portfolio_tracker::import::NewCompany;
use portfolio_tracker::store::{self, NewCompanyUpdate, NewMetric, NewReport};
use uuid::Uuid;

fn new_company(name: &str) -> NewCompany {
    NewCompany {
        name: name.to_string(),
        total_funding: 12_000_000.0,
        current_revenue: 2_500_000.0,
        investor_list: vec!["Draper".to_string(), "a16z".to_string()],
        market_segment: "Fintech".to_string(),
        stage: "Series A".to_string(),
        revenue_growth: Some(30.0),
        location: Some("Berlin".to_string()),
        website: Some("https://example.com".to_string()),
        description: None,
    }
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let db = setup_db().await;
    store::create_company(&db, new_company("Older")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    store::create_company(&db, new_company("Newer")).await.unwrap();

    let names: Vec<String> = store::list_companies(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Newer", "Older"]);
}

#[tokio::test]
async fn test_update_replaces_all_mutable_fields() {
    let db = setup_db().await;
    let created = store::create_company(&db, new_company("Before")).await.unwrap();

    let replacement = NewCompany {
        name: "After".to_string(),
        total_funding: 1.0,
        current_revenue: 2.0,
        investor_list: vec!["Sequoia".to_string()],
        market_segment: "SaaS".to_string(),
        stage: "Seed".to_string(),
        revenue_growth: None,
        location: None,
        website: None,
        description: Some("Pivoted".to_string()),
    };
    let updated = store::update_company(&db, created.id, replacement).await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.name, "After");
    assert_eq!(updated.investor_list.names(), ["Sequoia"]);
    assert_eq!(updated.revenue_growth, None);
    assert_eq!(updated.location, None);
    assert_eq!(updated.description.as_deref(), Some("Pivoted"));
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let db = setup_db().await;
    let missing = Uuid::new_v4();

    assert!(matches!(
        store::get_company(&db, missing).await,
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store::update_company(&db, missing, new_company("X")).await,
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store::delete_company(&db, missing).await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_detail_includes_updates_and_metrics() {
    let db = setup_db().await;
    let company = store::create_company(&db, new_company("Acme")).await.unwrap();

    store::create_company_update(
        &db,
        company.id,
        NewCompanyUpdate {
            title: "Closed Series A".to_string(),
            description: "Led by a16z".to_string(),
        },
    )
    .await
    .unwrap();

    let now = Utc::now();
    for (offset, revenue) in [(60, 100.0), (30, 150.0), (0, 225.0)] {
        store::record_metric(
            &db,
            company.id,
            NewMetric {
                date: now - Duration::days(offset),
                revenue,
                growth: 50.0,
            },
        )
        .await
        .unwrap();
    }

    let detail = store::get_company(&db, company.id).await.unwrap();
    assert_eq!(detail.updates.len(), 1);
    assert_eq!(detail.updates[0].title, "Closed Series A");
    let revenues: Vec<f64> = detail.metrics.iter().map(|m| m.revenue).collect();
    assert_eq!(revenues, vec![100.0, 150.0, 225.0]);
}

#[tokio::test]
async fn test_delete_cascades_children_and_detaches_reports() {
    let db = setup_db().await;
    let doomed = store::create_company(&db, new_company("Doomed")).await.unwrap();
    let survivor = store::create_company(&db, new_company("Survivor")).await.unwrap();

    for id in [doomed.id, survivor.id] {
        store::create_company_update(
            &db,
            id,
            NewCompanyUpdate {
                title: "Update".to_string(),
                description: "Body".to_string(),
            },
        )
        .await
        .unwrap();
        store::record_metric(
            &db,
            id,
            NewMetric {
                date: Utc::now(),
                revenue: 10.0,
                growth: 1.0,
            },
        )
        .await
        .unwrap();
    }
    let report = store::create_report(
        &db,
        NewReport {
            title: "Doomed overview".to_string(),
            content: "...".to_string(),
            report_type: "Portfolio Overview".to_string(),
            format: "pdf".to_string(),
            company_id: Some(doomed.id),
        },
    )
    .await
    .unwrap();

    store::delete_company(&db, doomed.id).await.unwrap();

    assert!(matches!(
        store::get_company(&db, doomed.id).await,
        Err(StoreError::NotFound(_))
    ));
    let kept = store::get_company(&db, survivor.id).await.unwrap();
    assert_eq!(kept.updates.len(), 1);
    assert_eq!(kept.metrics.len(), 1);

    let reports = store::list_reports(&db).await.unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].id, report.id);
    assert_eq!(reports[0].company_id, None);
}

#[tokio::test]
async fn test_report_for_unknown_company_is_rejected() {
    let db = setup_db().await;
    let result = store::create_report(
        &db,
        NewReport {
            title: "Ghost".to_string(),
            content: "...".to_string(),
            report_type: "Growth Metrics".to_string(),
            format: "excel".to_string(),
            company_id: Some(Uuid::new_v4()),
        },
    )
    .await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_analysis_is_canned_and_saved() {
    let db = setup_db().await;

    let saved = analyze(&db, "Should we invest more in Acme?", Some("Acme"))
        .await
        .unwrap();

    assert_eq!(saved.response, CANNED_ANALYSIS);
    assert_eq!(saved.company_name.as_deref(), Some("Acme"));
    let all = store::list_ai_analyses(&db).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].query, "Should we invest more in Acme?");
}
