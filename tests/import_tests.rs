mod common;

use common::{setup_db, HEADER, SAMPLE_CSV};
use portfolio_tracker::error::{Field, ImportError, ParseError};
use portfolio_tracker::import::{import_csv, import_records, prepare_csv, RawCompanyRecord};
use portfolio_tracker::store;
use sea_orm::ConnectionTrait;

#[tokio::test]
async fn test_valid_csv_creates_every_row_in_order() {
    let db = setup_db().await;

    let created = import_csv(&db, SAMPLE_CSV).await.unwrap();

    assert_eq!(created.len(), 2);
    let first = &created[0];
    assert_eq!(first.name, "Company A");
    assert_eq!(first.total_funding, 25_000_000.0);
    assert_eq!(first.current_revenue, 5_000_000.0);
    assert_eq!(first.investor_list.names(), ["Draper", "Sequoia"]);
    assert_eq!(first.market_segment, "SaaS");
    assert_eq!(first.stage, "Series B");
    assert_eq!(first.revenue_growth, None);
    assert_eq!(first.location, None);
    assert_eq!(first.website, None);
    assert_eq!(first.description, None);
    assert_eq!(created[1].name, "Company B");

    assert_eq!(store::list_companies(&db).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_currency_formatting_is_stripped() {
    let db = setup_db().await;
    let csv = format!("{}\nAcme,\"$1,500,000.50\",$0,,Enterprise,Seed\n", HEADER);

    let created = import_csv(&db, &csv).await.unwrap();

    assert_eq!(created[0].total_funding, 1_500_000.5);
    assert_eq!(created[0].current_revenue, 0.0);
    assert!(created[0].investor_list.names().is_empty());
}

#[tokio::test]
async fn test_minus_sign_is_stripped_like_any_formatting() {
    let db = setup_db().await;
    let csv = format!("{}\nA,-$1000,5,X,SaaS,Seed\n", HEADER);

    let created = import_csv(&db, &csv).await.unwrap();

    assert_eq!(created[0].total_funding, 1000.0);
    assert_eq!(created[0].current_revenue, 5.0);
}

#[tokio::test]
async fn test_invalid_row_rejects_whole_batch() {
    let db = setup_db().await;
    let csv = format!(
        "{}\nGood One,1000,100,Draper,SaaS,Seed\nGood Two,2000,200,Draper,SaaS,Seed\nBad Three,N/A,300,Draper,SaaS,Seed\nGood Four,4000,400,Draper,SaaS,Seed\n",
        HEADER
    );

    let err = import_csv(&db, &csv).await.unwrap_err();

    match err {
        ImportError::Validation(v) => {
            assert_eq!(v.row, 3);
            assert_eq!(v.field, Field::TotalFunding);
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(store::list_companies(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_stage_reported_by_field() {
    let csv = format!("{}\nA,1,1,X,SaaS,\n", HEADER);
    match prepare_csv(&csv).unwrap_err() {
        ImportError::Validation(v) => {
            assert_eq!(v.row, 1);
            assert_eq!(v.field, Field::Stage);
            assert!(v.to_string().contains("row 1"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_csv_writes_nothing() {
    let db = setup_db().await;
    let csv = format!("{}\nA,1,1,X,SaaS,Seed\nB,2,2,SaaS\n", HEADER);

    let err = import_csv(&db, &csv).await.unwrap_err();

    assert!(matches!(err, ImportError::Parse(ParseError::MalformedRow { row: 2, .. })));
    assert!(store::list_companies(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_header_only_is_empty_batch() {
    let db = setup_db().await;
    let err = import_csv(&db, HEADER).await.unwrap_err();
    assert!(matches!(err, ImportError::EmptyBatch));
}

#[tokio::test]
async fn test_reimport_creates_duplicates() {
    // No dedup key: the same file imported twice yields two copies of every company.
    let db = setup_db().await;

    import_csv(&db, SAMPLE_CSV).await.unwrap();
    import_csv(&db, SAMPLE_CSV).await.unwrap();

    let companies = store::list_companies(&db).await.unwrap();
    assert_eq!(companies.len(), 4);
    assert_eq!(companies.iter().filter(|c| c.name == "Company A").count(), 2);
}

#[tokio::test]
async fn test_store_failure_rolls_back_batch() {
    let db = setup_db().await;
    db.execute_unprepared(
        "CREATE TRIGGER reject_explode BEFORE INSERT ON companies \
         WHEN NEW.name = 'Explode' BEGIN SELECT RAISE(ABORT, 'rejected by trigger'); END;",
    )
    .await
    .unwrap();

    let csv = format!(
        "{}\nFirst,1,1,X,SaaS,Seed\nSecond,2,2,X,SaaS,Seed\nExplode,3,3,X,SaaS,Seed\n",
        HEADER
    );
    let err = import_csv(&db, &csv).await.unwrap_err();

    match err {
        ImportError::Store(e) => assert!(e.to_string().contains("rejected by trigger"), "{}", e),
        other => panic!("expected store error, got {:?}", other),
    }
    assert!(store::list_companies(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_investor_list_round_trip() {
    let db = setup_db().await;
    let records = vec![RawCompanyRecord {
        name: Some("Company A".to_string()),
        total_funding: Some("25000000".to_string()),
        current_revenue: Some("5000000".to_string()),
        investor_list: Some("Draper, Sequoia".to_string()),
        market_segment: Some("SaaS".to_string()),
        stage: Some("Series B".to_string()),
        ..Default::default()
    }];

    let created = import_records(&db, &records).await.unwrap();
    let stored = store::get_company(&db, created[0].id).await.unwrap().company;

    assert_eq!(stored.investor_list.names(), ["Draper", "Sequoia"]);
    assert_eq!(stored.investor_list.to_string(), "Draper, Sequoia");
}

#[tokio::test]
async fn test_empty_record_list_is_rejected() {
    let db = setup_db().await;
    let err = import_records(&db, &[]).await.unwrap_err();
    assert_eq!(err.to_string(), "No valid companies data provided");
}
