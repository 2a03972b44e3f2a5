//! Store contract against a real PostgreSQL instance.
//!
//! Skipped unless `DATABASE_URL` is set (a `.env` file is honored). The test clears the
//! `students` table, so point it at a scratch database.

use chrono::{Duration, Local};
use rust_decimal::Decimal;
use student_records::{
    ListQuery, PostgresStudentStore, StoreError, StudentRecord, StudentStore,
};

fn record(name: &str, email: &str, days_ago: i64) -> StudentRecord {
    StudentRecord {
        name: name.to_string(),
        email: email.to_string(),
        age: 21,
        grade: Decimal::new(750, 2),
        enrollment_date: Local::now().date_naive() - Duration::days(days_ago),
        is_active: true,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn postgres_store_contract() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        println!("DATABASE_URL not set; skipping PostgreSQL store test");
        return Ok(());
    };

    let store = PostgresStudentStore::connect(&url, 2).await?;
    store.ensure_schema().await?;
    sqlx::query("TRUNCATE students RESTART IDENTITY")
        .execute(store.pool())
        .await?;

    store.ping().await?;

    let ada = store.insert(&record("Ada Lovelace", "ada@example.com", 10)).await?;
    let alan = store.insert(&record("Alan Turing", "alan@example.com", 5)).await?;
    let fetched = store.get(ada.id).await?.ok_or("inserted student not found")?;
    assert_eq!(fetched.record.grade, Decimal::new(750, 2));

    assert!(store.exists_with_email("ada@example.com", None).await?);
    assert!(!store.exists_with_email("ada@example.com", Some(ada.id)).await?);
    assert!(!store.exists_with_email("ADA@example.com", None).await?);

    // the UNIQUE constraint backs up the validator's lookup
    match store.insert(&record("Ada Again", "ada@example.com", 1)).await {
        Err(StoreError::DuplicateEmail(email)) => assert_eq!(email, "ada@example.com"),
        other => panic!("expected DuplicateEmail, got {:?}", other),
    }

    let mut renamed = alan.record.clone();
    renamed.name = "Alan M Turing".to_string();
    renamed.is_active = false;
    let updated = store.update(alan.id, &renamed).await?;
    assert_eq!(updated.record.name, "Alan M Turing");

    let page = store.list(&ListQuery::default()).await?;
    assert_eq!(page.total, 2);
    assert_eq!(page.items[0].id, alan.id);

    let inactive = store
        .list(&ListQuery { is_active: Some(false), ..Default::default() })
        .await?;
    assert_eq!(inactive.total, 1);

    let search = store
        .list(&ListQuery { search: Some("LOVELACE".to_string()), ..Default::default() })
        .await?;
    assert_eq!(search.items.len(), 1);
    assert_eq!(search.items[0].id, ada.id);

    store.delete(ada.id).await?;
    assert!(store.get(ada.id).await?.is_none());
    assert!(matches!(store.delete(ada.id).await, Err(StoreError::NotFound(_))));

    Ok(())
}
