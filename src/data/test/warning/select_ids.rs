use super::*;

/// Tests that a 1-based index resolves against the newest-first listing.
///
/// Expected: Ok with the id of the newest warning for index 1
#[tokio::test]
async fn resolves_index_newest_first() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Warning)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let older = factory::warning::WarningFactory::new(db, 1, 10)
        .created_at(now - Duration::hours(2))
        .build()
        .await?;
    let newer = factory::warning::WarningFactory::new(db, 1, 10)
        .created_at(now - Duration::hours(1))
        .build()
        .await?;

    let repo = WarningRepository::new(db);

    assert_eq!(repo.select_ids(1, 10, WarningSelector::Index(1)).await?, vec![newer.id]);
    assert_eq!(repo.select_ids(1, 10, WarningSelector::Index(2)).await?, vec![older.id]);

    let mut all = repo.select_ids(1, 10, WarningSelector::All).await?;
    all.sort();
    assert_eq!(all, vec![older.id, newer.id]);

    Ok(())
}

/// Tests out-of-range indexes, including zero.
///
/// Expected: Ok with no ids
#[tokio::test]
async fn out_of_range_index_selects_nothing() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Warning)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_warning(db, 1, 10).await?;

    let repo = WarningRepository::new(db);

    assert!(repo.select_ids(1, 10, WarningSelector::Index(0)).await?.is_empty());
    assert!(repo.select_ids(1, 10, WarningSelector::Index(2)).await?.is_empty());

    Ok(())
}
