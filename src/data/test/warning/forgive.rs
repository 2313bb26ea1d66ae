use super::*;

/// Tests forgiving warnings records the moderator and removes them from the active set.
///
/// Expected: Ok(1) and the warning marked forgiven by the moderator
#[tokio::test]
async fn forgives_selected_warnings() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Warning)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let first = factory::create_warning(db, 1, 10).await?;
    factory::create_warning(db, 1, 10).await?;

    let repo = WarningRepository::new(db);
    let updated = repo.forgive(&[first.id], Some(20)).await?;

    assert_eq!(updated, 1);
    assert_eq!(repo.count_active(1, 10).await?, 1);

    let stored = entity::prelude::Warning::find_by_id(first.id)
        .one(db)
        .await?
        .unwrap();
    assert!(stored.forgiven);
    assert_eq!(stored.forgiven_by, Some(20));

    Ok(())
}

/// Tests that forgiving nothing does not touch the database.
///
/// Expected: Ok(0)
#[tokio::test]
async fn forgiving_no_ids_is_noop() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Warning)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_warning(db, 1, 10).await?;

    let repo = WarningRepository::new(db);

    assert_eq!(repo.forgive(&[], Some(20)).await?, 0);
    assert_eq!(repo.count_active(1, 10).await?, 1);

    Ok(())
}
