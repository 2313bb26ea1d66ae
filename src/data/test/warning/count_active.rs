use super::*;

/// Tests that forgiven warnings and other members' warnings are not counted.
///
/// Expected: Ok(2)
#[tokio::test]
async fn counts_only_active_warnings_of_member() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Warning)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_warning(db, 1, 10).await?;
    factory::create_warning(db, 1, 10).await?;
    factory::warning::WarningFactory::new(db, 1, 10)
        .forgiven_by(99)
        .build()
        .await?;
    factory::create_warning(db, 1, 11).await?;
    factory::create_warning(db, 2, 10).await?;

    let repo = WarningRepository::new(db);
    let count = repo.count_active(1, 10).await?;

    assert_eq!(count, 2);

    Ok(())
}

/// Tests that a newly created warning is immediately active.
///
/// Expected: Ok with count 1 and the warning stored unforgiven
#[tokio::test]
async fn created_warning_is_active() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Warning)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WarningRepository::new(db);
    let warning = repo
        .create(CreateWarningParam {
            guild_id: 1,
            user_id: 10,
            moderator_id: 20,
            reason: Some("Spam".to_string()),
        })
        .await?;

    assert!(!warning.forgiven);
    assert_eq!(warning.reason.as_deref(), Some("Spam"));
    assert_eq!(repo.count_active(1, 10).await?, 1);

    Ok(())
}
