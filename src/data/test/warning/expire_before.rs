use super::*;

/// Tests that the clear action forgives old warnings and keeps recent ones.
///
/// Expected: Ok(1) with the old warning forgiven automatically
#[tokio::test]
async fn clear_forgives_old_warnings() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Warning)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let old = factory::warning::WarningFactory::new(db, 1, 10)
        .created_at(now - Duration::hours(48))
        .build()
        .await?;
    factory::warning::WarningFactory::new(db, 1, 10)
        .created_at(now - Duration::hours(1))
        .build()
        .await?;

    let repo = WarningRepository::new(db);
    let expired = repo
        .expire_before(1, now - Duration::hours(24), WarnExpireAction::Clear)
        .await?;

    assert_eq!(expired, 1);
    assert_eq!(repo.count_active(1, 10).await?, 1);

    let stored = entity::prelude::Warning::find_by_id(old.id)
        .one(db)
        .await?
        .unwrap();
    assert!(stored.forgiven);
    assert_eq!(stored.forgiven_by, None);

    Ok(())
}

/// Tests that the delete action removes old warnings and ignores other guilds.
///
/// Expected: Ok(1) with the row gone and the other guild's warning kept
#[tokio::test]
async fn delete_removes_old_warnings_of_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Warning)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let old = factory::warning::WarningFactory::new(db, 1, 10)
        .created_at(now - Duration::hours(48))
        .build()
        .await?;
    let other_guild = factory::warning::WarningFactory::new(db, 2, 10)
        .created_at(now - Duration::hours(48))
        .build()
        .await?;

    let repo = WarningRepository::new(db);
    let expired = repo
        .expire_before(1, now - Duration::hours(24), WarnExpireAction::Delete)
        .await?;

    assert_eq!(expired, 1);
    assert!(entity::prelude::Warning::find_by_id(old.id)
        .one(db)
        .await?
        .is_none());
    assert!(entity::prelude::Warning::find_by_id(other_guild.id)
        .one(db)
        .await?
        .is_some());

    Ok(())
}
