use super::*;

/// Tests setting a punishment for a new count.
///
/// Expected: Ok with the timeout stored for count 3
#[tokio::test]
async fn stores_new_punishment() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::WarnPunishment)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WarnPunishmentRepository::new(db);
    let stored = repo.set(1, 3, Punishment::Timeout { minutes: 60 }).await?;

    assert_eq!(stored.count, 3);
    assert_eq!(stored.punishment, Punishment::Timeout { minutes: 60 });

    let fetched = repo.get_for_count(1, 3).await?;
    assert_eq!(fetched, Some(stored));

    Ok(())
}

/// Tests that setting the same count again replaces the punishment.
///
/// Expected: Ok with a single row holding the newer punishment
#[tokio::test]
async fn replaces_punishment_for_existing_count() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::WarnPunishment)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WarnPunishmentRepository::new(db);
    let first = repo.set(1, 3, Punishment::Kick).await?;
    let second = repo.set(1, 3, Punishment::AddRole { role_id: 77 }).await?;

    assert_eq!(first.id, second.id);
    assert_eq!(second.punishment, Punishment::AddRole { role_id: 77 });
    assert_eq!(repo.get_all(1).await?.len(), 1);

    Ok(())
}

/// Tests removing a configured and an unconfigured count.
///
/// Expected: Ok(true) then Ok(false)
#[tokio::test]
async fn removes_punishment() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::WarnPunishment)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WarnPunishmentRepository::new(db);
    repo.set(1, 2, Punishment::Ban).await?;

    assert!(repo.remove(1, 2).await?);
    assert!(!repo.remove(1, 2).await?);
    assert!(repo.get_for_count(1, 2).await?.is_none());

    Ok(())
}
