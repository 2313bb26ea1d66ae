use super::*;
use crate::data::warning::WarningRepository;
use test_utils::factory;

/// Tests the lookup after the member reaches exactly the configured count.
///
/// Expected: Ok(Some) with the kick configured for 3 warnings
#[tokio::test]
async fn matches_exact_warning_count() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::WarnPunishment)
        .with_table(entity::prelude::Warning)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WarnPunishmentRepository::new(db);
    repo.set(1, 3, Punishment::Kick).await?;

    for _ in 0..3 {
        factory::create_warning(db, 1, 10).await?;
    }
    let count = WarningRepository::new(db).count_active(1, 10).await? as u32;

    let punishment = repo.get_for_count(1, count).await?;
    assert_eq!(punishment.map(|p| p.punishment), Some(Punishment::Kick));

    Ok(())
}

/// Tests the lookup once the member is past the configured count.
///
/// Expected: Ok(None), a punishment for 3 warnings does not fire again at 4
#[tokio::test]
async fn ignores_counts_above_configured() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::WarnPunishment)
        .with_table(entity::prelude::Warning)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WarnPunishmentRepository::new(db);
    repo.set(1, 3, Punishment::Kick).await?;

    for _ in 0..4 {
        factory::create_warning(db, 1, 10).await?;
    }
    let count = WarningRepository::new(db).count_active(1, 10).await? as u32;

    assert_eq!(count, 4);
    assert!(repo.get_for_count(1, count).await?.is_none());

    Ok(())
}

/// Tests that punishments of another guild are not applied.
///
/// Expected: Ok(None)
#[tokio::test]
async fn ignores_other_guilds() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::WarnPunishment)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WarnPunishmentRepository::new(db);
    repo.set(1, 3, Punishment::Ban).await?;

    assert!(repo.get_for_count(2, 3).await?.is_none());

    Ok(())
}
