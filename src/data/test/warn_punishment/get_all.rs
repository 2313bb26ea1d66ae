use super::*;

/// Tests that punishments are listed by ascending count for one guild only.
///
/// Expected: Ok with counts [1, 3, 5]
#[tokio::test]
async fn lists_by_count() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::WarnPunishment)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WarnPunishmentRepository::new(db);
    repo.set(1, 5, Punishment::Ban).await?;
    repo.set(1, 1, Punishment::Timeout { minutes: 10 }).await?;
    repo.set(1, 3, Punishment::Softban).await?;
    repo.set(2, 2, Punishment::Kick).await?;

    let counts: Vec<u32> = repo.get_all(1).await?.iter().map(|p| p.count).collect();

    assert_eq!(counts, vec![1, 3, 5]);

    Ok(())
}
