use super::*;

/// Tests resetting a single member keeps everyone else's counts.
///
/// Expected: Ok(4) with user 11 untouched
#[tokio::test]
async fn resets_single_member() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::MessageCount)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = MessageCountRepository::new(db);
    repo.apply_increments(&[
        (key(100, 10), pending(1)),
        (key(200, 10), pending(3)),
        (key(100, 11), pending(6)),
    ])
    .await?;

    let removed = repo.reset(1, Some(10)).await?;

    assert_eq!(removed, 4);
    assert_eq!(repo.get_count(1, 10, None).await?, 0);
    assert_eq!(repo.get_count(1, 11, None).await?, 6);

    Ok(())
}

/// Tests resetting the whole guild.
///
/// Expected: Ok(10) and an empty leaderboard
#[tokio::test]
async fn resets_whole_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::MessageCount)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = MessageCountRepository::new(db);
    repo.apply_increments(&[(key(100, 10), pending(4)), (key(100, 11), pending(6))])
        .await?;

    assert_eq!(repo.reset(1, None).await?, 10);
    assert!(repo.leaderboard(1, 10).await?.is_empty());

    Ok(())
}
