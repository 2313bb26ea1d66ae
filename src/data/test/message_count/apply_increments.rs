use super::*;

/// Tests that repeated flushes add to existing rows instead of replacing them.
///
/// Expected: Ok with 5 messages in channel 100 and 7 across the guild
#[tokio::test]
async fn accumulates_across_flushes() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::MessageCount)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = MessageCountRepository::new(db);
    repo.apply_increments(&[(key(100, 10), pending(3)), (key(200, 10), pending(2))])
        .await?;
    repo.apply_increments(&[(key(100, 10), pending(2))]).await?;

    assert_eq!(repo.get_count(1, 10, Some(100)).await?, 5);
    assert_eq!(repo.get_count(1, 10, None).await?, 7);

    Ok(())
}

/// Tests that an empty batch is accepted.
///
/// Expected: Ok with no counts stored
#[tokio::test]
async fn accepts_empty_batch() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::MessageCount)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = MessageCountRepository::new(db);
    repo.apply_increments(&[]).await?;

    assert_eq!(repo.get_count(1, 10, None).await?, 0);

    Ok(())
}
