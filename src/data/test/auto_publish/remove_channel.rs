use super::*;

/// Tests that removing a channel also drops its blacklists.
///
/// Expected: Ok(true) with no channel and an empty blacklist afterwards
#[tokio::test]
async fn removes_channel_and_blacklists() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_auto_publish_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = AutoPublishRepository::new(db);
    repo.add_channel(1, 100).await?;
    repo.add_user(100, 10).await?;
    repo.add_word(100, "spoiler").await?;

    assert!(repo.remove_channel(1, 100).await?);
    assert!(!repo.is_auto_publish(100).await?);
    assert_eq!(repo.get_blacklist(100).await?, Default::default());

    Ok(())
}

/// Tests removing a channel that belongs to another guild.
///
/// Expected: Ok(false) and the channel stays configured
#[tokio::test]
async fn ignores_channel_of_other_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_auto_publish_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = AutoPublishRepository::new(db);
    repo.add_channel(1, 100).await?;

    assert!(!repo.remove_channel(2, 100).await?);
    assert!(repo.is_auto_publish(100).await?);

    Ok(())
}
