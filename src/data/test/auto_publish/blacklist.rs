use super::*;

/// Tests that words are stored lowercased and duplicates are rejected.
///
/// Expected: Ok(true) for the first add, Ok(false) for a differently cased duplicate
#[tokio::test]
async fn stores_words_lowercased_once() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_auto_publish_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = AutoPublishRepository::new(db);
    repo.add_channel(1, 100).await?;

    assert!(repo.add_word(100, "Leak").await?);
    assert!(!repo.add_word(100, " leak ").await?);
    assert!(repo.add_user(100, 10).await?);
    assert!(!repo.add_user(100, 10).await?);

    let blacklist = repo.get_blacklist(100).await?;
    assert_eq!(blacklist.words, vec!["leak".to_string()]);
    assert_eq!(blacklist.user_ids, vec![10]);

    assert!(repo.remove_word(100, "LEAK").await?);
    assert!(repo.remove_user(100, 10).await?);
    assert_eq!(repo.get_blacklist(100).await?, Default::default());

    Ok(())
}
