use super::*;

/// Tests that the most recent messages come back in chronological order.
///
/// Expected: Ok with the last two of three messages, oldest first
#[tokio::test]
async fn returns_latest_messages_in_order() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ai_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = AiConversationRepository::new(db);
    let conversation = repo.get_or_create(1, 10).await?;
    repo.append(conversation.id, AiRole::User, "hello".to_string())
        .await?;
    repo.append(conversation.id, AiRole::Assistant, "hi there".to_string())
        .await?;
    repo.append(conversation.id, AiRole::User, "how are you".to_string())
        .await?;

    let recent = repo.recent(conversation.id, 2).await?;
    let contents: Vec<&str> = recent.iter().map(|m| m.content.as_str()).collect();

    assert_eq!(contents, vec!["hi there", "how are you"]);
    assert_eq!(recent[0].role, AiRole::Assistant);

    Ok(())
}

/// Tests that a reset starts a fresh conversation.
///
/// Expected: Ok(true), then a new conversation without messages
#[tokio::test]
async fn reset_starts_fresh_conversation() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ai_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = AiConversationRepository::new(db);
    let conversation = repo.get_or_create(1, 10).await?;
    repo.append(conversation.id, AiRole::User, "hello".to_string())
        .await?;

    assert!(repo.reset(1, 10).await?);
    assert!(!repo.reset(1, 10).await?);

    let fresh = repo.get_or_create(1, 10).await?;
    assert!(repo.recent(fresh.id, 20).await?.is_empty());

    Ok(())
}
