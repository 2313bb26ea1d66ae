use super::*;

/// Tests that toggling flips the flag and reports the new state.
///
/// Expected: Ok(true) then Ok(false)
#[tokio::test]
async fn flips_message_count_flag() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildConfig)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildConfigRepository::new(db);

    assert!(repo.toggle_message_count(5).await?);
    assert!(repo.get(5).await?.unwrap().message_count_enabled);

    assert!(!repo.toggle_message_count(5).await?);
    assert!(!repo.get(5).await?.unwrap().message_count_enabled);

    Ok(())
}
