use super::*;

/// Tests that only the provided fields change.
///
/// Expected: Ok with expiry changed and other fields untouched
#[tokio::test]
async fn updates_only_provided_fields() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildConfig)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildConfigRepository::new(db);
    repo.update(
        7,
        UpdateGuildConfigParam {
            ai_channel_id: Some(Some(900)),
            ..Default::default()
        },
    )
    .await?;

    let config = repo
        .update(
            7,
            UpdateGuildConfigParam {
                warn_expire_hours: Some(24),
                warn_expire_action: Some(WarnExpireAction::Delete),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(config.warn_expire_hours, 24);
    assert_eq!(config.warn_expire_action, WarnExpireAction::Delete);
    assert_eq!(config.ai_channel_id, Some(900));

    Ok(())
}

/// Tests that a nested `Some(None)` clears an optional field.
///
/// Expected: Ok with the AI channel removed
#[tokio::test]
async fn clears_optional_field() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildConfig)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildConfigRepository::new(db);
    repo.update(
        7,
        UpdateGuildConfigParam {
            ai_channel_id: Some(Some(900)),
            ai_system_prompt: Some(Some("Be brief".to_string())),
            ..Default::default()
        },
    )
    .await?;

    let config = repo
        .update(
            7,
            UpdateGuildConfigParam {
                ai_channel_id: Some(None),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(config.ai_channel_id, None);
    assert_eq!(config.ai_system_prompt.as_deref(), Some("Be brief"));

    Ok(())
}
