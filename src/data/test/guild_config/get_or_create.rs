use super::*;

/// Tests that a missing configuration is created with defaults.
///
/// Expected: Ok with defaults and exactly one stored row
#[tokio::test]
async fn creates_defaults_for_unknown_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildConfig)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildConfigRepository::new(db);
    let config = repo.get_or_create(42).await?;

    assert_eq!(config.guild_id, 42);
    assert!(!config.message_count_enabled);
    assert!(!config.link_preview_enabled);
    assert_eq!(config.warn_expire_hours, 0);
    assert_eq!(config.warn_expire_action, WarnExpireAction::Clear);

    let rows = entity::prelude::GuildConfig::find().count(db).await?;
    assert_eq!(rows, 1);

    Ok(())
}

/// Tests that calling twice returns the stored row instead of inserting again.
///
/// Expected: Ok with the previously updated values
#[tokio::test]
async fn returns_existing_configuration() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildConfig)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildConfigRepository::new(db);
    repo.update(
        42,
        UpdateGuildConfigParam {
            link_preview_enabled: Some(true),
            ..Default::default()
        },
    )
    .await?;

    let config = repo.get_or_create(42).await?;

    assert!(config.link_preview_enabled);
    let rows = entity::prelude::GuildConfig::find().count(db).await?;
    assert_eq!(rows, 1);

    Ok(())
}
