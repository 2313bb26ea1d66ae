use dashmap::DashMap;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::data::guild_config::GuildConfigRepository;
use crate::error::AppError;
use crate::model::guild_config::{GuildConfig, UpdateGuildConfigParam};

/// Guild settings read on every message, cached after the first lookup.
///
/// Every write through [`GuildConfigService`] refreshes the cached entry; other writers
/// must call [`GuildConfigCache::invalidate`].
#[derive(Clone, Default)]
pub struct GuildConfigCache {
    configs: Arc<DashMap<u64, GuildConfig>>,
}

impl GuildConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&self, guild_id: u64) {
        self.configs.remove(&guild_id);
    }
}

pub struct GuildConfigService<'a> {
    db: &'a DatabaseConnection,
    cache: &'a GuildConfigCache,
}

impl<'a> GuildConfigService<'a> {
    pub fn new(db: &'a DatabaseConnection, cache: &'a GuildConfigCache) -> Self {
        Self { db, cache }
    }

    /// Gets a guild's settings, falling back to the defaults without storing them.
    pub async fn get(&self, guild_id: u64) -> Result<GuildConfig, AppError> {
        if let Some(config) = self.cache.configs.get(&guild_id) {
            return Ok(config.clone());
        }

        let config = GuildConfigRepository::new(self.db)
            .get(guild_id)
            .await?
            .unwrap_or_else(|| GuildConfig::default_for(guild_id));

        self.cache.configs.insert(guild_id, config.clone());

        Ok(config)
    }

    pub async fn update(
        &self,
        guild_id: u64,
        param: UpdateGuildConfigParam,
    ) -> Result<GuildConfig, AppError> {
        let config = GuildConfigRepository::new(self.db)
            .update(guild_id, param)
            .await?;

        self.cache.configs.insert(guild_id, config.clone());

        Ok(config)
    }

    pub async fn set_link_preview(&self, guild_id: u64, enabled: bool) -> Result<GuildConfig, AppError> {
        self.update(
            guild_id,
            UpdateGuildConfigParam {
                link_preview_enabled: Some(enabled),
                ..Default::default()
            },
        )
        .await
    }

    /// Sets or clears the channel the AI relay listens in.
    pub async fn set_ai_channel(
        &self,
        guild_id: u64,
        channel_id: Option<u64>,
    ) -> Result<GuildConfig, AppError> {
        self.update(
            guild_id,
            UpdateGuildConfigParam {
                ai_channel_id: Some(channel_id),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn set_ai_system_prompt(
        &self,
        guild_id: u64,
        prompt: Option<String>,
    ) -> Result<GuildConfig, AppError> {
        let prompt = prompt.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());

        self.update(
            guild_id,
            UpdateGuildConfigParam {
                ai_system_prompt: Some(prompt),
                ..Default::default()
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::builder::TestBuilder;

    /// Tests that reading an unknown guild does not create a row.
    ///
    /// Expected: defaults returned, repository still has no config
    #[tokio::test]
    async fn get_does_not_store_defaults() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_table(entity::prelude::GuildConfig)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let cache = GuildConfigCache::new();

        let config = GuildConfigService::new(db, &cache).get(1).await?;

        assert_eq!(config, GuildConfig::default_for(1));
        assert!(GuildConfigRepository::new(db).get(1).await?.is_none());

        Ok(())
    }

    /// Tests that updates are visible through the cache.
    ///
    /// Expected: link preview enabled on the next read
    #[tokio::test]
    async fn update_refreshes_cache() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_table(entity::prelude::GuildConfig)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let cache = GuildConfigCache::new();
        let service = GuildConfigService::new(db, &cache);

        assert!(!service.get(1).await?.link_preview_enabled);

        service.set_link_preview(1, true).await?;

        assert!(service.get(1).await?.link_preview_enabled);

        Ok(())
    }

    /// Tests that a blank system prompt clears it.
    ///
    /// Expected: ai_system_prompt is None
    #[tokio::test]
    async fn blank_prompt_clears() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_table(entity::prelude::GuildConfig)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let cache = GuildConfigCache::new();
        let service = GuildConfigService::new(db, &cache);

        service
            .set_ai_system_prompt(1, Some("Be nice".to_string()))
            .await?;
        let config = service.set_ai_system_prompt(1, Some("   ".to_string())).await?;

        assert!(config.ai_system_prompt.is_none());

        Ok(())
    }
}
