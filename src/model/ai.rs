//! AI chat relay conversation models and provider selection.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Supported chat completion providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    OpenAi,
    Groq,
    Claude,
}

impl AiProvider {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1/chat/completions",
            Self::Groq => "https://api.groq.com/openai/v1/chat/completions",
            Self::Claude => "https://api.anthropic.com/v1/messages",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::Groq => "llama-3.1-8b-instant",
            Self::Claude => "claude-3-5-haiku-latest",
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OpenAi => "openai",
            Self::Groq => "groq",
            Self::Claude => "claude",
        })
    }
}

impl FromStr for AiProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "groq" => Ok(Self::Groq),
            "claude" | "anthropic" => Ok(Self::Claude),
            other => Err(format!("Unknown AI provider '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiRole {
    User,
    Assistant,
}

impl AiRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl FromStr for AiRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(format!("Unknown message role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiMessage {
    pub id: i32,
    pub conversation_id: i32,
    pub role: AiRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl AiMessage {
    pub fn from_entity(entity: entity::ai_message::Model) -> Self {
        Self {
            id: entity.id,
            conversation_id: entity.conversation_id,
            role: entity.role.parse().unwrap_or(AiRole::User),
            content: entity.content,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiConversation {
    pub id: i32,
    pub guild_id: u64,
    pub user_id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AiConversation {
    pub fn from_entity(entity: entity::ai_conversation::Model) -> Self {
        Self {
            id: entity.id,
            guild_id: entity.guild_id as u64,
            user_id: entity.user_id as u64,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
