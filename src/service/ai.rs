//! AI chat relay.
//!
//! Messages in a guild's AI channel are appended to the author's conversation and the
//! most recent part of it is sent to the configured provider. OpenAI and Groq share
//! the chat completions format; Claude uses the messages format with the system prompt
//! as a top level field.

use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::data::ai_conversation::AiConversationRepository;
use crate::error::AppError;
use crate::model::ai::{AiMessage, AiProvider, AiRole};

/// Messages replayed to the provider as context, including the new one.
pub const CONTEXT_MESSAGES: u64 = 20;

const CLAUDE_VERSION: &str = "2023-06-01";
const CLAUDE_MAX_TOKENS: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChatRequest {
    Completions {
        model: String,
        messages: Vec<ChatMessage>,
    },
    Claude {
        model: String,
        max_tokens: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        system: Option<String>,
        messages: Vec<ChatMessage>,
    },
}

#[derive(Deserialize)]
struct CompletionsResponse {
    #[serde(default)]
    choices: Vec<CompletionsChoice>,
}

#[derive(Deserialize)]
struct CompletionsChoice {
    message: CompletionsMessage,
}

#[derive(Deserialize)]
struct CompletionsMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ClaudeResponse {
    #[serde(default)]
    content: Vec<ClaudeBlock>,
}

#[derive(Deserialize)]
struct ClaudeBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Joins consecutive messages of the same role into one turn.
///
/// A failed provider call leaves the user message without a reply, so the history can
/// hold several user messages in a row.
fn merge_turns(history: &[AiMessage]) -> Vec<ChatMessage> {
    let mut turns: Vec<ChatMessage> = Vec::with_capacity(history.len());

    for message in history {
        let role = message.role.as_str();
        match turns.last_mut() {
            Some(last) if last.role == role => {
                last.content.push_str("\n\n");
                last.content.push_str(&message.content);
            }
            _ => turns.push(ChatMessage {
                role,
                content: message.content.clone(),
            }),
        }
    }

    turns
}

/// Builds the provider request body from a conversation history.
pub fn build_request(
    provider: AiProvider,
    model: &str,
    system_prompt: Option<&str>,
    history: &[AiMessage],
) -> ChatRequest {
    let system_prompt = system_prompt
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    let mut turns = merge_turns(history);
    if provider == AiProvider::Claude {
        // Claude requires the conversation to open with a user turn
        let first_user = turns
            .iter()
            .position(|turn| turn.role == AiRole::User.as_str())
            .unwrap_or(turns.len());
        turns.drain(..first_user);
    }
    let turns = turns.into_iter();

    match provider {
        AiProvider::OpenAi | AiProvider::Groq => ChatRequest::Completions {
            model: model.to_string(),
            messages: system_prompt
                .map(|content| ChatMessage {
                    role: "system",
                    content,
                })
                .into_iter()
                .chain(turns)
                .collect(),
        },
        AiProvider::Claude => ChatRequest::Claude {
            model: model.to_string(),
            max_tokens: CLAUDE_MAX_TOKENS,
            system: system_prompt,
            messages: turns.collect(),
        },
    }
}

/// Extracts the reply text from a provider response body.
///
/// # Returns
/// - `Ok(String)` - The reply
/// - `Err(AppError::InternalError)` - The body is not a response of that provider, or empty
pub fn parse_response(provider: AiProvider, body: &str) -> Result<String, AppError> {
    let reply = match provider {
        AiProvider::OpenAi | AiProvider::Groq => {
            let response: CompletionsResponse = serde_json::from_str(body)
                .map_err(|e| AppError::InternalError(format!("Invalid {} response: {}", provider, e)))?;
            response
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .unwrap_or_default()
        }
        AiProvider::Claude => {
            let response: ClaudeResponse = serde_json::from_str(body)
                .map_err(|e| AppError::InternalError(format!("Invalid {} response: {}", provider, e)))?;
            response
                .content
                .into_iter()
                .filter(|block| block.kind == "text")
                .filter_map(|block| block.text)
                .collect::<Vec<_>>()
                .join("")
        }
    };

    let reply = reply.trim().to_string();
    if reply.is_empty() {
        return Err(AppError::InternalError(format!(
            "{} returned an empty reply",
            provider
        )));
    }

    Ok(reply)
}

pub struct AiService<'a> {
    db: &'a DatabaseConnection,
    http_client: &'a reqwest::Client,
    config: &'a AiConfig,
}

impl<'a> AiService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        http_client: &'a reqwest::Client,
        config: &'a AiConfig,
    ) -> Self {
        Self {
            db,
            http_client,
            config,
        }
    }

    /// Sends a member's message to the provider and stores both sides of the exchange.
    ///
    /// The user message is kept even when the provider fails, so the next attempt still
    /// has it as context.
    pub async fn chat(
        &self,
        guild_id: u64,
        user_id: u64,
        content: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, AppError> {
        let repo = AiConversationRepository::new(self.db);

        let conversation = repo.get_or_create(guild_id, user_id).await?;
        repo.append(conversation.id, AiRole::User, content.to_string())
            .await?;

        let history = repo.recent(conversation.id, CONTEXT_MESSAGES).await?;
        let request = build_request(
            self.config.provider,
            &self.config.model,
            system_prompt,
            &history,
        );

        let builder = self.http_client.post(self.config.provider.endpoint());
        let builder = match self.config.provider {
            AiProvider::Claude => builder
                .header("x-api-key", &self.config.api_key)
                .header("anthropic-version", CLAUDE_VERSION),
            AiProvider::OpenAi | AiProvider::Groq => builder.bearer_auth(&self.config.api_key),
        };

        let body = builder
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let reply = parse_response(self.config.provider, &body)?;

        repo.append(conversation.id, AiRole::Assistant, reply.clone())
            .await?;

        tracing::debug!(
            "AI reply for {} in guild {} ({} chars)",
            user_id,
            guild_id,
            reply.len()
        );

        Ok(reply)
    }

    /// Forgets the member's conversation.
    pub async fn reset(&self, guild_id: u64, user_id: u64) -> Result<bool, AppError> {
        Ok(AiConversationRepository::new(self.db)
            .reset(guild_id, user_id)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(role: AiRole, content: &str) -> AiMessage {
        AiMessage {
            id: 0,
            conversation_id: 1,
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn completions_request_leads_with_system_prompt() {
        let history = vec![
            message(AiRole::User, "hi"),
            message(AiRole::Assistant, "hello"),
        ];

        let request = build_request(AiProvider::Groq, "llama", Some("Be brief"), &history);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["model"], "llama");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "Be brief");
        assert_eq!(body["messages"][2]["role"], "assistant");
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn claude_request_moves_system_prompt_to_top_level() {
        let history = vec![message(AiRole::User, "hi")];

        let request = build_request(AiProvider::Claude, "claude", Some("Be brief"), &history);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["system"], "Be brief");
        assert_eq!(body["max_tokens"], CLAUDE_MAX_TOKENS);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn blank_system_prompt_is_left_out() {
        let request = build_request(AiProvider::Claude, "claude", Some("  "), &[]);
        let body = serde_json::to_value(&request).unwrap();

        assert!(body.get("system").is_none());
    }

    #[test]
    fn parses_completions_reply() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":" Hi there "}}]}"#;

        assert_eq!(parse_response(AiProvider::OpenAi, body).unwrap(), "Hi there");
    }

    #[test]
    fn parses_claude_text_blocks() {
        let body = r#"{"content":[{"type":"text","text":"Hello"},{"type":"tool_use","id":"x"},{"type":"text","text":" world"}]}"#;

        assert_eq!(
            parse_response(AiProvider::Claude, body).unwrap(),
            "Hello world"
        );
    }

    #[test]
    fn empty_reply_is_an_error() {
        assert!(parse_response(AiProvider::OpenAi, r#"{"choices":[]}"#).is_err());
        assert!(parse_response(AiProvider::Claude, "not json").is_err());
    }

    /// Tests a Claude request whose context window starts in the middle of an exchange.
    ///
    /// Expected: the leading assistant turn is dropped and the request opens with the
    /// user
    #[test]
    fn claude_request_starts_with_user_turn() {
        let mut history = vec![message(AiRole::Assistant, "earlier answer")];
        for i in 0..9 {
            history.push(message(AiRole::User, &format!("question {}", i)));
            history.push(message(AiRole::Assistant, &format!("answer {}", i)));
        }
        history.push(message(AiRole::User, "new question"));

        let request = build_request(AiProvider::Claude, "claude", None, &history);
        let body = serde_json::to_value(&request).unwrap();
        let messages = body["messages"].as_array().unwrap();

        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "question 0");
        assert_eq!(messages.len(), 19);
        assert_eq!(messages[18]["content"], "new question");
    }

    /// Tests a history where an earlier provider call failed and left no reply.
    ///
    /// Expected: consecutive user messages are sent as one turn, roles alternate
    #[test]
    fn consecutive_user_messages_are_merged() {
        let history = vec![
            message(AiRole::User, "first try"),
            message(AiRole::User, "second try"),
            message(AiRole::Assistant, "reply"),
            message(AiRole::User, "thanks"),
        ];

        let request = build_request(AiProvider::Claude, "claude", None, &history);
        let body = serde_json::to_value(&request).unwrap();
        let messages = body["messages"].as_array().unwrap();

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["content"], "first try\n\nsecond try");
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(messages[2]["role"], "user");
    }

    /// Expected: OpenAI compatible providers keep a leading assistant turn
    #[test]
    fn completions_request_keeps_leading_assistant() {
        let history = vec![
            message(AiRole::Assistant, "earlier answer"),
            message(AiRole::User, "question"),
        ];

        let request = build_request(AiProvider::OpenAi, "gpt", None, &history);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["messages"][0]["role"], "assistant");
    }
}
