//! The generation collaborator boundary.
//!
//! Retrieval never produces prose; everything conversational happens on
//! the far side of [`Generator`]. The default implementation drives a
//! chat-completion provider with the assembled system prompt.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use sift_core::config::LlmConfig;
use sift_store::ScoredChunk;

use crate::prompt::build_system_prompt;
use crate::provider::{LlmError, LlmProvider, Message, Role};
use crate::providers::{OllamaProvider, OpenAiProvider};

/// One prior question/answer pair from the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
}

/// Turns a query plus retrieved chunks into an answer.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        query: &str,
        chunks: &[ScoredChunk],
        history: &[Exchange],
    ) -> Result<String, LlmError>;
}

pub struct LlmGenerator {
    provider: Box<dyn LlmProvider>,
    temperature: f32,
    max_tokens: u32,
}

impl LlmGenerator {
    /// Select and build the provider named by config.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let provider: Box<dyn LlmProvider> = match config.provider.as_str() {
            "ollama" => Box::new(OllamaProvider::new(
                config.ollama_url.clone(),
                config.ollama_model.clone(),
            )),
            "openai" => {
                let api_key = config
                    .openai_api_key
                    .clone()
                    .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY is not set".into()))?;
                Box::new(OpenAiProvider::new(
                    api_key,
                    config.openai_model.clone(),
                    config.openai_base_url.clone(),
                ))
            }
            other => {
                return Err(LlmError::NotConfigured(format!(
                    "unknown LLM provider '{other}'"
                )))
            }
        };

        Ok(Self {
            provider,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn with_provider(provider: Box<dyn LlmProvider>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
        }
    }
}

#[async_trait]
impl Generator for LlmGenerator {
    async fn generate(
        &self,
        query: &str,
        chunks: &[ScoredChunk],
        history: &[Exchange],
    ) -> Result<String, LlmError> {
        let messages = vec![
            Message {
                role: Role::System,
                content: build_system_prompt(chunks, history),
            },
            Message {
                role: Role::User,
                content: query.to_string(),
            },
        ];
        self.provider
            .complete(messages, self.temperature, self.max_tokens)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct EchoProvider {
        captured: Arc<Mutex<Vec<Message>>>,
    }

    #[async_trait]
    impl LlmProvider for EchoProvider {
        async fn complete(
            &self,
            messages: Vec<Message>,
            _temperature: f32,
            _max_tokens: u32,
        ) -> Result<String, LlmError> {
            *self.captured.lock().unwrap() = messages;
            Ok("generated answer".to_string())
        }
    }

    #[tokio::test]
    async fn generator_feeds_context_through_the_system_prompt() {
        use sift_core::label::ContentLabel;
        use sift_store::ChunkMeta;

        let captured = Arc::new(Mutex::new(Vec::new()));
        let generator = LlmGenerator::with_provider(
            Box::new(EchoProvider {
                captured: captured.clone(),
            }),
            0.1,
            512,
        );
        let chunks = vec![ScoredChunk {
            text: "Workflow Manager supports two types of workflows.".to_string(),
            meta: ChunkMeta {
                doc_id: "workflows.txt".to_string(),
                seq: 0,
                start: 0,
                end: 49,
                content_type: ContentLabel::Lists,
                strategy: "small_lists".to_string(),
            },
            score: 0.8,
        }];

        let answer = generator
            .generate("how many workflows are there", &chunks, &[])
            .await
            .unwrap();
        assert_eq!(answer, "generated answer");

        let messages = captured.lock().unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].content.contains("supports two types of workflows"));
        assert!(messages[0].content.contains("workflows.txt"));
        assert_eq!(messages[1].content, "how many workflows are there");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let mut config = test_config();
        config.provider = "mystery".to_string();
        assert!(matches!(
            LlmGenerator::from_config(&config),
            Err(LlmError::NotConfigured(_))
        ));
    }

    #[test]
    fn openai_without_key_is_rejected() {
        let mut config = test_config();
        config.provider = "openai".to_string();
        config.openai_api_key = None;
        assert!(matches!(
            LlmGenerator::from_config(&config),
            Err(LlmError::NotConfigured(_))
        ));
    }

    fn test_config() -> LlmConfig {
        LlmConfig {
            provider: "ollama".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3.2".to_string(),
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            openai_base_url: "https://api.openai.com".to_string(),
            temperature: 0.1,
            max_tokens: 2048,
        }
    }
}
