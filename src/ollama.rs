//! HTTP client for the local Ollama runtime.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

const SYSTEM_PROMPT: &str = "You are an advanced AI assistant.\n\
Be concise, empathetic, and structured.\n\
Remember context and user intent.";

/// One turn of a conversation, in Ollama's chat format.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaMessage>,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}

/// Shared client for the Ollama chat API. Built once in main and reused for
/// every request through `AppState`.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            model,
        }
    }

    async fn chat_request(&self, payload: serde_json::Value) -> anyhow::Result<String> {
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            // Model generation can be slow on CPU-only hosts.
            .timeout(Duration::from_secs(60))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("Ollama returned {}", response.status());
        }

        let data = response.json::<OllamaChatResponse>().await?;
        Ok(data.message.map(|m| m.content).unwrap_or_default())
    }

    /// Forward a conversation to the model, prepending the assistant system
    /// prompt. Ollama has no max_tokens option; num_predict caps the reply.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> anyhow::Result<String> {
        let mut chat_messages = vec![serde_json::json!({
            "role": "system",
            "content": SYSTEM_PROMPT,
        })];
        chat_messages.extend(messages.iter().map(|m| serde_json::json!(m)));

        let payload = serde_json::json!({
            "model": self.model,
            "messages": chat_messages,
            "stream": false,
            "options": {
                "temperature": temperature,
                "top_p": 0.9,
                "num_predict": 800,
            }
        });

        self.chat_request(payload).await
    }

    /// Ask the model for a short summary of the transcript.
    pub async fn summarize(&self, messages: &[ChatMessage]) -> anyhow::Result<String> {
        let conversation = messages
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n");

        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": "Summarize briefly." },
                { "role": "user", "content": conversation },
            ],
            "stream": false,
            "options": { "temperature": 0.3, "num_predict": 120 }
        });

        Ok(self.chat_request(payload).await?.trim().to_string())
    }
}
