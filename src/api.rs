//! HTTP handlers for the chatbot API.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::intent::{self, Intent};
use crate::ollama::{ChatMessage, OllamaClient};
use crate::sentiment::{Sentiment, SentimentAnalyzer};

pub struct AppState {
    pub ollama: OllamaClient,
    pub sentiment: SentimentAnalyzer,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

fn bad_request(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub response: String,
}

/// Forward a conversation to the local LLM and return its reply.
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Model reply", body = ChatResponse),
        (status = 400, description = "Missing messages", body = ErrorResponse),
        (status = 500, description = "Ollama unreachable", body = ErrorResponse)
    ),
    tag = "chat"
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    if req.messages.is_empty() {
        return Err(bad_request("messages[] required"));
    }

    let temperature = req.temperature.unwrap_or(0.7);
    match state.ollama.chat(&req.messages, temperature).await {
        Ok(response) => Ok(Json(ChatResponse { response })),
        Err(e) => {
            eprintln!("❌ Ollama error: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Ollama request failed".to_string(),
                }),
            ))
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    pub text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeResponse {
    pub sentiment: Sentiment,
    pub intent: Intent,
}

/// Run sentiment and intent analysis over a piece of text. Sentiment uses
/// the ML model with keyword fallback, so this endpoint always answers.
#[utoipa::path(
    post,
    path = "/api/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis result", body = AnalyzeResponse),
        (status = 400, description = "Missing text", body = ErrorResponse)
    ),
    tag = "analysis"
)]
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, Json<ErrorResponse>)> {
    if req.text.is_empty() {
        return Err(bad_request("text required"));
    }

    Ok(Json(AnalyzeResponse {
        sentiment: state.sentiment.classify(&req.text).await,
        intent: intent::detect_intent(&req.text),
    }))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SummarizeRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SummarizeResponse {
    pub summary: String,
}

/// Summarize a conversation. Degrades to a stock summary when the model is
/// unavailable rather than failing the request.
#[utoipa::path(
    post,
    path = "/api/summarize",
    request_body = SummarizeRequest,
    responses(
        (status = 200, description = "Conversation summary", body = SummarizeResponse)
    ),
    tag = "chat"
)]
pub async fn summarize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SummarizeRequest>,
) -> Json<SummarizeResponse> {
    let summary = match state.ollama.summarize(&req.messages).await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("⚠️ Summarize failed: {}", e);
            "Conversation recorded.".to_string()
        }
    };

    Json(SummarizeResponse { summary })
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VoiceToTextResponse {
    pub text: String,
}

/// Placeholder: speech-to-text runs client-side via the Web Speech API.
#[utoipa::path(
    post,
    path = "/api/voice-to-text",
    responses(
        (status = 200, description = "Placeholder advisory", body = VoiceToTextResponse)
    ),
    tag = "voice"
)]
pub async fn voice_to_text() -> Json<VoiceToTextResponse> {
    Json(VoiceToTextResponse {
        text: "Voice feature requires setup - use browser speech recognition instead".to_string(),
    })
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TextToSpeechRequest {
    pub text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TextToSpeechResponse {
    pub audio: String,
}

/// Placeholder: TTS is handled client-side via the Web Speech API.
#[utoipa::path(
    post,
    path = "/api/text-to-speech",
    request_body = TextToSpeechRequest,
    responses(
        (status = 200, description = "Placeholder advisory", body = TextToSpeechResponse),
        (status = 400, description = "Missing text", body = ErrorResponse)
    ),
    tag = "voice"
)]
pub async fn text_to_speech(
    Json(req): Json<TextToSpeechRequest>,
) -> Result<Json<TextToSpeechResponse>, (StatusCode, Json<ErrorResponse>)> {
    if req.text.is_empty() {
        return Err(bad_request("text required"));
    }

    Ok(Json(TextToSpeechResponse {
        audio: "Use browser Web Speech API for TTS".to_string(),
    }))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub time: String,
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service health", body = HealthResponse)),
    tag = "health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        time: chrono::Utc::now().to_rfc3339(),
    })
}
