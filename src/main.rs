mod api;
mod intent;
mod ollama;
mod sentiment;

use axum::{
    routing::{get, post},
    Router,
};
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::chat,
        api::analyze,
        api::summarize,
        api::voice_to_text,
        api::text_to_speech,
        api::health
    ),
    components(
        schemas(
            api::ChatRequest,
            api::ChatResponse,
            api::AnalyzeRequest,
            api::AnalyzeResponse,
            api::SummarizeRequest,
            api::SummarizeResponse,
            api::VoiceToTextResponse,
            api::TextToSpeechRequest,
            api::TextToSpeechResponse,
            api::HealthResponse,
            api::ErrorResponse,
            crate::ollama::ChatMessage,
            crate::sentiment::Sentiment,
            crate::intent::Intent
        )
    ),
    tags(
        (name = "chat", description = "LLM chat and summarization"),
        (name = "analysis", description = "Sentiment and intent analysis"),
        (name = "voice", description = "Voice placeholders"),
        (name = "health", description = "Service health")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let ollama_url =
        env::var("OLLAMA_API_URL").unwrap_or_else(|_| "http://localhost:11434".to_string());
    let model_name = env::var("MODEL_NAME").unwrap_or_else(|_| "llama3.2".to_string());
    let sentiment_url =
        env::var("SENTIMENT_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());

    let state = Arc::new(api::AppState {
        ollama: ollama::OllamaClient::new(ollama_url, model_name),
        sentiment: sentiment::SentimentAnalyzer::new(Box::new(sentiment::SidecarModel::new(
            &sentiment_url,
        ))),
    });

    let app = Router::new()
        .merge(SwaggerUi::new("/chatbot-swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/chat", post(api::chat))
        .route("/api/analyze", post(api::analyze))
        .route("/api/summarize", post(api::summarize))
        .route("/api/voice-to-text", post(api::voice_to_text))
        .route("/api/text-to-speech", post(api::text_to_speech))
        .route("/api/health", get(api::health))
        .nest_service("/", ServeDir::new("static")) // Serve chat frontend
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    println!("🚀 Server running at http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
