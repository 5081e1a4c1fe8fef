//! Sentiment analysis pipeline: ML inference with keyword-vote fallback.
//!
//! The primary strategy calls the local Python sidecar, which wraps a
//! multilingual BERT sentiment model. When the sidecar is unreachable (or the
//! model is still loading) we fall back to a keyword vote so the analyze
//! endpoint never fails.

use axum::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The model only ever sees the first 1000 characters. Keeps inference cost
/// bounded; the keyword fallback still gets the full text.
const MAX_MODEL_CHARS: usize = 1000;

const POSITIVE_KEYWORDS: [&str; 5] = ["good", "great", "happy", "love", "excellent"];
const NEGATIVE_KEYWORDS: [&str; 5] = ["bad", "sad", "angry", "hate", "terrible"];

/// Three-way polarity label. The only thing callers ever see; model
/// confidence stays internal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Label-mapping rules, checked in order, first match wins. The model family
/// returns either polarity words ("POSITIVE") or star ratings ("5 stars");
/// both are handled by substring checks. Known limitation: "3"/"4" star
/// labels fall through to Neutral, and any label incidentally containing "1"
/// or "2" maps to Negative, so the sidecar must not put version strings in
/// the label field.
const LABEL_RULES: &[(&[&str], Sentiment)] = &[
    (&["positive", "5"], Sentiment::Positive),
    (&["negative", "1", "2"], Sentiment::Negative),
];

/// Normalize a raw model label into a [`Sentiment`]. Total over any string;
/// unrecognized labels degrade to Neutral.
pub fn map_model_label(label: &str) -> Sentiment {
    let label = label.to_lowercase();
    for (needles, sentiment) in LABEL_RULES {
        if needles.iter().any(|needle| label.contains(needle)) {
            return *sentiment;
        }
    }
    Sentiment::Neutral
}

/// Keyword-vote classifier used when ML inference is unavailable.
///
/// Counts how many distinct keywords from each list occur as substrings of
/// the lower-cased text (so "badge" counts for "bad") and lets the majority
/// win, tie meaning Neutral.
pub fn keyword_vote(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    let positive = POSITIVE_KEYWORDS
        .into_iter()
        .filter(|word| lower.contains(*word))
        .count();
    let negative = NEGATIVE_KEYWORDS
        .into_iter()
        .filter(|word| lower.contains(*word))
        .count();

    if positive > negative {
        Sentiment::Positive
    } else if negative > positive {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Clip to at most `max_chars` characters without splitting a code point.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Raw result from the inference backend: an opaque label plus confidence.
#[derive(Debug, Deserialize)]
pub struct InferenceResult {
    pub label: String,
    #[serde(default)]
    pub score: f32,
}

/// Inference backend seam. Production uses [`SidecarModel`]; tests swap in
/// stubs to force failures or capture inputs.
#[async_trait]
pub trait SentimentModel: Send + Sync {
    async fn infer(&self, text: &str) -> anyhow::Result<InferenceResult>;
}

/// HTTP client for the Python inference sidecar. The sidecar loads the model
/// lazily on its first request, so the first call can be slow; this side just
/// holds one shared connection pool.
pub struct SidecarModel {
    client: reqwest::Client,
    endpoint: String,
}

impl SidecarModel {
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint: format!("{}/ml/sentiment", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl SentimentModel for SidecarModel {
    async fn infer(&self, text: &str) -> anyhow::Result<InferenceResult> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("sentiment sidecar returned {}", response.status());
        }

        Ok(response.json::<InferenceResult>().await?)
    }
}

/// Sentiment classifier composing the two strategies. Built once at startup
/// and shared through `AppState`; `classify` never fails.
pub struct SentimentAnalyzer {
    model: Box<dyn SentimentModel>,
}

impl SentimentAnalyzer {
    pub fn new(model: Box<dyn SentimentModel>) -> Self {
        Self { model }
    }

    /// Classify `text`, preferring the ML model, falling back to the keyword
    /// vote on any inference error. The model sees at most
    /// [`MAX_MODEL_CHARS`] characters; the fallback sees the full text.
    pub async fn classify(&self, text: &str) -> Sentiment {
        match self.model.infer(truncate_chars(text, MAX_MODEL_CHARS)).await {
            Ok(result) => map_model_label(&result.label),
            Err(e) => {
                eprintln!("⚠️ [Sentiment] Inference failed, using keyword fallback: {}", e);
                keyword_vote(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct FailingModel;

    #[async_trait]
    impl SentimentModel for FailingModel {
        async fn infer(&self, _text: &str) -> anyhow::Result<InferenceResult> {
            anyhow::bail!("sidecar offline")
        }
    }

    struct FixedLabelModel(&'static str);

    #[async_trait]
    impl SentimentModel for FixedLabelModel {
        async fn infer(&self, _text: &str) -> anyhow::Result<InferenceResult> {
            Ok(InferenceResult {
                label: self.0.to_string(),
                score: 0.9,
            })
        }
    }

    struct SharedRecorder {
        seen: Arc<Mutex<Option<String>>>,
    }

    #[async_trait]
    impl SentimentModel for SharedRecorder {
        async fn infer(&self, text: &str) -> anyhow::Result<InferenceResult> {
            *self.seen.lock().unwrap() = Some(text.to_string());
            Ok(InferenceResult {
                label: "positive".to_string(),
                score: 1.0,
            })
        }
    }

    #[test]
    fn maps_star_ratings_and_polarity_words() {
        assert_eq!(map_model_label("5 stars"), Sentiment::Positive);
        assert_eq!(map_model_label("POSITIVE"), Sentiment::Positive);
        assert_eq!(map_model_label("1 star"), Sentiment::Negative);
        assert_eq!(map_model_label("negative"), Sentiment::Negative);
        assert_eq!(map_model_label("3 stars"), Sentiment::Neutral);
        assert_eq!(map_model_label("neutral"), Sentiment::Neutral);
    }

    #[test]
    fn keyword_vote_majority_wins() {
        assert_eq!(keyword_vote("I love this, it's great"), Sentiment::Positive);
        assert_eq!(
            keyword_vote("I hate this, it's terrible and bad"),
            Sentiment::Negative
        );
        assert_eq!(keyword_vote("The weather is fine"), Sentiment::Neutral);
        // Tie goes to Neutral.
        assert_eq!(keyword_vote("good bad"), Sentiment::Neutral);
    }

    #[test]
    fn keyword_vote_matches_substrings() {
        // Not word-boundary aware: "badge" contains "bad".
        assert_eq!(keyword_vote("nice badge"), Sentiment::Negative);
    }

    #[test]
    fn truncation_is_by_character_not_byte() {
        let text = "é".repeat(1200);
        let clipped = truncate_chars(&text, MAX_MODEL_CHARS);
        assert_eq!(clipped.chars().count(), 1000);
        assert!(text.is_char_boundary(clipped.len()));

        let short = "hello";
        assert_eq!(truncate_chars(short, MAX_MODEL_CHARS), short);
    }

    #[tokio::test]
    async fn classify_maps_model_label() {
        let analyzer = SentimentAnalyzer::new(Box::new(FixedLabelModel("4 stars")));
        assert_eq!(analyzer.classify("whatever").await, Sentiment::Neutral);
    }

    #[tokio::test]
    async fn classify_truncates_model_input_only() {
        let seen = Arc::new(Mutex::new(None::<String>));
        let analyzer = SentimentAnalyzer::new(Box::new(SharedRecorder { seen: seen.clone() }));

        let long = "a".repeat(1500);
        assert_eq!(analyzer.classify(&long).await, Sentiment::Positive);

        // The model saw exactly the first 1000 characters.
        assert_eq!(seen.lock().unwrap().as_deref().map(str::len), Some(1000));
    }

    #[tokio::test]
    async fn classify_falls_back_on_inference_error() {
        let analyzer = SentimentAnalyzer::new(Box::new(FailingModel));

        // Fallback must match the keyword vote on the full, untruncated text.
        let mut text = "x".repeat(1100);
        text.push_str(" excellent");
        assert_eq!(analyzer.classify(&text).await, Sentiment::Positive);
        assert_eq!(analyzer.classify(&text).await, keyword_vote(&text));
    }

    #[tokio::test]
    async fn classify_is_total_on_empty_input() {
        let analyzer = SentimentAnalyzer::new(Box::new(FailingModel));
        assert_eq!(analyzer.classify("").await, Sentiment::Neutral);
    }
}
