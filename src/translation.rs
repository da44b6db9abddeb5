use crate::config::Config;
use crate::error::TranslationError;
use crate::retry::{with_retry_if, RetryConfig};
use serde::{Deserialize, Serialize};

/// Completion request for the instruction-driven translation backend
#[derive(Debug, Serialize)]
struct TranslationRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

/// LibreTranslate request body
#[derive(Debug, Serialize)]
struct LibreRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct LibreResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// A translation backend. The orchestrator tries these in [`FALLBACK_ORDER`];
/// adding a third backend means extending the enum and the dispatch below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Mistral,
    Libre,
}

/// The order backends are tried in when degrading.
pub const FALLBACK_ORDER: &[Backend] = &[Backend::Mistral, Backend::Libre];

/// Uniform entry point over the backends.
pub async fn translate(
    backend: Backend,
    client: &reqwest::Client,
    config: &Config,
    text: &str,
    source_lang: &str,
    target_lang: &str,
) -> Result<String, TranslationError> {
    match backend {
        Backend::Mistral => {
            translate_with_mistral(client, config, text, source_lang, target_lang).await
        }
        Backend::Libre => {
            translate_with_libre(client, config, text, source_lang, target_lang).await
        }
    }
}

/// Whether a translation call is needed at all. Empty text and same-language
/// pairs pass through unchanged; both backends honor this before any I/O.
pub fn needs_translation(text: &str, source_lang: &str, target_lang: &str) -> bool {
    !text.is_empty() && source_lang != target_lang
}

/// Build the instruction prompt for the completion-driven backend
fn build_translation_prompt(text: &str, source_lang: &str, target_lang: &str) -> String {
    let source = if source_lang.is_empty() { "auto" } else { source_lang };
    format!(
        "Translate the following text from {} to {}. Return only the translation, no quotes, no commentary.\n\nText to translate: {}",
        source, target_lang, text
    )
}

/// Retry 5xx and transport failures only
fn is_retryable_error(error: &TranslationError) -> bool {
    match error {
        TranslationError::Transport(_) => true,
        TranslationError::Api { status, .. } => *status >= 500,
        TranslationError::EmptyResponse => false,
    }
}

/// Translate via the Mistral completion endpoint (primary backend).
pub async fn translate_with_mistral(
    client: &reqwest::Client,
    config: &Config,
    text: &str,
    source_lang: &str,
    target_lang: &str,
) -> Result<String, TranslationError> {
    if !needs_translation(text, source_lang, target_lang) {
        return Ok(text.to_string());
    }

    let request = TranslationRequest {
        model: config.mistral_model.clone(),
        messages: vec![Message {
            role: "user".to_string(),
            content: build_translation_prompt(text, source_lang, target_lang),
        }],
        max_tokens: 256,
        temperature: 0.3,
    };

    with_retry_if(
        &RetryConfig::provider_call(),
        "Mistral translation",
        || async {
            let response = client
                .post(&config.mistral_api_url)
                .header("Authorization", format!("Bearer {}", config.mistral_api_key))
                .header("Content-Type", "application/json")
                .json(&request)
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let message = response.text().await.unwrap_or_default();
                return Err(TranslationError::Api { status, message });
            }

            let chat_response: ChatResponse = response.json().await?;

            let translated = chat_response
                .choices
                .first()
                .map(|c| c.message.content.trim().to_string())
                .filter(|t| !t.is_empty())
                .ok_or(TranslationError::EmptyResponse)?;

            Ok(translated)
        },
        is_retryable_error,
    )
    .await
}

/// Translate via the dedicated LibreTranslate endpoint (secondary backend).
pub async fn translate_with_libre(
    client: &reqwest::Client,
    config: &Config,
    text: &str,
    source_lang: &str,
    target_lang: &str,
) -> Result<String, TranslationError> {
    if !needs_translation(text, source_lang, target_lang) {
        return Ok(text.to_string());
    }

    let source = if source_lang.is_empty() { "auto" } else { source_lang };
    let request = LibreRequest {
        q: text,
        source,
        target: target_lang,
        format: "text",
    };

    with_retry_if(
        &RetryConfig::provider_call(),
        "Libre translation",
        || async {
            let response = client
                .post(&config.libretranslate_url)
                .header("Content-Type", "application/json")
                .json(&request)
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let message = response.text().await.unwrap_or_default();
                return Err(TranslationError::Api { status, message });
            }

            let libre_response: LibreResponse = response.json().await?;
            Ok(libre_response.translated_text)
        },
        is_retryable_error,
    )
    .await
}
