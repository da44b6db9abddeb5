use crate::config::Config;
use crate::error::ProviderError;
use crate::languages;
use crate::retry::{with_retry_if, RetryConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatRequest {
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

/// Build the persona system prompt, pinned to the requested reply language.
fn build_chat_system_prompt(language_display_name: &str) -> String {
    format!(
        r#"You are LangLeo, a friendly and helpful multilingual chatbot assistant.
Provide natural, conversational, and helpful responses to user messages.
Be concise but informative. Show personality and warmth.
Respond ONLY in {}. Do not use any other language.

IMPORTANT: When providing code examples, ALWAYS format them using markdown code blocks with the language specified:
```language
code here
```

For example:
- JavaScript: ```javascript
- Python: ```python
- Java: ```java
- HTML: ```html
- CSS: ```css
- SQL: ```sql

Always include the appropriate language identifier after the opening triple backticks."#,
        language_display_name
    )
}

/// Pull a numeric provider error code out of an error response body.
///
/// The provider reports rate limiting either as a top-level `code` or nested
/// under `error.code`, and as either a number or a numeric string. All four
/// shapes occur in the wild, so check them all.
fn parse_provider_error_code(body: &str) -> Option<u16> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let candidate = value
        .get("error")
        .and_then(|e| e.get("code"))
        .or_else(|| value.get("code"))?;

    match candidate {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Retry 5xx and transport failures; 4xx (including 429) fail immediately so
/// the orchestrator can classify them and fall back without extra latency.
fn is_retryable_error(error: &ProviderError) -> bool {
    match error {
        ProviderError::Transport(_) => true,
        ProviderError::Api { status, .. } => *status >= 500,
        ProviderError::EmptyResponse => false,
    }
}

/// Ask the provider for a reply in the requested language.
///
/// Fails with `ProviderError`; the caller decides how to degrade.
pub async fn generate_reply(
    client: &reqwest::Client,
    config: &Config,
    user_message: &str,
    language_code: &str,
) -> Result<String, ProviderError> {
    let request = ChatRequest {
        model: config.mistral_model.clone(),
        messages: vec![
            Message {
                role: "system".to_string(),
                content: build_chat_system_prompt(languages::display_name(language_code)),
            },
            Message {
                role: "user".to_string(),
                content: user_message.to_string(),
            },
        ],
        max_tokens: 512,
        temperature: 0.7,
    };

    with_retry_if(
        &RetryConfig::provider_call(),
        "Chat reply",
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
                let body = response.text().await.unwrap_or_default();
                return Err(ProviderError::Api {
                    status,
                    code: parse_provider_error_code(&body),
                    message: body,
                });
            }

            let chat_response: ChatResponse = response.json().await?;

            let reply = chat_response
                .choices
                .first()
                .map(|c| c.message.content.trim().to_string())
                .filter(|text| !text.is_empty())
                .ok_or(ProviderError::EmptyResponse)?;

            Ok(reply)
        },
        is_retryable_error,
    )
    .await
}
