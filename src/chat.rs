//! Turn submission: the reply pipeline and its fallback chain.
//!
//! A turn prefers a direct same-language reply from the provider. When that
//! fails, the failure is classified (rate limit vs. everything else), a
//! canonical English apology is selected, and the apology is translated
//! best-effort into the requested language. The caller always gets a bot
//! reply for a valid submission; only bad input and a broken log surface as
//! errors.

use crate::config::Config;
use crate::db::{ChatMessage, Database, NewMessage, Sender};
use crate::error::{ChatError, ProviderError};
use crate::languages::CANONICAL_CODE;
use crate::mistral;
use crate::translation::{self, needs_translation};
use tracing::warn;

/// Canonical fallback reply when the provider is rate limiting us.
pub const RATE_LIMIT_FALLBACK: &str = "I've reached my API rate limit. Please wait a moment and try again, or contact support for a new API key.";

/// Canonical fallback reply for every other provider failure.
pub const CONNECTION_FALLBACK: &str =
    "I'm having trouble connecting right now. Please try again.";

/// How a provider failure degrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackKind {
    QuotaExceeded,
    Other,
}

/// Classify a provider failure for fallback-copy selection.
///
/// Quota exhaustion shows up either as HTTP 429 or as an embedded provider
/// code of 429; either alone is sufficient, and neither subsumes the other.
pub fn classify(error: &ProviderError) -> FallbackKind {
    if error.status() == Some(429) || error.provider_code() == Some(429) {
        FallbackKind::QuotaExceeded
    } else {
        FallbackKind::Other
    }
}

/// The canonical English fallback string for a failure class.
pub fn fallback_text(kind: FallbackKind) -> &'static str {
    match kind {
        FallbackKind::QuotaExceeded => RATE_LIMIT_FALLBACK,
        FallbackKind::Other => CONNECTION_FALLBACK,
    }
}

/// Translate with an ordered-backend degrade that never fails.
///
/// Backends are tried in [`translation::FALLBACK_ORDER`]; each failure is
/// logged and absorbed. If all fail, the original text comes back
/// untranslated - the message record keeps the requested language tag
/// either way.
pub async fn safe_translate(
    client: &reqwest::Client,
    config: &Config,
    text: &str,
    source_lang: &str,
    target_lang: &str,
) -> String {
    if !needs_translation(text, source_lang, target_lang) {
        return text.to_string();
    }

    for backend in translation::FALLBACK_ORDER {
        match translation::translate(*backend, client, config, text, source_lang, target_lang)
            .await
        {
            Ok(translated) => return translated,
            Err(e) => warn!("{:?} translate failed, degrading: {}", backend, e),
        }
    }

    warn!("All translation backends failed, returning original text");
    text.to_string()
}

/// Submit one turn: persist the user message, obtain a reply (direct or via
/// the fallback chain), persist the bot message, return both in order.
///
/// The user record is durable before the reply attempt starts, so a crash
/// mid-turn can lose at most the bot reply.
pub async fn submit_turn(
    db: &Database,
    client: &reqwest::Client,
    config: &Config,
    user_id: &str,
    message: &str,
    language: &str,
) -> Result<(ChatMessage, ChatMessage), ChatError> {
    if message.trim().is_empty() {
        return Err(ChatError::EmptyMessage);
    }

    let user_record = db
        .append_message(NewMessage {
            user_id: user_id.to_string(),
            text: message.to_string(),
            sender: Sender::User,
            language: language.to_string(),
        })
        .map_err(ChatError::Persistence)?;

    let reply = match mistral::generate_reply(client, config, message, language).await {
        Ok(text) => text,
        Err(err) => {
            let kind = classify(&err);
            warn!("Reply generation failed ({:?}): {}", kind, err);

            let canonical = fallback_text(kind);
            if language == CANONICAL_CODE {
                canonical.to_string()
            } else {
                safe_translate(client, config, canonical, CANONICAL_CODE, language).await
            }
        }
    };

    let bot_record = db
        .append_message(NewMessage {
            user_id: user_id.to_string(),
            text: reply,
            sender: Sender::Bot,
            language: language.to_string(),
        })
        .map_err(ChatError::Persistence)?;

    Ok((user_record, bot_record))
}
