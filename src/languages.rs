//! Language catalog: the fixed set of languages the bot can reply in.
//!
//! A pure lookup table from ISO 639-1 code to the display name used when
//! instructing the reply model. Unknown codes fall back to English rather
//! than failing, so an unexpected code from a client degrades to an English
//! reply instead of an error.

/// One supported language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageEntry {
    /// ISO 639-1 language code (e.g., "en", "hi")
    pub code: &'static str,
    /// Display name handed to the reply model, native script included
    pub display_name: &'static str,
}

/// All supported languages. English first; it is the canonical language the
/// fallback strings are written in.
static CATALOG: &[LanguageEntry] = &[
    LanguageEntry { code: "en", display_name: "English" },
    LanguageEntry { code: "hi", display_name: "Hindi (हिंदी)" },
    LanguageEntry { code: "es", display_name: "Spanish (Español)" },
    LanguageEntry { code: "fr", display_name: "French (Français)" },
    LanguageEntry { code: "de", display_name: "German (Deutsch)" },
    LanguageEntry { code: "zh", display_name: "Chinese (中文)" },
    LanguageEntry { code: "ja", display_name: "Japanese (日本語)" },
    LanguageEntry { code: "ko", display_name: "Korean (한국어)" },
    LanguageEntry { code: "ar", display_name: "Arabic (العربية)" },
    LanguageEntry { code: "pt", display_name: "Portuguese (Português)" },
    LanguageEntry { code: "ru", display_name: "Russian (Русский)" },
    LanguageEntry { code: "bn", display_name: "Bengali (বাংলা)" },
    LanguageEntry { code: "ta", display_name: "Tamil (தமிழ்)" },
    LanguageEntry { code: "te", display_name: "Telugu (తెలుగు)" },
    LanguageEntry { code: "mr", display_name: "Marathi (मराठी)" },
    LanguageEntry { code: "gu", display_name: "Gujarati (ગુજરાતી)" },
    LanguageEntry { code: "kn", display_name: "Kannada (ಕನ್ನಡ)" },
    LanguageEntry { code: "ml", display_name: "Malayalam (മലയാളം)" },
    LanguageEntry { code: "pa", display_name: "Punjabi (ਪੰਜਾਬੀ)" },
    LanguageEntry { code: "ur", display_name: "Urdu (اردو)" },
];

/// The canonical language code. Fallback strings are authored in it and
/// translations degrade to it.
pub const CANONICAL_CODE: &str = "en";

/// Display name for a language code. Unknown codes resolve to "English".
pub fn display_name(code: &str) -> &'static str {
    CATALOG
        .iter()
        .find(|entry| entry.code == code)
        .map(|entry| entry.display_name)
        .unwrap_or("English")
}

/// Whether a language code is in the catalog.
pub fn is_supported(code: &str) -> bool {
    CATALOG.iter().any(|entry| entry.code == code)
}

/// The full catalog, in a stable order.
pub fn catalog() -> &'static [LanguageEntry] {
    CATALOG
}
