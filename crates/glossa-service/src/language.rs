use glossa_types::LanguageCode;

/// Source/target languages accepted by DeepL
pub const DEEPL_LANGUAGES: &[&str] = &[
    "ar", "bg", "cs", "da", "de", "el", "en", "es", "et", "fi", "fr", "hu", "id", "it", "ja",
    "ko", "lt", "lv", "nb", "nl", "pl", "pt", "ro", "ru", "sk", "sl", "sv", "tr", "uk", "zh",
];

/// Normalize a language code to the uppercase form backends use on the wire
pub fn service_code(code: &str) -> LanguageCode {
    code.trim().to_uppercase()
}

pub fn deepl_language(code: &str) -> Option<LanguageCode> {
    let code = code.trim().to_lowercase();
    DEEPL_LANGUAGES
        .contains(&code.as_str())
        .then(|| service_code(&code))
}
